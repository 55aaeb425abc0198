//! Least-squares cubic Bézier fitting for one stroke group.
//!
//! Points are ordered along their principal axis, parameterized by chord
//! length, and the two inner control points are solved for with the end
//! points pinned to the first and last ordered point.
use nalgebra::{Matrix2, SymmetricEigen, Vector2};
use serde::Serialize;

/// Cubic Bézier in image coordinates (`x` = column, `y` = row).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CubicBezier {
    pub p0: [f32; 2],
    pub p1: [f32; 2],
    pub p2: [f32; 2],
    pub p3: [f32; 2],
}

impl CubicBezier {
    pub fn eval(&self, t: f32) -> [f32; 2] {
        let u = 1.0 - t;
        let b = [u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t];
        let pts = [self.p0, self.p1, self.p2, self.p3];
        let mut out = [0.0f32; 2];
        for (w, p) in b.iter().zip(pts.iter()) {
            out[0] += w * p[0];
            out[1] += w * p[1];
        }
        out
    }
}

/// Fit a single cubic to `points` (`[x, y]`). `None` for fewer than two
/// distinct points.
pub fn fit_cubic_bezier(points: &[[f32; 2]]) -> Option<CubicBezier> {
    if points.len() < 2 {
        return None;
    }
    let ordered = order_along_principal_axis(points);
    let params = chord_length_params(&ordered)?;

    let first = Vector2::from(ordered[0]);
    let last = Vector2::from(ordered[ordered.len() - 1]);

    let mut ata = Matrix2::<f32>::zeros();
    let mut rhs1 = Vector2::<f32>::zeros();
    let mut rhs2 = Vector2::<f32>::zeros();
    for (p, &t) in ordered.iter().zip(params.iter()) {
        let u = 1.0 - t;
        let b0 = u * u * u;
        let b1 = 3.0 * u * u * t;
        let b2 = 3.0 * u * t * t;
        let b3 = t * t * t;
        let r = Vector2::from(*p) - first * b0 - last * b3;
        ata[(0, 0)] += b1 * b1;
        ata[(0, 1)] += b1 * b2;
        ata[(1, 1)] += b2 * b2;
        rhs1 += r * b1;
        rhs2 += r * b2;
    }
    ata[(1, 0)] = ata[(0, 1)];

    let (c1, c2) = match ata.try_inverse() {
        Some(inv) if ata.determinant().abs() > 1e-9 => {
            let c1 = (rhs1 * inv[(0, 0)]) + (rhs2 * inv[(0, 1)]);
            let c2 = (rhs1 * inv[(1, 0)]) + (rhs2 * inv[(1, 1)]);
            (c1, c2)
        }
        // straight line with evenly spaced handles
        _ => {
            let d = last - first;
            (first + d / 3.0, first + d * (2.0 / 3.0))
        }
    };

    Some(CubicBezier {
        p0: first.into(),
        p1: c1.into(),
        p2: c2.into(),
        p3: last.into(),
    })
}

/// Root-mean-square distance from each point to the curve sampled at its
/// chord-length parameter.
pub fn fit_rmse(curve: &CubicBezier, points: &[[f32; 2]]) -> f32 {
    let ordered = order_along_principal_axis(points);
    let Some(params) = chord_length_params(&ordered) else {
        return 0.0;
    };
    let sum: f32 = ordered
        .iter()
        .zip(params.iter())
        .map(|(p, &t)| {
            let q = curve.eval(t);
            let dx = p[0] - q[0];
            let dy = p[1] - q[1];
            dx * dx + dy * dy
        })
        .sum();
    (sum / ordered.len() as f32).sqrt()
}

fn order_along_principal_axis(points: &[[f32; 2]]) -> Vec<[f32; 2]> {
    let n = points.len() as f32;
    let mean = points
        .iter()
        .fold(Vector2::<f32>::zeros(), |acc, p| acc + Vector2::from(*p))
        / n;
    let mut cov = Matrix2::<f32>::zeros();
    for p in points {
        let d = Vector2::from(*p) - mean;
        cov += d * d.transpose();
    }
    let eig = SymmetricEigen::new(cov / n);
    let k = if eig.eigenvalues[0] >= eig.eigenvalues[1] { 0 } else { 1 };
    let axis = eig.eigenvectors.column(k).into_owned();

    let mut keyed: Vec<(f32, [f32; 2])> = points
        .iter()
        .map(|p| ((Vector2::from(*p) - mean).dot(&axis), *p))
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, p)| p).collect()
}

fn chord_length_params(ordered: &[[f32; 2]]) -> Option<Vec<f32>> {
    let mut acc = Vec::with_capacity(ordered.len());
    let mut total = 0.0f32;
    acc.push(0.0);
    for w in ordered.windows(2) {
        let dx = w[1][0] - w[0][0];
        let dy = w[1][1] - w[0][1];
        total += (dx * dx + dy * dy).sqrt();
        acc.push(total);
    }
    if total <= f32::EPSILON {
        return None;
    }
    Some(acc.into_iter().map(|d| d / total).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn straight_run_fits_exactly() {
        let pts: Vec<[f32; 2]> = (0..10).map(|i| [i as f32, 2.0 * i as f32]).collect();
        let curve = fit_cubic_bezier(&pts).unwrap();
        let ends = [curve.p0, curve.p3];
        assert!(ends.contains(&[0.0, 0.0]));
        assert!(ends.contains(&[9.0, 18.0]));
        assert!(fit_rmse(&curve, &pts) < 1e-3);
    }

    #[test]
    fn arc_is_approximated_closely() {
        let pts: Vec<[f32; 2]> = (0..=20)
            .map(|i| {
                let a = std::f32::consts::PI * i as f32 / 40.0;
                [20.0 * a.cos(), 20.0 * a.sin()]
            })
            .collect();
        let curve = fit_cubic_bezier(&pts).unwrap();
        assert!(fit_rmse(&curve, &pts) < 0.5);
        let mid = curve.eval(0.5);
        assert_relative_eq!((mid[0] * mid[0] + mid[1] * mid[1]).sqrt(), 20.0, epsilon = 1.0);
    }

    #[test]
    fn degenerate_groups_are_skipped() {
        assert!(fit_cubic_bezier(&[]).is_none());
        assert!(fit_cubic_bezier(&[[1.0, 1.0]]).is_none());
        assert!(fit_cubic_bezier(&[[1.0, 1.0], [1.0, 1.0]]).is_none());
    }

    #[test]
    fn two_points_fall_back_to_thirds() {
        let curve = fit_cubic_bezier(&[[0.0, 0.0], [3.0, 0.0]]).unwrap();
        let xs = [curve.p0[0], curve.p1[0], curve.p2[0], curve.p3[0]];
        let mut sorted = xs;
        sorted.sort_by(|a, b| a.total_cmp(b));
        assert_relative_eq!(sorted[1], 1.0, epsilon = 1e-5);
        assert_relative_eq!(sorted[2], 2.0, epsilon = 1e-5);
    }
}
