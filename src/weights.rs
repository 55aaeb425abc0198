//! Pairwise edge weights for the graph-cut labeling step.
//!
//! For every unordered pair of line pixels `(i, j)`, `i < j`, two weights
//! are emitted and left for the solver to combine:
//!
//! - `affinity`: the mean of the two cross-predictions (map of `i` read at
//!   `j`, map of `j` read at `i`) passed through a Gaussian centered at 1.0
//!   with bandwidth `prediction_sigma`.
//! - `spatial`: a Gaussian on the Euclidean pixel distance with bandwidth
//!   `neighbor_sigma`, or exactly 1.0 when that bandwidth is not positive.
//!
//! Both kernels are evaluated in `f64` and floored at [`MIN_WEIGHT`], so
//! far-apart pairs keep a small positive weight instead of underflowing.
use crate::affinity::AffinityMaps;
use crate::error::{Result, SketchError};
use crate::pixels::LinePixels;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Bandwidths of the two Gaussian kernels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightParams {
    /// Spatial decay bandwidth in pixels; `<= 0` disables the spatial term.
    pub neighbor_sigma: f32,
    /// Sharpness of the prediction kernel.
    pub prediction_sigma: f32,
}

impl Default for WeightParams {
    fn default() -> Self {
        Self {
            neighbor_sigma: 0.9,
            prediction_sigma: 0.7,
        }
    }
}

/// Smallest weight ever emitted.
pub const MIN_WEIGHT: f64 = f64::MIN_POSITIVE;

/// One record of the weight file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PairWeight {
    pub i: usize,
    pub j: usize,
    pub affinity: f64,
    pub spatial: f64,
}

/// `exp(-0.5 * residual^2 / sigma^2)`, floored at [`MIN_WEIGHT`].
#[inline]
pub fn gaussian_kernel(residual: f64, sigma: f64) -> f64 {
    (-0.5 * residual * residual / (sigma * sigma))
        .exp()
        .max(MIN_WEIGHT)
}

/// Number of unordered pairs among `n` pixels.
#[inline]
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Compute weights for all `N(N-1)/2` pixel pairs, ordered by `(i, j)`.
///
/// `image_size` is `(width, height)` of the rasterized sketch; every map
/// must match it and there must be exactly one map per pixel.
pub fn compute_pair_weights(
    pixels: &LinePixels,
    maps: &AffinityMaps,
    image_size: (usize, usize),
    params: &WeightParams,
) -> Result<Vec<PairWeight>> {
    let (width, height) = image_size;
    maps.validate(width, height, pixels.len())?;
    if let Some((max_row, max_col)) = pixels.extent() {
        if max_row >= height || max_col >= width {
            return Err(SketchError::shape(
                "line pixel extent",
                &[height, width],
                &[max_row + 1, max_col + 1],
            ));
        }
    }
    if params.prediction_sigma.is_nan() || params.prediction_sigma <= 0.0 {
        return Err(SketchError::InvalidInput(format!(
            "prediction_sigma must be positive, got {}",
            params.prediction_sigma
        )));
    }

    let n = pixels.len();
    let start = Instant::now();

    #[cfg(feature = "parallel")]
    let rows: Vec<Vec<PairWeight>> = (0..n)
        .into_par_iter()
        .map(|i| row_weights(i, pixels, maps, params))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Vec<PairWeight>> = (0..n)
        .map(|i| row_weights(i, pixels, maps, params))
        .collect();

    let mut records = Vec::with_capacity(pair_count(n));
    for row in rows {
        records.extend(row);
    }
    debug!(
        "compute_pair_weights: n={} pairs={} elapsed_ms={:.3}",
        n,
        records.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(records)
}

fn row_weights(
    i: usize,
    pixels: &LinePixels,
    maps: &AffinityMaps,
    params: &WeightParams,
) -> Vec<PairWeight> {
    let (ri, ci) = pixels.get(i);
    ((i + 1)..pixels.len())
        .map(|j| {
            let (rj, cj) = pixels.get(j);
            let pred = 0.5 * (f64::from(maps.at(i, rj, cj)) + f64::from(maps.at(j, ri, ci)));
            let affinity = gaussian_kernel(1.0 - pred, f64::from(params.prediction_sigma));
            let spatial = if params.neighbor_sigma > 0.0 {
                let dr = ri as f64 - rj as f64;
                let dc = ci as f64 - cj as f64;
                gaussian_kernel((dr * dr + dc * dc).sqrt(), f64::from(params.neighbor_sigma))
            } else {
                1.0
            };
            PairWeight {
                i,
                j,
                affinity,
                spatial,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageF32;
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    /// Pixels on one row; `mutual(i, j)` gives the value each map holds at
    /// the other pixel.
    fn row_fixture(n: usize, mutual: impl Fn(usize, usize) -> f32) -> (LinePixels, AffinityMaps) {
        let width = n.max(1);
        let pixels = LinePixels::from_coords(vec![0; n], (0..n).collect()).unwrap();
        let maps = (0..n)
            .map(|i| {
                let mut m = ImageF32::new(width, 1);
                for j in 0..n {
                    m.set(j, 0, if i == j { 1.0 } else { mutual(i, j) });
                }
                m
            })
            .collect();
        (pixels, AffinityMaps::new(width, 1, maps).unwrap())
    }

    #[test]
    fn emits_every_unordered_pair_once() {
        let (pixels, maps) = row_fixture(7, |_, _| 0.5);
        let records =
            compute_pair_weights(&pixels, &maps, (7, 1), &WeightParams::default()).unwrap();
        assert_eq!(records.len(), pair_count(7));
        assert_eq!(records.len(), 21);
        let pairs: HashSet<(usize, usize)> = records.iter().map(|r| (r.i, r.j)).collect();
        assert_eq!(pairs.len(), records.len());
        assert!(records.iter().all(|r| r.i < r.j));
        // lexicographic order
        assert!(records.windows(2).all(|w| (w[0].i, w[0].j) < (w[1].i, w[1].j)));
    }

    #[test]
    fn degenerate_inputs_yield_no_records() {
        for n in [0usize, 1] {
            let (pixels, maps) = row_fixture(n, |_, _| 1.0);
            let width = n.max(1);
            let records =
                compute_pair_weights(&pixels, &maps, (width, 1), &WeightParams::default())
                    .unwrap();
            assert!(records.is_empty(), "n={n}");
        }
    }

    #[test]
    fn weights_lie_in_unit_interval() {
        let (pixels, maps) = row_fixture(6, |i, j| ((i * 7 + j * 3) % 5) as f32 / 4.0);
        let records =
            compute_pair_weights(&pixels, &maps, (6, 1), &WeightParams::default()).unwrap();
        for r in records {
            assert!(r.affinity > 0.0 && r.affinity <= 1.0, "{r:?}");
            assert!(r.spatial > 0.0 && r.spatial <= 1.0, "{r:?}");
        }
    }

    #[test]
    fn non_positive_neighbor_sigma_disables_spatial_term() {
        let (pixels, maps) = row_fixture(4, |_, _| 0.3);
        for sigma in [0.0, -1.0] {
            let params = WeightParams {
                neighbor_sigma: sigma,
                prediction_sigma: 0.7,
            };
            let records = compute_pair_weights(&pixels, &maps, (4, 1), &params).unwrap();
            assert!(records.iter().all(|r| r.spatial == 1.0));
        }
    }

    #[test]
    fn spatial_weight_decays_with_distance() {
        let (pixels, maps) = row_fixture(3, |_, _| 1.0);
        let params = WeightParams {
            neighbor_sigma: 2.0,
            prediction_sigma: 0.7,
        };
        let records = compute_pair_weights(&pixels, &maps, (3, 1), &params).unwrap();
        assert_relative_eq!(records[0].spatial, (-0.5f64 / 4.0).exp(), epsilon = 1e-6);
        assert_relative_eq!(records[1].spatial, (-0.5f64 * 4.0 / 4.0).exp(), epsilon = 1e-6);
    }

    #[test]
    fn far_apart_pairs_keep_a_positive_spatial_weight() {
        // opposite corners of a 96x72 raster
        let pixels = LinePixels::from_coords(vec![0, 20, 71], vec![0, 0, 95]).unwrap();
        let maps = AffinityMaps::new(96, 72, vec![ImageF32::new(96, 72); 3]).unwrap();
        let records =
            compute_pair_weights(&pixels, &maps, (96, 72), &WeightParams::default()).unwrap();
        assert_eq!(records.len(), 3);
        // 20 px apart is still representable without the floor
        assert!(records[0].spatial > MIN_WEIGHT, "{:?}", records[0]);
        let sigma = f64::from(WeightParams::default().neighbor_sigma);
        assert_relative_eq!(
            records[0].spatial,
            (-0.5 * 400.0 / (sigma * sigma)).exp(),
            max_relative = 1e-9
        );
        for r in &records {
            assert!(r.spatial > 0.0 && r.spatial <= 1.0, "{r:?}");
            assert!(r.affinity > 0.0 && r.affinity <= 1.0, "{r:?}");
        }
        assert_eq!(records[1].spatial, MIN_WEIGHT);
    }

    #[test]
    fn mutual_certainty_gives_unit_affinity() {
        let (pixels, maps) = row_fixture(2, |_, _| 1.0);
        let params = WeightParams {
            neighbor_sigma: 0.0,
            prediction_sigma: 0.7,
        };
        let records = compute_pair_weights(&pixels, &maps, (2, 1), &params).unwrap();
        assert_eq!(records.len(), 1);
        assert_relative_eq!(records[0].affinity, 1.0);
    }

    #[test]
    fn three_pixel_scenario() {
        // pair (0,1) averages 1.0, (0,2) averages 0.0, (1,2) averages 0.5
        let table = |i: usize, j: usize| match (i.min(j), i.max(j)) {
            (0, 1) => 1.0,
            (0, 2) => 0.0,
            _ => 0.5,
        };
        let (pixels, maps) = row_fixture(3, table);
        let params = WeightParams {
            neighbor_sigma: 0.0,
            prediction_sigma: 0.7,
        };
        let records = compute_pair_weights(&pixels, &maps, (3, 1), &params).unwrap();
        assert_eq!(records.len(), 3);
        assert_relative_eq!(records[0].affinity, 1.0, epsilon = 1e-6);
        assert_relative_eq!(records[1].affinity, (-0.5f64 / 0.49).exp(), epsilon = 1e-6);
        assert_relative_eq!(
            records[2].affinity,
            (-0.5f64 * 0.25 / 0.49).exp(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn cross_predictions_are_averaged() {
        // map 0 says 1.0 at pixel 1, map 1 says 0.0 at pixel 0 -> mean 0.5
        let (pixels, maps) = row_fixture(2, |i, _| if i == 0 { 1.0 } else { 0.0 });
        let params = WeightParams {
            neighbor_sigma: -1.0,
            prediction_sigma: 0.5,
        };
        let records = compute_pair_weights(&pixels, &maps, (2, 1), &params).unwrap();
        assert_relative_eq!(records[0].affinity, gaussian_kernel(0.5, 0.5), epsilon = 1e-6);
    }

    #[test]
    fn wrong_map_shape_fails_fast() {
        let pixels = LinePixels::from_coords(vec![0, 0], vec![0, 1]).unwrap();
        let maps = AffinityMaps::new(3, 1, vec![ImageF32::new(3, 1); 2]).unwrap();
        let err =
            compute_pair_weights(&pixels, &maps, (2, 1), &WeightParams::default()).unwrap_err();
        assert!(matches!(err, SketchError::ShapeMismatch { .. }));

        let maps = AffinityMaps::new(2, 1, vec![ImageF32::new(2, 1); 3]).unwrap();
        let err =
            compute_pair_weights(&pixels, &maps, (2, 1), &WeightParams::default()).unwrap_err();
        assert!(matches!(err, SketchError::ShapeMismatch { .. }));
    }
}
