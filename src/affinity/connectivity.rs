use super::{AffinityMaps, AffinityPredictor};
use crate::error::Result;
use crate::image::ImageF32;
use crate::pixels::LinePixels;
use std::collections::HashMap;

/// Model-free baseline: two line pixels have affinity 1.0 when they are
/// 8-connected through other line pixels and 0.0 otherwise.
///
/// Useful for exercising the solver plumbing without the network; strokes
/// that cross end up in one component.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConnectivityAffinity;

impl AffinityPredictor for ConnectivityAffinity {
    fn predict(&self, _stem: &str, image: &ImageF32, pixels: &LinePixels) -> Result<AffinityMaps> {
        let components = connected_components(pixels);
        let mut members: HashMap<usize, Vec<usize>> = HashMap::new();
        for (i, &c) in components.iter().enumerate() {
            members.entry(c).or_default().push(i);
        }

        let mut maps = Vec::with_capacity(pixels.len());
        for &c in &components {
            let mut map = ImageF32::new(image.w, image.h);
            for &k in &members[&c] {
                let (row, col) = pixels.get(k);
                map.set(col, row, 1.0);
            }
            maps.push(map);
        }
        AffinityMaps::new(image.w, image.h, maps)
    }
}

/// Component id per pixel (union-find over the 8-neighbourhood).
pub(crate) fn connected_components(pixels: &LinePixels) -> Vec<usize> {
    let index: HashMap<(usize, usize), usize> =
        pixels.iter().enumerate().map(|(i, p)| (p, i)).collect();
    let mut parent: Vec<usize> = (0..pixels.len()).collect();

    for (i, (row, col)) in pixels.iter().enumerate() {
        for dr in -1i64..=1 {
            for dc in -1i64..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let r = row as i64 + dr;
                let c = col as i64 + dc;
                if r < 0 || c < 0 {
                    continue;
                }
                if let Some(&j) = index.get(&(r as usize, c as usize)) {
                    union(&mut parent, i, j);
                }
            }
        }
    }
    (0..pixels.len()).map(|i| find(&mut parent, i)).collect()
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        parent[ra.max(rb)] = ra.min(rb);
    }
}
