//! Color-coded rendering of a labeling.
//!
//! Each line pixel is painted with the colormap entry of its label's rank
//! among the sorted unique labels, so non-contiguous label ids still spread
//! over the whole map. Background stays white.
mod colormap;

pub use colormap::{Colormap, Jet};

use crate::error::{Result, SketchError};
use crate::pixels::LinePixels;
use image::{Rgb, RgbImage};

/// Sorted set of labels present in `labels`.
pub fn unique_labels(labels: &[i32]) -> Vec<i32> {
    let mut u = labels.to_vec();
    u.sort_unstable();
    u.dedup();
    u
}

/// Normalized colormap position of each unique label (by rank).
pub fn label_positions(unique: &[i32]) -> Vec<f32> {
    let denom = unique.len().saturating_sub(1);
    (0..unique.len())
        .map(|rank| {
            if denom == 0 {
                0.0
            } else {
                rank as f32 / denom as f32
            }
        })
        .collect()
}

pub fn render_label_map(
    width: usize,
    height: usize,
    pixels: &LinePixels,
    labels: &[i32],
    cmap: &impl Colormap,
) -> Result<RgbImage> {
    if labels.len() != pixels.len() {
        return Err(SketchError::shape(
            "labels vs line pixels",
            &[pixels.len()],
            &[labels.len()],
        ));
    }
    let unique = unique_labels(labels);
    let positions = label_positions(&unique);

    let mut out = RgbImage::from_pixel(width as u32, height as u32, Rgb([255, 255, 255]));
    for ((row, col), label) in pixels.iter().zip(labels) {
        if row >= height || col >= width {
            return Err(SketchError::shape(
                "label map pixel",
                &[height, width],
                &[row + 1, col + 1],
            ));
        }
        // labels come from `labels`, so the search always succeeds
        let rank = unique.binary_search(label).unwrap_or(0);
        out.put_pixel(col as u32, row as u32, Rgb(cmap.color_u8(positions[rank])));
    }
    Ok(out)
}

/// `label_map_<stem>_<neighbor>_<prediction>.png`, sigmas with six decimals.
pub fn label_map_file_name(stem: &str, neighbor_sigma: f32, prediction_sigma: f32) -> String {
    format!("label_map_{stem}_{neighbor_sigma:.6}_{prediction_sigma:.6}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixels() -> LinePixels {
        LinePixels::from_coords(vec![0, 0, 1, 2], vec![0, 2, 1, 3]).unwrap()
    }

    #[test]
    fn identical_inputs_render_identically() {
        let labels = [17, 4, 17, 99];
        let a = render_label_map(4, 3, &pixels(), &labels, &Jet).unwrap();
        let b = render_label_map(4, 3, &pixels(), &labels, &Jet).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn colors_follow_label_rank_and_background_is_white() {
        let labels = [17, 4, 17, 99];
        let img = render_label_map(4, 3, &pixels(), &labels, &Jet).unwrap();
        // rank(4)=0, rank(17)=1, rank(99)=2
        assert_eq!(img.get_pixel(2, 0).0, Jet.color_u8(0.0));
        assert_eq!(img.get_pixel(0, 0).0, Jet.color_u8(0.5));
        assert_eq!(img.get_pixel(1, 1).0, Jet.color_u8(0.5));
        assert_eq!(img.get_pixel(3, 2).0, Jet.color_u8(1.0));
        assert_eq!(img.get_pixel(1, 0).0, [255, 255, 255]);
    }

    #[test]
    fn single_label_uses_start_of_map() {
        let labels = [5, 5, 5, 5];
        let img = render_label_map(4, 3, &pixels(), &labels, &Jet).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, Jet.color_u8(0.0));
    }

    #[test]
    fn label_count_mismatch_is_rejected() {
        assert!(render_label_map(4, 3, &pixels(), &[1, 2], &Jet).is_err());
    }

    #[test]
    fn file_name_carries_parameters() {
        assert_eq!(
            label_map_file_name("cat", 0.9, 0.7),
            "label_map_cat_0.900000_0.700000.png"
        );
    }
}
