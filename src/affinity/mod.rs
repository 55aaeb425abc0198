//! Per-pixel affinity maps and the predictors that produce them.
//!
//! The learned model lives outside this crate; [`AffinityPredictor`] is the
//! seam through which its output enters the pipeline. Two implementations
//! ship here:
//! - [`ExportedAffinity`]: maps written by the model to `.aff` files.
//! - [`ConnectivityAffinity`]: a model-free baseline based on 8-connectivity.
mod connectivity;
mod exported;

pub use connectivity::ConnectivityAffinity;
pub use exported::{read_affinity_file, write_affinity_file, ExportedAffinity, AFFINITY_MAGIC};

use crate::error::{Result, SketchError};
use crate::image::ImageF32;
use crate::pixels::LinePixels;

/// One "same-stroke" probability map per line pixel, all of the source
/// image's size, in line-pixel order.
#[derive(Clone, Debug)]
pub struct AffinityMaps {
    pub width: usize,
    pub height: usize,
    pub maps: Vec<ImageF32>,
}

impl AffinityMaps {
    pub fn new(width: usize, height: usize, maps: Vec<ImageF32>) -> Result<Self> {
        let out = Self {
            width,
            height,
            maps,
        };
        out.check_map_shapes()?;
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Affinity of source pixel `i` evaluated at `(row, col)`.
    #[inline]
    pub fn at(&self, i: usize, row: usize, col: usize) -> f32 {
        self.maps[i].get(col, row)
    }

    /// Fail fast unless there are `n` maps of `width × height` each.
    pub fn validate(&self, width: usize, height: usize, n: usize) -> Result<()> {
        if self.maps.len() != n {
            return Err(SketchError::shape(
                "affinity map count",
                &[n],
                &[self.maps.len()],
            ));
        }
        if self.width != width || self.height != height {
            return Err(SketchError::shape(
                "affinity map size",
                &[height, width],
                &[self.height, self.width],
            ));
        }
        self.check_map_shapes()
    }

    fn check_map_shapes(&self) -> Result<()> {
        for map in &self.maps {
            if map.w != self.width || map.h != self.height || map.data.len() != map.w * map.h {
                return Err(SketchError::shape(
                    "affinity map",
                    &[self.height, self.width],
                    &[map.h, map.w],
                ));
            }
        }
        Ok(())
    }
}

/// Source of affinity maps for the line pixels of one image.
pub trait AffinityPredictor {
    /// `stem` identifies the input (file base name) for predictors backed
    /// by exported data.
    fn predict(&self, stem: &str, image: &ImageF32, pixels: &LinePixels) -> Result<AffinityMaps>;
}

impl<P: AffinityPredictor + ?Sized> AffinityPredictor for &P {
    fn predict(&self, stem: &str, image: &ImageF32, pixels: &LinePixels) -> Result<AffinityMaps> {
        (**self).predict(stem, image, pixels)
    }
}

impl<P: AffinityPredictor + ?Sized> AffinityPredictor for Box<P> {
    fn predict(&self, stem: &str, image: &ImageF32, pixels: &LinePixels) -> Result<AffinityMaps> {
        (**self).predict(stem, image, pixels)
    }
}
