//! Line pixel set: the foreground pixels of a rasterized sketch.
//!
//! Stored as two parallel coordinate arrays (row, col) so that the indices
//! used in weight records and label files line up with the order in which
//! the affinity predictor produced its maps.
use crate::error::{Result, SketchError};
use crate::image::ImageF32;
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LinePixels {
    rows: Vec<usize>,
    cols: Vec<usize>,
}

impl LinePixels {
    /// Every pixel strictly brighter than `threshold`, row-major.
    pub fn from_image(image: &ImageF32, threshold: f32) -> Self {
        let (rows, cols) = image
            .nonzero(threshold)
            .into_iter()
            .map(|(x, y)| (y, x))
            .unzip();
        Self { rows, cols }
    }

    pub fn from_coords(rows: Vec<usize>, cols: Vec<usize>) -> Result<Self> {
        if rows.len() != cols.len() {
            return Err(SketchError::shape(
                "line pixel coordinates",
                &[rows.len()],
                &[cols.len()],
            ));
        }
        Ok(Self { rows, cols })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(row, col)` of pixel `i`.
    #[inline]
    pub fn get(&self, i: usize) -> (usize, usize) {
        (self.rows[i], self.cols[i])
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().copied().zip(self.cols.iter().copied())
    }

    /// Largest row / column index, used to check the pixels fit an image.
    pub fn extent(&self) -> Option<(usize, usize)> {
        let max_row = self.rows.iter().copied().max()?;
        let max_col = self.cols.iter().copied().max()?;
        Some((max_row, max_col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_pixels_in_row_major_order() {
        let mut img = ImageF32::new(4, 3);
        img.set(3, 0, 1.0);
        img.set(1, 2, 1.0);
        img.set(0, 1, 0.5);
        let pixels = LinePixels::from_image(&img, 0.0);
        let coords: Vec<_> = pixels.iter().collect();
        assert_eq!(coords, vec![(0, 3), (1, 0), (2, 1)]);
        assert_eq!(pixels.extent(), Some((2, 3)));
    }

    #[test]
    fn mismatched_coordinate_arrays_are_rejected() {
        let err = LinePixels::from_coords(vec![0, 1], vec![0]).unwrap_err();
        assert!(matches!(err, SketchError::ShapeMismatch { .. }));
    }
}
