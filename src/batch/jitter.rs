//! Random affine jitter applied to templates.
use super::params::DatasetVariant;
use rand::Rng;
use serde::Serialize;

/// Rotation in degrees, per-axis scale and integer translation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Jitter {
    pub r: i32,
    pub sx: f32,
    pub sy: f32,
    pub tx: i32,
    pub ty: i32,
}

/// Offset that brings the y-up stroke-group frame back into view.
const FLIPPED_FRAME_SHIFT: i32 = 900;

impl Jitter {
    /// The variant's base frame with no randomization.
    pub fn identity(variant: DatasetVariant) -> Self {
        match variant {
            DatasetVariant::StrokeGroups => Self {
                r: 0,
                sx: 1.0,
                sy: -1.0,
                tx: 0,
                ty: -FLIPPED_FRAME_SHIFT,
            },
            DatasetVariant::PathIds => Self {
                r: 0,
                sx: 1.0,
                sy: 1.0,
                tx: 0,
                ty: 0,
            },
        }
    }
}

/// Rotation in [-45, 45), scales in [0.25, 2), translation in [-10, 10)
/// (path ids) or [-100, 100) with the flipped frame (stroke groups).
pub fn sample_jitter(variant: DatasetVariant, transform: bool, rng: &mut impl Rng) -> Jitter {
    if !transform {
        return Jitter::identity(variant);
    }
    let r = rng.gen_range(-45..45);
    let sx = 1.75 * rng.gen::<f32>() + 0.25;
    let sy = 1.75 * rng.gen::<f32>() + 0.25;
    match variant {
        DatasetVariant::StrokeGroups => Jitter {
            r,
            sx,
            sy: -sy,
            tx: rng.gen_range(-100..100),
            ty: rng.gen_range(-100..100) - FLIPPED_FRAME_SHIFT,
        },
        DatasetVariant::PathIds => Jitter {
            r,
            sx,
            sy,
            tx: rng.gen_range(-10..10),
            ty: rng.gen_range(-10..10),
        },
    }
}
