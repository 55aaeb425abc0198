//! `.aff` files: affinity maps exported by the external model.
//!
//! Layout (little-endian): magic `AFF1`, then `n`, `height`, `width` as
//! u32, then `n * height * width` f32 values, map after map, each map
//! row-major.
use super::{AffinityMaps, AffinityPredictor};
use crate::error::{Result, SketchError};
use crate::image::io::ensure_parent_dir;
use crate::image::ImageF32;
use crate::pixels::LinePixels;
use log::debug;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

pub const AFFINITY_MAGIC: &[u8; 4] = b"AFF1";

/// Reads `<dir>/<stem>.aff` for every processed input.
#[derive(Clone, Debug)]
pub struct ExportedAffinity {
    pub dir: PathBuf,
}

impl ExportedAffinity {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{stem}.aff"))
    }
}

impl AffinityPredictor for ExportedAffinity {
    fn predict(&self, stem: &str, image: &ImageF32, pixels: &LinePixels) -> Result<AffinityMaps> {
        let path = self.path_for(stem);
        let maps = read_affinity_file(&path)?;
        maps.validate(image.w, image.h, pixels.len())?;
        debug!(
            "ExportedAffinity: {} maps of {}x{} from {}",
            maps.len(),
            maps.width,
            maps.height,
            path.display()
        );
        Ok(maps)
    }
}

/// Header is `AFF1` plus three little-endian `u32`s.
const HEADER_LEN: u64 = 16;

pub fn read_affinity_file(path: &Path) -> Result<AffinityMaps> {
    let file = File::open(path)?;
    let file_len = file.metadata()?.len();
    let mut reader = BufReader::new(file);
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != AFFINITY_MAGIC {
        return Err(header_error(path, format!("bad magic {magic:?}")));
    }
    let n = read_u32(&mut reader)? as usize;
    let height = read_u32(&mut reader)? as usize;
    let width = read_u32(&mut reader)? as usize;

    // header sizes are untrusted; check them against the payload before allocating
    let plane = width.checked_mul(height);
    let plane_bytes = plane.and_then(|p| p.checked_mul(4));
    let total = plane_bytes.and_then(|b| b.checked_mul(n));
    let (Some(plane), Some(plane_bytes), Some(total)) = (plane, plane_bytes, total) else {
        return Err(header_error(
            path,
            format!("header claims {n} maps of {height}x{width}, which overflows"),
        ));
    };
    let payload = file_len.saturating_sub(HEADER_LEN);
    if total as u64 != payload {
        return Err(header_error(
            path,
            format!(
                "header claims {n} maps of {height}x{width} ({total} bytes), file holds {payload}"
            ),
        ));
    }

    let mut bytes = vec![0u8; plane_bytes];
    let mut maps = Vec::with_capacity(n);
    for _ in 0..n {
        reader.read_exact(&mut bytes)?;
        let data = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        let map = ImageF32::from_vec(width, height, data)
            .ok_or_else(|| SketchError::shape("affinity plane", &[plane], &[bytes.len() / 4]))?;
        maps.push(map);
    }
    AffinityMaps::new(width, height, maps)
}

fn header_error(path: &Path, message: String) -> SketchError {
    SketchError::Parse {
        path: path.to_path_buf(),
        line: 0,
        message,
    }
}

pub fn write_affinity_file(path: &Path, maps: &AffinityMaps) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(AFFINITY_MAGIC)?;
    for v in [maps.len(), maps.height, maps.width] {
        let v = u32::try_from(v)
            .map_err(|_| SketchError::InvalidInput(format!("{v} does not fit in u32")))?;
        writer.write_all(&v.to_le_bytes())?;
    }
    for map in &maps.maps {
        for &v in &map.data {
            writer.write_all(&v.to_le_bytes())?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn read_u32(reader: &mut impl Read) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}
