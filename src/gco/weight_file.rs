use crate::error::{Result, SketchError};
use crate::image::io::ensure_parent_dir;
use crate::weights::{pair_count, PairWeight};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// The six header lines preceding the pair records.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightFileHeader {
    /// Path the solver derives its `.label` output from (the weight file itself).
    pub output_path: PathBuf,
    /// Input data directory, recorded for the solver's logs.
    pub data_dir: PathBuf,
    pub max_num_labels: usize,
    pub neighbor_sigma: f32,
    pub prediction_sigma: f32,
    pub num_pixels: usize,
}

pub fn write_weight_file(path: &Path, header: &WeightFileHeader, records: &[PairWeight]) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "{}", header.output_path.display())?;
    writeln!(w, "{}", header.data_dir.display())?;
    writeln!(w, "{}", header.max_num_labels)?;
    writeln!(w, "{:.6}", header.neighbor_sigma)?;
    writeln!(w, "{:.6}", header.prediction_sigma)?;
    writeln!(w, "{}", header.num_pixels)?;
    for r in records {
        writeln!(w, "{} {} {:.6} {:.6}", r.i, r.j, r.affinity, r.spatial)?;
    }
    w.flush()?;
    Ok(())
}

pub fn read_weight_file(path: &Path) -> Result<(WeightFileHeader, Vec<PairWeight>)> {
    let text = fs::read_to_string(path)?;
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < 6 {
        return Err(parse_error(
            path,
            lines.len(),
            "weight file header needs six lines".to_string(),
        ));
    }

    let header = WeightFileHeader {
        output_path: PathBuf::from(lines[0]),
        data_dir: PathBuf::from(lines[1]),
        max_num_labels: parse_field(path, 3, lines[2])?,
        neighbor_sigma: parse_field(path, 4, lines[3])?,
        prediction_sigma: parse_field(path, 5, lines[4])?,
        num_pixels: parse_field(path, 6, lines[5])?,
    };
    let num_pixels = header.num_pixels;

    let mut records = Vec::with_capacity(pair_count(num_pixels));
    for (k, line) in lines.iter().enumerate().skip(6) {
        let ln = k + 1;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 4 {
            return Err(parse_error(path, ln, format!("expected 4 fields, got {}", fields.len())));
        }
        records.push(PairWeight {
            i: parse_field(path, ln, fields[0])?,
            j: parse_field(path, ln, fields[1])?,
            affinity: parse_field(path, ln, fields[2])?,
            spatial: parse_field(path, ln, fields[3])?,
        });
    }
    if records.len() != pair_count(num_pixels) {
        return Err(SketchError::shape(
            "weight records",
            &[pair_count(num_pixels)],
            &[records.len()],
        ));
    }
    Ok((header, records))
}

fn parse_field<T>(path: &Path, line: usize, field: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    field
        .trim()
        .parse()
        .map_err(|e| parse_error(path, line, format!("{field:?}: {e}")))
}

fn parse_error(path: &Path, line: usize, message: String) -> SketchError {
    SketchError::Parse {
        path: path.to_path_buf(),
        line,
        message,
    }
}
