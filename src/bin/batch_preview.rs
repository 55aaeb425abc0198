use serde::Serialize;
use sketch_vectorizer::batch::BatchManager;
use sketch_vectorizer::config::batch::load_config;
use sketch_vectorizer::image::io::{save_grayscale_f32, write_json_file};
use sketch_vectorizer::{Result, SketchError};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExampleSummary {
    batch: usize,
    index: usize,
    epoch: usize,
    template: Option<PathBuf>,
    query: [usize; 2],
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage() -> SketchError {
    SketchError::Config("Usage: batch_preview <config.json>".to_string())
}

fn run() -> Result<()> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;
    let out = &config.output_dir;

    let mut manager = BatchManager::new(config.params.clone())?;
    let mut summary = Vec::new();
    for n in 0..config.num_batches {
        let batch = manager.next_batch()?.clone();
        for b in 0..batch.batch_size {
            let prefix = format!("batch{n:03}_{b:02}");
            save_grayscale_f32(&batch.sketch_image(b), &out.join(format!("{prefix}_sketch.png")))?;
            save_grayscale_f32(&batch.target_image(b), &out.join(format!("{prefix}_target.png")))?;
            for c in 0..batch.input_channels {
                save_grayscale_f32(
                    &batch.input_image(b, c),
                    &out.join(format!("{prefix}_input{c}.png")),
                )?;
            }
            let (row, col) = batch.queries[b];
            summary.push(ExampleSummary {
                batch: n,
                index: b,
                epoch: manager.epoch(),
                template: manager
                    .template_path(batch.template_ids[b])
                    .map(Path::to_path_buf),
                query: [row, col],
            });
        }
    }

    let summary_path = out.join("summary.json");
    write_json_file(&summary_path, &summary)?;
    println!(
        "{} examples written to {}",
        summary.len(),
        out.display()
    );
    Ok(())
}
