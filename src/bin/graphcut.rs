use sketch_vectorizer::config::graphcut::{load_config, GraphcutToolConfig};
use sketch_vectorizer::files::collect_files;
use sketch_vectorizer::graphcut::GraphcutRunner;
use sketch_vectorizer::image::io::write_json_file;
use sketch_vectorizer::{Result, SketchError};
use std::env;
use std::fs;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage() -> SketchError {
    SketchError::Config("Usage: graphcut <config.json>".to_string())
}

fn run() -> Result<()> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;
    prepare_test_dir(&config)?;

    let files = collect_files(&config.params.data_dir, ".svg")?;
    if files.is_empty() {
        return Err(SketchError::InvalidInput(format!(
            "no .svg files under {}",
            config.params.data_dir.display()
        )));
    }

    let runner = GraphcutRunner::new(
        config.params.clone(),
        config.affinity.build(),
        config.solver.build(),
    );
    let reports = runner.process_files(&files)?;
    for report in &reports {
        println!(
            "{}: {} labels -> {}",
            report.file_stem,
            report.num_labels,
            report.label_map.display()
        );
    }

    if let Some(path) = &config.output.report_json {
        write_json_file(path, &reports)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

fn prepare_test_dir(config: &GraphcutToolConfig) -> Result<()> {
    let dir = &config.params.test_dir;
    if config.output.reset_test_dir && dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;
    Ok(())
}
