use sketch_vectorizer::config::graphcut::load_config;
use sketch_vectorizer::files::collect_files;
use sketch_vectorizer::graphcut::{run_sweep, GraphcutRunner};
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
    SketchError::Config("Usage: graphcut_sweep <config.json>".to_string())
}

fn run() -> Result<()> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;
    let sweep = config.sweep.as_ref().ok_or_else(|| {
        SketchError::Config(format!("{config_path}: missing \"sweep\" section"))
    })?;

    let test_dir = &config.params.test_dir;
    if config.output.reset_test_dir && test_dir.exists() {
        fs::remove_dir_all(test_dir)?;
    }
    fs::create_dir_all(test_dir)?;

    let files = collect_files(&config.params.data_dir, ".svg")?;
    let mut runner = GraphcutRunner::new(
        config.params.clone(),
        config.affinity.build(),
        config.solver.build(),
    );
    let results = run_sweep(&mut runner, &files, &sweep.grid)?;

    for r in &results {
        match r.best {
            Some(best) => println!(
                "{}: min {} labels at n_sig={:.4} p_sig={:.4}",
                r.file.display(),
                best.num_labels,
                best.neighbor_sigma,
                best.prediction_sigma
            ),
            None => println!("{}: empty grid", r.file.display()),
        }
    }
    write_json_file(&sweep.sweep_json, &results)?;
    println!("Sweep written to {}", sweep.sweep_json.display());
    Ok(())
}
