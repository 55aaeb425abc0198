mod common;

use common::solver::ThresholdSolver;
use common::synthetic_svg::sketch_svg;
use sketch_vectorizer::affinity::{
    write_affinity_file, AffinityPredictor, ConnectivityAffinity, ExportedAffinity,
};
use sketch_vectorizer::gco::read_weight_file;
use sketch_vectorizer::graphcut::{run_sweep, SweepGrid};
use sketch_vectorizer::pixels::LinePixels;
use sketch_vectorizer::weights::pair_count;
use sketch_vectorizer::{GraphcutParams, GraphcutRunner, SketchError, WeightParams};
use std::fs;
use std::path::{Path, PathBuf};

fn two_bars() -> String {
    sketch_svg(&[&[(40.0, 100.0), (600.0, 100.0)], &[(40.0, 380.0), (600.0, 380.0)]])
}

fn setup(root: &Path, sketches: &[(&str, String)]) -> (GraphcutParams, Vec<PathBuf>) {
    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();
    let files = sketches
        .iter()
        .map(|(name, svg)| {
            let path = data_dir.join(format!("{name}.svg"));
            fs::write(&path, svg).unwrap();
            path
        })
        .collect();
    let params = GraphcutParams {
        data_dir,
        test_dir: root.join("out"),
        ..GraphcutParams::default()
    };
    (params, files)
}

#[test]
fn separate_strokes_get_separate_labels() {
    common::init_logger();
    let dir = tempfile::tempdir().unwrap();
    let (params, files) = setup(dir.path(), &[("bars", two_bars())]);
    let solver = ThresholdSolver::new(0.99);
    let runner = GraphcutRunner::new(params, ConnectivityAffinity, &solver);

    let report = runner.process_file(&files[0]).unwrap();
    assert_eq!(report.file_stem, "bars");
    assert_eq!(report.num_labels, 2);
    assert!(report.num_line_pixels > 0);
    assert_eq!(report.num_pairs, pair_count(report.num_line_pixels));
    assert_eq!(solver.calls.get(), 1);

    let (header, records) = read_weight_file(&report.weight_file).unwrap();
    assert!(report.weight_file.is_absolute());
    assert_eq!(header.output_path, report.weight_file);
    assert_eq!(
        report.weight_file.parent(),
        Some(dir.path().join("out").canonicalize().unwrap().as_path())
    );
    assert_eq!(header.num_pixels, report.num_line_pixels);
    assert_eq!(header.max_num_labels, 20);
    assert_eq!(records.len(), report.num_pairs);

    assert_eq!(
        report.label_map.file_name().and_then(|n| n.to_str()),
        Some("label_map_bars_0.900000_0.700000.png")
    );
    let map = image::open(&report.label_map).unwrap().to_rgb8();
    assert_eq!(map.dimensions(), (96, 72));
    assert_eq!(map.get_pixel(0, 0).0, [255, 255, 255]);
    let colored = map.pixels().filter(|p| p.0 != [255, 255, 255]).count();
    assert_eq!(colored, report.num_line_pixels);
    assert!(report.timing.get("weights").is_some());
}

#[test]
fn failing_file_keeps_its_error_kind() {
    common::init_logger();
    let dir = tempfile::tempdir().unwrap();
    let broken = "<svg width=\"1\" xmlns=\"x\">\n".to_string();
    let (params, files) = setup(dir.path(), &[("a_good", two_bars()), ("b_broken", broken)]);
    let runner = GraphcutRunner::new(params, ConnectivityAffinity, ThresholdSolver::new(0.99));

    let err = runner.process_files(&files).unwrap_err();
    assert!(matches!(err, SketchError::Svg(_)), "{err}");
    assert_eq!(runner.process_files(&files[..1]).unwrap().len(), 1);
}

#[test]
fn eraser_strokes_do_not_reach_the_raster() {
    let dir = tempfile::tempdir().unwrap();
    let (params, files) = setup(dir.path(), &[("bars", two_bars())]);
    let runner = GraphcutRunner::new(params, ConnectivityAffinity, ThresholdSolver::new(0.99));
    let image = runner.load_sketch(&files[0]).unwrap();
    assert_eq!((image.w, image.h), (96, 72));
    // the white stroke runs along the middle row
    assert!((0..96).all(|x| image.get(x, 36) == 0.0));
}

#[test]
fn curve_fitting_exports_one_path_per_stroke() {
    let dir = tempfile::tempdir().unwrap();
    let (mut params, files) = setup(dir.path(), &[("bars", two_bars())]);
    params.fit_curves = true;
    let runner = GraphcutRunner::new(params, ConnectivityAffinity, ThresholdSolver::new(0.99));

    let report = runner.process_file(&files[0]).unwrap();
    let curves = report.curves.unwrap();
    assert_eq!(curves.len(), 2);
    let svg = fs::read_to_string(report.vector_file.unwrap()).unwrap();
    assert_eq!(svg.matches("<path").count(), 2);
}

#[test]
fn exported_maps_must_match_the_raster() {
    let dir = tempfile::tempdir().unwrap();
    let (params, files) = setup(dir.path(), &[("bars", two_bars())]);
    let pred_dir = dir.path().join("pred");

    // maps computed for the right raster are accepted
    let reference =
        GraphcutRunner::new(params.clone(), ConnectivityAffinity, ThresholdSolver::new(0.99));
    let image = reference.load_sketch(&files[0]).unwrap();
    let pixels = LinePixels::from_image(&image, 0.0);
    let maps = ConnectivityAffinity.predict("bars", &image, &pixels).unwrap();
    let exported = ExportedAffinity::new(&pred_dir);
    write_affinity_file(&exported.path_for("bars"), &maps).unwrap();

    let runner = GraphcutRunner::new(params.clone(), exported.clone(), ThresholdSolver::new(0.99));
    assert_eq!(runner.process_file(&files[0]).unwrap().num_labels, 2);

    // a different raster size is a fatal shape mismatch
    let small = GraphcutParams {
        image_width: 48,
        image_height: 36,
        ..params
    };
    let runner = GraphcutRunner::new(small, exported, ThresholdSolver::new(0.99));
    let err = runner.process_file(&files[0]).unwrap_err();
    assert!(matches!(err, SketchError::ShapeMismatch { .. }), "{err}");
}

#[test]
fn sweep_reports_the_first_minimum_and_restores_weights() {
    common::init_logger();
    let dir = tempfile::tempdir().unwrap();
    let (params, files) = setup(dir.path(), &[("a", two_bars()), ("b", two_bars())]);
    let mut runner = GraphcutRunner::new(params, ConnectivityAffinity, ThresholdSolver::new(0.99));
    let grid = SweepGrid {
        neighbor_sigmas: vec![0.5, 0.9],
        prediction_sigmas: vec![0.3, 0.7],
    };

    let results = run_sweep(&mut runner, &files, &grid).unwrap();
    assert_eq!(results.len(), 2);
    for r in &results {
        assert_eq!(r.entries.len(), 4);
        let best = r.best.unwrap();
        assert_eq!(best.num_labels, 2);
        assert_eq!((best.neighbor_sigma, best.prediction_sigma), (0.5, 0.3));
    }
    assert_eq!(runner.params().weights, WeightParams::default());
}
