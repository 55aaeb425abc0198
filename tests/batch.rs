mod common;

use common::synthetic_svg::{path_template, stroke_group_template};
use sketch_vectorizer::batch::DatasetVariant;
use sketch_vectorizer::{BatchManager, BatchParams, SketchError};
use std::fs;
use std::path::Path;

fn write_templates(dir: &Path, names: &[&str], text: &str) {
    for name in names {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, text).unwrap();
    }
}

fn params(data_dir: &Path) -> BatchParams {
    BatchParams {
        batch_size: 6,
        image_width: 48,
        image_height: 48,
        num_workers: 3,
        seed: Some(9),
        data_dir: data_dir.to_path_buf(),
        file_list: None,
        ..BatchParams::default()
    }
}

#[test]
fn walks_data_dir_for_templates() {
    common::init_logger();
    let dir = tempfile::tempdir().unwrap();
    write_templates(
        dir.path(),
        &["a.svg_pre", "nested/b.svg_pre", "ignored.svg"],
        &path_template(3),
    );
    let mut manager = BatchManager::new(params(dir.path())).unwrap();
    assert_eq!(manager.num_examples_per_epoch(), 2);

    let batch = manager.next_batch().unwrap();
    assert_eq!(batch.input.len(), 6 * 48 * 48 * 2);
    for b in 0..batch.batch_size {
        let (row, col) = batch.queries[b];
        let query = batch.input_image(b, 1);
        assert_eq!(query.data.iter().filter(|&&v| v == 1.0).count(), 1);
        assert_eq!(query.get(col, row), 1.0);
        assert!(batch.target_image(b).get(col, row) > 0.0);
        let sketch = batch.sketch_image(b);
        assert!((sketch.max_value() - 1.0).abs() < 1e-6);
        // the isolated stroke never outshines the full sketch
        let target = batch.target_image(b);
        assert!(target.max_value() <= 1.0 + 1e-6);
    }
    // 6 draws over 2 templates wrap the cursor three times
    assert_eq!(manager.epoch(), 4);
}

#[test]
fn file_list_selects_templates() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path(), &["x.svg_pre", "y.svg_pre", "z.svg_pre"], &path_template(2));
    fs::write(dir.path().join("train.txt"), "x.svg_pre\n\nz.svg_pre\n").unwrap();
    let p = BatchParams {
        file_list: Some("train.txt".into()),
        ..params(dir.path())
    };
    let manager = BatchManager::new(p).unwrap();
    assert_eq!(manager.num_examples_per_epoch(), 2);
    assert_eq!(
        manager.template_path(1),
        Some(dir.path().join("z.svg_pre").as_path())
    );
}

#[test]
fn missing_file_list_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let p = BatchParams {
        file_list: Some("absent.txt".into()),
        ..params(dir.path())
    };
    assert!(matches!(BatchManager::new(p), Err(SketchError::Config(_))));
}

#[test]
fn stroke_group_templates_use_the_flipped_frame() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path(), &["g.svg_pre"], &stroke_group_template());
    let p = BatchParams {
        variant: DatasetVariant::StrokeGroups,
        transform: false,
        use_two_channels: false,
        ..params(dir.path())
    };
    let mut manager = BatchManager::new(p.clone()).unwrap();
    let batch = manager.next_batch().unwrap();
    assert_eq!(batch.input_channels, 1);
    for b in 0..batch.batch_size {
        let (row, col) = batch.queries[b];
        let input = batch.input_image(b, 0);
        assert_eq!(input.get(col, row), 1.0);
        let others = input
            .data
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != input.idx(col, row))
            .fold(0.0f32, |m, (_, &v)| m.max(v));
        assert!(others <= 1.0 / p.intensity_ratio + 1e-6);
        assert!(batch.target_image(b).get(col, row) > 0.0);
    }
}

#[test]
fn jittered_batches_are_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path(), &["a.svg_pre", "b.svg_pre"], &path_template(3));
    let mut first = BatchManager::new(params(dir.path())).unwrap();
    let mut second = BatchManager::new(BatchParams {
        num_workers: 1,
        ..params(dir.path())
    })
    .unwrap();
    for _ in 0..3 {
        let a = first.next_batch().unwrap().clone();
        let b = second.next_batch().unwrap();
        assert_eq!(a.template_ids, b.template_ids);
        assert_eq!(a.queries, b.queries);
        assert_eq!(a.input, b.input);
    }
}
