use sketch_vectorizer::gco::{
    label_path_for, read_weight_file, write_label_file, LabelSolver, Labeling, SolveOutcome,
};
use sketch_vectorizer::Result;
use std::cell::Cell;
use std::path::Path;

/// In-process stand-in for the graph-cut binary: merges every pair whose
/// affinity weight reaches `threshold` and labels the resulting groups
/// `0..k` in order of first appearance.
pub struct ThresholdSolver {
    pub threshold: f64,
    pub calls: Cell<usize>,
}

impl ThresholdSolver {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            calls: Cell::new(0),
        }
    }
}

impl LabelSolver for ThresholdSolver {
    fn solve(&self, weight_file: &Path) -> Result<SolveOutcome> {
        self.calls.set(self.calls.get() + 1);
        let (header, records) = read_weight_file(weight_file)?;
        let n = header.num_pixels;
        let mut parent: Vec<usize> = (0..n).collect();
        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }
        for r in records.iter().filter(|r| r.affinity >= self.threshold) {
            let (a, b) = (find(&mut parent, r.i), find(&mut parent, r.j));
            if a != b {
                parent[b] = a;
            }
        }

        let mut ids = std::collections::HashMap::new();
        let labels: Vec<i32> = (0..n)
            .map(|i| {
                let root = find(&mut parent, i);
                let next = ids.len() as i32;
                *ids.entry(root).or_insert(next)
            })
            .collect();
        let label_file = label_path_for(weight_file);
        write_label_file(
            &label_file,
            &Labeling {
                energy_before: 100.0,
                energy_after: ids.len() as f64,
                labels,
            },
        )?;
        Ok(SolveOutcome {
            label_file,
            elapsed_ms: 0.0,
        })
    }
}
