//! Validation procedures

mod frozen_sets;
mod spatial_folds;

use std::fmt::Write;

pub use self::frozen_sets::FrozenSets;
pub use self::spatial_folds::{assign, SpatialFoldAssigner, SpatialFolds};

/// Validation procedures support iteration over cross-validation folds
pub trait Procedure {
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Fold> + 'a>;
}

/// A single cross-validation fold, consisting of a training set and a testing set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fold {
    pub trainset: Vec<usize>,
    pub testset: Vec<usize>,
}

impl Fold {
    pub fn new() -> Self {
        Fold {
            trainset: Vec::new(),
            testset: Vec::new(),
        }
    }
}

impl Default for Fold {
    fn default() -> Self {
        Fold::new()
    }
}

/// `k` folds whose test sets partition the samples `0..n`.
///
/// Each fold trains on every sample outside its test set. Both index lists are ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldAssignment {
    folds: Vec<Fold>,
}

impl FoldAssignment {
    /// Build from the test fold of every sample. `labels[i]` must be below `k`.
    pub(crate) fn from_labels(labels: &[usize], k: usize) -> Self {
        let mut folds = vec![Fold::new(); k];
        for (i, &label) in labels.iter().enumerate() {
            for (f, fold) in folds.iter_mut().enumerate() {
                if f == label {
                    fold.testset.push(i);
                } else {
                    fold.trainset.push(i);
                }
            }
        }
        FoldAssignment { folds }
    }

    pub fn folds(&self) -> &[Fold] {
        &self.folds
    }

    pub fn k(&self) -> usize {
        self.folds.len()
    }

    /// number of samples
    pub fn len(&self) -> usize {
        self.folds.iter().map(|f| f.testset.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn fold_sizes(&self) -> Vec<usize> {
        self.folds.iter().map(|f| f.testset.len()).collect()
    }

    /// index of the fold holding sample `i` out
    pub fn test_fold_of(&self, i: usize) -> Option<usize> {
        self.folds
            .iter()
            .position(|f| f.testset.binary_search(&i).is_ok())
    }

    /// Write the assignment in the OpenML data split layout (a single repeat).
    pub fn to_arff(&self, relation: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "@RELATION {}", relation);
        out.push('\n');
        out.push_str("@ATTRIBUTE type {TRAIN,TEST}\n");
        out.push_str("@ATTRIBUTE rowid NUMERIC\n");
        out.push_str("@ATTRIBUTE repeat NUMERIC\n");
        out.push_str("@ATTRIBUTE fold NUMERIC\n");
        out.push('\n');
        out.push_str("@DATA\n");
        for (f, fold) in self.folds.iter().enumerate() {
            for i in &fold.trainset {
                let _ = writeln!(out, "TRAIN,{},0,{}", i, f);
            }
            for i in &fold.testset {
                let _ = writeln!(out, "TEST,{},0,{}", i, f);
            }
        }
        out
    }
}

impl Procedure for FoldAssignment {
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Fold> + 'a> {
        Box::new(self.folds.iter())
    }
}
