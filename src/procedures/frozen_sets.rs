use crate::error::Result;

use super::{Fold, FoldAssignment, Procedure};

/// Pre-computed folds, possibly over several repeats
#[derive(Debug, Clone, PartialEq)]
pub struct FrozenSets {
    pub(crate) folds: Vec<Vec<Fold>>,
}

#[derive(Debug, Deserialize)]
struct CrossValItem {
    #[serde(rename = "type")]
    purpose: TrainTest,

    rowid: usize,

    repeat: usize,

    fold: usize,
}

#[derive(Debug, Deserialize)]
enum TrainTest {
    #[serde(rename = "TRAIN")]
    Train,

    #[serde(rename = "TEST")]
    Test,
}

impl FrozenSets {
    /// Load folds from an ARFF file in the OpenML data split layout.
    pub fn from_arff(raw: &str) -> Result<Self> {
        let data: Vec<CrossValItem> = arff::from_str(raw)?;

        let mut folds = vec![];
        for item in data {
            if item.repeat >= folds.len() {
                folds.resize(item.repeat + 1, vec![]);
            }
            let rep = &mut folds[item.repeat];

            if item.fold >= rep.len() {
                rep.resize(item.fold + 1, Fold::new());
            }
            let fold = &mut rep[item.fold];

            match item.purpose {
                TrainTest::Train => fold.trainset.push(item.rowid),
                TrainTest::Test => fold.testset.push(item.rowid),
            }
        }

        debug!("loaded {} repeat(s) of frozen folds", folds.len());

        Ok(FrozenSets { folds })
    }

    pub fn repeats(&self) -> usize {
        self.folds.len()
    }

    pub fn repeat(&self, r: usize) -> Option<&[Fold]> {
        self.folds.get(r).map(|v| v.as_slice())
    }
}

impl From<FoldAssignment> for FrozenSets {
    fn from(fa: FoldAssignment) -> Self {
        FrozenSets {
            folds: vec![fa.folds],
        }
    }
}

impl Procedure for FrozenSets {
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Fold> + 'a> {
        let iter = self.folds.iter().flat_map(|inner| inner.iter());
        Box::new(iter)
    }
}

#[test]
fn reads_split_file() {
    let raw = "@RELATION splits\n\
               \n\
               @ATTRIBUTE type {TRAIN,TEST}\n\
               @ATTRIBUTE rowid NUMERIC\n\
               @ATTRIBUTE repeat NUMERIC\n\
               @ATTRIBUTE fold NUMERIC\n\
               \n\
               @DATA\n\
               TRAIN,1,0,0\n\
               TEST,0,0,0\n\
               TRAIN,0,0,1\n\
               TEST,1,0,1\n\
               TEST,1,1,0\n";

    let sets = FrozenSets::from_arff(raw).unwrap();
    assert_eq!(sets.repeats(), 2);
    assert_eq!(sets.repeat(0).unwrap()[1].testset, vec![1]);
    assert_eq!(sets.repeat(0).unwrap()[1].trainset, vec![0]);
    assert_eq!(sets.iter().count(), 3);
}

#[test]
fn exported_assignment_loads_as_frozen_sets() {
    let fa = FoldAssignment::from_labels(&[2, 0, 1, 1, 0, 2], 3);
    let sets = FrozenSets::from_arff(&fa.to_arff("spatial_folds")).unwrap();
    assert_eq!(sets, FrozenSets::from(fa));
}
