//! Agglomerative hierarchical clustering of sample locations.
//!
//! The merge order is fully determined by the distance matrix: among equally close cluster pairs
//! the pair with the lowest indices merges first.

use crate::distance::DistanceMatrix;

/// Distance between clusters, derived from the distances between their members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Linkage {
    /// closest pair of members
    Single,

    /// farthest pair of members
    Complete,

    /// mean over all member pairs (UPGMA)
    Average,
}

impl Default for Linkage {
    fn default() -> Self {
        Linkage::Average
    }
}

/// One agglomeration step: cluster `absorbed` is merged into cluster `into`.
///
/// Clusters are named by their smallest leaf index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    pub into: usize,
    pub absorbed: usize,
    pub height: f64,
}

/// The full merge history over `n_leaves` leaves
#[derive(Debug, Clone)]
pub struct Dendrogram {
    n_leaves: usize,
    merges: Vec<Merge>,
}

impl Dendrogram {
    pub fn n_leaves(&self) -> usize {
        self.n_leaves
    }

    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// Cluster label of every leaf when the tree is cut into `q` clusters.
    ///
    /// Labels are numbered in order of first appearance. `q` is clamped to `1..=n_leaves`.
    pub fn cut(&self, q: usize) -> Vec<usize> {
        let q = q.max(1).min(self.n_leaves);
        let mut parent: Vec<usize> = (0..self.n_leaves).collect();

        for m in &self.merges[..self.n_leaves - q] {
            let a = find(&mut parent, m.into);
            let b = find(&mut parent, m.absorbed);
            parent[b] = a;
        }

        let mut relabel = vec![usize::max_value(); self.n_leaves];
        let mut next = 0;
        let mut labels = Vec::with_capacity(self.n_leaves);
        for leaf in 0..self.n_leaves {
            let root = find(&mut parent, leaf);
            if relabel[root] == usize::max_value() {
                relabel[root] = next;
                next += 1;
            }
            labels.push(relabel[root]);
        }
        labels
    }
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

/// Build the dendrogram with Lance-Williams distance updates.
pub fn agglomerate(dist: &DistanceMatrix, linkage: Linkage) -> Dendrogram {
    let n = dist.len();
    let mut d: Vec<f64> = (0..n).flat_map(|i| dist.row(i).to_vec()).collect();
    let mut size = vec![1usize; n];
    let mut active = vec![true; n];
    let mut merges = Vec::with_capacity(n.saturating_sub(1));

    for _ in 1..n {
        let mut best = (f64::INFINITY, 0, 0);
        for i in (0..n).filter(|&i| active[i]) {
            for j in ((i + 1)..n).filter(|&j| active[j]) {
                if d[i * n + j] < best.0 {
                    best = (d[i * n + j], i, j);
                }
            }
        }
        let (height, a, b) = best;

        for m in (0..n).filter(|&m| active[m] && m != a && m != b) {
            let dam = d[a * n + m];
            let dbm = d[b * n + m];
            let updated = match linkage {
                Linkage::Single => dam.min(dbm),
                Linkage::Complete => dam.max(dbm),
                Linkage::Average => {
                    (size[a] as f64 * dam + size[b] as f64 * dbm) / (size[a] + size[b]) as f64
                }
            };
            d[a * n + m] = updated;
            d[m * n + a] = updated;
        }

        size[a] += size[b];
        active[b] = false;
        merges.push(Merge {
            into: a,
            absorbed: b,
            height,
        });
    }

    trace!("agglomerated {} leaves", n);

    Dendrogram {
        n_leaves: n,
        merges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn two_groups() -> DistanceMatrix {
        DistanceMatrix::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(10.0, 2.0),
            Point::new(0.0, 3.0),
        ])
    }

    #[test]
    fn merges_closest_first() {
        let tree = agglomerate(&two_groups(), Linkage::Single);
        assert_eq!(tree.merges().len(), 4);
        assert_eq!(tree.merges()[0].into, 0);
        assert_eq!(tree.merges()[0].absorbed, 2);
        assert_eq!(tree.merges()[0].height, 1.0);
    }

    #[test]
    fn cut_recovers_groups() {
        for &linkage in &[Linkage::Single, Linkage::Complete, Linkage::Average] {
            let tree = agglomerate(&two_groups(), linkage);
            assert_eq!(tree.cut(2), vec![0, 1, 0, 1, 0]);
            assert_eq!(tree.cut(1), vec![0; 5]);
            assert_eq!(tree.cut(5), vec![0, 1, 2, 3, 4]);
        }
    }

    #[test]
    fn heights_do_not_decrease() {
        for &linkage in &[Linkage::Single, Linkage::Complete, Linkage::Average] {
            let tree = agglomerate(&two_groups(), linkage);
            for w in tree.merges().windows(2) {
                assert!(w[0].height <= w[1].height);
            }
        }
    }

    #[test]
    fn single_leaf() {
        let tree = agglomerate(&DistanceMatrix::from_points(&[Point::new(1.0, 1.0)]), Linkage::Average);
        assert!(tree.merges().is_empty());
        assert_eq!(tree.cut(3), vec![0]);
    }
}
