//! Spatial fold assignment by nearest neighbour distance matching.
//!
//! Folds are chosen so that the distance from each held-out sample to the nearest sample of its
//! training set is distributed like the distance from locations in the prediction domain to the
//! nearest sample. A validation on such folds estimates the error of predicting into the domain,
//! rather than the error of interpolating between interleaved samples.
//!
//! Candidate fold assignments come from cutting a hierarchical clustering of the sample locations
//! at every cluster count between `k` and the number of distinct locations. Few clusters keep
//! whole regions out together; many clusters approach ordinary interleaved folds. Clusters are
//! packed into `k` folds of equal size (within one sample) and the candidate whose distance
//! distribution diverges least from the domain's is kept.

use std::collections::BTreeMap;
use crate::clustering::{agglomerate, Dendrogram};
use crate::config::AssignerConfig;
use crate::distance::{nearest_distances, DistanceMatrix};
use crate::divergence::{Divergence, Ecdf};
use crate::error::{ConvergenceWarning, InputError, Result};
use crate::geometry::{BoundingBox, Domain, Point, SamplePoint};

use super::{Fold, FoldAssignment, Procedure};

/// A candidate must beat the best by more than this to replace it.
const IMPROVEMENT_EPSILON: f64 = 1e-12;

/// Result of a fold assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialFolds {
    pub assignment: FoldAssignment,

    /// divergence between held-out and prediction distance distributions
    pub divergence: f64,

    pub statistic: Divergence,

    /// number of clusters the chosen assignment was built from
    pub clusters: usize,

    pub candidates_evaluated: usize,

    /// indices of samples lying outside the prediction domain
    pub outside_domain: Vec<usize>,

    pub warning: Option<ConvergenceWarning>,
}

impl Procedure for SpatialFolds {
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Fold> + 'a> {
        self.assignment.iter()
    }
}

/// Assigns samples to spatially segregated cross-validation folds.
///
/// The assignment is a pure function of its inputs: no randomness is involved and every tie is
/// broken by index, so identical inputs always produce identical folds.
#[derive(Debug, Clone, Default)]
pub struct SpatialFoldAssigner {
    config: AssignerConfig,
}

/// assign with the default configuration
pub fn assign(samples: &[SamplePoint], domain: &Domain, k: usize) -> Result<SpatialFolds> {
    SpatialFoldAssigner::default().assign(samples, domain, k)
}

impl SpatialFoldAssigner {
    pub fn new(config: AssignerConfig) -> Result<Self> {
        config.validate()?;
        Ok(SpatialFoldAssigner { config })
    }

    pub fn config(&self) -> &AssignerConfig {
        &self.config
    }

    /// Partition `samples` into `k` folds.
    ///
    /// Samples outside `domain` are not rejected. They take part in all distance computations like
    /// any other sample and their indices are reported in `SpatialFolds::outside_domain`.
    pub fn assign(&self, samples: &[SamplePoint], domain: &Domain, k: usize) -> Result<SpatialFolds> {
        if k < 2 {
            return Err(InputError::TooFewFolds { k }.into());
        }
        if let Some(index) = samples.iter().position(|s| !s.location.is_finite()) {
            return Err(InputError::NonFiniteCoordinate { index }.into());
        }

        let sites = Sites::group(samples);
        if sites.len() < 2 {
            return Err(InputError::TooFewLocations { found: sites.len() }.into());
        }
        if k > sites.len() {
            return Err(InputError::TooManyFolds {
                k,
                locations: sites.len(),
            }
            .into());
        }

        let reference = domain.sample(self.config.prediction_points)?;

        let outside_domain: Vec<usize> = samples
            .iter()
            .enumerate()
            .filter(|(_, s)| !domain.contains(&s.location))
            .map(|(i, _)| i)
            .collect();
        if !outside_domain.is_empty() {
            warn!(
                "{} of {} samples lie outside the prediction domain",
                outside_domain.len(),
                samples.len()
            );
        }

        let target = Ecdf::new(nearest_distances(&reference, &sites.locations));
        let scale = BoundingBox::around(reference.iter().chain(sites.locations.iter()))
            .map_or(0.0, |bbox| bbox.diagonal());

        let dist = DistanceMatrix::from_points(&sites.locations);
        let tree = agglomerate(&dist, self.config.linkage);

        let search = Search {
            sites: &sites,
            dist: &dist,
            k,
            target: &target,
            scale,
            statistic: self.config.statistic,
        };

        let counts = candidate_counts(k, sites.len(), self.config.max_candidates);
        let mut best = search.evaluate(&tree, counts[0]);
        let mut evaluated = 1;
        let mut stale = 0;

        for &q in &counts[1..] {
            let candidate = search.evaluate(&tree, q);
            evaluated += 1;

            if candidate.divergence < best.divergence - IMPROVEMENT_EPSILON {
                best = candidate;
                stale = 0;
            } else {
                stale += 1;
                if stale >= self.config.patience {
                    debug!("no improvement for {} candidates, stopping at q = {}", stale, q);
                    break;
                }
            }
        }

        info!(
            "assigned {} samples at {} locations to {} folds from {} clusters ({:?} divergence {:.4}, {} candidates)",
            samples.len(),
            sites.len(),
            k,
            best.clusters,
            self.config.statistic,
            best.divergence,
            evaluated
        );

        let warning = if best.divergence > self.config.tolerance {
            let w = ConvergenceWarning {
                divergence: best.divergence,
                tolerance: self.config.tolerance,
                candidates_evaluated: evaluated,
            };
            warn!("{}", w);
            Some(w)
        } else {
            None
        };

        Ok(SpatialFolds {
            assignment: FoldAssignment::from_labels(&best.labels, k),
            divergence: best.divergence,
            statistic: self.config.statistic,
            clusters: best.clusters,
            candidates_evaluated: evaluated,
            outside_domain,
            warning,
        })
    }
}

/// Distinct sample locations. Co-located samples share a site.
struct Sites {
    locations: Vec<Point>,
    site_of: Vec<usize>,
}

impl Sites {
    fn group(samples: &[SamplePoint]) -> Self {
        let mut index = BTreeMap::new();
        let mut locations = Vec::new();
        let mut site_of = Vec::with_capacity(samples.len());

        for s in samples {
            // adding zero folds -0.0 into 0.0
            let key = ((s.location.x + 0.0).to_bits(), (s.location.y + 0.0).to_bits());
            let site = *index.entry(key).or_insert_with(|| {
                locations.push(s.location);
                locations.len() - 1
            });
            site_of.push(site);
        }

        Sites { locations, site_of }
    }

    fn len(&self) -> usize {
        self.locations.len()
    }
}

/// Cluster counts to try, ascending, at most `max` of them and always including both ends.
fn candidate_counts(k: usize, sites: usize, max: usize) -> Vec<usize> {
    let span = sites - k;
    if span < max {
        return (k..=sites).collect();
    }
    if max < 2 {
        return vec![k];
    }
    let steps = max - 1;
    let mut counts: Vec<usize> = (0..max)
        .map(|i| k + (i * span + steps / 2) / steps)
        .collect();
    counts.dedup();
    counts
}

struct Candidate {
    clusters: usize,
    labels: Vec<usize>,
    divergence: f64,
}

struct Search<'a> {
    sites: &'a Sites,
    dist: &'a DistanceMatrix,
    k: usize,
    target: &'a Ecdf,
    scale: f64,
    statistic: Divergence,
}

impl<'a> Search<'a> {
    fn n_samples(&self) -> usize {
        self.sites.site_of.len()
    }

    #[inline(always)]
    fn distance(&self, i: usize, j: usize) -> f64 {
        self.dist.get(self.sites.site_of[i], self.sites.site_of[j])
    }

    fn evaluate(&self, tree: &Dendrogram, q: usize) -> Candidate {
        let labels = self.partition(tree, q);
        let divergence = self.score(&labels);
        debug!("q = {}: divergence {:.6}", q, divergence);
        Candidate {
            clusters: q,
            labels,
            divergence,
        }
    }

    /// Fold label of every sample when the locations are cut into `q` clusters.
    ///
    /// Clusters are packed largest first, each into the currently smallest fold.
    fn partition(&self, tree: &Dendrogram, q: usize) -> Vec<usize> {
        let site_cluster = tree.cut(q);
        let n_clusters = site_cluster.iter().max().map_or(0, |&c| c + 1);

        let mut clusters: Vec<Vec<usize>> = vec![Vec::new(); n_clusters];
        for (i, &site) in self.sites.site_of.iter().enumerate() {
            clusters[site_cluster[site]].push(i);
        }

        let mut order: Vec<usize> = (0..n_clusters).collect();
        order.sort_by(|&a, &b| {
            clusters[b]
                .len()
                .cmp(&clusters[a].len())
                .then(clusters[a][0].cmp(&clusters[b][0]))
        });

        let mut labels = vec![0; self.n_samples()];
        let mut sizes = vec![0; self.k];
        for c in order {
            let f = smallest(&sizes);
            for &i in &clusters[c] {
                labels[i] = f;
            }
            sizes[f] += clusters[c].len();
        }

        self.rebalance(&mut labels, &mut sizes);
        labels
    }

    /// Move samples from the largest to the smallest fold until sizes differ by at most one.
    ///
    /// The sample moved is the one closest to the receiving fold.
    fn rebalance(&self, labels: &mut [usize], sizes: &mut [usize]) {
        let n = labels.len();

        // nearest[f * n + i]: distance from sample i to the closest member of fold f
        let mut nearest = vec![f64::INFINITY; self.k * n];
        let mut stale = vec![true; self.k];

        loop {
            let src = largest(sizes);
            let dst = smallest(sizes);
            if sizes[src] <= sizes[dst] + 1 {
                return;
            }

            let row = &mut nearest[dst * n..(dst + 1) * n];
            if stale[dst] {
                let members: Vec<usize> = (0..n).filter(|&j| labels[j] == dst).collect();
                for (i, slot) in row.iter_mut().enumerate() {
                    *slot = members
                        .iter()
                        .map(|&j| self.distance(i, j))
                        .fold(f64::INFINITY, f64::min);
                }
                stale[dst] = false;
            }

            let mut pick: Option<(f64, usize)> = None;
            for i in (0..n).filter(|&i| labels[i] == src) {
                if pick.map_or(true, |(best, _)| row[i] < best) {
                    pick = Some((row[i], i));
                }
            }

            match pick {
                Some((_, m)) => {
                    labels[m] = dst;
                    sizes[src] -= 1;
                    sizes[dst] += 1;
                    for (i, slot) in row.iter_mut().enumerate() {
                        *slot = slot.min(self.distance(i, m));
                    }
                    // a member left, so its distances may have grown
                    stale[src] = true;
                }
                None => return,
            }
        }
    }

    /// divergence between held-out-to-training distances and the target distribution
    fn score(&self, labels: &[usize]) -> f64 {
        let n = labels.len();
        let realized: Vec<f64> = (0..n)
            .map(|i| {
                (0..n)
                    .filter(|&j| labels[j] != labels[i])
                    .map(|j| self.distance(i, j))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();

        self.statistic
            .between(&Ecdf::new(realized), self.target, self.scale)
    }
}

/// index of the smallest fold, lowest index on ties
fn smallest(sizes: &[usize]) -> usize {
    let mut best = 0;
    for (f, &s) in sizes.iter().enumerate() {
        if s < sizes[best] {
            best = f;
        }
    }
    best
}

/// index of the largest fold, lowest index on ties
fn largest(sizes: &[usize]) -> usize {
    let mut best = 0;
    for (f, &s) in sizes.iter().enumerate() {
        if s > sizes[best] {
            best = f;
        }
    }
    best
}
