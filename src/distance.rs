//! Pairwise and nearest-neighbour distances

use crate::geometry::Point;

/// Symmetric matrix of Euclidean distances with zero diagonal.
///
/// Stored flat in row-major order.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    pub fn from_points(points: &[Point]) -> Self {
        let n = points.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = points[i].distance(&points[j]);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        DistanceMatrix { n, data }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
}

/// For every point in `from`, the distance to its nearest neighbour in `to`.
pub fn nearest_distances(from: &[Point], to: &[Point]) -> Vec<f64> {
    from.iter()
        .map(|p| {
            to.iter()
                .map(|q| p.distance(q))
                .fold(f64::INFINITY, f64::min)
        })
        .collect()
}

#[test]
fn matrix_is_symmetric_with_zero_diagonal() {
    let pts = vec![
        Point::new(0.0, 0.0),
        Point::new(3.0, 4.0),
        Point::new(6.0, 8.0),
    ];
    let dm = DistanceMatrix::from_points(&pts);

    assert_eq!(dm.len(), 3);
    for i in 0..3 {
        assert_eq!(dm.get(i, i), 0.0);
        for j in 0..3 {
            assert_eq!(dm.get(i, j), dm.get(j, i));
        }
    }
    assert_eq!(dm.get(0, 1), 5.0);
    assert_eq!(dm.row(0), &[0.0, 5.0, 10.0]);
}

#[test]
fn nearest_distance_to_point_set() {
    let samples = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
    let queries = vec![Point::new(1.0, 0.0), Point::new(7.0, 0.0), Point::new(10.0, 0.0)];

    assert_eq!(nearest_distances(&queries, &samples), vec![1.0, 3.0, 0.0]);
}
