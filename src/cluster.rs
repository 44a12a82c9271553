//! Density-based clustering over a precomputed distance matrix

use nalgebra::DMatrix;

/// Label given to points that belong to no cluster
pub const NOISE: i64 = -1;

pub trait Clusterer: Send + Sync {
    /// Assign a cluster label to every row of the square `distances` matrix.
    /// Labels are `0..k` for clusters and [`NOISE`] otherwise.
    fn cluster(&self, distances: &DMatrix<f64>, eps: f64, min_samples: usize) -> Vec<i64>;
}

/// DBSCAN with an inclusive radius. A point counts itself as a neighbor, so
/// `min_samples = 2` means "at least one other point within `eps`".
#[derive(Debug, Default, Clone, Copy)]
pub struct Dbscan;

impl Clusterer for Dbscan {
    fn cluster(&self, distances: &DMatrix<f64>, eps: f64, min_samples: usize) -> Vec<i64> {
        let n = distances.nrows();
        let neighbors: Vec<Vec<usize>> = (0..n)
            .map(|i| (0..n).filter(|&j| distances[(i, j)] <= eps).collect())
            .collect();
        let core: Vec<bool> = neighbors.iter().map(|hood| hood.len() >= min_samples).collect();

        let mut labels = vec![NOISE; n];
        let mut next_label = 0;
        for seed in 0..n {
            if labels[seed] != NOISE || !core[seed] {
                continue;
            }

            let mut stack = vec![seed];
            while let Some(point) = stack.pop() {
                if labels[point] != NOISE {
                    continue;
                }
                labels[point] = next_label;
                if core[point] {
                    stack.extend(neighbors[point].iter().copied().filter(|&q| labels[q] == NOISE));
                }
            }
            next_label += 1;
        }
        labels
    }
}

/// Number of distinct clusters, noise excluded
pub fn cluster_count(labels: &[i64]) -> usize {
    let mut seen: Vec<i64> = labels.iter().copied().filter(|&l| l != NOISE).collect();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f64]]) -> DMatrix<f64> {
        let n = rows.len();
        DMatrix::from_fn(n, n, |i, j| rows[i][j])
    }

    #[test]
    fn test_two_clusters_and_noise() {
        let distances = matrix(&[
            &[0.0, 0.1, 1.0, 1.0, 1.0],
            &[0.1, 0.0, 1.0, 1.0, 1.0],
            &[1.0, 1.0, 0.0, 0.05, 1.0],
            &[1.0, 1.0, 0.05, 0.0, 1.0],
            &[1.0, 1.0, 1.0, 1.0, 0.0],
        ]);
        let labels = Dbscan.cluster(&distances, 0.1, 2);
        assert_eq!(labels, vec![0, 0, 1, 1, NOISE]);
        assert_eq!(cluster_count(&labels), 2);
    }

    #[test]
    fn test_border_points_join_through_core() {
        // 0-1-2 chain: 1 is core, 0 and 2 are border points
        let distances = matrix(&[
            &[0.0, 0.3, 0.6],
            &[0.3, 0.0, 0.3],
            &[0.6, 0.3, 0.0],
        ]);
        let labels = Dbscan.cluster(&distances, 0.3, 3);
        assert_eq!(labels, vec![0, 0, 0]);
    }

    #[test]
    fn test_single_point_is_noise() {
        let labels = Dbscan.cluster(&matrix(&[&[0.0]]), 0.1, 2);
        assert_eq!(labels, vec![NOISE]);
        assert_eq!(cluster_count(&labels), 0);
    }
}
