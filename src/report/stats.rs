use serde::Serialize;

use super::parser::LatencySamples;

/// Singleton groups averaging below this many seconds are dropped as noise.
pub const SINGLETON_NOISE_THRESHOLD: f64 = 1.0;

/// Latency summary for one normalized path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathStat {
    pub path: String,
    pub count: usize,
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

impl PathStat {
    /// Summarize a non-empty list of samples. Returns None for an empty list.
    pub fn from_samples(path: &str, samples: &[f64]) -> Option<Self> {
        let (&first, rest) = samples.split_first()?;

        let mut min = first;
        let mut max = first;
        let mut sum = first;
        for &value in rest {
            sum += value;
            if value < min {
                min = value;
            }
            if value > max {
                max = value;
            }
        }

        let count = samples.len();
        // Rounding in the mean must not push it outside [min, max]
        let avg = (sum / count as f64).max(min).min(max);

        Some(Self {
            path: path.to_string(),
            count,
            min,
            avg,
            max,
        })
    }

    fn is_singleton_noise(&self) -> bool {
        self.count == 1 && self.avg < SINGLETON_NOISE_THRESHOLD
    }
}

/// Compute per-path statistics, ordered by average latency descending.
///
/// Groups holding a single sample below [`SINGLETON_NOISE_THRESHOLD`] are
/// excluded. Ties keep the map's path order.
pub fn aggregate(samples: &LatencySamples) -> Vec<PathStat> {
    let mut stats: Vec<PathStat> = samples
        .iter()
        .filter_map(|(path, values)| PathStat::from_samples(path, values))
        .filter(|stat| !stat.is_singleton_noise())
        .collect();

    stats.sort_by(|a, b| b.avg.total_cmp(&a.avg));
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(groups: &[(&str, &[f64])]) -> LatencySamples {
        groups
            .iter()
            .map(|(path, values)| (path.to_string(), values.to_vec()))
            .collect()
    }

    #[test]
    fn test_from_samples() {
        let stat = PathStat::from_samples("/a", &[1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stat.count, 3);
        assert_eq!(stat.min, 1.0);
        assert_eq!(stat.max, 3.0);
        assert_eq!(stat.avg, 2.0);
    }

    #[test]
    fn test_from_samples_empty() {
        assert!(PathStat::from_samples("/a", &[]).is_none());
    }

    #[test]
    fn test_invariants_hold() {
        let cases: &[&[f64]] = &[
            &[0.1],
            &[0.1, 0.1, 0.1],
            &[0.3, 0.7, 0.000_1, 12.25],
            &[5.0, 5.0],
            &[1e-9, 1e9],
        ];
        for values in cases {
            let stat = PathStat::from_samples("/p", values).unwrap();
            assert_eq!(stat.count, values.len());
            assert!(stat.count >= 1);
            assert!(stat.min <= stat.avg, "{:?}", stat);
            assert!(stat.avg <= stat.max, "{:?}", stat);
        }
    }

    #[test]
    fn test_singleton_below_threshold_dropped() {
        let stats = aggregate(&samples(&[("/fast", &[0.5]), ("/slow", &[1.5])]));
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].path, "/slow");
    }

    #[test]
    fn test_low_latency_groups_with_many_samples_kept() {
        let stats = aggregate(&samples(&[("/fast", &[0.1, 0.2])]));
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].count, 2);
    }

    #[test]
    fn test_sorted_by_avg_descending() {
        let stats = aggregate(&samples(&[("/a", &[1.0, 3.0, 2.0]), ("/b", &[10.0])]));
        let paths: Vec<&str> = stats.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(paths, vec!["/b", "/a"]);
        assert_eq!(stats[0].avg, 10.0);
        assert_eq!(stats[1].avg, 2.0);
    }

    #[test]
    fn test_ties_keep_path_order() {
        let stats = aggregate(&samples(&[
            ("/z", &[2.0, 2.0]),
            ("/m", &[4.0]),
            ("/a", &[1.0, 3.0]),
        ]));
        let paths: Vec<&str> = stats.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(paths, vec!["/m", "/a", "/z"]);
    }

    #[test]
    fn test_empty_groups_skipped() {
        let stats = aggregate(&samples(&[("/empty", &[]), ("/b", &[2.0])]));
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].path, "/b");
    }
}
