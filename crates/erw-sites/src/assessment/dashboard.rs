use super::domain::Site;
use super::views::ScoreTier;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DashboardStats {
    pub total_sites: usize,
    pub average_score: f64,
    pub total_regions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierCount {
    pub tier: ScoreTier,
    pub label: &'static str,
    pub count: usize,
}

/// Score-tier histogram, always listing every tier (High, Medium, Low).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreDistribution {
    pub tiers: Vec<TierCount>,
}

impl ScoreDistribution {
    pub fn count(&self, tier: ScoreTier) -> usize {
        self.tiers
            .iter()
            .find(|entry| entry.tier == tier)
            .map_or(0, |entry| entry.count)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub stats: DashboardStats,
    pub distribution: ScoreDistribution,
}

/// Pure summaries over a site set. Always recomputed from the full set.
pub struct DashboardAggregator;

impl DashboardAggregator {
    pub fn aggregate(sites: &[Site]) -> DashboardStats {
        if sites.is_empty() {
            return DashboardStats::default();
        }

        let total: f64 = sites.iter().map(|site| site.score).sum();
        let regions: HashSet<&str> = sites.iter().map(|site| site.region.as_str()).collect();

        DashboardStats {
            total_sites: sites.len(),
            average_score: total / sites.len() as f64,
            total_regions: regions.len(),
        }
    }

    pub fn distribution(sites: &[Site]) -> ScoreDistribution {
        let tiers = ScoreTier::ordered()
            .into_iter()
            .map(|tier| TierCount {
                tier,
                label: tier.label(),
                count: sites
                    .iter()
                    .filter(|site| ScoreTier::classify(site.score) == tier)
                    .count(),
            })
            .collect();
        ScoreDistribution { tiers }
    }

    pub fn summarize(sites: &[Site]) -> DashboardSummary {
        DashboardSummary {
            stats: Self::aggregate(sites),
            distribution: Self::distribution(sites),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::tests::common::{sample_sites, site};

    #[test]
    fn empty_site_set_aggregates_to_zero() {
        let stats = DashboardAggregator::aggregate(&[]);
        assert_eq!(stats.total_sites, 0);
        assert_eq!(stats.average_score, 0.0);
        assert_eq!(stats.total_regions, 0);

        let distribution = DashboardAggregator::distribution(&[]);
        assert_eq!(distribution.tiers.len(), 3);
        assert!(distribution.tiers.iter().all(|entry| entry.count == 0));
    }

    #[test]
    fn mean_and_region_count_match_inputs() {
        let sites = sample_sites();
        let stats = DashboardAggregator::aggregate(&sites);

        let expected = (0.81 + 0.64 + 0.38 + 0.72) / 4.0;
        assert_eq!(stats.total_sites, 4);
        assert!((stats.average_score - expected).abs() < 1e-9);
        assert!((0.0..=1.0).contains(&stats.average_score));
        assert_eq!(stats.total_regions, 4);
    }

    #[test]
    fn duplicate_regions_are_counted_once() {
        let sites = vec![
            site("Ames North", 42.03, -93.62, "Iowa, USA", 1.0),
            site("Story County", 42.04, -93.46, "Iowa, USA", 0.0),
        ];
        let stats = DashboardAggregator::aggregate(&sites);
        assert_eq!(stats.total_regions, 1);
        assert_eq!(stats.average_score, 0.5);
    }

    #[test]
    fn distribution_buckets_by_tier() {
        let summary = DashboardAggregator::summarize(&sample_sites());
        assert_eq!(summary.distribution.count(ScoreTier::High), 2);
        assert_eq!(summary.distribution.count(ScoreTier::Medium), 1);
        assert_eq!(summary.distribution.count(ScoreTier::Low), 1);
        assert_eq!(summary.stats.total_sites, 4);
    }
}
