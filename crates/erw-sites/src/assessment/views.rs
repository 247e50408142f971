use super::domain::AssessmentResult;
use serde::Serialize;

/// Keys of the weighted top-level components of a breakdown.
pub const PRIMARY_COMPONENTS: [&str; 3] = ["environmental", "logistics", "economic"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    pub const fn ordered() -> [Self; 3] {
        [Self::High, Self::Medium, Self::Low]
    }

    pub fn classify(score: f64) -> Self {
        if score >= 0.7 {
            Self::High
        } else if score >= 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High (0.7-1.0)",
            Self::Medium => "Medium (0.4-0.69)",
            Self::Low => "Low (0.0-0.39)",
        }
    }
}

/// Letter band of a sustainability grade such as `"A+"` or `"C-"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeBand {
    A,
    B,
    C,
    D,
    F,
    NotAvailable,
}

impl GradeBand {
    pub fn from_grade(grade: Option<&str>) -> Self {
        match grade.map(str::trim).and_then(|grade| grade.chars().next()) {
            None => Self::NotAvailable,
            Some('A') => Self::A,
            Some('B') => Self::B,
            Some('C') => Self::C,
            Some('D') => Self::D,
            Some(_) => Self::F,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub key: String,
    pub label: String,
    pub value: f64,
}

/// Human label for a breakdown key.
pub fn breakdown_label(key: &str) -> String {
    let known = match key {
        "soilPh" => Some("Soil pH"),
        "temperature" => Some("Temperature"),
        "rainfall" => Some("Rainfall"),
        "roadAccess" => Some("Road Access"),
        "transport" => Some("Transport Distance"),
        "infrastructure" => Some("Infrastructure"),
        "basaltAvailability" => Some("Basalt Availability"),
        _ => None,
    };

    match known {
        Some(label) => label.to_string(),
        None => {
            let mut chars = key.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

impl AssessmentResult {
    /// Primary components in display order; absent components are skipped, not zeroed.
    pub fn primary_components(&self) -> Vec<BreakdownEntry> {
        PRIMARY_COMPONENTS
            .iter()
            .filter_map(|key| {
                self.component(key).map(|value| BreakdownEntry {
                    key: key.to_string(),
                    label: breakdown_label(key),
                    value,
                })
            })
            .collect()
    }

    /// Every non-primary breakdown factor, in key order.
    pub fn detailed_factors(&self) -> Vec<BreakdownEntry> {
        self.breakdown
            .iter()
            .filter(|(key, _)| !PRIMARY_COMPONENTS.contains(&key.as_str()))
            .map(|(key, value)| BreakdownEntry {
                key: key.clone(),
                label: breakdown_label(key),
                value: *value,
            })
            .collect()
    }

    pub fn tier(&self) -> ScoreTier {
        ScoreTier::classify(self.score)
    }

    pub fn grade_band(&self) -> GradeBand {
        GradeBand::from_grade(self.sustainability_grade.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn tiers_follow_score_thresholds() {
        assert_eq!(ScoreTier::classify(0.7), ScoreTier::High);
        assert_eq!(ScoreTier::classify(0.69), ScoreTier::Medium);
        assert_eq!(ScoreTier::classify(0.4), ScoreTier::Medium);
        assert_eq!(ScoreTier::classify(0.39), ScoreTier::Low);
    }

    #[test]
    fn grade_bands_use_leading_letter() {
        assert_eq!(GradeBand::from_grade(Some("A+")), GradeBand::A);
        assert_eq!(GradeBand::from_grade(Some("C-")), GradeBand::C);
        assert_eq!(GradeBand::from_grade(Some("F")), GradeBand::F);
        assert_eq!(GradeBand::from_grade(Some("")), GradeBand::NotAvailable);
        assert_eq!(GradeBand::from_grade(None), GradeBand::NotAvailable);
    }

    #[test]
    fn labels_fall_back_to_capitalised_keys() {
        assert_eq!(breakdown_label("roadAccess"), "Road Access");
        assert_eq!(breakdown_label("carbonMarket"), "CarbonMarket");
        assert_eq!(breakdown_label(""), "");
    }

    #[test]
    fn breakdown_splits_primary_and_detailed() {
        let breakdown: BTreeMap<String, f64> = [
            ("economic", 0.6),
            ("environmental", 0.8),
            ("soilPh", 0.9),
            ("transport", 0.5),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
        let result = AssessmentResult {
            score: 0.72,
            breakdown,
            sustainability_grade: Some("B+".to_string()),
            project_capacity_hectares: None,
            carbon_removal_kg_per_year: None,
            co2_emissions_kg_per_year: None,
            net_carbon_impact_kg_per_year: None,
            carbon_efficiency_ratio: None,
            basalt_material_cost_usd_per_year: None,
            transport_cost_usd_per_year: None,
            labor_cost_usd_per_year: None,
            equipment_cost_usd_per_year: None,
            total_cost_usd_per_year: None,
            cost_per_ton_co2_removed: None,
        };

        let primary: Vec<_> = result.primary_components().into_iter().map(|e| e.key).collect();
        assert_eq!(primary, vec!["environmental", "economic"]);

        let detailed: Vec<_> = result.detailed_factors().into_iter().map(|e| e.label).collect();
        assert_eq!(detailed, vec!["Soil pH", "Transport Distance"]);
        assert_eq!(result.tier(), ScoreTier::High);
        assert_eq!(result.grade_band(), GradeBand::B);
    }
}
