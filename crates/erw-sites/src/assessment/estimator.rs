//! Heuristic per-region parameter defaults for sites that lack measured values.
//!
//! Estimation starts from a fixed baseline and applies the overrides of the first
//! [`RegionRule`] whose keyword occurs in the region label (case-sensitive). Rule order
//! is part of the contract: reordering a table changes estimates.

use super::domain::{ParameterField as P, SchemaVersion, SiteParameters};
use tracing::debug;

/// One row of a region table: keywords matched by substring, and the fields they pin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionRule {
    pub label: &'static str,
    pub keywords: &'static [&'static str],
    pub overrides: &'static [(P, f64)],
}

impl RegionRule {
    pub fn matches(&self, region: &str) -> bool {
        self.keywords.iter().any(|keyword| region.contains(keyword))
    }
}

/// Region table of the extended (20-parameter) schema.
pub const EXTENDED_RULES: &[RegionRule] = &[
    RegionRule {
        label: "United States",
        keywords: &["USA"],
        overrides: &[
            (P::RainfallMm, 800.0),
            (P::AvgTemperatureC, 15.0),
            (P::LaborCostPerHour, 18.0),
            (P::EnergyCostPerKWh, 0.12),
            (P::PopulationDensityPerKm2, 35.0),
            (P::RegulatoryStabilityIndex, 0.85),
            (P::CarbonMarketAccessibility, 0.90),
            (P::MonitoringCapabilityIndex, 0.80),
            (P::SoilOrganicCarbonPercent, 3.5),
        ],
    },
    RegionRule {
        label: "Canada",
        keywords: &["Canada"],
        overrides: &[
            (P::RainfallMm, 700.0),
            (P::AvgTemperatureC, 8.0),
            (P::LaborCostPerHour, 20.0),
            (P::EnergyCostPerKWh, 0.10),
            (P::PopulationDensityPerKm2, 15.0),
            (P::RegulatoryStabilityIndex, 0.90),
            (P::CarbonMarketAccessibility, 0.85),
            (P::MonitoringCapabilityIndex, 0.85),
        ],
    },
    RegionRule {
        label: "India",
        keywords: &["India"],
        overrides: &[
            (P::RainfallMm, 1200.0),
            (P::AvgTemperatureC, 26.0),
            (P::LaborCostPerHour, 3.5),
            (P::EnergyCostPerKWh, 0.08),
            (P::PopulationDensityPerKm2, 450.0),
            (P::BasaltTransportDistanceKm, 85.0),
            (P::RegulatoryStabilityIndex, 0.65),
            (P::CarbonMarketAccessibility, 0.40),
            (P::SoilOrganicCarbonPercent, 0.8),
            (P::SoilMoisturePercent, 25.0),
        ],
    },
    RegionRule {
        label: "Brazil",
        keywords: &["Brazil"],
        overrides: &[
            (P::RainfallMm, 1800.0),
            (P::AvgTemperatureC, 26.0),
            (P::LaborCostPerHour, 6.0),
            (P::EnergyCostPerKWh, 0.12),
            (P::PopulationDensityPerKm2, 200.0),
            (P::RegulatoryStabilityIndex, 0.60),
            (P::CarbonMarketAccessibility, 0.50),
            (P::SoilOrganicCarbonPercent, 4.5),
        ],
    },
    RegionRule {
        label: "Australia",
        keywords: &["Australia"],
        overrides: &[
            (P::RainfallMm, 600.0),
            (P::AvgTemperatureC, 20.0),
            (P::LaborCostPerHour, 25.0),
            (P::EnergyCostPerKWh, 0.22),
            (P::PopulationDensityPerKm2, 8.0),
            (P::BasaltTransportDistanceKm, 200.0),
            (P::RegulatoryStabilityIndex, 0.88),
            (P::CarbonMarketAccessibility, 0.75),
            (P::MonitoringCapabilityIndex, 0.75),
        ],
    },
    RegionRule {
        label: "France / Spain",
        keywords: &["France", "Spain"],
        overrides: &[
            (P::RainfallMm, 900.0),
            (P::AvgTemperatureC, 18.0),
            (P::LaborCostPerHour, 15.0),
            (P::EnergyCostPerKWh, 0.18),
            (P::PopulationDensityPerKm2, 100.0),
            (P::RegulatoryStabilityIndex, 0.82),
            (P::CarbonMarketAccessibility, 0.88),
            (P::MonitoringCapabilityIndex, 0.70),
        ],
    },
    RegionRule {
        label: "Argentina",
        keywords: &["Argentina"],
        overrides: &[
            (P::RainfallMm, 1000.0),
            (P::AvgTemperatureC, 18.0),
            (P::LaborCostPerHour, 8.0),
            (P::EnergyCostPerKWh, 0.09),
            (P::PopulationDensityPerKm2, 40.0),
            (P::RegulatoryStabilityIndex, 0.55),
            (P::CarbonMarketAccessibility, 0.35),
            (P::SoilOrganicCarbonPercent, 5.0),
        ],
    },
];

/// Region table of the basic (12-parameter) schema, keyed on the older region names.
pub const BASIC_RULES: &[RegionRule] = &[
    RegionRule {
        label: "Madagascar",
        keywords: &["Madagascar"],
        overrides: &[
            (P::RainfallMm, 1400.0),
            (P::AvgTemperatureC, 22.0),
            (P::LaborCostPerHour, 3.5),
            (P::EnergyCostPerKWh, 0.25),
            (P::PopulationDensityPerKm2, 80.0),
        ],
    },
    RegionRule {
        label: "India",
        keywords: &["Karnataka", "India"],
        overrides: &[
            (P::RainfallMm, 970.0),
            (P::AvgTemperatureC, 24.5),
            (P::LaborCostPerHour, 4.5),
            (P::EnergyCostPerKWh, 0.08),
            (P::PopulationDensityPerKm2, 120.0),
            (P::BasaltTransportDistanceKm, 85.0),
        ],
    },
    RegionRule {
        label: "Brazil",
        keywords: &["Brazil"],
        overrides: &[
            (P::RainfallMm, 1800.0),
            (P::AvgTemperatureC, 26.0),
            (P::LaborCostPerHour, 6.0),
            (P::EnergyCostPerKWh, 0.12),
            (P::PopulationDensityPerKm2, 200.0),
        ],
    },
    RegionRule {
        label: "Australia",
        keywords: &["Australia"],
        overrides: &[
            (P::RainfallMm, 800.0),
            (P::AvgTemperatureC, 20.0),
            (P::LaborCostPerHour, 25.0),
            (P::EnergyCostPerKWh, 0.22),
            (P::PopulationDensityPerKm2, 50.0),
            (P::BasaltTransportDistanceKm, 200.0),
        ],
    },
];

/// Documented default for every field before any region override.
pub fn baseline_value(schema: SchemaVersion, field: P) -> f64 {
    match field {
        P::Latitude | P::Longitude => 0.0,
        P::RainfallMm => 1000.0,
        P::SoilPh => 7.0,
        P::AvgTemperatureC => 25.0,
        P::DistanceToRoadKm => 5.0,
        P::BasaltTransportDistanceKm => 100.0,
        P::BasaltAvailabilityIndex => 0.7,
        P::InfrastructureQualityIndex => 0.6,
        P::AgriculturalLandHectares => match schema {
            SchemaVersion::Basic => 500.0,
            SchemaVersion::Extended => 50_000.0,
        },
        P::PopulationDensityPerKm2 => 150.0,
        P::EnergyCostPerKWh => 0.10,
        P::LaborCostPerHour => 8.0,
        P::SoilOrganicCarbonPercent => 3.0,
        P::ElevationMeters => 200.0,
        P::SoilMoisturePercent => 35.0,
        P::AnnualRainfallVariability => 150.0,
        P::RegulatoryStabilityIndex => 0.7,
        P::CarbonMarketAccessibility => 0.6,
        P::SoilCecMeqPer100g => 12.0,
        P::MonitoringCapabilityIndex => 0.5,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RegionalEstimator {
    schema: SchemaVersion,
    rules: &'static [RegionRule],
}

impl RegionalEstimator {
    pub fn new(schema: SchemaVersion) -> Self {
        let rules = match schema {
            SchemaVersion::Basic => BASIC_RULES,
            SchemaVersion::Extended => EXTENDED_RULES,
        };
        Self::with_rules(schema, rules)
    }

    pub fn with_rules(schema: SchemaVersion, rules: &'static [RegionRule]) -> Self {
        Self { schema, rules }
    }

    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }

    pub fn baseline(&self, latitude: f64, longitude: f64) -> SiteParameters {
        SiteParameters::from_fn(self.schema, |field| match field {
            P::Latitude => latitude,
            P::Longitude => longitude,
            other => baseline_value(self.schema, other),
        })
    }

    pub fn matching_rule(&self, region: &str) -> Option<&'static RegionRule> {
        self.rules.iter().find(|rule| rule.matches(region))
    }

    pub fn estimate(&self, latitude: f64, longitude: f64, region: &str) -> SiteParameters {
        let mut params = self.baseline(latitude, longitude);

        match self.matching_rule(region) {
            Some(rule) => {
                debug!(region, rule = rule.label, "applying regional parameter overrides");
                for (field, value) in rule.overrides {
                    // Location always comes from the caller.
                    if matches!(field, P::Latitude | P::Longitude) {
                        continue;
                    }
                    params.set(*field, *value);
                }
            }
            None => debug!(region, "no regional rule matched; using baseline parameters"),
        }

        params
    }
}

impl Default for RegionalEstimator {
    fn default() -> Self {
        Self::new(SchemaVersion::default())
    }
}
