use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A previously assessed location as listed by the site service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub region: String,
    pub score: f64,
}

/// Envelope returned by `GET /api/sites`. Only `items` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteListing {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
    pub items: Vec<Site>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Score,
    Name,
    Id,
}

impl SortField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Name => "name",
            Self::Id => "id",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "score" => Ok(Self::Score),
            "name" => Ok(Self::Name),
            "id" => Ok(Self::Id),
            other => Err(format!("unsupported sort field '{other}' (expected score, name or id)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unsupported sort direction '{other}' (expected asc or desc)")),
        }
    }
}

/// Listing request for a single page of sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub sort_field: SortField,
    #[serde(default)]
    pub sort_direction: SortDirection,
    #[serde(default = "FilterQuery::default_page_size")]
    pub page_size: u32,
}

impl FilterQuery {
    pub const MIN_PAGE_SIZE: u32 = 1;
    pub const MAX_PAGE_SIZE: u32 = 100;

    const fn default_page_size() -> u32 {
        Self::MAX_PAGE_SIZE
    }

    pub fn for_region(region: impl Into<String>) -> Self {
        Self {
            region: Some(region.into()),
            ..Self::default()
        }
    }

    /// Region filter with blank input treated as "all regions". Non-blank input is
    /// passed through untouched.
    pub fn region(&self) -> Option<&str> {
        self.region
            .as_deref()
            .filter(|region| !region.trim().is_empty())
    }

    pub fn effective_page_size(&self) -> u32 {
        self.page_size
            .clamp(Self::MIN_PAGE_SIZE, Self::MAX_PAGE_SIZE)
    }

    /// Query string pairs for `GET /api/sites`.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(region) = self.region() {
            pairs.push(("region", region.to_string()));
        }
        pairs.push(("sort", self.sort_field.as_str().to_string()));
        pairs.push(("dir", self.sort_direction.as_str().to_string()));
        pairs.push(("size", self.effective_page_size().to_string()));
        pairs
    }
}

impl Default for FilterQuery {
    fn default() -> Self {
        Self {
            region: None,
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
            page_size: Self::default_page_size(),
        }
    }
}

/// Versioned request shape accepted by `POST /api/sitescore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVersion {
    /// Location plus the eleven core environmental, logistics and economic fields.
    Basic,
    /// Basic plus the eight advanced soil, regulatory and monitoring fields.
    #[default]
    Extended,
}

impl SchemaVersion {
    pub fn fields(self) -> &'static [ParameterField] {
        match self {
            Self::Basic => &ParameterField::ALL[..ParameterField::BASIC_COUNT],
            Self::Extended => &ParameterField::ALL,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Extended => "extended",
        }
    }
}

impl FromStr for SchemaVersion {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "basic" | "v1" => Ok(Self::Basic),
            "extended" | "v2" => Ok(Self::Extended),
            other => Err(format!("unknown parameter schema '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterGroup {
    Location,
    Environmental,
    Logistics,
    Economic,
}

impl ParameterGroup {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Location,
            Self::Environmental,
            Self::Logistics,
            Self::Economic,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Location => "Location",
            Self::Environmental => "Environmental",
            Self::Logistics => "Logistics",
            Self::Economic => "Economic & Social",
        }
    }
}

/// Every named numeric field of a site parameter set, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParameterField {
    Latitude,
    Longitude,
    RainfallMm,
    SoilPh,
    AvgTemperatureC,
    DistanceToRoadKm,
    BasaltTransportDistanceKm,
    BasaltAvailabilityIndex,
    InfrastructureQualityIndex,
    AgriculturalLandHectares,
    PopulationDensityPerKm2,
    EnergyCostPerKWh,
    LaborCostPerHour,
    SoilOrganicCarbonPercent,
    ElevationMeters,
    SoilMoisturePercent,
    AnnualRainfallVariability,
    RegulatoryStabilityIndex,
    CarbonMarketAccessibility,
    SoilCecMeqPer100g,
    MonitoringCapabilityIndex,
}

impl ParameterField {
    pub const BASIC_COUNT: usize = 13;

    pub const ALL: [Self; 21] = [
        Self::Latitude,
        Self::Longitude,
        Self::RainfallMm,
        Self::SoilPh,
        Self::AvgTemperatureC,
        Self::DistanceToRoadKm,
        Self::BasaltTransportDistanceKm,
        Self::BasaltAvailabilityIndex,
        Self::InfrastructureQualityIndex,
        Self::AgriculturalLandHectares,
        Self::PopulationDensityPerKm2,
        Self::EnergyCostPerKWh,
        Self::LaborCostPerHour,
        Self::SoilOrganicCarbonPercent,
        Self::ElevationMeters,
        Self::SoilMoisturePercent,
        Self::AnnualRainfallVariability,
        Self::RegulatoryStabilityIndex,
        Self::CarbonMarketAccessibility,
        Self::SoilCecMeqPer100g,
        Self::MonitoringCapabilityIndex,
    ];

    /// Wire name used in request bodies and form input.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::RainfallMm => "rainfallMm",
            Self::SoilPh => "soilPh",
            Self::AvgTemperatureC => "avgTemperatureC",
            Self::DistanceToRoadKm => "distanceToRoadKm",
            Self::BasaltTransportDistanceKm => "basaltTransportDistanceKm",
            Self::BasaltAvailabilityIndex => "basaltAvailabilityIndex",
            Self::InfrastructureQualityIndex => "infrastructureQualityIndex",
            Self::AgriculturalLandHectares => "agriculturalLandHectares",
            Self::PopulationDensityPerKm2 => "populationDensityPerKm2",
            Self::EnergyCostPerKWh => "energyCostPerKWh",
            Self::LaborCostPerHour => "laborCostPerHour",
            Self::SoilOrganicCarbonPercent => "soilOrganicCarbonPercent",
            Self::ElevationMeters => "elevationMeters",
            Self::SoilMoisturePercent => "soilMoisturePercent",
            Self::AnnualRainfallVariability => "annualRainfallVariability",
            Self::RegulatoryStabilityIndex => "regulatoryStabilityIndex",
            Self::CarbonMarketAccessibility => "carbonMarketAccessibility",
            Self::SoilCecMeqPer100g => "soilCecMeqPer100g",
            Self::MonitoringCapabilityIndex => "monitoringCapabilityIndex",
        }
    }

    pub const fn group(self) -> ParameterGroup {
        match self {
            Self::Latitude | Self::Longitude => ParameterGroup::Location,
            Self::RainfallMm
            | Self::SoilPh
            | Self::AvgTemperatureC
            | Self::SoilOrganicCarbonPercent
            | Self::SoilMoisturePercent
            | Self::AnnualRainfallVariability
            | Self::SoilCecMeqPer100g
            | Self::ElevationMeters => ParameterGroup::Environmental,
            Self::DistanceToRoadKm
            | Self::BasaltTransportDistanceKm
            | Self::BasaltAvailabilityIndex
            | Self::InfrastructureQualityIndex => ParameterGroup::Logistics,
            Self::AgriculturalLandHectares
            | Self::PopulationDensityPerKm2
            | Self::EnergyCostPerKWh
            | Self::LaborCostPerHour
            | Self::RegulatoryStabilityIndex
            | Self::CarbonMarketAccessibility
            | Self::MonitoringCapabilityIndex => ParameterGroup::Economic,
        }
    }

    pub const fn is_index(self) -> bool {
        matches!(
            self,
            Self::BasaltAvailabilityIndex
                | Self::InfrastructureQualityIndex
                | Self::RegulatoryStabilityIndex
                | Self::CarbonMarketAccessibility
                | Self::MonitoringCapabilityIndex
        )
    }

    /// Range check applied to user-supplied and estimated values alike.
    pub fn check(self, value: f64) -> Result<(), String> {
        if !value.is_finite() {
            return Err("must be a finite number".to_string());
        }

        let bounds = match self {
            Self::Latitude => Some((-90.0, 90.0)),
            Self::Longitude => Some((-180.0, 180.0)),
            field if field.is_index() => Some((0.0, 1.0)),
            _ => None,
        };

        match bounds {
            Some((min, max)) if !(min..=max).contains(&value) => {
                Err(format!("must lie within [{min}, {max}], got {value}"))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ParameterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParameterField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.name() == value)
            .ok_or_else(|| format!("unknown site parameter '{value}'"))
    }
}

/// Fields only present in the extended schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvancedParameters {
    pub soil_organic_carbon_percent: f64,
    pub elevation_meters: f64,
    pub soil_moisture_percent: f64,
    pub annual_rainfall_variability: f64,
    pub regulatory_stability_index: f64,
    pub carbon_market_accessibility: f64,
    pub soil_cec_meq_per_100g: f64,
    pub monitoring_capability_index: f64,
}

/// A complete site description submitted for scoring.
///
/// Serialises to exactly the fields of its schema, in [`ParameterField::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteParameters {
    pub latitude: f64,
    pub longitude: f64,
    pub rainfall_mm: f64,
    pub soil_ph: f64,
    pub avg_temperature_c: f64,
    pub distance_to_road_km: f64,
    pub basalt_transport_distance_km: f64,
    pub basalt_availability_index: f64,
    pub infrastructure_quality_index: f64,
    pub agricultural_land_hectares: f64,
    pub population_density_per_km2: f64,
    pub energy_cost_per_kwh: f64,
    pub labor_cost_per_hour: f64,
    pub advanced: Option<AdvancedParameters>,
}

impl SiteParameters {
    /// Build a parameter set of the given schema, asking `value` for every field.
    pub fn from_fn<F>(schema: SchemaVersion, mut value: F) -> Self
    where
        F: FnMut(ParameterField) -> f64,
    {
        use ParameterField as P;

        let advanced = match schema {
            SchemaVersion::Basic => None,
            SchemaVersion::Extended => Some(AdvancedParameters {
                soil_organic_carbon_percent: value(P::SoilOrganicCarbonPercent),
                elevation_meters: value(P::ElevationMeters),
                soil_moisture_percent: value(P::SoilMoisturePercent),
                annual_rainfall_variability: value(P::AnnualRainfallVariability),
                regulatory_stability_index: value(P::RegulatoryStabilityIndex),
                carbon_market_accessibility: value(P::CarbonMarketAccessibility),
                soil_cec_meq_per_100g: value(P::SoilCecMeqPer100g),
                monitoring_capability_index: value(P::MonitoringCapabilityIndex),
            }),
        };

        Self {
            latitude: value(P::Latitude),
            longitude: value(P::Longitude),
            rainfall_mm: value(P::RainfallMm),
            soil_ph: value(P::SoilPh),
            avg_temperature_c: value(P::AvgTemperatureC),
            distance_to_road_km: value(P::DistanceToRoadKm),
            basalt_transport_distance_km: value(P::BasaltTransportDistanceKm),
            basalt_availability_index: value(P::BasaltAvailabilityIndex),
            infrastructure_quality_index: value(P::InfrastructureQualityIndex),
            agricultural_land_hectares: value(P::AgriculturalLandHectares),
            population_density_per_km2: value(P::PopulationDensityPerKm2),
            energy_cost_per_kwh: value(P::EnergyCostPerKWh),
            labor_cost_per_hour: value(P::LaborCostPerHour),
            advanced,
        }
    }

    pub fn schema(&self) -> SchemaVersion {
        if self.advanced.is_some() {
            SchemaVersion::Extended
        } else {
            SchemaVersion::Basic
        }
    }

    /// Value of `field`, or `None` for an advanced field of a basic set.
    pub fn get(&self, field: ParameterField) -> Option<f64> {
        use ParameterField as P;

        let advanced = self.advanced.as_ref();
        match field {
            P::Latitude => Some(self.latitude),
            P::Longitude => Some(self.longitude),
            P::RainfallMm => Some(self.rainfall_mm),
            P::SoilPh => Some(self.soil_ph),
            P::AvgTemperatureC => Some(self.avg_temperature_c),
            P::DistanceToRoadKm => Some(self.distance_to_road_km),
            P::BasaltTransportDistanceKm => Some(self.basalt_transport_distance_km),
            P::BasaltAvailabilityIndex => Some(self.basalt_availability_index),
            P::InfrastructureQualityIndex => Some(self.infrastructure_quality_index),
            P::AgriculturalLandHectares => Some(self.agricultural_land_hectares),
            P::PopulationDensityPerKm2 => Some(self.population_density_per_km2),
            P::EnergyCostPerKWh => Some(self.energy_cost_per_kwh),
            P::LaborCostPerHour => Some(self.labor_cost_per_hour),
            P::SoilOrganicCarbonPercent => advanced.map(|a| a.soil_organic_carbon_percent),
            P::ElevationMeters => advanced.map(|a| a.elevation_meters),
            P::SoilMoisturePercent => advanced.map(|a| a.soil_moisture_percent),
            P::AnnualRainfallVariability => advanced.map(|a| a.annual_rainfall_variability),
            P::RegulatoryStabilityIndex => advanced.map(|a| a.regulatory_stability_index),
            P::CarbonMarketAccessibility => advanced.map(|a| a.carbon_market_accessibility),
            P::SoilCecMeqPer100g => advanced.map(|a| a.soil_cec_meq_per_100g),
            P::MonitoringCapabilityIndex => advanced.map(|a| a.monitoring_capability_index),
        }
    }

    /// Overwrite `field`. Returns `false` when the field is not part of this set.
    pub fn set(&mut self, field: ParameterField, value: f64) -> bool {
        use ParameterField as P;

        let slot = match (field, self.advanced.as_mut()) {
            (P::Latitude, _) => &mut self.latitude,
            (P::Longitude, _) => &mut self.longitude,
            (P::RainfallMm, _) => &mut self.rainfall_mm,
            (P::SoilPh, _) => &mut self.soil_ph,
            (P::AvgTemperatureC, _) => &mut self.avg_temperature_c,
            (P::DistanceToRoadKm, _) => &mut self.distance_to_road_km,
            (P::BasaltTransportDistanceKm, _) => &mut self.basalt_transport_distance_km,
            (P::BasaltAvailabilityIndex, _) => &mut self.basalt_availability_index,
            (P::InfrastructureQualityIndex, _) => &mut self.infrastructure_quality_index,
            (P::AgriculturalLandHectares, _) => &mut self.agricultural_land_hectares,
            (P::PopulationDensityPerKm2, _) => &mut self.population_density_per_km2,
            (P::EnergyCostPerKWh, _) => &mut self.energy_cost_per_kwh,
            (P::LaborCostPerHour, _) => &mut self.labor_cost_per_hour,
            (_, None) => return false,
            (P::SoilOrganicCarbonPercent, Some(a)) => &mut a.soil_organic_carbon_percent,
            (P::ElevationMeters, Some(a)) => &mut a.elevation_meters,
            (P::SoilMoisturePercent, Some(a)) => &mut a.soil_moisture_percent,
            (P::AnnualRainfallVariability, Some(a)) => &mut a.annual_rainfall_variability,
            (P::RegulatoryStabilityIndex, Some(a)) => &mut a.regulatory_stability_index,
            (P::CarbonMarketAccessibility, Some(a)) => &mut a.carbon_market_accessibility,
            (P::SoilCecMeqPer100g, Some(a)) => &mut a.soil_cec_meq_per_100g,
            (P::MonitoringCapabilityIndex, Some(a)) => &mut a.monitoring_capability_index,
        };
        *slot = value;
        true
    }

    /// `(field, value)` pairs for every field of this set's schema.
    pub fn entries(&self) -> impl Iterator<Item = (ParameterField, f64)> + '_ {
        self.schema()
            .fields()
            .iter()
            .filter_map(|field| self.get(*field).map(|value| (*field, value)))
    }

    /// First field violating its range check, if any.
    pub fn first_violation(&self) -> Option<(ParameterField, String)> {
        self.entries()
            .find_map(|(field, value)| field.check(value).err().map(|reason| (field, reason)))
    }
}

impl Serialize for SiteParameters {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let fields = self.schema().fields();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (field, value) in self.entries() {
            map.serialize_entry(field.name(), &value)?;
        }
        map.end()
    }
}

/// Scored response of `POST /api/sitescore`.
///
/// `score` and `breakdown` are mandatory. Everything else is `None` when the service
/// leaves it out; nothing here is ever defaulted to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub score: f64,
    pub breakdown: BTreeMap<String, f64>,
    #[serde(default)]
    pub sustainability_grade: Option<String>,
    #[serde(default)]
    pub project_capacity_hectares: Option<f64>,
    #[serde(default)]
    pub carbon_removal_kg_per_year: Option<f64>,
    #[serde(default)]
    pub co2_emissions_kg_per_year: Option<f64>,
    #[serde(default)]
    pub net_carbon_impact_kg_per_year: Option<f64>,
    #[serde(default)]
    pub carbon_efficiency_ratio: Option<f64>,
    #[serde(default)]
    pub basalt_material_cost_usd_per_year: Option<f64>,
    #[serde(default)]
    pub transport_cost_usd_per_year: Option<f64>,
    #[serde(default)]
    pub labor_cost_usd_per_year: Option<f64>,
    #[serde(default)]
    pub equipment_cost_usd_per_year: Option<f64>,
    #[serde(default)]
    pub total_cost_usd_per_year: Option<f64>,
    #[serde(default)]
    pub cost_per_ton_co2_removed: Option<f64>,
}

impl AssessmentResult {
    pub fn component(&self, key: &str) -> Option<f64> {
        self.breakdown.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(schema: SchemaVersion) -> SiteParameters {
        SiteParameters::from_fn(schema, |field| field as usize as f64 / 100.0)
    }

    #[test]
    fn basic_parameters_serialize_only_core_fields_in_order() {
        let params = sample(SchemaVersion::Basic);
        let body = serde_json::to_value(params).expect("serializes");
        let object = body.as_object().expect("object body");

        assert_eq!(object.len(), ParameterField::BASIC_COUNT);
        assert!(object.contains_key("laborCostPerHour"));
        assert!(!object.contains_key("soilOrganicCarbonPercent"));
    }

    #[test]
    fn extended_parameters_serialize_every_field() {
        let params = sample(SchemaVersion::Extended);
        let body = serde_json::to_string(&params).expect("serializes");

        let expected_prefix = "{\"latitude\":0.0,\"longitude\":0.01,\"rainfallMm\":0.02";
        assert!(body.starts_with(expected_prefix), "unexpected body {body}");
        let object: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&body).expect("round trips as a map");
        assert_eq!(object.len(), ParameterField::ALL.len());
        assert_eq!(object["monitoringCapabilityIndex"], 0.2);
    }

    #[test]
    fn set_rejects_advanced_fields_on_basic_sets() {
        let mut params = sample(SchemaVersion::Basic);
        assert!(!params.set(ParameterField::ElevationMeters, 320.0));
        assert_eq!(params.get(ParameterField::ElevationMeters), None);
        assert!(params.set(ParameterField::SoilPh, 6.4));
        assert_eq!(params.soil_ph, 6.4);
    }

    #[test]
    fn index_fields_are_range_checked() {
        assert!(ParameterField::BasaltAvailabilityIndex.check(0.4).is_ok());
        assert!(ParameterField::BasaltAvailabilityIndex.check(1.2).is_err());
        assert!(ParameterField::Latitude.check(-91.0).is_err());
        assert!(ParameterField::RainfallMm.check(f64::NAN).is_err());
        assert!(ParameterField::ElevationMeters.check(-30.0).is_ok());
    }

    #[test]
    fn field_names_parse_back() {
        for field in ParameterField::ALL {
            assert_eq!(field.name().parse::<ParameterField>(), Ok(field));
        }
        assert!("soil_ph".parse::<ParameterField>().is_err());
    }

    #[test]
    fn blank_region_is_omitted_from_query() {
        let unfiltered = FilterQuery::default().to_pairs();
        let blank = FilterQuery::for_region("  ").to_pairs();
        assert_eq!(unfiltered, blank);
        assert!(unfiltered.iter().all(|(key, _)| *key != "region"));
    }

    #[test]
    fn non_blank_region_is_sent_verbatim() {
        let query = FilterQuery::for_region(" Iowa, USA ");
        assert_eq!(query.region(), Some(" Iowa, USA "));
        assert_eq!(
            query.to_pairs().first(),
            Some(&("region", " Iowa, USA ".to_string()))
        );
    }

    #[test]
    fn page_size_is_clamped_to_service_range() {
        let query = FilterQuery {
            page_size: 500,
            ..FilterQuery::default()
        };
        assert_eq!(query.effective_page_size(), 100);
        let query = FilterQuery {
            page_size: 0,
            ..FilterQuery::default()
        };
        assert_eq!(query.to_pairs().last(), Some(&("size", "1".to_string())));
    }

    #[test]
    fn result_requires_score_and_breakdown() {
        let missing_breakdown = serde_json::json!({ "score": 0.7 });
        assert!(serde_json::from_value::<AssessmentResult>(missing_breakdown).is_err());

        let minimal = serde_json::json!({ "score": 0.7, "breakdown": { "environmental": 0.8 } });
        let result: AssessmentResult = serde_json::from_value(minimal).expect("decodes");
        assert_eq!(result.component("environmental"), Some(0.8));
        assert_eq!(result.total_cost_usd_per_year, None);
        assert_eq!(result.sustainability_grade, None);
    }
}
