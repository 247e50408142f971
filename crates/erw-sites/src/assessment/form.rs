use super::domain::{ParameterField, SchemaVersion, SiteParameters};
use super::error::AssessmentError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// Raw, user-typed site description keyed by wire field name.
///
/// Nothing is interpreted until [`FormSubmission::parse`], so a malformed value is only
/// ever reported, never silently coerced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSubmission {
    values: BTreeMap<String, String>,
}

impl FormSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, raw: impl Into<String>) -> Self {
        self.insert(field, raw);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, raw: impl Into<String>) {
        self.values.insert(field.into(), raw.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn from_parameters(parameters: &SiteParameters) -> Self {
        let values = parameters
            .entries()
            .map(|(field, value)| (field.name().to_string(), value.to_string()))
            .collect();
        Self { values }
    }

    /// Accept a flat JSON object; numbers and strings are kept as typed text.
    pub fn from_json_object(object: &serde_json::Map<String, serde_json::Value>) -> Self {
        let values = object
            .iter()
            .map(|(key, value)| {
                let raw = match value {
                    serde_json::Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                (key.clone(), raw)
            })
            .collect();
        Self { values }
    }

    /// Read `field,value` rows. A leading `field,value` header row is optional.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut form = Self::new();
        for (index, record) in csv_reader.records().enumerate() {
            let record = record?;
            let field = record.get(0).unwrap_or_default();
            let raw = record.get(1).unwrap_or_default();
            if index == 0 && field.eq_ignore_ascii_case("field") {
                continue;
            }
            if field.is_empty() {
                continue;
            }
            form.insert(field, raw);
        }

        Ok(form)
    }

    /// Example site preloaded by the calculator: the Des Moines metropolitan area.
    pub fn example() -> Self {
        [
            ("latitude", "41.5868"),
            ("longitude", "-93.6250"),
            ("rainfallMm", "862"),
            ("soilPh", "6.8"),
            ("avgTemperatureC", "10.2"),
            ("distanceToRoadKm", "2.5"),
            ("basaltTransportDistanceKm", "240"),
            ("basaltAvailabilityIndex", "0.7"),
            ("infrastructureQualityIndex", "0.92"),
            ("agriculturalLandHectares", "1500000"),
            ("populationDensityPerKm2", "22"),
            ("energyCostPerKWh", "0.11"),
            ("laborCostPerHour", "18.5"),
            ("soilOrganicCarbonPercent", "4.2"),
            ("elevationMeters", "290"),
            ("soilMoisturePercent", "38"),
            ("annualRainfallVariability", "180"),
            ("regulatoryStabilityIndex", "0.88"),
            ("carbonMarketAccessibility", "0.92"),
            ("soilCecMeqPer100g", "18.5"),
            ("monitoringCapabilityIndex", "0.85"),
        ]
        .into_iter()
        .fold(Self::new(), |form, (field, raw)| form.with(field, raw))
    }

    /// Parse every field required by `schema`, stopping at the first invalid one.
    ///
    /// Fields that are not part of `schema` are ignored.
    pub fn parse(&self, schema: SchemaVersion) -> Result<SiteParameters, AssessmentError> {
        let mut parsed = BTreeMap::new();
        for field in schema.fields() {
            let value = self.parse_field(*field)?;
            parsed.insert(*field, value);
        }

        Ok(SiteParameters::from_fn(schema, |field| {
            parsed.get(&field).copied().unwrap_or_default()
        }))
    }

    fn parse_field(&self, field: ParameterField) -> Result<f64, AssessmentError> {
        let raw = self
            .get(field.name())
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or_else(|| AssessmentError::validation(field.name(), "a value is required"))?;

        let value = raw.parse::<f64>().map_err(|_| {
            AssessmentError::validation(field.name(), format!("'{raw}' is not a number"))
        })?;

        field
            .check(value)
            .map_err(|reason| AssessmentError::validation(field.name(), reason))?;

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn validation_field(err: AssessmentError) -> String {
        match err {
            AssessmentError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn example_form_parses_under_both_schemas() {
        let form = FormSubmission::example();

        let extended = form.parse(SchemaVersion::Extended).expect("extended parses");
        assert_eq!(extended.latitude, 41.5868);
        assert_eq!(extended.get(ParameterField::SoilCecMeqPer100g), Some(18.5));

        let basic = form.parse(SchemaVersion::Basic).expect("basic parses");
        assert_eq!(basic.advanced, None);
        assert_eq!(basic.labor_cost_per_hour, 18.5);
    }

    #[test]
    fn non_numeric_soil_ph_is_named() {
        let form = FormSubmission::example().with("soilPh", "slightly acidic");
        let err = form.parse(SchemaVersion::Extended).expect_err("rejected");
        assert_eq!(err.kind(), "validation");
        assert_eq!(validation_field(err), "soilPh");
    }

    #[test]
    fn first_invalid_field_in_declaration_order_wins() {
        let form = FormSubmission::example()
            .with("monitoringCapabilityIndex", "")
            .with("rainfallMm", "lots")
            .with("soilPh", "n/a");
        let err = form.parse(SchemaVersion::Extended).expect_err("rejected");
        assert_eq!(validation_field(err), "rainfallMm");
    }

    #[test]
    fn missing_advanced_field_only_matters_for_extended_schema() {
        let mut form = FormSubmission::from_parameters(
            &FormSubmission::example()
                .parse(SchemaVersion::Basic)
                .expect("basic parses"),
        );
        assert_eq!(form.len(), ParameterField::BASIC_COUNT);
        assert!(form.parse(SchemaVersion::Basic).is_ok());

        let err = form.parse(SchemaVersion::Extended).expect_err("advanced missing");
        assert_eq!(validation_field(err), "soilOrganicCarbonPercent");

        form.insert("unknownField", "12");
        assert!(form.parse(SchemaVersion::Basic).is_ok());
    }

    #[test]
    fn non_finite_and_out_of_range_values_are_rejected() {
        let err = FormSubmission::example()
            .with("elevationMeters", "inf")
            .parse(SchemaVersion::Extended)
            .expect_err("rejected");
        assert_eq!(validation_field(err), "elevationMeters");

        let err = FormSubmission::example()
            .with("basaltAvailabilityIndex", "1.5")
            .parse(SchemaVersion::Basic)
            .expect_err("rejected");
        assert_eq!(validation_field(err), "basaltAvailabilityIndex");
    }

    #[test]
    fn csv_rows_become_form_values() {
        let csv = "field,value\nlatitude, 12.97\nlongitude,77.59\n# comment\nsoilPh,6.1\n";
        let form = FormSubmission::from_csv_reader(Cursor::new(csv)).expect("csv parses");

        assert_eq!(form.len(), 3);
        assert_eq!(form.get("latitude"), Some("12.97"));
        assert_eq!(form.get("soilPh"), Some("6.1"));
    }

    #[test]
    fn csv_row_without_value_is_reported_as_missing() {
        let csv = "latitude,12.97\nsoilPh\nlongitude,77.59\n";
        let form = FormSubmission::from_csv_reader(Cursor::new(csv)).expect("csv parses");

        assert_eq!(form.get("soilPh"), Some(""));
        assert_eq!(form.get("longitude"), Some("77.59"));

        let csv: String = FormSubmission::example()
            .values
            .iter()
            .map(|(field, raw)| match field.as_str() {
                "soilPh" => "soilPh\n".to_string(),
                _ => format!("{field},{raw}\n"),
            })
            .collect();
        let err = FormSubmission::from_csv_reader(Cursor::new(csv))
            .expect("csv parses")
            .parse(SchemaVersion::Extended)
            .expect_err("missing value");
        assert_eq!(
            err,
            AssessmentError::Validation {
                field: "soilPh".to_string(),
                reason: "a value is required".to_string(),
            }
        );
    }

    #[test]
    fn json_numbers_and_text_are_kept_as_typed() {
        let object = serde_json::json!({ "soilPh": 6.5, "rainfallMm": "900", "latitude": null });
        let form = FormSubmission::from_json_object(object.as_object().expect("object"));

        assert_eq!(form.get("soilPh"), Some("6.5"));
        assert_eq!(form.get("rainfallMm"), Some("900"));
        assert_eq!(form.get("latitude"), Some("null"));
    }
}
