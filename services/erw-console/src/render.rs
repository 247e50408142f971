use erw_sites::assessment::{
    AssessmentOrigin, AssessmentRecord, DashboardSummary, FilterQuery, ParameterGroup, Site,
    SiteParameters,
};
use erw_sites::error::AppError;
use std::io::Write;

const NOT_AVAILABLE: &str = "N/A";

/// Fixed-precision number with thousands separators, or `N/A` when absent.
pub(crate) fn format_metric(value: Option<f64>, decimals: usize) -> String {
    let Some(value) = value.filter(|value| value.is_finite()) else {
        return NOT_AVAILABLE.to_string();
    };

    let formatted = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match formatted.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

fn format_currency(value: Option<f64>) -> String {
    match value.filter(|value| value.is_finite()) {
        Some(_) => format!("${}", format_metric(value, 0)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// One `Group: field=value, ...` line per parameter group present in `parameters`.
pub(crate) fn input_lines(parameters: &SiteParameters) -> Vec<String> {
    ParameterGroup::ordered()
        .into_iter()
        .filter_map(|group| {
            let values: Vec<String> = parameters
                .entries()
                .filter(|(field, _)| field.group() == group)
                .map(|(field, value)| format!("{field}={value}"))
                .collect();
            (!values.is_empty()).then(|| format!("{}: {}", group.label(), values.join(", ")))
        })
        .collect()
}

pub(crate) fn render_sites(query: &FilterQuery, sites: &[Site]) {
    println!(
        "Sites (region: {}, sorted by {} {}, page size {})",
        query.region().unwrap_or("all"),
        query.sort_field.as_str(),
        query.sort_direction.as_str(),
        query.effective_page_size()
    );

    if sites.is_empty() {
        println!("No sites match the current filter.");
        return;
    }

    for site in sites {
        println!(
            "- {} [{}] ({:.4}, {:.4}) score {:.2}",
            site.name, site.region, site.latitude, site.longitude, site.score
        );
    }
}

pub(crate) fn render_dashboard(summary: &DashboardSummary) {
    println!("Site dashboard");
    println!("- Total sites: {}", summary.stats.total_sites);
    println!("- Average score: {:.2}", summary.stats.average_score);
    println!("- Regions: {}", summary.stats.total_regions);

    println!("\nScore distribution");
    for entry in &summary.distribution.tiers {
        println!("- {}: {}", entry.label, entry.count);
    }
}

pub(crate) fn render_assessment(record: &AssessmentRecord) {
    let result = &record.result;
    match &record.origin {
        AssessmentOrigin::Site { name, region } => {
            println!("Assessment for {name} ({region})");
        }
        AssessmentOrigin::Form => println!("Assessment for submitted site"),
    }
    println!(
        "Location: {:.4}, {:.4} | schema {} | assessed {}",
        record.parameters.latitude,
        record.parameters.longitude,
        record.parameters.schema().label(),
        record.assessed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    println!("\nInputs");
    for line in input_lines(&record.parameters) {
        println!("- {line}");
    }

    println!(
        "\nOverall score: {:.0}% ({})",
        result.score * 100.0,
        result.tier().label()
    );
    println!(
        "Sustainability grade: {}",
        result.sustainability_grade.as_deref().unwrap_or(NOT_AVAILABLE)
    );

    let primary = result.primary_components();
    if !primary.is_empty() {
        println!("\nComponents");
        for entry in &primary {
            println!("- {}: {:.0}%", entry.label, entry.value * 100.0);
        }
    }

    let factors = result.detailed_factors();
    if !factors.is_empty() {
        println!("\nDetailed factors");
        for entry in &factors {
            println!("- {}: {:.0}%", entry.label, entry.value * 100.0);
        }
    }

    println!("\nCarbon");
    println!(
        "- Project capacity: {} ha",
        format_metric(result.project_capacity_hectares, 0)
    );
    println!(
        "- Carbon removal: {} kg/yr",
        format_metric(result.carbon_removal_kg_per_year, 0)
    );
    println!(
        "- CO2 emissions: {} kg/yr",
        format_metric(result.co2_emissions_kg_per_year, 0)
    );
    println!(
        "- Net impact: {} kg/yr",
        format_metric(result.net_carbon_impact_kg_per_year, 0)
    );
    println!(
        "- Efficiency ratio: {}",
        format_metric(result.carbon_efficiency_ratio, 2)
    );

    println!("\nAnnual costs");
    println!(
        "- Basalt material: {}",
        format_currency(result.basalt_material_cost_usd_per_year)
    );
    println!(
        "- Transport: {}",
        format_currency(result.transport_cost_usd_per_year)
    );
    println!("- Labor: {}", format_currency(result.labor_cost_usd_per_year));
    println!(
        "- Equipment: {}",
        format_currency(result.equipment_cost_usd_per_year)
    );
    println!("- Total: {}", format_currency(result.total_cost_usd_per_year));
    println!(
        "- Cost per tonne CO2 removed: {}",
        format_currency(result.cost_per_ton_co2_removed)
    );
}

/// Write the site set as CSV with a header row.
pub(crate) fn export_sites<W: Write>(sites: &[Site], writer: W) -> Result<(), AppError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["id", "name", "latitude", "longitude", "region", "score"])?;
    for site in sites {
        csv_writer.write_record([
            site.id.map(|id| id.to_string()).unwrap_or_default(),
            site.name.clone(),
            site.latitude.to_string(),
            site.longitude.to_string(),
            site.region.clone(),
            site.score.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_are_grouped_or_marked_missing() {
        assert_eq!(format_metric(Some(1_260_000.0), 0), "1,260,000");
        assert_eq!(format_metric(Some(176.189), 2), "176.19");
        assert_eq!(format_metric(Some(-4200.5), 1), "-4,200.5");
        assert_eq!(format_metric(Some(-0.0001), 2), "0.00");
        assert_eq!(format_metric(None, 0), "N/A");
        assert_eq!(format_metric(Some(f64::NAN), 0), "N/A");
        assert_eq!(format_currency(Some(84_000.0)), "$84,000");
        assert_eq!(format_currency(None), "N/A");
    }

    #[test]
    fn inputs_are_grouped_in_form_order() {
        let parameters = erw_sites::assessment::RegionalEstimator::new(
            erw_sites::assessment::SchemaVersion::Basic,
        )
        .estimate(-18.15, 49.4, "Madagascar");
        let lines = input_lines(&parameters);

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Location: latitude=-18.15, longitude=49.4");
        assert!(lines[2].starts_with("Logistics: distanceToRoadKm="));
        assert!(lines[3].starts_with("Economic & Social: agriculturalLandHectares=500"));
    }

    #[test]
    fn export_writes_header_and_rows() {
        let sites = vec![
            Site {
                id: Some(7),
                name: "Kolar Belt".to_string(),
                latitude: 13.13,
                longitude: 78.13,
                region: "Karnataka, India".to_string(),
                score: 0.64,
            },
            Site {
                id: None,
                name: "Ames North".to_string(),
                latitude: 42.03,
                longitude: -93.62,
                region: "Iowa, USA".to_string(),
                score: 0.81,
            },
        ];

        let mut buffer = Vec::new();
        export_sites(&sites, &mut buffer).expect("export succeeds");
        let text = String::from_utf8(buffer).expect("utf8 output");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "id,name,latitude,longitude,region,score");
        assert_eq!(lines[1], "7,Kolar Belt,13.13,78.13,\"Karnataka, India\",0.64");
        assert_eq!(lines[2], ",Ames North,42.03,-93.62,\"Iowa, USA\",0.81");
    }
}
