//! Calculation-example pipeline: three hardcoded buildings, the wind load
//! formula, fixed markdown templates (or AI prose with `--ai`), plus a
//! summary. Never fails the workflow: partial failures are logged and the
//! command still succeeds.

use crate::wind::{calculate, example_buildings, BuildingParams, CalcResults};
use anyhow::{Context, Result};
use chrono::Utc;
use llm::TextGenerator;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct ReportsOptions {
    pub out_dir: PathBuf,
}

impl ReportsOptions {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }
}

/// Summary row for one generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRecord {
    pub example: String,
    pub report_file: String,
    pub wind_pressure: f64,
    pub total_load: f64,
}

#[derive(Debug, Default)]
pub struct ReportsOutcome {
    pub generated: Vec<ReportRecord>,
    pub failed: usize,
}

/// Run the example generator. `generator` is only consulted for the AI
/// prose variant; when it is absent or fails, the fixed template is used.
pub async fn run(
    generator: Option<&dyn TextGenerator>,
    opts: &ReportsOptions,
) -> Result<ReportsOutcome> {
    let examples = example_buildings();
    info!("generating {} calculation examples", examples.len());
    fs::create_dir_all(&opts.out_dir)
        .with_context(|| format!("creating {}", opts.out_dir.display()))?;

    let mut outcome = ReportsOutcome::default();
    for params in &examples {
        match generate_one(generator, opts, params).await {
            Ok(record) => {
                info!(
                    "{}: wind pressure {} kN/m², total load {} kN",
                    record.example, record.wind_pressure, record.total_load
                );
                outcome.generated.push(record);
            }
            Err(e) => {
                error!("report generation failed for {}: {e:#}", params.name);
                outcome.failed += 1;
            }
        }
    }

    if outcome.generated.is_empty() {
        // Keep the directory present so downstream steps find something.
        let readme = opts.out_dir.join("README.md");
        fs::write(&readme, "# Reports\n\nCalculation examples pending.\n")
            .with_context(|| format!("writing {}", readme.display()))?;
        return Ok(outcome);
    }

    write_summary(opts, &outcome.generated)?;
    Ok(outcome)
}

async fn generate_one(
    generator: Option<&dyn TextGenerator>,
    opts: &ReportsOptions,
    params: &BuildingParams,
) -> Result<ReportRecord> {
    let results = calculate(params);

    let report = match generator {
        Some(generator) => match ai_report(generator, params, &results).await {
            Ok(report) => report,
            Err(e) => {
                error!("AI report failed for {}, using template: {e}", params.name);
                render_template(params, &results)
            }
        },
        None => render_template(params, &results),
    };

    let safe_name = params.name.replace([' ', '/'], "_");
    let report_path = opts.out_dir.join(format!("{safe_name}_report.md"));
    fs::write(&report_path, report)
        .with_context(|| format!("writing {}", report_path.display()))?;

    let data_path = opts.out_dir.join(format!("{safe_name}_data.json"));
    let data = json!({
        "building_params": params,
        "results": results,
        "generated_at": Utc::now().to_rfc3339(),
    });
    fs::write(&data_path, serde_json::to_string_pretty(&data)?)
        .with_context(|| format!("writing {}", data_path.display()))?;

    Ok(ReportRecord {
        example: params.name.clone(),
        report_file: report_path.display().to_string(),
        wind_pressure: results.wind_pressure,
        total_load: results.total_wind_load,
    })
}

async fn ai_report(
    generator: &dyn TextGenerator,
    params: &BuildingParams,
    results: &CalcResults,
) -> Result<String> {
    let params_json = serde_json::to_string_pretty(params)?;
    let results_json = serde_json::to_string_pretty(results)?;
    let prose = generator
        .generate_calculation_report(&params_json, &results_json, &params.code_standard)
        .await?;
    Ok(format!("# {} - Wind Load Calculation Report\n\n{prose}\n", params.name))
}

/// The fixed markdown table template.
pub fn render_template(params: &BuildingParams, results: &CalcResults) -> String {
    format!(
        r#"# {name} - Wind Load Calculation Report

## Project Information
- **Building type**: {building_type}
- **Building height**: {height} m
- **Footprint**: {width}m × {depth}m
- **Terrain category**: {terrain:?}
- **Location**: {location}
- **Design code**: {code_standard}

## Results
| Item | Value | Unit |
|------|-------|------|
| Basic wind pressure | {basic} | {pressure_unit} |
| Height factor | {height_factor} | - |
| Shape factor | {shape_factor} | - |
| Design wind pressure | {wind_pressure} | {pressure_unit} |
| Exposed building area | {area} | {area_unit} |
| **Total wind load** | **{total}** | **{load_unit}** |

## Calculation Notes
1. Basic wind pressure: q = 0.5 × ρ × v²
   - ρ (air density) = 1.25 kg/m³
   - v (basic wind speed) = 30 m/s

2. Height factor by terrain category:
   - Terrain A: 1.0
   - Terrain B: 1.2
   - Terrain C: 1.4
   - Terrain D: 1.6

3. Shape factor takes the common value 1.3

4. Total wind load = wind pressure × exposed area

## Engineering Recommendations
- Validate with a detailed wind tunnel study
- Account for wind-induced vibration and dynamic response
- Combine loads per the design code
- Verify the structural safety factors

> Note: simplified example calculation; real projects require a full analysis.
"#,
        name = params.name,
        building_type = params.building_type,
        height = params.height,
        width = params.width,
        depth = params.depth,
        terrain = params.terrain_category,
        location = params.location,
        code_standard = params.code_standard,
        basic = results.basic_wind_pressure,
        height_factor = results.height_factor,
        shape_factor = results.shape_factor,
        wind_pressure = results.wind_pressure,
        area = results.building_area,
        total = results.total_wind_load,
        pressure_unit = results.units.pressure,
        area_unit = results.units.area,
        load_unit = results.units.load,
    )
}

fn write_summary(opts: &ReportsOptions, records: &[ReportRecord]) -> Result<()> {
    let mut summary = String::from("# Wind Load Calculation Examples\n\n## Reports\n\n");
    for record in records {
        let link = Path::new(&record.report_file)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&record.report_file)
            .to_string();
        summary.push_str(&format!("### {}\n", record.example));
        summary.push_str(&format!("- Report: [{link}]({link})\n"));
        summary.push_str(&format!(
            "- Design wind pressure: {} kN/m²\n",
            record.wind_pressure
        ));
        summary.push_str(&format!("- Total wind load: {} kN\n\n", record.total_load));
    }
    summary.push_str(
        "## Usage\n\n\
         1. All reports live in the reports directory\n\
         2. Each report documents the full calculation\n\
         3. The JSON data files are machine-readable\n\
         4. These are simplified examples; real projects need full analysis\n",
    );

    let summary_path = opts.out_dir.join("SUMMARY.md");
    fs::write(&summary_path, summary)
        .with_context(|| format!("writing {}", summary_path.display()))?;

    let data_path = opts.out_dir.join("summary_data.json");
    fs::write(&data_path, serde_json::to_string_pretty(records)?)
        .with_context(|| format!("writing {}", data_path.display()))?;

    info!("report summary written to {}", summary_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wind::example_buildings;

    #[test]
    fn test_template_renders_all_figures() {
        let params = example_buildings().into_iter().next().unwrap();
        let results = calculate(&params);
        let report = render_template(&params, &results);

        assert!(report.contains(&params.name));
        assert!(report.contains(&results.wind_pressure.to_string()));
        assert!(report.contains(&results.total_wind_load.to_string()));
        assert!(report.contains("| Basic wind pressure |"));
    }
}
