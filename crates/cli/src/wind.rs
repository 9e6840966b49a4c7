//! Simplified GB50009 wind load arithmetic for the example reports.

use serde::{Deserialize, Serialize};

/// Air density in kg/m³ used for the basic wind pressure.
pub const AIR_DENSITY: f64 = 1.25;
/// Basic wind speed in m/s assumed for every example.
pub const BASIC_WIND_SPEED: f64 = 30.0;
/// Common-case shape factor.
pub const SHAPE_FACTOR: f64 = 1.3;

/// Ground roughness category per GB50009.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainCategory {
    A,
    B,
    C,
    D,
}

impl TerrainCategory {
    /// Height factor lookup. Everything that is not A, B or C takes the
    /// D branch, so an unknown letter behaves like the roughest terrain.
    pub fn height_factor(self) -> f64 {
        match self {
            TerrainCategory::A => 1.0,
            TerrainCategory::B => 1.2,
            TerrainCategory::C => 1.4,
            _ => 1.6,
        }
    }

    pub fn from_letter(letter: &str) -> Self {
        match letter {
            "A" => TerrainCategory::A,
            "B" => TerrainCategory::B,
            "C" => TerrainCategory::C,
            _ => TerrainCategory::D,
        }
    }
}

/// Input record for one example building. Constant for the lifetime of a
/// run; the example list is hardcoded in [`example_buildings`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingParams {
    pub name: String,
    pub building_type: String,
    pub height: f64,
    pub width: f64,
    pub depth: f64,
    pub terrain_category: TerrainCategory,
    pub location: String,
    pub code_standard: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Units {
    pub pressure: String,
    pub load: String,
    pub area: String,
}

impl Default for Units {
    fn default() -> Self {
        Self {
            pressure: "kN/m²".to_string(),
            load: "kN".to_string(),
            area: "m²".to_string(),
        }
    }
}

/// Derived wind load figures, rounded for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcResults {
    pub basic_wind_pressure: f64,
    pub height_factor: f64,
    pub shape_factor: f64,
    pub wind_pressure: f64,
    pub building_area: f64,
    pub total_wind_load: f64,
    pub units: Units,
}

/// Pure arithmetic from building parameters to wind load figures.
///
/// Unrounded intermediates feed the downstream products; rounding is
/// applied once to the reported fields (pressures to 3 decimals, factor
/// to 2, area and load to 1).
pub fn calculate(params: &BuildingParams) -> CalcResults {
    let height_factor = params.terrain_category.height_factor();
    let basic_wind_pressure = 0.5 * AIR_DENSITY * BASIC_WIND_SPEED.powi(2) / 1000.0;
    let wind_pressure = basic_wind_pressure * height_factor * SHAPE_FACTOR;
    let building_area = params.width * params.height;
    let total_wind_load = wind_pressure * building_area;

    CalcResults {
        basic_wind_pressure: round_to(basic_wind_pressure, 3),
        height_factor: round_to(height_factor, 2),
        shape_factor: SHAPE_FACTOR,
        wind_pressure: round_to(wind_pressure, 3),
        building_area: round_to(building_area, 1),
        total_wind_load: round_to(total_wind_load, 1),
        units: Units::default(),
    }
}

/// The three literal example buildings the reports pipeline runs on.
pub fn example_buildings() -> Vec<BuildingParams> {
    vec![
        BuildingParams {
            name: "High-rise office tower wind load calculation".to_string(),
            building_type: "Office tower".to_string(),
            height: 150.0,
            width: 40.0,
            depth: 30.0,
            terrain_category: TerrainCategory::C,
            location: "Shanghai".to_string(),
            code_standard: "GB50009".to_string(),
        },
        BuildingParams {
            name: "Residential building wind load calculation".to_string(),
            building_type: "Residential".to_string(),
            height: 80.0,
            width: 25.0,
            depth: 20.0,
            terrain_category: TerrainCategory::B,
            location: "Beijing".to_string(),
            code_standard: "GB50009".to_string(),
        },
        BuildingParams {
            name: "Industrial hall wind load calculation".to_string(),
            building_type: "Industrial hall".to_string(),
            height: 20.0,
            width: 60.0,
            depth: 40.0,
            terrain_category: TerrainCategory::A,
            location: "Guangzhou".to_string(),
            code_standard: "GB50009".to_string(),
        },
    ]
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
