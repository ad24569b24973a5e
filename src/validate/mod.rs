mod params;
mod references;

use std::path::Path;

use thiserror::Error;

use crate::model::Scenario;

/// Everything that can be wrong with a scenario file. Checks collect all
/// errors rather than stopping at the first.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Horizon must be at least one month")]
    ZeroHorizon,

    #[error("Duplicate agent name `{name}`")]
    DuplicateAgentName { name: String },

    #[error("Duplicate commodity `{name}`")]
    DuplicateCommodity { name: String },

    #[error("Duplicate market `{name}`")]
    DuplicateMarket { name: String },

    #[error("Duplicate recipe `{name}`")]
    DuplicateRecipe { name: String },

    #[error("Commodity `{commodity}` names unknown market `{market}`")]
    UnknownMarket { commodity: String, market: String },

    #[error("Facility `{facility}` names unknown commodity `{commodity}`")]
    UnknownCommodity { facility: String, commodity: String },

    #[error("Facility `{facility}` names unknown recipe `{recipe}`")]
    UnknownRecipe { facility: String, recipe: String },

    #[error("Recipe `{name}` has an empty composition")]
    EmptyRecipe { name: String },

    #[error("Recipe `{name}` species `{species}` has negative quantity {quantity}")]
    NegativeSpecies {
        name: String,
        species: String,
        quantity: f64,
    },

    #[error("Facility `{facility}`: `{field}` has invalid value {value}")]
    InvalidParam {
        facility: String,
        field: String,
        value: f64,
    },

    #[error("Facility `{facility}`: min_amount {min_amount} exceeds monthly_demand {demand}")]
    MinAboveDemand {
        facility: String,
        min_amount: f64,
        demand: f64,
    },
}

/// Load and fully validate a scenario from a JSON file.
pub fn load_and_validate(path: &Path) -> Result<Scenario, Vec<ValidationError>> {
    let contents = std::fs::read_to_string(path).map_err(|e| vec![ValidationError::Io(e)])?;
    let scenario: Scenario =
        serde_json::from_str(&contents).map_err(|e| vec![ValidationError::Json(e)])?;
    validate(&scenario)?;
    Ok(scenario)
}

/// Validate a scenario, collecting all errors.
pub fn validate(scenario: &Scenario) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if scenario.horizon == 0 {
        errors.push(ValidationError::ZeroHorizon);
    }
    errors.extend(references::check_duplicates(scenario));
    errors.extend(references::check_references(scenario));
    errors.extend(params::check_params(scenario));

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// CLI entry point for the `validate` subcommand.
pub fn run(path: &Path) -> anyhow::Result<()> {
    match load_and_validate(path) {
        Ok(scenario) => {
            let facilities: usize = scenario
                .regions
                .iter()
                .flat_map(|r| &r.institutions)
                .map(|i| i.facilities.len())
                .sum();
            println!(
                "Scenario '{}' is valid. {} month(s), {} commodity(ies), {} facility(ies).",
                scenario.name,
                scenario.horizon,
                scenario.commodities.len(),
                facilities,
            );
            Ok(())
        }
        Err(errors) => {
            eprintln!("Validation failed with {} error(s):", errors.len());
            for (i, e) in errors.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, e);
            }
            std::process::exit(1);
        }
    }
}
