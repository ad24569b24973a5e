use crate::model::{FacilityDecl, Scenario};

use super::ValidationError;

fn non_negative(
    facility: &str,
    field: &'static str,
    value: f64,
    errors: &mut Vec<ValidationError>,
) {
    if !value.is_finite() || value < 0.0 {
        errors.push(ValidationError::InvalidParam {
            facility: facility.to_string(),
            field: field.to_string(),
            value,
        });
    }
}

/// Numeric sanity: capacities, demands, and prices must be finite and
/// non-negative; a sink's floor must not exceed what it asks for, since
/// that request could never be constructed at runtime.
pub fn check_params(scenario: &Scenario) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for recipe in &scenario.recipes {
        if recipe.composition.is_empty() {
            errors.push(ValidationError::EmptyRecipe {
                name: recipe.name.clone(),
            });
        }
        for (species, quantity) in &recipe.composition {
            if !quantity.is_finite() || *quantity < 0.0 {
                errors.push(ValidationError::NegativeSpecies {
                    name: recipe.name.clone(),
                    species: species.clone(),
                    quantity: *quantity,
                });
            }
        }
    }

    for region in &scenario.regions {
        for institution in &region.institutions {
            for facility in &institution.facilities {
                match facility {
                    FacilityDecl::Source {
                        name,
                        monthly_capacity,
                        inventory_cap,
                        ask_price,
                        ..
                    } => {
                        non_negative(name, "monthly_capacity", *monthly_capacity, &mut errors);
                        non_negative(name, "inventory_cap", *inventory_cap, &mut errors);
                        non_negative(name, "ask_price", *ask_price, &mut errors);
                    }
                    FacilityDecl::Sink {
                        name,
                        monthly_demand,
                        bid_price,
                        min_amount,
                        ..
                    } => {
                        non_negative(name, "monthly_demand", *monthly_demand, &mut errors);
                        non_negative(name, "bid_price", *bid_price, &mut errors);
                        non_negative(name, "min_amount", *min_amount, &mut errors);
                        if *min_amount > *monthly_demand {
                            errors.push(ValidationError::MinAboveDemand {
                                facility: name.clone(),
                                min_amount: *min_amount,
                                demand: *monthly_demand,
                            });
                        }
                    }
                    FacilityDecl::RecipeReactor {
                        name,
                        inventory_cap,
                        monthly_capacity,
                        bid_price,
                        ask_price,
                        ..
                    } => {
                        non_negative(name, "inventory_cap", *inventory_cap, &mut errors);
                        non_negative(name, "monthly_capacity", *monthly_capacity, &mut errors);
                        non_negative(name, "bid_price", *bid_price, &mut errors);
                        non_negative(name, "ask_price", *ask_price, &mut errors);
                    }
                }
            }
        }
    }

    errors
}
