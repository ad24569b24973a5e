use std::collections::HashSet;

use crate::model::{FacilityDecl, Scenario};

use super::ValidationError;

/// Agent, commodity, market, and recipe names must each be unique.
/// Agent names share one namespace across regions, institutions,
/// facilities, and markets, so diagnostics can name agents unambiguously.
pub fn check_duplicates(scenario: &Scenario) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut markets = HashSet::new();
    for market in &scenario.markets {
        if !markets.insert(market.name.as_str()) {
            errors.push(ValidationError::DuplicateMarket {
                name: market.name.clone(),
            });
        }
    }

    let mut commodities = HashSet::new();
    for commodity in &scenario.commodities {
        if !commodities.insert(commodity.name.as_str()) {
            errors.push(ValidationError::DuplicateCommodity {
                name: commodity.name.clone(),
            });
        }
    }

    let mut recipes = HashSet::new();
    for recipe in &scenario.recipes {
        if !recipes.insert(recipe.name.as_str()) {
            errors.push(ValidationError::DuplicateRecipe {
                name: recipe.name.clone(),
            });
        }
    }

    let mut agents: HashSet<&str> = scenario.markets.iter().map(|m| m.name.as_str()).collect();
    for region in &scenario.regions {
        if !agents.insert(region.name.as_str()) {
            errors.push(ValidationError::DuplicateAgentName {
                name: region.name.clone(),
            });
        }
        for institution in &region.institutions {
            if !agents.insert(institution.name.as_str()) {
                errors.push(ValidationError::DuplicateAgentName {
                    name: institution.name.clone(),
                });
            }
            for facility in &institution.facilities {
                if !agents.insert(facility.name()) {
                    errors.push(ValidationError::DuplicateAgentName {
                        name: facility.name().to_string(),
                    });
                }
            }
        }
    }

    errors
}

/// Every cross-reference must point at a declaration: commodity → market,
/// facility → commodity, source → recipe.
pub fn check_references(scenario: &Scenario) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let markets: HashSet<&str> = scenario.markets.iter().map(|m| m.name.as_str()).collect();
    let commodities: HashSet<&str> = scenario
        .commodities
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    let recipes: HashSet<&str> = scenario.recipes.iter().map(|r| r.name.as_str()).collect();

    for commodity in &scenario.commodities {
        if !markets.contains(commodity.market.as_str()) {
            errors.push(ValidationError::UnknownMarket {
                commodity: commodity.name.clone(),
                market: commodity.market.clone(),
            });
        }
    }

    let mut check_commodity = |facility: &str, commodity: &str, errors: &mut Vec<ValidationError>| {
        if !commodities.contains(commodity) {
            errors.push(ValidationError::UnknownCommodity {
                facility: facility.to_string(),
                commodity: commodity.to_string(),
            });
        }
    };

    for region in &scenario.regions {
        for institution in &region.institutions {
            for facility in &institution.facilities {
                match facility {
                    FacilityDecl::Source {
                        name,
                        out_commodity,
                        recipe,
                        ..
                    } => {
                        check_commodity(name, out_commodity, &mut errors);
                        if !recipes.contains(recipe.as_str()) {
                            errors.push(ValidationError::UnknownRecipe {
                                facility: name.clone(),
                                recipe: recipe.clone(),
                            });
                        }
                    }
                    FacilityDecl::Sink {
                        name, in_commodity, ..
                    } => {
                        check_commodity(name, in_commodity, &mut errors);
                    }
                    FacilityDecl::RecipeReactor {
                        name,
                        in_commodity,
                        out_commodity,
                        ..
                    } => {
                        check_commodity(name, in_commodity, &mut errors);
                        check_commodity(name, out_commodity, &mut errors);
                    }
                }
            }
        }
    }

    errors
}
