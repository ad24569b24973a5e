use std::collections::BTreeMap;

use fuelcycle::material::Basis;
use fuelcycle::model::{
    CommodityDecl, FacilityDecl, InstitutionDecl, MarketDecl, RecipeDecl, RegionDecl, Scenario,
};
use fuelcycle::validate::{self, ValidationError};

fn valid_scenario() -> Scenario {
    let mut composition = BTreeMap::new();
    composition.insert("U".to_string(), 1.0);
    Scenario {
        name: "valid".to_string(),
        description: None,
        horizon: 6,
        recipes: vec![RecipeDecl {
            name: "nat_u".to_string(),
            basis: Basis::Mass,
            unit: "kg".to_string(),
            composition,
        }],
        markets: vec![MarketDecl {
            name: "u_market".to_string(),
        }],
        commodities: vec![CommodityDecl {
            name: "u".to_string(),
            market: "u_market".to_string(),
        }],
        regions: vec![RegionDecl {
            name: "region_a".to_string(),
            institutions: vec![InstitutionDecl {
                name: "inst_a".to_string(),
                facilities: vec![
                    FacilityDecl::Source {
                        name: "mine".to_string(),
                        out_commodity: "u".to_string(),
                        recipe: "nat_u".to_string(),
                        monthly_capacity: 100.0,
                        inventory_cap: 100.0,
                        ask_price: 1.0,
                    },
                    FacilityDecl::Sink {
                        name: "burner".to_string(),
                        in_commodity: "u".to_string(),
                        monthly_demand: 60.0,
                        bid_price: 2.0,
                        min_amount: 0.0,
                    },
                ],
            }],
        }],
    }
}

#[test]
fn a_well_formed_scenario_passes() {
    assert!(validate::validate(&valid_scenario()).is_ok());
}

#[test]
fn zero_horizon_is_rejected() {
    let mut scenario = valid_scenario();
    scenario.horizon = 0;
    let errors = validate::validate(&scenario).unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::ZeroHorizon)));
}

#[test]
fn duplicate_agent_names_are_rejected() {
    let mut scenario = valid_scenario();
    let clone = scenario.regions[0].institutions[0].facilities[0].clone();
    scenario.regions[0].institutions[0].facilities.push(clone);
    let errors = validate::validate(&scenario).unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::DuplicateAgentName { name } if name == "mine")));
}

#[test]
fn unknown_references_are_all_reported() {
    let mut scenario = valid_scenario();
    scenario.commodities[0].market = "nowhere".to_string();
    scenario.regions[0].institutions[0].facilities = vec![
        FacilityDecl::Source {
            name: "mine".to_string(),
            out_commodity: "plutonium".to_string(),
            recipe: "missing_recipe".to_string(),
            monthly_capacity: 100.0,
            inventory_cap: 100.0,
            ask_price: 1.0,
        },
    ];

    let errors = validate::validate(&scenario).unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::UnknownMarket { .. })));
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::UnknownCommodity { .. })));
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::UnknownRecipe { .. })));
}

#[test]
fn negative_parameters_are_rejected() {
    let mut scenario = valid_scenario();
    scenario.regions[0].institutions[0].facilities[0] = FacilityDecl::Source {
        name: "mine".to_string(),
        out_commodity: "u".to_string(),
        recipe: "nat_u".to_string(),
        monthly_capacity: -5.0,
        inventory_cap: 100.0,
        ask_price: 1.0,
    };
    let errors = validate::validate(&scenario).unwrap_err();
    assert!(errors.iter().any(
        |e| matches!(e, ValidationError::InvalidParam { field, .. } if field == "monthly_capacity")
    ));
}

#[test]
fn sink_floor_above_its_demand_is_rejected() {
    let mut scenario = valid_scenario();
    scenario.regions[0].institutions[0].facilities[1] = FacilityDecl::Sink {
        name: "burner".to_string(),
        in_commodity: "u".to_string(),
        monthly_demand: 60.0,
        bid_price: 2.0,
        min_amount: 80.0,
    };
    let errors = validate::validate(&scenario).unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::MinAboveDemand { .. })));
}

#[test]
fn empty_recipes_are_rejected() {
    let mut scenario = valid_scenario();
    scenario.recipes[0].composition.clear();
    let errors = validate::validate(&scenario).unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::EmptyRecipe { .. })));
}

#[test]
fn scenario_json_round_trips_through_serde() {
    let scenario = valid_scenario();
    let json = serde_json::to_string(&scenario).unwrap();
    let parsed: Scenario = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, scenario);
    assert!(validate::validate(&parsed).is_ok());
}
