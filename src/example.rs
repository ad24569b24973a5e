use std::collections::BTreeMap;

use crate::material::Basis;
use crate::model::{
    CommodityDecl, FacilityDecl, InstitutionDecl, MarketDecl, RecipeDecl, RegionDecl, Scenario,
};

/// A small once-through cycle: a mine feeds a reactor whose spent fuel
/// ends up in a repository. Used by the `example` subcommand and as a
/// starting point for hand-written scenarios.
pub fn scenario() -> Scenario {
    let mut nat_u = BTreeMap::new();
    nat_u.insert("U235".to_string(), 0.711);
    nat_u.insert("U238".to_string(), 99.289);

    Scenario {
        name: "once_through".to_string(),
        description: Some("mine -> reactor -> repository over one year".to_string()),
        horizon: 12,
        recipes: vec![RecipeDecl {
            name: "nat_u".to_string(),
            basis: Basis::Mass,
            unit: "kg".to_string(),
            composition: nat_u,
        }],
        markets: vec![
            MarketDecl {
                name: "uranium_market".to_string(),
            },
            MarketDecl {
                name: "fuel_market".to_string(),
            },
        ],
        commodities: vec![
            CommodityDecl {
                name: "natural_uranium".to_string(),
                market: "uranium_market".to_string(),
            },
            CommodityDecl {
                name: "spent_fuel".to_string(),
                market: "fuel_market".to_string(),
            },
        ],
        regions: vec![RegionDecl {
            name: "atlantis".to_string(),
            institutions: vec![InstitutionDecl {
                name: "atlantis_power".to_string(),
                facilities: vec![
                    FacilityDecl::Source {
                        name: "mine".to_string(),
                        out_commodity: "natural_uranium".to_string(),
                        recipe: "nat_u".to_string(),
                        monthly_capacity: 120.0,
                        inventory_cap: 240.0,
                        ask_price: 1.2,
                    },
                    FacilityDecl::RecipeReactor {
                        name: "reactor".to_string(),
                        in_commodity: "natural_uranium".to_string(),
                        out_commodity: "spent_fuel".to_string(),
                        inventory_cap: 180.0,
                        monthly_capacity: 90.0,
                        bid_price: 2.0,
                        ask_price: 0.5,
                    },
                    FacilityDecl::Sink {
                        name: "repository".to_string(),
                        in_commodity: "spent_fuel".to_string(),
                        monthly_demand: 90.0,
                        bid_price: 1.0,
                        min_amount: 0.0,
                    },
                ],
            }],
        }],
    }
}

/// CLI entry point for the `example` subcommand.
pub fn run() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&scenario())?);
    Ok(())
}
