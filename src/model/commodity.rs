use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::material::Basis;

/// A named tradable category, cleared by exactly one market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CommodityDecl {
    /// Commodity name, e.g. "natural_uranium".
    pub name: String,
    /// Name of the declared market that clears this commodity.
    pub market: String,
}

/// A clearing market. One market may clear several commodities; each
/// commodity names exactly one market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MarketDecl {
    /// Market name, e.g. "uranium_market".
    pub name: String,
}

/// A named material template: species identifiers mapped to relative
/// quantities. Facilities instantiate recipes at a chosen total quantity;
/// the relative proportions are preserved by every split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RecipeDecl {
    /// Recipe name, e.g. "nat_u".
    pub name: String,
    /// Whether the composition counts atoms or mass units.
    pub basis: Basis,
    /// Unit tag for instantiated material, e.g. "kg".
    pub unit: String,
    /// Species identifier to relative quantity. Need not be normalized.
    pub composition: BTreeMap<String, f64>,
}
