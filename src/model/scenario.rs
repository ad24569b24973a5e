use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::commodity::{CommodityDecl, MarketDecl, RecipeDecl};
use super::facility::FacilityDecl;

/// A complete simulation scenario: the monthly horizon, the commodity and
/// market declarations, the recipe book, and the region → institution →
/// facility tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Scenario {
    /// Human-readable name for this scenario.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Number of months simulated, `t` in `[0, horizon)`.
    pub horizon: u32,
    /// Material recipes referenced by facilities.
    #[serde(default)]
    pub recipes: Vec<RecipeDecl>,
    /// Clearing markets.
    pub markets: Vec<MarketDecl>,
    /// Tradable commodities, each routed to one declared market.
    pub commodities: Vec<CommodityDecl>,
    /// The agent forest.
    pub regions: Vec<RegionDecl>,
}

/// A region: root of one tree in the agent forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RegionDecl {
    /// Unique region name.
    pub name: String,
    /// Institutions operating in this region.
    pub institutions: Vec<InstitutionDecl>,
}

/// An institution: owns and operates facilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InstitutionDecl {
    /// Unique institution name.
    pub name: String,
    /// Facilities owned by this institution.
    pub facilities: Vec<FacilityDecl>,
}
