use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A facility declaration. Discriminated by the "kind" field in JSON;
/// each variant carries the parameter block its builder consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FacilityDecl {
    /// Mines fresh material from a recipe and offers it on a market.
    Source {
        /// Unique facility name.
        name: String,
        /// Commodity this source offers.
        out_commodity: String,
        /// Recipe instantiated for each production batch.
        recipe: String,
        /// Maximum quantity produced per month.
        monthly_capacity: f64,
        /// Hard cap on held inventory; production tops up to this.
        inventory_cap: f64,
        /// Asking price per unit.
        #[serde(default)]
        ask_price: f64,
    },
    /// Terminal consumer: requests a commodity and absorbs deliveries.
    Sink {
        /// Unique facility name.
        name: String,
        /// Commodity this sink requests.
        in_commodity: String,
        /// Quantity requested per month.
        monthly_demand: f64,
        /// Willingness to pay per unit.
        #[serde(default)]
        bid_price: f64,
        /// Smallest acceptable fill; residuals below this are dropped
        /// with an unfilled notice instead of rolling forward.
        #[serde(default)]
        min_amount: f64,
    },
    /// Converts an input commodity into an output commodity under
    /// capacity and inventory limits.
    RecipeReactor {
        /// Unique facility name.
        name: String,
        /// Commodity requested to refill stocks.
        in_commodity: String,
        /// Commodity offered from processed inventory.
        out_commodity: String,
        /// Hard cap on stocks + inventory combined.
        inventory_cap: f64,
        /// Quantity processed from stocks per month.
        monthly_capacity: f64,
        /// Willingness to pay for the input commodity.
        #[serde(default)]
        bid_price: f64,
        /// Asking price for the output commodity.
        #[serde(default)]
        ask_price: f64,
    },
}

impl FacilityDecl {
    pub fn name(&self) -> &str {
        match self {
            FacilityDecl::Source { name, .. }
            | FacilityDecl::Sink { name, .. }
            | FacilityDecl::RecipeReactor { name, .. } => name,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            FacilityDecl::Source { .. } => "source",
            FacilityDecl::Sink { .. } => "sink",
            FacilityDecl::RecipeReactor { .. } => "recipe_reactor",
        }
    }
}
