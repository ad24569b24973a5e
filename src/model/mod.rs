pub mod commodity;
pub mod facility;
pub mod scenario;

pub use commodity::{CommodityDecl, MarketDecl, RecipeDecl};
pub use facility::FacilityDecl;
pub use scenario::{InstitutionDecl, RegionDecl, Scenario};
