use std::collections::{BTreeMap, HashMap};

use crate::agent::{AgentArena, AgentEntry, AgentId, AgentKind};
use crate::error::SimError;
use crate::model::commodity::RecipeDecl;
use crate::transaction::CommodityId;

struct CommodityEntry {
    name: String,
    market: AgentId,
}

/// The process-wide registries, made explicit: the agent arena, the
/// commodity table, and the recipe book. Written only during scenario
/// load; `freeze` flips it read-only before the first tick, after which
/// any registration is a `RegistryFrozen` error.
pub struct SimulationContext {
    agents: AgentArena,
    commodities: Vec<CommodityEntry>,
    commodity_ids: HashMap<String, CommodityId>,
    recipes: BTreeMap<String, RecipeDecl>,
    frozen: bool,
}

impl SimulationContext {
    pub fn new() -> Self {
        Self {
            agents: AgentArena::default(),
            commodities: Vec::new(),
            commodity_ids: HashMap::new(),
            recipes: BTreeMap::new(),
            frozen: false,
        }
    }

    // ── Registration (load phase only) ──────────────────────────────

    fn ensure_open(&self, name: &str) -> Result<(), SimError> {
        if self.frozen {
            return Err(SimError::RegistryFrozen {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    pub fn register_market(&mut self, name: &str) -> Result<AgentId, SimError> {
        self.ensure_open(name)?;
        Ok(self.agents.insert(name, AgentKind::Market, None))
    }

    pub fn register_region(&mut self, name: &str) -> Result<AgentId, SimError> {
        self.ensure_open(name)?;
        Ok(self.agents.insert(name, AgentKind::Region, None))
    }

    pub fn register_institution(&mut self, name: &str, parent: AgentId) -> Result<AgentId, SimError> {
        self.ensure_open(name)?;
        Ok(self.agents.insert(name, AgentKind::Institution, Some(parent)))
    }

    pub fn register_facility(&mut self, name: &str, parent: AgentId) -> Result<AgentId, SimError> {
        self.ensure_open(name)?;
        Ok(self.agents.insert(name, AgentKind::Facility, Some(parent)))
    }

    pub fn register_commodity(&mut self, name: &str, market: AgentId) -> Result<CommodityId, SimError> {
        self.ensure_open(name)?;
        let id = CommodityId(self.commodities.len() as u32);
        self.commodities.push(CommodityEntry {
            name: name.to_string(),
            market,
        });
        self.commodity_ids.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn register_recipe(&mut self, recipe: RecipeDecl) -> Result<(), SimError> {
        self.ensure_open(&recipe.name)?;
        self.recipes.insert(recipe.name.clone(), recipe);
        Ok(())
    }

    /// Flip the registries read-only. Called once, before the first tick.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    // ── Lookups ─────────────────────────────────────────────────────

    pub fn agent(&self, id: AgentId) -> Result<&AgentEntry, SimError> {
        self.agents.get(id).ok_or(SimError::UnknownAgent { id })
    }

    pub fn agent_name(&self, id: AgentId) -> &str {
        self.agents.get(id).map_or("?", |e| e.name.as_str())
    }

    pub fn agent_by_name(&self, name: &str) -> Option<AgentId> {
        self.agents.by_name(name)
    }

    pub fn commodity_id(&self, name: &str) -> Result<CommodityId, SimError> {
        self.commodity_ids
            .get(name)
            .copied()
            .ok_or_else(|| SimError::UnknownCommodity {
                name: name.to_string(),
            })
    }

    pub fn commodity_name(&self, id: CommodityId) -> &str {
        self.commodities
            .get(id.0 as usize)
            .map_or("?", |c| c.name.as_str())
    }

    /// The market agent clearing a commodity.
    pub fn market_for(&self, id: CommodityId) -> Result<AgentId, SimError> {
        self.commodities
            .get(id.0 as usize)
            .map(|c| c.market)
            .ok_or_else(|| SimError::UnknownCommodity {
                name: id.to_string(),
            })
    }

    pub fn commodity_ids(&self) -> impl Iterator<Item = CommodityId> + '_ {
        (0..self.commodities.len() as u32).map(CommodityId)
    }

    pub fn recipe(&self, name: &str) -> Result<&RecipeDecl, SimError> {
        self.recipes.get(name).ok_or_else(|| SimError::UnknownRecipe {
            name: name.to_string(),
        })
    }

    /// Facility ids in pre-order traversal of the region forest; this is
    /// the per-phase observation order.
    pub fn facilities_preorder(&self) -> Vec<AgentId> {
        self.agents.preorder(AgentKind::Facility)
    }
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self::new()
    }
}
