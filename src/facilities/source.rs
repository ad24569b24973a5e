use std::collections::VecDeque;

use crate::agent::AgentId;
use crate::engine::context::SimulationContext;
use crate::error::SimError;
use crate::material::{MASS_TOLERANCE, Material};
use crate::message::Message;
use crate::model::commodity::RecipeDecl;
use crate::model::facility::FacilityDecl;
use crate::transaction::{CommodityId, Transaction};

use super::{FacilityBehavior, FacilityKind, draw_manifest, queue_quantity};

/// Mines fresh material. Each tick it tops its inventory up to the cap,
/// bounded by the monthly capacity, then offers what it can ship this
/// period. All production happens during tick; tock only moves material.
pub struct SourceFacility {
    name: String,
    out_commodity: CommodityId,
    recipe: RecipeDecl,
    monthly_capacity: f64,
    inventory_cap: f64,
    ask_price: f64,
    pub inventory: VecDeque<Material>,
    pub orders_waiting: VecDeque<Transaction>,
    /// Lifetime production, for reporting.
    pub produced: f64,
}

impl SourceFacility {
    pub fn new(
        name: impl Into<String>,
        out_commodity: CommodityId,
        recipe: RecipeDecl,
        monthly_capacity: f64,
        inventory_cap: f64,
        ask_price: f64,
    ) -> Self {
        Self {
            name: name.into(),
            out_commodity,
            recipe,
            monthly_capacity,
            inventory_cap,
            ask_price,
            inventory: VecDeque::new(),
            orders_waiting: VecDeque::new(),
            produced: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inventory_quantity(&self) -> f64 {
        queue_quantity(&self.inventory)
    }
}

impl FacilityBehavior for SourceFacility {
    fn kind(&self) -> &'static str {
        "source"
    }

    fn handle_tick(&mut self, _period: u32) -> Result<Vec<Transaction>, SimError> {
        let room = (self.inventory_cap - self.inventory_quantity()).max(0.0);
        let batch = room.min(self.monthly_capacity);
        if batch > MASS_TOLERANCE {
            self.inventory
                .push_back(Material::from_recipe(&self.recipe, batch));
            self.produced += batch;
        }

        let available = self.inventory_quantity().min(self.monthly_capacity);
        if available <= MASS_TOLERANCE {
            return Ok(Vec::new());
        }
        Ok(vec![Transaction::offer(
            self.out_commodity,
            available,
            0.0,
            self.ask_price,
        )?])
    }

    fn handle_tock(&mut self, _period: u32) -> Result<(), SimError> {
        Ok(())
    }

    fn receive_message(&mut self, self_id: AgentId, message: Message) -> Result<(), SimError> {
        let tx = message.transaction();
        if tx.supplier == Some(self_id) {
            if tx.magnitude() > 0.0 {
                self.orders_waiting.push_back(message.into_transaction());
            }
            Ok(())
        } else {
            Err(SimError::NotSupplier { agent: self_id })
        }
    }

    fn take_shipments(&mut self) -> Vec<Transaction> {
        self.orders_waiting.drain(..).collect()
    }

    fn send_material(&mut self, self_id: AgentId, tx: &Transaction) -> Result<Vec<Material>, SimError> {
        if tx.commodity != self.out_commodity {
            return Err(SimError::CommodityMismatch {
                agent: self_id,
                commodity: tx.commodity,
            });
        }
        draw_manifest(&mut self.inventory, tx.magnitude())
    }

    fn total_inventory(&self) -> f64 {
        self.inventory_quantity()
    }
}

pub struct SourceKind;

impl FacilityKind for SourceKind {
    fn describe() -> (&'static str, &'static str) {
        (
            "source",
            "mines fresh material from a recipe and offers it on a commodity market",
        )
    }

    fn build(
        decl: &FacilityDecl,
        ctx: &SimulationContext,
    ) -> Result<Option<Box<dyn FacilityBehavior>>, SimError> {
        let FacilityDecl::Source {
            name,
            out_commodity,
            recipe,
            monthly_capacity,
            inventory_cap,
            ask_price,
        } = decl
        else {
            return Ok(None);
        };
        Ok(Some(Box::new(SourceFacility::new(
            name,
            ctx.commodity_id(out_commodity)?,
            ctx.recipe(recipe)?.clone(),
            *monthly_capacity,
            *inventory_cap,
            *ask_price,
        ))))
    }
}
