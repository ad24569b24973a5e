use std::collections::VecDeque;

use crate::agent::AgentId;
use crate::engine::context::SimulationContext;
use crate::error::SimError;
use crate::material::Material;
use crate::message::Message;
use crate::model::facility::FacilityDecl;
use crate::transaction::{CommodityId, Transaction};

use super::{FacilityBehavior, FacilityKind, draw_manifest, queue_quantity};

/// Reference facility: requests an input commodity to refill `stocks`,
/// processes up to `monthly_capacity` of stocks into `inventory` each
/// tock, and ships cleared orders out of inventory.
///
/// Invariant: `stocks + inventory` never exceeds `inventory_cap`; the
/// tick request is sized against the free space so deliveries cannot
/// overflow it.
pub struct RecipeReactor {
    name: String,
    in_commodity: CommodityId,
    out_commodity: CommodityId,
    inventory_cap: f64,
    monthly_capacity: f64,
    bid_price: f64,
    ask_price: f64,
    /// Incoming raw material, FIFO.
    pub stocks: VecDeque<Material>,
    /// Processed output, FIFO.
    pub inventory: VecDeque<Material>,
    /// Cleared orders in which this facility was named supplier.
    pub orders_waiting: VecDeque<Transaction>,
    pub matched_orders: u32,
    pub unfilled_notices: u32,
}

impl RecipeReactor {
    pub fn new(
        name: impl Into<String>,
        in_commodity: CommodityId,
        out_commodity: CommodityId,
        inventory_cap: f64,
        monthly_capacity: f64,
        bid_price: f64,
        ask_price: f64,
    ) -> Self {
        Self {
            name: name.into(),
            in_commodity,
            out_commodity,
            inventory_cap,
            monthly_capacity,
            bid_price,
            ask_price,
            stocks: VecDeque::new(),
            inventory: VecDeque::new(),
            orders_waiting: VecDeque::new(),
            matched_orders: 0,
            unfilled_notices: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stocked_quantity(&self) -> f64 {
        queue_quantity(&self.stocks)
    }

    pub fn inventory_quantity(&self) -> f64 {
        queue_quantity(&self.inventory)
    }
}

impl FacilityBehavior for RecipeReactor {
    fn kind(&self) -> &'static str {
        "recipe_reactor"
    }

    fn handle_tick(&mut self, _period: u32) -> Result<Vec<Transaction>, SimError> {
        let mut bids = Vec::new();

        let free_space =
            (self.inventory_cap - self.inventory_quantity() - self.stocked_quantity()).max(0.0);
        if free_space > 0.0 {
            let want = free_space.min((self.monthly_capacity - self.stocked_quantity()).max(0.0));
            if want > 0.0 {
                bids.push(Transaction::request(self.in_commodity, want, 0.0, self.bid_price)?);
            }
        }

        let offered =
            (self.inventory_quantity() + self.monthly_capacity).min(self.inventory_cap);
        bids.push(Transaction::offer(self.out_commodity, offered, 0.0, self.ask_price)?);

        Ok(bids)
    }

    fn handle_tock(&mut self, _period: u32) -> Result<(), SimError> {
        let mut processed = 0.0;
        while processed < self.monthly_capacity {
            let Some(mut front) = self.stocks.pop_front() else {
                break;
            };
            let quantity = front.total_quantity();
            let room = self.monthly_capacity - processed;
            if quantity <= room {
                processed += quantity;
                self.inventory.push_back(front);
            } else {
                let split = front.extract(room)?;
                processed += split.total_quantity();
                self.inventory.push_back(split);
                self.stocks.push_front(front);
                break;
            }
        }
        Ok(())
    }

    fn receive_message(&mut self, self_id: AgentId, message: Message) -> Result<(), SimError> {
        let tx = message.transaction();
        if tx.supplier == Some(self_id) {
            if tx.magnitude() > 0.0 {
                self.orders_waiting.push_back(message.into_transaction());
            }
            Ok(())
        } else if tx.requester == Some(self_id) {
            if tx.magnitude() > 0.0 {
                self.matched_orders += 1;
            } else {
                self.unfilled_notices += 1;
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

    fn receive_material(
        &mut self,
        self_id: AgentId,
        tx: &Transaction,
        manifest: Vec<Material>,
    ) -> Result<(), SimError> {
        if tx.commodity != self.in_commodity {
            return Err(SimError::CommodityMismatch {
                agent: self_id,
                commodity: tx.commodity,
            });
        }
        self.stocks.extend(manifest);
        Ok(())
    }

    fn total_inventory(&self) -> f64 {
        self.stocked_quantity() + self.inventory_quantity()
    }
}

pub struct RecipeReactorKind;

impl FacilityKind for RecipeReactorKind {
    fn describe() -> (&'static str, &'static str) {
        (
            "recipe_reactor",
            "converts an input commodity into an output commodity under capacity and inventory limits",
        )
    }

    fn build(
        decl: &FacilityDecl,
        ctx: &SimulationContext,
    ) -> Result<Option<Box<dyn FacilityBehavior>>, SimError> {
        let FacilityDecl::RecipeReactor {
            name,
            in_commodity,
            out_commodity,
            inventory_cap,
            monthly_capacity,
            bid_price,
            ask_price,
        } = decl
        else {
            return Ok(None);
        };
        Ok(Some(Box::new(RecipeReactor::new(
            name,
            ctx.commodity_id(in_commodity)?,
            ctx.commodity_id(out_commodity)?,
            *inventory_cap,
            *monthly_capacity,
            *bid_price,
            *ask_price,
        ))))
    }
}
