use std::collections::VecDeque;

use crate::agent::AgentId;
use crate::engine::context::SimulationContext;
use crate::error::SimError;
use crate::material::Material;
use crate::message::Message;
use crate::model::facility::FacilityDecl;
use crate::transaction::{CommodityId, Transaction};

use super::{FacilityBehavior, FacilityKind, queue_quantity};

/// Terminal consumer. Requests a fixed monthly demand and absorbs every
/// delivery into one cumulative buffer during tock, so received parcels
/// stop existing as separate materials but their mass stays accounted.
pub struct SinkFacility {
    name: String,
    in_commodity: CommodityId,
    monthly_demand: f64,
    bid_price: f64,
    min_amount: f64,
    /// Deliveries awaiting absorption, FIFO.
    pub stocks: VecDeque<Material>,
    /// Everything absorbed so far.
    pub buffer: Option<Material>,
    /// Lifetime received quantity, for reporting.
    pub received: f64,
    pub matched_orders: u32,
    pub unfilled_notices: u32,
}

impl SinkFacility {
    pub fn new(
        name: impl Into<String>,
        in_commodity: CommodityId,
        monthly_demand: f64,
        bid_price: f64,
        min_amount: f64,
    ) -> Self {
        Self {
            name: name.into(),
            in_commodity,
            monthly_demand,
            bid_price,
            min_amount,
            stocks: VecDeque::new(),
            buffer: None,
            received: 0.0,
            matched_orders: 0,
            unfilled_notices: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FacilityBehavior for SinkFacility {
    fn kind(&self) -> &'static str {
        "sink"
    }

    fn handle_tick(&mut self, _period: u32) -> Result<Vec<Transaction>, SimError> {
        if self.monthly_demand <= 0.0 {
            return Ok(Vec::new());
        }
        Ok(vec![Transaction::request(
            self.in_commodity,
            self.monthly_demand,
            self.min_amount,
            self.bid_price,
        )?])
    }

    fn handle_tock(&mut self, _period: u32) -> Result<(), SimError> {
        while let Some(parcel) = self.stocks.pop_front() {
            match self.buffer.as_mut() {
                Some(buffer) => buffer.absorb(parcel)?,
                None => self.buffer = Some(parcel),
            }
        }
        Ok(())
    }

    fn receive_message(&mut self, self_id: AgentId, message: Message) -> Result<(), SimError> {
        let tx = message.transaction();
        if tx.requester == Some(self_id) {
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
        for parcel in manifest {
            self.received += parcel.total_quantity();
            self.stocks.push_back(parcel);
        }
        Ok(())
    }

    fn total_inventory(&self) -> f64 {
        let buffered = self.buffer.as_ref().map_or(0.0, Material::total_quantity);
        buffered + queue_quantity(&self.stocks)
    }
}

pub struct SinkKind;

impl FacilityKind for SinkKind {
    fn describe() -> (&'static str, &'static str) {
        (
            "sink",
            "terminal consumer; requests a commodity and absorbs deliveries",
        )
    }

    fn build(
        decl: &FacilityDecl,
        ctx: &SimulationContext,
    ) -> Result<Option<Box<dyn FacilityBehavior>>, SimError> {
        let FacilityDecl::Sink {
            name,
            in_commodity,
            monthly_demand,
            bid_price,
            min_amount,
        } = decl
        else {
            return Ok(None);
        };
        Ok(Some(Box::new(SinkFacility::new(
            name,
            ctx.commodity_id(in_commodity)?,
            *monthly_demand,
            *bid_price,
            *min_amount,
        ))))
    }
}
