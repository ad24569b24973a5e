pub mod clock;
pub mod context;
pub mod report;

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::agent::{AgentId, AgentKind};
use crate::error::SimError;
use crate::facilities::{self, FacilityBehavior};
use crate::market::MarketBook;
use crate::material::{MASS_TOLERANCE, Material};
use crate::message::Message;
use crate::model::scenario::Scenario;
use crate::transaction::CommodityId;

use clock::MonthClock;
use context::SimulationContext;
use report::{FacilitySummary, RunReport, ShipmentRecord};

/// The timekeeper: owns the frozen context, the facility behaviors keyed
/// by agent id, and one bid book per commodity, and drives the monthly
/// tick → resolve → tock cycle.
///
/// Every message is run to quiescence inside the phase that emitted it —
/// `route_up` walks it into a market book, `route_down` retraces the path
/// stack to the originator — so each phase ends with nothing in flight.
pub struct Engine {
    ctx: SimulationContext,
    behaviors: HashMap<AgentId, Box<dyn FacilityBehavior>>,
    books: BTreeMap<CommodityId, MarketBook>,
    clock: MonthClock,
    trades: Vec<crate::market::TradeRecord>,
    shipments: Vec<ShipmentRecord>,
    unfilled: u32,
}

impl Engine {
    /// Register every declared agent, commodity, and recipe, build the
    /// facility behaviors, and freeze the registries.
    pub fn build(scenario: &Scenario) -> Result<Self, SimError> {
        let mut ctx = SimulationContext::new();

        let mut market_ids: HashMap<&str, AgentId> = HashMap::new();
        for market in &scenario.markets {
            market_ids.insert(&market.name, ctx.register_market(&market.name)?);
        }
        for commodity in &scenario.commodities {
            let market = *market_ids.get(commodity.market.as_str()).ok_or_else(|| {
                SimError::UnknownMarket {
                    name: commodity.market.clone(),
                }
            })?;
            ctx.register_commodity(&commodity.name, market)?;
        }
        for recipe in &scenario.recipes {
            ctx.register_recipe(recipe.clone())?;
        }

        let mut behaviors: HashMap<AgentId, Box<dyn FacilityBehavior>> = HashMap::new();
        for region in &scenario.regions {
            let region_id = ctx.register_region(&region.name)?;
            for institution in &region.institutions {
                let inst_id = ctx.register_institution(&institution.name, region_id)?;
                for facility in &institution.facilities {
                    let fac_id = ctx.register_facility(facility.name(), inst_id)?;
                    behaviors.insert(fac_id, facilities::build_behavior(facility, &ctx)?);
                }
            }
        }

        ctx.freeze();
        Ok(Self::new(ctx, behaviors, scenario.horizon))
    }

    /// Assemble an engine from prebuilt parts. Bid books are created for
    /// every registered commodity. Mostly useful to tests injecting mock
    /// behaviors; `build` is the scenario path.
    pub fn new(
        ctx: SimulationContext,
        behaviors: HashMap<AgentId, Box<dyn FacilityBehavior>>,
        horizon: u32,
    ) -> Self {
        let books = ctx
            .commodity_ids()
            .map(|id| (id, MarketBook::new(id)))
            .collect();
        Self {
            ctx,
            behaviors,
            books,
            clock: MonthClock::new(horizon),
            trades: Vec::new(),
            shipments: Vec::new(),
            unfilled: 0,
        }
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut SimulationContext {
        &mut self.ctx
    }

    pub fn behavior(&self, id: AgentId) -> Option<&dyn FacilityBehavior> {
        self.behaviors.get(&id).map(|b| b.as_ref())
    }

    /// The most recently started period, for abort diagnostics.
    pub fn last_period(&self) -> u32 {
        self.clock.last_period()
    }

    /// Drive the simulation to the horizon.
    pub fn run(&mut self) -> Result<RunReport, SimError> {
        while let Some(period) = self.clock.next_period() {
            debug!(period, "tick");
            self.tick_phase(period)?;
            self.resolve_phase(period)?;
            debug!(period, "tock");
            self.tock_phase(period)?;
        }
        Ok(self.report())
    }

    // ── Tick: advertise ─────────────────────────────────────────────

    fn tick_phase(&mut self, period: u32) -> Result<(), SimError> {
        for fac_id in self.ctx.facilities_preorder() {
            let Some(behavior) = self.behaviors.get_mut(&fac_id) else {
                continue;
            };
            for tx in behavior.handle_tick(period)? {
                self.route_up(Message::new(fac_id, tx))?;
            }
        }
        Ok(())
    }

    /// Walk an UP message through the hierarchy into its market's book:
    /// facility → institution → region → market for the commodity.
    fn route_up(&mut self, mut msg: Message) -> Result<(), SimError> {
        loop {
            let holder = msg.holder();
            let (kind, parent) = {
                let entry = self.ctx.agent(holder)?;
                (entry.kind, entry.parent)
            };
            match kind {
                AgentKind::Facility | AgentKind::Institution => {
                    let dest = parent.ok_or(SimError::NoDestination { holder })?;
                    msg.set_next_dest(dest)?;
                    msg.send_on()?;
                }
                AgentKind::Region => {
                    let dest = self.ctx.market_for(msg.transaction().commodity)?;
                    msg.set_next_dest(dest)?;
                    msg.send_on()?;
                }
                AgentKind::Market => {
                    debug!(
                        originator = %msg.originator(),
                        hops = msg.path().len(),
                        "parked at market"
                    );
                    let commodity = msg.transaction().commodity;
                    let book = self.books.get_mut(&commodity).ok_or_else(|| {
                        SimError::UnknownCommodity {
                            name: commodity.to_string(),
                        }
                    })?;
                    book.accept(msg);
                    return Ok(());
                }
            }
        }
    }

    // ── Resolve: clear markets ──────────────────────────────────────

    fn resolve_phase(&mut self, period: u32) -> Result<(), SimError> {
        // BTreeMap keys give commodity-id order, the mandated market
        // resolution order.
        let commodities: Vec<CommodityId> = self.books.keys().copied().collect();
        for commodity in commodities {
            let Some(book) = self.books.get_mut(&commodity) else {
                continue;
            };
            let resolution = book.resolve(period)?;
            self.unfilled += resolution.unfilled;
            self.trades.extend(resolution.trades);
            for down in resolution.downs {
                self.route_down(down)?;
            }
        }
        Ok(())
    }

    /// Retrace a DOWN message along its path stack to the originating
    /// facility and deliver it there.
    fn route_down(&mut self, mut msg: Message) -> Result<(), SimError> {
        loop {
            let next = msg.send_on()?;
            match self.ctx.agent(next)?.kind {
                // Intermediate hops inspect the cleared transaction and
                // forward unchanged.
                AgentKind::Region | AgentKind::Institution | AgentKind::Market => {
                    debug!(hop = %next, "retracing");
                }
                AgentKind::Facility => {
                    let behavior = self
                        .behaviors
                        .get_mut(&next)
                        .ok_or(SimError::UnknownAgent { id: next })?;
                    return behavior.receive_message(next, msg);
                }
            }
        }
    }

    // ── Tock: execute ───────────────────────────────────────────────

    fn tock_phase(&mut self, period: u32) -> Result<(), SimError> {
        let before = self.total_material();

        for fac_id in self.ctx.facilities_preorder() {
            let Some(mut behavior) = self.behaviors.remove(&fac_id) else {
                continue;
            };
            let outcome = self.settle_facility(fac_id, behavior.as_mut(), period);
            self.behaviors.insert(fac_id, behavior);
            outcome?;
        }

        let after = self.total_material();
        if (after - before).abs() > MASS_TOLERANCE * before.abs().max(1.0) {
            return Err(SimError::Conservation { before, after });
        }
        Ok(())
    }

    /// Process one facility's tock, then ship every cleared order it was
    /// named supplier for. The manifest moves by value: drawn from the
    /// supplier, handed to the requester.
    fn settle_facility(
        &mut self,
        supplier: AgentId,
        behavior: &mut dyn FacilityBehavior,
        period: u32,
    ) -> Result<(), SimError> {
        behavior.handle_tock(period)?;

        for tx in behavior.take_shipments() {
            let requester = tx.requester.ok_or(SimError::MissingEndpoint { agent: supplier })?;
            let manifest = behavior.send_material(supplier, &tx)?;
            let quantity: f64 = manifest.iter().map(Material::total_quantity).sum();
            debug!(
                %supplier,
                %requester,
                quantity,
                ordered = tx.magnitude(),
                "shipping"
            );
            let dest = self
                .behaviors
                .get_mut(&requester)
                .ok_or(SimError::UnknownAgent { id: requester })?;
            dest.receive_material(requester, &tx, manifest)?;
            self.shipments.push(ShipmentRecord {
                period,
                commodity: tx.commodity,
                supplier,
                requester,
                quantity,
            });
        }
        Ok(())
    }

    // ── Accounting ──────────────────────────────────────────────────

    fn total_material(&self) -> f64 {
        self.behaviors.values().map(|b| b.total_inventory()).sum()
    }

    fn report(&self) -> RunReport {
        let facilities = self
            .ctx
            .facilities_preorder()
            .into_iter()
            .filter_map(|id| {
                let behavior = self.behaviors.get(&id)?;
                Some(FacilitySummary {
                    id,
                    name: self.ctx.agent_name(id).to_string(),
                    kind: behavior.kind(),
                    inventory: behavior.total_inventory(),
                })
            })
            .collect();
        RunReport {
            periods: self.clock.horizon(),
            trades: self.trades.clone(),
            shipments: self.shipments.clone(),
            unfilled: self.unfilled,
            facilities,
        }
    }
}
