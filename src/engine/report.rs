use std::collections::BTreeMap;

use crate::agent::AgentId;
use crate::market::TradeRecord;
use crate::transaction::CommodityId;

use super::context::SimulationContext;

/// One physical delivery. `quantity` is what actually shipped, which may
/// fall short of the cleared order on partial fulfillment.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentRecord {
    pub period: u32,
    pub commodity: CommodityId,
    pub supplier: AgentId,
    pub requester: AgentId,
    pub quantity: f64,
}

/// End-of-run facility snapshot.
#[derive(Debug, Clone)]
pub struct FacilitySummary {
    pub id: AgentId,
    pub name: String,
    pub kind: &'static str,
    pub inventory: f64,
}

/// Everything a completed run produced: the cleared-trade ledger, the
/// shipment log, the unfilled-request count, and final inventories.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub periods: u32,
    pub trades: Vec<TradeRecord>,
    pub shipments: Vec<ShipmentRecord>,
    pub unfilled: u32,
    pub facilities: Vec<FacilitySummary>,
}

impl RunReport {
    /// Total cleared mass for one commodity across the run.
    pub fn traded_mass(&self, commodity: CommodityId) -> f64 {
        self.trades
            .iter()
            .filter(|t| t.commodity == commodity)
            .map(|t| t.amount)
            .sum()
    }

    /// Total shipped mass for one commodity across the run.
    pub fn shipped_mass(&self, commodity: CommodityId) -> f64 {
        self.shipments
            .iter()
            .filter(|s| s.commodity == commodity)
            .map(|s| s.quantity)
            .sum()
    }

    pub fn print_summary(&self, ctx: &SimulationContext) {
        println!("\n{}", "═".repeat(72));
        println!("  Simulation Results — {} month(s)", self.periods);
        println!("{}", "═".repeat(72));

        let mut traded: BTreeMap<CommodityId, (f64, f64, u32)> = BTreeMap::new();
        for t in &self.trades {
            let entry = traded.entry(t.commodity).or_insert((0.0, 0.0, 0));
            entry.0 += t.amount;
            entry.2 += 1;
        }
        for s in &self.shipments {
            traded.entry(s.commodity).or_insert((0.0, 0.0, 0)).1 += s.quantity;
        }

        println!(
            "  {:<24} {:>10} {:>12} {:>12}",
            "Commodity", "Trades", "Cleared", "Shipped"
        );
        println!("  {}", "-".repeat(66));
        for (commodity, (cleared, shipped, trades)) in &traded {
            println!(
                "  {:<24} {:>10} {:>12.3} {:>12.3}",
                ctx.commodity_name(*commodity),
                trades,
                cleared,
                shipped,
            );
        }

        println!();
        println!(
            "  {:<24} {:<16} {:>12}",
            "Facility", "Kind", "Inventory"
        );
        println!("  {}", "-".repeat(66));
        for f in &self.facilities {
            println!("  {:<24} {:<16} {:>12.3}", f.name, f.kind, f.inventory);
        }

        println!("{}", "═".repeat(72));
        println!(
            "  {} trade(s), {} shipment(s), {} unfilled request(s)",
            self.trades.len(),
            self.shipments.len(),
            self.unfilled,
        );
    }
}
