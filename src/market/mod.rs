use crate::agent::AgentId;
use crate::error::SimError;
use crate::material::MASS_TOLERANCE;
use crate::message::Message;
use crate::transaction::CommodityId;

/// One cleared match: the ledger row the engine accumulates per period.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub period: u32,
    pub commodity: CommodityId,
    pub supplier: AgentId,
    pub requester: AgentId,
    pub amount: f64,
    pub unit_price: f64,
}

/// A resting bid: the UP message parked at the market plus the magnitude
/// still unmatched.
#[derive(Debug)]
struct BookEntry {
    message: Message,
    remaining: f64,
}

/// What one clearing pass produced: DOWN messages to dispatch (cleared
/// orders and zero-amount notices), the trade ledger rows, and how many
/// requests were dropped unfilled.
#[derive(Debug, Default)]
pub struct Resolution {
    pub downs: Vec<Message>,
    pub trades: Vec<TradeRecord>,
    pub unfilled: u32,
}

/// Per-commodity bid books. Offers and requests accumulate over a tick
/// phase; `resolve` runs the double auction and empties the offer book.
/// Requests whose residual still meets their `min_amount` roll forward to
/// the next period.
#[derive(Debug)]
pub struct MarketBook {
    commodity: CommodityId,
    offers: Vec<BookEntry>,
    requests: Vec<BookEntry>,
}

impl MarketBook {
    pub fn new(commodity: CommodityId) -> Self {
        Self {
            commodity,
            offers: Vec::new(),
            requests: Vec::new(),
        }
    }

    pub fn commodity(&self) -> CommodityId {
        self.commodity
    }

    pub fn open_requests(&self) -> usize {
        self.requests.len()
    }

    pub fn open_offers(&self) -> usize {
        self.offers.len()
    }

    /// Park an UP message in the matching book. Zero-amount entries are
    /// dropped silently.
    pub fn accept(&mut self, message: Message) {
        let magnitude = message.transaction().magnitude();
        if magnitude <= MASS_TOLERANCE {
            tracing::debug!(
                originator = %message.originator(),
                "dropping zero-amount bid"
            );
            return;
        }
        let entry = BookEntry {
            remaining: magnitude,
            message,
        };
        if entry.message.transaction().is_offer() {
            self.offers.push(entry);
        } else {
            self.requests.push(entry);
        }
    }

    /// Clear the books for one period.
    ///
    /// Offers sort by price ascending, requests by willingness to pay
    /// descending, ties broken by originator id for determinism. The
    /// cheapest offer and highest request match while they cross; each
    /// match emits one DOWN clone per side with supplier, requester,
    /// matched magnitude, and the offer's price written in.
    pub fn resolve(&mut self, period: u32) -> Result<Resolution, SimError> {
        self.offers.sort_by(|a, b| {
            let (ta, tb) = (a.message.transaction(), b.message.transaction());
            ta.unit_price
                .total_cmp(&tb.unit_price)
                .then(a.message.originator().cmp(&b.message.originator()))
        });
        self.requests.sort_by(|a, b| {
            let (ta, tb) = (a.message.transaction(), b.message.transaction());
            tb.unit_price
                .total_cmp(&ta.unit_price)
                .then(a.message.originator().cmp(&b.message.originator()))
        });

        let mut resolution = Resolution::default();
        let (mut i, mut j) = (0, 0);
        while i < self.offers.len() && j < self.requests.len() {
            let ask = self.offers[i].message.transaction().unit_price;
            let bid = self.requests[j].message.transaction().unit_price;
            if bid < ask {
                break;
            }
            let supplier = self.offers[i].message.originator();
            let requester = self.requests[j].message.originator();
            if supplier == requester {
                // No self-trades; the request stays open for other offers.
                j += 1;
                continue;
            }

            let matched = self.offers[i].remaining.min(self.requests[j].remaining);
            resolution
                .downs
                .push(cleared_clone(&self.requests[j].message, supplier, requester, -matched, ask)?);
            resolution
                .downs
                .push(cleared_clone(&self.offers[i].message, supplier, requester, matched, ask)?);
            resolution.trades.push(TradeRecord {
                period,
                commodity: self.commodity,
                supplier,
                requester,
                amount: matched,
                unit_price: ask,
            });
            tracing::debug!(%supplier, %requester, matched, price = ask, "matched");

            self.offers[i].remaining -= matched;
            self.requests[j].remaining -= matched;
            if self.offers[i].remaining <= MASS_TOLERANCE {
                i += 1;
            }
            if self.requests[j].remaining <= MASS_TOLERANCE {
                j += 1;
            }
        }

        // Every bid ending the period short of a full fill sends a
        // zero-amount notice back to its originator. Offers are then
        // dropped (supply is re-advertised every tick); a request stays
        // in the book while its residual is still an acceptable fill.
        for entry in self.offers.drain(..) {
            if entry.remaining > MASS_TOLERANCE {
                resolution.downs.push(unfilled_notice(&entry.message)?);
            }
        }
        let mut carried = Vec::new();
        for entry in self.requests.drain(..) {
            if entry.remaining <= MASS_TOLERANCE {
                continue;
            }
            resolution.downs.push(unfilled_notice(&entry.message)?);
            resolution.unfilled += 1;
            if entry.remaining >= entry.message.transaction().min_amount {
                carried.push(entry);
            }
        }
        self.requests = carried;

        Ok(resolution)
    }
}

/// Clone a resting message as a cleared DOWN order. The clone keeps the
/// sign of its book side; price settles at the offer's ask.
fn cleared_clone(
    resting: &Message,
    supplier: AgentId,
    requester: AgentId,
    amount: f64,
    unit_price: f64,
) -> Result<Message, SimError> {
    let mut down = resting.clone();
    {
        let tx = down.transaction_mut();
        tx.supplier = Some(supplier);
        tx.requester = Some(requester);
        tx.amount = amount;
        tx.unit_price = unit_price;
    }
    down.reverse_direction()?;
    Ok(down)
}

/// Zero-amount DOWN notice telling an originator its bid did not clear.
fn unfilled_notice(resting: &Message) -> Result<Message, SimError> {
    let mut down = resting.clone();
    {
        let originator = down.originator();
        let tx = down.transaction_mut();
        if tx.is_offer() {
            tx.supplier = Some(originator);
        } else {
            tx.requester = Some(originator);
        }
        tx.amount = 0.0;
    }
    down.reverse_direction()?;
    Ok(down)
}
