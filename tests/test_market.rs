use fuelcycle::agent::AgentId;
use fuelcycle::market::MarketBook;
use fuelcycle::message::{Direction, Message};
use fuelcycle::transaction::{CommodityId, Transaction};

const COMMODITY: CommodityId = CommodityId(0);
const INSTITUTION: AgentId = AgentId(90);
const REGION: AgentId = AgentId(91);
const MARKET: AgentId = AgentId(92);

/// Park a bid at the market the way routing would: three hops up.
fn parked(originator: AgentId, tx: Transaction) -> Message {
    let mut msg = Message::new(originator, tx);
    for hop in [INSTITUTION, REGION, MARKET] {
        msg.set_next_dest(hop).unwrap();
        msg.send_on().unwrap();
    }
    msg
}

fn offer(originator: AgentId, amount: f64, price: f64) -> Message {
    parked(
        originator,
        Transaction::offer(COMMODITY, amount, 0.0, price).unwrap(),
    )
}

fn request(originator: AgentId, amount: f64, min_amount: f64, price: f64) -> Message {
    parked(
        originator,
        Transaction::request(COMMODITY, amount, min_amount, price).unwrap(),
    )
}

#[test]
fn crossing_bids_clear_at_the_offer_price() {
    let supplier = AgentId(1);
    let requester = AgentId(2);
    let mut book = MarketBook::new(COMMODITY);
    book.accept(offer(supplier, 100.0, 1.0));
    book.accept(request(requester, 60.0, 0.0, 2.0));

    let resolution = book.resolve(0).unwrap();

    assert_eq!(resolution.trades.len(), 1);
    let trade = &resolution.trades[0];
    assert_eq!(trade.supplier, supplier);
    assert_eq!(trade.requester, requester);
    assert_eq!(trade.amount, 60.0);
    assert_eq!(trade.unit_price, 1.0);

    // One DOWN per side, plus a zero notice for the offer residual.
    assert_eq!(resolution.downs.len(), 3);
    let down_req = &resolution.downs[0];
    assert_eq!(down_req.direction(), Direction::Down);
    assert_eq!(down_req.transaction().amount, -60.0);
    assert_eq!(down_req.transaction().supplier, Some(supplier));
    assert_eq!(down_req.transaction().requester, Some(requester));
    let down_off = &resolution.downs[1];
    assert_eq!(down_off.transaction().amount, 60.0);
    assert_eq!(down_off.transaction().unit_price, 1.0);

    assert_eq!(resolution.unfilled, 0);
    assert_eq!(book.open_requests(), 0);
    assert_eq!(book.open_offers(), 0);
}

#[test]
fn equal_prices_break_ties_by_agent_id() {
    let mut book = MarketBook::new(COMMODITY);
    book.accept(offer(AgentId(20), 50.0, 1.0));
    book.accept(offer(AgentId(10), 50.0, 1.0));
    book.accept(request(AgentId(30), 50.0, 0.0, 1.0));

    let resolution = book.resolve(0).unwrap();

    assert_eq!(resolution.trades.len(), 1);
    assert_eq!(resolution.trades[0].supplier, AgentId(10));
}

#[test]
fn cheapest_offers_fill_a_large_request_in_price_order() {
    let mut book = MarketBook::new(COMMODITY);
    book.accept(offer(AgentId(1), 50.0, 2.0));
    book.accept(offer(AgentId(2), 30.0, 1.0));
    book.accept(request(AgentId(3), 60.0, 0.0, 3.0));

    let resolution = book.resolve(0).unwrap();

    assert_eq!(resolution.trades.len(), 2);
    assert_eq!(resolution.trades[0].supplier, AgentId(2));
    assert_eq!(resolution.trades[0].amount, 30.0);
    assert_eq!(resolution.trades[0].unit_price, 1.0);
    assert_eq!(resolution.trades[1].supplier, AgentId(1));
    assert_eq!(resolution.trades[1].amount, 30.0);
    assert_eq!(resolution.trades[1].unit_price, 2.0);

    // Matched offer mass equals matched request mass.
    let matched: f64 = resolution.trades.iter().map(|t| t.amount).sum();
    assert_eq!(matched, 60.0);
}

#[test]
fn residual_below_min_amount_is_dropped_with_a_notice() {
    let requester = AgentId(2);
    let mut book = MarketBook::new(COMMODITY);
    book.accept(offer(AgentId(1), 40.0, 1.0));
    book.accept(request(requester, 60.0, 50.0, 2.0));

    let resolution = book.resolve(0).unwrap();

    assert_eq!(resolution.trades.len(), 1);
    assert_eq!(resolution.trades[0].amount, 40.0);
    assert_eq!(resolution.unfilled, 1);
    // Residual 20 < min 50: notified and gone from the book.
    let notice = resolution.downs.last().unwrap();
    assert_eq!(notice.transaction().amount, 0.0);
    assert_eq!(notice.transaction().requester, Some(requester));
    assert_eq!(book.open_requests(), 0);
}

#[test]
fn acceptable_residual_rolls_into_the_next_period() {
    let mut book = MarketBook::new(COMMODITY);
    book.accept(offer(AgentId(1), 40.0, 1.0));
    book.accept(request(AgentId(2), 60.0, 0.0, 2.0));

    let resolution = book.resolve(0).unwrap();
    assert_eq!(resolution.trades.len(), 1);
    assert_eq!(book.open_requests(), 1);

    // Fresh supply next period fills the carried residual.
    book.accept(offer(AgentId(1), 40.0, 1.0));
    let resolution = book.resolve(1).unwrap();
    assert_eq!(resolution.trades.len(), 1);
    assert_eq!(resolution.trades[0].amount, 20.0);
    assert_eq!(book.open_requests(), 0);
}

#[test]
fn uncrossed_books_notify_both_sides_with_zero_amounts() {
    let mut book = MarketBook::new(COMMODITY);
    book.accept(offer(AgentId(1), 100.0, 5.0));
    book.accept(request(AgentId(2), 60.0, 0.0, 3.0));

    let resolution = book.resolve(0).unwrap();

    assert!(resolution.trades.is_empty());
    assert_eq!(resolution.downs.len(), 2);
    for down in &resolution.downs {
        assert_eq!(down.direction(), Direction::Down);
        assert_eq!(down.transaction().amount, 0.0);
    }
    // The request survives into the next period; the offer does not.
    assert_eq!(book.open_requests(), 1);
    assert_eq!(book.open_offers(), 0);
}

#[test]
fn zero_amount_requests_are_dropped_silently() {
    let mut book = MarketBook::new(COMMODITY);
    book.accept(request(AgentId(2), 0.0, 0.0, 2.0));

    assert_eq!(book.open_requests(), 0);
    let resolution = book.resolve(0).unwrap();
    assert!(resolution.downs.is_empty());
    assert_eq!(resolution.unfilled, 0);
}

#[test]
fn no_self_trades() {
    let trader = AgentId(7);
    let mut book = MarketBook::new(COMMODITY);
    book.accept(offer(trader, 50.0, 1.0));
    book.accept(request(trader, 50.0, 0.0, 2.0));

    let resolution = book.resolve(0).unwrap();
    assert!(resolution.trades.is_empty());
}
