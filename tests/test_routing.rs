use fuelcycle::agent::AgentId;
use fuelcycle::error::SimError;
use fuelcycle::message::{Direction, Message};
use fuelcycle::transaction::{CommodityId, Transaction};

const FACILITY: AgentId = AgentId(0);
const INSTITUTION: AgentId = AgentId(1);
const REGION: AgentId = AgentId(2);
const MARKET: AgentId = AgentId(3);

fn offer_message() -> Message {
    let tx = Transaction::offer(CommodityId(0), 100.0, 0.0, 1.0).unwrap();
    Message::new(FACILITY, tx)
}

/// Drive a fresh message up the canonical three-hop path to the market.
fn climb(msg: &mut Message) {
    for hop in [INSTITUTION, REGION, MARKET] {
        msg.set_next_dest(hop).unwrap();
        assert_eq!(msg.send_on().unwrap(), hop);
    }
}

#[test]
fn up_leg_records_every_hop_in_order() {
    let mut msg = offer_message();
    climb(&mut msg);

    assert_eq!(msg.direction(), Direction::Up);
    assert_eq!(msg.holder(), MARKET);
    assert_eq!(msg.path(), &[FACILITY, INSTITUTION, REGION]);
}

#[test]
fn down_leg_retraces_up_leg_exactly() {
    let mut msg = offer_message();
    climb(&mut msg);
    msg.reverse_direction().unwrap();

    let mut visited = Vec::new();
    visited.push(msg.send_on().unwrap());
    visited.push(msg.send_on().unwrap());
    assert_eq!(msg.direction(), Direction::Down);
    visited.push(msg.send_on().unwrap());

    assert_eq!(visited, vec![REGION, INSTITUTION, FACILITY]);
    assert_eq!(msg.direction(), Direction::Done);
    assert_eq!(msg.holder(), FACILITY);
}

#[test]
fn send_without_destination_fails() {
    let mut msg = offer_message();
    assert_eq!(
        msg.send_on(),
        Err(SimError::NoDestination { holder: FACILITY })
    );
}

#[test]
fn naming_the_current_holder_is_circular() {
    let mut msg = offer_message();
    assert_eq!(
        msg.set_next_dest(FACILITY),
        Err(SimError::Circular { agent: FACILITY })
    );
}

#[test]
fn sending_back_to_the_originator_is_circular() {
    let mut msg = offer_message();
    msg.set_next_dest(INSTITUTION).unwrap();
    msg.send_on().unwrap();
    msg.set_next_dest(FACILITY).unwrap();
    assert_eq!(msg.send_on(), Err(SimError::Circular { agent: FACILITY }));
}

#[test]
fn done_message_rejects_further_sends() {
    let mut msg = offer_message();
    climb(&mut msg);
    msg.reverse_direction().unwrap();
    while msg.direction() == Direction::Down {
        msg.send_on().unwrap();
    }
    assert_eq!(msg.send_on(), Err(SimError::TerminalMessage));
    assert_eq!(msg.reverse_direction(), Err(SimError::WrongDirection));
}

#[test]
fn set_next_dest_is_ignored_on_the_down_leg() {
    let mut msg = offer_message();
    climb(&mut msg);
    msg.reverse_direction().unwrap();

    // Quiet no-op: the stack still dictates the next hop.
    msg.set_next_dest(MARKET).unwrap();
    assert_eq!(msg.next_dest(), None);
    assert_eq!(msg.send_on().unwrap(), REGION);
}

#[test]
fn clone_retraces_the_same_path_without_observing_the_original() {
    let mut msg = offer_message();
    climb(&mut msg);

    let mut twin = msg.clone();
    twin.reverse_direction().unwrap();
    twin.transaction_mut().supplier = Some(FACILITY);

    let mut visited = Vec::new();
    while twin.direction() == Direction::Down {
        visited.push(twin.send_on().unwrap());
    }
    assert_eq!(visited, vec![REGION, INSTITUTION, FACILITY]);

    // The original still sits at the market, UP, with its stack intact.
    assert_eq!(msg.direction(), Direction::Up);
    assert_eq!(msg.holder(), MARKET);
    assert_eq!(msg.path(), &[FACILITY, INSTITUTION, REGION]);
    assert_eq!(msg.transaction().supplier, None);
}
