use std::fmt;

use crate::agent::AgentId;
use crate::error::SimError;

/// Index into the commodity registry. Assigned at scenario load in
/// declaration order; markets resolve in ascending commodity id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommodityId(pub u32);

impl fmt::Display for CommodityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The value record of an intended exchange.
///
/// `amount` is signed: negative requests, positive offers. The sign is
/// fixed for the life of any message carrying the transaction; market
/// clearing rewrites the magnitude, never the sign. `supplier` and
/// `requester` start unset and are both written by the market before the
/// down-leg delivery of a cleared order.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub commodity: CommodityId,
    pub amount: f64,
    pub min_amount: f64,
    pub unit_price: f64,
    pub supplier: Option<AgentId>,
    pub requester: Option<AgentId>,
}

impl Transaction {
    /// An offer of `amount` (taken as a magnitude) at `unit_price`.
    pub fn offer(
        commodity: CommodityId,
        amount: f64,
        min_amount: f64,
        unit_price: f64,
    ) -> Result<Self, SimError> {
        Self::checked(commodity, amount.abs(), min_amount, unit_price)
    }

    /// A request for `amount` (taken as a magnitude) at `unit_price`.
    pub fn request(
        commodity: CommodityId,
        amount: f64,
        min_amount: f64,
        unit_price: f64,
    ) -> Result<Self, SimError> {
        Self::checked(commodity, -amount.abs(), min_amount, unit_price)
    }

    fn checked(
        commodity: CommodityId,
        amount: f64,
        min_amount: f64,
        unit_price: f64,
    ) -> Result<Self, SimError> {
        // |amount| >= min_amount >= 0 must hold from construction onward.
        if min_amount < 0.0 || amount.abs() < min_amount {
            return Err(SimError::AmountBelowMinimum { amount, min_amount });
        }
        Ok(Self {
            commodity,
            amount,
            min_amount,
            unit_price,
            supplier: None,
            requester: None,
        })
    }

    pub fn is_offer(&self) -> bool {
        self.amount > 0.0
    }

    pub fn is_request(&self) -> bool {
        self.amount < 0.0
    }

    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_below_the_minimum_fail_at_construction() {
        assert!(matches!(
            Transaction::offer(CommodityId(0), 30.0, 50.0, 1.0),
            Err(SimError::AmountBelowMinimum { .. })
        ));
        assert!(matches!(
            Transaction::request(CommodityId(0), 30.0, 50.0, 1.0),
            Err(SimError::AmountBelowMinimum { .. })
        ));
        assert!(matches!(
            Transaction::offer(CommodityId(0), 30.0, -1.0, 1.0),
            Err(SimError::AmountBelowMinimum { .. })
        ));
    }

    #[test]
    fn signs_follow_the_book_side() {
        let offer = Transaction::offer(CommodityId(0), 30.0, 0.0, 1.0).unwrap();
        assert!(offer.is_offer());
        assert_eq!(offer.amount, 30.0);

        let request = Transaction::request(CommodityId(0), 30.0, 0.0, 1.0).unwrap();
        assert!(request.is_request());
        assert_eq!(request.amount, -30.0);
        assert_eq!(request.magnitude(), 30.0);
    }
}
