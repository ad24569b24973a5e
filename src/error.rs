use thiserror::Error;

use crate::agent::AgentId;
use crate::transaction::CommodityId;

/// Runtime failure taxonomy. Any of these aborts the current tick/tock
/// phase; the driver turns them into a structured diagnostic and exit
/// code 2. Scenario-shape problems are caught earlier by `validate`.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("message held by agent {holder} has no next destination")]
    NoDestination { holder: AgentId },

    #[error("circular send: agent {agent} addressed itself")]
    Circular { agent: AgentId },

    #[error("message is terminal and cannot be sent again")]
    TerminalMessage,

    #[error("message cannot change direction from its terminal state")]
    WrongDirection,

    #[error("agent {agent} received an order naming a different supplier")]
    NotSupplier { agent: AgentId },

    #[error("agent {agent} cannot trade commodity {commodity}")]
    CommodityMismatch {
        agent: AgentId,
        commodity: CommodityId,
    },

    #[error("agent {agent} received a delivery it never requested")]
    UnexpectedDelivery { agent: AgentId },

    #[error("mass accounting drift: {before} before settlement, {after} after")]
    Conservation { before: f64, after: f64 },

    #[error("registry is frozen; cannot register `{name}` after simulation start")]
    RegistryFrozen { name: String },

    #[error("cannot extract {requested} from a material holding {available}")]
    Extraction { requested: f64, available: f64 },

    #[error("cannot absorb {right} material into {left} material")]
    IncompatibleMaterial { left: String, right: String },

    #[error("transaction amount {amount} violates minimum {min_amount}")]
    AmountBelowMinimum { amount: f64, min_amount: f64 },

    #[error("cleared order at agent {agent} is missing its requester endpoint")]
    MissingEndpoint { agent: AgentId },

    #[error("unknown agent id {id}")]
    UnknownAgent { id: AgentId },

    #[error("unknown commodity `{name}`")]
    UnknownCommodity { name: String },

    #[error("unknown market `{name}`")]
    UnknownMarket { name: String },

    #[error("unknown recipe `{name}`")]
    UnknownRecipe { name: String },

    #[error("no facility builder matched kind `{kind}`")]
    UnknownKind { kind: String },
}
