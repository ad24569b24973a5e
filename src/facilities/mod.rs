pub mod recipe_reactor;
pub mod sink;
pub mod source;

use std::collections::VecDeque;

use crate::agent::AgentId;
use crate::engine::context::SimulationContext;
use crate::error::SimError;
use crate::material::{MASS_TOLERANCE, Material};
use crate::message::Message;
use crate::model::facility::FacilityDecl;
use crate::transaction::Transaction;

// ── Behavior contract ───────────────────────────────────────────────

/// The per-facility lifecycle every kind must honor. One instance per
/// declared facility, keyed by agent id in the engine.
///
/// `handle_tick` advertises supply and demand as transactions the engine
/// wraps into UP messages. `handle_tock` processes internal state before
/// the engine ships the cleared orders drained by `take_shipments`;
/// `send_material` builds the manifest and `receive_material` accepts it
/// on the other end, moving ownership through the engine.
pub trait FacilityBehavior: Send {
    fn kind(&self) -> &'static str;

    /// Advertise supply and demand for this period.
    fn handle_tick(&mut self, period: u32) -> Result<Vec<Transaction>, SimError>;

    /// Process internal state; runs before cleared orders ship.
    fn handle_tock(&mut self, period: u32) -> Result<(), SimError>;

    /// A DOWN message returning to this originator.
    fn receive_message(&mut self, self_id: AgentId, message: Message) -> Result<(), SimError>;

    /// Cleared orders awaiting shipment, in arrival order.
    fn take_shipments(&mut self) -> Vec<Transaction> {
        Vec::new()
    }

    /// Build a shipment manifest for a cleared order. Partial fulfillment
    /// is permitted; the manifest total may fall short of the order.
    fn send_material(&mut self, self_id: AgentId, tx: &Transaction) -> Result<Vec<Material>, SimError> {
        let _ = tx;
        Err(SimError::NotSupplier { agent: self_id })
    }

    /// Accept a delivered manifest.
    fn receive_material(
        &mut self,
        self_id: AgentId,
        tx: &Transaction,
        manifest: Vec<Material>,
    ) -> Result<(), SimError> {
        let _ = (tx, manifest);
        Err(SimError::UnexpectedDelivery { agent: self_id })
    }

    /// Total conserved quantity currently held, for the settlement audit.
    fn total_inventory(&self) -> f64;
}

// ── Kind registration ───────────────────────────────────────────────

/// Every facility kind bundles a builder and a catalogue entry.
pub trait FacilityKind {
    /// Kind tag and one-line description for the catalogue.
    fn describe() -> (&'static str, &'static str);

    /// Build a behavior for a declaration. Returns `None` if this kind
    /// does not handle the declaration.
    fn build(
        decl: &FacilityDecl,
        ctx: &SimulationContext,
    ) -> Result<Option<Box<dyn FacilityBehavior>>, SimError>;
}

/// Generates `build_behavior` and `kind_catalogue` from a single list of
/// FacilityKind types. Adding a type here without implementing
/// FacilityKind is a compile error.
macro_rules! register_facility_kinds {
    ($($Kind:ty),* $(,)?) => {
        /// Build the behavior instance for one facility declaration.
        pub fn build_behavior(
            decl: &FacilityDecl,
            ctx: &SimulationContext,
        ) -> Result<Box<dyn FacilityBehavior>, SimError> {
            $(
                if let Some(behavior) = <$Kind as FacilityKind>::build(decl, ctx)? {
                    return Ok(behavior);
                }
            )*
            Err(SimError::UnknownKind {
                kind: decl.kind_name().to_string(),
            })
        }

        /// All registered kinds with their descriptions.
        pub fn kind_catalogue() -> Vec<(&'static str, &'static str)> {
            vec![$(<$Kind as FacilityKind>::describe()),*]
        }
    };
}

register_facility_kinds!(
    source::SourceKind,
    sink::SinkKind,
    recipe_reactor::RecipeReactorKind,
);

// ── Shared container arithmetic ─────────────────────────────────────

/// Total quantity across a FIFO queue of materials.
pub(crate) fn queue_quantity(queue: &VecDeque<Material>) -> f64 {
    queue.iter().map(Material::total_quantity).sum()
}

/// Draw up to `target` out of a FIFO queue: whole parcels move as-is, the
/// parcel that would overshoot is split and its remainder stays in front.
pub(crate) fn draw_manifest(
    queue: &mut VecDeque<Material>,
    target: f64,
) -> Result<Vec<Material>, SimError> {
    let mut manifest = Vec::new();
    let mut outstanding = target;
    while outstanding > MASS_TOLERANCE {
        let Some(mut front) = queue.pop_front() else {
            break;
        };
        let quantity = front.total_quantity();
        if quantity <= outstanding {
            outstanding -= quantity;
            manifest.push(front);
        } else {
            let split = front.extract(outstanding)?;
            outstanding = 0.0;
            manifest.push(split);
            queue.push_front(front);
        }
    }
    Ok(manifest)
}
