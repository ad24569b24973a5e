use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::model::commodity::RecipeDecl;

/// Relative tolerance for mass accounting. Any `absorb`/`extract` pairing
/// must conserve total quantity within this bound.
pub const MASS_TOLERANCE: f64 = 1e-9;

/// Whether a composition counts atoms or mass units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Basis {
    Atom,
    Mass,
}

/// An owned, conserved quantity of stuff. The composition maps a species
/// identifier to a non-negative scalar; the routing core treats it as
/// opaque beyond the total.
///
/// Materials move by strict ownership hand-off: `extract` splits a new
/// material out of this one, `absorb` consumes another material entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    composition: BTreeMap<String, f64>,
    unit: String,
    basis: Basis,
}

impl Material {
    pub fn new(composition: BTreeMap<String, f64>, unit: impl Into<String>, basis: Basis) -> Self {
        Self {
            composition,
            unit: unit.into(),
            basis,
        }
    }

    /// Instantiate `quantity` units of a declared recipe, scaling its
    /// composition proportionally.
    pub fn from_recipe(recipe: &RecipeDecl, quantity: f64) -> Self {
        let total: f64 = recipe.composition.values().sum();
        let scale = if total > 0.0 { quantity / total } else { 0.0 };
        let composition = recipe
            .composition
            .iter()
            .map(|(species, qty)| (species.clone(), qty * scale))
            .collect();
        Self {
            composition,
            unit: recipe.unit.clone(),
            basis: recipe.basis,
        }
    }

    pub fn total_quantity(&self) -> f64 {
        self.composition.values().sum()
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn basis(&self) -> Basis {
        self.basis
    }

    pub fn composition(&self) -> &BTreeMap<String, f64> {
        &self.composition
    }

    pub fn is_empty(&self) -> bool {
        self.total_quantity() <= MASS_TOLERANCE
    }

    /// Consume `other` entirely, folding its composition into this one.
    /// Both materials must share unit and basis.
    pub fn absorb(&mut self, other: Material) -> Result<(), SimError> {
        if self.unit != other.unit || self.basis != other.basis {
            return Err(SimError::IncompatibleMaterial {
                left: format!("{}/{:?}", self.unit, self.basis),
                right: format!("{}/{:?}", other.unit, other.basis),
            });
        }
        for (species, qty) in other.composition {
            *self.composition.entry(species).or_insert(0.0) += qty;
        }
        Ok(())
    }

    /// Split off exactly `amount`, decrementing this material by the same.
    /// The split preserves the composition ratios (the recipe).
    pub fn extract(&mut self, amount: f64) -> Result<Material, SimError> {
        let total = self.total_quantity();
        if amount < 0.0 || amount > total + MASS_TOLERANCE * total.max(1.0) {
            return Err(SimError::Extraction {
                requested: amount,
                available: total,
            });
        }

        let fraction = if total > 0.0 {
            (amount / total).min(1.0)
        } else {
            0.0
        };
        let mut extracted = BTreeMap::new();
        for (species, qty) in self.composition.iter_mut() {
            extracted.insert(species.clone(), *qty * fraction);
            *qty *= 1.0 - fraction;
        }
        Ok(Material {
            composition: extracted,
            unit: self.unit.clone(),
            basis: self.basis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_species() -> Material {
        let mut comp = BTreeMap::new();
        comp.insert("U235".to_string(), 3.0);
        comp.insert("U238".to_string(), 97.0);
        Material::new(comp, "kg", Basis::Mass)
    }

    #[test]
    fn extract_then_absorb_restores_total() {
        let mut m = two_species();
        let before = m.total_quantity();
        let split = m.extract(40.0).unwrap();
        assert!((split.total_quantity() - 40.0).abs() <= MASS_TOLERANCE * 40.0);
        m.absorb(split).unwrap();
        assert!((m.total_quantity() - before).abs() <= MASS_TOLERANCE * before);
    }

    #[test]
    fn extract_preserves_ratios() {
        let mut m = two_species();
        let split = m.extract(50.0).unwrap();
        let ratio = split.composition()["U235"] / split.composition()["U238"];
        assert!((ratio - 3.0 / 97.0).abs() < 1e-12);
    }

    #[test]
    fn extract_rejects_overdraw_and_negative() {
        let mut m = two_species();
        assert!(matches!(m.extract(150.0), Err(SimError::Extraction { .. })));
        assert!(matches!(m.extract(-1.0), Err(SimError::Extraction { .. })));
    }

    #[test]
    fn absorb_rejects_basis_mismatch() {
        let mut m = two_species();
        let other = Material::new(BTreeMap::new(), "kg", Basis::Atom);
        assert!(matches!(
            m.absorb(other),
            Err(SimError::IncompatibleMaterial { .. })
        ));
    }
}
