//! Eligibility predicate: can this supply listing serve this demand listing?
//!
//! Rules run in a fixed order and short-circuit on the first failure:
//! region, breed, age range, then the two optional rules (sex, quantity)
//! that are only checked when enabled in [`MatchRules`].

use crate::types::{DemandListing, SupplyListing};

/// Toggles for the optional rules. Both are off by default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MatchRules {
    /// Require the supply's sex to satisfy the demand's sex filter.
    pub enforce_sex: bool,
    /// Require `supply.quantity >= demand.quantity`.
    pub enforce_quantity: bool,
}

impl MatchRules {
    /// Every rule enforced.
    pub fn strict() -> Self {
        Self {
            enforce_sex: true,
            enforce_quantity: true,
        }
    }

    pub fn eligible(&self, supply: &SupplyListing, demand: &DemandListing) -> bool {
        if !demand.targets.iter().any(|region| region.covers(&supply.location)) {
            return false;
        }
        if !demand.race.accepts(&supply.race) {
            return false;
        }
        let (age_min, age_max) = demand.age_bounds();
        if !(age_min <= supply.age && supply.age <= age_max) {
            return false;
        }
        if self.enforce_sex && !demand.sex.accepts(&supply.sex) {
            return false;
        }
        if self.enforce_quantity && supply.quantity < demand.quantity {
            return false;
        }
        true
    }
}

/// Eligibility under the default rules (region, breed, age).
pub fn eligible(supply: &SupplyListing, demand: &DemandListing) -> bool {
    MatchRules::default().eligible(supply, demand)
}
