use std::collections::BTreeMap;

use super::Plan;
use crate::slots::SlotAddress;

/// Units claimed at an address by an earlier plan of the same batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Claim {
    /// The address was empty and is now promised to a new stack.
    pub fresh: bool,
    pub quantity: u32,
}

/// Claims shared across the plans of one batch.
///
/// Fresh claims block the address outright; merge claims shrink the room left
/// on the existing stack.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reservations {
    claims: BTreeMap<SlotAddress, Claim>,
}

impl Reservations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&self, address: SlotAddress) -> Option<Claim> {
        self.claims.get(&address).copied()
    }

    pub fn is_blocked(&self, address: SlotAddress) -> bool {
        self.claims.get(&address).is_some_and(|claim| claim.fresh)
    }

    /// Units already promised onto the stack at `address`.
    pub fn merged(&self, address: SlotAddress) -> u32 {
        match self.claims.get(&address) {
            Some(claim) if !claim.fresh => claim.quantity,
            _ => 0,
        }
    }

    /// Blocks an address regardless of what currently occupies it.
    pub fn block(&mut self, address: SlotAddress) {
        self.claims.insert(
            address,
            Claim {
                fresh: true,
                quantity: 0,
            },
        );
    }

    /// Records every entry of an accepted plan.
    pub fn reserve(&mut self, plan: &Plan) {
        for entry in &plan.entries {
            let claim = self.claims.entry(entry.address).or_insert(Claim {
                fresh: !entry.is_merge(),
                quantity: 0,
            });
            claim.quantity += entry.quantity;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}
