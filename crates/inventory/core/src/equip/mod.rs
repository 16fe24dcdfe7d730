//! Equip-slot resolution.
//!
//! [`table`] maps equip types to candidate slots declaratively; the
//! [`EquipSlotResolver`] chooses among them against current occupancy.
mod resolver;
pub mod table;

pub use resolver::EquipSlotResolver;
pub use table::{CandidateSlots, MAX_CANDIDATES, SlotRule, candidates, claims_both_hands, fits};
