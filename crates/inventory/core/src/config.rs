/// Inventory configuration constants and tunable parameters.
///
/// Slot layout constants are fixed at compile time; the remaining fields are
/// the starting sizes a freshly created [`crate::PlayerInventory`] receives.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InventoryConfig {
    /// Live backpack size for new characters.
    pub backpack_slots: u8,
    /// Live bank size for new characters.
    pub bank_slots: u8,
    /// Number of bank bag slots unlocked for new characters.
    pub bank_bag_slots: u8,
    /// Whether the reagent bank starts unlocked.
    pub reagent_bank_unlocked: bool,
    /// Upper bound on cascaded follow-up mutations (removals of drained stacks
    /// and children) the applier processes for a single request.
    pub max_apply_steps: u16,
}

impl InventoryConfig {
    // ===== compile-time slot layout (flat per-player array) =====
    pub const EQUIPMENT_SLOTS: u8 = 23;
    pub const EQUIPPED_BAG_SLOTS: u8 = 4;
    pub const REAGENT_BAG_SLOTS: u8 = 1;
    pub const MAX_BACKPACK_SLOTS: u8 = 24;
    pub const MAX_BANK_SLOTS: u8 = 36;
    pub const MAX_BANK_BAG_SLOTS: u8 = 7;
    pub const BUYBACK_SLOTS: u8 = 12;
    pub const REAGENT_BANK_SLOTS: u8 = 98;
    pub const CHILD_EQUIPMENT_SLOTS: u8 = 3;
    pub const VOID_STORAGE_SLOTS: u8 = 160;
    /// Largest capacity a single container may declare.
    pub const MAX_CONTAINER_SLOTS: u8 = 36;
    /// Number of socket-embedded sub-items a stack may carry.
    pub const MAX_SOCKETS: usize = 3;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BACKPACK_SLOTS: u8 = 16;
    pub const DEFAULT_BANK_SLOTS: u8 = 28;
    pub const DEFAULT_BANK_BAG_SLOTS: u8 = 0;
    pub const DEFAULT_MAX_APPLY_STEPS: u16 = 64;

    pub fn new() -> Self {
        Self {
            backpack_slots: Self::DEFAULT_BACKPACK_SLOTS,
            bank_slots: Self::DEFAULT_BANK_SLOTS,
            bank_bag_slots: Self::DEFAULT_BANK_BAG_SLOTS,
            reagent_bank_unlocked: false,
            max_apply_steps: Self::DEFAULT_MAX_APPLY_STEPS,
        }
    }

    pub fn with_backpack_slots(mut self, slots: u8) -> Self {
        self.backpack_slots = slots;
        self
    }

    pub fn with_bank_slots(mut self, slots: u8) -> Self {
        self.bank_slots = slots;
        self
    }

    pub fn with_bank_bag_slots(mut self, slots: u8) -> Self {
        self.bank_bag_slots = slots;
        self
    }

    pub fn with_reagent_bank(mut self, unlocked: bool) -> Self {
        self.reagent_bank_unlocked = unlocked;
        self
    }

    /// Clamps every tunable into the range the slot layout can address.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.backpack_slots = self.backpack_slots.min(Self::MAX_BACKPACK_SLOTS);
        self.bank_slots = self.bank_slots.min(Self::MAX_BANK_SLOTS);
        self.bank_bag_slots = self.bank_bag_slots.min(Self::MAX_BANK_BAG_SLOTS);
        self.max_apply_steps = self.max_apply_steps.max(1);
        self
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self::new()
    }
}
