//! Counting and limit checks consulted before any spatial search.
//!
//! Counts cover the pools named by a [`PoolScope`]; ownership limits use
//! [`PoolScope::OWNED`], equip limits use the equipment pool only.

use std::collections::BTreeMap;

use crate::env::{InventoryEnv, ItemTemplate, LimitMode};
use crate::error::InventoryError;
use crate::slots::PoolScope;
use crate::state::{ItemStack, LimitCategoryId, PlayerContext, PlayerInventory, StackId, TemplateId};

/// Units already promised to earlier requests of the same batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingCounts {
    templates: BTreeMap<TemplateId, u32>,
    categories: BTreeMap<LimitCategoryId, u32>,
}

impl PendingCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, template: &ItemTemplate, quantity: u32) {
        *self.templates.entry(template.id).or_default() += quantity;
        if let Some(category) = template.limit_category {
            *self.categories.entry(category).or_default() += quantity;
        }
    }

    pub fn template(&self, id: TemplateId) -> u32 {
        self.templates.get(&id).copied().unwrap_or(0)
    }

    pub fn category(&self, id: LimitCategoryId) -> u32 {
        self.categories.get(&id).copied().unwrap_or(0)
    }
}

/// Sums the quantities of `template` across `scope`.
///
/// With `include_sockets`, socket-embedded sub-items of every stack in scope
/// are counted too (one unit per socket).
pub fn count_matching(
    inventory: &PlayerInventory,
    scope: PoolScope,
    template: TemplateId,
    exclude: Option<StackId>,
    include_sockets: bool,
) -> u32 {
    inventory
        .stacks_in(scope)
        .into_iter()
        .filter(|(_, stack)| Some(stack.id) != exclude)
        .map(|(_, stack)| {
            let own = if stack.template == template {
                stack.quantity
            } else {
                0
            };
            let socketed = if include_sockets {
                stack.socketed(template)
            } else {
                0
            };
            own + socketed
        })
        .sum()
}

/// Sums the quantities of every template tagged with `category` across `scope`,
/// skipping the stacks in `exclude`.
pub fn count_category(
    inventory: &PlayerInventory,
    env: &InventoryEnv<'_>,
    scope: PoolScope,
    category: LimitCategoryId,
    exclude: &[StackId],
) -> Result<u32, InventoryError> {
    let mut tagged: BTreeMap<TemplateId, bool> = BTreeMap::new();
    let mut total = 0u32;
    for (_, stack) in inventory.stacks_in(scope) {
        if exclude.contains(&stack.id) {
            continue;
        }
        let in_category = match tagged.get(&stack.template) {
            Some(known) => *known,
            None => {
                let hit = env.template(stack.template)?.limit_category == Some(category);
                tagged.insert(stack.template, hit);
                hit
            }
        };
        if in_category {
            total = total.saturating_add(stack.quantity);
        }
    }
    Ok(total)
}

/// Worst limit violation acquiring `quantity` more units would cause.
///
/// The absolute per-template cap and a `Have` category cap are both checked;
/// when both bind, the larger shortfall is reported.
pub fn acquire_violation(
    inventory: &PlayerInventory,
    env: &InventoryEnv<'_>,
    context: &PlayerContext,
    template: &ItemTemplate,
    quantity: u32,
    exclude: Option<StackId>,
    pending: &PendingCounts,
) -> Result<Option<InventoryError>, InventoryError> {
    let mut worst: Option<InventoryError> = None;

    if template.max_count > 0 {
        let owned = count_matching(inventory, PoolScope::OWNED, template.id, exclude, true)
            + pending.template(template.id);
        let wanted = owned.saturating_add(quantity);
        if wanted > template.max_count {
            worst = Some(InventoryError::AbsoluteLimitExceeded {
                template: template.id,
                shortfall: wanted - template.max_count,
            });
        }
    }

    if let Some(id) = template.limit_category {
        let category = env.category(id)?;
        if category.mode == LimitMode::Have {
            let owned = count_category(inventory, env, PoolScope::OWNED, id, exclude.as_slice())?
                + pending.category(id);
            let cap = category.effective_cap(context);
            let wanted = owned.saturating_add(quantity);
            if wanted > cap {
                let shortfall = wanted - cap;
                if worst.as_ref().and_then(InventoryError::shortfall).unwrap_or(0) < shortfall {
                    worst = Some(InventoryError::CategoryLimitExceeded {
                        category: id,
                        shortfall,
                    });
                }
            }
        }
    }

    Ok(worst)
}

/// Checks the absolute and category caps for acquiring `quantity` more units.
///
/// # Errors
///
/// `AbsoluteLimitExceeded` or `CategoryLimitExceeded` carrying the number of
/// units over the cap.
pub fn can_acquire_more(
    inventory: &PlayerInventory,
    env: &InventoryEnv<'_>,
    context: &PlayerContext,
    template: &ItemTemplate,
    quantity: u32,
    exclude: Option<StackId>,
) -> Result<(), InventoryError> {
    match acquire_violation(
        inventory,
        env,
        context,
        template,
        quantity,
        exclude,
        &PendingCounts::default(),
    )? {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}

/// Checks an `Equip` category cap before a stack lands in equipment.
///
/// Stacks in `exclude` are leaving equipment as part of the same change.
pub fn can_equip_more(
    inventory: &PlayerInventory,
    env: &InventoryEnv<'_>,
    context: &PlayerContext,
    template: &ItemTemplate,
    quantity: u32,
    exclude: &[StackId],
) -> Result<(), InventoryError> {
    let Some(id) = template.limit_category else {
        return Ok(());
    };
    let category = env.category(id)?;
    if category.mode != LimitMode::Equip {
        return Ok(());
    }
    let equipped = count_category(inventory, env, PoolScope::EQUIPMENT, id, exclude)?;
    let cap = category.effective_cap(context);
    let wanted = equipped.saturating_add(quantity);
    if wanted > cap {
        return Err(InventoryError::CategoryLimitExceeded {
            category: id,
            shortfall: wanted - cap,
        });
    }
    Ok(())
}

/// Free room on `target` for units of `template` with the given binding state.
///
/// Zero when the stacks cannot merge at all.
pub fn merge_room(target: &ItemStack, template: &ItemTemplate, bound: bool) -> u32 {
    let compatible = target.template == template.id
        && template.is_stackable()
        && target.bound == bound
        && !target.locked;
    if compatible {
        template.max_stack.saturating_sub(target.quantity)
    } else {
        0
    }
}
