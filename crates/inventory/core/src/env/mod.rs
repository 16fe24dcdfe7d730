//! Traits describing read-only inventory data and event receivers.
//!
//! Oracles expose item templates and limit categories. Sinks receive committed
//! events. The [`Env`] aggregate bundles them so the engine can access
//! everything it needs without hard coupling to concrete implementations.
mod categories;
mod error;
mod items;
mod sinks;
mod snapshot;

pub use categories::{
    LimitBonus, LimitCategory, LimitCategoryOracle, LimitCondition, LimitMode,
};
pub use error::OracleError;
pub use items::{BagFamily, BindPolicy, EquipType, ItemOracle, ItemTemplate, TemplateFlags};
pub use sinks::{NotificationSink, PersistenceSink};
pub use snapshot::{CategoriesSnapshot, ContentSnapshot, TemplatesSnapshot};

use crate::apply::InventoryEvent;
use crate::state::{LimitCategoryId, PlayerId, TemplateId};

/// Aggregates the oracles and sinks consulted by the engine.
pub struct Env<'a, I, L, N, P>
where
    I: ItemOracle + ?Sized,
    L: LimitCategoryOracle + ?Sized,
    N: NotificationSink + ?Sized,
    P: PersistenceSink + ?Sized,
{
    items: Option<&'a I>,
    categories: Option<&'a L>,
    notifications: Option<&'a N>,
    persistence: Option<&'a P>,
}

impl<I, L, N, P> Clone for Env<'_, I, L, N, P>
where
    I: ItemOracle + ?Sized,
    L: LimitCategoryOracle + ?Sized,
    N: NotificationSink + ?Sized,
    P: PersistenceSink + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<I, L, N, P> Copy for Env<'_, I, L, N, P>
where
    I: ItemOracle + ?Sized,
    L: LimitCategoryOracle + ?Sized,
    N: NotificationSink + ?Sized,
    P: PersistenceSink + ?Sized,
{
}

pub type InventoryEnv<'a> = Env<
    'a,
    dyn ItemOracle + 'a,
    dyn LimitCategoryOracle + 'a,
    dyn NotificationSink + 'a,
    dyn PersistenceSink + 'a,
>;

impl<'a, I, L, N, P> Env<'a, I, L, N, P>
where
    I: ItemOracle + ?Sized,
    L: LimitCategoryOracle + ?Sized,
    N: NotificationSink + ?Sized,
    P: PersistenceSink + ?Sized,
{
    pub fn new(
        items: Option<&'a I>,
        categories: Option<&'a L>,
        notifications: Option<&'a N>,
        persistence: Option<&'a P>,
    ) -> Self {
        Self {
            items,
            categories,
            notifications,
            persistence,
        }
    }

    /// Oracles only; committed events are dropped.
    pub fn with_oracles(items: &'a I, categories: &'a L) -> Self {
        Self::new(Some(items), Some(categories), None, None)
    }

    pub fn with_all(
        items: &'a I,
        categories: &'a L,
        notifications: &'a N,
        persistence: &'a P,
    ) -> Self {
        Self::new(
            Some(items),
            Some(categories),
            Some(notifications),
            Some(persistence),
        )
    }

    pub fn empty() -> Self {
        Self::new(None, None, None, None)
    }

    /// Returns the ItemOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ItemsNotAvailable` if no item oracle was provided.
    pub fn items(&self) -> Result<&'a I, OracleError> {
        self.items.ok_or(OracleError::ItemsNotAvailable)
    }

    /// Returns the LimitCategoryOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::CategoriesNotAvailable` if no category oracle was provided.
    pub fn categories(&self) -> Result<&'a L, OracleError> {
        self.categories.ok_or(OracleError::CategoriesNotAvailable)
    }

    /// Looks up a template, failing on unknown ids.
    pub fn template(&self, id: TemplateId) -> Result<ItemTemplate, OracleError> {
        self.items()?
            .template(id)
            .ok_or(OracleError::TemplateNotFound(id))
    }

    pub fn category(&self, id: LimitCategoryId) -> Result<LimitCategory, OracleError> {
        self.categories()?
            .category(id)
            .ok_or(OracleError::CategoryNotFound(id))
    }

    /// Delivers committed events to whichever sinks are attached.
    pub fn publish(&self, owner: PlayerId, events: &[InventoryEvent]) {
        if events.is_empty() {
            return;
        }
        if let Some(sink) = self.notifications {
            sink.notify(owner, events);
        }
        if let Some(sink) = self.persistence {
            sink.persist(owner, events);
        }
    }
}

impl<'a> InventoryEnv<'a> {
    /// Borrows every oracle held by a content snapshot.
    pub fn from_snapshot(snapshot: &'a ContentSnapshot) -> Self {
        Env::new(
            Some(&snapshot.templates as &'a dyn ItemOracle),
            Some(&snapshot.categories as &'a dyn LimitCategoryOracle),
            None,
            None,
        )
    }

    pub fn with_sinks(
        self,
        notifications: &'a dyn NotificationSink,
        persistence: &'a dyn PersistenceSink,
    ) -> Self {
        Env {
            notifications: Some(notifications),
            persistence: Some(persistence),
            ..self
        }
    }
}
