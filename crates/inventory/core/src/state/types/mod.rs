pub mod common;
pub mod container;
pub mod item;

pub use common::{LimitCategoryId, PlayerId, StackId, TemplateId};
pub use container::Container;
pub use item::{ItemStack, StackLocation};
