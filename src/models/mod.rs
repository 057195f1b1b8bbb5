//! Core domain types shared by the extraction pipeline and the runtime engine.

pub mod context;
pub mod item;
pub mod rule;

pub use context::{DocumentContext, LayoutType};
pub use item::{parse_numeric, FieldKind, GenericItem, DEFAULT_CATEGORY};
pub use rule::{BusinessRule, RuleKind, INERT_THRESHOLD};
