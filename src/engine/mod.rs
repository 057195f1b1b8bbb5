//! Runtime evaluation engine.
//!
//! Owns everything that happens after extraction: session state per
//! layout, derived metrics, rule evaluation, and the store that fences
//! concurrent analysis cycles.

pub mod metrics;
pub mod rules;
pub mod session;
pub mod store;

use thiserror::Error;

use crate::models::LayoutType;

pub use metrics::DerivedMetrics;
pub use rules::RuleStatus;
pub use session::{LayoutState, Phase, Session};
pub use store::SessionStore;

/// Rejected session mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("session is already submitted")]
    AlreadySubmitted,

    #[error("unknown item id '{0}'")]
    UnknownItem(String),

    #[error("operation not available for {0} layout")]
    LayoutMismatch(LayoutType),
}
