//! One interactive session: extracted document + live state + lifecycle.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{BusinessRule, DocumentContext, GenericItem, LayoutType, DEFAULT_CATEGORY};

use super::metrics::{self, DerivedMetrics};
use super::rules::{self, RuleStatus};
use super::EngineError;

/// Interactive state for the session's layout, chosen once at creation
/// and never changed afterwards.
#[derive(Debug, Clone)]
pub enum LayoutState {
    /// Form values keyed by item id, seeded from extracted values.
    Form { values: HashMap<String, String> },
    /// Cart quantities keyed by item id. Absent means zero; quantities
    /// are never stored as zero.
    Catalog { quantities: HashMap<String, u32> },
    /// Checklist check state. Un-toggling stores an explicit `false`.
    Checklist { checked: HashMap<String, bool> },
}

impl LayoutState {
    fn layout(&self) -> LayoutType {
        match self {
            LayoutState::Form { .. } => LayoutType::Form,
            LayoutState::Catalog { .. } => LayoutType::Catalog,
            LayoutState::Checklist { .. } => LayoutType::Checklist,
        }
    }
}

/// Session lifecycle. `Submitted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing,
    Submitted,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Editing => "editing",
            Phase::Submitted => "submitted",
        }
    }
}

/// One generated application instance.
///
/// Items and context are immutable after creation; only the layout state
/// and phase change, and only through the mutation methods below.
#[derive(Debug, Clone)]
pub struct Session {
    pub context: DocumentContext,
    pub items: Vec<GenericItem>,
    pub rule: Option<BusinessRule>,
    pub state: LayoutState,
    pub phase: Phase,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(
        context: DocumentContext,
        items: Vec<GenericItem>,
        rule: Option<BusinessRule>,
    ) -> Self {
        let state = match context.layout {
            LayoutType::Form => LayoutState::Form {
                values: items
                    .iter()
                    .map(|i| (i.id.clone(), i.value.clone()))
                    .collect(),
            },
            LayoutType::Catalog => LayoutState::Catalog {
                quantities: HashMap::new(),
            },
            LayoutType::Checklist => LayoutState::Checklist {
                checked: HashMap::new(),
            },
        };

        Self {
            context,
            items,
            rule,
            state,
            phase: Phase::Editing,
            created_at: Utc::now(),
            submitted_at: None,
        }
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Overwrite one form field value.
    pub fn set_field(&mut self, item_id: &str, value: String) -> Result<(), EngineError> {
        self.check_mutable(item_id)?;
        match &mut self.state {
            LayoutState::Form { values } => {
                values.insert(item_id.to_string(), value);
                Ok(())
            }
            other => Err(EngineError::LayoutMismatch(other.layout())),
        }
    }

    /// Add one unit of a catalog item to the cart.
    pub fn cart_increment(&mut self, item_id: &str) -> Result<(), EngineError> {
        self.check_mutable(item_id)?;
        match &mut self.state {
            LayoutState::Catalog { quantities } => {
                let qty = quantities.entry(item_id.to_string()).or_insert(0);
                *qty = qty.saturating_add(1);
                Ok(())
            }
            other => Err(EngineError::LayoutMismatch(other.layout())),
        }
    }

    /// Remove one unit; reaching zero removes the entry entirely.
    /// Decrementing an item not in the cart is a no-op.
    pub fn cart_decrement(&mut self, item_id: &str) -> Result<(), EngineError> {
        self.check_mutable(item_id)?;
        match &mut self.state {
            LayoutState::Catalog { quantities } => {
                match quantities.get(item_id).copied() {
                    Some(qty) if qty <= 1 => {
                        quantities.remove(item_id);
                    }
                    Some(qty) => {
                        quantities.insert(item_id.to_string(), qty - 1);
                    }
                    None => {}
                }
                Ok(())
            }
            other => Err(EngineError::LayoutMismatch(other.layout())),
        }
    }

    /// Flip a checklist item. First toggle checks it; un-toggling stores
    /// an explicit `false` rather than removing the entry.
    pub fn toggle(&mut self, item_id: &str) -> Result<(), EngineError> {
        self.check_mutable(item_id)?;
        match &mut self.state {
            LayoutState::Checklist { checked } => {
                let entry = checked.entry(item_id.to_string()).or_insert(false);
                *entry = !*entry;
                Ok(())
            }
            other => Err(EngineError::LayoutMismatch(other.layout())),
        }
    }

    /// The single terminal transition. Fails if already submitted.
    pub fn submit(&mut self) -> Result<(), EngineError> {
        if self.phase == Phase::Submitted {
            return Err(EngineError::AlreadySubmitted);
        }
        self.phase = Phase::Submitted;
        self.submitted_at = Some(Utc::now());
        Ok(())
    }

    fn check_mutable(&self, item_id: &str) -> Result<(), EngineError> {
        if self.phase == Phase::Submitted {
            return Err(EngineError::AlreadySubmitted);
        }
        if !self.items.iter().any(|i| i.id == item_id) {
            return Err(EngineError::UnknownItem(item_id.to_string()));
        }
        Ok(())
    }

    // ── Read model ──────────────────────────────────────────────────────

    /// Items grouped by category in first-seen order. Empty categories
    /// group under "General".
    pub fn grouped(&self) -> Vec<(String, Vec<&GenericItem>)> {
        let mut groups: Vec<(String, Vec<&GenericItem>)> = Vec::new();
        for item in &self.items {
            let category = if item.category.trim().is_empty() {
                DEFAULT_CATEGORY
            } else {
                item.category.as_str()
            };
            match groups.iter_mut().find(|(name, _)| name == category) {
                Some((_, members)) => members.push(item),
                None => groups.push((category.to_string(), vec![item])),
            }
        }
        groups
    }

    pub fn metrics(&self) -> DerivedMetrics {
        metrics::compute(&self.items, &self.state)
    }

    pub fn tracked_value(&self) -> f64 {
        metrics::tracked_value(&self.items, &self.state)
    }

    /// Current rule status, absent when no rule was captured.
    pub fn rule_status(&self) -> Option<RuleStatus> {
        self.rule
            .as_ref()
            .map(|rule| rules::evaluate(rule, self.tracked_value()))
    }
}
