//! Per-view selection state: the axis → option choices made so far.
//!
//! One instance lives per product-detail view, created on product load and
//! discarded on navigation or a successful add-to-cart. It is plain data
//! passed into the resolution engine, never shared or mutated behind the
//! caller's back.

use crate::domain::catalog::{AxisId, OptionId, Product};

/// Outcome of a select attempt. A rejected select leaves the state untouched;
/// the option stays visible in the UI but inert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected,
    /// Option has zero stock while inventory is tracked.
    RejectedOutOfStock,
    /// Axis or option id not declared by the product.
    RejectedUnknown,
}

impl SelectOutcome {
    pub fn is_selected(&self) -> bool {
        matches!(self, SelectOutcome::Selected)
    }
}

/// Ordered per-axis choices. Re-selecting an axis replaces its entry in place,
/// so first-selection order is preserved for image resolution while the most
/// recent click per axis always wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    entries: Vec<(AxisId, OptionId)>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a choice for one axis, replacing any prior choice for it.
    /// Selecting a zero-stock option while the product tracks inventory is a
    /// rejected no-op, as is an option the product does not declare.
    pub fn select(&mut self, product: &Product, axis_id: AxisId, option_id: OptionId) -> SelectOutcome {
        let Some(option) = product.option(axis_id, option_id) else {
            return SelectOutcome::RejectedUnknown;
        };
        if product.track_inventory && !option.has_stock() {
            return SelectOutcome::RejectedOutOfStock;
        }
        match self.entries.iter_mut().find(|(a, _)| *a == axis_id) {
            Some(entry) => entry.1 = option_id,
            None => self.entries.push((axis_id, option_id)),
        }
        SelectOutcome::Selected
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_axis_selected(&self, axis_id: AxisId) -> bool {
        self.entries.iter().any(|(a, _)| *a == axis_id)
    }

    pub fn selected(&self, axis_id: AxisId) -> Option<OptionId> {
        self.entries.iter().find(|(a, _)| *a == axis_id).map(|(_, o)| *o)
    }

    /// Choices in first-selection order.
    pub fn entries(&self) -> impl Iterator<Item = (AxisId, OptionId)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
