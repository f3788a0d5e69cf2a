//! Indicator widget record
//!
//! The visual layer draws widgets from these records and never stores state of its own.

use crate::indicator::{Indicator, IndicatorId, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub id: IndicatorId,
    pub name: String,
    pub position: Position,
    /// Latest accepted value, shown as-is
    pub value: String,
    pub unit: String,
    /// Diagram/Delete buttons revealed by clicking the value
    pub actions_visible: bool,
    /// Chart panel shown for this widget
    pub diagram_visible: bool,
}

impl Widget {
    pub fn from_indicator(indicator: &Indicator) -> Self {
        Self {
            id: indicator.id.clone(),
            name: indicator.name.clone(),
            position: indicator.position,
            value: indicator.value.clone(),
            unit: indicator.unit.clone(),
            actions_visible: false,
            diagram_visible: false,
        }
    }

    /// Text shown in the widget body.
    pub fn display_text(&self) -> String {
        if self.unit.is_empty() {
            self.value.clone()
        } else {
            format!("{} {}", self.value, self.unit)
        }
    }

    /// Id of the chart element belonging to this widget.
    pub fn chart_id(&self) -> String {
        format!("chart-{}", self.id)
    }
}
