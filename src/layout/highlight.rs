use serde::Serialize;
use std::collections::BTreeSet;

use super::RankFlowLayout;

/// What the renderer should change for the current pointer focus.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HighlightState {
    pub focused: Option<String>,
    /// Item ids whose boxes and labels are dimmed.
    pub dim: BTreeSet<String>,
    /// Indices into [`RankFlowLayout::flows`] drawn at highlight opacity.
    pub brighten: BTreeSet<usize>,
    /// Hover text for the info field, when values are shown.
    pub info: Option<String>,
}

impl HighlightState {
    pub fn is_baseline(&self) -> bool {
        self.focused.is_none()
    }

    pub fn box_opacity(&self, layout: &RankFlowLayout, id: &str) -> f32 {
        if self.dim.contains(id) {
            layout.theme.dim_opacity
        } else {
            1.0
        }
    }

    pub fn flow_opacity(&self, layout: &RankFlowLayout, flow_index: usize) -> f32 {
        if self.brighten.contains(&flow_index) {
            layout.theme.flow_highlight_opacity
        } else {
            layout.theme.flow_opacity
        }
    }
}

fn format_info(count: f32, value: f32, decimals: u32) -> String {
    let factor = 10f32.powi(decimals.min(6) as i32);
    // Half-steps round towards +inf.
    let rounded = (value * factor + 0.5).floor() / factor;
    format!("count: {count}, value: {rounded}")
}

/// Hover policy. Holds nothing but the focused id, so it can be reset or
/// rebuilt at any time, including after a re-layout.
#[derive(Debug, Clone, Default)]
pub struct HighlightPolicy {
    focused: Option<String>,
    show_values: bool,
    value_decimals: u32,
}

impl HighlightPolicy {
    pub fn new(show_values: bool, value_decimals: u32) -> Self {
        Self {
            focused: None,
            show_values,
            value_decimals,
        }
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn focus(&mut self, layout: &RankFlowLayout, id: &str) -> HighlightState {
        self.focused = Some(id.to_string());
        let dim = layout
            .boxes
            .iter()
            .filter(|bx| bx.id() != id)
            .map(|bx| bx.id().to_string())
            .collect();
        let brighten = layout
            .flows
            .iter()
            .enumerate()
            .filter(|(_, flow)| flow.id == id)
            .map(|(idx, _)| idx)
            .collect();
        let info = if self.show_values {
            layout
                .boxes_for(id)
                .next()
                .map(|bx| format_info(bx.item.count, bx.item.value, self.value_decimals))
        } else {
            None
        };
        HighlightState {
            focused: Some(id.to_string()),
            dim,
            brighten,
            info,
        }
    }

    pub fn unfocus(&mut self) -> HighlightState {
        self.focused = None;
        HighlightState::default()
    }

    /// Recomputes the state for the current focus against a fresh layout.
    pub fn refresh(&mut self, layout: &RankFlowLayout) -> HighlightState {
        match self.focused.clone() {
            Some(id) => self.focus(layout, &id),
            None => HighlightState::default(),
        }
    }
}
