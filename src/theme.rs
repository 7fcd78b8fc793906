use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub text_color: String,
    pub border_color: String,
    pub border_width: f32,
    pub flow_fill: String,
    pub background: String,
    pub flow_opacity: f32,
    pub flow_highlight_opacity: f32,
    pub dim_opacity: f32,
}

impl Theme {
    /// Thin black borders and grey flows on white.
    pub fn classic() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            text_color: "black".to_string(),
            border_color: "black".to_string(),
            border_width: 0.5,
            flow_fill: "rgb(200,200,200)".to_string(),
            background: "#FFFFFF".to_string(),
            flow_opacity: 0.4,
            flow_highlight_opacity: 0.85,
            dim_opacity: 0.4,
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            text_color: "#1C2430".to_string(),
            border_color: "#7A8AA6".to_string(),
            border_width: 0.75,
            flow_fill: "#C7D2E5".to_string(),
            background: "#FFFFFF".to_string(),
            flow_opacity: 0.45,
            flow_highlight_opacity: 0.9,
            dim_opacity: 0.3,
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "classic" | "default" => Some(Self::classic()),
            "modern" => Some(Self::modern()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
