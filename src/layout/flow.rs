use serde::Serialize;
use std::fmt::Write as _;

/// Vertical extent of a box edge at a fixed x.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeSpan {
    pub x: f32,
    pub top: f32,
    pub bottom: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "camelCase")]
pub enum PathCommand {
    MoveTo {
        to: (f32, f32),
    },
    CubicTo {
        c1: (f32, f32),
        c2: (f32, f32),
        to: (f32, f32),
    },
    LineTo {
        to: (f32, f32),
    },
    Close,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowPath {
    pub commands: Vec<PathCommand>,
}

/// Closed ribbon from the right edge of `source` to the left edge of `target`.
///
/// Top and bottom borders are S-shaped cubics whose control points both sit on
/// the horizontal midpoint; straight segments close the two ends.
pub fn ribbon_path(source: EdgeSpan, target: EdgeSpan) -> FlowPath {
    let cx = (source.x + target.x) / 2.0;
    FlowPath {
        commands: vec![
            PathCommand::MoveTo {
                to: (source.x, source.top),
            },
            PathCommand::CubicTo {
                c1: (cx, source.top),
                c2: (cx, target.top),
                to: (target.x, target.top),
            },
            PathCommand::LineTo {
                to: (target.x, target.bottom),
            },
            PathCommand::CubicTo {
                c1: (cx, target.bottom),
                c2: (cx, source.bottom),
                to: (source.x, source.bottom),
            },
            PathCommand::Close,
        ],
    }
}

impl FlowPath {
    pub fn to_svg_path_data(&self) -> String {
        let mut d = String::new();
        for command in &self.commands {
            if !d.is_empty() {
                d.push(' ');
            }
            // Writing into a String cannot fail.
            let _ = match command {
                PathCommand::MoveTo { to } => write!(d, "M {:.2} {:.2}", to.0, to.1),
                PathCommand::CubicTo { c1, c2, to } => write!(
                    d,
                    "C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2}",
                    c1.0, c1.1, c2.0, c2.1, to.0, to.1
                ),
                PathCommand::LineTo { to } => write!(d, "L {:.2} {:.2}", to.0, to.1),
                PathCommand::Close => write!(d, "Z"),
            };
        }
        d
    }

    /// Points the path passes through or is pulled towards, in command order.
    pub fn points(&self) -> Vec<(f32, f32)> {
        let mut points = Vec::new();
        for command in &self.commands {
            match command {
                PathCommand::MoveTo { to } | PathCommand::LineTo { to } => points.push(*to),
                PathCommand::CubicTo { c1, c2, to } => points.extend([*c1, *c2, *to]),
                PathCommand::Close => {}
            }
        }
        points
    }
}
