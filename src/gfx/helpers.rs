//! Visual helpers: axes, grids and light markers drawn as colored lines

use crate::gfx::{resources::material::Color, scene::node::NodeId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Helper {
    /// Red, green and blue lines along X, Y and Z
    Axes { size: f32 },
    /// Square grid on the XZ plane
    Grid { size: f32, divisions: u32 },
    /// Marker drawn at the world position of a light node
    Light { light: NodeId, size: f32 },
}

/// A colored line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub from: [f32; 3],
    pub to: [f32; 3],
    pub color: Color,
}

impl Helper {
    /// Segments in the helper's local space
    ///
    /// Light markers have no local geometry of their own; see
    /// [`light_marker`] for the world-space segments.
    pub fn local_segments(&self) -> Vec<LineSegment> {
        match *self {
            Helper::Axes { size } => vec![
                LineSegment {
                    from: [0.0; 3],
                    to: [size, 0.0, 0.0],
                    color: Color::new(1.0, 0.0, 0.0),
                },
                LineSegment {
                    from: [0.0; 3],
                    to: [0.0, size, 0.0],
                    color: Color::new(0.0, 1.0, 0.0),
                },
                LineSegment {
                    from: [0.0; 3],
                    to: [0.0, 0.0, size],
                    color: Color::new(0.0, 0.0, 1.0),
                },
            ],
            Helper::Grid { size, divisions } => {
                let divs = divisions.max(1);
                let half = size * 0.5;
                let step = size / divs as f32;
                let color = Color::from_hex(0x888888);

                let mut segments = Vec::with_capacity(((divs + 1) * 2) as usize);
                for i in 0..=divs {
                    let k = -half + i as f32 * step;
                    segments.push(LineSegment {
                        from: [-half, 0.0, k],
                        to: [half, 0.0, k],
                        color,
                    });
                    segments.push(LineSegment {
                        from: [k, 0.0, -half],
                        to: [k, 0.0, half],
                        color,
                    });
                }
                segments
            }
            Helper::Light { .. } => Vec::new(),
        }
    }
}

/// Three-axis cross centered on `position`
pub fn light_marker(position: [f32; 3], size: f32, color: Color) -> Vec<LineSegment> {
    let [x, y, z] = position;
    let h = size * 0.5;
    vec![
        LineSegment {
            from: [x - h, y, z],
            to: [x + h, y, z],
            color,
        },
        LineSegment {
            from: [x, y - h, z],
            to: [x, y + h, z],
            color,
        },
        LineSegment {
            from: [x, y, z - h],
            to: [x, y, z + h],
            color,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_line_count() {
        let grid = Helper::Grid {
            size: 10.0,
            divisions: 10,
        };
        assert_eq!(grid.local_segments().len(), 22);
    }

    #[test]
    fn test_axes_lengths() {
        let axes = Helper::Axes { size: 2.0 };
        let segs = axes.local_segments();
        assert_eq!(segs[1].to, [0.0, 2.0, 0.0]);
    }
}
