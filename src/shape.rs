use std::str::FromStr;

use glam::Vec2;

use crate::error::{Result, SimulationError};

/// Geometry of a collider in body-local space.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Box { half_extents: Vec2 },
    /// Ordered, convex, either winding.
    Polygon { vertices: Vec<Vec2> },
    /// Static geometry only. Solid on the `(b - a).perp()` side.
    Segment { a: Vec2, b: Vec2, thickness: f32 },
}

/// Shapes the sandbox knows how to spawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    Box,
    Triangle,
}

impl ShapeKind {
    /// Builds the node shape of this kind. `size` is the circle radius and the half side of boxes.
    pub fn shape(self, size: f32) -> Shape {
        match self {
            ShapeKind::Circle => Shape::Circle { radius: size },
            ShapeKind::Box => Shape::Box {
                half_extents: Vec2::splat(size),
            },
            // Base 2*size, height 2*size, centered on its centroid, apex pointing up.
            ShapeKind::Triangle => {
                let third = 2.0 * size / 3.0;
                Shape::Polygon {
                    vertices: vec![
                        Vec2::new(-size, third),
                        Vec2::new(size, third),
                        Vec2::new(0.0, -2.0 * third),
                    ],
                }
            }
        }
    }
}

impl FromStr for ShapeKind {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circle" => Ok(ShapeKind::Circle),
            "box" => Ok(ShapeKind::Box),
            "triangle" => Ok(ShapeKind::Triangle),
            _ => Err(SimulationError::InvalidShape),
        }
    }
}

impl Shape {
    /// Rejects degenerate geometry.
    pub fn validate(&self) -> Result<()> {
        let valid = match self {
            Shape::Circle { radius } => radius.is_finite() && *radius > 0.0,
            Shape::Box { half_extents } => {
                half_extents.is_finite() && half_extents.x > 0.0 && half_extents.y > 0.0
            }
            Shape::Polygon { vertices } => {
                vertices.len() >= 3
                    && vertices.iter().all(|v| v.is_finite())
                    && polygon_area(vertices).abs() > f32::EPSILON
            }
            Shape::Segment { a, b, thickness } => {
                a.is_finite() && b.is_finite() && a != b && *thickness >= 0.0
            }
        };

        if valid {
            Ok(())
        } else {
            Err(SimulationError::InvalidShape)
        }
    }

    /// Moment of inertia about the body origin for the given mass.
    pub fn moment_of_inertia(&self, mass: f32) -> f32 {
        match self {
            Shape::Circle { radius } => 0.5 * mass * radius * radius,
            Shape::Box { .. } | Shape::Polygon { .. } => polygon_moment(mass, &self.vertices()),
            Shape::Segment { a, b, .. } => {
                let center = (*a + *b) * 0.5;
                mass * (a.distance_squared(*b) / 12.0 + center.length_squared())
            }
        }
    }

    /// Local-space outline. Empty for circles, the two endpoints for segments.
    pub fn vertices(&self) -> Vec<Vec2> {
        match self {
            Shape::Circle { .. } => vec![],
            Shape::Box { half_extents: h } => vec![
                Vec2::new(-h.x, -h.y),
                Vec2::new(h.x, -h.y),
                Vec2::new(h.x, h.y),
                Vec2::new(-h.x, h.y),
            ],
            Shape::Polygon { vertices } => vertices.clone(),
            Shape::Segment { a, b, .. } => vec![*a, *b],
        }
    }

    pub fn world_vertices(&self, position: Vec2, angle: f32) -> Vec<Vec2> {
        let rotation = Vec2::from_angle(angle);
        self.vertices()
            .into_iter()
            .map(|v| position + rotation.rotate(v))
            .collect()
    }

    /// Signed distance from `point` to the surface, negative inside.
    pub fn distance_to(&self, position: Vec2, angle: f32, point: Vec2) -> f32 {
        match self {
            Shape::Circle { radius } => position.distance(point) - radius,
            Shape::Box { .. } | Shape::Polygon { .. } => {
                let outline = self.world_vertices(position, angle);
                let edge_distance = (0..outline.len())
                    .map(|i| {
                        let a = outline[i];
                        let b = outline[(i + 1) % outline.len()];
                        closest_point_on_segment(a, b, point).distance(point)
                    })
                    .fold(f32::INFINITY, f32::min);

                if contains_point(&outline, point) {
                    -edge_distance
                } else {
                    edge_distance
                }
            }
            Shape::Segment { thickness, .. } => {
                let ends = self.world_vertices(position, angle);
                closest_point_on_segment(ends[0], ends[1], point).distance(point) - thickness
            }
        }
    }

    /// Depth by which the shape reaches past the half-plane through `plane_point`
    /// whose free side is `normal` (unit length).
    pub fn penetration(&self, position: Vec2, angle: f32, plane_point: Vec2, normal: Vec2) -> Option<f32> {
        let separation = match self {
            Shape::Circle { radius } => (position - plane_point).dot(normal) - radius,
            _ => self
                .world_vertices(position, angle)
                .into_iter()
                .map(|v| (v - plane_point).dot(normal))
                .fold(f32::INFINITY, f32::min),
        };

        if separation < 0.0 {
            Some(-separation)
        } else {
            None
        }
    }
}

/// Signed area, positive for counter-clockwise winding in a y-up frame.
pub fn polygon_area(vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    (0..n)
        .map(|i| vertices[i].perp_dot(vertices[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}

fn polygon_moment(mass: f32, vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let cross = a.perp_dot(b).abs();
        numerator += cross * (a.dot(a) + a.dot(b) + b.dot(b));
        denominator += cross;
    }

    if denominator == 0.0 {
        return 0.0;
    }
    mass * numerator / (6.0 * denominator)
}

pub fn closest_point_on_segment(a: Vec2, b: Vec2, point: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return a;
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

// Even-odd ray cast, independent of winding.
fn contains_point(outline: &[Vec2], point: Vec2) -> bool {
    let mut inside = false;
    let mut j = outline.len() - 1;
    for i in 0..outline.len() {
        let (vi, vj) = (outline[i], outline[j]);
        if (vi.y > point.y) != (vj.y > point.y)
            && point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
