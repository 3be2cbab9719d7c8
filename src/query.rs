use glam::Vec2;

use crate::{
    properties::{BodyId, ShapeId},
    world::World,
};

/// Result of a nearest-shape query.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hit {
    pub shape: ShapeId,
    pub body: BodyId,
    /// Signed distance to the surface, negative when the point is inside.
    pub distance: f32,
}

/// Point lookup over the colliders of a world.
///
/// Implementations must return the collider with the smallest signed distance
/// to `point` if it is at most `max_radius`, preferring the first collider in
/// id order on ties.
pub trait NearestShape {
    fn nearest(&self, world: &World, point: Vec2, max_radius: f32) -> Option<Hit>;
}

/// Brute force scan over every collider, `O(n)` per query.
#[derive(Copy, Clone, Debug, Default)]
pub struct LinearScan;

impl NearestShape for LinearScan {
    fn nearest(&self, world: &World, point: Vec2, max_radius: f32) -> Option<Hit> {
        let mut best: Option<Hit> = None;

        for collider in world.colliders() {
            let Some(body) = world.body(collider.body) else {
                continue;
            };
            let distance = collider.shape.distance_to(body.position, body.angle, point);
            if distance > max_radius || distance.is_nan() {
                continue;
            }

            // Strict comparison keeps the earlier collider on ties.
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(Hit {
                    shape: collider.id,
                    body: collider.body,
                    distance,
                });
            }
        }

        best
    }
}
