use std::collections::BTreeMap;

use glam::Vec2;

use crate::{
    config::{BOUNDARY_THICKNESS, ELASTICITY, NODE_SIZE},
    error::{Result, SimulationError},
    properties::{
        BodyId, BodyKind, Collider, PivotId, PivotJoint, RigidBody2D, ShapeId, Spring, SpringId,
    },
    query::{Hit, LinearScan, NearestShape},
    shape::{Shape, ShapeKind},
};

/// Owns every body, collider and constraint of one simulation.
///
/// Ids are handed out from counters that only grow, so an id that was removed
/// never refers to a newer object. Maps are keyed by id, which keeps iteration
/// in insertion order.
#[derive(Debug, Clone)]
pub struct World {
    pub(crate) bodies: BTreeMap<BodyId, RigidBody2D>,
    pub(crate) colliders: BTreeMap<ShapeId, Collider>,
    pub(crate) springs: BTreeMap<SpringId, Spring>,
    pub(crate) pivots: BTreeMap<PivotId, PivotJoint>,
    boundary: Option<BodyId>,
    anchor: BodyId,
    node_size: f32,
    elasticity: f32,
    next_body: u32,
    next_shape: u32,
    next_spring: u32,
    next_pivot: u32,
}

/// Segment of the boundary in world space.
#[derive(Debug, Clone, Copy)]
pub struct BoundarySegment {
    pub a: Vec2,
    pub b: Vec2,
    /// Unit normal pointing into the boundary rectangle.
    pub normal: Vec2,
    pub thickness: f32,
    pub elasticity: f32,
}

/// Drawable state of one collider.
#[derive(Debug, Clone)]
pub struct ShapeView {
    pub id: ShapeId,
    pub body: BodyId,
    pub kind: BodyKind,
    pub shape: Shape,
    pub position: Vec2,
    pub angle: f32,
}

/// Read-only copy of what the renderer needs for one frame.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub shapes: Vec<ShapeView>,
    /// World-space endpoints of every spring.
    pub springs: Vec<(Vec2, Vec2)>,
}

impl World {
    pub fn new() -> Self {
        Self::with_node_size(NODE_SIZE)
    }

    /// `node_size` is the radius of circle nodes and half the side of box nodes.
    pub fn with_node_size(node_size: f32) -> Self {
        Self::with_node_settings(node_size, ELASTICITY)
    }

    /// Like [`World::with_node_size`], with the elasticity given to nodes
    /// made by [`World::create_body`].
    pub fn with_node_settings(node_size: f32, elasticity: f32) -> Self {
        let mut world = Self {
            bodies: BTreeMap::new(),
            colliders: BTreeMap::new(),
            springs: BTreeMap::new(),
            pivots: BTreeMap::new(),
            boundary: None,
            anchor: BodyId(0),
            node_size,
            elasticity: elasticity.clamp(0.0, 1.0),
            next_body: 0,
            next_shape: 0,
            next_spring: 0,
            next_pivot: 0,
        };
        let anchor = world.allocate_body_id();
        world
            .bodies
            .insert(anchor, RigidBody2D::new_kinematic(anchor, Vec2::ZERO));
        world.anchor = anchor;
        ftlog::info!("world created with mouse anchor {anchor}");
        world
    }

    /// Kinematic body that follows the pointer.
    pub fn anchor(&self) -> BodyId {
        self.anchor
    }

    pub fn node_size(&self) -> f32 {
        self.node_size
    }

    /// Elasticity of nodes made by [`World::create_body`].
    pub fn node_elasticity(&self) -> f32 {
        self.elasticity
    }

    /// Adds a dynamic node of the given kind with the node elasticity.
    pub fn create_body(&mut self, position: Vec2, kind: ShapeKind, mass: f32) -> Result<BodyId> {
        self.create_body_with_shape(position, kind.shape(self.node_size), mass, self.elasticity)
    }

    /// Adds a dynamic body owning a single collider.
    pub fn create_body_with_shape(
        &mut self,
        position: Vec2,
        shape: Shape,
        mass: f32,
        elasticity: f32,
    ) -> Result<BodyId> {
        if !mass.is_finite() || mass <= 0.0 {
            ftlog::warn!("rejected body with mass {mass}");
            return Err(SimulationError::InvalidMass);
        }
        if matches!(shape, Shape::Segment { .. }) {
            ftlog::warn!("rejected dynamic segment body");
            return Err(SimulationError::InvalidShape);
        }
        shape.validate()?;

        let moment_of_inertia = shape.moment_of_inertia(mass);
        if !moment_of_inertia.is_finite() || moment_of_inertia <= 0.0 {
            return Err(SimulationError::InvalidShape);
        }

        let id = self.allocate_body_id();
        self.bodies
            .insert(id, RigidBody2D::new(id, position, mass, moment_of_inertia));
        self.attach_collider(id, shape, elasticity);
        ftlog::debug!("created {id} at {position} with mass {mass}");
        Ok(id)
    }

    /// Removes the body, its colliders and every constraint naming it.
    /// Unknown ids and the mouse anchor are ignored.
    pub fn remove_body(&mut self, id: BodyId) {
        if id == self.anchor || self.bodies.remove(&id).is_none() {
            return;
        }

        self.colliders.retain(|_, c| c.body != id);
        let springs = self.springs.len();
        self.springs.retain(|_, s| !s.connects(id));
        let pivots = self.pivots.len();
        self.pivots.retain(|_, p| !p.connects(id));
        if self.boundary == Some(id) {
            self.boundary = None;
        }

        ftlog::debug!(
            "removed {id} with {} springs and {} pivots",
            springs - self.springs.len(),
            pivots - self.pivots.len()
        );
    }

    /// Replaces the boundary with four static segments around `[0, width] x [0, height]`.
    pub fn create_boundary(&mut self, width: f32, height: f32, elasticity: f32) -> BodyId {
        if let Some(old) = self.boundary.take() {
            self.remove_body(old);
        }

        let id = self.allocate_body_id();
        self.bodies.insert(id, RigidBody2D::new_static(id, Vec2::ZERO));

        // Clockwise on screen, so `(b - a).perp()` points inside.
        let corners = [
            Vec2::new(0.0, 0.0),
            Vec2::new(width, 0.0),
            Vec2::new(width, height),
            Vec2::new(0.0, height),
        ];
        for i in 0..corners.len() {
            let shape = Shape::Segment {
                a: corners[i],
                b: corners[(i + 1) % corners.len()],
                thickness: BOUNDARY_THICKNESS,
            };
            self.attach_collider(id, shape, elasticity);
        }

        self.boundary = Some(id);
        ftlog::debug!("created boundary {id} of {width}x{height}");
        id
    }

    pub fn boundary(&self) -> Option<BodyId> {
        self.boundary
    }

    pub fn boundary_segments(&self) -> Vec<BoundarySegment> {
        let Some(boundary) = self.boundary else {
            return vec![];
        };
        let Some(body) = self.bodies.get(&boundary) else {
            return vec![];
        };

        self.colliders
            .values()
            .filter(|c| c.body == boundary)
            .filter_map(|c| match c.shape {
                Shape::Segment { a, b, thickness } => {
                    let (a, b) = (body.local_to_world(a), body.local_to_world(b));
                    Some(BoundarySegment {
                        a,
                        b,
                        normal: (b - a).perp().normalize_or_zero(),
                        thickness,
                        elasticity: c.elasticity,
                    })
                }
                _ => None,
            })
            .collect()
    }

    /// Drops everything except the mouse anchor. Ids keep counting up.
    pub fn clear(&mut self) {
        let anchor = self.anchor;
        self.bodies.retain(|id, _| *id == anchor);
        self.colliders.clear();
        self.springs.clear();
        self.pivots.clear();
        self.boundary = None;
        ftlog::info!("world cleared");
    }

    pub fn create_spring(
        &mut self,
        rb1: BodyId,
        rb2: BodyId,
        rest_length: f32,
        stiffness: f32,
        damping: f32,
    ) -> Result<SpringId> {
        self.ensure_body(rb1)?;
        self.ensure_body(rb2)?;

        let id = SpringId(self.next_spring);
        self.next_spring += 1;
        self.springs.insert(
            id,
            Spring {
                id,
                rb1,
                rb2,
                anchor1: Vec2::ZERO,
                anchor2: Vec2::ZERO,
                rest_length,
                stiffness,
                damping,
            },
        );
        ftlog::debug!("created {id} between {rb1} and {rb2}");
        Ok(id)
    }

    pub fn remove_spring(&mut self, id: SpringId) {
        self.springs.remove(&id);
    }

    /// Pins `local_anchor` on `target` to `anchor`. An existing pivot on the
    /// same target is replaced.
    ///
    /// `anchor` must be kinematic and `target` dynamic, otherwise
    /// [`SimulationError::InvalidPivot`] is returned.
    pub fn create_pivot(&mut self, anchor: BodyId, target: BodyId, local_anchor: Vec2) -> Result<PivotId> {
        self.ensure_body(anchor)?;
        self.ensure_body(target)?;
        let anchor_kind = self.bodies.get(&anchor).map(|b| b.kind);
        let target_kind = self.bodies.get(&target).map(|b| b.kind);
        if anchor == target
            || anchor_kind != Some(BodyKind::Kinematic)
            || target_kind != Some(BodyKind::Dynamic)
        {
            ftlog::warn!("rejected pivot from {anchor} to {target}");
            return Err(SimulationError::InvalidPivot);
        }

        self.pivots.retain(|_, p| p.target != target);
        let id = PivotId(self.next_pivot);
        self.next_pivot += 1;
        self.pivots.insert(
            id,
            PivotJoint {
                id,
                anchor,
                target,
                local_anchor,
            },
        );
        ftlog::debug!("created {id} dragging {target}");
        Ok(id)
    }

    pub fn remove_pivot(&mut self, id: PivotId) {
        if self.pivots.remove(&id).is_some() {
            ftlog::debug!("removed {id}");
        }
    }

    pub fn remove_all_pivots(&mut self) {
        self.pivots.clear();
    }

    /// Closest collider surface within `max_radius` of `point`.
    pub fn nearest(&self, point: Vec2, max_radius: f32) -> Option<Hit> {
        LinearScan.nearest(self, point, max_radius)
    }

    /// Moves a kinematic or dynamic body directly. Static bodies stay put.
    pub fn set_body_position(&mut self, id: BodyId, position: Vec2) -> bool {
        match self.bodies.get_mut(&id) {
            Some(body) if body.kind != BodyKind::Static => {
                body.position = position;
                true
            }
            _ => false,
        }
    }

    pub fn world_to_local(&self, id: BodyId, point: Vec2) -> Option<Vec2> {
        self.bodies.get(&id).map(|b| b.world_to_local(point))
    }

    pub fn contains_body(&self, id: BodyId) -> bool {
        self.bodies.contains_key(&id)
    }

    pub fn contains_pivot(&self, id: PivotId) -> bool {
        self.pivots.contains_key(&id)
    }

    pub fn body(&self, id: BodyId) -> Option<&RigidBody2D> {
        self.bodies.get(&id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody2D> {
        self.bodies.get_mut(&id)
    }

    pub fn bodies(&self) -> impl Iterator<Item = &RigidBody2D> {
        self.bodies.values()
    }

    pub fn colliders(&self) -> impl Iterator<Item = &Collider> {
        self.colliders.values()
    }

    pub fn collider(&self, id: ShapeId) -> Option<&Collider> {
        self.colliders.get(&id)
    }

    pub fn springs(&self) -> impl Iterator<Item = &Spring> {
        self.springs.values()
    }

    pub fn pivots(&self) -> impl Iterator<Item = &PivotJoint> {
        self.pivots.values()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn dynamic_body_count(&self) -> usize {
        self.bodies.values().filter(|b| b.is_dynamic()).count()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    pub fn pivot_count(&self) -> usize {
        self.pivots.len()
    }

    pub fn snapshot(&self) -> Snapshot {
        let shapes = self
            .colliders
            .values()
            .filter_map(|c| {
                let body = self.bodies.get(&c.body)?;
                Some(ShapeView {
                    id: c.id,
                    body: c.body,
                    kind: body.kind,
                    shape: c.shape.clone(),
                    position: body.position,
                    angle: body.angle,
                })
            })
            .collect();

        let springs = self
            .springs
            .values()
            .filter_map(|s| {
                let rb1 = self.bodies.get(&s.rb1)?;
                let rb2 = self.bodies.get(&s.rb2)?;
                Some((rb1.local_to_world(s.anchor1), rb2.local_to_world(s.anchor2)))
            })
            .collect();

        Snapshot { shapes, springs }
    }

    fn ensure_body(&self, id: BodyId) -> Result<()> {
        if self.bodies.contains_key(&id) {
            Ok(())
        } else {
            ftlog::warn!("constraint references unknown {id}");
            Err(SimulationError::UnknownBody(id))
        }
    }

    fn allocate_body_id(&mut self) -> BodyId {
        let id = BodyId(self.next_body);
        self.next_body += 1;
        id
    }

    fn attach_collider(&mut self, body: BodyId, shape: Shape, elasticity: f32) -> ShapeId {
        let id = ShapeId(self.next_shape);
        self.next_shape += 1;
        self.colliders.insert(
            id,
            Collider {
                id,
                body,
                shape,
                elasticity: elasticity.clamp(0.0, 1.0),
            },
        );
        id
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
