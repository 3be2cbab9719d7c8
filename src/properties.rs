use std::fmt;

use glam::Vec2;

use crate::shape::Shape;

macro_rules! id_type {
    ($name:ident, $prefix:literal) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub(crate) u32);

        impl $name {
            pub fn index(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

id_type!(BodyId, "body");
id_type!(ShapeId, "shape");
id_type!(SpringId, "spring");
id_type!(PivotId, "pivot");

/// How a body reacts to the solver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BodyKind {
    /// Moved by forces and contacts.
    Dynamic,
    /// Never moves.
    Static,
    /// Moved only by direct position assignment.
    Kinematic,
}

#[derive(Debug, Clone)]
pub struct RigidBody2D {
    pub id: BodyId,
    pub kind: BodyKind,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Orientation in radians.
    pub angle: f32,
    pub angular_velocity: f32,
    pub mass: f32,
    pub moment_of_inertia: f32,
    /// Accumulated for the current step, cleared after integration.
    pub force: Vec2,
}

impl RigidBody2D {
    pub fn new(id: BodyId, position: Vec2, mass: f32, moment_of_inertia: f32) -> Self {
        Self {
            id,
            kind: BodyKind::Dynamic,
            position,
            velocity: Vec2::ZERO,
            angle: 0.0,
            angular_velocity: 0.0,
            mass,
            moment_of_inertia,
            force: Vec2::ZERO,
        }
    }

    pub fn new_static(id: BodyId, position: Vec2) -> Self {
        Self {
            kind: BodyKind::Static,
            ..Self::new(id, position, f32::INFINITY, f32::INFINITY)
        }
    }

    pub fn new_kinematic(id: BodyId, position: Vec2) -> Self {
        Self {
            kind: BodyKind::Kinematic,
            ..Self::new(id, position, f32::INFINITY, f32::INFINITY)
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }

    /// Zero for static and kinematic bodies
    pub fn inverse_mass(&self) -> f32 {
        if self.is_dynamic() {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    pub fn inverse_inertia(&self) -> f32 {
        if self.is_dynamic() && self.moment_of_inertia.is_finite() && self.moment_of_inertia > 0.0 {
            1.0 / self.moment_of_inertia
        } else {
            0.0
        }
    }

    pub fn apply_force(&mut self, force: Vec2) {
        if self.is_dynamic() {
            self.force += force;
        }
    }

    /// World position of a point given relative to the body origin.
    pub fn local_to_world(&self, local: Vec2) -> Vec2 {
        self.position + Vec2::from_angle(self.angle).rotate(local)
    }

    pub fn world_to_local(&self, world: Vec2) -> Vec2 {
        Vec2::from_angle(-self.angle).rotate(world - self.position)
    }

    /// Velocity of a world-space point attached to the body.
    pub fn velocity_at(&self, world: Vec2) -> Vec2 {
        let r = world - self.position;
        self.velocity + r.perp() * self.angular_velocity
    }
}

/// Collision and query geometry attached to a body.
#[derive(Debug, Clone)]
pub struct Collider {
    pub id: ShapeId,
    pub body: BodyId,
    pub shape: Shape,
    /// Fraction of normal velocity kept after a bounce, in `[0, 1]`.
    pub elasticity: f32,
}

/// Damped spring between the origins of two bodies.
#[derive(Debug, Clone)]
pub struct Spring {
    pub id: SpringId,
    pub rb1: BodyId,
    pub rb2: BodyId,
    pub anchor1: Vec2,
    pub anchor2: Vec2,
    pub rest_length: f32,
    pub stiffness: f32,
    pub damping: f32,
}

impl Spring {
    pub fn connects(&self, body: BodyId) -> bool {
        self.rb1 == body || self.rb2 == body
    }
}

/// Point joint pinning `local_anchor` on `target` to the origin of `anchor`.
#[derive(Debug, Clone)]
pub struct PivotJoint {
    pub id: PivotId,
    pub anchor: BodyId,
    pub target: BodyId,
    pub local_anchor: Vec2,
}

impl PivotJoint {
    pub fn connects(&self, body: BodyId) -> bool {
        self.anchor == body || self.target == body
    }
}
