//! Startup configuration of the sandbox.
//!
//! All values are fixed for the lifetime of a [`crate::sandbox::Sandbox`].
//! Coordinates are screen space: origin in the top-left corner, y grows downward.

use glam::Vec2;

use crate::{
    error::{Result, SimulationError},
    shape::ShapeKind,
};

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 600.0;
/// Pulls toward the bottom of the screen.
pub const GRAVITY: Vec2 = Vec2::new(0.0, 900.0);
pub const NODE_MASS: f32 = 10.0;
/// Radius of circle nodes and half the side of box nodes.
pub const NODE_SIZE: f32 = 20.0;
pub const SPRING_STIFFNESS: f32 = 50.0;
pub const SPRING_DAMPING: f32 = 0.5;
pub const SPRING_REST_LENGTH: f32 = 100.0;
pub const ELASTICITY: f32 = 0.9;
pub const BOUNDARY_THICKNESS: f32 = 1.0;
pub const TIMESTEP: f32 = 1.0 / 60.0;

/// Values the sandbox is started with.
#[derive(Clone, Debug, PartialEq)]
pub struct SandboxConfig {
    pub width: f32,
    pub height: f32,
    pub gravity: Vec2,
    pub node_mass: f32,
    pub node_size: f32,
    pub spring_stiffness: f32,
    pub spring_damping: f32,
    pub spring_rest_length: f32,
    pub elasticity: f32,
    pub timestep: f32,
    /// Seed for spawn positions. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl SandboxConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Screen size, also the size of the boundary rectangle
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Checks that nodes built from this configuration are valid bodies.
    pub fn validate(&self) -> Result<()> {
        if !self.node_mass.is_finite() || self.node_mass <= 0.0 {
            return Err(SimulationError::InvalidMass);
        }
        ShapeKind::Circle.shape(self.node_size).validate()
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            gravity: GRAVITY,
            node_mass: NODE_MASS,
            node_size: NODE_SIZE,
            spring_stiffness: SPRING_STIFFNESS,
            spring_damping: SPRING_DAMPING,
            spring_rest_length: SPRING_REST_LENGTH,
            elasticity: ELASTICITY,
            timestep: TIMESTEP,
            seed: None,
        }
    }
}
