use glam::{Mat2, Vec2};

use crate::{
    config::{GRAVITY, TIMESTEP},
    properties::{BodyId, PivotJoint, RigidBody2D, Spring},
    world::World,
};

/// Fixed timestep integrator and constraint solver.
#[derive(Clone, Debug)]
pub struct Simulator {
    spring: bool,
    collide: bool,
    gravity: Vec2,
    delta_time: f32,
    damping: f32,
    pivot_bias: f32,
    max_correction_speed: f32,
}

impl Simulator {
    /// Seconds simulated by one [`Simulator::simulation_step`].
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Advances `world` by one timestep.
    ///
    /// Forces are accumulated first, then velocities are integrated and the
    /// drag pivots are solved on the new velocities, positions follow with the
    /// corrected velocities (semi-implicit Euler) and finally every dynamic
    /// collider is pushed back inside the boundary.
    pub fn simulation_step(&self, world: &mut World) {
        self.accumulate_forces(world);
        self.integrate_velocities(world);
        self.solve_pivots(world);
        self.integrate_positions(world);

        if self.collide {
            self.resolve_boundary_contacts(world);
        }
    }

    fn accumulate_forces(&self, world: &mut World) {
        for rb in world.bodies.values_mut() {
            if rb.is_dynamic() {
                let weight = self.gravity * rb.mass;
                rb.apply_force(weight);
            }
        }

        if !self.spring {
            return;
        }

        let spring_forces: Vec<(BodyId, BodyId, Vec2)> = world
            .springs
            .values()
            .filter_map(|spring| {
                let rb1 = world.bodies.get(&spring.rb1)?;
                let rb2 = world.bodies.get(&spring.rb2)?;
                Some((spring.rb1, spring.rb2, Self::compute_spring_force(spring, rb1, rb2)))
            })
            .collect();

        for (rb1, rb2, force) in spring_forces {
            if let Some(rb) = world.bodies.get_mut(&rb1) {
                rb.apply_force(-force);
            }
            if let Some(rb) = world.bodies.get_mut(&rb2) {
                rb.apply_force(force);
            }
        }
    }

    /// Force acting on `rb2`; `rb1` receives the opposite.
    fn compute_spring_force(spring: &Spring, rb1: &RigidBody2D, rb2: &RigidBody2D) -> Vec2 {
        let p1 = rb1.local_to_world(spring.anchor1);
        let p2 = rb2.local_to_world(spring.anchor2);

        let direction_vec = p2 - p1;
        // Coincident anchors have no axis, so neither term contributes.
        let axis = direction_vec.normalize_or_zero();

        let stiffness = spring.stiffness.max(0.0);
        let stretch = direction_vec.length() - spring.rest_length;
        let relative_velocity = (rb2.velocity_at(p2) - rb1.velocity_at(p1)).dot(axis);

        axis * -(stiffness * stretch + spring.damping * relative_velocity)
    }

    fn integrate_velocities(&self, world: &mut World) {
        for rb in world.bodies.values_mut() {
            if rb.is_dynamic() {
                rb.velocity += rb.force / rb.mass * self.delta_time;
                rb.velocity *= self.damping;
                rb.angular_velocity *= self.damping;
            }
            rb.force = Vec2::ZERO;
        }
    }

    fn solve_pivots(&self, world: &mut World) {
        let pivots: Vec<PivotJoint> = world.pivots.values().cloned().collect();

        for pivot in pivots {
            let Some((anchor_position, anchor_velocity)) = world
                .bodies
                .get(&pivot.anchor)
                .map(|a| (a.position, a.velocity))
            else {
                continue;
            };
            let Some(target) = world.bodies.get_mut(&pivot.target) else {
                continue;
            };
            if !target.is_dynamic() {
                continue;
            }

            let point = target.local_to_world(pivot.local_anchor);
            let bias = self.pivot_bias_velocity(anchor_position - point);
            let relative_velocity = target.velocity_at(point) - anchor_velocity;

            let r = point - target.position;
            let impulse = Self::pivot_mass(target, r) * (bias - relative_velocity);

            target.velocity += impulse * target.inverse_mass();
            target.angular_velocity += r.perp_dot(impulse) * target.inverse_inertia();
        }
    }

    /// Velocity that closes a fraction of the pivot error per step, capped so a
    /// far away pointer cannot fling the body.
    fn pivot_bias_velocity(&self, error: Vec2) -> Vec2 {
        (error * self.pivot_bias / self.delta_time).clamp_length_max(self.max_correction_speed)
    }

    // Inverse of the point effective mass matrix K = m⁻¹ I + I⁻¹ [r]ᵀ[r].
    fn pivot_mass(rb: &RigidBody2D, r: Vec2) -> Mat2 {
        let inv_mass = rb.inverse_mass();
        let inv_inertia = rb.inverse_inertia();
        let off_diagonal = -inv_inertia * r.x * r.y;
        let k = Mat2::from_cols(
            Vec2::new(inv_mass + inv_inertia * r.y * r.y, off_diagonal),
            Vec2::new(off_diagonal, inv_mass + inv_inertia * r.x * r.x),
        );

        if k.determinant().abs() <= f32::EPSILON {
            return Mat2::ZERO;
        }
        k.inverse()
    }

    fn integrate_positions(&self, world: &mut World) {
        for rb in world.bodies.values_mut() {
            if rb.is_dynamic() {
                rb.position += rb.velocity * self.delta_time;
                rb.angle += rb.angular_velocity * self.delta_time;
            }
        }
    }

    fn resolve_boundary_contacts(&self, world: &mut World) {
        let segments = world.boundary_segments();
        if segments.is_empty() {
            return;
        }

        for collider in world.colliders.values() {
            let Some(rb) = world.bodies.get_mut(&collider.body) else {
                continue;
            };
            if !rb.is_dynamic() {
                continue;
            }

            for segment in segments.iter() {
                let surface = segment.a + segment.normal * segment.thickness;
                let Some(depth) =
                    collider
                        .shape
                        .penetration(rb.position, rb.angle, surface, segment.normal)
                else {
                    continue;
                };

                rb.position += segment.normal * depth;

                let normal_velocity = rb.velocity.dot(segment.normal);
                if normal_velocity < 0.0 {
                    let elasticity = collider.elasticity.min(segment.elasticity);
                    rb.velocity -= segment.normal * normal_velocity * (1.0 + elasticity);
                }
            }
        }
    }
}

/// Builder for `Simulator`
pub struct SimulatorBuilder {
    spring: bool,
    collide: bool,
    gravity: Vec2,
    delta_time: f32,
    damping: f32,
    pivot_bias: f32,
    max_correction_speed: f32,
}

impl SimulatorBuilder {
    /// Get a Instance of `SimulatorBuilder` with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// If springs should pull their bodies together
    pub fn spring(mut self, spring: bool) -> Self {
        self.spring = spring;
        self
    }

    /// If dynamic bodies should be kept inside the boundary
    pub fn collide(mut self, collide: bool) -> Self {
        self.collide = collide;
        self
    }

    /// Acceleration applied to every dynamic body. `Vec2::ZERO` disables gravity.
    pub fn gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Amount of damping that should be applied to the bodies movement
    /// `1.0` -> No Damping
    /// `0.0` -> No Movement
    pub fn damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    /// Fraction of the drag pivot error removed each step.
    /// Values close to `1.0` snap hard to the pointer, `0.0` never moves the body.
    pub fn pivot_bias(mut self, pivot_bias: f32) -> Self {
        self.pivot_bias = pivot_bias.clamp(0.0, 1.0);
        self
    }

    /// Upper bound for the velocity a drag pivot may request, in units per second.
    pub fn max_correction_speed(mut self, max_correction_speed: f32) -> Self {
        self.max_correction_speed = max_correction_speed;
        self
    }

    /// How much time a simulation step should simulate. (semi-implicit euler method)
    /// Bigger time steps result in faster simulations, but less accurate or even wrong simulations.
    /// `delta_time` is in seconds
    pub fn delta_time(mut self, delta_time: f32) -> Self {
        self.delta_time = delta_time;
        self
    }

    /// Constructs a instance of `Simulator`
    pub fn build(self) -> Simulator {
        Simulator {
            spring: self.spring,
            collide: self.collide,
            gravity: self.gravity,
            delta_time: self.delta_time,
            damping: self.damping,
            pivot_bias: self.pivot_bias,
            max_correction_speed: self.max_correction_speed,
        }
    }
}

impl Default for SimulatorBuilder {
    /// Get a Instance of `SimulatorBuilder` with default values
    fn default() -> Self {
        Self {
            spring: true,
            collide: true,
            gravity: GRAVITY,
            delta_time: TIMESTEP,
            damping: 1.0,
            pivot_bias: 0.25,
            max_correction_speed: 2000.0,
        }
    }
}
