//! Pointer and button handling on top of the simulation.
//!
//! The renderer translates window events into the calls below; everything here
//! is window-system agnostic so the interaction rules can be driven in tests.

use glam::Vec2;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    config::SandboxConfig,
    error::Result,
    properties::{BodyId, PivotId, SpringId},
    scene::default_scene,
    shape::ShapeKind,
    simulator::{Simulator, SimulatorBuilder},
    world::World,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Axis aligned screen rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Button {
    pub min: Vec2,
    pub size: Vec2,
}

impl Button {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmplt(self.max()).all()
    }
}

pub const RESET_BUTTON: Button = Button::new(10.0, 10.0, 100.0, 50.0);
pub const SPAWN_BUTTON: Button = Button::new(120.0, 10.0, 100.0, 50.0);

/// Mouse drag state. A pivot only exists while dragging.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { pivot: PivotId, body: BodyId },
}

/// What a pointer press ended up doing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerAction {
    Reset,
    Spawn(BodyId),
    Grab(BodyId),
    /// Remembered as the first end of a link.
    Select(BodyId),
    Link(SpringId),
    Nothing,
}

/// A world, its simulator and the interaction state around them.
pub struct Sandbox {
    world: World,
    simulator: Simulator,
    config: SandboxConfig,
    rng: StdRng,
    drag: DragState,
    last_clicked: Option<BodyId>,
    spawn_kind: ShapeKind,
}

impl Sandbox {
    /// Builds the sandbox and its default scene.
    pub fn new(config: SandboxConfig) -> Result<Self> {
        let simulator = SimulatorBuilder::new()
            .gravity(config.gravity)
            .delta_time(config.timestep)
            .build();
        Self::with_simulator(config, simulator)
    }

    /// Uses `simulator` as is. Its timestep replaces `config.timestep`.
    pub fn with_simulator(mut config: SandboxConfig, simulator: Simulator) -> Result<Self> {
        config.validate()?;
        config.timestep = simulator.delta_time();

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut sandbox = Self {
            world: World::with_node_settings(config.node_size, config.elasticity),
            simulator,
            config,
            rng,
            drag: DragState::Idle,
            last_clicked: None,
            spawn_kind: ShapeKind::Circle,
        };
        sandbox.reset()?;
        Ok(sandbox)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn last_clicked(&self) -> Option<BodyId> {
        self.last_clicked
    }

    pub fn spawn_kind(&self) -> ShapeKind {
        self.spawn_kind
    }

    pub fn set_spawn_kind(&mut self, kind: ShapeKind) {
        self.spawn_kind = kind;
    }

    /// Seconds advanced by [`Sandbox::step`].
    pub fn timestep(&self) -> f32 {
        self.simulator.delta_time()
    }

    pub fn step(&mut self) {
        self.simulator.simulation_step(&mut self.world);

        // The dragged body may have been removed through `world_mut`.
        if let DragState::Dragging { pivot, .. } = self.drag {
            if !self.world.contains_pivot(pivot) {
                self.drag = DragState::Idle;
            }
        }
    }

    /// Clears the world and rebuilds the boundary and the default scene.
    pub fn reset(&mut self) -> Result<()> {
        self.world.clear();
        self.drag = DragState::Idle;
        self.last_clicked = None;

        self.world
            .create_boundary(self.config.width, self.config.height, self.config.elasticity);
        self.world.load_scene(&default_scene(), &self.config)?;
        ftlog::info!("sandbox reset");
        Ok(())
    }

    /// Adds a node of the selected kind at a random spot inside the boundary.
    pub fn spawn(&mut self) -> Result<BodyId> {
        let margin = self.config.node_size;
        let x = self
            .rng
            .gen_range(margin..=(self.config.width - margin).max(margin));
        let y = self
            .rng
            .gen_range(margin..=(self.config.height - margin).max(margin));
        self.world
            .create_body(Vec2::new(x, y), self.spawn_kind, self.config.node_mass)
    }

    pub fn pointer_down(&mut self, point: Vec2, button: PointerButton) -> Result<PointerAction> {
        match button {
            PointerButton::Primary if RESET_BUTTON.contains(point) => {
                self.reset()?;
                Ok(PointerAction::Reset)
            }
            PointerButton::Primary if SPAWN_BUTTON.contains(point) => {
                Ok(PointerAction::Spawn(self.spawn()?))
            }
            PointerButton::Primary => self.grab(point),
            PointerButton::Secondary => self.link(point),
        }
    }

    /// Ends a drag. Safe to call while idle.
    pub fn pointer_up(&mut self) {
        if let DragState::Dragging { body, .. } = self.drag {
            ftlog::debug!("released {body}");
        }
        self.world.remove_all_pivots();
        self.drag = DragState::Idle;
    }

    pub fn pointer_move(&mut self, point: Vec2) {
        let anchor = self.world.anchor();
        self.world.set_body_position(anchor, point);
    }

    fn grab(&mut self, point: Vec2) -> Result<PointerAction> {
        let Some(hit) = self.world.nearest(point, self.config.node_size) else {
            return Ok(PointerAction::Nothing);
        };
        let Some(local_anchor) = self.world.world_to_local(hit.body, point) else {
            return Ok(PointerAction::Nothing);
        };
        if !self.world.body(hit.body).is_some_and(|b| b.is_dynamic()) {
            return Ok(PointerAction::Nothing);
        }

        // The anchor jumps to the press point so the body does not get yanked
        // towards a stale pointer position.
        self.pointer_move(point);
        self.world.remove_all_pivots();
        let pivot = self
            .world
            .create_pivot(self.world.anchor(), hit.body, local_anchor)?;
        self.drag = DragState::Dragging {
            pivot,
            body: hit.body,
        };
        Ok(PointerAction::Grab(hit.body))
    }

    fn link(&mut self, point: Vec2) -> Result<PointerAction> {
        let hit = self
            .world
            .nearest(point, self.config.node_size)
            .map(|h| h.body)
            .filter(|body| self.world.body(*body).is_some_and(|b| b.is_dynamic()));

        let action = match (self.last_clicked, hit) {
            (Some(first), Some(second)) if first != second && self.world.contains_body(first) => {
                let spring = self.world.create_spring(
                    first,
                    second,
                    self.config.spring_rest_length,
                    self.config.spring_stiffness,
                    self.config.spring_damping,
                )?;
                PointerAction::Link(spring)
            }
            (_, Some(body)) => PointerAction::Select(body),
            (_, None) => PointerAction::Nothing,
        };

        self.last_clicked = hit;
        Ok(action)
    }
}
