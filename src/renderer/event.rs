use std::collections::HashSet;

use glam::Vec2;
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, KeyboardInput, MouseButton, VirtualKeyCode},
};

use crate::{
    sandbox::{PointerAction, PointerButton, Sandbox},
    shape::ShapeKind,
};

/// Keyboard commands understood by the window.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    TogglePause,
    Reset,
    Spawn,
    SpawnKind(ShapeKind),
    Exit,
}

/// Tracks held buttons and the cursor, and forwards pointer events to the sandbox.
pub struct EventManager {
    mouse_buttons: HashSet<MouseButton>,
    cursor: Vec2,
}

impl EventManager {
    pub fn new() -> Self {
        Self {
            mouse_buttons: HashSet::new(),
            cursor: Vec2::ZERO,
        }
    }

    /// Maps the cursor from window pixels to sandbox coordinates.
    pub fn cursor_moved(
        &mut self,
        sandbox: &mut Sandbox,
        position: PhysicalPosition<f64>,
        window: PhysicalSize<u32>,
    ) {
        let window = Vec2::new(window.width.max(1) as f32, window.height.max(1) as f32);
        let config = sandbox.config();
        let scale = Vec2::new(config.width, config.height) / window;
        self.cursor = Vec2::new(position.x as f32, position.y as f32) * scale;
        sandbox.pointer_move(self.cursor);
    }

    pub fn mouse_input(
        &mut self,
        sandbox: &mut Sandbox,
        state: ElementState,
        button: MouseButton,
    ) {
        match state {
            ElementState::Pressed => {
                if !self.mouse_buttons.insert(button) {
                    return;
                }
                let Some(pointer) = pointer_button(button) else {
                    return;
                };
                match sandbox.pointer_down(self.cursor, pointer) {
                    Ok(PointerAction::Nothing) => (),
                    Ok(action) => ftlog::debug!("pointer {pointer:?}: {action:?}"),
                    Err(e) => ftlog::warn!("pointer {pointer:?} failed: {e}"),
                }
            }
            ElementState::Released => {
                self.mouse_buttons.remove(&button);
                sandbox.pointer_up();
            }
        }
    }
}

pub fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        _ => None,
    }
}

pub fn key_command(input: &KeyboardInput) -> Option<KeyCommand> {
    if input.state != ElementState::Pressed {
        return None;
    }
    match input.virtual_keycode? {
        VirtualKeyCode::Space => Some(KeyCommand::TogglePause),
        VirtualKeyCode::R => Some(KeyCommand::Reset),
        VirtualKeyCode::S => Some(KeyCommand::Spawn),
        VirtualKeyCode::Key1 => Some(KeyCommand::SpawnKind(ShapeKind::Circle)),
        VirtualKeyCode::Key2 => Some(KeyCommand::SpawnKind(ShapeKind::Box)),
        VirtualKeyCode::Key3 => Some(KeyCommand::SpawnKind(ShapeKind::Triangle)),
        VirtualKeyCode::Escape => Some(KeyCommand::Exit),
        _ => None,
    }
}
