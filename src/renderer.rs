use std::time::Instant;

use event::{key_command, EventManager, KeyCommand};
use glam::Mat4;
use glium::{
    glutin::surface::WindowSurface,
    uniform,
    uniforms::{AsUniformValue, Uniforms, UniformsStorage},
    Display, Frame, Program, Surface,
};
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::Window,
};

use crate::{sandbox::Sandbox, world::Snapshot};

mod draw;
mod event;
mod shapes;

/// Steps simulated per frame at most, so a stalled frame does not spiral.
const MAX_STEPS_PER_FRAME: u32 = 5;

/// Window front end of a [`Sandbox`].
///
/// Physics runs at the sandbox timestep regardless of the frame rate; the
/// renderer only owns the frame loop and translates input.
pub struct Renderer {
    sandbox: Sandbox,
    paused: bool,
}

impl Renderer {
    pub fn new(sandbox: Sandbox) -> Self {
        Self {
            sandbox,
            paused: false,
        }
    }

    pub fn create_window(self) {
        let event_loop = winit::event_loop::EventLoopBuilder::new().build();

        let config = self.sandbox.config();
        let (window, display) = glium::backend::glutin::SimpleWindowBuilder::new()
            .with_title("springbox")
            .with_inner_size(config.width as u32, config.height as u32)
            .build(&event_loop);

        self.run_render_loop(event_loop, display, window);
    }

    fn run_render_loop(
        mut self,
        event_loop: EventLoop<()>,
        display: Display<WindowSurface>,
        window: Window,
    ) {
        let program = match draw::program(&display) {
            Ok(program) => program,
            Err(e) => {
                ftlog::error!("failed to compile shaders: {e}");
                return;
            }
        };

        let mut events = EventManager::new();
        let mut last_frame = Instant::now();
        let mut accumulator = 0.0_f32;
        let timestep = self.sandbox.timestep();

        event_loop.run(move |event, _, control_flow| {
            *control_flow = ControlFlow::Poll;

            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                        *control_flow = ControlFlow::Exit;
                    }
                    WindowEvent::Resized(size) => display.resize((size.width, size.height)),
                    WindowEvent::CursorMoved { position, .. } => {
                        events.cursor_moved(&mut self.sandbox, position, window.inner_size());
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        events.mouse_input(&mut self.sandbox, state, button);
                    }
                    WindowEvent::KeyboardInput { input, .. } => {
                        if let Some(command) = key_command(&input) {
                            if self.handle_key(command) {
                                *control_flow = ControlFlow::Exit;
                            }
                        }
                    }
                    _ => (),
                },
                Event::MainEventsCleared => {
                    let elapsed = last_frame.elapsed().as_secs_f32();
                    last_frame = Instant::now();

                    if self.paused {
                        accumulator = 0.0;
                    } else {
                        accumulator += elapsed;
                        let mut steps = 0;
                        while accumulator >= timestep && steps < MAX_STEPS_PER_FRAME {
                            self.sandbox.step();
                            accumulator -= timestep;
                            steps += 1;
                        }
                        if steps == MAX_STEPS_PER_FRAME {
                            accumulator = 0.0;
                        }
                    }
                    window.request_redraw();
                }
                Event::RedrawRequested(_) => {
                    let snapshot = self.sandbox.world().snapshot();
                    if let Err(e) = self.draw_scene(&display, &program, &snapshot) {
                        ftlog::error!("failed to draw frame: {e}");
                    }
                }
                _ => (),
            }
        });
    }

    /// Returns `true` when the window should close.
    fn handle_key(&mut self, command: KeyCommand) -> bool {
        match command {
            KeyCommand::TogglePause => {
                self.paused = !self.paused;
                ftlog::info!("simulation paused: {}", self.paused);
            }
            KeyCommand::Reset => {
                if let Err(e) = self.sandbox.reset() {
                    ftlog::warn!("reset failed: {e}");
                }
            }
            KeyCommand::Spawn => {
                if let Err(e) = self.sandbox.spawn() {
                    ftlog::warn!("spawn failed: {e}");
                }
            }
            KeyCommand::SpawnKind(kind) => {
                self.sandbox.set_spawn_kind(kind);
                ftlog::info!("spawning {kind:?}");
            }
            KeyCommand::Exit => return true,
        }
        false
    }

    fn draw_scene(
        &self,
        display: &Display<WindowSurface>,
        program: &Program,
        snapshot: &Snapshot,
    ) -> draw::DrawResult {
        let mut target = display.draw();
        target.clear_color(1.0, 1.0, 1.0, 1.0);

        let config = self.sandbox.config();
        let uniforms = uniform! {
            matrix: Mat4::IDENTITY.to_cols_array_2d(),
            projection: build_screen_matrix(config.width, config.height).to_cols_array_2d()
        };

        let drawn = Self::draw_layers(&mut target, display, program, &uniforms, snapshot);

        // The frame has to be finished even if a draw call failed.
        target.finish()?;
        drawn
    }

    fn draw_layers<H, R>(
        target: &mut Frame,
        display: &Display<WindowSurface>,
        program: &Program,
        uniforms: &UniformsStorage<H, R>,
        snapshot: &Snapshot,
    ) -> draw::DrawResult
    where
        H: AsUniformValue,
        R: Uniforms,
    {
        let params = glium::DrawParameters::default();
        draw::draw_buttons(target, display, program, uniforms, &params)?;
        draw::draw_springs(snapshot, target, display, program, uniforms, &params)?;
        draw::draw_bodies(snapshot, target, display, program, uniforms, &params)
    }
}

/// Maps screen space (origin top-left, y down) to clip space.
fn build_screen_matrix(width: f32, height: f32) -> Mat4 {
    Mat4::orthographic_rh_gl(0.0, width, height, 0.0, -1.0, 1.0)
}
