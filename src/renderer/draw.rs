use std::error::Error;

use glium::{
    glutin::surface::WindowSurface,
    implement_vertex,
    index::{NoIndices, PrimitiveType},
    uniforms::{AsUniformValue, Uniforms, UniformsStorage},
    Display, DrawParameters, Frame, Program, Surface, VertexBuffer,
};

use super::shapes;
use crate::{
    properties::BodyKind,
    sandbox::{Button, RESET_BUTTON, SPAWN_BUTTON},
    shape::Shape,
    world::Snapshot,
};

pub type DrawResult = Result<(), Box<dyn Error>>;

static VERTEX_SHADER_SRC: &str = r#"
#version 150

in vec3 position;
in vec4 color;
out vec4 vertex_color;

uniform mat4 projection;
uniform mat4 matrix;

void main() {
    vertex_color = color;
    gl_Position = projection * matrix * vec4(position, 1.0);
}
"#;

static FRAGMENT_SHADER_SRC: &str = r#"
#version 140

in vec4 vertex_color;
out vec4 color;

void main() {
    color = vec4(vertex_color);
}
"#;

const CIRCLE_COLOR: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
const POLYGON_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const LINE_COLOR: [f32; 4] = [0.0, 0.8, 0.0, 1.0];
const RESET_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const SPAWN_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
const CIRCLE_RESOLUTION: usize = 32;

#[derive(Copy, Clone, Debug)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

implement_vertex!(Vertex, position, color);

pub fn program(display: &Display<WindowSurface>) -> Result<Program, Box<dyn Error>> {
    Ok(Program::from_source(
        display,
        VERTEX_SHADER_SRC,
        FRAGMENT_SHADER_SRC,
        None,
    )?)
}

pub fn draw_buttons<H, R>(
    target: &mut Frame,
    display: &Display<WindowSurface>,
    program: &Program,
    uniform: &UniformsStorage<H, R>,
    params: &DrawParameters,
) -> DrawResult
where
    H: AsUniformValue,
    R: Uniforms,
{
    let button = |b: Button, color| shapes::rectangle(b.min, b.max(), color);
    let mut shape = button(RESET_BUTTON, RESET_COLOR);
    shape.append(&mut button(SPAWN_BUTTON, SPAWN_COLOR));

    draw_vertices(
        target,
        display,
        program,
        uniform,
        params,
        &shape,
        PrimitiveType::TrianglesList,
    )
}

pub fn draw_springs<H, R>(
    snapshot: &Snapshot,
    target: &mut Frame,
    display: &Display<WindowSurface>,
    program: &Program,
    uniform: &UniformsStorage<H, R>,
    params: &DrawParameters,
) -> DrawResult
where
    H: AsUniformValue,
    R: Uniforms,
{
    let mut shape = vec![];
    for (a, b) in snapshot.springs.iter() {
        shape.append(&mut shapes::spring_coil(*a, *b, LINE_COLOR));
    }

    draw_vertices(
        target,
        display,
        program,
        uniform,
        params,
        &shape,
        PrimitiveType::LinesList,
    )
}

pub fn draw_bodies<H, R>(
    snapshot: &Snapshot,
    target: &mut Frame,
    display: &Display<WindowSurface>,
    program: &Program,
    uniform: &UniformsStorage<H, R>,
    params: &DrawParameters,
) -> DrawResult
where
    H: AsUniformValue,
    R: Uniforms,
{
    let mut shape = vec![];

    for view in snapshot.shapes.iter() {
        let mut outline = match &view.shape {
            Shape::Circle { radius } => shapes::circle(
                view.position,
                *radius,
                view.angle,
                CIRCLE_COLOR,
                CIRCLE_RESOLUTION,
            ),
            Shape::Segment { .. } => {
                let ends = view.shape.world_vertices(view.position, view.angle);
                shapes::line(ends[0], ends[1], LINE_COLOR)
            }
            Shape::Box { .. } | Shape::Polygon { .. } => {
                let color = if view.kind == BodyKind::Dynamic {
                    POLYGON_COLOR
                } else {
                    LINE_COLOR
                };
                shapes::polygon(&view.shape.world_vertices(view.position, view.angle), color)
            }
        };
        shape.append(&mut outline);
    }

    draw_vertices(
        target,
        display,
        program,
        uniform,
        params,
        &shape,
        PrimitiveType::LinesList,
    )
}

fn draw_vertices<H, R>(
    target: &mut Frame,
    display: &Display<WindowSurface>,
    program: &Program,
    uniform: &UniformsStorage<H, R>,
    params: &DrawParameters,
    shape: &[Vertex],
    primitive: PrimitiveType,
) -> DrawResult
where
    H: AsUniformValue,
    R: Uniforms,
{
    if shape.is_empty() {
        return Ok(());
    }

    let vertex_buffer = VertexBuffer::new(display, shape)?;
    target.draw(
        &vertex_buffer,
        NoIndices(primitive),
        program,
        uniform,
        params,
    )?;
    Ok(())
}
