use std::f32::consts::PI;

use glam::Vec2;

use super::draw::Vertex;

const SPRING_SEGMENTS: usize = 10;
const SPRING_AMPLITUDE: f32 = 10.0;

fn vertex(p: Vec2, color: [f32; 4]) -> Vertex {
    Vertex {
        position: [p.x, p.y, 0.0],
        color,
    }
}

/// Filled rectangle as two triangles.
pub fn rectangle(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let top_right = Vec2::new(max.x, min.y);
    let bottom_left = Vec2::new(min.x, max.y);
    vec![
        vertex(min, color),
        vertex(top_right, color),
        vertex(bottom_left, color),
        vertex(max, color),
        vertex(top_right, color),
        vertex(bottom_left, color),
    ]
}

/// Circle outline plus a radius marking the body orientation.
pub fn circle(center: Vec2, r: f32, angle: f32, color: [f32; 4], res: usize) -> Vec<Vertex> {
    let mut shape = Vec::with_capacity(2 * res + 2);
    let a = 2.0 * PI / res as f32;

    for i in 0..res {
        let i = i as f32;
        shape.push(vertex(center + Vec2::from_angle(a * i) * r, color));
        shape.push(vertex(center + Vec2::from_angle(a * (i + 1.0)) * r, color));
    }
    shape.append(&mut line(center, center + Vec2::from_angle(angle) * r, color));

    shape
}

/// Closed outline through `points`.
pub fn polygon(points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    let mut shape = Vec::with_capacity(2 * points.len());
    for i in 0..points.len() {
        shape.append(&mut line(points[i], points[(i + 1) % points.len()], color));
    }
    shape
}

pub fn line(p1: Vec2, p2: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![vertex(p1, color), vertex(p2, color)]
}

/// Zig-zag between the two spring ends. Purely visual.
pub fn spring_coil(a: Vec2, b: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let delta = (b - a) / SPRING_SEGMENTS as f32;
    let normal = delta.perp().normalize_or_zero();

    let points: Vec<Vec2> = (0..=SPRING_SEGMENTS)
        .map(|i| {
            let p = a + delta * i as f32;
            if i % 2 == 1 && i < SPRING_SEGMENTS {
                let side = if i % 4 == 1 { 1.0 } else { -1.0 };
                p + normal * SPRING_AMPLITUDE * side
            } else {
                p
            }
        })
        .collect();

    let mut shape = Vec::with_capacity(2 * SPRING_SEGMENTS);
    for pair in points.windows(2) {
        shape.append(&mut line(pair[0], pair[1], color));
    }
    shape
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coil_starts_and_ends_at_the_anchors() {
        let a = Vec2::new(10.0, 10.0);
        let b = Vec2::new(110.0, 10.0);
        let coil = spring_coil(a, b, [0.0; 4]);

        assert_eq!(coil.len(), 2 * SPRING_SEGMENTS);
        assert_eq!(coil[0].position, [a.x, a.y, 0.0]);
        assert_eq!(coil[coil.len() - 1].position, [b.x, b.y, 0.0]);
        assert!(coil.iter().any(|v| (v.position[1] - 10.0).abs() > 1.0));
    }

    #[test]
    fn coil_of_coincident_anchors_is_finite() {
        let p = Vec2::new(5.0, 5.0);
        let coil = spring_coil(p, p, [0.0; 4]);
        assert!(coil.iter().all(|v| v.position.iter().all(|c| c.is_finite())));
    }
}
