//! Shape generation for 2D primitives
//!
//! Every shape is emitted as a triangle list in playfield coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    sector(center, radius, 0.0, 2.0 * PI, color, segments)
}

/// Generate vertices for a filled pie slice from `theta_start` to `theta_end`
pub fn sector(
    center: Vec2,
    radius: f32,
    theta_start: f32,
    theta_end: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(1);
    let span = theta_end - theta_start;
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = theta_start + (i as f32 / segments as f32) * span;
        let theta2 = theta_start + ((i + 1) as f32 / segments as f32) * span;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());
        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.extend(quad(inner1, outer1, outer2, inner2, color));
    }

    vertices
}

/// Axis-aligned filled rectangle from its top-left corner
pub fn rect(top_left: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let tl = top_left;
    let tr = top_left + Vec2::new(size.x, 0.0);
    let br = top_left + size;
    let bl = top_left + Vec2::new(0.0, size.y);
    quad(tl, tr, br, bl, color).to_vec()
}

/// Filled triangle
pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Thick line segment with a gradient from `color_from` to `color_to`
pub fn line(
    from: Vec2,
    to: Vec2,
    width: f32,
    color_from: [f32; 4],
    color_to: [f32; 4],
) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a = from + perp;
    let b = from - perp;
    let c = to + perp;
    let d = to - perp;

    vec![
        Vertex::new(a.x, a.y, color_from),
        Vertex::new(b.x, b.y, color_from),
        Vertex::new(c.x, c.y, color_to),
        Vertex::new(c.x, c.y, color_to),
        Vertex::new(b.x, b.y, color_from),
        Vertex::new(d.x, d.y, color_to),
    ]
}

/// Two-stroke "X" marker
pub fn cross(center: Vec2, half_size: f32, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let d1 = Vec2::new(half_size, half_size);
    let d2 = Vec2::new(half_size, -half_size);
    let mut vertices = line(center - d1, center + d1, width, color, color);
    vertices.extend(line(center - d2, center + d2, width, color, color));
    vertices
}

/// Two triangles covering the quad `a b c d` (corners in winding order)
fn quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(a.x, a.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertex_count() {
        let verts = circle(Vec2::ZERO, 10.0, [1.0; 4], 16);
        assert_eq!(verts.len(), 48);
        // Every rim vertex sits on the radius
        for v in verts.iter().skip(1).step_by(3) {
            let r = Vec2::from(v.position).length();
            assert!((r - 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_degenerate_line_is_empty() {
        let p = Vec2::new(5.0, 5.0);
        assert!(line(p, p, 2.0, [1.0; 4], [1.0; 4]).is_empty());
    }

    #[test]
    fn test_rect_covers_bounds() {
        let verts = rect(Vec2::new(10.0, 20.0), Vec2::new(30.0, 5.0), [1.0; 4]);
        assert_eq!(verts.len(), 6);
        let max_x = verts.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        let max_y = verts.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert_eq!(max_x, 40.0);
        assert_eq!(max_y, 25.0);
    }
}
