//! Court layout: walkable bounds, static geometry and floor markings.
//!
//! World is Y-up. The court is centered on the origin with the hoops on the
//! Z axis; the floor surface sits at `FLOOR_Y`.

use glam::{Mat4, Vec3};

use courtside_render::pipelines::line::{push_arc, push_loop, push_segment, LineVertex};
use courtside_render::shapes::{
    flip_inside, generate_box, generate_cylinder, generate_plane, generate_torus, MeshData,
};

/// Court floor surface height.
pub const FLOOR_Y: f32 = -0.5;
/// Border walls span y ∈ [WALL_BOTTOM, WALL_TOP].
pub const WALL_BOTTOM: f32 = -1.0;
pub const WALL_TOP: f32 = 0.0;
pub const WALL_THICKNESS: f32 = 0.1;

/// Hoop height and distance from center along Z.
pub const RING_HEIGHT: f32 = 2.5;
pub const RING_Z: f32 = 5.0;
/// Ring model: unit torus scaled by RING_SCALE, turned 90° about Y.
pub const RING_SCALE: f32 = 4.0;
pub const RING_MAJOR_RADIUS: f32 = 0.1;
pub const RING_MINOR_RADIUS: f32 = 0.006;

pub const BACKBOARD_HALF: [f32; 3] = [0.9, 0.55, 0.03];
/// Gap between ring center and board face.
pub const BACKBOARD_OFFSET: f32 = 0.5;
pub const POLE_RADIUS: f32 = 0.07;

/// Backdrop cube half-extent (inside the far plane).
pub const BACKDROP_HALF: f32 = 40.0;

/// Floor texture repeats once per court half.
const FLOOR_UV_REPEAT: f32 = 2.0;
/// Markings float slightly above the floor to avoid z-fighting.
const MARK_LIFT: f32 = 0.005;
const MARK_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.85];
const CENTER_CIRCLE_RADIUS: f32 = 0.9;
const LANE_HALF_WIDTH: f32 = 0.8;
const LANE_LENGTH: f32 = 2.0;

/// Axis-aligned walkable rectangle, enforced only below the jump threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourtBounds {
    pub x0: f32,
    pub x1: f32,
    pub z0: f32,
    pub z1: f32,
    pub jump_height: f32,
}

impl CourtBounds {
    /// Symmetric bounds: ±(half_extent − margin) on X and Z.
    pub fn new(half_extent: f32, margin: f32, jump_height: f32) -> Self {
        let inset = (half_extent - margin).max(0.0);
        Self {
            x0: -inset,
            x1: inset,
            z0: -inset,
            z1: inset,
            jump_height,
        }
    }

    /// Clamp X and Z independently into the rectangle, unless above the jump threshold.
    pub fn clamp(&self, position: Vec3) -> Vec3 {
        if position.y >= self.jump_height {
            return position;
        }
        Vec3::new(
            position.x.clamp(self.x0, self.x1),
            position.y,
            position.z.clamp(self.z0, self.z1),
        )
    }

    /// Whether the horizontal position lies inside the rectangle.
    pub fn contains(&self, position: Vec3) -> bool {
        (self.x0..=self.x1).contains(&position.x) && (self.z0..=self.z1).contains(&position.z)
    }
}

/// What a piece of scenery is textured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Floor,
    Wall,
    Backdrop,
    /// Backboard at −Z.
    HomeBoard,
    /// Backboard at +Z.
    AwayBoard,
    Ring,
    Pole,
    Bench,
}

/// One static mesh with its placement.
pub struct Piece {
    pub name: &'static str,
    pub surface: Surface,
    pub mesh: MeshData,
    pub model: Mat4,
}

/// Centers of both rings (−Z first).
pub fn ring_centers() -> [Vec3; 2] {
    [
        Vec3::new(0.0, RING_HEIGHT, -RING_Z),
        Vec3::new(0.0, RING_HEIGHT, RING_Z),
    ]
}

/// Ring model matrix: uniform scale, then place at `center`. The torus lies
/// in the XZ plane already, so no rotation is needed.
pub fn ring_model(center: Vec3) -> Mat4 {
    Mat4::from_translation(center) * Mat4::from_scale(Vec3::splat(RING_SCALE))
}

/// All static scenery for a court of nominal `half_extent`.
pub fn court_pieces(half_extent: f32) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let h = half_extent;

    // Floor: a plane at FLOOR_Y spanning the walls
    pieces.push(Piece {
        name: "Floor",
        surface: Surface::Floor,
        mesh: generate_plane(h, h, FLOOR_UV_REPEAT),
        model: Mat4::from_translation(Vec3::new(0.0, FLOOR_Y, 0.0)),
    });

    // Border walls
    let wall_hy = (WALL_TOP - WALL_BOTTOM) / 2.0;
    let wall_y = (WALL_TOP + WALL_BOTTOM) / 2.0;
    let t = WALL_THICKNESS / 2.0;
    for (name, half, center) in [
        ("Wall -Z", [h + t, wall_hy, t], Vec3::new(0.0, wall_y, -h)),
        ("Wall +Z", [h + t, wall_hy, t], Vec3::new(0.0, wall_y, h)),
        ("Wall -X", [t, wall_hy, h - t], Vec3::new(-h, wall_y, 0.0)),
        ("Wall +X", [t, wall_hy, h - t], Vec3::new(h, wall_y, 0.0)),
    ] {
        pieces.push(Piece {
            name,
            surface: Surface::Wall,
            mesh: generate_box(half[0], half[1], half[2]),
            model: Mat4::from_translation(center),
        });
    }

    // Backdrop viewed from inside
    let mut backdrop = generate_box(BACKDROP_HALF, BACKDROP_HALF, BACKDROP_HALF);
    flip_inside(&mut backdrop);
    pieces.push(Piece {
        name: "Backdrop",
        surface: Surface::Backdrop,
        mesh: backdrop,
        model: Mat4::from_translation(Vec3::new(0.0, BACKDROP_HALF * 0.5, 0.0)),
    });

    // Hoops: ring, backboard and pole per end
    let [bx, by, bz] = BACKBOARD_HALF;
    for (center, board_surface, board_name, ring_name, pole_name) in [
        (ring_centers()[0], Surface::HomeBoard, "Backboard -Z", "Ring -Z", "Pole -Z"),
        (ring_centers()[1], Surface::AwayBoard, "Backboard +Z", "Ring +Z", "Pole +Z"),
    ] {
        let outward = center.z.signum();
        let board_z = center.z + outward * (BACKBOARD_OFFSET + bz);
        let board_center = Vec3::new(0.0, center.y + by * 0.6, board_z);

        pieces.push(Piece {
            name: ring_name,
            surface: Surface::Ring,
            mesh: generate_torus(RING_MAJOR_RADIUS, RING_MINOR_RADIUS, 32, 8),
            model: ring_model(center),
        });

        pieces.push(Piece {
            name: board_name,
            surface: board_surface,
            mesh: generate_box(bx, by, bz),
            model: Mat4::from_translation(board_center),
        });

        let pole_z = board_z + outward * (bz + POLE_RADIUS);
        let pole_top = board_center.y + by;
        let pole_height = pole_top - FLOOR_Y;
        pieces.push(Piece {
            name: pole_name,
            surface: Surface::Pole,
            mesh: generate_cylinder(POLE_RADIUS, pole_height, 16),
            model: Mat4::from_translation(Vec3::new(
                0.0,
                FLOOR_Y + pole_height / 2.0,
                pole_z,
            )),
        });
    }

    // Team benches outside the side walls
    for (name, x) in [("Bench -X", -(h + 0.6)), ("Bench +X", h + 0.6)] {
        pieces.push(Piece {
            name,
            surface: Surface::Bench,
            mesh: generate_box(0.25, 0.2, 1.5),
            model: Mat4::from_translation(Vec3::new(x, FLOOR_Y + 0.2, 0.0)),
        });
    }

    pieces
}

/// Floor markings as a line list: perimeter, half-court line, center circle,
/// and a lane with free-throw circle at each end.
pub fn marking_lines(bounds: &CourtBounds) -> Vec<LineVertex> {
    let mut out = Vec::new();
    let y = FLOOR_Y + MARK_LIFT;
    let (x0, x1, z0, z1) = (bounds.x0, bounds.x1, bounds.z0, bounds.z1);

    push_loop(
        &mut out,
        &[
            Vec3::new(x0, y, z0),
            Vec3::new(x1, y, z0),
            Vec3::new(x1, y, z1),
            Vec3::new(x0, y, z1),
        ],
        MARK_COLOR,
    );

    push_segment(&mut out, Vec3::new(x0, y, 0.0), Vec3::new(x1, y, 0.0), MARK_COLOR);

    push_arc(
        &mut out,
        Vec3::new(0.0, y, 0.0),
        CENTER_CIRCLE_RADIUS,
        0.0,
        std::f32::consts::TAU,
        48,
        MARK_COLOR,
    );

    for (baseline, inward) in [(z0, 1.0f32), (z1, -1.0)] {
        let line_z = baseline + inward * LANE_LENGTH;
        let lane = [
            Vec3::new(-LANE_HALF_WIDTH, y, baseline),
            Vec3::new(-LANE_HALF_WIDTH, y, line_z),
            Vec3::new(LANE_HALF_WIDTH, y, line_z),
            Vec3::new(LANE_HALF_WIDTH, y, baseline),
        ];
        for pair in lane.windows(2) {
            push_segment(&mut out, pair[0], pair[1], MARK_COLOR);
        }
        // half circle opening toward center court
        let start = if inward > 0.0 { 0.0 } else { std::f32::consts::PI };
        push_arc(
            &mut out,
            Vec3::new(0.0, y, line_z),
            LANE_HALF_WIDTH,
            start,
            start + std::f32::consts::PI,
            16,
            MARK_COLOR,
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> CourtBounds {
        CourtBounds::new(5.0, 0.2, 0.95)
    }

    #[test]
    fn test_inset_edges() {
        let b = bounds();
        assert!((b.x1 - 4.8).abs() < 1e-6);
        assert!((b.x0 + 4.8).abs() < 1e-6);
        assert!((b.z1 - 4.8).abs() < 1e-6);
        assert!((b.z0 + 4.8).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_to_exact_edge() {
        let b = bounds();
        let p = b.clamp(Vec3::new(6.3, 0.0, -9.0));
        assert_eq!(p.x, b.x1);
        assert_eq!(p.z, b.z0);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn test_no_clamp_above_jump_height() {
        let b = bounds();
        let p = Vec3::new(7.0, 1.2, 7.0);
        assert_eq!(b.clamp(p), p);
        // the threshold itself counts as airborne
        let q = Vec3::new(7.0, 0.95, 0.0);
        assert_eq!(b.clamp(q), q);
    }

    #[test]
    fn test_inside_untouched() {
        let b = bounds();
        let p = Vec3::new(1.0, 0.0, -3.5);
        assert!(b.contains(p));
        assert_eq!(b.clamp(p), p);
        assert!(!b.contains(Vec3::new(4.9, 0.0, 0.0)));
        assert!(b.contains(b.clamp(Vec3::new(40.0, 0.0, -40.0))));
    }

    #[test]
    fn test_ring_model_places_center() {
        for c in ring_centers() {
            let m = ring_model(c);
            assert!((m.transform_point3(Vec3::ZERO) - c).length() < 1e-6);
            // a rim point lands RING_SCALE * major radius from the center, same height
            let rim = m.transform_point3(Vec3::new(RING_MAJOR_RADIUS, 0.0, 0.0));
            assert!(((rim - c).length() - RING_SCALE * RING_MAJOR_RADIUS).abs() < 1e-5);
            assert!((rim.y - c.y).abs() < 1e-6);
            // unrotated: local +X stays along world +X
            assert!((rim - (c + Vec3::X * RING_SCALE * RING_MAJOR_RADIUS)).length() < 1e-5);
        }
    }

    #[test]
    fn test_court_pieces() {
        let pieces = court_pieces(5.0);
        let count = |s: Surface| pieces.iter().filter(|p| p.surface == s).count();
        assert_eq!(count(Surface::Floor), 1);
        assert_eq!(count(Surface::Wall), 4);
        assert_eq!(count(Surface::Ring), 2);
        assert_eq!(count(Surface::HomeBoard), 1);
        assert_eq!(count(Surface::AwayBoard), 1);
        assert_eq!(count(Surface::Pole), 2);
        assert_eq!(count(Surface::Backdrop), 1);

        // walls span y ∈ [-1, 0] along the ±5 edges
        for p in pieces.iter().filter(|p| p.surface == Surface::Wall) {
            let ys: Vec<f32> = p
                .mesh
                .0
                .iter()
                .map(|v| p.model.transform_point3(Vec3::from(v.position)).y)
                .collect();
            let min = ys.iter().cloned().fold(f32::MAX, f32::min);
            let max = ys.iter().cloned().fold(f32::MIN, f32::max);
            assert!((min - WALL_BOTTOM).abs() < 1e-6 && (max - WALL_TOP).abs() < 1e-6);
        }

        // backboards sit behind their rings
        let home = pieces.iter().find(|p| p.surface == Surface::HomeBoard).unwrap();
        let away = pieces.iter().find(|p| p.surface == Surface::AwayBoard).unwrap();
        assert!(home.model.transform_point3(Vec3::ZERO).z < -RING_Z);
        assert!(away.model.transform_point3(Vec3::ZERO).z > RING_Z);
    }

    #[test]
    fn test_poles_reach_floor() {
        for p in court_pieces(5.0).iter().filter(|p| p.surface == Surface::Pole) {
            let min_y = p
                .mesh
                .0
                .iter()
                .map(|v| p.model.transform_point3(Vec3::from(v.position)).y)
                .fold(f32::MAX, f32::min);
            assert!((min_y - FLOOR_Y).abs() < 1e-5);
        }
    }

    #[test]
    fn test_markings_on_floor_inside_bounds() {
        let b = bounds();
        let lines = marking_lines(&b);
        assert!(!lines.is_empty());
        assert_eq!(lines.len() % 2, 0);
        for v in &lines {
            let p = Vec3::from(v.position);
            assert!((p.y - (FLOOR_Y + MARK_LIFT)).abs() < 1e-6);
            assert!(p.x.abs() <= b.x1 + 1e-4 && p.z.abs() <= b.z1 + 1e-4);
        }
    }
}
