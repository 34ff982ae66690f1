//! Game state: camera, ball and court bounds, advanced once per frame.

use std::collections::VecDeque;

use courtside_core::{glam_to_vec3, vec3_to_glam, Vector3};
use courtside_render::FirstPersonCamera;
use glam::Vec3;

use crate::ball::{Ball, BallEvent};
use crate::config::GameConfig;
use crate::court::CourtBounds;
use crate::input::FrameInput;

/// Trail points kept while the ball is in flight.
pub const TRAIL_LEN: usize = 48;

pub struct GameState {
    pub camera: FirstPersonCamera,
    pub ball: Ball,
    pub bounds: CourtBounds,
    /// Walk speed (units/s).
    pub speed: f32,
    pub gravity: f64,
    pub throw_force: f64,
    pub floor_threshold: f64,
    /// Hand offset along (right, up, front).
    pub hand_offset: Vec3,
    /// Recent in-flight positions, oldest first.
    pub trail: VecDeque<Vec3>,
    pub throws: u32,
    pub recalls: u32,
    pub drops: u32,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        let cam_cfg = &config.camera;
        let mut camera = FirstPersonCamera::new(Vec3::from(cam_cfg.start));
        camera.fov = cam_cfg.fov;
        camera.near = cam_cfg.near;
        camera.far = cam_cfg.far;
        camera.sensitivity = cam_cfg.sensitivity;

        let bounds = CourtBounds::new(
            config.court.half_extent,
            config.court.margin,
            config.court.jump_height,
        );
        if !bounds.contains(camera.position) {
            log::warn!(
                "start position {:?} is outside the court; it will be clamped on the first frame",
                camera.position
            );
        }
        let hand_offset = Vec3::from(config.ball.hand_offset);
        let hand = glam_to_vec3(hand_point(&camera, hand_offset));

        Self {
            camera,
            ball: Ball::new(hand),
            bounds,
            speed: cam_cfg.speed,
            gravity: config.ball.gravity,
            throw_force: config.ball.throw_force,
            floor_threshold: config.ball.floor_threshold,
            hand_offset,
            trail: VecDeque::with_capacity(TRAIL_LEN),
            throws: 0,
            recalls: 0,
            drops: 0,
        }
    }

    /// Where the held ball sits for the current camera pose.
    pub fn hand_position(&self) -> Vector3<f64> {
        glam_to_vec3(hand_point(&self.camera, self.hand_offset))
    }

    /// Ball position for rendering.
    pub fn ball_position(&self) -> Vec3 {
        vec3_to_glam(&self.ball.position)
    }

    /// Forget the last cursor sample so the next one only seeds the look.
    pub fn reset_look(&mut self) {
        self.camera.reset_mouse();
    }

    /// Advance one frame: move, clamp, look, throw, recall, fly, follow.
    ///
    /// Returns the last ball transition that happened this frame.
    pub fn update(&mut self, input: &FrameInput, dt: f32) -> Option<BallEvent> {
        let mut event = None;

        // Walk on the ground plane
        let step = self.speed * dt;
        let front = self.camera.flat_front();
        let right = self.camera.flat_right();
        let mut delta = Vec3::ZERO;
        if input.forward {
            delta += front * step;
        }
        if input.back {
            delta -= front * step;
        }
        if input.right {
            delta += right * step;
        }
        if input.left {
            delta -= right * step;
        }
        self.camera.position = self.bounds.clamp(self.camera.position + delta);

        // Look; skipped until a cursor position is known
        if let Some(cursor) = input.cursor {
            self.camera.mouse_look(cursor, dt);
        }

        let hand = self.hand_position();

        if input.throw {
            let front = glam_to_vec3(self.camera.front());
            if self.ball.throw(hand, front, self.throw_force) {
                self.throws += 1;
                self.trail.clear();
                log::info!(
                    "throw #{} from ({:.2}, {:.2}, {:.2})",
                    self.throws,
                    hand.x,
                    hand.y,
                    hand.z
                );
                event = Some(BallEvent::Thrown);
            }
        }

        if input.recall && self.ball.recall(hand) {
            self.recalls += 1;
            log::info!("ball recalled");
            event = Some(BallEvent::Recalled);
        }

        if self.ball.step(dt as f64, self.gravity, self.floor_threshold, hand) {
            self.drops += 1;
            log::info!("ball dropped below {:.1}, back in hand", self.floor_threshold);
            event = Some(BallEvent::Dropped);
        }

        self.ball.follow(hand);

        if self.ball.is_flying() {
            if self.trail.len() == TRAIL_LEN {
                self.trail.pop_front();
            }
            self.trail.push_back(self.ball_position());
        } else {
            self.trail.clear();
        }

        event
    }
}

fn hand_point(camera: &FirstPersonCamera, offset: Vec3) -> Vec3 {
    camera.position + camera.right() * offset.x + camera.up() * offset.y + camera.front() * offset.z
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn game() -> GameState {
        GameState::new(&GameConfig::default())
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    #[test]
    fn test_initial_ball_in_hand() {
        let g = game();
        assert!(!g.ball.is_flying());
        // camera at origin looking down -Z: hand = right*0.5 + up*(-0.5) + front*1
        let h = g.hand_position();
        assert!((h - Vector3::new(0.5, -0.5, -1.0)).norm() < 1e-6);
        assert!((g.ball.position - h).norm() < 1e-9);
    }

    #[test]
    fn test_walk_forward_and_clamp() {
        let mut g = game();
        let input = FrameInput {
            forward: true,
            ..idle()
        };
        g.update(&input, 0.1);
        assert!((g.camera.position.z - (-0.8)).abs() < 1e-5);

        for _ in 0..100 {
            g.update(&input, 0.05);
        }
        assert_eq!(g.camera.position.z, g.bounds.z0);
        assert_eq!(g.camera.position.y, 0.0);
    }

    #[test]
    fn test_diagonal_not_normalized() {
        let mut g = game();
        let input = FrameInput {
            forward: true,
            right: true,
            ..idle()
        };
        g.update(&input, 0.1);
        let moved = Vec3::new(g.camera.position.x, 0.0, g.camera.position.z).length();
        assert!((moved - 0.8 * 2f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_held_ball_follows_move() {
        let mut g = game();
        g.update(
            &FrameInput {
                left: true,
                ..idle()
            },
            0.1,
        );
        assert!((g.ball.position - g.hand_position()).norm() < 1e-9);
        assert!((g.ball.position.x - (0.5 - 0.8)).abs() < 1e-5);
    }

    #[test]
    fn test_throw_then_fly() {
        let mut g = game();
        let hand = g.hand_position();
        let ev = g.update(
            &FrameInput {
                throw: true,
                ..idle()
            },
            DT,
        );
        assert_eq!(ev, Some(BallEvent::Thrown));
        assert!(g.ball.is_flying());
        assert_eq!(g.throws, 1);

        // thrown from the hand along -Z, then one Euler step in the same frame
        let vy = courtside_core::GRAVITY_Y * DT as f64;
        assert!((g.ball.velocity.z + 15.0).abs() < 1e-5);
        assert!((g.ball.velocity.y - vy).abs() < 1e-9);
        let dt = DT as f64;
        assert!((g.ball.position.z - (hand.z - 15.0 * dt)).abs() < 1e-5);
        assert!((g.ball.position.y - (hand.y + vy * dt)).abs() < 1e-9);
        assert_eq!(g.trail.len(), 1);

        // another press mid-flight does nothing
        let ev = g.update(
            &FrameInput {
                throw: true,
                ..idle()
            },
            DT,
        );
        assert_eq!(ev, None);
        assert_eq!(g.throws, 1);
    }

    #[test]
    fn test_recall_same_frame() {
        let mut g = game();
        g.update(
            &FrameInput {
                throw: true,
                ..idle()
            },
            DT,
        );
        for _ in 0..10 {
            g.update(&idle(), DT);
        }
        let ev = g.update(
            &FrameInput {
                recall: true,
                ..idle()
            },
            DT,
        );
        assert_eq!(ev, Some(BallEvent::Recalled));
        assert!(!g.ball.is_flying());
        assert!((g.ball.position - g.hand_position()).norm() < 1e-9);
        assert!(g.trail.is_empty());
        assert_eq!(g.recalls, 1);
    }

    #[test]
    fn test_drop_snaps_to_hand() {
        let mut g = game();
        g.camera.set_orientation(-90.0, -60.0);
        g.update(
            &FrameInput {
                throw: true,
                ..idle()
            },
            DT,
        );
        let mut dropped = false;
        for _ in 0..600 {
            if g.update(&idle(), DT) == Some(BallEvent::Dropped) {
                dropped = true;
                break;
            }
        }
        assert!(dropped);
        assert_eq!(g.drops, 1);
        assert!(!g.ball.is_flying());
        assert!((g.ball.position - g.hand_position()).norm() < 1e-9);
    }

    #[test]
    fn test_first_cursor_seeds_look() {
        let mut g = game();
        let at = |x, y| FrameInput {
            cursor: Some(Vec2::new(x, y)),
            ..idle()
        };
        g.update(&at(100.0, 50.0), DT);
        assert_eq!(g.camera.yaw(), -90.0);
        g.update(&at(110.0, 50.0), 0.01);
        assert!((g.camera.yaw() - (-80.0)).abs() < 1e-4);
    }

    #[test]
    fn test_out_of_bounds_start_clamped_without_moving() {
        let mut config = GameConfig::default();
        config.camera.start = [20.0, 0.0, -20.0];
        let mut g = GameState::new(&config);
        assert!(!g.bounds.contains(g.camera.position));
        g.update(&idle(), DT);
        assert!(g.bounds.contains(g.camera.position));
        assert_eq!(g.camera.position.x, g.bounds.x1);
        assert_eq!(g.camera.position.z, g.bounds.z0);
    }

    #[test]
    fn test_reset_look_reseeds_cursor() {
        let mut g = game();
        let at = |x, y| FrameInput {
            cursor: Some(Vec2::new(x, y)),
            ..idle()
        };
        g.update(&at(0.0, 0.0), DT);
        g.reset_look();
        // a jump in the cursor after refocus does not turn the view
        g.update(&at(400.0, 300.0), 0.01);
        assert_eq!(g.camera.yaw(), -90.0);
        assert_eq!(g.camera.pitch(), 0.0);
        g.update(&at(410.0, 300.0), 0.01);
        assert!((g.camera.yaw() - (-80.0)).abs() < 1e-4);
    }

    #[test]
    fn test_trail_bounded() {
        let mut g = game();
        g.camera.set_orientation(-90.0, 80.0);
        g.update(
            &FrameInput {
                throw: true,
                ..idle()
            },
            DT,
        );
        for _ in 0..(TRAIL_LEN * 2) {
            g.update(&idle(), DT);
        }
        assert!(g.ball.is_flying());
        assert_eq!(g.trail.len(), TRAIL_LEN);
    }
}
