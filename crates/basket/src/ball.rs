//! Ball flight: held in hand, thrown, falling under gravity, recalled.
//!
//! Kinematic only. The ball passes through rings, boards and the floor.

use nalgebra::Vector3;

/// Visual radius of the ball (world units).
pub const BALL_RADIUS: f32 = 0.12;

/// Where the ball is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallState {
    /// Rigidly attached to the hand; velocity is ignored.
    Held,
    /// Integrating gravity each frame.
    Flying,
}

/// State transitions reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallEvent {
    Thrown,
    /// Right-button recall while in flight.
    Recalled,
    /// Fell below the floor threshold and returned to the hand.
    Dropped,
}

/// Ball state.
#[derive(Debug, Clone)]
pub struct Ball {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub state: BallState,
}

impl Ball {
    pub fn new(hand: Vector3<f64>) -> Self {
        Self {
            position: hand,
            velocity: Vector3::zeros(),
            state: BallState::Held,
        }
    }

    #[inline]
    pub fn is_flying(&self) -> bool {
        self.state == BallState::Flying
    }

    /// Launch from `hand` along `front`. No-op (returns false) when already flying.
    pub fn throw(&mut self, hand: Vector3<f64>, front: Vector3<f64>, force: f64) -> bool {
        if self.is_flying() {
            return false;
        }
        self.position = hand;
        self.velocity = front * force;
        self.state = BallState::Flying;
        true
    }

    /// Return to the hand immediately. Returns true if the ball was in flight.
    pub fn recall(&mut self, hand: Vector3<f64>) -> bool {
        let was_flying = self.is_flying();
        self.state = BallState::Held;
        self.velocity = Vector3::zeros();
        self.position = hand;
        was_flying
    }

    /// Integrate one timestep (explicit Euler: velocity first, then position).
    /// Returns true if the ball fell below `floor`; it is then back at `hand`.
    pub fn step(&mut self, dt: f64, gravity: f64, floor: f64, hand: Vector3<f64>) -> bool {
        if !self.is_flying() {
            return false;
        }
        self.velocity.y += gravity * dt;
        self.position += self.velocity * dt;

        if self.position.y < floor {
            self.state = BallState::Held;
            self.velocity = Vector3::zeros();
            self.position = hand;
            return true;
        }
        false
    }

    /// Track the hand while held.
    pub fn follow(&mut self, hand: Vector3<f64>) {
        if !self.is_flying() {
            self.position = hand;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: f64 = -9.81;
    const FLOOR: f64 = -10.0;

    fn hand() -> Vector3<f64> {
        Vector3::new(0.5, -0.5, -1.0)
    }

    #[test]
    fn test_new_ball_is_held_at_hand() {
        let ball = Ball::new(hand());
        assert!(!ball.is_flying());
        assert_eq!(ball.position, hand());
    }

    #[test]
    fn test_throw_sets_velocity_along_front() {
        let mut ball = Ball::new(hand());
        let front = Vector3::new(0.0, 0.0, -1.0);
        assert!(ball.throw(hand(), front, 15.0));
        assert!(ball.is_flying());
        assert_eq!(ball.velocity, Vector3::new(0.0, 0.0, -15.0));
        assert_eq!(ball.position, hand());
    }

    #[test]
    fn test_throw_while_flying_is_noop() {
        let mut ball = Ball::new(hand());
        ball.throw(hand(), Vector3::new(0.0, 1.0, 0.0), 15.0);
        ball.step(0.1, G, FLOOR, hand());
        let (p, v) = (ball.position, ball.velocity);

        assert!(!ball.throw(Vector3::zeros(), Vector3::new(1.0, 0.0, 0.0), 50.0));
        assert_eq!(ball.position, p);
        assert_eq!(ball.velocity, v);
    }

    #[test]
    fn test_euler_accumulation() {
        let mut ball = Ball::new(Vector3::zeros());
        let v0 = Vector3::new(1.0, 5.0, -2.0);
        ball.throw(Vector3::zeros(), v0, 1.0);

        let dt = 1.0 / 60.0;
        let n = 30;
        let mut expect_p = Vector3::zeros();
        let mut expect_v = v0;
        for _ in 0..n {
            ball.step(dt, G, FLOOR, Vector3::zeros());
            expect_v.y += G * dt;
            expect_p += expect_v * dt;
        }
        assert!((ball.velocity.y - (v0.y + G * n as f64 * dt)).abs() < 1e-9);
        assert!((ball.position - expect_p).norm() < 1e-9);
        assert_eq!(ball.velocity.x, 1.0);
        assert_eq!(ball.velocity.z, -2.0);
    }

    #[test]
    fn test_drop_below_floor_returns_to_hand() {
        let mut ball = Ball::new(hand());
        ball.throw(hand(), Vector3::new(0.0, -1.0, 0.0), 15.0);

        let new_hand = Vector3::new(2.0, 0.0, 1.0);
        let mut landed = false;
        for _ in 0..200 {
            if ball.step(0.02, G, FLOOR, new_hand) {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert!(!ball.is_flying());
        // held again at the hand, not left below the floor
        assert_eq!(ball.position, new_hand);
        assert_eq!(ball.velocity, Vector3::zeros());
    }

    #[test]
    fn test_recall_relocates_immediately() {
        let mut ball = Ball::new(hand());
        ball.throw(hand(), Vector3::new(0.0, 0.6, -0.8), 15.0);
        ball.step(0.05, G, FLOOR, hand());

        let h = Vector3::new(1.0, 1.0, 1.0);
        assert!(ball.recall(h));
        assert!(!ball.is_flying());
        assert_eq!(ball.position, h);
        assert_eq!(ball.velocity, Vector3::zeros());
        // recall while held is not a transition
        assert!(!ball.recall(h));
    }

    #[test]
    fn test_follow_ignored_in_flight() {
        let mut ball = Ball::new(hand());
        ball.throw(hand(), Vector3::new(0.0, 0.0, -1.0), 15.0);
        ball.follow(Vector3::new(9.0, 9.0, 9.0));
        assert_eq!(ball.position, hand());
        assert!(!ball.step(0.0, G, FLOOR, hand()));
    }
}
