//! First-person camera with projection matrices.

use glam::{Mat4, Vec2, Vec3};

/// Pitch limit (degrees). Keeps the view away from the poles so the basis never flips.
pub const PITCH_LIMIT: f32 = 89.0;

/// First-person camera driven by yaw/pitch Euler angles.
///
/// The basis (front/right/up) is derived state: it is recomputed from yaw and
/// pitch whenever either changes and cannot be set directly.
#[derive(Debug, Clone)]
pub struct FirstPersonCamera {
    /// Eye position (world space).
    pub position: Vec3,
    /// Vertical FOV (degrees).
    pub fov: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Mouse sensitivity, degrees per pixel per second.
    pub sensitivity: f32,
    /// Heading (degrees). -90 looks down -Z.
    yaw: f32,
    /// Elevation (degrees), clamped to ±PITCH_LIMIT.
    pitch: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    /// Last seen cursor position; None until the first sample seeds it.
    last_cursor: Option<Vec2>,
}

impl FirstPersonCamera {
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            fov: 60.0,
            near: 0.1,
            far: 100.0,
            sensitivity: 100.0,
            yaw: -90.0,
            pitch: 0.0,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            last_cursor: None,
        };
        camera.update_vectors();
        camera
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    #[inline]
    pub fn front(&self) -> Vec3 {
        self.front
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Front projected onto the ground plane (Y = 0), normalized.
    pub fn flat_front(&self) -> Vec3 {
        Vec3::new(self.front.x, 0.0, self.front.z).normalize_or_zero()
    }

    /// Right projected onto the ground plane (Y = 0), normalized.
    pub fn flat_right(&self) -> Vec3 {
        Vec3::new(self.right.x, 0.0, self.right.z).normalize_or_zero()
    }

    /// Set the orientation directly (degrees). Pitch is clamped.
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch;
        self.update_vectors();
    }

    /// Feed the current cursor position for this frame.
    ///
    /// The first sample only seeds the last position; later samples rotate by
    /// the delta since the previous one.
    pub fn mouse_look(&mut self, cursor: Vec2, dt: f32) {
        match self.last_cursor.replace(cursor) {
            None => self.update_vectors(),
            Some(last) => {
                let delta = cursor - last;
                self.rotate(delta.x, delta.y, dt);
            }
        }
    }

    /// Forget the last cursor sample, so the next one seeds again.
    pub fn reset_mouse(&mut self) {
        self.last_cursor = None;
    }

    /// Rotate by a mouse delta in pixels. Screen Y grows downward, so +dy looks down.
    pub fn rotate(&mut self, dx: f32, dy: f32, dt: f32) {
        self.yaw += dx * self.sensitivity * dt;
        self.pitch -= dy * self.sensitivity * dt;
        self.update_vectors();
    }

    /// Eye position (world space).
    pub fn eye(&self) -> Vec3 {
        self.position
    }

    /// View matrix (world → camera).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Projection matrix.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect, self.near, self.far)
    }

    /// Combined view-projection matrix.
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    fn update_vectors(&mut self) {
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let (sy, cy) = self.yaw.to_radians().sin_cos();
        let (sp, cp) = self.pitch.to_radians().sin_cos();

        self.front = Vec3::new(cp * cy, sp, cp * sy).normalize();
        self.right = self.front.cross(Vec3::Y).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

/// GPU-uploadable camera uniform.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye_pos: [f32; 4], // w unused, for alignment
}

impl CameraUniform {
    pub fn from_camera(camera: &FirstPersonCamera, aspect: f32) -> Self {
        let vp = camera.view_projection(aspect);
        let eye = camera.eye();

        Self {
            view_proj: vp.to_cols_array_2d(),
            eye_pos: [eye.x, eye.y, eye.z, 1.0],
        }
    }
}
