//! Read-only camera access for camera-relative uniforms.

use glam::{Mat4, Quat, Vec3};

/// Anything that can report where the viewer is.
pub trait CameraProvider {
    fn position(&self) -> Vec3;
    fn orientation(&self) -> Quat;
}

/// A plain perspective camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 30.0),
            rotation: Quat::IDENTITY,
            fov_y: 75f32.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Camera at `position` facing `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let mut camera = Self {
            position,
            ..Self::default()
        };
        camera.look_at(target);
        camera
    }

    /// Turn to face `target`, keeping +Y as up where possible.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = target - self.position;
        if dir.length_squared() < f32::EPSILON {
            return;
        }
        let up = if dir.normalize().cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        // look_at_rh builds the view matrix; the camera rotation is its inverse.
        let view = Mat4::look_at_rh(self.position, target, up);
        self.rotation = Quat::from_mat4(&view.inverse()).normalize();
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn view_matrix(&self) -> Mat4 {
        (Mat4::from_translation(self.position) * Mat4::from_quat(self.rotation)).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.near, self.far)
    }

    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }
}

impl CameraProvider for Camera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn orientation(&self) -> Quat {
        self.rotation
    }
}
