use crate::{Mat4, Vec2, vec3};

/// Perspective lens (right-handed, depth in [0, 1]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lens {
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Lens {
    pub fn new(fov_y_deg: f32, aspect: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov_y_deg,
            aspect,
            z_near,
            z_far,
        }
    }

    #[inline]
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_deg.to_radians(),
            self.aspect.max(1e-6),
            self.z_near,
            self.z_far,
        )
    }

    #[inline]
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }
}

impl Default for Lens {
    fn default() -> Self {
        Self::new(45.0, 1920.0 / 1080.0, 0.1, 100.0)
    }
}

/// Orbit state driven by input. Rotation is in degrees, zoom is the
/// distance the camera backs away along -Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub rotation: Vec2,
    pub zoom: f32,
}

impl CameraState {
    pub const DEFAULT_ZOOM: f32 = 40.0;

    pub fn new(zoom: f32) -> Self {
        Self {
            rotation: Vec2::ZERO,
            zoom: zoom.max(0.0),
        }
    }

    /// Model-view-projection for the current state.
    #[inline]
    pub fn matrix(&self, lens: &Lens) -> Mat4 {
        camera(lens, self.zoom, self.rotation)
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ZOOM)
    }
}

/// Build `proj * view * model` for a single static mesh.
///
/// The view backs off by `zoom`, tilts by `rotation.y` degrees about X and
/// then turns by `rotation.x` degrees about Y (both post-multiplied, so the
/// turn is applied to the mesh first). The model matrix is identity.
pub fn camera(lens: &Lens, zoom: f32, rotation: Vec2) -> Mat4 {
    let view = Mat4::from_translation(vec3(0.0, 0.0, -zoom))
        * Mat4::from_rotation_x(rotation.y.to_radians())
        * Mat4::from_rotation_y(rotation.x.to_radians());
    let model = Mat4::IDENTITY;
    lens.proj() * view * model
}
