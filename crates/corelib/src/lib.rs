//! Core types: math re-exports, camera, input state, timing, configuration.

pub use glam::{DVec2, Mat4, Vec2, Vec3, Vec4, vec3};

pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod timing;

pub use error::{CoreError, CoreResult};

#[cfg(test)]
mod tests {
    use super::*;
    use camera::{CameraState, Lens, camera};

    #[test]
    fn camera_is_pure() {
        let lens = Lens::default();
        let r = Vec2::new(12.5, -33.0);
        let a = camera(&lens, 7.25, r).to_cols_array();
        let b = camera(&lens, 7.25, r).to_cols_array();
        let a_bits: Vec<u32> = a.iter().map(|f| f.to_bits()).collect();
        let b_bits: Vec<u32> = b.iter().map(|f| f.to_bits()).collect();
        assert_eq!(a_bits, b_bits);
    }

    #[test]
    fn zero_camera_is_plain_projection() {
        let lens = Lens::default();
        let m = camera(&lens, 0.0, Vec2::ZERO);
        assert_eq!(m, lens.proj());
    }

    #[test]
    fn origin_stays_on_view_axis() {
        let lens = Lens::default();
        let m = camera(&lens, 5.0, Vec2::ZERO);
        let clip = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(clip.x.abs() < 1e-6);
        assert!(clip.y.abs() < 1e-6);
        assert!(clip.w > 0.0);
        let depth = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&depth));
    }

    #[test]
    fn zoom_moves_camera_back() {
        let lens = Lens::default();
        let near = camera(&lens, 2.0, Vec2::ZERO) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let far = camera(&lens, 20.0, Vec2::ZERO) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(far.w > near.w);
    }

    #[test]
    fn turn_is_applied_before_tilt() {
        let lens = Lens::default();
        let rotation = Vec2::new(90.0, 90.0);
        let expected = lens.proj()
            * Mat4::from_translation(vec3(0.0, 0.0, -3.0))
            * Mat4::from_rotation_x(90f32.to_radians())
            * Mat4::from_rotation_y(90f32.to_radians());
        assert_eq!(camera(&lens, 3.0, rotation), expected);

        // A point on +X turned 90° about Y lands on -Z, which the X tilt then
        // moves onto +Y: it must end up above the view axis.
        let clip = camera(&lens, 3.0, rotation) * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!(clip.y / clip.w > 0.1);
        assert!((clip.x / clip.w).abs() < 1e-4);
    }

    #[test]
    fn camera_state_matrix_matches_free_function() {
        let lens = Lens::default();
        let mut state = CameraState::default();
        state.rotation = Vec2::new(10.0, 20.0);
        assert_eq!(state.matrix(&lens), camera(&lens, 40.0, Vec2::new(10.0, 20.0)));
    }

    #[test]
    fn camera_pv_is_finite() {
        let lens = Lens::default().with_aspect(16.0 / 9.0);
        let a = camera(&lens, 0.0, Vec2::new(720.0, -45.0)).to_cols_array();
        assert!(a.iter().all(|f| f.is_finite()));
    }
}
