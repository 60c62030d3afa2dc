//! Viewer configuration: defaults plus `--key=value` command-line overrides.

use std::path::PathBuf;
use std::str::FromStr;

use crate::camera::{CameraState, Lens};
use crate::error::{CoreError, CoreResult};

pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;
pub const DEFAULT_MESH_PATH: &str = "model/rabbit.obj";
pub const DEFAULT_TEXTURE_PATH: &str = "model/rabbit.jpg";

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    pub mesh_path: PathBuf,
    pub texture_path: PathBuf,
    /// Aspect always follows `width / height`.
    pub lens: Lens,
    pub initial_zoom: f32,
    /// Abort startup on missing or malformed assets instead of continuing
    /// with placeholder data.
    pub strict_assets: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            mesh_path: PathBuf::from(DEFAULT_MESH_PATH),
            texture_path: PathBuf::from(DEFAULT_TEXTURE_PATH),
            lens: Lens::default().with_aspect(DEFAULT_WIDTH as f32 / DEFAULT_HEIGHT as f32),
            initial_zoom: CameraState::DEFAULT_ZOOM,
            strict_assets: true,
        }
    }
}

impl ViewerConfig {
    /// Build a config from command-line arguments.
    ///
    /// Accepts `--size=WxH`, `--width=N`, `--height=N`, `--mesh=PATH`,
    /// `--texture=PATH`, `--fov=DEG`, `--near=F`, `--far=F`, `--zoom=F` and
    /// `--lenient-assets`. Malformed values are logged and the default kept;
    /// unrecognized arguments are left for other parsers.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cfg = Self::default();
        for arg in args {
            if let Err(e) = cfg.apply_arg(arg.as_ref()) {
                log::warn!("{e}; keeping default");
            }
        }
        cfg.lens.aspect = cfg.aspect();
        cfg
    }

    fn apply_arg(&mut self, arg: &str) -> CoreResult<()> {
        if arg == "--lenient-assets" {
            self.strict_assets = false;
            return Ok(());
        }
        let Some((key, value)) = arg.strip_prefix("--").and_then(|a| a.split_once('=')) else {
            return Ok(());
        };
        match key {
            "size" => {
                let (w, h) = value
                    .split_once('x')
                    .or_else(|| value.split_once('X'))
                    .ok_or_else(|| invalid(key, value))?;
                let w = parse_value::<u32>(key, w)?;
                let h = parse_value::<u32>(key, h)?;
                self.width = w;
                self.height = h;
            }
            "width" => self.width = parse_value(key, value)?,
            "height" => self.height = parse_value(key, value)?,
            "mesh" => self.mesh_path = PathBuf::from(value),
            "texture" => self.texture_path = PathBuf::from(value),
            "fov" => self.lens.fov_y_deg = parse_value(key, value)?,
            "near" => self.lens.z_near = parse_value(key, value)?,
            "far" => self.lens.z_far = parse_value(key, value)?,
            "zoom" => self.initial_zoom = parse_value::<f32>(key, value)?.max(0.0),
            _ => {}
        }
        Ok(())
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    /// Reject values the renderer cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        let fov = self.lens.fov_y_deg;
        if !(fov > 0.0 && fov < 180.0) {
            return Err(CoreError::InvalidFov { fov });
        }
        let (near, far) = (self.lens.z_near, self.lens.z_far);
        if !(near > 0.0 && far > near) {
            return Err(CoreError::InvalidClipPlanes { near, far });
        }
        Ok(())
    }

    pub fn initial_camera(&self) -> CameraState {
        CameraState::new(self.initial_zoom)
    }
}

fn parse_value<T: FromStr>(option: &str, value: &str) -> CoreResult<T> {
    value.trim().parse::<T>().map_err(|_| invalid(option, value))
}

fn invalid(option: &str, value: &str) -> CoreError {
    CoreError::InvalidOption {
        option: option.to_owned(),
        value: value.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_viewer() {
        let cfg = ViewerConfig::from_args(Vec::<String>::new());
        assert_eq!(cfg, ViewerConfig::default());
        assert_eq!((cfg.width, cfg.height), (1920, 1080));
        assert_eq!(cfg.mesh_path, PathBuf::from("model/rabbit.obj"));
        assert_eq!(cfg.texture_path, PathBuf::from("model/rabbit.jpg"));
        assert_eq!(cfg.lens.fov_y_deg, 45.0);
        assert_eq!(cfg.lens.z_near, 0.1);
        assert_eq!(cfg.lens.z_far, 100.0);
        assert!(cfg.strict_assets);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parses_overrides() {
        let cfg = ViewerConfig::from_args([
            "viewer",
            "--size=800x600",
            "--mesh=assets/cube.obj",
            "--texture=assets/cube.png",
            "--fov=60",
            "--near=0.5",
            "--far=250",
            "--zoom=-3",
            "--lenient-assets",
            "--gpu-backend=vulkan",
        ]);
        assert_eq!((cfg.width, cfg.height), (800, 600));
        assert_eq!(cfg.lens.aspect, 800.0 / 600.0);
        assert_eq!(cfg.mesh_path, PathBuf::from("assets/cube.obj"));
        assert_eq!(cfg.texture_path, PathBuf::from("assets/cube.png"));
        assert_eq!(cfg.lens.fov_y_deg, 60.0);
        assert_eq!(cfg.lens.z_near, 0.5);
        assert_eq!(cfg.lens.z_far, 250.0);
        assert_eq!(cfg.initial_zoom, 0.0);
        assert!(!cfg.strict_assets);
    }

    #[test]
    fn malformed_values_keep_defaults() {
        let cfg = ViewerConfig::from_args(["--size=wide", "--width=abc", "--fov=", "--height=720"]);
        assert_eq!(cfg.width, DEFAULT_WIDTH);
        assert_eq!(cfg.height, 720);
        assert_eq!(cfg.lens.fov_y_deg, 45.0);
    }

    #[test]
    fn validate_rejects_bad_planes_and_viewport() {
        let mut cfg = ViewerConfig::default();
        cfg.lens.z_far = 0.05;
        assert!(matches!(
            cfg.validate(),
            Err(CoreError::InvalidClipPlanes { .. })
        ));

        let cfg = ViewerConfig::from_args(["--width=0"]);
        assert!(matches!(
            cfg.validate(),
            Err(CoreError::InvalidViewport { .. })
        ));
    }

    #[test]
    fn validate_rejects_degenerate_fov() {
        for arg in ["--fov=0", "--fov=180", "--fov=-10", "--fov=NaN"] {
            let cfg = ViewerConfig::from_args([arg]);
            assert!(
                matches!(cfg.validate(), Err(CoreError::InvalidFov { .. })),
                "{arg} accepted"
            );
        }
        assert!(ViewerConfig::from_args(["--fov=179.5"]).validate().is_ok());
    }
}
