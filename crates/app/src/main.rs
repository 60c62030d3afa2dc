//! Entry point for the mesh viewer.
//! Logging + CLI options; everything else lives in `platform`.

use corelib::config::ViewerConfig;

/// Process exit code after a failed startup or a fatal render error.
const FAILURE_EXIT_CODE: i32 = -1;

fn parse_backend_arg() -> wgpu::Backends {
    // Accept: --gpu-backend=auto|vulkan|dx12|metal|gl
    let mut backends = wgpu::Backends::all(); // default = auto
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--gpu-backend=") {
            backends = match val.to_ascii_lowercase().as_str() {
                "auto" => wgpu::Backends::all(),
                "vulkan" | "vk" => wgpu::Backends::VULKAN,
                "dx12" | "d3d12" => wgpu::Backends::DX12,
                "metal" | "mtl" => wgpu::Backends::METAL,
                "gl" | "opengl" | "gles" => wgpu::Backends::GL,
                other => {
                    log::warn!("Unknown backend '{}', falling back to auto.", other);
                    wgpu::Backends::all()
                }
            };
        }
    }
    backends
}

/// Log the outcome of the run and map it to the process exit code.
fn exit_code(outcome: anyhow::Result<()>) -> i32 {
    match outcome {
        Ok(()) => {
            log::info!("Graceful shutdown. Bye!");
            0
        }
        Err(e) => {
            log::error!("{e:#}");
            FAILURE_EXIT_CODE
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let backends = parse_backend_arg();
    let config = ViewerConfig::from_args(std::env::args().skip(1));
    log::info!(
        "Starting viewer. Backend: {:?}, window_size={}x{}, mesh={:?}, texture={:?}, strict_assets={}",
        backends,
        config.width,
        config.height,
        config.mesh_path,
        config.texture_path,
        config.strict_assets
    );

    let code = exit_code(platform::run_viewer(config, backends));
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_run_exits_with_minus_one() {
        assert_eq!(exit_code(Err(anyhow::anyhow!("no adapter"))), -1);
    }

    #[test]
    fn graceful_close_exits_with_zero() {
        assert_eq!(exit_code(Ok(())), 0);
    }
}
