/// Usage: `turntable [mesh.obj]`. Without an argument the bundled container mesh is shown.
#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use turntable_core::SceneConfig;

    let config = match std::env::args_os().nth(1) {
        Some(path) => SceneConfig::with_mesh_path(path),
        None => SceneConfig::default(),
    };

    match turntable_core::run(config) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error}");
            std::process::ExitCode::FAILURE
        }
    }
}

// The browser starts the library's `#[wasm_bindgen(start)]` entry point instead.
#[cfg(target_arch = "wasm32")]
fn main() {}
