/// Replay a recorded input script through a viewport controller
///
/// Usage: `rawview-replay <script.json> [config.json]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = replay::run(&args) {
        eprintln!("rawview-replay: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod replay {
    use std::path::Path;

    use rawview::{ConfigError, InputEvent, ViewerConfig, ViewportController};
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum ReplayError {
        #[error("usage: rawview-replay <script.json> [config.json]")]
        Usage,

        #[error("Failed to read script: {0}")]
        Io(#[from] std::io::Error),

        #[error("Failed to parse script: {0}")]
        Script(#[from] serde_json::Error),

        #[error("Invalid config: {0}")]
        Config(#[from] ConfigError),
    }

    pub fn run(args: &[String]) -> Result<(), ReplayError> {
        let (script_path, config_path) = match args {
            [script] => (script, None),
            [script, config] => (script, Some(config)),
            _ => return Err(ReplayError::Usage),
        };

        let config = match config_path {
            Some(path) => ViewerConfig::load(Path::new(path))?,
            None => ViewerConfig::load_from_default_path().unwrap_or_default(),
        };

        env_logger::Builder::new()
            .filter_level(config.log_level.to_level_filter())
            .parse_default_env()
            .init();

        let script = std::fs::read_to_string(script_path)?;
        let events: Vec<InputEvent> = serde_json::from_str(&script)?;
        log::info!("Replaying {} events from {}", events.len(), script_path);

        let mut controller = ViewportController::with_config(config.zoom);
        for (index, event) in events.iter().enumerate() {
            controller.dispatch(event);
            let t = controller.transform();
            println!(
                "{:>4} {:<12} zoom={:.4} pan=({:.2}, {:.2}) dragging={}",
                index,
                event.kind(),
                t.zoom,
                t.pan_x,
                t.pan_y,
                controller.is_dragging()
            );
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
