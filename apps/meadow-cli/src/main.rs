use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use meadow_assets::FileSystemSource;
use meadow_common::Viewport;
use meadow_orchestrator::{Host, SceneConfig, SceneOrchestrator};
use meadow_render::{HeadlessRenderer, Renderer, RendererSettings};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meadow-cli", about = "Headless tools for the meadow scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene config (YAML); defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and renderer defaults
    Info,
    /// Print the effective scene config as YAML
    Config,
    /// Build the scene and render frames without a GPU
    Run {
        /// Number of frames to render
        #[arg(short, long, default_value = "60")]
        frames: u32,
        /// Viewport width in logical pixels
        #[arg(long, default_value = "800")]
        width: u32,
        /// Viewport height in logical pixels
        #[arg(long, default_value = "600")]
        height: u32,
        /// Device pixel ratio reported by the host
        #[arg(long, default_value = "1.0")]
        pixel_ratio: f64,
        /// Seconds added to uTime per frame
        #[arg(long, default_value = "0.016")]
        dt: f64,
        /// Asset root directory; overrides the config
        #[arg(long)]
        assets: Option<PathBuf>,
    },
}

/// A fixed-size host that counts frame requests.
struct HeadlessHost {
    viewport: Viewport,
    pixel_ratio: f64,
    frames_requested: u64,
}

impl Host for HeadlessHost {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn request_animation_frame(&mut self) {
        self.frames_requested += 1;
    }
}

/// `--assets` wins; otherwise the config's root, as the desktop viewer does.
fn asset_root(flag: Option<PathBuf>, config: &SceneConfig) -> PathBuf {
    flag.unwrap_or_else(|| config.assets.root.clone())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            let settings = RendererSettings::default();
            println!("meadow-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "renderer: antialias={} alpha={} precision={:?} output={:?} tone_mapping={:?} exposure={}",
                settings.antialias,
                settings.alpha,
                settings.precision,
                settings.output_color_space,
                settings.tone_mapping,
                settings.tone_mapping_exposure
            );
            println!(
                "camera: fov={} near={} far={}",
                config.camera.fov, config.camera.near, config.camera.far
            );
            println!(
                "assets: root={} textures={}",
                config.assets.root.display(),
                config.assets.textures.len()
            );
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
        Commands::Run {
            frames,
            width,
            height,
            pixel_ratio,
            dt,
            assets,
        } => {
            let source = Arc::new(FileSystemSource::new(asset_root(assets, &config)));
            let host = HeadlessHost {
                viewport: Viewport::new(width, height),
                pixel_ratio,
                frames_requested: 0,
            };
            let mut orchestrator = SceneOrchestrator::new(host, config, source, |settings| {
                Ok::<_, meadow_render::RenderError>(HeadlessRenderer::new(settings))
            })?;

            let progress = orchestrator.wait_for_assets(Duration::from_secs(10));
            tracing::info!(
                loaded = progress.items_loaded,
                failed = progress.items_failed,
                "assets settled"
            );

            for _ in 0..frames {
                orchestrator.frame_with_delta(dt);
            }

            let renderer = orchestrator.renderer();
            print!("{}", renderer.describe(&orchestrator.current_frame()));
            println!(
                "frames requested: {}",
                orchestrator.host().frames_requested
            );
            println!("render info: {}", renderer.info());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_reads_assets_from_config_root_by_default() {
        let mut config = SceneConfig::default();
        config.assets.root = PathBuf::from("/srv/meadow/assets");
        assert_eq!(asset_root(None, &config), PathBuf::from("/srv/meadow/assets"));
    }

    #[test]
    fn assets_flag_overrides_config_root() {
        let config = SceneConfig::default();
        let root = asset_root(Some(PathBuf::from("local")), &config);
        assert_eq!(root, PathBuf::from("local"));
    }
}
