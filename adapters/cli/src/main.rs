#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Pledge Lungs visualiser.

mod config;
mod summary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use pledge_lungs_core::{adjust_pledges, breathing_transform, ProgressState};
use pledge_lungs_rendering::{
    compose_overlay, compose_scene, AssetCache, DefaultAssetSource, Frame, Gradient, Presentation,
    RenderingBackend, SceneHandle,
};
use pledge_lungs_rendering_macroquad::MacroquadBackend;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use self::{
    config::{load_config_file, Overrides, Settings},
    summary::Summary,
};

/// Animated lungs that fill up as pledges arrive.
#[derive(Debug, Parser)]
#[command(name = "pledge-lungs", version, about)]
struct Cli {
    /// Number of pledges collected so far.
    #[arg(long)]
    pledges: Option<u32>,
    /// glTF model to render, or `builtin:lungs` for the generated model.
    #[arg(long, value_name = "PATH")]
    model: Option<PathBuf>,
    /// TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for marker placement; omitted seeds are drawn from the OS.
    #[arg(long)]
    seed: Option<u64>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, value_name = "BOOL")]
    vsync: Option<bool>,
    /// Log frame timings once per second.
    #[arg(long)]
    show_fps: bool,
    /// Print the derived state instead of opening a window.
    #[arg(long)]
    headless: bool,
    /// Print the headless report as JSON.
    #[arg(long, requires = "headless")]
    json: bool,
}

/// Entry point for the Pledge Lungs command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let file = cli
        .config
        .as_deref()
        .map(load_config_file)
        .transpose()
        .context("failed to load configuration")?;
    let settings = Settings::resolve(
        file,
        Overrides {
            model: cli.model,
            pledges: cli.pledges,
            vsync: cli.vsync,
            show_fps: cli.show_fps.then_some(true),
        },
    )
    .context("invalid configuration")?;

    let mut assets = AssetCache::new(DefaultAssetSource::default());
    let model = assets
        .fetch(&settings.model)
        .with_context(|| format!("failed to load model {}", settings.model.display()))?;
    let progress = ProgressState::from_count(settings.pledges);

    if cli.headless {
        let summary = Summary::new(&progress, &settings.model.to_string_lossy(), &model);
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("failed to encode summary")?
            );
        } else {
            println!("{summary}");
        }
        return Ok(());
    }

    let mut rng = match cli.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let frame = compose_frame(&progress, model.clone(), &mut rng);
    let presentation = Presentation::new(
        settings.window_title,
        settings.window_width,
        settings.window_height,
        Gradient::NIGHT_SKY,
        frame,
    );

    let mut pledges = settings.pledges;
    MacroquadBackend::new()
        .with_vsync(settings.vsync)
        .with_show_fps(settings.show_fps)
        .run(presentation, move |elapsed, input, frame| {
            let adjusted = adjust_pledges(pledges, input.pledge_delta);
            if adjusted != pledges {
                pledges = adjusted;
                let progress = ProgressState::from_count(pledges);
                info!(
                    "pledges now {} ({}%, {:?})",
                    pledges,
                    progress.percentage(),
                    progress.tier()
                );
                *frame = compose_frame(&progress, model.clone(), &mut rng);
            }
            frame.scene.asset.transform = breathing_transform(elapsed);
        })
}

fn compose_frame<R>(progress: &ProgressState, model: SceneHandle, rng: &mut R) -> Frame
where
    R: Rng + ?Sized,
{
    Frame::new(compose_scene(progress, model, rng), compose_overlay(progress))
}
