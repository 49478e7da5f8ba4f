use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use std::rc::Rc;

use trailmap_layers::prelude::*;
use trailmap_track::{Observable, Track};

#[derive(Parser, Debug)]
#[command(
    name = "trailmap-preview",
    author,
    version,
    about = "Render GPX files through the trailmap layer manager",
    long_about = "Loads GPX files, registers each one as a track layer on an in-memory map, \
                  and writes the resulting style state (layers bottom to top with their \
                  GeoJSON data) as JSON.\n\n\
                  Useful for checking palette assignment, per-feature styling and layer \
                  order without a browser."
)]
struct Args {
    /// GPX files, drawn in the given order (last on top)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Layer configuration JSON (palette, default weight/opacity, line join/cap)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the map state here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Move the n-th input (0-based) above all others
    #[arg(long)]
    front: Option<usize>,

    /// Register tracks before the style has loaded, then load it
    #[arg(long)]
    deferred_style: bool,

    /// Swap the style once after registration, as a basemap change would
    #[arg(long)]
    reload_style: bool,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    for input in &args.inputs {
        if !input.exists() {
            bail!("Input file does not exist: {}", input.display());
        }
    }
    if let Some(front) = args.front {
        if front >= args.inputs.len() {
            bail!("--front {front} is out of range for {} inputs", args.inputs.len());
        }
    }

    let config = match &args.config {
        Some(path) => {
            tracing::info!("Config: {}", path.display());
            LayerConfig::load(path).context("Failed to load layer config")?
        }
        None => LayerConfig::default(),
    };

    let surface = Rc::new(if args.deferred_style {
        MemorySurface::loading()
    } else {
        MemorySurface::new()
    });
    let selection = Rc::new(Selection::new());
    let mut layers =
        GpxLayers::with_config(Rc::clone(&surface), selection, ToolState::new(), &config)
            .context("Invalid layer config")?;

    let mut handles = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        let track = Track::open(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        let points = track.point_count();
        let bounds = track.bounds();
        let track = Observable::new(track);

        let handle = layers
            .register(&track)
            .with_context(|| format!("Failed to register {}", input.display()))?;

        tracing::info!(
            "{} -> {} color {} ({} paths, {} points)",
            input.display(),
            handle.layer_id(),
            handle.binding().color_hex,
            track.get().paths.len(),
            points
        );
        if let Some(bounds) = bounds {
            tracing::debug!(
                "  bounds: [{:.5}, {:.5}] - [{:.5}, {:.5}]",
                bounds.min().x,
                bounds.min().y,
                bounds.max().x,
                bounds.max().y
            );
        }

        handles.push(handle);
    }

    if args.deferred_style {
        tracing::info!("Loading style...");
        surface.finish_style_load();
    }

    if args.reload_style {
        tracing::info!("Reloading style...");
        surface.reload_style();
    }

    if let Some(front) = args.front {
        layers
            .move_to_front(&handles[front])
            .context("Failed to move layer to front")?;
        tracing::info!("Moved {} to front", handles[front].layer_id());
    }

    let palette = layers.palette();
    for id in palette.ids().filter(|id| palette.usage(*id) > 0) {
        tracing::debug!("  {} used by {} tracks", palette.hex(id), palette.usage(id));
    }
    for binding in layers.bindings() {
        tracing::debug!("  {} drawn in {}", binding.layer_id, binding.color_hex);
    }

    let snapshot = serde_json::to_string_pretty(&surface.snapshot())?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, snapshot)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Output written to: {}", path.display());
        }
        None => println!("{snapshot}"),
    }

    for handle in handles {
        layers.unregister(handle).context("Failed to unregister layer")?;
    }

    Ok(())
}
