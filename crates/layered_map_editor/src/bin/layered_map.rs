//! Headless tool for layered map documents
//!
//! Run with: `layered_map <command>`. Set `RUST_LOG` to change log verbosity.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use layered_map_core::{MapConfig, MapData, MapDocument, Tileset, BASE_CONTEXT_NAME};
use layered_map_editor::EditorPreferences;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Create, inspect and fix layered map documents
#[derive(Parser)]
#[command(name = "layered_map")]
#[command(about = "Tools for layered tile map documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Map config file (defaults to the editor preferences)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new map document
    New(NewArgs),

    /// Print a summary of a map document
    Info(InfoArgs),

    /// Change the size of a map, keeping its top-left corner
    Resize(ResizeArgs),

    /// Print the collision grid of one context
    Collision(CollisionArgs),
}

#[derive(Args)]
struct NewArgs {
    /// Map document to write
    #[arg(value_name = "MAP")]
    path: PathBuf,

    /// Width in tiles
    #[arg(short, long, default_value_t = 32)]
    length: u32,

    /// Height in tiles
    #[arg(short = 'H', long, default_value_t = 24)]
    height: u32,

    /// Tileset definition files, relative to the map's directory
    #[arg(short, long = "tileset", value_name = "FILE")]
    tilesets: Vec<String>,

    /// Extra contexts inheriting from the base context
    #[arg(short, long = "context", value_name = "NAME")]
    contexts: Vec<String>,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct InfoArgs {
    #[arg(value_name = "MAP")]
    path: PathBuf,
}

#[derive(Args)]
struct ResizeArgs {
    #[arg(value_name = "MAP")]
    path: PathBuf,

    /// New width in tiles
    #[arg(short, long)]
    length: u32,

    /// New height in tiles
    #[arg(short = 'H', long)]
    height: u32,

    /// Write the result here instead of overwriting the input
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct CollisionArgs {
    #[arg(value_name = "MAP")]
    path: PathBuf,

    /// Context to print
    #[arg(short, long, default_value = BASE_CONTEXT_NAME)]
    context: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::New(args) => new_map(args, config),
        Command::Info(args) => print_info(args),
        Command::Resize(args) => resize_map(args, config),
        Command::Collision(args) => print_collision(args, config),
    }
}

fn load_config(path: Option<&Path>) -> Result<MapConfig> {
    match path {
        Some(path) => MapConfig::load(path)
            .with_context(|| format!("Failed to load map config: {}", path.display())),
        None => Ok(EditorPreferences::load().map_config),
    }
}

/// Directory tileset definition filenames are relative to
fn map_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("."))
}

fn load_tileset(map_path: &Path, filename: &str) -> Result<Tileset> {
    let path = map_dir(map_path).join(filename);
    let mut tileset = Tileset::load(&path)
        .with_context(|| format!("Failed to load tileset: {}", path.display()))?;
    tileset.definition_filename = filename.to_string();
    Ok(tileset)
}

/// Load a document and everything it references into a MapData
fn load_map(path: &Path, config: MapConfig) -> Result<MapData> {
    let document = MapDocument::load(path)
        .with_context(|| format!("Failed to read map: {}", path.display()))?;
    let tilesets = document
        .tilesets
        .iter()
        .map(|filename| load_tileset(path, filename))
        .collect::<Result<Vec<_>>>()?;

    let mut map = MapData::new(config);
    map.load_document(&document, tilesets)
        .with_context(|| format!("Invalid map: {}", path.display()))?;
    Ok(map)
}

fn save_map(map: &mut MapData, path: &Path) -> Result<()> {
    let document = map.to_document()?;
    document
        .save(path)
        .with_context(|| format!("Failed to write map: {}", path.display()))?;
    map.set_map_modified(false);
    info!("Saved map to {}", path.display());
    Ok(())
}

fn new_map(args: NewArgs, config: MapConfig) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!(
            "{} already exists\n\nHint: pass --force to overwrite it",
            args.path.display()
        );
    }

    let mut map = MapData::new(config);
    map.create_data(args.length, args.height)?;
    for filename in &args.tilesets {
        let tileset = load_tileset(&args.path, filename)?;
        map.add_tileset(tileset)?;
    }
    for name in &args.contexts {
        let base = map
            .find_tile_context_by_name(BASE_CONTEXT_NAME)
            .map(|c| c.id());
        map.add_tile_context(name, base)?;
    }
    save_map(&mut map, &args.path)
}

fn print_info(args: InfoArgs) -> Result<()> {
    let document = MapDocument::load(&args.path)
        .with_context(|| format!("Failed to read map: {}", args.path.display()))?;

    println!("Map: {}", args.path.display());
    println!("  Version: {}", document.version);
    println!("  Size: {} x {}", document.length, document.height);

    println!("  Tilesets ({}):", document.tilesets.len());
    for (ordinal, filename) in document.tilesets.iter().enumerate() {
        println!("    [{}] {}", ordinal, filename);
    }

    println!("  Layers ({}):", document.layers.len());
    for (index, layer) in document.layers.iter().enumerate() {
        let collision = if layer.collision_enabled { " (collision)" } else { "" };
        println!("    [{}] {}{}", index, layer.name, collision);
    }

    println!("  Contexts ({}):", document.contexts.len());
    for (index, context) in document.contexts.iter().enumerate() {
        let painted: usize = context
            .layers
            .iter()
            .flatten()
            .flatten()
            .filter(|raw| **raw >= 0)
            .count();
        let inherits = match context.inherits {
            Some(parent) => format!(", inherits from {}", parent),
            None => String::new(),
        };
        println!(
            "    {} {}: {} tiles{}",
            index + 1,
            context.name,
            painted,
            inherits
        );
    }
    Ok(())
}

fn resize_map(args: ResizeArgs, config: MapConfig) -> Result<()> {
    let mut map = load_map(&args.path, config)?;
    let (old_length, old_height) = (map.map_length(), map.map_height());
    map.resize_map(args.length, args.height)?;
    info!(
        "Resized {} x {} to {} x {}",
        old_length, old_height, args.length, args.height
    );

    let output = args.output.unwrap_or(args.path);
    save_map(&mut map, &output)
}

fn print_collision(args: CollisionArgs, config: MapConfig) -> Result<()> {
    let map = load_map(&args.path, config)?;
    let Some(index) = map
        .tile_contexts()
        .iter()
        .position(|c| c.name() == args.context)
    else {
        bail!("No context named {:?} in {}", args.context, args.path.display());
    };

    let grid = map.collision_data();
    println!(
        "Collision for {:?} ({} x {} quadrants, # = blocked):",
        args.context,
        grid.width(),
        grid.height()
    );
    for y in 0..grid.height() {
        let row: String = (0..grid.width())
            .map(|x| if grid.is_blocked(x, y, index) { '#' } else { '.' })
            .collect();
        println!("{}", row);
    }
    Ok(())
}
