use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use pixelizator_wasm::{
    AddOutcome, Bitmap, JsonFileStore, Palette, PersistentPalette, PixelateOptions, Sizing,
    extract_palette, pixelate_bytes,
};
use anyhow::{Context, Result, bail};

/// Pixelate images into flat color blocks, optionally snapped to a palette.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Palette store file
    #[arg(long, global = true, env = "PIXELIZATOR_STORE", default_value = "pixelizator_palette.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pixelate one or more images
    Run {
        /// One or more input image paths
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Number of blocks across the width (wins over --block-size)
        #[arg(short = 'n', long)]
        block_count: Option<u32>,

        /// Block edge length in pixels
        #[arg(short = 's', long)]
        block_size: Option<u32>,

        /// Comma-separated hex colors to snap to instead of the stored palette
        #[arg(short = 'c', long)]
        palette: Option<String>,

        /// Ignore the stored palette and keep raw block averages
        #[arg(long, conflicts_with = "palette")]
        no_stored_palette: bool,

        /// Output directory
        #[arg(short = 'd', long)]
        out_dir: Option<PathBuf>,

        /// Output filename prefix (ignored when --out-dir supplied)
        #[arg(short = 'p', long, default_value = "pixelized_")]
        prefix: String,
    },

    /// Manage the stored palette
    #[command(subcommand)]
    Palette(PaletteCommand),
}

#[derive(Subcommand, Debug)]
enum PaletteCommand {
    /// Print the stored colors with their indices
    List,
    /// Add one or more comma-separated hex colors
    Add { colors: String },
    /// Remove the color at INDEX
    Remove { index: usize },
    /// Remove every color
    Clear,
    /// Add colors suggested by k-means over an image
    Extract {
        image: PathBuf,

        /// Number of colors to extract
        #[arg(short = 'k', long, default_value_t = 8)]
        n_colors: usize,

        /// Shrink the longest side to this many pixels before clustering
        #[arg(long, default_value_t = 128)]
        downscale: u32,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.command {
        Command::Run {
            inputs,
            block_count,
            block_size,
            palette,
            no_stored_palette,
            out_dir,
            prefix,
        } => {
            let palette = match palette {
                Some(list) => list.split(',').collect::<Palette>(),
                None if no_stored_palette => Palette::new(),
                None => PersistentPalette::open(JsonFileStore::new(&args.store)).into_inner().0,
            };
            let options = PixelateOptions {
                sizing: Sizing {
                    block_count,
                    block_size,
                },
            };
            run(&inputs, &options, &palette, out_dir.as_deref(), &prefix)
        }
        Command::Palette(cmd) => manage_palette(cmd, &args.store),
    }
}

fn run(
    inputs: &[PathBuf],
    options: &PixelateOptions,
    palette: &Palette,
    out_dir: Option<&Path>,
    prefix: &str,
) -> Result<()> {
    if palette.is_empty() {
        log::info!("No palette colors, keeping raw block averages");
    } else {
        log::info!("Snapping to {} palette colors", palette.len());
    }

    for input in inputs {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
        let (png, grid) = pixelate_bytes(&bytes, options, palette)
            .with_context(|| format!("pixelate processing failed for {}", input.display()))?;

        let out_path = if let Some(dir) = out_dir {
            let stem = input.file_stem().unwrap_or_default().to_string_lossy();
            dir.join(format!("{stem}.png"))
        } else {
            let stem = input.file_stem().unwrap_or_default().to_string_lossy();
            input.with_file_name(format!("{prefix}{stem}.png"))
        };

        if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&out_path, png)?;
        println!("{grid}");
        println!("Saved → {}", out_path.display());
    }

    Ok(())
}

fn manage_palette(cmd: PaletteCommand, store: &Path) -> Result<()> {
    let mut book = PersistentPalette::open(JsonFileStore::new(store));

    match cmd {
        PaletteCommand::List => {}
        PaletteCommand::Add { colors } => match book.add(&colors)? {
            AddOutcome::Rejected => bail!("Invalid HEX color: {colors}"),
            AddOutcome::Unchanged => log::info!("No new colors in {colors:?}"),
            AddOutcome::Added(n) => log::info!("Added {n} colors"),
        },
        PaletteCommand::Remove { index } => {
            if book.remove_at(index)?.is_none() {
                log::warn!("No color at index {index}");
            }
        }
        PaletteCommand::Clear => book.clear()?,
        PaletteCommand::Extract {
            image,
            n_colors,
            downscale,
        } => {
            let bytes = fs::read(&image).with_context(|| format!("reading {}", image.display()))?;
            let bitmap = Bitmap::decode(&bytes).context("decoding image")?;
            let added = book.extend(extract_palette(&bitmap, n_colors, Some(downscale)))?;
            log::info!("Added {added} extracted colors");
        }
    }

    for (idx, color) in book.palette().colors().iter().enumerate() {
        println!("{idx:>3}  {color}");
    }
    Ok(())
}
