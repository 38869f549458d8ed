//! # zpl-raster CLI
//!
//! Command-line interface for parsing and rendering ZPL labels.
//!
//! ## Usage
//!
//! ```bash
//! # Dump parsed labels as JSON
//! zpl-raster parse label.zpl
//!
//! # Render the first label of a 4x6 in label at 203 DPI
//! zpl-raster render label.zpl -o label.png
//!
//! # Render the second label at 300 DPI on a 2x1 in label
//! zpl-raster render label.zpl --dpmm 12 --size 2x1 --index 1 -o label.png
//!
//! # Render every label (label-0.png, label-1.png, ...)
//! zpl-raster render label.zpl --all -o label.png
//!
//! # Replace the font 0 face with a TrueType font
//! zpl-raster render label.zpl --font 0=/usr/share/fonts/Arial.ttf -o label.png
//! ```

use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use zpl_raster::{
    FontRegistry, Label, LabelError, RenderOptions, SymbolRegistry, fonts::FaceSlot, render,
    render::Rendered, zpl,
};

/// zpl-raster - ZPL label renderer
#[derive(Parser, Debug)]
#[command(name = "zpl-raster")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug detail (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a ZPL file and print the labels as JSON
    Parse {
        /// ZPL file ("-" for stdin)
        input: PathBuf,
    },

    /// Render labels to PNG
    Render {
        /// ZPL file ("-" for stdin)
        input: PathBuf,

        /// Output PNG file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Output resolution in dots per millimeter (6, 8, 12 or 24)
        #[arg(long, default_value_t = RenderOptions::DPMM_8)]
        dpmm: u32,

        /// Label size in inches, WIDTHxHEIGHT
        #[arg(long, default_value = "4x6", value_parser = parse_size)]
        size: (f64, f64),

        /// Label to render
        #[arg(long, default_value_t = 0, conflicts_with = "all")]
        index: usize,

        /// Render every label, numbering the output files
        #[arg(long)]
        all: bool,

        /// Replace a face with a TrueType font, CODE=PATH (code 0, A or B)
        #[arg(long, value_name = "CODE=PATH")]
        font: Vec<String>,
    },
}

/// Parsed labels plus their count.
#[derive(Serialize)]
struct ParseOutput<'a> {
    count: usize,
    labels: &'a [Label],
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), LabelError> {
    match cli.command {
        Commands::Parse { input } => {
            let data = read_input(&input)?;
            let labels = zpl::parse(&data)?;
            let output = ParseOutput {
                count: labels.len(),
                labels: &labels,
            };
            let json = serde_json::to_string_pretty(&output)?;
            println!("{}", json);
        }
        Commands::Render {
            input,
            output,
            dpmm,
            size,
            index,
            all,
            font,
        } => {
            let data = read_input(&input)?;
            let options = RenderOptions::from_inches(dpmm, size.0, size.1);
            options.canvas_size()?;
            let fonts = load_fonts(&font)?;
            let symbols = SymbolRegistry::standard();

            if all {
                let labels = zpl::parse(&data)?;
                render_all(&labels, &output, &options, &fonts, &symbols)?;
            } else {
                let (rendered, count) =
                    zpl_raster::render_label(&data, index, &options, &fonts, &symbols)?;
                save(&rendered, &output)?;
                println!(
                    "Rendered label {} of {} to {}",
                    index + 1,
                    count,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

/// Render every label in parallel, one file each.
fn render_all(
    labels: &[Label],
    output: &Path,
    options: &RenderOptions,
    fonts: &FontRegistry,
    symbols: &SymbolRegistry,
) -> Result<(), LabelError> {
    let paths = labels
        .par_iter()
        .enumerate()
        .map(|(i, label)| -> Result<PathBuf, LabelError> {
            let rendered = render::render(label, options, fonts, symbols)?;
            let path = numbered_path(output, i);
            save(&rendered, &path)?;
            Ok(path)
        })
        .collect::<Result<Vec<PathBuf>, LabelError>>()?;

    for path in &paths {
        println!("Saved to {}", path.display());
    }
    println!("Rendered {} label(s)", labels.len());
    Ok(())
}

fn save(rendered: &Rendered, path: &Path) -> Result<(), LabelError> {
    if !rendered.diagnostics.is_empty() {
        eprintln!(
            "{}: skipped {} element(s)",
            path.display(),
            rendered.diagnostics.len()
        );
    }
    std::fs::write(path, rendered.to_png()?)?;
    Ok(())
}

/// `label.png` → `label-3.png`
fn numbered_path(path: &Path, index: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "label".to_string());
    let name = match path.extension() {
        Some(ext) => format!("{}-{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}-{}", stem, index),
    };
    path.with_file_name(name)
}

fn read_input(path: &Path) -> Result<Vec<u8>, LabelError> {
    if path.as_os_str() == "-" {
        let mut data = Vec::new();
        std::io::stdin().read_to_end(&mut data)?;
        return Ok(data);
    }
    Ok(std::fs::read(path)?)
}

fn load_fonts(specs: &[String]) -> Result<FontRegistry, LabelError> {
    let mut fonts = FontRegistry::builtin();
    for spec in specs {
        let (code, path) = spec.split_once('=').ok_or_else(|| {
            LabelError::InvalidOption(format!("--font expects CODE=PATH, got {:?}", spec))
        })?;
        let slot = FaceSlot::from_name(code)
            .ok_or_else(|| LabelError::InvalidOption(format!("unknown font code {:?}", code)))?;
        fonts = fonts.with_outline_file(slot, Path::new(path))?;
    }
    Ok(fonts)
}

/// Parse `WxH` in inches.
fn parse_size(s: &str) -> Result<(f64, f64), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {:?}", s))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid size {:?}", v))
    };
    Ok((parse(w)?, parse(h)?))
}
