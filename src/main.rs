//! # Etiqueta CLI
//!
//! Command-line interface for QR code label generation and printing.
//!
//! ## Usage
//!
//! ```bash
//! # Preview a QR code in the default image viewer
//! etiqueta create "https://example.net/inventory/4217" 413
//!
//! # Save an annotated label as PNG
//! etiqueta create --annotation "Box 17" --filename box17.png "box-17" 413
//!
//! # Annotate with the encoded data itself
//! etiqueta create --annotate "box-17" 413
//!
//! # List known media and printer models
//! etiqueta print "anything"
//!
//! # Print on 38mm endless tape
//! etiqueta print --label 38 "https://example.net/inventory/4217"
//!
//! # Dump the raster stream to a file instead of a printer
//! etiqueta print --label 62 --backend spool --printer job.bin "box-17"
//! ```

use clap::{Parser, Subcommand};
use image::Rgba;
use std::path::{Path, PathBuf};

use etiqueta::{
    AnnotationMode, EtiquetaError, LabelFont, QrLabel,
    font::DEFAULT_FONT_SIZE,
    printer::{Media, PrintSettings, PrinterModel, print_label},
    protocol::raster::DEFAULT_THRESHOLD,
    transport::{Backend, usb::DEFAULT_ADDRESS},
};

/// Etiqueta - QR code label utility
#[derive(Parser, Debug)]
#[command(name = "etiqueta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a QR code image and save or view it
    Create {
        /// Text to encode
        data: String,

        /// Image width in pixels
        width: u32,

        /// Annotation text below the QR code (embedded \n breaks lines)
        #[arg(long)]
        annotation: Option<String>,

        /// Annotate with the encoded data itself
        #[arg(long)]
        annotate: bool,

        /// Output PNG path (omit to open in the default image viewer)
        #[arg(long, value_name = "FILE")]
        filename: Option<PathBuf>,

        /// Shorthand for --filename qr_code.png
        #[arg(long)]
        save: bool,

        /// TrueType font file for the annotation
        #[arg(long, value_name = "FILE")]
        font: Option<PathBuf>,

        /// Annotation font size in pixels
        #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
        font_size: f32,

        /// Module and text color (name or #RRGGBB)
        #[arg(long, default_value = "black")]
        foreground: String,

        /// Background color (name or #RRGGBB)
        #[arg(long, default_value = "white")]
        background: String,

        /// Transparent background instead of a solid color
        #[arg(long)]
        transparent: bool,

        /// Annotation composition: paste below, or draw onto one canvas
        #[arg(long, default_value = "paste")]
        mode: String,

        /// Padding around the annotation in pixels (defaults to one QR module)
        #[arg(long)]
        padding: Option<f32>,
    },

    /// Print a QR code label on a Brother QL printer
    Print {
        /// Text to encode
        data: String,

        /// Image width in pixels (defaults to the label's printable width)
        width: Option<u32>,

        /// Label media loaded in the printer, e.g. 38 or 62x29
        /// (omit to list known media and models)
        #[arg(long)]
        label: Option<String>,

        /// Annotation text below the QR code
        #[arg(long)]
        annotation: Option<String>,

        /// Printer model
        #[arg(long, default_value = "QL-800")]
        model: String,

        /// Printer address (usb://VID:PID or a device/file path)
        #[arg(long, default_value = DEFAULT_ADDRESS)]
        printer: String,

        /// Transport backend: usb, or spool to write the job to a file
        #[arg(long, default_value = "usb")]
        backend: String,

        /// Leave the tape uncut after printing
        #[arg(long)]
        no_cut: bool,

        /// Darkness cutoff 0-255; pixels below it print black
        #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: u8,

        /// Return as soon as the job is handed off instead of waiting
        #[arg(long)]
        fire_and_forget: bool,

        /// Print despite conversion warnings instead of aborting
        #[arg(long)]
        allow_warnings: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), EtiquetaError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Create {
            data,
            width,
            annotation,
            annotate,
            filename,
            save,
            font,
            font_size,
            foreground,
            background,
            transparent,
            mode,
            padding,
        } => {
            let annotation = resolve_annotation(annotation, annotate, &data);
            let mut label = QrLabel::new(data, width)
                .mode(AnnotationMode::parse(&mode)?)
                .foreground(parse_color(&foreground)?)
                .font(LabelFont::load(font.as_deref(), font_size));
            if transparent {
                label = label.transparent();
            } else {
                label = label.background(parse_color(&background)?);
            }
            if let Some(text) = annotation {
                label = label.annotation(text);
            }
            if let Some(padding) = padding {
                label = label.padding(padding);
            }
            let image = label.build()?;

            let filename = filename.or(save.then(|| PathBuf::from("qr_code.png")));
            match filename {
                Some(path) => {
                    save_png(&image, &path)?;
                    println!("Saved to {}", path.display());
                }
                None => view_png(&image)?,
            }
        }

        Commands::Print {
            data,
            width,
            label,
            annotation,
            model,
            printer,
            backend,
            no_cut,
            threshold,
            fire_and_forget,
            allow_warnings,
        } => {
            // List media and models if no label was specified
            let Some(label_id) = label else {
                println!("Known label media (--label):");
                for known in Media::ALL {
                    println!("  {:8} {} dots printable", known.identifier, known.printable_width());
                }
                println!("\nKnown printer models (--model):");
                for known in PrinterModel::ALL {
                    println!("  {}", known.name);
                }
                return Ok(());
            };

            let media = Media::parse(&label_id)?;
            let settings = PrintSettings {
                model: PrinterModel::parse(&model)?,
                printer,
                backend: Backend::parse(&backend)?,
                blocking: !fire_and_forget,
                error_on_warning: !allow_warnings,
                cut: !no_cut,
                threshold,
            };

            let width = width.unwrap_or_else(|| media.printable_width());
            let mut qr_label = QrLabel::new(data, width);
            if let Some(text) = annotation {
                qr_label = qr_label.annotation(text);
            }
            let image = qr_label.build()?;

            println!(
                "Printing {}x{} label on {}mm media...",
                image.width(),
                image.height(),
                media.tape_mm.0
            );
            print_label(&image, &media, &settings)?;
            println!("Printed successfully!");
        }
    }

    Ok(())
}

/// Pick the annotation text: explicit `--annotation` wins, bare `--annotate`
/// falls back to the encoded data itself.
fn resolve_annotation(annotation: Option<String>, annotate: bool, data: &str) -> Option<String> {
    annotation.or_else(|| annotate.then(|| data.to_string()))
}

/// Resolve a color name or `#RRGGBB` hex string.
fn parse_color(s: &str) -> Result<Rgba<u8>, EtiquetaError> {
    match s.to_lowercase().as_str() {
        "black" => return Ok(Rgba([0, 0, 0, 255])),
        "white" => return Ok(Rgba([255, 255, 255, 255])),
        "red" => return Ok(Rgba([255, 0, 0, 255])),
        "green" => return Ok(Rgba([0, 255, 0, 255])),
        "blue" => return Ok(Rgba([0, 0, 255, 255])),
        _ => {}
    }
    let hex = s.strip_prefix('#').filter(|h| h.len() == 6);
    let channels = hex.and_then(|h| {
        let r = u8::from_str_radix(&h[0..2], 16).ok()?;
        let g = u8::from_str_radix(&h[2..4], 16).ok()?;
        let b = u8::from_str_radix(&h[4..6], 16).ok()?;
        Some([r, g, b, 255])
    });
    channels.map(Rgba).ok_or_else(|| {
        EtiquetaError::InvalidArgument(format!(
            "unknown color '{}' (known: black, white, red, green, blue, #RRGGBB)",
            s
        ))
    })
}

/// Save the label as a PNG file.
fn save_png(image: &image::RgbaImage, path: &Path) -> Result<(), EtiquetaError> {
    image
        .save(path)
        .map_err(|e| EtiquetaError::Image(format!("failed to save PNG: {}", e)))
}

/// Write the label to a temporary PNG and open it in the default viewer.
fn view_png(image: &image::RgbaImage) -> Result<(), EtiquetaError> {
    let path = std::env::temp_dir().join(format!("etiqueta-{}.png", std::process::id()));
    save_png(image, &path)?;
    println!("Opening {}", path.display());

    #[cfg(target_os = "macos")]
    let viewer = "open";
    #[cfg(not(target_os = "macos"))]
    let viewer = "xdg-open";

    std::process::Command::new(viewer).arg(&path).spawn()?;
    Ok(())
}
