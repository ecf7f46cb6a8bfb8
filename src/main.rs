use clap::{Parser, Subcommand};
use exif_frame::caption::build_caption;
use exif_frame::config::{self, FrameConfig};
use exif_frame::imaging::{ExifExtractor, FrameStyle, MetadataExtractor, RustBackend};
use exif_frame::output::{self, FrameSummary};
use exif_frame::session::EditSession;
use std::path::{Path, PathBuf};

const RENDER_FAILED: &str = "rendering failed; see the log for details";

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "exif-frame")]
#[command(about = "Frame photos with a caption built from their EXIF data")]
#[command(long_about = "\
Frame photos with a caption built from their EXIF data

The photo is placed on a larger canvas with a caption band underneath:

  ┌──────────────────────────────┐
  │  ┌────────────────────────┐  │
  │  │         photo          │  │
  │  └────────────────────────┘  │
  │          Acme  X1            │  ← title: make, model, lens
  │  50mm  f/1.8  1/200s  ISO400 │  ← detail: focal length, aperture,
  └──────────────────────────────┘    shutter speed, ISO

Frame styles:
  white   solid white background
  blur    blurred copy of the photo, washed out
  black   blurred copy of the photo, darkened

Both caption lines can be overridden with --title and --detail.

Run 'exif-frame gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (default: ./config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug details (extraction, render timings)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Frame a photo and write the JPEG
    Frame {
        /// Photo to frame (JPEG, PNG, TIFF, WebP)
        input: PathBuf,
        /// Frame style: white, blur or black (default from config)
        #[arg(long)]
        style: Option<FrameStyle>,
        /// Replace the title line
        #[arg(long)]
        title: Option<String>,
        /// Replace the detail line
        #[arg(long)]
        detail: Option<String>,
        /// Output file (default: output.file_name from config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the extracted EXIF tags as JSON
    Metadata {
        input: PathBuf,
    },
    /// Print the caption derived from the EXIF tags
    Caption {
        input: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Frame {
            input,
            style,
            title,
            detail,
            output,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let backend = RustBackend::from_font_files(
                config.fonts.title.as_deref(),
                config.fonts.detail.as_deref(),
            )?;
            let mut session =
                EditSession::new(backend, ExifExtractor::default(), config.render_settings())
                    .with_default_style(config.frame.style);

            let bytes = std::fs::read(&input)?;
            session.upload(&bytes)?;
            if session.download().is_none() {
                return Err(RENDER_FAILED.into());
            }

            // Each override is an edit, exactly like typing into the caption fields.
            // A failed edit must not fall back to writing the previous frame.
            if let Some(style) = style
                && session.set_frame_style(style).is_none()
            {
                return Err(RENDER_FAILED.into());
            }
            if let Some(title) = title
                && session.set_title(title).is_none()
            {
                return Err(RENDER_FAILED.into());
            }
            if let Some(detail) = detail
                && session.set_detail(detail).is_none()
            {
                return Err(RENDER_FAILED.into());
            }

            let rendered = session.download().ok_or(RENDER_FAILED)?;
            let output_path = output.unwrap_or_else(|| PathBuf::from(&rendered.file_name));
            std::fs::write(&output_path, &rendered.bytes)?;

            let (Some(image), Some(caption)) = (session.image(), session.caption()) else {
                return Err("no photo loaded".into());
            };
            output::print_frame_output(&FrameSummary {
                input: &input,
                source_dimensions: image.dimensions(),
                style: session.frame_style(),
                caption,
                output: &output_path,
                bytes: rendered.bytes.len(),
            });
        }
        Command::Metadata { input } => {
            let bytes = std::fs::read(&input)?;
            let metadata = ExifExtractor::default().extract(&bytes)?;
            output::print_metadata_output(&metadata)?;
        }
        Command::Caption { input } => {
            let bytes = std::fs::read(&input)?;
            let metadata = ExifExtractor::default().extract(&bytes)?;
            output::print_caption_output(&build_caption(&metadata));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

/// Explicit `--config` file, else `config.toml` in the working directory.
fn load_config(path: Option<&Path>) -> Result<FrameConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(".")),
    }
}
