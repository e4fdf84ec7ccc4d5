use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use depthprep::{Interpolation, ModelName};

#[derive(Parser)]
#[command(name = "depthprep", version, about = "depthprep CLI")]
pub struct CliArgs {
    /// Enable debug logging (otherwise RUST_LOG, defaulting to info)
    #[arg(long, global = true, default_value_t = false)]
    pub log: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Letterbox resize-and-crop an image to the model input size
    Resize(ResizeArgs),
    /// Keep the scene descriptions that match day / night / rain pass filters
    Filter(FilterArgs),
    /// Download, verify and unpack a pretrained model
    Download(DownloadArgs),
    /// List the pretrained models that can be downloaded
    Models,
}

#[derive(Args)]
pub struct ResizeArgs {
    /// Input image
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output image (format from extension)
    #[arg(short, long)]
    pub output: PathBuf,

    /// JSON file with letterbox parameters; flags below override it
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Target height in pixels
    #[arg(long)]
    pub height: Option<usize>,

    /// Target width in pixels
    #[arg(long)]
    pub width: Option<usize>,

    /// Crop start as a fraction of the scaled height
    #[arg(long)]
    pub shift_h: Option<f64>,

    /// Crop start as a fraction of the scaled width
    #[arg(long)]
    pub shift_w: Option<f64>,

    /// Interpolation used for downscaling (nearest, bilinear, cubic, area, lanczos)
    #[arg(long, value_enum)]
    pub interpolation: Option<Interpolation>,
}

#[derive(Args)]
pub struct FilterArgs {
    /// Text file with one scene description per line
    #[arg(long)]
    pub scenes: PathBuf,

    /// Pass filters: day, night, rain (repeat or comma-separate). Unknown values are ignored
    #[arg(long = "pass", value_delimiter = ',', required = true)]
    pub pass: Vec<String>,

    /// Write kept lines here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct DownloadArgs {
    /// Model to fetch
    #[arg(long, value_enum)]
    pub model: ModelName,

    /// JSON file with fetch parameters; --models-dir overrides it
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Directory holding one subdirectory per model [default: models]
    #[arg(long)]
    pub models_dir: Option<PathBuf>,
}
