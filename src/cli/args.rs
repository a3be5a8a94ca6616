use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pixelmagic::types::{FitMode, OutputFormat};

#[derive(Parser)]
#[command(name = "pixelmagic", version, about = "PixelMagic image editing CLI")]
pub struct CliArgs {
    /// Staging configuration file (JSON); defaults to ./uploads and ./processed
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable logging
    #[arg(long, global = true, default_value_t = false)]
    pub log: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Stage an image file (JPG, PNG or WEBP) and print its handle
    Upload {
        /// Image file to upload
        input: PathBuf,
    },

    /// Remove the background using a matte produced by a segmentation model
    RemoveBg {
        /// Handle of a staged image
        handle: String,

        /// Raw matte: RGBA image with the estimate in its alpha, or a grayscale mask
        #[arg(long)]
        matte: PathBuf,

        /// Edge smoothing strength
        #[arg(long, default_value_t = 0)]
        softness: u32,

        /// Outward edge fade strength
        #[arg(long, default_value_t = 0)]
        feather: u32,
    },

    /// Crop a rectangle out of a staged image
    Crop {
        handle: String,
        #[arg(long)]
        x: u32,
        #[arg(long)]
        y: u32,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
    },

    /// Resize a staged image into a target box
    Resize {
        handle: String,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,

        /// Fit policy (contain, cover or stretch)
        #[arg(long, value_enum, default_value_t = FitMode::Contain)]
        mode: FitMode,

        /// Output format (png or jpeg)
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Png)]
        format: OutputFormat,

        /// JPEG quality (1-100)
        #[arg(long, default_value_t = 90, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: u8,
    },

    /// Enlarge a staged image by 2, 4 or 8 with detail enhancement
    Upscale {
        handle: String,
        #[arg(long, default_value_t = 2)]
        scale: u32,
    },

    /// Copy a staged image out of staging
    Export {
        handle: String,
        destination: PathBuf,

        /// Overwrite an existing destination file
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Delete staged files older than the retention window
    Cleanup {
        /// Keep running, repeating cleanup every configured interval
        #[arg(long, default_value_t = false)]
        watch: bool,
    },
}
