use std::fs;
use std::path::Path;

use chrono::Local;
use serde::Serialize;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pixelmagic::api::{crop_staged, remove_background_staged, resize_staged, upscale_staged};
use pixelmagic::core::processing::matte::PrecomputedMatte;
use pixelmagic::io::{Staging, StagingConfig, read_image};
use pixelmagic::{CropRect, ResizeSpec, SoftnessParams, UpscaleSpec};

use super::args::{CliArgs, Command};
use super::errors::AppError;

fn print_success<T: Serialize>(payload: &T) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = serde_json::to_value(payload)?;
    if let Some(map) = doc.as_object_mut() {
        map.insert("status".to_string(), json!("success"));
    }
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn open_staging(config: Option<&Path>) -> Result<Staging, AppError> {
    let config = match config {
        Some(path) => StagingConfig::from_json_file(path)?,
        None => StagingConfig::default(),
    };
    Ok(Staging::open(config)?)
}

fn upload(staging: &Staging, input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::UnnamedInput {
            path: input.to_path_buf(),
        })?;
    let bytes = fs::read(input)?;
    let uploaded = staging.upload(&bytes, name).map_err(AppError::from)?;
    print_success(&uploaded)
}

fn export(
    staging: &Staging,
    handle: &str,
    destination: &Path,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if destination.exists() && !force {
        return Err(AppError::DestinationExists {
            path: destination.to_path_buf(),
        }
        .into());
    }
    let source = staging.resolve(handle).map_err(AppError::from)?;
    fs::copy(&source, destination)?;
    info!("Exported {:?} -> {:?}", source, destination);
    print_success(&json!({ "filename": handle, "path": destination }))
}

fn cleanup(staging: &Staging, watch: bool) -> Result<(), Box<dyn std::error::Error>> {
    let removed = staging.cleanup(Local::now()).map_err(AppError::from)?;
    print_success(&json!({ "removed": removed }))?;
    if !watch {
        return Ok(());
    }

    let interval = staging.config().cleanup_interval().map_err(AppError::from)?;
    info!("Watching staging directories, cleanup every {:?}", interval);
    loop {
        std::thread::sleep(interval);
        let removed = staging.cleanup(Local::now()).map_err(AppError::from)?;
        print_success(&json!({ "removed": removed }))?;
    }
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .init();
    }

    let staging = open_staging(args.config.as_deref())?;

    match args.command {
        Command::Upload { input } => upload(&staging, &input),
        Command::RemoveBg {
            handle,
            matte,
            softness,
            feather,
        } => {
            let oracle = PrecomputedMatte::new(read_image(&matte).map_err(AppError::from)?);
            let params = SoftnessParams::new(softness, feather);
            let processed = remove_background_staged(&staging, &handle, &oracle, params)
                .map_err(AppError::from)?;
            print_success(&processed)
        }
        Command::Crop {
            handle,
            x,
            y,
            width,
            height,
        } => {
            let rect = CropRect::new(x, y, width, height);
            let processed = crop_staged(&staging, &handle, rect).map_err(AppError::from)?;
            print_success(&processed)
        }
        Command::Resize {
            handle,
            width,
            height,
            mode,
            format,
            quality,
        } => {
            let spec = ResizeSpec::new(width, height, mode, format, quality).map_err(AppError::from)?;
            let processed = resize_staged(&staging, &handle, &spec).map_err(AppError::from)?;
            print_success(&processed)
        }
        Command::Upscale { handle, scale } => {
            let spec = UpscaleSpec::new(scale);
            let processed = upscale_staged(&staging, &handle, &spec).map_err(AppError::from)?;
            print_success(&json!({
                "filename": processed.filename,
                "width": processed.width,
                "height": processed.height,
                "scale": scale,
            }))
        }
        Command::Export {
            handle,
            destination,
            force,
        } => export(&staging, &handle, &destination, force),
        Command::Cleanup { watch } => cleanup(&staging, watch),
    }
}
