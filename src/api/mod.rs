//! High-level, ergonomic library API: run an operation on encoded bytes, or on a
//! staged image by handle with the output persisted back into staging. Prefer these
//! entrypoints over the low-level processing modules when integrating PixelMagic.
use serde::Serialize;
use tracing::info;

use crate::core::buffer::PixelBuffer;
use crate::core::params::{CropRect, ResizeSpec, SoftnessParams, UpscaleSpec};
use crate::core::processing::crop::crop;
use crate::core::processing::matte::{AlphaEstimator, remove_background};
use crate::core::processing::resize::resize;
use crate::core::processing::upscale::upscale;
use crate::error::Result;
use crate::io::decode::decode;
use crate::io::staging::Staging;
use crate::io::writers::encode;
use crate::types::OutputFormat;

/// Default JPEG quality where an operation does not take one.
const DEFAULT_QUALITY: u8 = 90;

/// Output of a staged operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedImage {
    pub filename: String,
    pub width: u32,
    pub height: u32,
}

/// Encoded output of an in-memory operation.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

fn encode_output(buffer: &PixelBuffer, format: OutputFormat, quality: u8) -> Result<EncodedImage> {
    Ok(EncodedImage {
        bytes: encode(buffer, format, quality)?,
        format,
        width: buffer.width(),
        height: buffer.height(),
    })
}

fn store(staging: &Staging, prefix: &str, encoded: EncodedImage) -> Result<ProcessedImage> {
    let filename = staging.persist(prefix, encoded.format, &encoded.bytes)?;
    info!(
        "Saved {} ({}x{})",
        filename, encoded.width, encoded.height
    );
    Ok(ProcessedImage {
        filename,
        width: encoded.width,
        height: encoded.height,
    })
}

/// Background removal on encoded bytes; always PNG.
pub fn process_remove_background(
    bytes: &[u8],
    oracle: &dyn AlphaEstimator,
    params: SoftnessParams,
) -> Result<EncodedImage> {
    let image = decode(bytes)?;
    let output = remove_background(&image, oracle, params)?;
    encode_output(&output, OutputFormat::Png, DEFAULT_QUALITY)
}

/// Crop on encoded bytes; always PNG.
pub fn process_crop(bytes: &[u8], rect: CropRect) -> Result<EncodedImage> {
    let image = decode(bytes)?;
    let output = crop(&image, rect)?;
    encode_output(&output, OutputFormat::Png, DEFAULT_QUALITY)
}

/// Resize on encoded bytes; encoded per `spec.format` and `spec.quality`.
pub fn process_resize(bytes: &[u8], spec: &ResizeSpec) -> Result<EncodedImage> {
    let image = decode(bytes)?;
    let output = resize(&image, spec)?;
    encode_output(&output, spec.format, spec.quality)
}

/// Upscale on encoded bytes; always PNG.
pub fn process_upscale(bytes: &[u8], spec: &UpscaleSpec) -> Result<EncodedImage> {
    let image = decode(bytes)?;
    let output = upscale(&image, spec)?;
    encode_output(&output, OutputFormat::Png, DEFAULT_QUALITY)
}

pub fn remove_background_staged(
    staging: &Staging,
    handle: &str,
    oracle: &dyn AlphaEstimator,
    params: SoftnessParams,
) -> Result<ProcessedImage> {
    let image = staging.load(handle)?;
    let output = remove_background(&image, oracle, params)?;
    store(
        staging,
        "bg_removed_",
        encode_output(&output, OutputFormat::Png, DEFAULT_QUALITY)?,
    )
}

pub fn crop_staged(staging: &Staging, handle: &str, rect: CropRect) -> Result<ProcessedImage> {
    let image = staging.load(handle)?;
    let output = crop(&image, rect)?;
    store(
        staging,
        "cropped_",
        encode_output(&output, OutputFormat::Png, DEFAULT_QUALITY)?,
    )
}

pub fn resize_staged(staging: &Staging, handle: &str, spec: &ResizeSpec) -> Result<ProcessedImage> {
    let image = staging.load(handle)?;
    let output = resize(&image, spec)?;
    store(
        staging,
        "resized_",
        encode_output(&output, spec.format, spec.quality)?,
    )
}

pub fn upscale_staged(staging: &Staging, handle: &str, spec: &UpscaleSpec) -> Result<ProcessedImage> {
    let image = staging.load(handle)?;
    let output = upscale(&image, spec)?;
    store(
        staging,
        &format!("upscaled_{}x_", spec.scale),
        encode_output(&output, OutputFormat::Png, DEFAULT_QUALITY)?,
    )
}
