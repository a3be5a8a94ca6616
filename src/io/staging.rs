//! On-disk staging of uploads and processed outputs, addressed by opaque handles.
//!
//! Uploads land in `upload_dir`, outputs in `processed_dir`. Handles are file names
//! made unique with a timestamp, the process id and a per-process counter. Files
//! older than the retention window are removed by `cleanup`.
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::buffer::PixelBuffer;
use crate::error::{Error, Result};
use crate::io::decode::decode;
use crate::types::OutputFormat;

static HANDLE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Staging directories and limits, suitable for JSON config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    pub upload_dir: PathBuf,
    pub processed_dir: PathBuf,
    /// Largest accepted upload in bytes
    pub max_file_size: u64,
    /// Files older than this are removed by cleanup
    pub retention_minutes: i64,
    /// Period of the repeating cleanup job
    pub cleanup_interval_minutes: u64,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            processed_dir: PathBuf::from("processed"),
            max_file_size: 10 * 1024 * 1024,
            retention_minutes: 30,
            cleanup_interval_minutes: 15,
        }
    }
}

impl StagingConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Retention window as a chrono delta. Negative or out-of-range values are rejected.
    pub fn retention(&self) -> Result<TimeDelta> {
        if self.retention_minutes < 0 {
            return Err(Error::invalid("retention_minutes", self.retention_minutes));
        }
        TimeDelta::try_minutes(self.retention_minutes)
            .ok_or_else(|| Error::invalid("retention_minutes", self.retention_minutes))
    }

    /// Period of the repeating cleanup job, at least one minute.
    pub fn cleanup_interval(&self) -> Result<Duration> {
        self.cleanup_interval_minutes
            .max(1)
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| {
                Error::invalid("cleanup_interval_minutes", self.cleanup_interval_minutes)
            })
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedImage {
    pub filename: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct Staging {
    config: StagingConfig,
}

fn unique_token() -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let count = HANDLE_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{:016x}{:08x}{:06x}", nanos, std::process::id(), count & 0xff_ffff)
}

fn checked_handle(handle: &str) -> Result<&str> {
    let valid = !handle.is_empty()
        && !handle.starts_with('.')
        && !handle.contains(['/', '\\'])
        && Path::new(handle).file_name().is_some_and(|name| name == handle);
    if valid {
        Ok(handle)
    } else {
        Err(Error::invalid("handle", handle))
    }
}

fn write_atomic(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(name);
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(&path).map_err(|e| Error::Io(e.error))?;
    Ok(path)
}

impl Staging {
    /// Use `config`, creating both directories if needed.
    pub fn open(config: StagingConfig) -> Result<Self> {
        fs::create_dir_all(&config.upload_dir)?;
        fs::create_dir_all(&config.processed_dir)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StagingConfig {
        &self.config
    }

    /// Validate and store an uploaded image under a fresh handle.
    pub fn upload(&self, bytes: &[u8], original_name: &str) -> Result<UploadedImage> {
        let size = bytes.len() as u64;
        if size > self.config.max_file_size {
            return Err(Error::FileTooLarge {
                size,
                limit: self.config.max_file_size,
            });
        }
        let format = image::guess_format(bytes)
            .map_err(|_| Error::UnsupportedFormat(original_name.to_string()))?;
        if !matches!(
            format,
            image::ImageFormat::Png | image::ImageFormat::Jpeg | image::ImageFormat::WebP
        ) {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
        let decoded = decode(bytes)?;

        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| format.extensions_str()[0].to_string());
        let filename = format!("{}.{}", unique_token(), extension);
        write_atomic(&self.config.upload_dir, &filename, bytes)?;
        info!(
            "Stored upload {} ({}x{}, {} bytes)",
            filename,
            decoded.width(),
            decoded.height(),
            size
        );

        Ok(UploadedImage {
            filename,
            width: decoded.width(),
            height: decoded.height(),
        })
    }

    /// Store an encoded output as `<prefix><token>.<ext>` and return its handle.
    pub fn persist(&self, prefix: &str, format: OutputFormat, bytes: &[u8]) -> Result<String> {
        let filename = format!("{}{}.{}", prefix, unique_token(), format.extension());
        checked_handle(&filename)?;
        let path = write_atomic(&self.config.processed_dir, &filename, bytes)?;
        debug!("Persisted output {:?}", path);
        Ok(filename)
    }

    /// Path of `handle`, looking in the processed directory first.
    pub fn resolve(&self, handle: &str) -> Result<PathBuf> {
        let handle = checked_handle(handle)?;
        [&self.config.processed_dir, &self.config.upload_dir]
            .into_iter()
            .map(|dir| dir.join(handle))
            .find(|path| path.is_file())
            .ok_or_else(|| Error::NotFound {
                handle: handle.to_string(),
            })
    }

    /// Decode the image stored under `handle`.
    pub fn load(&self, handle: &str) -> Result<PixelBuffer> {
        let path = self.resolve(handle)?;
        decode(&fs::read(path)?)
    }

    /// Remove staged files last modified before `now - retention`.
    pub fn cleanup(&self, now: DateTime<Local>) -> Result<usize> {
        let threshold = now
            .checked_sub_signed(self.config.retention()?)
            .ok_or_else(|| Error::invalid("retention_minutes", self.config.retention_minutes))?;
        let mut removed = 0;
        for dir in [&self.config.upload_dir, &self.config.processed_dir] {
            for entry in fs::read_dir(dir)? {
                let entry = entry?;
                let metadata = entry.metadata()?;
                if !metadata.is_file() {
                    continue;
                }
                let modified: DateTime<Local> = metadata.modified()?.into();
                if modified < threshold {
                    match fs::remove_file(entry.path()) {
                        Ok(()) => removed += 1,
                        Err(e) => warn!("Failed to remove {:?}: {}", entry.path(), e),
                    }
                }
            }
        }
        info!("Cleanup removed {} file(s) older than {}", removed, threshold);
        Ok(removed)
    }
}
