// uda-data/src/download.rs
//
// Fetches a gzipped tar archive over HTTP and unpacks it into a directory.

use std::io::Read;
use std::path::Path;
use std::sync::Mutex;

use flate2::read::GzDecoder;
use log::info;
use tar::Archive;
use uda_core::UdaError;

/// Only one thread downloads at a time, so concurrent loaders do not unpack
/// the same archive twice into the same directory.
static DOWNLOAD_LOCK: Mutex<()> = Mutex::new(());

/// Downloads the `.tar.gz` archive at `url` and unpacks it into `dest`.
///
/// # Errors
///
/// Returns `UdaError::Download` for network or HTTP failures and
/// `UdaError::Io` if unpacking fails.
pub fn download_and_extract(url: &str, dest: &Path) -> Result<(), UdaError> {
    let _guard = DOWNLOAD_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    info!("Downloading {} into {}", url, dest.display());
    let download_err = |e: reqwest::Error| UdaError::Download {
        url: url.to_string(),
        message: e.to_string(),
    };
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(download_err)?;
    let bytes = response.bytes().map_err(download_err)?;
    info!("Downloaded {} bytes, unpacking", bytes.len());

    extract_tar_gz(&bytes[..], dest)
}

/// Unpacks a gzipped tar stream into `dest`, creating it if needed.
pub fn extract_tar_gz<R: Read>(reader: R, dest: &Path) -> Result<(), UdaError> {
    std::fs::create_dir_all(dest)?;
    let mut archive = Archive::new(GzDecoder::new(reader));
    archive.unpack(dest)?;
    Ok(())
}
