use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info, warn};
use rayon::prelude::*;
use rayon::{ThreadPoolBuildError, ThreadPoolBuilder};
use serde::Serialize;
use thiserror::Error;

use crate::describe;
use crate::png::reader::{self, MetadataMap};
use crate::scan::{self, ScanError};

#[derive(Error, Debug)]
pub enum ListingError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("worker pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
    #[error("failed to encode listing: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One element of the JSON listing, field order is the output order.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub src: String,
    pub title: Option<String>,
    pub mtime: Option<i64>,
    pub size: Option<String>,
    pub dim: Option<String>,
    pub desc: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ListingOptions {
    pub dir: PathBuf,
    pub base_url: String,
    pub max_file_size: u64,
    pub max_text_size: usize,
    pub jobs: usize,
}

/// `dirname(script_name)` joined with the directory name, as the files are
/// served next to the script.
pub fn base_url_for(script_name: Option<&str>, dir: &Path) -> String {
    let parent = script_name
        .and_then(|s| s.rfind('/').map(|pos| &s[..pos]))
        .unwrap_or("");

    let url = format!("{}/{}", parent.trim_end_matches('/'), scan::file_name(dir));
    url.trim_end_matches('/').to_string()
}

/// Whole seconds since the epoch, rounded down. `None` when it does not fit.
fn unix_seconds(t: SystemTime) -> Option<i64> {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_secs()).ok(),
        Err(e) => {
            let d = e.duration();
            let secs = i64::try_from(d.as_secs()).ok()?;
            Some(if d.subsec_nanos() > 0 { -secs - 1 } else { -secs })
        }
    }
}

pub fn describe_file(path: &Path, opts: &ListingOptions) -> FileEntry {
    let name = scan::file_name(path);

    let (mtime, size) = match fs::metadata(path) {
        Ok(meta) => {
            let mtime = meta.modified().ok().and_then(unix_seconds);
            let size = Some(meta.len()).filter(|len| *len > 0).map(|len| len.to_string());
            (mtime, size)
        }
        Err(e) => {
            warn!("{}: {}", path.display(), e);
            (None, None)
        }
    };

    let dim = match imagesize::size(path) {
        Ok(dim) => Some(format!("{}×{}", dim.width, dim.height)),
        Err(e) => {
            debug!("{}: no dimensions: {:?}", path.display(), e);
            None
        }
    };

    let meta: MetadataMap = reader::read_file(path, opts.max_file_size, opts.max_text_size);
    let desc = describe::select(&meta);
    let title = match desc {
        Some(_) => None,
        None => Some(describe::title_from_filename(&name)),
    };

    FileEntry {
        src: format!("{}/{}", opts.base_url, scan::encode_path_component(&name)),
        title,
        mtime,
        size,
        dim,
        desc,
    }
}

/// Describe every png of `opts.dir`, in scan order.
///
/// Files are processed on a worker pool, a single file can only degrade its
/// own entry to null fields.
pub fn build_listing(opts: &ListingOptions) -> Result<Vec<FileEntry>, ListingError> {
    let files = scan::scan_pngs(&opts.dir)?;
    info!("{}: {} png files", opts.dir.display(), files.len());

    let pool = ThreadPoolBuilder::new().num_threads(opts.jobs).build()?;

    // Indexed parallel collect keeps the sorted order
    Ok(pool.install(|| {
        files
            .par_iter()
            .map(|path| describe_file(path, opts))
            .collect()
    }))
}

pub fn to_json(entries: &[FileEntry], pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(entries)
    } else {
        serde_json::to_string(entries)
    }
}
