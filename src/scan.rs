use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use log::{debug, warn};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("portfolio directory not found: {}", .0.display())]
    DirectoryMissing(PathBuf),
    #[error(transparent)]
    Walk(#[from] ignore::Error),
}

/// The `*.png` files directly inside `dir`, in natural case-insensitive order.
///
/// The extension match is case-sensitive (`.PNG` is not listed) and names
/// starting with a dot are skipped, as a shell glob would.
pub fn scan_pngs(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::DirectoryMissing(dir.to_path_buf()));
    }

    let walker = WalkBuilder::new(dir)
        .max_depth(Some(1))
        .follow_links(true)
        .standard_filters(false)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let e = match entry {
            Ok(e) => e,
            // Only a failure on the directory itself aborts the scan
            Err(e) if e.is_io() || e.depth().is_some_and(|d| d > 0) => {
                warn!("scan: {}", e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if e.depth() == 0 {
            continue;
        }

        let is_file = e.file_type().map(|ft| ft.is_file()).unwrap_or(false);
        let hidden = e.file_name().to_string_lossy().starts_with('.');
        if is_file && !hidden && e.path().extension().is_some_and(|ext| ext == "png") {
            files.push(e.into_path());
        } else {
            debug!("SKIP: {}", e.path().display());
        }
    }

    files.sort_by(|a, b| natural_cmp(&file_name(a), &file_name(b)));
    Ok(files)
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Case-insensitive comparison where digit runs compare by numeric value,
/// so `img2` sorts before `img10`. Falls back to plain byte order on ties.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let x_run = take_digits(&mut left);
                let y_run = take_digits(&mut right);
                let ord = compare_digit_runs(&x_run, &y_run);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.to_lowercase().cmp(y.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits<I: Iterator<Item = char>>(it: &mut std::iter::Peekable<I>) -> String {
    let mut run = String::new();
    while let Some(ch) = it.next_if(|c| c.is_ascii_digit()) {
        run.push(ch);
    }
    run
}

fn compare_digit_runs(x: &str, y: &str) -> Ordering {
    let x = x.trim_start_matches('0');
    let y = y.trim_start_matches('0');
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}

/// Percent-encode one path segment, leaving only RFC 3986 unreserved bytes.
pub fn encode_path_component(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for &b in name.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(b as char),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}
