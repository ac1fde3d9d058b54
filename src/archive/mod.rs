// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod finder;

pub use finder::{find_by_name, named_files};

use crate::error::{Result, SetupError};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use tar::Archive as TarArchive;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Extract a `.tar.gz` release archive into `destination`.
///
/// Any failure (unreadable file, not gzip, corrupt tar stream, entries that
/// would escape `destination`) is reported as [`SetupError::Extract`] naming
/// the archive path.
pub fn extract_archive(archive_path: &Path, destination: &Path) -> Result<()> {
    extract_tar_gz(archive_path, destination).map_err(|e| match e {
        SetupError::Extract { .. } => e,
        other => extract_error(archive_path, other.to_string()),
    })
}

fn extract_tar_gz(archive_path: &Path, destination: &Path) -> Result<()> {
    fs::create_dir_all(destination)?;
    verify_gzip_header(archive_path)?;

    let file = File::open(archive_path)?;
    let gz = flate2::read::GzDecoder::new(file);
    let mut archive = TarArchive::new(gz);

    archive.set_preserve_permissions(true);
    archive.set_overwrite(true);

    let mut extracted_count = 0;
    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();

        // Security check: ensure paths don't escape destination
        validate_entry_path(archive_path, &path)?;

        let dest_path = destination.join(&path);
        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent)?;
        }

        entry.unpack(&dest_path)?;
        extracted_count += 1;
    }

    if extracted_count == 0 {
        return Err(extract_error(archive_path, "archive is empty".to_string()));
    }

    log::debug!("Extracted {extracted_count} entries from {}", archive_path.display());
    Ok(())
}

fn verify_gzip_header(archive_path: &Path) -> Result<()> {
    let mut file = File::open(archive_path)?;
    let mut magic_bytes = [0u8; 2];
    file.read_exact(&mut magic_bytes).map_err(|_| {
        extract_error(archive_path, "file is too short to be an archive".to_string())
    })?;

    if magic_bytes != GZIP_MAGIC {
        return Err(extract_error(
            archive_path,
            "unsupported archive format, expected .tar.gz".to_string(),
        ));
    }
    Ok(())
}

fn validate_entry_path(archive_path: &Path, entry_path: &Path) -> Result<()> {
    for component in entry_path.components() {
        match component {
            Component::ParentDir => {
                return Err(extract_error(
                    archive_path,
                    format!("archive contains path traversal: {}", entry_path.display()),
                ));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(extract_error(
                    archive_path,
                    format!("archive contains absolute path: {}", entry_path.display()),
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

fn extract_error(archive_path: &Path, reason: String) -> SetupError {
    SetupError::Extract {
        path: archive_path.display().to_string(),
        reason,
    }
}

/// Scratch location an archive is unpacked into, next to the download.
pub fn extraction_directory(scratch: &Path) -> PathBuf {
    scratch.join("extracted")
}
