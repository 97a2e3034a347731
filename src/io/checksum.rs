//! SHA-256 checksum manifest for the output directory.
//!
//! Format, one line per file, `sha256sum`-compatible:
//!
//! ```text
//! <64 hex chars>␠␠<file name>
//! ```
//!
//! Lines follow directory-listing order and are joined by `\n`.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{AppError, ErrorKind};

pub const MANIFEST_FILE: &str = "CHECKSUMS.txt";

const BLOCK_SIZE: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub digest: String,
    pub file_name: String,
}

/// Outcome of re-hashing a directory against its manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub verified: Vec<String>,
    pub mismatched: Vec<String>,
    pub missing: Vec<String>,
}

impl VerifyReport {
    pub fn is_ok(&self) -> bool {
        self.mismatched.is_empty() && self.missing.is_empty()
    }
}

/// Hex SHA-256 of a file, read in fixed-size blocks.
pub fn sha256_file(path: &Path) -> Result<String, AppError> {
    let mut file = File::open(path).map_err(|e| AppError::io("open", path, e))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; BLOCK_SIZE];
    loop {
        let read = file.read(&mut buf).map_err(|e| AppError::io("read", path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Hash every regular file in `dir` except the manifest and write the manifest.
pub fn write_manifest(dir: &Path) -> Result<Vec<ManifestEntry>, AppError> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| AppError::io("list", dir, e))? {
        let entry = entry.map_err(|e| AppError::io("list", dir, e))?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        if file_name == MANIFEST_FILE || !path.is_file() {
            continue;
        }
        entries.push(ManifestEntry {
            digest: sha256_file(&path)?,
            file_name,
        });
    }

    let body = entries
        .iter()
        .map(|e| format!("{}  {}", e.digest, e.file_name))
        .collect::<Vec<_>>()
        .join("\n");
    let manifest = dir.join(MANIFEST_FILE);
    fs::write(&manifest, body).map_err(|e| AppError::io("write", &manifest, e))?;
    log::info!("Saved: {} ({} entries)", manifest.display(), entries.len());

    Ok(entries)
}

/// Parse manifest text into entries.
pub fn parse_manifest(text: &str) -> Result<Vec<ManifestEntry>, AppError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            let (digest, file_name) = line.split_once("  ").ok_or_else(|| {
                AppError::new(
                    ErrorKind::Verification,
                    format!("Malformed manifest line {}: '{line}'", idx + 1),
                )
            })?;
            if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(AppError::new(
                    ErrorKind::Verification,
                    format!("Malformed digest on manifest line {}", idx + 1),
                ));
            }
            Ok(ManifestEntry {
                digest: digest.to_ascii_lowercase(),
                file_name: file_name.to_string(),
            })
        })
        .collect()
}

/// Re-hash each listed file and compare against the manifest in `dir`.
pub fn verify_manifest(dir: &Path) -> Result<VerifyReport, AppError> {
    let manifest = dir.join(MANIFEST_FILE);
    let text = fs::read_to_string(&manifest).map_err(|e| {
        AppError::new(
            ErrorKind::Verification,
            format!("Failed to read manifest '{}': {e}", manifest.display()),
        )
    })?;

    let mut report = VerifyReport::default();
    for entry in parse_manifest(&text)? {
        let path = dir.join(&entry.file_name);
        if !path.is_file() {
            report.missing.push(entry.file_name);
            continue;
        }
        if sha256_file(&path)? == entry.digest {
            report.verified.push(entry.file_name);
        } else {
            report.mismatched.push(entry.file_name);
        }
    }
    Ok(report)
}
