//! Document preview fallback.
//!
//! A project folder that holds only a PDF board still gets a gallery: each
//! document is rasterized into page images under the project's previews
//! directory, and those pages are used as the project's images.
//!
//! ```text
//! archive/thermal/                    archive/thermal/
//! └── boards.pdf          ──────►     ├── boards.pdf
//!                                     └── previews/
//!                                         ├── boards_1.png
//!                                         └── boards_2.png
//! ```
//!
//! Pages already present as `previews/<stem>_*.png` are reused without
//! running the converter again. Rasterization happens behind the
//! [`DocumentConverter`] trait so the resolver can be tested without
//! external programs.

use crate::config::AssetsConfig;
use crate::naming::sort_natural;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Turns one document into page images.
pub trait DocumentConverter {
    /// Rasterize `document` into `out_dir`, naming pages `<prefix>_<n>.png`.
    ///
    /// Returns the written page paths in page order.
    fn convert(
        &self,
        document: &Path,
        out_dir: &Path,
        prefix: &str,
    ) -> Result<Vec<PathBuf>, ConvertError>;
}

/// Converter backed by poppler's `pdftoppm`.
#[derive(Debug, Clone)]
pub struct PdftoppmConverter {
    pub program: String,
    pub dpi: u32,
}

impl PdftoppmConverter {
    pub fn new(assets: &AssetsConfig) -> Self {
        Self {
            program: assets.converter_program.clone(),
            dpi: assets.converter_dpi,
        }
    }
}

impl DocumentConverter for PdftoppmConverter {
    fn convert(
        &self,
        document: &Path,
        out_dir: &Path,
        prefix: &str,
    ) -> Result<Vec<PathBuf>, ConvertError> {
        fs::create_dir_all(out_dir)?;
        debug!("{} -png {}", self.program, document.display());
        let output = Command::new(&self.program)
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(document)
            .arg(out_dir.join(prefix))
            .output()?;
        if !output.status.success() {
            return Err(ConvertError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        normalize_page_names(out_dir, prefix)
    }
}

/// Converter that never produces pages. Only cached previews are used.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullConverter;

impl DocumentConverter for NullConverter {
    fn convert(&self, _: &Path, _: &Path, _: &str) -> Result<Vec<PathBuf>, ConvertError> {
        Ok(Vec::new())
    }
}

/// Rename `pdftoppm`'s `<prefix>-<n>.png` output to `<prefix>_<n>.png`.
///
/// The page number keeps whatever zero padding the converter chose.
pub fn normalize_page_names(out_dir: &Path, prefix: &str) -> Result<Vec<PathBuf>, ConvertError> {
    let dash = format!("{prefix}-");
    let mut pages = Vec::new();
    for path in list_files(out_dir) {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(page) = name
            .strip_prefix(&dash)
            .and_then(|rest| rest.strip_suffix(".png"))
        else {
            continue;
        };
        if page.is_empty() || !page.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let target = out_dir.join(format!("{prefix}_{page}.png"));
        fs::rename(&path, &target)?;
        pages.push(target);
    }
    sort_natural(&mut pages);
    Ok(pages)
}

/// Existing `<prefix>_*.png` pages in `preview_dir`, in natural order.
pub fn cached_previews(preview_dir: &Path, prefix: &str) -> Vec<PathBuf> {
    let underscore = format!("{prefix}_");
    let mut pages: Vec<PathBuf> = list_files(preview_dir)
        .into_iter()
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(&underscore) && n.ends_with(".png"))
                .unwrap_or(false)
        })
        .collect();
    sort_natural(&mut pages);
    pages
}

/// Page images for every document directly inside `project_dir`.
///
/// Documents are processed in filename order. Cached pages win over
/// conversion; a failed conversion contributes no pages.
pub fn document_previews(
    project_dir: &Path,
    assets: &AssetsConfig,
    converter: &dyn DocumentConverter,
) -> Vec<PathBuf> {
    let preview_dir = project_dir.join(&assets.preview_dir);
    let documents: Vec<PathBuf> = list_files(project_dir)
        .into_iter()
        .filter(|p| assets.is_document(p))
        .collect();

    let mut pages = Vec::new();
    for document in documents {
        let Some(stem) = document.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let cached = cached_previews(&preview_dir, stem);
        if !cached.is_empty() {
            info!("Using existing previews for {}", document.display());
            pages.extend(cached);
            continue;
        }
        match converter.convert(&document, &preview_dir, stem) {
            Ok(converted) => {
                if !converted.is_empty() {
                    info!(
                        "Converted {} into {} page(s)",
                        document.display(),
                        converted.len()
                    );
                }
                pages.extend(converted);
            }
            Err(e) => warn!("Could not convert {}: {e}", document.display()),
        }
    }
    pages
}

/// Regular files directly inside `dir`, sorted by name. Missing dir → empty.
fn list_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect()
}
