//! Shared test utilities for the folio test suite.
//!
//! Provides scratch-tree builders and document converters that never shell
//! out, so resolver and renderer tests run without poppler installed.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! touch(&tmp.path().join("archive/solo/cover.jpg"));
//! write_project_config(tmp.path(), &[("solo", &["individual", "rhino"])]);
//!
//! let converter = StubConverter::new(2);
//! ```

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::preview::{ConvertError, DocumentConverter};

// =========================================================================
// Scratch trees
// =========================================================================

/// Create a file (and its parent directories) with placeholder bytes.
pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "fake image").unwrap();
}

/// Write a `config.toml` whose project table is exactly `projects`.
///
/// Overrides are left at the built-in table.
pub fn write_project_config(root: &Path, projects: &[(&str, &[&str])]) {
    let mut toml = String::new();
    for (id, tags) in projects {
        let tags: Vec<String> = tags.iter().map(|t| format!("\"{t}\"")).collect();
        toml.push_str(&format!(
            "[[projects]]\nid = \"{id}\"\ntags = [{}]\ndescription = \"{id} description\"\n\n",
            tags.join(", ")
        ));
    }
    fs::write(root.join("config.toml"), toml).unwrap();
}

/// Filenames of a path list, for compact assertions.
pub fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

/// Read a generated file under the site root. Panics with the path on miss.
pub fn read_output(root: &Path, name: &str) -> String {
    let path = root.join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

// =========================================================================
// Converters
// =========================================================================

/// Writes `pages` placeholder PNGs per document and records each prefix.
pub struct StubConverter {
    pages: usize,
    calls: RefCell<Vec<String>>,
}

impl StubConverter {
    pub fn new(pages: usize) -> Self {
        Self {
            pages,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Prefixes converted so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl DocumentConverter for StubConverter {
    fn convert(
        &self,
        _document: &Path,
        out_dir: &Path,
        prefix: &str,
    ) -> Result<Vec<PathBuf>, ConvertError> {
        self.calls.borrow_mut().push(prefix.to_string());
        fs::create_dir_all(out_dir)?;
        let mut pages = Vec::with_capacity(self.pages);
        for n in 1..=self.pages {
            let page = out_dir.join(format!("{prefix}_{n}.png"));
            fs::write(&page, "fake page")?;
            pages.push(page);
        }
        Ok(pages)
    }
}

/// Fails every conversion.
pub struct FailingConverter;

impl DocumentConverter for FailingConverter {
    fn convert(&self, _: &Path, _: &Path, _: &str) -> Result<Vec<PathBuf>, ConvertError> {
        Err(ConvertError::Io(std::io::Error::other("corrupt document")))
    }
}
