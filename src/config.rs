//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a `config.toml` at the site root overrides them key by key.
//!
//! ## Config File Location
//!
//! ```text
//! site/
//! ├── config.toml              # Optional, overrides stock defaults
//! ├── archive/
//! │   └── <project>/...
//! └── toolbox/
//!     └── <tool>/...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "santiago martínez-oropeza"
//! heading = "santiago"
//! intro = ["born in caracas, venezuela in 1999", "bs.finance in 2021"]
//! status = "m.arch loading"   # Last intro line, rendered with loading dots
//! favicon = "favicon.svg"
//!
//! [paths]
//! archive_dir = "archive"
//! toolbox_dir = "toolbox"
//! definition_content_dir = "ghx_content"
//!
//! [toolbox]
//! primary_extension = "ghx"
//! companion_extension = "gh"
//! default_tag = "grasshopper"
//! readme_suffix = "_readme.txt"
//!
//! [toolbox.extra_tags]
//! lego_bridge_aggregation = ["wasp"]
//!
//! [assets]
//! image_extensions = ["jpg", "jpeg", "gif", "png"]
//! preview_dir = "previews"
//! legacy_filename = "preview.png"
//! export_suffix = "_presentation"
//! document_extension = "pdf"
//! converter_program = "pdftoppm"
//! converter_dpi = 150
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#000000"
//! accent = "#ff0000"
//! border = "#000000"
//! hover = "#f5f5f5"
//! card = "#ffffff"
//!
//! [server]
//! start_port = 8000
//! max_attempts = 10
//! bind = "0.0.0.0"
//!
//! [overrides.nervi_dome]
//! first_only = true
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Tables merge key by key, so an
//! `[overrides.<id>]` table only changes the fields it names. Arrays replace
//! wholesale: a `[[projects]]` list replaces the stock project table.
//!
//! Unknown keys are rejected to catch typos early.

use crate::assets::{AssetOverride, builtin_overrides};
use crate::catalog::{ProjectRecord, builtin_projects};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Page text shared across the three pages.
    pub site: SiteText,
    /// Input and output directory names, relative to the site root.
    pub paths: PathsConfig,
    /// Tool discovery settings.
    pub toolbox: ToolboxConfig,
    /// Image discovery and document conversion settings.
    pub assets: AssetsConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Development server settings.
    pub server: ServerConfig,
    /// The project table, in display order.
    pub projects: Vec<ProjectRecord>,
    /// Per-project asset resolution exceptions, keyed by project id.
    pub overrides: BTreeMap<String, AssetOverride>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteText::default(),
            paths: PathsConfig::default(),
            toolbox: ToolboxConfig::default(),
            assets: AssetsConfig::default(),
            colors: ColorConfig::default(),
            server: ServerConfig::default(),
            projects: builtin_projects(),
            overrides: builtin_overrides(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "server.max_attempts must be at least 1".into(),
            ));
        }
        let last_port = u32::from(self.server.start_port) + u32::from(self.server.max_attempts) - 1;
        if last_port > u32::from(u16::MAX) {
            return Err(ConfigError::Validation(format!(
                "server.start_port + server.max_attempts exceeds port range (last port {last_port})"
            )));
        }
        if self.assets.image_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "assets.image_extensions must not be empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        for project in &self.projects {
            if project.id.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "projects: id must not be empty".into(),
                ));
            }
            if !seen.insert(project.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "projects: duplicate id '{}'",
                    project.id
                )));
            }
        }

        for (id, entry) in &self.overrides {
            if entry.preview_dir.is_some() && entry.merge_previews {
                return Err(ConfigError::Validation(format!(
                    "overrides.{id}: preview_dir and merge_previews are mutually exclusive"
                )));
            }
        }
        Ok(())
    }
}

/// Text shown in the page chrome and on the home page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteText {
    /// Document title; sub-pages render as `<page> - <title>`.
    pub title: String,
    /// Large heading on the home page.
    pub heading: String,
    /// Home page lines, one per row.
    pub intro: Vec<String>,
    /// Final home page line, rendered with animated loading dots.
    pub status: Option<String>,
    /// Favicon href (SVG).
    pub favicon: String,
}

impl Default for SiteText {
    fn default() -> Self {
        Self {
            title: "santiago martínez-oropeza".to_string(),
            heading: "santiago".to_string(),
            intro: vec![
                "born in caracas, venezuela in 1999".to_string(),
                "bs.finance in 2021".to_string(),
            ],
            status: Some("m.arch loading".to_string()),
            favicon: "favicon.svg".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory holding one sub-directory per project.
    pub archive_dir: String,
    /// Directory holding tool directories and standalone definitions.
    pub toolbox_dir: String,
    /// Output directory for extracted definition text.
    pub definition_content_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            archive_dir: "archive".to_string(),
            toolbox_dir: "toolbox".to_string(),
            definition_content_dir: "ghx_content".to_string(),
        }
    }
}

/// Tool discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolboxConfig {
    /// Extension of the definition file that qualifies a tool.
    pub primary_extension: String,
    /// Extension of the optional binary twin offered as a second download.
    pub companion_extension: String,
    /// Tag every tool carries first.
    pub default_tag: String,
    /// Description used when a tool has no readable readme.
    pub placeholder_description: String,
    /// Readme lookup is `<toolbox>/<id><readme_suffix>`.
    pub readme_suffix: String,
    /// Extra tags appended after the default tag, keyed by tool id.
    pub extra_tags: BTreeMap<String, Vec<String>>,
}

impl Default for ToolboxConfig {
    fn default() -> Self {
        Self {
            primary_extension: "ghx".to_string(),
            companion_extension: "gh".to_string(),
            default_tag: "grasshopper".to_string(),
            placeholder_description:
                "a powerful toolkit that transforms complex operations into simple workflows."
                    .to_string(),
            readme_suffix: "_readme.txt".to_string(),
            extra_tags: BTreeMap::from([
                (
                    "illinois_institute_of_technology_truss_system".to_string(),
                    vec!["kangaroo".to_string()],
                ),
                (
                    "lego_bridge_aggregation".to_string(),
                    vec!["wasp".to_string()],
                ),
            ]),
        }
    }
}

/// Image discovery and document conversion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Extensions recognized as images (case-insensitive, no dot).
    pub image_extensions: Vec<String>,
    /// Sub-directory that takes precedence over the project directory.
    pub preview_dir: String,
    /// Filename excluded from direct discovery.
    pub legacy_filename: String,
    /// Stem suffix of presentation exports excluded from direct discovery.
    pub export_suffix: String,
    /// Extension of documents converted when a project has no images.
    pub document_extension: String,
    /// External program used to rasterize documents.
    pub converter_program: String,
    /// Rasterization resolution passed to the converter.
    pub converter_dpi: u32,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            image_extensions: ["jpg", "jpeg", "gif", "png"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            preview_dir: "previews".to_string(),
            legacy_filename: "preview.png".to_string(),
            export_suffix: "_presentation".to_string(),
            document_extension: "pdf".to_string(),
            converter_program: "pdftoppm".to_string(),
            converter_dpi: 150,
        }
    }
}

impl AssetsConfig {
    /// Whether the path has one of the configured image extensions.
    pub fn is_image(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                self.image_extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    /// Whether the path has the document extension.
    pub fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(&self.document_extension))
            .unwrap_or(false)
    }
}

/// Development server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// First port tried.
    pub start_port: u16,
    /// Number of consecutive ports tried before giving up.
    pub max_attempts: u16,
    /// Interface address to bind.
    pub bind: IpAddr,
    /// Value of the `Content-Security-Policy` header on every response.
    pub content_security_policy: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            start_port: 8000,
            max_attempts: 10,
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            content_security_policy: "default-src 'self'; script-src 'self' 'unsafe-inline' \
                                      'unsafe-eval'; style-src 'self' 'unsafe-inline';"
                .to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background.
    pub background: String,
    /// Primary text color.
    pub text: String,
    /// Active nav item, active filter chips, search highlights.
    pub accent: String,
    /// Rules and chip outlines.
    pub border: String,
    /// Row hover background.
    pub hover: String,
    /// Dropdown and code panel background.
    pub card: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#000000".to_string(),
            accent: "#ff0000".to_string(),
            border: "#000000".to_string(),
            hover: "#f5f5f5".to_string(),
            card: "#ffffff".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#000000".to_string(),
            text: "#ffffff".to_string(),
            accent: "#ff0000".to_string(),
            border: "#ffffff".to_string(),
            hover: "#1a1a1a".to_string(),
            card: "#000000".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the site root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at the site root, next to archive/ and toolbox/.
# Tables merge key by key with the defaults; arrays replace them.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Page text
# ---------------------------------------------------------------------------
[site]
# Document title. Sub-pages render as "archive - <title>".
title = "santiago martínez-oropeza"

# Large heading on the home page.
heading = "santiago"

# Home page lines, one per row.
intro = ["born in caracas, venezuela in 1999", "bs.finance in 2021"]

# Final home page line, rendered with animated loading dots.
status = "m.arch loading"

favicon = "favicon.svg"

# ---------------------------------------------------------------------------
# Directories (relative to the site root)
# ---------------------------------------------------------------------------
[paths]
archive_dir = "archive"
toolbox_dir = "toolbox"

# Where each tool's definition text is written for the "view code" panel.
definition_content_dir = "ghx_content"

# ---------------------------------------------------------------------------
# Tool discovery
# ---------------------------------------------------------------------------
[toolbox]
# A directory is a tool if it contains a file with this extension.
primary_extension = "ghx"

# Optional binary twin offered as a second download.
companion_extension = "gh"

# Every tool carries this tag first.
default_tag = "grasshopper"

# Shown when <toolbox>/<id>_readme.txt is missing or blank.
placeholder_description = "a powerful toolkit that transforms complex operations into simple workflows."
readme_suffix = "_readme.txt"

# Extra tags appended after the default tag, per tool id.
[toolbox.extra_tags]
illinois_institute_of_technology_truss_system = ["kangaroo"]
lego_bridge_aggregation = ["wasp"]

# ---------------------------------------------------------------------------
# Image discovery
# ---------------------------------------------------------------------------
[assets]
# Case-insensitive, without the dot.
image_extensions = ["jpg", "jpeg", "gif", "png"]

# If a project has this sub-directory, its images are used instead.
preview_dir = "previews"

# Excluded when discovering images directly in a project directory.
legacy_filename = "preview.png"
export_suffix = "_presentation"

# Projects with no images get their documents rasterized into preview_dir.
document_extension = "pdf"
converter_program = "pdftoppm"
converter_dpi = 150

# ---------------------------------------------------------------------------
# Colors - Light mode (default)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#000000"
accent = "#ff0000"      # Active nav, active filters, search highlights
border = "#000000"
hover = "#f5f5f5"
card = "#ffffff"        # Search dropdown, code panel

# ---------------------------------------------------------------------------
# Colors - Dark mode (theme toggle)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#000000"
text = "#ffffff"
accent = "#ff0000"
border = "#ffffff"
hover = "#1a1a1a"
card = "#000000"

# ---------------------------------------------------------------------------
# Development server
# ---------------------------------------------------------------------------
[server]
# Ports start_port .. start_port + max_attempts - 1 are tried in order.
start_port = 8000
max_attempts = 10
bind = "0.0.0.0"
content_security_policy = "default-src 'self'; script-src 'self' 'unsafe-inline' 'unsafe-eval'; style-src 'self' 'unsafe-inline';"

# ---------------------------------------------------------------------------
# Projects
# ---------------------------------------------------------------------------
# The built-in project table is used unless you provide your own. A
# [[projects]] list replaces it entirely:
#
# [[projects]]
# id = "nervi_dome"
# tags = ["individual", "rhino", "grasshopper"]
# description = "form study of pier luigi nervi's palazzetto dello sport."
# link = "grasshopper"

# ---------------------------------------------------------------------------
# Asset overrides
# ---------------------------------------------------------------------------
# Per-project exceptions to image discovery, merged over the built-in table.
# All fields are optional:
#
# [overrides.chil_bookshelf]
# order = ["con_doc.jpg", "render.jpg"]   # Filename suffixes placed first
# only = ["a.jpg", "b.jpg"]               # Exact filenames, entire gallery
# thumbnail = "render.jpg"                # Filename suffix of the thumbnail
# preview_dir = "previews"                # Take images from this directory
# merge_previews = false                  # Project dir + previews, by name
# first_only = false                      # Gallery is the first image only
# cache_bust = ["con_doc.jpg"]            # Append ?t=<unix seconds>
"##
}

/// Generate CSS custom properties from color config.
///
/// Light values apply to `:root`; dark values apply when the theme toggle
/// sets `data-theme="dark"` on the document element.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --background: {light_bg};
    --text: {light_text};
    --accent: {light_accent};
    --border: {light_border};
    --hover: {light_hover};
    --card: {light_card};
}}

[data-theme="dark"] {{
    --background: {dark_bg};
    --text: {dark_text};
    --accent: {dark_accent};
    --border: {dark_border};
    --hover: {dark_hover};
    --card: {dark_card};
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_accent = colors.light.accent,
        light_border = colors.light.border,
        light_hover = colors.light.hover,
        light_card = colors.light.card,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_accent = colors.dark.accent,
        dark_border = colors.dark.border,
        dark_hover = colors.dark.hover,
        dark_card = colors.dark.card,
    )
}
