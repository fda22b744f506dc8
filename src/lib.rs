//! # folio
//!
//! A static site generator for an architecture portfolio. The site root is
//! the data source: project folders under `archive/` supply images, tool
//! folders under `toolbox/` supply downloadable parametric definitions, and
//! an optional `config.toml` supplies the project table and page text.
//!
//! # Architecture: One-Way Flow
//!
//! ```text
//! config.toml ─► SiteConfig ─► Catalog ─► Resolver ─► render ─► index.html
//!                                 │          │                  archive.html
//!                      toolbox/ scan    archive/ scan            toolbox.html
//!                                       + document pages         ghx_content/
//!
//!                                              serve ◄── site root
//! ```
//!
//! Generation is synchronous and runs once per invocation. Nothing is cached
//! between runs except rendered document pages, which are written next to
//! the document and reused when present.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation, theme CSS |
//! | [`catalog`] | Project records from config, tool records from the toolbox directory |
//! | [`naming`] | Natural filename ordering (`img2` before `img10`) |
//! | [`assets`] | Per-project thumbnail and gallery resolution with the override table |
//! | [`preview`] | Document page rendering behind the [`preview::DocumentConverter`] seam |
//! | [`render`] | Maud templates for the three pages and the definition text files |
//! | [`serve`] | Local static server with a first-free-port scan and a CSP header |
//! | [`output`] | CLI output formatting for `generate` and `check` |
//!
//! # Design Decisions
//!
//! ## Declarative Overrides
//!
//! Projects whose images need special handling (a different preview
//! directory, a pinned thumbnail, a fixed order) are described by one
//! [`assets::AssetOverride`] entry each. A single resolution routine consults
//! the table; there are no per-project code paths.
//!
//! ## Self-Contained Pages
//!
//! CSS and JavaScript are embedded at compile time and inlined into every
//! page, together with the project and tool tables as JSON. The pages work
//! from any static file server, and client-side search and filtering need no
//! extra requests.
//!
//! ## Injected Document Conversion
//!
//! Rendering PDF pages needs an external program. It sits behind a trait so
//! tests use a stub and `folio check` can resolve without converting.

pub mod assets;
pub mod catalog;
pub mod config;
pub mod naming;
pub mod output;
pub mod preview;
pub mod render;
pub mod serve;

#[cfg(test)]
pub(crate) mod test_helpers;
