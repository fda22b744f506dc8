//! HTML site generation.
//!
//! Takes the config, the catalog, and the resolved project images and writes
//! the three pages plus the per-tool definition text.
//!
//! ## Generated Files
//!
//! ```text
//! <root>/
//! ├── index.html                 # Home: heading, intro lines
//! ├── archive.html               # Projects with images, filterable by tag
//! ├── toolbox.html               # Tools with downloads and code preview
//! └── ghx_content/
//!     └── <tool>.ghx             # Definition text fetched by "view code"
//! ```
//!
//! ## Page Chrome
//!
//! Every page shares one navigation bar ([`render_nav`]): page buttons with
//! the current page highlighted, a search box, the light/dark toggle, and a
//! clock. The project and tool tables are inlined as JSON so search and tag
//! filtering run without fetching anything.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time from `static/` and inlined into
//! each page. Colors are injected from config as CSS custom properties.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Interpolated text is escaped. Project descriptions carry trusted link
//! markup and are emitted pre-escaped.

use crate::assets::{ArchiveEntry, Resolver, relative_url};
use crate::catalog::{Catalog, ProjectRecord, ToolRecord};
use crate::config::{self, SiteConfig};
use crate::preview::DocumentConverter;
use log::{error, info};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const BASE_CSS: &str = include_str!("../static/base.css");
const ENTRIES_CSS: &str = include_str!("../static/entries.css");
const ARCHIVE_CSS: &str = include_str!("../static/archive.css");
const TOOLBOX_CSS: &str = include_str!("../static/toolbox.css");
const THEME_JS: &str = include_str!("../static/theme.js");
const CLOCK_JS: &str = include_str!("../static/clock.js");
const SEARCH_JS: &str = include_str!("../static/search.js");
const ENTRIES_JS: &str = include_str!("../static/entries.js");
const ARCHIVE_JS: &str = include_str!("../static/archive.js");
const TOOLBOX_JS: &str = include_str!("../static/toolbox.js");

const TOGGLE_ICON: &str = "M8 4.5a.5.5 0 01.5.5v6a.5.5 0 01-1 0V5a.5.5 0 01.5-.5zM4.5 8a.5.5 0 01.5-.5h6a.5.5 0 010 1H5a.5.5 0 01-.5-.5z";
const CODE_ICON: &str = "M4.72 3.22a.75.75 0 011.06 1.06L2.06 8l3.72 3.72a.75.75 0 11-1.06 1.06L.47 8.53a.75.75 0 010-1.06l4.25-4.25zm6.56 0a.75.75 0 10-1.06 1.06L13.94 8l-3.72 3.72a.75.75 0 101.06 1.06l4.25-4.25a.75.75 0 000-1.06l-4.25-4.25z";
const DOWNLOAD_ICON: &str = "M7.47 10.78a.75.75 0 001.06 0l3.75-3.75a.75.75 0 00-1.06-1.06L8.75 8.44V1.75a.75.75 0 00-1.5 0v6.69L4.78 5.97a.75.75 0 00-1.06 1.06l3.75 3.75zM3.75 13a.75.75 0 000 1.5h8.5a.75.75 0 000-1.5h-8.5z";

/// The three generated pages, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Archive,
    Toolbox,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Home, Page::Archive, Page::Toolbox];

    pub fn file(self) -> &'static str {
        match self {
            Page::Home => "index.html",
            Page::Archive => "archive.html",
            Page::Toolbox => "toolbox.html",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Archive => "archive",
            Page::Toolbox => "toolbox",
        }
    }
}

/// What a generation run wrote.
#[derive(Debug, Clone, Default)]
pub struct GenerateSummary {
    /// Page files, in navigation order.
    pub pages: Vec<PathBuf>,
    /// Ids of projects on the archive page, with their gallery sizes.
    pub archived: Vec<(String, usize)>,
    /// Ids of projects left off for lack of images.
    pub skipped: Vec<String>,
    /// Extracted definition files, one per tool.
    pub definitions: Vec<PathBuf>,
}

/// Generate the site into `root`.
///
/// `timestamp` (unix seconds) is appended to cache-busted image URLs.
pub fn generate(
    root: &Path,
    config: &SiteConfig,
    catalog: &Catalog,
    converter: &dyn DocumentConverter,
    timestamp: i64,
) -> Result<GenerateSummary, RenderError> {
    let resolver = Resolver::new(root, config, converter, timestamp);
    let resolution = resolver.resolve_all(&catalog.projects);

    let data = inline_data(&catalog.projects, &resolution.entries, &catalog.tools)?;
    let css = format!(
        "{}\n\n{}\n\n{}",
        config::generate_color_css(&config.colors),
        BASE_CSS,
        ENTRIES_CSS
    );

    let mut summary = GenerateSummary {
        archived: resolution
            .entries
            .iter()
            .map(|e| (e.project.id.clone(), e.assets.gallery.len()))
            .collect(),
        skipped: resolution.skipped.clone(),
        ..GenerateSummary::default()
    };

    for page in Page::ALL {
        let markup = match page {
            Page::Home => render_index(config, &css, &data),
            Page::Archive => render_archive(config, &resolution.entries, &css, &data),
            Page::Toolbox => render_toolbox(root, config, &catalog.tools, &css, &data),
        };
        let path = root.join(page.file());
        fs::write(&path, markup.into_string())?;
        info!("Generated {}", page.file());
        summary.pages.push(path);
    }

    summary.definitions = write_definitions(root, config, &catalog.tools)?;
    Ok(summary)
}

/// Copy each tool's definition text into the content directory.
///
/// Unreadable definitions are written as an error line instead of failing
/// the run, so the "view code" panel shows what went wrong.
pub fn write_definitions(
    root: &Path,
    config: &SiteConfig,
    tools: &[ToolRecord],
) -> Result<Vec<PathBuf>, RenderError> {
    let dir = root.join(&config.paths.definition_content_dir);
    fs::create_dir_all(&dir)?;

    let mut written = Vec::with_capacity(tools.len());
    for tool in tools {
        let content = fs::read_to_string(&tool.definition).unwrap_or_else(|e| {
            error!("Error reading {}: {e}", tool.definition.display());
            format!("Error reading file: {e}")
        });
        let path = dir.join(definition_file_name(config, &tool.id));
        fs::write(&path, content)?;
        written.push(path);
    }
    info!(
        "Wrote {} definition file(s) to {}",
        written.len(),
        config.paths.definition_content_dir
    );
    Ok(written)
}

fn definition_file_name(config: &SiteConfig, id: &str) -> String {
    format!("{id}.{}", config.toolbox.primary_extension)
}

/// Search/filter record inlined for one project or tool.
#[derive(Serialize)]
struct InlineRecord<'a> {
    description: &'a str,
    tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<&'a str>,
    /// Projects only: whether the archive page has an entry to link to.
    #[serde(skip_serializing_if = "Option::is_none")]
    archived: Option<bool>,
}

/// `const projects = {...}; const tools = {...};` for the page script.
///
/// Every catalog project is included so search covers all descriptions and
/// tags; `archived` marks the ones the archive page shows. `</` is escaped
/// so the JSON cannot close the surrounding script element.
fn inline_data(
    projects: &[ProjectRecord],
    entries: &[ArchiveEntry],
    tools: &[ToolRecord],
) -> Result<String, RenderError> {
    let archived: BTreeSet<&str> = entries.iter().map(|e| e.project.id.as_str()).collect();
    let projects: BTreeMap<&str, InlineRecord> = projects
        .iter()
        .map(|p| {
            (
                p.id.as_str(),
                InlineRecord {
                    description: &p.description,
                    tags: &p.tags,
                    link: p.link.as_deref(),
                    archived: Some(archived.contains(p.id.as_str())),
                },
            )
        })
        .collect();
    let tools: BTreeMap<&str, InlineRecord> = tools
        .iter()
        .map(|t| {
            (
                t.id.as_str(),
                InlineRecord {
                    description: &t.description,
                    tags: &t.tags,
                    link: None,
                    archived: None,
                },
            )
        })
        .collect();

    Ok(format!(
        "const projects = {};\nconst tools = {};",
        script_safe(&serde_json::to_string(&projects)?),
        script_safe(&serde_json::to_string(&tools)?)
    ))
}

fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

/// Description with a trailing period.
fn sentence(text: &str) -> String {
    if text.ends_with('.') {
        text.to_string()
    } else {
        format!("{text}.")
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(
    config: &SiteConfig,
    title: &str,
    css: &str,
    content: Markup,
    scripts: &[&str],
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta http-equiv="Content-Security-Policy" content=(config.server.content_security_policy);
                title { (title) }
                link rel="icon" type="image/svg+xml" href=(config.site.favicon);
                style { (PreEscaped(css)) }
            }
            body {
                (content)
                @for script in scripts {
                    script { (PreEscaped(script)) }
                }
            }
        }
    }
}

fn page_title(config: &SiteConfig, page: Page) -> String {
    match page {
        Page::Home => config.site.title.clone(),
        _ => format!("{} - {}", page.label(), config.site.title),
    }
}

/// Renders the shared navigation bar
pub fn render_nav(current: Page) -> Markup {
    html! {
        div.nav-container {
            nav.nav-buttons {
                @for page in Page::ALL {
                    a.nav-button.active[page == current] href=(page.file()) { (page.label()) }
                }
            }
            div.nav-right {
                div.search-container {
                    input #searchInput .search-input type="search" placeholder="search" autocomplete="off";
                    div #searchResults .search-results {}
                }
                div.theme-toggle {
                    div.theme-option.light.active data-theme-choice="light" { "☀" }
                    div.theme-option.dark data-theme-choice="dark" { "☾" }
                    div.theme-slider {}
                }
                div #clock .clock {}
            }
        }
    }
}

fn icon(size: u32, d: &str) -> Markup {
    html! {
        svg width=(size) height=(size) viewBox="0 0 16 16" {
            path fill="currentColor" d=(d) {}
        }
    }
}

fn entry_tags(tags: &[String]) -> Markup {
    html! {
        div.entry-tags {
            @for tag in tags {
                span.tag data-tag=(tag) { (tag) }
            }
        }
    }
}

fn toggle_button() -> Markup {
    html! {
        button.toggle-button type="button" aria-label="expand" { (icon(24, TOGGLE_ICON)) }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the home page
fn render_index(config: &SiteConfig, css: &str, data: &str) -> Markup {
    let content = html! {
        div.container {
            (render_nav(Page::Home))
            h1 { (config.site.heading) }
            div.revealing-text {
                @for line in &config.site.intro {
                    (line) br;
                }
                @if let Some(status) = &config.site.status {
                    (status) span.loading-dots {}
                }
            }
        }
    };

    base_document(
        config,
        &page_title(config, Page::Home),
        css,
        content,
        &[data, THEME_JS, CLOCK_JS, SEARCH_JS],
    )
}

/// Renders the archive page with one expandable entry per project
fn render_archive(config: &SiteConfig, entries: &[ArchiveEntry], css: &str, data: &str) -> Markup {
    let css = format!("{css}\n\n{ARCHIVE_CSS}");
    let content = html! {
        div.container {
            (render_nav(Page::Archive))
            h1 { (Page::Archive.label()) }
            div #activeFilters .active-filters {}
            div.entry-list.project-list data-source="projects" {
                @for entry in entries {
                    @let id = &entry.project.id;
                    div.entry.project-item id=(id) data-id=(id) {
                        div.entry-header {
                            div.entry-title-container {
                                h2.entry-title { (id) }
                                (entry_tags(&entry.project.tags))
                            }
                            div.project-thumbnail {
                                img src=(entry.assets.thumbnail) alt={ (id) " thumbnail" };
                            }
                            (toggle_button())
                        }
                        div.entry-content id={ "content-" (id) } {
                            div.entry-description.project-description {
                                (PreEscaped(&entry.project.description))
                            }
                            div.project-images {
                                @for image in &entry.assets.gallery {
                                    img.project-image src=(image) alt={ (id) " image" } loading="lazy";
                                }
                            }
                        }
                    }
                }
            }
        }
        div #imageModal .modal {
            button #modalClose .modal-close type="button" { "×" }
            button #modalPrev .modal-nav.modal-prev type="button" { "<" }
            img #modalImage .modal-content alt="";
            button #modalNext .modal-nav.modal-next type="button" { ">" }
        }
    };

    base_document(
        config,
        &page_title(config, Page::Archive),
        &css,
        content,
        &[data, THEME_JS, CLOCK_JS, SEARCH_JS, ENTRIES_JS, ARCHIVE_JS],
    )
}

/// Renders the toolbox page with one expandable entry per tool
fn render_toolbox(
    root: &Path,
    config: &SiteConfig,
    tools: &[ToolRecord],
    css: &str,
    data: &str,
) -> Markup {
    let css = format!("{css}\n\n{TOOLBOX_CSS}");
    let content_dir = &config.paths.definition_content_dir;
    let content = html! {
        div.container {
            (render_nav(Page::Toolbox))
            h1 { (Page::Toolbox.label()) }
            div #activeFilters .active-filters {}
            div.entry-list.tool-list data-source="tools" {
                @for tool in tools {
                    div.entry.tool-item id=(tool.id) data-id=(tool.id) {
                        div.entry-header {
                            div.entry-title-container {
                                h2.entry-title { (tool.id) }
                                (entry_tags(&tool.tags))
                            }
                            (toggle_button())
                        }
                        div.entry-content id={ "content-" (tool.id) } {
                            div.entry-description.tool-description { (sentence(&tool.description)) }
                            div.tool-actions {
                                button.tool-button type="button"
                                    data-code-src={ (content_dir) "/" (definition_file_name(config, &tool.id)) } {
                                    (icon(16, CODE_ICON))
                                    span.label { "view code" }
                                }
                                @if let Some(companion) = &tool.companion {
                                    a.tool-button href=(relative_url(root, companion)) download {
                                        (icon(16, DOWNLOAD_ICON))
                                        "download ." (config.toolbox.companion_extension)
                                    }
                                }
                                a.tool-button href=(relative_url(root, &tool.definition)) download {
                                    (icon(16, DOWNLOAD_ICON))
                                    "download ." (config.toolbox.primary_extension)
                                }
                            }
                            pre.code-preview {}
                            div.loading hidden { "Loading..." }
                        }
                    }
                }
            }
        }
    };

    base_document(
        config,
        &page_title(config, Page::Toolbox),
        &css,
        content,
        &[data, THEME_JS, CLOCK_JS, SEARCH_JS, ENTRIES_JS, TOOLBOX_JS],
    )
}

// ============================================================================
// Tests
// ============================================================================
