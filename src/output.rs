//! CLI output formatting for `generate` and `check`.
//!
//! Output is information-first: every entity leads with its positional index
//! and id, with paths and details as indented context lines.
//!
//! ## Generate
//!
//! ```text
//! home → index.html
//! archive → archive.html
//!     001 illinois_pavilion (4 images)
//!     002 lego_bridge (1 image)
//! toolbox → toolbox.html
//!     001 dome_frame → ghx_content/dome_frame.ghx
//!
//! Skipped (no images)
//!     empty_project
//!
//! Generated 3 pages, 2 projects, 1 definition
//! ```
//!
//! ## Check
//!
//! ```text
//! Projects
//! 001 illinois_pavilion (4 images)
//!     Tags: individual, rhino
//!     Thumbnail: archive/illinois_pavilion/cover.jpg
//!     a parametric pavilion for the campus...
//!
//! Tags
//!     individual, rhino
//!
//! Tools
//! 001 dome_frame
//!     Source: toolbox/dome_frame/dome_frame.ghx
//!     Tags: grasshopper
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::assets::{ArchiveResolution, relative_url};
use crate::catalog::{Catalog, linked_tools};
use crate::config::SiteConfig;
use crate::render::{GenerateSummary, Page};
use std::path::Path;

const DESCRIPTION_WIDTH: usize = 60;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Format an entity header: positional index + id, with optional image count.
///
/// ```text
/// 001 illinois_pavilion (4 images)
/// 001 dome_frame
/// ```
fn entity_header(index: usize, id: &str, images: Option<usize>) -> String {
    match images {
        Some(n) => format!(
            "{} {} ({})",
            format_index(index),
            id,
            plural(n, "image", "images")
        ),
        None => format!("{} {}", format_index(index), id),
    }
}

/// Strip HTML tags from a string (simple angle-bracket stripping).
fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn description_line(depth: usize, description: &str) -> Option<String> {
    let plain = strip_html_tags(description);
    let truncated = truncate_desc(plain.trim(), DESCRIPTION_WIDTH);
    (!truncated.is_empty()).then(|| format!("{}{}", indent(depth), truncated))
}

// ============================================================================
// Generate
// ============================================================================

/// Format the summary of a `generate` run.
pub fn format_generate_output(summary: &GenerateSummary, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for page in Page::ALL {
        lines.push(format!("{} \u{2192} {}", page.label(), page.file()));
        match page {
            Page::Home => {}
            Page::Archive => {
                for (i, (id, count)) in summary.archived.iter().enumerate() {
                    lines.push(format!(
                        "{}{}",
                        indent(1),
                        entity_header(i + 1, id, Some(*count))
                    ));
                }
            }
            Page::Toolbox => {
                for (i, path) in summary.definitions.iter().enumerate() {
                    let id = path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    lines.push(format!(
                        "{}{} \u{2192} {}",
                        indent(1),
                        entity_header(i + 1, &id, None),
                        relative_url(root, path)
                    ));
                }
            }
        }
    }

    if !summary.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped (no images)".to_string());
        for id in &summary.skipped {
            lines.push(format!("{}{}", indent(1), id));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {}",
        plural(summary.pages.len(), "page", "pages"),
        plural(summary.archived.len(), "project", "projects"),
        plural(summary.definitions.len(), "definition", "definitions"),
    ));

    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(summary: &GenerateSummary, root: &Path) {
    for line in format_generate_output(summary, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the inventory shown by `check`: resolved projects, skipped
/// projects, the tag vocabulary, tools, then overrides naming no project.
pub fn format_check_output(
    config: &SiteConfig,
    catalog: &Catalog,
    resolution: &ArchiveResolution,
    root: &Path,
) -> Vec<String> {
    let mut lines = vec!["Projects".to_string()];

    for (i, entry) in resolution.entries.iter().enumerate() {
        let project = entry.project;
        lines.push(entity_header(
            i + 1,
            &project.id,
            Some(entry.assets.gallery.len()),
        ));
        if !project.tags.is_empty() {
            lines.push(format!("{}Tags: {}", indent(1), project.tags.join(", ")));
        }
        lines.push(format!(
            "{}Thumbnail: {}",
            indent(1),
            entry.assets.thumbnail
        ));
        if let Some(link) = &project.link {
            lines.push(format!("{}Link: {}", indent(1), link));
        }
        for tool in linked_tools(&project.description) {
            if catalog.tool(tool).is_none() {
                lines.push(format!("{}Missing tool: {}", indent(1), tool));
            }
        }
        lines.extend(description_line(1, &project.description));
    }

    if !resolution.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped (no images)".to_string());
        for id in &resolution.skipped {
            lines.push(format!("{}{}", indent(1), id));
        }
    }

    let tags = catalog.all_tags();
    if !tags.is_empty() {
        lines.push(String::new());
        lines.push("Tags".to_string());
        lines.push(format!("{}{}", indent(1), tags.join(", ")));
    }

    lines.push(String::new());
    lines.push("Tools".to_string());
    for (i, tool) in catalog.tools.iter().enumerate() {
        lines.push(entity_header(i + 1, &tool.id, None));
        lines.push(format!(
            "{}Source: {}",
            indent(1),
            relative_url(root, &tool.definition)
        ));
        if let Some(companion) = &tool.companion {
            lines.push(format!(
                "{}Companion: {}",
                indent(1),
                relative_url(root, companion)
            ));
        }
        lines.push(format!("{}Tags: {}", indent(1), tool.tags.join(", ")));
        lines.extend(description_line(1, &tool.description));
    }

    let unused: Vec<&str> = config
        .overrides
        .keys()
        .map(String::as_str)
        .filter(|id| catalog.project(id).is_none())
        .collect();
    if !unused.is_empty() {
        lines.push(String::new());
        lines.push("Unused overrides".to_string());
        for id in unused {
            lines.push(format!("{}{}", indent(1), id));
        }
    }

    lines
}

/// Print check output to stdout.
pub fn print_check_output(
    config: &SiteConfig,
    catalog: &Catalog,
    resolution: &ArchiveResolution,
    root: &Path,
) {
    for line in format_check_output(config, catalog, resolution, root) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{ArchiveEntry, AssetOverride, ResolvedAssets};
    use crate::catalog::{ProjectRecord, ToolRecord};
    use std::path::PathBuf;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn strip_html_tags_removes_tags() {
        assert_eq!(
            strip_html_tags(r#"built with <a class="project-link" href="x">dome</a>"#),
            "built with dome"
        );
    }

    #[test]
    fn strip_html_tags_no_tags() {
        assert_eq!(strip_html_tags("plain text"), "plain text");
    }

    #[test]
    fn strip_html_tags_empty() {
        assert_eq!(strip_html_tags(""), "");
    }

    #[test]
    fn truncate_desc_short() {
        assert_eq!(truncate_desc("Short text", 40), "Short text");
    }

    #[test]
    fn truncate_desc_exact() {
        let text = "a".repeat(40);
        assert_eq!(truncate_desc(&text, 40), text);
    }

    #[test]
    fn truncate_desc_long() {
        let text = "a".repeat(50);
        let expected = format!("{}...", "a".repeat(40));
        assert_eq!(truncate_desc(&text, 40), expected);
    }

    #[test]
    fn truncate_desc_counts_chars_not_bytes() {
        assert_eq!(truncate_desc("martínez-oropeza", 7), "martíne...");
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(1), "    ");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn entity_header_with_count() {
        assert_eq!(
            entity_header(1, "pavilion", Some(5)),
            "001 pavilion (5 images)"
        );
        assert_eq!(entity_header(3, "pavilion", Some(1)), "003 pavilion (1 image)");
    }

    #[test]
    fn entity_header_without_count() {
        assert_eq!(entity_header(2, "dome", None), "002 dome");
    }

    // =========================================================================
    // Command output tests
    // =========================================================================

    fn summary(root: &Path) -> GenerateSummary {
        GenerateSummary {
            pages: Page::ALL.iter().map(|p| root.join(p.file())).collect(),
            archived: vec![("pavilion".to_string(), 4), ("bridge".to_string(), 1)],
            skipped: vec!["empty".to_string()],
            definitions: vec![root.join("ghx_content/dome.ghx")],
        }
    }

    #[test]
    fn generate_output_lists_pages_and_entities() {
        let root = PathBuf::from("/site");
        let lines = format_generate_output(&summary(&root), &root);
        assert_eq!(lines[0], "home \u{2192} index.html");
        assert_eq!(lines[1], "archive \u{2192} archive.html");
        assert_eq!(lines[2], "    001 pavilion (4 images)");
        assert_eq!(lines[3], "    002 bridge (1 image)");
        assert_eq!(lines[4], "toolbox \u{2192} toolbox.html");
        assert_eq!(lines[5], "    001 dome \u{2192} ghx_content/dome.ghx");
        assert!(lines.contains(&"Skipped (no images)".to_string()));
        assert!(lines.contains(&"    empty".to_string()));
        assert_eq!(
            lines.last().unwrap(),
            "Generated 3 pages, 2 projects, 1 definition"
        );
    }

    #[test]
    fn generate_output_omits_empty_skipped_section() {
        let root = PathBuf::from("/site");
        let mut summary = summary(&root);
        summary.skipped.clear();
        let lines = format_generate_output(&summary, &root);
        assert!(!lines.iter().any(|l| l.starts_with("Skipped")));
    }

    #[test]
    fn check_output_shows_projects_and_tools() {
        let root = PathBuf::from("/site");
        let project = ProjectRecord {
            id: "pavilion".to_string(),
            tags: vec!["individual".to_string(), "rhino".to_string()],
            description: concat!(
                r#"see <a href="toolbox.html#ghost" onclick="expandToolboxProject(event, 'ghost')">ghost</a>"#,
                r#" and <a href="toolbox.html#dome" onclick="expandToolboxProject(event, 'dome')">dome</a>"#,
            )
            .to_string(),
            link: Some("grasshopper".to_string()),
        };
        let tool = ToolRecord {
            id: "dome".to_string(),
            description: "a geodesic dome".to_string(),
            tags: vec!["grasshopper".to_string()],
            definition: root.join("toolbox/dome/dome.ghx"),
            companion: Some(root.join("toolbox/dome/dome.gh")),
        };
        let catalog = Catalog::new(vec![project], vec![tool]);
        let resolution = ArchiveResolution {
            entries: vec![ArchiveEntry {
                project: &catalog.projects[0],
                assets: ResolvedAssets {
                    thumbnail: "archive/pavilion/cover.jpg".to_string(),
                    gallery: vec!["archive/pavilion/cover.jpg".to_string()],
                },
            }],
            skipped: vec![],
        };

        let mut config = SiteConfig::default();
        config.overrides.clear();
        config
            .overrides
            .insert("retired".to_string(), AssetOverride::default());

        let lines = format_check_output(&config, &catalog, &resolution, &root);
        assert_eq!(
            lines,
            vec![
                "Projects",
                "001 pavilion (1 image)",
                "    Tags: individual, rhino",
                "    Thumbnail: archive/pavilion/cover.jpg",
                "    Link: grasshopper",
                "    Missing tool: ghost",
                "    see ghost and dome",
                "",
                "Tags",
                "    individual, rhino",
                "",
                "Tools",
                "001 dome",
                "    Source: toolbox/dome/dome.ghx",
                "    Companion: toolbox/dome/dome.gh",
                "    Tags: grasshopper",
                "    a geodesic dome",
                "",
                "Unused overrides",
                "    retired",
            ]
        );
    }
}
