//! Project and tool catalog.
//!
//! The catalog is the read-only data the renderer works from. It has two
//! halves with different origins:
//!
//! - **Projects** come from a literal table. The stock table lives in
//!   [`builtin_projects`]; `config.toml` may replace it with `[[projects]]`.
//! - **Tools** are discovered by scanning the toolbox directory.
//!
//! ## Toolbox Layout
//!
//! ```text
//! toolbox/
//! ├── nervi_dome/                      # Tool directory
//! │   ├── nervi_dome.ghx               # Definition (qualifies the directory)
//! │   └── nervi_dome.gh                # Companion binary (optional download)
//! ├── nervi_dome_readme.txt            # Description: last non-empty line
//! ├── thermal_study.ghx                # Standalone definition, id = stem
//! └── sketches/                        # No .ghx inside → ignored
//! ```
//!
//! Identifiers come straight from the directory listing, so they are unique
//! without any de-duplication step.

use crate::config::{SiteConfig, ToolboxConfig};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One portfolio project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectRecord {
    /// Folder name under the archive directory; doubles as the DOM anchor.
    pub id: String,
    /// Filter tags, in display order.
    pub tags: Vec<String>,
    /// Free text. May contain trusted `<a class="project-link">` markup.
    pub description: String,
    /// Tool id this project cross-references, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// One downloadable parametric definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRecord {
    pub id: String,
    pub description: String,
    pub tags: Vec<String>,
    /// The primary-extension definition file.
    pub definition: PathBuf,
    /// The companion-extension file next to the definition, if present.
    pub companion: Option<PathBuf>,
}

/// Projects in table order plus tools sorted by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub projects: Vec<ProjectRecord>,
    pub tools: Vec<ToolRecord>,
}

impl Catalog {
    pub fn new(projects: Vec<ProjectRecord>, tools: Vec<ToolRecord>) -> Self {
        Self { projects, tools }
    }

    /// Build the catalog for a site root: projects from config, tools from disk.
    pub fn load(root: &Path, config: &SiteConfig) -> Self {
        let toolbox_dir = root.join(&config.paths.toolbox_dir);
        Self {
            projects: config.projects.clone(),
            tools: discover_tools(&toolbox_dir, &config.toolbox),
        }
    }

    pub fn project(&self, id: &str) -> Option<&ProjectRecord> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn tool(&self, id: &str) -> Option<&ToolRecord> {
        self.tools.iter().find(|t| t.id == id)
    }

    /// Every distinct project tag, sorted.
    pub fn all_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self
            .projects
            .iter()
            .flat_map(|p| p.tags.iter().map(String::as_str))
            .collect();
        tags.sort_unstable();
        tags.dedup();
        tags
    }
}

/// Scan the toolbox directory for tools.
///
/// A missing or unreadable directory yields an empty list: listing failures
/// are logged and treated as absence.
pub fn discover_tools(toolbox_dir: &Path, config: &ToolboxConfig) -> Vec<ToolRecord> {
    if !toolbox_dir.is_dir() {
        warn!("Toolbox directory not found: {}", toolbox_dir.display());
        return Vec::new();
    }

    let mut tools = Vec::new();
    for entry in WalkDir::new(toolbox_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("Skipping unreadable toolbox entry: {err}");
                continue;
            }
        };
        let path = entry.path();
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') {
            continue;
        }

        let (id, definition, companion) = if entry.file_type().is_dir() {
            let Some(definition) = first_with_extension(path, &config.primary_extension) else {
                debug!("No .{} in {}, not a tool", config.primary_extension, path.display());
                continue;
            };
            let companion = first_with_extension(path, &config.companion_extension);
            (name.to_string(), definition, companion)
        } else if has_extension(path, &config.primary_extension) {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            (stem, path.to_path_buf(), None)
        } else {
            continue;
        };

        let description = read_description(toolbox_dir, &id, config);
        let tags = tool_tags(&id, config);
        tools.push(ToolRecord {
            id,
            description,
            tags,
            definition,
            companion,
        });
    }

    tools.sort_by(|a, b| a.id.cmp(&b.id));
    tools
}

/// Description for a tool from `<toolbox>/<id>_readme.txt`.
///
/// Takes the last non-empty line, trimmed and lower-cased. Falls back to the
/// configured placeholder when the file is missing, unreadable, or blank.
pub fn read_description(toolbox_dir: &Path, id: &str, config: &ToolboxConfig) -> String {
    let readme = toolbox_dir.join(format!("{id}{}", config.readme_suffix));
    fs::read_to_string(readme)
        .ok()
        .and_then(|content| {
            content
                .lines()
                .rev()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(str::to_lowercase)
        })
        .unwrap_or_else(|| config.placeholder_description.clone())
}

/// Default tag first, then any extra tags configured for this id.
fn tool_tags(id: &str, config: &ToolboxConfig) -> Vec<String> {
    let mut tags = vec![config.default_tag.clone()];
    if let Some(extra) = config.extra_tags.get(id) {
        tags.extend(extra.iter().cloned());
    }
    tags
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|e| e.eq_ignore_ascii_case(ext))
            .unwrap_or(false)
}

/// First file (by name) directly inside `dir` with the given extension.
fn first_with_extension(dir: &Path, ext: &str) -> Option<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .map(|e| e.into_path())
        .find(|p| has_extension(p, ext))
}

/// Markup for an in-description link that opens a tool on the toolbox page.
fn tool_link(tool: &str, text: &str) -> String {
    format!(
        r#"<a href="toolbox.html#{tool}" class="project-link" onclick="expandToolboxProject(event, '{tool}')">{text}</a>"#
    )
}

/// Tool ids that a project description's toolbox links open, in order.
pub fn linked_tools(description: &str) -> Vec<&str> {
    description
        .split("expandToolboxProject(event, '")
        .skip(1)
        .filter_map(|rest| rest.split_once('\'').map(|(id, _)| id))
        .collect()
}

fn project(id: &str, tags: &[&str], link: Option<&str>, description: String) -> ProjectRecord {
    ProjectRecord {
        id: id.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        description,
        link: link.map(String::from),
    }
}

/// The stock project table.
pub fn builtin_projects() -> Vec<ProjectRecord> {
    vec![
        project(
            "ad_barnes_nature_reserve",
            &["team", "rhino", "fall '23", "miami, fl", "arc604"],
            None,
            "nature reserve proposal for public park, a.d. (doug) barnes, with offices, exhibit \
             gallery (discovery room), auditorium and public congregation (resiliency room)."
                .into(),
        ),
        project(
            "cannabis_farm",
            &["individual", "rhino", "spring '24", "miami, fl", "arc605"],
            None,
            "cannabis farm proposal equipped with flower cultivation and processing facilities, \
             and public program for education."
                .into(),
        ),
        project(
            "chil_bookshelf",
            &["individual", "rhino", "spring '24", "miami, fl", "chil"],
            None,
            "modular bookshelf for chil (community, housing and identity lab) studio space. \
             comprised of 13 aluminum pieces."
                .into(),
        ),
        project(
            "icosahedron_explosion",
            &["individual", "rhino", "fall '23", "arc611"],
            None,
            "geometrical exploration of an icosahedron, a 20 face polyhedron.".into(),
        ),
        project(
            "illinois_institute_of_technology_dorms",
            &["individual", "rhino", "grasshopper", "kangaroo", "fall '24", "chicago, il"],
            Some("grasshopper"),
            format!(
                "residential college building proposal for iit campus, with {}.",
                tool_link(
                    "illinois_institute_of_technology_truss_system",
                    "parametric truss system"
                )
            ),
        ),
        project(
            "janus_house",
            &["individual", "rhino", "spring '24", "precedent", "arc605"],
            None,
            "precedent study of studio sean canty's conceptual janus house.".into(),
        ),
        project(
            "lego_bridge",
            &["individual", "rhino", "grasshopper", "wasp", "fall '24", "miami, fl", "arc656"],
            Some("grasshopper"),
            format!(
                "bridge proposal, only using lego blocks, to go over lake osceola in the \
                 university of miami's campus. {} used to develop form and path.",
                tool_link("lego_bridge_aggregation", "computational aggregation")
            ),
        ),
        project(
            "moca_playhouse",
            &["team", "rhino", "summer '24", "miami, fl", "chil"],
            None,
            "community activation with temporary install of a lumber house, in moca (museum of \
             contemporary art, miami), inspired by miami's shotgun house vernacular."
                .into(),
        ),
        project(
            "nervi_dome",
            &["individual", "rhino", "grasshopper", "fall '24", "turin, it", "arc656"],
            Some("grasshopper"),
            format!(
                "{} of pier luigi nervi's palazzetto dello sport, in turin, italy.",
                tool_link("nervi_dome", "form study")
            ),
        ),
        project(
            "parametric_cup",
            &["individual", "rhino", "grasshopper", "fall '24", "arc656"],
            Some("grasshopper"),
            format!(
                "{} of a cup/glass.",
                tool_link("parametric_cup", "form exploration")
            ),
        ),
        project(
            "parametric_remapping",
            &["individual", "rhino", "grasshopper", "fall '24", "arc656"],
            Some("grasshopper"),
            format!(
                "automated shape {}.",
                tool_link("parametric_remapping", "remapping exercise")
            ),
        ),
        project(
            "parametric_stop",
            &["individual", "rhino", "grasshopper", "spring '24", "arc613"],
            Some("grasshopper"),
            format!(
                "bus stop proposal for university of miami's campus with {}.",
                tool_link("parametric_cup", "scripted form definition")
            ),
        ),
        project(
            "remote_research_center",
            &[
                "individual",
                "rhino",
                "grasshopper",
                "fall '24",
                "la tortuga, venezuela",
                "arc662",
            ],
            Some("thermal_study"),
            format!(
                "off-grid marine biology research center proposal located in isla la tortuga, \
                 venezuela. environmental/comfort efficiency achieved through {} and passive \
                 systems.",
                tool_link("thermal_study", "thermal study")
            ),
        ),
        project(
            "renault_center",
            &["individual", "rhino", "fall '24", "swindon, uk", "precedent", "arc607"],
            None,
            "precedent study of foster + partners' renault center, in swindon, uk.".into(),
        ),
        project(
            "rome_artist_residence",
            &["team", "rhino", "summer '24", "rome, it", "arc606"],
            None,
            "adaptive reuse proposal for post-office in rome, italy to be adapted to a \
             residential building for artists."
                .into(),
        ),
    ]
}
