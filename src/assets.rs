//! Project image resolution.
//!
//! Turns a project id into the images the archive page shows for it: one
//! thumbnail for the collapsed row and an ordered gallery for the expanded
//! entry. All paths come back relative to the site root with forward slashes,
//! ready to drop into `src` attributes.
//!
//! ## Resolution Steps
//!
//! ```text
//! archive/<id>/
//!   │
//!   ├─ discover ──► previews/ images when it exists (natural order)
//!   │               else direct images, minus preview.png and *_presentation
//!   │               else document pages (see preview.rs)
//!   │
//!   ├─ override ──► preview_dir / merge_previews replace discovery
//!   │               only / order / first_only shape the gallery
//!   │               thumbnail picks by exact name, else suffix
//!   │
//!   └─ urls ──────► relative to site root, ?t=<secs> on cache_bust names
//! ```
//!
//! The thumbnail defaults to the first discovered image, before any override
//! reorders the gallery. A project that discovers nothing resolves to `None`
//! and is left off the archive page.

use crate::catalog::ProjectRecord;
use crate::config::{AssetsConfig, SiteConfig};
use crate::naming::{sort_by_name, sort_natural};
use crate::preview::{DocumentConverter, document_previews};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Per-project exceptions to default asset resolution.
///
/// Every field is optional; an empty override resolves like no override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetOverride {
    /// Filename suffixes placed first, in this order.
    pub order: Vec<String>,
    /// Exact filenames forming the whole gallery, in this order.
    pub only: Option<Vec<String>>,
    /// Filename suffix of the thumbnail.
    pub thumbnail: Option<String>,
    /// Take images from this sub-directory instead, sorted by plain name.
    pub preview_dir: Option<String>,
    /// Take images from the project directory and its previews together.
    pub merge_previews: bool,
    /// Gallery is the first image only.
    pub first_only: bool,
    /// Filenames whose URLs get `?t=<unix seconds>`.
    pub cache_bust: Vec<String>,
}

/// Resolved images for one project.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAssets {
    pub thumbnail: String,
    pub gallery: Vec<String>,
}

/// A project that made it onto the archive page.
#[derive(Debug, Clone)]
pub struct ArchiveEntry<'c> {
    pub project: &'c ProjectRecord,
    pub assets: ResolvedAssets,
}

/// Resolution of a whole project table.
#[derive(Debug, Clone, Default)]
pub struct ArchiveResolution<'c> {
    /// Projects with images, in table order.
    pub entries: Vec<ArchiveEntry<'c>>,
    /// Ids of projects that resolved to no images.
    pub skipped: Vec<String>,
}

/// Resolves project images under a site root.
pub struct Resolver<'a> {
    root: &'a Path,
    config: &'a SiteConfig,
    converter: &'a dyn DocumentConverter,
    timestamp: i64,
}

impl<'a> Resolver<'a> {
    /// `timestamp` is the unix-seconds value used for cache-busting suffixes.
    pub fn new(
        root: &'a Path,
        config: &'a SiteConfig,
        converter: &'a dyn DocumentConverter,
        timestamp: i64,
    ) -> Self {
        Self {
            root,
            config,
            converter,
            timestamp,
        }
    }

    /// Resolve a project using its configured override, if any.
    pub fn resolve(&self, id: &str) -> Option<ResolvedAssets> {
        match self.config.overrides.get(id) {
            Some(entry) => self.resolve_with(id, entry),
            None => self.resolve_with(id, &AssetOverride::default()),
        }
    }

    /// Resolve a project with an explicit override entry.
    pub fn resolve_with(&self, id: &str, entry: &AssetOverride) -> Option<ResolvedAssets> {
        let project_dir = self.root.join(&self.config.paths.archive_dir).join(id);
        if !project_dir.is_dir() {
            debug!("No project directory for {id}");
            return None;
        }

        let discovered = self.discover(&project_dir, entry);
        debug!("Found {} images for {id}", discovered.len());
        for image in &discovered {
            debug!("  {}", image.display());
        }
        let first = discovered.first()?.clone();

        let mut gallery = arrange(&discovered, entry);
        let thumbnail = if entry.first_only {
            gallery.truncate(1);
            gallery.first().cloned().unwrap_or(first)
        } else {
            entry
                .thumbnail
                .as_deref()
                .and_then(|name| {
                    discovered
                        .iter()
                        .find(|p| file_name(p) == Some(name))
                        .or_else(|| discovered.iter().find(|p| name_ends_with(p, name)))
                })
                .cloned()
                .unwrap_or(first)
        };

        Some(ResolvedAssets {
            thumbnail: self.url(&thumbnail, entry),
            gallery: gallery.iter().map(|p| self.url(p, entry)).collect(),
        })
    }

    /// Resolve every project, splitting them into archive entries and skips.
    pub fn resolve_all<'c>(&self, projects: &'c [ProjectRecord]) -> ArchiveResolution<'c> {
        let mut resolution = ArchiveResolution::default();
        for project in projects {
            match self.resolve(&project.id) {
                Some(assets) => resolution.entries.push(ArchiveEntry { project, assets }),
                None => {
                    info!("Skipping {}: no images", project.id);
                    resolution.skipped.push(project.id.clone());
                }
            }
        }
        resolution
    }

    fn discover(&self, project_dir: &Path, entry: &AssetOverride) -> Vec<PathBuf> {
        let assets = &self.config.assets;

        let found = if let Some(dir) = &entry.preview_dir {
            let mut images = image_files(&project_dir.join(dir), assets);
            if images.is_empty() {
                warn!(
                    "No preview images in {}, using default discovery",
                    project_dir.join(dir).display()
                );
                self.default_discovery(project_dir)
            } else {
                sort_by_name(&mut images);
                images
            }
        } else if entry.merge_previews {
            let mut images = direct_images(project_dir, assets);
            images.extend(image_files(&project_dir.join(&assets.preview_dir), assets));
            sort_by_name(&mut images);
            images
        } else {
            self.default_discovery(project_dir)
        };

        if found.is_empty() {
            document_previews(project_dir, assets, self.converter)
        } else {
            found
        }
    }

    /// Previews directory when it exists, else direct images. Natural order.
    ///
    /// An existing previews directory is authoritative even when it holds no
    /// images; direct images are not consulted.
    fn default_discovery(&self, project_dir: &Path) -> Vec<PathBuf> {
        let assets = &self.config.assets;
        let previews = project_dir.join(&assets.preview_dir);
        let mut images = if previews.is_dir() {
            image_files(&previews, assets)
        } else {
            direct_images(project_dir, assets)
        };
        sort_natural(&mut images);
        images
    }

    fn url(&self, path: &Path, entry: &AssetOverride) -> String {
        let url = relative_url(self.root, path);
        let busted = file_name(path)
            .map(|name| entry.cache_bust.iter().any(|b| b == name))
            .unwrap_or(false);
        if busted {
            format!("{url}?t={}", self.timestamp)
        } else {
            url
        }
    }
}

/// Apply `only` or `order` to the discovered list.
fn arrange(discovered: &[PathBuf], entry: &AssetOverride) -> Vec<PathBuf> {
    if let Some(only) = &entry.only {
        return only
            .iter()
            .filter_map(|name| {
                discovered
                    .iter()
                    .find(|p| file_name(p) == Some(name.as_str()))
                    .cloned()
            })
            .collect();
    }

    let mut remaining = discovered.to_vec();
    let mut placed = Vec::with_capacity(remaining.len());
    for suffix in &entry.order {
        if let Some(pos) = remaining.iter().position(|p| name_ends_with(p, suffix)) {
            placed.push(remaining.remove(pos));
        }
    }
    placed.extend(remaining);
    placed
}

/// Path relative to `root`, joined with `/`. Falls back to the full path.
pub fn relative_url(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

fn name_ends_with(path: &Path, suffix: &str) -> bool {
    file_name(path).is_some_and(|n| n.ends_with(suffix))
}

/// Image files directly inside `dir`, unsorted. Missing dir → empty.
fn image_files(dir: &Path, assets: &AssetsConfig) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| assets.is_image(p))
        .collect()
}

/// Images directly in the project directory, minus legacy and export files.
fn direct_images(project_dir: &Path, assets: &AssetsConfig) -> Vec<PathBuf> {
    image_files(project_dir, assets)
        .into_iter()
        .filter(|p| {
            let legacy = file_name(p) == Some(assets.legacy_filename.as_str());
            let export = p
                .file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|s| s.ends_with(&assets.export_suffix));
            !legacy && !export
        })
        .collect()
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// The stock override table.
pub fn builtin_overrides() -> BTreeMap<String, AssetOverride> {
    let preview_dir = |dir: &str| AssetOverride {
        preview_dir: Some(dir.to_string()),
        ..AssetOverride::default()
    };
    let first_only = || AssetOverride {
        first_only: true,
        ..AssetOverride::default()
    };

    BTreeMap::from([
        (
            "ad_barnes_nature_reserve".to_string(),
            AssetOverride {
                order: names(&[
                    "site_plan.jpg",
                    "floor_plan.jpg",
                    "structural_plan.jpg",
                    "exploded_iso_diagram.jpg",
                    "render.jpg",
                ]),
                thumbnail: Some("render.jpg".to_string()),
                ..AssetOverride::default()
            },
        ),
        (
            "cannabis_farm".to_string(),
            AssetOverride {
                order: names(&[
                    "cover.jpg",
                    "site_plan.jpg",
                    "program_diagram.jpg",
                    "harvesting_plan.jpg",
                    "flowering_plan.jpg",
                    "extraction_plan.jpg",
                    "public_plan.jpg",
                    "pavilion.jpg",
                    "typical_structure.jpg",
                    "flexbrick_composition_diagram.jpg",
                ]),
                ..AssetOverride::default()
            },
        ),
        (
            "chil_bookshelf".to_string(),
            AssetOverride {
                order: names(&[
                    "con_doc.jpg",
                    "render.jpg",
                    "diagram.jpg",
                    "view_2.jpg",
                    "built.JPG",
                    "view_1.jpeg",
                    "compositions.GIF",
                ]),
                thumbnail: Some("render.jpg".to_string()),
                cache_bust: names(&["con_doc.jpg", "view_1.jpeg"]),
                ..AssetOverride::default()
            },
        ),
        (
            "janus_house".to_string(),
            AssetOverride {
                order: names(&[
                    "cover.jpeg",
                    "dogtrot_diagram.jpg",
                    "form_diagram.jpeg",
                    "unrolled_diagram.jpg",
                    "floor_plan.jpg",
                    "section.jpg",
                ]),
                cache_bust: names(&["unrolled_diagram.jpg"]),
                ..AssetOverride::default()
            },
        ),
        (
            "moca_playhouse".to_string(),
            AssetOverride {
                only: Some(names(&[
                    "Floor Plan_001.png",
                    "tech_drawings_001.png",
                    "tech_drawings_002.png",
                    "tech_drawings_010.png",
                    "tech_drawings_012.png",
                    "tech_drawings_014.png",
                    "view_4.jpg",
                    "view_2.JPG",
                    "view_3.JPG",
                ])),
                thumbnail: Some("view_2.JPG".to_string()),
                merge_previews: true,
                ..AssetOverride::default()
            },
        ),
        (
            "parametric_stop".to_string(),
            AssetOverride {
                only: Some(names(&[
                    "index_diagram.jpeg",
                    "site_plan.jpeg",
                    "floor_plan.jpeg",
                    "section.jpeg",
                    "perspective.jpeg",
                ])),
                thumbnail: Some("cover.jpeg".to_string()),
                ..AssetOverride::default()
            },
        ),
        (
            "illinois_institute_of_technology_dorms".to_string(),
            preview_dir("previews"),
        ),
        ("lego_bridge".to_string(), preview_dir("previews")),
        ("renault_center".to_string(), preview_dir("previews")),
        ("remote_research_center".to_string(), preview_dir("previews")),
        ("rome_artist_residence".to_string(), preview_dir("preview")),
        ("icosahedron_explosion".to_string(), first_only()),
        ("nervi_dome".to_string(), first_only()),
        ("parametric_cup".to_string(), first_only()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::NullConverter;
    use crate::test_helpers::{StubConverter, touch};
    use tempfile::TempDir;

    const TS: i64 = 1_700_000_000;

    fn site(files: &[&str]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for f in files {
            touch(&tmp.path().join("archive").join(f));
        }
        tmp
    }

    fn resolve(tmp: &TempDir, id: &str, entry: &AssetOverride) -> Option<ResolvedAssets> {
        let config = SiteConfig::default();
        Resolver::new(tmp.path(), &config, &NullConverter, TS).resolve_with(id, entry)
    }

    fn gallery_names(assets: &ResolvedAssets) -> Vec<&str> {
        assets
            .gallery
            .iter()
            .map(|u| u.rsplit('/').next().unwrap())
            .collect()
    }

    // =========================================================================
    // Default discovery
    // =========================================================================

    #[test]
    fn single_image_is_thumbnail_and_gallery() {
        let tmp = site(&["solo/cover.jpg"]);
        let assets = resolve(&tmp, "solo", &AssetOverride::default()).unwrap();
        assert_eq!(assets.thumbnail, "archive/solo/cover.jpg");
        assert_eq!(assets.gallery, vec!["archive/solo/cover.jpg"]);
    }

    #[test]
    fn natural_order_by_default() {
        let tmp = site(&["p/img10.jpg", "p/img2.jpg", "p/img1.jpg"]);
        let assets = resolve(&tmp, "p", &AssetOverride::default()).unwrap();
        assert_eq!(gallery_names(&assets), vec!["img1.jpg", "img2.jpg", "img10.jpg"]);
        assert_eq!(assets.thumbnail, "archive/p/img1.jpg");
    }

    #[test]
    fn previews_dir_takes_precedence() {
        let tmp = site(&["p/main.jpg", "p/previews/b.png", "p/previews/a.PNG"]);
        let assets = resolve(&tmp, "p", &AssetOverride::default()).unwrap();
        assert_eq!(gallery_names(&assets), vec!["a.PNG", "b.png"]);
        assert_eq!(assets.thumbnail, "archive/p/previews/a.PNG");
    }

    #[test]
    fn empty_previews_dir_hides_direct_images() {
        let tmp = site(&["p/main.jpg", "p/previews/notes.txt"]);
        assert!(resolve(&tmp, "p", &AssetOverride::default()).is_none());
    }

    #[test]
    fn empty_previews_dir_still_gets_document_pages() {
        let tmp = site(&["p/main.jpg", "p/boards.pdf", "p/previews/notes.txt"]);
        let config = SiteConfig::default();
        let converter = StubConverter::new(1);
        let resolver = Resolver::new(tmp.path(), &config, &converter, TS);

        let assets = resolver.resolve_with("p", &AssetOverride::default()).unwrap();
        assert_eq!(assets.gallery, vec!["archive/p/previews/boards_1.png"]);
        assert_eq!(converter.calls(), vec!["boards"]);
    }

    #[test]
    fn legacy_and_export_files_excluded() {
        let tmp = site(&[
            "p/preview.png",
            "p/board_presentation.jpg",
            "p/plan.jpg",
            "p/notes.txt",
        ]);
        let assets = resolve(&tmp, "p", &AssetOverride::default()).unwrap();
        assert_eq!(gallery_names(&assets), vec!["plan.jpg"]);
    }

    #[test]
    fn non_image_project_has_no_assets() {
        let tmp = site(&["p/notes.txt", "p/model.3dm"]);
        assert!(resolve(&tmp, "p", &AssetOverride::default()).is_none());
    }

    #[test]
    fn missing_project_dir_has_no_assets() {
        let tmp = site(&[]);
        assert!(resolve(&tmp, "ghost", &AssetOverride::default()).is_none());
    }

    #[test]
    fn documents_converted_when_no_images() {
        let tmp = site(&["p/boards.pdf"]);
        let config = SiteConfig::default();
        let converter = StubConverter::new(2);
        let resolver = Resolver::new(tmp.path(), &config, &converter, TS);

        let assets = resolver.resolve_with("p", &AssetOverride::default()).unwrap();
        assert_eq!(
            assets.gallery,
            vec![
                "archive/p/previews/boards_1.png",
                "archive/p/previews/boards_2.png"
            ]
        );
        assert_eq!(assets.thumbnail, "archive/p/previews/boards_1.png");
    }

    #[test]
    fn document_without_converter_output_has_no_assets() {
        let tmp = site(&["p/boards.pdf"]);
        assert!(resolve(&tmp, "p", &AssetOverride::default()).is_none());
    }

    // =========================================================================
    // Overrides
    // =========================================================================

    #[test]
    fn order_places_listed_first_rest_natural() {
        let tmp = site(&[
            "p/view_10.jpg",
            "p/view_2.jpg",
            "p/render.jpg",
            "p/site_plan.jpg",
            "p/floor_plan.jpg",
        ]);
        let entry = AssetOverride {
            order: names(&["site_plan.jpg", "render.jpg", "missing.jpg"]),
            ..AssetOverride::default()
        };
        let assets = resolve(&tmp, "p", &entry).unwrap();
        assert_eq!(
            gallery_names(&assets),
            vec![
                "site_plan.jpg",
                "render.jpg",
                "floor_plan.jpg",
                "view_2.jpg",
                "view_10.jpg"
            ]
        );
        // thumbnail stays the first discovered image
        assert_eq!(assets.thumbnail, "archive/p/floor_plan.jpg");
    }

    #[test]
    fn order_matches_by_suffix_first_unplaced() {
        let tmp = site(&["p/a_plan.jpg", "p/b_plan.jpg", "p/cover.jpg"]);
        let entry = AssetOverride {
            order: names(&["plan.jpg", "plan.jpg"]),
            ..AssetOverride::default()
        };
        let assets = resolve(&tmp, "p", &entry).unwrap();
        assert_eq!(
            gallery_names(&assets),
            vec!["a_plan.jpg", "b_plan.jpg", "cover.jpg"]
        );
    }

    #[test]
    fn only_keeps_exact_names_in_order() {
        let tmp = site(&["p/cover.jpeg", "p/section.jpeg", "p/site_plan.jpeg", "p/x_section.jpeg"]);
        let entry = AssetOverride {
            only: Some(names(&["site_plan.jpeg", "section.jpeg", "absent.jpeg"])),
            thumbnail: Some("cover.jpeg".to_string()),
            ..AssetOverride::default()
        };
        let assets = resolve(&tmp, "p", &entry).unwrap();
        assert_eq!(gallery_names(&assets), vec!["site_plan.jpeg", "section.jpeg"]);
        assert_eq!(assets.thumbnail, "archive/p/cover.jpeg");
    }

    #[test]
    fn only_matching_nothing_keeps_empty_gallery() {
        let tmp = site(&["p/cover.jpg"]);
        let entry = AssetOverride {
            only: Some(names(&["absent.jpg"])),
            ..AssetOverride::default()
        };
        let assets = resolve(&tmp, "p", &entry).unwrap();
        assert!(assets.gallery.is_empty());
        assert_eq!(assets.thumbnail, "archive/p/cover.jpg");
    }

    #[test]
    fn thumbnail_suffix_falls_back_to_first() {
        let tmp = site(&["p/a.jpg", "p/b.jpg"]);
        let entry = AssetOverride {
            thumbnail: Some("render.jpg".to_string()),
            ..AssetOverride::default()
        };
        let assets = resolve(&tmp, "p", &entry).unwrap();
        assert_eq!(assets.thumbnail, "archive/p/a.jpg");
    }

    #[test]
    fn thumbnail_exact_name_beats_longer_suffix_match() {
        let tmp = site(&["p/back_cover.jpeg", "p/cover.jpeg", "p/plan.jpeg"]);
        let entry = AssetOverride {
            thumbnail: Some("cover.jpeg".to_string()),
            ..AssetOverride::default()
        };
        let assets = resolve(&tmp, "p", &entry).unwrap();
        assert_eq!(assets.thumbnail, "archive/p/cover.jpeg");
    }

    #[test]
    fn thumbnail_suffix_used_without_exact_name() {
        let tmp = site(&["p/a.jpg", "p/site_render.jpg"]);
        let entry = AssetOverride {
            thumbnail: Some("render.jpg".to_string()),
            ..AssetOverride::default()
        };
        let assets = resolve(&tmp, "p", &entry).unwrap();
        assert_eq!(assets.thumbnail, "archive/p/site_render.jpg");
    }

    #[test]
    fn preview_dir_redirect_sorted_by_plain_name() {
        let tmp = site(&[
            "p/cover.jpg",
            "p/preview/page_10.png",
            "p/preview/page_2.png",
            "p/preview/Page_1.png",
        ]);
        let entry = AssetOverride {
            preview_dir: Some("preview".to_string()),
            ..AssetOverride::default()
        };
        let assets = resolve(&tmp, "p", &entry).unwrap();
        assert_eq!(
            gallery_names(&assets),
            vec!["Page_1.png", "page_10.png", "page_2.png"]
        );
        assert_eq!(assets.thumbnail, "archive/p/preview/Page_1.png");
    }

    #[test]
    fn missing_preview_dir_uses_default_discovery() {
        let tmp = site(&["p/img2.jpg", "p/img10.jpg"]);
        let entry = AssetOverride {
            preview_dir: Some("preview".to_string()),
            ..AssetOverride::default()
        };
        let assets = resolve(&tmp, "p", &entry).unwrap();
        assert_eq!(gallery_names(&assets), vec!["img2.jpg", "img10.jpg"]);
    }

    #[test]
    fn merge_previews_combines_and_sorts_by_name() {
        let tmp = site(&[
            "p/view_2.JPG",
            "p/preview.png",
            "p/previews/tech_drawings_001.png",
            "p/previews/Floor Plan_001.png",
        ]);
        let entry = AssetOverride {
            merge_previews: true,
            ..AssetOverride::default()
        };
        let assets = resolve(&tmp, "p", &entry).unwrap();
        assert_eq!(
            gallery_names(&assets),
            vec!["Floor Plan_001.png", "tech_drawings_001.png", "view_2.JPG"]
        );
    }

    #[test]
    fn first_only_truncates_after_ordering() {
        let tmp = site(&["p/a.jpg", "p/b.jpg", "p/c.jpg"]);
        let entry = AssetOverride {
            order: names(&["c.jpg"]),
            first_only: true,
            ..AssetOverride::default()
        };
        let assets = resolve(&tmp, "p", &entry).unwrap();
        assert_eq!(gallery_names(&assets), vec!["c.jpg"]);
        assert_eq!(assets.thumbnail, "archive/p/c.jpg");
    }

    #[test]
    fn cache_bust_applies_to_gallery_and_thumbnail() {
        let tmp = site(&["p/con_doc.jpg", "p/render.jpg"]);
        let entry = AssetOverride {
            cache_bust: names(&["con_doc.jpg"]),
            ..AssetOverride::default()
        };
        let assets = resolve(&tmp, "p", &entry).unwrap();
        assert_eq!(assets.thumbnail, format!("archive/p/con_doc.jpg?t={TS}"));
        assert_eq!(
            assets.gallery,
            vec![
                format!("archive/p/con_doc.jpg?t={TS}"),
                "archive/p/render.jpg".to_string()
            ]
        );
    }

    #[test]
    fn configured_override_used_by_resolve() {
        let tmp = site(&["nervi_dome/a.jpg", "nervi_dome/b.jpg"]);
        let config = SiteConfig::default();
        let resolver = Resolver::new(tmp.path(), &config, &NullConverter, TS);
        let assets = resolver.resolve("nervi_dome").unwrap();
        assert_eq!(assets.gallery, vec!["archive/nervi_dome/a.jpg"]);
    }

    #[test]
    fn builtin_chil_bookshelf_layout() {
        let tmp = site(&[
            "chil_bookshelf/view_1.jpeg",
            "chil_bookshelf/compositions.GIF",
            "chil_bookshelf/built.JPG",
            "chil_bookshelf/render.jpg",
            "chil_bookshelf/con_doc.jpg",
            "chil_bookshelf/diagram.jpg",
            "chil_bookshelf/view_2.jpg",
        ]);
        let config = SiteConfig::default();
        let resolver = Resolver::new(tmp.path(), &config, &NullConverter, TS);
        let assets = resolver.resolve("chil_bookshelf").unwrap();
        assert_eq!(
            gallery_names(&assets),
            vec![
                format!("con_doc.jpg?t={TS}"),
                "render.jpg".to_string(),
                "diagram.jpg".to_string(),
                "view_2.jpg".to_string(),
                "built.JPG".to_string(),
                format!("view_1.jpeg?t={TS}"),
                "compositions.GIF".to_string(),
            ]
        );
        assert_eq!(assets.thumbnail, "archive/chil_bookshelf/render.jpg");
    }

    #[test]
    fn builtin_parametric_stop_thumbnail_is_cover() {
        let tmp = site(&[
            "parametric_stop/back_cover.jpeg",
            "parametric_stop/cover.jpeg",
            "parametric_stop/index_diagram.jpeg",
            "parametric_stop/site_plan.jpeg",
        ]);
        let config = SiteConfig::default();
        let resolver = Resolver::new(tmp.path(), &config, &NullConverter, TS);
        let assets = resolver.resolve("parametric_stop").unwrap();
        assert_eq!(assets.thumbnail, "archive/parametric_stop/cover.jpeg");
        assert_eq!(
            gallery_names(&assets),
            vec!["index_diagram.jpeg", "site_plan.jpeg"]
        );
    }

    #[test]
    fn resolve_all_splits_entries_and_skips() {
        let tmp = site(&["a/cover.jpg", "b/notes.txt", "c/x.png"]);
        let mut config = SiteConfig::default();
        config.overrides.clear();
        let projects: Vec<ProjectRecord> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| ProjectRecord {
                id: id.to_string(),
                tags: vec![],
                description: String::new(),
                link: None,
            })
            .collect();

        let resolver = Resolver::new(tmp.path(), &config, &NullConverter, TS);
        let resolution = resolver.resolve_all(&projects);
        let ids: Vec<&str> = resolution
            .entries
            .iter()
            .map(|e| e.project.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(resolution.skipped, vec!["b", "d"]);
    }

    #[test]
    fn relative_url_uses_forward_slashes() {
        let root = Path::new("/site");
        let path = Path::new("/site/archive/p/previews/a.png");
        assert_eq!(relative_url(root, path), "archive/p/previews/a.png");
    }

    #[test]
    fn builtin_overrides_are_consistent() {
        let table = builtin_overrides();
        assert_eq!(table.len(), 14);
        for (id, entry) in &table {
            assert!(
                !(entry.preview_dir.is_some() && entry.merge_previews),
                "{id}"
            );
        }
        assert_eq!(
            table["rome_artist_residence"].preview_dir.as_deref(),
            Some("preview")
        );
    }
}
