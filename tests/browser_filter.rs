//! Browser tests for the archive page's client-side behavior.
//!
//! The generated pages are self-contained, so they are loaded straight from
//! `file://` without a server.
//!
//! Run with: `cargo test --test browser_filter -- --ignored`

use headless_chrome::{Browser, LaunchOptions, Tab};
use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::{Arc, OnceLock};
use tempfile::TempDir;

// ===========================================================================
// Setup helpers
// ===========================================================================

const CONFIG: &str = r#"
[[projects]]
id = "solo"
tags = ["individual", "rhino"]
description = "a single-image project"

[[projects]]
id = "studio"
tags = ["team", "rhino"]
description = "a studio project"

[[projects]]
id = "workshop"
tags = ["team", "grasshopper"]
description = "a workshop project"

[[projects]]
id = "draft"
tags = ["team"]
description = "a draft with no images"
"#;

fn build_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    for id in ["solo", "studio", "workshop"] {
        let dir = tmp.path().join("archive").join(id);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("cover.jpg"), "fake image").unwrap();
    }
    fs::write(tmp.path().join("config.toml"), CONFIG).unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_folio"))
        .args(["generate", "--root", tmp.path().to_str().unwrap()])
        .status()
        .expect("failed to run folio");
    assert!(status.success(), "site generation failed");
    tmp
}

fn browser() -> &'static Browser {
    static B: OnceLock<Browser> = OnceLock::new();
    B.get_or_init(|| {
        Browser::new(LaunchOptions {
            window_size: Some((1280, 800)),
            ..Default::default()
        })
        .expect("failed to launch Chrome")
    })
}

fn open(root: &Path, page: &str) -> Arc<Tab> {
    let tab = browser().new_tab().unwrap();
    let url = format!("file://{}", root.join(page).display());
    tab.navigate_to(&url).unwrap().wait_until_navigated().unwrap();
    tab
}

/// Ids of the archive entries currently visible.
fn visible_ids(tab: &Tab) -> Vec<String> {
    let result = tab
        .evaluate(
            r#"JSON.stringify(Array.from(document.querySelectorAll('.entry'))
                .filter(e => !e.hidden)
                .map(e => e.dataset.id))"#,
            false,
        )
        .unwrap();
    serde_json::from_str(result.value.unwrap().as_str().unwrap()).unwrap()
}

fn click(tab: &Tab, selector: &str) {
    tab.wait_for_element(selector).unwrap().click().unwrap();
}

// ===========================================================================
// Tag filtering
// ===========================================================================

#[test]
#[ignore]
fn tag_click_filters_entries() {
    let site = build_site();
    let tab = open(site.path(), "archive.html");
    assert_eq!(visible_ids(&tab), vec!["solo", "studio", "workshop"]);

    click(&tab, r#"#studio .tag[data-tag="team"]"#);
    assert_eq!(visible_ids(&tab), vec!["studio", "workshop"]);
}

#[test]
#[ignore]
fn active_tags_must_all_match() {
    let site = build_site();
    let tab = open(site.path(), "archive.html");

    click(&tab, r#"#studio .tag[data-tag="team"]"#);
    click(&tab, r#"#studio .tag[data-tag="rhino"]"#);
    assert_eq!(visible_ids(&tab), vec!["studio"]);
}

#[test]
#[ignore]
fn removing_active_filter_restores_entries() {
    let site = build_site();
    let tab = open(site.path(), "archive.html");

    click(&tab, r#"#solo .tag[data-tag="individual"]"#);
    assert_eq!(visible_ids(&tab), vec!["solo"]);

    click(&tab, r#"#activeFilters .active-filter button"#);
    assert_eq!(visible_ids(&tab), vec!["solo", "studio", "workshop"]);
}

// ===========================================================================
// Hash landing
// ===========================================================================

#[test]
#[ignore]
fn hash_expands_matching_entry() {
    let site = build_site();
    let tab = open(site.path(), "archive.html#workshop");

    let expanded = tab
        .evaluate(
            "document.getElementById('workshop').classList.contains('expanded')",
            false,
        )
        .unwrap()
        .value
        .unwrap()
        .as_bool()
        .unwrap();
    assert!(expanded, "entry named by the hash should be expanded");
}

// ===========================================================================
// Search
// ===========================================================================

#[test]
#[ignore]
fn search_lists_imageless_project_without_link() {
    let site = build_site();
    let tab = open(site.path(), "index.html");

    let result = tab
        .evaluate(
            r#"(() => {
                const input = document.getElementById('searchInput');
                input.value = 'draft';
                input.dispatchEvent(new KeyboardEvent('keydown', { key: 'Enter' }));
                return JSON.stringify(Array.from(
                    document.querySelectorAll('#searchResults .search-result-item'))
                    .map(r => [r.querySelector('.search-result-title').textContent,
                               r.classList.contains('unlinked')]));
            })()"#,
            false,
        )
        .unwrap();
    let rows: Vec<(String, bool)> =
        serde_json::from_str(result.value.unwrap().as_str().unwrap()).unwrap();
    assert_eq!(rows, vec![("draft".to_string(), true)]);
}
