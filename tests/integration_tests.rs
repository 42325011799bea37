//! Integration tests for the rebrand crate.

use rebrand::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

fn create_extension_tree(dir: &Path) {
    fs::create_dir_all(dir.join("src/ublock")).unwrap();
    fs::create_dir_all(dir.join("src/js")).unwrap();
    fs::create_dir_all(dir.join(".git/objects")).unwrap();
    fs::create_dir_all(dir.join("node_modules/ublock-lib")).unwrap();

    File::create(dir.join("src/js/ublock.js"))
        .unwrap()
        .write_all(
            b"// uBlock Origin background page\nimport { start } from './start.js';\nconst title = 'uBlock';\nconst docs = 'https://example.com/ublock-thing';\n",
        )
        .unwrap();

    File::create(dir.join("src/ublock/ublock-icon.png"))
        .unwrap()
        .write_all(b"uBlock PNG")
        .unwrap();

    File::create(dir.join("README.md"))
        .unwrap()
        .write_all(b"# uBlock Origin\r\n\r\nuBlock is fast.\r\n")
        .unwrap();

    File::create(dir.join("notes.txt"))
        .unwrap()
        .write_all(b"nothing to see\n")
        .unwrap();

    File::create(dir.join(".git/objects/ublock"))
        .unwrap()
        .write_all(b"uBlock")
        .unwrap();

    File::create(dir.join("node_modules/ublock-lib/index.js"))
        .unwrap()
        .write_all(b"uBlock")
        .unwrap();
}

fn config(root: &Path) -> RunConfig {
    RunConfig::new(root)
        .content_rule("uBlock Origin", "A Block")
        .content_rule("uBlock", "A Block")
        .name_rule("ublock", "ablock")
}

#[test]
fn test_dry_run_reports_without_touching_disk() {
    let dir = TempDir::new().unwrap();
    create_extension_tree(dir.path());

    let report = run(&config(dir.path())).unwrap();

    assert_eq!(report.mode, Mode::Dry);
    assert!(report.entries.iter().all(|e| e.mode == Mode::Dry));
    assert_eq!(report.summary().content_changed, 2);
    assert_eq!(report.summary().renamed, 2);

    let js = fs::read_to_string(dir.path().join("src/js/ublock.js")).unwrap();
    assert!(js.contains("const title = 'uBlock';"));
    assert!(dir.path().join("src/ublock/ublock-icon.png").exists());
}

#[test]
fn test_apply_rewrites_and_renames() {
    let dir = TempDir::new().unwrap();
    create_extension_tree(dir.path());

    let report = run(&config(dir.path()).with_apply(true)).unwrap();
    assert!(report.entries.iter().all(|e| e.mode == Mode::Write));

    let js = fs::read_to_string(dir.path().join("src/js/ablock.js")).unwrap();
    assert_eq!(
        js,
        "// A Block background page\nimport { start } from './start.js';\nconst title = 'A Block';\nconst docs = 'https://example.com/ublock-thing';\n"
    );
    assert!(!dir.path().join("src/js/ublock.js").exists());

    // Carriage returns are dropped from rewritten files.
    let readme = fs::read_to_string(dir.path().join("README.md")).unwrap();
    assert_eq!(readme, "# A Block\n\nA Block is fast.\n");
}

#[test]
fn test_dry_run_and_apply_parity() {
    let dry_dir = TempDir::new().unwrap();
    create_extension_tree(dry_dir.path());
    let apply_dir = TempDir::new().unwrap();
    create_extension_tree(apply_dir.path());

    let mut dry_config = config(dry_dir.path());
    dry_config.capture_diffs = true;
    dry_config.report_skips = true;
    let apply_config = dry_config.clone().with_root(apply_dir.path()).with_apply(true);

    let dry = run(&dry_config).unwrap();
    let applied = run(&apply_config).unwrap();

    // Compare relative to each root, ignoring the mode tag.
    let rel = |report: &ChangeReport| -> Vec<String> {
        report
            .entries
            .iter()
            .map(|e| {
                let mut e = e.clone();
                e.mode = Mode::Dry;
                e.render(&report.root)
                    + &e.reason.unwrap_or_default()
                    + &e.diff.unwrap_or_default()
            })
            .collect()
    };
    assert_eq!(rel(&dry), rel(&applied));
    assert!(!dry.entries.is_empty());
}

#[test]
fn test_same_tree_same_decisions() {
    let dir = TempDir::new().unwrap();
    create_extension_tree(dir.path());

    let dry = run(&config(dir.path())).unwrap();
    let applied = run(&config(dir.path()).with_apply(true)).unwrap();

    assert!(dry.same_decisions(&applied));
}

#[test]
fn test_second_apply_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    create_extension_tree(dir.path());

    let first = run(&config(dir.path()).with_apply(true)).unwrap();
    assert!(!first.is_clean());

    let second = run(&config(dir.path()).with_apply(true)).unwrap();
    assert!(second.is_clean(), "unexpected entries:\n{}", second);
}

#[test]
fn test_protected_line_survives_exactly() {
    let dir = TempDir::new().unwrap();
    let line = "see https://example.com/ublock-thing for uBlock docs";
    fs::write(dir.path().join("links.md"), format!("{}\nuBlock\n", line)).unwrap();

    run(&RunConfig::new(dir.path())
        .content_rule("ublock", "ablock")
        .content_rule("uBlock", "A Block")
        .with_apply(true))
    .unwrap();

    let content = fs::read_to_string(dir.path().join("links.md")).unwrap();
    assert_eq!(content, format!("{}\nA Block\n", line));
}

#[test]
fn test_excluded_directories_never_reported() {
    let dir = TempDir::new().unwrap();
    create_extension_tree(dir.path());

    let mut config = config(dir.path()).with_apply(true);
    config.report_skips = true;
    let report = run(&config).unwrap();

    for entry in &report.entries {
        let rel = entry.path.strip_prefix(dir.path()).unwrap();
        assert!(!rel.starts_with(".git"), "{:?}", entry);
        assert!(!rel.starts_with("node_modules"), "{:?}", entry);
    }
    assert_eq!(
        fs::read_to_string(dir.path().join(".git/objects/ublock")).unwrap(),
        "uBlock"
    );
}

#[test]
fn test_custom_excluded_name() {
    let dir = TempDir::new().unwrap();
    create_extension_tree(dir.path());

    let report = Rebrand::with_config(config(dir.path()))
        .exclude_dir("src")
        .run()
        .unwrap();

    assert!(
        report
            .entries
            .iter()
            .all(|e| !e.path.strip_prefix(dir.path()).unwrap().starts_with("src"))
    );
    assert_eq!(report.summary().content_changed, 1);
}

#[test]
fn test_rename_only_touches_leaf() {
    let dir = TempDir::new().unwrap();
    create_extension_tree(dir.path());

    let report = run(&config(dir.path()).with_apply(true)).unwrap();

    let icon = report
        .of_kind(ChangeKind::Renamed)
        .find(|e| e.path.ends_with("ublock-icon.png"))
        .unwrap();
    assert_eq!(
        icon.new_path.as_deref(),
        Some(dir.path().join("src/ublock/ablock-icon.png").as_path())
    );
    assert!(dir.path().join("src/ublock").is_dir());
    assert!(dir.path().join("src/ublock/ablock-icon.png").exists());
    assert!(!dir.path().join("src/ablock").exists());
}

#[test]
fn test_binary_extension_skips_content_but_still_renames() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ublock.png"), b"uBlock1234").unwrap();

    let report = run(&config(dir.path()).with_apply(true)).unwrap();

    assert_eq!(report.summary().content_changed, 0);
    assert_eq!(report.summary().renamed, 1);
    assert_eq!(
        fs::read(dir.path().join("ablock.png")).unwrap(),
        b"uBlock1234"
    );
}

#[test]
fn test_oversized_file_not_rewritten() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("big.txt"), "uBlock ".repeat(10)).unwrap();
    fs::write(dir.path().join("small.txt"), "uBlock").unwrap();

    let mut config = config(dir.path()).with_apply(true);
    config.max_file_bytes = 16;
    config.report_skips = true;
    let report = run(&config).unwrap();

    let skipped: Vec<_> = report.of_kind(ChangeKind::SkippedRead).collect();
    assert_eq!(skipped.len(), 1);
    assert!(skipped[0].reason.as_deref().unwrap().starts_with("too large"));
    assert_eq!(
        fs::read_to_string(dir.path().join("big.txt")).unwrap(),
        "uBlock ".repeat(10)
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("small.txt")).unwrap(),
        "A Block"
    );
}

#[test]
fn test_content_entry_precedes_rename_entry() {
    let dir = TempDir::new().unwrap();
    create_extension_tree(dir.path());

    let report = run(&config(dir.path()).with_apply(true)).unwrap();
    let js = dir.path().join("src/js/ublock.js");

    let content_at = report
        .entries
        .iter()
        .position(|e| e.kind == ChangeKind::ContentChanged && e.path == js)
        .unwrap();
    let rename_at = report
        .entries
        .iter()
        .position(|e| e.kind == ChangeKind::Renamed && e.path == js)
        .unwrap();
    assert!(content_at < rename_at);
}

#[test]
fn test_ablock_preset_end_to_end() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("sigma-popup.html"),
        "<title>Sigma Block</title>\n<script src=\"js/sigma.js\"></script>\n<p>Powered by uBO</p>\n",
    )
    .unwrap();

    let report = Rebrand::in_dir(dir.path())
        .preset(Preset::ABlock)
        .apply_changes()
        .run()
        .unwrap();

    assert_eq!(report.summary().content_changed, 1);
    assert_eq!(report.summary().renamed, 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("ablock-popup.html")).unwrap(),
        "<title>A Block</title>\n<script src=\"js/sigma.js\"></script>\n<p>Powered by A Block</p>\n"
    );
}

#[test]
fn test_text_report_format() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("img")).unwrap();
    fs::write(dir.path().join("img/ublock.png"), b"x").unwrap();

    let text = run(&config(dir.path())).unwrap().to_string();
    let expected_path = Path::new("img").join("ublock.png");
    let expected_new = Path::new("img").join("ablock.png");

    assert!(text.contains(&format!(
        "[DRY]   rename: {} -> {}",
        expected_path.display(),
        expected_new.display()
    )));
    assert!(text.ends_with("0 content change(s), 1 rename(s), 0 skipped (0 read, 0 rename, 0 write)"));
}
