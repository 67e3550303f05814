//! Integration tests for reading and classifying source files

use std::fs;

use pagesdoc_ast::{ErrorKind, Role};
use pagesdoc_core::{classify, load_blocks, SourceFormat};
use tempfile::TempDir;

#[test]
fn test_load_markdown_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("sample.md");
    fs::write(
        &path,
        "# Sample Document\n\n## Overview\n\nSome *emphasis* here.\n\n- first\n- second\n",
    )
    .unwrap();

    let blocks = load_blocks(&path).expect("Failed to load blocks");
    let got: Vec<(Role, &str)> = blocks.iter().map(|b| (b.role(), b.text())).collect();
    assert_eq!(
        got,
        vec![
            (Role::Title, "Sample Document"),
            (Role::Heading, "Overview"),
            (Role::Body, "Some emphasis here."),
            (Role::Body, "• first"),
            (Role::Body, "• second"),
        ]
    );
}

#[test]
fn test_load_text_file_uses_caps_heuristic() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "CHAPTER ONE\nIt was a dark night.\n# literal hash\n").unwrap();

    let blocks = load_blocks(&path).unwrap();
    let roles: Vec<Role> = blocks.iter().map(|b| b.role()).collect();
    assert_eq!(roles, vec![Role::Heading, Role::Body, Role::Body]);
}

#[test]
fn test_latin1_file_is_decoded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.txt");
    fs::write(&path, b"Caf\xe9 cr\xe8me\n").unwrap();

    let blocks = load_blocks(&path).unwrap();
    assert_eq!(blocks[0].text(), "Café crème");
}

#[test]
fn test_unknown_extension_is_plain_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.rst");
    fs::write(&path, "# Heading?\n").unwrap();

    let blocks = load_blocks(&path).unwrap();
    assert_eq!(blocks[0].role(), Role::Body);
}

#[test]
fn test_directory_is_unsupported() {
    let dir = TempDir::new().unwrap();
    let err = load_blocks(dir.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedInput);
}

#[test]
fn test_classify_preserves_order() {
    let src: String = (0..50).map(|i| format!("line {}\n", i)).collect();
    let blocks = classify(&src, SourceFormat::Markdown).unwrap();
    assert_eq!(blocks.len(), 50);
    for (i, block) in blocks.iter().enumerate() {
        assert_eq!(block.text(), format!("line {}", i));
    }
}
