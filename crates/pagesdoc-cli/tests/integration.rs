//! Integration tests for pagesdoc CLI
//!
//! These tests run the conversion pipeline end to end:
//! source file -> blocks -> .pages bundle on disk -> read back

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use tempfile::TempDir;
use zip::ZipArchive;

use pagesdoc_ast::ErrorKind;
use pagesdoc_bundle::{check_schema, digest_file, verify_file, StyleTable, MEMBER_ORDER};
use pagesdoc_cli::{
    batch_command, convert_command, plan_batch, run_batch, BatchJob, Converter, OutputFormat,
    Settings,
};

fn read_member(bundle: &Path, name: &str) -> String {
    let bytes = fs::read(bundle).expect("Failed to read bundle");
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("Failed to open bundle");
    let mut file = archive.by_name(name).expect("Member should exist");
    let mut content = String::new();
    file.read_to_string(&mut content)
        .expect("Failed to read member");
    content
}

#[test]
fn test_markdown_example_end_to_end() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let input = temp.path().join("example.md");
    fs::write(&input, "# Title\n\nBody text & more").unwrap();

    let outcome = convert_command(&input, None, &Settings::default()).expect("Conversion failed");
    assert_eq!(outcome.output, temp.path().join("example.pages"));
    assert_eq!(outcome.blocks, 2);

    let xml = read_member(&outcome.output, "index.xml");
    assert!(xml.contains("<sf:text>Title</sf:text>"));
    assert!(xml.contains("<sf:text>Body text &amp; more</sf:text>"));

    let parsed = check_schema(xml.as_bytes()).expect("Document XML should be valid");
    assert_eq!(parsed.paragraphs.len(), 2);
    assert_eq!(parsed.style_name(&parsed.paragraphs[0]), Some("Title"));
    assert_eq!(parsed.paragraphs[0].text, "Title");
    assert_eq!(parsed.style_name(&parsed.paragraphs[1]), Some("Body"));
    assert_eq!(parsed.paragraphs[1].text, "Body text & more");
}

#[test]
fn test_bundle_member_layout() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("notes.txt");
    fs::write(&input, "INTRODUCTION\nSome text.\n").unwrap();

    let outcome = convert_command(&input, None, &Settings::default()).unwrap();
    let bytes = fs::read(&outcome.output).unwrap();
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(names, MEMBER_ORDER);
}

#[test]
fn test_determinism_across_outputs() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("doc.md");
    fs::write(
        &input,
        "# Report\n\n## Numbers\n\n- one\n- two\n\nA \"quoted\" <tag> & 'apostrophe'.\n",
    )
    .unwrap();

    let settings = Settings::default();
    let first = convert_command(&input, Some(&temp.path().join("a.pages")), &settings).unwrap();
    let second = convert_command(&input, Some(&temp.path().join("b/c.pages")), &settings).unwrap();

    assert_eq!(first.digest, second.digest);
    assert_eq!(
        fs::read(&first.output).unwrap(),
        fs::read(&second.output).unwrap()
    );
    assert!(verify_file(&second.output, &first.digest.short()).unwrap().is_match());
}

#[test]
fn test_configured_author_changes_output() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("doc.txt");
    fs::write(&input, "Body").unwrap();

    let default_output = temp.path().join("default.pages");
    let default = convert_command(&input, Some(&default_output), &Settings::default()).unwrap();

    let settings = Settings::from_toml_str("[document]\nauthor = \"Docs Team\"\n").unwrap();
    let custom_output = temp.path().join("custom.pages");
    let custom = convert_command(&input, Some(&custom_output), &settings).unwrap();

    assert_ne!(default.digest, custom.digest);
    let xml = read_member(&custom.output, "index.xml");
    assert!(xml.contains("Docs Team"));
}

#[test]
fn test_batch_isolation() {
    let temp = TempDir::new().unwrap();
    let input_dir = temp.path().join("in");
    let output_dir = temp.path().join("out");
    fs::create_dir_all(&input_dir).unwrap();
    fs::create_dir_all(output_dir.join("broken.pages")).unwrap();

    fs::write(input_dir.join("alpha.md"), "# Alpha\n\nText").unwrap();
    fs::write(input_dir.join("beta.txt"), "BETA\nbody").unwrap();
    fs::write(input_dir.join("broken.md"), "# Broken").unwrap();
    fs::write(input_dir.join("gamma.md"), "Plain paragraph").unwrap();

    let report = batch_command(
        &input_dir,
        &output_dir,
        None,
        Some(2),
        OutputFormat::Json,
        &Settings::default(),
    )
    .unwrap();

    assert_eq!(report.outcomes.len(), 4);
    assert_eq!(report.succeeded(), 3);
    assert_eq!(report.failed(), 1);

    let failed: Vec<_> = report
        .outcomes
        .iter()
        .filter(|o| o.result.is_err())
        .collect();
    assert_eq!(failed[0].job.input, input_dir.join("broken.md"));
    assert_eq!(
        failed[0].result.as_ref().unwrap_err().kind(),
        ErrorKind::IoFailure
    );

    for name in ["alpha.pages", "beta.pages", "gamma.pages"] {
        let path = output_dir.join(name);
        assert!(path.is_file(), "{} should exist", name);
        check_schema(read_member(&path, "index.xml").as_bytes()).unwrap();
    }
}

#[test]
fn test_batch_in_place_rerun() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    fs::write(dir.join("notes.md"), "# Notes\n\nFirst line").unwrap();
    fs::write(dir.join("README.txt"), "README\nplain text").unwrap();

    let settings = Settings::default();
    let first = batch_command(dir, dir, None, Some(2), OutputFormat::Json, &settings).unwrap();
    assert!(first.is_success());
    assert_eq!(first.outcomes.len(), 2);

    let second = batch_command(dir, dir, None, Some(2), OutputFormat::Json, &settings).unwrap();
    assert!(second.is_success());
    assert_eq!(second.outcomes.len(), 2);

    for (a, b) in first.outcomes.iter().zip(&second.outcomes) {
        assert_eq!(a.job, b.job);
        assert_eq!(
            a.result.as_ref().unwrap().digest,
            b.result.as_ref().unwrap().digest
        );
    }
    assert!(!dir.join("notes.pages.pages").exists());
}

#[test]
fn test_batch_matches_sequential_conversion() {
    let temp = TempDir::new().unwrap();
    let input_dir = temp.path().join("in");
    fs::create_dir_all(&input_dir).unwrap();
    for i in 0..12 {
        fs::write(
            input_dir.join(format!("doc{:02}.md", i)),
            format!("# Document {}\n\nParagraph {}", i, i),
        )
        .unwrap();
    }

    let styles = StyleTable::pages_default();
    let converter = Converter::new(&styles, Settings::default().document_meta());

    let parallel_jobs = plan_batch(&input_dir, &temp.path().join("parallel"), "*.md").unwrap();
    let parallel = run_batch(&parallel_jobs, &converter);
    assert!(parallel.is_success());

    for outcome in &parallel.outcomes {
        let single = temp
            .path()
            .join("single")
            .join(outcome.job.output.file_name().unwrap());
        let sequential = converter.convert_file(&outcome.job.input, &single).unwrap();
        assert_eq!(outcome.result.as_ref().unwrap().digest, sequential.digest);
        assert_eq!(digest_file(&single).unwrap(), sequential.digest);
    }
}

#[test]
fn test_batch_empty_directory() {
    let temp = TempDir::new().unwrap();
    let jobs: Vec<BatchJob> = plan_batch(temp.path(), &temp.path().join("out"), "*").unwrap();
    assert!(jobs.is_empty());

    let styles = StyleTable::pages_default();
    let converter = Converter::new(&styles, Settings::default().document_meta());
    let report = run_batch(&jobs, &converter);
    assert!(report.is_success());
    assert_eq!(report.outcomes.len(), 0);
}

#[test]
fn test_empty_source_produces_valid_bundle() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("empty.md");
    fs::write(&input, "").unwrap();

    let outcome = convert_command(&input, None, &Settings::default()).unwrap();
    assert_eq!(outcome.blocks, 0);

    let parsed = check_schema(read_member(&outcome.output, "index.xml").as_bytes()).unwrap();
    assert!(parsed.styles.is_empty());
    assert!(parsed.paragraphs.is_empty());
}

#[test]
fn test_directory_input_is_unsupported() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("folder.md");
    fs::create_dir(&dir).unwrap();

    let styles = StyleTable::pages_default();
    let converter = Converter::new(&styles, Settings::default().document_meta());
    let err = converter
        .convert_file(&dir, &temp.path().join("folder.pages"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedInput);
}
