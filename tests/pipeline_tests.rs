mod common;

use common::fixtures::*;
use common::{GeneratedPdf, TestResult, init_logger, sample_record};
use docket::{
    InMemoryLayoutProvider, InMemoryOutputSink, InMemoryRecordProvider, LayoutId, PipelineBuilder,
    PipelineError, ProviderError, RecordId, SinkError,
};
use serde_json::json;
use std::fs;
use std::io::Cursor;
use std::sync::Arc;
use tempfile::tempdir;

fn in_memory_providers() -> Result<(InMemoryRecordProvider, InMemoryLayoutProvider), ProviderError> {
    let records = InMemoryRecordProvider::new();
    records.add("42", sample_record())?;
    let layouts = InMemoryLayoutProvider::new();
    let layout = single_page(vec![text("t", 20.0, 20.0, "{{title}} / {{customer}}")]);
    layouts.add_json("standard", &layout.to_string())?;
    Ok((records, layouts))
}

#[test]
fn test_export_from_json_directories() -> TestResult {
    init_logger();
    let root = tempdir()?;
    let record_dir = root.path().join("jobcards");
    let layout_dir = root.path().join("layouts");
    fs::create_dir_all(&record_dir)?;
    fs::create_dir_all(&layout_dir)?;
    fs::write(
        record_dir.join("42.json"),
        json!({
            "title": "Conveyor belt",
            "description": "Realign rollers",
            "customData": "{\"customer\": \"Northwind\"}"
        })
        .to_string(),
    )?;
    let layout = pages(vec![
        vec![text("t", 20.0, 20.0, "{{title}} for {{customer}}")],
        vec![table("g", 20.0, 20.0, 1, 1, vec![cell(0, 0, "{{description}}")])],
    ]);
    fs::write(layout_dir.join("standard.json"), layout.to_string())?;

    let export_dir = root.path().join("exports");
    let pipeline = PipelineBuilder::new()
        .with_record_dir(&record_dir)
        .with_layout_dir(&layout_dir)
        .with_export_dir(&export_dir)
        .build()?;

    let outcome = pipeline.export(&RecordId::from("42"), &LayoutId::from("standard"))?;
    assert_eq!(outcome.report.pages, 2);
    assert!(outcome.saved.name.starts_with("jobcard_42_"));
    assert!(outcome.saved.name.ends_with(".pdf"));

    let path = outcome.saved.path.ok_or("filesystem sink should report a path")?;
    assert_eq!(path.parent(), Some(export_dir.as_path()));
    let pdf = GeneratedPdf::from_bytes(fs::read(&path)?)?;
    assert_pdf_page_count!(pdf, 2);
    assert_pdf_contains_text!(pdf, "Conveyor belt for Northwind");
    assert_pdf_contains_text!(pdf, "Realign rollers");
    Ok(())
}

#[test]
fn test_missing_record_is_reported() -> TestResult {
    init_logger();
    let (records, layouts) = in_memory_providers()?;
    let pipeline = PipelineBuilder::new()
        .with_record_provider(records)
        .with_layout_provider(layouts)
        .with_output_sink(InMemoryOutputSink::new())
        .build()?;

    let err = pipeline.export(&"7".into(), &"standard".into()).unwrap_err();
    assert!(matches!(err, PipelineError::Record(ProviderError::NotFound(what)) if what.contains("7")));

    let err = pipeline.render(&"42".into(), &"compact".into()).unwrap_err();
    assert!(matches!(err, PipelineError::Layout(ProviderError::NotFound(_))));
    Ok(())
}

#[test]
fn test_unparsable_layout_file_is_invalid_format() -> TestResult {
    init_logger();
    let root = tempdir()?;
    fs::write(root.path().join("broken.json"), "{ \"pages\": ")?;
    let (records, _) = in_memory_providers()?;
    let pipeline = PipelineBuilder::new()
        .with_record_provider(records)
        .with_layout_dir(root.path())
        .with_output_sink(InMemoryOutputSink::new())
        .build()?;

    let err = pipeline.render(&"42".into(), &"broken".into()).unwrap_err();
    assert!(matches!(err, PipelineError::Layout(ProviderError::InvalidFormat(_))));
    Ok(())
}

#[test]
fn test_sink_failure_is_surfaced() -> TestResult {
    init_logger();
    let root = tempdir()?;
    let blocker = root.path().join("not-a-directory");
    fs::write(&blocker, b"occupied")?;

    let (records, layouts) = in_memory_providers()?;
    let pipeline = PipelineBuilder::new()
        .with_record_provider(records)
        .with_layout_provider(layouts)
        .with_export_dir(blocker.join("exports"))
        .build()?;

    let err = pipeline.export(&"42".into(), &"standard".into()).unwrap_err();
    assert!(matches!(err, PipelineError::Sink(SinkError::Io { .. })));
    Ok(())
}

#[test]
fn test_in_memory_sink_receives_pdf() -> TestResult {
    init_logger();
    let (records, layouts) = in_memory_providers()?;
    let sink = Arc::new(InMemoryOutputSink::new());
    let pipeline = PipelineBuilder::new()
        .with_record_provider(records)
        .with_layout_provider(layouts)
        .with_output_sink(Arc::clone(&sink))
        .build()?;

    pipeline.export(&"42".into(), &"standard".into())?;
    pipeline.export(&"42".into(), &"standard".into())?;
    assert_eq!(sink.len(), 2);

    let pdf = GeneratedPdf::from_bytes(sink.get("jobcard_42").ok_or("nothing saved")?)?;
    assert_pdf_contains_text!(pdf, "Pump service / ACME");
    Ok(())
}

#[test]
fn test_render_to_writer() -> TestResult {
    init_logger();
    let (records, layouts) = in_memory_providers()?;
    let pipeline = PipelineBuilder::new()
        .with_record_provider(records)
        .with_layout_provider(layouts)
        .with_output_sink(InMemoryOutputSink::new())
        .with_pdf_version("1.4")
        .with_producer(None)
        .build()?;

    let (cursor, report) = pipeline.render_to_writer(&"42".into(), &"standard".into(), Cursor::new(Vec::new()))?;
    assert_eq!(report.pages, 1);
    let bytes = cursor.into_inner();
    assert!(bytes.starts_with(b"%PDF-1.4"));
    let pdf = GeneratedPdf::from_bytes(bytes)?;
    assert!(pdf.doc.trailer.get(b"Info").is_err());
    Ok(())
}

#[test]
fn test_settings_file_configures_pipeline() -> TestResult {
    init_logger();
    let root = tempdir()?;
    let settings = root.path().join("settings.json");
    let export_dir = root.path().join("from-settings");
    fs::write(
        &settings,
        json!({ "exportPath": export_dir, "pdfVersion": "1.5" }).to_string(),
    )?;

    let (records, layouts) = in_memory_providers()?;
    let pipeline = PipelineBuilder::new()
        .with_config_file(&settings)?
        .with_record_provider(records)
        .with_layout_provider(layouts)
        .build()?;
    assert_eq!(pipeline.config().export_path, export_dir);
    assert_eq!(pipeline.export_path("card.pdf")?, export_dir.join("card.pdf"));

    let outcome = pipeline.export(&"42".into(), &"standard".into())?;
    let saved = fs::read(outcome.saved.path.ok_or("no path")?)?;
    assert!(saved.starts_with(b"%PDF-1.5"));
    Ok(())
}

#[test]
fn test_missing_settings_file_is_io_error() {
    init_logger();
    let result = PipelineBuilder::new().with_config_file("/definitely/not/here.json");
    assert!(matches!(result, Err(PipelineError::Io(_))));
}
