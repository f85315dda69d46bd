use httpmock::prelude::*;
use serde_json::json;
use std::io::Read;
use swatch_audit::domain::model::{ReportFormat, ScanEvent};
use swatch_audit::{AuditRunner, CliConfig, DocumentPipeline, LocalStorage};
use tempfile::TempDir;

fn sample_document() -> serde_json::Value {
    json!({
        "name": "Checkout page",
        "selection": [
            {
                "id": "9:1",
                "name": "Badge",
                "type": "RECTANGLE",
                "fills": [{"type": "SOLID", "color": {"r": 0.0784313725, "g": 0.7215686275, "b": 0.6509803922}}]
            }
        ],
        "children": [
            {
                "id": "1:1",
                "name": "Card",
                "type": "FRAME",
                "fills": [
                    {"type": "SOLID", "color": "red"},
                    {"type": "SOLID", "color": {"r": 1.0, "g": 0.2, "b": 0.4}}
                ],
                "children": [
                    {
                        "id": "1:2",
                        "name": "Title",
                        "type": "TEXT",
                        "fills": [{"type": "SOLID", "color": {"r": 0.2156862745, "g": 0.2549019608, "b": 0.3176470588}}]
                    }
                ]
            },
            {
                "id": "2:1",
                "name": "Hidden",
                "type": "RECTANGLE",
                "visible": false,
                "fills": [{"type": "SOLID", "color": {"r": 0.0, "g": 0.0, "b": 0.0}}]
            },
            {
                "id": "3:1",
                "name": "Broken",
                "type": "RECTANGLE",
                "fills": [null],
                "strokes": [{"type": "SOLID", "color": {"r": 0.0627450980, "g": 0.7254901961, "b": 0.5058823529}}]
            }
        ]
    })
}

fn write_document(dir: &TempDir, document: &serde_json::Value) -> String {
    let path = dir.path().join("page.json");
    std::fs::write(&path, serde_json::to_vec(document).unwrap()).unwrap();
    path.to_str().unwrap().to_string()
}

fn cli_config(input: String, output_path: String) -> CliConfig {
    CliConfig {
        input,
        palette: "baseline".to_string(),
        output_path,
        formats: vec![ReportFormat::Json],
        archive: false,
        selected_only: false,
        palette_timeout: 10,
        events: false,
        log_json: false,
        verbose: false,
        monitor: false,
    }
}

#[tokio::test]
async fn test_end_to_end_scan_with_baseline_palette() -> anyhow::Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    let output_path = output_dir.path().to_str().unwrap().to_string();

    let config = cli_config(write_document(&input_dir, &sample_document()), output_path.clone());
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = DocumentPipeline::new(storage, config)?;

    let summary = AuditRunner::new(pipeline).run().await?;

    assert!(summary.output_path.ends_with("report.json"));
    let stats = summary.report.stats;
    assert_eq!(stats.total_nodes, 3);
    assert_eq!(stats.processed_nodes, 3);
    assert_eq!(stats.color_matches, 3);
    assert_eq!(stats.error_count, 1);

    let names: Vec<&str> = summary
        .report
        .results
        .iter()
        .map(|r| r.token_match.name.as_str())
        .collect();
    assert_eq!(names, vec!["primary/500", "neutral/700", "success/500"]);
    assert_eq!(summary.report.results[0].color, "#FF3366");
    assert_eq!(summary.report.results[0].token_match.distance, Some(0.0));

    let error = &summary.report.errors[0];
    assert_eq!(error.layer().name, "Broken");
    assert!(error.to_string().starts_with("Fill processing error"));

    let written: serde_json::Value =
        serde_json::from_slice(&std::fs::read(output_dir.path().join("report.json"))?)?;
    assert_eq!(written["stats"]["colorMatches"], 3);
    assert_eq!(written["results"][0]["layerName"], "Card");
    assert_eq!(written["results"][0]["styleType"], "fill");
    assert_eq!(written["results"][1]["layerType"], "TEXT");
    assert_eq!(written["errors"][0]["nodeName"], "Broken");

    Ok(())
}

#[tokio::test]
async fn test_selection_scan_writes_zip_archive() -> anyhow::Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    let output_path = output_dir.path().to_str().unwrap().to_string();

    let mut config = cli_config(write_document(&input_dir, &sample_document()), output_path.clone());
    config.selected_only = true;
    config.archive = true;
    config.formats = vec![ReportFormat::Json, ReportFormat::Csv];

    let pipeline = DocumentPipeline::new(LocalStorage::new(output_path.clone()), config)?;
    let summary = AuditRunner::new(pipeline).run().await?;

    assert!(summary.output_path.contains("scan_report.zip"));
    assert_eq!(summary.report.stats.total_nodes, 1);
    assert_eq!(summary.report.results[0].token_match.name, "accent/teal");

    let zip_data = std::fs::read(output_dir.path().join("scan_report.zip"))?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    assert_eq!(archive.len(), 3);

    let mut results_csv = String::new();
    archive.by_name("results.csv")?.read_to_string(&mut results_csv)?;
    let mut lines = results_csv.lines();
    assert!(lines.next().unwrap().starts_with("layer_name,layer_type,style,color,token"));
    assert!(lines.next().unwrap().starts_with("Badge,RECTANGLE,fill,#14B8A6,accent/teal"));

    let mut errors_csv = String::new();
    archive.by_name("errors.csv")?.read_to_string(&mut errors_csv)?;
    assert_eq!(errors_csv.lines().count(), 1);

    assert!(archive.by_name("report.json").is_ok());
    Ok(())
}

#[tokio::test]
async fn test_remote_palette_is_fetched_once() -> anyhow::Result<()> {
    let server = MockServer::start();
    let palette_mock = server.mock(|when, then| {
        when.method(GET).path("/tokens.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "tokens": {
                    "brand/ink": {"value": "#111111", "availability": "widely", "note": "Body text"},
                    "brand/pink": {"value": "#FF3366", "availability": "new", "note": "Campaign"}
                }
            }));
    });

    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    let output_path = output_dir.path().to_str().unwrap().to_string();

    let mut config = cli_config(write_document(&input_dir, &sample_document()), output_path.clone());
    config.palette = server.url("/tokens.json");

    let pipeline = DocumentPipeline::new(LocalStorage::new(output_path), config)?;
    let runner = AuditRunner::new(pipeline);

    let first = runner.run().await?;
    let second = runner.run().await?;
    palette_mock.assert_hits(1);

    let card = &first.report.results[0];
    assert_eq!(card.token_match.name, "brand/pink");
    assert_eq!(card.token_match.note, "Campaign");
    assert_eq!(first.report.stats, second.report.stats);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_palette_fails_with_error_event() -> anyhow::Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/tokens.json");
        then.status(503);
    });

    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    let output_path = output_dir.path().to_str().unwrap().to_string();

    let mut config = cli_config(write_document(&input_dir, &sample_document()), output_path.clone());
    config.palette = server.url("/tokens.json");

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let pipeline = DocumentPipeline::new(LocalStorage::new(output_path), config)?;
    let runner = AuditRunner::new(pipeline).with_events(tx);

    let err = runner.run().await.unwrap_err();
    assert!(err.to_string().contains("503"));
    drop(runner);

    assert_eq!(rx.recv().await, Some(ScanEvent::Started));
    match rx.recv().await {
        Some(ScanEvent::Failed { message }) => assert!(message.starts_with("Scan failed:")),
        other => panic!("expected scan-error, got {:?}", other),
    }
    assert_eq!(rx.recv().await, None);
    assert!(!output_dir.path().join("report.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_invalid_document_is_reported_as_document_error() -> anyhow::Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    let path = input_dir.path().join("page.json");
    std::fs::write(&path, b"{\"children\": [")?;

    let config = cli_config(
        path.to_str().unwrap().to_string(),
        output_dir.path().to_str().unwrap().to_string(),
    );
    let pipeline = DocumentPipeline::new(
        LocalStorage::new(output_dir.path().to_str().unwrap().to_string()),
        config,
    )?;

    let err = AuditRunner::new(pipeline).run().await.unwrap_err();
    assert_eq!(
        err.category(),
        swatch_audit::utils::error::ErrorCategory::Document
    );
    Ok(())
}
