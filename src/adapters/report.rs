use crate::domain::model::{ReportFormat, ScanReport};
use crate::domain::ports::Storage;
use crate::utils::error::{AuditError, Result};
use std::fmt::Write as _;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const REPORT_JSON: &str = "report.json";
pub const RESULTS_CSV: &str = "results.csv";
pub const ERRORS_CSV: &str = "errors.csv";
pub const REPORT_ARCHIVE: &str = "scan_report.zip";

pub fn report_json(report: &ScanReport) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(report)?)
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer.into_inner().map_err(|e| {
        AuditError::IoError(std::io::Error::new(e.error().kind(), e.error().to_string()))
    })
}

pub fn results_csv(report: &ScanReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "layer_name",
        "layer_type",
        "style",
        "color",
        "token",
        "token_value",
        "availability",
        "distance",
        "note",
    ])?;

    for result in &report.results {
        let token = &result.token_match;
        let distance = token.distance.map(|d| format!("{:.2}", d)).unwrap_or_default();
        writer.write_record([
            result.layer_name.as_str(),
            result.layer_type.as_str(),
            result.style.label(),
            result.color.as_str(),
            token.name.as_str(),
            token.value.as_str(),
            token.availability.as_str(),
            distance.as_str(),
            token.note.as_str(),
        ])?;
    }

    finish_csv(writer)
}

pub fn errors_csv(report: &ScanReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["layer_name", "layer_type", "kind", "error"])?;

    for error in &report.errors {
        let layer = error.layer();
        writer.write_record([
            layer.name.as_str(),
            layer.node_type.as_deref().unwrap_or(""),
            error.kind_label(),
            error.to_string().as_str(),
        ])?;
    }

    finish_csv(writer)
}

/// Writes the requested report formats, either as loose files or bundled
/// into a single zip archive.
pub struct ReportWriter<S: Storage> {
    storage: S,
    formats: Vec<ReportFormat>,
    archive: bool,
}

impl<S: Storage> ReportWriter<S> {
    pub fn new(storage: S, formats: Vec<ReportFormat>, archive: bool) -> Self {
        Self {
            storage,
            formats,
            archive,
        }
    }

    pub fn render(&self, report: &ScanReport) -> Result<Vec<(&'static str, Vec<u8>)>> {
        let mut files = Vec::new();
        for format in &self.formats {
            match format {
                ReportFormat::Json => files.push((REPORT_JSON, report_json(report)?)),
                ReportFormat::Csv => {
                    files.push((RESULTS_CSV, results_csv(report)?));
                    files.push((ERRORS_CSV, errors_csv(report)?));
                }
            }
        }
        Ok(files)
    }

    /// Returns the names of the files written, relative to the storage root.
    pub async fn write(&self, report: &ScanReport) -> Result<Vec<String>> {
        let files = self.render(report)?;

        if self.archive {
            tracing::debug!("Creating ZIP file with {} files", files.len());
            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, data) in &files {
                    zip.start_file::<_, ()>(*name, FileOptions::default())?;
                    zip.write_all(data)?;
                }
                let cursor = zip.finish()?;
                cursor.into_inner()
            };

            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(REPORT_ARCHIVE, &zip_data).await?;
            return Ok(vec![REPORT_ARCHIVE.to_string()]);
        }

        let mut written = Vec::with_capacity(files.len());
        for (name, data) in files {
            self.storage.write_file(name, &data).await?;
            written.push(name.to_string());
        }
        Ok(written)
    }
}

/// Human-readable summary in the same order the plugin panel shows it:
/// stats, errors, then one block per matched color.
pub fn render_summary(report: &ScanReport) -> String {
    let mut out = String::new();
    let stats = &report.stats;

    let _ = writeln!(
        out,
        "Layers: {}  Colors: {}  Errors: {}",
        stats.total_nodes, stats.color_matches, stats.error_count
    );

    if !report.errors.is_empty() {
        let _ = writeln!(out, "\n{} error(s) occurred during scan:", report.errors.len());
        for error in &report.errors {
            let layer = error.layer();
            let _ = writeln!(
                out,
                "  {} ({}): {}",
                layer.name,
                layer.node_type.as_deref().unwrap_or("unknown"),
                error
            );
        }
    }

    if report.results.is_empty() {
        let _ = writeln!(out, "\nNo solid colors found.");
        return out;
    }

    for result in &report.results {
        let token = &result.token_match;
        let _ = writeln!(out, "\n{} [{}]", result.layer_name, result.layer_type);
        let _ = writeln!(
            out,
            "  {}  {} {}",
            result.color,
            token.availability.icon(),
            token.availability
        );
        let _ = writeln!(out, "  Token: {}", token.name);
        let _ = writeln!(out, "  Style: {}", result.style);
        if let Some(distance) = token.distance {
            let _ = writeln!(out, "  Match distance: {:.2}", distance);
        }
        let _ = writeln!(out, "  {}", token.note);
    }

    out
}
