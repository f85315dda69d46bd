use clap::Parser;
use swatch_audit::adapters::report::render_summary;
use swatch_audit::core::ConfigProvider;
use swatch_audit::utils::error::{AuditError, ErrorSeverity};
use swatch_audit::utils::{logger, validation::Validate};
use swatch_audit::{AuditRunner, CliConfig, DocumentPipeline, LocalStorage, ScanEvent};
use tokio::sync::mpsc::{self, UnboundedReceiver};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting swatch-audit CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let stream_events = config.events;
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = match DocumentPipeline::new(storage, config) {
        Ok(pipeline) => pipeline,
        Err(e) => exit_with(e),
    };

    let mut runner = AuditRunner::new_with_monitoring(pipeline, monitor_enabled);
    let printer = if stream_events {
        let (tx, rx) = mpsc::unbounded_channel();
        runner = runner.with_events(tx);
        Some(tokio::spawn(print_events(rx)))
    } else {
        None
    };

    let outcome = runner.run().await;
    drop(runner);
    if let Some(printer) = printer {
        printer.await?;
    }

    match outcome {
        Ok(summary) => {
            tracing::info!("✅ Scan completed successfully!");
            tracing::info!("📁 Report saved to: {}", summary.output_path);
            if !stream_events {
                print!("{}", render_summary(&summary.report));
                println!();
                println!("📁 Report saved to: {}", summary.output_path);
            }
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

/// One JSON object per line, in the order the scan produced them.
async fn print_events(mut rx: UnboundedReceiver<ScanEvent>) {
    while let Some(event) = rx.recv().await {
        match serde_json::to_string(&event) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::error!("Could not serialize scan event: {}", e),
        }
    }
}

fn exit_with(e: AuditError) -> ! {
    tracing::error!(
        "❌ Scan failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
