use clap::Parser;
use swatch_audit::adapters::report::render_summary;
use swatch_audit::config::toml_config::TomlConfig;
use swatch_audit::core::pipeline::load_document;
use swatch_audit::core::{ConfigProvider, PaletteSource};
use swatch_audit::utils::error::ErrorSeverity;
use swatch_audit::utils::{logger, validation::Validate};
use swatch_audit::{AuditRunner, DocumentPipeline, LocalStorage, PaletteProvider};

#[derive(Parser)]
#[command(name = "toml-scan")]
#[command(about = "Color audit driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "swatch-audit.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the selection setting from config
    #[arg(long)]
    selected_only: Option<bool>,

    /// Load the document and palette and report what would be scanned
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based color audit");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Some(selected_only) = args.selected_only {
        config.scan.selected_only = Some(selected_only);
        tracing::info!("🔧 Selected-only overridden to: {}", selected_only);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No report will be written");
        perform_dry_run(&config).await?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let result = match DocumentPipeline::new(storage, config) {
        Ok(pipeline) => AuditRunner::new_with_monitoring(pipeline, monitor_enabled)
            .run()
            .await,
        Err(e) => Err(e),
    };

    match result {
        Ok(summary) => {
            print!("{}", render_summary(&summary.report));
            println!();
            println!("✅ Scan completed successfully!");
            println!("📁 Report saved to: {}", summary.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Scan failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Scan: {}", config.scan.name);
    if let Some(description) = &config.scan.description {
        println!("  Description: {}", description);
    }
    println!("  Document: {}", config.input_path());
    println!("  Palette: {}", config.palette_source());
    println!("  Selected only: {}", config.selected_only());
    println!("  Output: {}", config.output_path());

    let formats: Vec<String> = config.output_formats().iter().map(|f| f.to_string()).collect();
    println!("  Formats: {}", formats.join(", "));

    if config.archive() {
        println!("  Archive: enabled (ZIP)");
    }
    if let Some(level) = config.log_level() {
        println!("  Log level: {}", level);
    }
    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(config: &TomlConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Dry Run Analysis:");
    println!();

    let document = load_document(config.input_path()).await?;
    let targets = document.targets(config.selected_only());
    println!("📄 Document:");
    println!("  Name: {}", document.name.as_deref().unwrap_or("untitled"));
    println!("  Selection: {} layers", document.selection.len());
    println!("  Top-level layers: {}", document.children.len());
    println!("  Would scan: {} layers", targets.len());

    let policy = config.progress_policy();
    if targets.len() > policy.min_total {
        println!("  Progress: reported every {} layers", policy.every);
    }

    println!();
    println!("🎨 Palette:");
    let provider =
        PaletteProvider::from_source(config.palette_source(), config.palette_timeout_secs())?;
    let palette = provider.load().await?;
    println!("  Source: {}", provider.describe());
    println!("  Tokens: {}", palette.len());
    if palette.is_empty() {
        println!("  ⚠️ Palette is empty; the scan would fail");
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
