use clap::Parser;
use icon_bundler::core::{ConfigProvider, Pipeline};
use icon_bundler::utils::{logger, validation::Validate};
use icon_bundler::{BundleEngine, IconPipeline, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-bundle")]
#[command(about = "Icon bundling with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "icon-bundle.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show the resolved plan without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based icon bundler");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    // 顯示配置摘要
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config).await?;
        return Ok(());
    }

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 創建存儲和管道
    let source = LocalStorage::new(config.source_path().to_string());
    let output = LocalStorage::new(config.output_path().to_string());
    let output_path = config.output_path().to_string();
    let pipeline = IconPipeline::new(source, output, &config)?;

    // 創建引擎並運行
    let engine = BundleEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(targets) => {
            tracing::info!("✅ Icon bundling completed successfully!");
            println!("✅ Icon bundling completed successfully!");
            for target in &targets {
                println!("📁 {}/{}", output_path, target);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Icon bundling failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                icon_bundler::utils::error::ErrorSeverity::Low => 0,
                icon_bundler::utils::error::ErrorSeverity::Medium => 2,
                icon_bundler::utils::error::ErrorSeverity::High => 1,
                icon_bundler::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Bundle configuration:");
    println!("  Source: {}", config.source_path());
    println!("  Output: {}", config.output_path());
    println!("  Suffix: {}", config.sources_suffix());
    println!("  Types: {}", config.types().join(", "));
    println!("  Target: {}", config.target_template());
    if let Some(groups) = &config.bundle.groups {
        let names: Vec<&str> = groups.keys().map(String::as_str).collect();
        println!("  Groups: {}", names.join(", "));
    }
    if args.dry_run {
        println!("  Mode: dry run");
    }
}

async fn perform_dry_run(config: &TomlConfig) -> Result<(), Box<dyn std::error::Error>> {
    let source = LocalStorage::new(config.source_path().to_string());
    let output = LocalStorage::new(config.output_path().to_string());
    let pipeline = IconPipeline::new(source, output, config)?;

    let pairs = pipeline.collect().await?;
    println!("🔍 Dry run summary:");
    println!("  📦 {} icon pairs found", pairs.len());
    println!("  📄 Targets that would be written:");
    for target in pipeline.plan().all_targets() {
        println!("     {}/{}", config.output_path(), target);
    }

    Ok(())
}
