use clap::Parser;
use icon_bundler::utils::{logger, validation::Validate};
use icon_bundler::{BundleEngine, CliConfig, IconPipeline, LocalStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting icon-bundler CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
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

    match run_bundle(&config, monitor_enabled).await {
        Ok(targets) => {
            tracing::info!("✅ Icon bundling completed successfully!");
            println!("✅ Icon bundling completed successfully!");
            for target in &targets {
                println!("📁 {}/{}", config.output_path, target);
            }
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Icon bundling failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
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

async fn run_bundle(config: &CliConfig, monitor_enabled: bool) -> icon_bundler::Result<Vec<String>> {
    let source = LocalStorage::new(config.source_path.clone());
    let output = LocalStorage::new(config.output_path.clone());
    let pipeline = IconPipeline::new(source, output, config)?;

    let engine = BundleEngine::new_with_monitoring(pipeline, monitor_enabled);
    engine.run().await
}
