use clap::Parser;
use icon_bundler::deploy::{self, SendRequest};
use icon_bundler::utils::logger;

#[derive(Parser)]
#[command(name = "send-icon")]
#[command(about = "Optimizes one icon and copies it to the service template slots")]
#[command(after_help = "instance like v25d1, v5d3\n\nFlags:\n  -b - for big icons\n  -s - for small icons\n  -4 - for 404 icons\n  -t - for com.tr icons")]
struct Args {
    /// Icon file to send
    file_name: String,

    /// Service the icon belongs to
    service_name: String,

    /// Development instance, e.g. v25d1
    instance: String,

    /// Dash-prefixed destination flags, e.g. -bs4t
    #[arg(allow_hyphen_values = true)]
    flags: String,

    /// Enable verbose output
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    let request = match SendRequest::new(
        &args.file_name,
        &args.service_name,
        &args.instance,
        &args.flags,
    ) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!("❌ {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    tracing::info!(
        "🚀 Sending {} for service \"{}\" to {}",
        request.file_name,
        request.service_name,
        request.instance.host()
    );

    // 外部工具失敗只記錄，不往外傳
    deploy::run(&request).await;

    Ok(())
}
