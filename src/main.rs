use clap::Parser;
use fete::LogLevel;
use fete::core::config;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "fete", about = "A birthday greeting for the terminal")]
struct Args {
    /// Who the greeting is for
    #[arg(short, long)]
    recipient: Option<String>,

    /// Start with audio disabled
    #[arg(long)]
    mute: bool,

    /// Verbosity of fete.log
    #[arg(long, default_value_t, value_enum)]
    log_level: LogLevel,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // Initialize file logger - writes to fete.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("fete.log") {
        let _ = WriteLogger::init(args.log_level.into(), log_config, log_file);
    }

    log::info!("fete starting up");

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("{}, using defaults", e);
        config::FeteConfig::default()
    });
    let resolved = config::resolve(&file_config, args.recipient.as_deref(), args.mute);

    fete::tui::run(resolved).await
}
