use anyhow::Result;
use clap::Parser;
use doccer::cli::{run, Cli};
use doccer::load_config::{OUT_DIR_ENV, WORK_DIR_ENV};

#[tokio::main]
async fn main() -> Result<()> {
    // `.env` may carry DOCCER_OUT_DIR / DOCCER_WORK_DIR.
    let dotenv = dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();
    tracing::debug!(
        dotenv = ?dotenv,
        out_dir_override = std::env::var_os(OUT_DIR_ENV).is_some(),
        work_dir_override = std::env::var_os(WORK_DIR_ENV).is_some(),
        "doccer starting"
    );

    let cli = Cli::parse();
    let result = run(cli).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "doccer failed");
    }
    result
}
