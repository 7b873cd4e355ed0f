use clap::Parser;
use latecheck::cli::utils::output_error;
use latecheck::cli::{Cli, OutputFormat};
use latecheck::config::config;
use latecheck::error::AppError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    // A named config file that cannot be used must stop the command, not
    // fall back to preset values
    let config = match config() {
        Ok(config) => config,
        Err(e) => {
            output_error(&output_format, &e)?;
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = latecheck::cli::run(cli, config.clone()).await {
        match e.downcast_ref::<AppError>() {
            Some(AppError::NotAuthenticated) => {
                eprintln!("กรุณาเข้าสู่ระบบ: latecheck auth login");
                std::process::exit(2);
            }
            Some(app_error) => output_error(&output_format, app_error)?,
            None => match std::env::var("LATECHECK_VERBOSE").as_deref() {
                Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
                _ => eprintln!("Error: {e}"),
            },
        }
        std::process::exit(1);
    }

    Ok(())
}
