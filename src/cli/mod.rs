pub mod commands;
pub mod context;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use context::Context;

#[derive(Parser)]
#[command(name = "latecheck")]
#[command(about = "ระบบเช็คนักเรียนมาสาย - record and review student tardiness")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "PIN login and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Classroom cards with student and late counts")]
    Dashboard {
        #[arg(long, help = "Clear caches and refetch")]
        refresh: bool,
    },

    #[command(about = "Mark students late for today")]
    CheckLate {
        #[command(subcommand)]
        cmd: commands::check_late::CheckLateCommands,
    },

    #[command(about = "Late statistics, ranking and export")]
    Stats {
        #[command(subcommand)]
        cmd: commands::stats::StatsCommands,
    },

    #[command(about = "Student roster")]
    Students {
        #[command(subcommand)]
        cmd: commands::students::StudentsCommands,
    },

    #[command(about = "Local cache inspection and refresh")]
    Cache {
        #[command(subcommand)]
        cmd: commands::cache::CacheCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let mut ctx = Context::new(config)?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &mut ctx, output_format).await,
        Commands::Dashboard { refresh } => commands::dashboard::handle(refresh, &mut ctx, output_format).await,
        Commands::CheckLate { cmd } => commands::check_late::handle(cmd, &mut ctx, output_format).await,
        Commands::Stats { cmd } => commands::stats::handle(cmd, &mut ctx, output_format).await,
        Commands::Students { cmd } => commands::students::handle(cmd, &mut ctx, output_format).await,
        Commands::Cache { cmd } => commands::cache::handle(cmd, &mut ctx, output_format).await,
    }
}
