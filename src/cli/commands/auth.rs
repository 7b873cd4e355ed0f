use clap::Subcommand;
use serde_json::json;

use crate::cli::context::Context;
use crate::cli::utils::{output_success, output_view, prompt};
use crate::cli::OutputFormat;
use crate::error::AppError;
use crate::render;
use crate::storage::DRAFT_KEY;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Log in with the staff PIN")]
    Login {
        #[arg(long, help = "PIN (will prompt if not provided)")]
        pin: Option<String>,
    },

    #[command(about = "Log out and drop cached data")]
    Logout,

    #[command(about = "Show current session status")]
    Status,
}

pub async fn handle(cmd: AuthCommands, ctx: &mut Context, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { pin } => {
            let pin = match pin {
                Some(pin) => pin,
                None => prompt("PIN: ")?,
            };

            if !ctx.guard.login(&pin) {
                return Err(AppError::InvalidPin.into());
            }
            output_success(&output_format, "✅ เข้าสู่ระบบสำเร็จ", None)
        }
        AuthCommands::Logout => {
            ctx.guard.logout();
            ctx.cache.invalidate();
            ctx.storage.remove(DRAFT_KEY);
            output_success(&output_format, "ออกจากระบบแล้ว", Some(json!({ "logged_in": false })))
        }
        AuthCommands::Status => {
            let status = ctx.guard.status();
            output_view(&output_format, &status, render::session_status)
        }
    }
}
