use clap::Subcommand;
use serde_json::json;

use crate::cli::context::Context;
use crate::cli::utils::{output_success, output_view};
use crate::cli::OutputFormat;
use crate::render;

#[derive(Subcommand)]
pub enum CacheCommands {
    #[command(about = "Show local cache age and contents")]
    Status,

    #[command(about = "Clear the backend cache and refetch")]
    Refresh,

    #[command(about = "Drop the local cache")]
    Clear {
        #[arg(long, help = "Also drop the session and any pending selection")]
        all: bool,
    },
}

pub async fn handle(cmd: CacheCommands, ctx: &mut Context, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        CacheCommands::Status => {
            let status = ctx.cache.status();
            output_view(&output_format, &status, render::cache_status)
        }
        CacheCommands::Refresh => {
            let api = ctx.authorized_api()?;
            let snapshot = ctx.cache.refresh(&api).await?;
            output_success(
                &output_format,
                &format!(
                    "โหลดข้อมูลใหม่แล้ว: นักเรียน {} คน, สรุป {} รายการ",
                    snapshot.students.len(),
                    snapshot.summary.len()
                ),
                Some(json!({
                    "students": snapshot.students.len(),
                    "summary": snapshot.summary.len(),
                    "cached_at": snapshot.cached_at,
                })),
            )
        }
        CacheCommands::Clear { all } => {
            ctx.cache.invalidate();
            if all && !ctx.storage.clear() {
                tracing::warn!("Some stored keys could not be removed");
            }
            output_success(&output_format, "ล้างแคชแล้ว", Some(json!({ "all": all })))
        }
    }
}
