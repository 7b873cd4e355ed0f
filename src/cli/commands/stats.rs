use std::fs;
use std::path::PathBuf;

use clap::Subcommand;
use serde::Serialize;
use serde_json::json;

use crate::cli::context::Context;
use crate::cli::utils::{output_success, output_view};
use crate::cli::OutputFormat;
use crate::pages::{StatsPage, StudentDetail};
use crate::render;
use crate::report::format::today;
use crate::report::{export_file_name, ClassTotal, Overview, RankLimit, RankedStudent, RankingOptions};

#[derive(Subcommand)]
pub enum StatsCommands {
    #[command(about = "Totals, classroom chart and most-late ranking")]
    Overview {
        #[arg(long = "class", help = "Limit to one classroom")]
        class_room: Option<String>,
        #[arg(long, help = "Ranking length (defaults to config)")]
        limit: Option<usize>,
        #[arg(long, conflicts_with = "limit", help = "Rank every late student")]
        all: bool,
        #[arg(long, help = "Bypass the local cache")]
        refresh: bool,
    },

    #[command(about = "Write the ranking as CSV")]
    Export {
        #[arg(long = "class")]
        class_room: Option<String>,
        #[arg(long, help = "Output path (defaults to สถิติการมาสาย_<date>.csv)")]
        output: Option<PathBuf>,
    },

    #[command(about = "One student's late history")]
    Student { student_id: i64 },
}

#[derive(Serialize)]
struct OverviewView {
    class_room: Option<String>,
    classrooms: Vec<String>,
    overview: Overview,
    chart: Vec<ClassTotal>,
    ranking: Vec<RankedStudent>,
}

fn render_overview(v: &OverviewView) -> String {
    let mut out = String::new();
    if let Some(class_room) = &v.class_room {
        out.push_str(&format!("ห้อง {}\n", class_room));
    }
    out.push_str(&render::overview(&v.overview));
    out.push('\n');
    out.push_str(&render::chart(&v.chart));
    out.push('\n');
    out.push_str(&render::ranking(&v.ranking));
    out
}

pub async fn handle(cmd: StatsCommands, ctx: &mut Context, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        StatsCommands::Overview {
            class_room,
            limit,
            all,
            refresh,
        } => {
            let api = ctx.authorized_api()?;
            ctx.perf.start("stats");
            let page = StatsPage::load(&mut ctx.cache, &api, class_room.as_deref(), refresh).await?;
            ctx.perf.end("stats");

            let options = RankingOptions {
                threshold: ctx.config.display.ranking_threshold,
                limit: if all {
                    RankLimit::All
                } else {
                    RankLimit::Top(limit.unwrap_or(ctx.config.display.ranking_limit))
                },
            };

            let view = OverviewView {
                class_room: page.class_room.clone(),
                classrooms: page.classrooms.clone(),
                overview: page.overview(),
                chart: page.chart(),
                ranking: page.ranking(&options),
            };
            output_view(&output_format, &view, render_overview)
        }

        StatsCommands::Export { class_room, output } => {
            let api = ctx.authorized_api()?;
            let page = StatsPage::load(&mut ctx.cache, &api, class_room.as_deref(), false).await?;

            let path = output.unwrap_or_else(|| PathBuf::from(export_file_name(today())));
            let csv = page.export_csv();
            let rows = csv.lines().count().saturating_sub(1);
            fs::write(&path, csv)?;
            tracing::info!("Exported {} rows to {}", rows, path.display());

            output_success(
                &output_format,
                &format!("✅ ส่งออก {} รายการไปยัง {}", rows, path.display()),
                Some(json!({ "path": path.display().to_string(), "rows": rows })),
            )
        }

        StatsCommands::Student { student_id } => {
            let api = ctx.authorized_api()?;
            let detail = StudentDetail::load(&api, student_id).await?;
            output_view(&output_format, &detail, render::history)
        }
    }
}
