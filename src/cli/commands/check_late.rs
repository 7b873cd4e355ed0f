use clap::Subcommand;
use serde::Serialize;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::api::AttendanceApi;
use crate::cli::context::Context;
use crate::cli::utils::{output_success, output_view};
use crate::cli::OutputFormat;
use crate::error::AppError;
use crate::pages::check_late::{TodayEntry, REASONS};
use crate::pages::{CheckLatePage, Draft, RosterView};
use crate::render;
use crate::report::format::{current_time, today};
use crate::report::Debouncer;
use crate::storage::DRAFT_KEY;

#[derive(Subcommand)]
pub enum CheckLateCommands {
    #[command(about = "Show a classroom roster with today's late marks")]
    Show {
        #[arg(help = "Classroom, e.g. 4/2")]
        class_room: String,
        #[arg(long, help = "Filter by code or name")]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, help = "Show every student on one page")]
        all: bool,
    },

    #[command(about = "Select students to mark late")]
    Select {
        class_room: String,
        #[arg(required = true, help = "Student ids")]
        student_ids: Vec<i64>,
        #[arg(long, help = "Reason (defaults to อื่นๆ)")]
        reason: Option<String>,
    },

    #[command(about = "Remove students from the selection")]
    Unselect {
        class_room: String,
        #[arg(required = true)]
        student_ids: Vec<i64>,
    },

    #[command(about = "Drop the whole selection")]
    Clear { class_room: String },

    #[command(about = "Record every selected student as late")]
    Save {
        class_room: String,
        #[arg(long, help = "Arrival time HH:MM (defaults to now)")]
        time: Option<String>,
    },

    #[command(about = "Delete one of today's late records")]
    Delete { class_room: String, late_id: i64 },

    #[command(about = "Interactive search; one query per line")]
    Search { class_room: String },

    #[command(about = "List the standard reasons")]
    Reasons,
}

#[derive(Serialize)]
struct ShowView {
    class_room: String,
    classrooms: Vec<String>,
    roster: RosterView,
    today: Vec<TodayEntry>,
}

/// Load the page for today and re-apply a stored draft for the same class
async fn open_page(ctx: &mut Context, api: &dyn AttendanceApi, class_room: &str) -> anyhow::Result<CheckLatePage> {
    ctx.perf.start("check-late");
    let mut page = CheckLatePage::new(class_room.trim(), today());
    page.load(api).await?;
    ctx.perf.checkpoint("check-late", "roster and today's records loaded");

    if let Some(draft) = ctx.storage.get::<Draft>(DRAFT_KEY) {
        if draft.class_room == page.class_room && draft.date == page.date {
            let dropped = page.restore(&draft);
            if !dropped.is_empty() {
                tracing::info!("Dropped {} stale selections: {:?}", dropped.len(), dropped);
            }
        }
    }

    ctx.perf.end("check-late");
    Ok(page)
}

/// Persist the selection. An empty selection only removes a draft that
/// belongs to this page's class.
fn store_draft(ctx: &Context, page: &CheckLatePage) {
    if page.selection().is_empty() {
        if ctx
            .storage
            .get::<Draft>(DRAFT_KEY)
            .is_some_and(|d| d.class_room == page.class_room)
        {
            ctx.storage.remove(DRAFT_KEY);
        }
    } else {
        ctx.storage.set(DRAFT_KEY, &page.draft());
    }
}

async fn unselect_students(
    ctx: &mut Context,
    api: &dyn AttendanceApi,
    class_room: &str,
    student_ids: &[i64],
) -> anyhow::Result<CheckLatePage> {
    let mut page = open_page(ctx, api, class_room).await?;
    for id in student_ids {
        page.unselect(*id);
    }
    store_draft(ctx, &page);
    Ok(page)
}

async fn clear_students(ctx: &mut Context, api: &dyn AttendanceApi, class_room: &str) -> anyhow::Result<CheckLatePage> {
    let mut page = open_page(ctx, api, class_room).await?;
    page.clear_selection();
    store_draft(ctx, &page);
    Ok(page)
}

fn page_size(ctx: &Context) -> usize {
    ctx.config.display.page_size
}

pub async fn handle(cmd: CheckLateCommands, ctx: &mut Context, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        CheckLateCommands::Show {
            class_room,
            search,
            page,
            all,
        } => {
            let api = ctx.authorized_api()?;
            let state = open_page(ctx, &api, &class_room).await?;
            let size = if all { state.roster.len().max(1) } else { page_size(ctx) };

            let view = ShowView {
                class_room: state.class_room.clone(),
                classrooms: state.classrooms.clone(),
                roster: state.rows(search.as_deref().unwrap_or_default(), page, size),
                today: state.today_entries(),
            };
            output_view(&output_format, &view, |v| {
                format!("{}\n{}", render::roster(&v.class_room, &v.roster), render::today_entries(&v.today))
            })
        }

        CheckLateCommands::Select {
            class_room,
            student_ids,
            reason,
        } => {
            let api = ctx.authorized_api()?;
            let mut page = open_page(ctx, &api, &class_room).await?;
            for id in &student_ids {
                page.select(*id, reason.clone())?;
            }
            store_draft(ctx, &page);

            output_success(
                &output_format,
                &format!("เลือกแล้ว {} คน", page.selection().len()),
                Some(json!({ "selection": page.selection() })),
            )
        }

        CheckLateCommands::Unselect { class_room, student_ids } => {
            let api = ctx.authorized_api()?;
            let page = unselect_students(ctx, &api, &class_room, &student_ids).await?;

            output_success(
                &output_format,
                &format!("เลือกแล้ว {} คน", page.selection().len()),
                Some(json!({ "selection": page.selection() })),
            )
        }

        CheckLateCommands::Clear { class_room } => {
            let api = ctx.authorized_api()?;
            clear_students(ctx, &api, &class_room).await?;

            output_success(&output_format, "ล้างการเลือกแล้ว", None)
        }

        CheckLateCommands::Save { class_room, time } => {
            let api = ctx.authorized_api()?;
            let mut page = open_page(ctx, &api, &class_room).await?;
            let time = time.unwrap_or_else(current_time);
            tracing::info!("เวลา {} จะถูกใช้สำหรับทุกคนที่เลือก", time);

            let outcome = page.save(&api, &time).await?;
            store_draft(ctx, &page);

            if outcome.is_failure() {
                let detail = outcome
                    .failed
                    .first()
                    .map(|f| f.error.clone())
                    .unwrap_or_default();
                return Err(AppError::api(format!("เกิดข้อผิดพลาดในการบันทึก: {}", detail)).into());
            }

            // Summary counts changed; the next dashboard read must refetch
            ctx.cache.invalidate();
            output_view(&output_format, &outcome, render::save_outcome)
        }

        CheckLateCommands::Delete { class_room, late_id } => {
            let api = ctx.authorized_api()?;
            let mut page = open_page(ctx, &api, &class_room).await?;
            page.delete_record(&api, late_id).await?;
            ctx.cache.invalidate();

            output_success(&output_format, "✅ ลบบันทึกสำเร็จ", Some(json!({ "late_id": late_id })))
        }

        CheckLateCommands::Search { class_room } => {
            let api = ctx.authorized_api()?;
            let page = open_page(ctx, &api, &class_room).await?;
            let size = page_size(ctx);

            let (tx, rx) = mpsc::channel::<String>(32);
            let reader = tokio::spawn(async move {
                let mut lines = BufReader::new(tokio::io::stdin()).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
            });

            eprintln!("พิมพ์คำค้นหา (Ctrl-D เพื่อออก)");
            Debouncer::from_millis(ctx.config.display.search_debounce_ms)
                .run(rx, |query: String| {
                    let view = page.rows(&query, 1, size);
                    if let Err(e) = output_view(&output_format, &view, |v| render::roster(&page.class_room, v)) {
                        tracing::warn!("Could not print results: {}", e);
                    }
                })
                .await;

            reader.await?;
            Ok(())
        }

        CheckLateCommands::Reasons => output_view(&output_format, &REASONS, |reasons| {
            reasons
                .iter()
                .enumerate()
                .map(|(i, r)| format!("{}. {}\n", i + 1, r))
                .collect()
        }),
    }
}
