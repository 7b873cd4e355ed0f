use clap::Subcommand;
use serde_json::json;

use crate::cli::context::Context;
use crate::cli::utils::{output_success, output_view};
use crate::cli::OutputFormat;
use crate::models::NewStudent;
use crate::pages::students::{add_student, get_student};
use crate::pages::StudentsPage;
use crate::render;

#[derive(Subcommand)]
pub enum StudentsCommands {
    #[command(about = "List students from the cached roster")]
    List {
        #[arg(long = "class")]
        class_room: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    #[command(about = "Show one student")]
    Get { student_id: i64 },

    #[command(about = "Add a student to the roster")]
    Add {
        #[arg(long)]
        code: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long = "class")]
        class_room: Option<String>,
        #[arg(long)]
        grade: Option<String>,
    },
}

pub async fn handle(cmd: StudentsCommands, ctx: &mut Context, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        StudentsCommands::List {
            class_room,
            search,
            page,
        } => {
            let api = ctx.authorized_api()?;
            let students = StudentsPage::load(&mut ctx.cache, &api).await?;
            let list = students.list(
                class_room.as_deref(),
                search.as_deref().unwrap_or_default(),
                page,
                ctx.config.display.page_size,
            );
            output_view(&output_format, &list, render::student_list)
        }

        StudentsCommands::Get { student_id } => {
            let api = ctx.authorized_api()?;
            let student = get_student(&api, student_id).await?;
            output_view(&output_format, &student, render::student)
        }

        StudentsCommands::Add {
            code,
            first_name,
            last_name,
            class_room,
            grade,
        } => {
            let api = ctx.authorized_api()?;
            let new = NewStudent {
                student_code: code,
                first_name,
                last_name,
                class_room,
                grade_level: grade,
            };
            add_student(&mut ctx.cache, &api, &new).await?;

            output_success(
                &output_format,
                &format!("✅ เพิ่มนักเรียน {} {} แล้ว", new.first_name, new.last_name),
                Some(json!({ "student_code": new.student_code })),
            )
        }
    }
}
