use roster_db::repos::student::NewStudent;
use roster_db::updates::student::StudentUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::StudentCommands;
use crate::commands::shared::limit::{effective_limit, truncate_rows};
use crate::context::AppContext;
use crate::output::output;

/// Handle `rst student`.
pub async fn handle(
    action: &StudentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = &ctx.service;
    match action {
        StudentCommands::Create {
            student_id,
            name,
            department,
            registration_number,
            semester,
        } => {
            let student = service
                .create_student(&NewStudent {
                    student_id: student_id.clone(),
                    name: name.clone(),
                    department_id: *department,
                    registration_number: registration_number.clone(),
                    semester: semester.clone(),
                })
                .await?;
            output(&student, flags.format)
        }
        StudentCommands::List { department } => {
            let mut students = service.list_students(*department).await?;
            truncate_rows(
                &mut students,
                effective_limit(flags.limit, ctx.config.general.default_limit),
            );
            output(&students, flags.format)
        }
        StudentCommands::Get { id } => output(&service.student_info(*id).await?, flags.format),
        StudentCommands::Update {
            id,
            student_id,
            name,
            department,
            registration_number,
            semester,
        } => {
            let mut builder = StudentUpdateBuilder::new();
            if let Some(student_id) = student_id {
                builder = builder.student_id(student_id);
            }
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if let Some(department) = department {
                builder = builder.department_id(*department);
            }
            if let Some(registration_number) = registration_number {
                builder = builder.registration_number(registration_number);
            }
            if let Some(semester) = semester {
                builder = builder.semester(semester);
            }
            output(
                &service.update_student(*id, &builder.build()).await?,
                flags.format,
            )
        }
        StudentCommands::Delete { id, force } => {
            output(&service.delete_student(*id, *force).await?, flags.format)
        }
        StudentCommands::Courses { id } => {
            output(&service.student_courses(*id).await?, flags.format)
        }
        StudentCommands::Available { id } => {
            output(&service.available_courses(*id).await?, flags.format)
        }
    }
}
