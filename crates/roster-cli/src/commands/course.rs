use roster_db::repos::course::NewCourse;
use roster_db::updates::course::CourseUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CourseCommands;
use crate::commands::shared::limit::{effective_limit, truncate_rows};
use crate::context::AppContext;
use crate::output::output;

/// Handle `rst course`.
pub async fn handle(
    action: &CourseCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = &ctx.service;
    match action {
        CourseCommands::Create {
            code,
            name,
            department,
            max_students,
            semester,
        } => {
            let course = service
                .create_course(&NewCourse {
                    course_code: code.clone(),
                    name: name.clone(),
                    department_id: *department,
                    max_students: *max_students,
                    semester: semester.clone(),
                })
                .await?;
            output(&course, flags.format)
        }
        CourseCommands::List { department } => {
            let mut courses = service.list_courses(*department).await?;
            truncate_rows(
                &mut courses,
                effective_limit(flags.limit, ctx.config.general.default_limit),
            );
            output(&courses, flags.format)
        }
        CourseCommands::Get { id } => output(&service.get_course(*id).await?, flags.format),
        CourseCommands::Update {
            id,
            code,
            name,
            department,
            max_students,
            semester,
            clear_semester,
        } => {
            let mut builder = CourseUpdateBuilder::new();
            if let Some(code) = code {
                builder = builder.course_code(code);
            }
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if let Some(department) = department {
                builder = builder.department_id(*department);
            }
            if let Some(max_students) = max_students {
                builder = builder.max_students(*max_students);
            }
            if let Some(semester) = semester {
                builder = builder.semester(Some(semester.clone()));
            } else if *clear_semester {
                builder = builder.semester(None);
            }
            output(
                &service.update_course(*id, &builder.build()).await?,
                flags.format,
            )
        }
        CourseCommands::Delete { id } => output(&service.delete_course(*id).await?, flags.format),
        CourseCommands::Prerequisites { id } => output(
            &service.course_prerequisite_details(*id).await?,
            flags.format,
        ),
        CourseCommands::Students { id } => {
            output(&service.course_roster(*id).await?, flags.format)
        }
    }
}
