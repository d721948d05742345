use crate::cli::GlobalFlags;
use crate::cli::subcommands::DepartmentCommands;
use crate::commands::shared::limit::{effective_limit, truncate_rows};
use crate::context::AppContext;
use crate::output::output;

/// Handle `rst department`.
pub async fn handle(
    action: &DepartmentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = &ctx.service;
    match action {
        DepartmentCommands::Create { name } => {
            output(&service.create_department(name).await?, flags.format)
        }
        DepartmentCommands::List => {
            let mut departments = service.list_departments().await?;
            truncate_rows(
                &mut departments,
                effective_limit(flags.limit, ctx.config.general.default_limit),
            );
            output(&departments, flags.format)
        }
        DepartmentCommands::Get { id } => output(&service.get_department(*id).await?, flags.format),
        DepartmentCommands::Rename { id, name } => {
            output(&service.rename_department(*id, name).await?, flags.format)
        }
        DepartmentCommands::Delete { id } => {
            output(&service.delete_department(*id).await?, flags.format)
        }
    }
}
