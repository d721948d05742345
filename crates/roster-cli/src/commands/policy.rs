use crate::cli::GlobalFlags;
use crate::cli::subcommands::PolicyCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `rst policy`.
pub async fn handle(
    action: &PolicyCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = &ctx.service;
    let policy = match action {
        PolicyCommands::Show => service.get_policy().await?,
        PolicyCommands::Open => service.set_registration_open(true).await?,
        PolicyCommands::Close => service.set_registration_open(false).await?,
        PolicyCommands::Limit { max_courses } => {
            service.set_max_courses_limit(*max_courses).await?
        }
    };
    output(&policy, flags.format)
}
