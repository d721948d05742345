use crate::cli::GlobalFlags;
use crate::cli::subcommands::PrereqCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `rst prereq`. A refused edge prints the outcome and exits non-zero.
pub async fn handle(
    action: &PrereqCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        PrereqCommands::Add {
            course,
            prerequisite,
        } => {
            let outcome = ctx.service.add_prerequisite(*course, *prerequisite).await?;
            output(&outcome, flags.format)?;
            if let Some(reason) = outcome.reason {
                anyhow::bail!("prerequisite rejected: {reason}");
            }
            Ok(())
        }
        PrereqCommands::Remove { id } => {
            output(&ctx.service.remove_prerequisite(*id).await?, flags.format)
        }
    }
}
