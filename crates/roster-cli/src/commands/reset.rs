use crate::cli::GlobalFlags;
use crate::cli::subcommands::ResetCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `rst reset`.
pub async fn handle(
    action: &ResetCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let outcome = match action {
        ResetCommands::All => ctx.service.reset_enrollments().await?,
        ResetCommands::Student {
            registration_number,
        } => {
            ctx.service
                .reset_student_enrollments(registration_number)
                .await?
        }
    };
    tracing::info!(removed = outcome.removed, "enrollments reset");
    output(&outcome, flags.format)
}
