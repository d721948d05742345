//! `rst complete`, `rst enroll`, and `rst unenroll`.

use roster_core::responses::EnrollOutcome;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::LedgerArgs;
use crate::context::AppContext;
use crate::output::output;

pub async fn complete(
    args: &LedgerArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let completed = ctx
        .service
        .record_completion(args.student, args.course)
        .await?;
    output(&completed, flags.format)
}

pub async fn enroll(args: &LedgerArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let outcome = ctx.service.enroll(args.student, args.course).await?;
    report(&outcome, flags)
}

pub async fn unenroll(
    args: &LedgerArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let outcome = ctx.service.unenroll(args.student, args.course).await?;
    report(&outcome, flags)
}

/// Print the outcome, then fail the process on a denial so scripts can branch
/// on the exit code.
fn report(outcome: &EnrollOutcome, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(outcome, flags.format)?;
    match outcome.reason {
        Some(reason) => anyhow::bail!("{}: {}", reason, outcome.message),
        None => Ok(()),
    }
}
