//! Single-resource processing: check state, then apply one resource.

use anyhow::Result;

use super::TaskStats;
use super::context::Context;
use crate::error::is_permission_denied;
use crate::resources::{Resource, ResourceChange, ResourceState};

/// Process a single resource, returning a stats delta.
///
/// Failures are logged and counted here; they never stop the caller's loop.
pub(super) fn process_single<R: Resource>(ctx: &Context, resource: &R, verb: &str) -> TaskStats {
    let desc = resource.description();
    check_and_apply(ctx, resource, verb).unwrap_or_else(|e| {
        let msg = format!("failed to {verb} {desc}: {e:#}");
        if is_permission_denied(&e) {
            ctx.log.error(&msg);
        } else {
            ctx.log.warn(&msg);
        }
        TaskStats {
            failed: 1,
            ..TaskStats::default()
        }
    })
}

fn check_and_apply<R: Resource>(ctx: &Context, resource: &R, verb: &str) -> Result<TaskStats> {
    let desc = resource.description();
    let mut delta = TaskStats::new();
    match resource.current_state()? {
        ResourceState::Correct => {
            ctx.log.debug(&format!("ok: {desc}"));
            delta.already_ok += 1;
        }
        ResourceState::Invalid { reason } => {
            ctx.log.warn(&format!("skipping {desc}: {reason}"));
            delta.skipped += 1;
        }
        state @ (ResourceState::Missing | ResourceState::Incorrect { .. }) => {
            if ctx.dry_run {
                let msg = if let ResourceState::Incorrect { ref current } = state {
                    format!("would {verb} {desc} (currently {current})")
                } else {
                    format!("would {verb}: {desc}")
                };
                ctx.log.dry_run(&msg);
                delta.changed += 1;
                return Ok(delta);
            }
            delta += apply_resource(ctx, resource, verb)?;
        }
    }
    Ok(delta)
}

fn apply_resource<R: Resource>(ctx: &Context, resource: &R, verb: &str) -> Result<TaskStats> {
    let desc = resource.description();
    let mut delta = TaskStats::new();
    match resource.apply()? {
        ResourceChange::Applied => {
            ctx.log.info(&format!("{verb}: {desc}"));
            delta.changed += 1;
        }
        ResourceChange::Appended { lines } => {
            ctx.log.info(&format!("appended {lines} new line(s) to {desc}"));
            delta.changed += 1;
        }
        ResourceChange::AlreadyCorrect => delta.already_ok += 1,
        ResourceChange::Skipped { reason } => {
            ctx.log.warn(&format!("skipping {desc}: {reason}"));
            delta.skipped += 1;
        }
    }
    Ok(delta)
}
