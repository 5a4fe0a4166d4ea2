//! Admin portal commands

use crate::cli::render::{self, confirm, load, run_mutation, show_list, show_record};
use crate::cli::{AdminCommands, CommandContext, GlobalOptions};
use crate::client::models::{AgentFilters, ApprovalRequest, DashboardStats};
use crate::error::Result;
use crate::models::display::{
    AgentDisplay, ApprovalDisplay, UserDisplay, agent_details, stats_rows,
};
use crate::models::{Placeholder, view};
use crate::query::QueryResult;

/// Run an admin subcommand
pub async fn run(opts: &GlobalOptions, command: AdminCommands) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let format = ctx.format;

    match command {
        AdminCommands::Stats { watch } => {
            let mut stats = ctx.admin().dashboard_stats();
            let render = |result: QueryResult<DashboardStats>| {
                show_record(format, result, no_stats, stats_rows)
            };
            if watch.watch {
                render::watch(&ctx, &mut stats, "dashboard stats", render).await
            } else {
                render(load(&mut stats, "dashboard stats").await)
            }
        }

        AdminCommands::Agents {
            search,
            verified,
            active,
        } => {
            let filters = AgentFilters::new()
                .search(search.unwrap_or_default())
                .verified(verified)
                .active(active);
            let mut agents = ctx.admin().agents(&filters);
            let result = load(&mut agents, "agents").await;
            show_list::<_, AgentDisplay>(format, result, || view::agents_placeholder(&filters))
        }

        AdminCommands::Agent { agent_id } => {
            let mut agent = ctx.admin().agent(&agent_id);
            let result = load(&mut agent, "agent").await;
            show_record(
                format,
                result,
                || Placeholder::new("Agent Not Found", format!("No agent with ID {}.", agent_id)),
                agent_details,
            )
        }

        AdminCommands::Verify { agent_id, revoke } => {
            let verified = !revoke;
            let done = if verified {
                format!("Agent {} verified", agent_id)
            } else {
                format!("Verification revoked for agent {}", agent_id)
            };
            let mutation = ctx.admin_mutations().set_agent_verified();
            run_mutation(format, "Updating verification", done, mutation.mutate((agent_id, verified))).await
        }

        AdminCommands::Activate { agent_id } => set_active(&ctx, agent_id, true).await,

        AdminCommands::Deactivate { agent_id } => set_active(&ctx, agent_id, false).await,

        AdminCommands::DeleteAgent { agent_id, yes } => {
            if !confirm(&format!("Permanently delete agent {}?", agent_id), yes)? {
                return Ok(());
            }
            let done = format!("Agent {} deleted", agent_id);
            let mutation = ctx.admin_mutations().delete_agent();
            run_mutation(format, "Deleting agent", done, mutation.mutate(agent_id)).await
        }

        AdminCommands::Users { search } => {
            let search = search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
            let mut users = ctx.admin().users(search.as_deref());
            let result = load(&mut users, "users").await;
            show_list::<_, UserDisplay>(format, result, || {
                view::users_placeholder(search.as_deref())
            })
        }

        AdminCommands::DeleteUser { user_id, yes } => {
            if !confirm(&format!("Permanently delete user {}?", user_id), yes)? {
                return Ok(());
            }
            let done = format!("User {} deleted", user_id);
            let mutation = ctx.admin_mutations().delete_user();
            run_mutation(format, "Deleting user", done, mutation.mutate(user_id)).await
        }

        AdminCommands::Approvals { watch } => {
            let mut approvals = ctx.admin().approval_requests();
            let render = |result: QueryResult<Vec<ApprovalRequest>>| {
                show_list::<_, ApprovalDisplay>(format, result, view::approvals_placeholder)
            };
            if watch.watch {
                render::watch(&ctx, &mut approvals, "approval requests", render).await
            } else {
                render(load(&mut approvals, "approval requests").await)
            }
        }

        AdminCommands::Approve { request_id } => {
            let done = format!("Request {} approved", request_id);
            let mutation = ctx.admin_mutations().approve_agent();
            run_mutation(format, "Approving", done, mutation.mutate(request_id)).await
        }

        AdminCommands::Reject { request_id, reason } => {
            let done = format!("Request {} rejected", request_id);
            let mutation = ctx.admin_mutations().reject_agent();
            run_mutation(format, "Rejecting", done, mutation.mutate((request_id, reason))).await
        }
    }
}

async fn set_active(ctx: &CommandContext, agent_id: String, active: bool) -> Result<()> {
    let done = if active {
        format!("Agent {} activated", agent_id)
    } else {
        format!("Agent {} deactivated", agent_id)
    };
    let mutation = ctx.admin_mutations().set_agent_active();
    run_mutation(ctx.format, "Updating account status", done, mutation.mutate((agent_id, active)))
        .await
}

fn no_stats() -> Placeholder {
    Placeholder::new("No Data", "The dashboard has no counters yet.")
}
