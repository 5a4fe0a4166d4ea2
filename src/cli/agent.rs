//! Agent workspace commands

use crate::cli::render::{self, confirm, load, run_mutation, show_list, show_record};
use crate::cli::{AgentCommands, CommandContext, GlobalOptions, PropertyArgs};
use crate::client::models::{
    ApprovalStatus, Booking, CallLog, CreatePropertyRequest, CreateVoiceAgentRequest, PhoneNumber,
    SubmitApprovalRequest, UpdateProfileRequest, UpdatePropertyRequest,
};
use crate::error::Result;
use crate::models::display::{
    BookingDisplay, CallLogDisplay, PropertyDisplay, approval_details, phone_details,
    profile_details, voice_agent_details,
};
use crate::models::{Placeholder, view};
use crate::output::format_placeholder;
use crate::query::QueryResult;

/// Run an agent subcommand
pub async fn run(opts: &GlobalOptions, command: AgentCommands) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let format = ctx.format;

    match command {
        AgentCommands::Profile => {
            let mut profile = ctx.agent().profile();
            let result = load(&mut profile, "profile").await;
            show_record(
                format,
                result,
                || Placeholder::new("No Profile", "Your agent profile could not be found."),
                profile_details,
            )
        }

        AgentCommands::UpdateProfile {
            name,
            phone,
            agency,
            bio,
        } => {
            let request = UpdateProfileRequest {
                full_name: name,
                phone,
                agency_name: agency,
                bio,
            };
            let mutation = ctx.agent_mutations().update_profile();
            run_mutation(format, "Saving profile", "Profile updated".to_string(), mutation.mutate(request))
                .await
        }

        AgentCommands::Approval => {
            let mut status = ctx.agent().approval_status();
            let result = load(&mut status, "approval status").await;
            show_record(format, result, view::approval_status_placeholder, approval_details)
        }

        AgentCommands::SubmitApproval {
            license,
            agency,
            documents,
        } => {
            let request = SubmitApprovalRequest {
                license_number: license,
                agency_name: agency,
                document_ids: documents,
            };
            let mutation = ctx.agent_mutations().submit_approval();
            run_mutation(
                format,
                "Submitting approval request",
                "Approval request submitted; an admin will review it shortly".to_string(),
                mutation.mutate(request),
            )
            .await
        }

        AgentCommands::Phone => phone(&ctx).await,

        AgentCommands::Voice => {
            let mut voice = ctx.agent().voice_agent();
            let result = load(&mut voice, "voice agent").await;
            show_record(format, result, view::voice_agent_placeholder, voice_agent_details)
        }

        AgentCommands::CreateVoice {
            name,
            voice,
            greeting,
        } => {
            let request = CreateVoiceAgentRequest {
                name,
                voice,
                greeting,
            };
            let mutation = ctx.agent_mutations().create_voice_agent();
            run_mutation(
                format,
                "Creating voice agent",
                "Voice agent created".to_string(),
                mutation.mutate(request),
            )
            .await
        }

        AgentCommands::Properties => {
            let mut properties = ctx.agent().properties();
            let result = load(&mut properties, "properties").await;
            show_list::<_, PropertyDisplay>(format, result, view::my_properties_placeholder)
        }

        AgentCommands::AddProperty(args) => {
            let mutation = ctx.agent_mutations().create_property();
            let done = format!("Listing '{}' added", args.title);
            run_mutation(format, "Adding listing", done, mutation.mutate(args.into())).await
        }

        AgentCommands::UpdateProperty {
            property_id,
            title,
            price,
            status,
            description,
        } => {
            let request = UpdatePropertyRequest {
                title,
                price,
                status,
                description,
            };
            let done = format!("Listing {} updated", property_id);
            let mutation = ctx.agent_mutations().update_property();
            run_mutation(format, "Updating listing", done, mutation.mutate((property_id, request)))
                .await
        }

        AgentCommands::DeleteProperty { property_id, yes } => {
            if !confirm(&format!("Delete listing {}?", property_id), yes)? {
                return Ok(());
            }
            let done = format!("Listing {} deleted", property_id);
            let mutation = ctx.agent_mutations().delete_property();
            run_mutation(format, "Deleting listing", done, mutation.mutate(property_id)).await
        }

        AgentCommands::Calls { watch } => {
            let mut calls = ctx.agent().call_logs();
            let render = |result: QueryResult<Vec<CallLog>>| {
                show_list::<_, CallLogDisplay>(format, result, view::call_logs_placeholder)
            };
            if watch.watch {
                render::watch(&ctx, &mut calls, "call logs", render).await
            } else {
                render(load(&mut calls, "call logs").await)
            }
        }

        AgentCommands::Bookings { watch } => {
            let mut bookings = ctx.agent().bookings();
            let render = |result: QueryResult<Vec<Booking>>| {
                show_list::<_, BookingDisplay>(format, result, view::agent_bookings_placeholder)
            };
            if watch.watch {
                render::watch(&ctx, &mut bookings, "bookings", render).await
            } else {
                render(load(&mut bookings, "bookings").await)
            }
        }

        AgentCommands::BookingStatus { booking_id, status } => {
            let done = format!("Booking {} marked {}", booking_id, status);
            let mutation = ctx.agent_mutations().update_booking_status();
            run_mutation(format, "Updating booking", done, mutation.mutate((booking_id, status)))
                .await
        }
    }
}

/// The phone number only exists once approved: mount it disabled and
/// enable it when the approval status says so.
async fn phone(ctx: &CommandContext) -> Result<()> {
    let agent = ctx.agent();
    let mut number = agent.phone_number(false);
    let mut status = agent.approval_status();
    let approved = load(&mut status, "approval status")
        .await
        .data
        .as_ref()
        .is_some_and(ApprovalStatus::is_approved);

    if !approved {
        let output = format_placeholder(
            &view::phone_placeholder(false),
            &Option::<PhoneNumber>::None,
            ctx.format,
        )?;
        println!("{}", output);
        return Ok(());
    }

    number.set_enabled(true);
    let result = load(&mut number, "phone number").await;
    show_record(ctx.format, result, || view::phone_placeholder(true), phone_details)
}

impl From<PropertyArgs> for CreatePropertyRequest {
    fn from(args: PropertyArgs) -> Self {
        Self {
            title: args.title,
            address: args.address,
            city: args.city,
            price: args.price,
            bedrooms: args.bedrooms,
            bathrooms: args.bathrooms,
            property_type: args.property_type,
            description: args.description,
        }
    }
}
