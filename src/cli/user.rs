//! End-user portal commands

use crate::cli::render::{self, load, run_mutation, show_list};
use crate::cli::{CommandContext, GlobalOptions, UserCommands};
use crate::client::models::{Booking, CreateBookingRequest};
use crate::error::Result;
use crate::models::display::{BookingDisplay, PropertyDisplay};
use crate::models::view;
use crate::query::QueryResult;

/// Run a user subcommand
pub async fn run(opts: &GlobalOptions, command: UserCommands) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let format = ctx.format;

    match command {
        UserCommands::Properties { search } => {
            let search = search.filter(|s| !s.trim().is_empty());
            let mut properties = ctx.user().properties(search.as_deref());
            let result = load(&mut properties, "properties").await;
            show_list::<_, PropertyDisplay>(format, result, || {
                view::browse_placeholder(search.as_deref())
            })
        }

        UserCommands::Bookings { watch } => {
            let mut bookings = ctx.user().bookings();
            let render = |result: QueryResult<Vec<Booking>>| {
                show_list::<_, BookingDisplay>(format, result, view::my_bookings_placeholder)
            };
            if watch.watch {
                render::watch(&ctx, &mut bookings, "bookings", render).await
            } else {
                render(load(&mut bookings, "bookings").await)
            }
        }

        UserCommands::Book {
            property_id,
            at,
            notes,
        } => {
            let request = CreateBookingRequest {
                property_id,
                scheduled_at: at,
                notes,
            };
            let done = format!(
                "Viewing of {} requested for {}",
                request.property_id,
                at.format("%Y-%m-%d %H:%M UTC")
            );
            let mutation = ctx.user().create_booking();
            run_mutation(format, "Booking viewing", done, mutation.mutate(request)).await
        }
    }
}
