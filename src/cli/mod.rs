//! CLI command definitions and handlers

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

pub mod admin;
pub mod agent;
pub mod args;
pub mod context;
pub mod init;
pub mod render;
pub mod status;
pub mod user;

pub use args::GlobalOptions;
pub use context::CommandContext;

use crate::client::Role;
use crate::client::models::{BookingStatus, PropertyStatus};
use crate::output::OutputFormat;

/// PropTalk CLI - admin, agent and end-user portals from the terminal
#[derive(Parser, Debug)]
#[command(name = "proptalk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json) [default: config preference, then table]
    #[arg(
        long,
        global = true,
        env = "PROPTALK_FORMAT",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: Option<OutputFormat>,

    /// Override config file location
    #[arg(long, global = true, env = "PROPTALK_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Backend base URL
    #[arg(long, global = true, env = "PROPTALK_API_URL", hide_env = true)]
    pub api_url: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "PROPTALK_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize PropTalk configuration
    Init {
        /// Only set up the token for this portal (admin, agent, user)
        #[arg(long)]
        role: Option<Role>,
    },

    /// Show configuration status
    Status,

    /// Display version information
    Version,

    /// Platform administration
    #[command(subcommand)]
    Admin(AdminCommands),

    /// Agent workspace
    #[command(subcommand)]
    Agent(AgentCommands),

    /// Browse properties and book viewings
    #[command(subcommand)]
    User(UserCommands),
}

/// Keep a view open, refreshing as data changes
#[derive(Debug, Clone, Copy, Args, Default)]
pub struct WatchArgs {
    /// Keep polling until interrupted (Enter pauses and resumes)
    #[arg(long, short)]
    pub watch: bool,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Show platform counters
    Stats {
        #[command(flatten)]
        watch: WatchArgs,
    },

    /// List agents
    Agents {
        /// Match name or email
        #[arg(long, short)]
        search: Option<String>,

        /// Only verified (true) or unverified (false) agents
        #[arg(long)]
        verified: Option<bool>,

        /// Only active (true) or deactivated (false) agents
        #[arg(long)]
        active: Option<bool>,
    },

    /// Show one agent
    Agent {
        /// Agent ID
        agent_id: String,
    },

    /// Verify an agent
    Verify {
        /// Agent ID
        agent_id: String,

        /// Revoke verification instead
        #[arg(long)]
        revoke: bool,
    },

    /// Re-activate an agent account
    Activate {
        /// Agent ID
        agent_id: String,
    },

    /// Deactivate an agent account
    Deactivate {
        /// Agent ID
        agent_id: String,
    },

    /// Permanently delete an agent
    DeleteAgent {
        /// Agent ID
        agent_id: String,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// List end users
    Users {
        /// Match name or email
        #[arg(long, short)]
        search: Option<String>,
    },

    /// Permanently delete an end user
    DeleteUser {
        /// User ID
        user_id: String,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// List approval requests
    Approvals {
        #[command(flatten)]
        watch: WatchArgs,
    },

    /// Approve an agent's request
    Approve {
        /// Approval request ID
        request_id: String,
    },

    /// Reject an agent's request
    Reject {
        /// Approval request ID
        request_id: String,

        /// Reason shown to the agent
        #[arg(long)]
        reason: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum AgentCommands {
    /// Show your profile
    Profile,

    /// Update your profile
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        agency: Option<String>,

        #[arg(long)]
        bio: Option<String>,
    },

    /// Show your approval status
    Approval,

    /// Request approval from an admin
    SubmitApproval {
        #[arg(long)]
        license: String,

        #[arg(long)]
        agency: String,

        /// IDs of uploaded documents
        #[arg(long = "document", value_name = "ID")]
        documents: Vec<String>,
    },

    /// Show your assigned phone number
    Phone,

    /// Show your voice agent
    Voice,

    /// Create your voice agent
    CreateVoice {
        #[arg(long)]
        name: String,

        /// Voice preset
        #[arg(long)]
        voice: String,

        #[arg(long)]
        greeting: Option<String>,
    },

    /// List your properties
    Properties,

    /// Add a property listing
    AddProperty(PropertyArgs),

    /// Edit a property listing
    UpdateProperty {
        /// Property ID
        property_id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        price: Option<f64>,

        /// available, pending, sold or rented
        #[arg(long)]
        status: Option<PropertyStatus>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a property listing
    DeleteProperty {
        /// Property ID
        property_id: String,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Show calls handled by your voice agent
    Calls {
        #[command(flatten)]
        watch: WatchArgs,
    },

    /// List viewings booked on your listings
    Bookings {
        #[command(flatten)]
        watch: WatchArgs,
    },

    /// Confirm, cancel or complete a booking
    BookingStatus {
        /// Booking ID
        booking_id: String,

        /// pending, confirmed, cancelled or completed
        status: BookingStatus,
    },
}

#[derive(Debug, Clone, Args)]
pub struct PropertyArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub address: String,

    #[arg(long)]
    pub city: String,

    #[arg(long)]
    pub price: f64,

    #[arg(long, default_value_t = 0)]
    pub bedrooms: u32,

    #[arg(long, default_value_t = 0)]
    pub bathrooms: u32,

    /// house, apartment, land, ...
    #[arg(long = "type", value_name = "TYPE")]
    pub property_type: String,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Browse listed properties
    Properties {
        /// Match title or city
        #[arg(long, short)]
        search: Option<String>,
    },

    /// List your viewing bookings
    Bookings {
        #[command(flatten)]
        watch: WatchArgs,
    },

    /// Book a viewing
    Book {
        /// Property ID
        property_id: String,

        /// Viewing time (RFC 3339, e.g. 2030-05-01T10:00:00Z)
        #[arg(long)]
        at: DateTime<Utc>,

        #[arg(long)]
        notes: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_agent_filters() {
        let cli = Cli::try_parse_from([
            "proptalk", "admin", "agents", "--search", "smith", "--verified", "true",
        ])
        .unwrap();

        match cli.command {
            Commands::Admin(AdminCommands::Agents {
                search,
                verified,
                active,
            }) => {
                assert_eq!(search.as_deref(), Some("smith"));
                assert_eq!(verified, Some(true));
                assert_eq!(active, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_booking_status() {
        let cli = Cli::try_parse_from(["proptalk", "agent", "booking-status", "b1", "confirmed"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Agent(AgentCommands::BookingStatus {
                status: BookingStatus::Confirmed,
                ..
            })
        ));

        assert!(Cli::try_parse_from(["proptalk", "agent", "booking-status", "b1", "lost"]).is_err());
    }

    #[test]
    fn test_parse_booking_time() {
        let cli = Cli::try_parse_from([
            "proptalk", "user", "book", "p1", "--at", "2030-05-01T10:00:00Z", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Commands::User(UserCommands::Book { property_id, at, .. }) => {
                assert_eq!(property_id, "p1");
                assert_eq!(at.to_rfc3339(), "2030-05-01T10:00:00+00:00");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_reject_requires_reason_flag() {
        assert!(Cli::try_parse_from(["proptalk", "admin", "reject", "r1"]).is_err());
    }
}
