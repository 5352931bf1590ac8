//! Command-line surface.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::application::services::RouteRequirement;
use crate::domain::entities::{AppointmentStatus, CaseStatus, UserRole};
use crate::infrastructure::config::CliArgs;

/// Top-level parser.
#[derive(Debug, Parser)]
#[command(
    name = "lexdesk",
    version,
    about = "Command-line client for a legal practice management backend",
    long_about = None
)]
pub struct Cli {
    /// Options shared by every command.
    #[command(flatten)]
    pub args: CliArgs,

    /// Answer yes to every confirmation.
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Every command the client understands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Sign in with email and password.
    Login {
        /// Account email.
        email: String,
        /// Prompted for without echo when omitted.
        #[arg(long, env = "LEXDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Second-factor code, if the account requires one.
        #[arg(long)]
        code: Option<String>,
    },
    /// Create an account and sign in.
    Register {
        /// Account email.
        email: String,
        /// Given name.
        #[arg(long)]
        first_name: String,
        /// Family name.
        #[arg(long)]
        last_name: String,
        /// Contact phone.
        #[arg(long)]
        phone: Option<String>,
        /// Requested role.
        #[arg(long, default_value = "client")]
        role: UserRole,
        /// Prompted for without echo when omitted.
        #[arg(long, env = "LEXDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Complete a sign-in that asked for a second factor.
    #[command(name = "verify-2fa")]
    VerifyTwoFactor {
        /// Account id printed by `login`.
        user_id: String,
        /// Code from the authenticator or message.
        code: String,
    },
    /// Sign out and forget stored tokens.
    Logout,
    /// Show the signed-in profile.
    Whoami,
    /// Exchange the refresh token for new tokens.
    Refresh,
    /// Client records.
    #[command(subcommand)]
    Clients(ClientsCommand),
    /// Lawyer directory.
    #[command(subcommand)]
    Lawyers(LawyersCommand),
    /// Case files.
    #[command(subcommand)]
    Cases(CasesCommand),
    /// Appointments.
    #[command(subcommand)]
    Appointments(AppointmentsCommand),
    /// Stored documents.
    #[command(subcommand)]
    Documents(DocumentsCommand),
    /// Direct messages.
    #[command(subcommand)]
    Messages(MessagesCommand),
    /// In-app notifications.
    #[command(subcommand)]
    Notifications(NotificationsCommand),
    /// User administration.
    #[command(subcommand)]
    Admin(AdminCommand),
}

/// Page selection flags.
#[derive(Debug, Clone, Copy, Default, clap::Args)]
pub struct PageArgs {
    /// Page number, starting at 1.
    #[arg(long)]
    pub page: Option<u32>,
    /// Items per page.
    #[arg(long)]
    pub limit: Option<u32>,
}

/// `clients` subcommands.
#[derive(Debug, Clone, Subcommand)]
#[allow(missing_docs)]
pub enum ClientsCommand {
    /// List clients.
    List {
        /// Name, email or company fragment.
        #[arg(long)]
        search: Option<String>,
        /// Active or archived clients only.
        #[arg(long)]
        active: Option<bool>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one client.
    Show { id: String },
    /// Add a client.
    Create {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        company: Option<String>,
    },
    /// Delete a client after confirmation.
    Delete { id: String },
    /// Cases of a client.
    Cases { id: String },
    /// Appointments of a client.
    Appointments { id: String },
    /// Documents of a client.
    Documents { id: String },
}

/// `lawyers` subcommands.
#[derive(Debug, Clone, Subcommand)]
#[allow(missing_docs)]
pub enum LawyersCommand {
    /// Search the directory.
    List {
        /// Name fragment.
        #[arg(long)]
        search: Option<String>,
        /// Practice area.
        #[arg(long)]
        specialty: Option<String>,
        /// Office city.
        #[arg(long)]
        city: Option<String>,
        /// Verified lawyers only.
        #[arg(long)]
        verified: Option<bool>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one lawyer.
    Show { id: String },
    /// Slots on a day (YYYY-MM-DD).
    Availability { id: String, date: NaiveDate },
}

/// `cases` subcommands.
#[derive(Debug, Clone, Subcommand)]
#[allow(missing_docs)]
pub enum CasesCommand {
    /// List cases.
    List {
        #[arg(long)]
        status: Option<CaseStatus>,
        #[arg(long)]
        client_id: Option<String>,
        /// Title or reference fragment.
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one case.
    Show { id: String },
    /// Open a case.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        client_id: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Close a case after confirmation.
    Close { id: String },
    /// Delete a case after confirmation.
    Delete { id: String },
}

/// `appointments` subcommands.
#[derive(Debug, Clone, Subcommand)]
#[allow(missing_docs)]
pub enum AppointmentsCommand {
    /// List appointments.
    List {
        #[arg(long)]
        status: Option<AppointmentStatus>,
        /// First day (YYYY-MM-DD).
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day (YYYY-MM-DD).
        #[arg(long)]
        to: Option<NaiveDate>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one appointment.
    Show { id: String },
    /// Set the status of an appointment.
    Status { id: String, status: AppointmentStatus },
    /// Cancel an appointment after confirmation.
    Cancel {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
}

/// `documents` subcommands.
#[derive(Debug, Clone, Subcommand)]
#[allow(missing_docs)]
pub enum DocumentsCommand {
    /// List documents.
    List {
        #[arg(long)]
        case_id: Option<String>,
        #[arg(long)]
        client_id: Option<String>,
        /// Title fragment.
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show document metadata.
    Show { id: String },
    /// Print a temporary download link.
    Download { id: String },
    /// Delete a document after confirmation.
    Delete { id: String },
}

/// `messages` subcommands.
#[derive(Debug, Clone, Subcommand)]
#[allow(missing_docs)]
pub enum MessagesCommand {
    /// Latest exchange with each participant.
    Conversations,
    /// Messages exchanged with one user.
    Thread {
        user_id: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Send a message.
    Send {
        /// Recipient user id.
        to: String,
        content: String,
        /// Case the message relates to.
        #[arg(long)]
        case_id: Option<String>,
    },
    /// Mark a message as read.
    Read { id: String },
    /// Number of unread messages.
    Unread,
}

/// `notifications` subcommands.
#[derive(Debug, Clone, Subcommand)]
#[allow(missing_docs)]
pub enum NotificationsCommand {
    /// List notifications.
    List {
        /// Unread notifications only.
        #[arg(long)]
        unread: bool,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Mark one notification as read.
    Read { id: String },
    /// Mark every notification as read.
    ReadAll,
    /// Delete a notification.
    Delete { id: String },
    /// Number of unread notifications.
    Unread,
}

/// `admin` subcommands.
#[derive(Debug, Clone, Subcommand)]
#[allow(missing_docs)]
pub enum AdminCommand {
    /// Dashboard counters.
    Stats,
    /// List accounts.
    Users {
        #[arg(long)]
        role: Option<UserRole>,
        /// Name or email fragment.
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Reactivate an account.
    Activate { id: String },
    /// Deactivate an account after confirmation.
    Deactivate { id: String },
    /// Mark a lawyer as verified.
    VerifyLawyer { id: String },
    /// Delete an account after confirmation.
    DeleteUser { id: String },
}

impl Command {
    /// Access rule checked before the command runs.
    #[must_use]
    pub fn requirement(&self) -> RouteRequirement {
        match self {
            Self::Login { .. } | Self::Register { .. } | Self::VerifyTwoFactor { .. } => {
                RouteRequirement::GuestOnly
            }
            Self::Logout => RouteRequirement::Public,
            Self::Admin(_) => RouteRequirement::role(UserRole::Admin),
            Self::Clients(_) | Self::Cases(_) => {
                RouteRequirement::Role(vec![UserRole::Admin, UserRole::Lawyer, UserRole::Collaborator])
            }
            Self::Whoami
            | Self::Refresh
            | Self::Lawyers(_)
            | Self::Appointments(_)
            | Self::Documents(_)
            | Self::Messages(_)
            | Self::Notifications(_) => RouteRequirement::Authenticated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("lexdesk").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_login() {
        let cli = parse(&["login", "ana@firm.test", "--password", "pw", "-y"]);

        assert!(cli.yes);
        assert!(matches!(
            cli.command,
            Command::Login { ref email, password: Some(ref password), code: None }
                if email == "ana@firm.test" && password == "pw"
        ));
    }

    #[test]
    fn test_parse_nested_with_enum_filter() {
        let cli = parse(&["cases", "list", "--status", "open", "--page", "2"]);

        match cli.command {
            Command::Cases(CasesCommand::List { status, page, .. }) => {
                assert_eq!(status, Some(CaseStatus::Open));
                assert_eq!(page.page, Some(2));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["whoami", "--api-url", "https://api.firm.test", "--storage", "memory"]);

        assert_eq!(cli.args.api_url.as_deref(), Some("https://api.firm.test"));
    }

    #[test_case(&["login", "a@b.test"] => RouteRequirement::GuestOnly ; "login is guest only")]
    #[test_case(&["logout"] => RouteRequirement::Public ; "logout is public")]
    #[test_case(&["whoami"] => RouteRequirement::Authenticated ; "whoami needs session")]
    #[test_case(&["admin", "stats"] => RouteRequirement::role(UserRole::Admin) ; "admin needs admin")]
    #[test_case(&["notifications", "read-all"] => RouteRequirement::Authenticated ; "notifications need session")]
    fn test_requirement(args: &[&str]) -> RouteRequirement {
        parse(args).command.requirement()
    }
}
