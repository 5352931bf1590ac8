//! Wires services together and runs one command.

use std::sync::Arc;

use color_eyre::eyre::{Result, bail, eyre};
use tracing::{debug, info, warn};

use super::cli::{
    AdminCommand, AppointmentsCommand, CasesCommand, ClientsCommand, Command, DocumentsCommand,
    LawyersCommand, MessagesCommand, NotificationsCommand, PageArgs,
};
use super::{console, prompt};
use crate::application::api::{
    AdminApi, AppointmentFilters, AppointmentsApi, CaseFilters, CasesApi, ClientFilters,
    ClientsApi, DocumentFilters, DocumentsApi, LawyerFilters, LawyersApi, MessagesApi,
    NotificationFilters, NotificationsApi, PageRequest, UserFilters,
};
use crate::application::dto::{AuthOutcome, LoginCredentials, RegisterRequest};
use crate::application::services::{
    AuthStore, ConfirmStore, DASHBOARD_ROUTE, LOGIN_ROUTE, NavigationDecision, RouteGuard,
    RouteRequirement, ToastStore,
};
use crate::domain::entities::{ConfirmOptions, NewCase, NewClient, NewMessage, SessionState};
use crate::domain::errors::{ApiError, StorageError};
use crate::domain::ports::{ApiPort, TokenStoragePort};
use crate::infrastructure::config::{AppConfig, StorageBackend};
use crate::infrastructure::http::HttpApiClient;
#[cfg(feature = "keyring")]
use crate::infrastructure::storage::KeyringTokenStorage;
use crate::infrastructure::storage::{FileTokenStorage, MemoryTokenStorage};

impl From<PageArgs> for PageRequest {
    fn from(args: PageArgs) -> Self {
        Self {
            page: args.page,
            limit: args.limit,
        }
    }
}

/// Builds the token storage selected in the configuration.
///
/// # Errors
/// Returns error if the file backend has no usable path or the keyring
/// backend was not compiled in.
pub fn token_storage(config: &AppConfig) -> Result<Arc<dyn TokenStoragePort>, StorageError> {
    let storage: Arc<dyn TokenStoragePort> = match config.storage.backend {
        StorageBackend::File => {
            let path = config.effective_token_path().ok_or_else(|| {
                StorageError::AccessFailed("failed to determine data directory".to_string())
            })?;
            Arc::new(FileTokenStorage::new(path))
        }
        #[cfg(feature = "keyring")]
        StorageBackend::Keyring => Arc::new(KeyringTokenStorage::new()),
        #[cfg(not(feature = "keyring"))]
        StorageBackend::Keyring => {
            return Err(StorageError::AccessFailed(
                "keyring support not compiled in".to_string(),
            ));
        }
        StorageBackend::Memory => Arc::new(MemoryTokenStorage::new()),
    };
    Ok(storage)
}

/// The client application.
pub struct App {
    http: Arc<HttpApiClient>,
    auth: AuthStore,
    guard: RouteGuard,
    toasts: ToastStore,
    confirms: ConfirmStore,
    clients: ClientsApi,
    lawyers: LawyersApi,
    cases: CasesApi,
    appointments: AppointmentsApi,
    documents: DocumentsApi,
    messages: MessagesApi,
    notifications: NotificationsApi,
    admin: AdminApi,
    assume_yes: bool,
}

impl App {
    /// Creates the application from configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client or token storage cannot be created.
    pub fn new(config: &AppConfig, assume_yes: bool) -> Result<Self, ApiError> {
        let session = Arc::new(SessionState::new());
        let http = Arc::new(HttpApiClient::new(&config.api, session.clone())?);
        let storage = token_storage(config)?;
        Ok(Self::with_parts(config, http, storage, session, assume_yes))
    }

    fn with_parts(
        config: &AppConfig,
        http: Arc<HttpApiClient>,
        storage: Arc<dyn TokenStoragePort>,
        session: Arc<SessionState>,
        assume_yes: bool,
    ) -> Self {
        let api: Arc<dyn ApiPort> = http.clone();
        Self {
            auth: AuthStore::new(api.clone(), storage, session.clone()),
            guard: RouteGuard::new(session),
            toasts: ToastStore::new(config.toasts.default_duration_ms),
            confirms: ConfirmStore::new(),
            clients: ClientsApi::new(api.clone(), config.soft_fail),
            lawyers: LawyersApi::new(api.clone()),
            cases: CasesApi::new(api.clone()),
            appointments: AppointmentsApi::new(api.clone()),
            documents: DocumentsApi::new(api.clone()),
            messages: MessagesApi::new(api.clone()),
            notifications: NotificationsApi::new(api.clone()),
            admin: AdminApi::new(api),
            http,
            assume_yes,
        }
    }

    /// Restores the session, checks access and runs the command.
    ///
    /// # Errors
    /// Returns error if access is denied or the command fails.
    pub async fn run(&self, command: Command) -> Result<()> {
        let prompter = tokio::spawn(prompt::answer_confirmations(
            self.confirms.clone(),
            tokio::io::stdin(),
            self.assume_yes,
        ));

        let result = self.run_guarded(command).await;

        prompter.abort();
        console::flush_toasts(&self.toasts);
        result
    }

    async fn run_guarded(&self, command: Command) -> Result<()> {
        if self.auth.load_tokens_from_storage().await {
            debug!("Stored session found");
        }

        let requirement = command.requirement();
        if requirement.needs_profile() && self.auth.is_authenticated() && self.auth.user().is_none()
        {
            if let Err(e) = self.auth.fetch_profile().await {
                warn!(error = %e, "Could not load profile for access check");
            }
        }

        match self.guard.check(&requirement) {
            NavigationDecision::Allow => self.dispatch(command).await,
            NavigationDecision::Redirect(LOGIN_ROUTE) => {
                bail!("not signed in, run `lexdesk login <email>` first")
            }
            NavigationDecision::Redirect(DASHBOARD_ROUTE)
                if requirement == RouteRequirement::GuestOnly =>
            {
                let who = self
                    .auth
                    .user()
                    .map_or_else(|| "an existing session".to_string(), |u| u.email);
                self.toasts.info(
                    "Already signed in",
                    Some(format!("Signed in with {who}, run `lexdesk logout` first")),
                );
                Ok(())
            }
            NavigationDecision::Redirect(_) => {
                let role = self
                    .auth
                    .user()
                    .map_or_else(|| "unknown".to_string(), |u| u.role.to_string());
                bail!("this command is not available to the {role} role")
            }
        }
    }

    async fn confirm(&self, options: ConfirmOptions) -> bool {
        let confirmed = self.confirms.confirm(options).await;
        if !confirmed {
            self.toasts.info("Cancelled", None);
        }
        confirmed
    }

    async fn dispatch(&self, command: Command) -> Result<()> {
        match command {
            Command::Login {
                email,
                password,
                code,
            } => {
                let password = match password {
                    Some(password) => password,
                    None => read_secret("Password: ").await?,
                };
                let outcome = self
                    .auth
                    .login(&LoginCredentials::new(email, password))
                    .await;
                let outcome = match (outcome, code) {
                    (
                        AuthOutcome::TwoFactorRequired {
                            user_id: Some(user_id),
                            ..
                        },
                        Some(code),
                    ) => self.auth.verify_two_factor(&user_id, &code).await,
                    (outcome, _) => outcome,
                };
                self.report_auth(outcome)
            }
            Command::Register {
                email,
                first_name,
                last_name,
                phone,
                role,
                password,
            } => {
                let password = match password {
                    Some(password) => password,
                    None => read_secret("Choose a password: ").await?,
                };
                let request = RegisterRequest {
                    email,
                    password,
                    first_name,
                    last_name,
                    phone,
                    role,
                };
                let outcome = self.auth.register(&request).await;
                self.report_auth(outcome)
            }
            Command::VerifyTwoFactor { user_id, code } => {
                let outcome = self.auth.verify_two_factor(&user_id, &code).await;
                self.report_auth(outcome)
            }
            Command::Logout => {
                if !self.auth.is_authenticated() {
                    self.toasts.info("Not signed in", None);
                    return Ok(());
                }
                self.auth.logout().await?;
                self.toasts.success("Signed out", None);
                Ok(())
            }
            Command::Whoami => {
                let user = self.auth.fetch_profile().await?;
                console::print_json(&user)?;
                eprintln!("avatar: {}", self.http.avatar_url(user.avatar.as_deref()));
                Ok(())
            }
            Command::Refresh => {
                self.auth.refresh_tokens().await?;
                self.toasts.success("Session refreshed", None);
                Ok(())
            }
            Command::Clients(command) => self.clients(command).await,
            Command::Lawyers(command) => self.lawyers(command).await,
            Command::Cases(command) => self.cases(command).await,
            Command::Appointments(command) => self.appointments(command).await,
            Command::Documents(command) => self.documents(command).await,
            Command::Messages(command) => self.messages(command).await,
            Command::Notifications(command) => self.notifications(command).await,
            Command::Admin(command) => self.admin(command).await,
        }
    }

    fn report_auth(&self, outcome: AuthOutcome) -> Result<()> {
        match outcome {
            AuthOutcome::Authenticated(user) => {
                info!(user_id = %user.id, "Signed in");
                self.toasts.success(
                    format!("Signed in as {}", user.display_name()),
                    Some(format!("Role: {}", user.role)),
                );
                Ok(())
            }
            AuthOutcome::TwoFactorRequired { user_id, message } => {
                let hint = user_id.map_or_else(
                    || "Run `lexdesk login` again with --code".to_string(),
                    |id| format!("Run `lexdesk verify-2fa {id} <code>`"),
                );
                self.toasts.warning(
                    message.unwrap_or_else(|| "Second factor required".to_string()),
                    Some(hint),
                );
                Ok(())
            }
            AuthOutcome::Failed { message } => Err(eyre!(message)),
        }
    }

    async fn clients(&self, command: ClientsCommand) -> Result<()> {
        match command {
            ClientsCommand::List {
                search,
                active,
                page,
            } => {
                let filters = ClientFilters {
                    search,
                    is_active: active,
                    lawyer_id: None,
                    page: page.into(),
                };
                console::print_page(&self.clients.list(&filters).await?)?;
            }
            ClientsCommand::Show { id } => console::print_json(&self.clients.get(&id).await?)?,
            ClientsCommand::Create {
                first_name,
                last_name,
                email,
                phone,
                company,
            } => {
                let client = self
                    .clients
                    .create(&NewClient {
                        first_name,
                        last_name,
                        email,
                        phone,
                        company,
                        address: None,
                    })
                    .await?;
                self.toasts.success("Client created", Some(client.full_name()));
                console::print_json(&client)?;
            }
            ClientsCommand::Delete { id } => {
                let client = self.clients.get(&id).await?;
                let options = ConfirmOptions::new(
                    "Delete client",
                    format!("Delete {} and all their records?", client.full_name()),
                )
                .with_labels("Delete", "Keep")
                .destructive();
                if self.confirm(options).await {
                    self.clients.delete(&id).await?;
                    self.toasts.success("Client deleted", Some(client.full_name()));
                }
            }
            ClientsCommand::Cases { id } => console::print_page(&self.clients.cases(&id).await?)?,
            ClientsCommand::Appointments { id } => {
                console::print_page(&self.clients.appointments(&id).await?)?;
            }
            ClientsCommand::Documents { id } => {
                console::print_page(&self.clients.documents(&id).await?)?;
            }
        }
        Ok(())
    }

    async fn lawyers(&self, command: LawyersCommand) -> Result<()> {
        match command {
            LawyersCommand::List {
                search,
                specialty,
                city,
                verified,
                page,
            } => {
                let filters = LawyerFilters {
                    search,
                    specialty,
                    city,
                    verified,
                    page: page.into(),
                };
                console::print_page(&self.lawyers.list(&filters).await?)?;
            }
            LawyersCommand::Show { id } => console::print_json(&self.lawyers.get(&id).await?)?,
            LawyersCommand::Availability { id, date } => {
                console::print_json(&self.lawyers.availability(&id, date).await?)?;
            }
        }
        Ok(())
    }

    async fn cases(&self, command: CasesCommand) -> Result<()> {
        match command {
            CasesCommand::List {
                status,
                client_id,
                search,
                page,
            } => {
                let filters = CaseFilters {
                    status,
                    client_id,
                    lawyer_id: None,
                    search,
                    page: page.into(),
                };
                console::print_page(&self.cases.list(&filters).await?)?;
            }
            CasesCommand::Show { id } => console::print_json(&self.cases.get(&id).await?)?,
            CasesCommand::Create {
                title,
                client_id,
                description,
            } => {
                let case = self
                    .cases
                    .create(&NewCase {
                        title,
                        client_id,
                        lawyer_id: None,
                        description,
                        case_type: None,
                    })
                    .await?;
                self.toasts.success("Case opened", Some(case.title.clone()));
                console::print_json(&case)?;
            }
            CasesCommand::Close { id } => {
                let options = ConfirmOptions::new("Close case", format!("Close case {id}?"))
                    .with_labels("Close", "Cancel");
                if self.confirm(options).await {
                    let case = self.cases.close(&id).await?;
                    self.toasts.success("Case closed", Some(case.title));
                }
            }
            CasesCommand::Delete { id } => {
                let options = ConfirmOptions::new("Delete case", format!("Delete case {id}?"))
                    .with_labels("Delete", "Keep")
                    .destructive();
                if self.confirm(options).await {
                    self.cases.delete(&id).await?;
                    self.toasts.success("Case deleted", None);
                }
            }
        }
        Ok(())
    }

    async fn appointments(&self, command: AppointmentsCommand) -> Result<()> {
        match command {
            AppointmentsCommand::List {
                status,
                from,
                to,
                page,
            } => {
                let filters = AppointmentFilters {
                    status,
                    from,
                    to,
                    lawyer_id: None,
                    client_id: None,
                    page: page.into(),
                };
                console::print_page(&self.appointments.list(&filters).await?)?;
            }
            AppointmentsCommand::Show { id } => {
                console::print_json(&self.appointments.get(&id).await?)?;
            }
            AppointmentsCommand::Status { id, status } => {
                let appointment = self.appointments.update_status(&id, status).await?;
                self.toasts
                    .success("Appointment updated", Some(status.as_str().to_string()));
                console::print_json(&appointment)?;
            }
            AppointmentsCommand::Cancel { id, reason } => {
                let options =
                    ConfirmOptions::new("Cancel appointment", format!("Cancel appointment {id}?"))
                        .with_labels("Cancel appointment", "Keep");
                if self.confirm(options).await {
                    self.appointments.cancel(&id, reason.as_deref()).await?;
                    self.toasts.success("Appointment cancelled", None);
                }
            }
        }
        Ok(())
    }

    async fn documents(&self, command: DocumentsCommand) -> Result<()> {
        match command {
            DocumentsCommand::List {
                case_id,
                client_id,
                search,
                page,
            } => {
                let filters = DocumentFilters {
                    case_id,
                    client_id,
                    category: None,
                    search,
                    page: page.into(),
                };
                console::print_page(&self.documents.list(&filters).await?)?;
            }
            DocumentsCommand::Show { id } => {
                console::print_json(&self.documents.get(&id).await?)?;
            }
            DocumentsCommand::Download { id } => {
                let link = self.documents.download_url(&id).await?;
                println!("{}", self.http.resolve_url(&link.url));
            }
            DocumentsCommand::Delete { id } => {
                let document = self.documents.get(&id).await?;
                let options =
                    ConfirmOptions::new("Delete document", format!("Delete {}?", document.title))
                        .with_labels("Delete", "Keep")
                        .destructive();
                if self.confirm(options).await {
                    self.documents.delete(&id).await?;
                    self.toasts.success("Document deleted", Some(document.title));
                }
            }
        }
        Ok(())
    }

    async fn messages(&self, command: MessagesCommand) -> Result<()> {
        match command {
            MessagesCommand::Conversations => {
                console::print_json(&self.messages.conversations().await?)?;
            }
            MessagesCommand::Thread { user_id, page } => {
                console::print_page(&self.messages.thread(&user_id, page.into()).await?)?;
            }
            MessagesCommand::Send {
                to,
                content,
                case_id,
            } => {
                let message = self
                    .messages
                    .send(&NewMessage {
                        recipient_id: to,
                        content,
                        case_id,
                    })
                    .await?;
                self.toasts.success("Message sent", None);
                console::print_json(&message)?;
            }
            MessagesCommand::Read { id } => {
                self.messages.mark_read(&id).await?;
            }
            MessagesCommand::Unread => println!("{}", self.messages.unread_count().await?),
        }
        Ok(())
    }

    async fn notifications(&self, command: NotificationsCommand) -> Result<()> {
        match command {
            NotificationsCommand::List { unread, page } => {
                let filters = NotificationFilters {
                    unread_only: unread,
                    page: page.into(),
                };
                console::print_page(&self.notifications.list(&filters).await?)?;
            }
            NotificationsCommand::Read { id } => self.notifications.mark_read(&id).await?,
            NotificationsCommand::ReadAll => {
                self.notifications.mark_all_read().await?;
                self.toasts.success("All notifications marked as read", None);
            }
            NotificationsCommand::Delete { id } => self.notifications.delete(&id).await?,
            NotificationsCommand::Unread => {
                println!("{}", self.notifications.unread_count().await?);
            }
        }
        Ok(())
    }

    async fn admin(&self, command: AdminCommand) -> Result<()> {
        match command {
            AdminCommand::Stats => console::print_json(&self.admin.stats().await?)?,
            AdminCommand::Users { role, search, page } => {
                let filters = UserFilters {
                    role,
                    is_active: None,
                    search,
                    page: page.into(),
                };
                console::print_page(&self.admin.users(&filters).await?)?;
            }
            AdminCommand::Activate { id } => {
                let user = self.admin.set_user_active(&id, true).await?;
                self.toasts.success("User activated", Some(user.email));
            }
            AdminCommand::Deactivate { id } => {
                let options = ConfirmOptions::new(
                    "Deactivate user",
                    format!("Deactivate user {id}? They will be signed out."),
                )
                .with_labels("Deactivate", "Cancel");
                if self.confirm(options).await {
                    let user = self.admin.set_user_active(&id, false).await?;
                    self.toasts.success("User deactivated", Some(user.email));
                }
            }
            AdminCommand::VerifyLawyer { id } => {
                self.admin.verify_lawyer(&id).await?;
                self.toasts.success("Lawyer verified", None);
            }
            AdminCommand::DeleteUser { id } => {
                let options = ConfirmOptions::new("Delete user", format!("Delete user {id}?"))
                    .with_labels("Delete", "Keep")
                    .destructive();
                if self.confirm(options).await {
                    self.admin.delete_user(&id).await?;
                    self.toasts.success("User deleted", None);
                }
            }
        }
        Ok(())
    }
}

async fn read_secret(label: &str) -> Result<String> {
    use std::io::IsTerminal;
    use tokio::io::{AsyncBufReadExt, BufReader};

    let secret = if std::io::stdin().is_terminal() {
        let label = label.to_string();
        tokio::task::spawn_blocking(move || prompt::read_hidden(&label))
            .await??
            .ok_or_else(|| eyre!("password entry cancelled"))?
    } else {
        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await?;
        line.trim_end_matches(['\r', '\n']).to_string()
    };
    if secret.is_empty() {
        bail!("no password given");
    }
    Ok(secret)
}
