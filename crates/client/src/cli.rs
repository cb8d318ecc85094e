//! Command line interface over the events client.

use std::future::Future;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};

use campus_events_client::actions::RegistrationController;
use campus_events_client::api::{ApiClient, EventQuery};
use campus_events_client::config::Config;
use campus_events_client::error::ClientError;
use campus_events_client::session::Session;
use domain::models::event::{CreateEventRequest, EventListResponse, UpdateEventRequest};
use domain::models::notification::{NotificationQuery, DEFAULT_NOTIFICATION_LIMIT};
use domain::models::user::{LoginRequest, SignUpRequest, UpdateProfileRequest};
use domain::models::{Event, EventId, MyEventsResponse, Scheduled, User};
use domain::services::{
    event_status, registration_control, split_by_time, DashboardStats, EventFilter,
    RegistrationAction, RegistrationControl, RegistrationState,
};
use shared::pagination::{PageRequest, MAX_PAGE_SIZE};
use shared::text::truncate_text;
use shared::time::parse_timestamp;

#[derive(Debug, Parser)]
#[command(name = "campus-events", version, about = "Browse and register for campus events")]
pub struct Cli {
    /// Session token; overrides `session.token` from configuration
    #[arg(long, global = true, env = "CE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List events
    Events(ListArgs),
    /// Show one event
    Show { id: EventId },
    /// Featured events from the landing page
    Featured,
    /// Register for an event
    Register { id: EventId },
    /// Cancel a registration
    Unregister { id: EventId },
    /// Events you organize or registered for
    MyEvents,
    /// Headline counters over all listed events
    Dashboard,
    #[command(subcommand)]
    Notifications(NotificationCommand),
    Categories,
    Departments,
    /// Log in and print the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    SignUp(SignUpArgs),
    /// Show your profile
    Profile,
    /// Change username, department or year
    UpdateProfile(UpdateProfileArgs),
    /// Create an event (organizers and admins)
    Create(CreateArgs),
    /// Change fields of an event you manage
    Update(UpdateArgs),
    /// Delete an event you manage
    Delete { id: EventId },
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Matches title, description or venue
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    /// Include events that already started
    #[arg(long)]
    pub all: bool,
    #[arg(long)]
    pub featured: bool,
    /// Only events created by this user id
    #[arg(long)]
    pub organizer: Option<i64>,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Page size; defaults to `listing.page_size`
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Debug, Subcommand)]
pub enum NotificationCommand {
    /// List recent notifications
    List {
        #[arg(long)]
        unread: bool,
        #[arg(long, default_value_t = DEFAULT_NOTIFICATION_LIMIT)]
        limit: u32,
    },
    /// Mark one notification as read
    Read { id: i64 },
    /// Mark every notification as read
    ReadAll,
}

#[derive(Debug, Args)]
pub struct SignUpArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "CE_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long)]
    pub department: String,
    #[arg(long)]
    pub year: String,
    #[arg(long)]
    pub organizer: bool,
}

#[derive(Debug, Args)]
pub struct UpdateProfileArgs {
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub year: Option<String>,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub category: String,
    #[arg(long)]
    pub department: String,
    #[arg(long)]
    pub venue: String,
    /// Start, e.g. 2025-06-01T10:00
    #[arg(long, value_parser = parse_when)]
    pub start: DateTime<Utc>,
    #[arg(long, value_parser = parse_when)]
    pub end: DateTime<Utc>,
    #[arg(long, value_parser = parse_when)]
    pub deadline: Option<DateTime<Utc>>,
    /// Capacity; omit for unlimited
    #[arg(long)]
    pub max_participants: Option<u32>,
    #[arg(long)]
    pub image_url: Option<String>,
    #[arg(long)]
    pub contact_email: String,
    #[arg(long)]
    pub contact_phone: Option<String>,
    #[arg(long)]
    pub featured: bool,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub id: EventId,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub venue: Option<String>,
    #[arg(long, value_parser = parse_when)]
    pub start: Option<DateTime<Utc>>,
    #[arg(long, value_parser = parse_when)]
    pub end: Option<DateTime<Utc>>,
    #[arg(long, value_parser = parse_when, conflicts_with = "clear_deadline")]
    pub deadline: Option<DateTime<Utc>>,
    /// Remove the registration deadline
    #[arg(long)]
    pub clear_deadline: bool,
    #[arg(long)]
    pub max_participants: Option<u32>,
    #[arg(long)]
    pub image_url: Option<String>,
    #[arg(long)]
    pub contact_email: Option<String>,
    #[arg(long)]
    pub contact_phone: Option<String>,
    #[arg(long)]
    pub featured: Option<bool>,
}

fn parse_when(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(raw).map_err(|e| e.to_string())
}

impl From<CreateArgs> for CreateEventRequest {
    fn from(args: CreateArgs) -> Self {
        Self {
            title: args.title,
            description: args.description,
            category: args.category,
            department: args.department,
            venue: args.venue,
            date_time: args.start,
            end_time: args.end,
            registration_deadline: args.deadline,
            max_participants: args.max_participants,
            image_url: args.image_url,
            contact_email: args.contact_email,
            contact_phone: args.contact_phone,
            is_featured: args.featured,
        }
    }
}

impl From<UpdateArgs> for UpdateEventRequest {
    fn from(args: UpdateArgs) -> Self {
        let registration_deadline = if args.clear_deadline {
            Some(None)
        } else {
            args.deadline.map(Some)
        };

        Self {
            title: args.title,
            description: args.description,
            category: args.category,
            department: args.department,
            venue: args.venue,
            date_time: args.start,
            end_time: args.end,
            registration_deadline,
            max_participants: args.max_participants,
            image_url: args.image_url,
            contact_email: args.contact_email,
            contact_phone: args.contact_phone,
            is_featured: args.featured,
        }
    }
}

struct Context {
    api: ApiClient,
    session: Option<Session>,
    page_size: u32,
}

impl Context {
    fn session(&self) -> Result<&Session, ClientError> {
        self.session.as_ref().ok_or(ClientError::MissingSession)
    }

    /// The logged-in user, looked up via the profile when only a token is known.
    async fn viewer(&self) -> Option<User> {
        let session = self.session.as_ref()?;
        if let Some(user) = session.user() {
            return Some(user.clone());
        }
        match self.api.profile(session).await {
            Ok(profile) => Some(profile.user),
            Err(err) => {
                warn!(error = %err, "Could not resolve the logged-in user");
                None
            }
        }
    }

    async fn my_events_or_default(&self) -> MyEventsResponse {
        let Some(session) = self.session.as_ref() else {
            return MyEventsResponse::default();
        };
        match self.api.my_events(session).await {
            Ok(mine) => mine,
            Err(err) => {
                warn!(error = %err, "Could not load registrations");
                MyEventsResponse::default()
            }
        }
    }
}

pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let api = ApiClient::new(&config.api)?;
    let token = cli
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .or(config.session_token());
    let ctx = Context {
        api,
        session: token.map(Session::new),
        page_size: config.listing.page_size,
    };
    let now = Utc::now();
    debug!(command = ?cli.command, authenticated = ctx.session.is_some(), "Running command");

    match cli.command {
        Command::Events(args) => list_events(&ctx, args, now).await,
        Command::Show { id } => show_event(&ctx, id, now).await,
        Command::Featured => {
            let events = ctx.api.featured_events().await?;
            if events.is_empty() {
                println!("No featured events.");
            }
            for event in events {
                println!(
                    "#{:<5} {}  {}  @ {}",
                    event.id,
                    format_when(event.starts_at()),
                    event.title,
                    event.venue
                );
                println!("       {}", event.description);
            }
            Ok(())
        }
        Command::Register { id } => change_registration(&ctx, id, RegistrationAction::Register, now).await,
        Command::Unregister { id } => {
            change_registration(&ctx, id, RegistrationAction::Unregister, now).await
        }
        Command::MyEvents => my_events(&ctx, now).await,
        Command::Dashboard => dashboard(&ctx, now).await,
        Command::Notifications(command) => notifications(&ctx, command).await,
        Command::Categories => {
            for category in ctx.api.categories().await? {
                println!("{}", category);
            }
            Ok(())
        }
        Command::Departments => {
            for department in ctx.api.departments().await? {
                println!("{}", department);
            }
            Ok(())
        }
        Command::Login { email, password } => {
            let session = ctx.api.login(&LoginRequest { email, password }).await?;
            print_session(&session);
            Ok(())
        }
        Command::SignUp(args) => {
            let session = ctx
                .api
                .sign_up(&SignUpRequest {
                    username: args.username,
                    email: args.email,
                    password: args.password,
                    department: args.department,
                    year: args.year,
                    is_organizer: args.organizer,
                })
                .await?;
            print_session(&session);
            Ok(())
        }
        Command::Profile => {
            let profile = ctx.api.profile(ctx.session()?).await?;
            let user = &profile.user;
            println!("{} <{}>", user.username, user.email);
            println!("Department: {} (year {})", user.department, user.year);
            println!("Role:       {}", role_label(user));
            if let Some(joined) = profile.created_at {
                println!("Joined:     {}", joined.format("%Y-%m-%d"));
            }
            let stats = profile.statistics;
            println!(
                "Created {} / registered {} / attended {}",
                stats.events_created, stats.events_registered, stats.events_attended
            );
            Ok(())
        }
        Command::UpdateProfile(args) => {
            let changes = UpdateProfileRequest {
                username: args.username,
                department: args.department,
                year: args.year,
            };
            let response = ctx.api.update_profile(ctx.session()?, &changes).await?;
            println!("{}", response.message);
            Ok(())
        }
        Command::Create(args) => {
            let request = CreateEventRequest::from(args);
            let response = ctx.api.create_event(ctx.session()?, &request).await?;
            println!("{} (#{})", response.message, response.event.id);
            Ok(())
        }
        Command::Update(args) => {
            let id = args.id;
            let changes = UpdateEventRequest::from(args);
            let response = ctx.api.update_event(ctx.session()?, id, &changes).await?;
            println!("{}", response.message);
            Ok(())
        }
        Command::Delete { id } => {
            let response = ctx.api.delete_event(ctx.session()?, id).await?;
            println!("{}", response.message);
            Ok(())
        }
    }
}

async fn list_events(ctx: &Context, args: ListArgs, now: DateTime<Utc>) -> Result<()> {
    let page = PageRequest::new(args.page, args.limit.unwrap_or(ctx.page_size))?;
    let query = EventQuery {
        filter: EventFilter {
            search: args.search,
            category: args.category,
            department: args.department,
            upcoming_only: !args.all,
        },
        featured_only: args.featured,
        organizer: args.organizer,
        page,
    };

    let listing = ctx.api.list_events(ctx.session.as_ref(), &query).await?;
    let viewer = ctx.viewer().await;
    let mine = ctx.my_events_or_default().await;

    if listing.events.is_empty() {
        println!("No events found.");
        return Ok(());
    }
    for event in &listing.events {
        let registered = mine.is_registered_for(event.id);
        println!("{}", event_row(event, viewer.as_ref(), registered, now));
    }

    let meta = listing.pagination;
    println!(
        "Page {} of {} ({} events){}",
        meta.page,
        meta.pages.max(1),
        meta.total,
        if meta.has_next() {
            format!(", next: --page {}", page.next().page())
        } else {
            String::new()
        }
    );
    Ok(())
}

async fn show_event(ctx: &Context, id: EventId, now: DateTime<Utc>) -> Result<()> {
    let event = ctx.api.get_event(ctx.session.as_ref(), id).await?;
    let viewer = ctx.viewer().await;
    let registered = event.is_registered.unwrap_or(false);

    println!("{} [{}]", event.title, event_status(&event, now).label());
    println!("{} | {}", event.category, event.department);
    println!(
        "When:      {} - {}",
        format_when(event.date_time),
        format_when(event.end_time)
    );
    if let Some(deadline) = event.registration_deadline {
        println!("Register by {}", format_when(deadline));
    }
    println!("Where:     {}", event.venue);
    println!("Organizer: {}", event.organizer_label());
    if let Some(email) = event.contact_email.as_deref().or(event.organizer_email.as_deref()) {
        println!("Contact:   {}", email);
    }
    if let Some(phone) = &event.contact_phone {
        println!("Phone:     {}", phone);
    }
    println!("Participants: {}", event.participants_label());
    println!();
    println!("{}", event.description);
    println!();
    println!(
        "{}",
        describe_control(&registration_control(
            &event,
            viewer.as_ref(),
            registered,
            false,
            now
        ))
    );
    Ok(())
}

async fn change_registration(
    ctx: &Context,
    id: EventId,
    action: RegistrationAction,
    now: DateTime<Utc>,
) -> Result<()> {
    let session = ctx.session()?;
    let event = ctx.api.get_event(Some(session), id).await?;
    let mut state = RegistrationState::from_event(&event);
    let controller = RegistrationController::new(ctx.api.clone());

    let outcome = controller
        .run(&mut state, session, &event, action, now)
        .await
        .with_context(|| format!("Could not {} for event #{}", action, id))?;

    println!("{}", outcome.message);
    match &outcome.event {
        Some(fresh) => println!("{}: {} participants", fresh.title, fresh.participants_label()),
        None => println!("(event details could not be refreshed)"),
    }
    Ok(())
}

async fn my_events(ctx: &Context, now: DateTime<Utc>) -> Result<()> {
    let mine = ctx.api.my_events(ctx.session()?).await?;

    let (upcoming, past) = split_by_time(&mine.registered_events, now);
    println!("Registered: {} upcoming, {} past", upcoming.len(), past.len());
    for event in upcoming.iter().chain(past.iter()) {
        println!(
            "  #{:<5} {}  {}{}",
            event.id,
            format_when(event.date_time),
            event.title,
            if event.attended { "  (attended)" } else { "" }
        );
    }

    if !mine.created_events.is_empty() {
        let (upcoming, past) = split_by_time(&mine.created_events, now);
        println!("Organizing: {} upcoming, {} past", upcoming.len(), past.len());
        for event in upcoming.iter().chain(past.iter()) {
            let capacity = match event.max_participants {
                Some(max) => format!("{} / {}", event.current_participants, max),
                None => format!("{} / ∞", event.current_participants),
            };
            println!(
                "  #{:<5} {}  {}  {}",
                event.id,
                format_when(event.date_time),
                event.title,
                capacity
            );
        }
    }
    Ok(())
}

async fn dashboard(ctx: &Context, now: DateTime<Utc>) -> Result<()> {
    let query = EventQuery::new(
        EventFilter {
            upcoming_only: false,
            ..Default::default()
        },
        PageRequest::new(1, MAX_PAGE_SIZE)?,
    );
    let events = collect_pages(query, |query| async move {
        ctx.api.list_events(ctx.session.as_ref(), &query).await
    })
    .await?;

    let stats = DashboardStats::compute(&events, now);
    println!("Total events:        {}", stats.total_events);
    println!("Active events:       {}", stats.active_events);
    println!("Total registrations: {}", stats.total_registrations);
    Ok(())
}

/// Walks listing pages from `query` onwards.
///
/// Stops at the page count reported by the first response or at the first
/// empty page, whichever comes first.
async fn collect_pages<F, Fut>(
    mut query: EventQuery,
    mut fetch: F,
) -> Result<Vec<Event>, ClientError>
where
    F: FnMut(EventQuery) -> Fut,
    Fut: Future<Output = Result<EventListResponse, ClientError>>,
{
    let mut events: Vec<Event> = Vec::new();
    let mut last_page: Option<u32> = None;
    loop {
        let listing = fetch(query.clone()).await?;
        let last = *last_page.get_or_insert(listing.pagination.pages);
        if listing.events.is_empty() {
            break;
        }
        events.extend(listing.events);
        let current = query.page.page();
        if current >= last || current == u32::MAX {
            break;
        }
        query.page = query.page.next();
    }
    Ok(events)
}

async fn notifications(ctx: &Context, command: NotificationCommand) -> Result<()> {
    let session = ctx.session()?;
    match command {
        NotificationCommand::List { unread, limit } => {
            let query = NotificationQuery {
                unread_only: unread,
                limit,
            };
            let list = ctx.api.notifications(session, &query).await?;
            println!("{} unread", list.unread_count);
            for n in list.notifications {
                println!(
                    "{} #{:<5} {}{}  {}",
                    n.notification_type.icon(),
                    n.id,
                    if n.is_read { "" } else { "* " },
                    n.title,
                    format_when(n.created_at)
                );
                println!("         {}", n.message);
            }
        }
        NotificationCommand::Read { id } => {
            println!("{}", ctx.api.mark_notification_read(session, id).await?.message);
        }
        NotificationCommand::ReadAll => {
            println!("{}", ctx.api.mark_all_notifications_read(session).await?.message);
        }
    }
    Ok(())
}

fn print_session(session: &Session) {
    if let Some(user) = session.user() {
        println!("Logged in as {} ({})", user.username, role_label(user));
    }
    println!("export CE__SESSION__TOKEN={}", session.token());
}

fn role_label(user: &User) -> &'static str {
    if user.is_admin {
        "admin"
    } else if user.is_organizer {
        "organizer"
    } else {
        "student"
    }
}

fn format_when(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// Text for the registration area of an event.
pub fn describe_control(control: &RegistrationControl) -> String {
    match control {
        RegistrationControl::OwnerActions => "[Edit] [Delete]".to_string(),
        RegistrationControl::Button(button) if button.requires_login && button.enabled => {
            format!("[{}] (sign up or log in first)", button.label)
        }
        RegistrationControl::Button(button) if button.enabled => format!("[{}]", button.label),
        RegistrationControl::Button(button) => button.label.to_string(),
    }
}

/// One line of the events listing.
pub fn event_row(event: &Event, viewer: Option<&User>, registered: bool, now: DateTime<Utc>) -> String {
    let control = registration_control(event, viewer, registered, false, now);
    format!(
        "#{:<5} {:<40} {}  {:<19} {:>9}  {}",
        event.id,
        truncate_text(&event.title, 37),
        format_when(event.date_time),
        event_status(event, now).label(),
        event.participants_label(),
        describe_control(&control)
    )
}
