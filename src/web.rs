use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{cookie::Key, middleware, web, App, HttpResponse, HttpServer, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::config::Settings;
use crate::display::Theme;
use crate::error::SchedulerError;
use crate::export::reservations_to_csv;
use crate::notify::{LogNotifier, Notification, NotificationQueue};
use crate::schedule::{format_long_date, parse_date_key, Event, Reservation, Scheduler, Slot};

const DARK_MODE_KEY: &str = "dark_mode";

/// The single scheduler instance behind the web front end. Pending
/// notifications are queued until the page next fetches the state.
pub struct AppState {
    pub scheduler: Mutex<Scheduler>,
    pub notifications: NotificationQueue,
}

impl AppState {
    pub fn new(mut scheduler: Scheduler) -> Self {
        let notifications = NotificationQueue::new();
        scheduler.subscribe(notifications.clone());
        Self {
            scheduler: Mutex::new(scheduler),
            notifications,
        }
    }
}

#[derive(Deserialize)]
pub struct DateRequest {
    date: String,
}

#[derive(Deserialize)]
pub struct SlotRequest {
    slot: String,
}

#[derive(Serialize)]
pub struct StateResponse {
    today: NaiveDate,
    selected_date: NaiveDate,
    available_slots: Vec<Slot>,
    reserved: Vec<Reservation>,
    dark_mode: bool,
    toggle_label: &'static str,
    notifications: Vec<NotificationView>,
}

#[derive(Serialize)]
pub struct NotificationView {
    #[serde(flatten)]
    notification: Notification,
    message: String,
}

fn lock_scheduler(state: &AppState) -> Result<MutexGuard<'_, Scheduler>> {
    state
        .scheduler
        .lock()
        .map_err(|_| actix_web::error::ErrorInternalServerError("scheduler state poisoned"))
}

fn session_theme(session: &Session) -> Result<Theme> {
    let dark_mode = session.get::<bool>(DARK_MODE_KEY)?.unwrap_or(false);
    Ok(Theme::from_dark_mode(dark_mode))
}

fn state_response(scheduler: &Scheduler, state: &AppState, theme: Theme) -> StateResponse {
    let notifications = state
        .notifications
        .drain()
        .into_iter()
        .map(|notification| NotificationView {
            message: notification.message(),
            notification,
        })
        .collect();

    StateResponse {
        today: scheduler.today(),
        selected_date: scheduler.selected_date(),
        available_slots: scheduler.available_slots().to_vec(),
        reserved: scheduler.reservations(),
        dark_mode: theme.is_dark(),
        toggle_label: theme.toggle_label(),
        notifications,
    }
}

fn failure(mut builder: actix_web::HttpResponseBuilder, message: String) -> HttpResponse {
    builder.json(serde_json::json!({"success": false, "error": message}))
}

fn error_response(err: &SchedulerError) -> HttpResponse {
    let builder = match err {
        SchedulerError::PastDate { .. } => HttpResponse::UnprocessableEntity(),
        SchedulerError::AlreadyBooked { .. } => HttpResponse::Conflict(),
        SchedulerError::NotReserved { .. } => HttpResponse::NotFound(),
        SchedulerError::Store(_) => HttpResponse::InternalServerError(),
        SchedulerError::OutsideSchedule { .. }
        | SchedulerError::InvalidSlot(_)
        | SchedulerError::InvalidDate(_)
        | SchedulerError::InvalidSchedule(_) => HttpResponse::BadRequest(),
    };
    failure(builder, err.to_string())
}

// Current state endpoint
async fn get_state(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    let theme = session_theme(&session)?;
    let scheduler = lock_scheduler(&state)?;
    Ok(HttpResponse::Ok().json(state_response(&scheduler, &state, theme)))
}

// Date picker endpoint; past dates are disabled in the picker
async fn select_date(
    req: web::Json<DateRequest>,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse> {
    let date = match parse_date_key(&req.date) {
        Ok(date) => date,
        Err(e) => return Ok(error_response(&e)),
    };
    let theme = session_theme(&session)?;
    let mut scheduler = lock_scheduler(&state)?;

    if date < scheduler.today() {
        return Ok(failure(
            HttpResponse::BadRequest(),
            format!("{} is in the past", format_long_date(date)),
        ));
    }

    // Selecting a date cannot fail
    let _ = scheduler.apply(Event::SelectDate(date));
    Ok(HttpResponse::Ok().json(state_response(&scheduler, &state, theme)))
}

fn slot_event(
    req: &SlotRequest,
    state: &AppState,
    session: &Session,
    event: fn(Slot) -> Event,
) -> Result<HttpResponse> {
    let slot: Slot = match req.slot.parse() {
        Ok(slot) => slot,
        Err(e) => return Ok(error_response(&e)),
    };
    let theme = session_theme(session)?;
    let mut scheduler = lock_scheduler(state)?;

    match scheduler.apply(event(slot)) {
        Ok(()) => Ok(HttpResponse::Ok().json(state_response(&scheduler, state, theme))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn book_slot(
    req: web::Json<SlotRequest>,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse> {
    slot_event(&req, &state, &session, Event::BookSlot)
}

async fn cancel_slot(
    req: web::Json<SlotRequest>,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse> {
    slot_event(&req, &state, &session, Event::CancelSlot)
}

// Light/dark toggle, kept in the browser session only
async fn toggle_theme(session: Session) -> Result<HttpResponse> {
    let theme = session_theme(&session)?.toggled();
    session.insert(DARK_MODE_KEY, theme.is_dark())?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "dark_mode": theme.is_dark(),
        "toggle_label": theme.toggle_label(),
    })))
}

// CSV download of every reservation
async fn export_reservations(state: web::Data<AppState>) -> Result<HttpResponse> {
    let reservations = lock_scheduler(&state)?.reservations();
    let csv = reservations_to_csv(&reservations).map_err(|e| {
        actix_web::error::ErrorInternalServerError(format!("Failed to export reservations: {}", e))
    })?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header(("Content-Disposition", "attachment; filename=\"reservations.csv\""))
        .body(csv))
}

// HTML page handler
async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

/// Registers the page and API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/api/state", web::get().to(get_state))
        .route("/api/date", web::post().to(select_date))
        .route("/api/book", web::post().to(book_slot))
        .route("/api/cancel", web::post().to(cancel_slot))
        .route("/api/theme", web::post().to(toggle_theme))
        .route("/api/reservations.csv", web::get().to(export_reservations));
}

pub fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("scheduler_session".to_string())
        .cookie_secure(false)
        .build()
}

pub async fn start_server(settings: &Settings, mut scheduler: Scheduler) -> std::io::Result<()> {
    scheduler.subscribe(LogNotifier);
    let app_state = web::Data::new(AppState::new(scheduler));
    let session_key = Key::generate();

    info!(bind = %settings.bind_addr, port = settings.port, "starting web server");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(session_middleware(session_key.clone()))
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", "static"))
            .configure(configure)
    })
    .bind((settings.bind_addr.as_str(), settings.port))?
    .run()
    .await
}
