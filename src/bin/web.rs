//! Single binary web server: JSON API over the result-launch forms and the friendly form.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Backend: SUPABASE_URL and SUPABASE_API_KEY (read from the environment or `.env`).

use actix_web::{
    get, post, put,
    http::StatusCode,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use fossa_results::logic::export_history_csv;
use fossa_results::{
    friendly_winner_options, submit_friendly, Counter, Draft, FormMessage, FriendlyDraft,
    FriendlySubmitError, MatchDataService, MatchJoins, MatchResult, MatchView, RefereePool,
    ResultForm, ServiceError, Settings, Side, Step, SubmitError, SubmitGate,
    SupabaseService,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

type FormId = Uuid;
type SharedForm = Arc<Mutex<ResultForm<SupabaseService>>>;

/// Per-session entry: the form, its submit gate, and last activity time (for auto-cleanup).
struct FormEntry {
    form: SharedForm,
    gate: SubmitGate,
    last_activity: Instant,
}

/// In-memory state: one launch form per browser session. Entries are removed after inactivity.
type AppState = Data<RwLock<HashMap<FormId, FormEntry>>>;

/// Shared backend handle and page settings.
struct Backend {
    service: Arc<SupabaseService>,
    referee_pool: RefereePool,
    recent_limit: usize,
}

/// Inactivity threshold: forms not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Everything the page needs to render one form.
#[derive(Serialize)]
struct FormView<'a> {
    id: FormId,
    filter_text: &'a str,
    dropdown_open: bool,
    matches: Vec<&'a MatchView>,
    placeholder: Option<&'static str>,
    selected: Option<&'a MatchView>,
    selected_label: Option<String>,
    referee_candidates: Vec<String>,
    winner_candidates: Vec<String>,
    draft: &'a Draft,
    recent_results: &'a [MatchResult],
    message: Option<&'a FormMessage>,
    submitting: bool,
}

fn form_view<'a>(id: FormId, form: &'a ResultForm<SupabaseService>) -> FormView<'a> {
    let selector = form.selector();
    FormView {
        id,
        filter_text: selector.filter_text(),
        dropdown_open: selector.is_dropdown_open(),
        matches: form.filtered_matches().collect(),
        placeholder: selector.placeholder(),
        selected: form.selected_match(),
        selected_label: form.selected_match().map(MatchView::display_label),
        referee_candidates: form.referee_candidates(),
        winner_candidates: form.winner_candidates(),
        draft: form.draft(),
        recent_results: form.recent_results(),
        message: form.message(),
        submitting: form.submit_gate().is_busy(),
    }
}

#[derive(Deserialize)]
struct FilterBody {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct SelectBody {
    match_id: i64,
}

#[derive(Deserialize)]
struct RefereeBody {
    referee: Option<String>,
}

#[derive(Deserialize)]
struct WinnerBody {
    winner: Option<String>,
}

#[derive(Deserialize)]
struct AdjustBody {
    counter: Counter,
    side: Side,
    step: Step,
}

/// Typed counter input; `value` is whatever the input field held (number, string, or null).
#[derive(Deserialize)]
struct CounterValueBody {
    counter: Counter,
    side: Side,
    #[serde(default)]
    value: serde_json::Value,
}

/// Path segment: form id (e.g. /api/forms/{id})
#[derive(Deserialize)]
struct FormPath {
    id: FormId,
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No form" }))
}

/// Look up a form and refresh its last activity.
fn touch(state: &AppState, id: FormId) -> Result<(SharedForm, SubmitGate), HttpResponse> {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return Err(HttpResponse::InternalServerError().body("lock error")),
    };
    match g.get_mut(&id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            Ok((entry.form.clone(), entry.gate.clone()))
        }
        None => Err(not_found()),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "fossa-results",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Clubs ordered by name (for the friendly form's selects).
#[get("/api/clubs")]
async fn api_list_clubs(backend: Data<Backend>) -> HttpResponse {
    match backend.service.list_clubs().await {
        Ok(clubs) => HttpResponse::Ok().json(clubs),
        Err(e) => {
            log::error!("Failed to load clubs: {}", e);
            HttpResponse::Ok().json(Vec::<fossa_results::Club>::new())
        }
    }
}

/// Open a new launch form: loads matches and recent results.
#[post("/api/forms")]
async fn api_create_form(state: AppState, backend: Data<Backend>) -> HttpResponse {
    let mut form = ResultForm::new(backend.service.clone(), backend.referee_pool.clone())
        .with_recent_limit(backend.recent_limit);
    form.init().await;
    let id = Uuid::new_v4();
    let gate = form.submit_gate();
    let response = HttpResponse::Ok().json(form_view(id, &form));
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.insert(
        id,
        FormEntry {
            form: Arc::new(Mutex::new(form)),
            gate,
            last_activity: Instant::now(),
        },
    );
    response
}

#[get("/api/forms/{id}")]
async fn api_get_form(state: AppState, path: Path<FormPath>) -> HttpResponse {
    let (form, _) = match touch(&state, path.id) {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    let form = form.lock().await;
    HttpResponse::Ok().json(form_view(path.id, &form))
}

/// Update the search text (opens the dropdown).
#[put("/api/forms/{id}/filter")]
async fn api_set_filter(state: AppState, path: Path<FormPath>, body: Json<FilterBody>) -> HttpResponse {
    let (form, _) = match touch(&state, path.id) {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    let mut form = form.lock().await;
    form.set_filter_text(body.into_inner().text);
    HttpResponse::Ok().json(form_view(path.id, &form))
}

#[post("/api/forms/{id}/dropdown/open")]
async fn api_open_dropdown(state: AppState, path: Path<FormPath>) -> HttpResponse {
    let (form, _) = match touch(&state, path.id) {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    let mut form = form.lock().await;
    form.open_dropdown();
    HttpResponse::Ok().json(form_view(path.id, &form))
}

/// Click outside the selector.
#[post("/api/forms/{id}/dropdown/dismiss")]
async fn api_dismiss_dropdown(state: AppState, path: Path<FormPath>) -> HttpResponse {
    let (form, _) = match touch(&state, path.id) {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    let mut form = form.lock().await;
    form.dismiss_dropdown();
    HttpResponse::Ok().json(form_view(path.id, &form))
}

#[post("/api/forms/{id}/select")]
async fn api_select_match(state: AppState, path: Path<FormPath>, body: Json<SelectBody>) -> HttpResponse {
    let (form, _) = match touch(&state, path.id) {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    let mut form = form.lock().await;
    if let Err(e) = form.select(body.match_id) {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }));
    }
    HttpResponse::Ok().json(form_view(path.id, &form))
}

#[put("/api/forms/{id}/referee")]
async fn api_set_referee(state: AppState, path: Path<FormPath>, body: Json<RefereeBody>) -> HttpResponse {
    let (form, _) = match touch(&state, path.id) {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    let mut form = form.lock().await;
    form.set_referee(body.into_inner().referee);
    HttpResponse::Ok().json(form_view(path.id, &form))
}

#[put("/api/forms/{id}/winner")]
async fn api_set_winner(state: AppState, path: Path<FormPath>, body: Json<WinnerBody>) -> HttpResponse {
    let (form, _) = match touch(&state, path.id) {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    let mut form = form.lock().await;
    form.set_winner(body.into_inner().winner);
    HttpResponse::Ok().json(form_view(path.id, &form))
}

/// +1 / -1 button on a counter (never below zero).
#[post("/api/forms/{id}/counters/adjust")]
async fn api_adjust_counter(state: AppState, path: Path<FormPath>, body: Json<AdjustBody>) -> HttpResponse {
    let (form, _) = match touch(&state, path.id) {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    let mut form = form.lock().await;
    form.adjust(body.counter, body.side, body.step);
    HttpResponse::Ok().json(form_view(path.id, &form))
}

/// Counter typed directly; non-numeric input is stored as 0.
#[put("/api/forms/{id}/counters")]
async fn api_set_counter(
    state: AppState,
    path: Path<FormPath>,
    body: Json<CounterValueBody>,
) -> HttpResponse {
    let (form, _) = match touch(&state, path.id) {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    let body = body.into_inner();
    let text = match body.value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    };
    let mut form = form.lock().await;
    form.set_counter_text(body.counter, body.side, &text);
    HttpResponse::Ok().json(form_view(path.id, &form))
}

/// Discard the draft and selection.
#[post("/api/forms/{id}/reset")]
async fn api_reset_form(state: AppState, path: Path<FormPath>) -> HttpResponse {
    let (form, _) = match touch(&state, path.id) {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    let mut form = form.lock().await;
    form.reset();
    HttpResponse::Ok().json(form_view(path.id, &form))
}

/// Submit: insert the result, then mark the match launched. 409 while another submit runs.
#[post("/api/forms/{id}/submit")]
async fn api_submit_form(state: AppState, path: Path<FormPath>) -> HttpResponse {
    let (form, gate) = match touch(&state, path.id) {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    if gate.is_busy() {
        return HttpResponse::Conflict()
            .json(serde_json::json!({ "error": SubmitError::InFlight.to_string() }));
    }
    let mut form = form.lock().await;
    let outcome = form.submit().await;
    let view = form_view(path.id, &form);
    match outcome {
        Ok(_) => HttpResponse::Ok().json(view),
        Err(e) => {
            let status = match e {
                SubmitError::Validation(_) => StatusCode::BAD_REQUEST,
                SubmitError::InFlight => StatusCode::CONFLICT,
                SubmitError::InsertFailed(_) | SubmitError::StatusUpdateFailed(_) => {
                    StatusCode::BAD_GATEWAY
                }
            };
            HttpResponse::build(status).json(serde_json::json!({
                "error": e.to_string(),
                "result_recorded": e.result_recorded(),
                "form": view,
            }))
        }
    }
}

/// All matches with their result history, as CSV.
#[get("/api/matches/export.csv")]
async fn api_export_matches(backend: Data<Backend>) -> HttpResponse {
    let matches = match backend.service.list_matches(MatchJoins::with_history()).await {
        Ok(m) => m,
        Err(e) => {
            return HttpResponse::build(status_of(&e))
                .json(serde_json::json!({ "error": e.to_string() }))
        }
    };
    match export_history_csv(&matches) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(("Content-Disposition", "attachment; filename=\"partidas.csv\""))
            .body(bytes),
        Err(e) => HttpResponse::InternalServerError()
            .json(serde_json::json!({ "error": e.to_string() })),
    }
}

#[derive(Serialize)]
struct WinnerOption {
    side: Side,
    label: String,
}

/// Winner choices for a friendly draft, resolved against the club list.
#[post("/api/friendlies/winner-options")]
async fn api_friendly_winner_options(backend: Data<Backend>, body: Json<FriendlyDraft>) -> HttpResponse {
    let clubs = match backend.service.list_clubs().await {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load clubs: {}", e);
            Vec::new()
        }
    };
    let options: Vec<WinnerOption> = friendly_winner_options(&body, &clubs)
        .into_iter()
        .map(|(side, label)| WinnerOption { side, label })
        .collect();
    HttpResponse::Ok().json(options)
}

/// Save a friendly match. On failure the submitted draft is echoed back unchanged.
#[post("/api/friendlies")]
async fn api_submit_friendly(backend: Data<Backend>, body: Json<FriendlyDraft>) -> HttpResponse {
    let mut draft = body.into_inner();
    match submit_friendly(backend.service.as_ref(), &mut draft).await {
        Ok(record) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Friendly saved",
            "record": record,
            "draft": draft,
        })),
        Err(e) => {
            let status = match &e {
                FriendlySubmitError::Validation(_) => StatusCode::BAD_REQUEST,
                FriendlySubmitError::InsertFailed(_) => StatusCode::BAD_GATEWAY,
            };
            HttpResponse::build(status)
                .json(serde_json::json!({ "error": e.to_string(), "draft": draft }))
        }
    }
}

fn status_of(e: &ServiceError) -> StatusCode {
    StatusCode::from_u16(e.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Read-only passthrough of the whole result collection, wrapped in `{data}`.
/// Backend errors mirror the backend status as `{error, details}`.
#[get("/api/resultado-partida")]
async fn api_result_passthrough(backend: Data<Backend>) -> HttpResponse {
    match backend.service.list_results_raw().await {
        Ok(data) => HttpResponse::Ok().json(serde_json::json!({ "data": data })),
        Err(ServiceError::Rejected { status, body, .. }) => HttpResponse::build(
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        )
        .json(serde_json::json!({ "error": "Error accessing backend", "details": body })),
        Err(e) => HttpResponse::InternalServerError()
            .json(serde_json::json!({ "error": "Internal error", "details": e.to_string() })),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            log::error!("{}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };
    let bind = (settings.host.clone(), settings.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let backend = Data::new(Backend {
        service: Arc::new(
            SupabaseService::new(
                settings.supabase_url.clone(),
                settings.supabase_api_key.clone(),
            )
            .with_timeout(settings.backend_timeout),
        ),
        referee_pool: settings.referee_pool.clone(),
        recent_limit: settings.recent_results_limit,
    });
    let state = Data::new(RwLock::new(HashMap::<FormId, FormEntry>::new()));

    // Background task: every 30 minutes, remove forms inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive form(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(backend.clone())
            .service(api_health)
            .service(favicon)
            .service(api_list_clubs)
            .service(api_create_form)
            .service(api_get_form)
            .service(api_set_filter)
            .service(api_open_dropdown)
            .service(api_dismiss_dropdown)
            .service(api_select_match)
            .service(api_set_referee)
            .service(api_set_winner)
            .service(api_adjust_counter)
            .service(api_set_counter)
            .service(api_reset_form)
            .service(api_submit_form)
            .service(api_export_matches)
            .service(api_friendly_winner_options)
            .service(api_submit_friendly)
            .service(api_result_passthrough)
    })
    .bind(bind)?
    .run()
    .await
}
