use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tokio::sync::{broadcast, Mutex};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tower_http::services::{ServeDir, ServeFile};

use crate::api::{ApiBatchRequest, ApiBatchResponse, ApiGenerateRequest, ApiGenerateResponse};
use content_forge::{ContentEngine, GenerationSource};

#[derive(Clone)]
struct AppState {
    engine: Arc<ContentEngine>,
    channels: Arc<Mutex<HashMap<String, broadcast::Sender<StreamEvent>>>>,
}

#[derive(Clone, Serialize)]
struct StreamEvent {
    event: String,
    message: String,
    timestamp_ms: u128,
}

#[derive(serde::Deserialize)]
struct StreamQuery {
    request_id: String,
}

static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub async fn serve(args: crate::ServeArgs, engine: ContentEngine) -> Result<(), String> {
    let state = AppState {
        engine: Arc::new(engine),
        channels: Arc::new(Mutex::new(HashMap::new())),
    };

    let web_root = args.web_root;
    let index_path = format!("{}/index.html", web_root.trim_end_matches('/'));
    let static_service = ServeDir::new(web_root).not_found_service(ServeFile::new(index_path));

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/generate", post(generate_handler))
        .route("/api/generate/batch", post(batch_handler))
        .route("/api/generate/stream", get(stream_handler))
        .nest_service("/", static_service)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    tracing::info!(%addr, "content-forge listening");

    axum::serve(
        tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|err| format!("failed to bind server: {}", err))?,
        app,
    )
    .await
    .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn generate_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiGenerateRequest>,
) -> Result<Json<ApiGenerateResponse>, (StatusCode, String)> {
    let request_id = request
        .request_id
        .clone()
        .unwrap_or_else(generate_request_id);
    let defaults = state.engine.config().optimization.to_flags();
    let (content_request, flags, deadline, warnings) = request
        .into_parts(defaults)
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;

    let sender = get_or_create_channel(&state, &request_id).await;
    send_event(&sender, "start", "Classifying topic");
    if flags.use_cache {
        send_event(&sender, "cache", "Checking content cache");
    }
    send_event(&sender, "calling", "Generating content");

    let outcome = state
        .engine
        .generate_with_deadline(&content_request, &flags, deadline)
        .await;

    if outcome.cost.cache_hit {
        send_event(&sender, "received", "Served from cache");
    } else if outcome.cost.source == GenerationSource::Template {
        send_event(&sender, "fallback", "Using template generation");
    } else {
        send_event(&sender, "received", "Received provider response");
    }
    send_event(&sender, "done", "Generation complete");
    schedule_cleanup(state.channels.clone(), request_id.clone());

    Ok(Json(ApiGenerateResponse::from_outcome(
        outcome, warnings, request_id,
    )))
}

async fn batch_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiBatchRequest>,
) -> Result<Json<ApiBatchResponse>, (StatusCode, String)> {
    let request_id = request
        .request_id
        .clone()
        .unwrap_or_else(generate_request_id);
    let defaults = state.engine.config().optimization.to_flags();
    let (topic, platforms, style, flags, deadline, warnings) = request
        .into_parts(defaults)
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;

    let outcomes = state
        .engine
        .generate_batch_with_deadline(&topic, &platforms, style, &flags, deadline)
        .await;

    let results = outcomes
        .into_iter()
        .map(|outcome| {
            ApiGenerateResponse::from_outcome(outcome, warnings.clone(), request_id.clone())
        })
        .collect();

    Ok(Json(ApiBatchResponse {
        request_id,
        results,
    }))
}

async fn stream_handler(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>, StatusCode>
{
    let sender = get_or_create_channel(&state, &query.request_id).await;
    let receiver = sender.subscribe();
    let stream = BroadcastStream::new(receiver).filter_map(|event| match event {
        Ok(event) => {
            let data = serde_json::to_string(&event).unwrap_or_default();
            Some(Ok(Event::default().data(data)))
        }
        Err(_) => None,
    });

    send_event(&sender, "connected", "Streaming generation status");
    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(8))))
}

async fn get_or_create_channel(
    state: &AppState,
    request_id: &str,
) -> broadcast::Sender<StreamEvent> {
    let mut guard = state.channels.lock().await;
    if let Some(sender) = guard.get(request_id) {
        return sender.clone();
    }
    let (sender, _) = broadcast::channel(32);
    guard.insert(request_id.to_string(), sender.clone());
    sender
}

fn send_event(sender: &broadcast::Sender<StreamEvent>, event: &str, message: &str) {
    let _ = sender.send(StreamEvent {
        event: event.to_string(),
        message: message.to_string(),
        timestamp_ms: now_ms(),
    });
}

fn schedule_cleanup(
    channels: Arc<Mutex<HashMap<String, broadcast::Sender<StreamEvent>>>>,
    request_id: String,
) {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(10)).await;
        let mut guard = channels.lock().await;
        guard.remove(&request_id);
    });
}

fn generate_request_id() -> String {
    let counter = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("req-{}-{}", now_ms(), counter)
}

fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis())
        .unwrap_or(0)
}
