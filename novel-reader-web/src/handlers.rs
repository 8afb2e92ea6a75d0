use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use novel_reader::{
    DocumentView, LANGUAGES, Language, OpenedDocument, PanelState, ReaderError, accept_document,
    languages::find_by_code,
};
use novel_reader_mt::{ModelFallbackClient, SessionError, SessionHandle, TranslateError};

#[derive(Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub target_language: String,
}

#[derive(Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated: String,
    pub source: String,
}

#[derive(Serialize, Deserialize)]
pub struct SelectionRequest {
    pub text: String,
}

#[derive(Serialize, Deserialize)]
pub struct LanguageRequest {
    pub language: String,
}

#[derive(Serialize, Deserialize)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    In,
    Out,
}

#[derive(Serialize, Deserialize)]
pub struct ZoomRequest {
    pub direction: Option<ZoomDirection>,
    pub factor: Option<f32>,
}

#[derive(Serialize)]
pub struct DocumentResponse {
    pub document: Option<OpenedDocument>,
    pub view: DocumentView,
    pub zoom_percent: u32,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// The reading pane: the open file, if any, and its view state.
///
/// The view outlives individual files so zoom carries over to the next one.
#[derive(Default)]
struct ReaderPane {
    document: Option<OpenedDocument>,
    view: DocumentView,
}

impl ReaderPane {
    fn response(&self) -> DocumentResponse {
        DocumentResponse {
            document: self.document.clone(),
            view: self.view.clone(),
            zoom_percent: self.view.zoom_percent(),
            can_go_back: self.view.can_go_back(),
            can_go_forward: self.view.can_go_forward(),
        }
    }

    fn open_view(&mut self) -> Result<&mut DocumentView, ApiError> {
        if self.document.is_none() {
            return Err(api_error(StatusCode::NOT_FOUND, "No document is open"));
        }
        Ok(&mut self.view)
    }
}

#[derive(Clone)]
pub struct AppState {
    translator: Arc<ModelFallbackClient>,
    session: SessionHandle,
    pane: Arc<Mutex<ReaderPane>>,
}

impl AppState {
    pub fn new(translator: Arc<ModelFallbackClient>, session: SessionHandle) -> Self {
        Self {
            translator,
            session,
            pane: Arc::new(Mutex::new(ReaderPane::default())),
        }
    }
}

pub async fn list_languages() -> Json<&'static [Language]> {
    Json(LANGUAGES)
}

/// Accept a language code ("fr") as well as a picker label ("French").
fn resolve_language(language: String) -> String {
    match find_by_code(&language) {
        Some(known) => known.name.to_string(),
        None => language,
    }
}

pub async fn translate_text(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, ApiError> {
    if request.text.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Nothing to translate"));
    }
    let target_language = resolve_language(request.target_language);
    info!("Translating {} chars to {}", request.text.chars().count(), target_language);

    let translated = state
        .translator
        .translate(&request.text, &target_language)
        .await
        .map_err(|e| {
            let status = match e {
                TranslateError::MissingCredentials => StatusCode::SERVICE_UNAVAILABLE,
                TranslateError::Backend(_) | TranslateError::EmptyResponse => {
                    StatusCode::BAD_GATEWAY
                }
            };
            api_error(status, e.to_string())
        })?;

    Ok(Json(TranslateResponse {
        translated,
        source: request.text,
    }))
}

fn file_name(headers: &HeaderMap) -> String {
    headers
        .get("x-file-name")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("document.pdf")
        .to_string()
}

fn mime_type(headers: &HeaderMap) -> &str {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .unwrap_or("")
}

fn count_pages(bytes: &[u8]) -> Result<u32, ReaderError> {
    let document =
        lopdf::Document::load_mem(bytes).map_err(|e| ReaderError::DocumentLoad(e.to_string()))?;
    Ok(document.get_pages().len() as u32)
}

/// Open an uploaded document. The raw body is the file; its MIME type is
/// taken from `Content-Type` and its name from `X-File-Name`.
pub async fn open_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DocumentResponse>, ApiError> {
    let name = file_name(&headers);
    let document = accept_document(&name, mime_type(&headers)).map_err(|e| {
        warn!("Rejected upload {}: {}", name, e);
        api_error(StatusCode::UNSUPPORTED_MEDIA_TYPE, e.to_string())
    })?;

    let num_pages = count_pages(&body)
        .map_err(|e| api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let mut pane = state.pane.lock().await;
    pane.view.reset();
    pane.view.on_loaded(num_pages);
    info!("Opened {} ({} pages)", document.name, num_pages);
    pane.document = Some(document);
    Ok(Json(pane.response()))
}

/// Close the current file and wait for another upload.
pub async fn reset_document(State(state): State<AppState>) -> Json<DocumentResponse> {
    let mut pane = state.pane.lock().await;
    if let Some(document) = pane.document.take() {
        info!("Closed {}", document.name);
    }
    pane.view.reset();
    Json(pane.response())
}

pub async fn change_page(
    State(state): State<AppState>,
    Json(request): Json<PageRequest>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let mut pane = state.pane.lock().await;
    let view = pane.open_view()?;

    match (request.page, request.offset) {
        (Some(page), _) => {
            view.set_current_page(page);
        }
        (None, Some(offset)) => {
            view.change_page(offset);
        }
        (None, None) => {
            return Err(api_error(StatusCode::BAD_REQUEST, "Expected page or offset"));
        }
    }
    Ok(Json(pane.response()))
}

pub async fn change_zoom(
    State(state): State<AppState>,
    Json(request): Json<ZoomRequest>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let mut pane = state.pane.lock().await;
    let view = pane.open_view()?;

    match (request.direction, request.factor) {
        (Some(ZoomDirection::In), _) => {
            view.zoom_in();
        }
        (Some(ZoomDirection::Out), _) => {
            view.zoom_out();
        }
        (None, Some(factor)) => {
            view.set_zoom(factor);
        }
        (None, None) => {
            return Err(api_error(StatusCode::BAD_REQUEST, "Expected direction or factor"));
        }
    }
    Ok(Json(pane.response()))
}

fn session_error(e: SessionError) -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

pub async fn session_panel(State(state): State<AppState>) -> Json<PanelState> {
    Json(state.session.panel())
}

pub async fn session_selection(
    State(state): State<AppState>,
    Json(request): Json<SelectionRequest>,
) -> Result<Json<PanelState>, ApiError> {
    let panel = state
        .session
        .release(request.text)
        .await
        .map_err(session_error)?;
    Ok(Json(panel))
}

pub async fn session_language(
    State(state): State<AppState>,
    Json(request): Json<LanguageRequest>,
) -> Result<Json<PanelState>, ApiError> {
    let panel = state
        .session
        .change_language(resolve_language(request.language))
        .await
        .map_err(session_error)?;
    Ok(Json(panel))
}

pub async fn session_close(State(state): State<AppState>) -> Result<Json<PanelState>, ApiError> {
    let panel = state.session.close().await.map_err(session_error)?;
    Ok(Json(panel))
}
