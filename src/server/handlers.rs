//! Request handlers and the JSON response envelope

use super::middleware::{session_cookie, SESSION_COOKIE};
use super::AppState;
use crate::auth;
use crate::session::SESSION_TTL;
use crate::wireguard::WireGuardError;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};

const INDEX_HTML: &str = include_str!("../../templates/index.html");
const LOGIN_HTML: &str = include_str!("../../templates/login.html");

/// Envelope every API response uses: `{success, data?, error?}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn api_ok<T: Serialize>(data: T) -> Response {
    Json(ApiResponse {
        success: true,
        data: Some(data),
        error: None,
    })
    .into_response()
}

fn api_error(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(message),
        }),
    )
        .into_response()
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

fn render_login(error: &str) -> Html<String> {
    Html(LOGIN_HTML.replace("{{error}}", error))
}

pub async fn login_page() -> Html<String> {
    render_login("")
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Response {
    if !auth::verify_password(&form.password, &state.config.auth.password_hash) {
        warn!("Rejected login attempt");
        return render_login("Wrong password").into_response();
    }

    match state.sessions.create().await {
        Ok((token, _expires)) => {
            let cookie = format!(
                "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Strict",
                SESSION_COOKIE,
                token,
                SESSION_TTL.as_secs()
            );
            ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
        }
        Err(e) => {
            error!("Failed to create session: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(token) = session_cookie(&headers) {
        state.sessions.invalidate(&token).await;
    }

    let cleared = format!(
        "{}=; Max-Age=0; Path=/; HttpOnly; SameSite=Strict",
        SESSION_COOKIE
    );
    ([(header::SET_COOKIE, cleared)], Redirect::to("/login")).into_response()
}

pub async fn connections(State(state): State<Arc<AppState>>) -> Response {
    match state.wireguard.list_connections() {
        Ok(connections) => api_ok(connections),
        Err(e) => {
            error!("Failed to list connections: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub name: String,
}

pub async fn toggle(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ToggleRequest>,
) -> Response {
    let name = request.name.trim();
    if name.is_empty() {
        return api_error(
            StatusCode::BAD_REQUEST,
            "Connection name is required".to_string(),
        );
    }

    match state.wireguard.toggle(name) {
        Ok(output) => api_ok(json!({
            "message": format!("Connection {} toggled successfully", name),
            "output": String::from_utf8_lossy(&output),
        })),
        Err(e @ WireGuardError::UnknownConnection(_)) => {
            api_error(StatusCode::NOT_FOUND, e.to_string())
        }
        Err(e) => {
            // Error text carries the raw command output for diagnosis.
            error!("Failed to toggle connection {}: {}", name, e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

pub async fn status(State(state): State<Arc<AppState>>) -> Response {
    match state.wireguard.status_summary() {
        Ok(lines) => api_ok(json!({ "status": lines.join("\n") })),
        Err(e) => {
            error!("Failed to probe status: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
