//! Axum-based HTTP server.
//!
//! The workflow and gate underneath are synchronous (LMDB transactions,
//! blocking HTTP to the email provider), so every handler hops onto the
//! blocking pool for the actual work.

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use continua_downloads::DownloadGate;
use continua_types::{BookCategory, EmailAddress};
use continua_verification::{ConfirmOutcome, VerificationWorkflow};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::error::RpcError;
use crate::handlers::{
    DownloadQuery, MessageResponse, RequestVerificationRequest, SignupRequest, VerifyRequest,
    VerifyResponse,
};

#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<VerificationWorkflow>,
    pub gate: Arc<DownloadGate>,
}

pub struct RpcServer {
    port: u16,
    state: AppState,
}

impl RpcServer {
    pub fn new(port: u16, workflow: Arc<VerificationWorkflow>, gate: Arc<DownloadGate>) -> Self {
        Self {
            port,
            state: AppState { workflow, gate },
        }
    }

    /// The full route table, usable standalone in tests.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/api/request-verification", post(request_verification))
            .route("/api/verify", post(verify))
            .route("/api/signup", post(signup))
            .route("/api/download/:category", get(download))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Bind and serve until the process is stopped.
    pub async fn start(self) -> Result<(), RpcError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))?;
        info!(%addr, "rpc server listening");
        axum::serve(listener, Self::router(self.state))
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn request_verification(
    State(state): State<AppState>,
    Json(req): Json<RequestVerificationRequest>,
) -> Result<Json<MessageResponse>, RpcError> {
    let category = BookCategory::from_str(&req.book_category)
        .map_err(|_| RpcError::InvalidRequest("Unknown book category".to_string()))?;

    let workflow = state.workflow.clone();
    tokio::task::spawn_blocking(move || {
        workflow.request_verification(&req.name, &req.email, category)
    })
    .await
    .map_err(|_| RpcError::Internal)??;

    // Same body whether the address was new, pending, or already
    // verified.
    Ok(Json(MessageResponse {
        message: "Check your email to confirm your address.".to_string(),
    }))
}

async fn verify(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, RpcError> {
    let workflow = state.workflow.clone();
    let outcome = tokio::task::spawn_blocking(move || workflow.confirm_verification(&req.token))
        .await
        .map_err(|_| RpcError::Internal)??;

    match outcome {
        ConfirmOutcome::Verified {
            email,
            book_category,
        } => Ok(Json(VerifyResponse {
            success: true,
            email: email.as_str().to_string(),
            book_category: book_category.map(|c| c.as_str().to_string()),
        })),
        ConfirmOutcome::Expired => Err(RpcError::TokenExpired),
        ConfirmOutcome::InvalidOrUsed => Err(RpcError::TokenInvalid),
    }
}

async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<MessageResponse>, RpcError> {
    let workflow = state.workflow.clone();
    tokio::task::spawn_blocking(move || workflow.signup(&req.name, &req.email))
        .await
        .map_err(|_| RpcError::Internal)??;

    Ok(Json(MessageResponse {
        message: "Thanks for signing up.".to_string(),
    }))
}

async fn download(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, RpcError> {
    let category = BookCategory::from_str(&category)
        .map_err(|_| RpcError::InvalidRequest("Unknown book category".to_string()))?;
    let email = query
        .email
        .ok_or_else(|| RpcError::InvalidRequest("Email is required".to_string()))?;
    let email = EmailAddress::parse(&email)
        .map_err(|_| RpcError::InvalidRequest("Enter a valid email address".to_string()))?;

    let gate = state.gate.clone();
    let bytes = tokio::task::spawn_blocking(move || gate.authorize_and_fetch(category, &email))
        .await
        .map_err(|_| RpcError::Internal)??;

    let disposition = format!("attachment; filename=\"{}.pdf\"", category.as_str());
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use continua_nullables::{NullAssetStore, NullContactStore, NullMailer};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct Fixture {
        store: Arc<NullContactStore>,
        mailer: Arc<NullMailer>,
        assets: Arc<NullAssetStore>,
    }

    fn fixture() -> (Router, Fixture) {
        let store = Arc::new(NullContactStore::new());
        let mailer = Arc::new(NullMailer::new());
        let assets = Arc::new(NullAssetStore::new());
        let workflow = Arc::new(VerificationWorkflow::new(
            store.clone(),
            store.clone(),
            mailer.clone(),
        ));
        let gate = Arc::new(DownloadGate::new(
            store.clone(),
            store.clone(),
            assets.clone(),
        ));
        let router = RpcServer::router(AppState { workflow, gate });
        (
            router,
            Fixture {
                store,
                mailer,
                assets,
            },
        )
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn request_verification_accepts_and_sends() {
        let (router, fx) = fixture();
        let response = router
            .oneshot(post_json(
                "/api/request-verification",
                json!({"name": "Ada", "email": "ada@example.com", "bookCategory": "agents"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(fx.mailer.sent().len(), 1);
        assert_eq!(fx.store.contact_count(), 1);
    }

    #[tokio::test]
    async fn request_verification_reports_field_errors() {
        let (router, fx) = fixture();
        let response = router
            .oneshot(post_json(
                "/api/request-verification",
                json!({"name": "", "email": "nope", "bookCategory": "agents"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["fieldErrors"]["name"].is_array());
        assert!(body["fieldErrors"]["email"].is_array());
        assert_eq!(fx.store.contact_count(), 0);
    }

    #[tokio::test]
    async fn request_verification_rejects_unknown_category() {
        let (router, _fx) = fixture();
        let response = router
            .oneshot(post_json(
                "/api/request-verification",
                json!({"name": "Ada", "email": "ada@example.com", "bookCategory": "pirates"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn verify_round_trip_then_invalid() {
        let (router, fx) = fixture();
        router
            .clone()
            .oneshot(post_json(
                "/api/request-verification",
                json!({"name": "Ada", "email": "ada@example.com", "bookCategory": "publishers"}),
            ))
            .await
            .unwrap();
        let token = fx.mailer.last_token().unwrap();

        let response = router
            .clone()
            .oneshot(post_json("/api/verify", json!({"token": token.as_str()})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["email"], json!("ada@example.com"));
        assert_eq!(body["bookCategory"], json!("publishers"));

        // Second submission of the same link.
        let response = router
            .oneshot(post_json("/api/verify", json!({"token": token.as_str()})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn download_gated_on_verification() {
        let (router, fx) = fixture();
        fx.assets
            .insert(BookCategory::Publishers, b"%PDF-1.4 stub".to_vec());
        router
            .clone()
            .oneshot(post_json(
                "/api/request-verification",
                json!({"name": "Ada", "email": "ada@example.com", "bookCategory": "publishers"}),
            ))
            .await
            .unwrap();

        // Not verified yet.
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/download/publishers?email=ada@example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let token = fx.mailer.last_token().unwrap();
        router
            .clone()
            .oneshot(post_json("/api/verify", json!({"token": token.as_str()})))
            .await
            .unwrap();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/download/publishers?email=ada@example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"%PDF-1.4 stub");
    }

    #[tokio::test]
    async fn download_unknown_category_is_bad_request_regardless_of_state() {
        let (router, fx) = fixture();
        let request = || {
            Request::builder()
                .uri("/api/download/not-a-category?email=ada@example.com")
                .body(Body::empty())
                .unwrap()
        };

        // Unverified contact.
        router
            .clone()
            .oneshot(post_json(
                "/api/request-verification",
                json!({"name": "Ada", "email": "ada@example.com", "bookCategory": "publishers"}),
            ))
            .await
            .unwrap();
        let response = router.clone().oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Still a 400 once the contact is verified: the category check
        // happens before any authorization decision.
        let token = fx.mailer.last_token().unwrap();
        router
            .clone()
            .oneshot(post_json("/api/verify", json!({"token": token.as_str()})))
            .await
            .unwrap();
        let response = router.oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn download_missing_email_is_bad_request() {
        let (router, _fx) = fixture();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/download/publishers")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn download_missing_asset_is_not_found() {
        let (router, fx) = fixture();
        router
            .clone()
            .oneshot(post_json(
                "/api/request-verification",
                json!({"name": "Ada", "email": "ada@example.com", "bookCategory": "therapists"}),
            ))
            .await
            .unwrap();
        let token = fx.mailer.last_token().unwrap();
        router
            .clone()
            .oneshot(post_json("/api/verify", json!({"token": token.as_str()})))
            .await
            .unwrap();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/download/therapists?email=ada@example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn signup_accepts_and_duplicates_silently() {
        let (router, fx) = fixture();
        for _ in 0..2 {
            let response = router
                .clone()
                .oneshot(post_json(
                    "/api/signup",
                    json!({"name": "Ada", "email": "ada@example.com"}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(fx.store.contact_count(), 1);
    }
}
