//! HTTP Identity Gateway
//!
//! GoTrue-compatible REST client (`/auth/v1/signup`, `/auth/v1/token`,
//! `/auth/v1/recover`). Provider error strings are translated through the
//! [`ErrorCatalog`]; transport failures and 5xx answers become
//! [`GatewayError::Transport`].

use chrono::Utc;
use platform::password::ClearTextPassword;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::entity::Session;
use crate::domain::gateway::{
    GatewayError, GatewayResult, IdentityGateway, IdentityUser, ProfileData, SignInGrant,
};
use crate::domain::messages::ErrorCatalog;
use crate::domain::value_object::Email;

#[derive(Clone)]
pub struct HttpIdentityGateway {
    client: Client,
    base_url: String,
    api_key: String,
    catalog: ErrorCatalog,
}

impl HttpIdentityGateway {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            catalog: ErrorCatalog::default(),
        }
    }

    pub fn with_catalog(mut self, catalog: ErrorCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    async fn post(&self, path: &str, body: Value) -> GatewayResult<Value> {
        let url = format!("{}{path}", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::transport(format!("POST {path}: {e}")))?;

        self.read(path, response).await
    }

    async fn read(&self, path: &str, response: Response) -> GatewayResult<Value> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::transport(format!("POST {path}: {e}")))?;
        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        if status.is_success() {
            return Ok(body);
        }

        if status.is_server_error() {
            return Err(GatewayError::transport(format!(
                "POST {path}: provider answered {status}"
            )));
        }

        let raw = provider_message(&body).unwrap_or_else(|| status_reason(status));
        tracing::debug!(path, status = status.as_u16(), raw = %raw, "Identity provider rejected request");
        Err(GatewayError::rejected(raw, &self.catalog))
    }
}

/// First non-empty message field of a provider error body
fn provider_message(body: &Value) -> Option<String> {
    if let Value::String(text) = body {
        return Some(text.clone()).filter(|t| !t.is_empty());
    }
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .filter(|msg| !msg.is_empty())
        .map(str::to_string)
}

fn status_reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Request rejected")
        .to_string()
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    expires_in: i64,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default = "default_token_type")]
    token_type: String,
    user: IdentityUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl TokenResponse {
    fn into_grant(self) -> SignInGrant {
        let expires_at = self
            .expires_at
            .unwrap_or_else(|| Utc::now().timestamp() + self.expires_in);

        SignInGrant {
            session: Session {
                access_token: self.access_token,
                refresh_token: self.refresh_token,
                expires_at,
                expires_in: self.expires_in,
                token_type: self.token_type,
            },
            user: self.user,
        }
    }
}

/// Sign-up answers with the bare user when confirmation is required, or with
/// a session wrapping it when the provider auto-confirms.
fn parse_sign_up_user(body: Value) -> GatewayResult<IdentityUser> {
    let user = match body {
        Value::Object(mut map) if map.contains_key("user") => map.remove("user").unwrap_or(Value::Null),
        other => other,
    };
    serde_json::from_value(user)
        .map_err(|e| GatewayError::transport(format!("unexpected sign-up response: {e}")))
}

impl IdentityGateway for HttpIdentityGateway {
    async fn sign_up(
        &self,
        email: &Email,
        password: &ClearTextPassword,
        profile: &ProfileData,
    ) -> GatewayResult<IdentityUser> {
        let body = self
            .post(
                "/auth/v1/signup",
                json!({
                    "email": email.as_str(),
                    "password": password.expose(),
                    "data": profile,
                }),
            )
            .await?;

        parse_sign_up_user(body)
    }

    async fn sign_in(
        &self,
        email: &Email,
        password: &ClearTextPassword,
    ) -> GatewayResult<SignInGrant> {
        let body = self
            .post(
                "/auth/v1/token?grant_type=password",
                json!({
                    "email": email.as_str(),
                    "password": password.expose(),
                }),
            )
            .await?;

        let token: TokenResponse = serde_json::from_value(body)
            .map_err(|e| GatewayError::transport(format!("unexpected token response: {e}")))?;
        Ok(token.into_grant())
    }

    async fn reset_password(&self, email: &Email) -> GatewayResult<()> {
        self.post("/auth/v1/recover", json!({ "email": email.as_str() }))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_message_keys() {
        assert_eq!(
            provider_message(&json!({ "msg": "User already registered" })).as_deref(),
            Some("User already registered")
        );
        assert_eq!(
            provider_message(&json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            }))
            .as_deref(),
            Some("Invalid login credentials")
        );
        assert_eq!(provider_message(&json!({ "code": 400 })), None);
        assert_eq!(provider_message(&Value::Null), None);
    }

    #[test]
    fn test_sign_up_user_shapes() {
        let user = json!({ "id": "u-1", "email": "a@b.com" });

        let bare = parse_sign_up_user(user.clone()).unwrap();
        assert_eq!(bare.id, "u-1");

        let wrapped = parse_sign_up_user(json!({ "access_token": "x", "user": user })).unwrap();
        assert_eq!(wrapped.email, "a@b.com");

        assert!(matches!(
            parse_sign_up_user(json!({ "unexpected": true })),
            Err(GatewayError::Transport(_))
        ));
    }

    #[test]
    fn test_token_response_fills_expiry() {
        let token: TokenResponse = serde_json::from_value(json!({
            "access_token": "at",
            "refresh_token": "rt",
            "expires_in": 3600,
            "user": { "id": "u-1", "email": "a@b.com" }
        }))
        .unwrap();
        let before = Utc::now().timestamp();
        let grant = token.into_grant();

        assert_eq!(grant.session.token_type, "bearer");
        assert!(grant.session.expires_at >= before + 3600);
        assert!(grant.session.expires_at <= Utc::now().timestamp() + 3600);
    }

    // ------------------------------------------------------------------
    // Against a local stand-in provider
    // ------------------------------------------------------------------

    use crate::domain::gateway::{RAW_INVALID_CREDENTIALS, RAW_USER_NOT_FOUND};
    use crate::domain::messages::{EMAIL_TAKEN, GENERIC_FAILURE, INVALID_CREDENTIALS};
    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::{Json, Router};
    use platform::password::PasswordPolicy;

    const API_KEY: &str = "anon-key";

    async fn serve(router: Router) -> HttpIdentityGateway {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        HttpIdentityGateway::new(format!("http://{addr}/"), API_KEY)
    }

    fn email() -> Email {
        Email::new("kim@example.com").unwrap()
    }

    fn password() -> ClearTextPassword {
        ClearTextPassword::new("password123".to_string(), &PasswordPolicy::LOGIN).unwrap()
    }

    fn profile() -> ProfileData {
        ProfileData {
            name: "Kim".into(),
            role: crate::domain::value_object::AccountRole::Student,
            phone: None,
        }
    }

    fn authorized(headers: &HeaderMap) -> bool {
        let bearer = format!("Bearer {API_KEY}");
        headers.get("apikey").is_some_and(|v| v == API_KEY)
            && headers.get("authorization").is_some_and(|v| v == bearer.as_str())
    }

    #[tokio::test]
    async fn test_sign_up_forwards_credentials_and_profile() {
        let gateway = serve(Router::new().route(
            "/auth/v1/signup",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                if !authorized(&headers) {
                    return (StatusCode::UNAUTHORIZED, Json(json!({ "msg": "no key" })));
                }
                assert_eq!(body["password"], "password123");
                assert_eq!(body["data"]["role"], "student");
                (
                    StatusCode::OK,
                    Json(json!({
                        "id": "u-1",
                        "email": body["email"],
                        "user_metadata": body["data"]
                    })),
                )
            }),
        ))
        .await;

        let user = gateway.sign_up(&email(), &password(), &profile()).await.unwrap();
        assert_eq!(user.id, "u-1");
        assert_eq!(user.email, "kim@example.com");
        assert_eq!(user.user_metadata["name"], "Kim");
    }

    #[tokio::test]
    async fn test_sign_in_returns_session() {
        let gateway = serve(Router::new().route(
            "/auth/v1/token",
            post(|| async {
                Json(json!({
                    "access_token": "at",
                    "refresh_token": "rt",
                    "expires_in": 3600,
                    "expires_at": 1_900_000_000,
                    "token_type": "bearer",
                    "user": { "id": "u-1", "email": "kim@example.com" }
                }))
            }),
        ))
        .await;

        let grant = gateway.sign_in(&email(), &password()).await.unwrap();
        assert_eq!(grant.session.access_token, "at");
        assert_eq!(grant.session.expires_at, 1_900_000_000);
        assert_eq!(grant.user.id, "u-1");
    }

    #[tokio::test]
    async fn test_client_error_is_rejected_and_translated() {
        let gateway = serve(Router::new().route(
            "/auth/v1/token",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_grant",
                        "error_description": RAW_INVALID_CREDENTIALS
                    })),
                )
            }),
        ))
        .await;

        let err = gateway.sign_in(&email(), &password()).await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::Rejected {
                raw: RAW_INVALID_CREDENTIALS.to_string(),
                message: INVALID_CREDENTIALS.to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_duplicate_and_not_found_are_recognized() {
        let gateway = serve(
            Router::new()
                .route(
                    "/auth/v1/signup",
                    post(|| async {
                        (
                            StatusCode::UNPROCESSABLE_ENTITY,
                            Json(json!({ "msg": "User already registered" })),
                        )
                    }),
                )
                .route(
                    "/auth/v1/recover",
                    post(|| async {
                        (StatusCode::BAD_REQUEST, Json(json!({ "msg": RAW_USER_NOT_FOUND })))
                    }),
                ),
        )
        .await;

        let err = gateway.sign_up(&email(), &password(), &profile()).await.unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(err.user_message(), EMAIL_TAKEN);

        let err = gateway.reset_password(&email()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_bodyless_or_plain_text_rejection() {
        let gateway = serve(
            Router::new()
                .route("/auth/v1/recover", post(|| async { StatusCode::FORBIDDEN }))
                .route(
                    "/auth/v1/signup",
                    post(|| async { (StatusCode::BAD_REQUEST, "signups are paused") }),
                ),
        )
        .await;

        let err = gateway.reset_password(&email()).await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::Rejected {
                raw: "Forbidden".to_string(),
                message: "Forbidden".to_string(),
            }
        );

        let err = gateway.sign_up(&email(), &password(), &profile()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Rejected { ref raw, .. } if raw == "signups are paused"));
    }

    #[tokio::test]
    async fn test_server_error_is_transport() {
        let gateway = serve(Router::new().route(
            "/auth/v1/recover",
            post(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "msg": "User not found" })),
                )
            }),
        ))
        .await;

        let err = gateway.reset_password(&email()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
        assert!(!err.is_not_found());
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_transport() {
        // bind and release a port so nothing is listening on it
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gateway = HttpIdentityGateway::new(format!("http://{addr}"), API_KEY);
        let err = gateway.sign_in(&email(), &password()).await.unwrap_err();

        assert!(matches!(err, GatewayError::Transport(ref detail) if detail.contains("/auth/v1/token")));
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn test_unexpected_success_body_is_transport() {
        let gateway = serve(Router::new().route(
            "/auth/v1/token",
            post(|| async { Json(json!({ "hello": "world" })) }),
        ))
        .await;

        let err = gateway.sign_in(&email(), &password()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }
}
