//! Application Error - Unified error type for the application
//!
//! Defines [`AppError`] struct and [`AppResult<T>`] type alias.

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

use super::kind::ErrorKind;

/// アプリケーション統一エラー型
///
/// 全エンドポイント共通のエラー表現です。
/// レスポンスボディは `{ "error": message, "code"?: code, "details"?: details }`
/// の形でクライアントへ返されます。
///
/// ## Fields
/// * `kind` - エラーの分類（HTTP ステータスコードにマッピング）
/// * `message` - ユーザー向けのエラーメッセージ（ローカライズ済み）
/// * `code` - 機械判定用の安定したコード（オプション）
/// * `details` - フィールド別エラーなどの追加情報（オプション）
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::BadRequest, "Invalid token")
///     .with_code("INVALID_TOKEN_FORMAT");
/// assert_eq!(err.code(), Some("INVALID_TOKEN_FORMAT"));
/// ```
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    code: Option<Cow<'static, str>>,
    details: Option<Value>,
}

/// アプリケーション結果型エイリアス
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// 新しいエラーを作成
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            details: None,
        }
    }

    /// 404 Not Found エラー
    #[inline]
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// 405 Method Not Allowed エラー
    #[inline]
    pub fn method_not_allowed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::MethodNotAllowed, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// 機械判定用コードを設定
    #[inline]
    pub fn with_code(mut self, code: impl Into<Cow<'static, str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// 追加情報を設定
    ///
    /// バリデーションエラーではフィールド名 → メッセージのオブジェクトを渡します。
    #[inline]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    #[inline]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// サーバーエラーかどうか
    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }

    /// クライアント向けのレスポンスボディを組み立てる
    ///
    /// `code` と `details` は設定されている場合のみ出力されます。
    pub fn to_body(&self) -> Value {
        let mut body = serde_json::Map::new();
        body.insert("error".to_string(), Value::String(self.message.to_string()));
        if let Some(code) = &self.code {
            body.insert("code".to_string(), Value::String(code.to_string()));
        }
        if let Some(details) = &self.details {
            body.insert("details".to_string(), details.clone());
        }
        Value::Object(body)
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        builder.field("message", &self.message);
        if let Some(code) = &self.code {
            builder.field("code", code);
        }
        if let Some(details) = &self.details {
            builder.field("details", details);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(code) = &self.code {
            write!(f, " ({})", code)?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_error() {
        let err = AppError::new(ErrorKind::NotFound, "Account not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Account not found");
        assert!(err.code().is_none());
        assert!(err.details().is_none());
    }

    #[test]
    fn test_convenience_constructors() {
        assert_eq!(AppError::not_found("test").status_code(), 404);
        assert_eq!(AppError::method_not_allowed("test").status_code(), 405);
    }

    #[test]
    fn test_body_minimal() {
        let body = AppError::not_found("missing").to_body();
        assert_eq!(body, json!({ "error": "missing" }));
    }

    #[test]
    fn test_body_with_code_and_details() {
        let body = AppError::new(ErrorKind::BadRequest, "invalid input")
            .with_code("VALIDATION_ERROR")
            .with_details(json!({ "email": "required" }))
            .to_body();

        assert_eq!(body["error"], "invalid input");
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["email"], "required");
    }

    #[test]
    fn test_display() {
        let err = AppError::new(ErrorKind::BadRequest, "Invalid token").with_code("INVALID_TOKEN");
        assert_eq!(err.to_string(), "[Bad Request] Invalid token (INVALID_TOKEN)");
    }
}
