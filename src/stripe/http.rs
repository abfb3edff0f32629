//! HTTP transport for Stripe REST API calls

use super::client::ClientConfig;
use super::transport::{Method, RequestTransport};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

const STRIPE_VERSION_HEADER: &str = "Stripe-Version";
const STRIPE_ACCOUNT_HEADER: &str = "Stripe-Account";
const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Error returned by the API for a non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("API request failed: {status} ({message})")]
pub struct ApiError {
    pub status: u16,
    /// Stripe error type, e.g. `invalid_request_error`
    pub error_type: Option<String>,
    pub code: Option<String>,
    pub message: String,
}

impl ApiError {
    /// Build from a status and the raw response body.
    /// Stripe wraps errors as `{"error": {"type", "code", "message"}}`.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let error = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("error").cloned())
            .unwrap_or(Value::Null);

        let field = |name: &str| {
            error
                .get(name)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };

        Self {
            status: status.as_u16(),
            error_type: field("type"),
            code: field("code"),
            message: field("message").unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            }),
        }
    }
}

/// Encode request parameters the way Stripe expects them.
///
/// Nested objects become `parent[child]=v`, arrays become `parent[0]=v`.
/// `null` encodes as an empty value, which Stripe treats as "unset".
pub fn encode_params(data: &Value) -> String {
    let Value::Object(map) = data else {
        return String::new();
    };

    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, value) in map {
        flatten_param(key.clone(), value, &mut pairs);
    }

    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn flatten_param(prefix: String, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten_param(format!("{}[{}]", prefix, key), nested, out);
            }
        },
        Value::Array(items) => {
            for (index, nested) in items.iter().enumerate() {
                flatten_param(format!("{}[{}]", prefix, index), nested, out);
            }
        },
        Value::String(s) => out.push((prefix, s.clone())),
        Value::Number(n) => out.push((prefix, n.to_string())),
        Value::Bool(b) => out.push((prefix, b.to_string())),
        Value::Null => out.push((prefix, String::new())),
    }
}

/// Production transport backed by reqwest
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    api_key: String,
    base_url: Url,
    api_version: Option<String>,
    stripe_account: Option<String>,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(api_key: &str, config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let mut base_url = Url::parse(&config.api_base)
            .with_context(|| format!("Invalid API base URL: {}", config.api_base))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url,
            api_version: config.api_version.clone(),
            stripe_account: config.stripe_account.clone(),
        })
    }

    /// Resolve an API-relative url under the base, keeping any base path prefix
    fn endpoint(&self, url: &str) -> Result<Url> {
        self.base_url
            .join(url.trim_start_matches('/'))
            .with_context(|| format!("Invalid request path: {}", url))
    }
}

#[async_trait]
impl RequestTransport for HttpTransport {
    async fn dispatch(&self, method: Method, url: &str, data: Option<&Value>) -> Result<Value> {
        let mut endpoint = self.endpoint(url)?;
        let encoded = data.map(encode_params).unwrap_or_default();

        tracing::debug!("{} {}", method, endpoint);

        let mut request = match method {
            Method::Post => self
                .client
                .post(endpoint)
                .header(IDEMPOTENCY_KEY_HEADER, Uuid::new_v4().to_string())
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(encoded),
            Method::Get | Method::Delete => {
                if !encoded.is_empty() {
                    endpoint.set_query(Some(&encoded));
                }
                self.client.request(method.into(), endpoint)
            },
        };

        request = request.bearer_auth(&self.api_key);
        if let Some(version) = &self.api_version {
            request = request.header(STRIPE_VERSION_HEADER, version);
        }
        if let Some(account) = &self.stripe_account {
            request = request.header(STRIPE_ACCOUNT_HEADER, account);
        }

        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            // Only the sanitized body is logged; it may echo request data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(ApiError::from_response(status, &body).into());
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).context("Failed to parse response JSON")
    }
}

/// Format a Stripe API error for display
pub fn format_stripe_error(error: &anyhow::Error) -> String {
    if let Some(api_error) = error.downcast_ref::<ApiError>() {
        return match api_error.status {
            400 => format!("Invalid request: {}", api_error.message),
            401 => "Authentication failed. Check your API key.".to_string(),
            402 => format!("Request failed: {}", api_error.message),
            403 => "Permission denied. The API key lacks access to this resource.".to_string(),
            404 => "Resource not found.".to_string(),
            409 => "Conflict. Another request used the same idempotency key.".to_string(),
            429 => "Rate limit exceeded. Please try again later.".to_string(),
            500..=599 => "Stripe is temporarily unavailable. Please try again.".to_string(),
            _ => api_error.to_string(),
        };
    }

    // Truncate long error messages and remove non-printable characters
    let error_str = format!("{:#}", error);
    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(120)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_flat_params() {
        let encoded = encode_params(&json!({"amount": 2000, "currency": "usd"}));
        assert_eq!(encoded, "amount=2000&currency=usd");
    }

    #[test]
    fn test_encode_nested_object_and_array() {
        let encoded = encode_params(&json!({
            "expand": ["customer", "invoice"],
            "metadata": {"order_id": "6735"}
        }));
        assert_eq!(
            encoded,
            "expand%5B0%5D=customer&expand%5B1%5D=invoice&metadata%5Border_id%5D=6735"
        );
    }

    #[test]
    fn test_encode_null_unsets_field() {
        assert_eq!(encode_params(&json!({"description": null})), "description=");
    }

    #[test]
    fn test_encode_non_object_is_empty() {
        assert_eq!(encode_params(&json!("cus_123")), "");
        assert_eq!(encode_params(&Value::Null), "");
    }

    #[test]
    fn test_api_error_parses_stripe_body() {
        let body = r#"{"error":{"type":"card_error","code":"card_declined","message":"Your card was declined."}}"#;
        let error = ApiError::from_response(StatusCode::PAYMENT_REQUIRED, body);
        assert_eq!(error.status, 402);
        assert_eq!(error.error_type.as_deref(), Some("card_error"));
        assert_eq!(error.code.as_deref(), Some("card_declined"));
        assert_eq!(error.message, "Your card was declined.");
    }

    #[test]
    fn test_api_error_falls_back_to_reason_phrase() {
        let error = ApiError::from_response(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(error.message, "Bad Gateway");
        assert!(error.error_type.is_none());
    }

    #[test]
    fn test_format_stripe_error_by_status() {
        let not_found: anyhow::Error =
            ApiError::from_response(StatusCode::NOT_FOUND, "").into();
        assert_eq!(format_stripe_error(&not_found), "Resource not found.");

        let unauthorized: anyhow::Error =
            ApiError::from_response(StatusCode::UNAUTHORIZED, "").into();
        assert!(format_stripe_error(&unauthorized).contains("API key"));
    }

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.contains("[truncated, 500 bytes total]"));
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        for base in ["http://localhost:12111/stripe", "http://localhost:12111/stripe/"] {
            let config = ClientConfig::default().with_api_base(base);
            let transport = HttpTransport::new("sk_test_123", &config).unwrap();
            assert_eq!(
                transport.endpoint("/v1/customers/cus_1").unwrap().as_str(),
                "http://localhost:12111/stripe/v1/customers/cus_1"
            );
        }

        let transport = HttpTransport::new("sk_test_123", &ClientConfig::default()).unwrap();
        assert_eq!(
            transport.endpoint("/v1/customers").unwrap().as_str(),
            "https://api.stripe.com/v1/customers"
        );
    }
}
