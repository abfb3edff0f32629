//! Stripe Credentials
//!
//! Reads API keys from the environment and checks their shape before any
//! request is made with them.

/// Variable holding the key used by the test harness
pub const TEST_KEY_VAR: &str = "STRIPE_TEST_API_KEY";

/// Variable holding the key used by the CLI
pub const API_KEY_VAR: &str = "STRIPE_API_KEY";

pub const TEST_KEY_PREFIX: &str = "sk_test_";

/// Configuration error for a missing or unusable key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("Expected environment variable {var} to be set.")]
    Missing { var: String },
    #[error("Expected {var} to be of the form \"sk_test_[...]\".")]
    NotTestMode { var: String },
}

/// Get the test-mode key the cleanup harness authenticates with
pub fn get_user_stripe_key() -> Result<String, CredentialError> {
    read_test_key(TEST_KEY_VAR)
}

/// Read a test-mode key from `var`
pub fn read_test_key(var: &str) -> Result<String, CredentialError> {
    let value = std::env::var(var).ok();
    validate_test_key(var, value.as_deref())
}

/// Check that `value` is present and is a test-mode secret key
pub fn validate_test_key(var: &str, value: Option<&str>) -> Result<String, CredentialError> {
    let key = value
        .filter(|k| !k.is_empty())
        .ok_or_else(|| CredentialError::Missing {
            var: var.to_string(),
        })?;

    if !key.starts_with(TEST_KEY_PREFIX) {
        return Err(CredentialError::NotTestMode {
            var: var.to_string(),
        });
    }

    Ok(key.to_string())
}

/// Validate the general shape of a Stripe API key.
/// Secret (`sk_`) and restricted (`rk_`) keys are accepted; publishable
/// keys cannot call these endpoints.
pub fn is_valid_api_key(key: &str) -> bool {
    let Some(rest) = key
        .strip_prefix("sk_")
        .or_else(|| key.strip_prefix("rk_"))
    else {
        return false;
    };

    !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Read the CLI key from the environment
pub fn get_default_api_key() -> Option<String> {
    let key = std::env::var(API_KEY_VAR).ok()?;
    if is_valid_api_key(&key) {
        return Some(key);
    }
    tracing::warn!("Invalid API key format in {}", API_KEY_VAR);
    None
}
