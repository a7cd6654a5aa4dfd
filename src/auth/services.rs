use lazy_static::lazy_static;
use regex::Regex;
use tracing::info;

use crate::auth::dto::{AuthSuccess, LoginRequest, RegisterRequest};
use crate::error::{Error, ValidationErrors};
use crate::http::{decode, ApiTransport};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn validate_login(request: &LoginRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if request.email.trim().is_empty() {
        errors.push("email", "email is required");
    } else if !is_valid_email(request.email.trim()) {
        errors.push("email", "email is invalid");
    }
    if request.password.is_empty() {
        errors.push("password", "password is required");
    }
    errors.into_result()
}

fn validate_register(request: &RegisterRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if request.name.trim().is_empty() {
        errors.push("name", "name is required");
    }
    if request.email.trim().is_empty() {
        errors.push("email", "email is required");
    } else if !is_valid_email(request.email.trim()) {
        errors.push("email", "email is invalid");
    }
    if request.password.is_empty() {
        errors.push("password", "password is required");
    } else if request.password.len() < 6 {
        errors.push("password", "password must be at least 6 characters");
    }
    errors.into_result()
}

pub async fn login(api: &dyn ApiTransport, request: &LoginRequest) -> Result<AuthSuccess, Error> {
    validate_login(request)?;
    let body = serde_json::to_value(request)
        .map_err(|e| Error::Network(format!("could not encode login request: {e}")))?;
    let value = api.post("/auth/login", body).await?;
    let auth: AuthSuccess = decode(value, "auth")?;
    info!("logged in");
    Ok(auth)
}

pub async fn register(
    api: &dyn ApiTransport,
    request: &RegisterRequest,
) -> Result<AuthSuccess, Error> {
    validate_register(request)?;
    let body = serde_json::to_value(request)
        .map_err(|e| Error::Network(format!("could not encode register request: {e}")))?;
    let value = api.post("/auth/register", body).await?;
    let auth: AuthSuccess = decode(value, "auth")?;
    info!("registered");
    Ok(auth)
}
