use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap};
use serde_json::Value;

use crate::error::{PersonioError, Result};

/// Exchange client credentials for an API token.
pub(crate) fn fetch_token(
    http: &Client,
    base_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<String> {
    let url = format!(
        "{}/auth?client_id={}&client_secret={}",
        base_url,
        urlencoding::encode(client_id),
        urlencoding::encode(client_secret)
    );

    let resp = http
        .post(&url)
        .header("Accept", "application/json")
        .send()?;

    if !resp.status().is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(PersonioError::Authentication(body));
    }

    let json: Value = resp.json()?;
    token_from_auth_response(&json)
}

fn token_from_auth_response(json: &Value) -> Result<String> {
    let token = json
        .get("data")
        .and_then(|data| data.get("token"))
        .and_then(|token| token.as_str())
        .ok_or_else(|| PersonioError::Authentication("No token in response".to_string()))?;

    if token.trim().is_empty() {
        return Err(PersonioError::Authentication(
            "Access token was empty".to_string(),
        ));
    }
    Ok(token.to_string())
}

/// Replacement token sent in a response's `Authorization` header, if any.
pub(crate) fn rotated_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
