//! Generic HTTP fetching with status classification and JSON error handling

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

use crate::constants::AUTH_HEADER;
use crate::error::AppError;

/// Fetches `url` once and parses the body as `T`.
///
/// There is no retry loop. Non-success statuses, transport failures and
/// unparseable bodies are mapped onto the matching [`AppError`] variant so
/// the caller can log a precise reason and fall back.
#[instrument(skip(client, api_key))]
pub async fn fetch<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    api_key: &str,
) -> Result<T, AppError> {
    debug!("Fetching data from URL: {url}");

    let response = match client.get(url).header(AUTH_HEADER, api_key).send().await {
        Ok(resp) => resp,
        Err(e) => {
            error!("Request failed for URL {}: {}", url, e);
            return Err(classify_request_error(e, url));
        }
    };

    let status = response.status();
    debug!("Response status: {status}");

    if !status.is_success() {
        let status_code = status.as_u16();
        let reason = status.canonical_reason().unwrap_or("Unknown error");

        error!("HTTP {} - {} (URL: {})", status_code, reason, url);

        return Err(match status_code {
            404 => AppError::api_not_found(url),
            429 => AppError::api_rate_limit(reason, url),
            400..=499 => AppError::api_client_error(status_code, reason, url),
            502 | 503 => AppError::api_service_unavailable(status_code, reason, url),
            _ => AppError::api_server_error(status_code, reason, url),
        });
    }

    let response_text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read response text from URL {}: {}", url, e);
            return Err(classify_request_error(e, url));
        }
    };

    debug!("Response length: {} bytes", response_text.len());
    parse_body(&response_text, url)
}

/// Parses a response body, telling an empty body, non-JSON text and
/// well-formed JSON of the wrong shape apart.
pub fn parse_body<T: DeserializeOwned>(body: &str, url: &str) -> Result<T, AppError> {
    serde_json::from_str::<T>(body).map_err(|e| {
        error!("Failed to parse API response: {} (URL: {})", e, url);
        error!(
            "Response text (first 200 chars): {}",
            body.chars().take(200).collect::<String>()
        );

        let trimmed = body.trim_start();
        if trimmed.is_empty() {
            AppError::api_no_data("Response body is empty", url)
        } else if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
            AppError::api_malformed_json("Response is not valid JSON", url)
        } else if e.is_syntax() || e.is_eof() {
            AppError::api_malformed_json(e.to_string(), url)
        } else {
            AppError::api_unexpected_structure(e.to_string(), url)
        }
    })
}

fn classify_request_error(e: reqwest::Error, url: &str) -> AppError {
    if e.is_timeout() {
        AppError::network_timeout(url)
    } else if e.is_connect() {
        AppError::network_connection(url, e.to_string())
    } else {
        AppError::ApiFetch(e)
    }
}
