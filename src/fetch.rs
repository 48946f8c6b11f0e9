use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;

const USER_AGENT: &str = concat!("recipe_scraper/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("page not found: {0}")]
    NotFound(String),

    #[error("GET {url} returned status {status}")]
    Status { url: String, status: StatusCode },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Shared HTTP client for a whole run. Fetches happen one at a time, so
/// one connection pool is all we need.
pub fn client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("failed to build HTTP client")
}

/// Fetch a page body. 404 gets its own variant: listing pagination treats
/// it as the end-of-data signal rather than a failure.
pub async fn get(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await?;
    match response.status() {
        StatusCode::NOT_FOUND => Err(FetchError::NotFound(url.to_string())),
        status if !status.is_success() => Err(FetchError::Status {
            url: url.to_string(),
            status,
        }),
        _ => Ok(response.text().await?),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn not_found_is_its_own_variant() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/gone")
            .with_status(404)
            .create_async()
            .await;

        let err = get(&client(), &format!("{}/gone", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NotFound(_)));
    }

    #[tokio::test]
    async fn server_errors_carry_the_status() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/boom")
            .with_status(500)
            .create_async()
            .await;

        let err = get(&client(), &format!("{}/boom", server.url()))
            .await
            .unwrap_err();
        match err {
            FetchError::Status { status, .. } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn ok_returns_the_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/page")
            .with_body("<html></html>")
            .create_async()
            .await;

        let body = get(&client(), &format!("{}/page", server.url()))
            .await
            .unwrap();
        assert_eq!(body, "<html></html>");
    }
}
