use std::time::Duration;

use reqwest::{
    Client,
    Response,
};

use crate::core::FlicktionaryError;

const USER_AGENT: &str = "flicktionary/0.1 (+reqwest)";

// Generation over a full subtitle transcript can take minutes.
const REQUEST_TIMEOUT_SECS: u64 = 300;

pub fn http_client() -> Result<Client, FlicktionaryError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| FlicktionaryError::Custom(format!("HTTP client build failed: {e}")))
}

pub async fn ensure_success(resp: Response) -> Result<Response, FlicktionaryError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let url = resp.url().to_string();
    let body = resp.text().await.unwrap_or_default();
    Err(FlicktionaryError::Generation(format!(
        "HTTP error {} from {}: {}",
        status,
        url,
        body.trim()
    )))
}
