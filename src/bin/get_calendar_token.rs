use serde_json::json;
use sheet_calendar_sync::components::google_calendar::TokenManager;
use sheet_calendar_sync::config::Config;
use sheet_calendar_sync::error::{other_error, BotResult};
use std::sync::Arc;
use url::Url;

const REDIRECT_URI: &str = "http://localhost:8080";
const SCOPES: &str = "https://www.googleapis.com/auth/calendar \
                      https://www.googleapis.com/auth/spreadsheets.readonly";

#[tokio::main]
async fn main() -> BotResult<()> {
    // Load configuration
    let config = Arc::new(Config::load()?);
    let token_manager = TokenManager::new(Arc::clone(&config));

    // Generate random state for security
    let state = uuid::Uuid::new_v4().to_string();

    // Construct authorization URL
    let mut auth_url = Url::parse("https://accounts.google.com/o/oauth2/v2/auth")
        .map_err(|e| other_error(&format!("Failed to parse URL: {}", e)))?;
    auth_url
        .query_pairs_mut()
        .append_pair("client_id", &config.google_client_id)
        .append_pair("redirect_uri", REDIRECT_URI)
        .append_pair("response_type", "code")
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent")
        .append_pair("scope", SCOPES)
        .append_pair("state", &state);

    // Open browser for authorization
    println!("Opening browser for Google authorization...");
    println!("If it does not open, visit: {}", auth_url);
    webbrowser::open(auth_url.as_str())?;

    // Start local server to receive the callback
    let server = tiny_http::Server::http("127.0.0.1:8080")
        .map_err(|e| other_error(&format!("Failed to start callback server: {}", e)))?;
    println!("Waiting for authorization callback...");

    let request = server.recv()?;
    let callback = Url::parse(&format!("{}{}", REDIRECT_URI, request.url()))
        .map_err(|e| other_error(&format!("Invalid callback URL: {}", e)))?;

    let param = |name: &str| {
        callback
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    };

    if param("state").as_deref() != Some(state.as_str()) {
        return Err(other_error("Authorization state mismatch"));
    }
    let code = param("code").ok_or_else(|| other_error("No authorization code found in callback"))?;

    // Exchange code for tokens
    let client = reqwest::Client::new();
    let response = client
        .post("https://oauth2.googleapis.com/token")
        .form(&[
            ("client_id", config.google_client_id.clone()),
            ("client_secret", config.google_client_secret.clone()),
            ("code", code),
            ("redirect_uri", REDIRECT_URI.to_string()),
            ("grant_type", "authorization_code".to_string()),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        let error_text = response.text().await?;
        return Err(other_error(&format!("Failed to get token: {}", error_text)));
    }

    let mut token_data: serde_json::Value = response.json().await?;

    // Add expiry timestamp
    let expires_in = token_data
        .get("expires_in")
        .and_then(|v| v.as_i64())
        .unwrap_or(3600);
    let expires_at = chrono::Utc::now().timestamp() + expires_in;

    let token_data = if let Some(obj) = token_data.as_object_mut() {
        obj.insert("expires_at".to_string(), json!(expires_at));
        token_data
    } else {
        return Err(other_error("Token data is not an object"));
    };

    token_manager.set_token(token_data).await?;

    let response =
        tiny_http::Response::from_string("Authorization successful! You can close this window.");
    request.respond(response)?;

    println!("Token saved to {}", config.token_path);

    Ok(())
}
