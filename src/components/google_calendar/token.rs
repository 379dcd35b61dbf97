use crate::config::Config;
use crate::error::{google_calendar_error, BotResult};
use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// OAuth token shared by the Sheets and Calendar clients, persisted as JSON on disk
#[derive(Clone)]
pub struct TokenManager {
    config: Arc<Config>,
    token_path: PathBuf,
    client: Client,
}

impl TokenManager {
    pub fn new(config: Arc<Config>) -> Self {
        let token_path = PathBuf::from(&config.token_path);
        Self {
            config,
            token_path,
            client: Client::new(),
        }
    }

    /// Get OAuth token from the store, refreshing it if it has expired
    pub async fn get_token(&self) -> BotResult<Value> {
        let token_str = tokio::fs::read_to_string(&self.token_path)
            .await
            .map_err(|e| {
                google_calendar_error(&format!(
                    "No token at {} ({}). Run get_calendar_token first.",
                    self.token_path.display(),
                    e
                ))
            })?;

        let token: Value = serde_json::from_str(&token_str)
            .map_err(|e| google_calendar_error(&format!("Failed to parse token JSON: {}", e)))?;

        if let Some(expiry) = token.get("expires_at").and_then(|v| v.as_i64()) {
            // Refresh a minute early so the token does not expire mid-batch
            if expiry - 60 > Utc::now().timestamp() {
                return Ok(token);
            }
        }

        debug!("Stored token expired, refreshing");
        self.refresh_token(&token).await
    }

    /// Bearer access token for API requests
    pub async fn access_token(&self) -> BotResult<String> {
        let token = self.get_token().await?;
        token
            .get("access_token")
            .and_then(|t| t.as_str())
            .map(|t| t.to_string())
            .ok_or_else(|| google_calendar_error("No access token available"))
    }

    /// Refresh an expired token
    async fn refresh_token(&self, token: &Value) -> BotResult<Value> {
        let refresh_token = token
            .get("refresh_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| google_calendar_error("No refresh token in token data"))?;

        let params = [
            ("client_id", self.config.google_client_id.clone()),
            ("client_secret", self.config.google_client_secret.clone()),
            ("refresh_token", refresh_token.to_string()),
            ("grant_type", "refresh_token".to_string()),
        ];

        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let new_token: Value = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse token response: {}", e)))?;

        let access_token = new_token
            .get("access_token")
            .cloned()
            .ok_or_else(|| google_calendar_error("Token response missing 'access_token' field"))?;

        let expires_in = new_token
            .get("expires_in")
            .and_then(|v| v.as_i64())
            .unwrap_or(3600);

        // Google does not always send a new refresh token, keep the old one
        let token_json = json!({
            "access_token": access_token,
            "refresh_token": refresh_token,
            "expires_at": Utc::now().timestamp() + expires_in,
        });

        self.set_token(token_json.clone()).await?;
        info!("Refreshed Google API token");

        Ok(token_json)
    }

    /// Write a token to the store, creating its directory if needed
    pub async fn set_token(&self, token_json: Value) -> BotResult<()> {
        if let Some(parent) = self.token_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.token_path, serde_json::to_string_pretty(&token_json)?).await?;
        Ok(())
    }
}
