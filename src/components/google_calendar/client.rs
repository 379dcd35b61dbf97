use super::models::{CalendarEvent, NewCalendarEvent, TimeWindow};
use super::time::{format_local, to_rfc3339_in};
use super::token::TokenManager;
use crate::components::CalendarService;
use crate::error::{google_calendar_error, BotResult};
use async_trait::async_trait;
use chrono_tz::Tz;
use reqwest::{Client, Response};
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

const CALENDARS_API: &str = "https://www.googleapis.com/calendar/v3/calendars";
const PAGE_SIZE: &str = "2500";

/// Calendar v3 API client, event times are sent in `tz`
#[derive(Clone)]
pub struct GoogleCalendarClient {
    token_manager: TokenManager,
    client: Client,
    tz: Tz,
}

impl GoogleCalendarClient {
    pub fn new(token_manager: TokenManager, tz: Tz) -> Self {
        Self {
            token_manager,
            client: Client::new(),
            tz,
        }
    }

    /// URL of the events collection of a calendar, or of one event in it
    fn events_url(calendar_id: &str, event_id: Option<&str>) -> BotResult<Url> {
        let mut url = Url::parse(CALENDARS_API)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| google_calendar_error("Calendar API URL cannot be a base"))?;
            segments.push(calendar_id).push("events");
            if let Some(event_id) = event_id {
                segments.push(event_id);
            }
        }
        Ok(url)
    }

    /// Turn a non-success response into an error
    async fn check_status(response: Response, action: &str) -> BotResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        Err(google_calendar_error(&format!(
            "Failed to {}: HTTP {} - {}",
            action, status, error_body
        )))
    }

    fn event_body(&self, event: &NewCalendarEvent) -> Value {
        let tz = self.tz.name();
        json!({
            "summary": event.summary,
            "description": event.description,
            "location": event.location,
            "start": { "dateTime": format_local(&event.start), "timeZone": tz },
            "end": { "dateTime": format_local(&event.end), "timeZone": tz },
        })
    }
}

#[async_trait]
impl CalendarService for GoogleCalendarClient {
    async fn create_event(
        &self,
        calendar_id: &str,
        event: &NewCalendarEvent,
    ) -> BotResult<CalendarEvent> {
        let access_token = self.token_manager.access_token().await?;
        let url = Self::events_url(calendar_id, None)?;

        let response = self
            .client
            .post(url)
            .bearer_auth(access_token)
            .json(&self.event_body(event))
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to create event: {}", e)))?;
        let response = Self::check_status(response, "create event").await?;

        let created: Value = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse created event: {}", e)))?;

        let created = CalendarEvent::from_api(&created);
        debug!("Created event {} ({})", created.id, event.summary);
        Ok(created)
    }

    async fn list_events(
        &self,
        calendar_id: &str,
        window: &TimeWindow,
    ) -> BotResult<Vec<CalendarEvent>> {
        let access_token = self.token_manager.access_token().await?;
        let time_min = to_rfc3339_in(&self.tz, &window.start)?;
        let time_max = to_rfc3339_in(&self.tz, &window.end)?;

        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = Self::events_url(calendar_id, None)?;
            {
                let mut query = url.query_pairs_mut();
                query
                    .append_pair("timeMin", &time_min)
                    .append_pair("timeMax", &time_max)
                    .append_pair("maxResults", PAGE_SIZE);
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let response = self
                .client
                .get(url)
                .bearer_auth(&access_token)
                .send()
                .await
                .map_err(|e| google_calendar_error(&format!("Failed to fetch events: {}", e)))?;
            let response = Self::check_status(response, "fetch events").await?;

            let response_data: Value = response.json().await.map_err(|e| {
                google_calendar_error(&format!("Failed to parse events response: {}", e))
            })?;

            let items = response_data
                .get("items")
                .and_then(|i| i.as_array())
                .ok_or_else(|| google_calendar_error("No items in response"))?;
            events.extend(items.iter().map(CalendarEvent::from_api));

            page_token = response_data
                .get("nextPageToken")
                .and_then(|t| t.as_str())
                .map(|t| t.to_string());
            if page_token.is_none() {
                break;
            }
        }

        debug!("Listed {} events from {}", events.len(), calendar_id);
        Ok(events)
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> BotResult<()> {
        let access_token = self.token_manager.access_token().await?;
        let url = Self::events_url(calendar_id, Some(event_id))?;

        let response = self
            .client
            .delete(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to delete event: {}", e)))?;
        Self::check_status(response, "delete event").await?;

        debug!("Deleted event {}", event_id);
        Ok(())
    }
}
