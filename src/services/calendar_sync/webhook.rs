use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{CalendarSync, SyncAck, SyncPayload};

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// JSON body accepted by the sync webhook.
#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct WebhookPayload<'a> {
    action: &'static str,
    event_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    google_event_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
struct WebhookResponse {
    #[serde(default)]
    google_event_id: Option<String>,
}

fn format_instant(value: NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

fn default_instant(day: NaiveDate, hour: u32) -> String {
    let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
    format_instant(day.and_time(time))
}

/// Create payload; missing times fall back to 09:00-10:00 on the event's day.
pub(crate) fn create_payload<'a>(event_id: &'a str, payload: &'a SyncPayload) -> WebhookPayload<'a> {
    WebhookPayload {
        action: "create",
        event_id,
        google_event_id: None,
        title: Some(&payload.title),
        date: Some(payload.day.format("%Y-%m-%d").to_string()),
        start_time: Some(
            payload
                .start
                .map(format_instant)
                .unwrap_or_else(|| default_instant(payload.day, 9)),
        ),
        end_time: Some(
            payload
                .end
                .map(format_instant)
                .unwrap_or_else(|| default_instant(payload.day, 10)),
        ),
        notes: payload.notes.as_deref(),
    }
}

pub(crate) fn update_payload<'a>(
    event_id: &'a str,
    external_sync_id: &'a str,
    payload: &'a SyncPayload,
) -> WebhookPayload<'a> {
    WebhookPayload {
        action: "update",
        event_id,
        google_event_id: Some(external_sync_id),
        title: Some(&payload.title),
        date: Some(payload.day.format("%Y-%m-%d").to_string()),
        start_time: payload.start.map(format_instant),
        end_time: payload.end.map(format_instant),
        notes: payload.notes.as_deref(),
    }
}

pub(crate) fn delete_payload<'a>(event_id: &'a str, external_sync_id: &'a str) -> WebhookPayload<'a> {
    WebhookPayload {
        action: "delete",
        event_id,
        google_event_id: Some(external_sync_id),
        title: None,
        date: None,
        start_time: None,
        end_time: None,
        notes: None,
    }
}

/// [`CalendarSync`] that posts each change to an automation webhook.
#[derive(Debug, Clone)]
pub struct WebhookCalendarSync {
    client: Client,
    endpoint: Url,
}

impl WebhookCalendarSync {
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid calendar sync webhook URL: {}", endpoint))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(anyhow!(
                "Calendar sync webhook must use HTTP(S), got {}",
                endpoint.scheme()
            ));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build calendar sync HTTP client")?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn post(&self, body: &WebhookPayload<'_>) -> Result<SyncAck> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(body)
            .send()
            .await
            .with_context(|| format!("Calendar sync {} request failed", body.action))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!(
                "Calendar sync webhook returned {} for {} of {}",
                status,
                body.action,
                body.event_id
            );
            return Err(anyhow!("Calendar sync webhook returned {}", status));
        }

        let parsed: WebhookResponse = response
            .json()
            .await
            .context("Calendar sync webhook returned an unreadable response")?;

        Ok(SyncAck {
            external_sync_id: parsed.google_event_id.filter(|id| !id.is_empty()),
        })
    }
}

#[async_trait]
impl CalendarSync for WebhookCalendarSync {
    async fn sync_create(&self, event_id: &str, payload: &SyncPayload) -> Result<SyncAck> {
        self.post(&create_payload(event_id, payload)).await
    }

    async fn sync_update(
        &self,
        event_id: &str,
        external_sync_id: Option<&str>,
        payload: &SyncPayload,
    ) -> Result<SyncAck> {
        match external_sync_id {
            Some(external_id) => self.post(&update_payload(event_id, external_id, payload)).await,
            None => self.sync_create(event_id, payload).await,
        }
    }

    async fn sync_delete(&self, event_id: &str, external_sync_id: Option<&str>) -> Result<SyncAck> {
        match external_sync_id {
            Some(external_id) => self.post(&delete_payload(event_id, external_id)).await,
            None => Ok(SyncAck::default()),
        }
    }
}
