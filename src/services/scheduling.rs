use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{DeletionCriteria, TimeSlot, User};

/// Data-access seam to the scheduling backend. The understanding core never
/// touches this; only dispatch issues reads and writes, after classification
/// has decided what the user asked for. User identity lookup is part of the
/// capability rather than a module-level table.
#[async_trait]
pub trait SchedulingApi: Send + Sync {
    async fn resolve_user(&self, platform_id: &str) -> anyhow::Result<Option<User>>;
    async fn get_availability(&self, user_id: &str) -> anyhow::Result<Vec<TimeSlot>>;
    async fn add_slots(&self, user_id: &str, slots: &[TimeSlot]) -> anyhow::Result<()>;
    async fn remove_slots(
        &self,
        user_id: &str,
        criteria: &DeletionCriteria,
    ) -> anyhow::Result<usize>;
    async fn clear_availability(&self, user_id: &str) -> anyhow::Result<()>;
    /// Cancels the user's next booked session, returning its description, or
    /// `None` when nothing is booked.
    async fn cancel_next_session(&self, user_id: &str) -> anyhow::Result<Option<String>>;
}

pub struct HttpSchedulingApi {
    base_url: String,
    api_token: String,
    client: reqwest::Client,
}

impl HttpSchedulingApi {
    pub fn new(base_url: String, api_token: String) -> Self {
        Self {
            base_url,
            api_token,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct SlotsPayload {
    slots: Vec<TimeSlot>,
}

#[derive(Deserialize)]
struct RemovedResponse {
    removed: usize,
}

#[derive(Deserialize)]
struct CancelResponse {
    description: String,
}

#[async_trait]
impl SchedulingApi for HttpSchedulingApi {
    async fn resolve_user(&self, platform_id: &str) -> anyhow::Result<Option<User>> {
        let url = format!("{}/users/by-platform-id/{platform_id}", self.base_url);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .context("failed to call scheduling API for user lookup")?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let user = resp
            .error_for_status()
            .context("scheduling API returned error on user lookup")?
            .json::<User>()
            .await
            .context("failed to parse user from scheduling API")?;
        Ok(Some(user))
    }

    async fn get_availability(&self, user_id: &str) -> anyhow::Result<Vec<TimeSlot>> {
        let url = format!("{}/users/{user_id}/availability", self.base_url);
        let payload = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .context("failed to fetch availability")?
            .error_for_status()
            .context("scheduling API returned error on availability fetch")?
            .json::<SlotsPayload>()
            .await
            .context("failed to parse availability payload")?;
        Ok(payload.slots)
    }

    async fn add_slots(&self, user_id: &str, slots: &[TimeSlot]) -> anyhow::Result<()> {
        let url = format!("{}/users/{user_id}/availability", self.base_url);
        self.client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&SlotsPayload {
                slots: slots.to_vec(),
            })
            .send()
            .await
            .context("failed to add slots")?
            .error_for_status()
            .context("scheduling API rejected slot addition")?;
        Ok(())
    }

    async fn remove_slots(
        &self,
        user_id: &str,
        criteria: &DeletionCriteria,
    ) -> anyhow::Result<usize> {
        let url = format!("{}/users/{user_id}/availability/delete", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(criteria)
            .send()
            .await
            .context("failed to remove slots")?
            .error_for_status()
            .context("scheduling API rejected slot removal")?
            .json::<RemovedResponse>()
            .await
            .context("failed to parse removal response")?;
        Ok(resp.removed)
    }

    async fn clear_availability(&self, user_id: &str) -> anyhow::Result<()> {
        let url = format!("{}/users/{user_id}/availability", self.base_url);
        self.client
            .delete(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .context("failed to clear availability")?
            .error_for_status()
            .context("scheduling API rejected availability clear")?;
        Ok(())
    }

    async fn cancel_next_session(&self, user_id: &str) -> anyhow::Result<Option<String>> {
        let url = format!("{}/users/{user_id}/sessions/next/cancel", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .context("failed to cancel session")?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let cancelled = resp
            .error_for_status()
            .context("scheduling API rejected session cancellation")?
            .json::<CancelResponse>()
            .await
            .context("failed to parse cancellation response")?;
        Ok(Some(cancelled.description))
    }
}
