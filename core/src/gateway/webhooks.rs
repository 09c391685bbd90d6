use super::escape;
use crate::client::Client;
use crate::error::{Error, Result};
use crate::factory::DomainResult;
use crate::http::RequestSpec;
use crate::types::Webhook;

// The API calls these "triggers"; both names are exposed.
impl Client {
    /// List webhooks (enterprise accounts only).
    pub fn webhooks(&self) -> Result<DomainResult> {
        self.request_with_object(RequestSpec::get("/enterprise/triggers"))
    }

    pub fn triggers(&self) -> Result<DomainResult> {
        self.webhooks()
    }

    /// Create a webhook, or update it when `webhook.id` is set.
    pub fn webhooks_update(&self, webhook: &Webhook) -> Result<DomainResult> {
        let params = serde_json::to_value(webhook).map_err(|e| Error::Client(e.to_string()))?;
        self.request_with_object(RequestSpec::post("/enterprise/triggers").params(params))
    }

    pub fn triggers_update(&self, webhook: &Webhook) -> Result<DomainResult> {
        self.webhooks_update(webhook)
    }

    /// Trigger ids look like `enterprise/<org>/trigger/<uuid>`, so the id is
    /// escaped into a single path segment.
    pub fn webhooks_delete(&self, webhook_id: &str) -> Result<DomainResult> {
        self.request_with_object(RequestSpec::delete(format!(
            "/enterprise/triggers/{}",
            escape(webhook_id)
        )))
    }

    pub fn triggers_delete(&self, webhook_id: &str) -> Result<DomainResult> {
        self.webhooks_delete(webhook_id)
    }
}
