//! DTOs for the feed API.
//!
//! # Design
//! Results stay untyped `Resource`s unless a caller asks for one of these via
//! `Resource::deserialize`. The mock-server crate defines its own copies;
//! integration tests catch drift between the two.

use serde::{Deserialize, Serialize};

/// A user or enterprise tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// An enterprise trigger that posts to a webhook URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Webhook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "webhookURL")]
    pub webhook_url: String,
    #[serde(rename = "resourceId")]
    pub resource_id: String,
    #[serde(default)]
    pub disabled: bool,
}
