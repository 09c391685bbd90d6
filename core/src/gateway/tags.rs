use serde_json::json;

use super::{escape, join_ids};
use crate::client::Client;
use crate::error::Result;
use crate::factory::DomainResult;
use crate::http::RequestSpec;

impl Client {
    /// List the tags created by the user.
    pub fn user_tags(&self) -> Result<DomainResult> {
        self.request_with_object(RequestSpec::get("/tags"))
    }

    /// List enterprise tags (enterprise accounts only).
    pub fn enterprise_tags(&self) -> Result<DomainResult> {
        self.request_with_object(RequestSpec::get("/enterprise/tags"))
    }

    pub fn tag_entry<S: AsRef<str>>(&self, entry_id: &str, tag_ids: &[S]) -> Result<DomainResult> {
        self.tag_entries(&[entry_id], tag_ids)
    }

    /// Apply every tag in `tag_ids` to every entry in `entry_ids`.
    pub fn tag_entries<E, T>(&self, entry_ids: &[E], tag_ids: &[T]) -> Result<DomainResult>
    where
        E: AsRef<str>,
        T: AsRef<str>,
    {
        let entry_ids: Vec<&str> = entry_ids.iter().map(AsRef::as_ref).collect();
        self.request_with_object(
            RequestSpec::put(format!("/tags/{}", join_ids(tag_ids)))
                .params(json!({ "entryIds": entry_ids })),
        )
    }

    pub fn untag_entry<S: AsRef<str>>(&self, entry_id: &str, tag_ids: &[S]) -> Result<DomainResult> {
        self.untag_entries(&[entry_id], tag_ids)
    }

    /// Remove every tag in `tag_ids` from every entry in `entry_ids`.
    pub fn untag_entries<E, T>(&self, entry_ids: &[E], tag_ids: &[T]) -> Result<DomainResult>
    where
        E: AsRef<str>,
        T: AsRef<str>,
    {
        self.request_with_object(RequestSpec::delete(format!(
            "/tags/{}/{}",
            join_ids(tag_ids),
            join_ids(entry_ids)
        )))
    }

    pub fn change_tag_label(&self, tag_id: &str, new_label: &str) -> Result<DomainResult> {
        self.request_with_object(
            RequestSpec::post(format!("/tags/{}", escape(tag_id))).params(json!({ "label": new_label })),
        )
    }

    pub fn delete_tag(&self, tag_id: &str) -> Result<DomainResult> {
        self.delete_tags(&[tag_id])
    }

    pub fn delete_tags<S: AsRef<str>>(&self, tag_ids: &[S]) -> Result<DomainResult> {
        self.request_with_object(RequestSpec::delete(format!("/tags/{}", join_ids(tag_ids))))
    }
}
