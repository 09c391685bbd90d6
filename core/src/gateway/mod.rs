//! Endpoint methods, one thin caller of `Client::request_with_object` each.

mod collections;
mod opml;
mod tags;
mod users;
mod webhooks;

/// Join ids into one path segment: each id form-escaped (`/` becomes `%2F`,
/// space becomes `+`), then comma separated.
pub(crate) fn join_ids<S: AsRef<str>>(ids: &[S]) -> String {
    ids.iter()
        .map(|id| escape(id.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

pub(crate) fn escape(id: &str) -> String {
    url::form_urlencoded::byte_serialize(id.as_bytes()).collect()
}
