use crate::client::Client;
use crate::error::Result;
use crate::factory::DomainResult;
use crate::http::RequestSpec;

impl Client {
    /// Export the user's subscriptions. The API answers with XML, so the
    /// result is a `DomainResult::Document`.
    pub fn opml(&self) -> Result<DomainResult> {
        self.request_with_object(RequestSpec::get("/opml"))
    }
}
