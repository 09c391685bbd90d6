use crate::client::Client;
use crate::error::Result;
use crate::factory::DomainResult;
use crate::http::RequestSpec;

impl Client {
    /// List the users of the enterprise account.
    pub fn users(&self) -> Result<DomainResult> {
        self.request_with_object(RequestSpec::get("/enterprise/users"))
    }
}
