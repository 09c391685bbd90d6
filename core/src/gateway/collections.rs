use crate::client::Client;
use crate::error::Result;
use crate::factory::DomainResult;
use crate::http::RequestSpec;

impl Client {
    /// List enterprise collections (enterprise accounts only).
    pub fn enterprise_collections(&self) -> Result<DomainResult> {
        self.request_with_object(RequestSpec::get("/enterprise/collections"))
    }
}
