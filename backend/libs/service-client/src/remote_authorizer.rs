use async_trait::async_trait;
use session_authz::{Authorizer, Role, Verdict};

use crate::http_client::ServiceClient;
use crate::target::ServiceTarget;

/// Path template of the auth service's verification endpoint.
pub const VERIFY_PATH: &str = "/api/v1/verify/{}";

/// Asks the auth service for a verdict instead of holding the shared key.
///
/// The endpoint answers `200` for every outcome, so only the `authorised`
/// field is read. No answer, or an answer that does not decode, is a denial.
#[derive(Debug, Clone)]
pub struct RemoteAuthorizer {
    client: ServiceClient,
    host: String,
    port: u16,
}

impl RemoteAuthorizer {
    pub fn new(client: ServiceClient, host: impl Into<String>, port: u16) -> Self {
        Self {
            client,
            host: host.into(),
            port,
        }
    }

    pub async fn verify(&self, session: &str, required: Role) -> Verdict {
        let target = ServiceTarget::new(&self.host, self.port, VERIFY_PATH).param(required);

        self.client
            .get_json::<Verdict>(&target, session)
            .await
            .unwrap_or(Verdict::DENIED)
    }
}

#[async_trait]
impl Authorizer for RemoteAuthorizer {
    async fn authorise(&self, session: &str, required: Role) -> Verdict {
        self.verify(session, required).await
    }
}
