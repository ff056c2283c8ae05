use async_trait::async_trait;
use crypto_core::Role;

use crate::decision::AccessPolicy;
use crate::service::{AuthorizationService, Verdict};

/// Anything that can turn a raw `session` header into a verdict.
///
/// Implemented in-process by [`AuthorizationService`] and remotely by
/// `service_client::RemoteAuthorizer`. Implementations never fail.
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn authorise(&self, session: &str, required: Role) -> Verdict;
}

#[async_trait]
impl<P: AccessPolicy> Authorizer for AuthorizationService<P> {
    async fn authorise(&self, session: &str, required: Role) -> Verdict {
        self.verify(session, required)
    }
}
