//! Client certificate authentication.

use futures_util::future::BoxFuture;
use rustls::pki_types::CertificateDer;

use crate::error::GatewayError;
use crate::gemini::middleware::{Interceptor, Next, RequestContext};
use crate::gemini::Response;
use crate::store::{CredentialRecord, CredentialStore, Fingerprint};

/// The Miniflux account a request acts as.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub fingerprint: Fingerprint,
    pub instance: String,
    pub token: String,
}

impl Identity {
    fn from_record(fingerprint: Fingerprint, record: CredentialRecord) -> Self {
        Self {
            fingerprint,
            instance: record.instance,
            token: record.token,
        }
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("fingerprint", &self.fingerprint)
            .field("instance", &self.instance)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Resolves the peer certificate to an enrolled identity.
///
/// Answers 60 when no certificate was presented, 61 (with the fingerprint)
/// when the certificate is not enrolled, and 50 on storage failure.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    store: CredentialStore,
}

impl IdentityResolver {
    pub fn new(store: CredentialStore) -> Self {
        Self { store }
    }

    /// Look up the leaf of `chain`.
    pub async fn resolve(&self, chain: &[CertificateDer<'_>]) -> Result<Identity, GatewayError> {
        let leaf = chain.first().ok_or(GatewayError::CertificateRequired)?;
        let fingerprint = Fingerprint::of_certificate(leaf.as_ref());

        match self.store.lookup(&fingerprint).await? {
            Some(record) => Ok(Identity::from_record(fingerprint, record)),
            None => Err(GatewayError::CertificateNotAuthorized { fingerprint }),
        }
    }
}

impl Interceptor for IdentityResolver {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn intercept<'a>(&'a self, mut ctx: RequestContext, next: Next<'a>) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let resolved = self.resolve(&ctx.peer_certificates).await;
            match resolved {
                Ok(identity) => {
                    tracing::debug!(fingerprint = %identity.fingerprint, "Client authenticated");
                    ctx.identity = Some(identity);
                    next.run(ctx).await
                }
                Err(e) => e.into_response(),
            }
        })
    }
}
