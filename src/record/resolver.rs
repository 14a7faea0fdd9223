use futures_util::future::join_all;

use crate::gateway::{BlobGateway, GatewayError};
use crate::models::Attachment;

use super::types::ResolvedAttachment;

/// Converts opaque storage paths into displayable URLs.
///
/// No cache, no expiry tracking: every `resolve_all` call issues fresh
/// exchanges, which is how re-resolution after the signed URL's validity
/// window works. Legacy entries that stored full URLs pass through without
/// touching the gateway.
pub struct AttachmentResolver<B> {
    gateway: B,
}

impl<B: BlobGateway> AttachmentResolver<B> {
    pub fn new(gateway: B) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &B {
        &self.gateway
    }

    /// Exchange one storage path for a displayable URL.
    pub async fn resolve(&self, path: &str) -> Result<String, GatewayError> {
        if is_absolute_url(path) {
            return Ok(path.to_string());
        }
        self.gateway.sign_url(path).await
    }

    /// Resolve a whole attachment list, fanned out concurrently.
    ///
    /// Partial-failure tolerant: an attachment whose exchange fails is
    /// dropped from the result and logged, and never cancels the others.
    pub async fn resolve_all(&self, attachments: &[Attachment]) -> Vec<ResolvedAttachment> {
        let resolutions = attachments
            .iter()
            .map(|attachment| async move { (attachment, self.resolve(&attachment.storage_path).await) });

        join_all(resolutions)
            .await
            .into_iter()
            .filter_map(|(attachment, result)| match result {
                Ok(url) => Some(ResolvedAttachment {
                    attachment: attachment.clone(),
                    url,
                }),
                Err(err) => {
                    tracing::warn!(
                        filename = %attachment.filename,
                        %err,
                        "dropping attachment: signed URL exchange failed"
                    );
                    None
                }
            })
            .collect()
    }
}

fn is_absolute_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}
