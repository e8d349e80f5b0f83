//! Scoped ownership of an uploaded image.
//!
//! [`StagedMedia`] is created by a successful upload and must end in exactly
//! one delete. The normal path calls [`StagedMedia::release`]; if the owning
//! future is dropped first (caller gave up on the run), `Drop` spawns the
//! delete on the current tokio runtime instead.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::gateway::{cancellable, GatewayError, MediaReference, MediaStager};

pub struct StagedMedia {
    stager: Arc<dyn MediaStager>,
    reference: MediaReference,
    released: bool,
}

impl StagedMedia {
    /// Upload `bytes` and take ownership of the resulting reference.
    pub async fn stage(
        stager: Arc<dyn MediaStager>,
        bytes: Vec<u8>,
        mime_type: &str,
        display_name: &str,
        cancel: &CancellationToken,
    ) -> Result<Self, GatewayError> {
        let reference =
            cancellable(cancel, stager.upload(bytes, mime_type, display_name)).await?;
        log::debug!("staged image as {} ({})", reference.name, reference.uri);

        Ok(Self {
            stager,
            reference,
            released: false,
        })
    }

    pub fn reference(&self) -> &MediaReference {
        &self.reference
    }

    /// Delete the blob. Failures (including cancellation) are logged and
    /// swallowed.
    pub async fn release(mut self, cancel: &CancellationToken) {
        self.released = true;
        let name = &self.reference.name;
        match cancellable(cancel, self.stager.delete(name)).await {
            Ok(()) => log::debug!("deleted staged image {name}"),
            Err(e) => log::warn!("failed to delete staged image {name}: {e}"),
        }
    }
}

impl Drop for StagedMedia {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        let name = self.reference.name.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let stager = Arc::clone(&self.stager);
                handle.spawn(async move {
                    if let Err(e) = stager.delete(&name).await {
                        log::warn!("failed to delete abandoned staged image {name}: {e}");
                    }
                });
            }
            Err(_) => {
                log::warn!("no runtime to delete abandoned staged image {name}");
            }
        }
    }
}
