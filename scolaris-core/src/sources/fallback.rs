//! Remote-first source with a local fallback
//!
//! Every call goes to the primary source first. When the primary fails, the
//! same call is served by the local source and the answer is marked as not
//! coming from the API. A failure of the local source is what the caller sees.

use async_trait::async_trait;
use tracing::warn;

use crate::sync::{DataSource, Entity, EntityId, Fetched, Patch, SourceResult, Synced};

/// Data source that falls back to `L` whenever `P` fails
pub struct FallbackSource<P, L> {
    primary: P,
    local: L,
}

impl<P, L> FallbackSource<P, L> {
    pub fn new(primary: P, local: L) -> Self {
        Self { primary, local }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn local(&self) -> &L {
        &self.local
    }
}

#[async_trait]
impl<T, P, L> DataSource<T> for FallbackSource<P, L>
where
    T: Entity,
    P: DataSource<T>,
    L: DataSource<T>,
{
    async fn fetch_all(&self) -> SourceResult<Fetched<T>> {
        match self.primary.fetch_all().await {
            Ok(fetched) => Ok(fetched),
            Err(e) => {
                warn!(entity = T::NAME, op = "fetch_all", error = %e, "Primary source failed, using local data");
                let fetched = self.local.fetch_all().await?;
                Ok(Fetched::new(fetched.items, false))
            }
        }
    }

    async fn create(&self, patch: Patch<T>) -> SourceResult<Synced<T>> {
        match self.primary.create(patch.clone()).await {
            Ok(synced) => Ok(synced),
            Err(e) => {
                warn!(entity = T::NAME, op = "create", error = %e, "Primary source failed, using local data");
                let synced = self.local.create(patch).await?;
                Ok(Synced::new(synced.item, false))
            }
        }
    }

    async fn update_by_id(&self, id: EntityId, patch: Patch<T>) -> SourceResult<Synced<T>> {
        match self.primary.update_by_id(id, patch.clone()).await {
            Ok(synced) => Ok(synced),
            Err(e) => {
                warn!(entity = T::NAME, op = "update", id, error = %e, "Primary source failed, using local data");
                let synced = self.local.update_by_id(id, patch).await?;
                Ok(Synced::new(synced.item, false))
            }
        }
    }

    async fn delete_by_id(&self, id: EntityId) -> SourceResult<()> {
        match self.primary.delete_by_id(id).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(entity = T::NAME, op = "delete", id, error = %e, "Primary source failed, using local data");
                self.local.delete_by_id(id).await
            }
        }
    }
}
