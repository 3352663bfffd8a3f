// svckit/src/images.rs
//
// In-memory image blobs addressed by revocable object URLs, plus the
// per-listing cache the browse view keeps for its current listing set.
//

use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::services::ListingService;
use crate::types::{ImageBlob, Listing};

const URL_PREFIX: &str = "blob:biznest/";

/// Process-wide table of live blobs. Entries disappear when the owning
/// `ObjectUrl` is dropped.
#[derive(Clone, Default)]
pub struct BlobRegistry {
    blobs: Arc<DashMap<Uuid, ImageBlob>>,
}

impl BlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_object_url(&self, blob: ImageBlob) -> ObjectUrl {
        let id = Uuid::new_v4();
        self.blobs.insert(id, blob);
        ObjectUrl {
            id,
            url: format!("{}{}", URL_PREFIX, id),
            blobs: self.blobs.clone(),
        }
    }

    pub fn resolve(&self, url: &str) -> Option<ImageBlob> {
        let id = Uuid::parse_str(url.strip_prefix(URL_PREFIX)?).ok()?;
        self.blobs.get(&id).map(|entry| entry.value().clone())
    }

    /// Number of blobs not yet revoked
    pub fn live_count(&self) -> usize {
        self.blobs.len()
    }
}

/// Handle to a registered blob. Dropping it revokes the URL.
#[derive(Debug)]
pub struct ObjectUrl {
    id: Uuid,
    url: String,
    blobs: Arc<DashMap<Uuid, ImageBlob>>,
}

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        self.blobs.remove(&self.id);
    }
}

/// Object URLs for the approved listings of one listing set
pub struct ImageCache {
    service: ListingService,
    registry: BlobRegistry,
    max_concurrent: usize,
    urls: HashMap<i64, ObjectUrl>,
    version: Option<u64>,
}

impl ImageCache {
    pub fn new(service: ListingService, registry: BlobRegistry, max_concurrent: usize) -> Self {
        Self {
            service,
            registry,
            max_concurrent: max_concurrent.max(1),
            urls: HashMap::new(),
            version: None,
        }
    }

    /// Rebuild the cache when the listing array version changed.
    /// Returns false when the cache was already current.
    pub async fn sync(&mut self, version: u64, listings: &[Listing]) -> bool {
        if self.version == Some(version) {
            return false;
        }
        self.clear();
        self.version = Some(version);

        let ids: Vec<i64> = listings
            .iter()
            .filter(|l| l.status.is_public())
            .map(|l| l.id)
            .collect();
        if ids.is_empty() {
            return true;
        }

        let mut join_set = JoinSet::new();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));

        for id in ids {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    warn!("Image fetch queue closed: {}", e);
                    break;
                }
            };
            let service = self.service.clone();
            join_set.spawn(async move {
                let result = service.get_listing_image(id).await;
                drop(permit);
                (id, result)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((id, Ok(blob))) => {
                    let url = self.registry.create_object_url(blob);
                    self.urls.insert(id, url);
                }
                Ok((id, Err(e))) => debug!("No image for listing {}: {}", id, e),
                Err(e) => warn!("Image fetch task failed: {}", e),
            }
        }

        debug!("Image cache holds {} object URLs", self.urls.len());
        true
    }

    pub fn url_for(&self, listing_id: i64) -> Option<&str> {
        self.urls.get(&listing_id).map(ObjectUrl::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Revoke every URL held by this cache
    pub fn clear(&mut self) {
        self.urls.clear();
        self.version = None;
    }
}
