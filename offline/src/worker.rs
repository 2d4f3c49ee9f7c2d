use std::cell::Cell;

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::{CacheManifest, OfflineError};

pub const OFFLINE_STATUS: u16 = 503;
pub const OFFLINE_STATUS_TEXT: &str = "Service Unavailable";
pub const OFFLINE_BODY: &str = "Offline - Please check your connection";

/// Lifecycle of one worker version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerState {
    #[default]
    Parsed,
    Installing,
    Installed,
    Activating,
    Active,
    /// Install failed; the browser discards this version.
    Redundant,
}

impl WorkerState {
    pub fn can_become(self, next: WorkerState) -> bool {
        use WorkerState::*;
        matches!(
            (self, next),
            (Parsed | Active | Redundant, Installing)
                | (Installing, Installed | Redundant)
                // The browser may restart a waiting worker before `activate`.
                | (Parsed | Installed, Activating)
                | (Activating, Active)
        )
    }
}

/// The bits of an intercepted request the cache policy looks at.
pub trait RequestInfo {
    fn method(&self) -> String;
    fn url(&self) -> String;

    fn is_get(&self) -> bool {
        self.method().eq_ignore_ascii_case("GET")
    }
}

pub trait HttpResponse {
    fn status(&self) -> u16;

    fn is_success(&self) -> bool {
        (200..300).contains(&self.status())
    }
}

/// Plain request used by the policy for precache fetches and by tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub url: Url,
}

impl Request {
    pub fn get(url: Url) -> Self {
        Self {
            method: "GET".into(),
            url,
        }
    }
}

impl RequestInfo for Request {
    fn method(&self) -> String {
        self.method.clone()
    }

    fn url(&self) -> String {
        self.url.to_string()
    }
}

#[async_trait(?Send)]
pub trait Network {
    type Request: RequestInfo;
    type Response: HttpResponse;

    /// A `GET` for one manifest entry.
    fn request_for(&self, url: &Url) -> Result<Self::Request, OfflineError>;

    async fn fetch(&self, request: &Self::Request) -> Result<Self::Response, OfflineError>;
}

/// Named buckets of request/response pairs.
#[async_trait(?Send)]
pub trait CacheStorage {
    type Request: RequestInfo;
    type Response;

    async fn bucket_names(&self) -> Result<Vec<String>, OfflineError>;

    async fn has_bucket(&self, name: &str) -> Result<bool, OfflineError>;

    async fn delete_bucket(&self, name: &str) -> Result<bool, OfflineError>;

    /// Store one entry, creating `bucket` if needed.
    async fn put(
        &self,
        bucket: &str,
        request: &Self::Request,
        response: Self::Response,
    ) -> Result<(), OfflineError>;

    /// Drop one entry. `false` when it wasn't there.
    async fn remove(&self, bucket: &str, request: &Self::Request) -> Result<bool, OfflineError>;

    async fn lookup(
        &self,
        bucket: &str,
        request: &Self::Request,
    ) -> Result<Option<Self::Response>, OfflineError>;

    /// Store every entry in `bucket`, or none of them.
    ///
    /// When a write fails, a bucket created by this call is deleted. A bucket
    /// that already existed gets its previous entries back and loses only the
    /// ones this call added.
    async fn store_all(
        &self,
        bucket: &str,
        entries: Vec<(Self::Request, Self::Response)>,
    ) -> Result<(), OfflineError> {
        let existed = self.has_bucket(bucket).await?;
        let mut written: Vec<(Self::Request, Option<Self::Response>)> = Vec::new();

        for (request, response) in entries {
            let step = async {
                let previous = if existed {
                    self.lookup(bucket, &request).await?
                } else {
                    None
                };
                self.put(bucket, &request, response).await?;
                Ok::<_, OfflineError>(previous)
            }
            .await;
            match step {
                Ok(previous) => written.push((request, previous)),
                Err(err) => {
                    warn!("storing {} failed: {err}; rolling back `{bucket}`", request.url());
                    if existed {
                        roll_back(self, bucket, written).await;
                    } else if let Err(cleanup) = self.delete_bucket(bucket).await {
                        warn!("could not drop partial cache `{bucket}`: {cleanup}");
                    }
                    return Err(err);
                }
            }
        }
        Ok(())
    }
}

/// Undo `written` newest first: put back what was replaced, drop what was new.
async fn roll_back<C: CacheStorage + ?Sized>(
    caches: &C,
    bucket: &str,
    written: Vec<(C::Request, Option<C::Response>)>,
) {
    for (request, previous) in written.into_iter().rev() {
        let undone = match previous {
            Some(response) => caches.put(bucket, &request, response).await,
            None => caches.remove(bucket, &request).await.map(|_| ()),
        };
        if let Err(err) = undone {
            warn!("could not roll back {} in `{bucket}`: {err}", request.url());
        }
    }
}

/// Where a fetch answer came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<R> {
    Cached(R),
    Network(R),
    /// Both the cache and the network came up empty.
    Offline,
}

impl<R> FetchOutcome<R> {
    /// The response to hand back, building the 503 reply for [`Offline`].
    ///
    /// [`Offline`]: FetchOutcome::Offline
    pub fn into_response<E>(self, offline: impl FnOnce() -> Result<R, E>) -> Result<R, E> {
        match self {
            FetchOutcome::Cached(response) | FetchOutcome::Network(response) => Ok(response),
            FetchOutcome::Offline => offline(),
        }
    }
}

/// Cache-first service worker policy over a storage and a network backend.
pub struct CacheWorker<C, N> {
    caches: C,
    network: N,
    manifest: CacheManifest,
    scope: Url,
    state: Cell<WorkerState>,
}

impl<C, N> CacheWorker<C, N>
where
    N: Network,
    C: CacheStorage<Request = N::Request, Response = N::Response>,
{
    pub fn new(caches: C, network: N, manifest: CacheManifest, scope: Url) -> Self {
        Self {
            caches,
            network,
            manifest,
            scope,
            state: Cell::new(WorkerState::Parsed),
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state.get()
    }

    pub fn manifest(&self) -> &CacheManifest {
        &self.manifest
    }

    pub fn caches(&self) -> &C {
        &self.caches
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    fn enter(&self, next: WorkerState) -> Result<(), OfflineError> {
        let from = self.state.get();
        if !from.can_become(next) {
            return Err(OfflineError::InvalidTransition { from, to: next });
        }
        debug!("worker {from:?} -> {next:?}");
        self.state.set(next);
        Ok(())
    }

    /// Fetch every manifest entry and store them in the current bucket.
    /// Returns how many entries were cached.
    pub async fn install(&self) -> Result<usize, OfflineError> {
        self.enter(WorkerState::Installing)?;
        match self.precache().await {
            Ok(count) => {
                info!("cached {count} files into `{}`", self.manifest.version());
                self.enter(WorkerState::Installed)?;
                Ok(count)
            }
            Err(err) => {
                error!("install failed: {err}");
                self.enter(WorkerState::Redundant)?;
                Err(err)
            }
        }
    }

    async fn precache(&self) -> Result<usize, OfflineError> {
        let urls = self.manifest.resolve(&self.scope)?;
        let entries = try_join_all(urls.iter().map(|url| self.fetch_entry(url))).await?;
        let count = entries.len();
        self.caches
            .store_all(self.manifest.version(), entries)
            .await?;
        Ok(count)
    }

    async fn fetch_entry(&self, url: &Url) -> Result<(N::Request, N::Response), OfflineError> {
        let request = self.network.request_for(url)?;
        let response = self
            .network
            .fetch(&request)
            .await
            .map_err(|err| OfflineError::Precache {
                url: url.to_string(),
                reason: err.to_string(),
            })?;
        if !response.is_success() {
            return Err(OfflineError::BadStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }
        Ok((request, response))
    }

    /// Delete every bucket but the current one. Returns the deleted names.
    ///
    /// The worker ends up active even when a delete fails; the first failure
    /// is returned after the remaining buckets were tried.
    pub async fn activate(&self) -> Result<Vec<String>, OfflineError> {
        self.enter(WorkerState::Activating)?;
        let pruned = self.prune().await;
        self.enter(WorkerState::Active)?;
        pruned
    }

    async fn prune(&self) -> Result<Vec<String>, OfflineError> {
        let current = self.manifest.version();
        let mut deleted = Vec::new();
        let mut first_error = None;

        for name in self.caches.bucket_names().await? {
            if name == current {
                continue;
            }
            info!("deleting old cache `{name}`");
            match self.caches.delete_bucket(&name).await {
                Ok(true) => deleted.push(name),
                Ok(false) => debug!("cache `{name}` was already gone"),
                Err(err) => {
                    warn!("could not delete cache `{name}`: {err}");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(deleted),
        }
    }

    /// Answer an intercepted request: current bucket first, then the network.
    pub async fn fetch(&self, request: &N::Request) -> FetchOutcome<N::Response> {
        if request.is_get() {
            match self.caches.lookup(self.manifest.version(), request).await {
                Ok(Some(response)) => {
                    debug!("cache hit {}", request.url());
                    return FetchOutcome::Cached(response);
                }
                Ok(None) => {}
                Err(err) => warn!("cache lookup for {} failed: {err}", request.url()),
            }
        }

        match self.network.fetch(request).await {
            Ok(response) => FetchOutcome::Network(response),
            Err(err) => {
                error!("fetch of {} failed: {err}", request.url());
                FetchOutcome::Offline
            }
        }
    }
}
