//! Service worker entry points over the browser Cache API. The JS loader in
//! `sw.js` forwards `install`, `activate` and `fetch` events here.

use std::rc::Rc;

use async_trait::async_trait;
use js_sys::{Array, Promise};
use once_cell::unsync::OnceCell;
use tracing::{debug, error, info, warn, Level};
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{Cache, ResponseInit, ServiceWorkerGlobalScope};

use crate::{
    CacheManifest, CacheStorage, CacheWorker, HttpResponse, Network, OfflineError, RequestInfo,
    OFFLINE_BODY, OFFLINE_STATUS, OFFLINE_STATUS_TEXT,
};

impl RequestInfo for web_sys::Request {
    fn method(&self) -> String {
        web_sys::Request::method(self)
    }

    fn url(&self) -> String {
        web_sys::Request::url(self)
    }
}

impl HttpResponse for web_sys::Response {
    fn status(&self) -> u16 {
        web_sys::Response::status(self)
    }
}

fn js_reason(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn storage_err(err: JsValue) -> OfflineError {
    OfflineError::Storage(js_reason(err))
}

fn global() -> ServiceWorkerGlobalScope {
    js_sys::global().unchecked_into()
}

struct WebCaches {
    storage: web_sys::CacheStorage,
}

impl WebCaches {
    async fn open(&self, bucket: &str) -> Result<Cache, OfflineError> {
        let cache = JsFuture::from(self.storage.open(bucket))
            .await
            .map_err(storage_err)?;
        Ok(cache.unchecked_into())
    }
}

#[async_trait(?Send)]
impl CacheStorage for WebCaches {
    type Request = web_sys::Request;
    type Response = web_sys::Response;

    async fn bucket_names(&self) -> Result<Vec<String>, OfflineError> {
        let keys = JsFuture::from(self.storage.keys())
            .await
            .map_err(storage_err)?;
        Ok(Array::from(&keys)
            .iter()
            .filter_map(|key| key.as_string())
            .collect())
    }

    async fn has_bucket(&self, name: &str) -> Result<bool, OfflineError> {
        let exists = JsFuture::from(self.storage.has(name))
            .await
            .map_err(storage_err)?;
        Ok(exists.as_bool().unwrap_or(false))
    }

    async fn delete_bucket(&self, name: &str) -> Result<bool, OfflineError> {
        let deleted = JsFuture::from(self.storage.delete(name))
            .await
            .map_err(storage_err)?;
        Ok(deleted.as_bool().unwrap_or(false))
    }

    async fn put(
        &self,
        bucket: &str,
        request: &web_sys::Request,
        response: web_sys::Response,
    ) -> Result<(), OfflineError> {
        let cache = self.open(bucket).await?;
        JsFuture::from(cache.put_with_request(request, &response))
            .await
            .map_err(storage_err)?;
        Ok(())
    }

    async fn remove(&self, bucket: &str, request: &web_sys::Request) -> Result<bool, OfflineError> {
        let cache = self.open(bucket).await?;
        let removed = JsFuture::from(cache.delete_with_request(request))
            .await
            .map_err(storage_err)?;
        Ok(removed.as_bool().unwrap_or(false))
    }

    async fn lookup(
        &self,
        bucket: &str,
        request: &web_sys::Request,
    ) -> Result<Option<web_sys::Response>, OfflineError> {
        if !self.has_bucket(bucket).await? {
            return Ok(None);
        }
        let cache = self.open(bucket).await?;
        let hit = JsFuture::from(cache.match_with_request(request))
            .await
            .map_err(storage_err)?;
        Ok((!hit.is_undefined()).then(|| hit.unchecked_into()))
    }
}

struct WebNetwork {
    scope: ServiceWorkerGlobalScope,
}

#[async_trait(?Send)]
impl Network for WebNetwork {
    type Request = web_sys::Request;
    type Response = web_sys::Response;

    fn request_for(&self, url: &Url) -> Result<web_sys::Request, OfflineError> {
        web_sys::Request::new_with_str(url.as_str()).map_err(|err| OfflineError::BadUrl {
            url: url.to_string(),
            reason: js_reason(err),
        })
    }

    async fn fetch(&self, request: &web_sys::Request) -> Result<web_sys::Response, OfflineError> {
        let response = JsFuture::from(self.scope.fetch_with_request(request))
            .await
            .map_err(|err| OfflineError::Network(js_reason(err)))?;
        Ok(response.unchecked_into())
    }
}

type WebWorker = CacheWorker<WebCaches, WebNetwork>;

thread_local! {
    static WORKER: OnceCell<Rc<WebWorker>> = const { OnceCell::new() };
}

fn build_worker() -> Result<Rc<WebWorker>, OfflineError> {
    let scope = global();
    let storage = scope.caches().map_err(storage_err)?;
    let base = scope.registration().scope();
    let base_url = Url::parse(&base).map_err(|err| OfflineError::BadUrl {
        url: base.clone(),
        reason: err.to_string(),
    })?;
    Ok(Rc::new(CacheWorker::new(
        WebCaches { storage },
        WebNetwork { scope },
        CacheManifest::default(),
        base_url,
    )))
}

fn worker() -> Result<Rc<WebWorker>, OfflineError> {
    WORKER.with(|cell| cell.get_or_try_init(build_worker).map(Rc::clone))
}

fn offline_response() -> Result<web_sys::Response, JsValue> {
    let init = ResponseInit::new();
    init.set_status(OFFLINE_STATUS);
    init.set_status_text(OFFLINE_STATUS_TEXT);
    web_sys::Response::new_with_opt_str_and_init(Some(OFFLINE_BODY), &init)
}

fn to_js(err: OfflineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn start() {
    if let Err(err) = dioxus_logger::init(Level::INFO) {
        debug!("logger already installed: {err}");
    }
    info!("pulseboard offline worker loaded");
}

/// `install` handler. Rejects when any manifest entry can't be cached.
#[wasm_bindgen]
pub fn install() -> Promise {
    future_to_promise(async move {
        let worker = worker().map_err(to_js)?;
        let count = worker.install().await.map_err(to_js)?;
        Ok(JsValue::from(count as u32))
    })
}

/// `activate` handler. Pruning problems are logged, never rejected.
#[wasm_bindgen]
pub fn activate() -> Promise {
    future_to_promise(async move {
        let worker = worker().map_err(to_js)?;
        match worker.activate().await {
            Ok(deleted) => info!("activated; removed {} old cache(s)", deleted.len()),
            Err(err) => warn!("activated with leftovers: {err}"),
        }
        Ok(JsValue::UNDEFINED)
    })
}

/// `fetch` handler. Always resolves to a `Response`.
#[wasm_bindgen]
pub fn handle_fetch(request: web_sys::Request) -> Promise {
    future_to_promise(async move {
        let response = match worker() {
            Ok(worker) => worker.fetch(&request).await.into_response(offline_response)?,
            Err(err) => {
                error!("worker unavailable: {err}");
                offline_response()?
            }
        };
        Ok(response.into())
    })
}

/// Worker-level `error` and `unhandledrejection` events from the loader.
#[wasm_bindgen]
pub fn report_error(message: String) {
    error!("{message}");
}
