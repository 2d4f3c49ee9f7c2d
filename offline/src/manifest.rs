use url::Url;

use crate::OfflineError;

/// Bucket name for this release. Bump it to roll every client onto a fresh
/// cache; activation deletes the old bucket.
pub const CACHE_NAME: &str = "pulseboard-v1";

/// Same-origin files, resolved against the worker scope.
pub const APP_SHELL: &[&str] = &[
    "/",
    "/index.html",
    "/assets/main.css",
    "/wasm/pulseboard-web.js",
    "/wasm/pulseboard-web_bg.wasm",
    "/sw.js",
];

pub const CDN_ASSETS: &[&str] = &[
    "https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700&display=swap",
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css",
    "https://cdn.jsdelivr.net/npm/chart.js",
];

/// The versioned list of URLs precached at install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheManifest {
    version: String,
    entries: Vec<String>,
}

impl Default for CacheManifest {
    fn default() -> Self {
        Self::new(
            CACHE_NAME,
            APP_SHELL.iter().chain(CDN_ASSETS).map(|s| s.to_string()),
        )
    }
}

impl CacheManifest {
    pub fn new(version: impl Into<String>, entries: impl IntoIterator<Item = String>) -> Self {
        Self {
            version: version.into(),
            entries: entries.into_iter().collect(),
        }
    }

    /// Name of the bucket this manifest populates.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Absolute URLs for every entry. Paths are joined onto `scope`, absolute
    /// URLs are kept as they are.
    pub fn resolve(&self, scope: &Url) -> Result<Vec<Url>, OfflineError> {
        self.entries
            .iter()
            .map(|entry| {
                scope.join(entry).map_err(|err| OfflineError::BadUrl {
                    url: entry.clone(),
                    reason: err.to_string(),
                })
            })
            .collect()
    }

    /// Whether `url` is one of the precached entries.
    pub fn contains(&self, scope: &Url, url: &Url) -> bool {
        self.entries
            .iter()
            .filter_map(|entry| scope.join(entry).ok())
            .any(|resolved| &resolved == url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> Url {
        Url::parse("https://dash.example.com/").unwrap()
    }

    #[test]
    fn default_manifest_has_shell_and_cdn() {
        let manifest = CacheManifest::default();
        assert_eq!(manifest.version(), "pulseboard-v1");
        assert_eq!(manifest.len(), APP_SHELL.len() + CDN_ASSETS.len());
    }

    #[test]
    fn paths_resolve_against_scope() {
        let urls = CacheManifest::default().resolve(&scope()).unwrap();
        assert_eq!(urls[0].as_str(), "https://dash.example.com/");
        assert_eq!(urls[1].as_str(), "https://dash.example.com/index.html");
        assert!(urls
            .iter()
            .any(|u| u.as_str() == "https://cdn.jsdelivr.net/npm/chart.js"));
    }

    #[test]
    fn cdn_query_strings_survive() {
        let urls = CacheManifest::default().resolve(&scope()).unwrap();
        let font = urls
            .iter()
            .find(|u| u.host_str() == Some("fonts.googleapis.com"))
            .unwrap();
        assert_eq!(font.query(), Some("family=Inter:wght@300;400;500;600;700&display=swap"));
    }

    #[test]
    fn membership_uses_resolved_urls() {
        let manifest = CacheManifest::default();
        let hit = Url::parse("https://dash.example.com/index.html").unwrap();
        let miss = Url::parse("https://dash.example.com/api/data").unwrap();
        assert!(manifest.contains(&scope(), &hit));
        assert!(!manifest.contains(&scope(), &miss));
    }

    #[test]
    fn bad_scope_relative_entry_is_reported() {
        let manifest = CacheManifest::new("v", ["http://[::1".to_string()]);
        assert!(matches!(
            manifest.resolve(&scope()),
            Err(OfflineError::BadUrl { .. })
        ));
    }
}
