//! Builders and settings: the tracking-script policy and the public site URLs.

use crate::error::{Result, WorkinfoError};
use crate::tracking::{AllowList, DomainEntry, Provider, ScriptGuard};

/// Builder for configuring a [`ScriptGuard`].
///
/// # Example
///
/// ```
/// use workinfo::{Provider, ScriptGuard};
///
/// let guard = ScriptGuard::builder()
///     .allow("stats.example.org", Provider::Umami)
///     .default_defer(true)
///     .build()?;
/// assert!(guard.is_allowed("https://stats.example.org/script.js"));
/// assert!(guard.is_allowed("https://plausible.io/js/script.js"));
/// # Ok::<(), workinfo::WorkinfoError>(())
/// ```
pub struct ScriptGuardBuilder {
    allow_list: AllowList,
    invalid: Option<WorkinfoError>,
    default_async: bool,
    default_defer: bool,
    detailed_errors: bool,
}

impl ScriptGuardBuilder {
    /// Create a builder with the built-in provider table.
    ///
    /// Defaults: scripts load `async`, not `defer`, and rejections share one
    /// generic message.
    pub fn new() -> Self {
        Self {
            allow_list: AllowList::default(),
            invalid: None,
            default_async: true,
            default_defer: false,
            detailed_errors: false,
        }
    }

    /// Append a domain to the allow-list. Subdomains are covered too.
    ///
    /// The domain is normalized by [`DomainEntry::new`]; a malformed one makes
    /// [`build`](Self::build) fail.
    pub fn allow(mut self, domain: impl AsRef<str>, provider: Provider) -> Self {
        match DomainEntry::new(domain, provider) {
            Ok(entry) => self.allow_list.push(entry),
            Err(e) => {
                self.invalid.get_or_insert(e);
            }
        }
        self
    }

    /// Replace the whole allow-list.
    pub fn domains(mut self, allow_list: AllowList) -> Self {
        self.allow_list = allow_list;
        self
    }

    /// `async` value used when the pasted tag does not set it.
    pub fn default_async(mut self, value: bool) -> Self {
        self.default_async = value;
        self
    }

    /// `defer` value used when the pasted tag does not set it.
    pub fn default_defer(mut self, value: bool) -> Self {
        self.default_defer = value;
        self
    }

    /// Report the specific rejection reason instead of the generic message.
    ///
    /// Off by default so the form does not reveal the allow-list.
    pub fn detailed_errors(mut self, value: bool) -> Self {
        self.detailed_errors = value;
        self
    }

    /// Finish the builder.
    ///
    /// Fails with [`WorkinfoError::Config`] if any domain passed to
    /// [`allow`](Self::allow) was rejected.
    pub fn build(self) -> Result<ScriptGuard> {
        if let Some(e) = self.invalid {
            return Err(e);
        }
        if self.allow_list.entries().is_empty() {
            tracing::warn!("Tracking script allow-list is empty; every script will be rejected");
        }
        Ok(ScriptGuard::from_parts(
            self.allow_list,
            self.default_async,
            self.default_defer,
            self.detailed_errors,
        ))
    }
}

impl Default for ScriptGuardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub const DEFAULT_SITE_URL: &str = "https://workinfo.me";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8090";

pub const SITE_URL_ENV: &str = "WORKINFO_SITE_URL";
pub const BACKEND_URL_ENV: &str = "WORKINFO_BACKEND_URL";

/// Public base URLs used to build share links and file URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteConfig {
    site_url: String,
    backend_url: String,
}

impl SiteConfig {
    /// Both URLs must be absolute http(s) URLs. Trailing slashes are trimmed.
    pub fn new(site_url: impl Into<String>, backend_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            site_url: normalize_base(site_url.into(), "site URL")?,
            backend_url: normalize_base(backend_url.into(), "backend URL")?,
        })
    }

    /// Reads [`SITE_URL_ENV`] and [`BACKEND_URL_ENV`], falling back to the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let site = lookup(SITE_URL_ENV).filter(|v| !v.trim().is_empty());
        let backend = lookup(BACKEND_URL_ENV).filter(|v| !v.trim().is_empty());
        Self::new(
            site.unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
            backend.unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
        )
    }

    /// Public site origin, without a trailing slash.
    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    /// Record backend origin, without a trailing slash.
    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

fn normalize_base(value: String, what: &str) -> Result<String> {
    let trimmed = value.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| WorkinfoError::Config(format!("invalid {what} {trimmed:?}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(WorkinfoError::Config(format!(
            "{what} must use http or https, got {trimmed:?}"
        )));
    }
    Ok(trimmed.to_string())
}
