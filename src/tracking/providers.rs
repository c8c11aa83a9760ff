//! Analytics domain allow-list and provider classification.
//!
//! One table of `domain -> provider` rows serves both as the security
//! allow-list and as the source of provider labels, so the two can never
//! drift apart.

use std::borrow::Cow;
use std::fmt;

use serde::{Serialize, Serializer};
use url::{Host, Url};

use crate::error::{Result, WorkinfoError};

/// Analytics vendor a tracking script belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Provider {
    GoogleAnalytics,
    Umami,
    Plausible,
    SimpleAnalytics,
    Hotjar,
    FullStory,
    Mixpanel,
    /// Generic fallback for sources that match no known vendor.
    Other,
}

impl Provider {
    /// Human-readable label shown in the settings UI.
    pub fn label(self) -> &'static str {
        match self {
            Provider::GoogleAnalytics => "Google Analytics",
            Provider::Umami => "Umami",
            Provider::Plausible => "Plausible",
            Provider::SimpleAnalytics => "Simple Analytics",
            Provider::Hotjar => "Hotjar",
            Provider::FullStory => "FullStory",
            Provider::Mixpanel => "Mixpanel",
            Provider::Other => "Analytics",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Provider {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Built-in allow-list. Earlier rows win when a host matches several.
pub const DEFAULT_DOMAINS: &[(&str, Provider)] = &[
    ("google-analytics.com", Provider::GoogleAnalytics),
    ("googletagmanager.com", Provider::GoogleAnalytics),
    ("analytics.google.com", Provider::GoogleAnalytics),
    ("umami.is", Provider::Umami),
    ("cloud.umami.is", Provider::Umami),
    ("plausible.io", Provider::Plausible),
    ("simpleanalytics.com", Provider::SimpleAnalytics),
    ("hotjar.com", Provider::Hotjar),
    ("fullstory.com", Provider::FullStory),
    ("mixpanel.com", Provider::Mixpanel),
];

/// One allow-list row: a registrable domain and the vendor it identifies.
///
/// Only constructed through [`DomainEntry::new`], which rejects anything that
/// is not a plain multi-label domain name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainEntry {
    domain: Cow<'static, str>,
    provider: Provider,
}

impl DomainEntry {
    /// Validates and normalizes `domain`.
    ///
    /// Surrounding whitespace and a leading or trailing dot are stripped and
    /// the name is lowercased. Empty input, IP addresses, URLs, and single
    /// labels such as `com` are rejected with [`WorkinfoError::Config`].
    pub fn new(domain: impl AsRef<str>, provider: Provider) -> Result<Self> {
        let raw = domain.as_ref();
        let trimmed = raw.trim().trim_start_matches('.').trim_end_matches('.');
        let invalid = |why: &str| {
            WorkinfoError::Config(format!("invalid allow-list domain {raw:?}: {why}"))
        };
        if trimmed.is_empty() {
            return Err(invalid("empty"));
        }
        let name = match Host::parse(trimmed) {
            Ok(Host::Domain(name)) => name,
            Ok(_) => return Err(invalid("IP addresses are not allowed")),
            Err(e) => return Err(invalid(&e.to_string())),
        };
        if name.split('.').count() < 2 || name.split('.').any(str::is_empty) {
            return Err(invalid("expected a domain such as example.com"));
        }
        Ok(Self {
            domain: Cow::Owned(name.to_ascii_lowercase()),
            provider,
        })
    }

    /// Rows of [`DEFAULT_DOMAINS`], which are already normalized.
    fn builtin(domain: &'static str, provider: Provider) -> Self {
        Self {
            domain: Cow::Borrowed(domain),
            provider,
        }
    }

    /// The normalized domain.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Vendor label for hosts this entry covers.
    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// `true` if `host` is this domain or one of its subdomains.
    fn covers(&self, host: &str) -> bool {
        let domain = self.domain.as_ref();
        if domain.is_empty() {
            return false;
        }
        host == domain
            || host
                .strip_suffix(domain)
                .is_some_and(|prefix| prefix.len() > 1 && prefix.ends_with('.'))
    }
}

/// Ordered set of permitted analytics domains.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllowList {
    entries: Vec<DomainEntry>,
}

impl AllowList {
    /// Create an allow-list from validated entries. Order decides which
    /// provider labels a host that several entries cover.
    pub fn new(entries: Vec<DomainEntry>) -> Self {
        Self { entries }
    }

    /// An allow-list with no entries; rejects everything.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Append an entry with the lowest precedence.
    pub fn push(&mut self, entry: DomainEntry) {
        self.entries.push(entry);
    }

    /// Entries in precedence order.
    pub fn entries(&self) -> &[DomainEntry] {
        &self.entries
    }

    /// Returns `true` iff `url` is an absolute http(s) URL whose host is an
    /// allow-listed domain or a subdomain of one. Fails closed on anything
    /// that does not parse.
    pub fn is_allowed(&self, url: &str) -> bool {
        self.match_url(url).is_some()
    }

    /// Labels `url` with the first matching provider, or [`Provider::Other`].
    pub fn classify(&self, url: &str) -> Provider {
        self.match_url(url).unwrap_or(Provider::Other)
    }

    fn match_url(&self, url: &str) -> Option<Provider> {
        let parsed = Url::parse(url).ok()?;
        self.match_parsed(&parsed)
    }

    pub(crate) fn match_parsed(&self, url: &Url) -> Option<Provider> {
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        let Some(Host::Domain(host)) = url.host() else {
            return None;
        };
        let host = host.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.covers(&host))
            .map(|entry| entry.provider)
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(
            DEFAULT_DOMAINS
                .iter()
                .map(|&(domain, provider)| DomainEntry::builtin(domain, provider))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_domain_is_allowed() {
        let list = AllowList::default();
        assert!(list.is_allowed("https://plausible.io/js/script.js"));
        assert!(list.is_allowed("https://www.googletagmanager.com/gtag/js?id=G-XXXX"));
    }

    #[test]
    fn subdomain_is_allowed() {
        let list = AllowList::default();
        assert!(list.is_allowed("https://cloud.umami.is/script.js"));
        assert!(list.is_allowed("https://widget.plausible.io/p.js"));
        assert!(list.is_allowed("https://static.hotjar.com/c/hotjar-1.js"));
    }

    #[test]
    fn lookalike_domains_are_rejected() {
        let list = AllowList::default();
        assert!(!list.is_allowed("https://evil.example.com/x.js"));
        assert!(!list.is_allowed("https://notplausible.io/js/script.js"));
        assert!(!list.is_allowed("https://plausible.io.evil.com/js/script.js"));
        assert!(!list.is_allowed("https://evil.com/plausible.io/script.js"));
    }

    #[test]
    fn unparsable_or_relative_urls_fail_closed() {
        let list = AllowList::default();
        assert!(!list.is_allowed(""));
        assert!(!list.is_allowed("not a url"));
        assert!(!list.is_allowed("//plausible.io/js/script.js"));
        assert!(!list.is_allowed("/js/script.js"));
    }

    #[test]
    fn non_http_schemes_are_rejected() {
        let list = AllowList::default();
        assert!(!list.is_allowed("javascript://plausible.io/%0aalert(1)"));
        assert!(!list.is_allowed("data:text/javascript,alert(1)"));
        assert!(!list.is_allowed("ftp://plausible.io/script.js"));
    }

    #[test]
    fn host_match_ignores_case() {
        let list = AllowList::default();
        assert!(list.is_allowed("https://PLAUSIBLE.IO/js/script.js"));
        assert_eq!(
            list.classify("https://Cloud.Umami.Is/script.js"),
            Provider::Umami
        );
    }

    #[test]
    fn classify_known_providers() {
        let list = AllowList::default();
        assert_eq!(
            list.classify("https://www.google-analytics.com/analytics.js"),
            Provider::GoogleAnalytics
        );
        assert_eq!(
            list.classify("https://analytics.google.com/g/collect"),
            Provider::GoogleAnalytics
        );
        assert_eq!(
            list.classify("https://scripts.simpleanalyticscdn.com/latest.js"),
            Provider::Other
        );
        assert_eq!(
            list.classify("https://scripts.simpleanalytics.com/latest.js"),
            Provider::SimpleAnalytics
        );
        assert_eq!(
            list.classify("https://cdn.mxpnl.mixpanel.com/libs/mixpanel.js"),
            Provider::Mixpanel
        );
    }

    #[test]
    fn classify_falls_back_to_generic_label() {
        let list = AllowList::default();
        let provider = list.classify("https://evil.example.com/x.js");
        assert_eq!(provider, Provider::Other);
        assert_eq!(provider.label(), "Analytics");
    }

    #[test]
    fn earlier_entry_wins_on_overlap() {
        let list = AllowList::new(vec![
            DomainEntry::new("stats.example.org", Provider::Umami).unwrap(),
            DomainEntry::new("example.org", Provider::Plausible).unwrap(),
        ]);
        assert_eq!(
            list.classify("https://stats.example.org/s.js"),
            Provider::Umami
        );
        assert_eq!(
            list.classify("https://cdn.example.org/s.js"),
            Provider::Plausible
        );
    }

    #[test]
    fn custom_entries_are_normalized() {
        let entry = DomainEntry::new("  .Stats.Example.Org. ", Provider::Other).unwrap();
        assert_eq!(entry.domain(), "stats.example.org");
        let list = AllowList::new(vec![entry]);
        assert!(list.is_allowed("https://stats.example.org/s.js"));
        assert!(list.is_allowed("https://cdn.stats.example.org/s.js"));
    }

    #[test]
    fn malformed_entries_are_rejected() {
        for bad in [
            "",
            "   ",
            ".",
            "com",
            "https://stats.example.org",
            "stats.example.org/path",
            "127.0.0.1",
            "[::1]",
            "a..b",
            "exa mple.org",
        ] {
            assert!(
                matches!(
                    DomainEntry::new(bad, Provider::Other),
                    Err(WorkinfoError::Config(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn builtin_table_is_normalized() {
        for &(domain, provider) in DEFAULT_DOMAINS {
            let entry = DomainEntry::new(domain, provider).unwrap();
            assert_eq!(entry.domain(), domain);
        }
    }

    #[test]
    fn trailing_dot_hosts_do_not_match() {
        let list = AllowList::default();
        assert!(!list.is_allowed("https://evil.example.com./steal.js"));
        assert!(!list.is_allowed("https://.plausible.io/js/script.js"));
    }

    #[test]
    fn ip_hosts_never_match() {
        let list = AllowList::default();
        assert!(!list.is_allowed("http://127.0.0.1/x.js"));
        assert!(!list.is_allowed("http://[::1]/x.js"));
    }

    #[test]
    fn empty_list_rejects_everything() {
        assert!(!AllowList::empty().is_allowed("https://plausible.io/js/script.js"));
    }

    #[test]
    fn provider_serializes_as_label() {
        let json = serde_json::to_string(&Provider::SimpleAnalytics).unwrap();
        assert_eq!(json, "\"Simple Analytics\"");
    }
}
