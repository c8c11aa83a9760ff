//! Sanitizer for user-supplied analytics `<script>` snippets.
//!
//! A card owner pastes a tracking snippet into their settings. Before it is
//! stored or rendered, [`ScriptGuard`] reduces it to a [`ParsedScript`]:
//!
//! 1. [`extract`] finds exactly one script element in the text.
//! 2. The `src` attribute is checked against the [`AllowList`].
//! 3. [`attributes`] keeps only a fixed set of safe attributes.
//! 4. The source is labelled with its [`Provider`].
//!
//! Malformed or hostile input is an expected case: every failure becomes
//! `None` (or an invalid [`ScriptValidation`]), never a panic or error.

pub mod attributes;
pub mod extract;
mod inject;
pub mod providers;

use std::collections::BTreeMap;

use serde::Serialize;

pub use attributes::AttrValue;
pub use inject::{HeadScripts, HeadSink, ScriptResource};
pub use providers::{AllowList, DomainEntry, Provider};

use crate::config::ScriptGuardBuilder;
use attributes::ScriptTag;

/// Message shown for every rejected snippet unless detailed errors are enabled.
pub const GENERIC_SCRIPT_ERROR: &str = "Invalid script format or unsupported provider";

/// Why a snippet was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScriptRejection {
    #[error("No script tag found")]
    NoScriptTag,

    #[error("Only a single script tag is allowed")]
    MultipleScriptTags,

    #[error("Script tag has no src attribute")]
    MissingSource,

    #[error("Script src is not an absolute http(s) URL")]
    InvalidSource,

    #[error("Script domain is not an allowed analytics provider")]
    DomainRejected,
}

/// A validated tracking script. Only produced by [`ScriptGuard::parse`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParsedScript {
    source: String,
    attributes: BTreeMap<&'static str, AttrValue>,
    provider: Provider,
}

impl ParsedScript {
    /// The allow-listed script URL.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Safe attributes kept from the tag, keyed by lowercase name.
    pub fn attributes(&self) -> &BTreeMap<&'static str, AttrValue> {
        &self.attributes
    }

    /// Vendor the source was classified as.
    pub fn provider(&self) -> Provider {
        self.provider
    }
}

/// Form-feedback result of [`ScriptGuard::validate`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScriptValidation {
    pub valid: bool,
    pub error: Option<String>,
    pub provider: Option<Provider>,
}

impl ScriptValidation {
    fn ok(provider: Option<Provider>) -> Self {
        Self {
            valid: true,
            error: None,
            provider,
        }
    }

    fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
            provider: None,
        }
    }
}

/// Parses, validates and injects tracking snippets under one policy.
///
/// Build with [`ScriptGuard::builder`] to customize the allow-list or the
/// loading defaults; [`ScriptGuard::default`] uses the built-in providers.
///
/// # Example
///
/// ```
/// use workinfo::{HeadScripts, Provider, ScriptGuard};
///
/// let guard = ScriptGuard::default();
/// let raw = r#"<script defer src="https://plausible.io/js/script.js" data-domain="example.com"></script>"#;
///
/// let parsed = guard.parse(raw).unwrap();
/// assert_eq!(parsed.provider(), Provider::Plausible);
///
/// let mut head = HeadScripts::new();
/// assert!(guard.inject(raw, &mut head));
/// assert_eq!(head.scripts()[0].src, "https://plausible.io/js/script.js");
/// ```
#[derive(Clone, Debug)]
pub struct ScriptGuard {
    allow_list: AllowList,
    default_async: bool,
    default_defer: bool,
    detailed_errors: bool,
}

impl ScriptGuard {
    pub(crate) fn from_parts(
        allow_list: AllowList,
        default_async: bool,
        default_defer: bool,
        detailed_errors: bool,
    ) -> Self {
        Self {
            allow_list,
            default_async,
            default_defer,
            detailed_errors,
        }
    }

    /// Start from the built-in allow-list and loading defaults.
    pub fn builder() -> ScriptGuardBuilder {
        ScriptGuardBuilder::new()
    }

    /// The domains this guard accepts.
    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// `true` if `url` is an http(s) URL on an allow-listed domain.
    pub fn is_allowed(&self, url: &str) -> bool {
        self.allow_list.is_allowed(url)
    }

    /// Provider label for `url`, or [`Provider::Other`].
    pub fn classify(&self, url: &str) -> Provider {
        self.allow_list.classify(url)
    }

    /// Parses `raw`, reporting why it was rejected.
    ///
    /// The returned source is the normalized form of the URL whose host was
    /// checked, so stripped whitespace or case changes cannot differ between
    /// what was validated and what is loaded.
    pub fn try_parse(&self, raw: &str) -> Result<ParsedScript, ScriptRejection> {
        let tag = match extract::count_script_tags(raw) {
            0 => return Err(ScriptRejection::NoScriptTag),
            1 => extract::single_script_tag(raw).ok_or(ScriptRejection::MultipleScriptTags)?,
            _ => return Err(ScriptRejection::MultipleScriptTags),
        };

        let tag = ScriptTag::parse(tag).ok_or(ScriptRejection::NoScriptTag)?;
        let source = tag.src().ok_or(ScriptRejection::MissingSource)?;

        let url = url::Url::parse(source).map_err(|_| ScriptRejection::InvalidSource)?;
        let provider = self
            .allow_list
            .match_parsed(&url)
            .ok_or(ScriptRejection::DomainRejected)?;

        // Store the serialized URL that was checked, not the raw attribute.
        Ok(ParsedScript {
            source: url.into(),
            attributes: tag.safe_attributes(),
            provider,
        })
    }

    /// Parses `raw` into a [`ParsedScript`], or `None` if it is not exactly
    /// one script tag with an allow-listed `src`.
    pub fn parse(&self, raw: &str) -> Option<ParsedScript> {
        match self.try_parse(raw) {
            Ok(parsed) => Some(parsed),
            Err(reason) => {
                tracing::debug!("Tracking script rejected: {reason}");
                None
            }
        }
    }

    /// Validates a settings-form value. Empty input is valid: it means no
    /// tracking script is configured.
    pub fn validate(&self, raw: &str) -> ScriptValidation {
        if raw.trim().is_empty() {
            return ScriptValidation::ok(None);
        }
        match self.try_parse(raw) {
            Ok(parsed) => ScriptValidation::ok(Some(parsed.provider)),
            Err(reason) if self.detailed_errors => ScriptValidation::invalid(reason.to_string()),
            Err(_) => ScriptValidation::invalid(GENERIC_SCRIPT_ERROR),
        }
    }

    /// Builds the head descriptor for `raw` without registering it.
    pub fn resource(&self, raw: &str) -> Option<ScriptResource> {
        let parsed = self.parse(raw)?;
        Some(self.to_resource(parsed))
    }

    fn to_resource(&self, parsed: ParsedScript) -> ScriptResource {
        let ParsedScript {
            source,
            mut attributes,
            ..
        } = parsed;
        let async_ = attributes.remove("async").is_some() || self.default_async;
        let defer = attributes.remove("defer").is_some() || self.default_defer;
        ScriptResource {
            src: source,
            async_,
            defer,
            attributes,
        }
    }

    /// Registers `raw` with `head` if it passes validation.
    ///
    /// Returns `false` and registers nothing when the snippet is rejected;
    /// a missing analytics script must never break the page.
    pub fn inject(&self, raw: &str, head: &mut impl HeadSink) -> bool {
        if raw.trim().is_empty() {
            return false;
        }
        let Some(parsed) = self.parse(raw) else {
            tracing::warn!("Invalid or unsafe tracking script provided");
            return false;
        };
        let provider = parsed.provider;
        head.register_script(self.to_resource(parsed));
        tracing::info!("Injected {provider} tracking script");
        true
    }
}

impl Default for ScriptGuard {
    fn default() -> Self {
        Self::from_parts(AllowList::default(), true, false, false)
    }
}
