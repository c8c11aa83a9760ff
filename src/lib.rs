//! # workinfo
//!
//! Core library for a digital business card service: users publish a card
//! under `/users/{username}` and may attach an analytics snippet to it.
//!
//! ## Overview
//!
//! The centerpiece is [`ScriptGuard`], which turns a pasted `<script>` tag
//! into a [`ScriptResource`] that is safe to load: exactly one tag, an
//! allow-listed `src` host, and only a fixed set of attributes. Rejected
//! snippets never reach the page.
//!
//! Around it sit the card collaborators: [`CardService`] over a pluggable
//! [`CardStore`], an explicit [`Session`] for the signed-in user,
//! [`RouteGuard`]s, and a [`ThemeManager`] persisted through
//! [`Preferences`].
//!
//! ## Quick start
//!
//! ```rust
//! use workinfo::{HeadScripts, ScriptGuard};
//!
//! let guard = ScriptGuard::default();
//!
//! let check = guard.validate(r#"<script src="https://evil.example.com/x.js"></script>"#);
//! assert!(!check.valid);
//!
//! let mut head = HeadScripts::new();
//! guard.inject(
//!     r#"<script defer src="https://plausible.io/js/script.js" data-domain="example.com"></script>"#,
//!     &mut head,
//! );
//! assert_eq!(
//!     head.to_html(),
//!     r#"<script src="https://plausible.io/js/script.js" async defer data-domain="example.com"></script>"#,
//! );
//! ```

pub mod card;
pub mod config;
pub mod error;
pub mod guard;
pub mod preferences;
pub mod session;
pub mod store;
pub mod theme;
pub mod tracking;

pub use card::{Card, CardDraft, CardService, Registration};
pub use config::{ScriptGuardBuilder, SiteConfig};
pub use error::{Result, WorkinfoError};
pub use guard::{Navigation, RouteGuard};
pub use preferences::{FsPreferences, MemoryPreferences, Preferences};
pub use session::Session;
pub use store::{CardStore, MemoryCardStore, UserRecord};
pub use theme::{BrandColors, ThemeManager, ThemeMode};
pub use tracking::{
    AllowList, AttrValue, DomainEntry, HeadScripts, HeadSink, ParsedScript, Provider,
    ScriptGuard, ScriptRejection, ScriptResource, ScriptValidation,
};
