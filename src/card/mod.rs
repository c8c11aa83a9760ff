//! Business cards: the record model and the service that manages them.

mod validate;
mod vcard;

pub use validate::{
    CardErrors, Registration, is_valid_email, is_valid_phone, is_valid_url, is_valid_username,
    validate_card,
};
pub use vcard::to_vcard;

use serde::{Deserialize, Serialize};

use crate::config::SiteConfig;
use crate::error::{Result, WorkinfoError};
use crate::session::Session;
use crate::store::CardStore;
use crate::tracking::{HeadSink, ScriptGuard};

/// A `cards` record. Empty strings mean "not set", as the backend returns them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Card {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub title: String,
    pub email: String,
    pub mobile: String,
    pub office: String,
    pub website: String,
    pub note: String,
    pub profile_image: String,
    pub theme_primary_light: String,
    pub theme_primary_dark: String,
    /// Raw snippet as pasted. Re-validated every time it is rendered.
    pub tracking_script: String,
    pub is_active: bool,
}

/// Fields a user edits in the card form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardDraft {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub title: String,
    pub email: String,
    pub mobile: String,
    pub office: String,
    pub website: String,
    pub note: String,
    pub theme_primary_light: String,
    pub theme_primary_dark: String,
    pub tracking_script: String,
}

impl CardDraft {
    fn apply_to(self, card: &mut Card) {
        card.first_name = self.first_name;
        card.last_name = self.last_name;
        card.company = self.company;
        card.title = self.title;
        card.email = self.email;
        card.mobile = self.mobile;
        card.office = self.office;
        card.website = self.website;
        card.note = self.note;
        card.theme_primary_light = self.theme_primary_light;
        card.theme_primary_dark = self.theme_primary_dark;
        card.tracking_script = self.tracking_script;
    }
}

/// `true` if `card` has everything the public page needs.
pub fn is_public(card: &Card) -> bool {
    card.is_active
        && !card.first_name.trim().is_empty()
        && !card.last_name.trim().is_empty()
        && !card.username.trim().is_empty()
}

/// Card operations against a [`CardStore`].
///
/// # Example
///
/// ```
/// use workinfo::{CardDraft, CardService, MemoryCardStore, Session, SiteConfig};
///
/// # async fn example() -> workinfo::Result<()> {
/// let service = CardService::new(MemoryCardStore::new(), SiteConfig::default());
/// let session = Session::new("u1", "jane", "jane@example.com");
///
/// let draft = CardDraft {
///     first_name: "Jane".into(),
///     last_name: "Doe".into(),
///     company: "Acme".into(),
///     ..CardDraft::default()
/// };
/// let card = service.save_card(&session, draft).await?;
/// assert_eq!(service.share_url(&card.username), "https://workinfo.me/users/jane");
/// # Ok(())
/// # }
/// ```
pub struct CardService<S: CardStore> {
    store: S,
    site: SiteConfig,
    scripts: ScriptGuard,
}

impl<S: CardStore> CardService<S> {
    /// Create a service using the default [`ScriptGuard`].
    pub fn new(store: S, site: SiteConfig) -> Self {
        Self {
            store,
            site,
            scripts: ScriptGuard::default(),
        }
    }

    /// Use a custom tracking-script policy.
    pub fn with_script_guard(mut self, scripts: ScriptGuard) -> Self {
        self.scripts = scripts;
        self
    }

    /// The backing record store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Base URLs used for share and image links.
    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Policy applied to stored tracking scripts.
    pub fn script_guard(&self) -> &ScriptGuard {
        &self.scripts
    }

    /// The signed-in user's active card.
    pub async fn user_card(&self, session: &Session) -> Result<Option<Card>> {
        self.store.find_active_card(session.user_id()).await
    }

    /// Public lookup. The username is matched case-insensitively.
    pub async fn card_by_username(&self, username: &str) -> Result<Option<Card>> {
        let username = username.trim().to_lowercase();
        if username.is_empty() {
            return Ok(None);
        }
        if let Some(card) = self.store.find_active_card_by_username(&username).await? {
            return Ok(Some(card));
        }
        let Some(user) = self.store.find_user_by_username(&username).await? else {
            tracing::debug!("No user named {username}");
            return Ok(None);
        };
        self.store.find_active_card(&user.id).await
    }

    /// Validates `draft` and writes it to the user's card, creating the card
    /// on first save.
    pub async fn save_card(&self, session: &Session, draft: CardDraft) -> Result<Card> {
        let mut errors = validate_card(&draft);
        let script = self.scripts.validate(&draft.tracking_script);
        if let Some(message) = script.error {
            errors.insert("tracking_script", message);
        }
        if !errors.is_empty() {
            return Err(WorkinfoError::InvalidCard(errors));
        }

        let existing = self.user_card(session).await?;
        let is_new = existing.is_none();
        let mut card = existing.unwrap_or_default();
        draft.apply_to(&mut card);
        card.user_id = session.user_id().to_string();
        card.username = session.username().to_string();
        card.is_active = true;

        if is_new {
            let card = self.store.create_card(card).await?;
            tracing::info!("Created card {} for {}", card.id, session.username());
            Ok(card)
        } else {
            let card = self.store.update_card(card).await?;
            tracing::info!("Updated card {} for {}", card.id, session.username());
            Ok(card)
        }
    }

    /// Deletes the user's card. Returns `false` when there was none.
    pub async fn delete_card(&self, session: &Session) -> Result<bool> {
        let Some(card) = self.user_card(session).await? else {
            return Ok(false);
        };
        self.store.delete_card(&card.id).await?;
        tracing::info!("Deleted card {} for {}", card.id, session.username());
        Ok(true)
    }

    /// Records an uploaded profile image on the user's card and returns its
    /// public URL. A minimal card is created if the user has none yet.
    pub async fn set_profile_image(&self, session: &Session, filename: &str) -> Result<String> {
        let filename = filename.trim();
        if filename.is_empty() || filename.contains('/') || filename.contains('\\') {
            return Err(WorkinfoError::InvalidCard(
                [("profile_image", "Invalid file name".to_string())].into(),
            ));
        }

        let card = match self.user_card(session).await? {
            Some(card) => card,
            None => {
                let minimal = Card {
                    user_id: session.user_id().to_string(),
                    username: session.username().to_string(),
                    is_active: true,
                    ..Card::default()
                };
                self.store.create_card(minimal).await?
            }
        };

        let card = self
            .store
            .update_card(Card {
                profile_image: filename.to_string(),
                ..card
            })
            .await?;
        Ok(self.profile_image_url(&card))
    }

    /// `true` if nobody has registered `username` yet.
    pub async fn username_available(&self, username: &str) -> Result<bool> {
        let username = username.trim().to_lowercase();
        Ok(self.store.find_user_by_username(&username).await?.is_none())
    }

    /// Public page URL: `{site_url}/users/{username}`.
    pub fn share_url(&self, username: &str) -> String {
        join_url(self.site.site_url(), &["users", username])
    }

    /// Backend file URL for the card's profile image, or an empty string.
    pub fn profile_image_url(&self, card: &Card) -> String {
        if card.profile_image.is_empty() || card.id.is_empty() {
            return String::new();
        }
        join_url(
            self.site.backend_url(),
            &["api", "files", "cards", &card.id, &card.profile_image],
        )
    }

    /// Registers the card's tracking script with `head`, if it is still valid.
    pub fn inject_tracking(&self, card: &Card, head: &mut impl HeadSink) -> bool {
        self.scripts.inject(&card.tracking_script, head)
    }
}

fn join_url(base: &str, segments: &[&str]) -> String {
    let Ok(mut url) = url::Url::parse(base) else {
        return format!("{}/{}", base.trim_end_matches('/'), segments.join("/"));
    };
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCardStore;

    fn service() -> CardService<MemoryCardStore> {
        CardService::new(MemoryCardStore::new(), SiteConfig::default())
    }

    #[test]
    fn share_url_format() {
        assert_eq!(service().share_url("jane"), "https://workinfo.me/users/jane");
    }

    #[test]
    fn share_url_encodes_segment() {
        assert_eq!(
            service().share_url("a b/c"),
            "https://workinfo.me/users/a%20b%2Fc"
        );
    }

    #[test]
    fn share_url_keeps_base_path() {
        let site = SiteConfig::new("https://example.com/cards/", "http://localhost:8090").unwrap();
        let service = CardService::new(MemoryCardStore::new(), site);
        assert_eq!(service.share_url("jane"), "https://example.com/cards/users/jane");
    }

    #[test]
    fn profile_image_url_format() {
        let card = Card {
            id: "abc123".into(),
            profile_image: "me_x1y2.png".into(),
            ..Card::default()
        };
        assert_eq!(
            service().profile_image_url(&card),
            "http://localhost:8090/api/files/cards/abc123/me_x1y2.png"
        );
    }

    #[test]
    fn profile_image_url_empty_without_image() {
        let card = Card {
            id: "abc123".into(),
            ..Card::default()
        };
        assert_eq!(service().profile_image_url(&card), "");
    }

    #[test]
    fn public_card_requirements() {
        let mut card = Card {
            username: "jane".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            is_active: true,
            ..Card::default()
        };
        assert!(is_public(&card));
        card.is_active = false;
        assert!(!is_public(&card));
        card.is_active = true;
        card.last_name = "  ".into();
        assert!(!is_public(&card));
    }

    #[test]
    fn card_deserializes_backend_record() {
        let card: Card = serde_json::from_str(
            r#"{"id":"c1","user_id":"u1","username":"jane","first_name":"Jane","is_active":true,"collectionName":"cards"}"#,
        )
        .unwrap();
        assert_eq!(card.id, "c1");
        assert_eq!(card.first_name, "Jane");
        assert!(card.is_active);
        assert_eq!(card.company, "");
    }
}
