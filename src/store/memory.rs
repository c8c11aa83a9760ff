//! In-memory record store.

use tokio::sync::RwLock;

use crate::card::Card;
use crate::error::{Result, WorkinfoError};
use crate::store::{CardStore, UserRecord};

#[derive(Default)]
struct Collections {
    users: Vec<UserRecord>,
    cards: Vec<Card>,
    next_id: u64,
}

/// [`CardStore`] kept in process memory. Useful for tests and local demos.
///
/// # Example
///
/// ```
/// use workinfo::{MemoryCardStore, UserRecord};
///
/// # async fn example() {
/// let store = MemoryCardStore::new();
/// store
///     .add_user(UserRecord { id: "u1".into(), username: "jane".into(), email: "jane@example.com".into() })
///     .await;
/// # }
/// ```
#[derive(Default)]
pub struct MemoryCardStore {
    inner: RwLock<Collections>,
}

impl MemoryCardStore {
    /// Create an empty store with no users or cards.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user record. Usernames are stored lowercase.
    pub async fn add_user(&self, mut user: UserRecord) {
        user.username = user.username.to_lowercase();
        self.inner.write().await.users.push(user);
    }

    /// All cards, active or not.
    pub async fn cards(&self) -> Vec<Card> {
        self.inner.read().await.cards.clone()
    }
}

impl CardStore for MemoryCardStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_active_card(&self, user_id: &str) -> Result<Option<Card>> {
        let inner = self.inner.read().await;
        Ok(inner
            .cards
            .iter()
            .find(|c| c.is_active && c.user_id == user_id)
            .cloned())
    }

    async fn find_active_card_by_username(&self, username: &str) -> Result<Option<Card>> {
        let inner = self.inner.read().await;
        Ok(inner
            .cards
            .iter()
            .find(|c| c.is_active && c.username == username)
            .cloned())
    }

    async fn create_card(&self, mut card: Card) -> Result<Card> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        card.id = format!("card{:06}", inner.next_id);
        inner.cards.push(card.clone());
        tracing::debug!("Created card {}", card.id);
        Ok(card)
    }

    async fn update_card(&self, card: Card) -> Result<Card> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .cards
            .iter_mut()
            .find(|c| c.id == card.id)
            .ok_or_else(|| WorkinfoError::NotFound(format!("card {}", card.id)))?;
        *slot = card.clone();
        Ok(card)
    }

    async fn delete_card(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        let before = inner.cards.len();
        inner.cards.retain(|c| c.id != id);
        if inner.cards.len() == before {
            return Err(WorkinfoError::NotFound(format!("card {id}")));
        }
        tracing::debug!("Deleted card {id}");
        Ok(())
    }
}
