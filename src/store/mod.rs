//! Record store backends for users and cards.
//!
//! The hosted backend owns the actual schema; this trait is the narrow set of
//! queries the card service needs. The crate ships [`MemoryCardStore`].
//! Implement [`CardStore`] to talk to a real backend.

mod memory;

pub use memory::MemoryCardStore;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::error::Result;

/// Public part of a `users` record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// Backend holding the `users` and `cards` collections.
///
/// Only active cards (`is_active = true`) are returned by the lookups.
///
/// # Implementing a custom backend
///
/// ```rust,no_run
/// use workinfo::{Card, CardStore, Result, UserRecord};
///
/// struct RemoteStore;
///
/// impl CardStore for RemoteStore {
///     async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
///         Ok(None)
///     }
///     async fn find_active_card(&self, user_id: &str) -> Result<Option<Card>> {
///         Ok(None)
///     }
///     async fn find_active_card_by_username(&self, username: &str) -> Result<Option<Card>> {
///         Ok(None)
///     }
///     async fn create_card(&self, card: Card) -> Result<Card> {
///         Ok(card)
///     }
///     async fn update_card(&self, card: Card) -> Result<Card> {
///         Ok(card)
///     }
///     async fn delete_card(&self, id: &str) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait CardStore: Send + Sync + 'static {
    /// Look up a user by exact (lowercase) username.
    fn find_user_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>>> + Send;

    /// The active card owned by `user_id`, if any.
    fn find_active_card(&self, user_id: &str) -> impl Future<Output = Result<Option<Card>>> + Send;

    /// The active card whose denormalized `username` field matches.
    fn find_active_card_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<Card>>> + Send;

    /// Insert a new card. The store assigns the id.
    fn create_card(&self, card: Card) -> impl Future<Output = Result<Card>> + Send;

    /// Replace the card with the same id.
    fn update_card(&self, card: Card) -> impl Future<Output = Result<Card>> + Send;

    fn delete_card(&self, id: &str) -> impl Future<Output = Result<()>> + Send;
}
