use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::Res;

pub mod surreal;

// Traits.

/// Generic database client trait that clients must implement.
///
/// The bot only reads weekly gift-exchange pairings; the records themselves
/// are written by the companion service that runs the draw.
#[async_trait]
pub trait GenericDbClient: Send + Sync + 'static {
    /// Look up the nickname paired with `requester_id` in `group_id` for `week`.
    ///
    /// Returns `None` when no pairing exists for that week.
    async fn lookup_pairing(&self, requester_id: u64, group_id: u64, week: u32) -> Res<Option<String>>;
}

/// Database client for marong-bot.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct DbClient {
    /// The database client instance.
    pub inner: Arc<dyn GenericDbClient>,
}

impl Deref for DbClient {
    type Target = dyn GenericDbClient;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl DbClient {
    pub fn new(inner: Arc<dyn GenericDbClient>) -> Self {
        Self { inner }
    }
}

// Data types.

/// One weekly pairing: `requester_id` gives a gift to `partner_nickname`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingRecord {
    pub group_id: u64,
    pub week: u32,
    pub requester_id: u64,
    pub partner_nickname: String,
}
