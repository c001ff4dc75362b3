//! Transactional store over the three entity collections.
//!
//! Several operations write two entities together (user+club on club
//! creation, club+event on event lifecycle). The store therefore exposes a
//! single transactional boundary instead of per-entity calls: either every
//! write in a closure lands, or none do.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use clubhub_clubs::Club;
use clubhub_core::{ClubId, EventId, UserId};
use clubhub_events::Event;
use clubhub_users::User;

/// The persisted world: users, clubs, events.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub users: HashMap<UserId, User>,
    pub clubs: HashMap<ClubId, Club>,
    pub events: HashMap<EventId, Event>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Storage collaborator contract.
///
/// `transact` must be atomic and isolated: concurrent callers never observe
/// a half-applied closure, and a closure that returns `Err` leaves the state
/// untouched. `read` sees only committed state.
pub trait TransactionalStore: Send + Sync {
    fn read<R, E>(&self, f: impl FnOnce(&StoreState) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>;

    fn transact<R, E>(&self, f: impl FnOnce(&mut StoreState) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>;
}

/// In-memory store. Intended for tests/dev and single-process deployments.
///
/// Writes stage against a clone of the state and swap it in only on success,
/// so a failed multi-entity mutation cannot leave a partial write behind.
/// The lock serializes writers; readers share.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransactionalStore for InMemoryStore {
    fn read<R, E>(&self, f: impl FnOnce(&StoreState) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let guard = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        f(&guard)
    }

    fn transact<R, E>(&self, f: impl FnOnce(&mut StoreState) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let mut guard = self.state.write().map_err(|_| StoreError::LockPoisoned)?;

        let mut staged = guard.clone();
        let out = f(&mut staged)?;
        *guard = staged;
        Ok(out)
    }
}

impl<S: TransactionalStore> TransactionalStore for std::sync::Arc<S> {
    fn read<R, E>(&self, f: impl FnOnce(&StoreState) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        (**self).read(f)
    }

    fn transact<R, E>(&self, f: impl FnOnce(&mut StoreState) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        (**self).transact(f)
    }
}
