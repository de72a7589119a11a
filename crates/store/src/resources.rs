//! Local mirrors of the remote collections.
//!
//! Each mirror is pessimistic: the local sequence changes only after the
//! server has acknowledged the mutation, and each change is a single
//! indivisible step after the one network suspension point. There is no
//! locking, no request de-duplication and no retry; concurrent calls race
//! and the last write wins, which is acceptable for a single-user client.

use api_types::{
    service::{ServiceType, ServiceTypeNew, ServiceTypeUpdate},
    transaction::{Transaction, TransactionNew, TransactionUpdate},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error};

use crate::api::{ApiClient, ApiError};

/// Where a freshly created record lands in the local sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertAt {
    Head,
    Tail,
}

/// Whether a failed operation reaches the caller or is only logged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailurePolicy {
    Absorb,
    Propagate,
}

/// Per-entity policy for mirroring one remote collection.
pub trait Resource: Clone + DeserializeOwned {
    /// Collection path on the remote API.
    const PATH: &'static str;
    const INSERT_AT: InsertAt;
    /// Applies to delete only; add and update failures always propagate.
    const DELETE_FAILURES: FailurePolicy;

    type New: Serialize + Sync;
    type Update: Serialize + Sync;

    fn id(&self) -> &str;
}

impl Resource for Transaction {
    const PATH: &'static str = "/transactions";
    // The till and the dashboard read newest-first.
    const INSERT_AT: InsertAt = InsertAt::Head;
    // A failed delete leaves the row on screen; the next fetch reconciles.
    const DELETE_FAILURES: FailurePolicy = FailurePolicy::Absorb;

    type New = TransactionNew;
    type Update = TransactionUpdate;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for ServiceType {
    const PATH: &'static str = "/services";
    const INSERT_AT: InsertAt = InsertAt::Tail;
    // The settings screen must know when a removal did not take.
    const DELETE_FAILURES: FailurePolicy = FailurePolicy::Propagate;

    type New = ServiceTypeNew;
    type Update = ServiceTypeUpdate;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Write-through mirror of one remote collection.
#[derive(Clone, Debug)]
pub struct ResourceStore<T: Resource> {
    api: ApiClient,
    items: Vec<T>,
}

impl<T: Resource> ResourceStore<T> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Replaces the whole mirror with the server's current sequence. On
    /// failure the existing sequence is untouched and the error comes back
    /// as a value for the caller to display or ignore; stale-but-valid state
    /// is the worst outcome.
    pub async fn fetch_all(&mut self) -> Result<(), ApiError> {
        match self.api.get_json::<Vec<T>>(T::PATH).await {
            Ok(items) => {
                self.items = items;
                Ok(())
            }
            Err(err) => {
                error!("failed to fetch {}: {err}", T::PATH);
                Err(err)
            }
        }
    }

    /// Creates the record remotely and mirrors the server's canonical copy,
    /// which may differ from the request (the id always does).
    pub async fn add(&mut self, new: &T::New) -> Result<(), ApiError> {
        match self.api.post_json::<_, T>(T::PATH, new).await {
            Ok(created) => {
                match T::INSERT_AT {
                    InsertAt::Head => self.items.insert(0, created),
                    InsertAt::Tail => self.items.push(created),
                }
                Ok(())
            }
            Err(err) => {
                error!("failed to add to {}: {err}", T::PATH);
                Err(err)
            }
        }
    }

    /// Applies a patch remotely and replaces the matching local record with
    /// the server's copy. A response with no local match is dropped: the
    /// record went away out of band and the next fetch settles it.
    pub async fn update(&mut self, id: &str, patch: &T::Update) -> Result<(), ApiError> {
        let path = format!("{}/{id}", T::PATH);
        match self.api.put_json::<_, T>(&path, patch).await {
            Ok(updated) => {
                match self.items.iter_mut().find(|item| item.id() == id) {
                    Some(slot) => *slot = updated,
                    None => debug!("update response for {path} has no local match, dropped"),
                }
                Ok(())
            }
            Err(err) => {
                error!("failed to update {path}: {err}");
                Err(err)
            }
        }
    }

    /// Deletes remotely, then locally (id assumed unique). Failure
    /// visibility follows `T::DELETE_FAILURES`.
    pub async fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        let path = format!("{}/{id}", T::PATH);
        match self.api.delete_unit(&path).await {
            Ok(()) => {
                self.items.retain(|item| item.id() != id);
                Ok(())
            }
            Err(err) => {
                error!("failed to delete {path}: {err}");
                match T::DELETE_FAILURES {
                    FailurePolicy::Absorb => Ok(()),
                    FailurePolicy::Propagate => Err(err),
                }
            }
        }
    }
}

/// Most-recent-first mirror of `/transactions`.
pub type TransactionStore = ResourceStore<Transaction>;

/// Insertion-ordered mirror of `/services`.
pub type ServiceStore = ResourceStore<ServiceType>;
