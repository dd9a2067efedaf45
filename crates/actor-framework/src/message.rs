//! # Generic Messages
//!
//! This module defines the request types exchanged between the `ResourceClient`
//! and the `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use std::fmt;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// A predicate over stored records, evaluated inside the actor.
pub struct Filter<T>(Box<dyn Fn(&T) -> bool + Send + Sync>);

impl<T> Filter<T> {
    pub fn new(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self(Box::new(predicate))
    }

    pub fn matches(&self, item: &T) -> bool {
        (self.0)(item)
    }
}

impl<T> fmt::Debug for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Filter(..)")
    }
}

/// Internal message type sent to the actor to request operations.
///
/// # Keyed Storage Pattern
/// Each actor owns one table of records of a single [`ActorEntity`] type. The variants
/// cover what a keyed store with secondary indexes needs:
///
/// - **Create**: Put. Builds the record from [`ActorEntity::Create`] and stores it under
///   its own id, replacing any previous record with the same id.
/// - **Get**: Point read by primary key.
/// - **Update**: Conditional mutation. When `expected` is set, the stored version must
///   match or the request fails with [`FrameworkError::VersionConflict`].
/// - **Delete**: Removal. Answers whether a record was actually removed.
/// - **Lookup**: All records reachable under a secondary index key.
/// - **Retain**: Keeps only the records matching the filter and answers how many were
///   removed.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        expected: Option<T::Version>,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<bool>,
    },
    Lookup {
        key: T::IndexKey,
        respond_to: Response<Vec<T>>,
    },
    Retain {
        keep: Filter<T>,
        respond_to: Response<usize>,
    },
}
