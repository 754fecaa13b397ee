//! In-memory view of the store.
//!
//! - [`BucketRegistry`]: the set of buckets, guarded by a reader/writer lock
//!   that only bucket creation takes exclusively.
//! - [`BucketState`]: one bucket and its [`ObjectIndex`].
//! - [`ObjectIndex`]: the published, sorted key to [`ObjectRecord`] map of a
//!   bucket. Readers clone an `Arc` out of it and never block writers of
//!   other keys.
//! - [`ObjectRecord`]: an immutable object version; overwrites replace the
//!   whole record.

pub(crate) mod bucket;
pub(crate) mod index;
pub(crate) mod object;
pub(crate) mod registry;

pub use bucket::BucketState;
pub use index::ObjectIndex;
pub use object::{ObjectLocation, ObjectRecord};
pub use registry::BucketRegistry;
