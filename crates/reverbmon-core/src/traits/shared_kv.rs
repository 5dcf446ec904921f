use crate::errors::StoreResult;

/// The primitives this system needs from an external shared key-value store:
/// plain get/set, atomic numeric increments, key-set tracking, delete.
///
/// The store itself (Redis or compatible) is an external collaborator; the
/// atomicity of `incr_by`/`incr_by_float` is what lets concurrent server
/// processes apply counter and gauge deltas without coordination.
pub trait SharedKv: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Atomically add `delta` to the integer at `key`, treating a missing
    /// key as zero. Returns the new value.
    fn incr_by(&self, key: &str, delta: i64) -> StoreResult<i64>;

    /// Atomically add `delta` to the float at `key`, treating a missing key
    /// as zero. Returns the new value.
    fn incr_by_float(&self, key: &str, delta: f64) -> StoreResult<f64>;

    /// Add `member` to the set stored at `key`.
    fn set_add(&self, key: &str, member: &str) -> StoreResult<()>;

    /// All members of the set stored at `key`; empty if the set is absent.
    fn set_members(&self, key: &str) -> StoreResult<Vec<String>>;

    fn del(&self, key: &str) -> StoreResult<()>;
}
