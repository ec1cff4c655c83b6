use crate::error::Result;

/// Raw key-value persistence behind the local mirror.
///
/// Values are JSON strings. This trait handles the "how" of storage
/// (filesystem vs memory), while [`LocalMirror`](super::mirror::LocalMirror)
/// handles the "what" (keys, value shapes, change signal).
pub trait MirrorBackend {
    /// Returns Ok(None) when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value. MUST be atomic: readers see the old or new value,
    /// never a partial write.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    fn keys(&self) -> Result<Vec<String>>;
}
