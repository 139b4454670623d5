//! Native buffer storage and the handle table binding buffers to
//! managed-object identities.
//!
//! Uses a handle-based approach: the script engine holds an opaque
//! [`BufferId`] and every native operation resolves it through
//! [`BufferTable`]. A lookup that misses means the boundary handed us an
//! identity it never constructed, which is a corrupted boundary and fatal.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Identity of a managed buffer object, as seen by the native side.
pub type BufferId = u64;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> BufferId {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

lazy_static::lazy_static! {
    /// Global storage for buffers bound to managed objects.
    static ref BUFFER_STORAGE: RwLock<HashMap<BufferId, NativeBuffer>> =
        RwLock::new(HashMap::new());
}

/// A fixed-length block of raw bytes.
///
/// The block is present iff the buffer was constructed with a non-zero
/// length, and is never re-pointed or resized afterwards. The length is
/// derived from the block itself, so the native and managed sides cannot
/// disagree about it.
pub struct NativeBuffer {
    block: Option<Box<[u8]>>,
}

impl NativeBuffer {
    /// Allocate `len` zeroed bytes. Zero length leaves the block absent.
    /// Allocation failure aborts the process; construction cannot proceed
    /// without backing memory.
    pub fn allocate(len: usize) -> Self {
        let block = if len > 0 {
            Some(vec![0u8; len].into_boxed_slice())
        } else {
            None
        };
        Self { block }
    }

    pub fn len(&self) -> usize {
        self.block.as_deref().map_or(0, |b| b.len())
    }

    pub fn is_empty(&self) -> bool {
        self.block.is_none()
    }

    pub fn as_slice(&self) -> &[u8] {
        self.block.as_deref().unwrap_or(&[])
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match self.block.as_deref_mut() {
            Some(block) => block,
            None => &mut [],
        }
    }

    /// Free the block. No-op when already absent.
    pub fn release(&mut self) {
        self.block = None;
    }
}

impl fmt::Debug for NativeBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.as_slice();
        let shown = &bytes[..bytes.len().min(16)];
        let ellipsis = if bytes.len() > 16 { ".." } else { "" };
        write!(
            f,
            "NativeBuffer({} bytes: {}{})",
            bytes.len(),
            hex::encode(shown),
            ellipsis
        )
    }
}

/// Fatal: the managed side referenced an identity this table never issued
/// (or one it already tore down).
fn die(id: BufferId) -> ! {
    panic!("buffer table has no entry for id {id}; managed/native binding is corrupt");
}

/// Handle table binding one [`NativeBuffer`] to one managed-object identity
/// for its entire lifetime.
pub struct BufferTable;

impl BufferTable {
    /// Construct the native backing for a new managed buffer object.
    /// Allocation happens here, once, never lazily.
    pub fn create(len: usize) -> BufferId {
        let id = next_id();
        BUFFER_STORAGE.write().insert(id, NativeBuffer::allocate(len));
        id
    }

    /// Read access to the buffer bound to `id`.
    pub fn with<R>(id: BufferId, f: impl FnOnce(&NativeBuffer) -> R) -> R {
        let storage = BUFFER_STORAGE.read();
        let buf = storage.get(&id).unwrap_or_else(|| die(id));
        f(buf)
    }

    /// Write access to the buffer bound to `id`.
    pub fn with_mut<R>(id: BufferId, f: impl FnOnce(&mut NativeBuffer) -> R) -> R {
        let mut storage = BUFFER_STORAGE.write();
        let buf = storage.get_mut(&id).unwrap_or_else(|| die(id));
        f(buf)
    }

    /// Read access to two buffers at once. `a` and `b` may be the same
    /// identity.
    pub fn with_two<R>(
        a: BufferId,
        b: BufferId,
        f: impl FnOnce(&NativeBuffer, &NativeBuffer) -> R,
    ) -> R {
        let storage = BUFFER_STORAGE.read();
        let buf_a = storage.get(&a).unwrap_or_else(|| die(a));
        let buf_b = storage.get(&b).unwrap_or_else(|| die(b));
        f(buf_a, buf_b)
    }

    /// Mutate `dst` while reading `src`. The identities must be distinct;
    /// aliased operands go through [`BufferTable::with_mut`] instead.
    pub fn with_pair<R>(
        dst: BufferId,
        src: BufferId,
        f: impl FnOnce(&mut NativeBuffer, &NativeBuffer) -> R,
    ) -> R {
        assert_ne!(dst, src, "with_pair requires distinct buffer identities");
        let mut storage = BUFFER_STORAGE.write();
        // Take the source out so both references can coexist; the lock is
        // held across the whole call, so the gap is not observable.
        let src_buf = storage.remove(&src).unwrap_or_else(|| die(src));
        let dst_buf = storage.get_mut(&dst).unwrap_or_else(|| die(dst));
        let result = f(dst_buf, &src_buf);
        storage.insert(src, src_buf);
        result
    }

    /// Length of the buffer bound to `id`.
    pub fn len(id: BufferId) -> usize {
        Self::with(id, |buf| buf.len())
    }

    /// Host teardown notification: free the native block and unbind the
    /// identity. The host calls this exactly once, when the managed object
    /// is reclaimed.
    pub fn release(id: BufferId) {
        let mut buf = BUFFER_STORAGE.write().remove(&id).unwrap_or_else(|| die(id));
        buf.release();
    }

    /// Number of live buffers.
    pub fn count() -> usize {
        BUFFER_STORAGE.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_zeroed() {
        let buf = NativeBuffer::allocate(4);
        assert_eq!(buf.len(), 4);
        assert!(!buf.is_empty());
        assert_eq!(buf.as_slice(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_zero_length_has_no_block() {
        let buf = NativeBuffer::allocate(0);
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        assert_eq!(buf.as_slice(), &[] as &[u8]);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut buf = NativeBuffer::allocate(8);
        buf.release();
        assert!(buf.is_empty());
        buf.release();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_table_create_and_access() {
        let id = BufferTable::create(3);
        assert_eq!(BufferTable::len(id), 3);
        BufferTable::with_mut(id, |buf| buf.as_mut_slice()[1] = 0xAA);
        let byte = BufferTable::with(id, |buf| buf.as_slice()[1]);
        assert_eq!(byte, 0xAA);
        BufferTable::release(id);
    }

    #[test]
    fn test_with_two_same_identity() {
        let id = BufferTable::create(2);
        let equal = BufferTable::with_two(id, id, |a, b| a.as_slice() == b.as_slice());
        assert!(equal);
        BufferTable::release(id);
    }

    #[test]
    fn test_with_pair_keeps_source_bound() {
        let dst = BufferTable::create(2);
        let src = BufferTable::create(2);
        BufferTable::with_pair(dst, src, |_, _| ());
        assert_eq!(BufferTable::len(src), 2);
        BufferTable::release(dst);
        BufferTable::release(src);
    }

    #[test]
    #[should_panic(expected = "binding is corrupt")]
    fn test_lookup_after_release_is_fatal() {
        let id = BufferTable::create(1);
        BufferTable::release(id);
        BufferTable::len(id);
    }

    #[test]
    fn test_debug_renders_hex() {
        let id = BufferTable::create(2);
        let rendered = BufferTable::with(id, |buf| format!("{:?}", buf));
        assert_eq!(rendered, "NativeBuffer(2 bytes: 0000)");
        BufferTable::release(id);
    }
}
