//! Bufrt - native byte-buffer backing store for embedded script runtimes.
//!
//! A managed script object's binary payload lives in a fixed-length native
//! block owned on this side of the boundary. The crate provides:
//!
//! - the block itself and the handle table binding it 1:1 to a
//!   managed-object identity ([`buffer`])
//! - the bounds-clamped operation set: compare, copy, write, slice and
//!   NUL-stopped string extraction ([`ops`])
//! - the binding boundary that validates argument shapes and marshals
//!   values ([`bridge`])
//! - the process-wide builtin method registry ([`registry`])
//!
//! Range and index anomalies are policy, never errors: out-of-range inputs
//! are clamped and reversed ranges collapse to empty results. The only
//! script-visible error class is boundary validation (wrong argument count
//! or type); a corrupted handle binding or a failed allocation is fatal.
//!
//! # Example
//!
//! ```rust
//! use bufrt::{builtin_registry, create_buffer, BufferTable, Value};
//!
//! let buf = create_buffer(5);
//! let registry = builtin_registry();
//!
//! let written = registry
//!     .call(buf, "write", &[Value::Text("hello".into()), Value::Number(0), Value::Number(5)])
//!     .unwrap();
//! assert_eq!(written, Value::Number(5));
//!
//! let text = registry
//!     .call(buf, "toString", &[Value::Number(0), Value::Number(5)])
//!     .unwrap();
//! assert_eq!(text, Value::Text("hello".into()));
//!
//! // Host teardown notification, exactly once per object.
//! BufferTable::release(buf);
//! ```

pub mod bridge;
pub mod buffer;
pub mod ops;
pub mod range;
pub mod registry;

pub use bridge::{create_buffer, BindingError, Value};
pub use buffer::{BufferId, BufferTable, NativeBuffer};
pub use registry::{builtin_registry, BuiltinRegistry, MethodEntry, NativeFn};
