//! The binding boundary: argument validation and marshaling between managed
//! script values and the native operation set.
//!
//! Shape checks (arity, value kinds) happen here, before any core algorithm
//! runs. Past this point range problems are never errors; they are clamped in
//! exactly the places the script contract specifies.

use thiserror::Error;

use crate::buffer::{BufferId, BufferTable};
use crate::ops;
use crate::range::bound_range;

/// A value crossing the script/native boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Number(i64),
    Text(String),
    Buffer(BufferId),
}

impl Value {
    fn as_number(&self, index: usize) -> Result<i64, BindingError> {
        match self {
            Value::Number(n) => Ok(*n),
            _ => Err(BindingError::WrongArgType {
                index,
                expected: "number",
            }),
        }
    }

    fn as_text(&self, index: usize) -> Result<&str, BindingError> {
        match self {
            Value::Text(s) => Ok(s),
            _ => Err(BindingError::WrongArgType {
                index,
                expected: "string",
            }),
        }
    }

    fn as_buffer(&self, index: usize) -> Result<BufferId, BindingError> {
        match self {
            Value::Buffer(id) => Ok(*id),
            _ => Err(BindingError::WrongArgType {
                index,
                expected: "buffer",
            }),
        }
    }
}

/// Script-visible boundary-validation failures.
///
/// Raised before any core logic executes; the operation set itself never
/// produces this class. Invariant violations (corrupt handle, failed
/// allocation) are fatal instead and never surface here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindingError {
    #[error("expected {expected} arguments, got {got}")]
    WrongArgCount { expected: usize, got: usize },
    #[error("argument {index}: expected {expected}")]
    WrongArgType { index: usize, expected: &'static str },
    #[error("unknown buffer method: {0}")]
    UnknownMethod(String),
}

fn check_arity(args: &[Value], expected: usize) -> Result<(), BindingError> {
    if args.len() != expected {
        return Err(BindingError::WrongArgCount {
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

/// Object-allocation capability: mint a new managed buffer object backed by
/// a freshly constructed native block. Synchronous; completes (or dies)
/// before returning. Used by the constructor binding and by `slice`.
pub fn create_buffer(len: usize) -> BufferId {
    BufferTable::create(len)
}

/// Constructor binding: `Buffer(length) -> buffer`. A negative requested
/// length collapses to an empty buffer.
pub fn buffer_new(_this: BufferId, args: &[Value]) -> Result<Value, BindingError> {
    check_arity(args, 1)?;
    let len = args[0].as_number(0)?.max(0) as usize;
    Ok(Value::Buffer(create_buffer(len)))
}

/// `compare(other) -> int`
pub fn buffer_compare(this: BufferId, args: &[Value]) -> Result<Value, BindingError> {
    check_arity(args, 1)?;
    let other = args[0].as_buffer(0)?;

    let ordering =
        BufferTable::with_two(this, other, |a, b| ops::compare(a.as_slice(), b.as_slice()));
    Ok(Value::Number(ordering as i64))
}

/// `copy(dst, dstStart, srcStart, srcEnd) -> int`
///
/// `this` is the source. All three indices are clamped here, and a reversed
/// source range is forced empty, before the copy runs.
pub fn buffer_copy(this: BufferId, args: &[Value]) -> Result<Value, BindingError> {
    check_arity(args, 4)?;
    let dst = args[0].as_buffer(0)?;
    let dst_start = args[1].as_number(1)?;
    let src_start = args[2].as_number(2)?;
    let src_end = args[3].as_number(3)?;

    let src_len = BufferTable::len(this);
    let dst_len = BufferTable::len(dst);

    let dst_start = bound_range(dst_start, 0, dst_len);
    let src_start = bound_range(src_start, 0, src_len);
    let src_end = bound_range(src_end, 0, src_len).max(src_start);

    let copied = if dst == this {
        BufferTable::with_mut(dst, |buf| {
            ops::copy_range_within(buf.as_mut_slice(), src_start, src_end, dst_start)
        })
    } else {
        BufferTable::with_pair(dst, this, |dst_buf, src_buf| {
            ops::copy_range(
                dst_buf.as_mut_slice(),
                src_buf.as_slice(),
                src_start,
                src_end,
                dst_start,
            )
        })
    };
    Ok(Value::Number(copied as i64))
}

/// `write(text, offset, length) -> int`
pub fn buffer_write(this: BufferId, args: &[Value]) -> Result<Value, BindingError> {
    check_arity(args, 3)?;
    let text = args[0].as_text(0)?;
    let offset = args[1].as_number(1)?;
    let len = args[2].as_number(2)?;

    let written = BufferTable::with_mut(this, |buf| {
        ops::write(buf.as_mut_slice(), text.as_bytes(), offset, len)
    });
    Ok(Value::Number(written as i64))
}

/// `slice(start, end) -> buffer`
///
/// Mints a new managed buffer through the factory and copies the selected
/// span into it. The original is unmodified.
pub fn buffer_slice(this: BufferId, args: &[Value]) -> Result<Value, BindingError> {
    check_arity(args, 2)?;
    let start = args[0].as_number(0)?;
    let end = args[1].as_number(1)?;

    let (start, end) = BufferTable::with(this, |buf| ops::slice_bounds(buf.len(), start, end));

    let new_id = create_buffer(end - start);
    BufferTable::with_pair(new_id, this, |dst_buf, src_buf| {
        ops::copy_range(dst_buf.as_mut_slice(), src_buf.as_slice(), start, end, 0)
    });
    Ok(Value::Buffer(new_id))
}

/// `toString(start, end) -> string`
pub fn buffer_to_string(this: BufferId, args: &[Value]) -> Result<Value, BindingError> {
    check_arity(args, 2)?;
    let start = args[0].as_number(0)?;
    let end = args[1].as_number(1)?;

    let text = BufferTable::with(this, |buf| {
        let (start, end) = ops::string_bounds(buf.len(), start, end);
        String::from_utf8_lossy(ops::extract_cstr(buf.as_slice(), start, end)).into_owned()
    });
    Ok(Value::Text(text))
}
