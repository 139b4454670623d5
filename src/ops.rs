//! The operation set: stateless algorithms over buffer contents.
//!
//! Every range anomaly (negative, oversized, reversed, zero-length) is policy
//! rather than an error: inputs are clamped or collapse to empty results.
//! Where a contract says the caller pre-clamps, the binding layer in
//! [`crate::bridge`] does so.

use crate::range::bound_range;

/// Lexicographic byte comparison with prefix ordering.
///
/// The first differing byte decides. If one buffer runs out before any
/// difference, the buffer with fewer remaining bytes sorts first. Result is
/// -1, 0 or 1 and antisymmetric.
pub fn compare(a: &[u8], b: &[u8]) -> i32 {
    let mut i = 0;
    let mut j = 0;
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            return -1;
        }
        if a[i] > b[j] {
            return 1;
        }
        i += 1;
        j += 1;
    }
    if j < b.len() {
        -1
    } else if i < a.len() {
        1
    } else {
        0
    }
}

/// Copy `src[src_from..src_to)` into `dst` starting at `dst_from`, advancing
/// both cursors together and stopping as soon as either the source range or
/// the destination capacity is exhausted. Returns the count actually copied;
/// truncation is silent. Ranges are assumed already clamped by the caller,
/// with `src_to >= src_from`.
pub fn copy_range(
    dst: &mut [u8],
    src: &[u8],
    src_from: usize,
    src_to: usize,
    dst_from: usize,
) -> usize {
    debug_assert!(src_to <= src.len());
    let mut copied = 0;
    let mut i = src_from;
    let mut j = dst_from;
    while i < src_to && j < dst.len() {
        dst[j] = src[i];
        copied += 1;
        i += 1;
        j += 1;
    }
    copied
}

/// Copy the whole of `src` into `dst` at offset 0.
pub fn copy_full(dst: &mut [u8], src: &[u8]) -> usize {
    copy_range(dst, src, 0, src.len(), 0)
}

/// [`copy_range`] over a single buffer, for calls that name the same object
/// as both source and destination. Same forward walk, so overlapping ranges
/// see bytes already written earlier in the same call.
pub fn copy_range_within(buf: &mut [u8], src_from: usize, src_to: usize, dst_from: usize) -> usize {
    debug_assert!(src_to <= buf.len());
    let mut copied = 0;
    let mut i = src_from;
    let mut j = dst_from;
    while i < src_to && j < buf.len() {
        buf[j] = buf[i];
        copied += 1;
        i += 1;
        j += 1;
    }
    copied
}

/// Write bytes from the start of `text` into `dst` at `offset`.
///
/// The offset is clamped into the buffer, then the requested length into the
/// remaining capacity and into the text size. Returns the byte count written.
pub fn write(dst: &mut [u8], text: &[u8], offset: i64, len: i64) -> usize {
    let offset = bound_range(offset, 0, dst.len());
    let len = bound_range(len, 0, dst.len() - offset);
    let len = bound_range(len as i64, 0, text.len());
    copy_range(dst, text, 0, len, offset)
}

/// Resolve `slice` indices against a buffer of length `len`.
///
/// Negative values are end-relative and fixed up before clamping; a reversed
/// range collapses to empty. Returns `(start, end)` with
/// `start <= end <= len`.
pub fn slice_bounds(len: usize, mut start: i64, mut end: i64) -> (usize, usize) {
    if start < 0 {
        start += len as i64;
    }
    let start = bound_range(start, 0, len);

    if end < 0 {
        end += len as i64;
    }
    let end = bound_range(end, 0, len);

    (start, end.max(start))
}

/// Resolve `toString` indices against a buffer of length `len`.
///
/// Clamp only; no end-relative fix-up here, unlike [`slice_bounds`]. The
/// asymmetry is part of the observable script contract.
pub fn string_bounds(len: usize, start: i64, end: i64) -> (usize, usize) {
    let start = bound_range(start, 0, len);
    let end = bound_range(end, 0, len);
    (start, end.max(start))
}

/// The byte span `toString` extracts: at most `end - start` bytes from
/// `start`, stopped at the first zero byte, which is never included.
pub fn extract_cstr(buf: &[u8], start: usize, end: usize) -> &[u8] {
    let span = &buf[start..end];
    match span.iter().position(|&b| b == 0) {
        Some(n) => &span[..n],
        None => span,
    }
}
