//! UTF-8 text exchange with linear memory.
//!
//! Reads accept an explicit `(ptr, len)` pair or scan for a NUL terminator.
//! Writes into fixed-capacity buffers truncate on a character boundary,
//! always terminate with NUL and optionally report the written length.

use crate::error::HostResult;
use crate::memory::MemoryView;

/// Decode `len` bytes at `ptr`; invalid sequences become U+FFFD
pub fn read_str(mem: &MemoryView<'_>, ptr: u32, len: usize) -> HostResult<String> {
    Ok(String::from_utf8_lossy(mem.bytes(ptr, len)?).into_owned())
}

/// Decode a NUL-terminated string at `ptr`.
///
/// A string running to the end of memory without a terminator is taken
/// as-is.
pub fn read_cstr(mem: &MemoryView<'_>, ptr: u32) -> HostResult<String> {
    let tail = mem.tail(ptr)?;
    let len = tail.iter().position(|b| *b == 0).unwrap_or(tail.len());
    Ok(String::from_utf8_lossy(&tail[..len]).into_owned())
}

/// Decode with an explicit length when one is given, else scan for NUL
pub fn read_str_or_cstr(mem: &MemoryView<'_>, ptr: u32, len: Option<usize>) -> HostResult<String> {
    match len {
        Some(len) => read_str(mem, ptr, len),
        None => read_cstr(mem, ptr),
    }
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char
fn fitting_prefix(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Write `s` into a buffer of `capacity` bytes at `ptr`, NUL-terminated.
///
/// At most `capacity - 1` content bytes are written. When `len_ptr` is
/// non-zero the number of content bytes is stored there as an `i32`.
/// A zero capacity writes no bytes at all. Returns the content length.
pub fn write_cstr(
    mem: &mut MemoryView<'_>,
    ptr: u32,
    capacity: usize,
    len_ptr: u32,
    s: &str,
) -> HostResult<usize> {
    let written = match capacity {
        0 => 0,
        _ => {
            let content = fitting_prefix(s, capacity - 1).as_bytes();
            let dest = mem.bytes_mut(ptr, content.len() + 1)?;
            dest[..content.len()].copy_from_slice(content);
            dest[content.len()] = 0;
            content.len()
        }
    };

    if len_ptr != 0 {
        mem.write_i32(len_ptr, written as i32)?;
    }
    Ok(written)
}

/// Write the UTF-8 bytes of `s` at `ptr` without a terminator
pub fn write_str(mem: &mut MemoryView<'_>, ptr: u32, s: &str) -> HostResult<usize> {
    mem.write_u8s(ptr, s.as_bytes())?;
    Ok(s.len())
}
