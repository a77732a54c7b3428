//! Typed windows over the module's linear memory.
//!
//! Every host call that exchanges structured data with the module goes
//! through a [`MemoryView`]. Values are little-endian, matching WASM.
//! Offsets need no alignment. Accesses past the end of memory fail with
//! `MemoryOutOfBounds` instead of touching anything.

use crate::error::{BridgeError, HostResult};

/// Borrowed view of linear memory for the duration of one host call
pub struct MemoryView<'a> {
    bytes: &'a mut [u8],
}

impl<'a> MemoryView<'a> {
    /// Wrap a linear memory buffer
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes }
    }

    /// Size of linear memory in bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    fn range(&self, ptr: u32, len: usize) -> HostResult<std::ops::Range<usize>> {
        let start = ptr as usize;
        start
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .map(|end| start..end)
            .ok_or_else(|| BridgeError::out_of_bounds(ptr, len, self.bytes.len()))
    }

    /// Read-only window of `len` bytes at `ptr`
    pub fn bytes(&self, ptr: u32, len: usize) -> HostResult<&[u8]> {
        let range = self.range(ptr, len)?;
        Ok(&self.bytes[range])
    }

    /// Read-write window of `len` bytes at `ptr`
    pub fn bytes_mut(&mut self, ptr: u32, len: usize) -> HostResult<&mut [u8]> {
        let range = self.range(ptr, len)?;
        Ok(&mut self.bytes[range])
    }

    /// Everything from `ptr` to the end of memory
    pub fn tail(&self, ptr: u32) -> HostResult<&[u8]> {
        let len = self.bytes.len().saturating_sub(ptr as usize);
        self.bytes(ptr, len)
    }

    /// Mutable window from `ptr` to the end of memory
    pub fn tail_mut(&mut self, ptr: u32) -> HostResult<&mut [u8]> {
        let len = self.bytes.len().saturating_sub(ptr as usize);
        self.bytes_mut(ptr, len)
    }

    fn read_array<const N: usize>(&self, ptr: u32) -> HostResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(ptr, N)?);
        Ok(out)
    }

    /// Read one `u32`
    pub fn read_u32(&self, ptr: u32) -> HostResult<u32> {
        self.read_array(ptr).map(u32::from_le_bytes)
    }

    /// Read one `i32`
    pub fn read_i32(&self, ptr: u32) -> HostResult<i32> {
        self.read_array(ptr).map(i32::from_le_bytes)
    }

    /// Read one `f32`
    pub fn read_f32(&self, ptr: u32) -> HostResult<f32> {
        self.read_array(ptr).map(f32::from_le_bytes)
    }

    /// Read `count` consecutive `u32`s
    pub fn read_u32s(&self, ptr: u32, count: usize) -> HostResult<Vec<u32>> {
        let bytes = self.bytes(ptr, count.saturating_mul(4))?;
        Ok(bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    /// Read `count` consecutive `i32`s
    pub fn read_i32s(&self, ptr: u32, count: usize) -> HostResult<Vec<i32>> {
        let bytes = self.bytes(ptr, count.saturating_mul(4))?;
        Ok(bytes
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    /// Read `count` consecutive `f32`s
    pub fn read_f32s(&self, ptr: u32, count: usize) -> HostResult<Vec<f32>> {
        let bytes = self.bytes(ptr, count.saturating_mul(4))?;
        Ok(bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    /// Write one `u32`
    pub fn write_u32(&mut self, ptr: u32, value: u32) -> HostResult<()> {
        self.bytes_mut(ptr, 4)?.copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Write one `i32`
    pub fn write_i32(&mut self, ptr: u32, value: i32) -> HostResult<()> {
        self.bytes_mut(ptr, 4)?.copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Write one `f32`
    pub fn write_f32(&mut self, ptr: u32, value: f32) -> HostResult<()> {
        self.bytes_mut(ptr, 4)?.copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Write bytes verbatim
    pub fn write_u8s(&mut self, ptr: u32, values: &[u8]) -> HostResult<()> {
        self.bytes_mut(ptr, values.len())?.copy_from_slice(values);
        Ok(())
    }

    /// Write consecutive `u16`s
    pub fn write_u16s(&mut self, ptr: u32, values: &[u16]) -> HostResult<()> {
        let dest = self.bytes_mut(ptr, values.len() * 2)?;
        for (chunk, value) in dest.chunks_exact_mut(2).zip(values) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        Ok(())
    }

    /// Write consecutive `u32`s
    pub fn write_u32s(&mut self, ptr: u32, values: &[u32]) -> HostResult<()> {
        let dest = self.bytes_mut(ptr, values.len() * 4)?;
        for (chunk, value) in dest.chunks_exact_mut(4).zip(values) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        Ok(())
    }

    /// Write consecutive `i32`s
    pub fn write_i32s(&mut self, ptr: u32, values: &[i32]) -> HostResult<()> {
        let dest = self.bytes_mut(ptr, values.len() * 4)?;
        for (chunk, value) in dest.chunks_exact_mut(4).zip(values) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        Ok(())
    }

    /// Write consecutive `f32`s
    pub fn write_f32s(&mut self, ptr: u32, values: &[f32]) -> HostResult<()> {
        let dest = self.bytes_mut(ptr, values.len() * 4)?;
        for (chunk, value) in dest.chunks_exact_mut(4).zip(values) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        Ok(())
    }
}
