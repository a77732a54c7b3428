//! `log` imports.
//!
//! The module writes a line in pieces with `write` and ends it with
//! `flush`, which emits the whole line as one `tracing` event under the
//! `wasm` target. Bytes are passed through lossily, so a line split inside
//! a multi-byte character is still reassembled before decoding.

use super::{with_context, with_memory};
use crate::context::BridgeContext;
use crate::platform::Platform;
use wasmtime::{Caller, Linker};

/// Register the logging imports
pub fn register<P: Platform>(linker: &mut Linker<BridgeContext<P>>) -> wasmtime::Result<()> {
    linker.func_wrap("log", "write", write::<P>)?;
    linker.func_wrap("log", "flush", flush::<P>)?;
    Ok(())
}

fn write<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, ptr: u32, len: u32) -> wasmtime::Result<()> {
    with_memory(&mut caller, "log.write", |mem, ctx| {
        let bytes = mem.bytes(ptr, len as usize)?;
        ctx.log_write(bytes);
        Ok(())
    })
}

fn flush<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>) -> wasmtime::Result<()> {
    with_context(&mut caller, "log.flush", |ctx| {
        ctx.log_flush();
        Ok(())
    })
}
