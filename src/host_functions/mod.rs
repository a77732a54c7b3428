//! Host functions imported by the module.
//!
//! Imports live in three namespaces: `wio` (surfaces, input, joystick and
//! dialogs), `log` and `gl`. Every import is a free function over a
//! `Caller<BridgeContext<P>>` and goes through one of the `with_*` helpers
//! below, which count the call, resolve linear memory or the graphics
//! context as needed, and turn a [`BridgeError`] into a trap tagged with
//! the import's name.

pub mod gl;
pub mod joystick;
pub mod logging;
pub mod window;

use crate::context::BridgeContext;
use crate::error::{BridgeError, HostResult};
use crate::graphics::Graphics;
use crate::memory::MemoryView;
use crate::platform::Platform;
use tracing::{trace, warn};
use wasmtime::{Caller, Extern, Linker, Memory};

/// Register every import on `linker`
pub fn register_host_functions<P: Platform>(linker: &mut Linker<BridgeContext<P>>) -> wasmtime::Result<()> {
    window::register(linker)?;
    joystick::register(linker)?;
    logging::register(linker)?;
    gl::register(linker)?;
    Ok(())
}

/// Wasm boolean
pub(crate) fn flag(value: i32) -> bool {
    value != 0
}

/// Run a host call that only touches the context
pub(crate) fn with_context<P: Platform, R>(
    caller: &mut Caller<'_, BridgeContext<P>>,
    import: &'static str,
    call: impl FnOnce(&mut BridgeContext<P>) -> HostResult<R>,
) -> wasmtime::Result<R> {
    let ctx = caller.data_mut();
    let result = call(ctx);
    finish(ctx, import, result)
}

/// Run a host call that reads or writes linear memory
pub(crate) fn with_memory<P: Platform, R>(
    caller: &mut Caller<'_, BridgeContext<P>>,
    import: &'static str,
    call: impl FnOnce(&mut MemoryView<'_>, &mut BridgeContext<P>) -> HostResult<R>,
) -> wasmtime::Result<R> {
    let memory = match exported_memory(caller) {
        Ok(memory) => memory,
        Err(err) => return finish(caller.data_mut(), import, Err(err)),
    };
    let (bytes, ctx) = memory.data_and_store_mut(&mut *caller);
    let mut view = MemoryView::new(bytes);
    let result = call(&mut view, ctx);
    finish(ctx, import, result)
}

/// Run a forwarded graphics call
pub(crate) fn with_gl<P: Platform, R>(
    caller: &mut Caller<'_, BridgeContext<P>>,
    import: &'static str,
    call: impl FnOnce(&mut Graphics<P::Graphics>) -> HostResult<R>,
) -> wasmtime::Result<R> {
    with_context(caller, import, |ctx| call(ctx.graphics_mut()?))
}

/// Run a forwarded graphics call that marshals through linear memory
pub(crate) fn with_gl_memory<P: Platform, R>(
    caller: &mut Caller<'_, BridgeContext<P>>,
    import: &'static str,
    call: impl FnOnce(&mut MemoryView<'_>, &mut Graphics<P::Graphics>) -> HostResult<R>,
) -> wasmtime::Result<R> {
    with_memory(caller, import, |mem, ctx| call(mem, ctx.graphics_mut()?))
}

fn exported_memory<P: Platform>(caller: &mut Caller<'_, BridgeContext<P>>) -> HostResult<Memory> {
    if let Some(memory) = caller.data().memory() {
        return Ok(memory);
    }
    let name = caller.data().config().memory_export.clone();
    let memory = caller
        .get_export(&name)
        .and_then(Extern::into_memory)
        .ok_or_else(|| BridgeError::missing_export(name))?;
    caller.data_mut().set_memory(memory);
    Ok(memory)
}

fn finish<P: Platform, R>(
    ctx: &mut BridgeContext<P>,
    import: &'static str,
    result: HostResult<R>,
) -> wasmtime::Result<R> {
    ctx.metrics.record_call(import);
    if ctx.config.trace_host_calls {
        trace!(import, ok = result.is_ok(), "Host call");
    }
    result.map_err(|err| {
        ctx.metrics.record_error(err.code);
        warn!(import, code = %err.code, "{}", err.message);
        wasmtime::Error::from(err.with_import(import))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeConfig;
    use crate::error::{ErrorCode, RuntimeError};
    use crate::testing::MockPlatform;
    use wasmtime::{Engine, Instance, Module, Store};

    pub(crate) fn instantiate(
        wat: &str,
        targets: Vec<u32>,
    ) -> (Store<BridgeContext<MockPlatform>>, Instance) {
        let engine = Engine::default();
        let module = Module::new(&engine, wat).unwrap();
        let mut linker = Linker::new(&engine);
        register_host_functions(&mut linker).unwrap();
        let ctx = BridgeContext::new(BridgeConfig::default(), MockPlatform::default(), targets);
        let mut store = Store::new(&engine, ctx);
        let instance = linker.instantiate(&mut store, &module).unwrap();
        (store, instance)
    }

    #[test]
    fn test_failed_call_traps_with_code() {
        let (mut store, instance) = instantiate(
            r#"(module
                (import "wio" "shift" (func $shift (param i32) (result i32)))
                (memory (export "memory") 1)
                (func (export "run") (result i32) (call $shift (i32.const 4))))"#,
            vec![],
        );
        let run = instance.get_typed_func::<(), i32>(&mut store, "run").unwrap();
        let err = run.call(&mut store, ()).unwrap_err();

        match RuntimeError::from_trap(err) {
            RuntimeError::Bridge(err) => {
                assert_eq!(err.code, ErrorCode::InvalidSurface);
                assert_eq!(err.import.as_deref(), Some("wio.shift"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.data().metrics().calls("wio.shift"), 1);
    }

    #[test]
    fn test_missing_memory_export() {
        let (mut store, instance) = instantiate(
            r#"(module
                (import "log" "write" (func $write (param i32 i32)))
                (func (export "run") (call $write (i32.const 0) (i32.const 1))))"#,
            vec![],
        );
        let run = instance.get_typed_func::<(), ()>(&mut store, "run").unwrap();
        let err = run.call(&mut store, ()).unwrap_err();
        assert_eq!(RuntimeError::from_trap(err).to_bridge_error().code, ErrorCode::MissingExport);
    }

    #[test]
    fn test_flag() {
        assert!(flag(1));
        assert!(flag(-1));
        assert!(!flag(0));
    }
}
