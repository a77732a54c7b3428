//! `wio` imports for surfaces, input polling and dialogs.

use super::{flag, with_context, with_memory};
use crate::context::BridgeContext;
use crate::platform::Platform;
use crate::strings::read_str;
use wasmtime::{Caller, Linker};

/// Register the surface imports
pub fn register<P: Platform>(linker: &mut Linker<BridgeContext<P>>) -> wasmtime::Result<()> {
    linker.func_wrap("wio", "createWindow", create_window::<P>)?;
    linker.func_wrap("wio", "shift", shift::<P>)?;
    linker.func_wrap("wio", "shiftFloat", shift_float::<P>)?;
    linker.func_wrap("wio", "setFullscreen", set_fullscreen::<P>)?;
    linker.func_wrap("wio", "setSize", set_size::<P>)?;
    linker.func_wrap("wio", "setCursor", set_cursor::<P>)?;
    linker.func_wrap("wio", "setCursorMode", set_cursor_mode::<P>)?;
    linker.func_wrap("wio", "enableTextInput", enable_text_input::<P>)?;
    linker.func_wrap("wio", "disableTextInput", disable_text_input::<P>)?;
    linker.func_wrap("wio", "setClipboardText", set_clipboard_text::<P>)?;
    linker.func_wrap("wio", "messageBox", message_box::<P>)?;
    Ok(())
}

fn create_window<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, width: u32, height: u32) -> wasmtime::Result<i32> {
    with_context(&mut caller, "wio.createWindow", |ctx| ctx.create_surface(width, height))
}

fn shift<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, id: i32) -> wasmtime::Result<i32> {
    with_context(&mut caller, "wio.shift", |ctx| ctx.shift(id))
}

fn shift_float<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, id: i32) -> wasmtime::Result<f32> {
    with_context(&mut caller, "wio.shiftFloat", |ctx| ctx.shift_float(id))
}

fn set_fullscreen<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, id: i32, on: i32) -> wasmtime::Result<()> {
    with_context(&mut caller, "wio.setFullscreen", |ctx| ctx.set_fullscreen(id, flag(on)))
}

fn set_size<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, id: i32, width: u32, height: u32) -> wasmtime::Result<()> {
    with_context(&mut caller, "wio.setSize", |ctx| ctx.set_size(id, width, height))
}

fn set_cursor<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, id: i32, cursor: u32) -> wasmtime::Result<()> {
    with_context(&mut caller, "wio.setCursor", |ctx| ctx.set_cursor(id, cursor))
}

fn set_cursor_mode<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, id: i32, mode: u32) -> wasmtime::Result<()> {
    with_context(&mut caller, "wio.setCursorMode", |ctx| ctx.set_cursor_mode(id, mode))
}

fn enable_text_input<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, id: i32, x: i32, y: i32) -> wasmtime::Result<()> {
    with_context(&mut caller, "wio.enableTextInput", |ctx| ctx.enable_text_input(id, x, y))
}

fn disable_text_input<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, id: i32) -> wasmtime::Result<()> {
    with_context(&mut caller, "wio.disableTextInput", |ctx| ctx.disable_text_input(id))
}

fn set_clipboard_text<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, ptr: u32, len: u32) -> wasmtime::Result<()> {
    with_memory(&mut caller, "wio.setClipboardText", |mem, ctx| {
        let text = read_str(mem, ptr, len as usize)?;
        ctx.set_clipboard_text(&text);
        Ok(())
    })
}

fn message_box<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, ptr: u32, len: u32) -> wasmtime::Result<()> {
    with_memory(&mut caller, "wio.messageBox", |mem, ctx| {
        let text = read_str(mem, ptr, len as usize)?;
        ctx.message_box(&text);
        Ok(())
    })
}
