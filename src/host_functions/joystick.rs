//! `wio` joystick imports.
//!
//! They read the gamepad snapshot cached on the context, which
//! `getJoystickCount` and gamepad-connected notifications refresh.

use super::{with_context, with_memory};
use crate::context::BridgeContext;
use crate::platform::Platform;
use crate::strings::write_str;
use wasmtime::{Caller, Linker};

/// Register the joystick imports
pub fn register<P: Platform>(linker: &mut Linker<BridgeContext<P>>) -> wasmtime::Result<()> {
    linker.func_wrap("wio", "getJoystickCount", get_joystick_count::<P>)?;
    linker.func_wrap("wio", "getJoystickIdLen", get_joystick_id_len::<P>)?;
    linker.func_wrap("wio", "getJoystickId", get_joystick_id::<P>)?;
    linker.func_wrap("wio", "openJoystick", open_joystick::<P>)?;
    linker.func_wrap("wio", "getJoystickState", get_joystick_state::<P>)?;
    Ok(())
}

fn get_joystick_count<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>) -> wasmtime::Result<i32> {
    with_context(&mut caller, "wio.getJoystickCount", |ctx| Ok(ctx.refresh_gamepads() as i32))
}

fn get_joystick_id_len<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, index: i32) -> wasmtime::Result<i32> {
    with_context(&mut caller, "wio.getJoystickIdLen", |ctx| {
        Ok(ctx.gamepad(index).map_or(0, |pad| pad.id.len() as i32))
    })
}

fn get_joystick_id<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, index: i32, ptr: u32) -> wasmtime::Result<()> {
    with_memory(&mut caller, "wio.getJoystickId", |mem, ctx| {
        if let Some(pad) = ctx.gamepad(index) {
            write_str(mem, ptr, &pad.id)?;
        }
        Ok(())
    })
}

fn open_joystick<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, index: i32, ptr: u32) -> wasmtime::Result<i32> {
    with_memory(&mut caller, "wio.openJoystick", |mem, ctx| {
        let Some(pad) = ctx.connected_gamepad(index) else {
            return Ok(0);
        };
        mem.write_u32s(ptr, &[pad.axes.len() as u32, pad.buttons.len() as u32])?;
        Ok(1)
    })
}

/// Axes go out as `u16`, buttons as `u8` 0/1; at most the lengths given
fn get_joystick_state<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    index: i32,
    axes_ptr: u32,
    axes_len: u32,
    buttons_ptr: u32,
    buttons_len: u32,
) -> wasmtime::Result<i32> {
    with_memory(&mut caller, "wio.getJoystickState", |mem, ctx| {
        let Some(pad) = ctx.connected_gamepad(index) else {
            return Ok(0);
        };
        let axes: Vec<u16> = pad.axes_u16().take(axes_len as usize).collect();
        let buttons: Vec<u8> = pad
            .buttons
            .iter()
            .take(buttons_len as usize)
            .map(|pressed| u8::from(*pressed))
            .collect();
        mem.write_u16s(axes_ptr, &axes)?;
        mem.write_u8s(buttons_ptr, &buttons)?;
        Ok(1)
    })
}
