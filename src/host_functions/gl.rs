//! `gl` imports: the GLES2 call forwarder.
//!
//! Import names are the GLES2 entry points without their `gl` prefix.
//! Object arguments and results are handles into the shared table on
//! [`Graphics`]; 0 stands for "no object" wherever GL accepts none.
//! Every call except `init` traps until `init` has created a context.

use super::{flag, with_context, with_gl, with_gl_memory, with_memory};
use crate::context::BridgeContext;
use crate::error::{BridgeError, HostResult};
use crate::graphics::forward::{count, data_or_zeroed, optional_tail, write_active_info, write_string};
use crate::graphics::{Graphics, GraphicsContext, ParamRepr};
use crate::handles::Handle;
use crate::metrics::BridgeMetrics;
use crate::platform::Platform;
use crate::strings::read_cstr;
use wasmtime::{Caller, Linker};

/// Pure parameter translations, no handles and no memory
macro_rules! forward {
    ($($name:ident($($arg:ident: $ty:ty),*) => $import:literal, |$gl:ident| $call:expr;)*) => {
        $(
            fn $name<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, $($arg: $ty),*) -> wasmtime::Result<()> {
                with_gl(&mut caller, concat!("gl.", $import), |graphics| {
                    let $gl = &mut graphics.context;
                    $call;
                    Ok(())
                })
            }
        )*
    };
}

/// Register the graphics imports
pub fn register<P: Platform>(linker: &mut Linker<BridgeContext<P>>) -> wasmtime::Result<()> {
    linker.func_wrap("gl", "init", init::<P>)?;

    linker.func_wrap("gl", "activeTexture", active_texture::<P>)?;
    linker.func_wrap("gl", "attachShader", attach_shader::<P>)?;
    linker.func_wrap("gl", "bindAttribLocation", bind_attrib_location::<P>)?;
    linker.func_wrap("gl", "bindBuffer", bind_buffer::<P>)?;
    linker.func_wrap("gl", "bindFramebuffer", bind_framebuffer::<P>)?;
    linker.func_wrap("gl", "bindRenderbuffer", bind_renderbuffer::<P>)?;
    linker.func_wrap("gl", "bindTexture", bind_texture::<P>)?;
    linker.func_wrap("gl", "blendColor", blend_color::<P>)?;
    linker.func_wrap("gl", "blendEquation", blend_equation::<P>)?;
    linker.func_wrap("gl", "blendEquationSeparate", blend_equation_separate::<P>)?;
    linker.func_wrap("gl", "blendFunc", blend_func::<P>)?;
    linker.func_wrap("gl", "blendFuncSeparate", blend_func_separate::<P>)?;
    linker.func_wrap("gl", "bufferData", buffer_data::<P>)?;
    linker.func_wrap("gl", "bufferSubData", buffer_sub_data::<P>)?;
    linker.func_wrap("gl", "checkFramebufferStatus", check_framebuffer_status::<P>)?;
    linker.func_wrap("gl", "clear", clear::<P>)?;
    linker.func_wrap("gl", "clearColor", clear_color::<P>)?;
    linker.func_wrap("gl", "clearDepthf", clear_depth::<P>)?;
    linker.func_wrap("gl", "clearStencil", clear_stencil::<P>)?;
    linker.func_wrap("gl", "colorMask", color_mask::<P>)?;
    linker.func_wrap("gl", "compileShader", compile_shader::<P>)?;
    linker.func_wrap("gl", "compressedTexImage2D", compressed_tex_image_2d::<P>)?;
    linker.func_wrap("gl", "compressedTexSubImage2D", compressed_tex_sub_image_2d::<P>)?;
    linker.func_wrap("gl", "copyTexImage2D", copy_tex_image_2d::<P>)?;
    linker.func_wrap("gl", "copyTexSubImage2D", copy_tex_sub_image_2d::<P>)?;
    linker.func_wrap("gl", "createProgram", create_program::<P>)?;
    linker.func_wrap("gl", "createShader", create_shader::<P>)?;
    linker.func_wrap("gl", "cullFace", cull_face::<P>)?;
    linker.func_wrap("gl", "deleteBuffers", delete_buffers::<P>)?;
    linker.func_wrap("gl", "deleteFramebuffers", delete_framebuffers::<P>)?;
    linker.func_wrap("gl", "deleteProgram", delete_program::<P>)?;
    linker.func_wrap("gl", "deleteRenderbuffers", delete_renderbuffers::<P>)?;
    linker.func_wrap("gl", "deleteShader", delete_shader::<P>)?;
    linker.func_wrap("gl", "deleteTextures", delete_textures::<P>)?;
    linker.func_wrap("gl", "depthFunc", depth_func::<P>)?;
    linker.func_wrap("gl", "depthMask", depth_mask::<P>)?;
    linker.func_wrap("gl", "depthRangef", depth_range::<P>)?;
    linker.func_wrap("gl", "detachShader", detach_shader::<P>)?;
    linker.func_wrap("gl", "disable", disable::<P>)?;
    linker.func_wrap("gl", "disableVertexAttribArray", disable_vertex_attrib_array::<P>)?;
    linker.func_wrap("gl", "drawArrays", draw_arrays::<P>)?;
    linker.func_wrap("gl", "drawElements", draw_elements::<P>)?;
    linker.func_wrap("gl", "enable", enable::<P>)?;
    linker.func_wrap("gl", "enableVertexAttribArray", enable_vertex_attrib_array::<P>)?;
    linker.func_wrap("gl", "finish", finish::<P>)?;
    linker.func_wrap("gl", "flush", flush::<P>)?;
    linker.func_wrap("gl", "framebufferRenderbuffer", framebuffer_renderbuffer::<P>)?;
    linker.func_wrap("gl", "framebufferTexture2D", framebuffer_texture_2d::<P>)?;
    linker.func_wrap("gl", "frontFace", front_face::<P>)?;
    linker.func_wrap("gl", "genBuffers", gen_buffers::<P>)?;
    linker.func_wrap("gl", "generateMipmap", generate_mipmap::<P>)?;
    linker.func_wrap("gl", "genFramebuffers", gen_framebuffers::<P>)?;
    linker.func_wrap("gl", "genRenderbuffers", gen_renderbuffers::<P>)?;
    linker.func_wrap("gl", "genTextures", gen_textures::<P>)?;
    linker.func_wrap("gl", "getActiveAttrib", get_active_attrib::<P>)?;
    linker.func_wrap("gl", "getActiveUniform", get_active_uniform::<P>)?;
    linker.func_wrap("gl", "getAttachedShaders", get_attached_shaders::<P>)?;
    linker.func_wrap("gl", "getAttribLocation", get_attrib_location::<P>)?;
    linker.func_wrap("gl", "getBooleanv", get_booleanv::<P>)?;
    linker.func_wrap("gl", "getBufferParameteriv", get_buffer_parameteriv::<P>)?;
    linker.func_wrap("gl", "getError", get_error::<P>)?;
    linker.func_wrap("gl", "getFloatv", get_floatv::<P>)?;
    linker.func_wrap(
        "gl",
        "getFramebufferAttachmentParameteriv",
        get_framebuffer_attachment_parameteriv::<P>,
    )?;
    linker.func_wrap("gl", "getIntegerv", get_integerv::<P>)?;
    linker.func_wrap("gl", "getProgramiv", get_programiv::<P>)?;
    linker.func_wrap("gl", "getProgramInfoLog", get_program_info_log::<P>)?;
    linker.func_wrap("gl", "getRenderbufferParameteriv", get_renderbuffer_parameteriv::<P>)?;
    linker.func_wrap("gl", "getShaderiv", get_shaderiv::<P>)?;
    linker.func_wrap("gl", "getShaderInfoLog", get_shader_info_log::<P>)?;
    linker.func_wrap("gl", "getShaderPrecisionFormat", get_shader_precision_format::<P>)?;
    linker.func_wrap("gl", "getShaderSource", get_shader_source::<P>)?;
    linker.func_wrap("gl", "getString", get_string::<P>)?;
    linker.func_wrap("gl", "getTexParameterfv", get_tex_parameterfv::<P>)?;
    linker.func_wrap("gl", "getTexParameteriv", get_tex_parameteriv::<P>)?;
    linker.func_wrap("gl", "getUniformfv", get_uniformfv::<P>)?;
    linker.func_wrap("gl", "getUniformiv", get_uniformiv::<P>)?;
    linker.func_wrap("gl", "getUniformLocation", get_uniform_location::<P>)?;
    linker.func_wrap("gl", "getVertexAttribfv", get_vertex_attribfv::<P>)?;
    linker.func_wrap("gl", "getVertexAttribiv", get_vertex_attribiv::<P>)?;
    linker.func_wrap("gl", "getVertexAttribPointerv", get_vertex_attrib_pointerv::<P>)?;
    linker.func_wrap("gl", "hint", hint::<P>)?;
    linker.func_wrap("gl", "isBuffer", is_buffer::<P>)?;
    linker.func_wrap("gl", "isEnabled", is_enabled::<P>)?;
    linker.func_wrap("gl", "isFramebuffer", is_framebuffer::<P>)?;
    linker.func_wrap("gl", "isProgram", is_program::<P>)?;
    linker.func_wrap("gl", "isRenderbuffer", is_renderbuffer::<P>)?;
    linker.func_wrap("gl", "isShader", is_shader::<P>)?;
    linker.func_wrap("gl", "isTexture", is_texture::<P>)?;
    linker.func_wrap("gl", "lineWidth", line_width::<P>)?;
    linker.func_wrap("gl", "linkProgram", link_program::<P>)?;
    linker.func_wrap("gl", "pixelStorei", pixel_storei::<P>)?;
    linker.func_wrap("gl", "polygonOffset", polygon_offset::<P>)?;
    linker.func_wrap("gl", "readPixels", read_pixels::<P>)?;
    linker.func_wrap("gl", "renderbufferStorage", renderbuffer_storage::<P>)?;
    linker.func_wrap("gl", "sampleCoverage", sample_coverage::<P>)?;
    linker.func_wrap("gl", "scissor", scissor::<P>)?;
    linker.func_wrap("gl", "shaderSource", shader_source::<P>)?;
    linker.func_wrap("gl", "stencilFunc", stencil_func::<P>)?;
    linker.func_wrap("gl", "stencilFuncSeparate", stencil_func_separate::<P>)?;
    linker.func_wrap("gl", "stencilMask", stencil_mask::<P>)?;
    linker.func_wrap("gl", "stencilMaskSeparate", stencil_mask_separate::<P>)?;
    linker.func_wrap("gl", "stencilOp", stencil_op::<P>)?;
    linker.func_wrap("gl", "stencilOpSeparate", stencil_op_separate::<P>)?;
    linker.func_wrap("gl", "texImage2D", tex_image_2d::<P>)?;
    linker.func_wrap("gl", "texParameterf", tex_parameterf::<P>)?;
    linker.func_wrap("gl", "texParameterfv", tex_parameterfv::<P>)?;
    linker.func_wrap("gl", "texParameteri", tex_parameteri::<P>)?;
    linker.func_wrap("gl", "texParameteriv", tex_parameteriv::<P>)?;
    linker.func_wrap("gl", "texSubImage2D", tex_sub_image_2d::<P>)?;
    linker.func_wrap("gl", "uniform1f", uniform1f::<P>)?;
    linker.func_wrap("gl", "uniform2f", uniform2f::<P>)?;
    linker.func_wrap("gl", "uniform3f", uniform3f::<P>)?;
    linker.func_wrap("gl", "uniform4f", uniform4f::<P>)?;
    linker.func_wrap("gl", "uniform1i", uniform1i::<P>)?;
    linker.func_wrap("gl", "uniform2i", uniform2i::<P>)?;
    linker.func_wrap("gl", "uniform3i", uniform3i::<P>)?;
    linker.func_wrap("gl", "uniform4i", uniform4i::<P>)?;
    linker.func_wrap("gl", "uniform1fv", uniform1fv::<P>)?;
    linker.func_wrap("gl", "uniform2fv", uniform2fv::<P>)?;
    linker.func_wrap("gl", "uniform3fv", uniform3fv::<P>)?;
    linker.func_wrap("gl", "uniform4fv", uniform4fv::<P>)?;
    linker.func_wrap("gl", "uniform1iv", uniform1iv::<P>)?;
    linker.func_wrap("gl", "uniform2iv", uniform2iv::<P>)?;
    linker.func_wrap("gl", "uniform3iv", uniform3iv::<P>)?;
    linker.func_wrap("gl", "uniform4iv", uniform4iv::<P>)?;
    linker.func_wrap("gl", "uniformMatrix2fv", uniform_matrix2fv::<P>)?;
    linker.func_wrap("gl", "uniformMatrix3fv", uniform_matrix3fv::<P>)?;
    linker.func_wrap("gl", "uniformMatrix4fv", uniform_matrix4fv::<P>)?;
    linker.func_wrap("gl", "useProgram", use_program::<P>)?;
    linker.func_wrap("gl", "validateProgram", validate_program::<P>)?;
    linker.func_wrap("gl", "vertexAttrib1f", vertex_attrib1f::<P>)?;
    linker.func_wrap("gl", "vertexAttrib2f", vertex_attrib2f::<P>)?;
    linker.func_wrap("gl", "vertexAttrib3f", vertex_attrib3f::<P>)?;
    linker.func_wrap("gl", "vertexAttrib4f", vertex_attrib4f::<P>)?;
    linker.func_wrap("gl", "vertexAttrib1fv", vertex_attrib1fv::<P>)?;
    linker.func_wrap("gl", "vertexAttrib2fv", vertex_attrib2fv::<P>)?;
    linker.func_wrap("gl", "vertexAttrib3fv", vertex_attrib3fv::<P>)?;
    linker.func_wrap("gl", "vertexAttrib4fv", vertex_attrib4fv::<P>)?;
    linker.func_wrap("gl", "vertexAttribPointer", vertex_attrib_pointer::<P>)?;
    linker.func_wrap("gl", "viewport", viewport::<P>)?;
    Ok(())
}

/// Graphics plus the counters that track its handles
fn graphics_and_metrics<P: Platform>(
    ctx: &mut BridgeContext<P>,
) -> HostResult<(&mut Graphics<P::Graphics>, &mut BridgeMetrics)> {
    let graphics = ctx.graphics.as_mut().ok_or_else(BridgeError::no_graphics_context)?;
    Ok((graphics, &mut ctx.metrics))
}

fn init<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, surface: i32) -> wasmtime::Result<i32> {
    with_context(&mut caller, "gl.init", |ctx| ctx.init_graphics(surface).map(i32::from))
}

forward! {
    active_texture(texture: u32) => "activeTexture", |gl| gl.active_texture(texture);
    blend_color(r: f32, g: f32, b: f32, a: f32) => "blendColor", |gl| gl.blend_color(r, g, b, a);
    blend_equation(mode: u32) => "blendEquation", |gl| gl.blend_equation(mode);
    blend_equation_separate(rgb: u32, alpha: u32) => "blendEquationSeparate",
        |gl| gl.blend_equation_separate(rgb, alpha);
    blend_func(sfactor: u32, dfactor: u32) => "blendFunc", |gl| gl.blend_func(sfactor, dfactor);
    blend_func_separate(src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) => "blendFuncSeparate",
        |gl| gl.blend_func_separate(src_rgb, dst_rgb, src_alpha, dst_alpha);
    clear(mask: u32) => "clear", |gl| gl.clear(mask);
    clear_color(r: f32, g: f32, b: f32, a: f32) => "clearColor", |gl| gl.clear_color(r, g, b, a);
    clear_depth(depth: f32) => "clearDepthf", |gl| gl.clear_depth(depth);
    clear_stencil(s: i32) => "clearStencil", |gl| gl.clear_stencil(s);
    color_mask(r: i32, g: i32, b: i32, a: i32) => "colorMask",
        |gl| gl.color_mask(flag(r), flag(g), flag(b), flag(a));
    copy_tex_image_2d(
        target: u32, level: i32, internal_format: u32, x: i32, y: i32, width: i32, height: i32, border: i32
    ) => "copyTexImage2D",
        |gl| gl.copy_tex_image_2d(target, level, internal_format, x, y, width, height, border);
    copy_tex_sub_image_2d(
        target: u32, level: i32, x_offset: i32, y_offset: i32, x: i32, y: i32, width: i32, height: i32
    ) => "copyTexSubImage2D",
        |gl| gl.copy_tex_sub_image_2d(target, level, x_offset, y_offset, x, y, width, height);
    cull_face(mode: u32) => "cullFace", |gl| gl.cull_face(mode);
    depth_func(func: u32) => "depthFunc", |gl| gl.depth_func(func);
    depth_mask(mask: i32) => "depthMask", |gl| gl.depth_mask(flag(mask));
    depth_range(near: f32, far: f32) => "depthRangef", |gl| gl.depth_range(near, far);
    disable(cap: u32) => "disable", |gl| gl.disable(cap);
    disable_vertex_attrib_array(index: u32) => "disableVertexAttribArray",
        |gl| gl.disable_vertex_attrib_array(index);
    draw_arrays(mode: u32, first: i32, n: i32) => "drawArrays", |gl| gl.draw_arrays(mode, first, n);
    draw_elements(mode: u32, n: i32, kind: u32, offset: u32) => "drawElements",
        |gl| gl.draw_elements(mode, n, kind, offset);
    enable(cap: u32) => "enable", |gl| gl.enable(cap);
    enable_vertex_attrib_array(index: u32) => "enableVertexAttribArray",
        |gl| gl.enable_vertex_attrib_array(index);
    finish() => "finish", |gl| gl.finish();
    flush() => "flush", |gl| gl.flush();
    front_face(mode: u32) => "frontFace", |gl| gl.front_face(mode);
    generate_mipmap(target: u32) => "generateMipmap", |gl| gl.generate_mipmap(target);
    hint(target: u32, mode: u32) => "hint", |gl| gl.hint(target, mode);
    line_width(width: f32) => "lineWidth", |gl| gl.line_width(width);
    pixel_storei(pname: u32, param: i32) => "pixelStorei", |gl| gl.pixel_store_i(pname, param);
    polygon_offset(factor: f32, units: f32) => "polygonOffset", |gl| gl.polygon_offset(factor, units);
    renderbuffer_storage(target: u32, internal_format: u32, width: i32, height: i32) => "renderbufferStorage",
        |gl| gl.renderbuffer_storage(target, internal_format, width, height);
    sample_coverage(value: f32, invert: i32) => "sampleCoverage", |gl| gl.sample_coverage(value, flag(invert));
    scissor(x: i32, y: i32, width: i32, height: i32) => "scissor", |gl| gl.scissor(x, y, width, height);
    stencil_func(func: u32, reference: i32, mask: u32) => "stencilFunc", |gl| gl.stencil_func(func, reference, mask);
    stencil_func_separate(face: u32, func: u32, reference: i32, mask: u32) => "stencilFuncSeparate",
        |gl| gl.stencil_func_separate(face, func, reference, mask);
    stencil_mask(mask: u32) => "stencilMask", |gl| gl.stencil_mask(mask);
    stencil_mask_separate(face: u32, mask: u32) => "stencilMaskSeparate", |gl| gl.stencil_mask_separate(face, mask);
    stencil_op(fail: u32, zfail: u32, zpass: u32) => "stencilOp", |gl| gl.stencil_op(fail, zfail, zpass);
    stencil_op_separate(face: u32, sfail: u32, dpfail: u32, dppass: u32) => "stencilOpSeparate",
        |gl| gl.stencil_op_separate(face, sfail, dpfail, dppass);
    tex_parameterf(target: u32, pname: u32, param: f32) => "texParameterf", |gl| gl.tex_parameter_f(target, pname, param);
    tex_parameteri(target: u32, pname: u32, param: i32) => "texParameteri", |gl| gl.tex_parameter_i(target, pname, param);
    uniform1f(location: i32, x: f32) => "uniform1f", |gl| gl.uniform_f32(location, 1, &[x]);
    uniform2f(location: i32, x: f32, y: f32) => "uniform2f", |gl| gl.uniform_f32(location, 2, &[x, y]);
    uniform3f(location: i32, x: f32, y: f32, z: f32) => "uniform3f", |gl| gl.uniform_f32(location, 3, &[x, y, z]);
    uniform4f(location: i32, x: f32, y: f32, z: f32, w: f32) => "uniform4f",
        |gl| gl.uniform_f32(location, 4, &[x, y, z, w]);
    uniform1i(location: i32, x: i32) => "uniform1i", |gl| gl.uniform_i32(location, 1, &[x]);
    uniform2i(location: i32, x: i32, y: i32) => "uniform2i", |gl| gl.uniform_i32(location, 2, &[x, y]);
    uniform3i(location: i32, x: i32, y: i32, z: i32) => "uniform3i", |gl| gl.uniform_i32(location, 3, &[x, y, z]);
    uniform4i(location: i32, x: i32, y: i32, z: i32, w: i32) => "uniform4i",
        |gl| gl.uniform_i32(location, 4, &[x, y, z, w]);
    vertex_attrib1f(index: u32, x: f32) => "vertexAttrib1f", |gl| gl.vertex_attrib_f32(index, &[x]);
    vertex_attrib2f(index: u32, x: f32, y: f32) => "vertexAttrib2f", |gl| gl.vertex_attrib_f32(index, &[x, y]);
    vertex_attrib3f(index: u32, x: f32, y: f32, z: f32) => "vertexAttrib3f",
        |gl| gl.vertex_attrib_f32(index, &[x, y, z]);
    vertex_attrib4f(index: u32, x: f32, y: f32, z: f32, w: f32) => "vertexAttrib4f",
        |gl| gl.vertex_attrib_f32(index, &[x, y, z, w]);
    vertex_attrib_pointer(index: u32, size: i32, kind: u32, normalized: i32, stride: i32, offset: u32)
        => "vertexAttribPointer",
        |gl| gl.vertex_attrib_pointer(index, size, kind, flag(normalized), stride, offset);
    viewport(x: i32, y: i32, width: i32, height: i32) => "viewport", |gl| gl.viewport(x, y, width, height);
}

fn check_framebuffer_status<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, target: u32) -> wasmtime::Result<u32> {
    with_gl(&mut caller, "gl.checkFramebufferStatus", |graphics| {
        Ok(graphics.context.check_framebuffer_status(target))
    })
}

fn get_error<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>) -> wasmtime::Result<u32> {
    with_gl(&mut caller, "gl.getError", |graphics| Ok(graphics.context.get_error()))
}

fn is_enabled<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, cap: u32) -> wasmtime::Result<i32> {
    with_gl(&mut caller, "gl.isEnabled", |graphics| Ok(i32::from(graphics.context.is_enabled(cap))))
}

/// The module cannot own host memory, so no string is ever returned
fn get_string<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, _name: u32) -> wasmtime::Result<u32> {
    with_gl(&mut caller, "gl.getString", |_| Ok(0))
}

// Objects

fn create_program<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>) -> wasmtime::Result<Handle> {
    with_context(&mut caller, "gl.createProgram", |ctx| {
        let (graphics, metrics) = graphics_and_metrics(ctx)?;
        let handle = graphics.create_object(|gl| gl.create_program());
        metrics.record_created(usize::from(handle != 0));
        Ok(handle)
    })
}

fn create_shader<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, kind: u32) -> wasmtime::Result<Handle> {
    with_context(&mut caller, "gl.createShader", |ctx| {
        let (graphics, metrics) = graphics_and_metrics(ctx)?;
        let handle = graphics.create_object(|gl| gl.create_shader(kind));
        metrics.record_created(usize::from(handle != 0));
        Ok(handle)
    })
}

fn gen_objects<P: Platform>(
    caller: &mut Caller<'_, BridgeContext<P>>,
    import: &'static str,
    n: i32,
    ptr: u32,
    create: fn(&mut P::Graphics) -> Option<<P::Graphics as GraphicsContext>::Object>,
) -> wasmtime::Result<()> {
    with_memory(caller, import, |mem, ctx| {
        let (graphics, metrics) = graphics_and_metrics(ctx)?;
        let created = graphics.gen_objects(mem, n, ptr, create)?;
        metrics.record_created(created);
        Ok(())
    })
}

fn gen_buffers<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, n: i32, ptr: u32) -> wasmtime::Result<()> {
    gen_objects(&mut caller, "gl.genBuffers", n, ptr, |gl| gl.create_buffer())
}

fn gen_framebuffers<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, n: i32, ptr: u32) -> wasmtime::Result<()> {
    gen_objects(&mut caller, "gl.genFramebuffers", n, ptr, |gl| gl.create_framebuffer())
}

fn gen_renderbuffers<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, n: i32, ptr: u32) -> wasmtime::Result<()> {
    gen_objects(&mut caller, "gl.genRenderbuffers", n, ptr, |gl| gl.create_renderbuffer())
}

fn gen_textures<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, n: i32, ptr: u32) -> wasmtime::Result<()> {
    gen_objects(&mut caller, "gl.genTextures", n, ptr, |gl| gl.create_texture())
}

fn delete_objects<P: Platform>(
    caller: &mut Caller<'_, BridgeContext<P>>,
    import: &'static str,
    n: i32,
    ptr: u32,
    delete: fn(&mut P::Graphics, &<P::Graphics as GraphicsContext>::Object),
) -> wasmtime::Result<()> {
    with_memory(caller, import, |mem, ctx| {
        let (graphics, metrics) = graphics_and_metrics(ctx)?;
        let deleted = graphics.delete_objects(mem, n, ptr, delete)?;
        metrics.record_deleted(deleted);
        Ok(())
    })
}

fn delete_buffers<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, n: i32, ptr: u32) -> wasmtime::Result<()> {
    delete_objects(&mut caller, "gl.deleteBuffers", n, ptr, |gl, object| gl.delete_buffer(object))
}

fn delete_framebuffers<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, n: i32, ptr: u32) -> wasmtime::Result<()> {
    delete_objects(&mut caller, "gl.deleteFramebuffers", n, ptr, |gl, object| gl.delete_framebuffer(object))
}

fn delete_renderbuffers<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, n: i32, ptr: u32) -> wasmtime::Result<()> {
    delete_objects(&mut caller, "gl.deleteRenderbuffers", n, ptr, |gl, object| gl.delete_renderbuffer(object))
}

fn delete_textures<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, n: i32, ptr: u32) -> wasmtime::Result<()> {
    delete_objects(&mut caller, "gl.deleteTextures", n, ptr, |gl, object| gl.delete_texture(object))
}

fn delete_program<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, program: Handle) -> wasmtime::Result<()> {
    with_context(&mut caller, "gl.deleteProgram", |ctx| {
        let (graphics, metrics) = graphics_and_metrics(ctx)?;
        if graphics.delete_object(program, |gl, object| gl.delete_program(object)) {
            metrics.record_deleted(1);
        }
        Ok(())
    })
}

fn delete_shader<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, shader: Handle) -> wasmtime::Result<()> {
    with_context(&mut caller, "gl.deleteShader", |ctx| {
        let (graphics, metrics) = graphics_and_metrics(ctx)?;
        if graphics.delete_object(shader, |gl, object| gl.delete_shader(object)) {
            metrics.record_deleted(1);
        }
        Ok(())
    })
}

// Binding and attachment

fn bind_buffer<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, target: u32, buffer: Handle) -> wasmtime::Result<()> {
    with_gl(&mut caller, "gl.bindBuffer", |graphics| {
        let buffer = graphics.objects.resolve_optional(buffer)?;
        graphics.context.bind_buffer(target, buffer);
        Ok(())
    })
}

fn bind_framebuffer<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    target: u32,
    framebuffer: Handle,
) -> wasmtime::Result<()> {
    with_gl(&mut caller, "gl.bindFramebuffer", |graphics| {
        let framebuffer = graphics.objects.resolve_optional(framebuffer)?;
        graphics.context.bind_framebuffer(target, framebuffer);
        Ok(())
    })
}

fn bind_renderbuffer<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    target: u32,
    renderbuffer: Handle,
) -> wasmtime::Result<()> {
    with_gl(&mut caller, "gl.bindRenderbuffer", |graphics| {
        let renderbuffer = graphics.objects.resolve_optional(renderbuffer)?;
        graphics.context.bind_renderbuffer(target, renderbuffer);
        Ok(())
    })
}

fn bind_texture<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, target: u32, texture: Handle) -> wasmtime::Result<()> {
    with_gl(&mut caller, "gl.bindTexture", |graphics| {
        let texture = graphics.objects.resolve_optional(texture)?;
        graphics.context.bind_texture(target, texture);
        Ok(())
    })
}

fn use_program<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, program: Handle) -> wasmtime::Result<()> {
    with_gl(&mut caller, "gl.useProgram", |graphics| {
        let program = graphics.objects.resolve_optional(program)?;
        graphics.context.use_program(program);
        Ok(())
    })
}

fn framebuffer_renderbuffer<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    target: u32,
    attachment: u32,
    renderbuffer_target: u32,
    renderbuffer: Handle,
) -> wasmtime::Result<()> {
    with_gl(&mut caller, "gl.framebufferRenderbuffer", |graphics| {
        let renderbuffer = graphics.objects.resolve_optional(renderbuffer)?;
        graphics
            .context
            .framebuffer_renderbuffer(target, attachment, renderbuffer_target, renderbuffer);
        Ok(())
    })
}

fn framebuffer_texture_2d<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    target: u32,
    attachment: u32,
    texture_target: u32,
    texture: Handle,
    level: i32,
) -> wasmtime::Result<()> {
    with_gl(&mut caller, "gl.framebufferTexture2D", |graphics| {
        let texture = graphics.objects.resolve_optional(texture)?;
        graphics
            .context
            .framebuffer_texture_2d(target, attachment, texture_target, texture, level);
        Ok(())
    })
}

// Unknown or freed handles answer false rather than trapping.
fn is_object<P: Platform>(
    caller: &mut Caller<'_, BridgeContext<P>>,
    import: &'static str,
    handle: Handle,
    query: fn(&mut P::Graphics, Option<&<P::Graphics as GraphicsContext>::Object>) -> bool,
) -> wasmtime::Result<i32> {
    with_gl(caller, import, |graphics| {
        let object = graphics.objects.get(handle);
        Ok(i32::from(object.is_some() && query(&mut graphics.context, object)))
    })
}

fn is_buffer<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, handle: Handle) -> wasmtime::Result<i32> {
    is_object(&mut caller, "gl.isBuffer", handle, |gl, object| gl.is_buffer(object))
}

fn is_framebuffer<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, handle: Handle) -> wasmtime::Result<i32> {
    is_object(&mut caller, "gl.isFramebuffer", handle, |gl, object| gl.is_framebuffer(object))
}

fn is_program<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, handle: Handle) -> wasmtime::Result<i32> {
    is_object(&mut caller, "gl.isProgram", handle, |gl, object| gl.is_program(object))
}

fn is_renderbuffer<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, handle: Handle) -> wasmtime::Result<i32> {
    is_object(&mut caller, "gl.isRenderbuffer", handle, |gl, object| gl.is_renderbuffer(object))
}

fn is_shader<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, handle: Handle) -> wasmtime::Result<i32> {
    is_object(&mut caller, "gl.isShader", handle, |gl, object| gl.is_shader(object))
}

fn is_texture<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, handle: Handle) -> wasmtime::Result<i32> {
    is_object(&mut caller, "gl.isTexture", handle, |gl, object| gl.is_texture(object))
}

// Programs and shaders

fn attach_shader<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, program: Handle, shader: Handle) -> wasmtime::Result<()> {
    with_gl(&mut caller, "gl.attachShader", |graphics| {
        let program = graphics.objects.resolve(program)?;
        let shader = graphics.objects.resolve(shader)?;
        graphics.context.attach_shader(program, shader);
        Ok(())
    })
}

fn detach_shader<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, program: Handle, shader: Handle) -> wasmtime::Result<()> {
    with_gl(&mut caller, "gl.detachShader", |graphics| {
        let program = graphics.objects.resolve(program)?;
        let shader = graphics.objects.resolve(shader)?;
        graphics.context.detach_shader(program, shader);
        Ok(())
    })
}

fn compile_shader<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, shader: Handle) -> wasmtime::Result<()> {
    with_gl(&mut caller, "gl.compileShader", |graphics| {
        let shader = graphics.objects.resolve(shader)?;
        graphics.context.compile_shader(shader);
        Ok(())
    })
}

fn link_program<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, program: Handle) -> wasmtime::Result<()> {
    with_gl(&mut caller, "gl.linkProgram", |graphics| {
        let program = graphics.objects.resolve(program)?;
        graphics.context.link_program(program);
        Ok(())
    })
}

fn validate_program<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, program: Handle) -> wasmtime::Result<()> {
    with_gl(&mut caller, "gl.validateProgram", |graphics| {
        let program = graphics.objects.resolve(program)?;
        graphics.context.validate_program(program);
        Ok(())
    })
}

fn shader_source<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    shader: Handle,
    n: i32,
    strings_ptr: u32,
    lengths_ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.shaderSource", |mem, graphics| {
        graphics.shader_source(mem, shader, n, strings_ptr, lengths_ptr)
    })
}

fn bind_attrib_location<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    program: Handle,
    index: u32,
    name_ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.bindAttribLocation", |mem, graphics| {
        let name = read_cstr(mem, name_ptr)?;
        let program = graphics.objects.resolve(program)?;
        graphics.context.bind_attrib_location(program, index, &name);
        Ok(())
    })
}

fn get_attrib_location<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, program: Handle, name_ptr: u32) -> wasmtime::Result<i32> {
    with_gl_memory(&mut caller, "gl.getAttribLocation", |mem, graphics| {
        let name = read_cstr(mem, name_ptr)?;
        let program = graphics.objects.resolve(program)?;
        Ok(graphics.context.get_attrib_location(program, &name))
    })
}

fn get_uniform_location<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    program: Handle,
    name_ptr: u32,
) -> wasmtime::Result<i32> {
    with_gl_memory(&mut caller, "gl.getUniformLocation", |mem, graphics| {
        let name = read_cstr(mem, name_ptr)?;
        let program = graphics.objects.resolve(program)?;
        Ok(graphics.context.get_uniform_location(program, &name))
    })
}

#[allow(clippy::too_many_arguments)]
fn get_active_attrib<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    program: Handle,
    index: u32,
    buf_size: i32,
    length_ptr: u32,
    size_ptr: u32,
    type_ptr: u32,
    name_ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getActiveAttrib", |mem, graphics| {
        let program = graphics.objects.resolve(program)?;
        let info = graphics.context.get_active_attrib(program, index);
        write_active_info(mem, info, buf_size, length_ptr, size_ptr, type_ptr, name_ptr)
    })
}

#[allow(clippy::too_many_arguments)]
fn get_active_uniform<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    program: Handle,
    index: u32,
    buf_size: i32,
    length_ptr: u32,
    size_ptr: u32,
    type_ptr: u32,
    name_ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getActiveUniform", |mem, graphics| {
        let program = graphics.objects.resolve(program)?;
        let info = graphics.context.get_active_uniform(program, index);
        write_active_info(mem, info, buf_size, length_ptr, size_ptr, type_ptr, name_ptr)
    })
}

fn get_attached_shaders<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    program: Handle,
    max_count: i32,
    count_ptr: u32,
    shaders_ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getAttachedShaders", |mem, graphics| {
        graphics.get_attached_shaders(mem, program, max_count, count_ptr, shaders_ptr)
    })
}

fn get_program_info_log<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    program: Handle,
    buf_size: i32,
    length_ptr: u32,
    log_ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getProgramInfoLog", |mem, graphics| {
        let program = graphics.objects.resolve(program)?;
        let log = graphics.context.get_program_info_log(program);
        write_string(mem, log_ptr, buf_size, length_ptr, &log)
    })
}

fn get_shader_info_log<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    shader: Handle,
    buf_size: i32,
    length_ptr: u32,
    log_ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getShaderInfoLog", |mem, graphics| {
        let shader = graphics.objects.resolve(shader)?;
        let log = graphics.context.get_shader_info_log(shader);
        write_string(mem, log_ptr, buf_size, length_ptr, &log)
    })
}

fn get_shader_source<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    shader: Handle,
    buf_size: i32,
    length_ptr: u32,
    source_ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getShaderSource", |mem, graphics| {
        let shader = graphics.objects.resolve(shader)?;
        let source = graphics.context.get_shader_source(shader);
        write_string(mem, source_ptr, buf_size, length_ptr, &source)
    })
}

fn get_shader_precision_format<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    shader_type: u32,
    precision_type: u32,
    range_ptr: u32,
    precision_ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getShaderPrecisionFormat", |mem, graphics| {
        graphics.get_shader_precision_format(mem, shader_type, precision_type, range_ptr, precision_ptr)
    })
}

// State queries

fn get_booleanv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, pname: u32, ptr: u32) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getBooleanv", |mem, graphics| {
        graphics.context.get_parameter(pname).write(mem, ptr, ParamRepr::U8)
    })
}

fn get_integerv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, pname: u32, ptr: u32) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getIntegerv", |mem, graphics| {
        graphics.context.get_parameter(pname).write(mem, ptr, ParamRepr::I32)
    })
}

fn get_floatv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, pname: u32, ptr: u32) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getFloatv", |mem, graphics| {
        graphics.context.get_parameter(pname).write(mem, ptr, ParamRepr::F32)
    })
}

fn get_buffer_parameteriv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, target: u32, pname: u32, ptr: u32) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getBufferParameteriv", |mem, graphics| {
        graphics.context.get_buffer_parameter(target, pname).write(mem, ptr, ParamRepr::I32)
    })
}

fn get_renderbuffer_parameteriv<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    target: u32,
    pname: u32,
    ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getRenderbufferParameteriv", |mem, graphics| {
        graphics.context.get_renderbuffer_parameter(target, pname).write(mem, ptr, ParamRepr::I32)
    })
}

fn get_framebuffer_attachment_parameteriv<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    target: u32,
    attachment: u32,
    pname: u32,
    ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getFramebufferAttachmentParameteriv", |mem, graphics| {
        graphics.get_framebuffer_attachment_parameter(mem, target, attachment, pname, ptr)
    })
}

fn get_programiv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, program: Handle, pname: u32, ptr: u32) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getProgramiv", |mem, graphics| {
        let program = graphics.objects.resolve(program)?;
        graphics.context.get_program_parameter(program, pname).write(mem, ptr, ParamRepr::I32)
    })
}

fn get_shaderiv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, shader: Handle, pname: u32, ptr: u32) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getShaderiv", |mem, graphics| {
        let shader = graphics.objects.resolve(shader)?;
        graphics.context.get_shader_parameter(shader, pname).write(mem, ptr, ParamRepr::I32)
    })
}

fn get_tex_parameterfv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, target: u32, pname: u32, ptr: u32) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getTexParameterfv", |mem, graphics| {
        graphics.context.get_tex_parameter(target, pname).write(mem, ptr, ParamRepr::F32)
    })
}

fn get_tex_parameteriv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, target: u32, pname: u32, ptr: u32) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getTexParameteriv", |mem, graphics| {
        graphics.context.get_tex_parameter(target, pname).write(mem, ptr, ParamRepr::I32)
    })
}

fn get_uniformfv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, program: Handle, location: i32, ptr: u32) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getUniformfv", |mem, graphics| {
        let program = graphics.objects.resolve(program)?;
        graphics.context.get_uniform(program, location).write(mem, ptr, ParamRepr::F32)
    })
}

fn get_uniformiv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, program: Handle, location: i32, ptr: u32) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getUniformiv", |mem, graphics| {
        let program = graphics.objects.resolve(program)?;
        graphics.context.get_uniform(program, location).write(mem, ptr, ParamRepr::I32)
    })
}

fn get_vertex_attribfv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, index: u32, pname: u32, ptr: u32) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getVertexAttribfv", |mem, graphics| {
        graphics.context.get_vertex_attrib(index, pname).write(mem, ptr, ParamRepr::F32)
    })
}

fn get_vertex_attribiv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, index: u32, pname: u32, ptr: u32) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getVertexAttribiv", |mem, graphics| {
        graphics.context.get_vertex_attrib(index, pname).write(mem, ptr, ParamRepr::I32)
    })
}

fn get_vertex_attrib_pointerv<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    index: u32,
    pname: u32,
    ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.getVertexAttribPointerv", |mem, graphics| {
        let offset = graphics.context.get_vertex_attrib_offset(index, pname);
        mem.write_u32(ptr, offset)
    })
}

// Data uploads and readback

fn buffer_data<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    target: u32,
    size: i32,
    data_ptr: u32,
    usage: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.bufferData", |mem, graphics| {
        let data = data_or_zeroed(mem, data_ptr, size)?;
        graphics.context.buffer_data(target, &data, usage);
        Ok(())
    })
}

fn buffer_sub_data<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    target: u32,
    offset: i32,
    size: i32,
    data_ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.bufferSubData", |mem, graphics| {
        let data = mem.bytes(data_ptr, count(size))?;
        graphics.context.buffer_sub_data(target, offset, data);
        Ok(())
    })
}

#[allow(clippy::too_many_arguments)]
fn compressed_tex_image_2d<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    target: u32,
    level: i32,
    internal_format: u32,
    width: i32,
    height: i32,
    border: i32,
    image_size: i32,
    data_ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.compressedTexImage2D", |mem, graphics| {
        let data = mem.bytes(data_ptr, count(image_size))?;
        graphics
            .context
            .compressed_tex_image_2d(target, level, internal_format, width, height, border, data);
        Ok(())
    })
}

#[allow(clippy::too_many_arguments)]
fn compressed_tex_sub_image_2d<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    target: u32,
    level: i32,
    x_offset: i32,
    y_offset: i32,
    width: i32,
    height: i32,
    format: u32,
    image_size: i32,
    data_ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.compressedTexSubImage2D", |mem, graphics| {
        let data = mem.bytes(data_ptr, count(image_size))?;
        graphics
            .context
            .compressed_tex_sub_image_2d(target, level, x_offset, y_offset, width, height, format, data);
        Ok(())
    })
}

#[allow(clippy::too_many_arguments)]
fn tex_image_2d<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    target: u32,
    level: i32,
    internal_format: i32,
    width: i32,
    height: i32,
    border: i32,
    format: u32,
    kind: u32,
    pixels_ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.texImage2D", |mem, graphics| {
        let pixels = optional_tail(mem, pixels_ptr)?;
        graphics.context.tex_image_2d(
            target,
            level,
            internal_format,
            width,
            height,
            border,
            format,
            kind,
            pixels,
        );
        Ok(())
    })
}

#[allow(clippy::too_many_arguments)]
fn tex_sub_image_2d<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    target: u32,
    level: i32,
    x_offset: i32,
    y_offset: i32,
    width: i32,
    height: i32,
    format: u32,
    kind: u32,
    pixels_ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.texSubImage2D", |mem, graphics| {
        let pixels = optional_tail(mem, pixels_ptr)?;
        graphics.context.tex_sub_image_2d(
            target, level, x_offset, y_offset, width, height, format, kind, pixels,
        );
        Ok(())
    })
}

fn tex_parameterfv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, target: u32, pname: u32, ptr: u32) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.texParameterfv", |mem, graphics| {
        let param = mem.read_f32(ptr)?;
        graphics.context.tex_parameter_f(target, pname, param);
        Ok(())
    })
}

fn tex_parameteriv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, target: u32, pname: u32, ptr: u32) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.texParameteriv", |mem, graphics| {
        let param = mem.read_i32(ptr)?;
        graphics.context.tex_parameter_i(target, pname, param);
        Ok(())
    })
}

#[allow(clippy::too_many_arguments)]
fn read_pixels<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    format: u32,
    kind: u32,
    pixels_ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(&mut caller, "gl.readPixels", |mem, graphics| {
        let pixels = mem.tail_mut(pixels_ptr)?;
        graphics.context.read_pixels(x, y, width, height, format, kind, pixels);
        Ok(())
    })
}

// Vector uniforms and attributes

fn uniform_fv<P: Platform>(
    caller: &mut Caller<'_, BridgeContext<P>>,
    import: &'static str,
    location: i32,
    n: i32,
    components: usize,
    ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(caller, import, |mem, graphics| graphics.uniform_fv(mem, location, n, components, ptr))
}

fn uniform_iv<P: Platform>(
    caller: &mut Caller<'_, BridgeContext<P>>,
    import: &'static str,
    location: i32,
    n: i32,
    components: usize,
    ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(caller, import, |mem, graphics| graphics.uniform_iv(mem, location, n, components, ptr))
}

fn uniform1fv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, location: i32, n: i32, ptr: u32) -> wasmtime::Result<()> {
    uniform_fv(&mut caller, "gl.uniform1fv", location, n, 1, ptr)
}

fn uniform2fv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, location: i32, n: i32, ptr: u32) -> wasmtime::Result<()> {
    uniform_fv(&mut caller, "gl.uniform2fv", location, n, 2, ptr)
}

fn uniform3fv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, location: i32, n: i32, ptr: u32) -> wasmtime::Result<()> {
    uniform_fv(&mut caller, "gl.uniform3fv", location, n, 3, ptr)
}

fn uniform4fv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, location: i32, n: i32, ptr: u32) -> wasmtime::Result<()> {
    uniform_fv(&mut caller, "gl.uniform4fv", location, n, 4, ptr)
}

fn uniform1iv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, location: i32, n: i32, ptr: u32) -> wasmtime::Result<()> {
    uniform_iv(&mut caller, "gl.uniform1iv", location, n, 1, ptr)
}

fn uniform2iv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, location: i32, n: i32, ptr: u32) -> wasmtime::Result<()> {
    uniform_iv(&mut caller, "gl.uniform2iv", location, n, 2, ptr)
}

fn uniform3iv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, location: i32, n: i32, ptr: u32) -> wasmtime::Result<()> {
    uniform_iv(&mut caller, "gl.uniform3iv", location, n, 3, ptr)
}

fn uniform4iv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, location: i32, n: i32, ptr: u32) -> wasmtime::Result<()> {
    uniform_iv(&mut caller, "gl.uniform4iv", location, n, 4, ptr)
}

fn uniform_matrix_fv<P: Platform>(
    caller: &mut Caller<'_, BridgeContext<P>>,
    import: &'static str,
    location: i32,
    n: i32,
    transpose: i32,
    dim: usize,
    ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(caller, import, |mem, graphics| {
        graphics.uniform_matrix_fv(mem, location, n, flag(transpose), dim, ptr)
    })
}

fn uniform_matrix2fv<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    location: i32,
    n: i32,
    transpose: i32,
    ptr: u32,
) -> wasmtime::Result<()> {
    uniform_matrix_fv(&mut caller, "gl.uniformMatrix2fv", location, n, transpose, 2, ptr)
}

fn uniform_matrix3fv<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    location: i32,
    n: i32,
    transpose: i32,
    ptr: u32,
) -> wasmtime::Result<()> {
    uniform_matrix_fv(&mut caller, "gl.uniformMatrix3fv", location, n, transpose, 3, ptr)
}

fn uniform_matrix4fv<P: Platform>(
    mut caller: Caller<'_, BridgeContext<P>>,
    location: i32,
    n: i32,
    transpose: i32,
    ptr: u32,
) -> wasmtime::Result<()> {
    uniform_matrix_fv(&mut caller, "gl.uniformMatrix4fv", location, n, transpose, 4, ptr)
}

fn vertex_attrib_fv<P: Platform>(
    caller: &mut Caller<'_, BridgeContext<P>>,
    import: &'static str,
    index: u32,
    components: usize,
    ptr: u32,
) -> wasmtime::Result<()> {
    with_gl_memory(caller, import, |mem, graphics| graphics.vertex_attrib_fv(mem, index, components, ptr))
}

fn vertex_attrib1fv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, index: u32, ptr: u32) -> wasmtime::Result<()> {
    vertex_attrib_fv(&mut caller, "gl.vertexAttrib1fv", index, 1, ptr)
}

fn vertex_attrib2fv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, index: u32, ptr: u32) -> wasmtime::Result<()> {
    vertex_attrib_fv(&mut caller, "gl.vertexAttrib2fv", index, 2, ptr)
}

fn vertex_attrib3fv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, index: u32, ptr: u32) -> wasmtime::Result<()> {
    vertex_attrib_fv(&mut caller, "gl.vertexAttrib3fv", index, 3, ptr)
}

fn vertex_attrib4fv<P: Platform>(mut caller: Caller<'_, BridgeContext<P>>, index: u32, ptr: u32) -> wasmtime::Result<()> {
    vertex_attrib_fv(&mut caller, "gl.vertexAttrib4fv", index, 4, ptr)
}

#[cfg(test)]
mod tests {
    use crate::context::BridgeContext;
    use crate::error::{ErrorCode, RuntimeError};
    use crate::host_functions::tests::instantiate;
    use crate::testing::MockPlatform;
    use wasmtime::{Instance, Store};

    const MODULE: &str = r#"(module
        (import "wio" "createWindow" (func $create (param i32 i32) (result i32)))
        (import "gl" "init" (func $init (param i32) (result i32)))
        (import "gl" "clear" (func $clear (param i32)))
        (import "gl" "genBuffers" (func $gen_buffers (param i32 i32)))
        (import "gl" "deleteBuffers" (func $delete_buffers (param i32 i32)))
        (import "gl" "bindBuffer" (func $bind_buffer (param i32 i32)))
        (import "gl" "isBuffer" (func $is_buffer (param i32) (result i32)))
        (import "gl" "createShader" (func $create_shader (param i32) (result i32)))
        (import "gl" "shaderSource" (func $shader_source (param i32 i32 i32 i32)))
        (import "gl" "getShaderSource" (func $get_shader_source (param i32 i32 i32 i32)))
        (import "gl" "createProgram" (func $create_program (result i32)))
        (import "gl" "getUniformLocation" (func $get_uniform_location (param i32 i32) (result i32)))
        (import "gl" "uniform4f" (func $uniform4f (param i32 f32 f32 f32 f32)))
        (import "gl" "readPixels" (func $read_pixels (param i32 i32 i32 i32 i32 i32 i32)))
        (import "gl" "getString" (func $get_string (param i32) (result i32)))
        (memory (export "memory") 1)
        (data (i32.const 256) "void main() {}")
        (data (i32.const 300) "u_color\00")
        (func (export "setup") (result i32)
            (call $init (call $create (i32.const 64) (i32.const 64))))
        (func (export "init") (param i32) (result i32) (call $init (local.get 0)))
        (func (export "clear") (call $clear (i32.const 0x4000)))
        (func (export "gen") (param i32 i32) (call $gen_buffers (local.get 0) (local.get 1)))
        (func (export "del") (param i32 i32) (call $delete_buffers (local.get 0) (local.get 1)))
        (func (export "bind") (param i32) (call $bind_buffer (i32.const 0x8892) (local.get 0)))
        (func (export "isBuffer") (param i32) (result i32) (call $is_buffer (local.get 0)))
        (func (export "shader") (result i32) (local $s i32)
            (local.set $s (call $create_shader (i32.const 0x8B31)))
            (i32.store (i32.const 128) (i32.const 256))
            (i32.store (i32.const 132) (i32.const 14))
            (call $shader_source (local.get $s) (i32.const 1) (i32.const 128) (i32.const 132))
            (call $get_shader_source (local.get $s) (i32.const 8) (i32.const 136) (i32.const 400))
            (local.get $s))
        (func (export "uniform") (result i32) (local $p i32) (local $loc i32)
            (local.set $p (call $create_program))
            (local.set $loc (call $get_uniform_location (local.get $p) (i32.const 300)))
            (call $uniform4f (local.get $loc) (f32.const 1) (f32.const 0) (f32.const 0) (f32.const 1))
            (local.get $loc))
        (func (export "read") (call $read_pixels
            (i32.const 0) (i32.const 0) (i32.const 2) (i32.const 1)
            (i32.const 0x1908) (i32.const 0x1401) (i32.const 1024)))
        (func (export "getString") (result i32) (call $get_string (i32.const 0x1F00))))"#;

    fn setup() -> (Store<BridgeContext<MockPlatform>>, Instance) {
        let (mut store, instance) = instantiate(MODULE, vec![1]);
        let setup = instance.get_typed_func::<(), i32>(&mut store, "setup").unwrap();
        assert_eq!(setup.call(&mut store, ()).unwrap(), 1);
        (store, instance)
    }

    fn handles_at(store: &mut Store<BridgeContext<MockPlatform>>, instance: &Instance, ptr: usize, n: usize) -> Vec<u32> {
        let memory = instance.get_memory(&mut *store, "memory").unwrap();
        memory.data(&*store)[ptr..ptr + n * 4]
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    #[test]
    fn test_calls_before_init_trap() {
        let (mut store, instance) = instantiate(MODULE, vec![1]);
        let clear = instance.get_typed_func::<(), ()>(&mut store, "clear").unwrap();
        let err = RuntimeError::from_trap(clear.call(&mut store, ()).unwrap_err());
        assert_eq!(err.to_bridge_error().code, ErrorCode::NoGraphicsContext);
    }

    #[test]
    fn test_init_failure_returns_zero() {
        let (mut store, instance) = instantiate(MODULE, vec![1]);
        store.data_mut().platform_mut().no_graphics = true;
        store.data_mut().create_surface(1, 1).unwrap();
        let init = instance.get_typed_func::<i32, i32>(&mut store, "init").unwrap();
        assert_eq!(init.call(&mut store, 0).unwrap(), 0);
    }

    #[test]
    fn test_clear_is_forwarded() {
        let (mut store, instance) = setup();
        let clear = instance.get_typed_func::<(), ()>(&mut store, "clear").unwrap();
        clear.call(&mut store, ()).unwrap();
        let calls = &store.data().graphics().unwrap().context().calls;
        assert_eq!(calls.last().map(String::as_str), Some("clear 16384"));
    }

    #[test]
    fn test_freed_buffer_handle_is_reused() {
        let (mut store, instance) = setup();
        let gen = instance.get_typed_func::<(i32, i32), ()>(&mut store, "gen").unwrap();
        let del = instance.get_typed_func::<(i32, i32), ()>(&mut store, "del").unwrap();

        gen.call(&mut store, (3, 0)).unwrap();
        assert_eq!(handles_at(&mut store, &instance, 0, 3), vec![1, 2, 3]);

        // handle 2 is at offset 4
        del.call(&mut store, (1, 4)).unwrap();
        gen.call(&mut store, (1, 16)).unwrap();
        assert_eq!(handles_at(&mut store, &instance, 16, 1), vec![2]);

        let stats = store.data().stats();
        assert_eq!(stats.objects_created, 4);
        assert_eq!(stats.objects_deleted, 1);
        assert_eq!(stats.live_objects, 3);
    }

    #[test]
    fn test_refused_buffers_are_not_counted() {
        let (mut store, instance) = setup();
        let gen = instance.get_typed_func::<(i32, i32), ()>(&mut store, "gen").unwrap();
        store.data_mut().graphics_mut().unwrap().context_mut().refuse_objects = true;

        gen.call(&mut store, (2, 0)).unwrap();
        assert_eq!(handles_at(&mut store, &instance, 0, 2), vec![0, 0]);
        assert_eq!(store.data().stats().objects_created, 0);
    }

    #[test]
    fn test_batch_delete_reports_live_handles() {
        let (mut store, instance) = setup();
        let gen = instance.get_typed_func::<(i32, i32), ()>(&mut store, "gen").unwrap();
        let del = instance.get_typed_func::<(i32, i32), ()>(&mut store, "del").unwrap();

        gen.call(&mut store, (2, 0)).unwrap();
        // [1, 2] at 0, then delete [2, 1, 2] read from offset 4
        let memory = instance.get_memory(&mut store, "memory").unwrap();
        memory.data_mut(&mut store)[8..16].copy_from_slice(&[1, 0, 0, 0, 2, 0, 0, 0]);
        del.call(&mut store, (3, 4)).unwrap();

        let stats = store.data().stats();
        assert_eq!(stats.objects_deleted, 2);
        assert_eq!(stats.live_objects, 0);
        assert_eq!(store.data().graphics().unwrap().context().deleted, vec![101, 100]);
    }

    #[test]
    fn test_bind_handles() {
        let (mut store, instance) = setup();
        let gen = instance.get_typed_func::<(i32, i32), ()>(&mut store, "gen").unwrap();
        let bind = instance.get_typed_func::<i32, ()>(&mut store, "bind").unwrap();
        let is_buffer = instance.get_typed_func::<i32, i32>(&mut store, "isBuffer").unwrap();

        gen.call(&mut store, (1, 0)).unwrap();
        bind.call(&mut store, 1).unwrap();
        bind.call(&mut store, 0).unwrap();
        assert_eq!(is_buffer.call(&mut store, 1).unwrap(), 1);
        assert_eq!(is_buffer.call(&mut store, 9).unwrap(), 0);

        let calls = &store.data().graphics().unwrap().context().calls;
        assert!(calls.contains(&"bindBuffer 34962 Some(100)".to_string()));
        assert!(calls.contains(&"bindBuffer 34962 None".to_string()));

        let err = RuntimeError::from_trap(bind.call(&mut store, 7).unwrap_err());
        assert_eq!(err.to_bridge_error().code, ErrorCode::InvalidHandle);
    }

    #[test]
    fn test_shader_source_round_trip() {
        let (mut store, instance) = setup();
        let shader = instance.get_typed_func::<(), i32>(&mut store, "shader").unwrap();
        let handle = shader.call(&mut store, ()).unwrap();
        assert_eq!(handle, 1);

        let memory = instance.get_memory(&mut store, "memory").unwrap();
        let data = memory.data(&store);
        assert_eq!(&data[400..408], b"void ma\0");
        assert_eq!(&data[136..140], &7i32.to_le_bytes());
    }

    #[test]
    fn test_uniform_location_and_upload() {
        let (mut store, instance) = setup();
        let uniform = instance.get_typed_func::<(), i32>(&mut store, "uniform").unwrap();
        assert_eq!(uniform.call(&mut store, ()).unwrap(), 3);

        let uniforms = &store.data().graphics().unwrap().context().uniforms;
        assert_eq!(uniforms, &vec![(3, 4, vec![1.0, 0.0, 0.0, 1.0])]);
    }

    #[test]
    fn test_read_pixels_fills_memory() {
        let (mut store, instance) = setup();
        let read = instance.get_typed_func::<(), ()>(&mut store, "read").unwrap();
        read.call(&mut store, ()).unwrap();

        let memory = instance.get_memory(&mut store, "memory").unwrap();
        assert_eq!(&memory.data(&store)[1024..1033], &[0x7F, 0x7F, 0x7F, 0x7F, 0x7F, 0x7F, 0x7F, 0x7F, 0]);
    }

    #[test]
    fn test_get_string_returns_null() {
        let (mut store, instance) = setup();
        let get_string = instance.get_typed_func::<(), i32>(&mut store, "getString").unwrap();
        assert_eq!(get_string.call(&mut store, ()).unwrap(), 0);
    }
}
