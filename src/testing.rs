//! Test doubles for the host platform and the rendering context.

use crate::graphics::{ActiveInfo, GraphicsContext, ParamValue, PrecisionFormat};
use crate::platform::{completed, Gamepad, HostError, HostRequest, Platform};
use crate::surface::CursorKind;
use std::collections::HashMap;

/// Rendering context that records calls and hands out numeric objects
#[derive(Debug)]
pub(crate) struct RecordingContext {
    pub calls: Vec<String>,
    pub next_object: u32,
    pub deleted: Vec<u32>,
    pub attached: Vec<(u32, u32)>,
    pub sources: HashMap<u32, String>,
    pub attachment: Option<u32>,
    pub param: ParamValue,
    pub precision: Option<PrecisionFormat>,
    pub uniforms: Vec<(i32, usize, Vec<f32>)>,
    pub pixels_len: Option<usize>,
    pub refuse_objects: bool,
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            next_object: 100,
            deleted: Vec::new(),
            attached: Vec::new(),
            sources: HashMap::new(),
            attachment: None,
            param: ParamValue::None,
            precision: None,
            uniforms: Vec::new(),
            pixels_len: None,
            refuse_objects: false,
        }
    }
}

impl RecordingContext {
    fn record(&mut self, call: String) {
        self.calls.push(call);
    }

    fn create(&mut self, kind: &str) -> Option<u32> {
        if self.refuse_objects {
            return None;
        }
        let object = self.next_object;
        self.next_object += 1;
        self.record(format!("create{kind} {object}"));
        Some(object)
    }

    fn delete(&mut self, kind: &str, object: u32) {
        self.deleted.push(object);
        self.record(format!("delete{kind} {object}"));
    }
}

impl GraphicsContext for RecordingContext {
    type Object = u32;

    fn active_texture(&mut self, texture: u32) {
        self.record(format!("activeTexture {texture}"));
    }

    fn attach_shader(&mut self, program: &u32, shader: &u32) {
        self.attached.push((*program, *shader));
    }

    fn bind_attrib_location(&mut self, program: &u32, index: u32, name: &str) {
        self.record(format!("bindAttribLocation {program} {index} {name}"));
    }

    fn bind_buffer(&mut self, target: u32, buffer: Option<&u32>) {
        self.record(format!("bindBuffer {target} {buffer:?}"));
    }

    fn bind_framebuffer(&mut self, target: u32, framebuffer: Option<&u32>) {
        self.record(format!("bindFramebuffer {target} {framebuffer:?}"));
    }

    fn bind_renderbuffer(&mut self, target: u32, renderbuffer: Option<&u32>) {
        self.record(format!("bindRenderbuffer {target} {renderbuffer:?}"));
    }

    fn bind_texture(&mut self, target: u32, texture: Option<&u32>) {
        self.record(format!("bindTexture {target} {texture:?}"));
    }

    fn blend_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.record(format!("blendColor {red} {green} {blue} {alpha}"));
    }

    fn blend_equation(&mut self, mode: u32) {
        self.record(format!("blendEquation {mode}"));
    }

    fn blend_equation_separate(&mut self, mode_rgb: u32, mode_alpha: u32) {
        self.record(format!("blendEquationSeparate {mode_rgb} {mode_alpha}"));
    }

    fn blend_func(&mut self, sfactor: u32, dfactor: u32) {
        self.record(format!("blendFunc {sfactor} {dfactor}"));
    }

    fn blend_func_separate(&mut self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) {
        self.record(format!("blendFuncSeparate {src_rgb} {dst_rgb} {src_alpha} {dst_alpha}"));
    }

    fn buffer_data(&mut self, target: u32, data: &[u8], usage: u32) {
        self.record(format!("bufferData {target} {data:?} {usage}"));
    }

    fn buffer_sub_data(&mut self, target: u32, offset: i32, data: &[u8]) {
        self.record(format!("bufferSubData {target} {offset} {data:?}"));
    }

    fn check_framebuffer_status(&mut self, _target: u32) -> u32 {
        0x8CD5
    }

    fn clear(&mut self, mask: u32) {
        self.record(format!("clear {mask}"));
    }

    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.record(format!("clearColor {red} {green} {blue} {alpha}"));
    }

    fn clear_depth(&mut self, depth: f32) {
        self.record(format!("clearDepth {depth}"));
    }

    fn clear_stencil(&mut self, s: i32) {
        self.record(format!("clearStencil {s}"));
    }

    fn color_mask(&mut self, red: bool, green: bool, blue: bool, alpha: bool) {
        self.record(format!("colorMask {red} {green} {blue} {alpha}"));
    }

    fn compile_shader(&mut self, shader: &u32) {
        self.record(format!("compileShader {shader}"));
    }

    fn compressed_tex_image_2d(
        &mut self,
        target: u32,
        level: i32,
        internal_format: u32,
        width: i32,
        height: i32,
        _border: i32,
        data: &[u8],
    ) {
        self.record(format!(
            "compressedTexImage2D {target} {level} {internal_format} {width}x{height} {}",
            data.len()
        ));
    }

    fn compressed_tex_sub_image_2d(
        &mut self,
        target: u32,
        level: i32,
        x_offset: i32,
        y_offset: i32,
        width: i32,
        height: i32,
        format: u32,
        data: &[u8],
    ) {
        self.record(format!(
            "compressedTexSubImage2D {target} {level} {x_offset},{y_offset} {width}x{height} {format} {}",
            data.len()
        ));
    }

    fn copy_tex_image_2d(
        &mut self,
        target: u32,
        level: i32,
        internal_format: u32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        _border: i32,
    ) {
        self.record(format!(
            "copyTexImage2D {target} {level} {internal_format} {x},{y} {width}x{height}"
        ));
    }

    fn copy_tex_sub_image_2d(
        &mut self,
        target: u32,
        level: i32,
        x_offset: i32,
        y_offset: i32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) {
        self.record(format!(
            "copyTexSubImage2D {target} {level} {x_offset},{y_offset} {x},{y} {width}x{height}"
        ));
    }

    fn create_buffer(&mut self) -> Option<u32> {
        self.create("Buffer")
    }

    fn create_framebuffer(&mut self) -> Option<u32> {
        self.create("Framebuffer")
    }

    fn create_program(&mut self) -> Option<u32> {
        self.create("Program")
    }

    fn create_renderbuffer(&mut self) -> Option<u32> {
        self.create("Renderbuffer")
    }

    fn create_shader(&mut self, _kind: u32) -> Option<u32> {
        self.create("Shader")
    }

    fn create_texture(&mut self) -> Option<u32> {
        self.create("Texture")
    }

    fn cull_face(&mut self, mode: u32) {
        self.record(format!("cullFace {mode}"));
    }

    fn delete_buffer(&mut self, buffer: &u32) {
        self.delete("Buffer", *buffer);
    }

    fn delete_framebuffer(&mut self, framebuffer: &u32) {
        self.delete("Framebuffer", *framebuffer);
    }

    fn delete_program(&mut self, program: &u32) {
        self.delete("Program", *program);
    }

    fn delete_renderbuffer(&mut self, renderbuffer: &u32) {
        self.delete("Renderbuffer", *renderbuffer);
    }

    fn delete_shader(&mut self, shader: &u32) {
        self.delete("Shader", *shader);
    }

    fn delete_texture(&mut self, texture: &u32) {
        self.delete("Texture", *texture);
    }

    fn depth_func(&mut self, func: u32) {
        self.record(format!("depthFunc {func}"));
    }

    fn depth_mask(&mut self, flag: bool) {
        self.record(format!("depthMask {flag}"));
    }

    fn depth_range(&mut self, near: f32, far: f32) {
        self.record(format!("depthRange {near} {far}"));
    }

    fn detach_shader(&mut self, program: &u32, shader: &u32) {
        self.attached.retain(|pair| *pair != (*program, *shader));
    }

    fn disable(&mut self, cap: u32) {
        self.record(format!("disable {cap}"));
    }

    fn disable_vertex_attrib_array(&mut self, index: u32) {
        self.record(format!("disableVertexAttribArray {index}"));
    }

    fn draw_arrays(&mut self, mode: u32, first: i32, count: i32) {
        self.record(format!("drawArrays {mode} {first} {count}"));
    }

    fn draw_elements(&mut self, mode: u32, count: i32, kind: u32, offset: u32) {
        self.record(format!("drawElements {mode} {count} {kind} {offset}"));
    }

    fn enable(&mut self, cap: u32) {
        self.record(format!("enable {cap}"));
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        self.record(format!("enableVertexAttribArray {index}"));
    }

    fn finish(&mut self) {
        self.record("finish".into());
    }

    fn flush(&mut self) {
        self.record("flush".into());
    }

    fn framebuffer_renderbuffer(
        &mut self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: Option<&u32>,
    ) {
        self.attachment = renderbuffer.copied();
        self.record(format!(
            "framebufferRenderbuffer {target} {attachment} {renderbuffer_target} {renderbuffer:?}"
        ));
    }

    fn framebuffer_texture_2d(
        &mut self,
        target: u32,
        attachment: u32,
        texture_target: u32,
        texture: Option<&u32>,
        level: i32,
    ) {
        self.attachment = texture.copied();
        self.record(format!(
            "framebufferTexture2D {target} {attachment} {texture_target} {texture:?} {level}"
        ));
    }

    fn front_face(&mut self, mode: u32) {
        self.record(format!("frontFace {mode}"));
    }

    fn generate_mipmap(&mut self, target: u32) {
        self.record(format!("generateMipmap {target}"));
    }

    fn get_active_attrib(&mut self, _program: &u32, index: u32) -> Option<ActiveInfo> {
        (index == 0).then(|| ActiveInfo {
            name: "a_position".into(),
            size: 1,
            kind: 0x8B52,
        })
    }

    fn get_active_uniform(&mut self, _program: &u32, index: u32) -> Option<ActiveInfo> {
        (index == 0).then(|| ActiveInfo {
            name: "u_color".into(),
            size: 1,
            kind: 0x8B52,
        })
    }

    fn get_attached_shaders(&mut self, program: &u32) -> Vec<u32> {
        self.attached
            .iter()
            .filter(|(p, _)| p == program)
            .map(|(_, shader)| *shader)
            .collect()
    }

    fn get_attrib_location(&mut self, _program: &u32, name: &str) -> i32 {
        if name == "a_position" {
            0
        } else {
            -1
        }
    }

    fn get_buffer_parameter(&mut self, _target: u32, _pname: u32) -> ParamValue {
        self.param.clone()
    }

    fn get_error(&mut self) -> u32 {
        0
    }

    fn get_framebuffer_attachment_parameter(&mut self, _target: u32, _attachment: u32, _pname: u32) -> ParamValue {
        self.param.clone()
    }

    fn get_framebuffer_attachment_object(&mut self, _target: u32, _attachment: u32) -> Option<u32> {
        self.attachment
    }

    fn get_parameter(&mut self, _pname: u32) -> ParamValue {
        self.param.clone()
    }

    fn get_program_parameter(&mut self, _program: &u32, _pname: u32) -> ParamValue {
        self.param.clone()
    }

    fn get_program_info_log(&mut self, _program: &u32) -> String {
        "link ok".into()
    }

    fn get_renderbuffer_parameter(&mut self, _target: u32, _pname: u32) -> ParamValue {
        self.param.clone()
    }

    fn get_shader_parameter(&mut self, _shader: &u32, _pname: u32) -> ParamValue {
        self.param.clone()
    }

    fn get_shader_info_log(&mut self, _shader: &u32) -> String {
        "ERROR: 0:1: syntax error".into()
    }

    fn get_shader_precision_format(&mut self, _shader_type: u32, _precision_type: u32) -> Option<PrecisionFormat> {
        self.precision
    }

    fn get_shader_source(&mut self, shader: &u32) -> String {
        self.sources.get(shader).cloned().unwrap_or_default()
    }

    fn get_tex_parameter(&mut self, _target: u32, _pname: u32) -> ParamValue {
        self.param.clone()
    }

    fn get_uniform(&mut self, _program: &u32, _location: i32) -> ParamValue {
        self.param.clone()
    }

    fn get_uniform_location(&mut self, _program: &u32, name: &str) -> i32 {
        if name == "u_color" {
            3
        } else {
            -1
        }
    }

    fn get_vertex_attrib(&mut self, _index: u32, _pname: u32) -> ParamValue {
        self.param.clone()
    }

    fn get_vertex_attrib_offset(&mut self, index: u32, _pname: u32) -> u32 {
        index * 16
    }

    fn hint(&mut self, target: u32, mode: u32) {
        self.record(format!("hint {target} {mode}"));
    }

    fn is_buffer(&mut self, buffer: Option<&u32>) -> bool {
        buffer.is_some()
    }

    fn is_enabled(&mut self, _cap: u32) -> bool {
        true
    }

    fn is_framebuffer(&mut self, framebuffer: Option<&u32>) -> bool {
        framebuffer.is_some()
    }

    fn is_program(&mut self, program: Option<&u32>) -> bool {
        program.is_some()
    }

    fn is_renderbuffer(&mut self, renderbuffer: Option<&u32>) -> bool {
        renderbuffer.is_some()
    }

    fn is_shader(&mut self, shader: Option<&u32>) -> bool {
        shader.is_some()
    }

    fn is_texture(&mut self, texture: Option<&u32>) -> bool {
        texture.is_some()
    }

    fn line_width(&mut self, width: f32) {
        self.record(format!("lineWidth {width}"));
    }

    fn link_program(&mut self, program: &u32) {
        self.record(format!("linkProgram {program}"));
    }

    fn pixel_store_i(&mut self, pname: u32, param: i32) {
        self.record(format!("pixelStorei {pname} {param}"));
    }

    fn polygon_offset(&mut self, factor: f32, units: f32) {
        self.record(format!("polygonOffset {factor} {units}"));
    }

    fn read_pixels(&mut self, x: i32, y: i32, width: i32, height: i32, _format: u32, _kind: u32, pixels: &mut [u8]) {
        self.pixels_len = Some(pixels.len());
        let wanted = (width.max(0) * height.max(0) * 4) as usize;
        pixels.iter_mut().take(wanted).for_each(|p| *p = 0x7F);
        self.record(format!("readPixels {x},{y} {width}x{height}"));
    }

    fn renderbuffer_storage(&mut self, target: u32, internal_format: u32, width: i32, height: i32) {
        self.record(format!("renderbufferStorage {target} {internal_format} {width}x{height}"));
    }

    fn sample_coverage(&mut self, value: f32, invert: bool) {
        self.record(format!("sampleCoverage {value} {invert}"));
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.record(format!("scissor {x},{y} {width}x{height}"));
    }

    fn shader_source(&mut self, shader: &u32, source: &str) {
        self.sources.insert(*shader, source.to_string());
    }

    fn stencil_func(&mut self, func: u32, reference: i32, mask: u32) {
        self.record(format!("stencilFunc {func} {reference} {mask}"));
    }

    fn stencil_func_separate(&mut self, face: u32, func: u32, reference: i32, mask: u32) {
        self.record(format!("stencilFuncSeparate {face} {func} {reference} {mask}"));
    }

    fn stencil_mask(&mut self, mask: u32) {
        self.record(format!("stencilMask {mask}"));
    }

    fn stencil_mask_separate(&mut self, face: u32, mask: u32) {
        self.record(format!("stencilMaskSeparate {face} {mask}"));
    }

    fn stencil_op(&mut self, fail: u32, zfail: u32, zpass: u32) {
        self.record(format!("stencilOp {fail} {zfail} {zpass}"));
    }

    fn stencil_op_separate(&mut self, face: u32, sfail: u32, dpfail: u32, dppass: u32) {
        self.record(format!("stencilOpSeparate {face} {sfail} {dpfail} {dppass}"));
    }

    fn tex_image_2d(
        &mut self,
        target: u32,
        level: i32,
        _internal_format: i32,
        width: i32,
        height: i32,
        _border: i32,
        _format: u32,
        _kind: u32,
        pixels: Option<&[u8]>,
    ) {
        self.pixels_len = pixels.map(<[u8]>::len);
        self.record(format!("texImage2D {target} {level} {width}x{height}"));
    }

    fn tex_parameter_f(&mut self, target: u32, pname: u32, param: f32) {
        self.record(format!("texParameterf {target} {pname} {param}"));
    }

    fn tex_parameter_i(&mut self, target: u32, pname: u32, param: i32) {
        self.record(format!("texParameteri {target} {pname} {param}"));
    }

    fn tex_sub_image_2d(
        &mut self,
        target: u32,
        level: i32,
        x_offset: i32,
        y_offset: i32,
        width: i32,
        height: i32,
        _format: u32,
        _kind: u32,
        pixels: Option<&[u8]>,
    ) {
        self.pixels_len = pixels.map(<[u8]>::len);
        self.record(format!(
            "texSubImage2D {target} {level} {x_offset},{y_offset} {width}x{height}"
        ));
    }

    fn uniform_f32(&mut self, location: i32, components: usize, values: &[f32]) {
        self.uniforms.push((location, components, values.to_vec()));
    }

    fn uniform_i32(&mut self, location: i32, components: usize, values: &[i32]) {
        let values = values.iter().map(|v| *v as f32).collect();
        self.uniforms.push((location, components, values));
    }

    fn uniform_matrix_f32(&mut self, location: i32, dim: usize, _transpose: bool, values: &[f32]) {
        self.uniforms.push((location, dim * dim, values.to_vec()));
    }

    fn use_program(&mut self, program: Option<&u32>) {
        self.record(format!("useProgram {program:?}"));
    }

    fn validate_program(&mut self, program: &u32) {
        self.record(format!("validateProgram {program}"));
    }

    fn vertex_attrib_f32(&mut self, index: u32, values: &[f32]) {
        self.record(format!("vertexAttrib {index} {values:?}"));
    }

    fn vertex_attrib_pointer(&mut self, index: u32, size: i32, kind: u32, normalized: bool, stride: i32, offset: u32) {
        self.record(format!(
            "vertexAttribPointer {index} {size} {kind} {normalized} {stride} {offset}"
        ));
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.record(format!("viewport {x},{y} {width}x{height}"));
    }
}

/// Platform double that records every request
#[derive(Debug, Default)]
pub(crate) struct MockPlatform {
    pub prepared: Vec<(u32, u32, u32)>,
    pub cursors: Vec<(u32, Option<CursorKind>)>,
    pub pointer_lock_requests: Vec<u32>,
    pub pointer_lock_exits: usize,
    pub fullscreen_requests: Vec<u32>,
    pub fullscreen_exits: usize,
    pub sizes: Vec<(u32, u32, u32)>,
    pub framebuffer_sizes: Vec<(u32, u32, u32)>,
    pub text_input: Vec<String>,
    pub clipboard: Vec<String>,
    pub messages: Vec<String>,
    pub pads: Vec<Option<Gamepad>>,
    pub deny_requests: bool,
    pub no_graphics: bool,
}

impl MockPlatform {
    fn outcome(&self, what: &str) -> HostRequest {
        if self.deny_requests {
            completed(Err(HostError::Denied(what.to_string())))
        } else {
            completed(Ok(()))
        }
    }
}

impl Platform for MockPlatform {
    type Target = u32;
    type Graphics = RecordingContext;

    fn prepare_surface(&mut self, target: &u32, width: u32, height: u32) {
        self.prepared.push((*target, width, height));
    }

    fn create_graphics(&mut self, _target: &u32) -> Option<RecordingContext> {
        (!self.no_graphics).then(RecordingContext::default)
    }

    fn set_cursor(&mut self, target: &u32, cursor: Option<CursorKind>) {
        self.cursors.push((*target, cursor));
    }

    fn request_pointer_lock(&mut self, target: &u32) -> HostRequest {
        self.pointer_lock_requests.push(*target);
        self.outcome("pointer lock")
    }

    fn exit_pointer_lock(&mut self) {
        self.pointer_lock_exits += 1;
    }

    fn request_fullscreen(&mut self, target: &u32) -> HostRequest {
        self.fullscreen_requests.push(*target);
        self.outcome("fullscreen")
    }

    fn exit_fullscreen(&mut self) -> HostRequest {
        self.fullscreen_exits += 1;
        self.outcome("exit fullscreen")
    }

    fn set_size(&mut self, target: &u32, width: u32, height: u32) {
        self.sizes.push((*target, width, height));
    }

    fn set_framebuffer_size(&mut self, target: &u32, width: u32, height: u32) {
        self.framebuffer_sizes.push((*target, width, height));
    }

    fn show_text_input(&mut self, target: &u32, x: i32, y: i32, focus: bool) {
        self.text_input.push(format!("show {target} {x},{y} {focus}"));
    }

    fn hide_text_input(&mut self, target: &u32) {
        self.text_input.push(format!("hide {target}"));
    }

    fn focus_text_input(&mut self, target: &u32) {
        self.text_input.push(format!("focus {target}"));
    }

    fn clear_text_input(&mut self, target: &u32) {
        self.text_input.push(format!("clear {target}"));
    }

    fn set_clipboard_text(&mut self, text: &str) -> HostRequest {
        self.clipboard.push(text.to_string());
        self.outcome("clipboard")
    }

    fn message_box(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }

    fn gamepads(&mut self) -> Vec<Option<Gamepad>> {
        self.pads.clone()
    }
}
