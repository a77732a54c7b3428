//! Native rendering context and the objects the module names by handle.
//!
//! [`GraphicsContext`] mirrors the OpenGL ES 2.0 entry points with native
//! object references. [`Graphics`] pairs one context with the handle table
//! that stands in for those references on the module side; the forwarding
//! layer in [`forward`] translates between the two.

pub mod forward;

use crate::handles::HandleTable;
use std::fmt;

pub use forward::ParamRepr;

/// `GL_FRAMEBUFFER_ATTACHMENT_OBJECT_NAME`
pub const FRAMEBUFFER_ATTACHMENT_OBJECT_NAME: u32 = 0x8CD1;

/// Result of a parameter query
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ParamValue {
    /// The query produced nothing
    #[default]
    None,
    /// Single boolean
    Bool(bool),
    /// Single integer
    Int(i32),
    /// Single float
    Float(f32),
    /// Boolean vector
    Bools(Vec<bool>),
    /// Integer vector
    Ints(Vec<i32>),
    /// Float vector
    Floats(Vec<f32>),
}

/// Name, size and type of an active attribute or uniform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveInfo {
    /// Variable name
    pub name: String,
    /// Array size, 1 for non-arrays
    pub size: i32,
    /// GL type enum
    pub kind: u32,
}

/// Range and precision of a shader number format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecisionFormat {
    /// log2 of the smallest representable magnitude
    pub range_min: i32,
    /// log2 of the largest representable magnitude
    pub range_max: i32,
    /// Bits of precision
    pub precision: i32,
}

/// OpenGL ES 2.0 rendering context with native object references.
///
/// Methods follow the GL entry points of the same name. Object arguments
/// are `None` where GL accepts the null object.
#[allow(missing_docs)]
pub trait GraphicsContext {
    /// Native reference to a buffer, texture, shader, program, framebuffer
    /// or renderbuffer
    type Object: Clone + PartialEq + fmt::Debug;

    fn active_texture(&mut self, texture: u32);
    fn attach_shader(&mut self, program: &Self::Object, shader: &Self::Object);
    fn bind_attrib_location(&mut self, program: &Self::Object, index: u32, name: &str);
    fn bind_buffer(&mut self, target: u32, buffer: Option<&Self::Object>);
    fn bind_framebuffer(&mut self, target: u32, framebuffer: Option<&Self::Object>);
    fn bind_renderbuffer(&mut self, target: u32, renderbuffer: Option<&Self::Object>);
    fn bind_texture(&mut self, target: u32, texture: Option<&Self::Object>);
    fn blend_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32);
    fn blend_equation(&mut self, mode: u32);
    fn blend_equation_separate(&mut self, mode_rgb: u32, mode_alpha: u32);
    fn blend_func(&mut self, sfactor: u32, dfactor: u32);
    fn blend_func_separate(&mut self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32);
    fn buffer_data(&mut self, target: u32, data: &[u8], usage: u32);
    fn buffer_sub_data(&mut self, target: u32, offset: i32, data: &[u8]);
    fn check_framebuffer_status(&mut self, target: u32) -> u32;
    fn clear(&mut self, mask: u32);
    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32);
    fn clear_depth(&mut self, depth: f32);
    fn clear_stencil(&mut self, s: i32);
    fn color_mask(&mut self, red: bool, green: bool, blue: bool, alpha: bool);
    fn compile_shader(&mut self, shader: &Self::Object);
    #[allow(clippy::too_many_arguments)]
    fn compressed_tex_image_2d(
        &mut self,
        target: u32,
        level: i32,
        internal_format: u32,
        width: i32,
        height: i32,
        border: i32,
        data: &[u8],
    );
    #[allow(clippy::too_many_arguments)]
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
    );
    #[allow(clippy::too_many_arguments)]
    fn copy_tex_image_2d(
        &mut self,
        target: u32,
        level: i32,
        internal_format: u32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        border: i32,
    );
    #[allow(clippy::too_many_arguments)]
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
    );
    fn create_buffer(&mut self) -> Option<Self::Object>;
    fn create_framebuffer(&mut self) -> Option<Self::Object>;
    fn create_program(&mut self) -> Option<Self::Object>;
    fn create_renderbuffer(&mut self) -> Option<Self::Object>;
    fn create_shader(&mut self, kind: u32) -> Option<Self::Object>;
    fn create_texture(&mut self) -> Option<Self::Object>;
    fn cull_face(&mut self, mode: u32);
    fn delete_buffer(&mut self, buffer: &Self::Object);
    fn delete_framebuffer(&mut self, framebuffer: &Self::Object);
    fn delete_program(&mut self, program: &Self::Object);
    fn delete_renderbuffer(&mut self, renderbuffer: &Self::Object);
    fn delete_shader(&mut self, shader: &Self::Object);
    fn delete_texture(&mut self, texture: &Self::Object);
    fn depth_func(&mut self, func: u32);
    fn depth_mask(&mut self, flag: bool);
    fn depth_range(&mut self, near: f32, far: f32);
    fn detach_shader(&mut self, program: &Self::Object, shader: &Self::Object);
    fn disable(&mut self, cap: u32);
    fn disable_vertex_attrib_array(&mut self, index: u32);
    fn draw_arrays(&mut self, mode: u32, first: i32, count: i32);
    fn draw_elements(&mut self, mode: u32, count: i32, kind: u32, offset: u32);
    fn enable(&mut self, cap: u32);
    fn enable_vertex_attrib_array(&mut self, index: u32);
    fn finish(&mut self);
    fn flush(&mut self);
    fn framebuffer_renderbuffer(
        &mut self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: Option<&Self::Object>,
    );
    fn framebuffer_texture_2d(
        &mut self,
        target: u32,
        attachment: u32,
        texture_target: u32,
        texture: Option<&Self::Object>,
        level: i32,
    );
    fn front_face(&mut self, mode: u32);
    fn generate_mipmap(&mut self, target: u32);
    fn get_active_attrib(&mut self, program: &Self::Object, index: u32) -> Option<ActiveInfo>;
    fn get_active_uniform(&mut self, program: &Self::Object, index: u32) -> Option<ActiveInfo>;
    fn get_attached_shaders(&mut self, program: &Self::Object) -> Vec<Self::Object>;
    fn get_attrib_location(&mut self, program: &Self::Object, name: &str) -> i32;
    fn get_buffer_parameter(&mut self, target: u32, pname: u32) -> ParamValue;
    fn get_error(&mut self) -> u32;
    /// Numeric attachment parameters
    fn get_framebuffer_attachment_parameter(&mut self, target: u32, attachment: u32, pname: u32) -> ParamValue;
    /// Object attached at `attachment`, the `FRAMEBUFFER_ATTACHMENT_OBJECT_NAME` query
    fn get_framebuffer_attachment_object(&mut self, target: u32, attachment: u32) -> Option<Self::Object>;
    fn get_parameter(&mut self, pname: u32) -> ParamValue;
    fn get_program_parameter(&mut self, program: &Self::Object, pname: u32) -> ParamValue;
    fn get_program_info_log(&mut self, program: &Self::Object) -> String;
    fn get_renderbuffer_parameter(&mut self, target: u32, pname: u32) -> ParamValue;
    fn get_shader_parameter(&mut self, shader: &Self::Object, pname: u32) -> ParamValue;
    fn get_shader_info_log(&mut self, shader: &Self::Object) -> String;
    fn get_shader_precision_format(&mut self, shader_type: u32, precision_type: u32) -> Option<PrecisionFormat>;
    fn get_shader_source(&mut self, shader: &Self::Object) -> String;
    fn get_tex_parameter(&mut self, target: u32, pname: u32) -> ParamValue;
    fn get_uniform(&mut self, program: &Self::Object, location: i32) -> ParamValue;
    /// Location of a uniform, `-1` when not found
    fn get_uniform_location(&mut self, program: &Self::Object, name: &str) -> i32;
    fn get_vertex_attrib(&mut self, index: u32, pname: u32) -> ParamValue;
    fn get_vertex_attrib_offset(&mut self, index: u32, pname: u32) -> u32;
    fn hint(&mut self, target: u32, mode: u32);
    fn is_buffer(&mut self, buffer: Option<&Self::Object>) -> bool;
    fn is_enabled(&mut self, cap: u32) -> bool;
    fn is_framebuffer(&mut self, framebuffer: Option<&Self::Object>) -> bool;
    fn is_program(&mut self, program: Option<&Self::Object>) -> bool;
    fn is_renderbuffer(&mut self, renderbuffer: Option<&Self::Object>) -> bool;
    fn is_shader(&mut self, shader: Option<&Self::Object>) -> bool;
    fn is_texture(&mut self, texture: Option<&Self::Object>) -> bool;
    fn line_width(&mut self, width: f32);
    fn link_program(&mut self, program: &Self::Object);
    fn pixel_store_i(&mut self, pname: u32, param: i32);
    fn polygon_offset(&mut self, factor: f32, units: f32);
    #[allow(clippy::too_many_arguments)]
    fn read_pixels(&mut self, x: i32, y: i32, width: i32, height: i32, format: u32, kind: u32, pixels: &mut [u8]);
    fn renderbuffer_storage(&mut self, target: u32, internal_format: u32, width: i32, height: i32);
    fn sample_coverage(&mut self, value: f32, invert: bool);
    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn shader_source(&mut self, shader: &Self::Object, source: &str);
    fn stencil_func(&mut self, func: u32, reference: i32, mask: u32);
    fn stencil_func_separate(&mut self, face: u32, func: u32, reference: i32, mask: u32);
    fn stencil_mask(&mut self, mask: u32);
    fn stencil_mask_separate(&mut self, face: u32, mask: u32);
    fn stencil_op(&mut self, fail: u32, zfail: u32, zpass: u32);
    fn stencil_op_separate(&mut self, face: u32, sfail: u32, dpfail: u32, dppass: u32);
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &mut self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        border: i32,
        format: u32,
        kind: u32,
        pixels: Option<&[u8]>,
    );
    fn tex_parameter_f(&mut self, target: u32, pname: u32, param: f32);
    fn tex_parameter_i(&mut self, target: u32, pname: u32, param: i32);
    #[allow(clippy::too_many_arguments)]
    fn tex_sub_image_2d(
        &mut self,
        target: u32,
        level: i32,
        x_offset: i32,
        y_offset: i32,
        width: i32,
        height: i32,
        format: u32,
        kind: u32,
        pixels: Option<&[u8]>,
    );
    /// `uniform{1,2,3,4}f[v]`; `values` holds whole vectors of `components`
    fn uniform_f32(&mut self, location: i32, components: usize, values: &[f32]);
    /// `uniform{1,2,3,4}i[v]`
    fn uniform_i32(&mut self, location: i32, components: usize, values: &[i32]);
    /// `uniformMatrix{2,3,4}fv`; `values` holds whole `dim`×`dim` matrices
    fn uniform_matrix_f32(&mut self, location: i32, dim: usize, transpose: bool, values: &[f32]);
    fn use_program(&mut self, program: Option<&Self::Object>);
    fn validate_program(&mut self, program: &Self::Object);
    /// `vertexAttrib{1,2,3,4}f[v]`
    fn vertex_attrib_f32(&mut self, index: u32, values: &[f32]);
    fn vertex_attrib_pointer(&mut self, index: u32, size: i32, kind: u32, normalized: bool, stride: i32, offset: u32);
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
}

/// A rendering context plus the handle table for its objects
#[derive(Debug)]
pub struct Graphics<G: GraphicsContext> {
    pub(crate) context: G,
    pub(crate) objects: HandleTable<G::Object>,
}

impl<G: GraphicsContext> Graphics<G> {
    /// Wrap a fresh context with an empty handle table
    pub fn new(context: G) -> Self {
        Self {
            context,
            objects: HandleTable::new(),
        }
    }

    /// Native context
    pub fn context(&self) -> &G {
        &self.context
    }

    /// Native context, mutably
    pub fn context_mut(&mut self) -> &mut G {
        &mut self.context
    }

    /// Live objects by handle
    pub fn objects(&self) -> &HandleTable<G::Object> {
        &self.objects
    }
}
