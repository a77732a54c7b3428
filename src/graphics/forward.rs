//! Argument and result marshaling for forwarded graphics calls.
//!
//! Most GL entry points are a straight parameter translation and are
//! forwarded inline by the `gl` imports. The calls here do real work on the
//! way through: they allocate or free handles, read arrays and strings out
//! of linear memory, or write query results back in the representation the
//! call documents.

use super::{ActiveInfo, Graphics, GraphicsContext, ParamValue, FRAMEBUFFER_ATTACHMENT_OBJECT_NAME};
use crate::error::HostResult;
use crate::handles::{Handle, NULL_HANDLE};
use crate::memory::MemoryView;
use crate::strings;

/// Element type of a query's output array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamRepr {
    /// `GLboolean`
    U8,
    /// `GLint`
    I32,
    /// `GLfloat`
    F32,
}

/// Element count from a GL `sizei`; negative counts are empty
pub(crate) fn count(n: i32) -> usize {
    usize::try_from(n).unwrap_or(0)
}

impl ParamValue {
    fn to_f32s(&self) -> Vec<f32> {
        match self {
            ParamValue::None => Vec::new(),
            ParamValue::Bool(v) => vec![f32::from(u8::from(*v))],
            ParamValue::Int(v) => vec![*v as f32],
            ParamValue::Float(v) => vec![*v],
            ParamValue::Bools(v) => v.iter().map(|b| f32::from(u8::from(*b))).collect(),
            ParamValue::Ints(v) => v.iter().map(|i| *i as f32).collect(),
            ParamValue::Floats(v) => v.clone(),
        }
    }

    fn to_i32s(&self) -> Vec<i32> {
        match self {
            ParamValue::None => Vec::new(),
            ParamValue::Bool(v) => vec![i32::from(*v)],
            ParamValue::Int(v) => vec![*v],
            ParamValue::Float(v) => vec![*v as i32],
            ParamValue::Bools(v) => v.iter().map(|b| i32::from(*b)).collect(),
            ParamValue::Ints(v) => v.clone(),
            ParamValue::Floats(v) => v.iter().map(|f| *f as i32).collect(),
        }
    }

    /// Write every element at `ptr` as `repr`; `None` writes nothing
    pub fn write(&self, mem: &mut MemoryView<'_>, ptr: u32, repr: ParamRepr) -> HostResult<()> {
        match repr {
            ParamRepr::U8 => {
                let bytes: Vec<u8> = self.to_i32s().into_iter().map(|v| v as u8).collect();
                mem.write_u8s(ptr, &bytes)
            }
            ParamRepr::I32 => mem.write_i32s(ptr, &self.to_i32s()),
            ParamRepr::F32 => mem.write_f32s(ptr, &self.to_f32s()),
        }
    }
}

/// Memory from `ptr` to the end, or `None` for a null pointer
pub fn optional_tail<'m>(mem: &'m MemoryView<'_>, ptr: u32) -> HostResult<Option<&'m [u8]>> {
    match ptr {
        0 => Ok(None),
        _ => mem.tail(ptr).map(Some),
    }
}

/// `size` bytes at `ptr`; a null pointer stands for zeroed data
pub fn data_or_zeroed(mem: &MemoryView<'_>, ptr: u32, size: i32) -> HostResult<Vec<u8>> {
    match ptr {
        0 => Ok(vec![0; count(size)]),
        _ => mem.bytes(ptr, count(size)).map(<[u8]>::to_vec),
    }
}

/// Write a string into a `bufSize`-byte buffer, GL style
pub fn write_string(
    mem: &mut MemoryView<'_>,
    ptr: u32,
    buf_size: i32,
    length_ptr: u32,
    value: &str,
) -> HostResult<()> {
    strings::write_cstr(mem, ptr, count(buf_size), length_ptr, value).map(|_| ())
}

/// Fill the out-parameters of `getActiveAttrib`/`getActiveUniform`.
///
/// Nothing is written when the index has no active variable.
pub fn write_active_info(
    mem: &mut MemoryView<'_>,
    info: Option<ActiveInfo>,
    buf_size: i32,
    length_ptr: u32,
    size_ptr: u32,
    type_ptr: u32,
    name_ptr: u32,
) -> HostResult<()> {
    let Some(info) = info else {
        return Ok(());
    };
    mem.write_i32(size_ptr, info.size)?;
    mem.write_u32(type_ptr, info.kind)?;
    write_string(mem, name_ptr, buf_size, length_ptr, &info.name)
}

impl<G: GraphicsContext> Graphics<G> {
    /// Native object for a handle that must be live
    pub fn object(&self, handle: Handle) -> HostResult<&G::Object> {
        self.objects.resolve(handle)
    }

    /// Native object for a handle where 0 means none
    pub fn optional_object(&self, handle: Handle) -> HostResult<Option<&G::Object>> {
        self.objects.resolve_optional(handle)
    }

    /// Create one object and return its handle, 0 if the context refused
    pub fn create_object(&mut self, create: impl FnOnce(&mut G) -> Option<G::Object>) -> Handle {
        match create(&mut self.context) {
            Some(object) => self.objects.allocate(object),
            None => NULL_HANDLE,
        }
    }

    /// `gen*(n, ptr)`: create `n` objects and write their handles.
    ///
    /// Returns how many objects were created; refusals are written as 0.
    pub fn gen_objects(
        &mut self,
        mem: &mut MemoryView<'_>,
        n: i32,
        ptr: u32,
        mut create: impl FnMut(&mut G) -> Option<G::Object>,
    ) -> HostResult<usize> {
        let n = count(n);
        // Fail before creating anything that could not be reported.
        mem.bytes(ptr, n.saturating_mul(4))?;
        let handles: Vec<Handle> = (0..n).map(|_| self.create_object(&mut create)).collect();
        mem.write_u32s(ptr, &handles)?;
        Ok(handles.iter().filter(|handle| **handle != NULL_HANDLE).count())
    }

    /// Release one object; freed or null handles are ignored
    pub fn delete_object(&mut self, handle: Handle, delete: impl FnOnce(&mut G, &G::Object)) -> bool {
        match self.objects.free(handle) {
            Some(object) => {
                delete(&mut self.context, &object);
                true
            }
            None => false,
        }
    }

    /// `delete*(n, ptr)`: release each listed handle in order.
    ///
    /// Returns how many handles were live.
    pub fn delete_objects(
        &mut self,
        mem: &MemoryView<'_>,
        n: i32,
        ptr: u32,
        mut delete: impl FnMut(&mut G, &G::Object),
    ) -> HostResult<usize> {
        let handles = mem.read_u32s(ptr, count(n))?;
        let objects = self.objects.free_many(&handles);
        for object in &objects {
            delete(&mut self.context, object);
        }
        Ok(objects.len())
    }

    /// `getAttachedShaders`: write up to `max_count` shader handles
    pub fn get_attached_shaders(
        &mut self,
        mem: &mut MemoryView<'_>,
        program: Handle,
        max_count: i32,
        count_ptr: u32,
        shaders_ptr: u32,
    ) -> HostResult<()> {
        let program = self.objects.resolve(program)?;
        let attached = self.context.get_attached_shaders(program);
        let handles: Vec<Handle> = attached
            .iter()
            .take(count(max_count))
            .map(|shader| self.objects.find(shader).unwrap_or(NULL_HANDLE))
            .collect();

        mem.write_u32s(shaders_ptr, &handles)?;
        if count_ptr != 0 {
            mem.write_i32(count_ptr, handles.len() as i32)?;
        }
        Ok(())
    }

    /// `getFramebufferAttachmentParameteriv`.
    ///
    /// The object-name query answers with the attached object's handle.
    pub fn get_framebuffer_attachment_parameter(
        &mut self,
        mem: &mut MemoryView<'_>,
        target: u32,
        attachment: u32,
        pname: u32,
        ptr: u32,
    ) -> HostResult<()> {
        if pname == FRAMEBUFFER_ATTACHMENT_OBJECT_NAME {
            let handle = self
                .context
                .get_framebuffer_attachment_object(target, attachment)
                .and_then(|object| self.objects.find(&object))
                .unwrap_or(NULL_HANDLE);
            return mem.write_u32(ptr, handle);
        }

        self.context
            .get_framebuffer_attachment_parameter(target, attachment, pname)
            .write(mem, ptr, ParamRepr::I32)
    }

    /// `getShaderPrecisionFormat`: two range ints then the precision
    pub fn get_shader_precision_format(
        &mut self,
        mem: &mut MemoryView<'_>,
        shader_type: u32,
        precision_type: u32,
        range_ptr: u32,
        precision_ptr: u32,
    ) -> HostResult<()> {
        if let Some(format) = self.context.get_shader_precision_format(shader_type, precision_type) {
            mem.write_i32s(range_ptr, &[format.range_min, format.range_max])?;
            mem.write_i32(precision_ptr, format.precision)?;
        }
        Ok(())
    }

    /// `shaderSource`: concatenate `count` strings and hand them over.
    ///
    /// Each string is (ptr, len) when a length array is given and its entry
    /// is non-negative, and NUL-terminated otherwise.
    pub fn shader_source(
        &mut self,
        mem: &MemoryView<'_>,
        shader: Handle,
        n: i32,
        strings_ptr: u32,
        lengths_ptr: u32,
    ) -> HostResult<()> {
        let n = count(n);
        let pointers = mem.read_u32s(strings_ptr, n)?;
        let lengths = match lengths_ptr {
            0 => None,
            _ => Some(mem.read_i32s(lengths_ptr, n)?),
        };

        let mut source = String::new();
        for (index, ptr) in pointers.into_iter().enumerate() {
            let len = lengths
                .as_ref()
                .and_then(|lengths| usize::try_from(lengths[index]).ok());
            source.push_str(&strings::read_str_or_cstr(mem, ptr, len)?);
        }

        let shader = self.objects.resolve(shader)?;
        self.context.shader_source(shader, &source);
        Ok(())
    }

    /// `uniform{N}fv`: read `count` vectors of `components` floats
    pub fn uniform_fv(
        &mut self,
        mem: &MemoryView<'_>,
        location: i32,
        n: i32,
        components: usize,
        ptr: u32,
    ) -> HostResult<()> {
        let values = mem.read_f32s(ptr, count(n).saturating_mul(components))?;
        self.context.uniform_f32(location, components, &values);
        Ok(())
    }

    /// `uniform{N}iv`: read `count` vectors of `components` ints
    pub fn uniform_iv(
        &mut self,
        mem: &MemoryView<'_>,
        location: i32,
        n: i32,
        components: usize,
        ptr: u32,
    ) -> HostResult<()> {
        let values = mem.read_i32s(ptr, count(n).saturating_mul(components))?;
        self.context.uniform_i32(location, components, &values);
        Ok(())
    }

    /// `uniformMatrix{N}fv`: read `count` matrices of `dim`×`dim` floats
    pub fn uniform_matrix_fv(
        &mut self,
        mem: &MemoryView<'_>,
        location: i32,
        n: i32,
        transpose: bool,
        dim: usize,
        ptr: u32,
    ) -> HostResult<()> {
        let values = mem.read_f32s(ptr, count(n).saturating_mul(dim * dim))?;
        self.context.uniform_matrix_f32(location, dim, transpose, &values);
        Ok(())
    }

    /// `vertexAttrib{N}fv`
    pub fn vertex_attrib_fv(
        &mut self,
        mem: &MemoryView<'_>,
        index: u32,
        components: usize,
        ptr: u32,
    ) -> HostResult<()> {
        let values = mem.read_f32s(ptr, components)?;
        self.context.vertex_attrib_f32(index, &values);
        Ok(())
    }
}
