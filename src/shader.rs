//! The shader contract every cluster element is drawn through.
//!
//! Geometry is uploaded once into [`VertexBuffer`]s held in a [`BufferPool`].
//! Each draw call positions a buffer through five uniforms: `rotation`
//! (radians, about the local origin), `scale` (applied after rotation),
//! `offset` (applied after scale), `color` and `alpha`. Positions land in a
//! fixed logical viewport of half-extent 500×300 units.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::config::Color;

/// Half-extent of the logical viewport, in cluster units.
pub const VIEWPORT_HALF_EXTENT: (f32, f32) = (500.0, 300.0);

/// Primitive assembly for a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    TriangleFan,
    TriangleStrip,
    Lines,
}

/// Uniform values in effect for a draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniforms {
    pub rotation: f32,
    pub offset: (f32, f32),
    pub scale: (f32, f32),
    pub color: Color,
    pub alpha: f32,
}

impl Default for Uniforms {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            offset: (0.0, 0.0),
            scale: (1.0, 1.0),
            color: Color::new(1.0, 1.0, 1.0),
            alpha: 1.0,
        }
    }
}

impl Uniforms {
    /// Vertex stage: rotate about the local origin, then scale, then offset.
    pub fn vertex_stage(&self, position: [f32; 2]) -> [f32; 2] {
        let (sin_r, cos_r) = self.rotation.sin_cos();
        let rotated = [
            position[0] * cos_r - position[1] * sin_r,
            position[0] * sin_r + position[1] * cos_r,
        ];
        [
            rotated[0] * self.scale.0 + self.offset.0,
            rotated[1] * self.scale.1 + self.offset.1,
        ]
    }

    /// Logical position to normalized device coordinates.
    pub fn project(position: [f32; 2]) -> [f32; 2] {
        [
            position[0] / VIEWPORT_HALF_EXTENT.0,
            position[1] / VIEWPORT_HALF_EXTENT.1,
        ]
    }
}

/// Identifier of an uploaded buffer inside its pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(u32);

#[derive(Debug, Default)]
struct PoolInner {
    next_id: u32,
    buffers: HashMap<BufferId, Rc<[[f32; 2]]>>,
}

/// Storage for static vertex data, shared by every buffer handle.
#[derive(Debug, Default)]
pub struct BufferPool {
    inner: RefCell<PoolInner>,
}

impl BufferPool {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Number of buffers currently allocated.
    pub fn live_buffers(&self) -> usize {
        self.inner.borrow().buffers.len()
    }

    fn allocate(&self, vertices: &[[f32; 2]]) -> BufferId {
        let mut inner = self.inner.borrow_mut();
        let id = BufferId(inner.next_id);
        inner.next_id += 1;
        inner.buffers.insert(id, Rc::from(vertices));
        id
    }

    fn release(&self, id: BufferId) {
        if self.inner.borrow_mut().buffers.remove(&id).is_none() {
            log::warn!("Released unknown vertex buffer {:?}", id);
        }
    }

    fn vertices(&self, id: BufferId) -> Option<Rc<[[f32; 2]]>> {
        self.inner.borrow().buffers.get(&id).cloned()
    }
}

/// Owning handle to an uploaded vertex buffer. Dropping it frees the buffer.
#[derive(Debug)]
pub struct VertexBuffer {
    pool: Rc<BufferPool>,
    id: BufferId,
    len: usize,
}

impl VertexBuffer {
    pub fn upload(pool: &Rc<BufferPool>, vertices: &[[f32; 2]]) -> Self {
        let id = pool.allocate(vertices);
        log::trace!("Uploaded vertex buffer {:?} ({} vertices)", id, vertices.len());
        Self {
            pool: Rc::clone(pool),
            id,
            len: vertices.len(),
        }
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Number of vertices uploaded.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn vertices(&self) -> Option<Rc<[[f32; 2]]>> {
        self.pool.vertices(self.id)
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        self.pool.release(self.id);
        log::trace!("Released vertex buffer {:?}", self.id);
    }
}

/// Uniform setters and draw submission for the single cluster program.
pub trait ShaderContext {
    fn set_rotation(&mut self, radians: f32);
    fn set_offset(&mut self, x: f32, y: f32);
    fn set_scale(&mut self, x: f32, y: f32);
    fn set_color(&mut self, color: Color);
    fn set_alpha(&mut self, alpha: f32);

    /// Draws the first `count` vertices of `buffer` with the current uniforms.
    fn draw_arrays(&mut self, buffer: &VertexBuffer, mode: DrawMode, count: usize);
}

/// Bounds a requested vertex count by what the buffer actually holds.
pub(crate) fn bounded_count(buffer: &VertexBuffer, count: usize) -> usize {
    if count > buffer.len() {
        log::warn!(
            "Draw of {} vertices exceeds buffer {:?} ({} vertices); clamping",
            count,
            buffer.id(),
            buffer.len()
        );
        buffer.len()
    } else {
        count
    }
}

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub uniforms: Uniforms,
    pub buffer: BufferId,
    pub mode: DrawMode,
    pub count: usize,
}

/// Shader context that keeps the issued draw calls instead of rasterizing them.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    uniforms: Uniforms,
    calls: Vec<DrawCall>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl ShaderContext for CommandRecorder {
    fn set_rotation(&mut self, radians: f32) {
        self.uniforms.rotation = radians;
    }

    fn set_offset(&mut self, x: f32, y: f32) {
        self.uniforms.offset = (x, y);
    }

    fn set_scale(&mut self, x: f32, y: f32) {
        self.uniforms.scale = (x, y);
    }

    fn set_color(&mut self, color: Color) {
        self.uniforms.color = color;
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.uniforms.alpha = alpha;
    }

    fn draw_arrays(&mut self, buffer: &VertexBuffer, mode: DrawMode, count: usize) {
        self.calls.push(DrawCall {
            uniforms: self.uniforms,
            buffer: buffer.id(),
            mode,
            count: bounded_count(buffer, count),
        });
    }
}
