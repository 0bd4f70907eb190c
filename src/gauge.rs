//! A gauge instance: its uploaded meshes and the ordered passes that draw it.

use std::rc::Rc;

use crate::config::Color;
use crate::error::ClusterError;
use crate::geometry::{self, GaugeMesh, GaugeSpec, SweepType, NEEDLE_VERTEX_COUNT};
use crate::shader::{BufferPool, DrawMode, ShaderContext, VertexBuffer};

/// Visual treatment, chosen by the caller independently of the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GaugeStyle {
    /// Large dial: bezel, dark face, glow, ticks, needle, hub.
    Primary,
    /// Small dial: ring, optional face for quadrant arcs, ticks, needle, hub.
    Secondary,
}

/// Which mesh a pass draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Rim,
    Glow,
    Ticks,
    Needle,
}

/// One draw call in a gauge's sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pass {
    pub element: Element,
    pub scale: f32,
    pub color: Color,
    pub alpha: f32,
}

impl Pass {
    const fn new(element: Element, scale: f32, color: Color, alpha: f32) -> Self {
        Self {
            element,
            scale,
            color,
            alpha,
        }
    }
}

// ============================================================================
// PASS TABLES
// ============================================================================

const BEZEL: Pass = Pass::new(Element::Rim, 1.0, Color::new(0.7, 0.7, 0.8), 1.0);
const FACE: Pass = Pass::new(Element::Rim, 0.9, Color::new(0.05, 0.05, 0.08), 1.0);
const GLOW: Pass = Pass::new(Element::Glow, 1.0, Color::new(0.0, 0.6, 1.0), 0.35);
const TICKS: Pass = Pass::new(Element::Ticks, 1.0, Color::new(0.9, 0.9, 0.9), 1.0);
const NEEDLE: Pass = Pass::new(Element::Needle, 1.0, Color::new(1.0, 0.2, 0.1), 1.0);
const HUB: Pass = Pass::new(Element::Rim, 0.08, Color::new(0.3, 0.3, 0.35), 1.0);

const RING: Pass = Pass::new(Element::Rim, 1.0, Color::new(0.5, 0.5, 0.55), 1.0);
const ARC_FACE: Pass = Pass::new(Element::Rim, 0.9, Color::new(0.08, 0.08, 0.1), 1.0);
const SMALL_TICKS: Pass = Pass::new(Element::Ticks, 1.0, Color::new(0.8, 0.8, 0.8), 1.0);
const SMALL_NEEDLE: Pass = Pass::new(Element::Needle, 1.0, Color::new(1.0, 0.5, 0.0), 1.0);
const SMALL_HUB: Pass = Pass::new(Element::Rim, 0.08, Color::new(0.25, 0.25, 0.3), 1.0);

const PRIMARY_FULL: &[Pass] = &[BEZEL, FACE, GLOW, TICKS, NEEDLE, HUB];
const PRIMARY_QUADRANT: &[Pass] = &[BEZEL, FACE, TICKS, NEEDLE, HUB];
const SECONDARY_FULL: &[Pass] = &[RING, SMALL_TICKS, SMALL_NEEDLE, SMALL_HUB];
const SECONDARY_QUADRANT: &[Pass] = &[RING, ARC_FACE, SMALL_TICKS, SMALL_NEEDLE, SMALL_HUB];

/// Ordered passes for a style and sweep.
pub fn passes(style: GaugeStyle, sweep: SweepType) -> &'static [Pass] {
    match (style, sweep) {
        (GaugeStyle::Primary, SweepType::FullCircle) => PRIMARY_FULL,
        (GaugeStyle::Primary, _) => PRIMARY_QUADRANT,
        (GaugeStyle::Secondary, SweepType::FullCircle) => SECONDARY_FULL,
        (GaugeStyle::Secondary, _) => SECONDARY_QUADRANT,
    }
}

// ============================================================================
// GAUGE
// ============================================================================

/// A gauge with its meshes resident in the buffer pool.
///
/// Buffers are acquired in [`Gauge::new`] and released when the gauge is
/// dropped.
#[derive(Debug)]
pub struct Gauge {
    spec: GaugeSpec,
    rim: VertexBuffer,
    needle: VertexBuffer,
    ticks: VertexBuffer,
    glow: Option<VertexBuffer>,
    tick_count: usize,
    glow_count: usize,
}

impl Gauge {
    pub fn new(
        pool: &Rc<BufferPool>,
        offset_x: f32,
        offset_y: f32,
        radius: f32,
        sweep: SweepType,
    ) -> Result<Self, ClusterError> {
        let spec = GaugeSpec::new(offset_x, offset_y, radius, sweep)?;
        Ok(Self::from_spec(pool, spec))
    }

    pub fn from_spec(pool: &Rc<BufferPool>, spec: GaugeSpec) -> Self {
        let mesh = GaugeMesh::build(&spec);
        let rim = VertexBuffer::upload(pool, &mesh.rim);
        let needle = VertexBuffer::upload(pool, &mesh.needle);
        let ticks = VertexBuffer::upload(pool, &mesh.ticks);
        let glow = (mesh.glow_count > 0).then(|| VertexBuffer::upload(pool, &mesh.glow));
        log::debug!(
            "Gauge {:?} at {:?} r={}: rim {} / ticks {} / glow {} vertices",
            spec.sweep(),
            spec.offset(),
            spec.radius(),
            rim.len(),
            mesh.tick_count,
            mesh.glow_count
        );
        Self {
            spec,
            rim,
            needle,
            ticks,
            glow,
            tick_count: mesh.tick_count,
            glow_count: mesh.glow_count,
        }
    }

    pub fn tick_count(&self) -> usize {
        self.tick_count
    }

    pub fn glow_count(&self) -> usize {
        self.glow_count
    }

    pub fn angle_for_value(&self, value: f32) -> f32 {
        geometry::angle_for_value(&self.spec, value)
    }

    /// Issues this gauge's passes with the needle at `needle_angle` radians.
    pub fn draw<S: ShaderContext>(&self, shader: &mut S, needle_angle: f32, style: GaugeStyle) {
        let (offset_x, offset_y) = self.spec.offset();
        for pass in passes(style, self.spec.sweep()) {
            let (buffer, mode, count) = match pass.element {
                Element::Rim => (&self.rim, DrawMode::TriangleFan, self.rim.len()),
                Element::Ticks => (&self.ticks, DrawMode::Lines, self.tick_count),
                Element::Needle => (&self.needle, DrawMode::Lines, NEEDLE_VERTEX_COUNT),
                Element::Glow => match self.glow {
                    Some(ref glow) => (glow, DrawMode::TriangleStrip, self.glow_count),
                    None => continue,
                },
            };
            let rotation = if pass.element == Element::Needle {
                needle_angle
            } else {
                0.0
            };
            shader.set_rotation(rotation);
            shader.set_offset(offset_x, offset_y);
            shader.set_scale(pass.scale, pass.scale);
            shader.set_color(pass.color);
            shader.set_alpha(pass.alpha);
            shader.draw_arrays(buffer, mode, count);
        }
    }
}
