//! Procedural gauge geometry and the value-to-angle mapping.
//!
//! All vertex data is produced in gauge-local space: centered on the origin,
//! unrotated and unscaled. Placement happens per draw through the shader
//! uniforms.

use std::str::FromStr;

use crate::error::ClusterError;

/// Segments of a full rim circle.
pub const RIM_SEGMENTS: usize = 100;
/// Vertices in the needle line list.
pub const NEEDLE_VERTEX_COUNT: usize = 8;

const MAJOR_TICK_INTERVALS: usize = 10;
/// Last minor position. 51..=55 fall past the end stop, below the dial.
const MINOR_TICK_POSITIONS: usize = 55;
const MINOR_TICK_DIVISIONS: usize = 50;
const MINOR_TICKS_PER_MAJOR: usize = 5;
const QUADRANT_TICKS: usize = 7;
const GLOW_PAIRS: usize = 51;

/// Angular range a gauge covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SweepType {
    /// −135° → +135°, traversed clockwise.
    FullCircle,
    /// 0° → 90°, traversed counter-clockwise.
    QuadrantRisingFromRight,
    /// 270° → 360°, traversed counter-clockwise.
    QuadrantFallingToRight,
}

impl SweepType {
    /// Start angle in degrees.
    pub const fn start_degrees(self) -> f32 {
        match self {
            Self::FullCircle => -135.0,
            Self::QuadrantRisingFromRight => 0.0,
            Self::QuadrantFallingToRight => 270.0,
        }
    }

    /// End angle in degrees, as labelled on the dial.
    pub const fn end_degrees(self) -> f32 {
        match self {
            Self::FullCircle => 135.0,
            Self::QuadrantRisingFromRight => 90.0,
            Self::QuadrantFallingToRight => 360.0,
        }
    }

    /// Sweep magnitude in degrees.
    pub const fn sweep_degrees(self) -> f32 {
        self.end_degrees() - self.start_degrees()
    }

    /// Whether increasing values move the needle clockwise.
    pub const fn is_clockwise(self) -> bool {
        matches!(self, Self::FullCircle)
    }
}

impl FromStr for SweepType {
    type Err = ClusterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" | "full-circle" => Ok(Self::FullCircle),
            "rising" | "quadrant-rising" => Ok(Self::QuadrantRisingFromRight),
            "falling" | "quadrant-falling" => Ok(Self::QuadrantFallingToRight),
            other => Err(ClusterError::UnsupportedSweep(other.to_string())),
        }
    }
}

/// Immutable description of one gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeSpec {
    offset: (f32, f32),
    radius: f32,
    sweep: SweepType,
}

impl GaugeSpec {
    pub fn new(
        offset_x: f32,
        offset_y: f32,
        radius: f32,
        sweep: SweepType,
    ) -> Result<Self, ClusterError> {
        if !offset_x.is_finite() || !offset_y.is_finite() {
            return Err(ClusterError::InvalidOffset(offset_x, offset_y));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ClusterError::InvalidRadius(radius));
        }
        Ok(Self {
            offset: (offset_x, offset_y),
            radius,
            sweep,
        })
    }

    pub fn offset(&self) -> (f32, f32) {
        self.offset
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn sweep(&self) -> SweepType {
        self.sweep
    }
}

/// Maps a normalized reading to a needle rotation in radians.
///
/// The value is clamped to [0, 1] first, so out-of-range readings pin the
/// needle at either end. Full-circle gauges turn clockwise (the angle
/// decreases from −135° towards −405°) the way automotive dials read;
/// quadrant gauges turn counter-clockwise from their start angle. The result
/// is not wrapped into any canonical range.
pub fn angle_for_value(spec: &GaugeSpec, value: f32) -> f32 {
    let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    let sweep = spec.sweep;
    let degrees = if sweep.is_clockwise() {
        sweep.start_degrees() - sweep.sweep_degrees() * value
    } else {
        sweep.start_degrees() + sweep.sweep_degrees() * value
    };
    degrees.to_radians()
}

fn polar(radius: f32, degrees: f32) -> [f32; 2] {
    let (sin_a, cos_a) = degrees.to_radians().sin_cos();
    [radius * cos_a, radius * sin_a]
}

fn push_tick(vertices: &mut Vec<[f32; 2]>, degrees: f32, inner: f32, outer: f32) {
    vertices.push(polar(inner, degrees));
    vertices.push(polar(outer, degrees));
}

/// Triangle fan for bezel, background and hub: a center point followed by
/// the circle (full-circle sweep) or the quadrant arc.
pub fn build_rim(spec: &GaugeSpec) -> Vec<[f32; 2]> {
    let r = spec.radius;
    let mut vertices = vec![[0.0, 0.0]];
    match spec.sweep {
        SweepType::FullCircle => {
            for i in 0..=RIM_SEGMENTS {
                let angle = std::f32::consts::TAU * i as f32 / RIM_SEGMENTS as f32;
                vertices.push([r * angle.cos(), r * angle.sin()]);
            }
        }
        sweep => {
            let sweep_degrees = sweep.sweep_degrees();
            let segments = (RIM_SEGMENTS as f32 * sweep_degrees / 360.0).round() as usize;
            for i in 0..=segments {
                let degrees = sweep.start_degrees() + sweep_degrees * i as f32 / segments as f32;
                vertices.push(polar(r, degrees));
            }
        }
    }
    vertices
}

/// Needle line list pointing along +x: shaft, forked tip, counter-weight.
pub fn build_needle(spec: &GaugeSpec) -> Vec<[f32; 2]> {
    let r = spec.radius;
    let width = 0.02 * r;
    vec![
        [0.0, 0.0],
        [0.85 * r, 0.0],
        [0.85 * r, 0.0],
        [0.9 * r, width],
        [0.85 * r, 0.0],
        [0.9 * r, -width],
        [0.0, 0.0],
        [-0.05 * r, 0.0],
    ]
}

/// Tick line list and its vertex count.
pub fn build_ticks(spec: &GaugeSpec) -> (Vec<[f32; 2]>, usize) {
    let r = spec.radius;
    let sweep = spec.sweep;
    let start = sweep.start_degrees();
    let sweep_degrees = sweep.sweep_degrees();
    let mut vertices = Vec::new();

    match sweep {
        SweepType::FullCircle => {
            for i in 0..=MAJOR_TICK_INTERVALS {
                let degrees = start - sweep_degrees * i as f32 / MAJOR_TICK_INTERVALS as f32;
                push_tick(&mut vertices, degrees, 0.85 * r, 0.95 * r);
            }
            let on_major = |i: &usize| {
                i % MINOR_TICKS_PER_MAJOR == 0 && i / MINOR_TICKS_PER_MAJOR <= MAJOR_TICK_INTERVALS
            };
            for i in (0..=MINOR_TICK_POSITIONS).filter(|i| !on_major(i)) {
                let degrees = start - sweep_degrees * i as f32 / MINOR_TICK_DIVISIONS as f32;
                push_tick(&mut vertices, degrees, 0.88 * r, 0.92 * r);
            }
        }
        _ => {
            for i in 0..QUADRANT_TICKS {
                let degrees = start + sweep_degrees * i as f32 / (QUADRANT_TICKS - 1) as f32;
                push_tick(&mut vertices, degrees, 0.80 * r, 0.95 * r);
            }
        }
    }

    let count = vertices.len();
    (vertices, count)
}

/// Glow triangle strip along the full sweep; empty for quadrant gauges.
pub fn build_glow(spec: &GaugeSpec) -> (Vec<[f32; 2]>, usize) {
    let sweep = spec.sweep;
    if !matches!(sweep, SweepType::FullCircle) {
        return (Vec::new(), 0);
    }

    let r = spec.radius;
    let mut vertices = Vec::with_capacity(GLOW_PAIRS * 2);
    for i in 0..GLOW_PAIRS {
        let degrees = sweep.start_degrees()
            - sweep.sweep_degrees() * i as f32 / (GLOW_PAIRS - 1) as f32;
        vertices.push(polar(0.75 * r, degrees));
        vertices.push(polar(0.85 * r, degrees));
    }

    let count = vertices.len();
    (vertices, count)
}

/// CPU-side copy of every mesh a gauge uploads.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeMesh {
    pub rim: Vec<[f32; 2]>,
    pub needle: Vec<[f32; 2]>,
    pub ticks: Vec<[f32; 2]>,
    pub tick_count: usize,
    pub glow: Vec<[f32; 2]>,
    pub glow_count: usize,
}

impl GaugeMesh {
    pub fn build(spec: &GaugeSpec) -> Self {
        let (ticks, tick_count) = build_ticks(spec);
        let (glow, glow_count) = build_glow(spec);
        Self {
            rim: build_rim(spec),
            needle: build_needle(spec),
            ticks,
            tick_count,
            glow,
            glow_count,
        }
    }
}
