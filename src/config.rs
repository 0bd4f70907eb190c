use bon::Builder;

use crate::error::ClusterError;
use crate::gauge::GaugeStyle;
use crate::geometry::SweepType;

/// RGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Framebuffer bytes for this color.
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (channel(self.r), channel(self.g), channel(self.b))
    }
}

/// Placement and styling of one gauge on the cluster face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeLayout {
    pub offset: (f32, f32),
    pub radius: f32,
    pub sweep: SweepType,
    pub style: GaugeStyle,
}

impl GaugeLayout {
    pub const fn new(
        offset_x: f32,
        offset_y: f32,
        radius: f32,
        sweep: SweepType,
        style: GaugeStyle,
    ) -> Self {
        Self {
            offset: (offset_x, offset_y),
            radius,
            sweep,
            style,
        }
    }
}

#[derive(Debug, Clone, Builder)]
pub struct ClusterConfig {
    #[builder(default = "Instrument Cluster".to_string())]
    pub title: String,

    // Window configuration
    #[builder(default = 1360)]
    pub window_width: u32,
    #[builder(default = 768)]
    pub window_height: u32,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    /// Width of line-list primitives, in framebuffer pixels.
    #[builder(default = 3.0)]
    pub line_width: f32,

    // Gauge layouts
    #[builder(default = GaugeLayout::new(-250.0, -50.0, 120.0, SweepType::FullCircle, GaugeStyle::Primary))]
    pub speedometer: GaugeLayout,
    #[builder(default = GaugeLayout::new(250.0, -50.0, 120.0, SweepType::FullCircle, GaugeStyle::Primary))]
    pub tachometer: GaugeLayout,
    #[builder(default = GaugeLayout::new(-400.0, 50.0, 60.0, SweepType::QuadrantRisingFromRight, GaugeStyle::Secondary))]
    pub fuel_gauge: GaugeLayout,
    #[builder(default = GaugeLayout::new(400.0, 50.0, 60.0, SweepType::QuadrantFallingToRight, GaugeStyle::Secondary))]
    pub temp_gauge: GaugeLayout,

    /// Seed for the autopilot; `None` means keyboard driving.
    pub demo_seed: Option<u64>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClusterConfig {
    /// Rejects frame rates and line widths that are not finite and positive.
    pub fn validate(&self) -> Result<(), ClusterError> {
        if !self.max_framerate.is_finite() || self.max_framerate <= 0.0 {
            return Err(ClusterError::InvalidArgument {
                flag: "max_framerate".to_string(),
                value: self.max_framerate.to_string(),
            });
        }
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(ClusterError::InvalidArgument {
                flag: "line_width".to_string(),
                value: self.line_width.to_string(),
            });
        }
        Ok(())
    }

    /// Applies `--title`, `--fps`, `--line-width`, `--fuel-sweep`,
    /// `--temp-sweep` and `--demo [seed]` on top of the defaults. The first
    /// item is expected to be the program name.
    pub fn from_args<I>(args: I) -> Result<Self, ClusterError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter().skip(1).peekable();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--title" => {
                    config.title = required_value(&arg, args.next())?;
                }
                "--fps" => {
                    let value = required_value(&arg, args.next())?;
                    config.max_framerate = parse_positive(&arg, &value)?;
                }
                "--line-width" => {
                    let value = required_value(&arg, args.next())?;
                    config.line_width = parse_positive(&arg, &value)? as f32;
                }
                "--fuel-sweep" => {
                    config.fuel_gauge.sweep = required_value(&arg, args.next())?.parse()?;
                }
                "--temp-sweep" => {
                    config.temp_gauge.sweep = required_value(&arg, args.next())?.parse()?;
                }
                "--demo" => {
                    let seed = match args.peek().map(|s| s.parse::<u64>()) {
                        Some(Ok(seed)) => {
                            args.next();
                            seed
                        }
                        _ => rand::random(),
                    };
                    config.demo_seed = Some(seed);
                }
                other => {
                    log::warn!("Ignoring unknown argument: {}", other);
                }
            }
        }
        config.validate()?;
        Ok(config)
    }
}

fn required_value(flag: &str, value: Option<String>) -> Result<String, ClusterError> {
    value.ok_or_else(|| ClusterError::InvalidArgument {
        flag: flag.to_string(),
        value: "<missing>".to_string(),
    })
}

fn parse_positive(flag: &str, value: &str) -> Result<f64, ClusterError> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(ClusterError::InvalidArgument {
            flag: flag.to_string(),
            value: value.to_string(),
        }),
    }
}
