//! The full cluster face: four gauges plus the rectangle panels.

use std::rc::Rc;

use crate::config::{ClusterConfig, GaugeLayout};
use crate::error::ClusterError;
use crate::gauge::{Gauge, GaugeStyle};
use crate::panel::PanelRenderer;
use crate::shader::{BufferPool, ShaderContext};
use crate::vehicle::VehicleState;

#[derive(Debug)]
struct PlacedGauge {
    gauge: Gauge,
    style: GaugeStyle,
}

impl PlacedGauge {
    fn new(pool: &Rc<BufferPool>, layout: &GaugeLayout) -> Result<Self, ClusterError> {
        let (x, y) = layout.offset;
        Ok(Self {
            gauge: Gauge::new(pool, x, y, layout.radius, layout.sweep)?,
            style: layout.style,
        })
    }

    fn draw<S: ShaderContext>(&self, shader: &mut S, value: f32) {
        let angle = self.gauge.angle_for_value(value);
        self.gauge.draw(shader, angle, self.style);
    }
}

#[derive(Debug)]
pub struct Dashboard {
    speedometer: PlacedGauge,
    tachometer: PlacedGauge,
    fuel: PlacedGauge,
    temperature: PlacedGauge,
    panel: PanelRenderer,
}

impl Dashboard {
    pub fn new(pool: &Rc<BufferPool>, config: &ClusterConfig) -> Result<Self, ClusterError> {
        Ok(Self {
            speedometer: PlacedGauge::new(pool, &config.speedometer)?,
            tachometer: PlacedGauge::new(pool, &config.tachometer)?,
            fuel: PlacedGauge::new(pool, &config.fuel_gauge)?,
            temperature: PlacedGauge::new(pool, &config.temp_gauge)?,
            panel: PanelRenderer::new(pool),
        })
    }

    /// Draws one frame of the cluster for `state`. Does not clear.
    pub fn draw<S: ShaderContext>(&self, shader: &mut S, state: &VehicleState) {
        let readings = state.readings();
        self.speedometer.draw(shader, readings.speed);
        self.tachometer.draw(shader, readings.rpm);
        self.fuel.draw(shader, readings.fuel);
        self.temperature.draw(shader, readings.temperature);
        self.panel.draw_digital_display(shader, state);
        self.panel.draw_warning_panel(shader, state);
    }
}
