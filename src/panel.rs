//! Rectangle-based panels: the digital display and the warning lights.

use std::rc::Rc;

use crate::config::Color;
use crate::shader::{BufferPool, DrawMode, ShaderContext, VertexBuffer};
use crate::vehicle::{warning_lights, Gear, VehicleState};

const UNIT_QUAD: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

const WARNING_ROW: (f32, f32) = (-400.0, -150.0);
const WARNING_SIZE: f32 = 25.0;
const WARNING_SPACING: f32 = 35.0;
const INACTIVE_LIGHT: Color = Color::new(0.2, 0.2, 0.2);

/// Draws axis-aligned colored rectangles from a single unit quad.
#[derive(Debug)]
pub struct PanelRenderer {
    quad: VertexBuffer,
}

impl PanelRenderer {
    pub fn new(pool: &Rc<BufferPool>) -> Self {
        Self {
            quad: VertexBuffer::upload(pool, &UNIT_QUAD),
        }
    }

    /// Rectangle with its lower-left corner at (x, y), in cluster units.
    pub fn draw_rectangle<S: ShaderContext>(
        &self,
        shader: &mut S,
        (x, y): (f32, f32),
        (width, height): (f32, f32),
        color: Color,
        alpha: f32,
    ) {
        shader.set_rotation(0.0);
        shader.set_offset(x, y);
        shader.set_scale(width, height);
        shader.set_color(color);
        shader.set_alpha(alpha);
        shader.draw_arrays(&self.quad, DrawMode::TriangleFan, UNIT_QUAD.len());
    }

    pub fn draw_digital_display<S: ShaderContext>(&self, shader: &mut S, state: &VehicleState) {
        self.draw_rectangle(shader, (-200.0, 150.0), (400.0, 100.0), Color::new(0.1, 0.1, 0.1), 1.0);

        // Mode indicator
        self.draw_rectangle(shader, (-180.0, 180.0), (80.0, 30.0), state.display_mode.accent(), 1.0);

        // Gear indicator
        self.draw_rectangle(shader, (-50.0, 180.0), (60.0, 40.0), Color::new(0.2, 0.2, 0.2), 1.0);
        let gear_color = match state.gear {
            Gear::Park => Color::new(0.0, 1.0, 0.0),
            Gear::Drive => Color::new(0.0, 0.8, 1.0),
        };
        self.draw_rectangle(shader, (-40.0, 190.0), (40.0, 20.0), gear_color, 1.0);

        // Clock
        self.draw_rectangle(shader, (80.0, 180.0), (100.0, 30.0), Color::new(0.0, 0.5, 1.0), 1.0);

        let outside = if state.outside_temp < 5.0 {
            Color::new(0.0, 0.8, 1.0)
        } else {
            Color::new(0.8, 1.0, 0.0)
        };
        self.draw_rectangle(shader, (-150.0, 120.0), (60.0, 20.0), outside, 1.0);
    }

    pub fn draw_warning_panel<S: ShaderContext>(&self, shader: &mut S, state: &VehicleState) {
        let blink_alpha = if state.blink_on() { 1.0 } else { 0.3 };
        let (mut x, y) = WARNING_ROW;
        for light in warning_lights(state) {
            let (color, alpha) = if light.active {
                (light.color, blink_alpha)
            } else {
                (INACTIVE_LIGHT, 0.3)
            };
            self.draw_rectangle(shader, (x, y), (WARNING_SIZE, WARNING_SIZE), color, alpha);
            x += WARNING_SPACING;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::CommandRecorder;

    #[test]
    fn test_rectangle_uses_offset_and_scale() {
        let pool = BufferPool::new();
        let panel = PanelRenderer::new(&pool);
        let mut recorder = CommandRecorder::new();
        panel.draw_rectangle(&mut recorder, (-40.0, 190.0), (40.0, 20.0), Color::new(1.0, 0.0, 0.0), 0.5);

        let call = &recorder.calls()[0];
        assert_eq!(call.mode, DrawMode::TriangleFan);
        assert_eq!(call.count, 4);
        assert_eq!(call.uniforms.rotation, 0.0);
        assert_eq!(call.uniforms.offset, (-40.0, 190.0));
        assert_eq!(call.uniforms.scale, (40.0, 20.0));
        assert_eq!(call.uniforms.alpha, 0.5);
        assert_eq!(pool.live_buffers(), 1);
    }

    #[test]
    fn test_digital_display_reflects_state() {
        let pool = BufferPool::new();
        let panel = PanelRenderer::new(&pool);
        let mut recorder = CommandRecorder::new();
        let mut state = VehicleState::default();
        state.outside_temp = -3.0;
        panel.draw_digital_display(&mut recorder, &state);

        let calls = recorder.calls();
        assert_eq!(calls.len(), 6);
        assert_eq!(calls[1].uniforms.color, state.display_mode.accent());
        assert_eq!(calls[3].uniforms.color, Color::new(0.0, 1.0, 0.0));
        assert_eq!(calls[5].uniforms.color, Color::new(0.0, 0.8, 1.0));
    }

    #[test]
    fn test_warning_panel_layout_and_blink() {
        let pool = BufferPool::new();
        let panel = PanelRenderer::new(&pool);
        let mut recorder = CommandRecorder::new();
        let mut state = VehicleState::default();
        state.blink_timer = 0.75;
        panel.draw_warning_panel(&mut recorder, &state);

        let calls = recorder.calls();
        assert_eq!(calls.len(), 12);
        assert_eq!(calls[0].uniforms.offset, (-400.0, -150.0));
        assert_eq!(calls[11].uniforms.offset, (-400.0 + 11.0 * 35.0, -150.0));
        // Parking brake is on: lit, dimmed by the blink phase.
        assert_eq!(calls[9].uniforms.color, Color::new(1.0, 0.0, 0.0));
        assert_eq!(calls[9].uniforms.alpha, 0.3);
        assert_eq!(calls[0].uniforms.color, INACTIVE_LIGHT);

        recorder.clear();
        state.blink_timer = 0.1;
        panel.draw_warning_panel(&mut recorder, &state);
        assert_eq!(recorder.calls()[9].uniforms.alpha, 1.0);
    }
}
