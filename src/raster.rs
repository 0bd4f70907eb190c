// ============================================================================
// SOFTWARE RASTERIZER
// ============================================================================
//
// Executes the shader contract on the RGBA framebuffer handed out by `pixels`.

use crate::config::Color;
use crate::shader::{bounded_count, DrawMode, ShaderContext, Uniforms, VertexBuffer};

/// RGBA8 framebuffer borrowed for one frame.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        let (r, g, b) = color.to_rgb8();
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[r, g, b, 0xff]);
        }
    }

    /// Pixel bytes at (x, y), if inside the frame.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        self.frame
            .get(idx..idx + 4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Source-over blend of `rgb` at coverage `alpha`.
    fn set_pixel(&mut self, x: i32, y: i32, rgb: (u8, u8, u8), alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(idx..idx + 4) else {
            return;
        };
        let a = alpha.clamp(0.0, 1.0);
        let blend = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
        dst[0] = blend(rgb.0, dst[0]);
        dst[1] = blend(rgb.1, dst[1]);
        dst[2] = blend(rgb.2, dst[2]);
        dst[3] = 0xff;
    }
}

/// Shader context that rasterizes draw calls into a [`Canvas`].
pub struct SoftwareShader<'a> {
    canvas: Canvas<'a>,
    uniforms: Uniforms,
    line_width: f32,
}

impl<'a> SoftwareShader<'a> {
    pub fn new(canvas: Canvas<'a>, line_width: f32) -> Self {
        Self {
            canvas,
            uniforms: Uniforms::default(),
            line_width,
        }
    }

    pub fn canvas(&self) -> &Canvas<'a> {
        &self.canvas
    }

    /// Normalized device coordinates to framebuffer pixels (y down).
    fn to_screen(&self, ndc: [f32; 2]) -> [f32; 2] {
        [
            (ndc[0] + 1.0) * 0.5 * self.canvas.width as f32,
            (1.0 - ndc[1]) * 0.5 * self.canvas.height as f32,
        ]
    }

    fn fill_triangle(&mut self, a: [f32; 2], b: [f32; 2], c: [f32; 2], rgb: (u8, u8, u8)) {
        let area = edge(a, b, c);
        if area.abs() < f32::EPSILON {
            return;
        }
        let min_x = a[0].min(b[0]).min(c[0]).floor().max(0.0) as i32;
        let max_x = a[0].max(b[0]).max(c[0]).ceil().min(self.canvas.width as f32) as i32;
        let min_y = a[1].min(b[1]).min(c[1]).floor().max(0.0) as i32;
        let max_y = a[1].max(b[1]).max(c[1]).ceil().min(self.canvas.height as f32) as i32;
        let alpha = self.uniforms.alpha;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let p = [x as f32 + 0.5, y as f32 + 0.5];
                let w0 = edge(b, c, p) / area;
                let w1 = edge(c, a, p) / area;
                let w2 = edge(a, b, p) / area;
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    self.canvas.set_pixel(x, y, rgb, alpha);
                }
            }
        }
    }

    fn draw_line(&mut self, p0: [f32; 2], p1: [f32; 2], rgb: (u8, u8, u8)) {
        let thickness = self.line_width;
        let pad = thickness.ceil() + 1.0;
        let min_x = (p0[0].min(p1[0]) - pad).floor().max(0.0) as i32;
        let max_x = (p0[0].max(p1[0]) + pad).ceil().min(self.canvas.width as f32) as i32;
        let min_y = (p0[1].min(p1[1]) - pad).floor().max(0.0) as i32;
        let max_y = (p0[1].max(p1[1]) + pad).ceil().min(self.canvas.height as f32) as i32;
        let dx = p1[0] - p0[0];
        let dy = p1[1] - p0[1];
        let len_sq = dx * dx + dy * dy;
        let alpha = self.uniforms.alpha;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let px = x as f32 + 0.5 - p0[0];
                let py = y as f32 + 0.5 - p0[1];
                let t = if len_sq > 0.0 {
                    ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let lx = p0[0] + t * dx;
                let ly = p0[1] + t * dy;
                let dist = ((lx - (x as f32 + 0.5)).powi(2) + (ly - (y as f32 + 0.5)).powi(2)).sqrt();
                let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.canvas.set_pixel(x, y, rgb, aa * alpha);
                }
            }
        }
    }
}

fn edge(a: [f32; 2], b: [f32; 2], p: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}

impl ShaderContext for SoftwareShader<'_> {
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
        let count = bounded_count(buffer, count);
        let Some(vertices) = buffer.vertices() else {
            log::warn!("Draw from released vertex buffer {:?} skipped", buffer.id());
            return;
        };
        let screen: Vec<[f32; 2]> = vertices[..count]
            .iter()
            .map(|&v| self.to_screen(Uniforms::project(self.uniforms.vertex_stage(v))))
            .collect();
        let rgb = self.uniforms.color.to_rgb8();

        match mode {
            DrawMode::TriangleFan => {
                for i in 1..screen.len().saturating_sub(1) {
                    self.fill_triangle(screen[0], screen[i], screen[i + 1], rgb);
                }
            }
            DrawMode::TriangleStrip => {
                for tri in screen.windows(3) {
                    self.fill_triangle(tri[0], tri[1], tri[2], rgb);
                }
            }
            DrawMode::Lines => {
                for segment in screen.chunks_exact(2) {
                    self.draw_line(segment[0], segment[1], rgb);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::BufferPool;

    const WIDTH: usize = 100;
    const HEIGHT: usize = 60;

    fn frame() -> Vec<u8> {
        vec![0; WIDTH * HEIGHT * 4]
    }

    #[test]
    fn test_clear_fills_frame() {
        let mut frame = frame();
        let mut canvas = Canvas::new(&mut frame, WIDTH, HEIGHT);
        assert_eq!((canvas.width(), canvas.height()), (WIDTH, HEIGHT));
        canvas.clear(Color::new(1.0, 0.0, 0.0));
        assert_eq!(canvas.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(WIDTH - 1, HEIGHT - 1), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(WIDTH, 0), None);
    }

    #[test]
    fn test_fan_fills_offset_quad() {
        // Quad covering logical x 0..250, y 0..150: the upper-right quarter.
        let pool = BufferPool::new();
        let quad = VertexBuffer::upload(&pool, &[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        let mut frame = frame();
        let mut shader = SoftwareShader::new(Canvas::new(&mut frame, WIDTH, HEIGHT), 1.0);
        shader.set_scale(250.0, 150.0);
        shader.set_color(Color::new(0.0, 1.0, 0.0));
        shader.draw_arrays(&quad, DrawMode::TriangleFan, 4);

        let canvas = shader.canvas();
        assert_eq!(canvas.pixel(60, 20), Some([0, 255, 0, 255]));
        assert_eq!(canvas.pixel(20, 20), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(60, 40), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_alpha_blends_over_background() {
        let pool = BufferPool::new();
        let quad = VertexBuffer::upload(&pool, &[[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]]);
        let mut frame = frame();
        let mut canvas = Canvas::new(&mut frame, WIDTH, HEIGHT);
        canvas.clear(Color::new(0.0, 0.0, 0.0));
        let mut shader = SoftwareShader::new(canvas, 1.0);
        shader.set_scale(500.0, 300.0);
        shader.set_color(Color::new(1.0, 1.0, 1.0));
        shader.set_alpha(0.5);
        shader.draw_arrays(&quad, DrawMode::TriangleFan, 4);
        let [r, g, b, a] = shader.canvas().pixel(50, 30).unwrap();
        assert!((127..=128).contains(&r));
        assert_eq!((r, r, 255), (g, b, a));
    }

    #[test]
    fn test_rotated_line() {
        // A line along +x rotated 90° points straight up from the center.
        let pool = BufferPool::new();
        let line = VertexBuffer::upload(&pool, &[[0.0, 0.0], [200.0, 0.0]]);
        let mut frame = frame();
        let mut shader = SoftwareShader::new(Canvas::new(&mut frame, WIDTH, HEIGHT), 2.0);
        shader.set_rotation(std::f32::consts::FRAC_PI_2);
        shader.set_color(Color::new(1.0, 1.0, 1.0));
        shader.draw_arrays(&line, DrawMode::Lines, 2);

        let canvas = shader.canvas();
        assert_eq!(canvas.pixel(50, 15).map(|p| p[0]), Some(255));
        assert_eq!(canvas.pixel(70, 30).map(|p| p[0]), Some(0));
    }

    #[test]
    fn test_overlong_draw_is_clamped() {
        let pool = BufferPool::new();
        let tri = VertexBuffer::upload(&pool, &[[0.0, 0.0], [500.0, 0.0], [0.0, 300.0]]);
        let mut frame = frame();
        let mut shader = SoftwareShader::new(Canvas::new(&mut frame, WIDTH, HEIGHT), 1.0);
        shader.set_color(Color::new(0.0, 0.0, 1.0));
        shader.draw_arrays(&tri, DrawMode::TriangleFan, 102);
        assert_eq!(shader.canvas().pixel(55, 25), Some([0, 0, 255, 255]));
    }
}
