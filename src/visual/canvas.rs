//! 2D drawing surface used by the frame renderer.
//!
//! The renderer only talks to [`Canvas`]; [`PixmapCanvas`] rasterizes with
//! tiny-skia into an RGBA buffer that the presenter uploads to the GPU and
//! the recorder writes to PNG.

use tiny_skia::{
    Color, FillRule, GradientStop, LineCap, LineJoin, LinearGradient, Paint, PathBuilder, Pixmap,
    Point, RadialGradient, Rect, Shader, SpreadMode, Stroke, Transform,
};

use super::color::Rgb;

/// Drawing operations the visualizer needs
pub trait Canvas {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Fill an axis-aligned rectangle with a translucent color
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32);

    /// Stroke an open polyline
    fn stroke_polyline(&mut self, points: &[(f32, f32)], color: Rgb, alpha: f32, width: f32);

    /// Disc at (cx, cy) fading from opaque `color` at the center to transparent at `radius`
    fn fill_radial_particle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb);

    /// Full-height band between `from_x` and `to_x`, `color` at `alpha` on the
    /// `from_x` side fading to transparent at `to_x`
    fn fill_edge_gradient(&mut self, from_x: f32, to_x: f32, color: Rgb, alpha: f32);

    /// Darken the whole surface, leaving a fading trail of earlier frames
    fn fade(&mut self, alpha: f32) {
        let (w, h) = (self.width(), self.height());
        self.fill_rect(0.0, 0.0, w, h, Rgb::BLACK, alpha);
    }

    /// Stroke with a soft halo of `glow_radius` around the line
    fn stroke_glowing_polyline(
        &mut self,
        points: &[(f32, f32)],
        color: Rgb,
        width: f32,
        glow_radius: f32,
    ) {
        for (spread, alpha) in [(1.0, 0.06), (0.6, 0.1), (0.3, 0.18)] {
            self.stroke_polyline(points, color, alpha, width + glow_radius * spread);
        }
        self.stroke_polyline(points, color, 1.0, width);
    }
}

/// tiny-skia backed canvas, opaque black when created
#[derive(Clone)]
pub struct PixmapCanvas {
    pixmap: Pixmap,
}

impl PixmapCanvas {
    /// `None` when the size is zero or too large to allocate
    pub fn new(width: u32, height: u32) -> Option<Self> {
        let mut pixmap = Pixmap::new(width, height)?;
        pixmap.fill(Color::BLACK);
        Some(Self { pixmap })
    }

    pub fn pixel_width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn pixel_height(&self) -> u32 {
        self.pixmap.height()
    }

    /// RGBA8 rows, premultiplied (identical to straight alpha while opaque)
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// RGBA of a single pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some([p.red(), p.green(), p.blue(), p.alpha()])
    }

    pub fn clear(&mut self) {
        self.pixmap.fill(Color::BLACK);
    }

    fn solid(color: Rgb, alpha: f32) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, alpha_u8(alpha));
        paint.anti_alias = true;
        paint
    }

    fn shaded(shader: Shader<'static>) -> Paint<'static> {
        Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        }
    }
}

fn alpha_u8(alpha: f32) -> u8 {
    (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn with_alpha(color: Rgb, alpha: f32) -> Color {
    Color::from_rgba8(color.r, color.g, color.b, alpha_u8(alpha))
}

impl Canvas for PixmapCanvas {
    fn width(&self) -> f32 {
        self.pixmap.width() as f32
    }

    fn height(&self) -> f32 {
        self.pixmap.height() as f32
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let Some(rect) = Rect::from_xywh(x, y, w, h) else {
            return;
        };
        let paint = Self::solid(color, alpha);
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    fn stroke_polyline(&mut self, points: &[(f32, f32)], color: Rgb, alpha: f32, width: f32) {
        let mut builder = PathBuilder::new();
        for (i, &(x, y)) in points.iter().enumerate() {
            if i == 0 {
                builder.move_to(x, y);
            } else {
                builder.line_to(x, y);
            }
        }
        let Some(path) = builder.finish() else {
            return;
        };

        let stroke = Stroke {
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        let paint = Self::solid(color, alpha);
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn fill_radial_particle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb) {
        let center = Point::from_xy(cx, cy);
        let Some(shader) = RadialGradient::new(
            center,
            center,
            radius,
            vec![
                GradientStop::new(0.0, with_alpha(color, 1.0)),
                GradientStop::new(1.0, with_alpha(color, 0.0)),
            ],
            SpreadMode::Pad,
            Transform::identity(),
        ) else {
            return;
        };
        let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
            return;
        };
        self.pixmap.fill_path(
            &path,
            &Self::shaded(shader),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    fn fill_edge_gradient(&mut self, from_x: f32, to_x: f32, color: Rgb, alpha: f32) {
        if from_x == to_x {
            return;
        }
        let Some(shader) = LinearGradient::new(
            Point::from_xy(from_x, 0.0),
            Point::from_xy(to_x, 0.0),
            vec![
                GradientStop::new(0.0, with_alpha(color, alpha)),
                GradientStop::new(1.0, with_alpha(color, 0.0)),
            ],
            SpreadMode::Pad,
            Transform::identity(),
        ) else {
            return;
        };
        let left = from_x.min(to_x);
        let Some(rect) = Rect::from_xywh(left, 0.0, (to_x - from_x).abs(), self.height()) else {
            return;
        };
        self.pixmap
            .fill_rect(rect, &Self::shaded(shader), Transform::identity(), None);
    }
}
