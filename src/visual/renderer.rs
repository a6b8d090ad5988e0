//! Audio-reactive waveform renderer.
//!
//! Each call to [`FrameRenderer::render`] turns one frequency snapshot into
//! one frame: a breathing upper trace with fading echoes, a mirrored lower
//! trace and particles on bass hits, and edge glow tracking overall energy.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::canvas::Canvas;
use super::color::{ColorScheme, Rgb};
use super::features::{breathe_offset, wave_points, FrameFeatures};
use super::history::BoundedHistory;
use crate::params::VisualParams;

/// Alpha of the horizontal reference line
const CENTER_LINE_ALPHA: f32 = 0.1;

/// Frame renderer with rolling trail and bass histories
pub struct FrameRenderer {
    params: VisualParams,
    scheme: ColorScheme,
    wave_history: BoundedHistory<Vec<f32>>,
    bass_history: BoundedHistory<f32>,
    rng: StdRng,
}

impl FrameRenderer {
    pub fn new(params: VisualParams, scheme: ColorScheme) -> Self {
        Self::with_rng(params, scheme, StdRng::from_entropy())
    }

    /// Deterministic particle placement
    pub fn with_seed(params: VisualParams, scheme: ColorScheme, seed: u64) -> Self {
        Self::with_rng(params, scheme, StdRng::seed_from_u64(seed))
    }

    fn with_rng(params: VisualParams, scheme: ColorScheme, rng: StdRng) -> Self {
        Self {
            wave_history: BoundedHistory::new(params.wave_history_len),
            bass_history: BoundedHistory::new(params.bass_history_len),
            params,
            scheme,
            rng,
        }
    }

    pub fn scheme(&self) -> ColorScheme {
        self.scheme
    }

    pub fn set_scheme(&mut self, scheme: ColorScheme) {
        self.scheme = scheme;
    }

    pub fn params(&self) -> &VisualParams {
        &self.params
    }

    pub fn wave_history(&self) -> &BoundedHistory<Vec<f32>> {
        &self.wave_history
    }

    pub fn bass_history(&self) -> &BoundedHistory<f32> {
        &self.bass_history
    }

    /// Forget trails and the bass average (new file)
    pub fn reset(&mut self) {
        self.wave_history.clear();
        self.bass_history.clear();
    }

    /// Render one frame and update the histories.
    ///
    /// Without a drawing surface nothing happens and `None` is returned.
    pub fn render(
        &mut self,
        snapshot: &[u8],
        clock_s: f64,
        canvas: Option<&mut dyn Canvas>,
    ) -> Option<FrameFeatures> {
        let canvas = canvas?;
        let params = &self.params;
        let width = canvas.width();
        let center_y = canvas.height() / 2.0;
        let spacing = width / params.wave_points as f32;

        canvas.fade(params.fade_alpha);

        let features = FrameFeatures::derive(snapshot, &mut self.bass_history, params);
        let points = wave_points(snapshot, params);
        self.wave_history.push(points);

        let breathe: Vec<f32> = (0..params.wave_points)
            .map(|i| breathe_offset(i, clock_s, features.breathe_amplitude, params))
            .collect();

        // Echoes, older ones fainter and further down
        let echoes = self.wave_history.len();
        for (k, wave) in self.wave_history.iter().enumerate() {
            let opacity = (k + 1) as f32 / echoes as f32 * params.trail_max_opacity;
            let trail_offset = (echoes - k - 1) as f32 * params.trail_step_px;
            let line: Vec<(f32, f32)> = wave
                .iter()
                .enumerate()
                .map(|(i, &a)| (i as f32 * spacing, center_y + breathe[i] - a + trail_offset))
                .collect();
            canvas.stroke_polyline(&line, self.scheme.primary, opacity, params.trail_width_px);
        }

        let current = self.wave_history.latest().map(Vec::as_slice).unwrap_or(&[]);

        let upper: Vec<(f32, f32)> = current
            .iter()
            .enumerate()
            .map(|(i, &a)| {
                (
                    i as f32 * spacing,
                    center_y - a + breathe[i] - features.split_amount,
                )
            })
            .collect();
        canvas.stroke_glowing_polyline(
            &upper,
            self.scheme.primary,
            params.trace_width_px,
            params.glow_radius_px,
        );

        if features.draws_mirror(params) {
            let lower: Vec<(f32, f32)> = current
                .iter()
                .enumerate()
                .map(|(i, &a)| {
                    (
                        i as f32 * spacing,
                        center_y + a - breathe[i] + features.split_amount,
                    )
                })
                .collect();
            canvas.stroke_glowing_polyline(
                &lower,
                self.scheme.secondary,
                params.trace_width_px,
                params.glow_radius_px,
            );
        }

        canvas.stroke_polyline(
            &[(0.0, center_y), (width, center_y)],
            Rgb::WHITE,
            CENTER_LINE_ALPHA,
            1.0,
        );

        for _ in 0..features.particle_count(params) {
            let x = self.rng.gen::<f32>() * width;
            let y = center_y + (self.rng.gen::<f32>() - 0.5) * features.split_amount * 2.0;
            let size = self.rng.gen::<f32>() * 3.0 + 1.0;
            canvas.fill_radial_particle(x, y, size * 3.0, self.scheme.secondary);
        }

        let glow_width = width * params.edge_glow_width;
        canvas.fill_edge_gradient(
            0.0,
            glow_width,
            self.scheme.primary,
            features.edge_glow_alpha,
        );
        canvas.fill_edge_gradient(
            width,
            width - glow_width,
            self.scheme.secondary,
            features.edge_glow_alpha,
        );

        Some(features)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::visual::canvas::PixmapCanvas;

    /// Canvas that only records what was drawn
    #[derive(Debug, Default)]
    pub(crate) struct RecordingCanvas {
        pub ops: Vec<DrawOp>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum DrawOp {
        Rect { alpha: f32 },
        Line {
            color: Rgb,
            alpha: f32,
            width: f32,
            points: Vec<(f32, f32)>,
        },
        Particle { x: f32, y: f32, radius: f32 },
        Edge { from_x: f32, to_x: f32, alpha: f32 },
    }

    impl RecordingCanvas {
        pub fn particles(&self) -> Vec<(f32, f32, f32)> {
            self.ops
                .iter()
                .filter_map(|op| match *op {
                    DrawOp::Particle { x, y, radius } => Some((x, y, radius)),
                    _ => None,
                })
                .collect()
        }

        /// Fully opaque 3px strokes (the main traces, not glow or echoes)
        pub fn solid_lines(&self, color: Rgb) -> Vec<&[(f32, f32)]> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Line {
                        color: c,
                        alpha,
                        width,
                        points,
                    } if *c == color && *alpha == 1.0 && *width == 3.0 => Some(points.as_slice()),
                    _ => None,
                })
                .collect()
        }

        /// Points of the 2px echo strokes, oldest first
        pub fn echo_lines(&self) -> Vec<&[(f32, f32)]> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Line { width, points, .. } if *width == 2.0 => Some(points.as_slice()),
                    _ => None,
                })
                .collect()
        }

        /// Opacities of the 2px echo strokes, in drawing order
        pub fn echo_alphas(&self) -> Vec<f32> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Line { alpha, width, .. } if *width == 2.0 => Some(*alpha),
                    _ => None,
                })
                .collect()
        }
    }

    impl Canvas for RecordingCanvas {
        fn width(&self) -> f32 {
            1400.0
        }

        fn height(&self) -> f32 {
            600.0
        }

        fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _color: Rgb, alpha: f32) {
            self.ops.push(DrawOp::Rect { alpha });
        }

        fn stroke_polyline(&mut self, points: &[(f32, f32)], color: Rgb, alpha: f32, width: f32) {
            self.ops.push(DrawOp::Line {
                color,
                alpha,
                width,
                points: points.to_vec(),
            });
        }

        fn fill_radial_particle(&mut self, x: f32, y: f32, radius: f32, _color: Rgb) {
            self.ops.push(DrawOp::Particle { x, y, radius });
        }

        fn fill_edge_gradient(&mut self, from_x: f32, to_x: f32, _color: Rgb, alpha: f32) {
            self.ops.push(DrawOp::Edge {
                from_x,
                to_x,
                alpha,
            });
        }
    }

    fn renderer() -> FrameRenderer {
        FrameRenderer::with_seed(VisualParams::default(), ColorScheme::default(), 1)
    }

    fn snapshot(bass: u8, rest: u8) -> Vec<u8> {
        let mut snapshot = vec![rest; 1024];
        snapshot[..8].fill(bass);
        snapshot
    }

    #[test]
    fn test_missing_surface_is_noop() {
        let mut renderer = renderer();
        assert!(renderer.render(&snapshot(255, 255), 0.0, None).is_none());
        assert!(renderer.wave_history().is_empty());
        assert!(renderer.bass_history().is_empty());
    }

    #[test]
    fn test_histories_stay_bounded() {
        let mut renderer = renderer();
        let mut canvas = RecordingCanvas::default();
        for frame in 0..200u32 {
            let level = (frame % 256) as u8;
            renderer.render(&snapshot(level, level), frame as f64 / 60.0, Some(&mut canvas));
            assert!(renderer.wave_history().len() <= 8);
            assert!(renderer.bass_history().len() <= 60);
        }
        assert_eq!(renderer.wave_history().len(), 8);
        assert_eq!(renderer.bass_history().len(), 60);

        // Oldest evicted first: the newest bass sample is from frame 199
        let newest = *renderer.bass_history().latest().unwrap();
        assert!((newest - 199.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_quiet_frame_has_no_split_or_particles() {
        let mut renderer = renderer();
        let mut canvas = RecordingCanvas::default();
        let features = renderer
            .render(&snapshot(40, 40), 0.0, Some(&mut canvas))
            .unwrap();

        assert_eq!(canvas.ops[0], DrawOp::Rect { alpha: 0.08 });
        assert!(!features.is_hit);
        assert_eq!(features.split_amount, 0.0);
        assert!(canvas.particles().is_empty());
        assert!(canvas.solid_lines(ColorScheme::default().secondary).is_empty());
        // Upper trace has one point per sample
        assert_eq!(canvas.solid_lines(ColorScheme::default().primary)[0].len(), 180);
    }

    #[test]
    fn test_bass_hit_splits_and_emits_particles() {
        let mut renderer = renderer();
        let mut canvas = RecordingCanvas::default();
        let scheme = ColorScheme::default();
        let features = renderer
            .render(&snapshot(255, 0), 0.0, Some(&mut canvas))
            .unwrap();

        assert!(features.is_hit);
        assert_eq!(features.split_amount, 120.0);

        let particles = canvas.particles();
        assert_eq!(particles.len(), 20);
        for (x, y, radius) in particles {
            assert!((0.0..=1400.0).contains(&x));
            assert!((300.0 - 120.0..=300.0 + 120.0).contains(&y));
            assert!((3.0..=12.0).contains(&radius));
        }

        // Mirrored trace sits below center by the same split
        let upper = canvas.solid_lines(scheme.primary)[0];
        let lower = canvas.solid_lines(scheme.secondary)[0];
        let upper_y = upper[100].1;
        let lower_y = lower[100].1;
        assert!(((upper_y + lower_y) / 2.0 - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_trail_opacity_increases_with_recency() {
        let mut renderer = renderer();
        let mut canvas = RecordingCanvas::default();
        for _ in 0..3 {
            canvas.ops.clear();
            renderer.render(&snapshot(10, 10), 0.0, Some(&mut canvas));
        }

        let alphas = canvas.echo_alphas();
        assert_eq!(alphas.len(), 3);
        for (alpha, expected) in alphas.iter().zip([0.1, 0.2, 0.3]) {
            assert!((alpha - expected).abs() < 1e-5, "{alphas:?}");
        }
    }

    #[test]
    fn test_trails_step_down_and_breathe_with_main_trace() {
        let mut renderer = renderer();
        let mut canvas = RecordingCanvas::default();
        let params = VisualParams::default();
        let clock_s = 1.3;
        let mut features = None;
        for _ in 0..4 {
            canvas.ops.clear();
            features = renderer.render(&snapshot(10, 10), clock_s, Some(&mut canvas));
        }
        let features = features.unwrap();

        let i = 40;
        let amplitude = 10.0 / 255.0 * 150.0;
        let breathe = breathe_offset(i, clock_s, features.breathe_amplitude, &params);
        assert!(breathe.abs() > 1.0, "breathing should move point {i}: {breathe}");

        // Every echo holds the same wave, so only the step offset separates them
        let echoes = canvas.echo_lines();
        let n = echoes.len();
        assert_eq!(n, 4);
        let newest_y = echoes[n - 1][i].1;
        assert!((newest_y - (300.0 + breathe - amplitude)).abs() < 1e-3);
        for (k, echo) in echoes.iter().enumerate() {
            let expected = (n - k - 1) as f32 * 2.0;
            assert!(
                (echo[i].1 - newest_y - expected).abs() < 1e-3,
                "echo {k} offset {}",
                echo[i].1 - newest_y
            );
        }

        let upper = canvas.solid_lines(ColorScheme::default().primary)[0];
        assert!((upper[i].1 - (300.0 - amplitude + breathe)).abs() < 1e-3);
    }

    #[test]
    fn test_edge_glow_follows_spectrum() {
        let mut renderer = renderer();
        let mut canvas = RecordingCanvas::default();
        renderer.render(&snapshot(255, 255), 0.0, Some(&mut canvas));

        let edges: Vec<(f32, f32, f32)> = canvas
            .ops
            .iter()
            .filter_map(|op| match *op {
                DrawOp::Edge {
                    from_x,
                    to_x,
                    alpha,
                } => Some((from_x, to_x, alpha)),
                _ => None,
            })
            .collect();
        assert_eq!(edges.len(), 2);
        let close = |a: f32, b: f32| (a - b).abs() < 1e-3;
        assert!(close(edges[0].0, 0.0) && close(edges[0].1, 420.0) && close(edges[0].2, 0.3));
        assert!(close(edges[1].0, 1400.0) && close(edges[1].1, 980.0) && close(edges[1].2, 0.3));
    }

    #[test]
    fn test_renders_into_pixmap() {
        let mut renderer = renderer();
        let mut canvas = PixmapCanvas::new(1400, 600).unwrap();
        renderer.render(&snapshot(200, 120), 0.5, Some(&mut canvas));
        assert!(canvas.data().chunks(4).any(|p| p[0] > 0));
    }
}
