//! wavepulse - audio-reactive waveform visualizer
//!
//! Drop an audio file on the window, press Enter to analyze it and Space to
//! play. The waveform breathes with the music and splits apart on bass hits.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use wavepulse::audio::DeviceSession;
use wavepulse::cli::Args;
use wavepulse::params::{FftConfig, RenderConfig, VisualParams};
use wavepulse::recording::{record, RecordingJob};
use wavepulse::rendering::{window_to_canvas, RenderSystem};
use wavepulse::visual::{Canvas, ColorScheme, PixmapCanvas, ProgressSlider};
use wavepulse::visualizer::Visualizer;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    /// Persistent canvas (trails fade across frames)
    canvas: Option<PixmapCanvas>,
    slider: ProgressSlider,

    visualizer: Visualizer<DeviceSession>,

    // Configuration
    render_config: RenderConfig,
    initial_file: Option<PathBuf>,

    // Input and time tracking
    cursor: Option<(f64, f64)>,
    start_time: Instant,
    title: String,
}

impl App {
    fn new(
        render_config: RenderConfig,
        initial_file: Option<PathBuf>,
        scheme: Option<ColorScheme>,
        seed: Option<u64>,
    ) -> Self {
        let fft_config = FftConfig::default();
        let mut visualizer = Visualizer::new(
            VisualParams::default(),
            Box::new(move || DeviceSession::open(fft_config.clone())),
        );
        if let Some(seed) = seed {
            visualizer = visualizer.with_seed(seed);
        }
        if let Some(scheme) = scheme {
            visualizer = visualizer.with_scheme(scheme);
        }

        Self {
            window: None,
            render_system: None,
            canvas: None,
            slider: ProgressSlider::new(render_config.slider_height),
            visualizer,
            render_config,
            initial_file,
            cursor: None,
            start_time: Instant::now(),
            title: String::new(),
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn clear_canvas(&mut self) {
        if let Some(canvas) = &mut self.canvas {
            canvas.clear();
        }
    }

    fn select(&mut self, path: &std::path::Path) {
        if self.visualizer.select_file(path) {
            self.clear_canvas();
        }
    }

    fn analyze(&mut self) {
        // Already logged by the visualizer; the title shows it
        if let Err(e) = self.visualizer.analyze() {
            log::debug!("Analyze request failed: {}", e);
        }
    }

    fn handle_key(&mut self, code: KeyCode, repeat: bool, event_loop: &ActiveEventLoop) {
        let step = self.render_config.seek_step_s;
        match code {
            KeyCode::Escape => {
                self.visualizer.teardown();
                event_loop.exit();
            }
            KeyCode::Space if !repeat => {
                if let Err(e) = self.visualizer.toggle_play_pause() {
                    log::error!("Playback failed: {}", e);
                }
            }
            KeyCode::Enter | KeyCode::NumpadEnter if !repeat => self.analyze(),
            KeyCode::ArrowLeft => self.visualizer.seek_by(-step),
            KeyCode::ArrowRight => self.visualizer.seek_by(step),
            KeyCode::Backspace if !repeat => {
                self.visualizer.clear_file();
                self.clear_canvas();
            }
            _ => return,
        }
        self.request_redraw();
    }

    fn handle_click(&mut self) {
        let (Some(cursor), Some(render_system)) = (self.cursor, &self.render_system) else {
            return;
        };
        let canvas_size = render_system.canvas_size();
        let Some((x, y)) = window_to_canvas(cursor, canvas_size, render_system.surface_size())
        else {
            return;
        };
        if let Some(target) = self.slider.seek_target(
            x,
            y,
            canvas_size.0 as f32,
            canvas_size.1 as f32,
            self.visualizer.duration_s(),
        ) {
            self.visualizer.seek(target);
            self.request_redraw();
        }
    }

    fn update_title(&mut self) {
        let status = self.visualizer.status_line();
        if status != self.title {
            if let Some(window) = &self.window {
                window.set_title(&status);
            }
            self.title = status;
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Only keep redrawing while the visualizer has a frame scheduled
        if self.visualizer.scheduler().is_pending() {
            self.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("wavepulse")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let canvas_size = (
            self.render_config.canvas_width,
            self.render_config.canvas_height,
        );
        let render_system =
            match pollster::block_on(RenderSystem::new(Arc::clone(&window), canvas_size)) {
                Ok(render_system) => render_system,
                Err(e) => {
                    log::error!("{}", e);
                    event_loop.exit();
                    return;
                }
            };

        self.canvas = PixmapCanvas::new(canvas_size.0, canvas_size.1);
        if self.canvas.is_none() {
            log::error!("Failed to allocate {}x{} canvas", canvas_size.0, canvas_size.1);
        }
        self.window = Some(window);
        self.render_system = Some(render_system);

        if let Some(path) = self.initial_file.take() {
            self.select(&path);
            self.analyze();
        }

        println!("\nwavepulse is running!");
        println!("Drop an audio file, Enter to analyze, Space to play, Esc to quit\n");

        self.update_title();
        self.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.visualizer.teardown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
                self.request_redraw();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat,
                        ..
                    },
                ..
            } => self.handle_key(code, repeat, event_loop),
            WindowEvent::DroppedFile(path) => {
                self.select(&path);
                self.request_redraw();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some((position.x, position.y));
            }
            WindowEvent::CursorLeft { .. } => self.cursor = None,
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.handle_click(),
            WindowEvent::RedrawRequested => {
                self.render_frame();
                self.update_title();
            }
            _ => {}
        }
    }
}

impl App {
    /// Run the scheduled visualizer tick (if any) and present the canvas
    fn render_frame(&mut self) {
        let clock_s = self.start_time.elapsed().as_secs_f64();
        self.visualizer
            .frame(self.canvas.as_mut().map(|c| c as &mut dyn Canvas), clock_s);

        let (Some(render_system), Some(canvas)) = (&self.render_system, &self.canvas) else {
            return;
        };

        // Slider goes on a copy so it never leaves trails
        let mut composed = canvas.clone();
        if self.visualizer.is_analyzed() {
            self.slider.draw(
                &mut composed,
                self.visualizer.current_time_s(),
                self.visualizer.duration_s(),
                &self.visualizer.scheme(),
            );
        }
        render_system.upload(&composed);

        match render_system.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure();
            }
            Err(e) => log::error!("Render error: {:?}", e),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let scheme = match args.color_scheme() {
        Ok(scheme) => scheme,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(2);
        }
    };

    let render_config = RenderConfig::default();
    if let Err(e) = render_config.validate() {
        log::error!("{}", e);
        std::process::exit(2);
    }

    // Recording mode: headless, no window
    if let (Some(recording), Some(input)) = (args.recording_config(), args.file.clone()) {
        let job = RecordingJob {
            input,
            recording,
            render: render_config,
            visual: VisualParams::default(),
            fft: FftConfig::default(),
            scheme,
            seed: args.seed,
        };
        match record(&job) {
            Ok(summary) => {
                println!(
                    "Recorded {} frames ({}) to {}",
                    summary.frames,
                    summary.scheme.name,
                    job.recording.output_dir.display()
                );
            }
            Err(e) => {
                log::error!("Recording failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let mut app = App::new(render_config, args.file, scheme, args.seed);
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
    }
}
