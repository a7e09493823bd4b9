//! Animus - real-time audio-reactive visualizer
//!
//! Listens to a capture device (or a WAV file) and renders one of three
//! modes that react to the spectrum and level of the incoming audio.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use animus::audio::{open_device, AudioInputAdapter, FrameSource, WavSource};
use animus::cli::Args;
use animus::controls::{key_action, KeyAction};
use animus::engine::{Command, Engine};
use animus::error::AudioError;
use animus::params::{RenderConfig, VisualizerConfig};
use animus::recording;
use animus::render::RenderSystem;

const WINDOW_TITLE: &str = "Animus";

/// Main application state
struct App {
    engine: Engine,
    render_config: RenderConfig,

    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    last_frame: Instant,
    last_cursor: Option<PhysicalPosition<f64>>,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(engine: Engine, render_config: RenderConfig) -> Self {
        Self {
            engine,
            render_config,
            window: None,
            render_system: None,
            last_frame: Instant::now(),
            last_cursor: None,
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{:#}", err);
        self.failure = Some(err);
        event_loop.exit();
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("creating window")?,
        );

        let canvas_size = (self.render_config.canvas_width, self.render_config.canvas_height);
        let render_system = pollster::block_on(RenderSystem::new(Arc::clone(&window), canvas_size))
            .context("initializing renderer")?;

        info!("Animus is running: 1/2/3 or Tab switch modes, F/R/T/M/P camera, H/E/V/X/B/I effects, Up/Down sensitivity, Esc quits");

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.last_frame = Instant::now();
        Ok(())
    }

    /// Tick the engine and present the result
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        let canvas = self.engine.tick(dt);

        if let Some(render_system) = self.render_system.as_mut() {
            match render_system.present(canvas) {
                Ok(()) => {}
                Err(err) if err.is_recoverable() => debug!("Frame skipped: {}", err),
                Err(err) => {
                    self.fail(event_loop, err.into());
                    return;
                }
            }
        }

        if let Some(message) = self.engine.take_warning() {
            if let Some(window) = &self.window {
                window.set_title(&format!("{} - {}", WINDOW_TITLE, message));
            }
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }
        if let Err(err) = self.init_window(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => match key_action(code) {
                Some(KeyAction::Quit) => event_loop.exit(),
                Some(KeyAction::Command(command)) => self.engine.apply(command),
                None => {}
            },
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(last) = self.last_cursor {
                    self.engine.apply(Command::PointerDelta {
                        dx: (position.x - last.x) as f32,
                        dy: (position.y - last.y) as f32,
                    });
                }
                self.last_cursor = Some(position);
            }
            WindowEvent::CursorLeft { .. } => self.last_cursor = None,
            WindowEvent::Resized(size) => {
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

/// Open the requested audio source, falling back to silence when it is unavailable
fn open_input(args: &Args, config: &VisualizerConfig) -> AudioInputAdapter {
    let frame_size = config.fft.fft_size;
    let stall_timeout = config.input.stall_timeout();

    let source: Result<Box<dyn FrameSource>, AudioError> = match &args.wav {
        Some(path) => WavSource::open(path, frame_size, stall_timeout)
            .map(|source| Box::new(source) as Box<dyn FrameSource>),
        None => open_device(&args.device_selector(), frame_size, stall_timeout)
            .map(|source| Box::new(source) as Box<dyn FrameSource>),
    };

    match source {
        Ok(source) => AudioInputAdapter::start(source, frame_size, config.input.grace_period()),
        Err(err) => AudioInputAdapter::unavailable(err, frame_size, config.fft.sample_rate_hz),
    }
}

/// Apply startup choices from the command line; bad values are logged and skipped
fn apply_startup_args(args: &Args, engine: &mut Engine) {
    match args.initial_mode() {
        Ok(Some(mode)) => engine.switch_mode(mode),
        Ok(None) => {}
        Err(err) => warn!("{}; starting in {}", err, engine.mode_kind()),
    }

    match args.initial_camera() {
        Ok(Some(view)) => engine.set_camera_state(view),
        Ok(None) => {}
        Err(err) => warn!("{}; using front camera", err),
    }

    match args.initial_effects() {
        Ok(effects) => {
            for kind in effects {
                engine.set_effect(kind, true);
            }
        }
        Err(err) => warn!("{}; starting with no effects", err),
    }

    if let Some(gain) = args.sensitivity {
        engine.set_sensitivity(gain);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.list_devices {
        let devices = animus::audio::list_input_devices().context("listing input devices")?;
        if devices.is_empty() {
            println!("No input devices found");
        }
        for (index, name) in devices.iter().enumerate() {
            println!("{:>3}: {}", index, name);
        }
        return Ok(());
    }

    let config = args.load_config().context("loading configuration")?;
    let adapter = open_input(&args, &config);
    let mut engine = Engine::new(&config, adapter);
    apply_startup_args(&args, &mut engine);

    if let Some(recording) = args.recording_config() {
        let summary = recording::record(&mut engine, &recording).context("recording")?;
        info!(
            "Wrote {} frames to {}",
            summary.frames,
            summary.output_dir.display()
        );
        return Ok(());
    }

    let event_loop = EventLoop::new().context("creating event loop")?;
    let mut app = App::new(engine, config.render.clone());
    event_loop.run_app(&mut app).context("running event loop")?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
