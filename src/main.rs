// Walkable gallery host: winit window, per-frame engine tick, wgpu scene and
// egui HUD. The engine core lives in the library crate; this binary only owns
// the window, the GPU resources and the event plumbing between them.

mod renderer;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::channel;
use std::time::Instant;

use log::{debug, error, info, warn};
use thiserror::Error;
use winit::{
    error::{EventLoopError, OsError},
    event::{ElementState, Event as WinitEvent, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use gallery_walk::engine::hud::{DebugStats, UiSignal};
use gallery_walk::engine::input::releases_input;
use gallery_walk::engine::{
    ConfigError, Engine, EngineConfig, EngineError, LevelDescriptor, LevelError,
};
use renderer::{Renderer, RendererError};

const TUNING_ENV_VAR: &str = "GALLERY_TUNING";

#[derive(Debug, Error)]
enum HostError {
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    Renderer(#[from] RendererError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

fn read_text(path: &Path) -> Result<String, HostError> {
    std::fs::read_to_string(path).map_err(|source| HostError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

/// First CLI argument names a level file; otherwise the built-in hall.
fn load_level() -> Result<LevelDescriptor, HostError> {
    match std::env::args_os().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            info!("loading level from {}", path.display());
            Ok(LevelDescriptor::from_ron(&read_text(&path)?)?)
        }
        None => Ok(LevelDescriptor::showcase()),
    }
}

fn load_config() -> Result<EngineConfig, HostError> {
    match std::env::var_os(TUNING_ENV_VAR) {
        Some(path) => {
            let path = PathBuf::from(path);
            info!("loading tuning from {}", path.display());
            Ok(EngineConfig::from_ron(&read_text(&path)?)?)
        }
        None => Ok(EngineConfig::default()),
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), HostError> {
    let config = load_config()?;
    let level = load_level()?;
    let close_delay = config.close_delay;

    let event_loop = EventLoop::new().map_err(HostError::CreateEventLoop)?;

    let window_attributes = Window::default_attributes()
        .with_title("Gallery Walk")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

    #[allow(deprecated)]
    let window = Arc::new(
        event_loop
            .create_window(window_attributes)
            .map_err(HostError::CreateWindow)?,
    );

    let mut renderer = pollster::block_on(Renderer::new(window.clone(), &level))?;

    let mut engine = Engine::new(config, level)?;
    let (events_tx, events_rx) = channel();
    engine.subscribe(Box::new(events_tx));
    engine.start();

    let mut last_tick = Instant::now();
    let mut frame_count = 0;
    let mut frame_time_sum = 0.0_f32;
    let mut last_fps_update = Instant::now();
    let mut stats = DebugStats {
        fps: 0,
        frame_time_avg_ms: 0.0,
        instance_count: 0,
        draw_calls: 1,
        resolution: (renderer.size.width, renderer.size.height),
    };

    #[allow(deprecated)]
    event_loop
        .run(move |event, control_flow| match event {
            WinitEvent::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => {
                let hud_response = renderer.hud.handle_window_event(&window, event);

                match event {
                    WindowEvent::CloseRequested => {
                        engine.stop();
                        control_flow.exit();
                    }
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                state: ElementState::Pressed,
                                physical_key: PhysicalKey::Code(KeyCode::F3),
                                repeat: false,
                                ..
                            },
                        ..
                    } => renderer.hud.toggle_stats(),
                    WindowEvent::Resized(physical_size) => {
                        renderer.resize(*physical_size);
                        stats.resolution = (physical_size.width, physical_size.height);
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        let dt = (now - last_tick).as_secs_f32();
                        last_tick = now;

                        // A stopped engine means teardown already began.
                        let Some(frame) = engine.tick(dt) else {
                            control_flow.exit();
                            return;
                        };

                        for event in events_rx.try_iter() {
                            renderer.hud.model.apply(&event);
                        }

                        let effects = engine.effect_instances();
                        let view_proj = engine.camera().view_projection(renderer.aspect());
                        let shown_stats = renderer.hud.show_stats.then_some(&stats);

                        match renderer.render(view_proj, frame.character, &effects, close_delay, shown_stats) {
                            Ok(hud) => {
                                for signal in hud.signals {
                                    match signal {
                                        UiSignal::Confirm => engine.confirm(),
                                        UiSignal::Close => engine.close(),
                                    };
                                }
                                for (action, pressed) in hud.touch {
                                    engine.set_action(action, pressed);
                                }
                            }
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                warn!("surface lost, reconfiguring");
                                renderer.resize(renderer.size);
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                error!("out of GPU memory");
                                engine.stop();
                                control_flow.exit();
                            }
                            Err(e) => warn!("{:?}", e),
                        }

                        frame_count += 1;
                        frame_time_sum += dt;
                        if (now - last_fps_update).as_secs_f32() >= 1.0 {
                            stats.fps = frame_count;
                            stats.frame_time_avg_ms = frame_time_sum * 1000.0 / frame_count.max(1) as f32;
                            stats.instance_count = renderer.last_instance_count;
                            debug!(
                                "FPS: {} | Instances: {} | ({:.1}, {:.1})",
                                frame_count, stats.instance_count, frame.telemetry.x, frame.telemetry.z
                            );
                            frame_count = 0;
                            frame_time_sum = 0.0;
                            last_fps_update = now;
                        }
                    }
                    _ if !hud_response.consumed || releases_input(event) => {
                        engine.handle_window_event(event);
                    }
                    _ => {}
                }
            }
            WinitEvent::AboutToWait => {
                window.request_redraw();
            }
            WinitEvent::LoopExiting => {
                engine.stop();
            }
            _ => {}
        })
        .map_err(HostError::EventLoopRun)
}
