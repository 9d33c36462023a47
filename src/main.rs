mod core;
mod input;
mod playback;
mod settings;
mod ui;

use crate::core::{Dataset, HudCounters, JourneyInformation};
use crate::input::{load_file, LoadedTelemetry};
use crate::playback::{PlaybackSession, PlaybackState, TerminalIndex, DEFAULT_INTERVAL_MS};
use crate::settings::AppSettings;
use crate::ui::{FileDialogs, Hud, SummaryDialog, TripPanel};
use imgui::{Context, FontConfig, FontSource};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

use glutin::prelude::*;
use glutin::display::GetGlDisplay;
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasRawWindowHandle;
use glow::HasContext;

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Result of a background dataset load
enum LoadingUpdate {
    Complete(LoadedTelemetry),
    Error(String),
}

struct AppState {
    session: PlaybackSession,
    trip_panel: TripPanel,
    settings: AppSettings,
    /// Owned by the shell; the driver mirrors it
    playing: bool,
    journey: JourneyInformation,
    counters: HudCounters,
    file_name: Option<String>,
    status_message: Option<String>,
    show_file_open_pending: bool,
    loading: bool,
    loading_receiver: Option<Receiver<LoadingUpdate>>,
    /// Interval slider value, applied on release
    interval_edit: i32,
}

impl AppState {
    fn new(runtime: Handle) -> Self {
        let settings = AppSettings::load();
        let session = PlaybackSession::new(runtime, Dataset::NotLoaded, settings.playback);

        let mut trip_panel = TripPanel::new(session.driver().subscribe());
        trip_panel.configure(
            settings.temperature_gauge.clone(),
            settings.speed_gauge.clone(),
            settings.pressure_gauge.clone(),
            settings.position_plot,
        );

        let interval_edit = settings.playback.interval_ms.unwrap_or(DEFAULT_INTERVAL_MS) as i32;

        Self {
            session,
            trip_panel,
            settings,
            playing: false,
            journey: JourneyInformation::default(),
            counters: HudCounters::default(),
            file_name: None,
            status_message: None,
            show_file_open_pending: false,
            loading: false,
            loading_receiver: None,
            interval_edit,
        }
    }

    fn save_settings(&mut self) {
        self.settings.playback.interval_ms = self.session.interval().map(|d| d.as_millis() as u64);
        self.settings.save();
    }

    fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
        self.session.driver_mut().set_playing(playing);
    }

    fn set_interval(&mut self, interval_ms: Option<u64>) {
        self.session.set_interval(interval_ms.map(Duration::from_millis));
        self.settings.playback.interval_ms = interval_ms;
        info!("Tick interval set to {:?} ms", interval_ms);
    }

    fn load_file(&mut self, path: &Path) {
        self.loading = true;
        self.status_message = Some(format!("Loading {}...", path.display()));

        let path = path.to_path_buf();
        let (tx, rx) = channel();
        self.loading_receiver = Some(rx);

        std::thread::spawn(move || {
            let update = match load_file(&path) {
                Ok(loaded) => LoadingUpdate::Complete(loaded),
                Err(e) => LoadingUpdate::Error(format!("{:#}", e)),
            };
            let _ = tx.send(update);
        });
    }

    /// Process loading updates from background thread
    fn process_loading(&mut self) {
        let update = match self.loading_receiver.as_ref().map(|rx| rx.try_recv()) {
            Some(Ok(update)) => update,
            _ => return,
        };

        self.loading_receiver = None;
        self.loading = false;

        match update {
            LoadingUpdate::Complete(loaded) => self.finish_loading(loaded),
            LoadingUpdate::Error(e) => {
                error!("Failed to load telemetry: {}", e);
                self.status_message = Some(format!("Failed to load file: {}", e));
            }
        }
    }

    fn finish_loading(&mut self, loaded: LoadedTelemetry) {
        let samples = loaded.series.len();
        if loaded.series.is_empty() {
            warn!("Recording contains no samples");
        }
        self.counters.read_count += loaded.records_read;
        self.journey = loaded.journey;
        self.session.driver_mut().set_dataset(Dataset::Loaded(loaded.series));

        self.status_message = Some(format!("Loaded {} samples", samples));
        info!("Loaded {} samples ({} records)", samples, loaded.records_read);
    }

    fn process_file_dialogs(&mut self) {
        if self.show_file_open_pending {
            self.show_file_open_pending = false;
            if let Some(path) = FileDialogs::open_telemetry_file() {
                self.file_name = path.file_name().map(|n| n.to_string_lossy().into_owned());
                self.load_file(&path);
            }
        }
    }

    /// Advance playback with every tick that arrived since the last frame
    fn update_playback(&mut self) {
        // The driver has already flagged the summary visible
        if self.session.pump().is_some() {
            self.set_playing(false);
        }
    }

    fn status_line(&self) -> String {
        let driver = self.session.driver();
        let state = match driver.state() {
            PlaybackState::Idle => "Idle",
            PlaybackState::Playing if !driver.dataset().is_loaded() => "Waiting for data",
            PlaybackState::Playing => "Playing",
            PlaybackState::Exhausted => "Finished",
        };
        let interval = match self.session.interval() {
            Some(d) => format!("{} ms", d.as_millis()),
            None => "paused".to_string(),
        };
        format!(
            "{} | {} | Samples: {} | Index: {} | Interval: {}",
            state,
            self.file_name.as_deref().unwrap_or("No file"),
            driver.dataset().len(),
            driver.cursor(),
            interval,
        )
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Create tokio runtime for the playback timer
    let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    // Create event loop
    let event_loop = EventLoop::new().expect("Failed to create EventLoop");

    // Build the window and GL display using glutin-winit
    let (window, gl_config) = DisplayBuilder::new()
        .with_window_builder(Some(
            WindowBuilder::new()
                .with_title("Telemetry Replay")
                .with_inner_size(winit::dpi::LogicalSize::new(1200.0, 900.0))
        ))
        .build(&event_loop, glutin::config::ConfigTemplateBuilder::new(), |mut iter| {
            iter.next().expect("No GL config available")
        })
        .expect("Failed to create window and display");

    let window = window.expect("Failed to create window");
    let gl_display = gl_config.display();

    let context = unsafe {
        gl_display.create_context(
            &gl_config,
            &glutin::context::ContextAttributesBuilder::new()
                .build(Some(window.raw_window_handle())),
        )
    }.expect("Failed to create GL context");

    let attrs = window.build_surface_attributes(
        glutin::surface::SurfaceAttributesBuilder::<glutin::surface::WindowSurface>::new()
    );

    let surface = unsafe {
        gl_display.create_window_surface(&gl_config, &attrs)
    }.expect("Failed to create surface");

    let context = context.make_current(&surface).expect("Failed to make context current");

    let load_gl = |ptr: &str| -> *const std::ffi::c_void {
        let name = std::ffi::CString::new(ptr).expect("GL symbol contains NUL");
        gl_display.get_proc_address(&name)
    };
    let gl = unsafe { glow::Context::from_loader_function(load_gl) };
    // Second context for clearing; both reference the same GL context
    let gl_clear = unsafe { glow::Context::from_loader_function(load_gl) };

    // Set up imgui
    let mut imgui = Context::create();
    imgui.set_log_filename(None::<PathBuf>);

    let ini_path = AppSettings::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("layout.ini");
    if let Some(parent) = ini_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    imgui.set_ini_filename(Some(ini_path));
    imgui.io_mut().config_flags |= imgui::ConfigFlags::DOCKING_ENABLE;

    let hidpi_factor = window.scale_factor();
    let font_size = (14.0 * hidpi_factor) as f32;
    imgui.fonts().add_font(&[FontSource::DefaultFontData {
        config: Some(FontConfig {
            size_pixels: font_size,
            ..FontConfig::default()
        }),
    }]);
    imgui.io_mut().font_global_scale = (1.0 / hidpi_factor) as f32;

    let mut platform = WinitPlatform::init(&mut imgui);
    platform.attach_window(imgui.io_mut(), &window, HiDpiMode::Default);

    let mut renderer = imgui_glow_renderer::AutoRenderer::initialize(gl, &mut imgui)
        .expect("Failed to initialize renderer");

    let mut state = AppState::new(rt.handle().clone());
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        state.file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        state.load_file(&path);
    }

    let mut last_frame_time = Instant::now();
    let mut last_settings_save = Instant::now();

    event_loop.run(move |event, window_target| {
        match event {
            Event::NewEvents(_) => {
                let now = Instant::now();
                imgui.io_mut().update_delta_time(now - last_frame_time);
                last_frame_time = now;
            }
            Event::AboutToWait => {
                state.process_file_dialogs();
                state.process_loading();
                state.update_playback();

                // Save settings periodically (every 30 seconds)
                if last_settings_save.elapsed().as_secs() >= 30 {
                    state.save_settings();
                    last_settings_save = Instant::now();
                }

                platform.prepare_frame(imgui.io_mut(), &window)
                    .expect("Failed to prepare frame");
                window.request_redraw();
            }
            Event::WindowEvent { event: WindowEvent::RedrawRequested, .. } => {
                let ui = imgui.new_frame();

                ui.main_menu_bar(|| {
                    ui.menu("File", || {
                        if ui.menu_item("Open Recording...") {
                            state.show_file_open_pending = true;
                        }
                        ui.separator();
                        if ui.menu_item("Exit") {
                            window_target.exit();
                        }
                    });

                    ui.menu("Playback", || {
                        if ui.menu_item_config("Play").enabled(!state.playing).build() {
                            state.set_playing(true);
                        }
                        if ui.menu_item_config("Stop").enabled(state.playing).build() {
                            state.set_playing(false);
                        }
                        ui.separator();

                        ui.slider("Interval (ms)", 1, 1000, &mut state.interval_edit);
                        if ui.is_item_deactivated_after_edit() {
                            state.set_interval(Some(state.interval_edit.max(1) as u64));
                        }

                        let at_end = state.settings.playback.terminal == TerminalIndex::DatasetLength;
                        if ui.menu_item_config("Stop At End Of Data").selected(at_end).build() {
                            let terminal = if at_end { TerminalIndex::default() } else { TerminalIndex::DatasetLength };
                            state.settings.playback.terminal = terminal;
                            state.session.driver_mut().set_terminal(terminal);
                        }

                        let timer_running = state.session.interval().is_some();
                        if ui.menu_item_config("Suspend Timer").selected(!timer_running).build() {
                            if timer_running {
                                state.set_interval(None);
                            } else {
                                state.set_interval(Some(state.interval_edit.max(1) as u64));
                            }
                        }
                    });

                    ui.menu("View", || {
                        ui.menu_item_config("Trip Panel")
                            .build_with_ref(&mut state.settings.show_trip_panel);
                        ui.menu_item_config("HUD")
                            .build_with_ref(&mut state.settings.show_hud);
                    });
                });

                // Status bar
                let window_size = window.inner_size();
                let logical_width = window_size.width as f32 / hidpi_factor as f32;
                let logical_height = window_size.height as f32 / hidpi_factor as f32;
                ui.set_cursor_pos([0.0, logical_height - 25.0]);
                ui.child_window("Status")
                    .size([logical_width, 25.0])
                    .build(|| {
                        if state.loading {
                            ui.text_colored([1.0, 0.8, 0.3, 1.0], "Loading...");
                        } else if let Some(ref msg) = state.status_message {
                            ui.text(format!("{} | {}", msg, state.status_line()));
                        } else {
                            ui.text("Open a telemetry recording to begin (File > Open Recording...)");
                        }
                    });

                ui.dockspace_over_main_viewport();

                if state.playing && state.settings.show_hud {
                    Hud::render(ui, &state.counters, state.session.driver().cursor());
                }

                if state.settings.show_trip_panel {
                    state.trip_panel.render(ui, &mut state.settings.show_trip_panel);
                }

                if state.session.driver().summary_visible() {
                    let summary = state.session.driver().last_summary().cloned();
                    if SummaryDialog::render(ui, &state.journey, summary.as_ref()) {
                        state.session.driver_mut().close_summary();
                    }
                }

                platform.prepare_render(ui, &window);
                let draw_data = imgui.render();

                unsafe {
                    gl_clear.clear_color(0.0, 0.0, 0.0, 1.0);
                    gl_clear.clear(glow::COLOR_BUFFER_BIT);
                }

                renderer.render(draw_data).expect("Rendering failed");

                surface.swap_buffers(&context).expect("Failed to swap buffers");
            }
            Event::WindowEvent { event: WindowEvent::CloseRequested, .. } => {
                state.save_settings();
                window_target.exit();
            }
            _ => {}
        }

        platform.handle_event(imgui.io_mut(), &window, &event);
    }).expect("EventLoop error");
}
