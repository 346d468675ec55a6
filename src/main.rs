//! gridscene - Sokoban on a software drawing surface
//!
//! Arrow keys move the player, digit keys pick a level, R restarts it and
//! Escape quits.

use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use gridscene::assets::{TextureDescriptor, TextureSet};
use gridscene::config::AppConfig;
use gridscene::input::{
    game_bindings, GameInput, InputAction, InputMapper, GO_TO, LEVEL_SELECT, SCENE_CLICK,
};
use gridscene::session::{Session, SessionConfig};
use gridscene::systems::{DebugText, WindowSystem};
use gridscene_game::Level;
use gridscene_input::{Element, EventDispatcher, PlatformTranslator, RawEvent, SelectControl};
use gridscene_math::Rect;
use gridscene_render::{FrameLoop, PresentError, Presenter};

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    frames: Rc<RefCell<FrameLoop>>,
    session: Rc<RefCell<Session>>,
    debug: Rc<RefCell<DebugText>>,
    dispatcher: EventDispatcher<GameInput>,
    translator: PlatformTranslator,
    level_control: SelectControl,
    window: Option<WindowSystem>,
    presenter: Option<Presenter>,
}

impl App {
    fn new(config: AppConfig) -> Result<Self, Box<dyn Error>> {
        let levels = load_levels(&config);
        let textures = TextureSet::load(&texture_descriptors(&config));

        let surface = (config.renderer.width, config.renderer.height);
        let session_config = SessionConfig {
            surface,
            background: config.renderer.background(),
            completion_delay: config.game.completion_delay(),
        };
        let start = if config.levels.start < levels.len() {
            config.levels.start
        } else {
            log::warn!("Start level {} out of range, using the first", config.levels.start);
            0
        };

        let mut session = Session::new(levels, textures, session_config, start)?;
        let renderer = session.build_renderer()?;
        let level_control =
            SelectControl::new("level", session.level_names()).with_selected(start);

        let session = Rc::new(RefCell::new(session));
        let debug = Rc::new(RefCell::new(DebugText::new()));
        let frames = Rc::new(RefCell::new(FrameLoop::new(renderer)));
        frames.borrow_mut().start(frame_callback(
            Rc::clone(&session),
            Rc::clone(&debug),
            config.debug.show_debug_text,
        ))?;

        let scene = Element::new(
            "scene",
            Rect::from_size(surface.0 as f32, surface.1 as f32),
        );
        let mut dispatcher = EventDispatcher::new(game_bindings(scene, level_control.element()))?;

        dispatcher.add_event_listener(SCENE_CLICK, |input| {
            if let GameInput::Click { position } = input {
                log::info!("click: [{}, {}]", position.x, position.y);
            }
        })?;

        {
            let frames = Rc::clone(&frames);
            let session = Rc::clone(&session);
            dispatcher.add_event_listener(GO_TO, move |input| {
                if let GameInput::Move(direction) = input {
                    let mut frames = frames.borrow_mut();
                    session
                        .borrow_mut()
                        .apply_move(*direction, frames.renderer_mut(), Instant::now());
                }
            })?;
        }

        {
            let frames = Rc::clone(&frames);
            let session = Rc::clone(&session);
            let debug = Rc::clone(&debug);
            let show_debug_text = config.debug.show_debug_text;
            dispatcher.add_event_listener(LEVEL_SELECT, move |input| {
                if let GameInput::SelectLevel { index } = input {
                    let mut frames = frames.borrow_mut();
                    if session.borrow_mut().select_level(*index, &mut frames).is_ok()
                        && !frames.is_running()
                    {
                        let callback =
                            frame_callback(Rc::clone(&session), Rc::clone(&debug), show_debug_text);
                        if let Err(e) = frames.start(callback) {
                            log::warn!("{}", e);
                        }
                    }
                }
            })?;
        }

        Ok(Self {
            config,
            frames,
            session,
            debug,
            dispatcher,
            translator: PlatformTranslator::new(),
            level_control,
            window: None,
            presenter: None,
        })
    }

    fn dispatch(&mut self, events: Vec<RawEvent>) {
        if events.is_empty() {
            return;
        }
        for event in &events {
            self.dispatcher.dispatch(event);
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn restart_level(&mut self) {
        let restarted = {
            let mut frames = self.frames.borrow_mut();
            let ok = self.session.borrow_mut().restart(&mut frames).is_ok();
            if ok && !frames.is_running() {
                let callback = frame_callback(
                    Rc::clone(&self.session),
                    Rc::clone(&self.debug),
                    self.config.debug.show_debug_text,
                );
                if let Err(e) = frames.start(callback) {
                    log::warn!("{}", e);
                }
            }
            ok
        };
        if restarted {
            log::info!("Level restarted");
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }

    fn present(&mut self, event_loop: &ActiveEventLoop) {
        let Some(presenter) = &mut self.presenter else {
            return;
        };
        let frames = self.frames.borrow();
        match presenter.present(frames.renderer().visible()) {
            Ok(()) => {}
            Err(PresentError::OutOfMemory) => {
                log::error!("{}", PresentError::OutOfMemory);
                event_loop.exit();
            }
            Err(e) => log::warn!("{}", e),
        }
    }
}

/// Per-frame callback: refresh the debug text from the session
fn frame_callback(
    session: Rc<RefCell<Session>>,
    debug: Rc<RefCell<DebugText>>,
    enabled: bool,
) -> impl FnMut() + 'static {
    move || {
        if enabled {
            debug.borrow_mut().set(session.borrow().debug_text());
        }
    }
}

fn load_levels(config: &AppConfig) -> Vec<Level> {
    let mut levels: Vec<Level> = config
        .levels
        .paths
        .iter()
        .filter_map(|path| match Level::load(path) {
            Ok(level) => {
                log::info!("Loaded level '{}' from {}", level.name, path);
                Some(level)
            }
            Err(e) => {
                log::warn!("Skipping level {}: {}", path, e);
                None
            }
        })
        .collect();

    if levels.is_empty() {
        log::warn!("No level files loaded, using the built-in level");
        levels.push(Level::builtin());
    }
    levels
}

fn texture_descriptors(config: &AppConfig) -> Vec<TextureDescriptor> {
    config
        .assets
        .textures
        .iter()
        .map(|(id, path)| TextureDescriptor::new(id.clone(), path))
        .collect()
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let surface = (self.config.renderer.width, self.config.renderer.height);
        let presenter = pollster::block_on(Presenter::new(
            window.window().clone(),
            surface.0,
            surface.1,
            self.config.window.vsync,
        ));
        match presenter {
            Ok(presenter) => {
                self.translator.fit(presenter.size(), surface);
                self.presenter = Some(presenter);
            }
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(physical_size.width, physical_size.height);
                }
                self.translator.fit(
                    (physical_size.width, physical_size.height),
                    (self.config.renderer.width, self.config.renderer.height),
                );
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let PhysicalKey::Code(key) = key_event.physical_key {
                    match InputMapper::map_keyboard(key, key_event.state) {
                        Some(InputAction::Exit) => {
                            event_loop.exit();
                            return;
                        }
                        Some(InputAction::RestartLevel) => {
                            self.restart_level();
                            return;
                        }
                        None => {}
                    }

                    if key_event.state == ElementState::Pressed && !key_event.repeat {
                        if let Some(change) = self.level_control.select_by_key(key) {
                            self.dispatch(vec![RawEvent::Control(change)]);
                            return;
                        }
                    }
                }
                let events = self.translator.translate(&event);
                self.dispatch(events);
            }

            WindowEvent::RedrawRequested => {
                let produced = self.frames.borrow_mut().tick();
                self.present(event_loop);

                if let Some(window) = &self.window {
                    if let Some(line) = self.debug.borrow_mut().take_changed() {
                        window.set_status(line);
                    }
                    if produced && self.frames.borrow().is_running() {
                        window.request_redraw();
                    }
                }
            }

            other => {
                let events = self.translator.translate(other);
                self.dispatch(events);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let handle = self.frames.borrow().handle();
        let message = self.session.borrow_mut().poll_completion(Instant::now(), &handle);
        if let (Some(message), Some(window)) = (message, &self.window) {
            window.notify(message);
            window.request_redraw();
        }

        match self.session.borrow().completion_deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

fn main() {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    // Initialize logging; RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    log::info!("Starting gridscene");

    // Create event loop
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Wait);

    // Create and run application
    let mut app = App::new(config).expect("Failed to start game");
    event_loop.run_app(&mut app).expect("Event loop error");
}
