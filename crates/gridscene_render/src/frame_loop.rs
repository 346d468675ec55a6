//! Cooperative render loop
//!
//! [`FrameLoop`] does not own a timer. The host calls [`FrameLoop::tick`]
//! from its next-frame primitive (a redraw request on desktop); while the
//! loop is running each tick renders the owned [`Renderer`] and then invokes
//! the per-frame callback. Input handling runs between ticks, so anything it
//! changes shows up in the next tick, never in one already in progress.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::renderer::Renderer;

/// Loop lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// Constructed or stopped
    Idle,
    /// Rendering on every tick
    Running,
}

/// Frame loop control failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopError {
    /// `start` was called while the loop was already running
    AlreadyRunning,
}

impl fmt::Display for LoopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopError::AlreadyRunning => write!(f, "Frame loop is already running"),
        }
    }
}

impl std::error::Error for LoopError {}

/// Cloneable stop switch for a [`FrameLoop`]
///
/// Input subscribers hold one of these to halt the loop without borrowing it.
#[derive(Clone, Debug)]
pub struct LoopHandle {
    running: Rc<Cell<bool>>,
}

impl LoopHandle {
    /// Halt the loop before its next tick. Calling it again does nothing.
    pub fn stop(&self) {
        if self.running.replace(false) {
            log::info!("Frame loop stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }
}

/// Repeating "render, then per-frame callback" cycle
pub struct FrameLoop {
    renderer: Renderer,
    running: Rc<Cell<bool>>,
    callback: Option<Box<dyn FnMut()>>,
    frame_count: u64,
}

impl FrameLoop {
    /// Create an idle loop around `renderer`
    pub fn new(renderer: Renderer) -> Self {
        Self {
            renderer,
            running: Rc::new(Cell::new(false)),
            callback: None,
            frame_count: 0,
        }
    }

    /// Start rendering on every tick, calling `callback` after each render
    ///
    /// Fails with [`LoopError::AlreadyRunning`] if the loop is running; the
    /// existing callback is kept.
    pub fn start(&mut self, callback: impl FnMut() + 'static) -> Result<(), LoopError> {
        if self.running.get() {
            log::warn!("start() ignored: frame loop already running");
            return Err(LoopError::AlreadyRunning);
        }
        self.callback = Some(Box::new(callback));
        self.running.set(true);
        log::info!("Frame loop started");
        Ok(())
    }

    /// Halt the loop; idempotent
    pub fn stop(&self) {
        self.handle().stop();
    }

    /// Stop switch that can be shared with input subscribers
    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            running: Rc::clone(&self.running),
        }
    }

    pub fn state(&self) -> LoopState {
        if self.running.get() {
            LoopState::Running
        } else {
            LoopState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Run one iteration if running; returns whether a frame was produced
    pub fn tick(&mut self) -> bool {
        if !self.running.get() {
            return false;
        }

        self.renderer.render();
        if let Some(callback) = self.callback.as_mut() {
            callback();
        }
        self.frame_count += 1;
        true
    }

    /// Frames produced since construction
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    /// Swap in a freshly built renderer, e.g. when the static layer changes
    pub fn replace_renderer(&mut self, renderer: Renderer) -> Renderer {
        std::mem::replace(&mut self.renderer, renderer)
    }
}

impl fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameLoop")
            .field("state", &self.state())
            .field("frame_count", &self.frame_count)
            .finish()
    }
}
