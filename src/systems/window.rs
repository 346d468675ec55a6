//! Window management system
//!
//! Handles window creation and title updates. The title doubles as the
//! shell's status line: it carries the first line of the debug text and the
//! end-of-game notification.

use std::sync::Arc;
use winit::{event_loop::ActiveEventLoop, window::Window};
use crate::config::WindowConfig;

/// Manages the application window
pub struct WindowSystem {
    window: Arc<Window>,
    base_title: String,
}

impl WindowSystem {
    /// Create window from config
    pub fn create(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Self, WindowError> {
        let attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_resizable(false)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.width,
                config.height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| WindowError::CreationFailed(e.to_string()))?,
        );

        Ok(Self {
            window,
            base_title: config.title.clone(),
        })
    }

    /// Get window reference (for Presenter creation)
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Show `line` after the base title
    pub fn set_status(&self, line: &str) {
        self.window.set_title(&status_title(&self.base_title, line));
    }

    /// Show a one-off notification to the player
    pub fn notify(&self, message: &str) {
        log::info!("{}", message);
        self.set_status(message);
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

fn status_title(base: &str, line: &str) -> String {
    if line.is_empty() {
        base.to_string()
    } else {
        format!("{} - {}", base, line)
    }
}

/// Sink for the per-frame debug text
///
/// The native shell has no text area, so the full text goes to the debug
/// log and its first line to the window title.
#[derive(Debug, Default)]
pub struct DebugText {
    text: String,
    changed: bool,
}

impl DebugText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text; unchanged text is not logged again
    pub fn set(&mut self, text: String) {
        if text == self.text {
            return;
        }
        log::debug!("\n{}", text);
        self.text = text;
        self.changed = true;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// First line of the text, if it changed since the last call
    pub fn take_changed(&mut self) -> Option<&str> {
        if !std::mem::take(&mut self.changed) {
            return None;
        }
        Some(self.text.lines().next().unwrap_or_default())
    }
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}
