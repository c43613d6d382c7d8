use crate::models::Quote;
use std::sync::{Mutex, PoisonError};

/// Which of the primary controls are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub start_visible: bool,
    pub pause_visible: bool,
}

/// Everything the controller is allowed to touch on screen. Implementations
/// use interior mutability because the poll loop and user commands share one
/// view.
pub trait TimerView: Send + Sync + 'static {
    fn set_remaining_time(&self, text: &str);
    fn set_controls(&self, controls: Controls);
    /// Both values are already clamped to `0..=100`.
    fn set_progress(&self, session: f64, cycle: f64);
    fn set_session_label(&self, label: &str);
    fn show_reward(&self);
    fn show_focus_circles(&self);
    fn hide_focus_circles(&self);
    fn set_focus_circles(&self, remaining: u8);
    fn set_template(&self, template_id: u32, quote: &Quote);
    fn show_error(&self, message: &str);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewSnapshot {
    pub remaining_time: String,
    pub controls: Controls,
    pub session_progress: f64,
    pub cycle_progress: f64,
    pub session_label: Option<String>,
    pub reward_visible: bool,
    pub reward_shown: u32,
    pub focus_circles_visible: bool,
    pub focus_circles: u8,
    pub template_id: Option<u32>,
    pub quote: Option<Quote>,
    pub errors: Vec<String>,
}

/// Headless view that keeps the latest projection in memory.
#[derive(Debug, Default)]
pub struct MemoryView {
    inner: Mutex<ViewSnapshot>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.with(|snapshot| snapshot.clone())
    }

    fn with<T>(&self, f: impl FnOnce(&mut ViewSnapshot) -> T) -> T {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl TimerView for MemoryView {
    fn set_remaining_time(&self, text: &str) {
        self.with(|s| s.remaining_time = text.to_string());
    }

    fn set_controls(&self, controls: Controls) {
        self.with(|s| s.controls = controls);
    }

    fn set_progress(&self, session: f64, cycle: f64) {
        self.with(|s| {
            s.session_progress = session;
            s.cycle_progress = cycle;
        });
    }

    fn set_session_label(&self, label: &str) {
        self.with(|s| s.session_label = Some(label.to_string()));
    }

    fn show_reward(&self) {
        self.with(|s| {
            s.reward_visible = true;
            s.reward_shown += 1;
        });
    }

    fn show_focus_circles(&self) {
        self.with(|s| s.focus_circles_visible = true);
    }

    fn hide_focus_circles(&self) {
        self.with(|s| s.focus_circles_visible = false);
    }

    fn set_focus_circles(&self, remaining: u8) {
        self.with(|s| s.focus_circles = remaining);
    }

    fn set_template(&self, template_id: u32, quote: &Quote) {
        self.with(|s| {
            s.template_id = Some(template_id);
            s.quote = Some(*quote);
        });
    }

    fn show_error(&self, message: &str) {
        self.with(|s| s.errors.push(message.to_string()));
    }
}
