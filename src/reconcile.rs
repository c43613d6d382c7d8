use crate::config::ControllerSettings;
use crate::models::{SessionProgress, TimerState, TimerStatus};
use crate::view::{Controls, TimerView};

/// Pure projection of a server status onto the view.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub remaining_time: String,
    pub controls: Controls,
    pub session_progress: f64,
    pub cycle_progress: f64,
    pub session_label: Option<&'static str>,
}

pub fn project(status: &TimerStatus, settings: &ControllerSettings) -> Projection {
    let variant = settings.variant;
    let running = status.is_running();
    let controls = if variant.supports_pause() {
        Controls {
            start_visible: !running,
            pause_visible: running,
        }
    } else {
        Controls {
            start_visible: !running,
            pause_visible: false,
        }
    };

    let total = if variant.uses_server_total() {
        status
            .total_sessions
            .filter(|total| *total > 0)
            .unwrap_or(settings.total_sessions)
    } else {
        settings.total_sessions
    };

    Projection {
        remaining_time: status.remaining_time.clone(),
        controls,
        session_progress: clamp_percent(status.session_progress.unwrap_or(0.0)),
        cycle_progress: cycle_percent(status.completed_sessions, total),
        session_label: variant
            .shows_session_label()
            .then(|| session_label(status.current_state)),
    }
}

impl Projection {
    pub fn render<V: TimerView + ?Sized>(&self, view: &V) {
        view.set_remaining_time(&self.remaining_time);
        view.set_controls(self.controls);
        view.set_progress(self.session_progress, self.cycle_progress);
        if let Some(label) = self.session_label {
            view.set_session_label(label);
        }
    }
}

/// Bars from the legacy `/api/session-progress` payload.
pub fn progress_bars(progress: &SessionProgress) -> (f64, f64) {
    (
        clamp_percent(progress.session_progress.unwrap_or(0.0)),
        clamp_percent(progress.cycle_progress.unwrap_or(0.0)),
    )
}

pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

pub fn cycle_percent(completed_sessions: u32, total_sessions: u32) -> f64 {
    if total_sessions == 0 {
        return 0.0;
    }
    clamp_percent(f64::from(completed_sessions) / f64::from(total_sessions) * 100.0)
}

pub fn session_label(state: TimerState) -> &'static str {
    match state {
        TimerState::Focus => "Timer",
        TimerState::ShortBreak => "Break",
        TimerState::LongBreak => "Long Break",
        TimerState::Completed => "Complete!",
        TimerState::Unknown => "Timer",
    }
}
