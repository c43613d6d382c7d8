use crate::models::Quote;
use crate::view::{Controls, TimerView};
use chrono::Local;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use tracing::warn;

const STATUS_LINE: &str = concat!(
    "{{LABEL}} {{REMAINING}}",
    "  session {{SESSION}}  cycle {{CYCLE}}{{CIRCLES}}",
    "  [{{CONTROLS}}]"
);
const BAR_CELLS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Screen {
    pub remaining_time: String,
    pub label: Option<String>,
    pub controls: Controls,
    pub session_progress: f64,
    pub cycle_progress: f64,
    pub circles_visible: bool,
    pub circles: u8,
}

pub fn render_line(screen: &Screen) -> String {
    let circles = if screen.circles_visible {
        let filled = usize::from(screen.circles.min(3));
        format!("  focus {}{}", "●".repeat(filled), "○".repeat(3 - filled))
    } else {
        String::new()
    };

    STATUS_LINE
        .replace("{{LABEL}}", screen.label.as_deref().unwrap_or("Timer"))
        .replace("{{REMAINING}}", &screen.remaining_time)
        .replace("{{SESSION}}", &bar(screen.session_progress))
        .replace("{{CYCLE}}", &bar(screen.cycle_progress))
        .replace("{{CIRCLES}}", &circles)
        .replace("{{CONTROLS}}", controls_hint(screen.controls))
}

fn bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_CELLS as f64).round() as usize;
    let filled = filled.min(BAR_CELLS);
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        "-".repeat(BAR_CELLS - filled),
        percent
    )
}

fn controls_hint(controls: Controls) -> &'static str {
    match (controls.start_visible, controls.pause_visible) {
        (true, true) => "start | pause",
        (true, false) => "start",
        (false, true) => "pause",
        (false, false) => "running",
    }
}

struct Terminal {
    screen: Screen,
    last_line: String,
    out: Box<dyn Write + Send>,
}

/// Line-oriented view for the terminal front end. The status line is printed
/// again only when its content changes.
pub struct TerminalView {
    terminal: Mutex<Terminal>,
}

impl TerminalView {
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            terminal: Mutex::new(Terminal {
                screen: Screen::default(),
                last_line: String::new(),
                out,
            }),
        }
    }

    pub fn screen(&self) -> Screen {
        self.with(|terminal| terminal.screen.clone())
    }

    fn with<T>(&self, f: impl FnOnce(&mut Terminal) -> T) -> T {
        let mut guard = self.terminal.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    fn update(&self, f: impl FnOnce(&mut Screen)) {
        self.with(|terminal| {
            f(&mut terminal.screen);
            let line = render_line(&terminal.screen);
            if line != terminal.last_line {
                print_line(terminal, &line);
                terminal.last_line = line;
            }
        });
    }

    fn message(&self, text: &str) {
        self.with(|terminal| print_line(terminal, text));
    }
}

fn print_line(terminal: &mut Terminal, text: &str) {
    let time = Local::now().format("%H:%M:%S");
    if let Err(err) = writeln!(terminal.out, "[{time}] {text}") {
        warn!("failed to write to terminal: {err}");
    }
}

impl TimerView for TerminalView {
    fn set_remaining_time(&self, text: &str) {
        self.update(|screen| screen.remaining_time = text.to_string());
    }

    fn set_controls(&self, controls: Controls) {
        self.update(|screen| screen.controls = controls);
    }

    fn set_progress(&self, session: f64, cycle: f64) {
        self.update(|screen| {
            screen.session_progress = session;
            screen.cycle_progress = cycle;
        });
    }

    fn set_session_label(&self, label: &str) {
        self.update(|screen| screen.label = Some(label.to_string()));
    }

    fn show_reward(&self) {
        self.message("*** Reward package ready! ***");
    }

    fn show_focus_circles(&self) {
        self.update(|screen| screen.circles_visible = true);
    }

    fn hide_focus_circles(&self) {
        self.update(|screen| screen.circles_visible = false);
    }

    fn set_focus_circles(&self, remaining: u8) {
        self.update(|screen| screen.circles = remaining);
    }

    fn set_template(&self, template_id: u32, quote: &Quote) {
        self.message(&format!(
            "template {template_id}: \"{}\" ({})",
            quote.text, quote.speaker
        ));
    }

    fn show_error(&self, message: &str) {
        self.message(&format!("error: {message}"));
    }
}
