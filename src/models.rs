use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    #[default]
    Focus,
    ShortBreak,
    LongBreak,
    Completed,
    #[serde(other)]
    Unknown,
}

/// Timer snapshot as reported by the server. The client never computes any of
/// these fields itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TimerStatus {
    #[serde(default, deserialize_with = "remaining_time_text")]
    pub remaining_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub session_status: SessionStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_state: TimerState,
    #[serde(default)]
    pub session_progress: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed_sessions: u32,
    #[serde(default)]
    pub total_sessions: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub package_ready: bool,
}

impl TimerStatus {
    pub fn is_running(&self) -> bool {
        self.session_status == SessionStatus::Running
    }

    pub fn is_terminal(&self) -> bool {
        self.session_status == SessionStatus::Completed
            || self.current_state == TimerState::Completed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionProgress {
    #[serde(default)]
    pub session_progress: Option<f64>,
    #[serde(default)]
    pub cycle_progress: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct EarnTemplateRequest {
    pub template_id: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EarnTemplateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub text: &'static str,
    pub speaker: &'static str,
}

pub static QUOTES: [Quote; 5] = [
    Quote {
        text: "It is not that we have a short time to live, but that we waste a lot of it.",
        speaker: "Seneca",
    },
    Quote {
        text: "Time is the most valuable thing that a man can spend.",
        speaker: "Theophrastus",
    },
    Quote {
        text: concat!(
            "Dost thou love life? Then do not squander time, ",
            "for that's the stuff life is made of."
        ),
        speaker: "Benjamin Franklin",
    },
    Quote {
        text: "Time is what we want most, but what we use worst.",
        speaker: "William Penn",
    },
    Quote {
        text: "Yesterday is gone. Tomorrow has not yet come. We have only today. Let us begin.",
        speaker: "Mother Teresa",
    },
];

/// Quote shown for a template; ids start at 1 and wrap around the list.
pub fn quote_for_template(template_id: u32) -> &'static Quote {
    let index = template_id.saturating_sub(1) as usize % QUOTES.len();
    &QUOTES[index]
}

fn remaining_time_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        Value::Number(number) => match number.as_f64() {
            // Whole seconds sent as floats print without the trailing ".0".
            Some(seconds) if number.is_f64() && seconds.fract() == 0.0 && seconds.abs() < 1e15 => {
                format!("{seconds:.0}")
            }
            _ => number.to_string(),
        },
        other => other.to_string(),
    })
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
