use crate::focus::FOCUS_TAPS;
use tokio::task::JoinHandle;

pub(crate) struct PollLoop {
    pub(crate) generation: u64,
    pub(crate) handle: JoinHandle<()>,
}

/// Client-local state. Never a source of truth for timing.
pub struct ClientUiState {
    pub(crate) poll: Option<PollLoop>,
    pub(crate) focus_taps_remaining: u8,
    pub(crate) active_template_id: u32,
    pub(crate) applied_request: u64,
    /// Number of the latest start/pause/reset. Statuses requested before it
    /// are outdated.
    pub(crate) command_barrier: u64,
    pub(crate) reward_visible: bool,
    generations: u64,
}

impl ClientUiState {
    pub fn new(template_id: u32) -> Self {
        Self {
            poll: None,
            focus_taps_remaining: FOCUS_TAPS,
            active_template_id: template_id.max(1),
            applied_request: 0,
            command_barrier: 0,
            reward_visible: false,
            generations: 0,
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poll
            .as_ref()
            .is_some_and(|poll| !poll.handle.is_finished())
    }

    pub(crate) fn next_generation(&mut self) -> u64 {
        self.generations += 1;
        self.generations
    }

    pub(crate) fn is_current_loop(&self, generation: u64) -> bool {
        self.poll
            .as_ref()
            .is_some_and(|poll| poll.generation == generation)
    }

    pub(crate) fn stop_polling(&mut self) -> bool {
        match self.poll.take() {
            Some(poll) => {
                poll.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> UiSnapshot {
        UiSnapshot {
            polling: self.is_polling(),
            focus_taps_remaining: self.focus_taps_remaining,
            active_template_id: self.active_template_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiSnapshot {
    pub polling: bool,
    pub focus_taps_remaining: u8,
    pub active_template_id: u32,
}
