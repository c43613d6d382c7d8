//! The polling reconciliation loop.
//!
//! The server owns all timing. The controller asks it to start, pause or reset,
//! polls its status while a session runs, and projects every response onto a
//! [`TimerView`]. Only three things are decided client side: the tap-to-focus
//! counter, the active template, and the one-shot reactions to a completed
//! session or an unlocked reward.

use crate::api::TimerApi;
use crate::config::ControllerSettings;
use crate::errors::ClientError;
use crate::focus::{self, FOCUS_TAPS, TapTarget};
use crate::models::{TimerStatus, quote_for_template};
use crate::reconcile::{progress_bars, project};
use crate::state::{ClientUiState, PollLoop, UiSnapshot};
use crate::view::TimerView;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    Ignored,
    Counted { remaining: u8 },
    /// The last circle was removed and the session was reset.
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tick {
    Continue,
    Finished,
}

/// Cloneable handle to one timer widget. Built once by the composition root and
/// shared with whatever needs to drive it.
pub struct TimerController<A, V> {
    inner: Arc<Inner<A, V>>,
}

impl<A, V> Clone for TimerController<A, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<A, V> {
    api: A,
    view: V,
    settings: ControllerSettings,
    requests: AtomicU64,
    state: Mutex<ClientUiState>,
}

impl<A: TimerApi, V: TimerView> TimerController<A, V> {
    pub fn new(api: A, view: V, settings: ControllerSettings, template_id: u32) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                view,
                settings,
                requests: AtomicU64::new(0),
                state: Mutex::new(ClientUiState::new(template_id)),
            }),
        }
    }

    pub fn view(&self) -> &V {
        &self.inner.view
    }

    pub fn api(&self) -> &A {
        &self.inner.api
    }

    pub async fn snapshot(&self) -> UiSnapshot {
        self.inner.state.lock().await.snapshot()
    }

    pub async fn is_polling(&self) -> bool {
        self.inner.state.lock().await.is_polling()
    }

    pub async fn start(&self) {
        self.inner.start().await;
    }

    pub async fn pause(&self) {
        self.inner.pause().await;
    }

    pub async fn reset(&self) {
        self.inner.reset().await;
    }

    /// One status fetch outside the poll loop, with the same completion and
    /// reward handling as a regular tick.
    pub async fn refresh(&self) {
        self.inner.tick(None).await;
    }

    /// Projects a status onto the view. No network access.
    pub fn reconcile(&self, status: &TimerStatus) {
        self.inner.reconcile(status);
    }

    /// Fetches the legacy progress endpoint and updates both bars.
    pub async fn refresh_progress(&self) {
        match self.inner.api.session_progress().await {
            Ok(progress) => {
                let (session, cycle) = progress_bars(&progress);
                self.inner.view.set_progress(session, cycle);
            }
            Err(err) => self.inner.report("loading session progress", &err),
        }
    }

    pub async fn set_template_id(&self, template_id: u32) {
        let template_id = template_id.max(1);
        self.inner.state.lock().await.active_template_id = template_id;
        self.inner
            .view
            .set_template(template_id, quote_for_template(template_id));
    }

    /// Routes a raw tap. Only background taps during a running session count.
    pub async fn handle_tap(&self, target: &TapTarget) -> TapOutcome {
        if !self.inner.settings.variant.tap_to_focus() {
            return TapOutcome::Ignored;
        }

        let remaining = {
            let mut state = self.inner.state.lock().await;
            if !focus::qualifies(target, state.is_polling()) {
                return TapOutcome::Ignored;
            }
            match self.inner.take_focus_tap(&mut state) {
                Some(remaining) => remaining,
                None => return TapOutcome::Ignored,
            }
        };
        self.inner.after_focus_tap(remaining).await
    }

    pub async fn remove_focus_circle(&self) -> TapOutcome {
        let remaining = {
            let mut state = self.inner.state.lock().await;
            match self.inner.take_focus_tap(&mut state) {
                Some(remaining) => remaining,
                None => return TapOutcome::Ignored,
            }
        };
        self.inner.after_focus_tap(remaining).await
    }

    /// Stops polling. Scheduled resets and in-flight commands still complete.
    pub async fn shutdown(&self) {
        if self.inner.state.lock().await.stop_polling() {
            debug!("poll loop stopped on shutdown");
        }
    }
}

impl<A: TimerApi, V: TimerView> Inner<A, V> {
    fn next_request(&self) -> u64 {
        self.requests.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Numbers a start/pause/reset request. Any status requested before it
    /// is outdated from now on, whenever its reply arrives.
    async fn next_command(&self) -> u64 {
        let request = self.next_request();
        let mut state = self.state.lock().await;
        state.command_barrier = state.command_barrier.max(request);
        request
    }

    fn reconcile(&self, status: &TimerStatus) {
        project(status, &self.settings).render(&self.view);
    }

    /// Applies a polled status unless a newer status or a later command has
    /// already been issued.
    fn apply_status(
        &self,
        state: &mut ClientUiState,
        request: u64,
        status: &TimerStatus,
    ) -> bool {
        if request < state.command_barrier || request <= state.applied_request {
            debug!(
                request,
                applied = state.applied_request,
                barrier = state.command_barrier,
                "discarding stale timer status"
            );
            return false;
        }
        state.applied_request = request;
        self.reconcile(status);
        true
    }

    /// Applies a command reply unless another command was issued after it.
    /// Polls answered while the command was in flight never win over it.
    fn apply_command(
        &self,
        state: &mut ClientUiState,
        request: u64,
        status: &TimerStatus,
    ) -> bool {
        if request < state.command_barrier {
            debug!(
                request,
                barrier = state.command_barrier,
                "discarding superseded command reply"
            );
            return false;
        }
        state.applied_request = state.applied_request.max(request);
        self.reconcile(status);
        true
    }

    fn report(&self, action: &str, err: &ClientError) {
        error!("error {action}: {err}");
        if self.settings.variant.reports_status() {
            self.view.show_error(&format!("Error {action}"));
        }
    }

    async fn start(self: &Arc<Self>) {
        let request = self.next_command().await;
        let status = match self.api.start().await {
            Ok(status) => status,
            Err(err) => return self.report("starting timer", &err),
        };

        let mut state = self.state.lock().await;
        if !self.apply_command(&mut state, request, &status) {
            return;
        }
        self.ensure_polling(&mut state);
        if self.settings.variant.tap_to_focus() {
            state.focus_taps_remaining = FOCUS_TAPS;
            self.view.show_focus_circles();
            self.view.set_focus_circles(FOCUS_TAPS);
        }
        info!(status = ?status.session_status, "timer started");
    }

    async fn pause(&self) {
        if !self.settings.variant.supports_pause() {
            warn!(variant = %self.settings.variant, "pause is not available");
            return;
        }

        let request = self.next_command().await;
        let status = match self.api.pause().await {
            Ok(status) => status,
            Err(err) => return self.report("pausing timer", &err),
        };

        let mut state = self.state.lock().await;
        if !self.apply_command(&mut state, request, &status) {
            return;
        }
        state.stop_polling();
        info!(status = ?status.session_status, "timer paused");
    }

    async fn reset(&self) {
        let request = self.next_command().await;
        let status = match self.api.reset().await {
            Ok(status) => status,
            Err(err) => return self.report("resetting timer", &err),
        };

        let mut state = self.state.lock().await;
        if !self.apply_command(&mut state, request, &status) {
            return;
        }
        state.stop_polling();
        if self.settings.variant.tap_to_focus() {
            state.focus_taps_remaining = FOCUS_TAPS;
            self.hide_focus_circles();
        }
        info!("timer reset");
    }

    fn ensure_polling(self: &Arc<Self>, state: &mut ClientUiState) {
        if state.is_polling() {
            return;
        }
        state.stop_polling();

        let generation = state.next_generation();
        let inner = Arc::clone(self);
        let handle = tokio::spawn(async move { inner.poll_loop(generation).await });
        state.poll = Some(PollLoop { generation, handle });
        debug!(generation, "poll loop started");
    }

    async fn poll_loop(self: Arc<Self>, generation: u64) {
        let period = self.settings.poll_interval;
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if self.tick(Some(generation)).await == Tick::Finished {
                break;
            }
        }
        debug!(generation, "poll loop finished");
    }

    /// `generation` is set when called from a poll loop; a one-shot refresh
    /// passes `None`.
    async fn tick(self: &Arc<Self>, generation: Option<u64>) -> Tick {
        let request = self.next_request();
        let status = match self.api.status().await {
            Ok(status) => status,
            Err(err) => {
                self.report("updating timer", &err);
                return Tick::Continue;
            }
        };

        let mut state = self.state.lock().await;
        if generation.is_some_and(|generation| !state.is_current_loop(generation)) {
            debug!("dropping status from a stopped poll loop");
            return Tick::Finished;
        }
        if !self.apply_status(&mut state, request, &status) {
            return Tick::Continue;
        }

        let mut outcome = Tick::Continue;
        if status.is_terminal() {
            if generation.is_some() {
                // Retire our own handle; aborting it here would cancel this task.
                state.poll.take();
                outcome = Tick::Finished;
            } else {
                state.stop_polling();
            }
            if self.settings.variant.tap_to_focus() {
                self.hide_focus_circles();
            }
            self.schedule_reset();
            info!(
                completed_sessions = status.completed_sessions,
                "session completed, resetting"
            );
        }

        if status.package_ready {
            self.unlock_reward(&mut state);
        } else {
            state.reward_visible = false;
        }

        outcome
    }

    fn schedule_reset(self: &Arc<Self>) {
        let inner = Arc::clone(self);
        let delay = self.settings.completion_reset_delay;
        tokio::spawn(async move {
            time::sleep(delay).await;
            inner.reset().await;
        });
    }

    fn unlock_reward(self: &Arc<Self>, state: &mut ClientUiState) {
        if state.reward_visible {
            return;
        }
        state.reward_visible = true;
        self.view.show_reward();
        info!("reward package ready");

        if self.settings.variant.earns_templates() {
            let inner = Arc::clone(self);
            let template_id = state.active_template_id;
            tokio::spawn(async move { inner.earn_template(template_id).await });
        }
    }

    async fn earn_template(&self, template_id: u32) {
        match self.api.earn_template(template_id).await {
            Ok(ack) if ack.success => info!(template_id, "{}", ack.message),
            Ok(ack) => debug!(template_id, message = %ack.message, "template not earned"),
            Err(err) => error!(template_id, "error earning template: {err}"),
        }
    }

    fn hide_focus_circles(&self) {
        self.view.hide_focus_circles();
        self.view.set_focus_circles(0);
    }

    fn take_focus_tap(&self, state: &mut ClientUiState) -> Option<u8> {
        if state.focus_taps_remaining == 0 {
            return None;
        }
        state.focus_taps_remaining -= 1;
        self.view.set_focus_circles(state.focus_taps_remaining);
        Some(state.focus_taps_remaining)
    }

    async fn after_focus_tap(&self, remaining: u8) -> TapOutcome {
        if remaining > 0 {
            return TapOutcome::Counted { remaining };
        }
        info!("all focus circles removed, abandoning session");
        self.reset().await;
        TapOutcome::Abandoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::focus::ElementKind;
    use crate::models::{EarnTemplateResponse, SessionProgress, SessionStatus, TimerState};
    use crate::view::MemoryView;
    use reqwest::StatusCode;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    #[derive(Debug, Default, Clone)]
    struct Calls {
        start: u32,
        pause: u32,
        reset: u32,
        status: u32,
        progress: u32,
        earned: Vec<u32>,
    }

    #[derive(Default)]
    struct FakeApi {
        script: StdMutex<VecDeque<Result<TimerStatus, StatusCode>>>,
        fail_start: bool,
        command_delay: Duration,
        status_delay: Duration,
        calls: StdMutex<Calls>,
    }

    impl FakeApi {
        fn scripted(statuses: Vec<Result<TimerStatus, StatusCode>>) -> Self {
            Self {
                script: StdMutex::new(statuses.into()),
                ..Self::default()
            }
        }

        fn calls(&self) -> Calls {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, f: impl FnOnce(&mut Calls)) {
            f(&mut self.calls.lock().unwrap());
        }

        async fn lag(delay: Duration) {
            if !delay.is_zero() {
                time::sleep(delay).await;
            }
        }
    }

    fn unavailable(endpoint: &'static str) -> ClientError {
        ClientError::Status {
            endpoint,
            status: StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn with_status(remaining: &str, session_status: SessionStatus) -> TimerStatus {
        TimerStatus {
            remaining_time: remaining.to_string(),
            session_status,
            total_sessions: Some(4),
            ..TimerStatus::default()
        }
    }

    fn running(remaining: &str) -> TimerStatus {
        with_status(remaining, SessionStatus::Running)
    }

    fn completed() -> TimerStatus {
        TimerStatus {
            current_state: TimerState::Completed,
            completed_sessions: 4,
            ..with_status("00:00", SessionStatus::Completed)
        }
    }

    impl TimerApi for FakeApi {
        async fn start(&self) -> Result<TimerStatus, ClientError> {
            self.record(|calls| calls.start += 1);
            if self.fail_start {
                return Err(unavailable(crate::api::START));
            }
            Ok(running("25:00"))
        }

        async fn pause(&self) -> Result<TimerStatus, ClientError> {
            self.record(|calls| calls.pause += 1);
            Self::lag(self.command_delay).await;
            Ok(with_status("12:30", SessionStatus::Paused))
        }

        async fn reset(&self) -> Result<TimerStatus, ClientError> {
            self.record(|calls| calls.reset += 1);
            Self::lag(self.command_delay).await;
            Ok(with_status("25:00", SessionStatus::Idle))
        }

        async fn status(&self) -> Result<TimerStatus, ClientError> {
            self.record(|calls| calls.status += 1);
            let next = self.script.lock().unwrap().pop_front();
            Self::lag(self.status_delay).await;
            match next {
                Some(Ok(status)) => Ok(status),
                Some(Err(status)) => Err(ClientError::Status {
                    endpoint: crate::api::TIMER_STATUS,
                    status,
                }),
                None => Ok(running("24:59")),
            }
        }

        async fn session_progress(&self) -> Result<SessionProgress, ClientError> {
            self.record(|calls| calls.progress += 1);
            Ok(SessionProgress {
                session_progress: Some(-12.0),
                cycle_progress: Some(75.0),
            })
        }

        async fn earn_template(
            &self,
            template_id: u32,
        ) -> Result<EarnTemplateResponse, ClientError> {
            self.record(|calls| calls.earned.push(template_id));
            Ok(EarnTemplateResponse {
                success: true,
                message: format!("Template {template_id} earned!"),
            })
        }
    }

    fn controller(variant: Variant, api: FakeApi) -> TimerController<FakeApi, MemoryView> {
        let settings = ControllerSettings {
            variant,
            ..ControllerSettings::default()
        };
        TimerController::new(api, MemoryView::new(), settings, 1)
    }

    async fn advance(ms: u64) {
        time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn starting_twice_keeps_one_poll_loop() {
        let timer = controller(Variant::TapToFocus, FakeApi::default());

        timer.start().await;
        timer.start().await;
        assert!(timer.is_polling().await);

        advance(1100).await;
        let calls = timer.api().calls();
        assert_eq!(calls.start, 2);
        assert_eq!(calls.status, 5);
        assert_eq!(timer.view().snapshot().remaining_time, "24:59");
    }

    #[tokio::test(start_paused = true)]
    async fn completion_stops_polling_and_resets_once() {
        let api = FakeApi::scripted(vec![Ok(running("00:01")), Ok(completed())]);
        let timer = controller(Variant::TapToFocus, api);

        timer.start().await;
        assert!(timer.view().snapshot().focus_circles_visible);

        advance(1300).await;
        assert!(!timer.is_polling().await);
        assert_eq!(timer.api().calls().reset, 0);
        let view = timer.view().snapshot();
        assert!(!view.focus_circles_visible);
        assert_eq!(view.remaining_time, "00:00");

        advance(200).await;
        assert_eq!(timer.api().calls().reset, 1);
        assert_eq!(timer.view().snapshot().remaining_time, "25:00");

        advance(2000).await;
        let calls = timer.api().calls();
        assert_eq!(calls.reset, 1);
        assert_eq!(calls.status, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn three_focus_taps_abandon_the_session() {
        let timer = controller(Variant::TapToFocus, FakeApi::default());

        assert_eq!(timer.handle_tap(&TapTarget::background()).await, TapOutcome::Ignored);

        timer.start().await;
        assert_eq!(timer.snapshot().await.focus_taps_remaining, 3);

        let on_button = TapTarget::new([ElementKind::Other, ElementKind::Button]);
        let on_circles = TapTarget::new([ElementKind::FocusCircles]);
        assert_eq!(timer.handle_tap(&on_button).await, TapOutcome::Ignored);
        assert_eq!(timer.handle_tap(&on_circles).await, TapOutcome::Ignored);
        assert_eq!(timer.snapshot().await.focus_taps_remaining, 3);

        let background = TapTarget::background();
        assert_eq!(
            timer.handle_tap(&background).await,
            TapOutcome::Counted { remaining: 2 }
        );
        assert_eq!(timer.view().snapshot().focus_circles, 2);
        assert_eq!(
            timer.handle_tap(&background).await,
            TapOutcome::Counted { remaining: 1 }
        );
        assert_eq!(timer.handle_tap(&background).await, TapOutcome::Abandoned);

        let snapshot = timer.snapshot().await;
        assert_eq!(snapshot.focus_taps_remaining, 3);
        assert!(!snapshot.polling);
        assert_eq!(timer.api().calls().reset, 1);
        assert!(!timer.view().snapshot().focus_circles_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn taps_are_ignored_outside_tap_variant() {
        let timer = controller(Variant::Classic, FakeApi::default());
        timer.start().await;
        assert_eq!(timer.handle_tap(&TapTarget::background()).await, TapOutcome::Ignored);
        assert_eq!(timer.snapshot().await.focus_taps_remaining, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn reward_fires_once_per_occurrence_with_active_template() {
        let ready = TimerStatus {
            package_ready: true,
            ..running("00:10")
        };
        let api = FakeApi::scripted(vec![
            Ok(ready.clone()),
            Ok(ready.clone()),
            Ok(running("00:09")),
            Ok(ready),
        ]);
        let timer = controller(Variant::TapToFocus, api);
        timer.set_template_id(2).await;
        assert_eq!(timer.view().snapshot().quote.map(|quote| quote.speaker), Some("Theophrastus"));

        timer.start().await;
        advance(500).await;
        assert_eq!(timer.view().snapshot().reward_shown, 1);
        assert_eq!(timer.api().calls().earned, vec![2]);

        advance(400).await;
        assert_eq!(timer.view().snapshot().reward_shown, 2);
        assert_eq!(timer.api().calls().earned, vec![2, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn labeled_variant_shows_reward_without_earning() {
        let ready = TimerStatus {
            package_ready: true,
            current_state: TimerState::ShortBreak,
            ..running("00:05")
        };
        let timer = controller(Variant::Labeled, FakeApi::scripted(vec![Ok(ready)]));

        timer.start().await;
        advance(300).await;
        let view = timer.view().snapshot();
        assert_eq!(view.reward_shown, 1);
        assert_eq!(view.session_label.as_deref(), Some("Break"));
        assert!(timer.api().calls().earned.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_polling_when_supported() {
        let timer = controller(Variant::Classic, FakeApi::default());
        timer.start().await;
        assert!(timer.view().snapshot().controls.pause_visible);

        timer.pause().await;
        assert!(!timer.is_polling().await);
        let view = timer.view().snapshot();
        assert!(view.controls.start_visible);
        assert!(!view.controls.pause_visible);
        assert_eq!(view.remaining_time, "12:30");

        advance(1000).await;
        assert_eq!(timer.api().calls().status, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_is_not_sent_in_tap_variant() {
        let timer = controller(Variant::TapToFocus, FakeApi::default());
        timer.start().await;
        timer.pause().await;
        assert_eq!(timer.api().calls().pause, 0);
        assert!(timer.is_polling().await);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_start_leaves_no_loop() {
        let api = FakeApi {
            fail_start: true,
            ..FakeApi::default()
        };
        let timer = controller(Variant::Labeled, api);

        timer.start().await;
        assert!(!timer.is_polling().await);
        advance(1000).await;
        assert_eq!(timer.api().calls().status, 0);

        let view = timer.view().snapshot();
        assert_eq!(view.remaining_time, "");
        assert_eq!(view.errors, vec!["Error starting timer".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_poll_skips_the_tick() {
        let api = FakeApi::scripted(vec![Err(StatusCode::BAD_GATEWAY), Ok(running("00:09"))]);
        let timer = controller(Variant::TapToFocus, api);

        timer.start().await;
        advance(300).await;
        assert!(timer.is_polling().await);
        assert_eq!(timer.view().snapshot().remaining_time, "25:00");

        advance(200).await;
        assert_eq!(timer.view().snapshot().remaining_time, "00:09");
    }

    fn slow_commands() -> FakeApi {
        FakeApi {
            command_delay: Duration::from_millis(300),
            ..FakeApi::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_reset_wins_over_polls_answered_meanwhile() {
        let timer = controller(Variant::Classic, slow_commands());
        timer.start().await;

        // Ticks at 200ms are answered while the reset is still in flight.
        timer.reset().await;
        assert!(timer.api().calls().status >= 1);
        assert!(!timer.is_polling().await);
        let view = timer.view().snapshot();
        assert_eq!(view.remaining_time, "25:00");
        assert!(view.controls.start_visible);
        assert!(!view.controls.pause_visible);

        advance(1000).await;
        assert_eq!(timer.view().snapshot().remaining_time, "25:00");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_pause_wins_over_polls_answered_meanwhile() {
        let timer = controller(Variant::Classic, slow_commands());
        timer.start().await;

        timer.pause().await;
        assert!(timer.api().calls().status >= 1);
        assert!(!timer.is_polling().await);
        let view = timer.view().snapshot();
        assert_eq!(view.remaining_time, "12:30");
        assert!(view.controls.start_visible);
        assert!(!view.controls.pause_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_poll_is_dropped_after_a_later_command() {
        let api = FakeApi {
            status_delay: Duration::from_millis(300),
            ..FakeApi::scripted(vec![Ok(completed())])
        };
        let timer = controller(Variant::Classic, api);

        let refreshing = tokio::spawn({
            let timer = timer.clone();
            async move { timer.refresh().await }
        });
        advance(100).await;
        timer.reset().await;
        assert_eq!(timer.view().snapshot().remaining_time, "25:00");

        refreshing.await.unwrap();
        let view = timer.view().snapshot();
        assert_eq!(view.remaining_time, "25:00");
        assert!(view.controls.start_visible);

        advance(2000).await;
        assert_eq!(timer.api().calls().reset, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reconcile_projects_without_network() {
        let timer = controller(Variant::Labeled, FakeApi::default());
        let status = TimerStatus {
            current_state: TimerState::LongBreak,
            session_progress: Some(40.0),
            completed_sessions: 2,
            ..running("03:00")
        };

        timer.reconcile(&status);
        let view = timer.view().snapshot();
        assert_eq!(view.remaining_time, "03:00");
        assert_eq!(view.session_label.as_deref(), Some("Long Break"));
        assert_eq!(view.session_progress, 40.0);
        assert_eq!(view.cycle_progress, 50.0);
        assert!(view.controls.pause_visible);
        assert_eq!(timer.api().calls().status, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn removing_three_circles_resets_the_session() {
        let timer = controller(Variant::TapToFocus, FakeApi::default());
        timer.start().await;

        assert_eq!(timer.remove_focus_circle().await, TapOutcome::Counted { remaining: 2 });
        assert_eq!(timer.remove_focus_circle().await, TapOutcome::Counted { remaining: 1 });
        assert_eq!(timer.remove_focus_circle().await, TapOutcome::Abandoned);

        assert_eq!(timer.api().calls().reset, 1);
        let snapshot = timer.snapshot().await;
        assert_eq!(snapshot.focus_taps_remaining, 3);
        assert!(!snapshot.polling);
        assert_eq!(timer.view().snapshot().remaining_time, "25:00");
    }

    #[tokio::test(start_paused = true)]
    async fn one_shot_refresh_handles_completion() {
        let timer = controller(Variant::Classic, FakeApi::scripted(vec![Ok(completed())]));

        timer.refresh().await;
        assert!(!timer.is_polling().await);
        advance(1100).await;
        assert_eq!(timer.api().calls().reset, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn legacy_progress_is_clamped() {
        let timer = controller(Variant::Classic, FakeApi::default());
        timer.refresh_progress().await;

        let view = timer.view().snapshot();
        assert_eq!(view.session_progress, 0.0);
        assert_eq!(view.cycle_progress, 75.0);
        assert_eq!(timer.api().calls().progress, 1);
    }
}
