//! Per-light actor: the effect engine's scheduler.
//!
//! Each light gets exactly one runner task. The runner is the only
//! holder of the light's command channel, which gives it exclusive
//! scheduling authority: at most one effect task and at most one
//! keep-alive task exist per light at any time. Cancellation is
//! cooperative — the cancel signal is observed before every frame
//! write and during every dwell — and a cancelled or completed effect
//! always drives the light dark before its completion signal fires.
//!
//! Error recovery is delegated to [`Light::write_frames`] (close,
//! reopen, retry once); whatever error comes back from there is
//! terminal and the runner reports the light to the registry for
//! removal. On removal no dark write is attempted.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::color::LedIndex;
use crate::driver::KeepAlive;
use crate::effect::{Effect, Priority};
use crate::light::{CommandedState, Light, LightId};
use statuslight_errors::TransportError;

/// Upper bound on waiting for a finaliser before abandoning the task.
const FINALIZE_TIMEOUT: Duration = Duration::from_secs(2);

/// Result of submitting an effect to a runner.
pub enum ApplyOutcome {
    /// The effect was accepted; the handle resolves when its task has
    /// fully finished (finaliser included).
    Started(CompletionHandle),
    /// The effect was not started.
    Rejected {
        reason: &'static str,
    },
}

/// Completion signal of one accepted effect.
pub struct CompletionHandle(oneshot::Receiver<()>);

impl CompletionHandle {
    fn ready() -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(());
        Self(rx)
    }

    /// Wait for the task (and its finaliser) to finish.
    pub async fn wait(self) {
        let _ = self.0.await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CancelKind {
    /// Not cancelled.
    Run,
    /// Cancel and drive the light dark.
    Dark,
    /// Cancel without touching the transport (device removed).
    Drop,
}

enum Command {
    Apply {
        effect: Effect,
        done: oneshot::Sender<ApplyOutcome>,
    },
    Stop {
        done: oneshot::Sender<()>,
    },
    Shutdown {
        drive_dark: bool,
        done: oneshot::Sender<()>,
    },
}

enum TaskEvent {
    /// Natural completion of the effect task with this generation.
    /// Stale generations (the task was already replaced) are ignored.
    Finished { generation: u64 },
    Failed(TransportError),
}

struct RunningTask {
    name: &'static str,
    priority: Priority,
    generation: u64,
    cancel: watch::Sender<CancelKind>,
    join: JoinHandle<()>,
}

struct KeepAliveTask {
    cancel: watch::Sender<CancelKind>,
    join: JoinHandle<()>,
}

/// Handle to one light's runner task.
pub struct LightRunner {
    cmd_tx: mpsc::UnboundedSender<Command>,
    join: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

impl LightRunner {
    /// Spawn the actor for `light`.
    ///
    /// `failures` receives the light's id when a write error exhausts
    /// recovery; the registry reacts by dropping the light.
    pub fn spawn(
        light: Arc<Light>,
        default_dwell: Duration,
        failures: mpsc::UnboundedSender<LightId>,
    ) -> Arc<Self> {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let actor = Actor {
            light,
            default_dwell,
            failures,
            events_tx,
            current: None,
            keepalive: None,
            failed: false,
            generation: 0,
        };
        let join = tokio::spawn(actor.run(cmd_rx, events_rx));
        Arc::new(Self {
            cmd_tx,
            join: parking_lot::Mutex::new(Some(join)),
        })
    }

    /// Submit an effect. Resolves once the effect is running (or, for
    /// the degenerate steady effect, once its write has landed).
    pub async fn apply(&self, effect: Effect) -> ApplyOutcome {
        let (done, rx) = oneshot::channel();
        if self.cmd_tx.send(Command::Apply { effect, done }).is_err() {
            return ApplyOutcome::Rejected {
                reason: "runner stopped",
            };
        }
        rx.await.unwrap_or(ApplyOutcome::Rejected {
            reason: "runner stopped",
        })
    }

    /// Cancel everything and drive the light dark. Resolves after the
    /// finaliser has run.
    pub async fn stop(&self) {
        let (done, rx) = oneshot::channel();
        if self.cmd_tx.send(Command::Stop { done }).is_ok() {
            let _ = rx.await;
        }
    }

    /// Terminate the runner. With `drive_dark` the light is quiesced
    /// first; without (device removed) the transport is not touched.
    pub async fn shutdown(&self, drive_dark: bool) {
        let (done, rx) = oneshot::channel();
        if self.cmd_tx.send(Command::Shutdown { drive_dark, done }).is_ok() {
            let _ = tokio::time::timeout(FINALIZE_TIMEOUT + Duration::from_secs(1), rx).await;
        }
        if let Some(join) = self.join.lock().take() {
            join.abort();
        }
    }
}

struct Actor {
    light: Arc<Light>,
    default_dwell: Duration,
    failures: mpsc::UnboundedSender<LightId>,
    events_tx: mpsc::UnboundedSender<TaskEvent>,
    current: Option<RunningTask>,
    keepalive: Option<KeepAliveTask>,
    failed: bool,
    generation: u64,
}

impl Actor {
    async fn run(
        mut self,
        mut cmd_rx: mpsc::UnboundedReceiver<Command>,
        mut events_rx: mpsc::UnboundedReceiver<TaskEvent>,
    ) {
        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => match cmd {
                    Some(Command::Apply { effect, done }) => self.handle_apply(effect, done).await,
                    Some(Command::Stop { done }) => {
                        self.quiesce(true).await;
                        let _ = done.send(());
                    }
                    Some(Command::Shutdown { drive_dark, done }) => {
                        self.quiesce(drive_dark).await;
                        let _ = done.send(());
                        return;
                    }
                    None => {
                        self.quiesce(false).await;
                        return;
                    }
                },
                Some(event) = events_rx.recv() => self.handle_event(event).await,
            }
        }
    }

    async fn handle_apply(&mut self, effect: Effect, done: oneshot::Sender<ApplyOutcome>) {
        if self.failed || self.light.is_failed() {
            let _ = done.send(ApplyOutcome::Rejected {
                reason: "light failed",
            });
            return;
        }

        // LED indices beyond the device are clamped away: warned
        // no-op, transport untouched.
        let led_count = self.light.identity().led_count;
        if !effect.led.is_all() && effect.led.0 > led_count {
            warn!(
                light = %self.light.id(),
                led = effect.led.0,
                led_count,
                "led index out of range, ignoring"
            );
            let _ = done.send(ApplyOutcome::Started(CompletionHandle::ready()));
            return;
        }

        // Priority gate: strictly lower than the running task loses;
        // equal or higher replaces (last writer wins).
        if let Some(task) = &self.current {
            if effect.priority < task.priority {
                debug!(
                    light = %self.light.id(),
                    incoming = effect.name(),
                    running = task.name,
                    "rejected by priority"
                );
                let _ = done.send(ApplyOutcome::Rejected {
                    reason: "lower priority than running task",
                });
                return;
            }
        }
        self.cancel_current(CancelKind::Dark).await;

        let effect = match self.light.identity().color_depth {
            crate::driver::ColorDepth::ThreeBit => effect.quantized(),
            crate::driver::ColorDepth::TrueColor => effect,
        };

        // The steady effect never runs as a task: one write, plus the
        // keep-alive when the firmware needs it.
        if let Some(color) = effect.steady_color() {
            let led = effect.led;
            let frames = if color.is_dark() {
                self.light.driver().encode_off(led)
            } else {
                self.light.driver().encode_solid(color, led)
            };
            match self.light.write_frames(&frames).await {
                Ok(()) => {
                    self.light.remember_color(led, color);
                    self.light.set_renewal(frames);
                    self.light.set_state(CommandedState::Solid(color));
                    self.ensure_keepalive();
                    let _ = done.send(ApplyOutcome::Started(CompletionHandle::ready()));
                }
                Err(err) => {
                    let _ = done.send(ApplyOutcome::Rejected {
                        reason: "write failed",
                    });
                    self.fail(err).await;
                }
            }
            return;
        }

        // Hardware blink, when the firmware has it and the blink is
        // open-ended. Counted blinks are synthesised so the count is
        // exact.
        if effect.repeat_count == 0 {
            if let Some((on, off, speed)) = effect.blink_params() {
                if let Some(frames) = self.light.driver().encode_blink_native(on, off, speed) {
                    match self.light.write_frames(&frames).await {
                        Ok(()) => {
                            self.light.remember_color(effect.led, on);
                            self.light.set_renewal(frames);
                            self.light.set_state(CommandedState::Effect(effect.name()));
                            self.ensure_keepalive();
                            let _ = done.send(ApplyOutcome::Started(
                                self.park_native_task(effect.name(), effect.priority, effect.led),
                            ));
                        }
                        Err(err) => {
                            let _ = done.send(ApplyOutcome::Rejected {
                                reason: "write failed",
                            });
                            self.fail(err).await;
                        }
                    }
                    return;
                }
            }
        }

        // Engine-synthesised frame sequence.
        let (cancel_tx, cancel_rx) = watch::channel(CancelKind::Run);
        let (completion_tx, completion_rx) = oneshot::channel();
        let name = effect.name();
        let priority = effect.priority;
        self.generation += 1;
        let generation = self.generation;
        self.light.set_state(CommandedState::Effect(name));
        let join = tokio::spawn(effect_loop(
            Arc::clone(&self.light),
            effect,
            self.default_dwell,
            generation,
            cancel_rx,
            self.events_tx.clone(),
            completion_tx,
        ));
        self.current = Some(RunningTask {
            name,
            priority,
            generation,
            cancel: cancel_tx,
            join,
        });
        self.ensure_keepalive();
        let _ = done.send(ApplyOutcome::Started(CompletionHandle(completion_rx)));
    }

    /// Park a task representing a hardware-executed effect: it does
    /// nothing until cancelled, then drives the light dark.
    fn park_native_task(
        &mut self,
        name: &'static str,
        priority: Priority,
        led: LedIndex,
    ) -> CompletionHandle {
        let (cancel_tx, cancel_rx) = watch::channel(CancelKind::Run);
        let (completion_tx, completion_rx) = oneshot::channel();
        self.generation += 1;
        let join = tokio::spawn(native_hold(
            Arc::clone(&self.light),
            led,
            cancel_rx,
            completion_tx,
        ));
        self.current = Some(RunningTask {
            name,
            priority,
            generation: self.generation,
            cancel: cancel_tx,
            join,
        });
        CompletionHandle(completion_rx)
    }

    async fn handle_event(&mut self, event: TaskEvent) {
        match event {
            TaskEvent::Finished { generation } => {
                let is_current = self
                    .current
                    .as_ref()
                    .is_some_and(|task| task.generation == generation);
                if !is_current {
                    // Completion raced a replacement; nothing to do.
                    return;
                }
                if let Some(task) = self.current.take() {
                    let abort = task.join.abort_handle();
                    if tokio::time::timeout(FINALIZE_TIMEOUT, task.join).await.is_err() {
                        abort.abort();
                    }
                }
                // The finaliser already drove the light dark.
                self.stop_keepalive().await;
            }
            TaskEvent::Failed(err) => self.fail(err).await,
        }
    }

    /// Cancel the running task (if any) and wait, bounded, for its
    /// finaliser.
    async fn cancel_current(&mut self, kind: CancelKind) {
        if let Some(task) = self.current.take() {
            let _ = task.cancel.send(kind);
            let abort = task.join.abort_handle();
            if tokio::time::timeout(FINALIZE_TIMEOUT, task.join).await.is_err() {
                warn!(light = %self.light.id(), task = task.name, "finaliser timed out, abandoning");
                abort.abort();
            }
        }
    }

    async fn stop_keepalive(&mut self) {
        if let Some(task) = self.keepalive.take() {
            let _ = task.cancel.send(CancelKind::Drop);
            let abort = task.join.abort_handle();
            if tokio::time::timeout(FINALIZE_TIMEOUT, task.join).await.is_err() {
                abort.abort();
            }
        }
    }

    fn ensure_keepalive(&mut self) {
        if self.keepalive.is_some() {
            return;
        }
        let KeepAlive::Stateful { interval } = self.light.identity().keepalive else {
            return;
        };
        // Half-period rule: one missed renewal still leaves a retry
        // before the firmware quiesces.
        let period = interval / 2;
        let (cancel_tx, cancel_rx) = watch::channel(CancelKind::Run);
        let join = tokio::spawn(keepalive_loop(
            Arc::clone(&self.light),
            period,
            cancel_rx,
            self.events_tx.clone(),
        ));
        self.keepalive = Some(KeepAliveTask {
            cancel: cancel_tx,
            join,
        });
    }

    /// Cancel everything; with `drive_dark`, leave the device dark.
    async fn quiesce(&mut self, drive_dark: bool) {
        self.cancel_current(if drive_dark {
            CancelKind::Dark
        } else {
            CancelKind::Drop
        })
        .await;
        self.stop_keepalive().await;

        if drive_dark && !self.failed {
            let leftover = !self.light.remembered_colors().is_empty()
                || !matches!(self.light.commanded_state(), CommandedState::Off);
            if leftover {
                let frames = self.light.driver().encode_off(LedIndex::ALL);
                let _ = self.light.write_frames(&frames).await;
                self.light.forget_colors(LedIndex::ALL);
                self.light.clear_renewal();
                self.light.set_state(CommandedState::Off);
            }
        }
    }

    /// Terminal write failure: mark, cancel without touching the
    /// transport, and report to the registry.
    async fn fail(&mut self, err: TransportError) {
        if self.failed {
            return;
        }
        self.failed = true;
        error!(light = %self.light.id(), error = %err, "write recovery exhausted, dropping light");
        self.light.mark_failed();
        self.cancel_current(CancelKind::Drop).await;
        self.stop_keepalive().await;
        self.light.set_state(CommandedState::Off);
        let _ = self.failures.send(self.light.id());
    }
}

enum LoopOutcome {
    Finished,
    Cancelled(CancelKind),
    Failed(TransportError),
}

fn cancel_state(cancel: &watch::Receiver<CancelKind>) -> CancelKind {
    *cancel.borrow()
}

/// Drive one synthesised effect: emit each cycle's frames with their
/// dwells, observing cancellation before every write and during every
/// dwell, then finalise.
async fn effect_loop(
    light: Arc<Light>,
    effect: Effect,
    default_dwell: Duration,
    generation: u64,
    mut cancel: watch::Receiver<CancelKind>,
    events: mpsc::UnboundedSender<TaskEvent>,
    completion: oneshot::Sender<()>,
) {
    let led = effect.led;
    let outcome = run_cycles(&light, &effect, default_dwell, &mut cancel).await;
    match outcome {
        LoopOutcome::Failed(err) => {
            let _ = completion.send(());
            let _ = events.send(TaskEvent::Failed(err));
        }
        LoopOutcome::Cancelled(CancelKind::Drop) => {
            let _ = completion.send(());
        }
        LoopOutcome::Cancelled(_) | LoopOutcome::Finished => {
            // Finaliser: never leave the light in a random colour.
            let frames = light.driver().encode_off(led);
            let _ = light.write_frames(&frames).await;
            light.forget_colors(led);
            light.clear_renewal();
            light.set_state(CommandedState::Off);
            let finished = matches!(outcome, LoopOutcome::Finished);
            let _ = completion.send(());
            if finished {
                let _ = events.send(TaskEvent::Finished { generation });
            }
        }
    }
}

async fn run_cycles(
    light: &Arc<Light>,
    effect: &Effect,
    default_dwell: Duration,
    cancel: &mut watch::Receiver<CancelKind>,
) -> LoopOutcome {
    let cycle = effect.cycle(default_dwell);
    let led = effect.led;
    let mut cycles_done: u32 = 0;

    loop {
        for frame in &cycle {
            match cancel_state(cancel) {
                CancelKind::Run => {}
                kind => return LoopOutcome::Cancelled(kind),
            }

            let frames = if frame.color.is_dark() {
                light.driver().encode_off(led)
            } else {
                light.driver().encode_solid(frame.color, led)
            };
            if let Err(err) = light.write_frames(&frames).await {
                return LoopOutcome::Failed(err);
            }
            light.remember_color(led, frame.color);
            light.set_renewal(frames);

            if !frame.dwell.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(frame.dwell) => {}
                    _ = cancel.changed() => {
                        // A cancelled dwell completes immediately; the
                        // top of the loop routes to the finaliser.
                    }
                }
            }
        }

        cycles_done += 1;
        if effect.repeat_count > 0 && cycles_done >= effect.repeat_count {
            return LoopOutcome::Finished;
        }
    }
}

/// Task body for hardware-executed effects: wait for cancellation,
/// then run the usual finaliser.
async fn native_hold(
    light: Arc<Light>,
    led: LedIndex,
    mut cancel: watch::Receiver<CancelKind>,
    completion: oneshot::Sender<()>,
) {
    let kind = loop {
        if cancel.changed().await.is_err() {
            break CancelKind::Dark;
        }
        match cancel_state(&cancel) {
            CancelKind::Run => continue,
            kind => break kind,
        }
    };
    if kind != CancelKind::Drop {
        let frames = light.driver().encode_off(led);
        let _ = light.write_frames(&frames).await;
        light.forget_colors(led);
        light.clear_renewal();
        light.set_state(CommandedState::Off);
    }
    let _ = completion.send(());
}

/// Keep-alive task: every half interval, re-assert the current state
/// and extend the firmware watchdog.
async fn keepalive_loop(
    light: Arc<Light>,
    period: Duration,
    mut cancel: watch::Receiver<CancelKind>,
    events: mpsc::UnboundedSender<TaskEvent>,
) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(period) => {}
            _ = cancel.changed() => return,
        }
        if cancel_state(&cancel) != CancelKind::Run {
            return;
        }

        let mut frames = light.renewal_frames();
        if let Some(watchdog) = light.driver().encode_keepalive() {
            frames.push(watchdog);
        }
        if frames.is_empty() {
            continue;
        }
        if let Err(err) = light.write_frames(&frames).await {
            let _ = events.send(TaskEvent::Failed(err));
            return;
        }
    }
}
