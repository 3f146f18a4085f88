//! Simulated progress: a cosmetic, time-driven indicator per action.
//!
//! The simulation knows nothing about the real operation. It ticks toward 100%
//! over a fixed duration and is settled by the caller: `force_complete` when
//! the operation succeeds early, `stop` when it fails.
//!
//! # Sessions
//! One session per `Action`. Starting a session for an action that already has
//! one cancels the previous ticking task first, so two timers never race on the
//! same indicator. Ticks and settlements publish under the session's publish
//! lock, and a canceled session never publishes again.
//!
//! Each session is identified by a `ProgressTicket`; settling with a stale
//! ticket is a no-op, which lets a superseded operation finish without
//! touching the newer session.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::debug;
use uuid::Uuid;

use crate::display::{lock, DisplaySurface, ProgressUpdate};
use crate::errors::WorkflowError;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(30_000);
pub const DEFAULT_TICK: Duration = Duration::from_millis(400);

/// The three user-triggered operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    ProfileAnalysis,
    JobAnalysis,
    Match,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::ProfileAnalysis, Action::JobAnalysis, Action::Match];

    /// Progress indicator target; also the action's identifier.
    pub fn progress_target(&self) -> &'static str {
        match self {
            Action::ProfileAnalysis => "profile-analysis",
            Action::JobAnalysis => "job-analysis",
            Action::Match => "match",
        }
    }

    /// Result area target.
    pub fn result_target(&self) -> &'static str {
        match self {
            Action::ProfileAnalysis => "profile-result",
            Action::JobAnalysis => "job-result",
            Action::Match => "match-result",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.progress_target())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPhase {
    Idle,
    Running,
    Completed,
    Stopped,
}

/// Simulated duration and tick interval. The tick is never zero.
#[derive(Debug, Clone, Copy)]
pub struct ProgressConfig {
    duration: Duration,
    tick: Duration,
}

impl ProgressConfig {
    pub fn new(duration: Duration, tick: Duration) -> Result<Self> {
        if tick.is_zero() {
            bail!("progress tick interval must be greater than zero");
        }
        Ok(Self { duration, tick })
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// `duration / tick`, at least one step.
    pub fn total_steps(&self) -> u32 {
        let steps = self.duration.as_millis() / self.tick.as_millis().max(1);
        u32::try_from(steps).unwrap_or(u32::MAX).max(1)
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            tick: DEFAULT_TICK,
        }
    }
}

/// Identifies one progress session of one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressTicket {
    pub action: Action,
    pub id: Uuid,
}

/// State shared between a session and its ticking task. `canceled` and
/// `finished` only change while `publish` is held.
#[derive(Debug, Default)]
struct TickState {
    step: AtomicU32,
    canceled: AtomicBool,
    finished: AtomicBool,
    publish: Mutex<()>,
}

struct Session {
    id: Uuid,
    phase: ProgressPhase,
    ticks: Arc<TickState>,
    handle: JoinHandle<()>,
}

impl Session {
    /// Marks the session canceled and stops its task. A tick already past
    /// its await finishes publishing before this returns, and none follow.
    fn cancel(&self) {
        let _publishing = lock(&self.ticks.publish);
        self.ticks.canceled.store(true, Ordering::SeqCst);
        self.handle.abort();
    }

    fn phase(&self) -> ProgressPhase {
        if self.phase == ProgressPhase::Running && self.ticks.finished.load(Ordering::SeqCst) {
            ProgressPhase::Completed
        } else {
            self.phase
        }
    }
}

pub struct ProgressSimulator {
    config: ProgressConfig,
    display: Arc<dyn DisplaySurface>,
    sessions: HashMap<Action, Session>,
}

impl ProgressSimulator {
    pub fn new(config: ProgressConfig, display: Arc<dyn DisplaySurface>) -> Self {
        Self {
            config,
            display,
            sessions: HashMap::new(),
        }
    }

    /// Starts ticking for `action`, replacing any session it already has.
    /// Fails if the display has no progress target for the action.
    pub fn start(&mut self, action: Action) -> Result<ProgressTicket, WorkflowError> {
        let target = action.progress_target();
        if !self.display.has_target(target) {
            return Err(WorkflowError::Configuration(target.to_string()));
        }

        if let Some(previous) = self.sessions.remove(&action) {
            debug!("{action}: replacing progress session {}", previous.id);
            previous.cancel();
        }

        let ticks = Arc::new(TickState::default());
        self.display
            .publish_progress(target, ProgressUpdate::running(0));

        let handle = tokio::spawn(run_ticks(
            target,
            Arc::clone(&ticks),
            Arc::clone(&self.display),
            self.config.total_steps(),
            self.config.tick(),
        ));

        let id = Uuid::new_v4();
        self.sessions.insert(
            action,
            Session {
                id,
                phase: ProgressPhase::Running,
                ticks,
                handle,
            },
        );
        debug!("{action}: progress session {id} started");
        Ok(ProgressTicket { action, id })
    }

    /// Publishes 100% and stops ticking. Returns false if the ticket is stale
    /// or its session has already settled.
    pub fn force_complete(&mut self, ticket: &ProgressTicket) -> bool {
        self.settle(ticket, ProgressPhase::Completed, ProgressUpdate::completed())
    }

    /// Stops ticking and resets the indicator. Returns false if the ticket is
    /// stale or its session has already settled.
    pub fn stop(&mut self, ticket: &ProgressTicket) -> bool {
        self.settle(ticket, ProgressPhase::Stopped, ProgressUpdate::stopped())
    }

    fn settle(&mut self, ticket: &ProgressTicket, phase: ProgressPhase, update: ProgressUpdate) -> bool {
        let Some(session) = self.sessions.get_mut(&ticket.action) else {
            return false;
        };
        if session.id != ticket.id {
            return false;
        }
        let ticks = Arc::clone(&session.ticks);
        let _publishing = lock(&ticks.publish);
        if session.phase != ProgressPhase::Running || ticks.finished.load(Ordering::SeqCst) {
            return false;
        }
        ticks.canceled.store(true, Ordering::SeqCst);
        session.handle.abort();
        session.phase = phase;
        self.display
            .publish_progress(ticket.action.progress_target(), update);
        true
    }

    /// Whether `ticket` still names the latest session of its action.
    pub fn is_current(&self, ticket: &ProgressTicket) -> bool {
        self.sessions
            .get(&ticket.action)
            .is_some_and(|s| s.id == ticket.id)
    }

    pub fn phase(&self, action: Action) -> ProgressPhase {
        self.sessions
            .get(&action)
            .map(Session::phase)
            .unwrap_or(ProgressPhase::Idle)
    }

    /// Ticks elapsed in the action's latest session.
    pub fn step(&self, action: Action) -> Option<u32> {
        self.sessions
            .get(&action)
            .map(|s| s.ticks.step.load(Ordering::SeqCst))
    }
}

impl Drop for ProgressSimulator {
    fn drop(&mut self) {
        for session in self.sessions.values() {
            session.cancel();
        }
    }
}

async fn run_ticks(
    target: &'static str,
    ticks: Arc<TickState>,
    display: Arc<dyn DisplaySurface>,
    total_steps: u32,
    period: Duration,
) {
    let mut interval = interval_at(Instant::now() + period, period);
    loop {
        interval.tick().await;
        let _publishing = lock(&ticks.publish);
        if ticks.canceled.load(Ordering::SeqCst) {
            break;
        }
        let step = ticks.step.fetch_add(1, Ordering::SeqCst) + 1;
        if step >= total_steps {
            ticks.finished.store(true, Ordering::SeqCst);
            display.publish_progress(target, ProgressUpdate::completed());
            break;
        }
        display.publish_progress(target, ProgressUpdate::running(percentage(step, total_steps)));
    }
}

/// `floor(step / total * 100)`, capped at 100.
fn percentage(step: u32, total_steps: u32) -> u8 {
    let pct = u64::from(step) * 100 / u64::from(total_steps.max(1));
    pct.min(100) as u8
}
