//! # Scheduler: the single-owner admission loop.
//!
//! [`Scheduler`] exclusively owns the backlog, the counters, the cooldown
//! gate, and the timer set. Every mutation — submissions, attempt outcomes,
//! timer fires, resets — arrives as a [`Msg`] through one mailbox and is
//! processed serially, so no lock guards the state.
//!
//! ## Control flow
//! ```text
//! submit ──► Msg::Submit ──► admit / reject / start
//!                               │
//!            slot free + gate open + queue drained? ──► start(job)
//!                               │                          │
//!                               ▼                          ▼
//!                      enter_cooldown()          spawn: timeout(op.invoke())
//!                        (one-shot + tick)                 │
//!                                                          ▼
//!                                               Msg::Settled { job, outcome }
//!                                                          │
//!                  Ok ──► settle caller                    │
//!                  Err retryable ──► Msg::RetryDue after backoff (head re-insert)
//!                  Err terminal ──► settle caller          │
//!                                                          ▼
//!                                               rearm_cooldown() ──► Msg::CooldownOver ──► drain()
//! ```
//!
//! ## Rules
//! - At most one cooldown one-shot and one refresh tick are outstanding.
//!   One-shots carry the generation they were armed under; a message from a
//!   superseded timer is dropped on arrival.
//! - The gate records a boundary after **every** attempt, so execution starts
//!   are spaced by at least the configured cooldown.
//! - Attempt outcomes arriving after `reset()` are still delivered to their
//!   callers; outcomes arriving after disposal are dropped with the mailbox.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::config::LimiterConfig;
use crate::error::TaskError;
use crate::events::{Bus, Event, EventKind};

use super::cooldown::CooldownGate;
use super::job::Job;
use super::queue::BoundedQueue;
use super::retry::RetryPolicy;
use super::state::LimiterState;
use super::timers::{TimerHandle, TimerSet};

/// Refresh period for the observable `cooldown_remaining` projection.
const COOLDOWN_TICK: Duration = Duration::from_millis(100);

/// Everything the scheduler reacts to.
pub(crate) enum Msg<T> {
    /// A new submission from a caller.
    Submit(Job<T>),
    /// Drop the backlog, cancel timers, clear the gate.
    Reset,
    /// An execution attempt finished (value, failure, or timeout).
    Settled {
        job: Job<T>,
        outcome: Result<T, TaskError>,
    },
    /// A backoff delay elapsed; the task re-enters at the queue head.
    RetryDue(Job<T>),
    /// The cooldown one-shot fired; draining may resume. Carries the
    /// generation it was armed under so a superseded timer is ignored.
    CooldownOver(u64),
    /// Periodic refresh of the observable remaining time.
    CooldownTick,
}

/// Single-owner state machine behind a [`RateLimiter`](crate::RateLimiter).
pub(crate) struct Scheduler<T> {
    cfg: LimiterConfig,
    retry: RetryPolicy,
    queue: BoundedQueue<T>,
    gate: CooldownGate,
    active: usize,
    is_limited: bool,
    cooldown_remaining: Duration,

    timers: TimerSet<Msg<T>>,
    cooldown_timer: Option<TimerHandle>,
    cooldown_tick: Option<TimerHandle>,
    // Bumped on every arm/cancel; a one-shot that already reached the
    // mailbox can no longer be cancelled, so its message is matched against
    // this instead.
    cooldown_gen: u64,

    state: watch::Sender<LimiterState>,
    bus: Bus,
    tx: mpsc::UnboundedSender<Msg<T>>,
    token: CancellationToken,
}

impl<T: Send + 'static> Scheduler<T> {
    pub fn new(
        cfg: LimiterConfig,
        bus: Bus,
        state: watch::Sender<LimiterState>,
        tx: mpsc::UnboundedSender<Msg<T>>,
        token: CancellationToken,
    ) -> Self {
        Self {
            retry: RetryPolicy::from_config(&cfg),
            queue: BoundedQueue::new(cfg.max_queue_size),
            gate: CooldownGate::new(cfg.cooldown),
            active: 0,
            is_limited: false,
            cooldown_remaining: Duration::ZERO,
            timers: TimerSet::new(tx.clone(), token.clone()),
            cooldown_timer: None,
            cooldown_tick: None,
            cooldown_gen: 0,
            state,
            bus,
            tx,
            token,
            cfg,
        }
    }

    /// Processes the mailbox until disposal, then settles the backlog.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Msg<T>>) {
        loop {
            tokio::select! {
                _ = self.token.cancelled() => break,
                msg = rx.recv() => match msg {
                    Some(m) => self.handle(m),
                    None => break,
                },
            }
        }
        self.teardown();
    }

    fn handle(&mut self, msg: Msg<T>) {
        match msg {
            Msg::Submit(job) => self.on_submit(job),
            Msg::Reset => self.on_reset(),
            Msg::Settled { job, outcome } => self.on_settled(job, outcome),
            Msg::RetryDue(job) => self.on_retry_due(job),
            Msg::CooldownOver(gen) => self.on_cooldown_over(gen),
            Msg::CooldownTick => self.on_cooldown_tick(),
        }
    }

    // ---- submission ----

    fn on_submit(&mut self, job: Job<T>) {
        // Fast path: an idle limiter starts the task without queueing it, so
        // `max_queue_size` bounds waiting tasks only.
        if self.active < self.cfg.concurrency_limit()
            && self.queue.is_empty()
            && self.gate.is_open(Instant::now())
        {
            self.bus.publish(
                Event::now(EventKind::Submitted)
                    .with_pending(0)
                    .with_active(self.active),
            );
            self.start(job);
            self.publish_state();
            return;
        }

        match self.queue.admit(job) {
            Ok(()) => {
                self.bus.publish(
                    Event::now(EventKind::Submitted)
                        .with_pending(self.queue.len())
                        .with_active(self.active),
                );
                self.drain();
            }
            Err(job) => {
                self.bus
                    .publish(Event::now(EventKind::Rejected).with_pending(self.queue.len()));
                job.settle(Err(TaskError::QueueFull));
            }
        }
    }

    // ---- draining ----

    /// Starts head tasks while a slot is free and the gate is open.
    fn drain(&mut self) {
        while self.active < self.cfg.concurrency_limit() && !self.queue.is_empty() {
            let now = Instant::now();
            if !self.gate.is_open(now) {
                self.enter_cooldown(self.gate.remaining(now));
                break;
            }
            if let Some(job) = self.queue.pop() {
                self.start(job);
            }
        }
        self.publish_state();
    }

    fn start(&mut self, job: Job<T>) {
        self.active += 1;
        self.bus.publish(
            Event::now(EventKind::TaskStarting)
                .with_attempt(job.attempt)
                .with_active(self.active),
        );

        let timeout = self.cfg.timeout;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = match time::timeout(timeout, job.op.invoke()).await {
                Ok(res) => res,
                // Dropping the race loser cancels the attempt's future.
                Err(_elapsed) => Err(TaskError::Timeout { timeout }),
            };
            // Fails only when the scheduler is gone; the outcome is then
            // discarded and the caller observes cancellation.
            let _ = tx.send(Msg::Settled { job, outcome });
        });
    }

    // ---- settlement ----

    fn on_settled(&mut self, mut job: Job<T>, outcome: Result<T, TaskError>) {
        self.active = self.active.saturating_sub(1);
        self.gate.record(Instant::now());

        match outcome {
            Ok(value) => {
                self.bus
                    .publish(Event::now(EventKind::TaskStopped).with_attempt(job.attempt));
                job.settle(Ok(value));
            }
            Err(err) => match self.retry.decide(&err, job.attempt) {
                Some(delay) => {
                    self.bus.publish(
                        Event::now(EventKind::RetryScheduled)
                            .with_attempt(job.attempt)
                            .with_delay(delay)
                            .with_reason(err.to_string()),
                    );
                    job.attempt += 1;
                    // Handle intentionally not kept: retry timers die with the
                    // epoch on reset/teardown, dropping the job settles the
                    // caller with Canceled.
                    let _ = self.timers.once(delay, Msg::RetryDue(job));
                }
                None => {
                    match &err {
                        TaskError::Timeout { timeout } => {
                            self.bus.publish(
                                Event::now(EventKind::TimeoutHit)
                                    .with_attempt(job.attempt)
                                    .with_timeout(*timeout),
                            );
                        }
                        other => {
                            self.bus.publish(
                                Event::now(EventKind::TaskFailed)
                                    .with_attempt(job.attempt)
                                    .with_reason(other.to_string()),
                            );
                        }
                    }
                    job.settle(Err(err));
                }
            },
        }

        self.rearm_cooldown();
        self.publish_state();
    }

    fn on_retry_due(&mut self, job: Job<T>) {
        self.queue.requeue(job);
        self.drain();
    }

    // ---- cooldown ----

    /// Pre-dequeue path: the gate is still closed from a previous boundary.
    /// A pending cooldown is never restarted or duplicated here.
    fn enter_cooldown(&mut self, remaining: Duration) {
        self.is_limited = true;
        self.cooldown_remaining = remaining;

        if self.cooldown_timer.is_none() {
            self.cooldown_gen = self.cooldown_gen.wrapping_add(1);
            self.cooldown_timer = Some(
                self.timers
                    .once(remaining, Msg::CooldownOver(self.cooldown_gen)),
            );
            self.bus
                .publish(Event::now(EventKind::CooldownStarted).with_remaining(remaining));
        }
        if self.cooldown_tick.is_none() {
            self.cooldown_tick = Some(self.timers.every(COOLDOWN_TICK, || Msg::CooldownTick));
        }
    }

    /// Post-attempt path: the mandatory spacing restarts unconditionally.
    fn rearm_cooldown(&mut self) {
        if let Some(t) = self.cooldown_timer.take() {
            t.cancel();
        }
        if let Some(t) = self.cooldown_tick.take() {
            t.cancel();
        }

        self.is_limited = true;
        self.cooldown_remaining = self.cfg.cooldown;
        self.cooldown_gen = self.cooldown_gen.wrapping_add(1);
        self.cooldown_timer = Some(
            self.timers
                .once(self.cfg.cooldown, Msg::CooldownOver(self.cooldown_gen)),
        );
        self.cooldown_tick = Some(self.timers.every(COOLDOWN_TICK, || Msg::CooldownTick));
        self.bus.publish(
            Event::now(EventKind::CooldownStarted).with_remaining(self.cfg.cooldown),
        );
    }

    fn on_cooldown_over(&mut self, gen: u64) {
        // A settle can re-arm the cooldown in the same instant the previous
        // one-shot fires; the old message is already in the mailbox and must
        // not wipe the fresh cooldown.
        if gen != self.cooldown_gen {
            return;
        }
        self.cooldown_timer = None;
        if let Some(t) = self.cooldown_tick.take() {
            t.cancel();
        }
        self.is_limited = false;
        self.cooldown_remaining = Duration::ZERO;
        self.bus.publish(Event::now(EventKind::CooldownElapsed));
        self.drain();
    }

    fn on_cooldown_tick(&mut self) {
        self.cooldown_remaining = self.gate.remaining(Instant::now());
        if self.cooldown_remaining.is_zero() {
            if let Some(t) = self.cooldown_tick.take() {
                t.cancel();
            }
        }
        self.publish_state();
    }

    // ---- reset / teardown ----

    fn on_reset(&mut self) {
        self.timers.cancel_all();
        self.cooldown_timer = None;
        self.cooldown_tick = None;
        self.cooldown_gen = self.cooldown_gen.wrapping_add(1);

        let mut dropped = 0usize;
        for job in self.queue.drain() {
            dropped += 1;
            job.settle(Err(TaskError::Canceled));
        }

        self.active = 0;
        self.gate.clear();
        self.is_limited = false;
        self.cooldown_remaining = Duration::ZERO;

        self.bus
            .publish(Event::now(EventKind::ResetIssued).with_pending(dropped));
        self.publish_state();
    }

    /// Final cleanup once the mailbox is closed or the limiter is disposed.
    /// No timer outlives this: the root token has already been cancelled or
    /// the epoch is cancelled here.
    fn teardown(&mut self) {
        self.timers.cancel_all();
        self.cooldown_timer = None;
        self.cooldown_tick = None;
        self.cooldown_gen = self.cooldown_gen.wrapping_add(1);

        for job in self.queue.drain() {
            job.settle(Err(TaskError::Canceled));
        }
        self.active = 0;
        self.is_limited = false;
        self.cooldown_remaining = Duration::ZERO;
        self.publish_state();
    }

    fn publish_state(&self) {
        let _ = self.state.send(LimiterState {
            is_limited: self.is_limited,
            cooldown_remaining: self.cooldown_remaining,
            pending_count: self.queue.len(),
            active_count: self.active,
        });
    }
}
