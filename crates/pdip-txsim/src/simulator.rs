//! # Confirmation State Machine
//!
//! The staged lifecycle of one simulated ledger submission. Stages are
//! sequential and time-driven; `Failed` is reachable from every
//! non-terminal stage. A simulator instance runs exactly one submission:
//! there are no retries, and a started run cannot be cancelled.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use pdip_core::{ContentDigest, Timestamp};

use crate::clock::{Clock, SystemClock};

// ─── Stages ──────────────────────────────────────────────────────────

/// The stages of a simulated transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxStage {
    /// Submission has not started.
    Idle,
    /// Hashing the payload and committing to it.
    Committing,
    /// Producing the proof for the committed payload.
    ProofGeneration,
    /// Handing the transaction to the (simulated) network.
    Broadcasting,
    /// The transaction is confirmed (terminal).
    Confirmed,
    /// The transaction failed (terminal).
    Failed,
}

impl TxStage {
    /// The next stage on the success path, if any.
    pub fn next(&self) -> Option<TxStage> {
        match self {
            Self::Idle => Some(Self::Committing),
            Self::Committing => Some(Self::ProofGeneration),
            Self::ProofGeneration => Some(Self::Broadcasting),
            Self::Broadcasting => Some(Self::Confirmed),
            Self::Confirmed | Self::Failed => None,
        }
    }

    /// Whether this stage is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }
}

impl std::fmt::Display for TxStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "IDLE",
            Self::Committing => "COMMITTING",
            Self::ProofGeneration => "PROOF_GENERATION",
            Self::Broadcasting => "BROADCASTING",
            Self::Confirmed => "CONFIRMED",
            Self::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from a simulated submission. Both are terminal: the machine is
/// left in `Failed` and the instance cannot be reused.
#[derive(Error, Debug)]
pub enum TxError {
    /// The submission failed at the given stage.
    #[error("transaction failed at {stage}: {reason}")]
    Failed {
        /// The stage at which the failure surfaced.
        stage: TxStage,
        /// Why it failed.
        reason: String,
    },

    /// Confirmation polling exhausted its attempt budget.
    #[error("transaction timed out after {attempts} confirmation poll attempts")]
    Timeout {
        /// How many polls were made before giving up.
        attempts: u32,
    },

    /// `submit` was called on a simulator that already ran.
    #[error("simulator already ran to {stage}; submissions are single-use")]
    NotIdle {
        /// The stage the machine is stuck at.
        stage: TxStage,
    },
}

// ─── Timing ──────────────────────────────────────────────────────────

/// Per-stage pause schedule.
///
/// `jitter` of zero gives fixed delays; a nonzero jitter adds a uniform
/// random extra pause per stage, which is what makes demo runs feel like
/// a real network.
#[derive(Debug, Clone)]
pub struct DelaySchedule {
    /// Pause before entering `Committing`.
    pub committing: Duration,
    /// Pause before entering `ProofGeneration`.
    pub proof_generation: Duration,
    /// Pause before entering `Broadcasting`.
    pub broadcasting: Duration,
    /// Pause between confirmation polls.
    pub poll_interval: Duration,
    /// Upper bound of the random extra pause per stage.
    pub jitter: Duration,
}

impl Default for DelaySchedule {
    fn default() -> Self {
        Self {
            committing: Duration::from_millis(400),
            proof_generation: Duration::from_millis(900),
            broadcasting: Duration::from_millis(600),
            poll_interval: Duration::from_millis(250),
            jitter: Duration::ZERO,
        }
    }
}

impl DelaySchedule {
    /// A schedule with the given jitter bound on top of the defaults.
    pub fn with_jitter(jitter: Duration) -> Self {
        Self {
            jitter,
            ..Self::default()
        }
    }

    fn entry_delay(&self, stage: TxStage) -> Duration {
        let base = match stage {
            TxStage::Committing => self.committing,
            TxStage::ProofGeneration => self.proof_generation,
            TxStage::Broadcasting => self.broadcasting,
            _ => Duration::ZERO,
        };
        base + self.sample_jitter()
    }

    fn sample_jitter(&self) -> Duration {
        if self.jitter.is_zero() {
            return Duration::ZERO;
        }
        let bound = self.jitter.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(0..=bound))
    }
}

// ─── Records ─────────────────────────────────────────────────────────

/// Unique identifier of one simulated transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId(pub Uuid);

impl TxId {
    /// Generate a new random transaction identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TxId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tx:{}", self.0)
    }
}

/// One recorded stage transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxTransition {
    /// Stage before the transition.
    pub from: TxStage,
    /// Stage after the transition.
    pub to: TxStage,
    /// When the transition happened.
    pub at: Timestamp,
}

/// The result of a confirmed submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Identifier of this transaction.
    pub tx_id: TxId,
    /// The content digest the transaction anchored.
    pub subject: ContentDigest,
    /// When confirmation was reached.
    pub confirmed_at: Timestamp,
    /// The full ordered transition log.
    pub transitions: Vec<TxTransition>,
}

// ─── Simulator ───────────────────────────────────────────────────────

/// The time-driven confirmation state machine.
///
/// Observers subscribed before `submit` see every transition as it
/// happens, which is how a caller renders live progress.
pub struct TxSimulator<C: Clock = SystemClock> {
    stage: TxStage,
    delays: DelaySchedule,
    clock: C,
    polls_until_confirmed: u32,
    max_poll_attempts: u32,
    fault: Option<(TxStage, String)>,
    observers: Vec<Box<dyn Fn(&TxTransition)>>,
    transitions: Vec<TxTransition>,
}

impl TxSimulator<SystemClock> {
    /// A simulator with real pauses and the default schedule.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for TxSimulator<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TxSimulator<C> {
    /// A simulator driven by the given clock.
    pub fn with_clock(clock: C) -> Self {
        Self {
            stage: TxStage::Idle,
            delays: DelaySchedule::default(),
            clock,
            polls_until_confirmed: 3,
            max_poll_attempts: 10,
            fault: None,
            observers: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Replace the delay schedule.
    pub fn delays(mut self, delays: DelaySchedule) -> Self {
        self.delays = delays;
        self
    }

    /// How many confirmation polls succeed (simulated network latency).
    pub fn confirm_after(mut self, polls: u32) -> Self {
        self.polls_until_confirmed = polls;
        self
    }

    /// Maximum confirmation polls before giving up.
    pub fn poll_limit(mut self, max_poll_attempts: u32) -> Self {
        self.max_poll_attempts = max_poll_attempts;
        self
    }

    /// Inject a fault: the run fails on entering the given stage.
    pub fn fail_at(mut self, stage: TxStage, reason: impl Into<String>) -> Self {
        self.fault = Some((stage, reason.into()));
        self
    }

    /// Subscribe an observer to stage transitions.
    pub fn subscribe(&mut self, observer: impl Fn(&TxTransition) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// The current stage.
    pub fn stage(&self) -> TxStage {
        self.stage
    }

    /// The driving clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The ordered transition log so far.
    pub fn transitions(&self) -> &[TxTransition] {
        &self.transitions
    }

    /// Run one submission to its terminal stage.
    ///
    /// Walks `Committing → ProofGeneration → Broadcasting`, pausing per
    /// the schedule, then polls for confirmation. Errors leave the machine
    /// in `Failed`; there is no retry and no way to reuse the instance.
    pub fn submit(&mut self, subject: ContentDigest) -> Result<TxReceipt, TxError> {
        if self.stage != TxStage::Idle {
            return Err(TxError::NotIdle { stage: self.stage });
        }
        let tx_id = TxId::new();
        tracing::debug!(%tx_id, subject = %subject, "submission started");

        for stage in [
            TxStage::Committing,
            TxStage::ProofGeneration,
            TxStage::Broadcasting,
        ] {
            self.clock.sleep(self.delays.entry_delay(stage));
            self.advance(stage);
            if let Some(reason) = self.fault_for(stage) {
                self.advance(TxStage::Failed);
                return Err(TxError::Failed { stage, reason });
            }
        }

        let mut attempts = 0u32;
        loop {
            if attempts >= self.max_poll_attempts {
                self.advance(TxStage::Failed);
                return Err(TxError::Timeout { attempts });
            }
            attempts += 1;
            self.clock.sleep(self.delays.poll_interval);
            if attempts >= self.polls_until_confirmed {
                break;
            }
        }
        self.advance(TxStage::Confirmed);

        let confirmed_at = self
            .transitions
            .last()
            .map(|t| t.at)
            .unwrap_or_else(Timestamp::now);
        tracing::debug!(%tx_id, attempts, "submission confirmed");
        Ok(TxReceipt {
            tx_id,
            subject,
            confirmed_at,
            transitions: self.transitions.clone(),
        })
    }

    fn fault_for(&self, stage: TxStage) -> Option<String> {
        self.fault
            .as_ref()
            .filter(|(at, _)| *at == stage)
            .map(|(_, reason)| reason.clone())
    }

    fn advance(&mut self, to: TxStage) {
        let transition = TxTransition {
            from: self.stage,
            to,
            at: Timestamp::now(),
        };
        tracing::debug!(from = %transition.from, to = %transition.to, "stage transition");
        self.stage = to;
        self.transitions.push(transition);
        for observer in &self.observers {
            observer(&transition);
        }
    }
}

impl<C: Clock> std::fmt::Debug for TxSimulator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxSimulator")
            .field("stage", &self.stage)
            .field("transitions", &self.transitions.len())
            .finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
