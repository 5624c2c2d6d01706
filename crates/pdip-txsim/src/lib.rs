//! # pdip-txsim — Transaction Status Simulator
//!
//! Models the asynchronous confirmation latency of a ledger submission
//! without any network or consensus: an explicit state machine walks
//! `Idle → Committing → ProofGeneration → Broadcasting → Confirmed`,
//! pausing per a configurable delay schedule and reporting every
//! transition to subscribed observers.
//!
//! Timing is injectable: [`SystemClock`] sleeps the thread for realistic
//! pacing, [`InstantClock`] returns immediately so tests run
//! synchronously. Confirmation is a bounded poll loop, and a configured
//! fault drives the machine to the terminal `Failed` stage. There are no
//! retries and no cancellation: a submission runs to `Confirmed` or to
//! `Failed`.

pub mod clock;
pub mod simulator;

pub use clock::{Clock, InstantClock, SystemClock};
pub use simulator::{
    DelaySchedule, TxError, TxId, TxReceipt, TxSimulator, TxStage, TxTransition,
};
