//! Connectivity monitor.
//!
//! # Data Flow
//! ```text
//! interval tick (engine.rs)
//!     → Probe::check()
//!     → MonitorState::record_success / record_failure (state.rs)
//!     → Some(PolicyAction)? → IcmpPolicy::disable / enable
//!     → MonitorState::commit on success
//!     → EventSink::record
//! ```
//!
//! # Design Decisions
//! - One task owns the state; ticks never overlap
//! - Transitions are edge-triggered, so the policy is called once per change
//! - A failed toggle leaves the state untouched and is retried next time
//!   the same transition is due
//! - The loop runs until shutdown; it does not stop after a transition

pub mod engine;
pub mod state;

pub use engine::{Monitor, MonitorSettings};
pub use state::MonitorState;
