//! Rule resolution.
//!
//! Applies sandwich captures after moves and at turn start, and checks the
//! sides' win conditions.

pub mod capture;
pub mod objective;

pub use capture::{resolve_active, resolve_passive, CaptureEvent, NoAura, ProtectionAura};
pub use objective::{evaluate_objectives, is_achieved, Outcome};
