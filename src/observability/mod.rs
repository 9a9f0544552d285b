//! Observability for the runner: panic capture with run context, and
//! per-linter / per-stage timings.
//!
//! Track context while running so captured panics say where they happened:
//!
//! ```ignore
//! use lintmux::observability::{catch_panic, set_current_linter};
//!
//! let _linter = set_current_linter("lll");
//! match catch_panic(|| linter.run(&mut ctx)) {
//!     Ok(result) => { /* ... */ }
//!     Err(panic) => log::error!("Panic: {}: {}", panic.message, panic.backtrace),
//! }
//! ```

pub mod context;
pub mod panic_hook;
pub mod timing;

pub use context::{
    get_current_context, set_current_linter, set_current_stage, set_phase, ContextGuard,
    RunContext, RunPhase,
};
pub use panic_hook::{catch_panic, CapturedPanic};
pub use timing::{StageTiming, Stopwatch};
