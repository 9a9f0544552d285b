//! Thread-local context tracking for panic reports.
//!
//! Records which linter or pipeline stage is currently running so that a
//! captured panic can say where it happened. Guards restore the previous
//! context on drop, so nesting (a stage inside a run) works.

use std::cell::RefCell;

thread_local! {
    static CURRENT_CONTEXT: RefCell<RunContext> = const { RefCell::new(RunContext::new()) };
}

/// Snapshot of what the runner was doing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunContext {
    pub phase: Option<RunPhase>,
    pub linter: Option<String>,
    pub stage: Option<String>,
}

impl RunContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            linter: None,
            stage: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Executing linters
    Linting,
    /// Running the diagnostic pipeline
    Processing,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linting => write!(f, "linting"),
            Self::Processing => write!(f, "processing"),
        }
    }
}

/// RAII guard restoring the previous context on drop.
pub struct ContextGuard {
    previous: RunContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn update(f: impl FnOnce(&mut RunContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        f(&mut ctx.borrow_mut());
        ContextGuard { previous }
    })
}

#[must_use]
pub fn set_phase(phase: RunPhase) -> ContextGuard {
    update(|ctx| ctx.phase = Some(phase))
}

#[must_use]
pub fn set_current_linter(name: impl Into<String>) -> ContextGuard {
    update(|ctx| ctx.linter = Some(name.into()))
}

#[must_use]
pub fn set_current_stage(name: impl Into<String>) -> ContextGuard {
    update(|ctx| ctx.stage = Some(name.into()))
}

#[must_use]
pub fn get_current_context() -> RunContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guards_restore_previous_context() {
        let _phase = set_phase(RunPhase::Linting);
        {
            let _linter = set_current_linter("lll");
            let ctx = get_current_context();
            assert_eq!(ctx.phase, Some(RunPhase::Linting));
            assert_eq!(ctx.linter.as_deref(), Some("lll"));
        }
        assert_eq!(get_current_context().linter, None);
        assert_eq!(get_current_context().phase, Some(RunPhase::Linting));
    }
}
