//! Panic capture for linter isolation.
//!
//! [`catch_panic`] runs a closure under `catch_unwind`. A process-wide hook,
//! installed once, records the message, location, backtrace and run context
//! of panics raised inside a capture scope instead of printing them; panics
//! outside a scope go to the previously installed hook unchanged.

use super::context::{get_current_context, RunContext};
use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::AssertUnwindSafe;
use std::sync::Once;

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
    static LAST_PANIC: RefCell<Option<CapturedPanic>> = const { RefCell::new(None) };
}

static INSTALL: Once = Once::new();

/// A panic caught by [`catch_panic`].
#[derive(Debug, Clone)]
pub struct CapturedPanic {
    pub message: String,
    pub location: Option<String>,
    /// Empty when the panic was raised on another thread (e.g. a rayon worker).
    pub backtrace: String,
    pub context: RunContext,
}

fn install_capture_hook() {
    INSTALL.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if !CAPTURING.with(Cell::get) {
                previous(info);
                return;
            }
            let captured = CapturedPanic {
                message: extract_panic_message(info.payload()),
                location: info
                    .location()
                    .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column())),
                backtrace: Backtrace::force_capture().to_string(),
                context: get_current_context(),
            };
            LAST_PANIC.with(|p| *p.borrow_mut() = Some(captured));
        }));
    });
}

/// Run `f`, converting a panic into a [`CapturedPanic`].
pub fn catch_panic<T>(f: impl FnOnce() -> T) -> Result<T, CapturedPanic> {
    install_capture_hook();
    let was_capturing = CAPTURING.with(|c| c.replace(true));
    LAST_PANIC.with(|p| p.borrow_mut().take());

    let result = std::panic::catch_unwind(AssertUnwindSafe(f));
    CAPTURING.with(|c| c.set(was_capturing));

    result.map_err(|payload| {
        LAST_PANIC
            .with(|p| p.borrow_mut().take())
            .unwrap_or_else(|| CapturedPanic {
                message: extract_panic_message(payload.as_ref()),
                location: None,
                backtrace: String::new(),
                context: get_current_context(),
            })
    })
}

fn extract_panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::context::set_current_linter;

    #[test]
    fn test_catch_panic_passes_value_through() {
        assert_eq!(catch_panic(|| 41 + 1).unwrap(), 42);
    }

    #[test]
    fn test_catch_panic_captures_message_and_context() {
        let _linter = set_current_linter("exploding");
        let err = catch_panic(|| -> usize { panic!("boom at {}", 3) }).unwrap_err();
        assert_eq!(err.message, "boom at 3");
        assert!(err.location.is_some());
        assert_eq!(err.context.linter.as_deref(), Some("exploding"));
    }

    #[test]
    fn test_extract_static_str_payload() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(extract_panic_message(payload.as_ref()), "static");
    }
}
