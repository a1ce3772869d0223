//! crates/logging/src/context.rs
//! Thread-local logger slot with scoped replacement and spawn inheritance.
//!
//! Each thread has one slot. It is filled lazily with the process default
//! logger on first access, replaced for a scope with [`scoped`], and copied
//! into child threads started through [`spawn`]. Replacing a slot never
//! touches any other thread's slot.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::thread::{self, JoinHandle};

use crate::logger::Logger;
use crate::resolver::Resolver;

thread_local! {
    static CURRENT: RefCell<Option<Logger>> = const { RefCell::new(None) };
}

/// The calling thread's logger.
///
/// On first access the slot is filled with the global resolver's fallback,
/// creating the standard error default logger if no fallback exists yet.
pub fn current() -> Logger {
    if let Some(logger) = CURRENT.with(|slot| slot.borrow().clone()) {
        return logger;
    }

    let logger = Resolver::global()
        .default_logger()
        .unwrap_or_else(Logger::local);
    CURRENT.with(|slot| *slot.borrow_mut() = Some(logger.clone()));
    logger
}

/// The calling thread's logger if one has been set or created.
#[must_use]
pub fn try_current() -> Option<Logger> {
    CURRENT.with(|slot| slot.borrow().clone())
}

/// Replaces the calling thread's logger and returns the previous one.
pub fn replace(logger: Logger) -> Option<Logger> {
    CURRENT.with(|slot| slot.borrow_mut().replace(logger))
}

/// Empties the calling thread's slot; the next [`current`] refills it.
pub fn clear() -> Option<Logger> {
    CURRENT.with(|slot| slot.borrow_mut().take())
}

/// Restores the previous logger when dropped.
///
/// Returned by [`scoped`]. Guards must be dropped in reverse order of
/// creation, which lexical scoping guarantees. The guard is tied to the
/// thread that created it.
#[must_use = "the previous logger is restored as soon as the guard is dropped"]
pub struct ContextGuard {
    previous: Option<Logger>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|slot| *slot.borrow_mut() = previous);
    }
}

/// Installs `logger` for the calling thread until the guard drops.
///
/// ```
/// use logging::{Logger, context};
/// use logging_sink::{OutputChain, SharedBuffer};
///
/// let buffer = SharedBuffer::new();
/// let logger = Logger::new(OutputChain::builder(buffer.clone()).build());
/// {
///     let _guard = context::scoped(logger.clone());
///     context::current().warn("inside");
/// }
/// assert!(buffer.contents_lossy().contains("warn: inside"));
/// ```
pub fn scoped(logger: Logger) -> ContextGuard {
    ContextGuard {
        previous: replace(logger),
        _not_send: PhantomData,
    }
}

/// Runs `f` with `logger` installed, restoring the previous logger after,
/// including when `f` unwinds.
pub fn with_logger<R>(logger: Logger, f: impl FnOnce() -> R) -> R {
    let _guard = scoped(logger);
    f()
}

/// Spawns a thread whose slot starts with the caller's current logger.
///
/// The child shares the parent's filter and chain; it can install its own
/// logger without affecting the parent.
pub fn spawn<F, T>(f: F) -> JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let inherited = current();
    thread::spawn(move || with_logger(inherited, f))
}

/// Like [`spawn`] using a [`thread::Builder`], so the caller can name the
/// thread or set its stack size.
pub fn spawn_with<F, T>(builder: thread::Builder, f: F) -> std::io::Result<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let inherited = current();
    builder.spawn(move || with_logger(inherited, f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging_sink::{OutputChain, SharedBuffer};

    fn capture() -> (Logger, SharedBuffer) {
        let buffer = SharedBuffer::new();
        (
            Logger::new(OutputChain::builder(buffer.clone()).build()),
            buffer,
        )
    }

    #[test]
    fn scoped_restores_previous_logger() {
        let (outer, _) = capture();
        let (inner, _) = capture();
        let _outer_guard = scoped(outer.clone());
        {
            let _inner_guard = scoped(inner.clone());
            assert!(Logger::shares_output(&current(), &inner));
        }
        assert!(Logger::shares_output(&current(), &outer));
    }

    #[test]
    fn with_logger_restores_after_panic() {
        let (outer, _) = capture();
        let (inner, _) = capture();
        let _guard = scoped(outer.clone());
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            with_logger(inner, || panic!("boom"));
        }));
        assert!(result.is_err());
        assert!(Logger::shares_output(&current(), &outer));
    }

    #[test]
    fn spawned_threads_inherit_by_reference() {
        let (logger, buffer) = capture();
        let _guard = scoped(logger.clone());

        let child = spawn(|| {
            let inherited = current();
            inherited.set_threshold("error").expect("known level");
            inherited.error("from child");
        });
        child.join().expect("child thread");

        assert_eq!(logger.threshold(), 3);
        assert!(buffer.contents_lossy().contains("from child"));
    }

    #[test]
    fn child_replacement_does_not_leak_to_parent() {
        let (parent, _) = capture();
        let _guard = scoped(parent.clone());

        let child = spawn(|| {
            let (own, _) = capture();
            replace(own.clone());
            Logger::shares_output(&current(), &own)
        });
        assert!(child.join().expect("child thread"));
        assert!(Logger::shares_output(&current(), &parent));
    }

    #[test]
    fn spawn_with_names_the_thread() {
        let (logger, _) = capture();
        let _guard = scoped(logger);
        let handle = spawn_with(thread::Builder::new().name("worker".into()), || {
            thread::current().name().map(str::to_owned)
        })
        .expect("spawn");
        assert_eq!(handle.join().expect("join").as_deref(), Some("worker"));
    }

    #[test]
    fn clear_empties_slot() {
        let (logger, _) = capture();
        replace(logger);
        assert!(clear().is_some());
        assert!(try_current().is_none());
    }
}
