//! Throttle and debounce wrappers driven by the host clock.
//!
//! Both keep at most one deferred call queued through
//! [`Host::set_timeout`]; a newer call replaces the queued one and its
//! arguments.

use std::cell::Cell;
use std::rc::Rc;

use crate::Result;
use crate::host::{Host, ListenerFn, TimerId};
use crate::runtime_state::Event;

type Callback<A> = Rc<dyn Fn(&mut dyn Host, A) -> Result<()>>;

struct ThrottleState<A> {
    delay_ms: i64,
    callback: Callback<A>,
    last_exec: Cell<Option<i64>>,
    pending: Cell<Option<TimerId>>,
}

/// Leading-edge throttle with a trailing call.
///
/// A call runs immediately when nothing has run yet or more than
/// `delay_ms` passed since the last run. Otherwise the call is deferred to
/// the end of the current window, replacing any call already deferred.
pub struct Throttle<A> {
    state: Rc<ThrottleState<A>>,
}

impl<A> Clone for Throttle<A> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<A: 'static> Throttle<A> {
    pub fn new<F>(delay_ms: i64, callback: F) -> Self
    where
        F: Fn(&mut dyn Host, A) -> Result<()> + 'static,
    {
        Self {
            state: Rc::new(ThrottleState {
                delay_ms: delay_ms.max(0),
                callback: Rc::new(callback),
                last_exec: Cell::new(None),
                pending: Cell::new(None),
            }),
        }
    }

    pub fn call(&self, host: &mut dyn Host, args: A) -> Result<()> {
        let state = &self.state;
        let now = host.now_ms();
        let elapsed = state.last_exec.get().map(|last| now - last);
        match elapsed {
            Some(elapsed) if elapsed <= state.delay_ms => {
                if let Some(timer) = state.pending.take() {
                    host.clear_timeout(timer);
                }
                let deferred = Rc::clone(state);
                let timer = host.set_timeout(
                    state.delay_ms - elapsed,
                    Box::new(move |host: &mut dyn Host| {
                        deferred.pending.set(None);
                        deferred.last_exec.set(Some(host.now_ms()));
                        (deferred.callback)(host, args)
                    }),
                );
                state.pending.set(Some(timer));
                Ok(())
            }
            _ => {
                state.last_exec.set(Some(now));
                (state.callback)(host, args)
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state.pending.get().is_some()
    }
}

impl Throttle<()> {
    /// Adapts the throttle into an event listener that ignores the event.
    pub fn listener(&self) -> ListenerFn {
        let throttle = self.clone();
        Rc::new(move |host: &mut dyn Host, _event: &mut Event| {
            throttle.call(host, ())
        })
    }
}

struct DebounceState<A> {
    delay_ms: i64,
    callback: Callback<A>,
    pending: Cell<Option<TimerId>>,
}

/// Trailing-only debounce: one run, `delay_ms` after the latest call.
pub struct Debounce<A> {
    state: Rc<DebounceState<A>>,
}

impl<A> Clone for Debounce<A> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<A: 'static> Debounce<A> {
    pub fn new<F>(delay_ms: i64, callback: F) -> Self
    where
        F: Fn(&mut dyn Host, A) -> Result<()> + 'static,
    {
        Self {
            state: Rc::new(DebounceState {
                delay_ms: delay_ms.max(0),
                callback: Rc::new(callback),
                pending: Cell::new(None),
            }),
        }
    }

    pub fn call(&self, host: &mut dyn Host, args: A) -> Result<()> {
        let state = &self.state;
        if let Some(timer) = state.pending.take() {
            host.clear_timeout(timer);
        }
        let deferred = Rc::clone(state);
        let timer = host.set_timeout(
            state.delay_ms,
            Box::new(move |host: &mut dyn Host| {
                deferred.pending.set(None);
                (deferred.callback)(host, args)
            }),
        );
        state.pending.set(Some(timer));
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.state.pending.get().is_some()
    }
}

impl Debounce<()> {
    /// Adapts the debounce into an event listener that ignores the event.
    pub fn listener(&self) -> ListenerFn {
        let debounce = self.clone();
        Rc::new(move |host: &mut dyn Host, _event: &mut Event| {
            debounce.call(host, ())
        })
    }
}

pub fn throttle<A, F>(delay_ms: i64, callback: F) -> Throttle<A>
where
    A: 'static,
    F: Fn(&mut dyn Host, A) -> Result<()> + 'static,
{
    Throttle::new(delay_ms, callback)
}

pub fn debounce<A, F>(delay_ms: i64, callback: F) -> Debounce<A>
where
    A: 'static,
    F: Fn(&mut dyn Host, A) -> Result<()> + 'static,
{
    Debounce::new(delay_ms, callback)
}
