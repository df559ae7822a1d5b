use std::sync::Arc;
use std::sync::Mutex;

use tokio::task::JoinHandle;

use crate::guard::Decision;
use crate::guard::GuardConfig;
use crate::guard::GuardEvent;
use crate::guard::GuardMachine;
use crate::guard::RouteClass;
use crate::guard::TimerCommand;

/// Receiver of the committed redirect. Called at most once per latch
/// cycle of the underlying machine.
pub trait RedirectSink: Send + Sync + 'static {
    fn redirect(&self);
}

impl<F> RedirectSink for F
where
    F: Fn() + Send + Sync + 'static,
{
    fn redirect(&self) {
        self()
    }
}

/// Runs a [`GuardMachine`] with real grace timers on the tokio runtime.
///
/// Events from any source (storage check, identity hydration, navigation)
/// are funnelled through [`GuardDriver::dispatch`]; the machine serializes
/// them behind a mutex, so interleavings cannot produce conflicting timer
/// state. Dropping the driver aborts any pending timer, so a disposed
/// route can never act.
pub struct GuardDriver<S: RedirectSink> {
    inner: Arc<DriverInner<S>>,
}

struct DriverInner<S: RedirectSink> {
    machine: Mutex<GuardMachine>,
    sink: S,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl<S: RedirectSink> GuardDriver<S> {
    pub fn new(config: GuardConfig, route: RouteClass, sink: S) -> Self {
        Self {
            inner: Arc::new(DriverInner {
                machine: Mutex::new(GuardMachine::new(config, route)),
                sink,
                timer: Mutex::new(None),
            }),
        }
    }

    /// Feed one event into the machine and execute its timer effect.
    pub fn dispatch(&self, event: GuardEvent) -> Decision {
        Self::process(&self.inner, event)
    }

    /// Current decision without applying an event.
    pub fn decision(&self) -> Decision {
        self.inner.machine.lock().unwrap().decide()
    }

    fn process(inner: &Arc<DriverInner<S>>, event: GuardEvent) -> Decision {
        let directive = inner.machine.lock().unwrap().apply(event);

        match directive.timer {
            TimerCommand::Cancel => {
                if let Some(handle) = inner.timer.lock().unwrap().take() {
                    handle.abort();
                }
            }
            TimerCommand::Arm(duration) => {
                let mut slot = inner.timer.lock().unwrap();
                if let Some(handle) = slot.take() {
                    handle.abort();
                }
                // Weak reference: the timer must not keep a torn-down
                // guard alive.
                let weak = Arc::downgrade(inner);
                // Anchor the deadline at arm time, not at the task's first
                // poll, so the grace period measures from the transition.
                let deadline = tokio::time::Instant::now() + duration;
                *slot = Some(tokio::spawn(async move {
                    tokio::time::sleep_until(deadline).await;
                    if let Some(inner) = weak.upgrade() {
                        Self::process(&inner, GuardEvent::GraceElapsed);
                    }
                }));
            }
            TimerCommand::Keep => {}
        }

        if directive.fire_redirect {
            tracing::debug!("Grace period elapsed without authentication, redirecting to login");
            inner.sink.redirect();
        }

        directive.decision
    }
}

impl<S: RedirectSink> Drop for GuardDriver<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.inner.timer.lock().unwrap().take() {
            handle.abort();
        }
    }
}
