use std::time::Duration;

use crate::store::SessionIdentity;

/// Sensitivity class of a protected route.
///
/// Internal navigation transitions frequently while identity hydration is
/// in flight, so it gets a longer grace period before a redirect commits.
/// First-entry routes redirect promptly for genuinely unauthenticated
/// visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    FirstEntry,
    Internal,
}

/// Grace periods per route class.
#[derive(Debug, Clone, Copy)]
pub struct GuardConfig {
    pub first_entry_grace: Duration,
    pub internal_grace: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            first_entry_grace: Duration::from_millis(300),
            internal_grace: Duration::from_millis(1200),
        }
    }
}

impl GuardConfig {
    fn grace_for(&self, route: RouteClass) -> Duration {
        match route {
            RouteClass::FirstEntry => self.first_entry_grace,
            RouteClass::Internal => self.internal_grace,
        }
    }
}

/// Hydration state of the asynchronously-loaded identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityState {
    Unloaded,
    Loading,
    Loaded(SessionIdentity),
    Absent,
}

/// Discrete events driving the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardEvent {
    /// Synchronous marker check completed.
    StorageChecked { marker_present: bool },
    /// Identity re-hydration started.
    IdentityLoading,
    /// Identity re-hydration produced an identity.
    IdentityLoaded(SessionIdentity),
    /// Identity re-hydration finished with nothing.
    IdentityAbsent,
    /// Explicit logout; the machine resets to its initial state.
    IdentityCleared,
    /// Navigation moved to a route of a (possibly different) class.
    RouteChanged(RouteClass),
    /// The armed grace period ran out.
    GraceElapsed,
}

/// What the route should show right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Render,
    Placeholder,
    Redirect,
}

/// Timer effect requested by a transition. The caller owns the actual
/// timer; `Keep` means leave whatever is (or isn't) pending alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Arm(Duration),
    Cancel,
    Keep,
}

/// Outcome of one applied event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub decision: Decision,
    pub timer: TimerCommand,
    /// True exactly once per latch cycle, on the transition that commits
    /// the redirect.
    pub fire_redirect: bool,
}

/// Route-guard state machine.
///
/// One instance per protected route tree, constructed on mount and torn
/// down on unmount. All state lives in plain fields; [`GuardMachine::decide`]
/// is a pure function of them, so re-running it from the same inputs always
/// yields the same decision.
#[derive(Debug)]
pub struct GuardMachine {
    config: GuardConfig,
    route: RouteClass,
    storage_checked: bool,
    marker_present: bool,
    identity: IdentityState,
    armed: bool,
    fired: bool,
}

impl GuardMachine {
    pub fn new(config: GuardConfig, route: RouteClass) -> Self {
        Self {
            config,
            route,
            storage_checked: false,
            marker_present: false,
            identity: IdentityState::Unloaded,
            armed: false,
            fired: false,
        }
    }

    fn authenticated(&self) -> bool {
        // A persisted marker alone counts: it must never let a redirect
        // fire, even while the identity is still hydrating.
        self.marker_present || matches!(self.identity, IdentityState::Loaded(_))
    }

    /// Evaluate the decision policy over the current state tuple.
    pub fn decide(&self) -> Decision {
        if self.fired {
            return Decision::Redirect;
        }
        if self.authenticated() {
            return Decision::Render;
        }
        // Unloaded, loading, or absent-but-within-grace: placeholder only,
        // no redirect decision yet.
        Decision::Placeholder
    }

    /// Apply one event and return the resulting decision plus timer effect.
    pub fn apply(&mut self, event: GuardEvent) -> Directive {
        let mut fire_redirect = false;

        match event {
            GuardEvent::StorageChecked { marker_present } => {
                self.storage_checked = true;
                self.marker_present = marker_present;
            }
            GuardEvent::IdentityLoading => {
                self.identity = IdentityState::Loading;
            }
            GuardEvent::IdentityLoaded(identity) => {
                self.identity = IdentityState::Loaded(identity);
            }
            GuardEvent::IdentityAbsent => {
                self.identity = IdentityState::Absent;
            }
            GuardEvent::IdentityCleared => {
                // Authenticated state lost: back to the storage-check state,
                // redirect latch included.
                *self = GuardMachine::new(self.config, self.route);
                return Directive {
                    decision: self.decide(),
                    timer: TimerCommand::Cancel,
                    fire_redirect: false,
                };
            }
            GuardEvent::RouteChanged(route) => {
                self.route = route;
            }
            GuardEvent::GraceElapsed => {
                if self.armed {
                    self.armed = false;
                    // Re-check the render conditions immediately before
                    // committing; a late marker or identity cancels the
                    // redirect.
                    if !self.authenticated() && !self.fired {
                        self.fired = true;
                        fire_redirect = true;
                    }
                }
            }
        }

        let timer = self.reconcile_timer();

        Directive {
            decision: self.decide(),
            timer,
            fire_redirect,
        }
    }

    /// Decide the timer effect for the state reached by the last event.
    fn reconcile_timer(&mut self) -> TimerCommand {
        if self.authenticated() {
            if self.armed {
                self.armed = false;
                return TimerCommand::Cancel;
            }
            return TimerCommand::Keep;
        }

        let load_finished_empty = matches!(self.identity, IdentityState::Absent);
        if load_finished_empty
            && self.storage_checked
            && !self.armed
            && !self.fired
        {
            self.armed = true;
            return TimerCommand::Arm(self.config.grace_for(self.route));
        }

        TimerCommand::Keep
    }
}
