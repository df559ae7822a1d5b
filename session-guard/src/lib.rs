//! Client-side session state for the attendee portal.
//!
//! Two cooperating pieces:
//! - [`store::SessionStore`] holds the authenticated identity for the
//!   lifetime of the client process, backed by a synchronously-readable
//!   persisted marker that survives reloads.
//! - [`guard::GuardMachine`] decides, per protected navigation, whether to
//!   render, show a placeholder, or redirect to login. It is an explicit
//!   state machine over discrete events, so the decision is idempotent
//!   under any interleaving of storage checks, identity hydration, and
//!   route changes. [`driver::GuardDriver`] runs its grace timer on tokio.
//!
//! The invariant the guard exists for: a persisted marker must never let a
//! redirect fire, and an unauthenticated visit must redirect exactly once
//! after the grace period, no matter how often state is re-evaluated.

pub mod driver;
pub mod guard;
pub mod store;

pub use driver::GuardDriver;
pub use driver::RedirectSink;
pub use guard::Decision;
pub use guard::GuardConfig;
pub use guard::GuardEvent;
pub use guard::GuardMachine;
pub use guard::RouteClass;
pub use store::SessionIdentity;
pub use store::SessionMarker;
pub use store::SessionStore;
