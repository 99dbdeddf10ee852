//! Explicit event-handler registration for the filtered dashboard.
//!
//! A `Callback` maps a set of watched inputs to a pure recomputation of one output. The
//! `Dispatcher` holds the callbacks and the `EventLoop` feeds it one `InputEvent` at a time, so
//! each event is fully handled before the next one starts. There are no partial updates and no
//! debouncing: every event recomputes every callback that watches the changed input.

mod controls;
mod dispatcher;
mod event_loop;

pub use controls::{ControlOptions, ControlState, InputId, OutputId};
pub use dispatcher::{Callback, Dispatcher, InputEvent, OutputUpdate};
pub use event_loop::{EventLoop, EventLoopHandle};
