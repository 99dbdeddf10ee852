use crate::chart::Figure;
use crate::error::Re;
use crate::reactive::{ControlState, InputId, OutputId};
use anyhow::Context;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::{Debug, Formatter};
use tracing::debug;

type Handler = Box<dyn Fn(&ControlState) -> Re<Figure> + Send + Sync>;

/// A recomputation bound to a set of watched inputs and the output it writes.
pub struct Callback {
    output: OutputId,
    inputs: BTreeSet<InputId>,
    handler: Handler,
}

impl Callback {
    pub fn new<F>(output: OutputId, inputs: impl IntoIterator<Item = InputId>, handler: F) -> Self
    where
        F: Fn(&ControlState) -> Re<Figure> + Send + Sync + 'static,
    {
        Self {
            output,
            inputs: inputs.into_iter().collect(),
            handler: Box::new(handler),
        }
    }

    pub fn watches(&self, input: InputId) -> bool {
        self.inputs.contains(&input)
    }

    fn run(&self, state: &ControlState) -> Re<OutputUpdate> {
        let figure = (self.handler)(state)
            .with_context(|| format!("The callback for {} failed", self.output))?;
        Ok(OutputUpdate {
            output: self.output,
            figure,
        })
    }
}

impl Debug for Callback {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callback")
            .field("output", &self.output)
            .field("inputs", &self.inputs)
            .finish_non_exhaustive()
    }
}

/// A change to one control, carrying the value of every control after the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputEvent {
    /// `None` for the initial render of a page, which runs every callback.
    trigger: Option<InputId>,
    state: ControlState,
}

impl InputEvent {
    pub fn changed(trigger: InputId, state: ControlState) -> Self {
        Self {
            trigger: Some(trigger),
            state,
        }
    }

    pub fn initial(state: ControlState) -> Self {
        Self {
            trigger: None,
            state,
        }
    }

    pub fn trigger(&self) -> Option<InputId> {
        self.trigger
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }
}

/// The new value of one output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputUpdate {
    output: OutputId,
    figure: Figure,
}

impl OutputUpdate {
    pub fn output(&self) -> OutputId {
        self.output
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }
}

/// The registry of callbacks. Every event fully recomputes every callback that watches the
/// changed input; nothing is cached between events.
#[derive(Debug, Default)]
pub struct Dispatcher {
    callbacks: Vec<Callback>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a callback. Callbacks run in registration order.
    pub fn register(&mut self, callback: Callback) -> &mut Self {
        debug!(
            "Registered callback for {} watching {:?}",
            callback.output, callback.inputs
        );
        self.callbacks.push(callback);
        self
    }

    /// Runs the callbacks affected by `event`.
    pub fn dispatch(&self, event: &InputEvent) -> Re<Vec<OutputUpdate>> {
        match event.trigger() {
            None => self.dispatch_all(event.state()),
            Some(trigger) => self
                .callbacks
                .iter()
                .filter(|cb| cb.watches(trigger))
                .map(|cb| cb.run(event.state()))
                .collect(),
        }
    }

    /// Runs every callback, as for the first render of a page.
    pub fn dispatch_all(&self, state: &ControlState) -> Re<Vec<OutputUpdate>> {
        self.callbacks.iter().map(|cb| cb.run(state)).collect()
    }
}
