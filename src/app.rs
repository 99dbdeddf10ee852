//! The two served dashboards: what each page contains and how the filtered one answers control
//! changes.

use crate::chart::{combo_chart, legend, waste_line_chart, Figure};
use crate::data::Dataset;
use crate::error::Re;
use crate::html;
use crate::model::SystemType;
use crate::reactive::{
    Callback, ControlOptions, ControlState, Dispatcher, EventLoopHandle, InputEvent, InputId,
    OutputId, OutputUpdate,
};
use anyhow::Context;
use std::collections::BTreeMap;
use std::sync::Arc;

/// The element id of the chart on combo pages and in the exported file.
pub const COMBO_DIV_ID: &str = "solar-waste-combo";

/// Registers the filtered line chart as the callback of the three controls.
pub fn waste_dispatcher(dataset: Arc<Dataset>) -> Dispatcher {
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(Callback::new(
        OutputId::WasteGraph,
        InputId::ALL,
        move |state: &ControlState| Ok(waste_line_chart(dataset.national(), &state.filter())),
    ));
    dispatcher
}

/// Builds the combo chart from a dataset loaded with `Scope::Combo`.
pub fn combo_figure(dataset: &Dataset) -> Re<Figure> {
    Ok(combo_chart(dataset.states()?, &dataset.pivot()))
}

/// The combo chart page: the chart plus the legend script that shows and hides the secondary
/// axis.
pub fn combo_page(dataset: &Dataset) -> Re<String> {
    let figure = combo_figure(dataset)?;
    html::standalone(
        &figure,
        COMBO_DIV_ID,
        html::PAGE_TITLE,
        &legend::toggle_script(COMBO_DIV_ID),
    )
}

/// The filtered line-chart dashboard.
#[derive(Debug, Clone)]
pub struct FilteredApp {
    page: Arc<String>,
    events: EventLoopHandle,
}

impl FilteredApp {
    /// `events` must feed a dispatcher built by `waste_dispatcher` over the same dataset.
    pub fn new(dataset: &Dataset, system: SystemType, events: EventLoopHandle) -> Re<Self> {
        let options = ControlOptions::from_table(dataset.national(), dataset.region(), system)?;
        Ok(Self {
            page: Arc::new(html::dashboard(&options)),
            events,
        })
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    /// Handles one control change submitted as query pairs: every control's value plus an
    /// optional `trigger` naming the control that changed. Without a trigger every callback
    /// runs, as for the first render.
    pub async fn update<K, V>(&self, pairs: impl IntoIterator<Item = (K, V)>) -> Re<String>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs: Vec<(K, V)> = pairs.into_iter().collect();
        let trigger = pairs
            .iter()
            .find(|(k, _)| k.as_ref() == TRIGGER)
            .map(|(_, v)| {
                let v = v.as_ref();
                v.parse::<InputId>()
                    .with_context(|| format!("Unknown trigger '{v}'"))
            })
            .transpose()?;
        let state = ControlState::from_pairs(pairs)?;
        let event = match trigger {
            Some(trigger) => InputEvent::changed(trigger, state),
            None => InputEvent::initial(state),
        };
        let updates = self.events.submit(event).await?;
        outputs_json(&updates)
    }
}

const TRIGGER: &str = "trigger";

/// `{ "<output id>": <figure>, ... }`
fn outputs_json(updates: &[OutputUpdate]) -> Re<String> {
    let outputs: BTreeMap<String, &Figure> = updates
        .iter()
        .map(|u| (u.output().to_string(), u.figure()))
        .collect();
    Ok(serde_json::to_string(&outputs)?)
}

/// The combo chart dashboard. The page is rendered once, since it does not depend on any input.
#[derive(Debug, Clone)]
pub struct ComboApp {
    page: Arc<String>,
}

impl ComboApp {
    pub fn new(dataset: &Dataset) -> Re<Self> {
        Ok(Self {
            page: Arc::new(combo_page(dataset)?),
        })
    }

    pub fn page(&self) -> &str {
        &self.page
    }
}

/// Either dashboard, as served by `server::Server`.
#[derive(Debug, Clone)]
pub enum App {
    Filtered(FilteredApp),
    Combo(ComboApp),
}
