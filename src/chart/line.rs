use crate::chart::{Axis, Figure, Layout, Trace};
use crate::model::{SystemType, WasteTable};
use serde::Serialize;

/// Duration of the animation between successive renders of the filtered chart.
pub const TRANSITION_MS: u32 = 500;

const Y_LABEL: &str = "Waste (Tonnes)";

/// The three selections that drive the filtered line chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WasteFilter {
    region: String,
    system: SystemType,
    year: i32,
}

impl WasteFilter {
    pub fn new(region: impl Into<String>, system: SystemType, year: i32) -> Self {
        Self {
            region: region.into(),
            system,
            year,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn system(&self) -> SystemType {
        self.system
    }

    /// The last year included in the chart.
    pub fn year(&self) -> i32 {
        self.year
    }
}

/// A single line of waste tonnage by year for the selected region and system type, up to the
/// selected year.
///
/// A selection that matches nothing still yields one trace, with no points.
pub fn waste_line_chart(table: &WasteTable, filter: &WasteFilter) -> Figure {
    let records = table.select(filter.region(), filter.system(), filter.year());
    let x: Vec<i32> = records.iter().map(|r| r.year()).collect();
    let y: Vec<Option<f64>> = records.iter().map(|r| Some(r.waste_tonnes())).collect();

    let trace = Trace::scatter(Y_LABEL, x, y)
        .hover_template(format!("Year=%{{x}}<br>{Y_LABEL}=%{{y}}<extra></extra>"));
    let layout = Layout::new()
        .title(format!(
            "Solar Panel Waste ({}, {})",
            filter.region(),
            filter.system()
        ))
        .x_axis(Axis::new().title("Year"))
        .y_axis(Axis::new().title(Y_LABEL))
        .transition_ms(TRANSITION_MS);
    Figure::new(vec![trace], layout)
}
