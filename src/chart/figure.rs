//! A chart specification in the shape plotly.js expects: `{ "data": [...], "layout": {...} }`.
//!
//! Only the attributes the dashboards use are modelled. Fields are serialized in declaration
//! order and unset options are omitted, so the same figure always produces the same JSON.

use crate::error::Re;
use anyhow::Context;
use serde::{Serialize, Serializer};

/// A complete chart: its traces in render order and its layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    data: Vec<Trace>,
    layout: Layout,
}

impl Figure {
    pub fn new(data: Vec<Trace>, layout: Layout) -> Self {
        Self { data, layout }
    }

    pub fn traces(&self) -> &[Trace] {
        &self.data
    }

    pub fn trace(&self, ix: usize) -> Option<&Trace> {
        self.data.get(ix)
    }

    pub(crate) fn trace_mut(&mut self, ix: usize) -> Option<&mut Trace> {
        self.data.get_mut(ix)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub(crate) fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    /// Compact JSON for embedding in a page or returning from a callback.
    pub fn to_json(&self) -> Re<String> {
        serde_json::to_string(self).context("Failed to serialize the figure to JSON")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Scatter,
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineMode {
    #[serde(rename = "lines")]
    Lines,
    #[serde(rename = "lines+markers")]
    LinesMarkers,
}

/// Whether a trace is drawn. Clicking a legend entry flips between `Visible` and `LegendOnly`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Visible,
    /// Hidden from the plot but still listed in the legend.
    LegendOnly,
    /// Hidden from both the plot and the legend.
    Hidden,
}

impl Visibility {
    pub fn is_visible(&self) -> bool {
        matches!(self, Visibility::Visible)
    }

    /// The default legend-click behavior of plotly.js.
    pub fn toggled(self) -> Self {
        match self {
            Visibility::Visible => Visibility::LegendOnly,
            Visibility::LegendOnly => Visibility::Visible,
            Visibility::Hidden => Visibility::Hidden,
        }
    }
}

impl Serialize for Visibility {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Visibility::Visible => serializer.serialize_bool(true),
            Visibility::LegendOnly => serializer.serialize_str("legendonly"),
            Visibility::Hidden => serializer.serialize_bool(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Marker {
    color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    color: String,
    width: f64,
}

/// One series of the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    kind: TraceKind,
    name: String,
    x: Vec<i32>,
    y: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<LineMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    yaxis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hovertemplate: Option<String>,
    #[serde(skip_serializing_if = "Visibility::is_visible")]
    visible: Visibility,
}

impl Trace {
    /// A line trace.
    pub fn scatter(name: impl Into<String>, x: Vec<i32>, y: Vec<Option<f64>>) -> Self {
        Self::new(TraceKind::Scatter, name, x, y).mode(LineMode::Lines)
    }

    pub fn bar(name: impl Into<String>, x: Vec<i32>, y: Vec<Option<f64>>) -> Self {
        Self::new(TraceKind::Bar, name, x, y)
    }

    fn new(kind: TraceKind, name: impl Into<String>, x: Vec<i32>, y: Vec<Option<f64>>) -> Self {
        Self {
            kind,
            name: name.into(),
            x,
            y,
            mode: None,
            yaxis: None,
            marker: None,
            line: None,
            hovertemplate: None,
            visible: Visibility::Visible,
        }
    }

    pub fn mode(mut self, mode: LineMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Plots the trace against the secondary y axis.
    pub fn on_secondary_axis(mut self) -> Self {
        self.yaxis = Some(SECONDARY_AXIS_REF.to_string());
        self
    }

    pub fn marker_color(mut self, color: impl Into<String>) -> Self {
        self.marker = Some(Marker {
            color: color.into(),
        });
        self
    }

    pub fn line(mut self, color: impl Into<String>, width: f64) -> Self {
        self.line = Some(Line {
            color: color.into(),
            width,
        });
        self
    }

    pub fn hover_template(mut self, template: impl Into<String>) -> Self {
        self.hovertemplate = Some(template.into());
        self
    }

    pub fn kind(&self) -> TraceKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn x(&self) -> &[i32] {
        &self.x
    }

    pub fn y(&self) -> &[Option<f64>] {
        &self.y
    }

    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }

    pub fn is_secondary(&self) -> bool {
        self.yaxis.as_deref() == Some(SECONDARY_AXIS_REF)
    }

    pub fn visible(&self) -> Visibility {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: Visibility) {
        self.visible = visible;
    }
}

impl Marker {
    pub fn color(&self) -> &str {
        &self.color
    }
}

const SECONDARY_AXIS_REF: &str = "y2";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Title {
    text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Right,
}

/// An x or y axis.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    overlaying: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    side: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    showticklabels: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    showgrid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ticks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dtick: Option<f64>,
}

impl Axis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, text: impl Into<String>) -> Self {
        self.title = Some(Title::new(text));
        self
    }

    /// Draws this axis over the primary y axis.
    pub fn overlaying_primary(mut self) -> Self {
        self.overlaying = Some("y".to_string());
        self
    }

    pub fn side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    /// Distance between ticks, in axis units.
    pub fn dtick(mut self, dtick: f64) -> Self {
        self.dtick = Some(dtick);
        self
    }

    pub fn title_text(&self) -> Option<&str> {
        self.title.as_ref().map(Title::text)
    }

    pub fn show_tick_labels(&self) -> Option<bool> {
        self.showticklabels
    }

    pub fn show_grid(&self) -> Option<bool> {
        self.showgrid
    }

    pub fn ticks(&self) -> Option<&str> {
        self.ticks.as_deref()
    }

    pub fn is_overlaying(&self) -> bool {
        self.overlaying.is_some()
    }

    pub(crate) fn set_title(&mut self, text: impl Into<String>) {
        self.title = Some(Title::new(text));
    }

    pub(crate) fn set_show_tick_labels(&mut self, show: bool) {
        self.showticklabels = Some(show);
    }

    pub(crate) fn set_show_grid(&mut self, show: bool) {
        self.showgrid = Some(show);
    }

    pub(crate) fn set_ticks(&mut self, ticks: impl Into<String>) {
        self.ticks = Some(ticks.into());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    Stack,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    duration: u32,
}

/// Chart-wide settings.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<Title>,
    xaxis: Axis,
    yaxis: Axis,
    #[serde(skip_serializing_if = "Option::is_none")]
    yaxis2: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    barmode: Option<BarMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transition: Option<Transition>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, text: impl Into<String>) -> Self {
        self.title = Some(Title::new(text));
        self
    }

    pub fn x_axis(mut self, axis: Axis) -> Self {
        self.xaxis = axis;
        self
    }

    pub fn y_axis(mut self, axis: Axis) -> Self {
        self.yaxis = axis;
        self
    }

    pub fn y_axis2(mut self, axis: Axis) -> Self {
        self.yaxis2 = Some(axis);
        self
    }

    pub fn bar_mode(mut self, mode: BarMode) -> Self {
        self.barmode = Some(mode);
        self
    }

    /// Positions the legend, in paper coordinates.
    pub fn legend_at(mut self, x: f64, y: f64) -> Self {
        self.legend = Some(Legend { x, y });
        self
    }

    /// Animates changes between successive renders.
    pub fn transition_ms(mut self, duration: u32) -> Self {
        self.transition = Some(Transition { duration });
        self
    }

    pub fn title_text(&self) -> Option<&str> {
        self.title.as_ref().map(Title::text)
    }

    pub fn xaxis(&self) -> &Axis {
        &self.xaxis
    }

    pub fn yaxis(&self) -> &Axis {
        &self.yaxis
    }

    pub fn yaxis2(&self) -> Option<&Axis> {
        self.yaxis2.as_ref()
    }

    pub(crate) fn yaxis2_mut(&mut self) -> Option<&mut Axis> {
        self.yaxis2.as_mut()
    }

    pub fn barmode(&self) -> Option<BarMode> {
        self.barmode
    }

    pub fn transition_duration(&self) -> Option<u32> {
        self.transition.map(|t| t.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_visibility_toggle() {
        assert_eq!(Visibility::Visible.toggled(), Visibility::LegendOnly);
        assert_eq!(Visibility::LegendOnly.toggled(), Visibility::Visible);
        assert_eq!(Visibility::Hidden.toggled(), Visibility::Hidden);
    }

    #[test]
    fn test_serialize_figure() {
        let mut trace = Trace::scatter("Cumulative", vec![2023, 2024], vec![Some(1.0), None])
            .on_secondary_axis()
            .line("#333333", 3.0);
        trace.set_visible(Visibility::LegendOnly);
        let figure = Figure::new(
            vec![
                Trace::bar("ACT", vec![2023], vec![Some(2.5)]).marker_color("#1f77b4"),
                trace,
            ],
            Layout::new()
                .title("Waste")
                .bar_mode(BarMode::Stack)
                .y_axis2(Axis::new().overlaying_primary().side(Side::Right))
                .transition_ms(500),
        );

        let value: serde_json::Value = serde_json::from_str(&figure.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "data": [
                    {
                        "type": "bar",
                        "name": "ACT",
                        "x": [2023],
                        "y": [2.5],
                        "marker": { "color": "#1f77b4" }
                    },
                    {
                        "type": "scatter",
                        "name": "Cumulative",
                        "x": [2023, 2024],
                        "y": [1.0, null],
                        "mode": "lines",
                        "yaxis": "y2",
                        "line": { "color": "#333333", "width": 3.0 },
                        "visible": "legendonly"
                    }
                ],
                "layout": {
                    "title": { "text": "Waste" },
                    "xaxis": {},
                    "yaxis": {},
                    "yaxis2": { "overlaying": "y", "side": "right" },
                    "barmode": "stack",
                    "transition": { "duration": 500 }
                }
            })
        );
    }

    #[test]
    fn test_serialization_is_stable() {
        let figure = Figure::new(
            vec![Trace::scatter("a", vec![1, 2, 3], vec![Some(1.0); 3])],
            Layout::new().title("t"),
        );
        assert_eq!(figure.to_json().unwrap(), figure.clone().to_json().unwrap());
        assert!(figure
            .to_json()
            .unwrap()
            .starts_with(r#"{"data":[{"type":"scatter","name":"a""#));
    }
}
