//! Shows or hides the secondary y axis as the cumulative line traces are toggled in the legend.
//!
//! The secondary axis is visible while at least one of the two line traces is visible. Clicking a
//! legend entry first applies the charting library's default toggle, then the axis state is
//! recomputed from the visibility of the two lines.
//!
//! The line traces are found by position: they are assumed to be the last two traces of the
//! figure. This is fragile. If the combo chart ever gains a trace after the lines, legend clicks
//! will drive the axis from the wrong traces without any error.
//!
//! The same rule runs in the browser (`toggle_script`) and here (`on_legend_click`), which lets
//! the behavior be tested without a browser.

use crate::chart::{Axis, Figure};

/// Axis title shown while the secondary axis is visible.
pub const SECONDARY_AXIS_TITLE: &str = "Cumulative Waste (Tonnes)";

/// Tick style of the visible secondary axis.
const TICKS_OUTSIDE: &str = "outside";

/// The number of trailing traces that drive the secondary axis.
const LINE_TRACE_COUNT: usize = 2;

/// The two states of the secondary axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisState {
    Visible,
    Hidden,
}

impl AxisState {
    /// Applies the four visual properties of this state to `axis`.
    pub fn apply(self, axis: &mut Axis) {
        let shown = self == AxisState::Visible;
        axis.set_show_tick_labels(shown);
        axis.set_title(if shown { SECONDARY_AXIS_TITLE } else { "" });
        axis.set_show_grid(shown);
        axis.set_ticks(if shown { TICKS_OUTSIDE } else { "" });
    }

    /// Reads the state back from an axis. Any of the four properties being off counts as hidden.
    pub fn of(axis: &Axis) -> Self {
        let shown = axis.show_tick_labels() != Some(false)
            && axis.show_grid() != Some(false)
            && axis.title_text().is_some_and(|t| !t.is_empty())
            && axis.ticks().is_some_and(|t| !t.is_empty());
        if shown {
            AxisState::Visible
        } else {
            AxisState::Hidden
        }
    }
}

/// The indexes of the traces that drive the secondary axis.
pub fn line_trace_indexes(figure: &Figure) -> std::ops::Range<usize> {
    let len = figure.traces().len();
    len.saturating_sub(LINE_TRACE_COUNT)..len
}

/// The axis state implied by the current visibility of the line traces.
pub fn axis_state(figure: &Figure) -> AxisState {
    let any_visible = line_trace_indexes(figure)
        .filter_map(|ix| figure.trace(ix))
        .any(|t| t.visible().is_visible());
    if any_visible {
        AxisState::Visible
    } else {
        AxisState::Hidden
    }
}

/// Handles a click on the legend entry of trace `curve`.
///
/// The trace is toggled as the charting library would toggle it. If `curve` is one of the line
/// traces the secondary axis is then shown or hidden and the new state is returned. Clicks on
/// any other trace, or on an index past the end, return `None` and leave the axis alone.
pub fn on_legend_click(figure: &mut Figure, curve: usize) -> Option<AxisState> {
    let trace = figure.trace_mut(curve)?;
    let toggled = trace.visible().toggled();
    trace.set_visible(toggled);

    if !line_trace_indexes(figure).contains(&curve) {
        return None;
    }
    let state = axis_state(figure);
    if let Some(axis) = figure.layout_mut().yaxis2_mut() {
        state.apply(axis);
    }
    Some(state)
}

/// The client-side version of `on_legend_click` for the figure rendered into `div_id`.
///
/// `plotly_legendclick` fires before the default toggle is applied, so the click only records
/// which trace was hit and the axis is updated on the `plotly_restyle` that follows.
pub fn toggle_script(div_id: &str) -> String {
    let div_id = serde_json::Value::String(div_id.to_string());
    let title = serde_json::Value::String(SECONDARY_AXIS_TITLE.to_string());
    format!(
        r#"<script type="text/javascript">
(function () {{
    var gd = document.getElementById({div_id});
    if (!gd || !gd.on) {{ return; }}
    var lineTraceCount = {LINE_TRACE_COUNT};
    var pending = false;
    gd.on('plotly_legendclick', function (evt) {{
        pending = evt.curveNumber >= gd.data.length - lineTraceCount;
    }});
    gd.on('plotly_restyle', function () {{
        if (!pending) {{ return; }}
        pending = false;
        var lines = gd.data.slice(gd.data.length - lineTraceCount);
        var shown = lines.some(function (t) {{
            return t.visible === undefined || t.visible === true;
        }});
        Plotly.relayout(gd, {{
            'yaxis2.showticklabels': shown,
            'yaxis2.title.text': shown ? {title} : '',
            'yaxis2.showgrid': shown,
            'yaxis2.ticks': shown ? '{TICKS_OUTSIDE}' : ''
        }});
    }});
}})();
</script>"#
    )
}
