use crate::chart::legend::AxisState;
use crate::chart::{Axis, BarMode, Figure, Layout, LineMode, Side, Trace};
use crate::model::{Pivot, State, StateTable, SystemType};

const TITLE: &str = "Projected Solar Panel Waste in Australia";

/// Fixed line colors of the cumulative series.
fn line_color(system: SystemType) -> &'static str {
    match system {
        SystemType::SmallScale => "#111111",
        SystemType::LargeScale => "#7f7f7f",
    }
}

/// Annual waste per state as stacked bars, overlaid with the cumulative Small-Scale and
/// Large-Scale series on a secondary axis.
///
/// Bars come first, one per state in `State::ALL` order, followed by the two line traces. The
/// legend handler in `chart::legend` relies on the lines being last.
pub fn combo_chart(states: &StateTable, pivot: &Pivot) -> Figure {
    let years = states.years();
    let mut traces: Vec<Trace> = State::ALL
        .iter()
        .map(|state| {
            let y = states.column(*state).into_iter().map(Some).collect();
            Trace::bar(state.to_string(), years.clone(), y)
                .marker_color(state.color())
                .hover_template(format!("{state} %{{x}}: %{{y:,.0f}} t<extra></extra>"))
        })
        .collect();

    for system in SystemType::ALL {
        traces.push(
            Trace::scatter(
                format!("{system} (cumulative)"),
                pivot.years().to_vec(),
                pivot.column(system).to_vec(),
            )
            .mode(LineMode::LinesMarkers)
            .on_secondary_axis()
            .line(line_color(system), 3.0),
        );
    }

    let mut secondary = Axis::new().overlaying_primary().side(Side::Right);
    AxisState::Visible.apply(&mut secondary);

    let layout = Layout::new()
        .title(TITLE)
        .x_axis(Axis::new().title("Year").dtick(1.0))
        .y_axis(Axis::new().title("Annual Waste (Tonnes)"))
        .y_axis2(secondary)
        .bar_mode(BarMode::Stack)
        .legend_at(1.08, 1.0);
    Figure::new(traces, layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::legend::{axis_state, line_trace_indexes};
    use crate::chart::TraceKind;
    use crate::model::{StateWasteRecord, WasteRecord, WasteTable};

    fn states() -> StateTable {
        StateTable::new(vec![StateWasteRecord::new(
            2023,
            [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            None,
        )])
    }

    fn pivot() -> Pivot {
        WasteTable::new(vec![
            WasteRecord::new("Australia", SystemType::SmallScale, 2023, 100.0),
            WasteRecord::new("Australia", SystemType::LargeScale, 2023, 40.0),
        ])
        .pivot("Australia")
    }

    #[test]
    fn test_single_year_stacks_to_total() {
        let states = states();
        let fig = combo_chart(&states, &pivot());
        let bars: Vec<&Trace> = fig
            .traces()
            .iter()
            .filter(|t| t.kind() == TraceKind::Bar)
            .collect();
        assert_eq!(bars.len(), 8);
        let sum: f64 = bars.iter().map(|t| t.y()[0].unwrap()).sum();
        assert_eq!(sum, states.data()[0].total());
        assert_eq!(sum, 36.0);
        assert!(bars.iter().all(|t| t.x() == [2023]));
    }

    #[test]
    fn test_bar_order_and_colors() {
        let fig = combo_chart(&states(), &pivot());
        for (ix, state) in State::ALL.iter().enumerate() {
            let trace = fig.trace(ix).unwrap();
            assert_eq!(trace.name(), state.to_string());
            assert_eq!(trace.marker().unwrap().color(), state.color());
            assert!(!trace.is_secondary());
        }
        assert_eq!(fig.layout().barmode(), Some(BarMode::Stack));
    }

    #[test]
    fn test_lines_are_last_on_secondary_axis() {
        let fig = combo_chart(&states(), &pivot());
        assert_eq!(fig.traces().len(), 10);
        let names: Vec<&str> = line_trace_indexes(&fig)
            .map(|ix| fig.trace(ix).unwrap().name())
            .collect();
        assert_eq!(
            names,
            vec!["Small-Scale (cumulative)", "Large-Scale (cumulative)"]
        );
        for ix in line_trace_indexes(&fig) {
            let trace = fig.trace(ix).unwrap();
            assert_eq!(trace.kind(), TraceKind::Scatter);
            assert!(trace.is_secondary());
        }
        assert_eq!(fig.trace(8).unwrap().y(), &[Some(100.0)]);
        assert_eq!(fig.trace(9).unwrap().y(), &[Some(40.0)]);
    }

    #[test]
    fn test_secondary_axis_starts_visible() {
        let fig = combo_chart(&states(), &pivot());
        let axis = fig.layout().yaxis2().unwrap();
        assert!(axis.is_overlaying());
        assert_eq!(AxisState::of(axis), AxisState::Visible);
        assert_eq!(axis_state(&fig), AxisState::Visible);
    }

    #[test]
    fn test_same_input_same_json() {
        let a = combo_chart(&states(), &pivot()).to_json().unwrap();
        let b = combo_chart(&states(), &pivot()).to_json().unwrap();
        assert_eq!(a, b);
    }
}
