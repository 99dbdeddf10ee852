//! Chart builders. Each builder is a pure function from a view of the data to a `Figure`.

pub mod combo;
mod figure;
pub mod legend;
pub mod line;

pub use combo::combo_chart;
pub use figure::{
    Axis, BarMode, Figure, Layout, Legend, Line, LineMode, Marker, Side, Title, Trace, TraceKind,
    Transition, Visibility,
};
pub use line::{waste_line_chart, WasteFilter};
