use crate::error::Re;
use crate::model::waste::{reader_builder, require_headers, YEAR_STR};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// An Australian state or territory, by its column abbreviation in the state file.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum State {
    Act,
    Nsw,
    Nt,
    Qld,
    Sa,
    Tas,
    Vic,
    Wa,
}

serde_plain::derive_display_from_serialize!(State);
serde_plain::derive_fromstr_from_deserialize!(State);

impl State {
    /// Every state in column order. Bar traces are stacked in this order.
    pub const ALL: [State; 8] = [
        State::Act,
        State::Nsw,
        State::Nt,
        State::Qld,
        State::Sa,
        State::Tas,
        State::Vic,
        State::Wa,
    ];

    /// The fixed bar color for this state.
    pub fn color(&self) -> &'static str {
        match self {
            State::Act => "#1f77b4",
            State::Nsw => "#ff7f0e",
            State::Nt => "#2ca02c",
            State::Qld => "#d62728",
            State::Sa => "#9467bd",
            State::Tas => "#8c564b",
            State::Vic => "#e377c2",
            State::Wa => "#17becf",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }

    fn header(&self) -> &'static str {
        match self {
            State::Act => "ACT",
            State::Nsw => "NSW",
            State::Nt => "NT",
            State::Qld => "QLD",
            State::Sa => "SA",
            State::Tas => "TAS",
            State::Vic => "VIC",
            State::Wa => "WA",
        }
    }
}

/// A row as it appears in the state file.
#[derive(Debug, Deserialize)]
struct StateRow {
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "ACT")]
    act: f64,
    #[serde(rename = "NSW")]
    nsw: f64,
    #[serde(rename = "NT")]
    nt: f64,
    #[serde(rename = "QLD")]
    qld: f64,
    #[serde(rename = "SA")]
    sa: f64,
    #[serde(rename = "TAS")]
    tas: f64,
    #[serde(rename = "VIC")]
    vic: f64,
    #[serde(rename = "WA")]
    wa: f64,
    #[serde(rename = "Total", default)]
    total: Option<f64>,
}

impl From<StateRow> for StateWasteRecord {
    fn from(row: StateRow) -> Self {
        Self {
            year: row.year,
            values: [
                row.act, row.nsw, row.nt, row.qld, row.sa, row.tas, row.vic, row.wa,
            ],
            total: row.total,
        }
    }
}

/// Annual waste for one year, broken down by state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateWasteRecord {
    year: i32,
    values: [f64; 8],
    total: Option<f64>,
}

impl StateWasteRecord {
    /// `values` are given in `State::ALL` order.
    pub fn new(year: i32, values: [f64; 8], total: Option<f64>) -> Self {
        Self {
            year,
            values,
            total,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn value(&self, state: State) -> f64 {
        self.values[state.index()]
    }

    /// `(state, tonnes)` for every state in stacking order.
    pub fn segments(&self) -> impl Iterator<Item = (State, f64)> + '_ {
        State::ALL.iter().map(move |s| (*s, self.value(*s)))
    }

    /// The `Total` column when the file has one, otherwise the sum of the state columns.
    pub fn total(&self) -> f64 {
        self.total.unwrap_or_else(|| self.values.iter().sum())
    }
}

/// The rows of the per-state file, in file order. Immutable once loaded.
#[derive(Default, Debug, Clone, PartialEq, Serialize)]
pub struct StateTable {
    data: Vec<StateWasteRecord>,
}

impl StateTable {
    pub fn new(data: Vec<StateWasteRecord>) -> Self {
        Self { data }
    }

    /// Parses CSV text with a `Year` column and one column per state. A `Total` column is
    /// optional; other extra columns are ignored.
    pub fn from_reader(reader: impl Read) -> Re<Self> {
        let mut rdr = reader_builder().from_reader(reader);
        let headers = rdr.headers().context("Unable to read the CSV header row")?;
        let mut expected = vec![YEAR_STR];
        expected.extend(State::ALL.iter().map(State::header));
        require_headers(headers, &expected)?;

        let mut data = Vec::new();
        for (ix, result) in rdr.deserialize().enumerate() {
            let row: StateRow =
                result.with_context(|| format!("Invalid state record at row {}", ix + 2))?;
            data.push(row.into());
        }
        Ok(Self { data })
    }

    pub fn data(&self) -> &[StateWasteRecord] {
        &self.data
    }

    pub fn years(&self) -> Vec<i32> {
        self.data.iter().map(StateWasteRecord::year).collect()
    }

    /// One state's column, aligned with `years()`.
    pub fn column(&self, state: State) -> Vec<f64> {
        self.data.iter().map(|r| r.value(state)).collect()
    }
}
