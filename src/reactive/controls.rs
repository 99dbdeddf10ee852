use crate::chart::WasteFilter;
use crate::error::Re;
use crate::model::{SystemType, WasteTable};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The interactive controls of the filtered dashboard, by their element id.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputId {
    YearSlider,
    RegionFilter,
    SystemTypeFilter,
}

serde_plain::derive_display_from_serialize!(InputId);
serde_plain::derive_fromstr_from_deserialize!(InputId);

impl InputId {
    pub const ALL: [InputId; 3] = [
        InputId::YearSlider,
        InputId::RegionFilter,
        InputId::SystemTypeFilter,
    ];
}

/// The components a callback can write to, by their element id.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputId {
    WasteGraph,
}

serde_plain::derive_display_from_serialize!(OutputId);
serde_plain::derive_fromstr_from_deserialize!(OutputId);

/// The current value of every control in one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlState {
    year: i32,
    region: String,
    system: SystemType,
}

impl ControlState {
    pub fn new(year: i32, region: impl Into<String>, system: SystemType) -> Self {
        Self {
            year,
            region: region.into(),
            system,
        }
    }

    /// Builds the state from `(id, value)` pairs such as a parsed query string. Every control
    /// must be present; unknown keys are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Re<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut year = None;
        let mut region = None;
        let mut system = None;
        for (key, value) in pairs {
            let Ok(id) = InputId::from_str(key.as_ref()) else {
                continue;
            };
            let value = value.as_ref();
            match id {
                InputId::YearSlider => {
                    year = Some(
                        value
                            .parse::<i32>()
                            .with_context(|| format!("Invalid value '{value}' for {id}"))?,
                    )
                }
                InputId::RegionFilter => region = Some(value.to_string()),
                InputId::SystemTypeFilter => {
                    system = Some(
                        SystemType::from_str(value)
                            .with_context(|| format!("Invalid value '{value}' for {id}"))?,
                    )
                }
            }
        }
        Ok(Self {
            year: year.ok_or_else(|| missing(InputId::YearSlider))?,
            region: region.ok_or_else(|| missing(InputId::RegionFilter))?,
            system: system.ok_or_else(|| missing(InputId::SystemTypeFilter))?,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn system(&self) -> SystemType {
        self.system
    }

    /// The value of `id` as it would appear in a form field.
    pub fn value(&self, id: InputId) -> String {
        match id {
            InputId::YearSlider => self.year.to_string(),
            InputId::RegionFilter => self.region.clone(),
            InputId::SystemTypeFilter => self.system.to_string(),
        }
    }

    pub fn filter(&self) -> WasteFilter {
        WasteFilter::new(self.region.clone(), self.system, self.year)
    }
}

fn missing(id: InputId) -> anyhow::Error {
    anyhow!("No value was given for {id}")
}

/// The choices offered by each control, derived from the loaded data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlOptions {
    regions: Vec<String>,
    systems: Vec<SystemType>,
    years: Vec<i32>,
    initial: ControlState,
}

impl ControlOptions {
    /// Region and system options are the distinct values of the table in file order. The slider
    /// spans the table's years with a mark on each and starts at the earliest. The initial
    /// dropdown values are `region` and `system`, or the first option when the data has no such
    /// value.
    pub fn from_table(table: &WasteTable, region: &str, system: SystemType) -> Re<Self> {
        let regions: Vec<String> = table.regions().into_iter().map(String::from).collect();
        let systems = table.system_types();
        let years = table.years();

        let initial_region = if regions.iter().any(|r| r == region) {
            region.to_string()
        } else {
            regions
                .first()
                .cloned()
                .context("The national table has no regions")?
        };
        let initial_system = if systems.contains(&system) {
            system
        } else {
            *systems
                .first()
                .context("The national table has no system types")?
        };
        let initial_year = *years.first().context("The national table has no years")?;

        Ok(Self {
            initial: ControlState::new(initial_year, initial_region, initial_system),
            regions,
            systems,
            years,
        })
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn systems(&self) -> &[SystemType] {
        &self.systems
    }

    /// Every year with a slider mark, ascending.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn min_year(&self) -> i32 {
        self.initial.year
    }

    pub fn max_year(&self) -> i32 {
        self.years.last().copied().unwrap_or(self.initial.year)
    }

    /// The state of a freshly loaded page.
    pub fn initial(&self) -> &ControlState {
        &self.initial
    }
}
