//! The data-access object shared by every run mode.
//!
//! `Dataset::load` is called once at startup. The tables it holds are never reloaded or mutated,
//! so the returned `Arc<Dataset>` is shared read-only by the exporter, the callbacks and every
//! connection of the HTTP server.

use crate::error::{ErrorType, IntoResult, Re};
use crate::model::{Pivot, StateTable, WasteTable, NATIONAL_REGION};
use crate::{utils, Config, Result};
use anyhow::{anyhow, Context};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Which input files a run mode needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The national file only, used by the filtered line-chart app.
    National,
    /// The national and the per-state file, used by the combo chart.
    Combo,
}

/// The loaded input tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    national: WasteTable,
    states: Option<StateTable>,
    region: String,
}

impl Dataset {
    /// Reads the input files named by `config`. Any missing file or schema mismatch is a
    /// `ErrorType::Load` error.
    pub async fn load(config: &Config, scope: Scope) -> Result<Arc<Self>> {
        let national = load_national(config.national_csv())
            .await
            .pub_result(ErrorType::Load)?;
        let states = match scope {
            Scope::National => None,
            Scope::Combo => Some(
                load_states(config.state_csv())
                    .await
                    .pub_result(ErrorType::Load)?,
            ),
        };
        Ok(Arc::new(Self {
            national,
            states,
            region: config.default_region().to_string(),
        }))
    }

    /// Builds a dataset from tables that are already in memory.
    pub fn new(
        national: WasteTable,
        states: Option<StateTable>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            national,
            states,
            region: region.into(),
        }
    }

    pub fn national(&self) -> &WasteTable {
        &self.national
    }

    /// The per-state table. Fails if the dataset was loaded with `Scope::National`.
    pub fn states(&self) -> Re<&StateTable> {
        self.states
            .as_ref()
            .ok_or_else(|| anyhow!("The per-state table was not loaded"))
    }

    /// The region the filtered dashboard selects when a page first loads.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The national totals reshaped by year and system type. Independent of `region()`.
    pub fn pivot(&self) -> Pivot {
        self.national.pivot(NATIONAL_REGION)
    }
}

async fn load_national(path: &Path) -> Re<WasteTable> {
    debug!("Loading national waste projections from {}", path.display());
    let content = utils::read(path).await?;
    let table = WasteTable::from_reader(content.as_bytes())
        .with_context(|| format!("Unable to load the national CSV {}", path.display()))?;
    info!("Loaded {} waste records from {}", table.data().len(), path.display());
    Ok(table)
}

async fn load_states(path: &Path) -> Re<StateTable> {
    debug!("Loading per-state waste from {}", path.display());
    let content = utils::read(path).await?;
    let table = StateTable::from_reader(content.as_bytes())
        .with_context(|| format!("Unable to load the state CSV {}", path.display()))?;
    info!("Loaded {} state rows from {}", table.data().len(), path.display());
    Ok(table)
}
