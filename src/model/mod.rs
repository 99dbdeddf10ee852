//! Types that represent the input tables: the national projection (`WasteTable`), the per-state
//! breakdown (`StateTable`) and the derived `Pivot`.
mod pivot;
mod state;
mod waste;

pub use pivot::Pivot;
pub use state::{State, StateTable, StateWasteRecord};
pub use waste::{SystemType, WasteRecord, WasteTable, NATIONAL_REGION};
