use crate::model::{SystemType, WasteRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Waste records reshaped into one column per `SystemType`, indexed by year.
///
/// A year with no record for a system type holds `None` in that column. When several records
/// share a year and system type their tonnages are summed. The pivot is recomputed from the table
/// on demand and never stored.
#[derive(Default, Debug, Clone, PartialEq, Serialize)]
pub struct Pivot {
    years: Vec<i32>,
    small_scale: Vec<Option<f64>>,
    large_scale: Vec<Option<f64>>,
}

impl Pivot {
    pub(crate) fn new<'a>(records: impl IntoIterator<Item = &'a WasteRecord>) -> Self {
        let mut cells: BTreeMap<i32, [Option<f64>; 2]> = BTreeMap::new();
        for record in records {
            let row = cells.entry(record.year()).or_default();
            let cell = &mut row[column_index(record.system_type())];
            *cell = Some(cell.unwrap_or(0.0) + record.waste_tonnes());
        }

        let mut pivot = Pivot::default();
        for (year, [small, large]) in cells {
            pivot.years.push(year);
            pivot.small_scale.push(small);
            pivot.large_scale.push(large);
        }
        pivot
    }

    /// The index of the pivot, ascending.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// The column for `system`, aligned with `years()`.
    pub fn column(&self, system: SystemType) -> &[Option<f64>] {
        match system {
            SystemType::SmallScale => &self.small_scale,
            SystemType::LargeScale => &self.large_scale,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

fn column_index(system: SystemType) -> usize {
    match system {
        SystemType::SmallScale => 0,
        SystemType::LargeScale => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WasteTable;

    fn table() -> WasteTable {
        WasteTable::new(vec![
            WasteRecord::new("Australia", SystemType::SmallScale, 2024, 150.0),
            WasteRecord::new("Australia", SystemType::SmallScale, 2023, 100.0),
            WasteRecord::new("Australia", SystemType::LargeScale, 2023, 40.0),
            WasteRecord::new("Australia", SystemType::LargeScale, 2025, 90.0),
            WasteRecord::new("NSW", SystemType::SmallScale, 2023, 30.0),
        ])
    }

    #[test]
    fn test_pivot_by_year() {
        let pivot = table().pivot("Australia");
        assert_eq!(pivot.years(), &[2023, 2024, 2025]);
        assert_eq!(
            pivot.column(SystemType::SmallScale),
            &[Some(100.0), Some(150.0), None]
        );
        assert_eq!(
            pivot.column(SystemType::LargeScale),
            &[Some(40.0), None, Some(90.0)]
        );
    }

    #[test]
    fn test_pivot_sums_duplicates() {
        let table = WasteTable::new(vec![
            WasteRecord::new("Australia", SystemType::SmallScale, 2023, 1.5),
            WasteRecord::new("Australia", SystemType::SmallScale, 2023, 2.5),
        ]);
        let pivot = table.pivot("Australia");
        assert_eq!(pivot.column(SystemType::SmallScale), &[Some(4.0)]);
        assert_eq!(pivot.column(SystemType::LargeScale), &[None]);
    }

    #[test]
    fn test_pivot_unknown_region() {
        assert!(table().pivot("Atlantis").is_empty());
    }
}
