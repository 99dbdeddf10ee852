use crate::error::Re;
use crate::model::pivot::Pivot;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// The installation-size category of a photovoltaic system.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum SystemType {
    #[serde(rename = "Small-Scale")]
    SmallScale,
    #[serde(rename = "Large-Scale")]
    LargeScale,
}

serde_plain::derive_display_from_serialize!(SystemType);
serde_plain::derive_fromstr_from_deserialize!(SystemType);

impl SystemType {
    /// Both categories, in the order their cumulative series are drawn.
    pub const ALL: [SystemType; 2] = [SystemType::SmallScale, SystemType::LargeScale];
}

/// The `Region` value of the national totals, the series drawn as the combo chart's cumulative
/// lines.
pub const NATIONAL_REGION: &str = "Australia";

/// One row of the national waste projection file.
///
/// `Region,System_Type,Year,Waste_Tonnes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteRecord {
    #[serde(rename = "Region")]
    region: String,
    #[serde(rename = "System_Type")]
    system_type: SystemType,
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Waste_Tonnes")]
    waste_tonnes: f64,
}

impl WasteRecord {
    pub fn new(
        region: impl Into<String>,
        system_type: SystemType,
        year: i32,
        waste_tonnes: f64,
    ) -> Self {
        Self {
            region: region.into(),
            system_type,
            year,
            waste_tonnes,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn system_type(&self) -> SystemType {
        self.system_type
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn waste_tonnes(&self) -> f64 {
        self.waste_tonnes
    }
}

pub(super) const REGION_STR: &str = "Region";
pub(super) const SYSTEM_TYPE_STR: &str = "System_Type";
pub(super) const YEAR_STR: &str = "Year";
pub(super) const WASTE_TONNES_STR: &str = "Waste_Tonnes";

const WASTE_HEADERS: [&str; 4] = [REGION_STR, SYSTEM_TYPE_STR, YEAR_STR, WASTE_TONNES_STR];

/// The rows of the national waste projection file, in file order. Immutable once loaded.
#[derive(Default, Debug, Clone, PartialEq, Serialize)]
pub struct WasteTable {
    data: Vec<WasteRecord>,
}

impl WasteTable {
    pub fn new(data: Vec<WasteRecord>) -> Self {
        Self { data }
    }

    /// Parses CSV text. The header row must name every expected column; extra columns are
    /// ignored. `Year` must parse as an integer and `Waste_Tonnes` as a number.
    pub fn from_reader(reader: impl Read) -> Re<Self> {
        let mut rdr = reader_builder().from_reader(reader);
        let headers = rdr.headers().context("Unable to read the CSV header row")?;
        require_headers(headers, &WASTE_HEADERS)?;

        let mut data = Vec::new();
        for (ix, result) in rdr.deserialize().enumerate() {
            // Row 1 is the header.
            let record: WasteRecord =
                result.with_context(|| format!("Invalid waste record at row {}", ix + 2))?;
            data.push(record);
        }
        Ok(Self { data })
    }

    pub fn data(&self) -> &[WasteRecord] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Unique regions in the order they first appear.
    pub fn regions(&self) -> Vec<&str> {
        let mut regions: Vec<&str> = Vec::new();
        for record in &self.data {
            if !regions.contains(&record.region()) {
                regions.push(record.region());
            }
        }
        regions
    }

    /// Unique system types in the order they first appear.
    pub fn system_types(&self) -> Vec<SystemType> {
        let mut types = Vec::new();
        for record in &self.data {
            if !types.contains(&record.system_type()) {
                types.push(record.system_type());
            }
        }
        types
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.data.iter().map(WasteRecord::year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// The smallest and largest year, or `None` for an empty table.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let years = self.years();
        Some((*years.first()?, *years.last()?))
    }

    /// The records of one region and system type up to and including `max_year`, ordered by
    /// year. Records sharing a year keep their file order.
    pub fn select(&self, region: &str, system: SystemType, max_year: i32) -> Vec<&WasteRecord> {
        let mut selected: Vec<&WasteRecord> = self
            .data
            .iter()
            .filter(|r| r.year() <= max_year && r.region() == region && r.system_type() == system)
            .collect();
        selected.sort_by_key(|r| r.year());
        selected
    }

    /// Reshapes the rows of `region` into one column per system type, indexed by year.
    pub fn pivot(&self, region: &str) -> Pivot {
        Pivot::new(self.data.iter().filter(|r| r.region() == region))
    }
}

/// Surrounding whitespace is trimmed from header names only. Field values are kept as written.
pub(super) fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.trim(csv::Trim::Headers);
    builder
}

/// Fails unless every name in `expected` appears in `headers`.
pub(super) fn require_headers(headers: &csv::StringRecord, expected: &[&str]) -> Re<()> {
    let missing: Vec<&str> = expected
        .iter()
        .copied()
        .filter(|name| !headers.iter().any(|h| h == *name))
        .collect();
    if !missing.is_empty() {
        bail!(
            "The CSV header row is missing the column(s) {}; found {}",
            missing.join(", "),
            headers.iter().collect::<Vec<_>>().join(",")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const CSV: &str = "\
Region,System_Type,Year,Waste_Tonnes
Australia,Small-Scale,2023,100
Australia,Small-Scale,2024,150
Australia,Large-Scale,2023,40
Australia,Large-Scale,2024,65.5
NSW,Small-Scale,2023,30
NSW,Small-Scale,2024,45
";

    fn table() -> WasteTable {
        WasteTable::from_reader(CSV.as_bytes()).unwrap()
    }

    #[test]
    fn test_system_type_display_and_parse() {
        assert_eq!(SystemType::SmallScale.to_string(), "Small-Scale");
        assert_eq!(SystemType::LargeScale.to_string(), "Large-Scale");
        assert_eq!(
            SystemType::from_str("Large-Scale").unwrap(),
            SystemType::LargeScale
        );
        assert!(SystemType::from_str("Medium-Scale").is_err());
    }

    #[test]
    fn test_parse() {
        let table = table();
        assert_eq!(table.data().len(), 6);
        let first = &table.data()[0];
        assert_eq!(first.region(), "Australia");
        assert_eq!(first.system_type(), SystemType::SmallScale);
        assert_eq!(first.year(), 2023);
        assert_eq!(first.waste_tonnes(), 100.0);
        assert_eq!(table.data()[3].waste_tonnes(), 65.5);
    }

    #[test]
    fn test_parse_columns_in_any_order() {
        let csv = "Year,Waste_Tonnes,Region,System_Type\n2030,12,VIC,Large-Scale\n";
        let table = WasteTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(
            table.data(),
            &[WasteRecord::new("VIC", SystemType::LargeScale, 2030, 12.0)]
        );
    }

    #[test]
    fn test_fields_are_not_trimmed() {
        let csv = "Region, System_Type ,Year,Waste_Tonnes\n NSW,Small-Scale,2023,5\n";
        let table = WasteTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.regions(), vec![" NSW"]);
        assert!(table.select("NSW", SystemType::SmallScale, 2023).is_empty());
    }

    #[test]
    fn test_missing_column() {
        let csv = "Region,System_Type,Year\nAustralia,Small-Scale,2023\n";
        let err = WasteTable::from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Waste_Tonnes"), "{err}");
    }

    #[test]
    fn test_bad_year() {
        let csv = "Region,System_Type,Year,Waste_Tonnes\nAustralia,Small-Scale,soon,1\n";
        let err = WasteTable::from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("row 2"), "{err}");
    }

    #[test]
    fn test_unknown_system_type() {
        let csv = "Region,System_Type,Year,Waste_Tonnes\nAustralia,Rooftop,2023,1\n";
        assert!(WasteTable::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_unique_values() {
        let table = table();
        assert_eq!(table.regions(), vec!["Australia", "NSW"]);
        assert_eq!(
            table.system_types(),
            vec![SystemType::SmallScale, SystemType::LargeScale]
        );
        assert_eq!(table.years(), vec![2023, 2024]);
        assert_eq!(table.year_range(), Some((2023, 2024)));
        assert_eq!(WasteTable::default().year_range(), None);
    }

    #[test]
    fn test_select() {
        let table = table();
        let selected = table.select("Australia", SystemType::SmallScale, 2024);
        let points: Vec<(i32, f64)> = selected
            .iter()
            .map(|r| (r.year(), r.waste_tonnes()))
            .collect();
        assert_eq!(points, vec![(2023, 100.0), (2024, 150.0)]);

        let selected = table.select("Australia", SystemType::SmallScale, 2023);
        assert_eq!(selected.len(), 1);

        assert!(table.select("Tasmania", SystemType::SmallScale, 2024).is_empty());
        assert!(table.select("NSW", SystemType::LargeScale, 2024).is_empty());
    }

    #[test]
    fn test_select_orders_by_year() {
        let table = WasteTable::new(vec![
            WasteRecord::new("WA", SystemType::SmallScale, 2025, 3.0),
            WasteRecord::new("WA", SystemType::SmallScale, 2023, 1.0),
            WasteRecord::new("WA", SystemType::SmallScale, 2024, 2.0),
        ]);
        let years: Vec<i32> = table
            .select("WA", SystemType::SmallScale, 2030)
            .iter()
            .map(|r| r.year())
            .collect();
        assert_eq!(years, vec![2023, 2024, 2025]);
    }
}
