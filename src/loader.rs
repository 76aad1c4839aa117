use crate::dataset::{Dataset, DatasetBuilder};
use crate::error::LoadError;
use crate::types::{RawRow, Record};
use crate::util::{clean_text, parse_number_safe, parse_year_safe};
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use std::io;
use std::path::Path;

// Largest integer an f64 holds exactly.
const MAX_EXACT_F64: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub rows: usize,
    pub states: usize,
    pub regions: usize,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
}

impl LoadReport {
    fn for_dataset(dataset: &Dataset) -> Self {
        let bounds = dataset.year_bounds();
        Self {
            rows: dataset.len(),
            states: dataset.state_count(),
            regions: dataset.regions().len(),
            first_year: bounds.map(|(first, _)| first),
            last_year: bounds.map(|(_, last)| last),
        }
    }
}

/// Load the production CSV at `path`.
///
/// The first row that is malformed or breaks a dataset invariant aborts the
/// load; nothing partial is returned.
pub fn load_dataset(path: &Path) -> Result<(Dataset, LoadReport), LoadError> {
    info!("loading dataset from {}", path.display());
    let rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let dataset = read_rows(rdr)?;
    let report = LoadReport::for_dataset(&dataset);
    match (report.first_year, report.last_year) {
        (Some(first), Some(last)) => info!(
            "loaded {} records: {} states in {} regions, {}–{}",
            report.rows, report.states, report.regions, first, last
        ),
        _ => warn!("dataset {} contains no records", path.display()),
    }
    Ok((dataset, report))
}

/// Read a dataset from any CSV source with a header row.
pub fn read_dataset<R: io::Read>(reader: R) -> Result<Dataset, LoadError> {
    let rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    read_rows(rdr)
}

fn read_rows<R: io::Read>(mut rdr: csv::Reader<R>) -> Result<Dataset, LoadError> {
    let mut builder = DatasetBuilder::new();
    for (idx, result) in rdr.deserialize::<RawRow>().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let row = result.map_err(|source| {
            warn!("rejecting line {line}: {source}");
            LoadError::Csv { line, source }
        })?;
        let record = clean_row(row, line).inspect_err(|e| warn!("rejecting {e}"))?;
        builder
            .push(record)
            .map_err(|source| LoadError::Invariant { line, source })
            .inspect_err(|e| warn!("rejecting {e}"))?;
    }
    debug!("read {} rows", builder.len());
    Ok(builder.finish())
}

fn clean_row(row: RawRow, line: usize) -> Result<Record, LoadError> {
    let required = |value: Option<String>, field: &'static str| {
        clean_text(value).ok_or(LoadError::MissingField { line, field })
    };

    let year_raw = required(row.year, "year")?;
    let year = parse_year_safe(Some(&year_raw)).ok_or_else(|| LoadError::InvalidValue {
        line,
        field: "year",
        value: year_raw.clone(),
    })?;
    let state_name = required(row.state_name, "state_name")?;
    let state_code = required(row.state_code, "state_code")?;
    let region_name = required(row.region_name, "region_name")?;
    let quantity_raw = required(row.production_quantity, "production_quantity")?;

    let production_quantity = match parse_quantity(&quantity_raw) {
        Quantity::Valid(v) => v,
        Quantity::Negative => {
            return Err(LoadError::NegativeProduction {
                line,
                state: state_name,
                year,
                value: quantity_raw,
            })
        }
        Quantity::Invalid => {
            return Err(LoadError::InvalidValue {
                line,
                field: "production_quantity",
                value: quantity_raw,
            })
        }
    };

    Ok(Record {
        year,
        state_name,
        state_code,
        region_name,
        production_quantity,
    })
}

#[derive(Debug, PartialEq, Eq)]
enum Quantity {
    Valid(u64),
    Negative,
    Invalid,
}

// Integers parse exactly; decimals are accepted only when integral.
fn parse_quantity(raw: &str) -> Quantity {
    if let Ok(v) = raw.replace(',', "").parse::<u64>() {
        return Quantity::Valid(v);
    }
    match parse_number_safe(Some(raw)) {
        Some(v) if v < 0.0 => Quantity::Negative,
        Some(v) if v.is_finite() && v.fract() == 0.0 && v <= MAX_EXACT_F64 => {
            Quantity::Valid(v as u64)
        }
        _ => Quantity::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DatasetError;

    const HEADER: &str = "year,state_name,state_code,region_name,production_quantity\n";

    fn read(body: &str) -> Result<Dataset, LoadError> {
        read_dataset(format!("{HEADER}{body}").as_bytes())
    }

    #[test]
    fn reads_well_formed_rows() {
        let ds = read("2000,Bahia,BA,Nordeste,1200\n2001, Bahia ,BA,Nordeste,\"1,300\"\n").unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[1].state_name, "Bahia");
        assert_eq!(ds.records()[1].production_quantity, 1300);
    }

    #[test]
    fn accepts_portuguese_headers() {
        let csv = "ano,estado,sigla,regiao,producao\n2024,Mato Grosso,MT,Centro-Oeste,2500000\n";
        let ds = read_dataset(csv.as_bytes()).unwrap();
        assert_eq!(ds.records()[0].state_code, "MT");
        assert_eq!(ds.records()[0].production_quantity, 2_500_000);
    }

    #[test]
    fn rejects_negative_production() {
        let err = read("2000,Bahia,BA,Nordeste,10\n2001,Bahia,BA,Nordeste,-5\n").unwrap_err();
        assert!(matches!(err, LoadError::NegativeProduction { line: 3, year: 2001, .. }));
    }

    #[test]
    fn rejects_missing_region() {
        let err = read("2000,Bahia,BA,,10\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingField {
                line: 2,
                field: "region_name"
            }
        ));
    }

    #[test]
    fn rejects_unparseable_year() {
        let err = read("two thousand,Bahia,BA,Nordeste,10\n").unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { field: "year", .. }));
    }

    #[test]
    fn rejects_fractional_production() {
        let err = read("2000,Bahia,BA,Nordeste,10.5\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidValue {
                field: "production_quantity",
                ..
            }
        ));
    }

    #[test]
    fn rejects_duplicates_with_line_number() {
        let err = read("2000,Bahia,BA,Nordeste,10\n2000,Bahia,BA,Nordeste,11\n").unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(matches!(
            err,
            LoadError::Invariant {
                source: DatasetError::DuplicateObservation { .. },
                ..
            }
        ));
    }

    #[test]
    fn rejects_rows_that_overflow_the_total() {
        let err = read("2000,Acre,AC,Norte,18446744073709551615\n2000,Bahia,BA,Nordeste,1\n")
            .unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(matches!(
            err,
            LoadError::Invariant {
                source: DatasetError::TotalOverflow { year: 2000, .. },
                ..
            }
        ));
    }

    #[test]
    fn header_only_is_empty_dataset() {
        let ds = read("").unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn quantity_parsing() {
        assert_eq!(parse_quantity("42"), Quantity::Valid(42));
        assert_eq!(parse_quantity("1,000"), Quantity::Valid(1000));
        assert_eq!(parse_quantity("7.0"), Quantity::Valid(7));
        assert_eq!(parse_quantity("-1"), Quantity::Negative);
        assert_eq!(parse_quantity("lots"), Quantity::Invalid);
        assert_eq!(parse_quantity("1e400"), Quantity::Invalid);
    }

    #[test]
    fn missing_file_is_open_error() {
        let err = load_dataset(Path::new("/nonexistent/production.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert_eq!(err.line(), None);
    }
}
