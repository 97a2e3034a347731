//! CSV ingest and validation.
//!
//! Turns the SPARC catalog CSV into `GalaxyRecord`s. The schema is strict:
//! a missing column, or a missing/non-numeric value in a required column, is
//! fatal. There is no row skipping, because a silently shortened catalog would
//! change every dataset-wide statistic.
//!
//! Only the raw columns are read. Columns a previous run (or another tool) may
//! have added, such as `M_b_Msun` or `lambda`, are reported and ignored: derived
//! values are always recomputed from the raw columns.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::GalaxyRecord;
use crate::error::AppError;

pub const COL_NAME: &str = "Galaxy";
pub const COL_LUMINOSITY: &str = "L3.6_GLsun";
pub const COL_HI_MASS: &str = "MHI_GMsun";
pub const COL_REFF: &str = "Reff_kpc";
pub const COL_INCLINATION: &str = "i_deg";

pub const REQUIRED_COLUMNS: [&str; 5] = [COL_NAME, COL_LUMINOSITY, COL_HI_MASS, COL_REFF, COL_INCLINATION];

/// Loaded catalog plus what was seen in the header.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub records: Vec<GalaxyRecord>,
    /// Header names as they appear in the file.
    pub columns: Vec<String>,
    /// Header names that are not part of the raw schema.
    pub ignored_columns: Vec<String>,
}

/// Open and parse the catalog at `path`.
pub fn load_catalog(path: &Path) -> Result<Catalog, AppError> {
    if !path.is_file() {
        return Err(AppError::input_schema(format!(
            "Data file not found: {}",
            path.display()
        )));
    }
    let file = File::open(path)
        .map_err(|e| AppError::input_schema(format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_catalog(file)
}

/// Parse a catalog from any reader (used directly by tests).
pub fn read_catalog<R: Read>(source: R) -> Result<Catalog, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input_schema(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let columns: Vec<String> = headers.iter().map(|h| strip_bom(h).to_string()).collect();
    let ignored_columns: Vec<String> = columns
        .iter()
        .filter(|c| !REQUIRED_COLUMNS.iter().any(|r| r.eq_ignore_ascii_case(c)))
        .cloned()
        .collect();

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: one for the header line, one because CSV lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::input_schema(format!("CSV parse error on line {line}: {e}")))?;
        let row = parse_row(&record, &header_map).map_err(|msg| AppError::input_schema(format!("Line {line}: {msg}")))?;
        records.push(row);
    }

    if records.is_empty() {
        return Err(AppError::input_schema("Catalog contains no galaxies."));
    }

    Ok(Catalog {
        records,
        columns,
        ignored_columns,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn strip_bom(name: &str) -> &str {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}')
}

fn normalize_header_name(name: &str) -> String {
    strip_bom(name).to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !header_map.contains_key(&c.to_ascii_lowercase()))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::input_schema(format!(
            "Missing required column(s): {}",
            missing.iter().map(|c| format!("`{c}`")).collect::<Vec<_>>().join(", ")
        )))
    }
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<GalaxyRecord, String> {
    let name = get_required(record, header_map, COL_NAME)?.to_string();
    let l36_glsun = parse_f64(record, header_map, COL_LUMINOSITY)?;
    let mhi_gmsun = parse_f64(record, header_map, COL_HI_MASS)?;
    let reff_kpc = parse_f64(record, header_map, COL_REFF)?;
    let inclination_deg = parse_f64(record, header_map, COL_INCLINATION)?;

    if l36_glsun < 0.0 {
        return Err(format!("`{COL_LUMINOSITY}` must be >= 0 for '{name}' (got {l36_glsun})."));
    }
    if mhi_gmsun < 0.0 {
        return Err(format!("`{COL_HI_MASS}` must be >= 0 for '{name}' (got {mhi_gmsun})."));
    }
    if reff_kpc <= 0.0 {
        return Err(format!("`{COL_REFF}` must be > 0 for '{name}' (got {reff_kpc})."));
    }

    Ok(GalaxyRecord {
        name,
        l36_glsun,
        mhi_gmsun,
        reff_kpc,
        inclination_deg,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(&name.to_ascii_lowercase())
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn parse_f64(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Result<f64, String> {
    let raw = get_required(record, header_map, name)?;
    let v = raw
        .parse::<f64>()
        .map_err(|_| format!("Invalid number '{raw}' in column `{name}`"))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite value '{raw}' in column `{name}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const HEADER: &str = "Galaxy,L3.6_GLsun,MHI_GMsun,Reff_kpc,i_deg";

    #[test]
    fn reads_rows_in_file_order() {
        let csv = format!("{HEADER}\nNGC2403,10.041,3.199,2.16,63\nDDO154,0.053,0.275,0.92,64\n");
        let catalog = read_catalog(csv.as_bytes()).unwrap();
        assert_eq!(catalog.records.len(), 2);
        assert_eq!(catalog.records[0].name, "NGC2403");
        assert_eq!(catalog.records[1].name, "DDO154");
        assert!((catalog.records[1].mhi_gmsun - 0.275).abs() < 1e-12);
        assert!(catalog.ignored_columns.is_empty());
    }

    #[test]
    fn headers_match_case_insensitively_with_bom() {
        let csv = "\u{feff}galaxy,l3.6_glsun,mhi_gmsun,REFF_KPC,I_DEG\nX,1,1,1,45\n";
        let catalog = read_catalog(csv.as_bytes()).unwrap();
        assert_eq!(catalog.records[0].name, "X");
        assert_eq!(catalog.columns[0], "galaxy");
    }

    #[test]
    fn previously_derived_columns_are_ignored() {
        let csv = format!("{HEADER},M_b_Msun,lambda\nX,1,1,1,45,999,0.5\n");
        let catalog = read_catalog(csv.as_bytes()).unwrap();
        assert_eq!(catalog.ignored_columns, vec!["M_b_Msun".to_string(), "lambda".to_string()]);
        assert!((catalog.records[0].l36_glsun - 1.0).abs() < 1e-12);
    }

    #[test]
    fn missing_column_is_schema_error() {
        let csv = "Galaxy,L3.6_GLsun,Reff_kpc\nX,1,1\n";
        let err = read_catalog(csv.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputSchema);
        assert!(err.to_string().contains("`MHI_GMsun`"));
        assert!(err.to_string().contains("`i_deg`"));
    }

    #[test]
    fn malformed_value_reports_line_and_column() {
        let csv = format!("{HEADER}\nA,1,1,1,45\nB,abc,1,1,45\n");
        let err = read_catalog(csv.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputSchema);
        let msg = err.to_string();
        assert!(msg.contains("Line 3"), "{msg}");
        assert!(msg.contains("L3.6_GLsun"), "{msg}");
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        let csv = format!("{HEADER}\nA,1,1,0,45\n");
        let err = read_catalog(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Reff_kpc"));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let err = read_catalog(format!("{HEADER}\n").as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputSchema);
    }

    #[test]
    fn missing_file_is_schema_error() {
        let err = load_catalog(Path::new("definitely/not/here.csv")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputSchema);
        assert!(err.to_string().contains("Data file not found"));
    }
}
