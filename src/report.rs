//! Delimited export of a ranking, readable by spreadsheet software.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ReportError;
use crate::ranking::RankedResult;

const HEADER: [&str; 10] = [
    "Origin",
    "Group",
    "Kind",
    "Distance (km)",
    "Duration (min)",
    "Fuel cost",
    "Labor cost",
    "Vehicle cost",
    "Total cost",
    "Rank",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone)]
pub struct ReportFormat {
    pub delimiter: u8,
    pub decimal_separator: char,
    /// Prefix the output with a UTF-8 byte order mark.
    pub bom: bool,
}

impl Default for ReportFormat {
    fn default() -> Self {
        Self {
            delimiter: b';',
            decimal_separator: ',',
            bom: true,
        }
    }
}

impl ReportFormat {
    /// Comma-delimited, dot decimals, no BOM.
    pub fn plain() -> Self {
        Self {
            delimiter: b',',
            decimal_separator: '.',
            bom: false,
        }
    }

    fn number(&self, value: f64, decimals: usize) -> String {
        let text = format!("{value:.decimals$}");
        if self.decimal_separator == '.' {
            text
        } else {
            text.replace('.', &self.decimal_separator.to_string())
        }
    }
}

/// Write one row per ranked origin. `Rank` is 1-based in the output.
pub fn write_report<W: Write>(
    mut out: W,
    ranked: &[RankedResult],
    format: &ReportFormat,
) -> Result<(), ReportError> {
    if format.bom {
        out.write_all(UTF8_BOM)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter)
        .from_writer(out);
    writer.write_record(HEADER)?;
    for row in ranked {
        writer.write_record([
            row.origin.name.clone(),
            row.origin.group.clone(),
            row.origin.kind.to_string(),
            format.number(row.route.distance_km, 1),
            format.number(row.route.duration_min, 1),
            format.number(row.cost.fuel, 2),
            format.number(row.cost.labor, 2),
            format.number(row.cost.vehicle, 2),
            format.number(row.cost.total, 2),
            (row.rank + 1).to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_report(
    path: impl AsRef<Path>,
    ranked: &[RankedResult],
    format: &ReportFormat,
) -> Result<(), ReportError> {
    let path = path.as_ref();
    write_report(BufWriter::new(File::create(path)?), ranked, format)?;
    tracing::info!(rows = ranked.len(), path = %path.display(), "report exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{cost, CostRates};
    use crate::haversine::fallback_route;
    use crate::model::{Coordinate, Origin};

    fn ranked() -> Vec<RankedResult> {
        let at = Coordinate::new(50.0, 19.0).unwrap();
        let origin = Origin::technician("Jan Nowak", "Kraków", Coordinate::new(50.1, 19.1).unwrap(), "");
        let route = fallback_route(origin.location, at);
        let rates = CostRates {
            labor_hourly: 80.0,
            ..CostRates::default()
        };
        let cost = cost(&route, &rates);
        vec![RankedResult {
            origin,
            route,
            cost,
            rank: 0,
            is_best: true,
        }]
    }

    fn render(format: &ReportFormat) -> String {
        let mut buf = Vec::new();
        write_report(&mut buf, &ranked(), format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_default_format_uses_semicolons_and_commas() {
        let text = render(&ReportFormat::default());
        assert!(text.starts_with('\u{feff}'));

        let mut lines = text.trim_start_matches('\u{feff}').lines();
        assert_eq!(
            lines.next(),
            Some("Origin;Group;Kind;Distance (km);Duration (min);Fuel cost;Labor cost;Vehicle cost;Total cost;Rank")
        );
        let row: Vec<&str> = lines.next().unwrap().split(';').collect();
        let route = &ranked()[0].route;
        assert_eq!(row[0], "Jan Nowak");
        assert_eq!(row[2], "technician");
        assert_eq!(row[3], format!("{:.1}", route.distance_km).replace('.', ","));
        assert!(row[6].contains(','));
        assert_eq!(row[9], "1");
    }

    #[test]
    fn test_plain_format() {
        let text = render(&ReportFormat::plain());
        assert!(text.starts_with("Origin,Group,Kind,"));
        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with("Jan Nowak,Kraków,technician,"));
        assert!(row.ends_with(",1"));
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranking.csv");
        export_report(&path, &ranked(), &ReportFormat::plain()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_empty_ranking_writes_header_only() {
        let mut buf = Vec::new();
        write_report(&mut buf, &[], &ReportFormat::plain()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 1);
    }
}
