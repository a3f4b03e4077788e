//! Best-effort CSV ingestion for the technician, site and workshop sheets.
//!
//! Column headers are sniffed case-insensitively in Polish and English.
//! Rows that cannot be used are reported by name, never fatal.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::RosterError;
use crate::model::{Coordinate, Destination, Origin};
use crate::resolver::{is_present, TechnicianRecord};

const FIRST_NAME: &[&str] = &["imię", "imie", "first name", "first_name", "firstname"];
const LAST_NAME: &[&str] = &["nazwisko", "last name", "last_name", "lastname", "surname"];
const POSTAL_CODE: &[&str] = &["kod pocztowy", "kod", "postal code", "postal_code", "postcode", "zip"];
const CITY: &[&str] = &["miasto", "miejscowość", "city", "town"];
const STREET: &[&str] = &["ulica", "adres", "street", "address"];
const GROUP: &[&str] = &["warsztat", "workshop", "group", "grupa"];
const SITE_NAME: &[&str] = &["nazwa", "name", "budowa", "site"];
const SITE_ID: &[&str] = &["kost", "id", "identifier", "code", "kod budowy"];
/// Substrings identifying a coordinate column.
const COORDINATE_HINTS: &[&str] = &["współrzędne", "wspolrzedne", "wspol", "coord"];
/// Substrings identifying a workshop name column.
const NAME_HINTS: &[&str] = &["nazwa", "name"];

/// Rows read from a sheet plus the rows that were left out.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub items: Vec<T>,
    /// Name (or `row N`) of each skipped row.
    pub skipped: Vec<String>,
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

struct Columns {
    headers: Vec<String>,
}

impl Columns {
    fn new(headers: &csv::StringRecord) -> Self {
        Self {
            headers: headers.iter().map(|h| h.trim().to_lowercase()).collect(),
        }
    }

    fn exact(&self, aliases: &[&str]) -> Option<usize> {
        self.headers.iter().position(|h| aliases.contains(&h.as_str()))
    }

    fn containing(&self, hints: &[&str]) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| hints.iter().any(|hint| h.contains(hint)))
    }

    fn len(&self) -> usize {
        self.headers.len()
    }
}

fn field(record: &csv::StringRecord, column: Option<usize>) -> String {
    column
        .and_then(|index| record.get(index))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().flexible(true).from_reader(reader)
}

/// Technician rows. Addresses are left for the resolver.
pub fn read_technicians<R: Read>(reader: R) -> Result<Vec<TechnicianRecord>, RosterError> {
    let mut reader = csv_reader(reader);
    let columns = Columns::new(reader.headers()?);
    let first = columns.exact(FIRST_NAME);
    let last = columns.exact(LAST_NAME);
    let postal = columns.exact(POSTAL_CODE);
    let city = columns.exact(CITY);
    let street = columns.exact(STREET);
    let group = columns.exact(GROUP);
    let coords = columns.containing(COORDINATE_HINTS);

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(TechnicianRecord {
            first_name: field(&record, first),
            last_name: field(&record, last),
            street: field(&record, street),
            postal_code: field(&record, postal),
            city: field(&record, city),
            coordinates: field(&record, coords),
            group: field(&record, group),
        });
    }
    tracing::debug!(rows = records.len(), "technician sheet read");
    Ok(records)
}

/// Construction sites. Needs a coordinate column, or at least three
/// columns so the last one can be assumed to hold coordinates.
pub fn read_sites<R: Read>(reader: R) -> Result<Loaded<Destination>, RosterError> {
    let mut reader = csv_reader(reader);
    let columns = Columns::new(reader.headers()?);
    let coords = match columns.containing(COORDINATE_HINTS) {
        Some(index) => index,
        None if columns.len() >= 3 => columns.len() - 1,
        None => return Err(RosterError::MissingCoordinateColumn("site")),
    };
    let name = columns.exact(SITE_NAME);
    let identifier = columns.exact(SITE_ID);

    let mut loaded = Loaded::default();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let site_name = field(&record, name);
        match field(&record, Some(coords)).parse::<Coordinate>() {
            Ok(location) => loaded
                .items
                .push(Destination::site(site_name, field(&record, identifier), location)),
            Err(err) => {
                let label = row_label(site_name, index);
                tracing::warn!(site = %label, error = %err, "site skipped");
                loaded.skipped.push(label);
            }
        }
    }
    Ok(loaded)
}

/// Workshops. Name and coordinate columns are sniffed, falling back to the
/// first and last column. A sheet with fewer than two columns is empty.
pub fn read_workshops<R: Read>(reader: R) -> Result<Loaded<Destination>, RosterError> {
    let mut reader = csv_reader(reader);
    let columns = Columns::new(reader.headers()?);
    if columns.len() < 2 {
        tracing::warn!("workshop sheet has no usable columns");
        return Ok(Loaded::default());
    }
    let coords = columns
        .containing(COORDINATE_HINTS)
        .unwrap_or(columns.len() - 1);
    let name = columns.containing(NAME_HINTS).unwrap_or(0);

    let mut loaded = Loaded::default();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let workshop_name = field(&record, Some(name));
        match field(&record, Some(coords)).parse::<Coordinate>() {
            Ok(location) => loaded.items.push(Destination::workshop(workshop_name, location)),
            Err(err) => {
                let label = row_label(workshop_name, index);
                tracing::warn!(workshop = %label, error = %err, "workshop skipped");
                loaded.skipped.push(label);
            }
        }
    }
    Ok(loaded)
}

fn row_label(name: String, index: usize) -> String {
    if is_present(&name) {
        name
    } else {
        format!("row {}", index + 1)
    }
}

pub fn load_technicians(path: impl AsRef<Path>) -> Result<Vec<TechnicianRecord>, RosterError> {
    read_technicians(File::open(path)?)
}

pub fn load_sites(path: impl AsRef<Path>) -> Result<Loaded<Destination>, RosterError> {
    read_sites(File::open(path)?)
}

pub fn load_workshops(path: impl AsRef<Path>) -> Result<Loaded<Destination>, RosterError> {
    read_workshops(File::open(path)?)
}

/// Which origins take part in an analysis.
///
/// Empty lists select everything.
#[derive(Debug, Clone, Default)]
pub struct RosterFilter {
    pub groups: Vec<String>,
    pub names: Vec<String>,
}

impl RosterFilter {
    pub fn apply(&self, origins: &[Origin]) -> Vec<Origin> {
        origins
            .iter()
            .filter(|origin| self.groups.is_empty() || self.groups.contains(&origin.group))
            .filter(|origin| self.names.is_empty() || self.names.contains(&origin.name))
            .cloned()
            .collect()
    }
}

/// Distinct groups in roster order, e.g. to populate a filter.
pub fn groups(origins: &[Origin]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for origin in origins {
        if !seen.contains(&origin.group) {
            seen.push(origin.group.clone());
        }
    }
    seen
}

/// Attach opaque tags (equipment counts and the like) to destinations.
///
/// `tags` is keyed by free-text site identifier. A destination matches on
/// its identifier first, then on its name; keys are compared trimmed and
/// case-insensitively. Returns how many destinations were enriched.
pub fn enrich_tags(
    destinations: &mut [Destination],
    tags: &HashMap<String, BTreeMap<String, String>>,
) -> usize {
    let normalized: HashMap<String, &BTreeMap<String, String>> = tags
        .iter()
        .map(|(key, value)| (key.trim().to_lowercase(), value))
        .collect();

    let mut enriched = 0;
    for destination in destinations.iter_mut() {
        let by_id = Some(destination.identifier.trim().to_lowercase())
            .filter(|id| !id.is_empty())
            .and_then(|id| normalized.get(&id));
        let found = by_id.or_else(|| normalized.get(&destination.name.trim().to_lowercase()));
        if let Some(extra) = found {
            destination
                .tags
                .extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
            enriched += 1;
        }
    }
    enriched
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_polish_technician_sheet() {
        let sheet = "\
Imię,Nazwisko,Ulica,Kod pocztowy,Miasto,Warsztat
Jan,Nowak,ul. Długa 1,31-147,Kraków,Kraków
Anna,Kowalska,,33-100,Tarnów,Tarnów
";
        let records = read_technicians(sheet.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].display_name(), "Jan Nowak");
        assert_eq!(records[0].address().as_deref(), Some("ul. Długa 1 31-147 Kraków"));
        assert_eq!(records[1].address().as_deref(), Some("33-100 Tarnów"));
        assert_eq!(records[1].group, "Tarnów");
    }

    #[test]
    fn test_reads_english_headers_with_coordinates() {
        let sheet = "first name,last name,postal code,city,workshop,coordinates\n\
                     Jan,Nowak,,,Kraków,\"50.06, 19.94\"\n";
        let records = read_technicians(sheet.as_bytes()).unwrap();
        assert_eq!(records[0].coordinates, "50.06, 19.94");
        assert_eq!(records[0].group, "Kraków");
    }

    #[test]
    fn test_sites_skip_bad_coordinates() {
        let sheet = "\
NAZWA,KOST,WSPÓŁRZĘDNE
Budowa A,K-01,\"50.06, 19.94\"
Budowa B,K-02,brak
,K-03,
";
        let loaded = read_sites(sheet.as_bytes()).unwrap();
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].name, "Budowa A");
        assert_eq!(loaded.items[0].identifier, "K-01");
        assert_eq!(loaded.skipped, vec!["Budowa B".to_string(), "row 3".to_string()]);
    }

    #[test]
    fn test_sites_fall_back_to_last_column() {
        let sheet = "NAZWA,KOST,POZYCJA\nBudowa A,K-01,\"50.0, 19.0\"\n";
        let loaded = read_sites(sheet.as_bytes()).unwrap();
        assert_eq!(loaded.items[0].location.as_tuple(), (50.0, 19.0));
    }

    #[test]
    fn test_sites_without_coordinate_column_fail() {
        let sheet = "NAZWA,KOST\nBudowa A,K-01\n";
        assert!(matches!(
            read_sites(sheet.as_bytes()),
            Err(RosterError::MissingCoordinateColumn("site"))
        ));
    }

    #[test]
    fn test_workshops_use_first_and_last_columns() {
        let sheet = "Warsztat,Miejsce\nKraków,\"50.05, 19.95\"\nTarnów,x\n";
        let loaded = read_workshops(sheet.as_bytes()).unwrap();
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].name, "Kraków");
        assert_eq!(loaded.skipped, vec!["Tarnów".to_string()]);
    }

    #[test]
    fn test_single_column_workshop_sheet_is_empty() {
        let loaded = read_workshops("Warsztat\nKraków\n".as_bytes()).unwrap();
        assert!(loaded.items.is_empty());
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn test_loaded_default_needs_no_default_items() {
        let loaded: Loaded<Destination> = Loaded::default();
        assert!(loaded.items.is_empty());
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn test_load_sheets_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let technicians = dir.path().join("mechanicy.csv");
        let sites = dir.path().join("budowy.csv");
        std::fs::write(&technicians, "Imię,Nazwisko,Miasto\nJan,Nowak,Kraków\n").unwrap();
        std::fs::write(&sites, "NAZWA,KOST,COORDS\nBudowa A,K-01,\"50.0, 19.0\"\n").unwrap();

        assert_eq!(load_technicians(&technicians).unwrap()[0].city, "Kraków");
        assert_eq!(load_sites(&sites).unwrap().items.len(), 1);
        assert!(matches!(
            load_workshops(dir.path().join("missing.csv")),
            Err(RosterError::Io(_))
        ));
    }

    #[test]
    fn test_filter_by_group_and_name() {
        let at = Coordinate::new(50.0, 19.0).unwrap();
        let origins = vec![
            Origin::technician("Jan Nowak", "Kraków", at, ""),
            Origin::technician("Anna Kowalska", "Tarnów", at, ""),
            Origin::technician("Ewa Lis", "Kraków", at, ""),
        ];

        let by_group = RosterFilter {
            groups: vec!["Kraków".to_string()],
            names: vec![],
        };
        assert_eq!(by_group.apply(&origins).len(), 2);

        let by_both = RosterFilter {
            groups: vec!["Kraków".to_string()],
            names: vec!["Ewa Lis".to_string(), "Anna Kowalska".to_string()],
        };
        let picked = by_both.apply(&origins);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].name, "Ewa Lis");

        assert_eq!(RosterFilter::default().apply(&origins).len(), 3);
        assert_eq!(groups(&origins), vec!["Kraków".to_string(), "Tarnów".to_string()]);
    }

    #[test]
    fn test_enrich_tags_by_identifier_then_name() {
        let at = Coordinate::new(50.0, 19.0).unwrap();
        let mut sites = vec![
            Destination::site("Budowa A", "K-01", at),
            Destination::site("Budowa B", "", at),
            Destination::site("Budowa C", "K-03", at),
        ];
        let mut tags = HashMap::new();
        tags.insert(" k-01 ".to_string(), BTreeMap::from([("koparki".to_string(), "2".to_string())]));
        tags.insert("budowa b".to_string(), BTreeMap::from([("dźwigi".to_string(), "1".to_string())]));

        assert_eq!(enrich_tags(&mut sites, &tags), 2);
        assert_eq!(sites[0].tags.get("koparki").map(String::as_str), Some("2"));
        assert_eq!(sites[1].tags.get("dźwigi").map(String::as_str), Some("1"));
        assert!(sites[2].tags.is_empty());
    }
}
