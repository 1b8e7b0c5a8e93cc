use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::Path;

use crate::app::util::text::sanitize_for_tui;
use crate::error::ConsoleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Drivers,
    Garages,
    VehicleBrands,
    VehicleCategories,
    VehicleColors,
    FuelTypes,
    LicenseTypes,
    Tenants,
    Users,
    InterventionTypes,
    InterventionInvoices,
    ReceptionReports,
    WorkAuthorizations,
}

impl EntityKind {
    pub const ALL: [EntityKind; 13] = [
        EntityKind::Drivers,
        EntityKind::Garages,
        EntityKind::VehicleBrands,
        EntityKind::VehicleCategories,
        EntityKind::VehicleColors,
        EntityKind::FuelTypes,
        EntityKind::LicenseTypes,
        EntityKind::Tenants,
        EntityKind::Users,
        EntityKind::InterventionTypes,
        EntityKind::InterventionInvoices,
        EntityKind::ReceptionReports,
        EntityKind::WorkAuthorizations,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Drivers => "Drivers",
            Self::Garages => "Garages",
            Self::VehicleBrands => "Brands",
            Self::VehicleCategories => "Categories",
            Self::VehicleColors => "Colors",
            Self::FuelTypes => "Fuel types",
            Self::LicenseTypes => "License types",
            Self::Tenants => "Tenants",
            Self::Users => "Users",
            Self::InterventionTypes => "Intervention types",
            Self::InterventionInvoices => "Invoices",
            Self::ReceptionReports => "Reception reports",
            Self::WorkAuthorizations => "Work authorizations",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            Self::Drivers => "driver",
            Self::Garages => "garage",
            Self::VehicleBrands => "vehicle brand",
            Self::VehicleCategories => "vehicle category",
            Self::VehicleColors => "vehicle color",
            Self::FuelTypes => "fuel type",
            Self::LicenseTypes => "license type",
            Self::Tenants => "tenant",
            Self::Users => "user",
            Self::InterventionTypes => "intervention type",
            Self::InterventionInvoices => "intervention invoice",
            Self::ReceptionReports => "reception report",
            Self::WorkAuthorizations => "work authorization",
        }
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|kind| *kind == self)
            .unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(value) => value,
        RawId::Number(value) => value.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Record {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(alias = "name")]
    pub label: String,
    #[serde(default)]
    pub detail: Option<String>,
}

impl Record {
    pub fn new(id: impl Into<String>, label: impl Into<String>, detail: Option<&str>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            detail: detail.map(str::to_string),
        }
    }

    fn sanitized(self) -> Self {
        Self {
            id: self.id,
            label: sanitize_for_tui(&self.label),
            detail: self.detail.map(|detail| sanitize_for_tui(&detail)),
        }
    }
}

/// In-memory stand-in for the back office API: records per entity kind, in
/// listing order.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: BTreeMap<EntityKind, Vec<Record>>,
}

impl RecordStore {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let parsed: BTreeMap<EntityKind, Vec<Record>> = serde_json::from_str(raw)?;
        let records = parsed
            .into_iter()
            .map(|(kind, rows)| (kind, rows.into_iter().map(Record::sanitized).collect()))
            .collect();
        Ok(Self { records })
    }

    pub fn load(path: &Path) -> Result<Self, ConsoleError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConsoleError::FixtureRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw).map_err(|source| ConsoleError::FixtureParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn sample() -> Self {
        let mut store = Self::default();
        store.insert(
            EntityKind::Drivers,
            vec![
                Record::new("1", "Awa Diallo", Some("License B, C")),
                Record::new("2", "Kofi Mensah", Some("License B")),
                Record::new("3", "Nadia Benali", Some("License D, suspended")),
            ],
        );
        store.insert(
            EntityKind::Garages,
            vec![
                Record::new("1", "Garage Central", Some("Abidjan, Plateau")),
                Record::new("2", "Auto Service Nord", Some("Yamoussoukro")),
            ],
        );
        store.insert(
            EntityKind::VehicleBrands,
            vec![
                Record::new("1", "Toyota", None),
                Record::new("2", "Peugeot", None),
                Record::new("3", "Renault", None),
            ],
        );
        store.insert(
            EntityKind::VehicleCategories,
            vec![
                Record::new("1", "Utility", Some("Vans and pickups")),
                Record::new("2", "Passenger", None),
            ],
        );
        store.insert(
            EntityKind::VehicleColors,
            vec![Record::new("1", "White", None), Record::new("2", "Grey", None)],
        );
        store.insert(
            EntityKind::FuelTypes,
            vec![Record::new("1", "Diesel", None), Record::new("2", "Petrol", None)],
        );
        store.insert(
            EntityKind::LicenseTypes,
            vec![
                Record::new("1", "B", Some("Light vehicles")),
                Record::new("2", "C", Some("Heavy goods vehicles")),
            ],
        );
        store.insert(
            EntityKind::Tenants,
            vec![Record::new("1", "Impact Auto CI", Some("Default tenant"))],
        );
        store.insert(
            EntityKind::Users,
            vec![
                Record::new("1", "admin", Some("Administrator")),
                Record::new("2", "workshop", Some("Garage operator")),
            ],
        );
        store.insert(
            EntityKind::InterventionTypes,
            vec![
                Record::new("1", "Oil change", None),
                Record::new("2", "Brake service", None),
            ],
        );
        store.insert(
            EntityKind::InterventionInvoices,
            vec![Record::new("INV-0042", "Invoice INV-0042", Some("Garage Central"))],
        );
        store.insert(
            EntityKind::ReceptionReports,
            vec![Record::new("RR-7", "Reception RR-7", Some("Toyota Hilux, 84 000 km"))],
        );
        store.insert(
            EntityKind::WorkAuthorizations,
            vec![Record::new("WA-3", "Authorization WA-3", Some("Brake service"))],
        );
        store
    }

    pub fn insert(&mut self, kind: EntityKind, records: Vec<Record>) {
        self.records.insert(kind, records);
    }

    pub fn list(&self, kind: EntityKind) -> &[Record] {
        self.records.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn remove(&mut self, kind: EntityKind, id: &str) -> Option<Record> {
        let rows = self.records.get_mut(&kind)?;
        let index = rows.iter().position(|record| record.id == id)?;
        Some(rows.remove(index))
    }

    pub fn total(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }
}

/// Which entity list is on screen and which row is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordsScreen {
    pub kind: EntityKind,
    pub selected: usize,
}

impl Default for RecordsScreen {
    fn default() -> Self {
        Self {
            kind: EntityKind::Drivers,
            selected: 0,
        }
    }
}

impl RecordsScreen {
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self, len: usize) {
        self.selected = usize::min(self.selected + 1, len.saturating_sub(1));
    }
}
