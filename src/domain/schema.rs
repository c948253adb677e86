// ==========================================
// Trade Import - Canonical Schema
// ==========================================
// The fixed storage schema every recognized header synonym resolves to.
// Field names are stable across implementations: they are the contract
// with any previously persisted shipment data.
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// CanonicalField
// ==========================================
// Closed set of storage field names. The serialized form (snake_case)
// is the wire/storage name and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    UnifiedCompanyName,
    ShipperName,
    ConsigneeName,
    OriginCountry,
    DestinationCountry,
    HsCode,
    Description,
    GrossWeightKg,
    ValueUsd,
    UnifiedDate,
    Mode,
    Quantity,
    ContainerCount,
    VesselName,
    BillOfLadingNumber,
}

impl CanonicalField {
    /// Stable storage column name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::UnifiedCompanyName => "unified_company_name",
            CanonicalField::ShipperName => "shipper_name",
            CanonicalField::ConsigneeName => "consignee_name",
            CanonicalField::OriginCountry => "origin_country",
            CanonicalField::DestinationCountry => "destination_country",
            CanonicalField::HsCode => "hs_code",
            CanonicalField::Description => "description",
            CanonicalField::GrossWeightKg => "gross_weight_kg",
            CanonicalField::ValueUsd => "value_usd",
            CanonicalField::UnifiedDate => "unified_date",
            CanonicalField::Mode => "mode",
            CanonicalField::Quantity => "quantity",
            CanonicalField::ContainerCount => "container_count",
            CanonicalField::VesselName => "vessel_name",
            CanonicalField::BillOfLadingNumber => "bill_of_lading_number",
        }
    }

    /// Semantic type driving cell coercion in the row canonicalizer.
    pub fn semantic_type(&self) -> SemanticType {
        match self {
            CanonicalField::GrossWeightKg
            | CanonicalField::ValueUsd
            | CanonicalField::Quantity
            | CanonicalField::ContainerCount => SemanticType::Number,
            CanonicalField::UnifiedDate => SemanticType::Date,
            _ => SemanticType::Text,
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value type a canonical field carries after coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Text,
    Number,
    Date,
}

// ==========================================
// TargetTable
// ==========================================
// Alias resolution is scoped per target table. The same raw header may
// resolve differently per table ("Consignee" is a dedicated field for
// shipments but a synonym for the general company field for companies).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetTable {
    Shipments,
    Companies,
}

impl TargetTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetTable::Shipments => "shipments",
            TargetTable::Companies => "companies",
        }
    }

    /// Ordered canonical schema for this table.
    pub fn schema(&self) -> &'static [FieldDef] {
        match self {
            TargetTable::Shipments => SHIPMENTS_SCHEMA,
            TargetTable::Companies => COMPANIES_SCHEMA,
        }
    }
}

/// One canonical field definition within a table schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub field: CanonicalField,
    pub kind: SemanticType,
    pub nullable: bool,
}

const fn def(field: CanonicalField, kind: SemanticType, nullable: bool) -> FieldDef {
    FieldDef {
        field,
        kind,
        nullable,
    }
}

static SHIPMENTS_SCHEMA: &[FieldDef] = &[
    def(CanonicalField::UnifiedCompanyName, SemanticType::Text, false),
    def(CanonicalField::ShipperName, SemanticType::Text, true),
    def(CanonicalField::ConsigneeName, SemanticType::Text, true),
    def(CanonicalField::OriginCountry, SemanticType::Text, true),
    def(CanonicalField::DestinationCountry, SemanticType::Text, true),
    def(CanonicalField::HsCode, SemanticType::Text, true),
    def(CanonicalField::Description, SemanticType::Text, true),
    def(CanonicalField::GrossWeightKg, SemanticType::Number, true),
    def(CanonicalField::ValueUsd, SemanticType::Number, true),
    def(CanonicalField::UnifiedDate, SemanticType::Date, true),
    def(CanonicalField::Mode, SemanticType::Text, true),
    def(CanonicalField::Quantity, SemanticType::Number, true),
    def(CanonicalField::ContainerCount, SemanticType::Number, true),
    def(CanonicalField::VesselName, SemanticType::Text, true),
    def(CanonicalField::BillOfLadingNumber, SemanticType::Text, true),
];

static COMPANIES_SCHEMA: &[FieldDef] = &[
    def(CanonicalField::UnifiedCompanyName, SemanticType::Text, false),
    def(CanonicalField::OriginCountry, SemanticType::Text, true),
    def(CanonicalField::Description, SemanticType::Text, true),
];

// ==========================================
// CanonicalValue / CanonicalRow
// ==========================================

/// A typed cell value after coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanonicalValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl CanonicalValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CanonicalValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CanonicalValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CanonicalValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

/// One fully resolved, type-coerced record ready for batch storage.
/// Empty/unresolvable source cells are omitted rather than defaulted,
/// so this is always a partial view of the canonical schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRow(BTreeMap<CanonicalField, CanonicalValue>);

impl CanonicalRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last writer wins when two raw columns resolve to the same field.
    pub fn insert(&mut self, field: CanonicalField, value: CanonicalValue) {
        self.0.insert(field, value);
    }

    pub fn get(&self, field: CanonicalField) -> Option<&CanonicalValue> {
        self.0.get(&field)
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalField, &CanonicalValue)> {
        self.0.iter()
    }

    /// Trimmed company name, if present.
    pub fn company_name(&self) -> Option<&str> {
        self.get(CanonicalField::UnifiedCompanyName)
            .and_then(CanonicalValue::as_text)
    }
}
