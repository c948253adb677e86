// ==========================================
// Trade Import - Alias Table
// ==========================================
// Static mapping from header synonyms to canonical fields, scoped per
// target table. Built once at startup and injected into resolvers;
// never mutated at runtime. Alias strings here are human-supplied with
// arbitrary capitalization/spacing - the resolver normalizes them at
// construction time.
// ==========================================

use crate::domain::{CanonicalField, TargetTable};

/// Per-table alias sets. Order within a table is resolution order
/// (first canonical field whose alias set contains a key wins).
#[derive(Debug, Clone)]
pub struct TableAliasMap {
    tables: Vec<(TargetTable, Vec<(CanonicalField, Vec<&'static str>)>)>,
}

impl TableAliasMap {
    /// The built-in alias vocabulary for trade-shipment spreadsheets.
    pub fn builtin() -> Self {
        let map = Self {
            tables: vec![
                (TargetTable::Shipments, shipment_aliases()),
                (TargetTable::Companies, company_aliases()),
            ],
        };
        debug_assert!(map.validate().is_ok(), "builtin alias table out of sync");
        map
    }

    pub fn aliases_for(&self, table: TargetTable) -> &[(CanonicalField, Vec<&'static str>)] {
        self.tables
            .iter()
            .find(|(t, _)| *t == table)
            .map(|(_, aliases)| aliases.as_slice())
            .unwrap_or(&[])
    }

    /// Every canonical field referenced must be a member of its table's
    /// canonical schema.
    pub fn validate(&self) -> Result<(), String> {
        for (table, aliases) in &self.tables {
            for (field, _) in aliases {
                if !table.schema().iter().any(|d| d.field == *field) {
                    return Err(format!(
                        "alias table references {} which is not in the {} schema",
                        field,
                        table.as_str()
                    ));
                }
            }
        }
        Ok(())
    }
}

fn shipment_aliases() -> Vec<(CanonicalField, Vec<&'static str>)> {
    vec![
        (
            CanonicalField::UnifiedCompanyName,
            vec![
                "Company Name",
                "Company",
                "Unified Company",
                "Importer",
                "Importer Name",
                "Customer",
                "Buyer",
            ],
        ),
        (
            CanonicalField::ShipperName,
            vec!["Shipper", "Shipper Name", "Exporter", "Supplier", "Seller"],
        ),
        (
            CanonicalField::ConsigneeName,
            vec!["Consignee", "Consignee Name", "Receiver", "Notify Party"],
        ),
        (
            CanonicalField::OriginCountry,
            vec![
                "Origin Country",
                "Country of Origin",
                "Origin",
                "Export Country",
            ],
        ),
        (
            CanonicalField::DestinationCountry,
            vec![
                "Destination Country",
                "Destination",
                "Country of Destination",
                "Import Country",
            ],
        ),
        (
            CanonicalField::HsCode,
            vec![
                "HS Code",
                "HS-Code",
                "HTS Code",
                "Tariff Code",
                "Harmonized Code",
            ],
        ),
        (
            CanonicalField::Description,
            vec![
                "Description",
                "Product Description",
                "Goods Description",
                "Commodity",
                "Product",
            ],
        ),
        (
            CanonicalField::GrossWeightKg,
            vec![
                "Gross Weight (KG)",
                "Total Weight (KG)",
                "Weight (KG)",
                "Gross Weight",
                "Weight KG",
                "Weight",
            ],
        ),
        (
            CanonicalField::ValueUsd,
            vec![
                "Value (USD)",
                "USD Value",
                "Total Value",
                "Invoice Value",
                "CIF Value",
                "Value",
            ],
        ),
        (
            CanonicalField::UnifiedDate,
            vec![
                "Date",
                "Shipment Date",
                "Arrival Date",
                "Import Date",
                "Export Date",
            ],
        ),
        (
            CanonicalField::Mode,
            vec![
                "Mode",
                "Transport Mode",
                "Mode of Transport",
                "Shipment Mode",
            ],
        ),
        (CanonicalField::Quantity, vec!["Quantity", "Qty", "Units"]),
        (
            CanonicalField::ContainerCount,
            vec![
                "Containers",
                "Container Count",
                "Number of Containers",
                "TEU",
            ],
        ),
        (
            CanonicalField::VesselName,
            vec!["Vessel", "Vessel Name", "Ship Name"],
        ),
        (
            CanonicalField::BillOfLadingNumber,
            vec![
                "Bill of Lading",
                "Bill of Lading Number",
                "BL Number",
                "B/L Number",
                "BOL",
            ],
        ),
    ]
}

// For the companies table, shipper/consignee style headers all describe
// the company itself - no dedicated counterpart fields exist here.
fn company_aliases() -> Vec<(CanonicalField, Vec<&'static str>)> {
    vec![
        (
            CanonicalField::UnifiedCompanyName,
            vec![
                "Company",
                "Company Name",
                "Name",
                "Consignee",
                "Shipper",
                "Importer",
                "Exporter",
            ],
        ),
        (
            CanonicalField::OriginCountry,
            vec!["Country", "Origin Country", "Location"],
        ),
        (
            CanonicalField::Description,
            vec!["Description", "Notes", "About"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_validates() {
        assert!(TableAliasMap::builtin().validate().is_ok());
    }

    #[test]
    fn test_every_shipment_field_has_aliases() {
        let map = TableAliasMap::builtin();
        let aliases = map.aliases_for(TargetTable::Shipments);
        for field_def in TargetTable::Shipments.schema() {
            assert!(
                aliases.iter().any(|(f, _)| *f == field_def.field),
                "no aliases for {}",
                field_def.field
            );
        }
    }
}
