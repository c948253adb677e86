// ==========================================
// Trade Import - Header-to-Schema Mapper
// ==========================================
// Applies the alias resolver across a whole header row. The resulting
// mapping is computed once per uploaded file, immutable thereafter, and
// consumed by the row canonicalizer for positional fallback.
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::CanonicalField;
use crate::importer::resolver::AliasResolver;

/// Positional mapping for one uploaded file: same length and order as
/// the original header row.
#[derive(Debug, Clone)]
pub struct HeaderMapping {
    entries: Vec<(String, Option<CanonicalField>)>,
}

impl HeaderMapping {
    pub fn from_headers(resolver: &AliasResolver, headers: &[String]) -> Self {
        let entries = headers
            .iter()
            .map(|h| (h.clone(), resolver.resolve(Some(h))))
            .collect();
        Self { entries }
    }

    /// Canonical field for a column index, if the index is in range and
    /// the column was recognized.
    pub fn canonical_at(&self, index: usize) -> Option<CanonicalField> {
        self.entries.get(index).and_then(|(_, c)| *c)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<CanonicalField>)> {
        self.entries.iter().map(|(h, c)| (h.as_str(), *c))
    }
}

/// Element-wise resolution, positional, same length and order as input.
pub fn map_headers_to_canonical(
    resolver: &AliasResolver,
    headers: &[String],
) -> Vec<Option<CanonicalField>> {
    headers.iter().map(|h| resolver.resolve(Some(h))).collect()
}

/// One line of the upload-time mapping preview shown for human review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderPreview {
    pub original: String,
    pub canonical: Option<CanonicalField>,
    pub recognized: bool,
}

/// Read-only projection of the header mapping for upload-time feedback.
/// Mutates no job or schema state.
pub fn preview_header_mapping(resolver: &AliasResolver, headers: &[String]) -> Vec<HeaderPreview> {
    headers
        .iter()
        .map(|h| {
            let canonical = resolver.resolve(Some(h));
            HeaderPreview {
                original: h.clone(),
                recognized: canonical.is_some(),
                canonical,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TargetTable;

    fn headers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_positional_mapping_preserves_order_and_length() {
        let resolver = AliasResolver::for_table(TargetTable::Shipments);
        let input = headers(&["Shipper", "Mystery Column", "HS Code"]);
        let mapped = map_headers_to_canonical(&resolver, &input);
        assert_eq!(
            mapped,
            vec![
                Some(CanonicalField::ShipperName),
                None,
                Some(CanonicalField::HsCode),
            ]
        );
    }

    #[test]
    fn test_preview_recognized_headers() {
        let resolver = AliasResolver::for_table(TargetTable::Shipments);
        let input = headers(&["Company Name", "HS-Code", "Total Weight (KG)"]);
        let preview = preview_header_mapping(&resolver, &input);
        assert_eq!(preview.len(), 3);
        assert!(preview.iter().all(|p| p.recognized));
        assert_eq!(
            preview[0].canonical,
            Some(CanonicalField::UnifiedCompanyName)
        );
        assert_eq!(preview[1].canonical, Some(CanonicalField::HsCode));
        assert_eq!(preview[2].canonical, Some(CanonicalField::GrossWeightKg));
    }

    #[test]
    fn test_preview_flags_unrecognized() {
        let resolver = AliasResolver::for_table(TargetTable::Shipments);
        let preview = preview_header_mapping(&resolver, &headers(&["Company", "Internal Ref"]));
        assert!(preview[0].recognized);
        assert!(!preview[1].recognized);
        assert_eq!(preview[1].canonical, None);
        assert_eq!(preview[1].original, "Internal Ref");
    }

    #[test]
    fn test_mapping_index_lookup() {
        let resolver = AliasResolver::for_table(TargetTable::Shipments);
        let mapping =
            HeaderMapping::from_headers(&resolver, &headers(&["Vessel", "junk", "Containers"]));
        assert_eq!(mapping.canonical_at(0), Some(CanonicalField::VesselName));
        assert_eq!(mapping.canonical_at(1), None);
        assert_eq!(mapping.canonical_at(2), Some(CanonicalField::ContainerCount));
        assert_eq!(mapping.canonical_at(99), None);
    }
}
