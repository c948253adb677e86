// ==========================================
// Trade Import - Alias Resolver
// ==========================================
// Looks up a raw header against the alias table for one target table.
// Aliases are normalized once at construction, so each lookup is a
// direct map access - no per-call renormalization of the table.
// ==========================================

use std::collections::HashMap;

use crate::domain::{CanonicalField, TargetTable};
use crate::importer::alias_table::TableAliasMap;
use crate::importer::normalizer::normalize;

/// Table-scoped alias resolver. Instantiated per target table so the
/// same header can resolve differently across tables without
/// collisions. Read-only after construction; safe to share and clone.
#[derive(Debug, Clone)]
pub struct AliasResolver {
    table: TargetTable,
    lookup: HashMap<String, CanonicalField>,
}

impl AliasResolver {
    /// Build a resolver for `table` from an injected alias map.
    /// On duplicate normalized aliases within the table, the first
    /// canonical field in table order wins.
    pub fn new(table: TargetTable, aliases: &TableAliasMap) -> Self {
        let mut lookup = HashMap::new();
        for (field, alias_set) in aliases.aliases_for(table) {
            // The canonical name itself always resolves.
            lookup.entry(normalize(field.as_str())).or_insert(*field);
            for alias in alias_set {
                lookup.entry(normalize(alias)).or_insert(*field);
            }
        }
        Self { table, lookup }
    }

    /// Resolver over the built-in alias vocabulary.
    pub fn for_table(table: TargetTable) -> Self {
        Self::new(table, &TableAliasMap::builtin())
    }

    pub fn table(&self) -> TargetTable {
        self.table
    }

    /// Resolve a raw header to its canonical field.
    ///
    /// `None` input, input that normalizes to `""`, and unknown headers
    /// all resolve to `None`. Never panics.
    pub fn resolve(&self, raw_header: Option<&str>) -> Option<CanonicalField> {
        let raw = raw_header?;
        let key = normalize(raw);
        if key.is_empty() {
            return None;
        }
        self.lookup.get(&key).copied()
    }
}
