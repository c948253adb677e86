// ==========================================
// Trade Import - Header Normalizer
// ==========================================
// Canonicalizes a raw header string into a comparison key: trim,
// lowercase, strip everything that is not a letter or digit, then
// reduce recognized domain plurals to their singular form.
// Idempotent by construction; never fails.
// ==========================================

/// Singular domain terms whose plural forms appear in third-party
/// headers. Suffix-matched after punctuation stripping, so compound
/// headers ("hscodes", "containercounts") reduce as well.
const DOMAIN_TERMS: &[&str] = &[
    "code",
    "company",
    "consignee",
    "container",
    "count",
    "country",
    "date",
    "description",
    "good",
    "kg",
    "mode",
    "name",
    "number",
    "port",
    "quantity",
    "record",
    "shipment",
    "shipper",
    "supplier",
    "unit",
    "value",
    "vessel",
    "weight",
];

/// Normalize a raw header into its comparison key.
///
/// Returns `""` for input that is empty or consists solely of
/// removable characters (whitespace, punctuation).
pub fn normalize(header: &str) -> String {
    let stripped: String = header
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    singularize(&stripped)
}

/// Plural-to-singular reduction for recognized domain vocabulary.
/// Unknown words pass through untouched so normalization stays total.
fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        let candidate = format!("{stem}y");
        if ends_with_domain_term(&candidate) {
            return candidate;
        }
    }
    // "address", "gross" and the like keep their double-s.
    if word.ends_with("ss") {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix('s') {
        if ends_with_domain_term(stem) {
            return stem.to_string();
        }
    }
    word.to_string()
}

fn ends_with_domain_term(word: &str) -> bool {
    DOMAIN_TERMS.iter().any(|term| word.ends_with(term))
}
