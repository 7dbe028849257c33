//! Fuzzy medicine name resolution

use crate::pharmacy::types::MedicineRecord;

/// Lower-case `name` and drop all whitespace
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Bidirectional containment: either string contains the other
pub fn names_overlap(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Resolve free text to the first catalog entry whose key overlaps it.
///
/// Ties go to catalog order, not to the closest match. Blank input is
/// contained in every key and so resolves to the first entry.
pub fn resolve<'a>(catalog: &'a [MedicineRecord], input: &str) -> Option<&'a MedicineRecord> {
    let needle = normalize(input);
    catalog.iter().find(|record| names_overlap(&record.key, &needle))
}
