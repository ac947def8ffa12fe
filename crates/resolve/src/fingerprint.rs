//! Composite identity key for duplicate detection.

use crate::model::PlayerRecord;
use crate::normalize::{normalize_date_of_birth, normalize_name, normalize_nationality};

/// Identity key: normalized name, date of birth and nationality,
/// lower-cased and pipe-joined. Fields are re-normalized here so the key is
/// stable whether or not the record has already been through the
/// normalizer. Missing components contribute an empty segment.
pub fn fingerprint(record: &PlayerRecord) -> String {
    let name = normalize_name(&record.name);
    let dob = normalize_date_of_birth(&record.date_of_birth);
    let nationality = normalize_nationality(&record.nationality);
    format!("{name}|{dob}|{nationality}").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, name: &str, dob: &str, nat: &str) -> PlayerRecord {
        PlayerRecord {
            id: id.into(),
            name: name.into(),
            date_of_birth: dob.into(),
            nationality: nat.into(),
            current_team: String::new(),
        }
    }

    #[test]
    fn equivalent_spellings_collide() {
        let a = player("PLY_1", "John Smith", "01/01/2000", "England");
        let b = player("PLY_2", "John  Smith", "2000-01-01", "England");
        assert_eq!(fingerprint(&a), fingerprint(&b));
        assert_eq!(fingerprint(&a), "john smith|01/01/2000|england");
    }

    #[test]
    fn different_dob_separates() {
        let a = player("PLY_1", "John Smith", "01/01/2000", "England");
        let b = player("PLY_2", "John Smith", "02/01/2000", "England");
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn missing_components_still_collide() {
        // Two records missing the same fields collide on the rest; this is
        // deliberate and documented behavior, not a bug.
        let a = player("PLY_1", "John Smith", "", "England");
        let b = player("PLY_2", "John Smith", "bad date", "England");
        assert_eq!(fingerprint(&a), fingerprint(&b));
        assert_eq!(fingerprint(&a), "john smith||england");
    }

    #[test]
    fn idempotent_over_normalized_input() {
        let raw = player("PLY_1", "Dr. John  Smith", "2000-01-01", "SWEDEN");
        let fp = fingerprint(&raw);
        let cleaned = player("PLY_1", "John Smith", "01/01/2000", "Sweden");
        assert_eq!(fingerprint(&cleaned), fp);
    }
}
