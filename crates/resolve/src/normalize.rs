//! Field-level canonicalization: names, nationalities, teams, dates.
//!
//! Every function here is pure and total. Blank or unparsable input yields
//! the empty-string missing sentinel, never an error.

use chrono::{NaiveDate, NaiveDateTime};

use crate::model::{PlayerRecord, ReportRecord};

/// Honorific titles stripped from the front of a name, one pass, in order.
const TITLES: &[&str] = &["Dr.", "Mr.", "Mrs.", "Ms.", "Miss", "Prof.", "Professor"];

/// Suffixes stripped from the end of a name, one pass, in order.
const SUFFIXES: &[&str] = &["DVM", "Jr.", "Sr.", "II", "III", "IV", "MD", "PhD"];

/// Variant spellings mapped to one canonical spelling. Consulted before
/// generic whitespace/case normalization.
const NATIONALITY_ALIASES: &[(&str, &str)] = &[
    ("Congo DR", "DR Congo"),
    ("DR Congo", "DR Congo"),
    ("Congo", "DR Congo"),
    ("Côte d'Ivoire", "Ivory Coast"),
    ("Ivory Coast", "Ivory Coast"),
    ("SWEDEN", "Sweden"),
    ("sweden", "Sweden"),
    ("Belgium", "Belgium"),
];

/// Candidate layouts, tried in order. Day-first wins over US-style for
/// ambiguous values.
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%m/%d/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%d/%m/%Y %H:%M", "%Y-%m-%d %H:%M:%S", "%d-%m-%Y %H:%M"];

/// Output layouts: dates of birth are date-only, report timestamps carry a
/// time-of-day (midnight when the source had none).
const DATE_LAYOUT: &str = "%d/%m/%Y";
const DATETIME_LAYOUT: &str = "%d/%m/%Y %H:%M";

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// Strip honorifics and suffixes, collapse whitespace, title-case.
pub fn normalize_name(raw: &str) -> String {
    let mut name = raw.trim();
    if name.is_empty() {
        return String::new();
    }

    for title in TITLES {
        if let Some(rest) = strip_prefix_ci(name, title) {
            name = rest;
        }
    }
    for suffix in SUFFIXES {
        if let Some(rest) = strip_suffix_ci(name, suffix) {
            name = rest;
        }
    }

    title_case(&collapse_whitespace(name))
}

/// Case-insensitive prefix strip; the prefix must be followed by at least
/// one whitespace character.
fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let tail = &s[prefix.len()..];
    let trimmed = tail.trim_start();
    if trimmed.len() == tail.len() {
        return None;
    }
    Some(trimmed)
}

/// Case-insensitive suffix strip; the suffix must be preceded by at least
/// one whitespace character.
fn strip_suffix_ci<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    if s.len() <= suffix.len() {
        return None;
    }
    let split = s.len() - suffix.len();
    let tail = s.get(split..)?;
    if !tail.eq_ignore_ascii_case(suffix) {
        return None;
    }
    let head = &s[..split];
    let trimmed = head.trim_end();
    if trimmed.len() == head.len() {
        return None;
    }
    Some(trimmed)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Uppercase every alphabetic character that follows a non-alphabetic one
/// (or the start of the string), lowercase the rest. Word boundaries
/// include digits, hyphens and apostrophes: `o'neill` → `O'Neill`.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Nationalities, teams, report fields
// ---------------------------------------------------------------------------

/// Alias lookup first, generic whitespace/case normalization second.
pub fn normalize_nationality(raw: &str) -> String {
    let nat = raw.trim();
    if nat.is_empty() {
        return String::new();
    }
    for (variant, canonical) in NATIONALITY_ALIASES {
        if nat == *variant {
            return (*canonical).to_string();
        }
    }
    title_case(&collapse_whitespace(nat))
}

/// Teams keep their casing; only whitespace is collapsed.
pub fn normalize_team(raw: &str) -> String {
    collapse_whitespace(raw)
}

pub fn normalize_foot(raw: &str) -> String {
    title_case(raw.trim())
}

pub fn normalize_position(raw: &str) -> String {
    raw.trim().to_string()
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Parse a date-bearing field against the candidate layouts in order.
/// Returns the parsed timestamp (midnight for date-only layouts) or `None`
/// — an invalid calendar date such as `31/02/2020` is a parse failure, not
/// an error.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    None
}

pub fn normalize_date_of_birth(raw: &str) -> String {
    match parse_date(raw) {
        Some(dt) => dt.format(DATE_LAYOUT).to_string(),
        None => String::new(),
    }
}

/// Report timestamps all render through one layout; sources without a
/// time-of-day come out at midnight.
pub fn normalize_timestamp(raw: &str) -> String {
    match parse_date(raw) {
        Some(dt) => dt.format(DATETIME_LAYOUT).to_string(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Canonicalize a player row. Returns `None` when the name normalizes to
/// empty — a row that names nobody is dropped from the table.
pub fn normalize_player(p: &PlayerRecord) -> Option<PlayerRecord> {
    let name = normalize_name(&p.name);
    if name.is_empty() {
        return None;
    }
    Some(PlayerRecord {
        id: p.id.trim().to_string(),
        name,
        date_of_birth: normalize_date_of_birth(&p.date_of_birth),
        nationality: normalize_nationality(&p.nationality),
        current_team: normalize_team(&p.current_team),
    })
}

pub fn normalize_report(r: &ReportRecord) -> ReportRecord {
    ReportRecord {
        report_id: r.report_id.trim().to_string(),
        player_id: r.player_id.trim().to_string(),
        player_name: normalize_name(&r.player_name),
        nationality: normalize_nationality(&r.nationality),
        scout_id: r.scout_id.trim().to_string(),
        country: normalize_nationality(&r.country),
        report_type: r.report_type.trim().to_string(),
        performance_grade: r.performance_grade.trim().to_string(),
        potential_grade: r.potential_grade.trim().to_string(),
        primary_position: normalize_position(&r.primary_position),
        secondary_position: normalize_position(&r.secondary_position),
        foot: normalize_foot(&r.foot),
        created_on: normalize_timestamp(&r.created_on),
        modified_on: normalize_timestamp(&r.modified_on),
        match_date: normalize_timestamp(&r.match_date),
    }
}
