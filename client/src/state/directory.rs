//! Dashboard list filtering and rating display.
//!
//! The patient dashboard searches doctors by name or specialization and can
//! narrow to one specialization; the doctor dashboard searches emergency
//! patients by name or location. Matching is a case-insensitive substring
//! test and an empty term matches everything.

#[cfg(test)]
#[path = "directory_test.rs"]
mod directory_test;

use records::{EmergencyPatient, NearbyDoctor};

const STAR_COUNT: usize = 5;

fn matches_any(term: &str, fields: &[&str]) -> bool {
    let term = term.trim().to_lowercase();
    term.is_empty() || fields.iter().any(|f| f.to_lowercase().contains(&term))
}

/// Doctors matching `term`, restricted to `specialization` when one is chosen.
#[must_use]
pub fn filter_doctors<'a>(doctors: &'a [NearbyDoctor], term: &str, specialization: Option<&str>) -> Vec<&'a NearbyDoctor> {
    let selected = specialization.filter(|s| !s.is_empty());
    doctors
        .iter()
        .filter(|d| matches_any(term, &[d.name.as_str(), d.specialization.as_str()]))
        .filter(|d| selected.is_none_or(|s| d.specialization == s))
        .collect()
}

#[must_use]
pub fn filter_patients<'a>(patients: &'a [EmergencyPatient], term: &str) -> Vec<&'a EmergencyPatient> {
    patients
        .iter()
        .filter(|p| matches_any(term, &[p.name.as_str(), p.location.as_str()]))
        .collect()
}

/// Distinct specializations, sorted, for the specialization picker.
#[must_use]
pub fn specializations(doctors: &[NearbyDoctor]) -> Vec<&str> {
    let mut all: Vec<&str> = doctors.iter().map(|d| d.specialization.as_str()).collect();
    all.sort_unstable();
    all.dedup();
    all
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_rating(rating_sum: u64, rating_count: u64) -> f64 {
    if rating_count == 0 {
        return 0.0;
    }
    rating_sum as f64 / rating_count as f64
}

/// One decimal place, e.g. `4.8`.
#[must_use]
pub fn format_rating(rating: f64) -> String {
    format!("{rating:.1}")
}

/// Five glyphs: `★` per whole star, then `☆` for a half star and each empty
/// slot.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rating_stars(rating: f64) -> String {
    let rating = if rating.is_finite() { rating.clamp(0.0, 5.0) } else { 0.0 };
    let full = rating.floor() as usize;
    let rest = STAR_COUNT - full;
    let mut stars = "★".repeat(full);
    stars.push_str(&"☆".repeat(rest));
    stars
}
