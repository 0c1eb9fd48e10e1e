use crate::domain::model::{GenderRatios, GenderSplit, Normalized, RawGenderScope};
use crate::utils::error::{Result, StatsError};
use std::cmp::Ordering;

/// Rescales raw ratios so they sum to exactly 1.0.
pub fn normalize_ratios(university_id: &str, year: i32, ratios: GenderRatios) -> Result<GenderRatios> {
    let parts = [ratios.male, ratios.female, ratios.other];
    if parts.iter().any(|r| !r.is_finite() || *r < 0.0) {
        return Err(StatsError::invalid_distribution(
            university_id,
            year,
            format!("gender ratios {:?} contain a negative or non-finite value", parts),
        ));
    }

    let sum = ratios.sum();
    if sum <= 0.0 {
        return Err(StatsError::invalid_distribution(
            university_id,
            year,
            "gender ratios sum to zero",
        ));
    }

    Ok(GenderRatios::new(
        ratios.male / sum,
        ratios.female / sum,
        ratios.other / sum,
    ))
}

/// Splits `total` into (male, female, other) counts.
///
/// Male and female are floored; other takes the remainder so the three
/// always add up to `total`.
pub fn split_total(total: u64, ratios: &GenderRatios) -> (u64, u64, u64) {
    let male = floor_share(total, ratios.male).min(total);
    let female = floor_share(total, ratios.female).min(total - male);
    let other = total - male - female;
    (male, female, other)
}

fn floor_share(total: u64, ratio: f64) -> u64 {
    (ratio * total as f64).floor() as u64
}

/// Normalizes one scope, using the same ratio for applicants and accepted.
pub fn split_scope(raw: RawGenderScope) -> Result<GenderSplit> {
    let ratios = normalize_ratios(&raw.university_id, raw.year, raw.ratios)?;
    let (male_applicants, female_applicants, other_applicants) =
        split_total(raw.total_applicants, &ratios);
    let (male_accepted, female_accepted, other_accepted) = split_total(raw.total_accepted, &ratios);

    Ok(GenderSplit {
        university_id: raw.university_id,
        year: raw.year,
        program_id: raw.program_id,
        program_name: raw.program_name,
        male_applicants,
        female_applicants,
        other_applicants,
        male_accepted,
        female_accepted,
        other_accepted,
    })
}

/// Canonical order of splits returned together for one university.
///
/// Ascending year, then the university-wide total before programs, then
/// program name (case-insensitive, unnamed or blank programs last), then
/// program id.
pub fn compare_splits(a: &GenderSplit, b: &GenderSplit) -> Ordering {
    a.year
        .cmp(&b.year)
        .then_with(|| b.is_university_total().cmp(&a.is_university_total()))
        .then_with(|| match (named(&a.program_name), named(&b.program_name)) {
            (Some(x), Some(y)) => collate(x, y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.program_id.cmp(&b.program_id))
}

fn named(name: &Option<String>) -> Option<&str> {
    name.as_deref().filter(|n| !n.is_empty())
}

fn collate(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

pub fn sort_splits(splits: &mut [GenderSplit]) {
    splits.sort_by(compare_splits);
}

/// Selects and normalizes the gender scopes of one university.
///
/// `year` and `program_id` are equality filters (not prefixes). Scopes
/// whose ratios cannot be normalized end up in `failures`.
pub fn normalize_scopes(
    university_id: &str,
    raw_scopes: Vec<RawGenderScope>,
    year: Option<i32>,
    program_id: Option<&str>,
) -> Normalized<GenderSplit> {
    let mut result = Normalized::default();

    for raw in raw_scopes {
        if raw.university_id != university_id {
            continue;
        }
        if year.is_some_and(|y| raw.year != y) {
            continue;
        }
        if let Some(wanted) = program_id {
            if raw.program_id.as_deref() != Some(wanted) {
                continue;
            }
        }

        match split_scope(raw) {
            Ok(split) => result.items.push(split),
            Err(e) => {
                tracing::warn!("Skipping gender split: {}", e);
                result.failures.push(e);
            }
        }
    }

    sort_splits(&mut result.items);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(
        year: i32,
        program: Option<(&str, Option<&str>)>,
        ratios: GenderRatios,
        applicants: u64,
        accepted: u64,
    ) -> RawGenderScope {
        RawGenderScope {
            university_id: "kth".to_string(),
            year,
            program_id: program.map(|(id, _)| id.to_string()),
            program_name: program.and_then(|(_, name)| name.map(str::to_string)),
            ratios,
            total_applicants: applicants,
            total_accepted: accepted,
        }
    }

    fn even() -> GenderRatios {
        GenderRatios::new(0.49, 0.49, 0.02)
    }

    #[test]
    fn test_remainder_goes_to_other() {
        let ratios = GenderRatios::new(0.5, 0.48, 0.02);
        let split = split_scope(raw(2020, None, ratios, 999, 0)).unwrap();

        assert_eq!(split.male_applicants, 499);
        assert_eq!(split.female_applicants, 479);
        assert_eq!(split.other_applicants, 21);
        assert_eq!(split.total_applicants(), 999);
        assert_eq!(split.total_accepted(), 0);
    }

    #[test]
    fn test_drifted_ratios_are_rescaled() {
        // 0.55 - 0.05 and 0.43 + 0.07 no longer sum to one.
        let ratios = GenderRatios::new(0.50, 0.50, 0.02);
        let normalized = normalize_ratios("kth", 2020, ratios).unwrap();
        assert!((normalized.sum() - 1.0).abs() < 1e-12);
        assert!((normalized.male - 0.50 / 1.02).abs() < 1e-12);

        let split = split_scope(raw(2020, None, ratios, 1234, 321)).unwrap();
        assert_eq!(split.total_applicants(), 1234);
        assert_eq!(split.total_accepted(), 321);
        assert_eq!(split.male_applicants, split.female_applicants);
    }

    #[test]
    fn test_sum_invariant_over_many_totals() {
        let ratios = GenderRatios::new(0.73, 0.25, 0.02);
        for total in [0u64, 1, 2, 3, 7, 99, 100, 101, 997, 2500, 123_457] {
            let (m, f, o) = split_total(total, &normalize_ratios("kth", 2020, ratios).unwrap());
            assert_eq!(m + f + o, total, "total {}", total);
        }
    }

    #[test]
    fn test_same_ratio_for_applicants_and_accepted() {
        let ratios = GenderRatios::new(0.35, 0.63, 0.02);
        let split = split_scope(raw(2018, Some(("kth-med", Some("Läkarprogrammet"))), ratios, 1000, 100))
            .unwrap();

        assert_eq!(split.male_applicants, 350);
        assert_eq!(split.female_applicants, 630);
        assert_eq!(split.other_applicants, 20);
        assert_eq!(split.male_accepted, 35);
        assert_eq!(split.female_accepted, 63);
        assert_eq!(split.other_accepted, 2);
    }

    #[test]
    fn test_zero_or_invalid_ratios_fail() {
        let zero = GenderRatios::new(0.0, 0.0, 0.0);
        assert!(split_scope(raw(2020, None, zero, 10, 1)).is_err());

        let negative = GenderRatios::new(0.7, -0.1, 0.4);
        assert!(normalize_ratios("kth", 2020, negative).is_err());
    }

    #[test]
    fn test_canonical_ordering() {
        let raws = vec![
            raw(2021, Some(("kth-eng", Some("Civilingenjör"))), even(), 10, 1),
            raw(2020, Some(("kth-x", None)), even(), 10, 1),
            raw(2020, Some(("kth-med", Some("Läkarprogrammet"))), even(), 10, 1),
            raw(2021, None, even(), 30, 3),
            raw(2020, Some(("kth-cs", Some("datavetenskap"))), even(), 10, 1),
            raw(2020, None, even(), 30, 3),
            raw(2020, Some(("kth-eng", Some("Civilingenjör"))), even(), 10, 1),
        ];

        let result = normalize_scopes("kth", raws, None, None);
        assert!(result.is_complete());

        let order: Vec<(i32, Option<&str>)> = result
            .items
            .iter()
            .map(|s| (s.year, s.program_id.as_deref()))
            .collect();
        assert_eq!(
            order,
            vec![
                (2020, None),
                (2020, Some("kth-eng")),
                (2020, Some("kth-cs")),
                (2020, Some("kth-med")),
                (2020, Some("kth-x")),
                (2021, None),
                (2021, Some("kth-eng")),
            ]
        );
    }

    #[test]
    fn test_blank_program_fields_count_as_missing() {
        let raws = vec![
            raw(2020, Some(("kth-blank", Some(""))), even(), 10, 1),
            raw(2020, Some(("kth-cs", Some("Datavetenskap"))), even(), 10, 1),
            raw(2020, Some(("", None)), even(), 30, 3),
        ];

        let result = normalize_scopes("kth", raws, None, None);

        let order: Vec<Option<&str>> = result
            .items
            .iter()
            .map(|s| s.program_id.as_deref())
            .collect();
        assert_eq!(order, vec![Some(""), Some("kth-cs"), Some("kth-blank")]);
        assert!(result.items[0].is_university_total());
        assert!(!result.items[2].is_university_total());
    }

    #[test]
    fn test_ordering_independent_of_input_order() {
        let mut splits: Vec<GenderSplit> = vec![
            raw(2022, Some(("kth-b", Some("Beta"))), even(), 10, 1),
            raw(2022, Some(("kth-a", Some("Alpha"))), even(), 10, 1),
            raw(2022, None, even(), 10, 1),
        ]
        .into_iter()
        .map(|r| split_scope(r).unwrap())
        .collect();
        let mut reversed = splits.clone();
        reversed.reverse();

        sort_splits(&mut splits);
        sort_splits(&mut reversed);
        assert_eq!(splits, reversed);
    }

    #[test]
    fn test_year_and_program_filters_are_exact() {
        let raws = vec![
            raw(2020, None, even(), 30, 3),
            raw(2020, Some(("kth-cs", Some("Datavetenskap"))), even(), 10, 1),
            raw(2020, Some(("kth-cs-evening", Some("Datavetenskap kväll"))), even(), 10, 1),
            raw(2021, Some(("kth-cs", Some("Datavetenskap"))), even(), 10, 1),
        ];

        let result = normalize_scopes("kth", raws.clone(), Some(2020), Some("kth-cs"));
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].program_id.as_deref(), Some("kth-cs"));
        assert_eq!(result.items[0].year, 2020);

        let result = normalize_scopes("kth", raws, Some(2021), None);
        assert_eq!(result.items.len(), 1);
    }

    #[test]
    fn test_failing_scope_does_not_hide_others() {
        let raws = vec![
            raw(2020, None, GenderRatios::new(0.0, 0.0, 0.0), 30, 3),
            raw(2020, Some(("kth-cs", Some("Datavetenskap"))), even(), 10, 1),
        ];

        let result = normalize_scopes("kth", raws, None, None);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.failures.len(), 1);
    }
}
