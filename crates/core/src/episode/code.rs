//! Canonical episode codes (`s01e05`, `s24s01`) and chronological ordering.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use thiserror::Error;

use super::types::{Episode, EpisodeIdentity};

static CODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^s(\d+)([es])(\d+)$").expect("episode code pattern is valid")
});

/// Errors for episode code parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EpisodeCodeError {
    #[error("Invalid episode code: {0:?}")]
    Invalid(String),
}

/// Codec between episode identities and their canonical string form.
pub struct EpisodeCode;

impl EpisodeCode {
    /// Build the canonical lowercase code.
    ///
    /// Season and number are padded to two digits but never truncated, so
    /// season 100 yields `s100e01`.
    pub fn generate(season: u32, number: u32, is_special: bool) -> String {
        let segment = if is_special { 's' } else { 'e' };
        format!("s{:02}{}{:02}", season, segment, number)
    }

    /// Parse a code case-insensitively.
    ///
    /// Accepts any digit count per group. The separator must be `e` (regular)
    /// or `s` (special).
    pub fn parse(code: &str) -> Result<EpisodeIdentity, EpisodeCodeError> {
        let invalid = || EpisodeCodeError::Invalid(code.to_string());

        let caps = CODE_PATTERN.captures(code).ok_or_else(invalid)?;

        let season: u32 = caps[1].parse().map_err(|_| invalid())?;
        let number: u32 = caps[3].parse().map_err(|_| invalid())?;
        let is_special = caps[2].eq_ignore_ascii_case("s");

        Ok(EpisodeIdentity {
            season,
            number,
            is_special,
        })
    }

    /// Chronological order for run detection and display.
    ///
    /// Dated episodes come before undated ones. Dated episodes order by air
    /// date, then by id; undated ones by id alone.
    pub fn compare_for_sorting(a: &Episode, b: &Episode) -> Ordering {
        match (a.airdate, b.airdate) {
            (Some(da), Some(db)) => da.cmp(&db).then_with(|| a.id.cmp(&b.id)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.id.cmp(&b.id),
        }
    }

    /// Sort episodes in place with [`EpisodeCode::compare_for_sorting`].
    pub fn sort(episodes: &mut [Episode]) {
        episodes.sort_by(Self::compare_for_sorting);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::episode::EpisodeType;
    use chrono::NaiveDate;

    fn episode(id: u64, airdate: Option<&str>) -> Episode {
        Episode {
            id,
            show_id: 1,
            season: 1,
            number: id as u32,
            episode_type: EpisodeType::Regular,
            airdate: airdate.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            name: None,
        }
    }

    fn ids(episodes: &[Episode]) -> Vec<u64> {
        episodes.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_generate_pads_to_two_digits() {
        assert_eq!(EpisodeCode::generate(1, 5, false), "s01e05");
        assert_eq!(EpisodeCode::generate(24, 1, true), "s24s01");
        assert_eq!(EpisodeCode::generate(0, 0, false), "s00e00");
    }

    #[test]
    fn test_generate_does_not_truncate() {
        assert_eq!(EpisodeCode::generate(100, 1, false), "s100e01");
        assert_eq!(EpisodeCode::generate(2, 1234, true), "s02s1234");
    }

    #[test]
    fn test_round_trip() {
        for season in [0, 1, 9, 10, 99, 100, 2024] {
            for number in [0, 1, 12, 100, 1000] {
                for is_special in [false, true] {
                    let code = EpisodeCode::generate(season, number, is_special);
                    let parsed = EpisodeCode::parse(&code).unwrap();
                    assert_eq!(parsed, EpisodeIdentity::new(season, number, is_special));
                }
            }
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let lower = EpisodeCode::parse("s01e05").unwrap();
        assert_eq!(EpisodeCode::parse("S01E05").unwrap(), lower);
        assert_eq!(EpisodeCode::parse("s01E05").unwrap(), lower);
        assert_eq!(lower, EpisodeIdentity::regular(1, 5));

        assert_eq!(
            EpisodeCode::parse("S24S01").unwrap(),
            EpisodeIdentity::special(24, 1)
        );
    }

    #[test]
    fn test_parse_accepts_unpadded_and_long_digits() {
        assert_eq!(
            EpisodeCode::parse("s1e5").unwrap(),
            EpisodeIdentity::regular(1, 5)
        );
        assert_eq!(
            EpisodeCode::parse("s0001e0005").unwrap(),
            EpisodeIdentity::regular(1, 5)
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "", "01e05", "s01e", "se05", "s01x05", "s01e05x", " s01e05", "s01e-5", "e01s05",
        ] {
            let result = EpisodeCode::parse(bad);
            assert!(
                matches!(result, Err(EpisodeCodeError::Invalid(_))),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_rejects_overflowing_digits() {
        assert!(EpisodeCode::parse("s99999999999e01").is_err());
    }

    #[test]
    fn test_undated_sort_after_dated() {
        let mut episodes = vec![
            episode(1, None),
            episode(2, Some("2024-01-10")),
            episode(3, None),
        ];
        EpisodeCode::sort(&mut episodes);
        assert_eq!(ids(&episodes), vec![2, 1, 3]);
    }

    #[test]
    fn test_equal_dates_break_ties_by_id() {
        let mut episodes = vec![
            episode(300, Some("2024-01-10")),
            episode(100, Some("2024-01-10")),
            episode(200, Some("2024-01-10")),
        ];
        EpisodeCode::sort(&mut episodes);
        assert_eq!(ids(&episodes), vec![100, 200, 300]);
    }

    #[test]
    fn test_dates_take_precedence_over_ids() {
        let mut episodes = vec![
            episode(1, Some("2024-03-01")),
            episode(9, Some("2024-01-01")),
            episode(5, Some("2024-02-01")),
        ];
        EpisodeCode::sort(&mut episodes);
        assert_eq!(ids(&episodes), vec![9, 5, 1]);
    }

    #[test]
    fn test_compare_equal_only_for_same_id() {
        let a = episode(4, Some("2024-01-10"));
        let b = episode(4, Some("2024-01-10"));
        let c = episode(5, Some("2024-01-10"));
        assert_eq!(EpisodeCode::compare_for_sorting(&a, &b), Ordering::Equal);
        assert_eq!(EpisodeCode::compare_for_sorting(&a, &c), Ordering::Less);
        assert_eq!(EpisodeCode::compare_for_sorting(&c, &a), Ordering::Greater);
    }
}
