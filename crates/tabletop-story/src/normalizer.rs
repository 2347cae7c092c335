//! Raw row normalization.

use crate::types::{NormalizedRow, RawRow};
use crate::utils::{LIST_SEPARATOR, parse_decimal};

/// Parse the numeric fields of a raw row and derive its primary domain.
///
/// The input is left untouched; the result carries a copy of it.
pub fn normalize(raw: &RawRow) -> NormalizedRow {
    NormalizedRow {
        id: parse_decimal(&raw.id),
        year_published: parse_decimal(&raw.year_published),
        min_players: parse_decimal(&raw.min_players),
        max_players: parse_decimal(&raw.max_players),
        play_time: parse_decimal(&raw.play_time),
        min_age: parse_decimal(&raw.min_age),
        users_rated: parse_decimal(&raw.users_rated),
        rating_average: parse_decimal(&raw.rating_average),
        bgg_rank: parse_decimal(&raw.bgg_rank),
        complexity_average: parse_decimal(&raw.complexity_average),
        owned_users: parse_decimal(&raw.owned_users),
        primary_domain: primary_domain(raw.domains.as_deref()),
        raw: raw.clone(),
    }
}

/// Normalize a whole table.
pub fn normalize_all(rows: &[RawRow]) -> Vec<NormalizedRow> {
    rows.iter().map(normalize).collect()
}

/// Text before the first list separator, or empty when there are no domains.
fn primary_domain(domains: Option<&str>) -> String {
    match domains {
        Some(list) => list
            .split(LIST_SEPARATOR)
            .next()
            .unwrap_or("")
            .trim()
            .to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Column;

    fn raw(year: &str, domains: Option<&str>) -> RawRow {
        RawRow {
            id: "174430".to_string(),
            name: "Gloomhaven".to_string(),
            year_published: year.to_string(),
            min_players: "1".to_string(),
            max_players: "4".to_string(),
            bgg_rank: "1".to_string(),
            rating_average: "8.79".to_string(),
            domains: domains.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_numeric_fields_parse() {
        let row = normalize(&raw("2017", Some("Strategy Games, Thematic Games")));
        assert_eq!(row.id, 174430.0);
        assert_eq!(row.year_published, 2017.0);
        assert_eq!(row.max_players, 4.0);
        assert_eq!(row.rating_average, 8.79);
        assert_eq!(row.number(Column::BggRank), 1.0);
    }

    #[test]
    fn test_year_matches_raw_parse() {
        for year in ["-3500", "0", "1980", "", "unknown", "19.5"] {
            let row = normalize(&raw(year, None));
            let expected = parse_decimal(year);
            if expected.is_nan() {
                assert!(row.year_published.is_nan(), "{year:?} should be NaN");
            } else {
                assert_eq!(row.year_published, expected);
            }
        }
    }

    #[test]
    fn test_unparsed_fields_are_nan_not_zero() {
        let row = normalize(&raw("2017", None));
        assert!(row.play_time.is_nan());
        assert!(row.owned_users.is_nan());
    }

    #[test]
    fn test_primary_domain() {
        let row = normalize(&raw("2017", Some("Strategy Games, Thematic Games")));
        assert_eq!(row.primary_domain, "Strategy Games");

        let single = normalize(&raw("2017", Some("Party Games")));
        assert_eq!(single.primary_domain, "Party Games");

        let absent = normalize(&raw("2017", None));
        assert_eq!(absent.primary_domain, "");
    }

    #[test]
    fn test_input_is_preserved() {
        let input = raw("1995", Some("Family Games"));
        let before = input.clone();
        let row = normalize(&input);
        assert_eq!(input, before);
        assert_eq!(row.raw, before);
    }
}
