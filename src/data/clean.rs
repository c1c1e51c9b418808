use super::model::{LongTable, MeltedTable, Observation, RawObservation};
use crate::error::CastError;

/// Characters stripped from both ends of a raw value besides whitespace.
///
/// Eurostat flags `e` (estimated), `p` (provisional) and `b` (break in series)
/// follow the number; a lone `:` marks a missing observation.
pub const ANNOTATION_CHARS: &[char] = &['e', 'p', 'b', ':'];

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

/// Strip whitespace and annotation characters from both ends of `raw`.
///
/// Idempotent: `normalize_value(normalize_value(s)) == normalize_value(s)`.
pub fn normalize_value(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || ANNOTATION_CHARS.contains(&c))
}

/// Clean `value` and trim `year` on every row, dropping rows whose value ends
/// up empty.
pub fn normalize(table: MeltedTable) -> MeltedTable {
    let before = table.len();
    let rows: Vec<RawObservation> = table
        .rows
        .into_iter()
        .filter_map(|row| {
            let value = normalize_value(&row.value);
            if value.is_empty() {
                return None;
            }
            Some(RawObservation {
                value: value.to_string(),
                year: row.year.trim().to_string(),
                key: row.key,
            })
        })
        .collect();

    log::debug!(
        "normalised values: kept {} of {before} row(s), dropped {}",
        rows.len(),
        before - rows.len()
    );
    MeltedTable { rows }
}

// ---------------------------------------------------------------------------
// Casting
// ---------------------------------------------------------------------------

/// Convert `year` to a positive integer and `value` to a finite float.
///
/// Must run after [`normalize`]: fields are parsed as-is, and the first failure
/// aborts the whole table.
pub fn cast_types(table: MeltedTable) -> Result<LongTable, CastError> {
    let rows = table
        .rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| cast_row(row, i))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(LongTable { rows })
}

fn cast_row(row: RawObservation, index: usize) -> Result<Observation, CastError> {
    let year = match row.year.parse::<u32>() {
        Ok(year) if year > 0 => year,
        _ => {
            return Err(CastError::Year {
                row: index,
                value: row.year,
            })
        }
    };
    let value = match row.value.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            return Err(CastError::Value {
                row: index,
                value: row.value,
            })
        }
    };

    let key = row.key;
    Ok(Observation {
        unit: key.unit,
        sex: key.sex,
        age: key.age,
        region: key.region,
        year,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CategoryKey;

    fn raw(year: &str, value: &str) -> RawObservation {
        RawObservation {
            key: CategoryKey {
                unit: "YR".to_string(),
                sex: "F".to_string(),
                age: "Y10".to_string(),
                region: "PT".to_string(),
            },
            year: year.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_normalize_value_strips_flags() {
        assert_eq!(normalize_value("72.3 e"), "72.3");
        assert_eq!(normalize_value("80.1 p"), "80.1");
        assert_eq!(normalize_value("79.0 bep"), "79.0");
        assert_eq!(normalize_value(" 81.5 "), "81.5");
        assert_eq!(normalize_value("\t81.5\n"), "81.5");
    }

    #[test]
    fn test_normalize_value_missing_sentinel_is_empty() {
        assert_eq!(normalize_value(": "), "");
        assert_eq!(normalize_value(":"), "");
        assert_eq!(normalize_value(": e"), "");
        assert_eq!(normalize_value(""), "");
    }

    #[test]
    fn test_normalize_value_is_idempotent() {
        for raw in ["72.3 e", ": ", "  80 p ", "b81.0", "1e5", "12.5"] {
            let once = normalize_value(raw);
            assert_eq!(normalize_value(once), once, "input {raw:?}");
        }
    }

    #[test]
    fn test_normalize_drops_empty_values_and_trims_year() {
        let table = MeltedTable {
            rows: vec![raw("2019 ", "72.3 e"), raw("2020 ", ": "), raw(" 2021", "  ")],
        };
        let cleaned = normalize(table);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned.rows[0].year, "2019");
        assert_eq!(cleaned.rows[0].value, "72.3");
    }

    #[test]
    fn test_normalized_values_are_numeric() {
        let table = MeltedTable {
            rows: vec![raw("2019", "72.3 e"), raw("2018", "70 p"), raw("2017", ": ")],
        };
        let cleaned = normalize(table);
        assert!(cleaned
            .rows
            .iter()
            .all(|r| !r.value.is_empty() && r.value.parse::<f64>().is_ok()));
    }

    #[test]
    fn test_cast_types() {
        let table = MeltedTable {
            rows: vec![raw("2019", "72.3"), raw("2020", "80")],
        };
        let long = cast_types(table).unwrap();
        assert_eq!(long.rows[0].year, 2019);
        assert_eq!(long.rows[0].value, 72.3);
        assert_eq!(long.rows[1].value, 80.0);
        assert_eq!(long.rows[1].region, "PT");
    }

    #[test]
    fn test_cast_rejects_untrimmed_year() {
        let table = MeltedTable {
            rows: vec![raw("2019 ", "72.3")],
        };
        assert_eq!(
            cast_types(table),
            Err(CastError::Year {
                row: 0,
                value: "2019 ".to_string()
            })
        );
    }

    #[test]
    fn test_cast_rejects_non_positive_year() {
        for year in ["0", "-1", "19.5"] {
            let table = MeltedTable {
                rows: vec![raw(year, "1.0")],
            };
            assert!(matches!(cast_types(table), Err(CastError::Year { .. })));
        }
    }

    #[test]
    fn test_cast_rejects_non_numeric_value() {
        let table = MeltedTable {
            rows: vec![raw("2019", "72.3"), raw("2020", "n/a")],
        };
        assert_eq!(
            cast_types(table),
            Err(CastError::Value {
                row: 1,
                value: "n/a".to_string()
            })
        );
    }

    #[test]
    fn test_cast_rejects_non_finite_value() {
        for value in ["NaN", "inf"] {
            let table = MeltedTable {
                rows: vec![raw("2019", value)],
            };
            assert!(matches!(cast_types(table), Err(CastError::Value { .. })));
        }
    }
}
