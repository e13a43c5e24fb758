//! Pattern-substitution filtering of change and release records
//!
//! Filters run in list order against a named string field of each record.
//! A substitution whose result is exactly [`SKIP_SENTINEL`] drops the whole
//! record. The engine operates on generic [`Record`]s so the same rules work
//! for per-change and per-release shapes.

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::config::FilterRule;
use crate::error::FilterError;
use crate::types::Record;

/// Reserved replacement value that excludes a record from the output
pub const SKIP_SENTINEL: &str = "--CRANK:SKIP--";

/// Apply `rules` to `records`, in rule order, preserving the order of
/// surviving records. An empty rule list returns the input unchanged.
pub fn apply(records: Vec<Record>, rules: &[FilterRule]) -> Result<Vec<Record>, FilterError> {
    if rules.is_empty() {
        return Ok(records);
    }

    let compiled = rules
        .iter()
        .map(|rule| {
            Regex::new(&rule.pattern).map_err(|source| FilterError::BadPattern {
                pattern: rule.pattern.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let input_len = records.len();
    let mut survivors = Vec::with_capacity(input_len);

    'records: for mut record in records {
        for (rule, regex) in rules.iter().zip(&compiled) {
            // Rules only apply to string fields the record actually has.
            let Some(Value::String(value)) = record.get(&rule.subject) else {
                continue;
            };
            let replaced = regex.replace_all(value, rule.replacement.as_str());
            if replaced == SKIP_SENTINEL {
                continue 'records;
            }
            let replaced = replaced.into_owned();
            record.insert(rule.subject.clone(), Value::String(replaced));
        }
        survivors.push(record);
    }

    debug!(
        input = input_len,
        output = survivors.len(),
        rules = rules.len(),
        "filters applied"
    );
    Ok(survivors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn record(fields: &[(&str, &str)]) -> Record {
        let mut map = Map::new();
        for (key, value) in fields {
            map.insert(key.to_string(), Value::String(value.to_string()));
        }
        map
    }

    fn rule(subject: &str, pattern: &str, replacement: &str) -> FilterRule {
        FilterRule {
            subject: subject.into(),
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    #[test]
    fn test_empty_rules_identity() {
        let records = vec![record(&[("message", "one")]), record(&[("message", "two")])];
        let expected = records.clone();
        assert_eq!(apply(records, &[]).unwrap(), expected);
    }

    #[test]
    fn test_substitution() {
        let records = vec![record(&[("message", "fix bug #42")])];
        let rules = vec![rule("message", r"#(\d+)", "issue $1")];
        let out = apply(records, &rules).unwrap();
        assert_eq!(out[0]["message"], "fix bug issue 42");
    }

    #[test]
    fn test_sentinel_drops_every_record() {
        let records = vec![
            record(&[("message", "alpha")]),
            record(&[("message", "beta")]),
            record(&[("message", "gamma")]),
        ];
        let rules = vec![rule("message", r"^.*$", SKIP_SENTINEL)];
        assert!(apply(records, &rules).unwrap().is_empty());
    }

    #[test]
    fn test_sentinel_stops_later_rules() {
        let records = vec![
            record(&[("message", "chore: bump deps")]),
            record(&[("message", "feat: add thing")]),
        ];
        let rules = vec![
            rule("message", r"^chore:.*$", SKIP_SENTINEL),
            rule("message", r"^feat: ", ""),
        ];
        let out = apply(records, &rules).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["message"], "add thing");
    }

    #[test]
    fn test_rules_apply_in_order() {
        let records = vec![record(&[("message", "aaa")])];
        let rules = vec![rule("message", "a", "b"), rule("message", "b", "c")];
        let out = apply(records, &rules).unwrap();
        assert_eq!(out[0]["message"], "ccc");
    }

    #[test]
    fn test_missing_field_is_skipped() {
        let records = vec![record(&[("author", "someone")])];
        let rules = vec![rule("message", ".*", SKIP_SENTINEL)];
        let out = apply(records, &rules).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_order_preserved() {
        let records = vec![
            record(&[("message", "first")]),
            record(&[("message", "skip me")]),
            record(&[("message", "third")]),
        ];
        let rules = vec![rule("message", r"^skip me$", SKIP_SENTINEL)];
        let out = apply(records, &rules).unwrap();
        assert_eq!(out[0]["message"], "first");
        assert_eq!(out[1]["message"], "third");
    }

    #[test]
    fn test_bad_pattern_errors() {
        let records = vec![record(&[("message", "x")])];
        let rules = vec![rule("message", "(", "")];
        assert!(apply(records, &rules).is_err());
    }
}
