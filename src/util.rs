//! Small utility helpers used across modules.

use chrono::{SecondsFormat, Utc};

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Current UTC time as an RFC 3339 string with millisecond precision.
pub fn now_iso() -> String {
  Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Time-derived seed (epoch milliseconds) for callers that supplied none.
pub fn time_seed() -> String {
  Utc::now().timestamp_millis().to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_every_occurrence() {
    let out = fill_template("{a} and {b}, {a}", &[("a", "x"), ("b", "y")]);
    assert_eq!(out, "x and y, x");
  }

  #[test]
  fn fill_template_leaves_unknown_keys() {
    assert_eq!(fill_template("{missing}", &[("a", "x")]), "{missing}");
  }

  #[test]
  fn time_seed_is_numeric() {
    assert!(time_seed().chars().all(|c| c.is_ascii_digit()));
  }

  #[test]
  fn now_iso_is_utc() {
    assert!(now_iso().ends_with('Z'));
  }
}
