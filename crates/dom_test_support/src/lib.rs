//! Shared helpers for reconciler and document tests: golden fixture loading
//! and snapshot line diffs.

pub mod fixtures;

use std::fmt::Write;

/// Human-readable report of the first differing snapshot line, with two lines
/// of context on each side.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    fn line_at(lines: &[String], i: usize) -> &str {
        lines.get(i).map(String::as_str).unwrap_or("<missing>")
    }
    let max = expected.len().max(actual.len());
    let mut out = String::new();
    let mismatch = (0..max).find(|&i| line_at(expected, i) != line_at(actual, i));
    match mismatch {
        Some(i) => {
            let start = i.saturating_sub(2);
            let end = (i + 3).min(max);
            let _ = writeln!(
                &mut out,
                "first mismatch at line {} (showing {}..={}):",
                i + 1,
                start + 1,
                end
            );
            for line_idx in start..end {
                let marker = if line_idx == i { ">" } else { " " };
                let _ = writeln!(
                    &mut out,
                    "{marker} {:>4}  expected: {}",
                    line_idx + 1,
                    line_at(expected, line_idx)
                );
                let _ = writeln!(
                    &mut out,
                    "{marker} {:>4}    actual: {}",
                    line_idx + 1,
                    line_at(actual, line_idx)
                );
            }
        }
        None if expected.len() != actual.len() => {
            let _ = writeln!(
                &mut out,
                "prefix matched but lengths differ (expected {} lines, actual {} lines)",
                expected.len(),
                actual.len()
            );
        }
        None => {}
    }
    let _ = writeln!(
        &mut out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::diff_lines;

    #[test]
    fn diff_lines_points_at_first_mismatch() {
        let expected = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let actual = vec!["a".to_string(), "x".to_string()];
        let report = diff_lines(&expected, &actual);
        assert!(report.contains("first mismatch at line 2"));
        assert!(report.contains(">    2  expected: b"));
        assert!(report.contains("<missing>"));
    }
}
