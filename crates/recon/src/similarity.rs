//! String similarity on a 0-100 scale.
//!
//! The default metric is the indel ratio: `2 * LCS / (len(a) + len(b))`,
//! computed over Unicode scalar values after normalization. It is symmetric,
//! scores identical strings 100 and fully disjoint strings 0, and falls
//! monotonically as insertions/deletions are needed to turn one side into
//! the other.

/// A pluggable 0-100 similarity metric.
pub trait StringMetric {
    /// Character-level similarity (order-sensitive).
    fn ratio(&self, a: &str, b: &str) -> f64;

    /// Similarity after sorting whitespace-separated tokens, so
    /// "Bell Brian" and "Brian Bell" compare equal.
    fn token_sort_ratio(&self, a: &str, b: &str) -> f64 {
        self.ratio(&sort_tokens(a), &sort_tokens(b))
    }
}

/// Indel (LCS-based) ratio, rounded to whole points.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndelMetric;

impl StringMetric for IndelMetric {
    fn ratio(&self, a: &str, b: &str) -> f64 {
        indel_ratio(&normalize(a), &normalize(b))
    }
}

/// Lowercase, turn every non-alphanumeric character into a space, trim.
pub fn normalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else {
            out.push(' ');
        }
    }
    out.trim().to_string()
}

/// Normalized tokens sorted alphabetically and joined by single spaces.
pub fn sort_tokens(s: &str) -> String {
    let normalized = normalize(s);
    let mut tokens: Vec<&str> = normalized.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Ratio of two already-normalized strings. Empty on either side scores 0.
fn indel_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 100.0;
    }
    let lcs = lcs_len(&a, &b);
    (200.0 * lcs as f64 / (a.len() + b.len()) as f64).round()
}

/// Longest common subsequence length, one rolling row.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut row = vec![0usize; short.len() + 1];

    for &lc in long {
        let mut diag = 0;
        for (j, &sc) in short.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if lc == sc {
                diag + 1
            } else {
                above.max(row[j])
            };
            diag = above;
        }
    }

    row[short.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_is_100() {
        assert_eq!(IndelMetric.ratio("A100", "A100"), 100.0);
        assert_eq!(IndelMetric.ratio("Widget", "widget"), 100.0);
    }

    #[test]
    fn disjoint_is_0() {
        assert_eq!(IndelMetric.ratio("B200", "XYZ999"), 0.0);
        assert_eq!(IndelMetric.ratio("Amy", "Zed"), 0.0);
    }

    #[test]
    fn empty_side_is_0() {
        assert_eq!(IndelMetric.ratio("", "abc"), 0.0);
        assert_eq!(IndelMetric.ratio("", ""), 0.0);
        assert_eq!(IndelMetric.ratio("---", "abc"), 0.0);
    }

    #[test]
    fn partial_overlap() {
        // lcs("a1", "a3") = 1 -> 2 * 1 / 4
        assert_eq!(IndelMetric.ratio("A1", "A3"), 50.0);
        // "a 100" vs "a100": lcs = 4 -> 8 / 9
        assert_eq!(IndelMetric.ratio("A-100", "A100"), 89.0);
    }

    #[test]
    fn ratio_is_symmetric() {
        let pairs = [("kitten", "sitting"), ("A100", "A10O"), ("Brian", "Bryan")];
        for (a, b) in pairs {
            assert_eq!(IndelMetric.ratio(a, b), IndelMetric.ratio(b, a));
        }
    }

    #[test]
    fn more_edits_never_score_higher() {
        let base = "ORDER12345";
        let one = IndelMetric.ratio(base, "ORDER12346");
        let two = IndelMetric.ratio(base, "ORDER12366");
        let three = IndelMetric.ratio(base, "ORDER12666");
        assert!(one >= two && two >= three);
    }

    #[test]
    fn token_sort_ignores_word_order() {
        assert_eq!(IndelMetric.token_sort_ratio("Brian Bell", "Bell Brian"), 100.0);
        assert_eq!(IndelMetric.token_sort_ratio("  Bell,  Brian ", "brian bell"), 100.0);
        assert!(IndelMetric.ratio("Brian Bell", "Bell Brian") < 100.0);
    }

    #[test]
    fn sort_tokens_collapses_whitespace() {
        assert_eq!(sort_tokens("Zeta  alpha\tMid"), "alpha mid zeta");
    }

    #[test]
    fn normalize_handles_unicode() {
        assert_eq!(normalize("Ünïcode-Ñame"), "ünïcode ñame");
        assert_eq!(IndelMetric.ratio("José", "JOSÉ"), 100.0);
    }

    #[test]
    fn lcs_basic() {
        let a: Vec<char> = "gadget".chars().collect();
        let b: Vec<char> = "other".chars().collect();
        assert_eq!(lcs_len(&a, &b), 1);
        let a: Vec<char> = "abcbdab".chars().collect();
        let b: Vec<char> = "bdcaba".chars().collect();
        assert_eq!(lcs_len(&a, &b), 4);
    }
}
