//! Single-responsibility name tokenization for deterministic rename planning.

#![forbid(unsafe_code)]

/// Split a short name into its base and numeric tail.
///
/// The numeric tail is the longest trailing run of ASCII digits; the base is
/// whatever precedes it. A name without trailing digits has no tail.
///
/// # Examples
///
/// ```
/// use namekit_name::split_numeric_tail;
///
/// assert_eq!(split_numeric_tail("arm01"), ("arm", Some("01")));
/// assert_eq!(split_numeric_tail("arm"), ("arm", None));
/// assert_eq!(split_numeric_tail("007"), ("", Some("007")));
/// ```
#[must_use]
pub fn split_numeric_tail(name: &str) -> (&str, Option<&str>) {
    let cut = name
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map_or(name.len(), |(i, _)| i);
    if cut == name.len() {
        (name, None)
    } else {
        (&name[..cut], Some(&name[cut..]))
    }
}

/// Return a short name without its numeric tail.
///
/// # Examples
///
/// ```
/// use namekit_name::strip_numeric_tail;
///
/// assert_eq!(strip_numeric_tail("leg_geo12"), "leg_geo");
/// assert_eq!(strip_numeric_tail("leg_geo"), "leg_geo");
/// ```
#[must_use]
pub fn strip_numeric_tail(name: &str) -> &str {
    split_numeric_tail(name).0
}

/// Decomposition of a short name into its conventional parts.
///
/// Underscores delimit an optional leading prefix and trailing suffix around
/// the base; the numeric tail is peeled off first. Every field borrows from
/// the input, and `prefix`/`suffix` are only reported when a non-empty base
/// remains between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameParts<'a> {
    /// Segment before the first underscore, when one exists.
    pub leading_prefix: Option<&'a str>,
    /// The central portion of the name.
    pub base: &'a str,
    /// Segment after the last underscore, when one exists.
    pub trailing_suffix: Option<&'a str>,
    /// Longest trailing run of ASCII digits.
    pub numeric_tail: Option<&'a str>,
}

impl<'a> NameParts<'a> {
    /// Tokenize a short name.
    ///
    /// # Examples
    ///
    /// ```
    /// use namekit_name::NameParts;
    ///
    /// let parts = NameParts::parse("L_arm_geo01");
    /// assert_eq!(parts.leading_prefix, Some("L"));
    /// assert_eq!(parts.base, "arm");
    /// assert_eq!(parts.trailing_suffix, Some("geo"));
    /// assert_eq!(parts.numeric_tail, Some("01"));
    ///
    /// let plain = NameParts::parse("arm");
    /// assert_eq!(plain.base, "arm");
    /// assert_eq!(plain.leading_prefix, None);
    /// ```
    #[must_use]
    pub fn parse(name: &'a str) -> Self {
        let (stem, numeric_tail) = split_numeric_tail(name);

        let (leading_prefix, rest) = match stem.split_once('_') {
            Some((head, rest)) if !head.is_empty() && !rest.is_empty() => (Some(head), rest),
            _ => (None, stem),
        };
        let (base, trailing_suffix) = match rest.rsplit_once('_') {
            Some((base, tail)) if !base.is_empty() && !tail.is_empty() => (base, Some(tail)),
            _ => (rest, None),
        };

        Self {
            leading_prefix,
            base,
            trailing_suffix,
            numeric_tail,
        }
    }
}

/// Join namespace segments and a short name into a full path.
///
/// An empty namespace yields the short name unchanged.
///
/// # Examples
///
/// ```
/// use namekit_name::join_path;
///
/// let ns = vec!["root".to_string(), "limbs".to_string()];
/// assert_eq!(join_path(&ns, "arm", '.'), "root.limbs.arm");
/// assert_eq!(join_path(&[], "arm", '.'), "arm");
/// ```
#[must_use]
pub fn join_path(namespace: &[String], short_name: &str, separator: char) -> String {
    let mut out = String::with_capacity(
        namespace.iter().map(|s| s.len() + 1).sum::<usize>() + short_name.len(),
    );
    for segment in namespace {
        out.push_str(segment);
        out.push(separator);
    }
    out.push_str(short_name);
    out
}

/// Parse a separator-delimited value into namespace segments.
///
/// Empty segments (leading, trailing, or doubled separators) are dropped, so
/// parsing never produces a segment the joiner cannot round-trip.
///
/// # Examples
///
/// ```
/// use namekit_name::parse_segments;
///
/// assert_eq!(parse_segments("root.limbs", '.'), vec!["root", "limbs"]);
/// assert_eq!(parse_segments(".root.", '.'), vec!["root"]);
/// assert!(parse_segments("", '.').is_empty());
/// ```
#[must_use]
pub fn parse_segments(value: &str, separator: char) -> Vec<String> {
    value
        .split(separator)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Render a counter index as a spreadsheet-style alpha tail.
///
/// The sequence is `a..z, aa..az, ba..` (bijective base 26), uppercased on
/// request.
///
/// # Examples
///
/// ```
/// use namekit_name::alpha_tail;
///
/// assert_eq!(alpha_tail(0, false), "a");
/// assert_eq!(alpha_tail(25, false), "z");
/// assert_eq!(alpha_tail(26, false), "aa");
/// assert_eq!(alpha_tail(1, true), "B");
/// ```
#[must_use]
pub fn alpha_tail(index: u64, uppercase: bool) -> String {
    let first = if uppercase { b'A' } else { b'a' };
    let mut index = index;
    let mut out = Vec::new();
    loop {
        out.push(first + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    out.reverse();
    // Only ASCII letters were pushed.
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn split_numeric_tail_plain_name() {
        assert_eq!(split_numeric_tail("arm"), ("arm", None));
    }

    #[test]
    fn split_numeric_tail_all_digits() {
        assert_eq!(split_numeric_tail("123"), ("", Some("123")));
    }

    #[test]
    fn split_numeric_tail_interior_digits_stay_in_base() {
        assert_eq!(split_numeric_tail("arm2_geo03"), ("arm2_geo", Some("03")));
    }

    #[test]
    fn split_numeric_tail_empty_input() {
        assert_eq!(split_numeric_tail(""), ("", None));
    }

    #[test]
    fn parts_without_underscores() {
        let parts = NameParts::parse("arm01");
        assert_eq!(parts.leading_prefix, None);
        assert_eq!(parts.base, "arm");
        assert_eq!(parts.trailing_suffix, None);
        assert_eq!(parts.numeric_tail, Some("01"));
    }

    #[test]
    fn parts_single_underscore_prefers_prefix() {
        let parts = NameParts::parse("L_arm");
        assert_eq!(parts.leading_prefix, Some("L"));
        assert_eq!(parts.base, "arm");
        assert_eq!(parts.trailing_suffix, None);
    }

    #[test]
    fn parts_underscore_edges_do_not_empty_the_base() {
        let parts = NameParts::parse("_arm_");
        assert_eq!(parts.leading_prefix, None);
        assert_eq!(parts.base, "_arm_");
        assert_eq!(parts.trailing_suffix, None);
    }

    #[test]
    fn join_path_empty_short_name_keeps_trailing_separator() {
        let ns = vec!["root".to_string()];
        assert_eq!(join_path(&ns, "", '.'), "root.");
    }

    #[test]
    fn alpha_tail_rolls_over_like_a_spreadsheet() {
        assert_eq!(alpha_tail(26 + 25, false), "az");
        assert_eq!(alpha_tail(2 * 26, false), "ba");
        assert_eq!(alpha_tail(26 * 26 + 26, false), "aaa");
    }

    proptest! {
        #[test]
        fn split_round_trips(name in "\\PC{0,40}") {
            let (base, tail) = split_numeric_tail(&name);
            let rejoined = format!("{base}{}", tail.unwrap_or(""));
            prop_assert_eq!(rejoined, name);
        }

        #[test]
        fn base_never_ends_in_a_digit(name in "\\PC{0,40}") {
            let (base, _) = split_numeric_tail(&name);
            prop_assert!(!base.ends_with(|c: char| c.is_ascii_digit()));
        }

        #[test]
        fn tail_is_all_digits(name in "\\PC{0,40}") {
            if let (_, Some(tail)) = split_numeric_tail(&name) {
                prop_assert!(!tail.is_empty());
                prop_assert!(tail.chars().all(|c| c.is_ascii_digit()));
            }
        }

        #[test]
        fn join_parse_round_trips(
            segments in prop::collection::vec("[a-zA-Z_][a-zA-Z0-9_]{0,8}", 0..4),
            short in "[a-zA-Z_][a-zA-Z0-9_]{0,8}",
        ) {
            let ns: Vec<String> = segments.iter().map(|s| s.to_string()).collect();
            let path = join_path(&ns, &short, '.');
            let mut parsed = parse_segments(&path, '.');
            let reparsed_short = parsed.pop().unwrap_or_default();
            prop_assert_eq!(parsed, ns);
            prop_assert_eq!(reparsed_short, short);
        }

        #[test]
        fn alpha_tail_is_injective_for_small_indices(a in 0u64..2000, b in 0u64..2000) {
            if a != b {
                prop_assert_ne!(alpha_tail(a, false), alpha_tail(b, false));
            }
        }
    }
}
