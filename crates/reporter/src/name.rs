//! Metric name resolution.

/// Computes final dotted metric names from raw registry names.
///
/// Two transformations, applied in order:
/// 1. optional trimming to the last `keep_last` dotted-path segments,
///    applied only when the name has strictly more segments than
///    `keep_last` (`keep_last == 0` disables trimming entirely),
/// 2. optional prefixing with a joining dot.
///
/// Kind-specific suffixes (`.count`, `.m1`, ...) are the formatter's
/// concern, not the resolver's.
#[derive(Debug, Clone)]
pub struct NameResolver {
    prefix: String,
    keep_last: usize,
}

impl NameResolver {
    pub fn new(prefix: impl Into<String>, keep_last: usize) -> Self {
        Self {
            prefix: prefix.into(),
            keep_last,
        }
    }

    /// Resolve a raw registry name into its reported base name
    pub fn resolve(&self, raw: &str) -> String {
        let trimmed = self.trim(raw);
        if self.prefix.is_empty() {
            trimmed.to_string()
        } else {
            format!("{}.{}", self.prefix, trimmed)
        }
    }

    /// Keep the last `keep_last` segments when the name is longer than that
    fn trim<'a>(&self, raw: &'a str) -> &'a str {
        if self.keep_last == 0 {
            return raw;
        }
        let segments = raw.split('.').count();
        if segments <= self.keep_last {
            return raw;
        }
        // Byte offset of the (segments - keep_last + 1)-th dot, plus one.
        let mut cut = 0;
        for (skipped, (idx, _)) in raw.match_indices('.').enumerate() {
            if skipped == segments - self.keep_last - 1 {
                cut = idx + 1;
                break;
            }
        }
        &raw[cut..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_trim_no_prefix_is_identity() {
        let resolver = NameResolver::new("", 0);
        assert_eq!(resolver.resolve("package.class.counter"), "package.class.counter");
    }

    #[test]
    fn test_prefix_is_prepended_with_dot() {
        let resolver = NameResolver::new("prefix", 0);
        assert_eq!(resolver.resolve("gauge"), "prefix.gauge");
        assert_eq!(resolver.resolve("asdf.dec.counter"), "prefix.asdf.dec.counter");
    }

    #[test]
    fn test_trim_keeps_last_segments() {
        let resolver = NameResolver::new("prefix", 2);
        assert_eq!(resolver.resolve("package.class.counter"), "prefix.class.counter");
    }

    #[test]
    fn test_trim_skips_short_names() {
        let resolver = NameResolver::new("", 3);
        // exactly 3 segments: untouched
        assert_eq!(resolver.resolve("a.b.c"), "a.b.c");
        // fewer than 3: untouched
        assert_eq!(resolver.resolve("a.b"), "a.b");
    }

    #[test]
    fn test_dotless_name_is_never_trimmed() {
        let resolver = NameResolver::new("", 1);
        assert_eq!(resolver.resolve("counter"), "counter");
    }

    #[test]
    fn test_trim_to_single_segment() {
        let resolver = NameResolver::new("", 1);
        assert_eq!(resolver.resolve("a.b.c.d"), "d");
    }
}
