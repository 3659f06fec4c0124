//! Runtime configuration for expression compilation.
//!
//! The module exposes the compiled regex size limit. The limit is read from
//! `RSTEST_BDD_EXPRESSION_SIZE_LIMIT` unless an in-process override is set.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Environment variable holding the compiled regex size limit in bytes.
pub const SIZE_LIMIT_ENV: &str = "RSTEST_BDD_EXPRESSION_SIZE_LIMIT";

/// Size limit applied when neither the environment nor an override sets one.
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

const OVERRIDE_UNSET: usize = 0;

static SIZE_LIMIT_OVERRIDE: AtomicUsize = AtomicUsize::new(OVERRIDE_UNSET);

fn parse_size_limit(value: &str) -> Option<NonZeroUsize> {
    value.trim().parse::<NonZeroUsize>().ok()
}

fn env_size_limit() -> Option<usize> {
    let raw = std::env::var(SIZE_LIMIT_ENV).ok()?;
    let parsed = parse_size_limit(&raw);
    if parsed.is_none() {
        log::warn!("ignoring invalid {SIZE_LIMIT_ENV} value {raw:?}");
    }
    parsed.map(NonZeroUsize::get)
}

fn override_state() -> Option<usize> {
    match SIZE_LIMIT_OVERRIDE.load(Ordering::Relaxed) {
        OVERRIDE_UNSET => None,
        limit => Some(limit),
    }
}

/// Size limit, in bytes, for regexes compiled from step expressions.
#[must_use]
pub fn regex_size_limit() -> usize {
    override_state()
        .or_else(env_size_limit)
        .unwrap_or(DEFAULT_REGEX_SIZE_LIMIT)
}

/// Override the regex size limit for the current process.
///
/// Expressions already compiled keep the limit they were built with.
pub fn set_regex_size_limit(limit: NonZeroUsize) {
    SIZE_LIMIT_OVERRIDE.store(limit.get(), Ordering::Relaxed);
}

/// Remove any in-process override for the regex size limit.
pub fn clear_regex_size_limit_override() {
    SIZE_LIMIT_OVERRIDE.store(OVERRIDE_UNSET, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serial_test::serial;

    #[test]
    #[serial]
    fn override_replaces_the_limit() {
        clear_regex_size_limit_override();
        let Some(limit) = NonZeroUsize::new(64 * (1 << 20)) else {
            panic!("limit is non-zero");
        };
        set_regex_size_limit(limit);
        assert_eq!(regex_size_limit(), limit.get());
        clear_regex_size_limit_override();
        assert_eq!(override_state(), None);
    }

    #[rstest]
    #[case("4096", Some(4096))]
    #[case(" 2048 ", Some(2048))]
    #[case("0", None)]
    #[case("-1", None)]
    #[case("lots", None)]
    fn parses_size_limits(#[case] raw: &str, #[case] expected: Option<usize>) {
        assert_eq!(parse_size_limit(raw).map(NonZeroUsize::get), expected);
    }
}
