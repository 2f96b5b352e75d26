//! Image tag / digest format validation for `FROM`.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\w][\w.\-]{0,127}$").unwrap());
static DIGEST_ALGORITHM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Fa-f0-9_+.\-]+$").unwrap());
static DIGEST_HEX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Fa-f0-9]+$").unwrap());

pub fn is_valid_tag(tag: &str) -> bool {
    TAG_RE.is_match(tag)
}

pub fn is_valid_digest(digest: &str) -> bool {
    match digest.split_once(':') {
        Some((algorithm, hex)) => {
            !algorithm.is_empty()
                && !hex.is_empty()
                && DIGEST_ALGORITHM_RE.is_match(algorithm)
                && DIGEST_HEX_RE.is_match(hex)
        }
        None => false,
    }
}
