use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::plan::Strategy;

/// File extension of encoded sequences.
pub const SEQUENCE_EXTENSION: &str = "fseq";

/// Lowercase `title`, collapsing every run of characters outside `[a-z0-9]` into one hyphen.
///
/// Leading and trailing hyphens are kept, so `"Let It Snow!"` becomes `"let-it-snow-"`.
pub fn slug(title: &str) -> String {
    static NON_ALNUM_RE: OnceLock<Regex> = OnceLock::new();
    let re = NON_ALNUM_RE
        .get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("slug regex should compile"));
    re.replace_all(&title.to_lowercase(), "-").into_owned()
}

/// Conventional output filename: `{slug(title)}-{strategy}-{YYYY-MM-DD}.fseq`.
pub fn sequence_filename(title: &str, strategy: Strategy, date: NaiveDate) -> String {
    format!(
        "{}-{}-{}.{SEQUENCE_EXTENSION}",
        slug(title),
        strategy.as_str(),
        date.format("%Y-%m-%d")
    )
}

/// [`sequence_filename`] stamped with today's local date.
pub fn sequence_filename_today(title: &str, strategy: Strategy) -> String {
    sequence_filename(title, strategy, chrono::Local::now().date_naive())
}

#[cfg(test)]
#[path = "../tests/unit/naming.rs"]
mod tests;
