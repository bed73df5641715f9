//! The transfer ignore predicate.
//!
//! Three rules, checked in a fixed order with short-circuit: exclude globs,
//! then include globs (when any are configured), then the per-file size cap.
//! Every decision is logged at debug level so a surprising skip can be traced
//! back to the rule that fired.

use std::path::Path;

use glob::Pattern;

use satchel_core::ExchangeConfig;

/// Compiled exclude/include/size rules applied to every transferred file.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    exclude: Vec<Pattern>,
    include: Vec<Pattern>,
    max_size_bytes: Option<u64>,
}

impl IgnoreRules {
    pub fn new(exclude: &[String], include: &[String], max_size_kb: Option<u64>) -> Self {
        Self {
            exclude: compile(exclude),
            include: compile(include),
            max_size_bytes: max_size_kb.map(|kb| kb * 1000),
        }
    }

    pub fn from_config(config: &ExchangeConfig) -> Self {
        Self::new(&config.exclude, &config.include, config.max_file_size_kb)
    }

    /// `true` means skip the file. Precedence: exclude > include > size.
    pub fn is_ignored(&self, dir: &Path, filename: &str, size_bytes: u64) -> bool {
        if let Some(pattern) = self.exclude.iter().find(|p| p.matches(filename)) {
            tracing::debug!(
                "ignoring {} in {}: matches exclude pattern {:?}",
                filename,
                dir.display(),
                pattern.as_str()
            );
            return true;
        }
        if !self.include.is_empty() && !self.include.iter().any(|p| p.matches(filename)) {
            tracing::debug!(
                "ignoring {} in {}: matches no include pattern",
                filename,
                dir.display()
            );
            return true;
        }
        if let Some(cap) = self.max_size_bytes {
            if size_bytes > cap {
                tracing::warn!(
                    "ignoring {} in {}: {} bytes exceeds the {} byte cap",
                    filename,
                    dir.display(),
                    size_bytes,
                    cap
                );
                return true;
            }
        }
        false
    }
}

/// Compile globs, dropping invalid ones with a warning rather than refusing
/// the whole configuration.
fn compile(globs: &[String]) -> Vec<Pattern> {
    globs
        .iter()
        .filter_map(|g| match Pattern::new(g) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!("skipping invalid glob {:?}: {}", g, e);
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(exclude: &[&str], include: &[&str], max_kb: Option<u64>) -> IgnoreRules {
        let exclude: Vec<String> = exclude.iter().map(|s| s.to_string()).collect();
        let include: Vec<String> = include.iter().map(|s| s.to_string()).collect();
        IgnoreRules::new(&exclude, &include, max_kb)
    }

    #[test]
    fn exclude_glob_matches() {
        let rules = rules(&["*.pyc", ".ipynb_checkpoints"], &[], None);
        let dir = Path::new("/work");
        assert!(rules.is_ignored(dir, "cached.pyc", 10));
        assert!(rules.is_ignored(dir, ".ipynb_checkpoints", 10));
        assert!(!rules.is_ignored(dir, "p1.ipynb", 10));
    }

    #[test]
    fn exclude_wins_over_include() {
        let rules = rules(&["secret*"], &["*.ipynb"], None);
        assert!(rules.is_ignored(Path::new("/work"), "secret.ipynb", 10));
        assert!(!rules.is_ignored(Path::new("/work"), "p1.ipynb", 10));
    }

    #[test]
    fn include_set_excludes_everything_else() {
        let rules = rules(&[], &["*.ipynb", "*.csv"], None);
        let dir = Path::new("/work");
        assert!(!rules.is_ignored(dir, "p1.ipynb", 10));
        assert!(!rules.is_ignored(dir, "data.csv", 10));
        assert!(rules.is_ignored(dir, "notes.txt", 10));
    }

    #[test]
    fn size_cap_is_checked_last() {
        let rules = rules(&[], &[], Some(1));
        let dir = Path::new("/work");
        assert!(!rules.is_ignored(dir, "small.bin", 1000));
        assert!(rules.is_ignored(dir, "big.bin", 1001));
    }

    #[test]
    fn invalid_glob_is_dropped_not_fatal() {
        let rules = rules(&["[bad"], &[], None);
        assert!(!rules.is_ignored(Path::new("/work"), "anything", 10));
    }
}
