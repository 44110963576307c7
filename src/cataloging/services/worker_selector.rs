use crate::shared::Result;

/// Maximum number of selection patterns to prevent DoS attacks
const MAX_SELECTION_PATTERNS: usize = 64;

/// Maximum length of a single selection pattern
const MAX_PATTERN_LENGTH: usize = 255;

/// Name suffixes ignored when matching worker names against patterns
const IGNORED_SUFFIXES: [&str; 2] = ["-cataloger", "-worker"];

/// Selects the workers that participate in a run, by name.
///
/// A pattern selects a worker when its dash-delimited words appear as a
/// contiguous run of the worker name's words, after `-cataloger` and
/// `-worker` suffixes are stripped from both. `"ruby"` and `"gemfile"` both
/// select `ruby-gemfile-cataloger`; `"gem"` does not.
#[derive(Debug)]
pub struct WorkerSelector {
    patterns: Vec<SelectionPattern>,
}

/// Outcome of [`WorkerSelector::select`].
#[derive(Debug)]
pub struct WorkerSelection<T> {
    pub selected: Vec<T>,
    /// Patterns that selected nothing, in the order they were given.
    pub unmatched_patterns: Vec<String>,
}

impl WorkerSelector {
    /// Creates a selector from raw pattern strings
    ///
    /// # Arguments
    /// * `patterns` - Worker name patterns; empty or containing `"all"`
    ///   selects every worker
    ///
    /// # Errors
    /// - Too many patterns (> MAX_SELECTION_PATTERNS)
    /// - Invalid pattern format (length, characters)
    pub fn new(patterns: Vec<String>) -> Result<Self> {
        if patterns.len() > MAX_SELECTION_PATTERNS {
            anyhow::bail!(
                "Too many cataloger patterns: {} (maximum: {})",
                patterns.len(),
                MAX_SELECTION_PATTERNS
            );
        }

        let mut compiled = Vec::new();
        for pattern in patterns {
            let pattern = pattern.trim().to_string();
            if pattern.is_empty() {
                continue;
            }
            compiled.push(SelectionPattern::new(pattern)?);
        }

        Ok(Self { patterns: compiled })
    }

    /// Whether this selector keeps every worker.
    pub fn selects_all(&self) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.original == "all")
    }

    /// Filters `workers`, preserving their order
    ///
    /// # Arguments
    /// * `workers` - Candidate workers
    /// * `name_of` - Returns a worker's registered name
    ///
    /// # Returns
    /// The selected workers and the patterns that matched none of them
    pub fn select<T, F>(&self, workers: Vec<T>, name_of: F) -> WorkerSelection<T>
    where
        F: Fn(&T) -> &str,
    {
        if self.selects_all() {
            return WorkerSelection {
                selected: workers,
                unmatched_patterns: Vec::new(),
            };
        }

        let mut matched = vec![false; self.patterns.len()];
        let mut selected = Vec::new();
        for worker in workers {
            let words = name_words(name_of(&worker));
            let mut keep = false;
            for (i, pattern) in self.patterns.iter().enumerate() {
                if pattern.matches(&words) {
                    matched[i] = true;
                    keep = true;
                }
            }
            if keep {
                selected.push(worker);
            }
        }

        let unmatched_patterns = self
            .patterns
            .iter()
            .zip(matched)
            .filter(|(_, m)| !*m)
            .map(|(p, _)| p.original.clone())
            .collect();

        WorkerSelection {
            selected,
            unmatched_patterns,
        }
    }
}

#[derive(Debug)]
struct SelectionPattern {
    original: String,
    words: Vec<String>,
}

impl SelectionPattern {
    fn new(pattern: String) -> Result<Self> {
        validate_pattern(&pattern)?;
        let words = name_words(&pattern);
        Ok(Self {
            original: pattern,
            words,
        })
    }

    fn matches(&self, name_words: &[String]) -> bool {
        if self.words.is_empty() || self.words.len() > name_words.len() {
            return false;
        }
        name_words
            .windows(self.words.len())
            .any(|window| window == self.words.as_slice())
    }
}

/// Lower-cases, strips ignored suffixes and splits on dashes.
fn name_words(name: &str) -> Vec<String> {
    let mut name = name.trim().to_ascii_lowercase();
    for suffix in IGNORED_SUFFIXES {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped.to_string();
            break;
        }
    }
    name.split('-')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate_pattern(pattern: &str) -> Result<()> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        anyhow::bail!(
            "Cataloger pattern is too long: '{}' ({} chars). Maximum: {} chars",
            pattern,
            pattern.len(),
            MAX_PATTERN_LENGTH
        );
    }

    if let Some(ch) = pattern
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        anyhow::bail!(
            "Cataloger pattern contains invalid character '{}' in pattern '{}'. \
             Only alphanumeric characters, hyphens and underscores are allowed.",
            ch,
            pattern
        );
    }

    Ok(())
}
