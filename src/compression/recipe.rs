use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use rust_stemmers::{Algorithm, Stemmer};

use crate::core::error::{Error, ErrorKind, Result};

/// The per-token filter chain, as a tagged variant with one `apply`
/// dispatch rather than a `Box<dyn TokenFilter>` trait-object graph: the
/// chain must round-trip through the descriptor as text, which an enum
/// does directly and a trait-object graph does not.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    NoNumbers,
    CaseFolding,
    NoStopWords(StopWordSet),
    PorterStemmer,
    Chain(Vec<Filter>),
}

/// A stop-word list loaded from the first `count` non-blank lines of
/// `path`, per `dict_compression.py`'s `NoStopWords.__init__`.
#[derive(Debug, Clone)]
pub struct StopWordSet {
    pub count: usize,
    pub path: PathBuf,
    words: HashSet<String>,
}

impl PartialEq for StopWordSet {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.path == other.path
    }
}

impl StopWordSet {
    pub fn load(count: usize, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::open(&path).map_err(|e| {
            Error::new(
                ErrorKind::InvalidArgument,
                format!("cannot read stop-word file {}: {}", path.display(), e),
            )
        })?;
        let mut words = HashSet::new();
        for line in BufReader::new(file).lines().take(count) {
            let line = line?;
            let word = line.trim();
            if !word.is_empty() {
                words.insert(word.to_string());
            }
        }
        Ok(StopWordSet { count, path, words })
    }

    fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }
}

fn porter() -> &'static Stemmer {
    static STEMMER: OnceLock<Stemmer> = OnceLock::new();
    STEMMER.get_or_init(|| Stemmer::create(Algorithm::English))
}

/// Unicode full case folding, the handful of codepoints where it
/// diverges from simple lowercasing, layered on top of
/// `char::to_lowercase()`. Covers the two cases `dict_compression.py`'s
/// `str.casefold()` actually differs on: German sharp s and the Turkish
/// capital dotted I.
fn case_fold(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    for c in token.chars() {
        match c {
            'ß' | 'ẞ' => out.push_str("ss"),
            '\u{0130}' => out.push_str("i\u{0307}"),
            other => out.extend(other.to_lowercase()),
        }
    }
    out
}

/// After stripping ASCII punctuation, does `token` match `^-?[0-9]+(\.[0-9]+)?$`?
fn looks_like_number(token: &str) -> bool {
    let stripped: String = token.chars().filter(|c| !c.is_ascii_punctuation()).collect();
    let s = stripped.strip_prefix('-').unwrap_or(&stripped);
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match frac_part {
        Some(f) => !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()),
        None => true,
    }
}

impl Filter {
    /// Apply the filter to one token. `None` means the token is dropped
    /// and must not consume a position.
    pub fn apply(&self, token: &str) -> Option<String> {
        match self {
            Filter::NoNumbers => {
                if looks_like_number(token) {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Filter::CaseFolding => Some(case_fold(token)),
            Filter::NoStopWords(set) => {
                if set.contains(token) {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Filter::PorterStemmer => Some(porter().stem(token).into_owned()),
            Filter::Chain(filters) => {
                let mut current = token.to_string();
                for filter in filters {
                    current = filter.apply(&current)?;
                }
                Some(current)
            }
        }
    }

    /// Serialize this filter (or chain) to the textual form persisted as
    /// the descriptor's `compressionRecipe`.
    pub fn to_recipe(&self) -> String {
        match self {
            Filter::NoNumbers => "nonum".to_string(),
            Filter::CaseFolding => "casefold".to_string(),
            Filter::NoStopWords(set) => format!("stopw:{}:{}", set.count, set.path.display()),
            Filter::PorterStemmer => "portstem".to_string(),
            Filter::Chain(filters) => filters
                .iter()
                .map(Filter::to_recipe)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Parse the textual recipe form back into a filter chain, so the
    /// reader can apply the exact same chain to query terms that was
    /// used to build the index (the build/query symmetry invariant).
    pub fn from_recipe(recipe: &str) -> Result<Filter> {
        let recipe = recipe.trim();
        if recipe.is_empty() {
            return Ok(Filter::Chain(Vec::new()));
        }
        let mut filters = Vec::new();
        for part in recipe.split(',') {
            filters.push(Self::parse_one(part.trim())?);
        }
        Ok(Filter::Chain(filters))
    }

    fn parse_one(part: &str) -> Result<Filter> {
        if part == "nonum" {
            return Ok(Filter::NoNumbers);
        }
        if part == "casefold" {
            return Ok(Filter::CaseFolding);
        }
        if part == "portstem" {
            return Ok(Filter::PorterStemmer);
        }
        if let Some(rest) = part.strip_prefix("stopw:") {
            let (count_str, path_str) = rest.split_once(':').ok_or_else(|| {
                Error::new(
                    ErrorKind::Descriptor,
                    format!("malformed stop-word recipe entry: {part}"),
                )
            })?;
            let count: usize = count_str.parse().map_err(|_| {
                Error::new(
                    ErrorKind::Descriptor,
                    format!("malformed stop-word count in recipe entry: {part}"),
                )
            })?;
            return Ok(Filter::NoStopWords(StopWordSet::load(count, path_str)?));
        }
        Err(Error::new(
            ErrorKind::Descriptor,
            format!("unrecognized compression recipe entry: {part}"),
        ))
    }

    /// Construct the chain for the CLI's `--compress-dict` names (§6):
    /// `nonum`, `casefold`, `stopw30`, `stopw150`, `portstem`, in the
    /// order given.
    pub fn from_cli_names(names: &[String], stopwords_path: &Path) -> Result<Filter> {
        let mut filters = Vec::with_capacity(names.len());
        for name in names {
            let filter = match name.as_str() {
                "nonum" => Filter::NoNumbers,
                "casefold" => Filter::CaseFolding,
                "portstem" => Filter::PorterStemmer,
                "stopw30" => Filter::NoStopWords(StopWordSet::load(30, stopwords_path)?),
                "stopw150" => Filter::NoStopWords(StopWordSet::load(150, stopwords_path)?),
                other => {
                    return Err(Error::new(
                        ErrorKind::InvalidArgument,
                        format!("unrecognized --compress-dict name: {other}"),
                    ));
                }
            };
            filters.push(filter);
        }
        Ok(Filter::Chain(filters))
    }
}
