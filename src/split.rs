//! Splitting phrases into independently animated display units.

/// How a phrase is broken into display units.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SplitMode {
    /// One symbol per grapheme, grouped by space-separated word
    #[default]
    Characters,
    /// One unit per space-separated word
    Words,
    /// One unit per newline-separated line
    Lines,
    /// One unit per segment between occurrences of a literal delimiter
    Custom(String),
}

/// What the renderer places after a unit whose `needs_space` flag is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Separator {
    Space,
    LineBreak,
}

impl SplitMode {
    /// Parse a split mode name. Anything unrecognized is a custom delimiter.
    pub fn from_name(name: &str) -> Self {
        match name {
            "characters" => SplitMode::Characters,
            "words" => SplitMode::Words,
            "lines" => SplitMode::Lines,
            other => SplitMode::Custom(other.to_string()),
        }
    }

    /// The option name for this mode (the delimiter itself for `Custom`).
    pub fn name(&self) -> &str {
        match self {
            SplitMode::Characters => "characters",
            SplitMode::Words => "words",
            SplitMode::Lines => "lines",
            SplitMode::Custom(delimiter) => delimiter,
        }
    }

    /// The separator rendered between units in this mode.
    pub fn separator(&self) -> Separator {
        match self {
            SplitMode::Lines => Separator::LineBreak,
            _ => Separator::Space,
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SplitMode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SplitMode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(SplitMode::from_name(&name))
    }
}

/// A group of symbols animated together, plus its trailing-space flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayUnit {
    /// Atomic symbols (graphemes, a word, a line or a delimited segment)
    pub symbols: Vec<String>,
    /// Whether a separator follows this unit
    pub needs_space: bool,
}

impl DisplayUnit {
    fn single(text: &str, needs_space: bool) -> Self {
        Self {
            symbols: vec![text.to_string()],
            needs_space,
        }
    }

    /// The unit's symbols joined back together.
    pub fn text(&self) -> String {
        self.symbols.concat()
    }
}

/// Split a phrase into display units.
///
/// ## Example
///
/// ```rust
/// use rotating_text_core::{split_phrase, SplitMode};
///
/// let units = split_phrase("hello world", &SplitMode::Characters);
/// assert_eq!(units.len(), 2);
/// assert_eq!(units[0].symbols.len(), 5);
/// assert!(units[0].needs_space);
/// assert!(!units[1].needs_space);
///
/// let parts = split_phrase("a,b,c", &SplitMode::Custom(",".into()));
/// assert_eq!(parts.len(), 3);
/// ```
pub fn split_phrase(phrase: &str, mode: &SplitMode) -> Vec<DisplayUnit> {
    match mode {
        SplitMode::Characters => {
            let words: Vec<&str> = phrase.split(' ').collect();
            let last = words.len() - 1;
            words
                .iter()
                .enumerate()
                .map(|(i, word)| DisplayUnit {
                    symbols: split_symbols(word),
                    needs_space: i != last,
                })
                .collect()
        }
        SplitMode::Words => singles(phrase.split(' ')),
        SplitMode::Lines => singles(phrase.split('\n')),
        SplitMode::Custom(delimiter) if delimiter.is_empty() => singles(
            phrase
                .char_indices()
                .map(|(i, c)| &phrase[i..i + c.len_utf8()]),
        ),
        SplitMode::Custom(delimiter) => singles(phrase.split(delimiter.as_str())),
    }
}

fn singles<'a>(segments: impl Iterator<Item = &'a str>) -> Vec<DisplayUnit> {
    let segments: Vec<&str> = segments.collect();
    let last = segments.len().saturating_sub(1);
    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| DisplayUnit::single(segment, i != last))
        .collect()
}

/// Decompose a word into user-perceived characters.
#[cfg(feature = "graphemes")]
pub fn split_symbols(word: &str) -> Vec<String> {
    use unicode_segmentation::UnicodeSegmentation;
    word.graphemes(true).map(str::to_string).collect()
}

/// Decompose a word into code points.
#[cfg(not(feature = "graphemes"))]
pub fn split_symbols(word: &str) -> Vec<String> {
    word.chars().map(String::from).collect()
}

/// Total number of symbols across all units.
pub fn total_symbols(units: &[DisplayUnit]) -> usize {
    units.iter().map(|u| u.symbols.len()).sum()
}

/// Iterate `(unit_index, symbol, flat_position)` over all units in order.
///
/// `flat_position` is the symbol's index as if every unit were concatenated,
/// which is what the stagger scheduler consumes.
pub fn flatten(units: &[DisplayUnit]) -> impl Iterator<Item = (usize, &str, usize)> {
    units
        .iter()
        .enumerate()
        .flat_map(|(u, unit)| unit.symbols.iter().map(move |s| (u, s.as_str())))
        .enumerate()
        .map(|(position, (unit, symbol))| (unit, symbol, position))
}
