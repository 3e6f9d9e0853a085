//! Color normalization.
//!
//! The widget accepts the heterogeneous textual color forms users actually
//! type and reduces every one of them to a single canonical `#rrggbb` value:
//!
//! - named colors via a case-sensitive dictionary: `red`, `aqua`
//! - hex with or without the leading `#`: `#f80`, `f80`, `#ff8800`, `FF8800`
//! - functional notation: `rgb(255, 136, 0)`, `rgba(255, 136, 0, 0.5)`
//!   (the alpha component is ignored)
//!
//! # Examples
//!
//! ```
//! use color_palette::color::Normalizer;
//!
//! let normalizer = Normalizer::new();
//!
//! assert_eq!(normalizer.normalize("#abc").unwrap(), "#aabbcc");
//! assert_eq!(normalizer.normalize("rgb(0, 255, 0)").unwrap(), "#00ff00");
//! assert_eq!(normalizer.normalize("orange").unwrap(), "#ffa500");
//! assert!(normalizer.normalize("not-a-color").is_err());
//! ```

use lru::LruCache;
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::LazyLock;

/// A normalized color string of the exact form `#` + 6 hex digits, no alpha.
///
/// Committed and preview state only ever hold this type, and only
/// [`Normalizer`] produces it (palette entries used as initialization
/// fallback are the one trusted exception).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalColor(String);

impl CanonicalColor {
    /// The textual `#rrggbb` value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap an already-renderable color without validation.
    ///
    /// Callers supplying palette colors and dictionary values are
    /// responsible for them being valid; they are taken verbatim.
    pub(crate) fn verbatim(color: &str) -> Self {
        Self(color.to_string())
    }
}

impl fmt::Display for CanonicalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CanonicalColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for CanonicalColor {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CanonicalColor {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Error type for color normalization.
///
/// Every variant is recoverable: the caller leaves prior state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// Input was empty (or whitespace only).
    Empty,
    /// Input matched none of the accepted color forms.
    Unrecognized(String),
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty color string"),
            Self::Unrecognized(s) => write!(f, "unrecognized color: {s}"),
        }
    }
}

impl std::error::Error for NormalizeError {}

/// Built-in color-name dictionary. Keys are case-sensitive.
static BUILTIN_NAMES: &[(&str, &str)] = &[
    ("aqua", "#00ffff"),
    ("black", "#000000"),
    ("blue", "#0000ff"),
    ("fuchsia", "#ff00ff"),
    ("gray", "#808080"),
    ("grey", "#808080"),
    ("green", "#008000"),
    ("lime", "#00ff00"),
    ("maroon", "#800000"),
    ("navy", "#000080"),
    ("olive", "#808000"),
    ("orange", "#ffa500"),
    ("purple", "#800080"),
    ("red", "#ff0000"),
    ("silver", "#c0c0c0"),
    ("teal", "#008080"),
    ("white", "#ffffff"),
    ("yellow", "#ffff00"),
];

const CACHE_CAPACITY: usize = 256;

/// Turns raw text into a [`CanonicalColor`] or a recoverable failure.
///
/// Observably pure: the only interior state is an LRU cache over
/// successful parses. One normalizer is shared per widget instance, so the
/// cache is keyed by trimmed input against this instance's dictionary.
pub struct Normalizer {
    dict: HashMap<String, CanonicalColor>,
    cache: RefCell<LruCache<String, CanonicalColor>>,
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("dict_len", &self.dict.len())
            .finish_non_exhaustive()
    }
}

impl Normalizer {
    /// Create a normalizer with the built-in name dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::with_overrides(std::iter::empty::<(String, String)>())
    }

    /// Create a normalizer whose dictionary is the built-ins overlaid with
    /// `overrides` (later entries win; new names extend the dictionary).
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut dict: HashMap<String, CanonicalColor> = BUILTIN_NAMES
            .iter()
            .map(|&(name, hex)| (name.to_string(), CanonicalColor::verbatim(hex)))
            .collect();
        for (name, color) in overrides {
            dict.insert(name.into(), CanonicalColor::verbatim(color.as_ref()));
        }
        let capacity = NonZeroUsize::new(CACHE_CAPACITY).expect("non-zero");
        Self {
            dict,
            cache: RefCell::new(LruCache::new(capacity)),
        }
    }

    /// Normalize `raw` into canonical `#rrggbb` form (cached).
    ///
    /// Matching order, first match wins:
    /// 1. trim surrounding whitespace;
    /// 2. exact case-sensitive dictionary lookup;
    /// 3. hex: optional `#`, then exactly 3 or 6 hex digits (the 3-digit
    ///    form doubles each digit, digit case is preserved);
    /// 4. `rgb(`/`rgba(` with three decimal channels, each clamped to 255,
    ///    alpha ignored.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::Empty`] for blank input and
    /// [`NormalizeError::Unrecognized`] when no form matches.
    pub fn normalize(&self, raw: &str) -> Result<CanonicalColor, NormalizeError> {
        let input = raw.trim();
        if input.is_empty() {
            return Err(NormalizeError::Empty);
        }

        if let Some(hit) = self.cache.borrow_mut().get(input) {
            return Ok(hit.clone());
        }

        let result = self.normalize_uncached(input);
        match &result {
            Ok(color) => {
                log::trace!("normalized {input:?} -> {color}");
                self.cache
                    .borrow_mut()
                    .put(input.to_string(), color.clone());
            }
            Err(err) => log::trace!("normalization failed for {input:?}: {err}"),
        }
        result
    }

    fn normalize_uncached(&self, input: &str) -> Result<CanonicalColor, NormalizeError> {
        static HEX_RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^#?(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex")
        });
        // Anchored at the start only: the open tail is what lets
        // rgba(r,g,b,a) match while its alpha component is ignored.
        static RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^rgba?\s*\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)").expect("valid regex")
        });

        if let Some(color) = self.dict.get(input) {
            return Ok(color.clone());
        }

        if HEX_RE.is_match(input) {
            let digits = input.strip_prefix('#').unwrap_or(input);
            let mut body = String::with_capacity(6);
            if digits.len() == 3 {
                for ch in digits.chars() {
                    body.push(ch);
                    body.push(ch);
                }
            } else {
                body.push_str(digits);
            }
            return Ok(CanonicalColor(format!("#{body}")));
        }

        if let Some(caps) = RGB_RE.captures(input) {
            let r = clamp_channel(&caps[1]);
            let g = clamp_channel(&caps[2]);
            let b = clamp_channel(&caps[3]);
            // Pack behind a sentinel high bit so the rendered hex is always
            // 7 digits; dropping the leading digit leaves a zero-padded body.
            let packed =
                0x0100_0000_u32 | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b);
            let hex = format!("{packed:x}");
            return Ok(CanonicalColor(format!("#{}", &hex[1..])));
        }

        Err(NormalizeError::Unrecognized(input.to_string()))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamp a captured decimal channel to 0-255. Captures too long to fit a
/// u32 saturate as well.
fn clamp_channel(digits: &str) -> u8 {
    digits
        .parse::<u32>()
        .map_or(u8::MAX, |value| u8::try_from(value).unwrap_or(u8::MAX))
}
