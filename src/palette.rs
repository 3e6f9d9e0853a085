//! Named palette registry.
//!
//! A palette is a named, ordered, non-empty list of color strings displayed
//! as selectable swatches. The registry keeps palettes in insertion order
//! (the fallback for the active pointer) and tracks which one is active.
//!
//! The registry stores color entries as supplied: callers are responsible
//! for them being renderable. It never normalizes stored values.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use log::debug;

/// Built-in palettes shipped with the widget, parsed once from TSV data.
static BUILTIN_PALETTES: LazyLock<Vec<(String, Vec<String>)>> = LazyLock::new(|| {
    let mut palettes = Vec::new();

    for (line_no, line) in include_str!("default_palettes.tsv").lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (name, colors) = line
            .split_once('\t')
            .expect("src/default_palettes.tsv: expected TAB-separated name + colors");

        let colors: Vec<String> = colors.split(',').map(str::to_string).collect();
        assert!(
            !colors.is_empty(),
            "src/default_palettes.tsv:{}: palette {name:?} has no colors",
            line_no + 1
        );
        assert!(
            !palettes.iter().any(|(existing, _)| existing == name),
            "src/default_palettes.tsv:{}: duplicate palette {name:?}",
            line_no + 1
        );

        palettes.push((name.to_string(), colors));
    }

    palettes
});

/// Errors returned by [`PaletteRegistry`] operations.
///
/// All variants are recoverable; the registry is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// `add` was called with a name that already exists.
    Conflict { name: String },
    /// The named palette does not exist.
    Unknown { name: String },
    /// A palette was supplied with no colors.
    EmptyColors { name: String },
    /// Construction produced a registry with no palettes at all.
    EmptyRegistry,
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict { name } => write!(f, "palette {name:?} already exists"),
            Self::Unknown { name } => write!(f, "unknown palette {name:?}"),
            Self::EmptyColors { name } => write!(f, "palette {name:?} has no colors"),
            Self::EmptyRegistry => write!(f, "registry has no palettes"),
        }
    }
}

impl std::error::Error for PaletteError {}

/// Ordered collection of named palettes plus the active-palette pointer.
///
/// Invariants: every stored palette is non-empty; the active pointer always
/// references an existing entry.
#[derive(Debug, Clone)]
pub struct PaletteRegistry {
    order: Vec<String>,
    palettes: HashMap<String, Vec<String>>,
    active: String,
}

impl PaletteRegistry {
    /// Build a registry from configured palettes.
    ///
    /// If `inherit` is true the built-in palettes (`colors12`, `colors16`,
    /// `colors48`, `web`) are inserted first and configured entries override
    /// or extend them. The active pointer is set to `default_active` when
    /// that palette exists, otherwise to the first-inserted palette.
    ///
    /// # Errors
    ///
    /// [`PaletteError::EmptyColors`] if a configured palette has no colors,
    /// [`PaletteError::EmptyRegistry`] if built-ins are suppressed and no
    /// palettes are supplied.
    pub fn new<I>(
        palettes: I,
        default_active: Option<&str>,
        inherit: bool,
    ) -> Result<Self, PaletteError>
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut order = Vec::new();
        let mut map: HashMap<String, Vec<String>> = HashMap::new();

        if inherit {
            for (name, colors) in BUILTIN_PALETTES.iter() {
                order.push(name.clone());
                map.insert(name.clone(), colors.clone());
            }
        }

        for (name, colors) in palettes {
            if colors.is_empty() {
                return Err(PaletteError::EmptyColors { name });
            }
            if !map.contains_key(&name) {
                order.push(name.clone());
            }
            map.insert(name, colors);
        }

        let Some(first) = order.first() else {
            return Err(PaletteError::EmptyRegistry);
        };

        let active = match default_active {
            Some(name) if map.contains_key(name) => name.to_string(),
            _ => first.clone(),
        };

        Ok(Self {
            order,
            palettes: map,
            active,
        })
    }

    /// Insert a new palette. Never overwrites: a name conflict fails and
    /// leaves the registry unchanged.
    ///
    /// # Errors
    ///
    /// [`PaletteError::Conflict`] if `name` exists,
    /// [`PaletteError::EmptyColors`] if `colors` is empty.
    pub fn add(&mut self, name: &str, colors: Vec<String>) -> Result<(), PaletteError> {
        if self.palettes.contains_key(name) {
            return Err(PaletteError::Conflict {
                name: name.to_string(),
            });
        }
        if colors.is_empty() {
            return Err(PaletteError::EmptyColors {
                name: name.to_string(),
            });
        }
        debug!("registry: added palette {name:?} ({} colors)", colors.len());
        self.order.push(name.to_string());
        self.palettes.insert(name.to_string(), colors);
        Ok(())
    }

    /// Point the active palette at `name`.
    ///
    /// # Errors
    ///
    /// [`PaletteError::Unknown`] if `name` does not exist; the active
    /// pointer is left unchanged.
    pub fn set_active(&mut self, name: &str) -> Result<(), PaletteError> {
        if !self.palettes.contains_key(name) {
            return Err(PaletteError::Unknown {
                name: name.to_string(),
            });
        }
        debug!("registry: active palette {:?} -> {name:?}", self.active);
        self.active = name.to_string();
        Ok(())
    }

    /// Name of the active palette.
    #[must_use]
    pub fn active(&self) -> &str {
        &self.active
    }

    /// Colors of the named palette, in display order.
    #[must_use]
    pub fn colors(&self, name: &str) -> Option<&[String]> {
        self.palettes.get(name).map(Vec::as_slice)
    }

    /// Colors of the active palette, in display order.
    #[must_use]
    pub fn active_colors(&self) -> &[String] {
        self.palettes
            .get(&self.active)
            .expect("active palette exists")
    }

    /// Whether the named palette exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.palettes.contains_key(name)
    }

    /// Palette names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Defensive deep copy of the whole mapping; mutating the returned
    /// value never affects registry state.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, Vec<String>> {
        self.palettes.clone()
    }
}

impl Default for PaletteRegistry {
    fn default() -> Self {
        Self::new(std::iter::empty(), None, true).expect("built-in palettes are non-empty")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn builtins_are_present_in_insertion_order() {
        let registry = PaletteRegistry::default();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, ["colors12", "colors16", "colors48", "web"]);
        assert_eq!(registry.colors("colors12").unwrap().len(), 12);
        assert_eq!(registry.colors("colors16").unwrap().len(), 16);
        assert_eq!(registry.colors("colors48").unwrap().len(), 48);
        assert_eq!(registry.colors("web").unwrap().len(), 216);
    }

    #[test]
    fn default_active_falls_back_to_first_inserted() {
        let registry = PaletteRegistry::default();
        assert_eq!(registry.active(), "colors12");

        let registry =
            PaletteRegistry::new(std::iter::empty(), Some("no-such-palette"), true).unwrap();
        assert_eq!(registry.active(), "colors12");
    }

    #[test]
    fn configured_default_active_wins_when_present() {
        let registry = PaletteRegistry::new(std::iter::empty(), Some("colors16"), true).unwrap();
        assert_eq!(registry.active(), "colors16");
    }

    #[test]
    fn configured_palettes_override_and_extend_builtins() {
        let registry = PaletteRegistry::new(
            [
                ("colors12".to_string(), colors(&["#111111"])),
                ("custom".to_string(), colors(&["#222222", "#333333"])),
            ],
            None,
            true,
        )
        .unwrap();
        assert_eq!(registry.colors("colors12").unwrap(), ["#111111"]);
        assert_eq!(registry.colors("custom").unwrap(), ["#222222", "#333333"]);
        // Overriding a built-in keeps its original position.
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, ["colors12", "colors16", "colors48", "web", "custom"]);
    }

    #[test]
    fn empty_registry_is_rejected() {
        let err = PaletteRegistry::new(std::iter::empty(), None, false).unwrap_err();
        assert_eq!(err, PaletteError::EmptyRegistry);
    }

    #[test]
    fn configured_empty_palette_is_rejected() {
        let err = PaletteRegistry::new([("bad".to_string(), Vec::new())], None, true).unwrap_err();
        assert_eq!(
            err,
            PaletteError::EmptyColors {
                name: "bad".to_string()
            }
        );
    }

    #[test]
    fn add_preserves_order_and_rejects_conflicts() {
        let mut registry = PaletteRegistry::default();
        registry
            .add("custom", colors(&["#111111", "#222222"]))
            .unwrap();
        assert_eq!(registry.colors("custom").unwrap(), ["#111111", "#222222"]);

        let err = registry.add("custom", colors(&["#999999"])).unwrap_err();
        assert_eq!(
            err,
            PaletteError::Conflict {
                name: "custom".to_string()
            }
        );
        // Original colors untouched by the failed second add.
        assert_eq!(registry.colors("custom").unwrap(), ["#111111", "#222222"]);
    }

    #[test]
    fn add_rejects_empty_colors() {
        let mut registry = PaletteRegistry::default();
        let err = registry.add("empty", Vec::new()).unwrap_err();
        assert_eq!(
            err,
            PaletteError::EmptyColors {
                name: "empty".to_string()
            }
        );
        assert!(!registry.contains("empty"));
    }

    #[test]
    fn set_active_validates_the_name() {
        let mut registry = PaletteRegistry::default();
        registry.set_active("web").unwrap();
        assert_eq!(registry.active(), "web");

        let err = registry.set_active("nope").unwrap_err();
        assert_eq!(
            err,
            PaletteError::Unknown {
                name: "nope".to_string()
            }
        );
        assert_eq!(registry.active(), "web");
    }

    #[test]
    fn snapshot_is_a_defensive_copy() {
        let registry = PaletteRegistry::default();
        let mut snapshot = registry.snapshot();
        snapshot.remove("colors16");
        snapshot
            .get_mut("colors12")
            .unwrap()
            .push("#badbad".to_string());

        assert!(registry.contains("colors16"));
        assert_eq!(registry.colors("colors12").unwrap().len(), 12);
        assert!(registry.snapshot().contains_key("colors16"));
    }
}
