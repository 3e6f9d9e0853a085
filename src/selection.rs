//! Committed-color ownership.
//!
//! The selection controller owns the one durable piece of widget state: the
//! committed color. Everything else (preview, open/closed) is transient and
//! lives in the interaction state machine.

use std::rc::Rc;

use log::debug;

use crate::color::{CanonicalColor, NormalizeError, Normalizer};
use crate::palette::PaletteRegistry;

/// External display bound to the committed color (for example a text field
/// mirroring the value). Updated on every successful commit.
pub trait BoundDisplay {
    fn update(&mut self, color: &CanonicalColor);
}

/// Callback invoked with the newly committed color.
pub type ChangeCallback = Box<dyn FnMut(&CanonicalColor)>;

/// Owns the committed color; commits go through normalization and failures
/// are strict no-ops.
pub struct SelectionController {
    normalizer: Rc<Normalizer>,
    committed: CanonicalColor,
    on_change: Option<ChangeCallback>,
    bound: Option<Box<dyn BoundDisplay>>,
}

impl SelectionController {
    /// Create the controller and pick the initial committed color.
    ///
    /// Initialization order, first success wins:
    /// 1. normalize the externally sourced current field value;
    /// 2. normalize the configured default color;
    /// 3. fall back to the first color of the active palette, taken
    ///    verbatim (palette entries are assumed renderable as stored).
    #[must_use]
    pub fn new(
        normalizer: Rc<Normalizer>,
        registry: &PaletteRegistry,
        field_value: Option<&str>,
        default_color: Option<&str>,
    ) -> Self {
        let committed = field_value
            .and_then(|raw| normalizer.normalize(raw).ok())
            .or_else(|| default_color.and_then(|raw| normalizer.normalize(raw).ok()))
            .unwrap_or_else(|| {
                let first = registry
                    .active_colors()
                    .first()
                    .expect("palettes are never empty");
                CanonicalColor::verbatim(first)
            });
        debug!("selection: initial color {committed}");

        Self {
            normalizer,
            committed,
            on_change: None,
            bound: None,
        }
    }

    /// Register the on-change callback fired on every successful commit.
    pub fn set_on_change(&mut self, callback: ChangeCallback) {
        self.on_change = Some(callback);
    }

    /// Attach the bound display updated on every successful commit.
    pub fn bind(&mut self, display: Box<dyn BoundDisplay>) {
        self.bound = Some(display);
    }

    /// The committed color.
    #[must_use]
    pub fn color(&self) -> &CanonicalColor {
        &self.committed
    }

    /// Normalize `raw` and commit it.
    ///
    /// On success the committed color is updated, the bound display (if
    /// any) and the on-change callback (if any) are notified, and the new
    /// color is returned.
    ///
    /// # Errors
    ///
    /// Propagates the [`NormalizeError`]; the committed color is unchanged
    /// and no notification fires.
    pub fn set_color(&mut self, raw: &str) -> Result<CanonicalColor, NormalizeError> {
        let color = self.normalizer.normalize(raw)?;
        debug!("selection: committed {color}");
        self.committed = color.clone();
        if let Some(bound) = self.bound.as_mut() {
            bound.update(&color);
        }
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(&color);
        }
        Ok(color)
    }

    pub(crate) fn normalizer(&self) -> &Rc<Normalizer> {
        &self.normalizer
    }
}

impl std::fmt::Debug for SelectionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionController")
            .field("committed", &self.committed)
            .field("on_change", &self.on_change.is_some())
            .field("bound", &self.bound.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn controller(field: Option<&str>, default: Option<&str>) -> SelectionController {
        let normalizer = Rc::new(Normalizer::new());
        let registry = PaletteRegistry::default();
        SelectionController::new(normalizer, &registry, field, default)
    }

    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl BoundDisplay for Recorder {
        fn update(&mut self, color: &CanonicalColor) {
            self.0.borrow_mut().push(color.as_str().to_string());
        }
    }

    #[test]
    fn field_value_wins_initialization() {
        let c = controller(Some("rgb(1,2,3)"), Some("#ffffff"));
        assert_eq!(*c.color(), "#010203");
    }

    #[test]
    fn default_color_used_when_field_value_invalid() {
        let c = controller(Some("garbage"), Some("#abc"));
        assert_eq!(*c.color(), "#aabbcc");
    }

    #[test]
    fn first_palette_color_is_the_last_resort() {
        let c = controller(None, None);
        // First color of the first built-in palette, taken verbatim.
        assert_eq!(*c.color(), "#ffffff");
    }

    #[test]
    fn failed_commit_is_a_no_op() {
        let mut c = controller(None, Some("#ffffff"));
        let err = c.set_color("zzz").unwrap_err();
        assert_eq!(err, NormalizeError::Unrecognized("zzz".to_string()));
        assert_eq!(*c.color(), "#ffffff");
    }

    #[test]
    fn successful_commit_updates_and_notifies() {
        let mut c = controller(None, None);
        let seen: Rc<RefCell<Vec<String>>> = Rc::default();
        let seen_by_callback = Rc::clone(&seen);
        c.set_on_change(Box::new(move |color| {
            seen_by_callback
                .borrow_mut()
                .push(format!("cb:{}", color.as_str()));
        }));
        let bound = Rc::default();
        c.bind(Box::new(Recorder(Rc::clone(&bound))));

        let color = c.set_color("#ff0000").unwrap();
        assert_eq!(color, "#ff0000");
        assert_eq!(*c.color(), "#ff0000");
        assert_eq!(seen.borrow().as_slice(), ["cb:#ff0000"]);
        assert_eq!(bound.borrow().as_slice(), ["#ff0000"]);
    }

    #[test]
    fn failed_commit_does_not_notify() {
        let mut c = controller(None, None);
        let count = Rc::new(RefCell::new(0_u32));
        let count_in_cb = Rc::clone(&count);
        c.set_on_change(Box::new(move |_| *count_in_cb.borrow_mut() += 1));

        assert!(c.set_color("nope").is_err());
        assert_eq!(*count.borrow(), 0);
    }
}
