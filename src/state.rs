//! Open/closed interaction state machine.
//!
//! Every external interaction (toggle click, swatch hover, keystroke,
//! outside pointer press) arrives as one discrete [`InputEvent`] and is
//! processed synchronously to completion, so transitions are totally
//! ordered and never interleave.
//!
//! While `Open` the machine keeps a transient preview color and the text of
//! an in-progress manual edit; both are discarded on every transition to
//! `Closed`. Commits go through the [`SelectionController`]; a failed
//! normalization never disturbs prior state.

use std::rc::Rc;

use log::debug;

use crate::color::{CanonicalColor, Normalizer};
use crate::selection::SelectionController;

/// The two widget states. The widget is long-lived: there is no terminal
/// state, only external destruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WidgetState {
    #[default]
    Closed,
    Open,
}

/// Discrete input events, one per external interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// The toggle control was activated.
    Toggle,
    /// A pointer interaction happened outside the widget while open.
    OutsideInteraction,
    /// The pointer entered a swatch carrying this raw color value.
    HoverSwatch(String),
    /// The pointer left the hovered swatch.
    UnhoverSwatch,
    /// A swatch carrying this raw color value was activated.
    SelectSwatch(String),
    /// Escape was pressed in the manual-entry field.
    KeyEscape,
    /// Enter was pressed in the manual-entry field.
    KeyEnter,
    /// The manual-entry field text changed to this value.
    ManualTextEdit(String),
}

/// Registration with the external event source that reports pointer
/// interactions outside the widget's rendered bounds.
///
/// The machine guarantees `register` is in effect exactly while `Open` and
/// `deregister` runs on every path that leaves `Open`, including `Drop`.
pub trait OutsideInteractionSource {
    fn register(&mut self);
    fn deregister(&mut self);
}

/// Callback invoked with a canonical color on select or hover.
pub type ColorCallback = Box<dyn FnMut(&CanonicalColor)>;

/// Orchestrates open/closed, live preview, and commit/cancel semantics.
pub struct InteractionStateMachine {
    state: WidgetState,
    preview: Option<CanonicalColor>,
    typed: String,
    manual: bool,
    selection: SelectionController,
    normalizer: Rc<Normalizer>,
    outside: Option<Box<dyn OutsideInteractionSource>>,
    listening: bool,
    on_select: Option<ColorCallback>,
    on_hover: Option<ColorCallback>,
}

impl InteractionStateMachine {
    /// Create a machine in the `Closed` state around an initialized
    /// selection controller. `manual` mirrors the manual-entry option:
    /// when false, text edits and Enter commits are ignored.
    #[must_use]
    pub fn new(selection: SelectionController, manual: bool) -> Self {
        let normalizer = Rc::clone(selection.normalizer());
        Self {
            state: WidgetState::Closed,
            preview: None,
            typed: String::new(),
            manual,
            selection,
            normalizer,
            outside: None,
            listening: false,
            on_select: None,
            on_hover: None,
        }
    }

    /// Attach the outside-interaction source registered while open.
    pub fn set_outside_source(&mut self, source: Box<dyn OutsideInteractionSource>) {
        self.outside = Some(source);
    }

    /// Callback for successful commits via swatch select or Enter.
    pub fn set_on_select(&mut self, callback: ColorCallback) {
        self.on_select = Some(callback);
    }

    /// Callback for successful swatch hovers.
    pub fn set_on_hover(&mut self, callback: ColorCallback) {
        self.on_hover = Some(callback);
    }

    /// Dispatch one input event to its transition.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Toggle => self.toggle(),
            InputEvent::OutsideInteraction => self.outside_interaction(),
            InputEvent::HoverSwatch(raw) => self.hover_swatch(&raw),
            InputEvent::UnhoverSwatch => self.unhover_swatch(),
            InputEvent::SelectSwatch(raw) => self.select_swatch(&raw),
            InputEvent::KeyEscape => self.key_escape(),
            InputEvent::KeyEnter => self.key_enter(),
            InputEvent::ManualTextEdit(raw) => self.manual_text_edit(&raw),
        }
    }

    /// Flip between `Closed` and `Open`.
    pub fn toggle(&mut self) {
        match self.state {
            WidgetState::Closed => self.open(),
            WidgetState::Open => self.close(),
        }
    }

    /// Enter `Open`: preview starts at the committed color and the outside
    /// listener is registered. No-op when already open.
    pub fn open(&mut self) {
        if self.state == WidgetState::Open {
            return;
        }
        self.state = WidgetState::Open;
        self.preview = Some(self.selection.color().clone());
        self.acquire_listener();
        debug!("interaction: opened, preview {:?}", self.preview);
    }

    /// Enter `Closed` without committing: preview and any in-progress
    /// manual edit are discarded, the outside listener released. No-op when
    /// already closed.
    pub fn close(&mut self) {
        if self.state == WidgetState::Closed {
            return;
        }
        self.release_listener();
        self.state = WidgetState::Closed;
        self.preview = None;
        self.typed.clear();
        debug!("interaction: closed");
    }

    /// A pointer interaction outside the widget closes it, same as toggle.
    pub fn outside_interaction(&mut self) {
        if self.state == WidgetState::Open {
            self.close();
        }
    }

    /// Hovering a swatch previews its color. An invalid swatch value is
    /// ignored silently.
    pub fn hover_swatch(&mut self, raw: &str) {
        if self.state != WidgetState::Open {
            return;
        }
        if let Ok(color) = self.normalizer.normalize(raw) {
            self.preview = Some(color.clone());
            if let Some(on_hover) = self.on_hover.as_mut() {
                on_hover(&color);
            }
        }
    }

    /// Leaving the hovered swatch reverts the preview to the committed
    /// color.
    pub fn unhover_swatch(&mut self) {
        if self.state != WidgetState::Open {
            return;
        }
        self.preview = Some(self.selection.color().clone());
    }

    /// Selecting a swatch commits its color and closes. The dropdown closes
    /// even when the swatch value fails to normalize (no commit then).
    pub fn select_swatch(&mut self, raw: &str) {
        if self.state != WidgetState::Open {
            return;
        }
        if let Ok(color) = self.selection.set_color(raw)
            && let Some(on_select) = self.on_select.as_mut()
        {
            on_select(&color);
        }
        self.close();
    }

    /// Escape is the cancellation path: discard the uncommitted edit and
    /// close without committing.
    pub fn key_escape(&mut self) {
        if self.state == WidgetState::Open {
            self.close();
        }
    }

    /// Enter attempts to commit the current typed text, then closes. A
    /// failed commit retains the previous committed value.
    pub fn key_enter(&mut self) {
        if self.state != WidgetState::Open {
            return;
        }
        if self.manual {
            let typed = std::mem::take(&mut self.typed);
            if let Ok(color) = self.selection.set_color(&typed)
                && let Some(on_select) = self.on_select.as_mut()
            {
                on_select(&color);
            }
        }
        self.close();
    }

    /// A manual edit updates the live preview only; the committed color is
    /// untouched. Text that fails to normalize leaves the preview as it
    /// was.
    pub fn manual_text_edit(&mut self, raw: &str) {
        if self.state != WidgetState::Open || !self.manual {
            return;
        }
        self.typed = raw.to_string();
        if let Ok(color) = self.normalizer.normalize(raw) {
            self.preview = Some(color);
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> WidgetState {
        self.state
    }

    /// Whether the dropdown is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == WidgetState::Open
    }

    /// The transient preview color; `None` whenever closed.
    #[must_use]
    pub fn preview(&self) -> Option<&CanonicalColor> {
        self.preview.as_ref()
    }

    /// The in-progress manual edit text.
    #[must_use]
    pub fn typed_text(&self) -> &str {
        &self.typed
    }

    /// The committed color.
    #[must_use]
    pub fn color(&self) -> &CanonicalColor {
        self.selection.color()
    }

    /// Mutable access to the selection controller for the widget's direct
    /// commit path; external callers commit through the widget so renderer
    /// notifications are never skipped.
    pub(crate) fn selection_mut(&mut self) -> &mut SelectionController {
        &mut self.selection
    }

    fn acquire_listener(&mut self) {
        if self.listening {
            return;
        }
        if let Some(source) = self.outside.as_mut() {
            source.register();
            self.listening = true;
        }
    }

    fn release_listener(&mut self) {
        if !self.listening {
            return;
        }
        if let Some(source) = self.outside.as_mut() {
            source.deregister();
        }
        self.listening = false;
    }
}

impl Drop for InteractionStateMachine {
    fn drop(&mut self) {
        // A widget torn down while open must not leak the global listener.
        self.release_listener();
    }
}

impl std::fmt::Debug for InteractionStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionStateMachine")
            .field("state", &self.state)
            .field("preview", &self.preview)
            .field("typed", &self.typed)
            .field("manual", &self.manual)
            .field("listening", &self.listening)
            .finish_non_exhaustive()
    }
}
