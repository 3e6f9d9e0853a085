//! The public widget surface.
//!
//! [`PaletteWidget`] wires the normalizer, registry, selection controller,
//! and interaction state machine together behind the API the host exposes:
//! palette management, color get/set, show/hide, input-event handling, and
//! teardown. Rendering stays outside: the widget only notifies its
//! [`WidgetRenderer`] collaborator about what changed.
//!
//! # Examples
//!
//! ```
//! use color_palette::widget::{PaletteOptions, PaletteWidget};
//! use color_palette::state::InputEvent;
//!
//! let mut widget = PaletteWidget::mount(PaletteOptions::default(), None).unwrap();
//! assert_eq!(widget.color().as_str(), "#ffffff");
//!
//! widget.handle(InputEvent::Toggle);
//! widget.handle(InputEvent::SelectSwatch("#ff0000".to_string()));
//! assert_eq!(widget.color().as_str(), "#ff0000");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::color::{CanonicalColor, Normalizer};
use crate::palette::{PaletteError, PaletteRegistry};
use crate::selection::{BoundDisplay, ChangeCallback, SelectionController};
use crate::state::{ColorCallback, InputEvent, InteractionStateMachine, OutsideInteractionSource};

/// Rendering collaborator notified of everything it must redraw.
///
/// All methods default to no-ops so renderers implement only what they
/// draw.
pub trait WidgetRenderer {
    /// The active palette changed (or was first mounted); re-render one
    /// interactive element per color, in order.
    fn render_swatches(&mut self, palette: &str, colors: &[String]) {
        let _ = (palette, colors);
    }

    /// The dropdown became visible.
    fn dropdown_opened(&mut self) {}

    /// The dropdown was dismissed.
    fn dropdown_closed(&mut self) {}

    /// The transient preview changed; `None` means no preview (closed).
    fn preview_changed(&mut self, color: Option<&CanonicalColor>) {
        let _ = color;
    }

    /// A new color was committed.
    fn committed_changed(&mut self, color: &CanonicalColor) {
        let _ = color;
    }
}

/// Errors surfaced while mounting a widget.
#[derive(Debug)]
pub enum WidgetError {
    /// The configured palettes could not seed the registry.
    Palette(PaletteError),
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Palette(err) => write!(f, "invalid palette configuration: {err}"),
        }
    }
}

impl std::error::Error for WidgetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Palette(err) => Some(err),
        }
    }
}

impl From<PaletteError> for WidgetError {
    fn from(err: PaletteError) -> Self {
        Self::Palette(err)
    }
}

/// Per-instance configuration snapshot, taken once at mount and never
/// shared between instances. `Default` is a pure data template.
pub struct PaletteOptions {
    palettes: Vec<(String, Vec<String>)>,
    inherit_builtin: bool,
    palette: Option<String>,
    color: Option<String>,
    colors_dict: Vec<(String, String)>,
    select: Option<ColorCallback>,
    hover: Option<ColorCallback>,
    on_change: Option<ChangeCallback>,
    bind_to: Option<Box<dyn BoundDisplay>>,
    outside_source: Option<Box<dyn OutsideInteractionSource>>,
    renderer: Option<Box<dyn WidgetRenderer>>,
    manual: bool,
    button: bool,
}

impl Default for PaletteOptions {
    fn default() -> Self {
        Self {
            palettes: Vec::new(),
            inherit_builtin: true,
            palette: Some("colors16".to_string()),
            color: Some("#ffffff".to_string()),
            colors_dict: Vec::new(),
            select: None,
            hover: None,
            on_change: None,
            bind_to: None,
            outside_source: None,
            renderer: None,
            manual: true,
            button: true,
        }
    }
}

impl PaletteOptions {
    /// Configured palettes seeding the registry, in order. They override or
    /// extend the built-ins unless [`inherit_builtin`](Self::inherit_builtin)
    /// is disabled.
    #[must_use]
    pub fn palettes<I, K>(mut self, palettes: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<String>)>,
        K: Into<String>,
    {
        self.palettes = palettes
            .into_iter()
            .map(|(name, colors)| (name.into(), colors))
            .collect();
        self
    }

    /// Whether the built-in palettes are inserted first (default true).
    #[must_use]
    pub fn inherit_builtin(mut self, inherit: bool) -> Self {
        self.inherit_builtin = inherit;
        self
    }

    /// Default active palette name.
    #[must_use]
    pub fn palette(mut self, name: impl Into<String>) -> Self {
        self.palette = Some(name.into());
        self
    }

    /// Default color, used when no field value normalizes.
    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Name-to-color entries overriding or extending the built-in
    /// dictionary.
    #[must_use]
    pub fn colors_dict<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.colors_dict = entries
            .into_iter()
            .map(|(name, color)| (name.into(), color.into()))
            .collect();
        self
    }

    /// Callback for successful commits via swatch select or Enter.
    #[must_use]
    pub fn on_select(mut self, callback: ColorCallback) -> Self {
        self.select = Some(callback);
        self
    }

    /// Callback for successful swatch hovers.
    #[must_use]
    pub fn on_hover(mut self, callback: ColorCallback) -> Self {
        self.hover = Some(callback);
        self
    }

    /// Callback for every successful commit, whatever its path.
    #[must_use]
    pub fn on_change(mut self, callback: ChangeCallback) -> Self {
        self.on_change = Some(callback);
        self
    }

    /// External display mirroring the committed color.
    #[must_use]
    pub fn bind_to(mut self, display: Box<dyn BoundDisplay>) -> Self {
        self.bind_to = Some(display);
        self
    }

    /// Source of outside-interaction events, held registered while open.
    #[must_use]
    pub fn outside_source(mut self, source: Box<dyn OutsideInteractionSource>) -> Self {
        self.outside_source = Some(source);
        self
    }

    /// Rendering collaborator.
    #[must_use]
    pub fn renderer(mut self, renderer: Box<dyn WidgetRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Enable the manual text-entry field (default true).
    #[must_use]
    pub fn manual(mut self, manual: bool) -> Self {
        self.manual = manual;
        self
    }

    /// Enable the toggle control (default true). When disabled, `Toggle`
    /// events are ignored; `show`/`hide` still work.
    #[must_use]
    pub fn button(mut self, button: bool) -> Self {
        self.button = button;
        self
    }
}

impl fmt::Debug for PaletteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaletteOptions")
            .field("palettes", &self.palettes.len())
            .field("inherit_builtin", &self.inherit_builtin)
            .field("palette", &self.palette)
            .field("color", &self.color)
            .field("manual", &self.manual)
            .field("button", &self.button)
            .finish_non_exhaustive()
    }
}

/// Typed commands mirroring the public methods, for callers wanting one
/// uniform entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddPalette { name: String, colors: Vec<String> },
    Palette,
    SetPalette { name: String },
    Palettes,
    Color,
    SetColor { value: String },
    Show,
    Hide,
    Input(InputEvent),
}

/// Result of [`PaletteWidget::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command carries no result.
    Done,
    /// Success or failure of a fallible command.
    Ok(bool),
    /// The active palette name.
    Name(String),
    /// The current committed color.
    Color(CanonicalColor),
    /// Result of a commit attempt; `None` when the value failed to
    /// normalize and the committed color was left unchanged.
    Committed(Option<CanonicalColor>),
    /// Snapshot of all palettes.
    Palettes(HashMap<String, Vec<String>>),
}

/// The assembled widget.
pub struct PaletteWidget {
    registry: PaletteRegistry,
    machine: InteractionStateMachine,
    renderer: Option<Box<dyn WidgetRenderer>>,
    button: bool,
}

/// Pre-transition observation used to diff renderer notifications.
struct Snapshot {
    open: bool,
    preview: Option<CanonicalColor>,
    committed: CanonicalColor,
}

impl PaletteWidget {
    /// Mount a widget from its configuration snapshot. This is the single
    /// "mounted" lifecycle hook, invoked once by the host when the widget's
    /// element is attached; `field_value` is the current text of the source
    /// field, consulted first for the initial committed color.
    ///
    /// # Errors
    ///
    /// [`WidgetError::Palette`] if the configured palettes cannot seed the
    /// registry (an empty palette, or no palettes at all with built-ins
    /// suppressed).
    pub fn mount(options: PaletteOptions, field_value: Option<&str>) -> Result<Self, WidgetError> {
        let PaletteOptions {
            palettes,
            inherit_builtin,
            palette,
            color,
            colors_dict,
            select,
            hover,
            on_change,
            bind_to,
            outside_source,
            renderer,
            manual,
            button,
        } = options;

        let normalizer = Rc::new(Normalizer::with_overrides(colors_dict));
        let registry = PaletteRegistry::new(palettes, palette.as_deref(), inherit_builtin)?;

        let mut selection =
            SelectionController::new(normalizer, &registry, field_value, color.as_deref());
        if let Some(callback) = on_change {
            selection.set_on_change(callback);
        }
        if let Some(display) = bind_to {
            selection.bind(display);
        }

        let mut machine = InteractionStateMachine::new(selection, manual);
        if let Some(callback) = select {
            machine.set_on_select(callback);
        }
        if let Some(callback) = hover {
            machine.set_on_hover(callback);
        }
        if let Some(source) = outside_source {
            machine.set_outside_source(source);
        }

        let mut widget = Self {
            registry,
            machine,
            renderer,
            button,
        };
        debug!(
            "widget: mounted, palette {:?}, color {}",
            widget.registry.active(),
            widget.machine.color()
        );
        if let Some(renderer) = widget.renderer.as_mut() {
            renderer.render_swatches(widget.registry.active(), widget.registry.active_colors());
            renderer.committed_changed(widget.machine.color());
        }
        Ok(widget)
    }

    /// Add a palette; `false` on a name conflict or empty colors, leaving
    /// the registry unchanged.
    pub fn add_palette(&mut self, name: &str, colors: Vec<String>) -> bool {
        self.registry.add(name, colors).is_ok()
    }

    /// Name of the active palette.
    #[must_use]
    pub fn palette(&self) -> &str {
        self.registry.active()
    }

    /// Switch the active palette; `false` if `name` is unknown. On success
    /// the renderer re-renders the swatch list.
    pub fn set_palette(&mut self, name: &str) -> bool {
        if self.registry.set_active(name).is_err() {
            return false;
        }
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render_swatches(self.registry.active(), self.registry.active_colors());
        }
        true
    }

    /// Defensive snapshot of all palettes.
    #[must_use]
    pub fn palettes(&self) -> HashMap<String, Vec<String>> {
        self.registry.snapshot()
    }

    /// The committed color.
    #[must_use]
    pub fn color(&self) -> &CanonicalColor {
        self.machine.color()
    }

    /// Commit a color directly; `None` if `raw` fails to normalize (the
    /// committed color is then unchanged).
    pub fn set_color(&mut self, raw: &str) -> Option<CanonicalColor> {
        match self.machine.selection_mut().set_color(raw) {
            Ok(color) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.committed_changed(&color);
                }
                Some(color)
            }
            Err(_) => None,
        }
    }

    /// Open the dropdown if it is closed.
    pub fn show(&mut self) {
        let snapshot = self.snapshot();
        self.machine.open();
        self.notify(&snapshot);
    }

    /// Close the dropdown if it is open, committing nothing.
    pub fn hide(&mut self) {
        let snapshot = self.snapshot();
        self.machine.close();
        self.notify(&snapshot);
    }

    /// Whether the dropdown is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.machine.is_open()
    }

    /// The transient preview color, if any.
    #[must_use]
    pub fn preview(&self) -> Option<&CanonicalColor> {
        self.machine.preview()
    }

    /// Feed one input event through the state machine and notify the
    /// renderer of whatever changed.
    pub fn handle(&mut self, event: InputEvent) {
        if event == InputEvent::Toggle && !self.button {
            return;
        }
        let snapshot = self.snapshot();
        self.machine.apply(event);
        self.notify(&snapshot);
    }

    /// Uniform command entry point.
    pub fn dispatch(&mut self, command: Command) -> CommandOutcome {
        match command {
            Command::AddPalette { name, colors } => {
                CommandOutcome::Ok(self.add_palette(&name, colors))
            }
            Command::Palette => CommandOutcome::Name(self.palette().to_string()),
            Command::SetPalette { name } => CommandOutcome::Ok(self.set_palette(&name)),
            Command::Palettes => CommandOutcome::Palettes(self.palettes()),
            Command::Color => CommandOutcome::Color(self.color().clone()),
            Command::SetColor { value } => CommandOutcome::Committed(self.set_color(&value)),
            Command::Show => {
                self.show();
                CommandOutcome::Done
            }
            Command::Hide => {
                self.hide();
                CommandOutcome::Done
            }
            Command::Input(event) => {
                self.handle(event);
                CommandOutcome::Done
            }
        }
    }

    /// Tear the widget down. The outside-interaction listener is released
    /// on this path too (and again defensively on drop).
    pub fn destroy(mut self) {
        debug!("widget: destroyed");
        self.hide();
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            open: self.machine.is_open(),
            preview: self.machine.preview().cloned(),
            committed: self.machine.color().clone(),
        }
    }

    fn notify(&mut self, before: &Snapshot) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let open = self.machine.is_open();
        if !before.open && open {
            renderer.dropdown_opened();
        }
        if before.open && !open {
            renderer.dropdown_closed();
        }
        if before.preview.as_ref() != self.machine.preview() {
            renderer.preview_changed(self.machine.preview());
        }
        if before.committed != *self.machine.color() {
            renderer.committed_changed(self.machine.color());
        }
    }
}

impl fmt::Debug for PaletteWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaletteWidget")
            .field("palette", &self.registry.active())
            .field("machine", &self.machine)
            .field("button", &self.button)
            .finish_non_exhaustive()
    }
}
