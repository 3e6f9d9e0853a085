//! # color_palette
//!
//! The headless core of an interactive color-selection widget: pick a color
//! from a named palette or type one manually, and get back the canonically
//! normalized `#rrggbb` value.
//!
//! This crate contains only the logic; rendering, the outside-interaction
//! event source, and any bound display are external collaborators supplied
//! through traits.
//!
//! ## Quick Start
//!
//! ```rust
//! use color_palette::prelude::*;
//!
//! let mut widget = PaletteWidget::mount(
//!     PaletteOptions::default().palette("web").color("#336699"),
//!     None,
//! )
//! .unwrap();
//!
//! widget.handle(InputEvent::Toggle);
//! widget.handle(InputEvent::SelectSwatch("rgb(255, 0, 0)".to_string()));
//! assert_eq!(widget.color().as_str(), "#ff0000");
//! ```
//!
//! ## Core Concepts
//!
//! - **Normalizer**: reduces named / hex / `rgb()` text to one canonical form
//! - **PaletteRegistry**: named, ordered color collections plus the active pointer
//! - **SelectionController**: owns the committed color
//! - **InteractionStateMachine**: open/closed, live preview, commit/cancel
//! - **PaletteWidget**: the assembled public surface

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod palette;
pub mod selection;
pub mod state;
pub mod widget;

/// Re-exports for convenient usage
pub mod prelude {
    pub use crate::color::{CanonicalColor, NormalizeError, Normalizer};
    pub use crate::palette::{PaletteError, PaletteRegistry};
    pub use crate::selection::{BoundDisplay, SelectionController};
    pub use crate::state::{
        InputEvent, InteractionStateMachine, OutsideInteractionSource, WidgetState,
    };
    pub use crate::widget::{
        Command, CommandOutcome, PaletteOptions, PaletteWidget, WidgetError, WidgetRenderer,
    };
}

// Re-export key types at crate root
pub use color::{CanonicalColor, NormalizeError, Normalizer};
pub use palette::{PaletteError, PaletteRegistry};
pub use selection::SelectionController;
pub use state::{InputEvent, InteractionStateMachine, WidgetState};
pub use widget::{PaletteOptions, PaletteWidget};
