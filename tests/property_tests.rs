//! Property-based tests for color normalization and the interaction
//! state machine.
//!
//! Uses proptest to verify invariants that should hold for any input.

use proptest::prelude::*;

use std::rc::Rc;

use color_palette::color::Normalizer;
use color_palette::palette::PaletteRegistry;
use color_palette::selection::SelectionController;
use color_palette::state::{InputEvent, InteractionStateMachine, WidgetState};

// ============================================================================
// Custom Strategies
// ============================================================================

/// A hex color body of exactly 3 or 6 digits, mixed case.
fn hex_input() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9a-fA-F]{3}",
        "[0-9a-fA-F]{6}",
        "#[0-9a-fA-F]{3}",
        "#[0-9a-fA-F]{6}",
    ]
}

/// An rgb()/rgba() input with in-range channels.
fn rgb_input() -> impl Strategy<Value = ((u8, u8, u8), bool)> {
    ((any::<u8>(), any::<u8>(), any::<u8>()), any::<bool>())
}

/// Any input event, carrying arbitrary short strings where relevant.
fn any_event() -> impl Strategy<Value = InputEvent> {
    let raw = "[ -~]{0,12}";
    prop_oneof![
        Just(InputEvent::Toggle),
        Just(InputEvent::OutsideInteraction),
        raw.prop_map(InputEvent::HoverSwatch),
        Just(InputEvent::UnhoverSwatch),
        raw.prop_map(InputEvent::SelectSwatch),
        Just(InputEvent::KeyEscape),
        Just(InputEvent::KeyEnter),
        raw.prop_map(InputEvent::ManualTextEdit),
    ]
}

fn is_canonical(color: &str) -> bool {
    let Some(body) = color.strip_prefix('#') else {
        return false;
    };
    body.len() == 6 && body.chars().all(|c| c.is_ascii_hexdigit())
}

fn machine() -> InteractionStateMachine {
    let normalizer = Rc::new(Normalizer::new());
    let registry = PaletteRegistry::default();
    let selection = SelectionController::new(normalizer, &registry, None, Some("#ffffff"));
    InteractionStateMachine::new(selection, true)
}

// ============================================================================
// Normalizer properties
// ============================================================================

proptest! {
    /// Every successful normalization yields `#` + 6 hex digits.
    #[test]
    fn successful_output_is_always_canonical(input in "[ -~]{0,24}") {
        let normalizer = Normalizer::new();
        if let Ok(color) = normalizer.normalize(&input) {
            prop_assert!(
                is_canonical(color.as_str()),
                "non-canonical output {:?} for input {:?}",
                color.as_str(),
                input
            );
        }
    }

    /// Normalizing a canonical output is idempotent.
    #[test]
    fn normalization_is_idempotent_on_hex(input in hex_input()) {
        let normalizer = Normalizer::new();
        let once = normalizer.normalize(&input).expect("hex input normalizes");
        let twice = normalizer
            .normalize(once.as_str())
            .expect("canonical output normalizes");
        prop_assert_eq!(once, twice);
    }

    /// rgb()/rgba() render each channel as two zero-padded hex digits,
    /// alpha never leaks into the output.
    #[test]
    fn rgb_channels_round_trip(((r, g, b), with_alpha) in rgb_input()) {
        let normalizer = Normalizer::new();
        let input = if with_alpha {
            format!("rgba({r}, {g}, {b}, 0.5)")
        } else {
            format!("rgb({r}, {g}, {b})")
        };
        let color = normalizer.normalize(&input).expect("rgb input normalizes");
        prop_assert_eq!(color.as_str(), format!("#{r:02x}{g:02x}{b:02x}"));
    }

    /// Surrounding whitespace never changes the result.
    #[test]
    fn trim_is_transparent(input in hex_input(), pad_left in " {0,4}", pad_right in " {0,4}") {
        let normalizer = Normalizer::new();
        let bare = normalizer.normalize(&input);
        let padded = normalizer.normalize(&format!("{pad_left}{input}{pad_right}"));
        prop_assert_eq!(bare, padded);
    }

    /// Failures are total no-ops for the selection controller.
    #[test]
    fn failed_set_color_never_moves_committed(input in "[ -~]{0,24}") {
        let normalizer = Rc::new(Normalizer::new());
        let registry = PaletteRegistry::default();
        let mut selection =
            SelectionController::new(normalizer, &registry, None, Some("#ffffff"));
        let before = selection.color().clone();
        if selection.set_color(&input).is_err() {
            prop_assert_eq!(selection.color(), &before);
        }
    }
}

// ============================================================================
// State machine properties
// ============================================================================

proptest! {
    /// Whatever the event sequence, the machine invariants hold: preview
    /// exists only while open, the committed color stays canonical, and
    /// closing always lands in a clean state.
    #[test]
    fn machine_invariants_hold_under_any_event_sequence(
        events in prop::collection::vec(any_event(), 0..40)
    ) {
        let mut m = machine();
        for event in events {
            m.apply(event);
            match m.state() {
                WidgetState::Open => prop_assert!(m.preview().is_some()),
                WidgetState::Closed => {
                    prop_assert!(m.preview().is_none());
                    prop_assert_eq!(m.typed_text(), "");
                }
            }
            prop_assert!(is_canonical(m.color().as_str()));
        }
    }

    /// A toggle pair from Closed is always a no-op for committed state.
    #[test]
    fn toggle_twice_commits_nothing(raw in "[ -~]{0,12}") {
        let mut m = machine();
        let before = m.color().clone();
        m.apply(InputEvent::Toggle);
        m.apply(InputEvent::HoverSwatch(raw));
        m.apply(InputEvent::Toggle);
        prop_assert_eq!(m.color(), &before);
        prop_assert_eq!(m.state(), WidgetState::Closed);
    }
}
