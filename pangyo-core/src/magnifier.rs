//! The Pangyo-speak magnifier: hover a term, get its entry in a tooltip.
//!
//! Pure geometry and lookup; the front end supplies the selection, the
//! cursor position, and the viewport, and renders whatever comes back.

use crate::dictionary::{Dictionary, DictionaryEntry};
use crate::items::{Inventory, MAGNIFIER_ID};

pub const TOOLTIP_WIDTH: f32 = 350.0;
pub const TOOLTIP_HEIGHT: f32 = 200.0;

/// Minimum distance from any viewport edge.
pub const EDGE_PADDING: f32 = 20.0;

/// Vertical offset below the cursor.
pub const CURSOR_OFFSET: f32 = 20.0;

/// Longest selection the magnifier will look up, in characters.
pub const MAX_SELECTION_CHARS: usize = 50;

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPosition {
    pub x: f32,
    pub y: f32,
}

/// The visible area the tooltip must stay inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Where the tooltip goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipPlacement {
    /// Top-left corner.
    pub x: f32,
    pub y: f32,
    /// Whether the tooltip flipped above the cursor to avoid the bottom edge.
    pub above_cursor: bool,
}

/// A successful magnifier hit.
#[derive(Debug, Clone, PartialEq)]
pub struct MagnifierLookup {
    pub entry: DictionaryEntry,
    pub placement: TooltipPlacement,
}

/// Look up a hovered selection.
///
/// Returns `None` unless the magnifier is owned, the trimmed selection is
/// non-empty and at most [`MAX_SELECTION_CHARS`] characters, and it exactly
/// matches a dictionary term.
pub fn lookup(
    inventory: &Inventory,
    dictionary: &Dictionary,
    selection: &str,
    cursor: ScreenPosition,
    viewport: Viewport,
) -> Option<MagnifierLookup> {
    if !inventory.has(MAGNIFIER_ID) {
        return None;
    }
    let selection = selection.trim();
    if selection.is_empty() || selection.chars().count() > MAX_SELECTION_CHARS {
        return None;
    }
    let entry = dictionary.get(selection)?.clone();
    Some(MagnifierLookup {
        entry,
        placement: place_tooltip(cursor, viewport),
    })
}

/// Position the tooltip near the cursor, clamped inside the viewport.
///
/// The preferred spot is centered below the cursor; if that would run off
/// the bottom it flips above, and both axes are clamped to the padding.
pub fn place_tooltip(cursor: ScreenPosition, viewport: Viewport) -> TooltipPlacement {
    let mut x = cursor.x - TOOLTIP_WIDTH / 2.0;
    if x + TOOLTIP_WIDTH > viewport.width - EDGE_PADDING {
        x = viewport.width - TOOLTIP_WIDTH - EDGE_PADDING;
    }
    if x < EDGE_PADDING {
        x = EDGE_PADDING;
    }

    let mut y = cursor.y + CURSOR_OFFSET;
    let mut above_cursor = false;
    if y + TOOLTIP_HEIGHT > viewport.height - EDGE_PADDING {
        y = cursor.y - TOOLTIP_HEIGHT - CURSOR_OFFSET;
        above_cursor = true;
    }
    if y < EDGE_PADDING {
        y = EDGE_PADDING;
    }

    TooltipPlacement { x, y, above_cursor }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;
    use crate::items::find_item;

    fn viewport() -> Viewport {
        Viewport {
            width: 1280.0,
            height: 800.0,
        }
    }

    fn inventory_with_magnifier() -> Inventory {
        let mut inventory = Inventory::new();
        inventory.add(find_item(MAGNIFIER_ID).unwrap().clone());
        inventory
    }

    #[test]
    fn test_lookup_requires_magnifier() {
        let dict = Dictionary::builtin();
        let empty = Inventory::new();
        let pos = ScreenPosition { x: 400.0, y: 300.0 };
        assert!(lookup(&empty, &dict, "인비", pos, viewport()).is_none());
        assert!(lookup(&inventory_with_magnifier(), &dict, "인비", pos, viewport()).is_some());
    }

    #[test]
    fn test_lookup_trims_and_matches_exactly() {
        let dict = Dictionary::builtin();
        let inventory = inventory_with_magnifier();
        let pos = ScreenPosition { x: 400.0, y: 300.0 };

        let hit = lookup(&inventory, &dict, "  인비  ", pos, viewport()).unwrap();
        assert_eq!(hit.entry.term, "인비");

        assert!(lookup(&inventory, &dict, "인비를", pos, viewport()).is_none());
        assert!(lookup(&inventory, &dict, "", pos, viewport()).is_none());
        assert!(lookup(&inventory, &dict, "   ", pos, viewport()).is_none());
    }

    #[test]
    fn test_lookup_rejects_long_selection() {
        let dict = Dictionary::builtin();
        let inventory = inventory_with_magnifier();
        let pos = ScreenPosition { x: 400.0, y: 300.0 };
        let long: String = "가".repeat(MAX_SELECTION_CHARS + 1);
        assert!(lookup(&inventory, &dict, &long, pos, viewport()).is_none());
    }

    #[test]
    fn test_placement_centered_below_cursor() {
        let p = place_tooltip(ScreenPosition { x: 640.0, y: 300.0 }, viewport());
        assert_eq!(p.x, 640.0 - TOOLTIP_WIDTH / 2.0);
        assert_eq!(p.y, 320.0);
        assert!(!p.above_cursor);
    }

    #[test]
    fn test_placement_clamps_horizontally() {
        let vp = viewport();
        let right = place_tooltip(ScreenPosition { x: 1270.0, y: 300.0 }, vp);
        assert_eq!(right.x, vp.width - TOOLTIP_WIDTH - EDGE_PADDING);

        let left = place_tooltip(ScreenPosition { x: 5.0, y: 300.0 }, vp);
        assert_eq!(left.x, EDGE_PADDING);
    }

    #[test]
    fn test_placement_flips_above_near_bottom() {
        let p = place_tooltip(ScreenPosition { x: 640.0, y: 780.0 }, viewport());
        assert!(p.above_cursor);
        assert_eq!(p.y, 780.0 - TOOLTIP_HEIGHT - CURSOR_OFFSET);
    }

    #[test]
    fn test_placement_never_leaves_top_padding() {
        // Tiny viewport: flipping above would go negative; clamp to padding.
        let vp = Viewport {
            width: 500.0,
            height: 250.0,
        };
        let p = place_tooltip(ScreenPosition { x: 250.0, y: 200.0 }, vp);
        assert!(p.above_cursor);
        assert_eq!(p.y, EDGE_PADDING);
    }
}
