//! Translation controller
//!
//! The single place where the sheet's vertical offset is committed. Offset 0
//! is fully expanded and grows downward; the direction constraint pins the
//! content at 0 instead of letting it cross to the forbidden side.

use drawer_core::SheetDirection;

use crate::observers::{ObserverRegistry, SheetEvent};
use crate::state::ScrollingState;
use crate::tree::VisualNode;

/// Result of one commit
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Commit {
    /// Offset now applied to the content
    pub translation: f32,
    /// The requested value crossed the direction constraint and was pinned
    pub constrained: bool,
}

impl Commit {
    /// The sheet landed exactly at the expanded position through an
    /// unconstrained commit, so an active drag has to rebase on 0
    pub fn reached_rest(&self) -> bool {
        !self.constrained && self.translation == 0.0
    }
}

/// Owns the committed offset of the sheet's content
#[derive(Debug, Clone, Default)]
pub struct TranslationController {
    translation: f32,
}

impl TranslationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translation(&self) -> f32 {
        self.translation
    }

    /// Adopt an offset already applied to newly attached content
    pub fn sync(&mut self, translation: f32) {
        self.translation = translation;
    }

    /// Apply `value` to `content` and notify observers.
    ///
    /// A value on the side `direction` forbids pins the content at 0 and
    /// only reports the change.
    pub fn set_translation(
        &mut self,
        value: f32,
        velocity_y: f32,
        direction: SheetDirection,
        content: Option<&mut dyn VisualNode>,
        observers: &mut ObserverRegistry,
    ) -> Commit {
        if !direction.allows(value) {
            self.apply(0.0, content);
            observers.notify(SheetEvent::ScrollChange {
                offset: 0.0,
                velocity_y,
            });
            return Commit {
                translation: 0.0,
                constrained: true,
            };
        }

        observers.notify(SheetEvent::ScrollChange {
            offset: value,
            velocity_y,
        });
        observers.set_scrolling_state(ScrollingState::Dragging);
        self.apply(value, content);

        Commit {
            translation: value,
            constrained: false,
        }
    }

    fn apply(&mut self, value: f32, content: Option<&mut dyn VisualNode>) {
        self.translation = value;
        if let Some(content) = content {
            content.set_translation_y(value);
        }
    }
}
