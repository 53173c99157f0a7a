//! Translation of drag gestures into reorder commands.
//!
//! The gesture itself (pointer tracking, collision detection, animation) is
//! owned by whatever sortable-list library the front end uses. All it tells
//! the list is which item was dragged and which item, if any, it was dropped
//! on. In return the list hands it [`TodoState::visible_ids`], the order the
//! gesture geometry is computed against.
//!
//! [`TodoState::visible_ids`]: crate::types::TodoState::visible_ids

use crate::types::{TodoAction, TodoId};

/// End of a drag gesture as reported by the sortable-list collaborator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragEnd {
    /// Item that was dragged
    pub active: TodoId,
    /// Item under the pointer when it was released, if any
    pub over: Option<TodoId>,
}

impl DragEnd {
    /// Drag of `active` released over `over`
    #[must_use]
    pub const fn new(active: TodoId, over: Option<TodoId>) -> Self {
        Self { active, over }
    }

    /// Reorder command for this gesture, or `None` when it is a no-op
    ///
    /// `visible` is the id sequence the gesture was performed on. A drop
    /// outside any item, onto the dragged item itself, or involving an id
    /// that was not rendered yields `None`.
    #[must_use]
    pub fn into_action(self, visible: &[TodoId]) -> Option<TodoAction> {
        let over = self.over?;
        if over == self.active || !visible.contains(&self.active) || !visible.contains(&over) {
            return None;
        }
        Some(TodoAction::ReorderTodo {
            source: self.active,
            destination: over,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<TodoId> {
        raw.iter().copied().map(TodoId::new).collect()
    }

    #[test]
    fn drop_on_other_item_reorders() {
        let drag = DragEnd::new(TodoId::new(3), Some(TodoId::new(1)));
        assert_eq!(
            drag.into_action(&ids(&[1, 2, 3])),
            Some(TodoAction::ReorderTodo {
                source: TodoId::new(3),
                destination: TodoId::new(1),
            })
        );
    }

    #[test]
    fn drop_outside_list_is_noop() {
        let drag = DragEnd::new(TodoId::new(2), None);
        assert_eq!(drag.into_action(&ids(&[1, 2, 3])), None);
    }

    #[test]
    fn drop_on_itself_is_noop() {
        let drag = DragEnd::new(TodoId::new(2), Some(TodoId::new(2)));
        assert_eq!(drag.into_action(&ids(&[1, 2, 3])), None);
    }

    #[test]
    fn hidden_items_cannot_take_part() {
        // 2 is filtered out of the rendered list
        let visible = ids(&[1, 3]);
        assert_eq!(DragEnd::new(TodoId::new(2), Some(TodoId::new(1))).into_action(&visible), None);
        assert_eq!(DragEnd::new(TodoId::new(1), Some(TodoId::new(2))).into_action(&visible), None);
    }
}
