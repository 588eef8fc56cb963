//! Linear undo/redo of entity poses

use serde::{Deserialize, Serialize};
use shared::{EntityId, Pose};

/// Maximum number of retained history entries
pub const MAX_HISTORY: usize = 100;

/// Pose snapshot of one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: EntityId,
    #[serde(flatten)]
    pub pose: Pose,
}

impl HistoryEntry {
    pub fn new(id: impl Into<EntityId>, pose: Pose) -> Self {
        Self {
            id: id.into(),
            pose,
        }
    }
}

/// An open gizmo drag
#[derive(Debug, Clone)]
struct DragSession {
    before: HistoryEntry,
    before_recorded: bool,
}

/// Pose history: a vector of snapshots plus a cursor.
///
/// Entries after the cursor are the redo tail.
#[derive(Debug, Default)]
pub struct TransformHistory {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
    drag: Option<DragSession>,
}

impl TransformHistory {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Append a snapshot, discarding the redo tail.
    ///
    /// A snapshot identical to the one under the cursor only drops the tail.
    pub fn push(&mut self, entry: HistoryEntry) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        if self.entries.last() == Some(&entry) {
            return;
        }
        self.entries.push(entry);
        if self.entries.len() > MAX_HISTORY {
            self.entries.remove(0);
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// Step back. Returns the snapshot to apply.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        let c = self.cursor.filter(|c| *c > 0)? - 1;
        self.cursor = Some(c);
        self.entries.get(c)
    }

    /// Step forward. Returns the snapshot to apply.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        let c = self.cursor.filter(|c| c + 1 < self.entries.len())? + 1;
        self.cursor = Some(c);
        self.entries.get(c)
    }

    /// Open a drag session on `id` starting from `before`
    pub fn begin_drag(&mut self, id: impl Into<EntityId>, before: Pose) {
        self.drag = Some(DragSession {
            before: HistoryEntry::new(id, before),
            before_recorded: false,
        });
    }

    /// Entity of the open drag session
    pub fn drag_target(&self) -> Option<&EntityId> {
        self.drag.as_ref().map(|d| &d.before.id)
    }

    /// Pose of the dragged entity when the session opened
    pub fn drag_origin(&self) -> Option<&Pose> {
        self.drag.as_ref().map(|d| &d.before.pose)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Record a committed change of the dragged entity.
    ///
    /// The before snapshot is pushed once per session, ahead of the first change.
    pub fn record_change(&mut self, after: Pose) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        let id = drag.before.id.clone();
        let before = (!drag.before_recorded).then(|| drag.before.clone());
        drag.before_recorded = true;
        if let Some(before) = before {
            self.push(before);
        }
        self.push(HistoryEntry::new(id, after));
        true
    }

    /// Close the drag session
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Drop every entry and any open drag
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f64) -> Pose {
        Pose::at([x, 0.0, 0.0])
    }

    #[test]
    fn test_empty_history() {
        let mut h = TransformHistory::default();
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert!(h.undo().is_none());
        assert!(h.redo().is_none());
    }

    #[test]
    fn test_push_undo_redo() {
        let mut h = TransformHistory::default();
        h.push(HistoryEntry::new("a", at(0.0)));
        h.push(HistoryEntry::new("a", at(1.0)));
        h.push(HistoryEntry::new("a", at(2.0)));
        assert_eq!(h.cursor(), Some(2));

        assert_eq!(h.undo().unwrap().pose, at(1.0));
        assert_eq!(h.undo().unwrap().pose, at(0.0));
        assert!(h.undo().is_none());
        assert_eq!(h.cursor(), Some(0));

        assert_eq!(h.redo().unwrap().pose, at(1.0));
        assert_eq!(h.redo().unwrap().pose, at(2.0));
        assert!(h.redo().is_none());
    }

    #[test]
    fn test_push_after_undo_discards_redo_tail() {
        let mut h = TransformHistory::default();
        h.push(HistoryEntry::new("a", at(0.0)));
        h.push(HistoryEntry::new("a", at(1.0)));
        h.undo();
        h.push(HistoryEntry::new("a", at(5.0)));
        assert_eq!(h.len(), 2);
        assert!(!h.can_redo());
        assert_eq!(h.undo().unwrap().pose, at(0.0));
        assert_eq!(h.redo().unwrap().pose, at(5.0));
    }

    #[test]
    fn test_duplicate_snapshot_not_repeated() {
        let mut h = TransformHistory::default();
        h.push(HistoryEntry::new("a", at(0.0)));
        h.push(HistoryEntry::new("a", at(1.0)));
        h.push(HistoryEntry::new("a", at(1.0)));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut h = TransformHistory::default();
        for i in 0..(MAX_HISTORY + 10) {
            h.push(HistoryEntry::new("a", at(i as f64)));
        }
        assert_eq!(h.len(), MAX_HISTORY);
        assert_eq!(h.cursor(), Some(MAX_HISTORY - 1));
        assert_eq!(h.entries()[0].pose, at(10.0));
    }

    #[test]
    fn test_drag_records_before_once() {
        let mut h = TransformHistory::default();
        h.begin_drag("a", at(0.0));
        assert_eq!(h.drag_target().map(String::as_str), Some("a"));
        h.record_change(at(1.0));
        h.record_change(at(2.0));
        h.end_drag();
        assert!(!h.is_dragging());
        let poses: Vec<Pose> = h.entries().iter().map(|e| e.pose.clone()).collect();
        assert_eq!(poses, vec![at(0.0), at(1.0), at(2.0)]);
    }

    #[test]
    fn test_record_without_drag_is_ignored() {
        let mut h = TransformHistory::default();
        assert!(!h.record_change(at(1.0)));
        assert!(h.is_empty());
    }

    #[test]
    fn test_entry_serializes_flat() {
        let v = serde_json::to_value(HistoryEntry::new("a", at(1.0))).unwrap();
        assert_eq!(v["id"], "a");
        assert_eq!(v["position"][0], 1.0);
        assert_eq!(v["scale"][2], 1.0);
    }
}
