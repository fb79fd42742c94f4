/*
 * A single file record within a scanned directory, and the observable cell
 * that wraps it. The backend owns scanning; entries arrive here fully
 * formed and are only ever mutated through the scoped operations below.
 * Identity within a directory is the entry's path.
 */
use serde::{Deserialize, Serialize};

use super::observable::{Observable, SubscriptionId};

/*
 * One file/directory record. `path` is slash-delimited and relative to the
 * owning directory's root. Backend fields this layer does not model
 * explicitly (size, mimetype, permissions, ...) are preserved verbatim in
 * `metadata` so they survive a round trip.
 */
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Entry {
    pub path: String,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub tags: Vec<String>,
    // Set when the backend reports the underlying file as no longer on disk.
    #[serde(default)]
    pub missing: bool,
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Entry {
    pub fn new(path: impl Into<String>) -> Self {
        Entry {
            path: path.into(),
            ..Entry::default()
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/*
 * Observable cell over one `Entry`. Scoped mutations read-modify-write the
 * whole entry and broadcast synchronously to all subscribers before the
 * call returns. Handles are cheap clones sharing the same cell; lookups on
 * a directory store hand these out.
 */
#[derive(Debug, Clone)]
pub struct EntryCell {
    cell: Observable<Entry>,
}

impl EntryCell {
    pub fn new(entry: Entry) -> Self {
        EntryCell {
            cell: Observable::new(entry),
        }
    }

    pub fn snapshot(&self) -> Entry {
        self.cell.snapshot()
    }

    pub fn path(&self) -> String {
        self.cell.with_value(|e| e.path.clone())
    }

    pub fn subscribe(&self, listener: Box<dyn FnMut(&Entry)>) -> SubscriptionId {
        self.cell.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.cell.unsubscribe(id)
    }

    /* Full overwrite, broadcasting the replacement. */
    pub fn replace(&self, entry: Entry) {
        self.cell.set(entry);
    }

    pub fn set_rating(&self, rating: u8) {
        log::trace!("EntryCell: set rating {rating} on '{}'", self.path());
        self.cell.update(|e| e.rating = rating);
    }

    /*
     * Adds a tag. Idempotent: re-adding an existing tag neither changes the
     * entry nor broadcasts.
     */
    pub fn add_tag(&self, tag: &str) {
        if self.cell.with_value(|e| e.has_tag(tag)) {
            return;
        }
        log::trace!("EntryCell: add tag '{tag}' on '{}'", self.path());
        self.cell.update(|e| e.tags.push(tag.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_set_rating_broadcasts_before_returning() {
        let cell = EntryCell::new(Entry::new("file.txt"));
        let seen: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        cell.subscribe(Box::new(move |e| seen_clone.borrow_mut().push(e.rating)));

        cell.set_rating(4);

        assert_eq!(*seen.borrow(), vec![4]);
        assert_eq!(cell.snapshot().rating, 4);
    }

    #[test]
    fn test_add_tag_is_idempotent_and_silent_on_repeat() {
        let cell = EntryCell::new(Entry::new("file.txt"));
        let notifications = Rc::new(RefCell::new(0usize));
        let notifications_clone = Rc::clone(&notifications);
        cell.subscribe(Box::new(move |_| *notifications_clone.borrow_mut() += 1));

        cell.add_tag("red");
        cell.add_tag("red");
        cell.add_tag("blue");

        let entry = cell.snapshot();
        assert_eq!(entry.tags, vec!["red", "blue"]);
        // The duplicate add produced no broadcast.
        assert_eq!(*notifications.borrow(), 2);
    }

    #[test]
    fn test_replace_overwrites_whole_entry() {
        let cell = EntryCell::new(Entry::new("old.txt"));
        let mut replacement = Entry::new("old.txt");
        replacement.rating = 2;
        replacement.tags.push("kept".to_string());

        cell.replace(replacement.clone());

        assert_eq!(cell.snapshot(), replacement);
    }

    #[test]
    fn test_unknown_backend_fields_survive_round_trip() {
        let json = r#"{"path":"a.png","rating":3,"Mimetype":"image/png","Size":1024}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.path, "a.png");
        assert_eq!(entry.rating, 3);
        assert_eq!(entry.metadata["Mimetype"], "image/png");

        let back = serde_json::to_string(&entry).unwrap();
        assert!(back.contains("\"Size\":1024"));
    }
}
