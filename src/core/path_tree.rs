/*
 * A hierarchical index over slash-delimited entry paths. Each directory
 * store keeps one of these in lockstep with its flat entry list so the UI
 * can do structural lookups (what lives under "a/b"?) without rebuilding a
 * tree from the list on every render. Node maps are ordered, so traversal
 * yields paths in sorted order.
 */
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
struct PathNode {
    children: BTreeMap<String, PathNode>,
    // Set when a full inserted path terminates at this node. Intermediate
    // segments exist only as branches unless separately inserted.
    terminal: bool,
}

impl PathNode {
    fn is_empty(&self) -> bool {
        !self.terminal && self.children.is_empty()
    }

    fn count_terminals(&self) -> usize {
        let own = usize::from(self.terminal);
        own + self
            .children
            .values()
            .map(PathNode::count_terminals)
            .sum::<usize>()
    }

    fn collect_paths(&self, prefix: &str, out: &mut Vec<String>) {
        if self.terminal {
            out.push(prefix.to_string());
        }
        for (segment, child) in &self.children {
            let joined = if prefix.is_empty() {
                segment.clone()
            } else {
                format!("{prefix}/{segment}")
            };
            child.collect_paths(&joined, out);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathTree {
    root: PathNode,
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

impl PathTree {
    pub fn new() -> Self {
        PathTree::default()
    }

    /*
     * Whether a path carries at least one segment and can therefore be
     * indexed. Callers keeping a collection in lockstep with a tree must
     * reject paths this returns false for, since `insert` ignores them.
     */
    pub fn indexable(path: &str) -> bool {
        !segments(path).is_empty()
    }

    /*
     * Inserts a path, decomposing it into hierarchical segments. Inserting
     * a path that is already present, or a path with no segments, is a
     * no-op.
     */
    pub fn insert(&mut self, path: &str) {
        let segments = segments(path);
        if segments.is_empty() {
            return;
        }
        let mut node = &mut self.root;
        for segment in segments {
            node = node.children.entry(segment.to_string()).or_default();
        }
        node.terminal = true;
    }

    /*
     * Removes a path and prunes any branches left empty by the removal.
     * Returns whether the path was present.
     */
    pub fn remove(&mut self, path: &str) -> bool {
        let segments = segments(path);
        if segments.is_empty() {
            return false;
        }
        Self::remove_recursive(&mut self.root, &segments)
    }

    fn remove_recursive(node: &mut PathNode, segments: &[&str]) -> bool {
        let Some((head, rest)) = segments.split_first() else {
            let was_terminal = node.terminal;
            node.terminal = false;
            return was_terminal;
        };
        let Some(child) = node.children.get_mut(*head) else {
            return false;
        };
        let removed = Self::remove_recursive(child, rest);
        if child.is_empty() {
            node.children.remove(*head);
        }
        removed
    }

    pub fn contains(&self, path: &str) -> bool {
        let mut node = &self.root;
        for segment in segments(path) {
            match node.children.get(segment) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.terminal
    }

    /* Number of full paths in the index (branches are not counted). */
    pub fn len(&self) -> usize {
        self.root.count_terminals()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /* All indexed paths, re-joined with '/', in sorted order. */
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.root.collect_paths("", &mut out);
        out
    }

    /*
     * Structural lookup: the child segment names directly under `prefix`.
     * An empty prefix lists the root level. Returns `None` when the prefix
     * does not exist as a branch or path.
     */
    pub fn children(&self, prefix: &str) -> Option<Vec<String>> {
        let mut node = &self.root;
        for segment in segments(prefix) {
            node = node.children.get(segment)?;
        }
        Some(node.children.keys().cloned().collect())
    }
}
