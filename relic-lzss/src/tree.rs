//! Binary-tree longest-match finder.
//!
//! Every frame position that can start a match is a node in one of 256
//! binary search trees, one tree per leading byte. Nodes are ordered by
//! the bytes that follow the leading one, so inserting the current
//! position walks exactly the candidates that share the longest prefix
//! with it. Insertion doubles as the search.
//!
//! The trees live in an index arena of `frame_size + 257` nodes:
//!
//! ```text
//! [0, frame_size)              one node per frame position
//! frame_size                   NIL sentinel
//! frame_size + 1 + byte        root of the tree for `byte`
//! ```

/// A match found by [`MatchTree::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchCandidate {
    /// Frame position where the match starts.
    pub position: usize,
    /// Number of matching bytes (0 if no candidate was compared).
    pub length: usize,
}

impl MatchCandidate {
    /// Back-reference distance from a write cursor at `cursor`.
    #[inline]
    pub fn distance_from(&self, cursor: usize, frame_size: usize) -> usize {
        match cursor.wrapping_sub(self.position) & (frame_size - 1) {
            0 => frame_size,
            distance => distance,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Node {
    parent: usize,
    left: usize,
    right: usize,
}

/// Arena of tree nodes plus the frame text they index.
#[derive(Debug, Clone)]
pub struct MatchTree {
    nodes: Vec<Node>,
    /// Frame bytes, with the first `max_match - 1` mirrored past the end
    /// so suffix comparisons never wrap.
    text: Vec<u8>,
    frame_size: usize,
    max_match: usize,
    nil: usize,
}

impl MatchTree {
    /// Create an empty tree set for the given frame geometry.
    pub fn new(frame_size: usize, max_match: usize) -> Self {
        let nil = frame_size;
        let empty = Node {
            parent: nil,
            left: nil,
            right: nil,
        };

        Self {
            nodes: vec![empty; frame_size + 257],
            text: vec![0; frame_size + max_match - 1],
            frame_size,
            max_match,
            nil,
        }
    }

    /// Sentinel index for "no node".
    #[inline]
    pub fn nil(&self) -> usize {
        self.nil
    }

    #[inline]
    fn root(&self, byte: u8) -> usize {
        self.nil + 1 + byte as usize
    }

    /// Store a frame byte, keeping the mirrored tail in sync.
    #[inline]
    pub fn set_byte(&mut self, position: usize, byte: u8) {
        self.text[position] = byte;
        if position < self.max_match - 1 {
            self.text[position + self.frame_size] = byte;
        }
    }

    /// Store a frame byte without touching the mirrored tail.
    #[inline]
    pub fn fill_byte(&mut self, position: usize, byte: u8) {
        self.text[position] = byte;
    }

    /// Read a frame byte.
    #[inline]
    pub fn byte_at(&self, position: usize) -> u8 {
        self.text[position]
    }

    /// Check whether `position` is currently linked into a tree.
    #[inline]
    pub fn contains(&self, position: usize) -> bool {
        self.nodes[position].parent != self.nil
    }

    /// Insert the suffix starting at `r` and return the longest match seen.
    ///
    /// A candidate only replaces the best one when strictly longer, and the
    /// walk stops as soon as a full `max_match` match is found. In that case
    /// the old node is replaced by `r`, since `r` is the more recent copy of
    /// the same string.
    pub fn insert(&mut self, r: usize) -> MatchCandidate {
        let nil = self.nil;
        let mut p = self.root(self.text[r]);
        self.nodes[r].left = nil;
        self.nodes[r].right = nil;

        let mut best = MatchCandidate::default();
        let mut cmp: i16 = 1;

        loop {
            if cmp >= 0 {
                if self.nodes[p].right != nil {
                    p = self.nodes[p].right;
                } else {
                    self.nodes[p].right = r;
                    self.nodes[r].parent = p;
                    return best;
                }
            } else if self.nodes[p].left != nil {
                p = self.nodes[p].left;
            } else {
                self.nodes[p].left = r;
                self.nodes[r].parent = p;
                return best;
            }

            let mut i = 1;
            cmp = 0;
            while i < self.max_match {
                cmp = self.text[r + i] as i16 - self.text[p + i] as i16;
                if cmp != 0 {
                    break;
                }
                i += 1;
            }

            if i > best.length {
                best = MatchCandidate {
                    position: p,
                    length: i,
                };
                if i >= self.max_match {
                    break;
                }
            }
        }

        // Replace p with r.
        let old = self.nodes[p];
        self.nodes[r] = old;
        self.nodes[old.left].parent = r;
        self.nodes[old.right].parent = r;
        if self.nodes[old.parent].right == p {
            self.nodes[old.parent].right = r;
        } else {
            self.nodes[old.parent].left = r;
        }
        self.nodes[p].parent = nil;

        best
    }

    /// Unlink position `p` from its tree (no-op if not linked).
    pub fn delete(&mut self, p: usize) {
        let nil = self.nil;
        if self.nodes[p].parent == nil {
            return;
        }

        let q = if self.nodes[p].right == nil {
            self.nodes[p].left
        } else if self.nodes[p].left == nil {
            self.nodes[p].right
        } else {
            // Replace p with its in-order predecessor.
            let mut q = self.nodes[p].left;
            if self.nodes[q].right != nil {
                while self.nodes[q].right != nil {
                    q = self.nodes[q].right;
                }
                let Node { parent, left, .. } = self.nodes[q];
                self.nodes[parent].right = left;
                self.nodes[left].parent = parent;

                let p_left = self.nodes[p].left;
                self.nodes[q].left = p_left;
                self.nodes[p_left].parent = q;
            }
            let p_right = self.nodes[p].right;
            self.nodes[q].right = p_right;
            self.nodes[p_right].parent = q;
            q
        };

        let parent = self.nodes[p].parent;
        self.nodes[q].parent = parent;
        if self.nodes[parent].right == p {
            self.nodes[parent].right = q;
        } else {
            self.nodes[parent].left = q;
        }
        self.nodes[p].parent = nil;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(text: &[u8]) -> MatchTree {
        let mut tree = MatchTree::new(64, 18);
        for (i, &b) in text.iter().enumerate() {
            tree.set_byte(i, b);
        }
        tree
    }

    #[test]
    fn test_first_insert_has_no_match() {
        let mut tree = tree_with(b"abcabc");
        let found = tree.insert(0);
        assert_eq!(found.length, 0);
        assert!(tree.contains(0));
    }

    #[test]
    fn test_finds_longest_match() {
        let mut tree = tree_with(b"abcdxabcdyabcdx");
        tree.insert(0);
        tree.insert(5);
        let found = tree.insert(10);
        assert_eq!(found.position, 0);
        assert_eq!(found.length, 5);
    }

    #[test]
    fn test_equal_length_keeps_first_seen() {
        // Both earlier positions share "ab" with position 8; the first
        // candidate visited is kept.
        let mut tree = tree_with(b"abx\0aby\0abz");
        tree.insert(0);
        tree.insert(4);
        let found = tree.insert(8);
        assert_eq!(found.length, 2);
        assert_eq!(found.position, 0);
    }

    #[test]
    fn test_full_match_replaces_node() {
        let mut tree = tree_with(&[b'q'; 40]);
        tree.insert(0);
        let found = tree.insert(1);
        assert_eq!(found.length, 18);
        assert_eq!(found.position, 0);
        assert!(!tree.contains(0));
        assert!(tree.contains(1));
    }

    #[test]
    fn test_delete_unlinks() {
        let mut tree = tree_with(b"abcdxabcdyabcdx");
        tree.insert(0);
        tree.insert(5);
        tree.delete(0);
        assert!(!tree.contains(0));

        let found = tree.insert(10);
        assert_eq!(found.position, 5);
        assert_eq!(found.length, 4);

        // Deleting an unlinked node is a no-op.
        tree.delete(0);
        assert!(tree.contains(5));
    }

    #[test]
    fn test_delete_node_with_two_children() {
        let mut tree = tree_with(b"m\0\0\0mb\0\0mz\0\0mc\0\0ma\0\0mc");
        for pos in [0, 4, 8, 12, 16] {
            tree.insert(pos);
        }
        tree.delete(4);
        for pos in [0, 8, 12, 16] {
            assert!(tree.contains(pos));
        }

        let found = tree.insert(20);
        assert_eq!(found.position, 12);
        assert_eq!(found.length, 4);
    }

    #[test]
    fn test_distance_from() {
        let candidate = MatchCandidate {
            position: 0xFEE,
            length: 9,
        };
        assert_eq!(candidate.distance_from(0xFEF, 4096), 1);
        assert_eq!(candidate.distance_from(0xFEE, 4096), 4096);
        assert_eq!(candidate.distance_from(0x002, 4096), 20);
    }
}
