use crate::math::Transform;

// ─── Format dispatch ──────────────────────────────────────────────────────────

/// First version that uses the modern header and node-record layout.
pub const MODERN_VERSION_THRESHOLD: u32 = 16394;

/// The two mutually exclusive on-disk layouts, selected once from the version
/// line at the top of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatVariant {
    /// Pre-16394: child/sibling node linkage, conjugated rotations,
    /// transforms already parent-relative.
    Legacy,
    /// 16394 and later: direct parent indices, absolute transforms that need
    /// a parent-relative rewrite after parsing.
    Modern,
}

impl FormatVariant {
    /// Classify a format version number.
    pub fn from_version(version: u32) -> Self {
        if version < MODERN_VERSION_THRESHOLD {
            FormatVariant::Legacy
        } else {
            FormatVariant::Modern
        }
    }
}

// ─── Document types ───────────────────────────────────────────────────────────

/// One skeletal joint as declared in the animation file.
///
/// Nodes live in an arena (`AnimationDocument::nodes`); declaration order is
/// the stable index space used by frames and bindings. `parent` is resolved
/// exactly once after the whole node table is read and never re-resolved.
#[derive(Debug, Clone)]
pub struct Node {
    /// Declared name; not guaranteed unique.
    pub name: String,
    /// Resolved index of the parent node, −1 for roots. Read directly from
    /// modern files, derived from the child/sibling walk for legacy files.
    pub parent_index: i32,
    /// First-child index in the legacy linked-list encoding, −1 for none.
    pub child_index: i32,
    /// Next-sibling index in the legacy linked-list encoding, −1 for none.
    pub sibling_index: i32,
    /// Arena index of the parent, `None` for roots.
    pub parent: Option<usize>,
}

impl Node {
    pub(super) fn new(name: String) -> Self {
        Self {
            name,
            parent_index: -1,
            child_index: -1,
            sibling_index: -1,
            parent: None,
        }
    }
}

/// One sample in time: a pose for every node, indexed by declaration order.
#[derive(Debug, Clone)]
pub struct FrameData {
    pub transforms: Vec<Transform>,
}

/// A fully parsed animation file.
#[derive(Debug, Clone)]
pub struct AnimationDocument {
    /// Document name, taken from the file stem.
    pub name: String,
    /// Raw version number from the first line.
    pub format_version: u32,
    /// Layout selected from `format_version`.
    pub variant: FormatVariant,
    /// Opaque hierarchy checksum; carried through, never validated here.
    pub node_checksum: i64,
    pub frame_count: usize,
    pub frames_per_second: u32,
    /// Declared actor count; the name list is authoritative.
    pub actor_count: usize,
    pub actor_names: Vec<String>,
    /// Node arena in declaration order.
    pub nodes: Vec<Node>,
    /// `frame_count` frames, each holding one transform per node.
    pub frames: Vec<FrameData>,
    /// Hierarchy-adjacent visit order: node indices stably sorted by
    /// `parent_index + 1`. Children always sort after their parent.
    pub hierarchy_order: Vec<usize>,
}
