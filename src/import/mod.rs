mod hierarchy;
mod lines;
mod parser;
mod relative;
mod types;

use std::io::BufRead;
use std::path::Path;

use crate::error::ImportError;

// Re-export public types for callers of this module.
pub use lines::LineReader;
pub use types::{AnimationDocument, FormatVariant, FrameData, MODERN_VERSION_THRESHOLD, Node};

use hierarchy::{hierarchy_order, resolve_parents};
use parser::parse_document;
use relative::make_parent_relative;

// ─── Public API ───────────────────────────────────────────────────────────────

/// Import a keyframe animation file.
///
/// Runs the full pipeline: parse, resolve the node hierarchy, and (for modern
/// files) rewrite absolute transforms as parent-relative ones. The document
/// name is taken from the file stem. Any failure is fatal — no partial
/// document is returned.
pub fn import_animation(path: &Path) -> Result<AnimationDocument, ImportError> {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut lines = LineReader::open(path)?;
    import_animation_from_reader(&mut lines, &name)
}

/// Import from an already-open line stream (in-memory sources, tests).
pub fn import_animation_from_reader<R: BufRead>(
    lines: &mut LineReader<R>,
    name: &str,
) -> Result<AnimationDocument, ImportError> {
    let mut document = parse_document(lines, name)?;

    resolve_parents(&mut document.nodes, document.variant)?;
    document.hierarchy_order = hierarchy_order(&document.nodes);

    // Legacy transforms are parent-relative at the source level; rewriting
    // them here would double-apply the parent inversion.
    if document.variant == FormatVariant::Modern {
        make_parent_relative(
            &mut document.frames,
            &document.nodes,
            &document.hierarchy_order,
        );
    }

    tracing::debug!(
        name = %document.name,
        version = document.format_version,
        nodes = document.nodes.len(),
        frames = document.frame_count,
        "imported animation document"
    );

    Ok(document)
}
