use std::io::BufRead;
use std::str::FromStr;

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::error::ImportError;
use crate::math::Transform;

use super::lines::LineReader;
use super::types::{AnimationDocument, FormatVariant, FrameData, Node};

// ─── Token helpers ────────────────────────────────────────────────────────────

fn expect_line<R: BufRead>(
    lines: &mut LineReader<R>,
    context: &'static str,
) -> Result<String, ImportError> {
    lines
        .next_line()?
        .ok_or(ImportError::Truncated { context })
}

fn expect_parsed<T: FromStr, R: BufRead>(
    lines: &mut LineReader<R>,
    context: &'static str,
) -> Result<T, ImportError> {
    let line = expect_line(lines, context)?;
    line.parse::<T>().map_err(|_| ImportError::Parse {
        line: lines.current_index(),
        detail: format!("expected {context}, found {line:?}"),
    })
}

fn expect_floats<const N: usize, R: BufRead>(
    lines: &mut LineReader<R>,
    context: &'static str,
) -> Result<[f32; N], ImportError> {
    let line = expect_line(lines, context)?;
    let mut values = [0.0f32; N];
    let mut count = 0;

    for token in line.split_whitespace() {
        if count == N {
            count += 1;
            break;
        }
        values[count] = token.parse::<f32>().map_err(|_| ImportError::Parse {
            line: lines.current_index(),
            detail: format!("expected {context}, found {line:?}"),
        })?;
        count += 1;
    }

    if count != N {
        return Err(ImportError::Parse {
            line: lines.current_index(),
            detail: format!("expected {N}-component {context}, found {line:?}"),
        });
    }

    Ok(values)
}

// ─── Header ───────────────────────────────────────────────────────────────────

struct Header {
    node_checksum: i64,
    frame_count: usize,
    frames_per_second: u32,
    actor_count: usize,
    actor_names: Vec<String>,
    node_count: usize,
}

/// The two layouts carry the same six header fields in different orders.
fn read_header<R: BufRead>(
    lines: &mut LineReader<R>,
    variant: FormatVariant,
) -> Result<Header, ImportError> {
    match variant {
        FormatVariant::Legacy => {
            let frame_count = expect_parsed(lines, "frame count")?;
            let frames_per_second = expect_parsed(lines, "frames per second")?;
            let actor_count = expect_parsed(lines, "actor count")?;
            let actor_names = read_actor_names(lines)?;
            let node_count = expect_parsed(lines, "node count")?;
            let node_checksum = expect_parsed(lines, "node checksum")?;
            Ok(Header {
                node_checksum,
                frame_count,
                frames_per_second,
                actor_count,
                actor_names,
                node_count,
            })
        }
        FormatVariant::Modern => {
            let node_checksum = expect_parsed(lines, "node checksum")?;
            let frame_count = expect_parsed(lines, "frame count")?;
            let frames_per_second = expect_parsed(lines, "frames per second")?;
            let actor_count = expect_parsed(lines, "actor count")?;
            let actor_names = read_actor_names(lines)?;
            let node_count = expect_parsed(lines, "node count")?;
            Ok(Header {
                node_checksum,
                frame_count,
                frames_per_second,
                actor_count,
                actor_names,
                node_count,
            })
        }
    }
}

fn read_actor_names<R: BufRead>(lines: &mut LineReader<R>) -> Result<Vec<String>, ImportError> {
    let line = expect_line(lines, "actor names")?;
    Ok(line.split_whitespace().map(ToOwned::to_owned).collect())
}

// ─── Node records ─────────────────────────────────────────────────────────────

fn read_nodes<R: BufRead>(
    lines: &mut LineReader<R>,
    variant: FormatVariant,
    node_count: usize,
) -> Result<Vec<Node>, ImportError> {
    let mut nodes = Vec::with_capacity(node_count);

    for _ in 0..node_count {
        let mut node = Node::new(expect_line(lines, "node name")?);
        match variant {
            FormatVariant::Legacy => {
                node.child_index = expect_parsed(lines, "child index")?;
                node.sibling_index = expect_parsed(lines, "sibling index")?;
            }
            FormatVariant::Modern => {
                node.parent_index = expect_parsed(lines, "parent index")?;
            }
        }
        nodes.push(node);
    }

    Ok(nodes)
}

// ─── Frame records ────────────────────────────────────────────────────────────

/// One transform record is exactly four lines: translation, rotation, scale.
///
/// Rotations are stored `x y z w` on disk and reordered to `w x y z` here.
/// Legacy exporters wrote rotations with flipped handedness, so legacy
/// quaternions are conjugated after the read — reproduced as-is.
fn read_transform<R: BufRead>(
    lines: &mut LineReader<R>,
    variant: FormatVariant,
) -> Result<Transform, ImportError> {
    let [tx, ty, tz] = expect_floats(lines, "translation")?;
    let [rx, ry, rz, rw] = expect_floats(lines, "rotation")?;
    let [scale] = expect_floats(lines, "uniform scale")?;

    let mut rotation = UnitQuaternion::from_quaternion(Quaternion::new(rw, rx, ry, rz));
    if variant == FormatVariant::Legacy {
        rotation = rotation.inverse();
    }

    Ok(Transform {
        translation: Vector3::new(tx, ty, tz),
        rotation,
        scale,
    })
}

fn read_frames<R: BufRead>(
    lines: &mut LineReader<R>,
    variant: FormatVariant,
    frame_count: usize,
    node_count: usize,
) -> Result<Vec<FrameData>, ImportError> {
    let mut frames = Vec::with_capacity(frame_count);

    for _ in 0..frame_count {
        let mut transforms = Vec::with_capacity(node_count);
        for _ in 0..node_count {
            transforms.push(read_transform(lines, variant)?);
        }
        frames.push(FrameData { transforms });
    }

    Ok(frames)
}

// ─── Document ─────────────────────────────────────────────────────────────────

/// Consume the line stream and build a document.
///
/// Parent links and the hierarchy ordering are left unresolved; the importer
/// orchestration runs those stages afterwards.
pub(super) fn parse_document<R: BufRead>(
    lines: &mut LineReader<R>,
    name: &str,
) -> Result<AnimationDocument, ImportError> {
    let format_version: u32 = expect_parsed(lines, "format version")?;
    let variant = FormatVariant::from_version(format_version);

    let header = read_header(lines, variant)?;
    let nodes = read_nodes(lines, variant, header.node_count)?;
    let frames = read_frames(lines, variant, header.frame_count, header.node_count)?;

    if header.actor_names.len() != header.actor_count {
        tracing::debug!(
            declared = header.actor_count,
            found = header.actor_names.len(),
            "actor count does not match actor name list"
        );
    }

    Ok(AnimationDocument {
        name: name.to_owned(),
        format_version,
        variant,
        node_checksum: header.node_checksum,
        frame_count: header.frame_count,
        frames_per_second: header.frames_per_second,
        actor_count: header.actor_count,
        actor_names: header.actor_names,
        nodes,
        frames,
        hierarchy_order: Vec::new(),
    })
}
