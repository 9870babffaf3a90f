use std::collections::HashMap;

use nalgebra::{UnitQuaternion, Vector3};
use serde::Serialize;

// ─── Channel emitter boundary ─────────────────────────────────────────────────

/// Keyframe consumer on the host side of the retargeting stage.
///
/// One call per bound node per frame. Writes must be idempotent per
/// `(bone, frame)` key — a re-import overwrites, it never duplicates — and
/// emission order within a frame is unspecified.
pub trait ChannelSink {
    fn write_keyframe(
        &mut self,
        bone: usize,
        frame: usize,
        translation: Vector3<f32>,
        rotation: UnitQuaternion<f32>,
        scale: Vector3<f32>,
    );
}

/// One decomposed keyframe sample.
///
/// Rotation is serialized `[w, x, y, z]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Keyframe {
    pub bone: usize,
    pub frame: usize,
    pub translation: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

/// In-memory `ChannelSink` keyed by `(bone, frame)`.
///
/// Keeps channel data out of the node arena; hosts that stream keyframes
/// elsewhere implement `ChannelSink` directly instead.
#[derive(Debug, Default)]
pub struct KeyframeBuffer {
    samples: HashMap<(usize, usize), Keyframe>,
}

impl KeyframeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample for a `(bone, frame)` key, if one was emitted.
    pub fn get(&self, bone: usize, frame: usize) -> Option<&Keyframe> {
        self.samples.get(&(bone, frame))
    }

    /// Drain into a deterministic bone-major, frame-minor ordering.
    pub fn into_sorted(self) -> Vec<Keyframe> {
        let mut keyframes: Vec<Keyframe> = self.samples.into_values().collect();
        keyframes.sort_by_key(|keyframe| (keyframe.bone, keyframe.frame));
        keyframes
    }
}

impl ChannelSink for KeyframeBuffer {
    fn write_keyframe(
        &mut self,
        bone: usize,
        frame: usize,
        translation: Vector3<f32>,
        rotation: UnitQuaternion<f32>,
        scale: Vector3<f32>,
    ) {
        self.samples.insert(
            (bone, frame),
            Keyframe {
                bone,
                frame,
                translation: [translation.x, translation.y, translation.z],
                rotation: [rotation.w, rotation.i, rotation.j, rotation.k],
                scale: [scale.x, scale.y, scale.z],
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_repeated_key_when_writing_then_last_value_wins() {
        let mut buffer = KeyframeBuffer::new();
        buffer.write_keyframe(
            0,
            0,
            Vector3::new(1.0, 0.0, 0.0),
            UnitQuaternion::identity(),
            Vector3::new(1.0, 1.0, 1.0),
        );
        buffer.write_keyframe(
            0,
            0,
            Vector3::new(2.0, 0.0, 0.0),
            UnitQuaternion::identity(),
            Vector3::new(1.0, 1.0, 1.0),
        );

        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.get(0, 0).unwrap().translation, [2.0, 0.0, 0.0]);
    }

    #[test]
    fn given_scattered_samples_when_sorting_then_order_is_bone_major() {
        let mut buffer = KeyframeBuffer::new();
        let identity = UnitQuaternion::identity();
        let one = Vector3::new(1.0, 1.0, 1.0);
        buffer.write_keyframe(1, 0, Vector3::zeros(), identity, one);
        buffer.write_keyframe(0, 1, Vector3::zeros(), identity, one);
        buffer.write_keyframe(0, 0, Vector3::zeros(), identity, one);

        let keys: Vec<(usize, usize)> = buffer
            .into_sorted()
            .iter()
            .map(|keyframe| (keyframe.bone, keyframe.frame))
            .collect();
        assert_eq!(keys, vec![(0, 0), (0, 1), (1, 0)]);
    }
}
