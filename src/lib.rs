//! Legacy keyframe-animation importer and skeleton retargeter.
//!
//! Parses the two line-oriented JMA-style animation layouts (child/sibling
//! legacy encoding and parent-index modern encoding, split at format version
//! 16394), reconstructs the node hierarchy, rewrites modern transforms as
//! parent-relative, and retargets the result onto an arbitrary skeleton's
//! bind pose.

pub mod error;
pub mod import;
pub mod math;
pub mod retarget;

pub use error::ImportError;
pub use import::{
    AnimationDocument, FormatVariant, FrameData, LineReader, MODERN_VERSION_THRESHOLD, Node,
    import_animation, import_animation_from_reader,
};
pub use math::{Transform, decompose_trs, invert_safe};
pub use retarget::{
    ChannelSink, Keyframe, KeyframeBuffer, RetargetIssue, RetargetOptions, RetargetReport,
    RetargetStatus, Severity, TargetBone, TargetSkeleton, retarget_animation, strip_node_prefix,
};
