// ─── Node-name normalization ──────────────────────────────────────────────────

/// Cosmetic rig prefixes found on legacy skeleton exports.
const NODE_NAME_PREFIXES: [&str; 8] = [
    "b ", "b_", "frame ", "frame_", "bip ", "bip_", "bone ", "bone_",
];

/// Default name normalizer: strip one cosmetic rig prefix, if present.
///
/// `"bone_spine"` and `"spine"` normalize to the same joint name. Matching is
/// case-insensitive on the prefix only; the remainder is returned unchanged
/// so callers decide how strictly names compare.
pub fn strip_node_prefix(name: &str) -> String {
    let lowered = name.to_ascii_lowercase();
    for prefix in NODE_NAME_PREFIXES {
        if lowered.starts_with(prefix) {
            return name[prefix.len()..].to_owned();
        }
    }
    name.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_each_known_prefix_when_normalizing_then_it_is_stripped() {
        for prefix in NODE_NAME_PREFIXES {
            let name = format!("{prefix}spine");
            assert_eq!(strip_node_prefix(&name), "spine", "prefix {prefix:?}");
        }
    }

    #[test]
    fn given_uppercase_prefix_when_normalizing_then_match_is_case_insensitive() {
        assert_eq!(strip_node_prefix("Bip_Pelvis"), "Pelvis");
    }

    #[test]
    fn given_unprefixed_name_when_normalizing_then_it_is_unchanged() {
        assert_eq!(strip_node_prefix("pelvis"), "pelvis");
    }

    #[test]
    fn given_prefix_like_interior_when_normalizing_then_only_leading_prefix_counts() {
        assert_eq!(strip_node_prefix("left_bone_arm"), "left_bone_arm");
    }

    #[test]
    fn given_doubled_prefix_when_normalizing_then_only_one_is_stripped() {
        assert_eq!(strip_node_prefix("bone_bone_arm"), "bone_arm");
    }
}
