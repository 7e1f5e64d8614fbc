use serde::{Deserialize, Serialize};

/// Identifies a research item in the catalog. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResearchId(pub u32);

/// Identifies an external boolean condition (e.g. an allied-support flag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConditionId(pub u32);

/// Identifies a configuration object that research effects mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn research_id_equality() {
        let a = ResearchId(0);
        let b = ResearchId(0);
        let c = ResearchId(1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn ids_order_by_inner_value() {
        assert!(ResearchId(1) < ResearchId(2));
        assert!(ConditionId(0) < ConditionId(7));
        assert!(TargetId(3) > TargetId(2));
    }

    #[test]
    fn ids_are_hashable() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ConditionId(0), "military_aid");
        map.insert(ConditionId(1), "harbor_open");
        assert_eq!(map[&ConditionId(0)], "military_aid");
    }
}
