//! The persisted `(id, parent, index)` triples and their diffing.

use super::node::{NodeId, TreeNode};

/// Minimal persisted representation of one node's position.
///
/// Serializes with camelCase keys, matching the position-update payloads
/// reordering backends conventionally accept.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PositionUpdate {
    pub id: NodeId,
    pub parent_id: Option<NodeId>,
    pub index: usize,
}

/// The full position set of a tree, in pre-order.
pub fn position_updates<T>(items: &[TreeNode<T>]) -> Vec<PositionUpdate> {
    let mut out = Vec::new();
    collect(items, None, &mut out);
    out
}

fn collect<T>(items: &[TreeNode<T>], parent_id: Option<&NodeId>, out: &mut Vec<PositionUpdate>) {
    for (index, item) in items.iter().enumerate() {
        out.push(PositionUpdate {
            id: item.id.clone(),
            parent_id: parent_id.cloned(),
            index,
        });
        collect(&item.children, Some(&item.id), out);
    }
}

/// Entries of `new` whose position differs from (or is absent in) `old`.
///
/// The persistence sink still receives the full new set; the changed subset
/// exists so hosts and logs can see *what* a drop actually moved, and so a
/// drop that lands exactly where it started detects as a no-op.
pub fn changed_positions(old: &[PositionUpdate], new: &[PositionUpdate]) -> Vec<PositionUpdate> {
    new.iter()
        .filter(|update| {
            old.iter()
                .find(|prev| prev.id == update.id)
                .is_none_or(|prev| prev != *update)
        })
        .cloned()
        .collect()
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn position_updates_serialize_with_camel_case_keys() {
        let update = PositionUpdate {
            id: "d".into(),
            parent_id: None,
            index: 2,
        };
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"id":"d","parentId":null,"index":2}"#
        );

        let parsed: PositionUpdate =
            serde_json::from_str(r#"{"id":"b","parentId":"a","index":0}"#).unwrap();
        assert_eq!(
            parsed,
            PositionUpdate {
                id: "b".into(),
                parent_id: Some("a".into()),
                index: 0,
            }
        );
    }
}
