//! Versioned ron snapshots of a tree, including collapse state.
//!
//! Lets a host carry the user's expanded/collapsed branches (and any offline
//! payload) across reloads without re-deriving them from persisted positions.

use std::path::Path;

use super::node::{NodeId, TreeNode, normalize_items};

pub const TREE_SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug)]
pub enum SnapshotError {
    UnsupportedVersion { found: u32, expected: u32 },
    RonSerialize(ron::Error),
    RonDeserialize(ron::error::SpannedError),
    Io(std::io::Error),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedVersion { found, expected } => {
                write!(
                    f,
                    "unsupported tree snapshot version: {found} (expected {expected})"
                )
            }
            Self::RonSerialize(err) => write!(f, "ron serialize error: {err}"),
            Self::RonDeserialize(err) => write!(f, "ron deserialize error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnsupportedVersion { .. } => None,
            Self::RonSerialize(err) => Some(err),
            Self::RonDeserialize(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ron::Error> for SnapshotError {
    fn from(err: ron::Error) -> Self {
        Self::RonSerialize(err)
    }
}

impl From<ron::error::SpannedError> for SnapshotError {
    fn from(err: ron::error::SpannedError) -> Self {
        Self::RonDeserialize(err)
    }
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct NodeSnapshot<D> {
    pub id: NodeId,
    pub data: D,
    pub collapsed: bool,
    pub can_have_children: bool,
    pub children: Vec<NodeSnapshot<D>>,
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct TreeSnapshot<D> {
    pub version: u32,
    pub roots: Vec<NodeSnapshot<D>>,
}

impl<D> TreeSnapshot<D> {
    pub fn capture<T>(items: &[TreeNode<T>]) -> Self
    where
        T: Clone + Into<D>,
    {
        fn node<T: Clone + Into<D>, D>(item: &TreeNode<T>) -> NodeSnapshot<D> {
            NodeSnapshot {
                id: item.id.clone(),
                data: item.data.clone().into(),
                collapsed: item.collapsed,
                can_have_children: item.can_have_children,
                children: item.children.iter().map(node).collect(),
            }
        }
        Self {
            version: TREE_SNAPSHOT_VERSION,
            roots: items.iter().map(node).collect(),
        }
    }

    /// Restore a tree, re-running leaf normalization in case the snapshot was
    /// edited or produced by a different version of the host.
    pub fn restore<T>(self) -> Result<Vec<TreeNode<T>>, SnapshotError>
    where
        D: Into<T>,
    {
        if self.version != TREE_SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                expected: TREE_SNAPSHOT_VERSION,
            });
        }
        fn node<D: Into<T>, T>(snapshot: NodeSnapshot<D>) -> TreeNode<T> {
            TreeNode {
                id: snapshot.id,
                data: snapshot.data.into(),
                collapsed: snapshot.collapsed,
                can_have_children: snapshot.can_have_children,
                children: snapshot.children.into_iter().map(node).collect(),
            }
        }
        let mut items: Vec<TreeNode<T>> = self.roots.into_iter().map(node).collect();
        normalize_items(&mut items);
        Ok(items)
    }

    pub fn to_ron_string(&self) -> Result<String, SnapshotError>
    where
        D: serde::Serialize,
    {
        Ok(ron::to_string(self)?)
    }

    pub fn from_ron_str(ron_str: &str) -> Result<Self, SnapshotError>
    where
        D: serde::de::DeserializeOwned,
    {
        Ok(ron::from_str(ron_str)?)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError>
    where
        D: serde::Serialize,
    {
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError>
    where
        D: serde::de::DeserializeOwned,
    {
        Self::from_ron_str(&std::fs::read_to_string(path)?)
    }
}
