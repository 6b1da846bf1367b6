//! # Animation Nodes

use std::str::FromStr;

use anim_engine::{CodeContext, CodeContract, Node, NodeDeclaration, NodeKind, SocketType, SocketValue};
use serde::{Deserialize, Serialize};

/// Preset added by [`SetKeyframes::add_keyframe_path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PathType {
    Custom,
    #[default]
    Location,
    Rotation,
    Scale,
    LocRotScale,
}

impl PathType {
    pub const ALL: [PathType; 5] = [
        PathType::Custom,
        PathType::Location,
        PathType::Rotation,
        PathType::Scale,
        PathType::LocRotScale,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Custom => "Custom",
            Self::Location => "Location",
            Self::Rotation => "Rotation",
            Self::Scale => "Scale",
            Self::LocRotScale => "LocRotScale",
        }
    }

    /// Data paths the preset expands to.
    pub fn paths(&self) -> &'static [&'static str] {
        match self {
            Self::Custom => &[""],
            Self::Location => &["location"],
            Self::Rotation => &["rotation_euler"],
            Self::Scale => &["scale"],
            Self::LocRotScale => &["location", "rotation_euler", "scale"],
        }
    }
}

impl FromStr for PathType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| format!("unknown path type: {s}"))
    }
}

/// One animated property. An index of -1 keys every array element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyframePath {
    pub path: String,
    pub index: i64,
}

impl KeyframePath {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            index: -1,
        }
    }

    fn to_value(&self) -> SocketValue {
        SocketValue::List(vec![
            SocketValue::String(self.path.clone()),
            SocketValue::Integer(self.index),
        ])
    }

    fn from_value(value: &SocketValue) -> Option<Self> {
        match value {
            SocketValue::List(items) => match items.as_slice() {
                [path, index] => Some(Self {
                    path: path.as_str()?.to_string(),
                    index: index.as_integer()?,
                }),
                _ => None,
            },
            _ => None,
        }
    }

    /// Split a nested path into the owner expression and the attribute,
    /// e.g. `data.materials` into `("data", "materials")`.
    pub fn split_owner(&self) -> (Option<&str>, &str) {
        match self.path.split_once('.') {
            Some((owner, attribute)) => (Some(owner), attribute),
            None => (None, &self.path),
        }
    }
}

/// Inserts or removes keyframes on an object for a list of data paths.
///
/// The paths live in the `paths` property; the node object does the keying,
/// so the node compiles to a bare call.
pub struct SetKeyframes;

impl SetKeyframes {
    pub fn paths(node: &Node) -> Vec<KeyframePath> {
        match node.property("paths") {
            Some(SocketValue::List(items)) => items.iter().filter_map(KeyframePath::from_value).collect(),
            _ => Vec::new(),
        }
    }

    fn store_paths(node: &mut Node, paths: &[KeyframePath]) {
        node.properties.insert(
            "paths".to_string(),
            SocketValue::List(paths.iter().map(KeyframePath::to_value).collect()),
        );
    }

    pub fn selected_path_type(node: &Node) -> PathType {
        node.property("selectedPathType")
            .and_then(|value| value.as_str())
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn new_path(node: &mut Node, path: KeyframePath) {
        let mut paths = Self::paths(node);
        paths.push(path);
        Self::store_paths(node, &paths);
    }

    /// Append the paths of the selected preset.
    pub fn add_keyframe_path(node: &mut Node) {
        let mut paths = Self::paths(node);
        paths.extend(Self::selected_path_type(node).paths().iter().map(|p| KeyframePath::new(p)));
        Self::store_paths(node, &paths);
    }

    pub fn remove_path(node: &mut Node, index: usize) -> Option<KeyframePath> {
        let mut paths = Self::paths(node);
        if index >= paths.len() {
            return None;
        }
        let removed = paths.remove(index);
        Self::store_paths(node, &paths);
        Some(removed)
    }
}

impl NodeKind for SetKeyframes {
    fn declaration(&self) -> NodeDeclaration {
        NodeDeclaration::new("mn_SetKeyframesNode", "Set Keyframes")
            .category("Animation")
            .search_tags(&["Insert Keyframe"])
    }

    fn create(&self, node: &mut Node) {
        node.new_input(SocketType::Boolean, "Enable", "enable")
            .with_value(SocketValue::Boolean(false));
        node.new_input(SocketType::Boolean, "Set Keyframe", "setKeyframe");
        node.new_input(SocketType::Boolean, "Remove Unwanted", "removeUnwanted");
        node.new_input(SocketType::Object, "Object", "object");
        node.properties.insert(
            "selectedPathType".to_string(),
            SocketValue::String(PathType::default().as_str().to_string()),
        );
        Self::store_paths(node, &[]);
    }

    fn code(&self, _node: &Node, _ctx: &CodeContext) -> CodeContract {
        CodeContract::Procedure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anim_engine::compiler::generation::tagged_lines;

    fn node() -> Node {
        let mut node = Node::new("mn_SetKeyframesNode");
        SetKeyframes.create(&mut node);
        node
    }

    #[test]
    fn test_bare_call_without_outputs() {
        let node = node();
        assert_eq!(
            tagged_lines(&node, &CodeContract::Procedure),
            vec!["#self#.execute(%enable%, %setKeyframe%, %removeUnwanted%, %object%)"]
        );
    }

    #[test]
    fn test_add_preset_paths() {
        let mut node = node();
        SetKeyframes::add_keyframe_path(&mut node);
        node.properties.insert(
            "selectedPathType".to_string(),
            SocketValue::String("LocRotScale".into()),
        );
        SetKeyframes::add_keyframe_path(&mut node);

        let paths: Vec<_> = SetKeyframes::paths(&node).into_iter().map(|p| p.path).collect();
        assert_eq!(paths, vec!["location", "location", "rotation_euler", "scale"]);
        assert!(SetKeyframes::paths(&node).iter().all(|p| p.index == -1));
    }

    #[test]
    fn test_remove_path() {
        let mut node = node();
        SetKeyframes::new_path(&mut node, KeyframePath { path: "data.energy".into(), index: 0 });
        assert_eq!(SetKeyframes::remove_path(&mut node, 3), None);
        let removed = SetKeyframes::remove_path(&mut node, 0).unwrap();
        assert_eq!(removed.split_owner(), (Some("data"), "energy"));
        assert!(SetKeyframes::paths(&node).is_empty());
    }

    #[test]
    fn test_unknown_path_type_falls_back() {
        let mut node = node();
        node.properties
            .insert("selectedPathType".to_string(), SocketValue::String("Bogus".into()));
        assert_eq!(SetKeyframes::selected_path_type(&node), PathType::Location);
        assert!("Bogus".parse::<PathType>().is_err());
    }
}
