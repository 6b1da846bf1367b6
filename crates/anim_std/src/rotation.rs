//! # Rotation Nodes
//!
//! Quaternion math with a selectable operation and a noise based euler
//! wiggle.

use anim_engine::{
    CodeContext, CodeContract, Node, NodeDeclaration, NodeKind, RawCode, SocketType, SocketValue,
};
use tracing::debug;

/// Operation of a [`QuaternionMath`] node, stored in its `operation` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuaternionOperation {
    Add,
    Subtract,
    Combine,
    RotationDifference,
    Multiply,
    Divide,
    Cross,
    Normalize,
    Scale,
    Absolute,
    Invert,
    Conjugate,
    Snap,
}

impl QuaternionOperation {
    pub const ALL: [QuaternionOperation; 13] = [
        Self::Add,
        Self::Subtract,
        Self::Combine,
        Self::RotationDifference,
        Self::Multiply,
        Self::Divide,
        Self::Cross,
        Self::Normalize,
        Self::Scale,
        Self::Absolute,
        Self::Invert,
        Self::Conjugate,
        Self::Snap,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Subtract => "SUBTRACT",
            Self::Combine => "COMBINE",
            Self::RotationDifference => "ROTATION_DIFFERENCE",
            Self::Multiply => "MULTIPLY",
            Self::Divide => "DIVIDE",
            Self::Cross => "CROSS",
            Self::Normalize => "NORMALIZE",
            Self::Scale => "SCALE",
            Self::Absolute => "ABSOLUTE",
            Self::Invert => "INVERT",
            Self::Conjugate => "CONJUGATE",
            Self::Snap => "SNAP",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.id() == id)
    }

    /// Short label shown on a collapsed node.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Add => "A + B",
            Self::Subtract => "A - B",
            Self::Combine => "Combine Rotations",
            Self::RotationDifference => "Rotation Difference",
            Self::Multiply => "A * B",
            Self::Divide => "A / B",
            Self::Cross => "A cross B",
            Self::Normalize => "A normalize",
            Self::Scale => "A * scale",
            Self::Absolute => "abs A",
            Self::Invert => "- A",
            Self::Conjugate => "- xyz (A)",
            Self::Snap => "snap A",
        }
    }

    fn uses_second_quaternion(&self) -> bool {
        matches!(
            self,
            Self::Add
                | Self::Subtract
                | Self::Combine
                | Self::RotationDifference
                | Self::Multiply
                | Self::Divide
                | Self::Cross
        )
    }

    fn uses_scale(&self) -> bool {
        matches!(self, Self::Normalize | Self::Scale)
    }

    fn code(&self) -> RawCode {
        let line = |code: &str| RawCode::Single(code.to_string());
        match self {
            Self::Add => line("result = a + b"),
            Self::Subtract => line("result = a - b"),
            Self::Combine => line("result = a * b"),
            Self::RotationDifference => line("result = a.rotation_difference(b)"),
            Self::Multiply => line("result = mathutils.Quaternion((A * B for A, B in zip(a, b)))"),
            Self::Divide => {
                let mut lines = vec!["result = mathutils.Quaternion((1, 0, 0, 0))".to_string()];
                lines.extend((0..4).map(|i| format!("if b[{i}] != 0: result[{i}] = a[{i}] / b[{i}]")));
                RawCode::Lines(lines)
            }
            Self::Cross => line("result = a.cross(b)"),
            Self::Normalize => line("result = a.normalized() * scale"),
            Self::Scale => line("result = a * scale"),
            Self::Absolute => line("result = mathutils.Quaternion((abs(A) for A in a))"),
            Self::Invert => line("result = a.inverted()"),
            Self::Conjugate => line("result = a.conjugated()"),
            Self::Snap => {
                let mut lines = vec!["result = a.copy()".to_string()];
                lines.extend((0..4).map(|i| {
                    format!(
                        "if stepSize[{i}] != 0: result[{i}] = round(a[{i}] / stepSize[{i}]) * stepSize[{i}]"
                    )
                }));
                RawCode::Lines(lines)
            }
        }
    }
}

/// Quaternion math; the inputs depend on the selected operation.
pub struct QuaternionMath;

impl QuaternionMath {
    pub const OPERATION: &'static str = "operation";

    pub fn operation(node: &Node) -> QuaternionOperation {
        node.property(Self::OPERATION)
            .and_then(SocketValue::as_str)
            .and_then(QuaternionOperation::from_id)
            .unwrap_or(QuaternionOperation::Add)
    }

    /// Rebuild the inputs for the current operation.
    ///
    /// Sockets that survive keep their value; links to them survive as well
    /// because the socket identifiers stay the same.
    fn create_inputs(node: &mut Node) {
        let operation = Self::operation(node);
        let previous = std::mem::take(&mut node.inputs);
        let keep = |node: &mut Node, ty: SocketType, name: &str, identifier: &str, value: SocketValue| {
            let value = previous
                .iter()
                .find(|s| s.identifier == identifier && s.socket_type == ty)
                .map(|s| s.value.clone())
                .unwrap_or(value);
            node.new_input(ty, name, identifier).with_value(value);
        };

        keep(node, SocketType::Quaternion, "A", "a", SocketType::Quaternion.default_value());
        if operation.uses_second_quaternion() {
            keep(node, SocketType::Quaternion, "B", "b", SocketType::Quaternion.default_value());
        }
        if operation.uses_scale() {
            keep(node, SocketType::Float, "Scale", "scale", SocketValue::Float(1.0));
        }
        if operation == QuaternionOperation::Snap {
            keep(
                node,
                SocketType::Quaternion,
                "Step Size",
                "stepSize",
                SocketValue::Quaternion([0.1; 4]),
            );
        }
        debug!(node = %node.identifier, operation = operation.id(), inputs = node.inputs.len(), "rebuilt quaternion math inputs");
    }
}

impl NodeKind for QuaternionMath {
    fn declaration(&self) -> NodeDeclaration {
        NodeDeclaration::new("an_QuaternionMathNode", "Quaternion Math").category("Rotation")
    }

    fn create(&self, node: &mut Node) {
        node.properties.insert(
            Self::OPERATION.to_string(),
            SocketValue::String(QuaternionOperation::Add.id().to_string()),
        );
        Self::create_inputs(node);
        node.new_output(SocketType::Quaternion, "Result", "result");
    }

    fn code(&self, node: &Node, _ctx: &CodeContext) -> CodeContract {
        CodeContract::Raw(Self::operation(node).code())
    }

    fn used_modules(&self, _node: &Node) -> Vec<String> {
        vec!["mathutils".to_string()]
    }

    fn property_changed(&self, node: &mut Node, property: &str) {
        if property == Self::OPERATION {
            Self::create_inputs(node);
        }
    }
}

/// Perlin noise driven euler rotation.
///
/// The `nodeSeed` property separates otherwise identical wiggle nodes. It
/// starts at 0 and is copied along when the node is duplicated.
pub struct EulerWiggle;

impl EulerWiggle {
    pub const NODE_SEED: &'static str = "nodeSeed";
}

impl NodeKind for EulerWiggle {
    fn declaration(&self) -> NodeDeclaration {
        NodeDeclaration::new("an_EulerWiggleNode", "Euler Wiggle")
            .category("Rotation")
            .search_tags(&["Random Rotation", "Noise"])
    }

    fn create(&self, node: &mut Node) {
        node.new_input(SocketType::Float, "Seed", "seed");
        node.new_input(SocketType::Float, "Evolution", "evolution");
        node.new_input(SocketType::Float, "Speed", "speed")
            .with_value(SocketValue::Float(1.0));
        let thirty_degrees = 30f64.to_radians();
        node.new_input(SocketType::Euler, "Amplitude", "amplitude")
            .with_value(SocketValue::Euler([thirty_degrees; 3]));
        node.new_input(SocketType::Integer, "Octaves", "octaves")
            .with_value(SocketValue::Integer(2));
        node.new_input(SocketType::Float, "Persistance", "persistance")
            .with_value(SocketValue::Float(0.3));
        node.new_output(SocketType::Euler, "Euler", "euler");
        node.properties
            .insert(Self::NODE_SEED.to_string(), SocketValue::Integer(0));
    }

    fn code(&self, _node: &Node, _ctx: &CodeContext) -> CodeContract {
        CodeContract::Procedure
    }
}
