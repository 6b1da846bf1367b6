use serde::{Deserialize, Serialize};
use std::fmt;

/// Data type carried by a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocketType {
    Float,
    Integer,
    Boolean,
    String,
    Vector,
    Euler,
    Quaternion,
    Color,
    Object,
    ObjectList,
    ObjectGroup,
    Mesh,
    /// Accepts any value (reroutes, group parameters)
    Generic,
    /// Placeholder socket that only exists to be linked against
    Empty,
}

/// A value stored on an unlinked socket or a node property.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum SocketValue {
    #[default]
    None,
    Float(f64),
    Integer(i64),
    Boolean(bool),
    String(String),
    Vector([f64; 3]),
    Euler([f64; 3]),
    Quaternion([f64; 4]),
    Color([f64; 4]),
    List(Vec<SocketValue>),
}

impl SocketType {
    pub const ALL: [SocketType; 14] = [
        SocketType::Float,
        SocketType::Integer,
        SocketType::Boolean,
        SocketType::String,
        SocketType::Vector,
        SocketType::Euler,
        SocketType::Quaternion,
        SocketType::Color,
        SocketType::Object,
        SocketType::ObjectList,
        SocketType::ObjectGroup,
        SocketType::Mesh,
        SocketType::Generic,
        SocketType::Empty,
    ];

    /// Registration name of the socket type in the host.
    pub fn id_name(&self) -> &'static str {
        match self {
            Self::Float => "an_FloatSocket",
            Self::Integer => "an_IntegerSocket",
            Self::Boolean => "an_BooleanSocket",
            Self::String => "an_StringSocket",
            Self::Vector => "an_VectorSocket",
            Self::Euler => "an_EulerSocket",
            Self::Quaternion => "an_QuaternionSocket",
            Self::Color => "an_ColorSocket",
            Self::Object => "an_ObjectSocket",
            Self::ObjectList => "an_ObjectListSocket",
            Self::ObjectGroup => "an_ObjectGroupSocket",
            Self::Mesh => "an_MeshSocket",
            Self::Generic => "an_GenericSocket",
            Self::Empty => "an_EmptySocket",
        }
    }

    pub fn from_id_name(id_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.id_name() == id_name)
    }

    /// Value a freshly created socket of this type holds.
    pub fn default_value(&self) -> SocketValue {
        match self {
            Self::Float => SocketValue::Float(0.0),
            Self::Integer => SocketValue::Integer(0),
            Self::Boolean => SocketValue::Boolean(false),
            Self::String => SocketValue::String(String::new()),
            Self::Vector => SocketValue::Vector([0.0; 3]),
            Self::Euler => SocketValue::Euler([0.0; 3]),
            Self::Quaternion => SocketValue::Quaternion([1.0, 0.0, 0.0, 0.0]),
            Self::Color => SocketValue::Color([0.0, 0.0, 0.0, 1.0]),
            Self::ObjectList => SocketValue::List(Vec::new()),
            Self::Object | Self::ObjectGroup | Self::Mesh | Self::Generic | Self::Empty => {
                SocketValue::None
            }
        }
    }

    /// Host module a default value of this type needs.
    pub fn required_module(&self) -> Option<&'static str> {
        match self {
            Self::Vector | Self::Euler | Self::Quaternion => Some("mathutils"),
            Self::Mesh => Some("bmesh"),
            _ => None,
        }
    }

    /// Whether an output of this type may feed an input of `target`.
    pub fn is_compatible_with(&self, target: &SocketType) -> bool {
        match (self, target) {
            (Self::Generic, _) | (_, Self::Generic) => true,
            (Self::Empty, _) | (_, Self::Empty) => true,
            (a, b) if a == b => true,
            // Widening only, no narrowing
            (Self::Integer, Self::Float) => true,
            (Self::Boolean, Self::Integer) | (Self::Boolean, Self::Float) => true,
            _ => false,
        }
    }
}

impl fmt::Display for SocketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id_name())
    }
}

impl SocketValue {
    /// Render the value as a literal of the host script.
    ///
    /// Math types go through the host math module so the generated code gets a
    /// real vector/euler/quaternion object instead of a tuple.
    pub fn to_literal(&self) -> String {
        match self {
            Self::None => "None".to_string(),
            Self::Float(v) => float_literal(*v),
            Self::Integer(v) => v.to_string(),
            Self::Boolean(true) => "True".to_string(),
            Self::Boolean(false) => "False".to_string(),
            Self::String(s) => string_literal(s),
            Self::Vector(v) => format!("mathutils.Vector(({}))", join_floats(v)),
            Self::Euler(v) => format!("mathutils.Euler(({}))", join_floats(v)),
            Self::Quaternion(v) => format!("mathutils.Quaternion(({}))", join_floats(v)),
            Self::Color(v) => format!("({})", join_floats(v)),
            Self::List(items) => {
                let items: Vec<String> = items.iter().map(|item| item.to_literal()).collect();
                format!("[{}]", items.join(", "))
            }
        }
    }

    /// Module the literal of this value refers to.
    pub fn required_module(&self) -> Option<&'static str> {
        match self {
            Self::Vector(_) | Self::Euler(_) | Self::Quaternion(_) => Some("mathutils"),
            Self::List(items) => items.iter().find_map(|item| item.required_module()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

fn float_literal(value: f64) -> String {
    if value.is_nan() {
        "float('nan')".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "float('inf')" } else { "float('-inf')" }.to_string()
    } else {
        // Debug formatting keeps the decimal point ("1.0") and round-trips exactly
        format!("{:?}", value)
    }
}

fn join_floats(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| float_literal(*v))
        .collect::<Vec<_>>()
        .join(", ")
}

fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
