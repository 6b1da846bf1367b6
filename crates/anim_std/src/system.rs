//! # System Nodes

use anim_engine::{
    CodeContext, CodeContract, GraphError, Node, NodeDeclaration, NodeKind, NodeTree, RawCode,
    Socket, SocketType, SocketValue,
};
use tracing::debug;

/// Identifier of the trailing socket that turns links into new parameters.
pub const NEW_PARAMETER: &str = "newParameter";

/// Entry point of a subprogram. Its outputs are the subprogram parameters.
///
/// The last output is always an [`Empty`](SocketType::Empty) socket; linking
/// it to an input and calling [`GroupInput::absorb_new_parameter_links`]
/// creates a parameter of the input's type.
pub struct GroupInput;

impl GroupInput {
    /// Insert a parameter output in front of the new-parameter socket.
    ///
    /// Returns the identifier of the created socket.
    pub fn new_parameter(node: &mut Node, socket_type: SocketType, name: &str, value: SocketValue) -> String {
        let socket = node.new_output(socket_type, name, "parameter");
        socket.with_value(value);
        let identifier = socket.identifier.clone();
        Self::keep_new_parameter_last(node);
        identifier
    }

    /// Parameter outputs, without the new-parameter socket.
    pub fn parameters(node: &Node) -> impl Iterator<Item = &Socket> {
        node.outputs.iter().filter(|s| s.identifier != NEW_PARAMETER)
    }

    fn keep_new_parameter_last(node: &mut Node) {
        if let Some(index) = node.outputs.iter().position(|s| s.identifier == NEW_PARAMETER) {
            let socket = node.outputs.remove(index);
            node.outputs.push(socket);
        }
    }

    /// Turn every link leaving the new-parameter socket into a parameter.
    ///
    /// Each typed target gets its own parameter, linked in place of the
    /// original link. Links into empty sockets are dropped. Returns the number
    /// of parameters created.
    pub fn absorb_new_parameter_links(tree: &mut NodeTree, node: &str) -> Result<usize, GraphError> {
        if tree.node(node).is_none() {
            return Err(GraphError::NodeNotFound(node.to_string()));
        }
        let targets: Vec<(String, String)> = tree
            .links
            .iter()
            .filter(|link| link.from_node == node && link.from_socket == NEW_PARAMETER)
            .map(|link| (link.to_node.clone(), link.to_socket.clone()))
            .collect();

        let mut created = 0;
        for (to_node, to_socket) in targets {
            let target = tree
                .node(&to_node)
                .and_then(|n| n.input(&to_socket))
                .filter(|s| s.socket_type != SocketType::Empty)
                .map(|s| (s.socket_type, s.name.clone(), s.value.clone()));
            let Some((socket_type, name, value)) = target else {
                tree.unlink(&to_node, &to_socket);
                continue;
            };
            let group_input = tree
                .node_mut(node)
                .ok_or_else(|| GraphError::NodeNotFound(node.to_string()))?;
            let parameter = Self::new_parameter(group_input, socket_type, &name, value);
            tree.link(node, &parameter, &to_node, &to_socket)?;
            created += 1;
        }
        debug!(tree = %tree.name, node, created, "absorbed new parameter links");
        Ok(created)
    }
}

impl NodeKind for GroupInput {
    fn declaration(&self) -> NodeDeclaration {
        NodeDeclaration::new("an_GroupInput", "Group Input")
            .category("System")
            .search_tags(&["Subprogram"])
    }

    fn create(&self, node: &mut Node) {
        node.properties
            .insert("subprogramName".to_string(), SocketValue::String("Group".into()));
        node.new_output(SocketType::Empty, "New Parameter", NEW_PARAMETER);
    }

    /// Each linked parameter reads the value passed by the subprogram caller,
    /// falling back to the socket's own value.
    fn code(&self, node: &Node, ctx: &CodeContext) -> CodeContract {
        let lines: Vec<String> = Self::parameters(node)
            .filter(|socket| ctx.is_output_linked(&socket.identifier))
            .map(|socket| {
                let (default, _) = socket.value_literal();
                format!(
                    "{id} = self.parameters.get(\"{id}\", {default})",
                    id = socket.identifier
                )
            })
            .collect();
        CodeContract::Raw(RawCode::Lines(lines))
    }

    fn used_modules(&self, node: &Node) -> Vec<String> {
        Self::parameters(node)
            .filter_map(|socket| socket.value_literal().1)
            .map(str::to_string)
            .collect()
    }

    fn socket_changed(&self, node: &mut Node) {
        Self::keep_new_parameter_last(node);
    }
}
