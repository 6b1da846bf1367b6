//! # Geometry Nodes

use anim_engine::{
    CodeContext, CodeContract, Node, NodeDeclaration, NodeKind, RawCode, SocketType, SocketValue,
};

/// Projects a point onto a plane and measures its signed distance to it.
///
/// Only the outputs that are linked are computed; with no linked output the
/// node contributes no code.
pub struct ProjectPointOnPlane;

impl NodeKind for ProjectPointOnPlane {
    fn declaration(&self) -> NodeDeclaration {
        NodeDeclaration::new("an_ProjectPointOnPlaneNode", "Project Point on Plane")
            .category("Geometry")
            .search_tags(&["Distance Point to Plane", "Closest Point on Plane"])
    }

    fn create(&self, node: &mut Node) {
        node.new_input(SocketType::Vector, "Point", "point");
        node.new_input(SocketType::Vector, "Plane Point", "planePoint")
            .with_value(SocketValue::Vector([0.0, 0.0, 0.0]));
        node.new_input(SocketType::Vector, "Plane Normal", "planeNormal")
            .with_value(SocketValue::Vector([0.0, 0.0, 1.0]));
        node.new_output(SocketType::Vector, "Projection", "projection");
        node.new_output(SocketType::Float, "Signed Distance", "distance");
    }

    fn code(&self, _node: &Node, ctx: &CodeContext) -> CodeContract {
        if !ctx.any_output_linked() {
            return CodeContract::Raw(RawCode::Empty);
        }

        let mut lines = vec![
            "plane_co = planePoint".to_string(),
            "plane_no = planeNormal if planeNormal.length_squared != 0 else mathutils.Vector((0, 0, 1))"
                .to_string(),
        ];
        if ctx.is_output_linked("projection") {
            lines.push(
                "intersection = mathutils.geometry.intersect_line_plane(point, point + plane_no, plane_co, plane_no, False)"
                    .to_string(),
            );
            lines.push(
                "projection = mathutils.Vector((0, 0, 0)) if intersection is None else intersection".to_string(),
            );
        }
        if ctx.is_output_linked("distance") {
            lines.push("distance = mathutils.geometry.distance_point_to_plane(point, plane_co, plane_no)".to_string());
        }
        CodeContract::Raw(RawCode::Lines(lines))
    }

    fn used_modules(&self, _node: &Node) -> Vec<String> {
        vec!["mathutils".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anim_engine::compiler::generation::tagged_lines;
    use anim_engine::NodeTree;

    fn node() -> Node {
        let mut node = Node::new("an_ProjectPointOnPlaneNode");
        ProjectPointOnPlane.create(&mut node);
        node
    }

    #[test]
    fn test_no_code_without_linked_outputs() {
        let node = node();
        let tree = NodeTree::new("Geometry");
        let ctx = CodeContext::for_node(&tree, &node);
        assert!(tagged_lines(&node, &ProjectPointOnPlane.code(&node, &ctx)).is_empty());
    }

    #[test]
    fn test_all_outputs_linked() {
        let node = node();
        let lines = tagged_lines(&node, &ProjectPointOnPlane.code(&node, &CodeContext::all_linked(&node)));
        assert_eq!(
            lines,
            vec![
                "plane_co = %planePoint%",
                "plane_no = %planeNormal% if %planeNormal%.length_squared != 0 else mathutils.Vector((0, 0, 1))",
                "intersection = mathutils.geometry.intersect_line_plane(%point%, %point% + plane_no, plane_co, plane_no, False)",
                "$projection$ = mathutils.Vector((0, 0, 0)) if intersection is None else intersection",
                "$distance$ = mathutils.geometry.distance_point_to_plane(%point%, plane_co, plane_no)",
            ]
        );
    }
}
