//! Node-to-source translation: turns a [`TileNode`] into the GLSL function
//! the GL backend wraps into a full fragment shader. Pure, no side
//! effects; identical nodes yield identical source.

use crate::{BinaryOp, TileNode, UnaryOp};

/// Emits `vec3 tile_color(vec2 p, float t)` for the given node.
pub fn fragment_source(node: &TileNode) -> String {
    let body = match node {
        TileNode::Rgb(r, g, b) => {
            format!("vec3({}, {}, {})", scalar(r), scalar(g), scalar(b))
        }
        other => format!("vec3({})", scalar(other)),
    };
    format!("vec3 tile_color(vec2 p, float t) {{\n    return {body};\n}}\n")
}

fn scalar(node: &TileNode) -> String {
    match node {
        TileNode::Const(v) => format!("{v:?}"),
        TileNode::X => "p.x".into(),
        TileNode::Y => "p.y".into(),
        TileNode::Time => "t".into(),
        TileNode::Unary(op, a) => {
            let a = scalar(a);
            match op {
                UnaryOp::Sin => format!("sin({a})"),
                UnaryOp::Cos => format!("cos({a})"),
                UnaryOp::Abs => format!("abs({a})"),
                UnaryOp::Neg => format!("(-{a})"),
            }
        }
        TileNode::Binary(op, a, b) => {
            let a = scalar(a);
            let b = scalar(b);
            match op {
                BinaryOp::Add => format!("({a} + {b})"),
                BinaryOp::Sub => format!("({a} - {b})"),
                BinaryOp::Mul => format!("({a} * {b})"),
                BinaryOp::Min => format!("min({a}, {b})"),
                BinaryOp::Max => format!("max({a}, {b})"),
            }
        }
        // A nested color node still has to produce a scalar; take its
        // first channel.
        TileNode::Rgb(r, _, _) => scalar(r),
    }
}
