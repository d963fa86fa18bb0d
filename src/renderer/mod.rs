//! WebGPU rendering module
//!
//! Scene nodes are tessellated on the CPU into colored triangles in scene
//! coordinates; `RenderState` maps them to NDC and draws them.

pub mod pipeline;
pub mod shapes;
pub mod vertex;
pub mod viewport;

pub use pipeline::{RenderError, RenderState};
pub use vertex::Vertex;
pub use viewport::Viewport;

use crate::sim::{
    BALL_NAME, BLOCK_NAME, BORDER_NAME, FLOOR_NAME, GameScene, Node, PADDLE_NAME, Rect, Shape,
};
use vertex::colors;

/// Segments used for the ball
const CIRCLE_SEGMENTS: u32 = 32;
/// Border line thickness in scene points
const BORDER_THICKNESS: f32 = 4.0;

fn node_color(node: &Node) -> [f32; 4] {
    match node.name.as_str() {
        PADDLE_NAME => colors::PADDLE,
        BALL_NAME => colors::BALL,
        BLOCK_NAME => colors::BLOCK,
        FLOOR_NAME => colors::FLOOR,
        BORDER_NAME => colors::ARENA_BORDER,
        _ => [1.0; 4],
    }
}

fn node_vertices(node: &Node) -> Vec<Vertex> {
    let Some(body) = node.body.as_ref() else {
        return Vec::new();
    };
    let color = node_color(node);
    match body.shape {
        Shape::Rect { size } => shapes::rect(&Rect::centered(node.position, size), color),
        Shape::Circle { radius } => shapes::circle(node.position, radius, color, CIRCLE_SEGMENTS),
        Shape::EdgeLoop { rect } => shapes::rect_outline(&rect, BORDER_THICKNESS, color),
    }
}

/// Build the frame's vertex list in scene coordinates, lowest z first
pub fn scene_vertices(scene: &GameScene) -> Vec<Vertex> {
    let mut nodes: Vec<&Node> = scene.world().nodes().map(|(_, node)| node).collect();
    // Stable sort keeps creation order among equal z
    nodes.sort_by(|a, b| a.z_position.total_cmp(&b.z_position));

    let mut vertices: Vec<Vertex> = nodes.into_iter().flat_map(node_vertices).collect();
    vertices.extend(shapes::particles(scene.particles(), colors::PARTICLE));
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_scene_vertices_draw_paddle_last() {
        let scene = GameScene::new(Settings::default()).unwrap();
        let vertices = scene_vertices(&scene);
        assert!(!vertices.is_empty());
        // Paddle has the highest z, so its quad closes the list
        assert_eq!(vertices.last().unwrap().color, colors::PADDLE);
    }

    #[test]
    fn test_broken_block_is_not_drawn() {
        let mut scene = GameScene::new(Settings {
            particles: false,
            ..Default::default()
        })
        .unwrap();
        let before = scene_vertices(&scene).len();
        let (block, _) = scene.blocks().next().unwrap();
        scene.break_block(block).unwrap();
        assert_eq!(scene_vertices(&scene).len(), before - 6);
    }
}
