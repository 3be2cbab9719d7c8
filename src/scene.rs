//! Scenes are undirected petgraph graphs: every node becomes a body and every
//! edge a spring between the two bodies.

use glam::Vec2;
use petgraph::{graph::NodeIndex, EdgeType, Graph, Undirected};
use rand::Rng;

use crate::{
    config::SandboxConfig,
    error::{Result, SimulationError},
    properties::BodyId,
    shape::ShapeKind,
    world::World,
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub position: Vec2,
    pub kind: ShapeKind,
}

impl SceneNode {
    pub fn circle(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            kind: ShapeKind::Circle,
        }
    }
}

/// Spring parameters of an edge. `None` falls back to the sandbox defaults.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SceneLink {
    pub rest_length: Option<f32>,
    pub stiffness: Option<f32>,
    pub damping: Option<f32>,
}

pub type SceneGraph = Graph<SceneNode, SceneLink, Undirected>;

/// Three circles linked in a triangle.
pub fn default_scene() -> SceneGraph {
    let mut graph = SceneGraph::new_undirected();
    let n1 = graph.add_node(SceneNode::circle(100.0, 100.0));
    let n2 = graph.add_node(SceneNode::circle(200.0, 100.0));
    let n3 = graph.add_node(SceneNode::circle(150.0, 200.0));

    graph.add_edge(n1, n2, SceneLink::default());
    graph.add_edge(n2, n3, SceneLink::default());
    graph.add_edge(n3, n1, SceneLink::default());
    graph
}

/// Turns the topology of any petgraph graph into a scene with circle nodes at
/// random positions inside the sandbox.
pub fn scatter_scene<N, E, Ty, R>(graph: &Graph<N, E, Ty>, config: &SandboxConfig, rng: &mut R) -> SceneGraph
where
    Ty: EdgeType,
    R: Rng,
{
    let margin = config.node_size;
    let mut scene = SceneGraph::with_capacity(graph.node_count(), graph.edge_count());

    for _ in graph.node_indices() {
        let x = rng.gen_range(margin..=(config.width - margin).max(margin));
        let y = rng.gen_range(margin..=(config.height - margin).max(margin));
        scene.add_node(SceneNode::circle(x, y));
    }

    for edge in graph.raw_edges() {
        scene.add_edge(edge.source(), edge.target(), SceneLink::default());
    }
    scene
}

impl World {
    /// Creates the bodies and springs described by `scene`.
    ///
    /// Returns the body created for each node, indexed like the graph nodes.
    ///
    /// Nothing is added when the configured node mass or a node shape is invalid.
    pub fn load_scene(&mut self, scene: &SceneGraph, config: &SandboxConfig) -> Result<Vec<BodyId>> {
        if !config.node_mass.is_finite() || config.node_mass <= 0.0 {
            return Err(SimulationError::InvalidMass);
        }
        for node in scene.node_weights() {
            node.kind.shape(self.node_size()).validate()?;
        }

        let mut bodies = Vec::with_capacity(scene.node_count());
        for node in scene.node_weights() {
            bodies.push(self.create_body(node.position, node.kind, config.node_mass)?);
        }

        let body = |index: NodeIndex| bodies[index.index()];
        for edge in scene.raw_edges() {
            let link = edge.weight;
            self.create_spring(
                body(edge.source()),
                body(edge.target()),
                link.rest_length.unwrap_or(config.spring_rest_length),
                link.stiffness.unwrap_or(config.spring_stiffness),
                link.damping.unwrap_or(config.spring_damping),
            )?;
        }

        ftlog::debug!(
            "loaded scene with {} bodies and {} springs",
            scene.node_count(),
            scene.edge_count()
        );
        Ok(bodies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scene_is_a_triangle() {
        let scene = default_scene();
        assert_eq!(scene.node_count(), 3);
        assert_eq!(scene.edge_count(), 3);
    }
}
