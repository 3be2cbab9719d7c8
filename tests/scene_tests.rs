use glam::Vec2;
use petgraph::Directed;
use rand::{rngs::StdRng, SeedableRng};
use springbox::{
    config::SandboxConfig,
    scene::{default_scene, scatter_scene, SceneGraph, SceneLink, SceneNode},
    shape::ShapeKind,
    SimulationError, World,
};

#[test]
fn default_scene_loads_three_linked_nodes() {
    let config = SandboxConfig::new();
    let mut world = World::new();
    let bodies = world.load_scene(&default_scene(), &config).unwrap();

    assert_eq!(bodies.len(), 3);
    assert_eq!(world.spring_count(), 3);
    assert_eq!(world.body(bodies[0]).unwrap().position, Vec2::new(100.0, 100.0));
    assert_eq!(world.body(bodies[2]).unwrap().position, Vec2::new(150.0, 200.0));
    for spring in world.springs() {
        assert_eq!(spring.rest_length, config.spring_rest_length);
        assert_eq!(spring.stiffness, config.spring_stiffness);
        assert_eq!(spring.damping, config.spring_damping);
    }
}

#[test]
fn link_overrides_replace_defaults() {
    let config = SandboxConfig::new();
    let mut scene = SceneGraph::new_undirected();
    let a = scene.add_node(SceneNode::circle(100.0, 100.0));
    let b = scene.add_node(SceneNode {
        position: Vec2::new(300.0, 100.0),
        kind: ShapeKind::Triangle,
    });
    scene.add_edge(
        a,
        b,
        SceneLink {
            rest_length: Some(40.0),
            stiffness: None,
            damping: Some(3.0),
        },
    );

    let mut world = World::new();
    world.load_scene(&scene, &config).unwrap();

    let spring = world.springs().next().unwrap();
    assert_eq!(spring.rest_length, 40.0);
    assert_eq!(spring.stiffness, config.spring_stiffness);
    assert_eq!(spring.damping, 3.0);
}

#[test]
fn scattered_graph_keeps_its_topology() {
    let config = SandboxConfig::new();
    let mut rng = StdRng::seed_from_u64(3);
    let graph: petgraph::Graph<(), (), Directed> =
        petgraph_gen::barabasi_albert_graph(&mut rng, 50, 1, None);

    let scene = scatter_scene(&graph, &config, &mut rng);
    assert_eq!(scene.node_count(), graph.node_count());
    assert_eq!(scene.edge_count(), graph.edge_count());

    let margin = config.node_size;
    for node in scene.node_weights() {
        assert!((margin..=config.width - margin).contains(&node.position.x));
        assert!((margin..=config.height - margin).contains(&node.position.y));
    }

    let mut world = World::new();
    let bodies = world.load_scene(&scene, &config).unwrap();
    assert_eq!(bodies.len(), graph.node_count());
    assert_eq!(world.dynamic_body_count(), graph.node_count());
    assert_eq!(world.spring_count(), graph.edge_count());
}

#[test]
fn invalid_node_mass_leaves_the_world_untouched() {
    let mut config = SandboxConfig::new();
    config.node_mass = -1.0;
    let mut world = World::new();

    assert_eq!(
        world.load_scene(&default_scene(), &config),
        Err(SimulationError::InvalidMass)
    );
    assert_eq!(world.body_count(), 1);
    assert_eq!(world.spring_count(), 0);
}
