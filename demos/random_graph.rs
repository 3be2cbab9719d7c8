use petgraph::Directed;
use springbox::{config::SandboxConfig, renderer::Renderer, sandbox::Sandbox, scene::scatter_scene};

fn main() {
    // Build a PetGraph
    let mut rng = rand::thread_rng();
    let graph: petgraph::Graph<(), (), Directed> =
        petgraph_gen::barabasi_albert_graph(&mut rng, 30, 1, None);

    // Scatter it over the sandbox next to the default scene
    let config = SandboxConfig::new();
    let scene = scatter_scene(&graph, &config, &mut rng);
    let mut sandbox = match Sandbox::new(config) {
        Ok(sandbox) => sandbox,
        Err(e) => {
            eprintln!("failed to build sandbox: {e}");
            return;
        }
    };
    let config = sandbox.config().clone();
    if let Err(e) = sandbox.world_mut().load_scene(&scene, &config) {
        eprintln!("failed to load graph: {e}");
        return;
    }

    // Start the renderer
    let renderer = Renderer::new(sandbox);
    renderer.create_window();
}
