use springbox::{config::SandboxConfig, sandbox::Sandbox};

fn main() {
    // Build the default scene without a window
    let mut sandbox = match Sandbox::new(SandboxConfig::new().seed(1)) {
        Ok(sandbox) => sandbox,
        Err(e) => {
            eprintln!("failed to build sandbox: {e}");
            return;
        }
    };

    // Grow the scene a little
    for _ in 0..20 {
        if let Err(e) = sandbox.spawn() {
            eprintln!("spawn failed: {e}");
        }
    }

    // Run 10k simulation steps
    for _ in 0..10000 {
        sandbox.step();
    }

    let snapshot = sandbox.world().snapshot();
    println!(
        "{} shapes, {} springs after 10000 steps",
        snapshot.shapes.len(),
        snapshot.springs.len()
    );
}
