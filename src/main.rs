use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use winit::event_loop::EventLoop;

use dozerball::app::App;
use dozerball::assets::mesh::load_mesh_data;
use dozerball::config;
use dozerball::utils::logging::init_logging;
use dozerball::world::scene::load_scene;
use dozerball::world::{Simulation, World};

fn main() -> Result<()> {
    init_logging();
    info!("{} {}", dozerball::APP_NAME, dozerball::VERSION);

    let settings = config::load_settings();

    let mesh_data = load_mesh_data(Path::new("meshes.blob"))
        .context("loading mesh library from meshes.blob")?;
    let scene = load_scene(Path::new("scene.blob"))
        .context("loading scene from scene.blob")?;
    let world = World::from_scene(&scene, &mesh_data)
        .context("building simulation objects from the scene")?;

    let simulation = Simulation::new(world, settings);

    let event_loop = EventLoop::new().context("creating the event loop")?;
    let mut app = App::new(simulation, mesh_data);
    event_loop.run_app(&mut app).context("running the event loop")?;
    Ok(())
}
