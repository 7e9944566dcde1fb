use std::sync::Arc;
use std::time::Instant;

use tracing::{info, trace};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;

use crate::assets::MeshData;
use crate::rendering::RenderEngine;
use crate::world::Simulation;

/// Event-loop glue: owns the simulation and, once the window exists, the
/// render engine. Each redraw runs one simulation step and one frame;
/// vsync presentation paces the loop.
pub struct App {
    simulation: Simulation,
    mesh_data: Option<MeshData>,
    renderer: Option<RenderEngine<'static>>,
    window: Option<Arc<winit::window::Window>>,
    last_frame: Option<Instant>,
}

impl App {
    pub fn new(simulation: Simulation, mesh_data: MeshData) -> Self {
        Self {
            simulation,
            mesh_data: Some(mesh_data),
            renderer: None,
            window: None,
            last_frame: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_none() {
            let attributes = winit::window::Window::default_attributes()
                .with_title(format!("dozerball {}", crate::VERSION))
                .with_inner_size(LogicalSize::new(1000, 700));
            let window = Arc::new(
                event_loop
                    .create_window(attributes)
                    .expect("Failed to create window"),
            );
            self.window = Some(window.clone());
            let mesh_data = self
                .mesh_data
                .take()
                .expect("mesh data already consumed");
            let renderer = pollster::block_on(RenderEngine::new(
                window.clone(),
                mesh_data,
                &self.simulation.world,
            ));
            self.renderer = Some(renderer);
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if self.window.as_ref().map_or(true, |w| w.id() != window_id) {
            return;
        }
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        if renderer.camera_controller.process_events(&event) {
            return;
        }
        if self.simulation.controls.process_event(&event) {
            if self.simulation.controls.quit_requested {
                info!("Quit requested after {} frames", self.simulation.frame());
                event_loop.exit();
            }
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("Window closed after {} frames", self.simulation.frame());
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                renderer.resize(physical_size);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                if let Some(previous) = self.last_frame.replace(now) {
                    // measured but deliberately not used to scale motion
                    trace!("Frame time: {:?}", now.duration_since(previous));
                }

                self.simulation.step();
                renderer.camera_controller.update_camera(&mut renderer.camera);
                renderer.render_frame(&self.simulation.world);

                if let Some(window) = self.window.as_ref() {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
