pub mod collision;
pub mod controls;
pub mod integrator;
pub mod scene;
pub mod simulation;
pub mod transform;

// Re-export main types for convenience
pub use controls::{ControlState, DozerControls};
pub use scene::{Category, SceneData, SimObject, World};
pub use simulation::Simulation;
pub use transform::Transform;
