pub mod camera_controller;
pub mod camera_utils;
pub mod orbit_camera;

// Re-export main types
pub use camera_controller::{CameraController, FrameInput};
pub use camera_utils::{CameraManager, ViewState, Viewport};
pub use orbit_camera::OrbitCamera;
