//! Core rendering functionality
//!
//! Handles surface setup, pipeline creation, the per-frame binding context
//! and the embedded shaders.

pub mod binding;
pub mod frame_pass;
pub mod pipeline_manager;
pub mod render_engine;
pub mod shaders;

// Re-export main types
pub use binding::{BindingContext, BindingState, CLEAR_COLOR};
pub use frame_pass::FramePass;
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
pub use shaders::{ProgramKind, ShaderSpec};
