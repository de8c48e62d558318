//! Rendering boundary
//!
//! Post-process parameters are handed to an external stage registry. The CPU
//! frame and backdrop rasterizer exist for the native driver and for tests.

pub mod backdrop;
pub mod frame;
pub mod post;

pub use backdrop::{Viewport, draw_sector};
pub use frame::{Frame, Rgb};
pub use post::{
    Bloom, CHAIN, PostParams, PostStage, SoftwareCompositor, StageKind, StageRegistry, Vignette,
};
