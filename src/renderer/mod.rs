//! Rendering module
//!
//! Turns simulation state into backend-neutral triangle lists plus text labels. A host
//! uploads the vertices (they are `bytemuck::Pod`) and draws the labels.

pub mod frame;
pub mod shapes;
pub mod vertex;

pub use frame::{Anchor, Frame, HeadlessTarget, Label, RenderTarget, build_frame};
pub use vertex::{Vertex, colors, tint_color};
