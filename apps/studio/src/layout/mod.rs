// Section resolution and page geometry.
// Everything here is pure and synchronous; the renderer and the motion overlay
// consume its output, nothing in it touches the aggregate mutably.

pub mod density;
pub mod font_metrics;
pub mod pagination;
pub mod resolver;

pub use pagination::{estimate, LayoutSnapshot, Rect};
pub use resolver::{resolve, Column};
