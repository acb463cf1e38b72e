pub mod renderer;
pub mod text;

pub use renderer::{RenderStatus, Renderer};
pub use text::render_text;
