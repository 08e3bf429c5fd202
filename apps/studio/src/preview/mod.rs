pub mod blocks;
pub mod renderer;
pub mod resolve;
pub mod text;

pub use blocks::{Element, RenderedBlock, RenderedDocument};
pub use renderer::render_preview;
pub use resolve::resolve_visible_sections;
