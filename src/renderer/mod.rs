//! Template rendering.

pub mod filters;
pub mod interface;
pub mod minijinja;

pub use interface::TemplateRenderer;
pub use minijinja::MiniJinjaRenderer;
