//! Link-preview document synthesis.
//!
//! Query parameters are decoded and resolved into an [`EmbedView`]
//! (`params`), which the renderer turns into a standalone HTML page carrying
//! Open Graph and Twitter Card tags (`render`). Free text is escaped once,
//! during resolution.

pub mod decode;
pub mod escape;
pub mod params;
pub mod render;

pub use params::{resolve, EmbedQuery, EmbedView, ParamPolicy};
pub use render::render_embed;
