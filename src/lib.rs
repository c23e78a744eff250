pub mod cli;
pub mod context;
pub mod error;
pub mod geometry;
pub mod resize;
pub mod transform;

pub use cli::Cli;
pub use context::{ContextFactory, GraphicsContext, RasterBackend, RasterContext};
pub use error::{ResizeError, Result};
pub use geometry::{resolve, resolve_on_pixels, ContentMode, Placement, Rect, Size};
pub use resize::{Resizer, SimpleResize};
pub use transform::Filter;
