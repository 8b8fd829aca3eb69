//! PDF export.
//!
//! Two pipelines read the scene without changing it: [`export_vector`] keeps
//! text as glyphs in embedded fonts, [`export_flattened`] renders a
//! thresholded bitmap for print shops that cannot handle fonts.

pub mod fonts;
pub mod pdf;
pub mod raster;
pub mod vector;

pub use fonts::{
    FontBytes, FontCatalog, FontDbProvider, FontProvider, InMemoryFontProvider, ResolvedFont,
};
pub use pdf::{page_size_pt, PageMapper};
pub use raster::{export_flattened, rasterize};
pub use vector::export_vector;
