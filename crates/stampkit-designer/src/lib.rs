//! # StampKit Designer
//!
//! Layout engine for rubber-stamp faces: a scene of text and frame elements
//! on a fixed-size work area, kept inside printable zones and exported to
//! print-ready PDF.
//!
//! ## Core Components
//!
//! - **Scene**: ordered user elements, system guides, selection and viewport
//! - **Constraints**: boundary clamping, scale limits, rotation and grid snapping
//! - **Alignment**: edge/centre alignment, fit operations and line splitting
//! - **History**: bounded snapshot undo/redo
//! - **Export**: vector PDF with embedded fonts, or a flattened 1-bit bitmap PDF
//! - **Session**: the editing surface that records history for every change
//!
//! ## Coordinates
//!
//! ```text
//! canvas px (96 dpi)     work area origin at (64, 64), y down
//!   └── PageMapper  ──►  PDF points, origin bottom-left, y up
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stampkit_designer::{StampSession, StampSize};
//! use stampkit_designer::scene::TextOptions;
//!
//! let mut session = StampSession::new(StampSize::default(), Default::default());
//! let id = session.add_text(TextOptions::default());
//! session.center_both(id);
//! let pdf = session.export_vector(&provider).await?;
//! ```

pub mod alignment;
pub mod constraints;
pub mod document;
pub mod export;
pub mod font_manager;
pub mod geometry;
pub mod history;
pub mod model;
pub mod registry;
pub mod scene;
pub mod serialization;
pub mod session;
pub mod text_metrics;
pub mod validation;
pub mod viewport;

pub use alignment::{Edge, HAlign, VAlign};
pub use document::StampSize;
pub use export::{FontDbProvider, FontProvider, InMemoryFontProvider};
pub use geometry::{Point, Rect};
pub use history::HistoryManager;
pub use model::{
    Element, ElementId, ElementKind, GuideKind, StampFrame, StampShape, StampText, TextAlign,
};
pub use registry::RegistryRecord;
pub use scene::{FrameOptions, Scene, TextOptions};
pub use serialization::{DesignFile, SceneDescription};
pub use session::StampSession;
pub use text_metrics::{ApproximateMeasurer, FontMeasurer, TextMeasurer};
pub use validation::FontSizeWarning;
pub use viewport::Viewport;
