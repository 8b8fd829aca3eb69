//! # StampKit Core
//!
//! Core types and utilities for StampKit.
//! Provides the error type shared by every crate and the unit converter
//! that maps physical millimetres to canvas pixels and PDF points.

pub mod error;
pub mod units;

pub use error::{Error, Result};
pub use units::{
    Axis, CanvasDimensions, UnitConverter, CANVAS_PADDING_PX, MM_TO_PT, PT_TO_MM, PX_PER_MM,
    RULER_SIZE_PX, WORK_AREA_LEFT, WORK_AREA_TOP,
};
