//! Output backends for a widget's retained view.
//!
//! [`svg`] serialises the view into a standalone SVG document; [`raster`] turns any SVG
//! into RGBA8 pixels (and PNG files) through `usvg`/`resvg`.

pub mod raster;
pub mod svg;
