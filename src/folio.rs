//! Main module for folio library functionality

pub mod error;
pub mod format;
pub mod formats;
pub mod html;
pub mod model;
pub mod normalize;
pub mod registry;
pub mod view;
pub mod wire;
