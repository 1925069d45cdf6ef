//! General helper utilities

pub mod delaunay_validation;

pub use delaunay_validation::*;
