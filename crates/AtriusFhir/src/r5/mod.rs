//! # FHIR R5 Shapes
//!
//! Datatype and resource declarations. Each is a plain struct; its codecs and
//! reflection are derived, so these files carry nothing but the fields in
//! FHIR declaration order.

pub mod complex_types;
pub mod resources;

pub use complex_types::*;
pub use resources::*;
