//! # FHIR Model
//!
//! In-memory FHIR R5 shapes with strict JSON and XML codecs and a structural
//! reflection layer for query engines.
//!
//! ## Core Pieces
//!
//! - [`Element`] - a primitive slot: value, element id and extensions
//! - [`Extension`] - URL-keyed, recursively nestable metadata
//! - [`r5::Resource`] - the closed set of resources, dispatched through the
//!   [`registry`]
//! - [`json`] and [`xml`] - the two wire formats
//! - [`FhirError`] - every way a decode can fail
//!
//! Reflection ([`atrius_fhirpath_support::FhirNode`]) is implemented by every
//! shape, slot and choice.
//!
//! ## Usage Example
//!
//! ```rust
//! use atrius_fhir_lib::json::{from_json_str, to_json_string};
//! use atrius_fhir_lib::r5::{Citation, CitationVersionAlgorithm, Coding};
//!
//! let mut citation = Citation::default();
//! citation.version_algorithm = Some(CitationVersionAlgorithm::Coding(Coding::new(
//!     "http://hl7.org/fhir/version-algorithm",
//!     "semver",
//! )));
//! let json = to_json_string(&citation).unwrap();
//! assert!(json.contains("versionAlgorithmCoding"));
//! assert!(!json.contains("versionAlgorithmString"));
//!
//! let back: Citation = from_json_str(&json).unwrap();
//! assert_eq!(back, citation);
//! ```

pub mod error;
pub mod json;
pub mod xml;
pub mod element;
pub mod primitives;
pub mod extension;
pub mod registry;
pub mod precise_decimal;
pub mod date_time;
pub mod r5;

pub use date_time::{
    DatePrecision, DateTimePrecision, PrecisionDate, PrecisionDateTime, PrecisionInstant,
    PrecisionTime, TimePrecision,
};
pub use element::{Element, IsEmpty};
pub use error::{FhirError, Result};
pub use extension::{extensions_by_url, find_extension, Extension, ExtensionValue};
pub use precise_decimal::PreciseDecimal;
pub use primitives::*;
pub use r5::Resource;

pub use atrius_fhirpath_support::{Child, FhirNode, TypeDescriptor};
