//! # FHIR Model Support Types
//!
//! Foundational types shared by the FHIR model crate and its derive macros:
//! the value type a query engine reads nodes as, the reflection trait every
//! node implements, static type descriptors and the FHIRPath conversion rules.
//!
//! ## Core Types
//!
//! - [`EvaluationResult`] - value produced when a node is read
//! - [`EvaluationError`] - failures of reads and coercions
//! - [`FhirNode`] - object-safe reflection over any node of the model
//! - [`TypeDescriptor`] - static element list of a shape
//!
//! ## Usage Example
//!
//! ```rust
//! use atrius_fhirpath_support::{EvaluationResult, FhirNode, IntoEvaluationResult};
//!
//! let text = "Hello, FHIR!".to_string();
//! assert_eq!(
//!     text.to_evaluation_result(),
//!     EvaluationResult::String("Hello, FHIR!".to_string(), None)
//! );
//!
//! // a plain string is also a node and can be coerced
//! let flag = "true".to_string();
//! assert_eq!(flag.to_boolean().unwrap(), EvaluationResult::boolean(true));
//! ```

pub mod type_info;
pub mod evaluation_result;
pub mod evaluation_error;
pub mod traits;
pub mod conversion;
pub mod node;

pub use conversion::{convert, SystemType};
pub use evaluation_error::EvaluationError;
pub use evaluation_result::EvaluationResult;
pub use node::{
    compare_children, normalize_for_equivalence, primitive_equivalent, structural_equal,
    structural_equivalent, to_evaluation_result, wants, Child, FhirNode, ReflectField,
};
pub use traits::{ChoiceElement, FhirResourceMetadata, IntoEvaluationResult};
pub use type_info::{ElementDescriptor, FieldCardinality, TypeDescriptor, TypeInfo, TypeInfoResult};
