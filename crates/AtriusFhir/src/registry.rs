//! # Resource Registry
//!
//! Maps a discriminator, the `resourceType` of a JSON object or the local name
//! of an XML element, to the decoder of the matching resource shape. The table
//! is closed: it is built once from the variants of [`Resource`] and never
//! changes afterwards, so lookups from any number of threads need no locking.
//!
//! ```rust
//! use atrius_fhir_lib::registry::{resolve, resource_types};
//!
//! assert!(resource_types().contains(&"Patient"));
//! assert_eq!(resolve("Citation").unwrap().resource_type(), "Citation");
//! assert!(resolve("Spaceship").is_err());
//! ```

use std::collections::HashMap;
use std::fmt;
use once_cell::sync::Lazy;
use roxmltree::Node;
use serde_json::Value;
use tracing::debug;
use crate::error::{FhirError, Result};
use crate::json::{describe, FhirJson};
use crate::r5::Resource;
use crate::xml::{check_namespace, element_children, FhirXml};

/// Decoders for one resource shape.
#[derive(Clone, Copy)]
pub struct ResourceDecoder {
    resource_type: &'static str,
    from_json: fn(Value) -> Result<Resource>,
    from_xml: fn(Node<'_, '_>) -> Result<Resource>,
}

fn decode_json_as<T: FhirJson + Into<Resource>>(value: Value) -> Result<Resource> {
    T::from_json_value(value).map(Into::into)
}

fn decode_xml_as<T: FhirXml + Into<Resource>>(node: Node<'_, '_>) -> Result<Resource> {
    T::from_xml_node(node).map(Into::into)
}

impl ResourceDecoder {
    pub(crate) fn new<T>(resource_type: &'static str) -> Self
    where
        T: FhirJson + FhirXml + Into<Resource>,
    {
        Self {
            resource_type,
            from_json: decode_json_as::<T>,
            from_xml: decode_xml_as::<T>,
        }
    }

    pub fn resource_type(&self) -> &'static str {
        self.resource_type
    }

    /// Decodes a JSON object whose `resourceType` is this decoder's.
    pub fn decode_json(&self, value: Value) -> Result<Resource> {
        (self.from_json)(value)
    }

    /// Decodes an XML element whose local name is this decoder's.
    pub fn decode_xml(&self, node: Node<'_, '_>) -> Result<Resource> {
        (self.from_xml)(node)
    }
}

impl fmt::Debug for ResourceDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDecoder")
            .field("resource_type", &self.resource_type)
            .finish()
    }
}

static REGISTRY: Lazy<HashMap<&'static str, ResourceDecoder>> = Lazy::new(|| {
    Resource::registry_entries()
        .into_iter()
        .map(|decoder| (decoder.resource_type, decoder))
        .collect()
});

/// Looks up the decoder for a discriminator.
pub fn resolve(resource_type: &str) -> Result<&'static ResourceDecoder> {
    REGISTRY
        .get(resource_type)
        .ok_or_else(|| FhirError::UnknownResourceType(resource_type.to_string()))
}

/// Every registered discriminator, in declaration order.
pub fn resource_types() -> &'static [&'static str] {
    Resource::RESOURCE_TYPES
}

/// Decodes any registered resource from a JSON object.
pub(crate) fn decode_json(value: Value) -> Result<Resource> {
    let resource_type = match &value {
        Value::Object(map) => match map.get("resourceType") {
            Some(Value::String(resource_type)) => resource_type.clone(),
            Some(other) => {
                return Err(FhirError::unexpected(
                    "Resource",
                    "resourceType",
                    "a string",
                    describe(other),
                ));
            }
            None => return Err(FhirError::missing_field("Resource", "resourceType")),
        },
        other => {
            return Err(FhirError::unexpected(
                "Resource",
                "(root)",
                "an object",
                describe(other),
            ));
        }
    };
    debug!(resource_type = %resource_type, "dispatching JSON resource");
    resolve(&resource_type)?.decode_json(value)
}

/// Decodes any registered resource from the element that is the resource
/// itself (a document root, or the single child of a `contained` wrapper).
pub(crate) fn decode_xml(node: Node<'_, '_>) -> Result<Resource> {
    check_namespace("Resource", node)?;
    let resource_type = node.tag_name().name();
    debug!(resource_type, "dispatching XML resource");
    resolve(resource_type)?.decode_xml(node)
}

/// Decodes the resource wrapped by a `<contained>` (or similar) element.
///
/// The wrapper takes no attributes and exactly one child element.
pub(crate) fn decode_xml_wrapped(wrapper: Node<'_, '_>) -> Result<Resource> {
    check_namespace("Resource", wrapper)?;
    let name = wrapper.tag_name().name();
    if let Some(attr) = wrapper.attributes().next() {
        return Err(FhirError::unknown_field(name, attr.name()));
    }
    let children = element_children(name, wrapper)?;
    match children.as_slice() {
        [resource] => decode_xml(*resource),
        _ => Err(FhirError::unexpected(
            "Resource",
            name,
            "exactly one resource element",
            format!("{} elements", children.len()),
        )),
    }
}
