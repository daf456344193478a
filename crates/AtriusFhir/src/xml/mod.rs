//! # FHIR XML Codec
//!
//! Decoding reads a [`roxmltree`] document and matches child elements by
//! local name, so element order in the input is not checked. Encoding goes
//! through [`XmlWriter`] on top of `quick-xml` and always writes fields in
//! declaration order, attributes first.
//!
//! Mapping of the FHIR element model onto XML:
//!
//! * a primitive is `<name id=".." value=".."><extension .../></name>`
//! * the `id` of a datatype and the `url` of an extension are attributes
//! * the `id` of a resource is an ordinary `<id value=".."/>` child
//! * a choice is one `<baseSuffix>` element
//! * a contained resource is wrapped: `<contained><Patient>..</Patient></contained>`

mod de;
mod ser;

use std::io::Write;
use roxmltree::{Document, Node};
use tracing::debug;
use crate::element::IsEmpty;
use crate::error::{FhirError, Result};

pub use de::XmlObject;
pub use ser::XmlWriter;
pub(crate) use de::{check_namespace, element_children};

/// Namespace of every FHIR element.
pub const FHIR_NAMESPACE: &str = "http://hl7.org/fhir";

/// A shape or primitive slot that occupies one XML element.
///
/// The element name is owned by the parent: decoding receives the already
/// located node and encoding is told which name to write.
pub trait FhirXml: IsEmpty + Sized {
    fn from_xml_node(node: Node<'_, '_>) -> Result<Self>;

    fn write_xml<W: Write>(&self, writer: &mut XmlWriter<W>, name: &str) -> Result<()>;
}

impl<T: FhirXml> FhirXml for Box<T> {
    fn from_xml_node(node: Node<'_, '_>) -> Result<Self> {
        T::from_xml_node(node).map(Box::new)
    }

    fn write_xml<W: Write>(&self, writer: &mut XmlWriter<W>, name: &str) -> Result<()> {
        (**self).write_xml(writer, name)
    }
}

/// A declared field of a shape, as seen by the XML codec.
///
/// Encoding happens in two passes over the fields of a shape: one writing
/// attributes onto the still open start tag, one writing child elements.
pub trait XmlField: Sized {
    fn take_xml(obj: &mut XmlObject<'_, '_>, name: &'static str) -> Result<Self>;

    fn write_xml_attribute<W: Write>(&self, _writer: &mut XmlWriter<W>, _name: &str) {}

    fn write_xml_children<W: Write>(&self, _writer: &mut XmlWriter<W>, _name: &str) -> Result<()> {
        Ok(())
    }
}

impl<T: FhirXml> XmlField for Option<T> {
    fn take_xml(obj: &mut XmlObject<'_, '_>, name: &'static str) -> Result<Self> {
        obj.take_child(name)?.map(T::from_xml_node).transpose()
    }

    fn write_xml_children<W: Write>(&self, writer: &mut XmlWriter<W>, name: &str) -> Result<()> {
        match self {
            Some(item) if !item.is_empty() => item.write_xml(writer, name),
            _ => Ok(()),
        }
    }
}

impl<T: FhirXml> XmlField for Vec<T> {
    fn take_xml(obj: &mut XmlObject<'_, '_>, name: &'static str) -> Result<Self> {
        obj.take_children(name)
            .into_iter()
            .map(T::from_xml_node)
            .collect()
    }

    fn write_xml_children<W: Write>(&self, writer: &mut XmlWriter<W>, name: &str) -> Result<()> {
        for item in self.iter().filter(|item| !item.is_empty()) {
            item.write_xml(writer, name)?;
        }
        Ok(())
    }
}

/// Plain string ids are attributes.
impl XmlField for Option<String> {
    fn take_xml(obj: &mut XmlObject<'_, '_>, name: &'static str) -> Result<Self> {
        match obj.take_attribute(name) {
            None => Ok(None),
            Some("") => Err(FhirError::malformed(obj.shape(), name, "string", "\"\"")),
            Some(value) => Ok(Some(value.to_string())),
        }
    }

    fn write_xml_attribute<W: Write>(&self, writer: &mut XmlWriter<W>, name: &str) {
        if let Some(value) = self {
            writer.attribute(name, value);
        }
    }
}

impl XmlField for String {
    fn take_xml(obj: &mut XmlObject<'_, '_>, name: &'static str) -> Result<Self> {
        match <Option<String> as XmlField>::take_xml(obj, name)? {
            Some(value) => Ok(value),
            None => Err(FhirError::missing_field(obj.shape(), name)),
        }
    }

    fn write_xml_attribute<W: Write>(&self, writer: &mut XmlWriter<W>, name: &str) {
        writer.attribute(name, self);
    }
}

/// A choice (`[x]`) field: at most one of its type-suffixed child elements.
pub trait XmlChoice: Sized {
    fn take_xml_choice(obj: &mut XmlObject<'_, '_>) -> Result<Option<Self>>;

    fn write_xml_choice<W: Write>(&self, writer: &mut XmlWriter<W>) -> Result<()>;
}

/// A shape that can stand as a document root, i.e. a resource.
///
/// For a concrete resource the root element's local name must be its own
/// type; for the `Resource` enum the local name selects the shape.
pub trait XmlRoot: FhirXml {
    fn from_xml_root(node: Node<'_, '_>) -> Result<Self>;

    fn write_xml_root<W: Write>(&self, writer: &mut XmlWriter<W>) -> Result<()>;
}

/// Checks that `node` is the root element of a `resource_type` resource.
pub fn expect_root_name(resource_type: &'static str, node: Node<'_, '_>) -> Result<()> {
    check_namespace(resource_type, node)?;
    let found = node.tag_name().name();
    if found == resource_type {
        Ok(())
    } else {
        Err(FhirError::unexpected(
            resource_type,
            "(root)",
            "the shape's own resource type",
            found,
        ))
    }
}

/// Decodes a resource from XML text.
pub fn from_xml_str<T: XmlRoot>(input: &str) -> Result<T> {
    debug!(len = input.len(), "decoding FHIR XML");
    let doc = Document::parse(input)?;
    T::from_xml_root(doc.root_element())
}

/// Encodes a resource as compact XML text with an XML declaration.
pub fn to_xml_string<T: XmlRoot>(value: &T) -> Result<String> {
    into_string(write_document(XmlWriter::new(Vec::new()), value)?)
}

/// Like [`to_xml_string`], indenting nested elements by two spaces.
pub fn to_xml_string_pretty<T: XmlRoot>(value: &T) -> Result<String> {
    into_string(write_document(XmlWriter::new_pretty(Vec::new()), value)?)
}

pub fn to_xml_writer<W: Write, T: XmlRoot>(writer: W, value: &T) -> Result<()> {
    write_document(XmlWriter::new(writer), value)?;
    Ok(())
}

fn write_document<W: Write, T: XmlRoot>(mut writer: XmlWriter<W>, value: &T) -> Result<W> {
    writer.write_declaration()?;
    value.write_xml_root(&mut writer)?;
    Ok(writer.into_inner())
}

fn into_string(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|e| FhirError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
