//! Claim-based reader over one parsed XML element.

use roxmltree::{Attribute, Node};
use crate::error::{FhirError, Result};
use crate::xml::FHIR_NAMESPACE;

/// The attributes and child elements of one XML element that a shape is being
/// decoded from.
///
/// Like its JSON counterpart, fields are claimed by name and anything still
/// unclaimed when [`XmlObject::finish`] runs is an unknown field. Child order
/// is not checked.
pub struct XmlObject<'a, 'input: 'a> {
    shape: &'static str,
    node: Node<'a, 'input>,
    attributes: Vec<(Attribute<'a, 'input>, bool)>,
    children: Vec<(Node<'a, 'input>, bool)>,
}

/// Fails unless `node` is an element in the FHIR namespace.
pub(crate) fn check_namespace(shape: &str, node: Node<'_, '_>) -> Result<()> {
    match node.tag_name().namespace() {
        Some(FHIR_NAMESPACE) => Ok(()),
        Some(other) => Err(FhirError::unexpected(
            shape,
            node.tag_name().name(),
            "an element in the FHIR namespace",
            other,
        )),
        None => Err(FhirError::unexpected(
            shape,
            node.tag_name().name(),
            "an element in the FHIR namespace",
            "no namespace",
        )),
    }
}

/// Element children of `node`, rejecting any non-whitespace text.
pub(crate) fn element_children<'a, 'input>(
    shape: &str,
    node: Node<'a, 'input>,
) -> Result<Vec<Node<'a, 'input>>> {
    let mut elements = Vec::new();
    for child in node.children() {
        if child.is_element() {
            elements.push(child);
        } else if child.is_text() {
            let text = child.text().unwrap_or_default();
            if !text.trim().is_empty() {
                return Err(FhirError::unexpected(
                    shape,
                    node.tag_name().name(),
                    "an element",
                    format!("text \"{}\"", text.trim()),
                ));
            }
        }
    }
    Ok(elements)
}

impl<'a, 'input: 'a> XmlObject<'a, 'input> {
    pub fn new(shape: &'static str, node: Node<'a, 'input>) -> Result<Self> {
        check_namespace(shape, node)?;
        let children = element_children(shape, node)?
            .into_iter()
            .map(|child| (child, false))
            .collect();
        Ok(Self {
            shape,
            node,
            attributes: node.attributes().map(|attr| (attr, false)).collect(),
            children,
        })
    }

    pub fn shape(&self) -> &'static str {
        self.shape
    }

    /// Local name of the element being read.
    pub fn name(&self) -> &'a str {
        self.node.tag_name().name()
    }

    /// Claims the un-namespaced attribute `name`.
    pub fn take_attribute(&mut self, name: &str) -> Option<&'a str> {
        self.attributes
            .iter_mut()
            .find(|(attr, used)| !*used && attr.namespace().is_none() && attr.name() == name)
            .map(|(attr, used)| {
                *used = true;
                attr.value()
            })
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.children
            .iter()
            .any(|(child, used)| !*used && child.tag_name().name() == name)
    }

    /// Claims every child element named `name`, in document order.
    pub fn take_children(&mut self, name: &str) -> Vec<Node<'a, 'input>> {
        self.children
            .iter_mut()
            .filter(|(child, used)| !*used && child.tag_name().name() == name)
            .map(|(child, used)| {
                *used = true;
                *child
            })
            .collect()
    }

    /// Claims the single child element named `name`; a repeat is an error.
    pub fn take_child(&mut self, name: &str) -> Result<Option<Node<'a, 'input>>> {
        let mut found = self.take_children(name);
        match found.len() {
            0 => Ok(None),
            1 => Ok(found.pop()),
            n => Err(FhirError::unexpected(
                self.shape,
                name,
                "a single element",
                format!("{} elements", n),
            )),
        }
    }

    /// Fails with `UnknownField` on the first unclaimed attribute or child.
    pub fn finish(self) -> Result<()> {
        if let Some((attr, _)) = self.attributes.iter().find(|(_, used)| !*used) {
            return Err(FhirError::unknown_field(self.shape, attr.name()));
        }
        if let Some((child, _)) = self.children.iter().find(|(_, used)| !*used) {
            return Err(FhirError::unknown_field(self.shape, child.tag_name().name()));
        }
        Ok(())
    }
}
