//=============================================================================
// FhirSerde Implementation Generator Functions: decoding
//=============================================================================

use proc_macro2::TokenStream;
use quote::quote;

use crate::field_helpers::{EnumVariant, ShapeField};

/// Generates the body of `FhirJson::from_json_value` for a shape struct.
///
/// The generated code claims each declared field from a
/// `crate::json::JsonObject` in declaration order and then calls
/// `JsonObject::finish`, so that any key left over (a misspelt field, a
/// `_name` sibling without a primitive slot, a second `resourceType`) is
/// reported as an unknown field. Key order in the input does not matter.
///
/// # Generated Code
///
/// ```rust,ignore
/// let mut obj = crate::json::JsonObject::from_value("Citation", value)?;
/// obj.expect_resource_type("Citation")?;
/// let shape = Self {
///     url: <Option<Uri> as crate::json::JsonField>::take_json(&mut obj, "url")?,
///     version_algorithm: <CitationVersionAlgorithm as crate::json::JsonChoice>::take_json_choice(&mut obj)?,
/// };
/// obj.finish()?;
/// Ok(shape)
/// ```
pub(crate) fn generate_json_decode(
    shape_name: &str,
    fields: &[ShapeField<'_>],
    resource_type: Option<&str>,
) -> TokenStream {
    let discriminator = resource_type.map(|resource_type| {
        quote! { obj.expect_resource_type(#resource_type)?; }
    });
    let takes = fields.iter().map(|field| {
        let ident = field.ident;
        let ty = field.ty;
        let key = &field.key;
        if field.flatten {
            let choice = field.choice_type();
            quote! {
                #ident: <#choice as crate::json::JsonChoice>::take_json_choice(&mut obj)?,
            }
        } else {
            quote! {
                #ident: <#ty as crate::json::JsonField>::take_json(&mut obj, #key)?,
            }
        }
    });

    quote! {
        let mut obj = crate::json::JsonObject::from_value(#shape_name, value)?;
        #discriminator
        let shape = Self {
            #(#takes)*
        };
        obj.finish()?;
        Ok(shape)
    }
}

/// Generates the body of `FhirXml::from_xml_node` for a shape struct.
///
/// Mirrors [`generate_json_decode`] over a `crate::xml::XmlObject`: fields
/// claim their attributes or child elements by name and anything unclaimed is
/// an unknown field.
pub(crate) fn generate_xml_decode(shape_name: &str, fields: &[ShapeField<'_>]) -> TokenStream {
    let takes = fields.iter().map(|field| {
        let ident = field.ident;
        let ty = field.ty;
        let key = &field.key;
        if field.flatten {
            let choice = field.choice_type();
            quote! {
                #ident: <#choice as crate::xml::XmlChoice>::take_xml_choice(&mut obj)?,
            }
        } else {
            quote! {
                #ident: <#ty as crate::xml::XmlField>::take_xml(&mut obj, #key)?,
            }
        }
    });

    quote! {
        let mut obj = crate::xml::XmlObject::new(#shape_name, node)?;
        let shape = Self {
            #(#takes)*
        };
        obj.finish()?;
        Ok(shape)
    }
}

/// Generates `JsonChoice::take_json_choice` and `XmlChoice::take_xml_choice`
/// for a choice enum.
///
/// Every variant's key is looked up; the first one found becomes the value
/// and any further one is a `ConflictingVariant` error naming both keys.
/// Absence of all variants decodes as `None`.
pub(crate) fn generate_choice_decode(
    base_name: &str,
    variants: &[EnumVariant<'_>],
) -> (TokenStream, TokenStream) {
    let json_checks = variants.iter().map(|variant| {
        let ident = variant.ident;
        let ty = variant.ty;
        let wire = &variant.wire;
        quote! {
            if let Some(value) = <#ty as crate::json::JsonElement>::take_one(obj, #wire)? {
                crate::json::choose_variant(obj.shape(), #base_name, &mut chosen, Self::#ident(value), #wire)?;
            }
        }
    });
    let xml_checks = variants.iter().map(|variant| {
        let ident = variant.ident;
        let ty = variant.ty;
        let wire = &variant.wire;
        quote! {
            if let Some(node) = obj.take_child(#wire)? {
                let value = <#ty as crate::xml::FhirXml>::from_xml_node(node)?;
                crate::json::choose_variant(obj.shape(), #base_name, &mut chosen, Self::#ident(value), #wire)?;
            }
        }
    });

    let json = quote! {
        let mut chosen: Option<(Self, &'static str)> = None;
        #(#json_checks)*
        Ok(chosen.map(|(choice, _)| choice))
    };
    let xml = quote! {
        let mut chosen: Option<(Self, &'static str)> = None;
        #(#xml_checks)*
        Ok(chosen.map(|(choice, _)| choice))
    };
    (json, xml)
}
