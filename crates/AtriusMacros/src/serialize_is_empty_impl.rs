//=============================================================================
// FhirSerde Implementation Generator Functions: encoding and emptiness
//=============================================================================

use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

use crate::field_helpers::{EnumVariant, ShapeField};

/// Generates the body of `FhirJson::to_json_value` for a shape struct.
///
/// Fields are written in declaration order. A resource writes its
/// `resourceType` discriminator first. Each ordinary field goes through
/// `JsonField::put_json`, which omits empty slots and splits primitives into
/// their `name`/`_name` keys; a flattened choice field writes the single key
/// of its populated variant directly into the parent object.
///
/// # Generated Code
///
/// ```rust,ignore
/// let mut out = serde_json::Map::new();
/// out.insert("resourceType".to_string(), serde_json::Value::String("Citation".to_string()));
/// crate::json::JsonField::put_json(&self.url, &mut out, "url");
/// if let Some(choice) = &self.version_algorithm {
///     crate::json::JsonChoice::put_json_choice(choice, &mut out);
/// }
/// serde_json::Value::Object(out)
/// ```
pub(crate) fn generate_json_encode(
    fields: &[ShapeField<'_>],
    resource_type: Option<&str>,
) -> TokenStream {
    let discriminator = resource_type.map(|resource_type| {
        quote! {
            out.insert(
                "resourceType".to_string(),
                ::serde_json::Value::String(#resource_type.to_string()),
            );
        }
    });
    let puts = fields.iter().map(|field| {
        let ident = field.ident;
        let key = &field.key;
        if field.flatten {
            quote! {
                if let Some(choice) = &self.#ident {
                    crate::json::JsonChoice::put_json_choice(choice, &mut out);
                }
            }
        } else {
            quote! {
                crate::json::JsonField::put_json(&self.#ident, &mut out, #key);
            }
        }
    });

    quote! {
        let mut out = ::serde_json::Map::new();
        #discriminator
        #(#puts)*
        ::serde_json::Value::Object(out)
    }
}

/// Generates the body of `FhirXml::write_xml` for a shape struct.
///
/// XML attributes must be written while the start tag is still open, so the
/// fields are visited twice: first every field gets the chance to write an
/// attribute (only plain `String` ids and urls do), then the child elements
/// are written in declaration order.
pub(crate) fn generate_xml_encode(fields: &[ShapeField<'_>]) -> TokenStream {
    let attributes = fields.iter().filter(|field| !field.flatten).map(|field| {
        let ident = field.ident;
        let key = &field.key;
        quote! {
            crate::xml::XmlField::write_xml_attribute(&self.#ident, writer, #key);
        }
    });
    let children = fields.iter().map(|field| {
        let ident = field.ident;
        let key = &field.key;
        if field.flatten {
            quote! {
                if let Some(choice) = &self.#ident {
                    crate::xml::XmlChoice::write_xml_choice(choice, writer)?;
                }
            }
        } else {
            quote! {
                crate::xml::XmlField::write_xml_children(&self.#ident, writer, #key)?;
            }
        }
    });

    quote! {
        writer.start(name)?;
        #(#attributes)*
        #(#children)*
        writer.end(name)
    }
}

/// Generates `JsonChoice::put_json_choice` and `XmlChoice::write_xml_choice`
/// for a choice enum: the populated variant is written under its own
/// type-suffixed name, an empty one is not written at all.
pub(crate) fn generate_choice_encode(variants: &[EnumVariant<'_>]) -> (TokenStream, TokenStream) {
    let json_arms = variants.iter().map(|variant| {
        let ident = variant.ident;
        let wire = &variant.wire;
        quote! {
            Self::#ident(value) => crate::json::JsonElement::put_one(value, out, #wire),
        }
    });
    let xml_arms = variants.iter().map(|variant| {
        let ident = variant.ident;
        let wire = &variant.wire;
        quote! {
            Self::#ident(value) => crate::xml::FhirXml::write_xml(value, writer, #wire),
        }
    });

    let json = quote! {
        if crate::element::IsEmpty::is_empty(self) {
            return;
        }
        match self {
            #(#json_arms)*
        }
    };
    let xml = quote! {
        if crate::element::IsEmpty::is_empty(self) {
            return Ok(());
        }
        match self {
            #(#xml_arms)*
        }
    };
    (json, xml)
}

/// Generates the `IsEmpty` implementation for FHIR shapes.
///
/// A struct is empty when every one of its fields is empty; resources are
/// never empty since they carry their type. A choice enum is as empty as its
/// populated variant. Generated code calls the trait method through its path
/// because `Vec` and `String` have inherent `is_empty` methods.
pub(crate) fn generate_is_empty_impl(
    name: &Ident,
    fields: Option<&[ShapeField<'_>]>,
    variants: Option<&[EnumVariant<'_>]>,
    never_empty: bool,
) -> TokenStream {
    let body = if never_empty {
        quote! { false }
    } else if let Some(fields) = fields {
        let checks = fields.iter().map(|field| {
            let ident = field.ident;
            quote! { crate::element::IsEmpty::is_empty(&self.#ident) }
        });
        if fields.is_empty() {
            quote! { true }
        } else {
            quote! { #(#checks)&&* }
        }
    } else {
        let arms = variants.unwrap_or_default().iter().map(|variant| {
            let ident = variant.ident;
            quote! { Self::#ident(value) => crate::element::IsEmpty::is_empty(value), }
        });
        quote! {
            match self {
                #(#arms)*
            }
        }
    };

    quote! {
        impl crate::element::IsEmpty for #name {
            fn is_empty(&self) -> bool {
                #body
            }
        }
    }
}
