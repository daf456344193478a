//! # FHIR Macro - Procedural Macros for FHIR Shapes
//!
//! This crate provides the derive macros that turn a plain Rust declaration of
//! a FHIR shape into its JSON codec, its XML codec and its reflection support.
//! Shapes are declared once, as structs whose fields are primitive slots,
//! other shapes, lists or choice enums; everything else is generated.
//!
//! ## Overview
//!
//! - **`#[derive(FhirSerde)]`** - strict decoding and declaration-ordered
//!   encoding for FHIR JSON and FHIR XML, plus `IsEmpty`
//! - **`#[derive(FhirPath)]`** - the `FhirNode` reflection façade, a static
//!   `TypeDescriptor` and conversion to `EvaluationResult`
//! - **`#[derive(TypeInfo)]`** - compile-time namespace and type name
//!
//! The generated code refers to the codec modules of the model crate through
//! `crate::` paths, so the derives are meant to be used inside that crate.
//!
//! ## FHIR Serialization Patterns
//!
//! ### Primitive Split
//!
//! FHIR primitives can have associated metadata stored in a parallel
//! `_fieldName` object:
//!
//! ```json
//! {
//!   "status": "active",
//!   "_status": {
//!     "id": "status-1",
//!     "extension": [...]
//!   }
//! }
//! ```
//!
//! ### Choice Types
//!
//! FHIR's `[x]` fields are serialized as single key-value pairs with type
//! suffixes directly in the parent object:
//!
//! ```json
//! { "valueQuantity": {...} }  // for Quantity type
//! { "valueString": "text" }   // for String type
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! #[derive(Debug, Clone, PartialEq, Default, FhirSerde, FhirPath, TypeInfo)]
//! #[fhir_resource(choice_elements = "deceased")]
//! pub struct Patient {
//!     pub id: Option<Id>,
//!     #[fhir_serde(rename = "implicitRules")]
//!     pub implicit_rules: Option<Uri>,
//!     pub active: Option<Boolean>,
//!     pub name: Vec<HumanName>,
//!     #[fhir_serde(flatten)]
//!     pub deceased: Option<PatientDeceased>,
//! }
//!
//! #[derive(Debug, Clone, PartialEq, FhirSerde, FhirPath, TypeInfo)]
//! #[fhir_choice_element(base_name = "deceased")]
//! pub enum PatientDeceased {
//!     #[fhir_serde(rename = "deceasedBoolean")]
//!     Boolean(Boolean),
//!     #[fhir_serde(rename = "deceasedDateTime")]
//!     DateTime(DateTime),
//! }
//! ```

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput};
use crate::deserialize_impl::{generate_choice_decode, generate_json_decode, generate_xml_decode};
use crate::extract_type_names_elements::{extract_choice_element_base_name, extract_type_info_attributes};
use crate::field_helpers::{enum_variants, is_fhir_registry, is_fhir_resource, shape_fields, EnumVariant};
use crate::fhir_path_enum_impl::generate_fhirpath_enum_impl;
use crate::fhir_path_field_struct_impl::generate_fhirpath_struct_impl;
use crate::serialize_is_empty_impl::{
    generate_choice_encode, generate_is_empty_impl, generate_json_encode, generate_xml_encode,
};
use crate::type_helpers::get_box_inner_type;

pub(crate) mod field_helpers;
pub(crate) mod type_helpers;
pub(crate) mod serialize_is_empty_impl;
pub(crate) mod deserialize_impl;
pub(crate) mod fhir_path_field_struct_impl;
pub(crate) mod extract_type_names_elements;
pub(crate) mod fhir_path_enum_impl;

/// Derives the FHIR JSON and XML codecs for a shape.
///
/// # Supported Attributes
///
/// - `#[fhir_serde(rename = "name")]` - wire name of a field, or of a choice
///   variant (`valueString`)
/// - `#[fhir_serde(flatten)]` - marks an `Option<ChoiceEnum>` field whose
///   variants live directly in the parent
/// - `#[fhir_resource]` - the struct is a resource: it carries a
///   `resourceType` in JSON and is a document root in XML
/// - `#[fhir_choice_element(base_name = "value")]` - the enum is a choice
/// - `#[fhir_registry]` - the enum is the closed set of resources, one
///   `Name(Box<Name>)` variant per resource shape
///
/// # Generated Implementations
///
/// ## For Structs:
/// - `IsEmpty`, `FhirJson` and `FhirXml`
/// - for resources also `XmlRoot` and an inherent `RESOURCE_TYPE` constant
///
/// ## For Choice Enums:
/// - `IsEmpty`, `JsonChoice`, `XmlChoice` and `ChoiceElement`
///
/// ## For the Resource Enum:
/// - `IsEmpty`, `FhirJson`, `FhirXml` and `XmlRoot`, all dispatching on the
///   resource type through `crate::registry`
/// - `From<Shape>` for every variant, `resource_type()`, `id()` and the
///   decoder table the registry is built from
///
/// # Error Handling
///
/// Decoding is strict: an undeclared key is `UnknownField`, two variants of
/// one choice are `ConflictingVariant`, and a bad primitive literal is
/// `MalformedPrimitive`. Every error names the shape and the field.
#[proc_macro_derive(FhirSerde, attributes(fhir_serde, fhir_resource, fhir_choice_element, fhir_registry))]
pub fn fhir_serde_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    if !input.generics.params.is_empty() {
        panic!("FhirSerde derive macro does not support generic types.");
    }

    let expanded = match &input.data {
        Data::Struct(data) => {
            let fields = shape_fields(data);
            let shape_name = name.to_string();
            let resource_type = is_fhir_resource(&input.attrs).then(|| shape_name.clone());
            let is_empty_impl =
                generate_is_empty_impl(name, Some(&fields), None, resource_type.is_some());
            let json_decode = generate_json_decode(&shape_name, &fields, resource_type.as_deref());
            let json_encode = generate_json_encode(&fields, resource_type.as_deref());
            let xml_decode = generate_xml_decode(&shape_name, &fields);
            let xml_encode = generate_xml_encode(&fields);

            let resource_impl = resource_type.as_ref().map(|resource_type| {
                quote! {
                    impl #name {
                        pub const RESOURCE_TYPE: &'static str = #resource_type;
                    }

                    impl crate::xml::XmlRoot for #name {
                        fn from_xml_root(node: ::roxmltree::Node<'_, '_>) -> crate::error::Result<Self> {
                            crate::xml::expect_root_name(#resource_type, node)?;
                            <Self as crate::xml::FhirXml>::from_xml_node(node)
                        }

                        fn write_xml_root<W: ::std::io::Write>(
                            &self,
                            writer: &mut crate::xml::XmlWriter<W>,
                        ) -> crate::error::Result<()> {
                            crate::xml::FhirXml::write_xml(self, writer, #resource_type)
                        }
                    }
                }
            });

            quote! {
                #is_empty_impl

                impl crate::json::FhirJson for #name {
                    fn from_json_value(value: ::serde_json::Value) -> crate::error::Result<Self> {
                        #json_decode
                    }

                    fn to_json_value(&self) -> ::serde_json::Value {
                        #json_encode
                    }
                }

                impl crate::xml::FhirXml for #name {
                    fn from_xml_node(node: ::roxmltree::Node<'_, '_>) -> crate::error::Result<Self> {
                        #xml_decode
                    }

                    fn write_xml<W: ::std::io::Write>(
                        &self,
                        writer: &mut crate::xml::XmlWriter<W>,
                        name: &str,
                    ) -> crate::error::Result<()> {
                        #xml_encode
                    }
                }

                #resource_impl
            }
        }
        Data::Enum(data) => {
            let variants = enum_variants(data);
            if is_fhir_registry(&input.attrs) {
                generate_registry_impl(name, &variants)
            } else {
                generate_choice_impl(name, &variants, &input.attrs)
            }
        }
        Data::Union(_) => panic!("FhirSerde derive macro does not support unions."),
    };

    TokenStream::from(expanded)
}

fn generate_choice_impl(
    name: &syn::Ident,
    variants: &[EnumVariant<'_>],
    attrs: &[syn::Attribute],
) -> proc_macro2::TokenStream {
    let base_name = extract_choice_element_base_name(attrs).unwrap_or_else(|| {
        panic!("choice enum `{}` needs #[fhir_choice_element(base_name = \"..\")]", name)
    });
    let is_empty_impl = generate_is_empty_impl(name, None, Some(variants), false);
    let (json_decode, xml_decode) = generate_choice_decode(&base_name, variants);
    let (json_encode, xml_encode) = generate_choice_encode(variants);
    let wires: Vec<&String> = variants.iter().map(|variant| &variant.wire).collect();
    let field_name_arms = variants.iter().map(|variant| {
        let ident = variant.ident;
        let wire = &variant.wire;
        quote! { Self::#ident(_) => #wire, }
    });

    quote! {
        #is_empty_impl

        impl crate::json::JsonChoice for #name {
            fn take_json_choice(obj: &mut crate::json::JsonObject) -> crate::error::Result<Option<Self>> {
                #json_decode
            }

            fn put_json_choice(&self, out: &mut ::serde_json::Map<String, ::serde_json::Value>) {
                #json_encode
            }
        }

        impl crate::xml::XmlChoice for #name {
            fn take_xml_choice(obj: &mut crate::xml::XmlObject<'_, '_>) -> crate::error::Result<Option<Self>> {
                #xml_decode
            }

            fn write_xml_choice<W: ::std::io::Write>(
                &self,
                writer: &mut crate::xml::XmlWriter<W>,
            ) -> crate::error::Result<()> {
                #xml_encode
            }
        }

        impl ::atrius_fhirpath_support::ChoiceElement for #name {
            fn base_name() -> &'static str {
                #base_name
            }

            fn possible_field_names() -> Vec<&'static str> {
                vec![#(#wires),*]
            }

            fn field_name(&self) -> &'static str {
                match self {
                    #(#field_name_arms)*
                }
            }
        }
    }
}

fn generate_registry_impl(name: &syn::Ident, variants: &[EnumVariant<'_>]) -> proc_macro2::TokenStream {
    let is_empty_impl = generate_is_empty_impl(name, None, Some(variants), true);
    let resource_types: Vec<&String> = variants.iter().map(|variant| &variant.wire).collect();
    let inner_types: Vec<&syn::Type> = variants
        .iter()
        .map(|variant| {
            get_box_inner_type(variant.ty).unwrap_or_else(|| {
                panic!("resource variant `{}` must be declared as Box<Shape>", variant.ident)
            })
        })
        .collect();
    let idents: Vec<&syn::Ident> = variants.iter().map(|variant| variant.ident).collect();

    quote! {
        #is_empty_impl

        impl #name {
            /// Every resource type this enum can hold.
            pub const RESOURCE_TYPES: &'static [&'static str] = &[#(#resource_types),*];

            /// The `resourceType` of the held resource.
            pub fn resource_type(&self) -> &'static str {
                match self {
                    #(Self::#idents(_) => #resource_types,)*
                }
            }

            /// The logical id of the held resource, if it has one.
            pub fn id(&self) -> Option<&str> {
                match self {
                    #(Self::#idents(resource) => resource.id.as_ref().and_then(|id| id.value.as_deref()),)*
                }
            }

            pub(crate) fn registry_entries() -> Vec<crate::registry::ResourceDecoder> {
                vec![#(crate::registry::ResourceDecoder::new::<#inner_types>(#resource_types)),*]
            }
        }

        #(
            impl From<#inner_types> for #name {
                fn from(resource: #inner_types) -> Self {
                    Self::#idents(Box::new(resource))
                }
            }
        )*

        impl crate::json::FhirJson for #name {
            fn from_json_value(value: ::serde_json::Value) -> crate::error::Result<Self> {
                crate::registry::decode_json(value)
            }

            fn to_json_value(&self) -> ::serde_json::Value {
                match self {
                    #(Self::#idents(resource) => crate::json::FhirJson::to_json_value(resource),)*
                }
            }
        }

        impl crate::xml::FhirXml for #name {
            fn from_xml_node(node: ::roxmltree::Node<'_, '_>) -> crate::error::Result<Self> {
                crate::registry::decode_xml_wrapped(node)
            }

            fn write_xml<W: ::std::io::Write>(
                &self,
                writer: &mut crate::xml::XmlWriter<W>,
                name: &str,
            ) -> crate::error::Result<()> {
                writer.start(name)?;
                crate::xml::XmlRoot::write_xml_root(self, writer)?;
                writer.end(name)
            }
        }

        impl crate::xml::XmlRoot for #name {
            fn from_xml_root(node: ::roxmltree::Node<'_, '_>) -> crate::error::Result<Self> {
                crate::registry::decode_xml(node)
            }

            fn write_xml_root<W: ::std::io::Write>(
                &self,
                writer: &mut crate::xml::XmlWriter<W>,
            ) -> crate::error::Result<()> {
                match self {
                    #(Self::#idents(resource) => crate::xml::XmlRoot::write_xml_root(resource.as_ref(), writer),)*
                }
            }
        }
    }
}

//=============================================================================
// FHIRPath Derive Macro and Implementation Functions
//=============================================================================

/// Derives the `atrius_fhirpath_support::FhirNode` reflection façade.
///
/// # Generated Implementations
///
/// ## For Structs:
/// - `FhirNode` with a static `TypeDescriptor`, ordered `children` and
///   structural equality and equivalence
/// - `IntoEvaluationResult`, building a typed object from the children
/// - for `#[fhir_resource]` structs also `FhirResourceMetadata`
///
/// ## For Enums:
/// - **Choice types**: every method delegates to the populated variant
/// - **Resource enum**: delegates as well, and adds the `resourceType` entry
///   when converting to an object
///
/// # Field Name Handling
///
/// Children are reported under their FHIR names: `#[fhir_serde(rename)]` if
/// present, otherwise the lowerCamelCase of the Rust field name. Choice
/// fields are reported under their base name.
///
/// # Examples
///
/// ```rust,ignore
/// let patient = Patient {
///     active: Some(Boolean::new(true)),
///     ..Default::default()
/// };
///
/// let names: Vec<_> = patient.children(None).iter().map(|c| c.name).collect();
/// assert_eq!(names, ["active"]);
/// ```
///
/// A complex datatype can expose a primitive value for conversions with
/// `#[fhir_path(primitive_value = "method")]`.
#[proc_macro_derive(FhirPath, attributes(fhir_serde, fhir_choice_element, fhir_resource, fhir_registry, fhir_path))]
pub fn fhir_path_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let trait_impl = match &input.data {
        Data::Struct(data) => {
            generate_fhirpath_struct_impl(name, &shape_fields(data), &input.attrs)
        }
        Data::Enum(data) => generate_fhirpath_enum_impl(
            name,
            &enum_variants(data),
            is_fhir_registry(&input.attrs),
        ),
        Data::Union(_) => panic!("FhirPath derive macro does not support unions."),
    };

    TokenStream::from(trait_impl)
}

/// Derive macro for TypeInfo trait.
///
/// This macro generates implementations of the TypeInfo trait for FHIR types,
/// providing the compile-time namespace and name used by type descriptors and
/// by the FHIRPath type() function.
///
/// # Attributes
///
/// - `#[type_info(namespace = "FHIR", name = "BackboneElement")]` - Specifies custom namespace and name
/// - If not specified, the namespace is `FHIR` and the name is the type name
///
/// For enums, `TYPE_NAMES` lists the type of every variant, which is how the
/// descriptor of a choice element learns its admissible types.
///
/// # Examples
///
/// ```rust,ignore
/// #[derive(TypeInfo)]
/// #[type_info(namespace = "FHIR", name = "BackboneElement")]
/// pub struct BodyStructureIncludedStructure {
///     // fields...
/// }
///
/// #[derive(TypeInfo)]
/// pub struct Patient {
///     // fields...
/// }
/// ```
#[proc_macro_derive(TypeInfo, attributes(type_info))]
pub fn type_info_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    // Extract type_info attributes if present
    let (namespace, type_name) = extract_type_info_attributes(&input.attrs, name);

    let type_names = match &input.data {
        Data::Enum(data) => {
            let types = enum_variants(data).into_iter().map(|variant| variant.ty);
            Some(quote! {
                const TYPE_NAMES: &'static [&'static str] =
                    &[#(<#types as ::atrius_fhirpath_support::TypeInfo>::NAME),*];
            })
        }
        _ => None,
    };

    let expanded = quote! {
        impl ::atrius_fhirpath_support::TypeInfo for #name {
            const NAMESPACE: &'static str = #namespace;
            const NAME: &'static str = #type_name;
            #type_names
        }
    };

    TokenStream::from(expanded)
}
