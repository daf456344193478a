use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

use crate::field_helpers::EnumVariant;

/// Generates the `FhirNode` and `IntoEvaluationResult` implementations for a
/// choice enum or for the `Resource` enum.
///
/// Both kinds of enum are transparent to reflection: every method delegates
/// to the populated variant, so a `PatientDeceased::Boolean` reports the
/// `boolean` type, the boolean's children and the boolean's value. The
/// `Resource` enum additionally adds a `resourceType` entry to the object it
/// converts to, so that a query engine can discriminate resources read as
/// values.
pub(crate) fn generate_fhirpath_enum_impl(
    name: &Ident,
    variants: &[EnumVariant<'_>],
    is_registry: bool,
) -> TokenStream {
    let delegate = |call: TokenStream| {
        let arms = variants.iter().map(|variant| {
            let ident = variant.ident;
            quote! { Self::#ident(value) => ::atrius_fhirpath_support::FhirNode::#call, }
        });
        quote! {
            match self {
                #(#arms)*
            }
        }
    };

    let type_info = delegate(quote! { type_info(value) });
    let type_descriptor = delegate(quote! { type_descriptor(value) });
    let children = delegate(quote! { children(value, names) });
    let primitive_value = delegate(quote! { primitive_value(value) });
    let as_any = delegate(quote! { as_any(value) });
    let equal = delegate(quote! { equal(value, other) });
    let equivalent = delegate(quote! { equivalent(value, other) });

    let evaluation_result = if is_registry {
        let arms = variants.iter().map(|variant| {
            let ident = variant.ident;
            let resource_type = &variant.wire;
            quote! {
                Self::#ident(value) => {
                    let mut result = ::atrius_fhirpath_support::to_evaluation_result(value);
                    if let ::atrius_fhirpath_support::EvaluationResult::Object { ref mut map, .. } = result {
                        map.insert(
                            "resourceType".to_string(),
                            ::atrius_fhirpath_support::EvaluationResult::string(#resource_type.to_string()),
                        );
                    }
                    result
                }
            }
        });
        quote! {
            match self {
                #(#arms)*
            }
        }
    } else {
        quote! { ::atrius_fhirpath_support::to_evaluation_result(self) }
    };

    quote! {
        impl ::atrius_fhirpath_support::FhirNode for #name {
            fn type_info(&self) -> ::atrius_fhirpath_support::TypeInfoResult {
                #type_info
            }

            fn type_descriptor(&self) -> &'static ::atrius_fhirpath_support::TypeDescriptor {
                #type_descriptor
            }

            fn children(
                &self,
                names: Option<&[&str]>,
            ) -> Vec<::atrius_fhirpath_support::Child<'_>> {
                #children
            }

            fn primitive_value(&self) -> Option<::atrius_fhirpath_support::EvaluationResult> {
                #primitive_value
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                #as_any
            }

            fn equal(&self, other: &dyn ::atrius_fhirpath_support::FhirNode) -> Option<bool> {
                #equal
            }

            fn equivalent(&self, other: &dyn ::atrius_fhirpath_support::FhirNode) -> bool {
                #equivalent
            }
        }

        impl ::atrius_fhirpath_support::IntoEvaluationResult for #name {
            fn to_evaluation_result(&self) -> ::atrius_fhirpath_support::EvaluationResult {
                #evaluation_result
            }
        }
    }
}
