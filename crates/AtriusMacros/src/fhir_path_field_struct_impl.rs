use proc_macro2::TokenStream;
use quote::quote;
use syn::{token, Attribute, Ident, Lit, Meta};
use syn::punctuated::Punctuated;

use crate::extract_type_names_elements::extract_resource_choice_elements;
use crate::field_helpers::{is_fhir_resource, ShapeField};

/// Reads `#[fhir_path(primitive_value = "method")]` from a struct.
///
/// The named inherent method, `fn(&self) -> Option<EvaluationResult>`, makes
/// a complex datatype convertible (Quantity is the one FHIRPath needs).
fn get_primitive_value_method(attrs: &[Attribute]) -> Option<Ident> {
    for attr in attrs {
        if attr.path().is_ident("fhir_path")
            && let Ok(list) =
            attr.parse_args_with(Punctuated::<Meta, token::Comma>::parse_terminated)
        {
            for meta in list {
                if let Meta::NameValue(nv) = meta
                    && nv.path.is_ident("primitive_value")
                    && let syn::Expr::Lit(expr_lit) = nv.value
                    && let Lit::Str(lit_str) = expr_lit.lit
                {
                    return Some(Ident::new(&lit_str.value(), lit_str.span()));
                }
            }
        }
    }
    None
}

/// Generates the `FhirNode` and `IntoEvaluationResult` implementations for a
/// shape struct.
///
/// # Generated Implementations
///
/// - `type_descriptor` returns a `static` descriptor listing every declared
///   field with its FHIR name, admissible types and cardinality. Types and
///   bounds come from the `FieldCardinality` impl of the field's Rust type,
///   so `Option<T>` is `0..1`, `Vec<T>` is `0..*` and a flattened choice
///   lists each of its variant types.
/// - `children` walks the fields in declaration order through
///   `ReflectField`, skipping names excluded by the filter.
/// - resources also get `FhirResourceMetadata`, listing their choice
///   elements either from `#[fhir_resource(choice_elements = "..")]` or, when
///   that is absent, from their flattened fields.
pub(crate) fn generate_fhirpath_struct_impl(
    name: &Ident,
    fields: &[ShapeField<'_>],
    attrs: &[Attribute],
) -> TokenStream {
    let is_resource = is_fhir_resource(attrs);

    let elements = fields.iter().map(|field| {
        let ty = field.ty;
        let key = &field.key;
        let is_choice = field.flatten;
        quote! {
            ::atrius_fhirpath_support::ElementDescriptor {
                name: #key,
                types: <#ty as ::atrius_fhirpath_support::FieldCardinality>::TYPES,
                min: <#ty as ::atrius_fhirpath_support::FieldCardinality>::MIN,
                max: <#ty as ::atrius_fhirpath_support::FieldCardinality>::MAX,
                is_choice: #is_choice,
            }
        }
    });

    let collects = fields.iter().map(|field| {
        let ident = field.ident;
        let key = &field.key;
        quote! {
            if ::atrius_fhirpath_support::wants(names, #key) {
                ::atrius_fhirpath_support::ReflectField::collect_children(&self.#ident, #key, &mut out);
            }
        }
    });

    let primitive_value = get_primitive_value_method(attrs).map(|method| {
        quote! {
            fn primitive_value(&self) -> Option<::atrius_fhirpath_support::EvaluationResult> {
                self.#method()
            }
        }
    });

    let metadata = is_resource.then(|| {
        let mut choice_elements = extract_resource_choice_elements(attrs);
        if choice_elements.is_empty() {
            choice_elements = fields
                .iter()
                .filter(|field| field.flatten)
                .map(|field| field.key.clone())
                .collect();
        }
        quote! {
            impl ::atrius_fhirpath_support::FhirResourceMetadata for #name {
                fn choice_elements() -> &'static [&'static str] {
                    &[#(#choice_elements),*]
                }
            }
        }
    });

    quote! {
        impl ::atrius_fhirpath_support::FhirNode for #name {
            fn type_info(&self) -> ::atrius_fhirpath_support::TypeInfoResult {
                <Self as ::atrius_fhirpath_support::TypeInfo>::type_info()
            }

            fn type_descriptor(&self) -> &'static ::atrius_fhirpath_support::TypeDescriptor {
                static DESCRIPTOR: ::atrius_fhirpath_support::TypeDescriptor =
                    ::atrius_fhirpath_support::TypeDescriptor {
                        namespace: <#name as ::atrius_fhirpath_support::TypeInfo>::NAMESPACE,
                        name: <#name as ::atrius_fhirpath_support::TypeInfo>::NAME,
                        is_resource: #is_resource,
                        elements: &[#(#elements),*],
                    };
                &DESCRIPTOR
            }

            fn children(
                &self,
                names: Option<&[&str]>,
            ) -> Vec<::atrius_fhirpath_support::Child<'_>> {
                let mut out = Vec::new();
                #(#collects)*
                out
            }

            #primitive_value

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }

        impl ::atrius_fhirpath_support::IntoEvaluationResult for #name {
            fn to_evaluation_result(&self) -> ::atrius_fhirpath_support::EvaluationResult {
                ::atrius_fhirpath_support::to_evaluation_result(self)
            }
        }

        #metadata
    }
}
