use syn::{token, Lit, Meta, Ident};
use syn::punctuated::Punctuated;

/// Extracts namespace and name from type_info attributes.
pub(crate) fn extract_type_info_attributes(attrs: &[syn::Attribute], type_name: &Ident) -> (String, String) {
    for attr in attrs {
        if attr.path().is_ident("type_info")
            && let Ok(list) =
            attr.parse_args_with(Punctuated::<Meta, token::Comma>::parse_terminated)
        {
            let mut namespace = None;
            let mut name = None;

            for meta in list {
                if let Meta::NameValue(nv) = meta
                    && let syn::Expr::Lit(expr_lit) = nv.value
                    && let Lit::Str(lit_str) = expr_lit.lit
                {
                    if nv.path.is_ident("namespace") {
                        namespace = Some(lit_str.value());
                    } else if nv.path.is_ident("name") {
                        name = Some(lit_str.value());
                    }
                }
            }

            if let (Some(ns), Some(n)) = (namespace, name) {
                return (ns, n);
            }
        }
    }

    // Default: Assume FHIR namespace and use the type name
    ("FHIR".to_string(), type_name.to_string())
}

/// Extracts the base name from fhir_choice_element attribute if present.
pub(crate) fn extract_choice_element_base_name(attrs: &[syn::Attribute]) -> Option<String> {
    for attr in attrs {
        if attr.path().is_ident("fhir_choice_element")
            && let Ok(list) =
            attr.parse_args_with(Punctuated::<Meta, token::Comma>::parse_terminated)
        {
            for meta in list {
                if let Meta::NameValue(nv) = meta
                    && nv.path.is_ident("base_name")
                    && let syn::Expr::Lit(expr_lit) = nv.value
                    && let Lit::Str(lit_str) = expr_lit.lit
                {
                    return Some(lit_str.value());
                }
            }
        }
    }
    None
}

/// Extracts choice elements from fhir_resource attribute if present.
///
/// `#[fhir_resource(choice_elements = "effective,value")]` yields both names;
/// a bare `#[fhir_resource]` yields none.
pub(crate) fn extract_resource_choice_elements(attrs: &[syn::Attribute]) -> Vec<String> {
    for attr in attrs {
        if attr.path().is_ident("fhir_resource")
            && let Ok(list) =
            attr.parse_args_with(Punctuated::<Meta, token::Comma>::parse_terminated)
        {
            for meta in list {
                if let Meta::NameValue(nv) = meta
                    && nv.path.is_ident("choice_elements")
                    && let syn::Expr::Lit(expr_lit) = nv.value
                    && let Lit::Str(lit_str) = expr_lit.lit
                {
                    // Split the comma-separated list of choice elements
                    return lit_str
                        .value()
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect();
                }
            }
        }
    }
    Vec::new()
}
