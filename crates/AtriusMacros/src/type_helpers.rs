//=============================================================================
// Type Analysis Helper Functions
//=============================================================================

use syn::{GenericArgument, Path, PathArguments, Type, TypePath};

/// Returns the single type argument of `ty` if its last path segment is
/// `wrapper`.
fn get_wrapped_type<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    if let Type::Path(TypePath {
                          path: Path { segments, .. },
                          ..
                      }) = ty
        && let Some(segment) = segments.last()
        && segment.ident == wrapper
        && let PathArguments::AngleBracketed(args) = &segment.arguments
        && let Some(GenericArgument::Type(inner_ty)) = args.args.first()
    {
        return Some(inner_ty);
    }
    None
}

/// Extracts the inner type from an `Option<T>` type.
///
/// # Examples
///
/// ```rust,ignore
/// // For type: Option<PatientDeceased>
/// // Returns: Some(PatientDeceased)
///
/// // For type: String
/// // Returns: None
/// ```
pub(crate) fn get_option_inner_type(ty: &Type) -> Option<&Type> {
    get_wrapped_type(ty, "Option")
}

/// Extracts the inner type from a `Box<T>` type.
///
/// Box types are used in FHIR for cycle breaking in recursive data
/// structures, and to keep the variants of the `Resource` enum small.
///
/// # Examples
///
/// ```rust,ignore
/// // For type: Box<Patient>
/// // Returns: Some(Patient)
///
/// // For type: Reference
/// // Returns: None
/// ```
pub(crate) fn get_box_inner_type(ty: &Type) -> Option<&Type> {
    get_wrapped_type(ty, "Box")
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_wrapped_types() {
        let ty: Type = parse_quote!(Option<PatientDeceased>);
        let inner = get_option_inner_type(&ty).unwrap();
        assert_eq!(quote::quote!(#inner).to_string(), "PatientDeceased");

        let ty: Type = parse_quote!(Box<Patient>);
        assert!(get_box_inner_type(&ty).is_some());
        assert!(get_option_inner_type(&ty).is_none());

        let ty: Type = parse_quote!(Vec<Coding>);
        assert!(get_option_inner_type(&ty).is_none());
    }
}
