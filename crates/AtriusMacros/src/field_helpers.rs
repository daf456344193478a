use heck::ToLowerCamelCase;
use syn::{token, Attribute, Fields, Ident, Lit, Meta, Type};
use syn::punctuated::Punctuated;
use crate::type_helpers::get_option_inner_type;

/// One declared field of a shape struct, as the generators see it.
pub(crate) struct ShapeField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    /// Wire name: the JSON key and XML element/attribute name. For a choice
    /// field this is the base name.
    pub key: String,
    /// `#[fhir_serde(flatten)]`: a choice field whose variants live directly
    /// in the parent.
    pub flatten: bool,
}

impl ShapeField<'_> {
    /// The choice enum of a flattened `Option<Enum>` field.
    pub(crate) fn choice_type(&self) -> &Type {
        get_option_inner_type(self.ty).unwrap_or_else(|| {
            panic!(
                "flattened field `{}` must be declared as Option<ChoiceEnum>",
                self.ident
            )
        })
    }
}

/// One variant of a choice or resource enum: a single unnamed field.
pub(crate) struct EnumVariant<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    /// `valueString` for choice variants, the resource type for registry
    /// variants.
    pub wire: String,
}

pub(crate) fn shape_fields(data: &syn::DataStruct) -> Vec<ShapeField<'_>> {
    let fields = match &data.fields {
        Fields::Named(fields) => &fields.named,
        _ => panic!("FHIR shape derives only support structs with named fields."),
    };
    fields
        .iter()
        .map(|field| ShapeField {
            ident: field.ident.as_ref().expect("named field"),
            ty: &field.ty,
            key: get_effective_field_name(field),
            flatten: is_flattened(field),
        })
        .collect()
}

pub(crate) fn enum_variants(data: &syn::DataEnum) -> Vec<EnumVariant<'_>> {
    data.variants
        .iter()
        .map(|variant| {
            let ty = match &variant.fields {
                Fields::Unnamed(fields) if fields.unnamed.len() == 1 => &fields.unnamed[0].ty,
                _ => panic!(
                    "variant `{}` must wrap exactly one value",
                    variant.ident
                ),
            };
            EnumVariant {
                ident: &variant.ident,
                ty,
                wire: get_rename(&variant.attrs).unwrap_or_else(|| variant.ident.to_string()),
            }
        })
        .collect()
}

fn get_rename(attrs: &[Attribute]) -> Option<String> {
    for attr in attrs {
        if attr.path().is_ident("fhir_serde")
            && let Ok(list) =
            attr.parse_args_with(Punctuated::<Meta, token::Comma>::parse_terminated)
        {
            for meta in list {
                if let Meta::NameValue(nv) = meta
                    && nv.path.is_ident("rename")
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

/// Determines the effective field name for FHIR serialization.
///
/// This function extracts the field name that is used as JSON key, XML name
/// and FHIRPath child name, respecting FHIR naming conventions and custom
/// rename attributes.
///
/// # Attribute Processing
///
/// - If `#[fhir_serde(rename = "customName")]` is present, uses the custom name
/// - Otherwise, converts the Rust field name from `snake_case` to `camelCase`
///
/// # Examples
///
/// ```rust,ignore
/// // Field: pub implicit_rules: Option<Uri>
/// // Result: "implicitRules" (camelCase conversion)
///
/// // Field: #[fhir_serde(rename = "type")]
/// //        pub r#type: Option<CodeableConcept>
/// // Result: "type" (explicit rename)
/// ```
pub(crate) fn get_effective_field_name(field: &syn::Field) -> String {
    if let Some(name) = get_rename(&field.attrs) {
        return name;
    }
    // Default to camelCase if no rename attribute found
    field
        .ident
        .as_ref()
        .expect("named field")
        .to_string()
        .trim_start_matches("r#")
        .to_lower_camel_case()
}

/// Checks if a field should be flattened during serialization.
///
/// This function determines whether a field has the `#[fhir_serde(flatten)]` attribute,
/// which marks a FHIR `[x]` choice field: the field's variant is written directly into
/// the parent object under its type-suffixed name rather than as a nested object.
///
/// # Examples
///
/// ```rust,ignore
/// // Regular field (not flattened)
/// pub name: Vec<HumanName>,  // false
///
/// // Flattened choice type field
/// #[fhir_serde(flatten)]
/// pub deceased: Option<PatientDeceased>,  // true
/// ```
pub(crate) fn is_flattened(field: &syn::Field) -> bool {
    for attr in &field.attrs {
        if attr.path().is_ident("fhir_serde")
            && let Ok(list) =
            attr.parse_args_with(Punctuated::<Meta, token::Comma>::parse_terminated)
        {
            for meta in list {
                if let Meta::Path(path) = meta
                    && path.is_ident("flatten")
                {
                    return true;
                }
            }
        }
    }
    false
}

/// `#[fhir_resource]` (with or without arguments) marks a resource shape.
pub(crate) fn is_fhir_resource(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident("fhir_resource"))
}

/// `#[fhir_registry]` marks the enum of all resource shapes.
pub(crate) fn is_fhir_registry(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident("fhir_registry"))
}
