//! # FHIRPath Type Information
//!
//! Type metadata for FHIRPath's `type()` function and for introspection of
//! shapes. [`TypeInfoResult`] names the runtime type of a value;
//! [`TypeDescriptor`] is the static, per-shape description of declared
//! elements and their cardinalities.

/// Type information result for FHIRPath type() function
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfoResult {
    pub namespace: String,
    pub name: String,
}

impl TypeInfoResult {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }
}

impl std::fmt::Display for TypeInfoResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// Compile-time namespace and name of a type.
///
/// Implemented by every shape (usually through `#[derive(TypeInfo)]`), by
/// primitive slots and by choice enums. The values are constants so that they
/// can be used to build the `static` type descriptors of enclosing shapes.
pub trait TypeInfo {
    /// Namespace of the type (`FHIR` or `System`).
    const NAMESPACE: &'static str;

    /// Name of the type within its namespace.
    const NAME: &'static str;

    /// Every type a value of this Rust type can have at runtime.
    ///
    /// A single entry for ordinary shapes; one entry per variant for choice
    /// elements.
    const TYPE_NAMES: &'static [&'static str] = &[Self::NAME];

    fn type_info() -> TypeInfoResult {
        TypeInfoResult::new(Self::NAMESPACE, Self::NAME)
    }
}

impl TypeInfo for String {
    const NAMESPACE: &'static str = "System";
    const NAME: &'static str = "String";
}

impl<T: TypeInfo + ?Sized> TypeInfo for Box<T> {
    const NAMESPACE: &'static str = T::NAMESPACE;
    const NAME: &'static str = T::NAME;
    const TYPE_NAMES: &'static [&'static str] = T::TYPE_NAMES;
}

/// Static description of one declared element of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementDescriptor {
    /// Element name as it appears in FHIRPath (the base name for choices).
    pub name: &'static str,
    /// Admissible type names; more than one only for choice elements.
    pub types: &'static [&'static str],
    pub min: u32,
    /// Upper bound, `None` for `*`.
    pub max: Option<u32>,
    pub is_choice: bool,
}

impl ElementDescriptor {
    /// Whether the element may repeat.
    pub fn is_repeating(&self) -> bool {
        self.max.is_none_or(|max| max > 1)
    }

    /// Cardinality in FHIR notation, e.g. `0..1` or `0..*`.
    pub fn cardinality(&self) -> String {
        match self.max {
            Some(max) => format!("{}..{}", self.min, max),
            None => format!("{}..*", self.min),
        }
    }
}

/// Static description of a shape: its type name and declared elements in
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub namespace: &'static str,
    pub name: &'static str,
    /// `true` for resource shapes (those carrying a `resourceType`).
    pub is_resource: bool,
    pub elements: &'static [ElementDescriptor],
}

impl TypeDescriptor {
    /// Looks up a declared element by name.
    pub fn element(&self, name: &str) -> Option<&'static ElementDescriptor> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn element_names(&self) -> impl Iterator<Item = &'static str> {
        self.elements.iter().map(|e| e.name)
    }

    pub fn type_info(&self) -> TypeInfoResult {
        TypeInfoResult::new(self.namespace, self.name)
    }
}

/// Cardinality and admissible types of a field, derived from its Rust type.
///
/// `Option<T>` is `0..1`, `Vec<T>` is `0..*`; a bare `String` is a required
/// attribute (`1..1`).
pub trait FieldCardinality {
    const MIN: u32;
    const MAX: Option<u32>;
    const TYPES: &'static [&'static str];
}

impl<T: TypeInfo> FieldCardinality for Option<T> {
    const MIN: u32 = 0;
    const MAX: Option<u32> = Some(1);
    const TYPES: &'static [&'static str] = T::TYPE_NAMES;
}

impl<T: TypeInfo> FieldCardinality for Vec<T> {
    const MIN: u32 = 0;
    const MAX: Option<u32> = None;
    const TYPES: &'static [&'static str] = T::TYPE_NAMES;
}

impl FieldCardinality for String {
    const MIN: u32 = 1;
    const MAX: Option<u32> = Some(1);
    const TYPES: &'static [&'static str] = <String as TypeInfo>::TYPE_NAMES;
}
