use atrius_fhir_lib::json::from_json_value;
use atrius_fhir_lib::r5::{CodeableConcept, Observation, Patient, Quantity, Resource};
use atrius_fhir_lib::{Boolean, Date, FhirError, FhirNode, FhirString, Integer};
use atrius_fhirpath_support::{EvaluationError, EvaluationResult, FhirResourceMetadata};
use rust_decimal_macros::dec;
use serde_json::json;

fn patient(value: serde_json::Value) -> Patient {
    from_json_value(value).unwrap()
}

#[test]
fn test_children_follow_declaration_order() {
    // input order is irrelevant to reflection order
    let p = patient(json!({
        "resourceType": "Patient",
        "birthDate": "1974-12-25",
        "name": [{"family": "Chalmers"}, {"family": "Windsor"}],
        "active": true,
        "id": "p1"
    }));
    let names: Vec<&str> = p.children(None).iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["id", "active", "name", "name", "birthDate"]);

    let filtered = p.children(Some(&["name"]));
    assert_eq!(filtered.len(), 2);
    assert!(filtered.iter().all(|c| c.node.type_info().name == "HumanName"));

    assert!(p.children(Some(&["gender"])).is_empty());
}

#[test]
fn test_type_info_of_nodes() {
    let p = patient(json!({"resourceType": "Patient", "deceasedBoolean": true}));
    let info = p.type_info();
    assert_eq!(info.namespace, "FHIR");
    assert_eq!(info.name, "Patient");

    // a choice child is named by its base and typed by its variant
    let deceased = p.children(Some(&["deceased"]));
    assert_eq!(deceased.len(), 1);
    assert_eq!(deceased[0].node.type_info().name, "boolean");

    let resource = Resource::from(p.clone());
    assert_eq!(resource.type_info().name, "Patient");
    assert_eq!(resource.children(None).len(), p.children(None).len());
}

#[test]
fn test_type_descriptor_describes_declared_elements() {
    let observation = Observation::default();
    let descriptor = observation.type_descriptor();
    assert!(descriptor.is_resource);
    assert_eq!(descriptor.name, "Observation");

    let value = descriptor.element("value").unwrap();
    assert!(value.is_choice);
    assert!(value.types.contains(&"Quantity"));
    assert!(value.types.contains(&"CodeableConcept"));
    assert_eq!(value.cardinality(), "0..1");

    assert_eq!(descriptor.element("performer").unwrap().cardinality(), "0..*");
    assert!(descriptor.element("valueQuantity").is_none());

    assert_eq!(Observation::choice_elements(), &["effective", "value"]);
}

#[test]
fn test_primitive_values_surface() {
    let p = patient(json!({"resourceType": "Patient", "active": true, "gender": "female"}));
    let active = p.children(Some(&["active"]))[0].node;
    assert_eq!(active.primitive_value().and_then(|v| v.as_boolean()), Some(true));

    let gender = p.children(Some(&["gender"]))[0].node;
    assert_eq!(gender.type_info().name, "code");
    assert_eq!(
        gender.primitive_value().as_ref().and_then(|v| v.as_string()).map(String::as_str),
        Some("female")
    );

    // complex shapes have no primitive value
    assert!(p.primitive_value().is_none());
}

#[test]
fn test_equal_and_equivalent_on_element_ids() {
    let a = patient(json!({
        "resourceType": "Patient",
        "active": true,
        "_active": {"id": "left"},
        "name": [{"family": "Chalmers"}]
    }));
    let b = patient(json!({
        "resourceType": "Patient",
        "active": true,
        "_active": {"id": "right"},
        "name": [{"family": "CHALMERS"}]
    }));
    assert_eq!(a.equal(&b), Some(false));
    assert!(a.equivalent(&b));
    assert_eq!(a.equal(&a.clone()), Some(true));
}

#[test]
fn test_equal_and_equivalent_on_resource_ids() {
    let a = patient(json!({"resourceType": "Patient", "id": "p1", "active": true}));
    let b = patient(json!({"resourceType": "Patient", "id": "p2", "active": true}));
    assert_eq!(a.equal(&b), Some(false));
    assert!(a.equivalent(&b));

    let c = patient(json!({"resourceType": "Patient", "id": "p1", "active": false}));
    assert_eq!(a.equal(&c), Some(false));
    assert!(!a.equivalent(&c));
}

#[test]
fn test_equality_of_different_precision_is_unknown() {
    let a = patient(json!({"resourceType": "Patient", "birthDate": "1974"}));
    let b = patient(json!({"resourceType": "Patient", "birthDate": "1974-12-25"}));
    assert_eq!(a.equal(&b), None);
    assert!(!a.equivalent(&b));

    // a definite difference elsewhere still wins
    let c = patient(json!({"resourceType": "Patient", "active": true, "birthDate": "1974-12-25"}));
    let d = patient(json!({"resourceType": "Patient", "active": false, "birthDate": "1974"}));
    assert_eq!(c.equal(&d), Some(false));
}

#[test]
fn test_different_types_are_not_equal() {
    let code = FhirString::new("true".to_string());
    let flag = Boolean::new(true);
    assert_eq!(code.equal(&flag), Some(false));
    assert!(!code.equivalent(&flag));
}

#[test]
fn test_primitive_coercions() {
    let flag = FhirString::new("yes".to_string());
    assert_eq!(flag.to_boolean().unwrap(), EvaluationResult::boolean(true));

    let five = Integer::new(5);
    assert_eq!(five.to_decimal().unwrap().as_decimal(), Some(dec!(5)));
    assert_eq!(
        five.to_string_value().unwrap().as_string().map(String::as_str),
        Some("5")
    );
    assert_eq!(five.to_quantity().unwrap().as_quantity(), Some((dec!(5), &"1".to_string())));

    let date = Date::parse("2024-03").unwrap();
    assert_eq!(
        date.to_date_time().unwrap(),
        EvaluationResult::datetime("2024-03".to_string())
    );

    let err = FhirString::new("abc".to_string()).to_integer().unwrap_err();
    assert!(matches!(err, EvaluationError::NotConvertible { ref to, .. } if *to == "Integer"));
}

#[test]
fn test_quantity_converts_with_its_unit() {
    let weight = Quantity::ucum("72.50", "kg");
    let (value, unit) = match weight.to_quantity().unwrap() {
        EvaluationResult::Quantity(value, unit, _) => (value, unit),
        other => panic!("expected a quantity, got {:?}", other),
    };
    assert_eq!(value, dec!(72.50));
    assert_eq!(unit, "kg");

    // no code and no unit falls back to '1'
    let bare: Quantity = from_json_value(json!({"value": 3})).unwrap();
    assert_eq!(
        bare.to_quantity().unwrap().as_quantity(),
        Some((dec!(3), &"1".to_string()))
    );
}

#[test]
fn test_complex_shapes_are_not_convertible() {
    let concept = CodeableConcept::default();
    let err = concept.to_integer().unwrap_err();
    assert_eq!(
        err,
        EvaluationError::NotConvertible {
            from: "CodeableConcept".to_string(),
            to: "Integer",
        }
    );
    assert!(matches!(FhirError::from(err), FhirError::NotConvertible(_)));

    let p = patient(json!({"resourceType": "Patient", "active": true}));
    assert!(p.to_boolean().is_err());
    assert!(p.to_string_value().is_err());
}
