use atrius_fhir_lib::json::{from_json_value, to_json_value};
use atrius_fhir_lib::r5::{
    BodyStructure, Citation, CitationVersionAlgorithm, Observation, Patient, PatientDeceased,
    Resource,
};
use atrius_fhir_lib::xml::{from_xml_str, to_xml_string, to_xml_string_pretty};
use atrius_fhir_lib::{Boolean, FhirError, FhirString};
use serde_json::json;

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[test]
fn test_body_structure_xml_layout() {
    let body: BodyStructure = from_json_value(json!({
        "resourceType": "BodyStructure",
        "active": true,
        "_active": {"id": "a1"},
        "patient": {"reference": "Patient/1"}
    }))
    .unwrap();

    // primitive id is an attribute next to the value, namespace only on the root
    let xml = to_xml_string(&body).unwrap();
    assert_eq!(
        xml,
        format!(
            r#"{}<BodyStructure xmlns="http://hl7.org/fhir"><active id="a1" value="true"/><patient><reference value="Patient/1"/></patient></BodyStructure>"#,
            DECLARATION
        )
    );

    let back: BodyStructure = from_xml_str(&xml).unwrap();
    assert_eq!(back, body);
}

#[test]
fn test_resource_id_is_a_child_element() {
    let xml = r#"<Patient xmlns="http://hl7.org/fhir"><id value="p1"/><active value="false"/></Patient>"#;
    let patient: Patient = from_xml_str(xml).unwrap();
    assert_eq!(patient.id.as_ref().and_then(|id| id.value.as_deref()), Some("p1"));
    assert_eq!(
        to_xml_string(&patient).unwrap(),
        format!("{}{}", DECLARATION, xml)
    );

    // an `id` attribute on a resource root is not declared
    let err = from_xml_str::<Patient>(r#"<Patient xmlns="http://hl7.org/fhir" id="p1"/>"#)
        .unwrap_err();
    assert!(matches!(err, FhirError::UnknownField { .. }));
}

#[test]
fn test_input_order_is_not_checked() {
    let ordered: Patient = from_xml_str(
        r#"<Patient xmlns="http://hl7.org/fhir"><active value="true"/><birthDate value="1974-12-25"/></Patient>"#,
    )
    .unwrap();
    let shuffled: Patient = from_xml_str(
        r#"<Patient xmlns="http://hl7.org/fhir"><birthDate value="1974-12-25"/><active value="true"/></Patient>"#,
    )
    .unwrap();
    assert_eq!(ordered, shuffled);
    assert_eq!(to_xml_string(&shuffled).unwrap(), to_xml_string(&ordered).unwrap());
}

#[test]
fn test_choice_variant_element_name() {
    let citation = Citation {
        version_algorithm: Some(CitationVersionAlgorithm::String(FhirString::new(
            "semver".to_string(),
        ))),
        ..Default::default()
    };
    let xml = to_xml_string(&citation).unwrap();
    assert!(xml.contains(r#"<versionAlgorithmString value="semver"/>"#));
    assert!(!xml.contains("versionAlgorithmCoding"));

    let err = from_xml_str::<Patient>(
        r#"<Patient xmlns="http://hl7.org/fhir"><deceasedBoolean value="true"/><deceasedDateTime value="2020"/></Patient>"#,
    )
    .unwrap_err();
    assert!(matches!(err, FhirError::ConflictingVariant { .. }));

    let patient: Patient = from_xml_str(
        r#"<Patient xmlns="http://hl7.org/fhir"><deceasedBoolean value="true"/></Patient>"#,
    )
    .unwrap();
    assert_eq!(
        patient.deceased,
        Some(PatientDeceased::Boolean(Boolean::new(true)))
    );
}

#[test]
fn test_unknown_element_and_bad_literal() {
    let err = from_xml_str::<Patient>(
        r#"<Patient xmlns="http://hl7.org/fhir"><shoeSize value="44"/></Patient>"#,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        FhirError::UnknownField { ref shape, ref field } if shape == "Patient" && field == "shoeSize"
    ));

    let err = from_xml_str::<Patient>(
        r#"<Patient xmlns="http://hl7.org/fhir"><active value="yes"/></Patient>"#,
    )
    .unwrap_err();
    assert!(matches!(err, FhirError::MalformedPrimitive { .. }));

    // a second single-valued element is not silently dropped
    let err = from_xml_str::<Patient>(
        r#"<Patient xmlns="http://hl7.org/fhir"><active value="true"/><active value="false"/></Patient>"#,
    )
    .unwrap_err();
    assert!(matches!(err, FhirError::UnexpectedToken { .. }));
}

#[test]
fn test_root_name_must_match_shape() {
    let err = from_xml_str::<Patient>(r#"<Observation xmlns="http://hl7.org/fhir"/>"#).unwrap_err();
    assert!(matches!(err, FhirError::UnexpectedToken { .. }));

    // the enum reads whatever the root names
    let resource: Resource = from_xml_str(r#"<Observation xmlns="http://hl7.org/fhir"/>"#).unwrap();
    assert_eq!(resource.resource_type(), "Observation");

    let err = from_xml_str::<Resource>(r#"<Starship xmlns="http://hl7.org/fhir"/>"#).unwrap_err();
    assert!(matches!(err, FhirError::UnknownResourceType(_)));
}

#[test]
fn test_contained_round_trip_across_formats() {
    let source = json!({
        "resourceType": "Observation",
        "id": "o1",
        "contained": [{
            "resourceType": "Patient",
            "id": "p1",
            "name": [{"family": "Chalmers", "given": ["Peter", "James"]}],
            "birthDate": "1974-12"
        }],
        "status": "final",
        "code": {"coding": [{"system": "http://loinc.org", "code": "29463-7"}]},
        "subject": {"reference": "#p1"},
        "effectiveDateTime": "2024-03-01T09:30:00Z",
        "valueQuantity": {
            "value": 72.50,
            "unit": "kg",
            "system": "http://unitsofmeasure.org",
            "code": "kg"
        }
    });
    let observation: Observation = from_json_value(source).unwrap();

    let xml = to_xml_string(&observation).unwrap();
    assert!(xml.contains(
        r#"<contained><Patient><id value="p1"/><name><family value="Chalmers"/><given value="Peter"/><given value="James"/></name><birthDate value="1974-12"/></Patient></contained>"#
    ));
    // only the document root carries the namespace
    assert_eq!(xml.matches("xmlns=").count(), 1);

    let from_xml: Observation = from_xml_str(&xml).unwrap();
    assert_eq!(from_xml, observation);
    assert_eq!(to_json_value(&from_xml), to_json_value(&observation));
}

#[test]
fn test_contained_wrapper_holds_one_resource() {
    let err = from_xml_str::<Observation>(
        r#"<Observation xmlns="http://hl7.org/fhir"><contained/></Observation>"#,
    )
    .unwrap_err();
    assert!(matches!(err, FhirError::UnexpectedToken { .. }));
}

#[test]
fn test_primitive_metadata_round_trip() {
    let xml = r#"<Patient xmlns="http://hl7.org/fhir"><extension url="http://example.org/flag"><valueBoolean value="true"/></extension><active id="a1" value="true"><extension url="http://example.org/source"><extension url="http://example.org/detail"><valueString value="clinic"/></extension></extension></active><name><family value="O&apos;Brien &amp; &lt;Sons&gt;"/></name><deceasedBoolean id="d1" value="false"/></Patient>"#;
    let patient: Patient = from_xml_str(xml).unwrap();

    let active = patient.active.as_ref().unwrap();
    assert_eq!(active.id.as_deref(), Some("a1"));
    assert_eq!(active.value, Some(true));
    assert_eq!(active.extension[0].url, "http://example.org/source");
    assert_eq!(active.extension[0].extension[0].url, "http://example.org/detail");
    assert_eq!(
        patient.name[0].family.as_ref().and_then(|f| f.value.as_deref()),
        Some("O'Brien & <Sons>")
    );
    match &patient.deceased {
        Some(PatientDeceased::Boolean(flag)) => {
            assert_eq!(flag.id.as_deref(), Some("d1"));
            assert_eq!(flag.value, Some(false));
        }
        other => panic!("expected deceasedBoolean, got {:?}", other),
    }

    // the same content seen through JSON
    assert_eq!(
        to_json_value(&patient),
        json!({
            "resourceType": "Patient",
            "extension": [{"url": "http://example.org/flag", "valueBoolean": true}],
            "active": true,
            "_active": {
                "id": "a1",
                "extension": [{
                    "extension": [{"url": "http://example.org/detail", "valueString": "clinic"}],
                    "url": "http://example.org/source"
                }]
            },
            "name": [{"family": "O'Brien & <Sons>"}],
            "deceasedBoolean": false,
            "_deceasedBoolean": {"id": "d1"}
        })
    );

    let written = to_xml_string(&patient).unwrap();
    let back: Patient = from_xml_str(&written).unwrap();
    assert_eq!(back, patient);
    assert_eq!(to_xml_string(&back).unwrap(), written);
}

#[test]
fn test_empty_primitive_element_rejected() {
    let err = from_xml_str::<Patient>(r#"<Patient xmlns="http://hl7.org/fhir"><active/></Patient>"#)
        .unwrap_err();
    assert!(matches!(err, FhirError::MalformedMetadata { .. }));
}

#[test]
fn test_pretty_output_reads_back() {
    let patient: Patient = from_json_value(json!({
        "resourceType": "Patient",
        "id": "p1",
        "name": [{"family": "Chalmers"}],
        "active": true
    }))
    .unwrap();
    let pretty = to_xml_string_pretty(&patient).unwrap();
    assert!(pretty.contains("\n  <id value=\"p1\"/>"));
    assert_eq!(from_xml_str::<Patient>(&pretty).unwrap(), patient);
}
