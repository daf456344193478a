use std::thread;
use atrius_fhir_lib::json::{from_json_str, to_json_string};
use atrius_fhir_lib::r5::Resource;
use atrius_fhir_lib::registry::{resolve, resource_types};
use atrius_fhir_lib::xml::{from_xml_str, to_xml_string};
use atrius_fhir_lib::FhirNode;

const DOCUMENTS: &[&str] = &[
    r#"{"resourceType":"BodyStructure","active":true,"_active":{"id":"a1"},"patient":{"reference":"Patient/1"}}"#,
    r#"{"resourceType":"Patient","id":"p1","name":[{"family":"Chalmers","given":["Peter","James"]}],"deceasedBoolean":false}"#,
    r#"{"resourceType":"Observation","status":"final","valueQuantity":{"value":5.40,"unit":"mg"}}"#,
    r#"{"resourceType":"Citation","versionAlgorithmString":"semver"}"#,
];

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_parallel_decodes_share_the_registry() {
    init_tracing();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                scope.spawn(move || {
                    for round in 0..50 {
                        let input = DOCUMENTS[(worker + round) % DOCUMENTS.len()];
                        let resource: Resource = from_json_str(input).unwrap();
                        assert_eq!(to_json_string(&resource).unwrap(), input);

                        let xml = to_xml_string(&resource).unwrap();
                        let back: Resource = from_xml_str(&xml).unwrap();
                        assert_eq!(back, resource);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    });
}

#[test]
fn test_decoded_values_cross_threads() {
    let resources: Vec<Resource> = DOCUMENTS
        .iter()
        .map(|input| from_json_str(input).unwrap())
        .collect();

    // read-only access from many threads at once
    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for resource in &resources {
                    let resource_type = resource.resource_type();
                    assert!(resource_types().contains(&resource_type));
                    assert_eq!(resolve(resource_type).unwrap().resource_type(), resource_type);
                    assert!(!resource.children(None).is_empty());
                }
            });
        }
    });
}
