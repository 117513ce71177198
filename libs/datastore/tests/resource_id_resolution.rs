//! End-to-end resolution of resource ids against an in-process backend.

use serde_json::Value;
use strata_datastore::{Client, ClientConfig, DatastoreError, Entity, MemoryBackend};
use strata_resource_id::key_path;

fn client() -> Client {
    Client::new(ClientConfig::default(), MemoryBackend::new())
}

#[test]
fn resolves_entity_by_resource_id() {
    let client = client();
    let key = client.key(key_path!["UserEntity", 9999]).unwrap();
    let mut entity = Entity::new(key.clone());
    entity.set("username", "test");
    client.put(entity).unwrap();

    let resource_id = key.to_resource_id().unwrap();
    assert_eq!(resource_id, "VXNlckVudGl0eR4fOTk5OQ");

    let found = client
        .entity_by_resource_id("UserEntity", &resource_id)
        .unwrap()
        .expect("entity should resolve");
    assert_eq!(found.get("username"), Some(&Value::from("test")));
}

#[test]
fn valid_id_with_no_record_is_none() {
    let client = client();
    let found = client
        .entity_by_resource_id("UserEntity", "VXNlckVudGl0eR4fMQ")
        .unwrap();
    assert!(found.is_none());
}

#[test]
fn kind_mismatch_surfaces_as_invalid_id() {
    let client = client();

    // The id decodes cleanly, but to kind UserEntity; the public resolve
    // path must not leak the precise mismatch.
    let err = client
        .entity_by_resource_id("Event", "VXNlckVudGl0eR4fMQ")
        .unwrap_err();
    assert_eq!(
        err,
        DatastoreError::InvalidId {
            resource_id: "VXNlckVudGl0eR4fMQ".to_string(),
        }
    );
}

#[test]
fn malformed_ids_surface_as_invalid_id() {
    let client = client();

    // Empty, impossible base64 length, bad alphabet, odd token count:
    // callers see one error shape for all of them.
    for resource_id in ["", "VXNlckVudGl0eR5k3", "!!!!", "VXNlckVudGl0eQ"] {
        let err = client
            .entity_by_resource_id("UserEntity", resource_id)
            .unwrap_err();
        assert_eq!(
            err,
            DatastoreError::InvalidId {
                resource_id: resource_id.to_string(),
            },
            "for {:?}",
            resource_id
        );
    }
}

#[test]
fn key_from_resource_id_surfaces_precise_errors() {
    let client = client();

    let err = client.key_from_resource_id("VXNlckVudGl0eR5k3").unwrap_err();
    let DatastoreError::Codec(codec_err) = err else {
        panic!("expected a codec error, got {:?}", err);
    };
    assert!(codec_err.is_invalid_resource_id());

    let err = client.key_from_resource_id("VXNlckVudGl0eQ").unwrap_err();
    let DatastoreError::Codec(codec_err) = err else {
        panic!("expected a codec error, got {:?}", err);
    };
    assert!(codec_err.is_malformed_key());
}

#[test]
fn nested_path_round_trips_through_resolution() {
    let client = client();
    let key = client
        .key(key_path!["Org", "acme", "UserEntity", 42])
        .unwrap();
    client.put(Entity::new(key.clone())).unwrap();

    let resource_id = key.to_resource_id().unwrap();
    let found = client
        .entity_by_resource_id("UserEntity", &resource_id)
        .unwrap()
        .expect("nested entity should resolve");
    assert_eq!(found.key(), &key);
}

#[test]
fn legacy_key_converts_to_resource_id() {
    let key = strata_datastore::legacy::entity_key(
        "Venue",
        "agpzfmFydHMtNjEychALEgVWZW51ZSIFZ2FtdXQM",
    )
    .unwrap();
    assert_eq!(key.to_resource_id().unwrap(), "VmVudWUeZ2FtdXQ");
}
