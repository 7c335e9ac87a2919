/// Registration and payload error paths: duplicate/unknown objects,
/// unsupported types, truncated payloads, storage type mismatches, and
/// dirty-state preservation across failed serialize calls.
use std::{cell::RefCell, rc::Rc};

use fieldsync::{
    CodecError, DiffTracked, FieldBinding, ObjectId, SerializerConfig, SyncError, SyncHandler,
    SyncObject, TypeTag,
};

fn tracked_int(initial: i32) -> Rc<RefCell<DiffTracked<i32>>> {
    Rc::new(RefCell::new(DiffTracked::new(initial)))
}

#[test]
fn duplicate_registration_fails_without_touching_schema() {
    let mut handler = SyncHandler::new();
    handler
        .register_sync_object(SyncObject::instance(
            "player",
            vec![FieldBinding::tracked("health", TypeTag::Int, tracked_int(1))],
        ))
        .unwrap();

    let result = handler.register_sync_object(SyncObject::instance(
        "player",
        vec![FieldBinding::tracked("health", TypeTag::Int, tracked_int(2))],
    ));

    assert_eq!(
        result,
        Err(SyncError::DuplicateRegistration {
            object: ObjectId::new("player"),
        })
    );
    assert_eq!(handler.schema().len(), 1);
}

#[test]
fn unregistering_unknown_object_fails() {
    let mut handler = SyncHandler::new();
    let result = handler.unregister_sync_object(&ObjectId::new("ghost"));
    assert_eq!(
        result,
        Err(SyncError::NotRegistered {
            object: ObjectId::new("ghost"),
        })
    );
}

#[test]
fn unregistering_removes_the_objects_fields() {
    let mut handler = SyncHandler::new();
    handler
        .register_sync_object(SyncObject::instance(
            "a",
            vec![FieldBinding::tracked("x", TypeTag::Int, tracked_int(0))],
        ))
        .unwrap();
    handler
        .register_sync_object(SyncObject::instance(
            "b",
            vec![FieldBinding::tracked("y", TypeTag::Int, tracked_int(0))],
        ))
        .unwrap();
    assert_eq!(handler.schema().len(), 2);

    handler.unregister_sync_object(&ObjectId::new("b")).unwrap();
    assert_eq!(handler.schema().len(), 1);

    // Re-registering after removal is allowed.
    handler
        .register_sync_object(SyncObject::instance(
            "b",
            vec![FieldBinding::tracked("y", TypeTag::Int, tracked_int(0))],
        ))
        .unwrap();
    assert_eq!(handler.schema().len(), 2);
}

#[test]
fn unknown_type_tag_fails_registration_all_or_nothing() {
    let mut handler = SyncHandler::new();

    // The first binding is valid; the second has no codec. Nothing may be
    // appended.
    let result = handler.register_sync_object(SyncObject::instance(
        "entity",
        vec![
            FieldBinding::tracked("ok", TypeTag::Int, tracked_int(0)),
            FieldBinding::tracked("bad", TypeTag::Custom("quaternion"), tracked_int(0)),
        ],
    ));

    assert_eq!(
        result,
        Err(SyncError::UnsupportedType {
            type_tag: TypeTag::Custom("quaternion"),
        })
    );
    assert!(handler.schema().is_empty());
}

#[test]
fn truncated_payload_is_rejected() {
    let health = tracked_int(300_000);
    let mut local = SyncHandler::new();
    local
        .register_sync_object(SyncObject::instance(
            "player",
            vec![FieldBinding::tracked("health", TypeTag::Int, health)],
        ))
        .unwrap();
    let payload = local.serialize().unwrap();
    assert!(payload.len() > 1);

    let mut remote = SyncHandler::new();
    remote
        .register_sync_object(SyncObject::instance(
            "player",
            vec![FieldBinding::tracked("health", TypeTag::Int, tracked_int(0))],
        ))
        .unwrap();

    let truncated = &payload[..1];
    assert_eq!(
        remote.deserialize(truncated),
        Err(SyncError::TruncatedPayload)
    );

    assert_eq!(remote.deserialize(&[]), Err(SyncError::TruncatedPayload));
}

#[test]
fn storage_element_mismatch_surfaces_as_value_type_mismatch() {
    // Sender legitimately syncs a long.
    let wide = Rc::new(RefCell::new(DiffTracked::new(1i64)));
    let mut local = SyncHandler::new();
    local
        .register_sync_object(SyncObject::instance(
            "entity",
            vec![FieldBinding::tracked("value", TypeTag::Long, wide)],
        ))
        .unwrap();
    let payload = local.serialize().unwrap();

    // Receiver's adapter declared the same tag but wired an i32 wrapper.
    let narrow = tracked_int(0);
    let mut remote = SyncHandler::new();
    remote
        .register_sync_object(SyncObject::instance(
            "entity",
            vec![FieldBinding::tracked("value", TypeTag::Long, narrow)],
        ))
        .unwrap();

    let result = remote.deserialize(&payload);
    assert_eq!(
        result,
        Err(SyncError::ValueTypeMismatch {
            field: "value".to_string(),
            expected: TypeTag::Long,
            actual: "long",
        })
    );
}

#[test]
fn failed_serialize_preserves_dirty_state() {
    let value = Rc::new(RefCell::new(DiffTracked::new(5i64)));
    let mut handler = SyncHandler::new();
    handler
        .register_sync_object(SyncObject::instance(
            "entity",
            vec![
                FieldBinding::tracked("value", TypeTag::Long, value.clone())
                    .with_config(SerializerConfig::non_negative()),
            ],
        ))
        .unwrap();
    handler.serialize().unwrap();

    // A negative value under the non_negative flag cannot be encoded.
    value.borrow_mut().set(-3);
    let result = handler.serialize();
    assert_eq!(
        result,
        Err(SyncError::Codec {
            field: "value".to_string(),
            source: CodecError::NegativeValue { value: -3 },
        })
    );

    // The failed pass must not have cleared the change flag; fixing the
    // value and retrying emits it.
    assert!(value.borrow().has_changed());
    value.borrow_mut().set(3);
    let retry = handler.serialize().unwrap();

    let receiver = Rc::new(RefCell::new(DiffTracked::new(0i64)));
    let mut remote = SyncHandler::new();
    remote
        .register_sync_object(SyncObject::instance(
            "entity",
            vec![
                FieldBinding::tracked("value", TypeTag::Long, receiver.clone())
                    .with_config(SerializerConfig::non_negative()),
            ],
        ))
        .unwrap();
    remote.deserialize(&retry).unwrap();
    assert_eq!(*receiver.borrow().get(), 3);
}
