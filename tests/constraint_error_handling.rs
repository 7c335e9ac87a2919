/// Constraint validation on deserialize, under both policies: `Abort`
/// (default) stops the pass at the first violation, `Skip` keeps applying
/// the remaining fields and reports every violation. Neither rolls back
/// fields that were already applied.
use std::{cell::RefCell, rc::Rc};

use fieldsync::{
    Constraint, ConstraintPolicy, DiffTracked, FieldBinding, GetFn, SetFn, SyncError, SyncHandler,
    SyncHandlerConfig, SyncObject, SyncValue, TypeTag,
};

struct Fixture {
    a: Rc<RefCell<i32>>,
    b: Rc<RefCell<DiffTracked<i32>>>,
    c: Rc<RefCell<i32>>,
}

impl Fixture {
    fn new(a: i32, b: i32, c: i32) -> Self {
        Self {
            a: Rc::new(RefCell::new(a)),
            b: Rc::new(RefCell::new(DiffTracked::new(b))),
            c: Rc::new(RefCell::new(c)),
        }
    }

    fn plain_int(name: &str, cell: &Rc<RefCell<i32>>) -> FieldBinding {
        let get = cell.clone();
        let set = cell.clone();
        FieldBinding::plain(
            name,
            TypeTag::Int,
            Box::new(move || SyncValue::Int(*get.borrow())) as GetFn,
            Box::new(move |value| {
                if let SyncValue::Int(inner) = value {
                    *set.borrow_mut() = inner;
                }
            }) as SetFn,
        )
    }

    /// Field `b` carries the non-negative constraint; `a` and `c` surround
    /// it so partial application is observable.
    fn register(&self, handler: &mut SyncHandler) {
        handler
            .register_sync_object(SyncObject::instance(
                "fixture",
                vec![
                    Self::plain_int("a", &self.a),
                    FieldBinding::tracked("b", TypeTag::Int, self.b.clone())
                        .with_constraint(Constraint::NonNegative),
                    Self::plain_int("c", &self.c),
                ],
            ))
            .unwrap();
    }
}

fn violating_payload() -> Vec<u8> {
    let sender = Fixture::new(10, -4, 30);
    let mut local = SyncHandler::new();
    sender.register(&mut local);
    local.serialize().unwrap()
}

#[test]
fn abort_policy_stops_at_the_violation() {
    let payload = violating_payload();

    let receiver = Fixture::new(0, 7, 0);
    let mut remote = SyncHandler::new();
    receiver.register(&mut remote);

    let result = remote.deserialize(&payload);
    let Err(SyncError::ConstraintViolation(violation)) = result else {
        panic!("expected a constraint violation, got {result:?}");
    };
    assert_eq!(violation.field_index, 1);
    assert_eq!(violation.field_name, "b");
    assert_eq!(violation.constraint, Constraint::NonNegative);
    assert_eq!(violation.value, SyncValue::Int(-4));

    // Earlier field applied (no rollback), violating field untouched,
    // later field never reached.
    assert_eq!(*receiver.a.borrow(), 10);
    assert_eq!(*receiver.b.borrow().get(), 7);
    assert_eq!(*receiver.c.borrow(), 0);
}

#[test]
fn skip_policy_applies_remaining_fields_and_reports() {
    let payload = violating_payload();

    let receiver = Fixture::new(0, 7, 0);
    let mut remote = SyncHandler::with_config(SyncHandlerConfig {
        constraint_policy: ConstraintPolicy::Skip,
        ..SyncHandlerConfig::default()
    });
    receiver.register(&mut remote);

    let violations = remote.deserialize(&payload).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].field_name, "b");
    assert_eq!(violations[0].value, SyncValue::Int(-4));

    assert_eq!(*receiver.a.borrow(), 10);
    assert_eq!(*receiver.b.borrow().get(), 7);
    assert_eq!(*receiver.c.borrow(), 30);
}

#[test]
fn clean_payload_reports_no_violations_under_skip() {
    let sender = Fixture::new(1, 2, 3);
    let mut local = SyncHandler::new();
    sender.register(&mut local);
    let payload = local.serialize().unwrap();

    let receiver = Fixture::new(0, 0, 0);
    let mut remote = SyncHandler::with_config(SyncHandlerConfig {
        constraint_policy: ConstraintPolicy::Skip,
        ..SyncHandlerConfig::default()
    });
    receiver.register(&mut remote);

    assert!(remote.deserialize(&payload).unwrap().is_empty());
    assert_eq!(*receiver.b.borrow().get(), 2);
}

#[test]
fn max_length_constraint_guards_strings() {
    let tag = Rc::new(RefCell::new(DiffTracked::new(String::from("toolongname"))));
    let mut local = SyncHandler::new();
    local
        .register_sync_object(SyncObject::instance(
            "labels",
            vec![FieldBinding::tracked("tag", TypeTag::String, tag)],
        ))
        .unwrap();
    let payload = local.serialize().unwrap();

    let short = Rc::new(RefCell::new(DiffTracked::new(String::from("ok"))));
    let mut remote = SyncHandler::new();
    remote
        .register_sync_object(SyncObject::instance(
            "labels",
            vec![
                FieldBinding::tracked("tag", TypeTag::String, short.clone())
                    .with_constraint(Constraint::MaxLength(8)),
            ],
        ))
        .unwrap();

    let result = remote.deserialize(&payload);
    assert!(matches!(result, Err(SyncError::ConstraintViolation(_))));
    assert_eq!(*short.borrow().get(), "ok");
}

/// The concrete scenario from the design discussion: an instance field
/// `count: int >= 0` (initial 5) and a static field `flag: bool`
/// (initial true).
#[test]
fn count_and_flag_scenario() {
    struct Peer {
        count: Rc<RefCell<DiffTracked<i32>>>,
        flag: Rc<RefCell<bool>>,
        handler: SyncHandler,
    }

    impl Peer {
        fn new() -> Self {
            let count = Rc::new(RefCell::new(DiffTracked::new(5i32)));
            let flag = Rc::new(RefCell::new(true));
            let mut handler = SyncHandler::new();
            handler
                .register_sync_object(SyncObject::instance(
                    "entity",
                    vec![
                        FieldBinding::tracked("count", TypeTag::Int, count.clone())
                            .with_constraint(Constraint::NonNegative),
                    ],
                ))
                .unwrap();
            let flag_get = flag.clone();
            let flag_set = flag.clone();
            handler
                .register_sync_object(SyncObject::static_scope(
                    "settings",
                    vec![FieldBinding::plain(
                        "flag",
                        TypeTag::Bool,
                        Box::new(move || SyncValue::Bool(*flag_get.borrow())) as GetFn,
                        Box::new(move |value| {
                            if let SyncValue::Bool(inner) = value {
                                *flag_set.borrow_mut() = inner;
                            }
                        }) as SetFn,
                    )],
                ))
                .unwrap();
            Self {
                count,
                flag,
                handler,
            }
        }
    }

    let mut local = Peer::new();
    let mut remote = Peer::new();

    // Peers agree before exchanging anything.
    let f1 = local.handler.generate_mismatch_check();
    assert!(remote.handler.do_mismatch_check(f1.as_bytes()));

    local.count.borrow_mut().set(9);
    let good_payload = local.handler.serialize().unwrap();

    local.count.borrow_mut().set(-1);
    let bad_payload = local.handler.serialize().unwrap();

    let result = remote.handler.deserialize(&bad_payload);
    assert!(matches!(result, Err(SyncError::ConstraintViolation(_))));
    // The constrained field's previous value survives the rejection.
    assert_eq!(*remote.count.borrow().get(), 5);

    remote.handler.deserialize(&good_payload).unwrap();
    assert_eq!(*remote.count.borrow().get(), 9);
    assert!(*remote.flag.borrow());
}
