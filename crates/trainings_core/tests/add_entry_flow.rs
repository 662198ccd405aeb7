use trainings_core::{
    validate_new_entry, Entry, Icon, Orientation, RecordStore, SessionConfig, SessionError, SqliteRecordStore,
    TrainingSession, ValidationError, DEFAULT_STORE_NAME,
};

fn fresh_session() -> TrainingSession<SqliteRecordStore> {
    let store = SqliteRecordStore::open_in_memory(DEFAULT_STORE_NAME).unwrap();
    TrainingSession::start(store, None, Orientation::Portrait, &SessionConfig::default()).unwrap()
}

fn submit(
    session: &mut TrainingSession<SqliteRecordStore>,
    name: &str,
    description: &str,
    icon: Icon,
) -> Result<Entry, SessionError> {
    let form = session.open_add_form();
    form.set_name(name);
    form.set_description(description);
    form.select_icon(icon);
    session.submit_add_form()
}

#[test]
fn distinct_submits_append_in_call_order() {
    let mut session = fresh_session();
    let names = ["Yoga", "Boxeo", "Natación", "Escalada"];
    for name in names {
        submit(&mut session, name, "desc", Icon::Voleibol).unwrap();
    }

    assert_eq!(session.entries().len(), 4 + names.len());
    let tail: Vec<&str> = session.entries()[4..]
        .iter()
        .map(|entry| entry.name.as_str())
        .collect();
    assert_eq!(tail, names);
}

#[test]
fn duplicate_under_any_casing_is_rejected_with_original_name() {
    let mut session = fresh_session();

    for attempt in ["pilates", "PILATES", "PiLaTeS", "  pilates  "] {
        let err = submit(&mut session, attempt, "x", Icon::Voleibol).unwrap_err();
        match err {
            SessionError::Validation(ValidationError::DuplicateName { existing }) => {
                assert_eq!(existing, "Pilates");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(session.entries().len(), 4);
    }
}

#[test]
fn duplicate_of_user_added_entry_is_rejected() {
    let mut session = fresh_session();
    submit(&mut session, "Yoga", "uno", Icon::Running).unwrap();

    let err = submit(&mut session, "yOgA", "dos", Icon::Running).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::DuplicateName { ref existing }) if existing == "Yoga"
    ));
    assert_eq!(session.entries().len(), 5);
}

#[test]
fn blank_fields_fail_before_duplicate_check() {
    let mut session = fresh_session();

    let err = submit(&mut session, "   ", "x", Icon::Pilates).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::EmptyName)
    ));

    let err = submit(&mut session, "Pilates", "\t", Icon::Pilates).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::EmptyDescription)
    ));
    assert_eq!(session.entries().len(), 4);
}

#[test]
fn failed_submit_keeps_form_open_with_fields() {
    let mut session = fresh_session();
    submit(&mut session, "fuerza", "otra", Icon::Running).unwrap_err();

    let form = session.add_form().expect("form should stay open");
    assert_eq!(form.name(), "fuerza");
    assert_eq!(form.description(), "otra");
    assert_eq!(form.icon(), Icon::Running);

    session.add_form_mut().unwrap().set_name("Fuerza explosiva");
    let entry = session.submit_add_form().unwrap();
    assert_eq!(entry.name, "Fuerza explosiva");
    assert!(session.add_form().is_none());
}

#[test]
fn successful_submit_is_persisted() {
    let mut session = fresh_session();
    let entry = submit(&mut session, " Yoga ", " Estiramientos ", Icon::Fuerza).unwrap();
    assert_eq!(entry.name, "Yoga");
    assert_eq!(entry.description, "Estiramientos");

    let stored = session.store().load().unwrap().unwrap();
    assert_eq!(stored.last(), Some(&entry));
    assert_eq!(stored.len(), 5);
}

#[test]
fn new_form_defaults_to_first_icon() {
    let mut session = fresh_session();
    session.open_add_form().set_name("Yoga");
    session.add_form_mut().unwrap().set_description("Estiramientos");
    let entry = session.submit_add_form().unwrap();
    assert_eq!(entry.icon, Icon::Pilates);
}

#[test]
fn cancel_closes_form_without_changes() {
    let mut session = fresh_session();
    session.open_add_form().set_name("Yoga");
    session.cancel_add_form();

    assert!(session.add_form().is_none());
    assert_eq!(session.entries().len(), 4);
}

#[test]
fn duplicate_check_matches_final_sigma_and_dotted_capital_i() {
    let existing = vec![
        Entry::new("οδοσ", "camino", Icon::Running),
        Entry::new("istanbul run", "carrera", Icon::Running),
    ];

    let err = validate_new_entry("ΟΔΟΣ", "y", Icon::Pilates, &existing).unwrap_err();
    assert_eq!(
        err,
        ValidationError::DuplicateName {
            existing: "οδοσ".to_string()
        }
    );

    let err = validate_new_entry("İstanbul run", "y", Icon::Pilates, &existing).unwrap_err();
    assert_eq!(
        err,
        ValidationError::DuplicateName {
            existing: "istanbul run".to_string()
        }
    );

    let mut session = fresh_session();
    submit(&mut session, "οδος", "uno", Icon::Fuerza).unwrap();
    let err = submit(&mut session, "ΟΔΟΣ", "dos", Icon::Fuerza).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::DuplicateName { .. })
    ));
    assert_eq!(session.entries().len(), 5);
}
