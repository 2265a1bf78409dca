// Integration tests for the store-side catalog operations

use rusqlite::Connection;
use seiscat_core::executor::run_statements;
use seiscat_core::{CommandEnvelope, ExecutableStatement, SeisCatError, StatementExecutor};
use seiscat_store::repo::{CatalogRepo, EventRow, HypocentreRow, PhaseRow};
use seiscat_store::SqliteStatementExecutor;
use serde_json::json;

/// Event 100 with prime hypocentre 2001 and a second hypocentre 2002;
/// event 200 with prime 3001. Phase 9001 is associated with 2002.
fn setup_catalog() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    seiscat_store::migrations::apply_migrations(&mut conn).unwrap();

    for (evid, prime) in [(100, 2001), (200, 3001)] {
        CatalogRepo::insert_event(
            &conn,
            &EventRow {
                evid,
                prime_hypid: Some(prime),
                ..Default::default()
            },
        )
        .unwrap();
    }
    for (hypid, evid, agency) in [(2001, 100, "ISC"), (2002, 100, "NEIC"), (3001, 200, "ISC")] {
        CatalogRepo::insert_hypocentre(
            &conn,
            &HypocentreRow {
                hypid,
                evid,
                agency: agency.to_string(),
                depth: Some(10.0),
                ..Default::default()
            },
        )
        .unwrap();
    }
    CatalogRepo::insert_phase(
        &conn,
        &PhaseRow {
            phid: 9001,
            evid: 100,
            hypid: Some(2002),
            sta: "ARCES".to_string(),
            phase: Some("P".to_string()),
            timedef: true,
            ..Default::default()
        },
    )
    .unwrap();
    conn
}

fn run(conn: &Connection, env: &CommandEnvelope) -> Result<usize, SeisCatError> {
    run_statements(&SqliteStatementExecutor::new(conn), env.statements())
}

#[test]
fn test_set_prime_within_event() {
    let conn = setup_catalog();

    run(&conn, &CommandEnvelope::set_prime(100, 2002, "NEIC")).unwrap();

    let event = CatalogRepo::get_event(&conn, 100).unwrap().unwrap();
    assert_eq!(event.prime_hypid, Some(2002));
}

#[test]
fn test_set_prime_from_other_event_is_rejected() {
    let conn = setup_catalog();

    let err = run(&conn, &CommandEnvelope::set_prime(100, 3001, "ISC")).unwrap_err();

    assert_eq!(
        err,
        SeisCatError::StatementFailed {
            statement: "set_prime(100, 3001)".to_string(),
            sentinel: 2
        }
    );
}

#[test]
fn test_banish_and_unbanish() {
    let conn = setup_catalog();

    run(&conn, &CommandEnvelope::banish_event(100, "ISC")).unwrap();
    assert!(CatalogRepo::get_event(&conn, 100).unwrap().unwrap().banished);

    run(&conn, &CommandEnvelope::unbanish_event(100, "ISC")).unwrap();
    assert!(!CatalogRepo::get_event(&conn, 100).unwrap().unwrap().banished);
}

#[test]
fn test_banish_missing_event_reports_not_found() {
    let conn = setup_catalog();
    let exec = SqliteStatementExecutor::new(&conn);

    let sentinel = exec
        .execute(&ExecutableStatement::new("banish_event").param(999))
        .unwrap();
    assert_eq!(sentinel, 1);
}

#[test]
fn test_move_hypocentre_takes_its_phases() {
    let conn = setup_catalog();

    run(&conn, &CommandEnvelope::move_hypocentre(2002, 100, 200, "NEIC")).unwrap();

    assert_eq!(
        CatalogRepo::get_hypocentre(&conn, 2002).unwrap().unwrap().evid,
        200
    );
    assert_eq!(CatalogRepo::get_phase(&conn, 9001).unwrap().unwrap().evid, 200);
}

#[test]
fn test_prime_hypocentre_cannot_be_moved_or_deleted() {
    let conn = setup_catalog();
    let exec = SqliteStatementExecutor::new(&conn);

    let moved = exec
        .execute(&ExecutableStatement::new("move_hypocentre").param(2001).param(200))
        .unwrap();
    let deleted = exec
        .execute(&ExecutableStatement::new("delete_hypocentre").param(2001))
        .unwrap();

    assert_eq!(moved, 2);
    assert_eq!(deleted, 2);
}

#[test]
fn test_delete_hypocentre_deprecates_row() {
    let conn = setup_catalog();

    run(&conn, &CommandEnvelope::delete_hypocentre(2002, "NEIC")).unwrap();

    let live: Vec<i64> = CatalogRepo::list_hypocentres(&conn, 100)
        .unwrap()
        .iter()
        .map(|h| h.hypid)
        .collect();
    assert_eq!(live, vec![2001]);
    assert!(CatalogRepo::get_hypocentre(&conn, 2002).unwrap().unwrap().deprecated);
}

#[test]
fn test_create_event_splits_hypocentre() {
    let conn = setup_catalog();

    run(&conn, &CommandEnvelope::create_event(2002, "NEIC")).unwrap();

    let hyp = CatalogRepo::get_hypocentre(&conn, 2002).unwrap().unwrap();
    assert_eq!(hyp.evid, 201);
    let event = CatalogRepo::get_event(&conn, 201).unwrap().unwrap();
    assert_eq!(event.prime_hypid, Some(2002));
}

#[test]
fn test_hypocentre_edit_binds_values() {
    let conn = setup_catalog();
    let mut env = CommandEnvelope::hypocentre_edit(2001, "ISC");
    env.record_field_edit("depth", json!(33.5), Some(json!(10.0)));
    env.record_field_edit("fix_depth", json!(true), None);

    assert_eq!(run(&conn, &env).unwrap(), 2);

    let hyp = CatalogRepo::get_hypocentre(&conn, 2001).unwrap().unwrap();
    assert_eq!(hyp.depth, Some(33.5));
    assert!(hyp.fix_depth);
}

#[test]
fn test_hypocentre_edit_rejects_values_of_the_wrong_type() {
    let conn = setup_catalog();
    let exec = SqliteStatementExecutor::new(&conn);

    for (field, value) in [
        ("depth", json!("deep")),
        ("fix_depth", json!("yes")),
        ("nass", json!(2.5)),
    ] {
        let stmt = ExecutableStatement::new("edit_hypocentre")
            .param(2001)
            .param(field)
            .param(value);
        let err = exec.execute(&stmt).unwrap_err();
        assert!(
            matches!(err, SeisCatError::InvalidStatementParams { .. }),
            "{field}: {err:?}"
        );
    }

    // The row still reads back with its original values
    let hyp = CatalogRepo::get_hypocentre(&conn, 2001).unwrap().unwrap();
    assert_eq!(hyp.depth, Some(10.0));
    assert!(!hyp.fix_depth);
}

#[test]
fn test_phase_flag_edit_takes_booleans_only() {
    let conn = setup_catalog();
    let exec = SqliteStatementExecutor::new(&conn);
    let edit = |value: serde_json::Value| {
        ExecutableStatement::new("edit_phase")
            .param(9001)
            .param("nondef")
            .param(value)
    };

    assert_eq!(exec.execute(&edit(json!(true))).unwrap(), 0);
    assert!(exec.execute(&edit(json!("true"))).is_err());
    assert!(CatalogRepo::get_phase(&conn, 9001).unwrap().unwrap().nondef);
}

#[test]
fn test_edit_of_deleted_hypocentre_reports_not_found() {
    let conn = setup_catalog();
    run(&conn, &CommandEnvelope::delete_hypocentre(2002, "ISC")).unwrap();

    let mut env = CommandEnvelope::hypocentre_edit(2002, "NEIC");
    env.record_field_edit("depth", json!(40), None);

    let err = run(&conn, &env).unwrap_err();
    assert!(matches!(err, SeisCatError::StatementFailed { sentinel: 1, .. }));
    assert_eq!(
        CatalogRepo::get_hypocentre(&conn, 2002).unwrap().unwrap().depth,
        Some(10.0)
    );
}

#[test]
fn test_phase_edit_rejects_unlisted_field() {
    let conn = setup_catalog();
    let mut env = CommandEnvelope::phase_edit(9001, "ISC");
    env.record_field_edit("phase", json!("Pn"), Some(json!("P")));
    env.record_field_edit("sta; DROP TABLE phases", json!("X"), None);

    let err = run(&conn, &env).unwrap_err();
    assert!(matches!(err, SeisCatError::StatementFailed { sentinel: 3, .. }));

    // The table is untouched by the rejected field name
    assert_eq!(
        CatalogRepo::get_phase(&conn, 9001).unwrap().unwrap().sta,
        "ARCES"
    );
}

#[test]
fn test_assess_and_commit_set_flags() {
    let conn = setup_catalog();

    run(&conn, &CommandEnvelope::assess(100, "ISC")).unwrap();
    run(&conn, &CommandEnvelope::commit(100, "ISC")).unwrap();

    let event = CatalogRepo::get_event(&conn, 100).unwrap().unwrap();
    assert!(event.assessed);
    assert!(event.committed);
}
