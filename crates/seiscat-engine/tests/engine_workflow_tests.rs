// Integration tests for submit -> merge -> execute against a small catalog

use rusqlite::Connection;
use seiscat_core::core_types::schema::{EVENT_END_ERROR, EVENT_START, FIELD_ERR_CODE};
use seiscat_core::core_types::RequestContext;
use seiscat_core::logging_facility::test_capture::init_test_capture;
use seiscat_core::{CommandEnvelope, ExErrorKind};
use seiscat_engine::commands::merge::MergeRequest;
use seiscat_engine::commands::submit::SubmitOptions;
use seiscat_engine::{apply_engine_command, EngineCommand, EngineCommandResult, LocatorConfig};
use seiscat_store::repo::{CatalogRepo, EventRow, HypocentreRow};
use seiscat_store::{CommandRepo, CommandStatus};

fn setup_catalog() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    seiscat_store::migrations::apply_migrations(&mut conn).unwrap();
    CatalogRepo::insert_event(
        &conn,
        &EventRow {
            evid: 100,
            prime_hypid: Some(2001),
            ..Default::default()
        },
    )
    .unwrap();
    for hypid in [2001, 2002] {
        CatalogRepo::insert_hypocentre(
            &conn,
            &HypocentreRow {
                hypid,
                evid: 100,
                agency: "ISC".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
    }
    conn
}

fn submit(conn: &mut Connection, envelope: CommandEnvelope) -> i64 {
    let cmd = EngineCommand::Submit {
        envelope,
        options: SubmitOptions {
            evid: Some(100),
            analyst: "jdoe".to_string(),
            strict: false,
        },
    };
    match apply_engine_command(cmd, conn, None, &RequestContext::new()).unwrap() {
        EngineCommandResult::Submitted(r) => r.command_id,
        other => panic!("unexpected result {:?}", other),
    }
}

fn execute(
    conn: &mut Connection,
    command_id: i64,
    locator: Option<&LocatorConfig>,
) -> seiscat_store::Result<EngineCommandResult> {
    apply_engine_command(
        EngineCommand::Execute { command_id },
        conn,
        locator,
        &RequestContext::new(),
    )
}

#[cfg(unix)]
#[test]
fn test_merge_then_execute_applies_all_statements() {
    let mut conn = setup_catalog();
    let a = submit(&mut conn, CommandEnvelope::set_prime(100, 2002, "ISC"));
    let b = submit(&mut conn, CommandEnvelope::assess(100, "ISC"));

    let merged = match apply_engine_command(
        EngineCommand::Merge(MergeRequest {
            command_ids: vec![a, b],
            evid: 100,
            agency: "ISC".to_string(),
            analyst: "jdoe".to_string(),
        }),
        &mut conn,
        None,
        &RequestContext::new(),
    )
    .unwrap()
    {
        EngineCommandResult::Merged(r) => r,
        other => panic!("unexpected result {:?}", other),
    };
    assert_eq!(merged.summary, "[1] Setprime ISC [2] assess 100 ");

    // The merge carries do_gridsearch=0, so a locator must be configured
    let err = execute(&mut conn, merged.command_id, None).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Config);
    assert_eq!(
        CommandRepo::require(&conn, merged.command_id).unwrap().status,
        CommandStatus::Pending
    );

    let locator = LocatorConfig::new("true");
    let result = execute(&mut conn, merged.command_id, Some(&locator)).unwrap();
    let EngineCommandResult::Executed(result) = result else {
        panic!("unexpected result");
    };
    assert_eq!(result.statements_run, 2);

    let event = CatalogRepo::get_event(&conn, 100).unwrap().unwrap();
    assert_eq!(event.prime_hypid, Some(2002));
    assert!(event.assessed);
    assert_eq!(
        CommandRepo::require(&conn, merged.command_id).unwrap().status,
        CommandStatus::Executed
    );
}

#[test]
fn test_failed_statement_rolls_back_whole_command() {
    let mut conn = setup_catalog();
    let mut batch = CommandEnvelope::new("merge", "seisevent", 100, "ISC");
    batch.add_executable_statement(
        seiscat_core::ExecutableStatement::new("banish_event").param(100),
    );
    // 2001 is prime, so this is rejected
    batch.add_executable_statement(
        seiscat_core::ExecutableStatement::new("delete_hypocentre").param(2001),
    );
    let id = submit(&mut conn, batch);

    let err = execute(&mut conn, id, None).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::StatementFailed);
    assert_eq!(err.command_id(), Some(id));
    assert!(err.request_id().is_some());
    assert!(!CatalogRepo::get_event(&conn, 100).unwrap().unwrap().banished);
    assert_eq!(
        CommandRepo::require(&conn, id).unwrap().status,
        CommandStatus::Failed
    );

    let again = execute(&mut conn, id, None).unwrap_err();
    assert_eq!(again.kind(), ExErrorKind::NotPending);
}

#[cfg(unix)]
#[test]
fn test_locator_output_is_collected_and_saved() {
    let mut conn = setup_catalog();
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("relocation.out");

    let mut relocate = CommandEnvelope::relocate(100, "ISC");
    relocate.add_locator_argument("fix_depth=10");
    let id = submit(&mut conn, relocate);

    let locator = LocatorConfig {
        output_path: Some(output_path.clone()),
        ..LocatorConfig::new("echo")
    };
    let EngineCommandResult::Executed(result) = execute(&mut conn, id, Some(&locator)).unwrap()
    else {
        panic!("unexpected result");
    };

    assert_eq!(result.statements_run, 0);
    assert_eq!(result.locator_output, vec![vec!["100 fix_depth=10".to_string()]]);
    assert_eq!(
        std::fs::read_to_string(&output_path).unwrap(),
        "100 fix_depth=10\n"
    );
}

#[cfg(unix)]
#[test]
fn test_failing_locator_is_external_process_error() {
    let mut conn = setup_catalog();
    let mut relocate = CommandEnvelope::relocate(100, "ISC");
    relocate.add_locator_argument("do_gridsearch=1");
    let id = submit(&mut conn, relocate);

    let err = execute(&mut conn, id, Some(&LocatorConfig::new("false"))).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ExternalProcess);
    assert_eq!(err.target_id(), Some(100));
}

#[test]
fn test_operation_boundaries_are_logged() {
    let capture = init_test_capture();
    let mut conn = setup_catalog();
    let ctx = RequestContext::new().follow_up();

    let err = apply_engine_command(
        EngineCommand::Execute { command_id: 424242 },
        &mut conn,
        None,
        &ctx,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.request_id(), Some(&ctx.request_id));
    assert_eq!(err.trace_id(), ctx.trace_id.as_ref());

    let events = capture.events_for_request(ctx.request_id.as_str());
    let kinds: Vec<_> = events.iter().filter_map(|e| e.event()).collect();
    assert_eq!(kinds, vec![EVENT_START, EVENT_END_ERROR]);
    assert_eq!(events[1].op(), Some("execute_command"));
    assert_eq!(events[1].field(FIELD_ERR_CODE), Some("ERR_NOT_FOUND"));
}
