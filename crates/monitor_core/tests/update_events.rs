use std::sync::Once;

use monitor_core::{
    update, Category, JobId, JobRecord, JobStatus, MonitorState, Msg, StreamEvent, ViewChange,
};
use pretty_assertions::assert_eq;

const JOB: &str = "a1b2c3d4e5f60718293a4b5c6d7e8f90";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(monitor_logging::initialize_for_tests);
}

fn job() -> JobId {
    JobId::parse(JOB).unwrap()
}

fn stream(name: &str, data: &str) -> Msg {
    Msg::Stream(StreamEvent::new(name, data))
}

fn apply(state: MonitorState, msgs: Vec<Msg>) -> MonitorState {
    msgs.into_iter()
        .fold(state, |state, msg| update(state, msg).0)
}

fn records(state: &MonitorState) -> Vec<JobRecord> {
    state.registry().records().cloned().collect()
}

#[test]
fn duplicated_creation_event_is_idempotent() {
    init_logging();
    let created = format!(r#"{{"job_id":"{JOB}","status":"queued","tools":["nmap"]}}"#);
    let once = apply(
        MonitorState::new(Category::Scan),
        vec![stream("job_created", &created)],
    );
    let twice = apply(
        MonitorState::new(Category::Scan),
        vec![stream("job_created", &created), stream("job_created", &created)],
    );

    assert_eq!(records(&once), records(&twice));
    assert_eq!(once.view(), twice.view());
}

#[test]
fn progress_and_creation_converge_in_either_order() {
    init_logging();
    let progress = format!(r#"{{"job_id":"{JOB}","progress":50}}"#);
    let created = format!(r#"{{"job_id":"{JOB}","status":"queued","progress":0}}"#);

    let forward = apply(
        MonitorState::new(Category::Scan),
        vec![stream("progress", &progress), stream("job_created", &created)],
    );
    let reverse = apply(
        MonitorState::new(Category::Scan),
        vec![stream("job_created", &created), stream("progress", &progress)],
    );

    assert_eq!(records(&forward), records(&reverse));
    let record = forward.registry().get(&job()).unwrap();
    assert_eq!(record.status, JobStatus::Queued);
    assert_eq!(record.progress, 50);
}

#[test]
fn foreign_tag_never_touches_existing_job() {
    init_logging();
    let created = format!(r#"{{"job_id":"{JOB}","opts_summary":"-d example.com"}}"#);
    let state = apply(
        MonitorState::new(Category::Harvester),
        vec![stream("job_created", &created)],
    );
    let before = records(&state);

    let foreign = [
        stream("progress", &format!(r#"{{"job_id":"{JOB}","tool":"nmap","progress":90}}"#)),
        stream("finished", &format!(r#"{{"meta":{{"job_id":"{JOB}","tool":"nmap"}}}}"#)),
        stream(
            "status",
            &format!(r#"{{"job_id":"{JOB}","tool":"local_enum","status":"done","report":"x.html"}}"#),
        ),
    ];
    let mut state = state;
    for msg in foreign {
        let (next, changes) = update(state, msg);
        assert!(changes.is_empty());
        state = next;
    }

    assert_eq!(records(&state), before);
    assert!(state.view().reports.is_empty());
}

#[test]
fn foreign_tag_never_creates_a_job() {
    init_logging();
    let (state, changes) = update(
        MonitorState::new(Category::Harvester),
        stream("job_created", r#"{"job_id":"zzz","tool":"nmap"}"#),
    );
    assert!(changes.is_empty());
    assert!(state.registry().is_empty());
}

#[test]
fn untagged_follow_up_events_continue_adopted_jobs() {
    init_logging();
    let state = apply(
        MonitorState::new(Category::Harvester),
        vec![
            stream(
                "job_created",
                &format!(r#"{{"job_id":"{JOB}","opts_summary":"-d example.com"}}"#),
            ),
            stream("progress", &format!(r#"{{"job_id":"{JOB}","progress":60}}"#)),
            stream("progress", r#"{"job_id":"unknown","progress":60}"#),
        ],
    );

    assert_eq!(state.registry().len(), 1);
    assert_eq!(state.registry().get(&job()).unwrap().progress, 60);
}

#[test]
fn malformed_unknown_and_log_events_are_skipped() {
    init_logging();
    let state = apply(
        MonitorState::new(Category::Scan),
        vec![
            stream("progress", "{not json"),
            stream("message", &format!(r#"{{"job_id":"{JOB}"}}"#)),
            stream("log", &format!(r#"{{"job_id":"{JOB}","tool":"nmap","msg":"inicio"}}"#)),
            stream("heartbeat", "{}"),
            stream("progress", r#"{"progress":20}"#),
            stream("progress", &format!(r#"{{"job_id":"{JOB}","progress":20}}"#)),
        ],
    );

    assert_eq!(state.registry().len(), 1);
    assert_eq!(state.registry().get(&job()).unwrap().progress, 20);
}

#[test]
fn transport_id_identifies_bare_events() {
    init_logging();
    let event = StreamEvent::new("finished", "{}").with_last_event_id(JOB);
    let (state, _) = update(MonitorState::new(Category::Scan), Msg::Stream(event));
    assert_eq!(state.registry().get(&job()).unwrap().status, JobStatus::Done);
}

#[test]
fn status_with_report_links_job_and_catalog() {
    init_logging();
    let state = apply(
        MonitorState::new(Category::Scan),
        vec![
            Msg::ReportsListed(vec!["old.html".into()]),
            stream(
                "status",
                &format!(r#"{{"job_id":"{JOB}","status":"running","tools":["nmap","dns_reverse"]}}"#),
            ),
            stream(
                "status",
                &format!(r#"{{"job_id":"{JOB}","status":"done","report":"report_{JOB}.html"}}"#),
            ),
            stream(
                "status",
                &format!(r#"{{"job_id":"{JOB}","status":"done","report":"report_{JOB}.html"}}"#),
            ),
        ],
    );

    let view = state.view();
    let row = view.job(&job()).unwrap();
    assert_eq!(row.status, JobStatus::Done);
    assert_eq!(row.progress, 100);
    assert_eq!(row.summary.as_deref(), Some("nmap, dns_reverse"));
    assert_eq!(row.reports, vec![format!("report_{JOB}.html")]);
    assert_eq!(view.reports, vec![format!("report_{JOB}.html"), "old.html".to_string()]);
}

#[test]
fn report_on_unseen_job_lands_in_the_created_record() {
    init_logging();
    let status = format!(r#"{{"job_id":"{JOB}","status":"done","report":"late.html"}}"#);
    let (state, changes) = update(
        MonitorState::new(Category::Scan),
        stream("status", &status),
    );

    assert_eq!(state.registry().len(), 1);
    assert_eq!(state.registry().pending_report_count(), 0);
    let upserted = changes
        .iter()
        .find_map(|change| match change {
            ViewChange::Upserted(record) => Some(record),
            _ => None,
        })
        .expect("record created");
    assert!(upserted.reports.contains("late.html"));
    assert!(!changes
        .iter()
        .any(|change| matches!(change, ViewChange::ReportAttached { .. })));
    assert!(changes.contains(&ViewChange::ReportListed("late.html".to_string())));

    let row = state.view().job(&job()).cloned().unwrap();
    assert_eq!(row.status, JobStatus::Done);
    assert_eq!(row.reports, vec!["late.html".to_string()]);
}

#[test]
fn status_without_known_value_keeps_previous_status() {
    init_logging();
    let state = apply(
        MonitorState::new(Category::Scan),
        vec![
            stream("status", &format!(r#"{{"job_id":"{JOB}","status":"running"}}"#)),
            stream("status", &format!(r#"{{"job_id":"{JOB}","status":"exploded"}}"#)),
        ],
    );
    assert_eq!(
        state.registry().get(&job()).unwrap().status,
        JobStatus::Running
    );
}

#[test]
fn submission_then_stream_keeps_a_single_record() {
    init_logging();
    let state = MonitorState::new(Category::Harvester);

    let (state, changes) = update(
        state,
        Msg::SubmissionAccepted {
            job_id: job(),
            summary: Some("d=example.com".into()),
        },
    );
    assert_eq!(changes.len(), 1);
    let record = state.registry().get(&job()).unwrap();
    assert_eq!(record.status, JobStatus::Running);
    assert_eq!(record.progress, 0);
    assert_eq!(record.summary.as_deref(), Some("d=example.com"));

    let (state, _) = update(
        state,
        stream("progress", &format!(r#"{{"job_id":"{JOB}","progress":40}}"#)),
    );
    assert_eq!(state.registry().len(), 1);
    assert_eq!(state.registry().get(&job()).unwrap().progress, 40);

    let (state, changes) = update(state, stream("finished", &format!(r#"{{"job_id":"{JOB}"}}"#)));
    assert_eq!(state.registry().len(), 1);
    let record = state.registry().get(&job()).unwrap();
    assert_eq!(record.status, JobStatus::Done);
    assert_eq!(record.progress, 100);
    assert_eq!(
        changes,
        vec![
            ViewChange::Status {
                job_id: job(),
                status: JobStatus::Done
            },
            ViewChange::Progress {
                job_id: job(),
                progress: 100
            },
        ]
    );
}

#[test]
fn stream_creation_before_submission_response_converges() {
    init_logging();
    let created = format!(r#"{{"job_id":"{JOB}","status":"queued","opts_summary":"d=example.com"}}"#);
    let stream_first = apply(
        MonitorState::new(Category::Harvester),
        vec![
            stream("job_created", &created),
            Msg::SubmissionAccepted {
                job_id: job(),
                summary: Some("d=example.com".into()),
            },
        ],
    );

    assert_eq!(stream_first.registry().len(), 1);
    let record = stream_first.registry().get(&job()).unwrap();
    assert_eq!(record.status, JobStatus::Queued);
    assert_eq!(record.summary.as_deref(), Some("d=example.com"));
}

#[test]
fn view_lists_newest_jobs_first() {
    init_logging();
    let state = apply(
        MonitorState::new(Category::Scan),
        vec![
            stream("job_created", r#"{"job_id":"first"}"#),
            stream("job_created", r#"{"job_id":"second"}"#),
        ],
    );
    let ids: Vec<_> = state
        .view()
        .jobs
        .iter()
        .map(|row| row.job_id.to_string())
        .collect();
    assert_eq!(ids, vec!["second".to_string(), "first".to_string()]);
}

#[test]
fn noop_leaves_state_untouched() {
    let state = MonitorState::new(Category::Scan);
    let (next, changes) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(changes.is_empty());
}
