use monitor_core::{classify, resolve_job_id, DomainProfile, EventBody, JobId, Verdict};

fn body(json: &str) -> EventBody {
    EventBody::decode(json).expect("valid json")
}

fn id(raw: &str) -> JobId {
    JobId::parse(raw).unwrap()
}

#[test]
fn top_level_id_wins_over_nested_and_transport() {
    let payload = body(r#"{"job_id":"top","meta":{"job_id":"nested"}}"#);
    assert_eq!(resolve_job_id(&payload, Some("transport")), Some(id("top")));
}

#[test]
fn nested_id_used_when_top_level_missing_or_blank() {
    let payload = body(r#"{"job_id":"  ","meta":{"job_id":"nested"}}"#);
    assert_eq!(resolve_job_id(&payload, Some("transport")), Some(id("nested")));
}

#[test]
fn transport_id_is_last_resort() {
    let payload = body(r#"{"progress":10}"#);
    assert_eq!(resolve_job_id(&payload, Some(" 42 ")), Some(id("42")));
    assert_eq!(resolve_job_id(&payload, Some("   ")), None);
    assert_eq!(resolve_job_id(&payload, None), None);
}

#[test]
fn numeric_ids_are_accepted_as_text() {
    let payload = body(r#"{"job_id":7}"#);
    assert_eq!(resolve_job_id(&payload, None), Some(id("7")));
}

#[test]
fn scan_profile_accepts_everything() {
    let scan = DomainProfile::scan();
    let tagged = body(r#"{"tool":"theHarvester","job_id":"a"}"#);
    assert_eq!(classify(&tagged, &scan, false), Verdict::Ungated);
    assert!(classify(&body("{}"), &scan, false).is_owned());
}

#[test]
fn harvester_tag_match_is_case_insensitive() {
    let harvester = DomainProfile::harvester();
    assert_eq!(
        classify(&body(r#"{"tool":"TheHarvester"}"#), &harvester, false),
        Verdict::TagMatch
    );
    assert_eq!(
        classify(&body(r#"{"meta":{"tool":"HARVESTER"}}"#), &harvester, false),
        Verdict::TagMatch
    );
}

#[test]
fn tag_mismatch_beats_markers_and_known_jobs() {
    let harvester = DomainProfile::harvester();
    let payload = body(r#"{"tool":"nmap","opts_summary":"-d example.com"}"#);
    let verdict = classify(&payload, &harvester, true);
    assert_eq!(verdict, Verdict::TagMismatch);
    assert!(!verdict.is_owned());
}

#[test]
fn direct_tag_shadows_nested_tag() {
    let harvester = DomainProfile::harvester();
    let payload = body(r#"{"tool":"nmap","meta":{"tool":"theharvester"}}"#);
    assert_eq!(classify(&payload, &harvester, false), Verdict::TagMismatch);
}

#[test]
fn marker_fields_claim_untagged_events() {
    let harvester = DomainProfile::harvester();
    assert_eq!(
        classify(&body(r#"{"opts_summary":"-d x.com"}"#), &harvester, false),
        Verdict::Marker
    );
    assert_eq!(
        classify(&body(r#"{"meta":{"harvester_opts":{"limit":500}}}"#), &harvester, false),
        Verdict::Marker
    );
    assert_eq!(
        classify(&body(r#"{"meta":{"harvester_opts":false}}"#), &harvester, false),
        Verdict::Unrelated
    );
}

#[test]
fn untagged_events_follow_known_jobs_only() {
    let harvester = DomainProfile::harvester();
    let payload = body(r#"{"job_id":"a","progress":30}"#);
    assert_eq!(classify(&payload, &harvester, true), Verdict::KnownJob);
    assert_eq!(classify(&payload, &harvester, false), Verdict::Unrelated);
}
