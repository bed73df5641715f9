//! End-to-end transfer flows against the in-memory remote store.

mod common;

use std::fs;

use tempfile::TempDir;

use satchel_client::testing::InMemoryRemoteStore;
use satchel_client::RemoteStore;
use satchel_core::types::{AssignmentId, CourseId, StudentId, Timestamp};
use satchel_sync::collect::{collect, CollectRequest};
use satchel_sync::error::ExchangeError;
use satchel_sync::feedback::{
    fetch_feedback, release_feedback, FetchFeedbackRequest, ReleaseFeedbackRequest,
};
use satchel_sync::fetch::{fetch_assignment, FetchRequest};
use satchel_sync::release::{release_assignment, release_solution, ReleaseRequest};
use satchel_sync::solution::{fetch_solution, FetchSolutionRequest};
use satchel_sync::submit::{submit, SubmitRequest};
use satchel_sync::TIMESTAMP_FILE;

use common::{notebook, store_with_assignment, test_config};

fn ids() -> (CourseId, AssignmentId) {
    (CourseId::from("math101"), AssignmentId::from("ps1"))
}

#[test]
fn fetch_conflict_and_replace_semantics() {
    let home = TempDir::new().unwrap();
    let config = test_config(home.path());
    let store = store_with_assignment("math101", "ps1");
    let (course, assignment) = ids();

    let dest = fetch_assignment(
        &store,
        &config,
        &FetchRequest {
            course: course.clone(),
            assignment: assignment.clone(),
            replace: false,
        },
    )
    .expect("first fetch");
    assert_eq!(fs::read(dest.join("p1.ipynb")).unwrap(), b"cells");

    // a second plain fetch must not touch the existing working copy
    let err = fetch_assignment(
        &store,
        &config,
        &FetchRequest {
            course: course.clone(),
            assignment: assignment.clone(),
            replace: false,
        },
    )
    .unwrap_err();
    assert!(matches!(err, ExchangeError::LocalConflict { .. }));

    // student edits p1; the release gains p2; --replace restores only p2
    fs::write(dest.join("p1.ipynb"), b"student edits").unwrap();
    store
        .put_assignment(
            &course,
            &assignment,
            &[notebook("p1.ipynb", b"cells"), notebook("p2.ipynb", b"more")],
        )
        .unwrap();
    fetch_assignment(
        &store,
        &config,
        &FetchRequest {
            course,
            assignment,
            replace: true,
        },
    )
    .expect("replace fetch");
    assert_eq!(fs::read(dest.join("p1.ipynb")).unwrap(), b"student edits");
    assert_eq!(fs::read(dest.join("p2.ipynb")).unwrap(), b"more");
}

#[test]
fn submitting_twice_appends_two_distinct_entries() {
    let home = TempDir::new().unwrap();
    let config = test_config(home.path());
    let store = store_with_assignment("math101", "ps1");
    let (course, assignment) = ids();
    let work = config.assignment_dir.join("ps1");
    fs::create_dir_all(&work).unwrap();
    fs::write(work.join("p1.ipynb"), b"attempt one").unwrap();

    let request = SubmitRequest {
        course: course.clone(),
        assignment: assignment.clone(),
    };
    let first = submit(&store, &config, &request).expect("first submit");
    fs::write(work.join("p1.ipynb"), b"attempt two").unwrap();
    let second = submit(&store, &config, &request).expect("second submit");

    assert!(second.timestamp > first.timestamp);
    assert_ne!(first.cache_entry, second.cache_entry);
    assert!(first.cache_entry.join("p1.ipynb").exists());
    assert!(second.cache_entry.join("p1.ipynb").exists());
    assert_eq!(
        fs::read_to_string(second.cache_entry.join(TIMESTAMP_FILE)).unwrap(),
        second.timestamp.0
    );

    let recorded = store.submission_timestamps(&course, &assignment, &StudentId::from("student"));
    assert_eq!(recorded.len(), 2);
    assert!(recorded[0] < recorded[1]);
}

#[test]
fn strict_submit_requires_all_released_notebooks() {
    let home = TempDir::new().unwrap();
    let mut config = test_config(home.path());
    config.strict = true;
    let store = InMemoryRemoteStore::new();
    let (course, assignment) = ids();
    store.add_course(&course);
    store
        .put_assignment(
            &course,
            &assignment,
            &[notebook("p1.ipynb", b"a"), notebook("p2.ipynb", b"b")],
        )
        .unwrap();

    let work = config.assignment_dir.join("ps1");
    fs::create_dir_all(&work).unwrap();
    fs::write(work.join("p1.ipynb"), b"only one").unwrap();

    let err = submit(&store, &config, &SubmitRequest { course, assignment }).unwrap_err();
    match err {
        ExchangeError::MissingNotebooks { missing } => assert_eq!(missing, vec!["p2".to_string()]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn release_refuses_to_replace_without_force() {
    let home = TempDir::new().unwrap();
    let config = test_config(home.path());
    let store = InMemoryRemoteStore::new();
    let (course, assignment) = ids();
    store.add_course(&course);
    let src = config.release_dir.join("ps1");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("p1.ipynb"), b"v1").unwrap();

    let request = ReleaseRequest {
        course: course.clone(),
        assignment: assignment.clone(),
        force: false,
    };
    assert_eq!(release_assignment(&store, &config, &request).unwrap(), 1);

    let err = release_assignment(&store, &config, &request).unwrap_err();
    assert!(matches!(err, ExchangeError::AlreadyReleased { .. }));

    let forced = ReleaseRequest {
        course: course.clone(),
        assignment,
        force: true,
    };
    assert_eq!(release_assignment(&store, &config, &forced).unwrap(), 1);
    assert_eq!(store.deleted(), vec!["assignment/math101/ps1".to_string()]);
}

#[test]
fn solution_release_and_blocked_fetch() {
    let home = TempDir::new().unwrap();
    let config = test_config(home.path());
    let store = InMemoryRemoteStore::new();
    let (course, assignment) = ids();
    store.add_course(&course);
    let src = config.solution_dir.join("ps1");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("p1.ipynb"), b"solved").unwrap();
    release_solution(
        &store,
        &config,
        &ReleaseRequest {
            course: course.clone(),
            assignment: assignment.clone(),
            force: false,
        },
    )
    .expect("release solution");

    let request = FetchSolutionRequest {
        course,
        assignment,
    };
    let err = fetch_solution(&store, &config, &request).unwrap_err();
    assert!(matches!(err, ExchangeError::AssignmentNotFetched { .. }));

    fs::create_dir_all(config.assignment_dir.join("ps1")).unwrap();
    let dest = fetch_solution(&store, &config, &request).expect("fetch solution");
    assert_eq!(dest, config.assignment_dir.join("ps1").join("solution"));
    assert_eq!(fs::read(dest.join("p1.ipynb")).unwrap(), b"solved");
}

#[test]
fn feedback_round_trip_through_cache_timestamps() {
    let home = TempDir::new().unwrap();
    let config = test_config(home.path());
    let store = store_with_assignment("math101", "ps1");
    let (course, assignment) = ids();

    let work = config.assignment_dir.join("ps1");
    fs::create_dir_all(&work).unwrap();
    fs::write(work.join("p1.ipynb"), b"answers").unwrap();
    let receipt = submit(
        &store,
        &config,
        &SubmitRequest {
            course: course.clone(),
            assignment: assignment.clone(),
        },
    )
    .expect("submit");

    // instructor stages graded HTML against the submission timestamp
    let stage = config.feedback_dir.join("ada").join("ps1");
    fs::create_dir_all(&stage).unwrap();
    fs::write(stage.join("p1.html"), b"well done").unwrap();
    fs::write(stage.join(TIMESTAMP_FILE), receipt.timestamp.0.as_bytes()).unwrap();
    let posted = release_feedback(
        &store,
        &config,
        &ReleaseFeedbackRequest {
            course: course.clone(),
            assignment: assignment.clone(),
        },
    )
    .expect("release feedback");
    assert_eq!(posted, 1);

    let fetched = fetch_feedback(
        &store,
        &config,
        &FetchFeedbackRequest { course, assignment },
    )
    .expect("fetch feedback");
    assert_eq!(fetched, vec![receipt.timestamp.clone()]);
    let local = config
        .assignment_dir
        .join("ps1")
        .join("feedback")
        .join(&receipt.timestamp.0)
        .join("p1.html");
    assert_eq!(fs::read(local).unwrap(), b"well done");
}

#[test]
fn collect_takes_latest_and_respects_update_flag() {
    let home = TempDir::new().unwrap();
    let config = test_config(home.path());
    let store = store_with_assignment("math101", "ps1");
    let (course, assignment) = ids();
    let ada = StudentId::from("ada");
    let t1 = Timestamp::from("2024-03-01 12:00:05.000000 UTC");
    let t2 = Timestamp::from("2024-03-02 09:30:00.000000 UTC");
    store.seed_submission(&course, &assignment, &ada, &t1, vec![notebook("p1.ipynb", b"v1")]);
    store.seed_submission(&course, &assignment, &ada, &t2, vec![notebook("p1.ipynb", b"v2")]);

    let request = CollectRequest {
        course: course.clone(),
        assignment: assignment.clone(),
        student: None,
        update: false,
    };
    assert_eq!(collect(&store, &config, &request).unwrap(), 1);
    let dest = config.submitted_dir.join("ada").join("ps1");
    assert_eq!(fs::read(dest.join("p1.ipynb")).unwrap(), b"v2");
    assert_eq!(fs::read_to_string(dest.join(TIMESTAMP_FILE)).unwrap(), t2.0);

    // nothing newer: both with and without --update this is a no-op
    assert_eq!(collect(&store, &config, &request).unwrap(), 0);
    let update = CollectRequest {
        update: true,
        ..request.clone()
    };
    assert_eq!(collect(&store, &config, &update).unwrap(), 0);

    // a newer submission arrives; only --update re-collects it
    let t3 = Timestamp::from("2024-03-03 18:00:00.000000 UTC");
    store.seed_submission(&course, &assignment, &ada, &t3, vec![notebook("p1.ipynb", b"v3")]);
    assert_eq!(collect(&store, &config, &request).unwrap(), 0);
    assert_eq!(collect(&store, &config, &update).unwrap(), 1);
    assert_eq!(fs::read(dest.join("p1.ipynb")).unwrap(), b"v3");
    assert_eq!(fs::read_to_string(dest.join(TIMESTAMP_FILE)).unwrap(), t3.0);
}
