//! Shared fixtures for the exchange integration tests.

use std::path::Path;

use satchel_client::testing::InMemoryRemoteStore;
use satchel_client::RemoteStore;
use satchel_core::types::{AssignmentId, CourseId, FileEntry, StudentId};
use satchel_core::ExchangeConfig;

/// A config rooted entirely under a temp directory, acting as student "ada".
pub fn test_config(root: &Path) -> ExchangeConfig {
    ExchangeConfig {
        remote_url: Some("http://localhost:0".to_string()),
        auth_token: None,
        username: StudentId::from("ada"),
        assignment_dir: root.join("work"),
        cache_dir: root.join("cache"),
        path_includes_course: false,
        exclude: vec![
            ".ipynb_checkpoints".to_string(),
            "*.pyc".to_string(),
            "__pycache__".to_string(),
            "feedback".to_string(),
        ],
        include: Vec::new(),
        max_file_size_kb: Some(100_000),
        release_dir: root.join("release"),
        source_dir: root.join("source"),
        solution_dir: root.join("solution"),
        feedback_dir: root.join("feedback"),
        submitted_dir: root.join("submitted"),
        strict: false,
        add_random_string: false,
    }
}

pub fn notebook(name: &str, content: &[u8]) -> FileEntry {
    FileEntry::new(name, content.to_vec())
}

/// A store with `course` holding one released assignment of one notebook.
pub fn store_with_assignment(course: &str, assignment: &str) -> InMemoryRemoteStore {
    let store = InMemoryRemoteStore::new();
    let course_id = CourseId::from(course);
    store.add_course(&course_id);
    store
        .put_assignment(
            &course_id,
            &AssignmentId::from(assignment),
            &[notebook("p1.ipynb", b"cells")],
        )
        .expect("seed assignment");
    store
}
