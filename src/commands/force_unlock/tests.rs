//! Tests for the force-unlock command.

use super::*;
use crate::events::read_events;
use crate::state::{Locker, SharedState};
use crate::test_support::{BrokenInput, FailingResolver, FakeResolver, FakeState};
use chrono::Duration;
use std::io::Cursor;
use tempfile::TempDir;

fn request(temp_dir: &TempDir, lock_id: Option<&str>, force: bool) -> ForceUnlockRequest {
    ForceUnlockRequest {
        lock_id: lock_id.map(str::to_string),
        dir: Some(temp_dir.path().to_path_buf()),
        force,
    }
}

fn run(
    request: &ForceUnlockRequest,
    resolver: &dyn BackendResolver,
    answer: &str,
) -> (Result<ForceUnlockReport>, String) {
    let mut input = Cursor::new(answer.as_bytes().to_vec());
    let mut output = Vec::new();
    let result = force_unlock(request, resolver, &mut input, &mut output);
    (result, String::from_utf8(output).unwrap())
}

#[test]
fn test_confirmed_unlock_on_shared_backend() {
    let temp_dir = TempDir::new().unwrap();
    let (state, calls) = FakeState::shared();
    let resolver = FakeResolver::new(state);

    let (result, prompt) = run(&request(&temp_dir, Some("abc-123"), false), &resolver, "yes\n");

    let report = result.unwrap();
    assert_eq!(report.lock_id.as_str(), "abc-123");
    assert_eq!(report.confirmation, Confirmation::Granted);
    assert_eq!(*calls.borrow(), vec!["abc-123".to_string()]);
    assert!(prompt.contains("Do you really want to force-unlock?"));
    assert!(prompt.contains("fake shared state"));
}

#[test]
fn test_local_only_backend_is_refused_even_with_force() {
    let temp_dir = TempDir::new().unwrap();

    for force in [false, true] {
        let (state, calls) = FakeState::local();
        let resolver = FakeResolver::new(state);

        let (result, prompt) = run(&request(&temp_dir, Some("abc-123"), force), &resolver, "yes\n");

        let err = result.unwrap_err();
        assert!(matches!(err, StateLockError::LocalOnly(_)));
        assert_eq!(err.exit_code(), crate::exit_codes::LOCAL_ONLY);
        assert!(calls.borrow().is_empty());
        assert!(prompt.is_empty(), "no prompt before the local-only refusal");
    }
}

#[test]
fn test_not_lockable_backend_is_unsupported() {
    let temp_dir = TempDir::new().unwrap();

    for force in [false, true] {
        let (state, calls) = FakeState::not_lockable();
        let resolver = FakeResolver::new(state);

        let (result, prompt) = run(&request(&temp_dir, Some("abc-123"), force), &resolver, "yes\n");

        let err = result.unwrap_err();
        assert!(matches!(err, StateLockError::Unsupported(_)), "force = {}", force);
        assert_eq!(err.exit_code(), crate::exit_codes::UNSUPPORTED_BACKEND);
        assert!(calls.borrow().is_empty());
        assert!(prompt.is_empty());
    }
}

#[test]
fn test_missing_lock_id_stops_before_backend() {
    let temp_dir = TempDir::new().unwrap();
    let (state, calls) = FakeState::shared();
    let resolver = FakeResolver::new(state);

    for lock_id in [None, Some("")] {
        let (result, prompt) = run(&request(&temp_dir, lock_id, true), &resolver, "yes\n");

        let err = result.unwrap_err();
        assert!(matches!(err, StateLockError::Usage(_)));
        assert_eq!(err.exit_code(), crate::exit_codes::USER_ERROR);
        assert!(prompt.is_empty());
    }

    assert_eq!(resolver.resolves.get(), 0);
    assert!(calls.borrow().is_empty());
    assert!(!temp_dir.path().join(".statelock").exists());
}

#[test]
fn test_force_skips_prompt_entirely() {
    let temp_dir = TempDir::new().unwrap();
    let (state, calls) = FakeState::shared();
    let resolver = FakeResolver::new(state);
    let mut input = BrokenInput;
    let mut output = Vec::new();

    let report = force_unlock(
        &request(&temp_dir, Some("abc-123"), true),
        &resolver,
        &mut input,
        &mut output,
    )
    .unwrap();

    assert_eq!(report.confirmation, Confirmation::ForcedSkip);
    assert!(output.is_empty());
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn test_declined_answer_never_releases() {
    let temp_dir = TempDir::new().unwrap();

    for answer in ["no\n", "Yes\n", " yes\n", "\n"] {
        let (state, calls) = FakeState::shared();
        let resolver = FakeResolver::new(state);

        let (result, _) = run(&request(&temp_dir, Some("abc-123"), false), &resolver, answer);

        let err = result.unwrap_err();
        assert!(err.is_operator_cancel(), "answer {:?}", answer);
        assert_eq!(err.exit_code(), crate::exit_codes::CANCELLED);
        assert!(calls.borrow().is_empty());
    }
}

#[test]
fn test_non_utf8_answer_is_cancel_not_prompt_failure() {
    let temp_dir = TempDir::new().unwrap();
    let (state, calls) = FakeState::shared();
    let resolver = FakeResolver::new(state);
    let mut input = Cursor::new(vec![0xff, b'\n']);
    let mut output = Vec::new();

    let err = force_unlock(
        &request(&temp_dir, Some("abc-123"), false),
        &resolver,
        &mut input,
        &mut output,
    )
    .unwrap_err();

    assert!(err.is_operator_cancel());
    assert_eq!(err.exit_code(), crate::exit_codes::CANCELLED);
    assert!(calls.borrow().is_empty());
}

#[test]
fn test_closed_input_is_prompt_failure() {
    let temp_dir = TempDir::new().unwrap();
    let (state, calls) = FakeState::shared();
    let resolver = FakeResolver::new(state);

    let (result, _) = run(&request(&temp_dir, Some("abc-123"), false), &resolver, "");

    let err = result.unwrap_err();
    assert!(matches!(err, StateLockError::Prompt(_)));
    assert!(!err.is_operator_cancel());
    assert_eq!(err.exit_code(), crate::exit_codes::PROMPT_FAILURE);
    assert!(calls.borrow().is_empty());
}

#[test]
fn test_repeated_invocation_calls_backend_each_time() {
    let temp_dir = TempDir::new().unwrap();
    let (state, calls) = FakeState::shared();
    let resolver = FakeResolver::new(state);
    let req = request(&temp_dir, Some("abc-123"), true);

    run(&req, &resolver, "").0.unwrap();
    run(&req, &resolver, "").0.unwrap();

    assert_eq!(resolver.resolves.get(), 2);
    assert_eq!(calls.borrow().len(), 2);
}

#[test]
fn test_backend_release_failure_is_unlock_error() {
    let temp_dir = TempDir::new().unwrap();
    let (state, calls) = FakeState::shared();
    let resolver = FakeResolver::new(state.failing_unlock("lock ID mismatch"));

    let (result, _) = run(&request(&temp_dir, Some("abc-123"), true), &resolver, "");

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "Failed to unlock state: lock ID mismatch");
    assert_eq!(err.exit_code(), crate::exit_codes::LOCK_FAILURE);
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn test_backend_resolution_failure() {
    let temp_dir = TempDir::new().unwrap();
    let resolver = FailingResolver("bucket unreachable".to_string());

    let (result, prompt) = run(&request(&temp_dir, Some("abc-123"), false), &resolver, "yes\n");

    let err = result.unwrap_err();
    assert!(matches!(err, StateLockError::Backend(_)));
    assert_eq!(err.exit_code(), crate::exit_codes::BACKEND_FAILURE);
    assert!(prompt.is_empty());
}

#[test]
fn test_missing_directory_is_backend_failure() {
    let temp_dir = TempDir::new().unwrap();
    let (state, _) = FakeState::shared();
    let resolver = FakeResolver::new(state);
    let req = ForceUnlockRequest {
        lock_id: Some("abc-123".to_string()),
        dir: Some(temp_dir.path().join("missing")),
        force: true,
    };

    let (result, _) = run(&req, &resolver, "");

    assert!(matches!(result.unwrap_err(), StateLockError::Backend(_)));
    assert_eq!(resolver.resolves.get(), 0);
}

#[test]
fn test_prompt_shows_held_lock_and_mismatch_warning() {
    let temp_dir = TempDir::new().unwrap();
    let mut held = LockInfo::new("apply");
    held.created = chrono::Utc::now() - Duration::hours(5);
    let (state, _) = FakeState::shared();
    let resolver = FakeResolver::new(state.with_held_lock(held.clone()));

    let (result, prompt) = run(&request(&temp_dir, Some("abc-123"), false), &resolver, "no\n");

    assert!(result.is_err());
    assert!(prompt.contains("Lock Info:"));
    assert!(prompt.contains(held.id.as_str()));
    assert!(prompt.contains("Operation: apply"));
    assert!(prompt.contains("STALE"));
    assert!(prompt.contains("does not match"));
}

#[test]
fn test_prompt_without_mismatch_for_matching_id() {
    let temp_dir = TempDir::new().unwrap();
    let held = LockInfo::new("apply");
    let (state, calls) = FakeState::shared();
    let resolver = FakeResolver::new(state.with_held_lock(held.clone()));

    let (result, prompt) = run(
        &request(&temp_dir, Some(held.id.as_str()), false),
        &resolver,
        "yes\n",
    );

    result.unwrap();
    assert!(!prompt.contains("does not match"));
    assert!(!prompt.contains("STALE"));
    assert_eq!(*calls.borrow(), vec![held.id.as_str().to_string()]);
}

#[test]
fn test_prompt_notes_when_no_lock_is_held() {
    let temp_dir = TempDir::new().unwrap();
    let (state, _) = FakeState::shared();
    let resolver = FakeResolver::new(state);

    let (_, prompt) = run(&request(&temp_dir, Some("abc-123"), false), &resolver, "no\n");

    assert!(prompt.contains("No lock is currently recorded"));
}

#[test]
fn test_outcomes_are_written_to_event_log() {
    let temp_dir = TempDir::new().unwrap();
    let (state, _) = FakeState::shared();
    let resolver = FakeResolver::new(state);

    let _ = run(&request(&temp_dir, Some("first"), false), &resolver, "no\n");
    let _ = run(&request(&temp_dir, Some("second"), true), &resolver, "");

    let ctx = StateContext::resolve_from(temp_dir.path()).unwrap();
    let events = read_events(&ctx).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].lock_id.as_ref().unwrap().as_str(), "first");
    assert_eq!(events[0].details["outcome"], "cancelled");
    assert_eq!(events[0].details["force"], false);
    assert_eq!(events[1].lock_id.as_ref().unwrap().as_str(), "second");
    assert_eq!(events[1].details["outcome"], "unlocked");
    assert_eq!(events[1].details["force"], true);
}

#[test]
fn test_refused_backends_leave_no_event() {
    let temp_dir = TempDir::new().unwrap();
    let (state, _) = FakeState::local();
    let resolver = FakeResolver::new(state);

    let _ = run(&request(&temp_dir, Some("abc-123"), true), &resolver, "");

    let ctx = StateContext::resolve_from(temp_dir.path()).unwrap();
    assert!(read_events(&ctx).unwrap().is_empty());
}

#[test]
fn test_end_to_end_with_shared_directory() {
    let temp_dir = TempDir::new().unwrap();
    let shared_dir = temp_dir.path().join("mnt");
    std::fs::create_dir_all(&shared_dir).unwrap();
    std::fs::write(
        temp_dir.path().join("statelock.yaml"),
        "backend:\n  kind: shared\n  path: mnt\n  name: prod\n  backup: false\n",
    )
    .unwrap();

    // A process takes the lock and never comes back
    let holder = SharedState::new(&shared_dir, "prod");
    let id = holder.lock(&LockInfo::new("apply")).unwrap();
    assert!(holder.lock_info().unwrap().is_some());

    let (result, prompt) = run(
        &request(&temp_dir, Some(id.as_str()), false),
        &ConfigResolver,
        "yes\n",
    );

    let report = result.unwrap();
    assert!(report.backend.contains("prod"));
    assert!(prompt.contains("Operation: apply"));
    assert!(holder.lock_info().unwrap().is_none());

    // The lock can be taken again
    holder.lock(&LockInfo::new("plan")).unwrap();
}

#[test]
fn test_end_to_end_wrong_id_is_refused_by_shared_backend() {
    let temp_dir = TempDir::new().unwrap();
    let shared_dir = temp_dir.path().join("mnt");
    std::fs::create_dir_all(&shared_dir).unwrap();
    std::fs::write(
        temp_dir.path().join("statelock.yaml"),
        "backend:\n  kind: shared\n  path: mnt\n  name: prod\n",
    )
    .unwrap();

    let holder = SharedState::new(&shared_dir, "prod");
    holder.lock(&LockInfo::new("apply")).unwrap();

    let (result, _) = run(&request(&temp_dir, Some("abc-123"), true), &ConfigResolver, "");

    let err = result.unwrap_err();
    assert!(matches!(err, StateLockError::Unlock(_)));
    assert!(err.to_string().contains("does not match"));
    assert!(holder.lock_info().unwrap().is_some());
}

fn write_shared_config(temp_dir: &TempDir) -> std::path::PathBuf {
    let shared_dir = temp_dir.path().join("mnt");
    std::fs::create_dir_all(&shared_dir).unwrap();
    std::fs::write(
        temp_dir.path().join("statelock.yaml"),
        "backend:\n  kind: shared\n  path: mnt\n  name: prod\n",
    )
    .unwrap();
    shared_dir
}

#[test]
fn test_end_to_end_releases_lock_left_empty_by_crashed_holder() {
    let temp_dir = TempDir::new().unwrap();
    let shared_dir = write_shared_config(&temp_dir);
    let lock_file = shared_dir.join("prod.lock");
    std::fs::write(&lock_file, "").unwrap();

    let (result, _) = run(&request(&temp_dir, Some("abc-123"), true), &ConfigResolver, "");

    result.unwrap();
    assert!(!lock_file.exists());
    SharedState::new(&shared_dir, "prod")
        .lock(&LockInfo::new("apply"))
        .unwrap();
}

#[test]
fn test_prompt_reports_unreadable_holder() {
    let temp_dir = TempDir::new().unwrap();
    let shared_dir = write_shared_config(&temp_dir);
    let lock_file = shared_dir.join("prod.lock");
    std::fs::write(&lock_file, "{").unwrap();

    let (result, prompt) = run(&request(&temp_dir, Some("abc-123"), false), &ConfigResolver, "yes\n");

    result.unwrap();
    assert!(prompt.contains("lock holder is unreadable"));
    assert!(!lock_file.exists());
}

#[test]
fn test_success_message_names_lock_and_backend() {
    let report = ForceUnlockReport {
        lock_id: LockId::new("abc-123").unwrap(),
        backend: "shared state \"prod\" in /mnt".to_string(),
        confirmation: Confirmation::Granted,
    };

    let message = success_message(&report);

    assert!(message.contains("Lock abc-123 on shared state \"prod\" in /mnt"));
    assert!(message.contains("successfully released"));
    assert!(!message.contains("--force"));

    let forced = ForceUnlockReport {
        confirmation: Confirmation::ForcedSkip,
        ..report
    };
    assert!(success_message(&forced).contains("skipped with --force"));
}

#[test]
fn test_end_to_end_default_config_is_local_only() {
    let temp_dir = TempDir::new().unwrap();

    let (result, _) = run(&request(&temp_dir, Some("abc-123"), true), &ConfigResolver, "");

    assert!(matches!(result.unwrap_err(), StateLockError::LocalOnly(_)));
}

#[test]
fn test_request_from_args() {
    let args = ForceUnlockArgs {
        lock_id: Some("abc-123".to_string()),
        dir: None,
        force: true,
    };

    let request = ForceUnlockRequest::from(args);

    assert_eq!(request.lock_id.as_deref(), Some("abc-123"));
    assert!(request.force);
    assert!(request.dir.is_none());
}
