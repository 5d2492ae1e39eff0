//! Dispatch engine integration tests with synthetic handlers.

mod common;

use anyhow::Result;
use common::{TriggerFixture, calls_for, calls_under, record_call};
use std::path::Path;
use systrig::context::{Context, EnvFlags};
use systrig::engine::Engine;
use systrig::state::StateTracker;
use systrig::status::Status;

fn ctx() -> Context {
    Context::with_flags(EnvFlags::default())
}

fn reload_tracker(fixture: &TriggerFixture) -> StateTracker {
    let mut tracker = StateTracker::new(fixture.state_path());
    tracker.load().expect("state should reload");
    tracker
}

// Synthetic actions. Handler actions are plain fn pointers, so behavior is
// selected by which of these a test registers.

fn act_success(_ctx: &mut Context, path: &Path) -> Status {
    record_call(path);
    Status::SUCCESS
}

fn act_success_break(_ctx: &mut Context, path: &Path) -> Status {
    record_call(path);
    Status::SUCCESS | Status::BREAK
}

fn act_skip_break_drop(_ctx: &mut Context, path: &Path) -> Status {
    record_call(path);
    Status::SKIP | Status::BREAK | Status::DROP
}

fn act_fail_on_bad(_ctx: &mut Context, path: &Path) -> Status {
    record_call(path);
    if path.file_name().is_some_and(|n| n.to_string_lossy().contains("bad")) {
        Status::FAIL
    } else {
        Status::SUCCESS
    }
}

#[test]
fn test_second_run_is_idempotent() -> Result<()> {
    let fixture = TriggerFixture::new();
    let a = fixture.touch("a.lib", b"one");
    let b = fixture.touch("b.lib", b"two");

    let registry = vec![fixture.handler("libs", "*.lib", act_success)];
    let engine = Engine::new(&registry, fixture.state_path(), fixture.log_dir());

    engine.run(&mut ctx(), None)?;
    assert_eq!(calls_under(&fixture.watched), 2);

    // Nothing changed on disk: the second run must not invoke anything.
    engine.run(&mut ctx(), None)?;
    assert_eq!(calls_under(&fixture.watched), 2);
    assert_eq!(calls_for(&a), 1);
    assert_eq!(calls_for(&b), 1);

    Ok(())
}

#[test]
fn test_changed_path_is_redispatched() -> Result<()> {
    let fixture = TriggerFixture::new();
    let a = fixture.touch("a.lib", b"one");
    let b = fixture.touch("b.lib", b"two");

    let registry = vec![fixture.handler("libs", "*.lib", act_success)];
    let engine = Engine::new(&registry, fixture.state_path(), fixture.log_dir());

    engine.run(&mut ctx(), None)?;
    fixture.touch("a.lib", b"one, updated");
    engine.run(&mut ctx(), None)?;

    assert_eq!(calls_for(&a), 2);
    assert_eq!(calls_for(&b), 1);

    Ok(())
}

#[test]
fn test_break_invokes_once_and_records_all() -> Result<()> {
    let fixture = TriggerFixture::new();
    let a = fixture.touch("a.unit", b"1");
    let b = fixture.touch("b.unit", b"2");
    let c = fixture.touch("c.unit", b"3");

    let registry = vec![fixture.handler("reload", "*.unit", act_success_break)];
    let engine = Engine::new(&registry, fixture.state_path(), fixture.log_dir());

    let report = engine.run(&mut ctx(), None)?;

    assert_eq!(calls_under(&fixture.watched), 1);
    assert_eq!(report.paths_recorded, 3);

    let mut tracker = reload_tracker(&fixture);
    assert!(!tracker.needs_update(&a));
    assert!(!tracker.needs_update(&b));
    assert!(!tracker.needs_update(&c));

    Ok(())
}

#[test]
fn test_break_is_confined_to_its_pattern() -> Result<()> {
    let fixture = TriggerFixture::new();
    fixture.touch("a.unit", b"1");
    fixture.touch("b.unit", b"2");
    fixture.touch("a.socket", b"3");
    fixture.touch("b.socket", b"4");

    let registry = vec![fixture.handler_multi(
        "reload",
        &["*.unit", "*.socket"],
        act_success_break,
    )];
    let engine = Engine::new(&registry, fixture.state_path(), fixture.log_dir());

    engine.run(&mut ctx(), None)?;

    // One invocation per pattern: BREAK does not leak across patterns.
    assert_eq!(calls_under(&fixture.watched), 2);

    Ok(())
}

#[test]
fn test_skip_break_drop_records_nothing() -> Result<()> {
    let fixture = TriggerFixture::new();
    let a = fixture.touch("a.unit", b"1");
    let b = fixture.touch("b.unit", b"2");
    let c = fixture.touch("c.unit", b"3");

    let registry = vec![fixture.handler("sandboxed", "*.unit", act_skip_break_drop)];
    let engine = Engine::new(&registry, fixture.state_path(), fixture.log_dir());

    let report = engine.run(&mut ctx(), None)?;

    // The first match must be probed to learn the status; the rest are
    // short-circuited, and nothing gets a fingerprint.
    assert_eq!(calls_under(&fixture.watched), 1);
    assert_eq!(report.paths_recorded, 0);

    let mut tracker = reload_tracker(&fixture);
    assert!(tracker.needs_update(&a));
    assert!(tracker.needs_update(&b));
    assert!(tracker.needs_update(&c));

    Ok(())
}

#[test]
fn test_failure_is_isolated_per_path() -> Result<()> {
    let fixture = TriggerFixture::new();
    let bad = fixture.touch("bad.lib", b"1");
    let good = fixture.touch("good.lib", b"2");
    fixture.touch("later.cache", b"3");

    let registry = vec![
        fixture.handler("libs", "*.lib", act_fail_on_bad),
        fixture.handler("caches", "*.cache", act_success),
    ];
    let engine = Engine::new(&registry, fixture.state_path(), fixture.log_dir());

    let report = engine.run(&mut ctx(), None)?;

    assert_eq!(report.failures, 1);
    assert_eq!(report.handlers_run, 2);
    // Both matches were attempted despite the first failing, and the
    // following handler still ran.
    assert_eq!(calls_under(&fixture.watched), 3);

    let mut tracker = reload_tracker(&fixture);
    assert!(tracker.needs_update(&bad));
    assert!(!tracker.needs_update(&good));

    Ok(())
}

#[test]
fn test_unknown_trigger_fails_with_no_side_effects() {
    let fixture = TriggerFixture::new();
    fixture.touch("a.lib", b"1");

    let registry = vec![fixture.handler("libs", "*.lib", act_success)];
    let engine = Engine::new(&registry, fixture.state_path(), fixture.log_dir());

    let err = engine.run(&mut ctx(), Some("no-such-trigger")).unwrap_err();
    assert!(err.to_string().contains("no-such-trigger"));

    assert_eq!(calls_under(&fixture.watched), 0);
    assert!(!fixture.state_path().exists());
    assert!(!fixture.log_dir().exists());
}

#[test]
fn test_selective_run_invokes_only_named_handler() -> Result<()> {
    let fixture = TriggerFixture::new();
    let alpha = fixture.touch("a.alpha", b"1");
    let beta = fixture.touch("b.beta", b"2");

    let registry = vec![
        fixture.handler("alpha", "*.alpha", act_success),
        fixture.handler("beta", "*.beta", act_success),
    ];
    let engine = Engine::new(&registry, fixture.state_path(), fixture.log_dir());

    let report = engine.run(&mut ctx(), Some("beta"))?;

    assert_eq!(report.handlers_run, 1);
    assert_eq!(calls_for(&alpha), 0);
    assert_eq!(calls_for(&beta), 1);

    Ok(())
}

#[test]
fn test_unmatched_path_is_garbage_collected() -> Result<()> {
    let fixture = TriggerFixture::new();
    let stale = fixture.touch("a.old", b"1");
    fixture.touch("b.new", b"2");

    let first = vec![fixture.handler("old", "*.old", act_success)];
    Engine::new(&first, fixture.state_path(), fixture.log_dir()).run(&mut ctx(), None)?;

    let mut tracker = reload_tracker(&fixture);
    assert!(!tracker.needs_update(&stale));

    // The next run's registry no longer matches the recorded path.
    let second = vec![fixture.handler("new", "*.new", act_success)];
    Engine::new(&second, fixture.state_path(), fixture.log_dir()).run(&mut ctx(), None)?;

    let mut tracker = reload_tracker(&fixture);
    assert!(tracker.needs_update(&stale));

    Ok(())
}

#[test]
fn test_force_redispatches_unchanged_paths() -> Result<()> {
    let fixture = TriggerFixture::new();
    fixture.touch("a.lib", b"1");

    let registry = vec![fixture.handler("libs", "*.lib", act_success)];

    Engine::new(&registry, fixture.state_path(), fixture.log_dir()).run(&mut ctx(), None)?;
    assert_eq!(calls_under(&fixture.watched), 1);

    Engine::new(&registry, fixture.state_path(), fixture.log_dir())
        .force(true)
        .run(&mut ctx(), None)?;
    assert_eq!(calls_under(&fixture.watched), 2);

    Ok(())
}

#[test]
fn test_dry_run_invokes_nothing_and_writes_no_state() -> Result<()> {
    let fixture = TriggerFixture::new();
    fixture.touch("a.lib", b"1");

    let registry = vec![fixture.handler("libs", "*.lib", act_success)];
    let report = Engine::new(&registry, fixture.state_path(), fixture.log_dir())
        .dry_run(true)
        .run(&mut ctx(), None)?;

    assert_eq!(report.handlers_run, 1);
    assert_eq!(calls_under(&fixture.watched), 0);
    assert!(!fixture.state_path().exists());

    Ok(())
}

#[test]
fn test_empty_and_malformed_patterns_are_silent() -> Result<()> {
    let fixture = TriggerFixture::new();

    let registry = vec![
        fixture.handler("no-matches", "*.nothing-here", act_success),
        fixture.handler("malformed", "[", act_success),
    ];
    let engine = Engine::new(&registry, fixture.state_path(), fixture.log_dir());

    let report = engine.run(&mut ctx(), None)?;
    assert_eq!(report.handlers_run, 2);
    assert_eq!(calls_under(&fixture.watched), 0);

    Ok(())
}

#[test]
fn test_corrupt_state_degrades_to_full_run() -> Result<()> {
    let fixture = TriggerFixture::new();
    fixture.touch("a.lib", b"1");

    std::fs::create_dir_all(fixture.state_path().parent().unwrap())?;
    std::fs::write(fixture.state_path(), b"garbage")?;

    let registry = vec![fixture.handler("libs", "*.lib", act_success)];
    let engine = Engine::new(&registry, fixture.state_path(), fixture.log_dir());

    // Corrupt state is not fatal; everything is simply reprocessed.
    engine.run(&mut ctx(), None)?;
    assert_eq!(calls_under(&fixture.watched), 1);

    Ok(())
}
