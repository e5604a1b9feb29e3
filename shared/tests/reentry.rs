mod common;

use clockveil_shared::{
    CloseReason, OverlayConfig, OverlayError, OverlayRegistry, ReentryPolicy, SurfaceError, Tick,
    TriggerOutcome,
};
use common::{ms, RecordingWindow, SharedLog};

fn registry(policy: ReentryPolicy) -> OverlayRegistry<RecordingWindow> {
    OverlayRegistry::new(policy, OverlayConfig::default())
}

/// Trigger once and hand back the new window's log.
fn show(reg: &mut OverlayRegistry<RecordingWindow>) -> (TriggerOutcome, SharedLog) {
    let log = SharedLog::default();
    let window_log = log.clone();
    let outcome = reg
        .trigger(move |_| Ok(RecordingWindow::with_log(window_log, 1920, 1080)))
        .unwrap();
    (outcome, log)
}

fn assert_fully_released(log: &SharedLog) {
    let log = log.borrow();
    assert!(log.running.is_empty(), "triggers still running: {:?}", log.running);
    assert_eq!(log.surface_releases, 1);
    assert_eq!(log.close_requests, 1);
    assert!(log.destroyed);
    assert_eq!(log.used_after_release, 0);
}

#[test]
fn replace_keeps_exactly_one_overlay() {
    let mut reg = registry(ReentryPolicy::Replace);
    let (first, first_log) = show(&mut reg);
    let (second, second_log) = show(&mut reg);

    let TriggerOutcome::Created(first_id) = first else {
        panic!("first trigger was not created: {first:?}");
    };
    let TriggerOutcome::Created(second_id) = second else {
        panic!("second trigger was not created: {second:?}");
    };
    assert_ne!(first_id, second_id);
    assert_eq!(reg.len(), 1);
    assert!(reg.contains(second_id));
    assert!(!reg.contains(first_id));
    assert_fully_released(&first_log);
    assert_eq!(second_log.borrow().running.len(), 2);

    // a stale tick for the replaced overlay is dropped
    assert_eq!(reg.dispatch(first_id, Tick::FadeAt(ms(100))), None);

    assert_eq!(
        reg.dispatch(second_id, Tick::FadeAt(ms(3000))),
        Some(CloseReason::FadeComplete)
    );
    assert!(reg.is_empty());
    assert_fully_released(&first_log);
    assert_fully_released(&second_log);
}

#[test]
fn ignore_leaves_running_overlay_alone() {
    let mut reg = registry(ReentryPolicy::Ignore);
    let (first, first_log) = show(&mut reg);
    let TriggerOutcome::Created(first_id) = first else {
        panic!("expected a new overlay");
    };

    let mut factory_called = false;
    let second = reg
        .trigger(|_| {
            factory_called = true;
            Ok(RecordingWindow::new(1920, 1080).0)
        })
        .unwrap();

    assert_eq!(second, TriggerOutcome::Ignored(first_id));
    assert!(!factory_called);
    assert_eq!(reg.len(), 1);
    assert_eq!(first_log.borrow().surface_releases, 0);

    reg.dispatch(first_id, Tick::FadeAt(ms(3000)));
    let (third, _log) = show(&mut reg);
    assert!(matches!(third, TriggerOutcome::Created(_)));
}

#[test]
fn concurrent_overlays_fade_independently() {
    let mut reg = registry(ReentryPolicy::Concurrent);
    let (a, a_log) = show(&mut reg);
    let (b, b_log) = show(&mut reg);
    let (TriggerOutcome::Created(a), TriggerOutcome::Created(b)) = (a, b) else {
        panic!("expected two new overlays");
    };
    assert_eq!(reg.len(), 2);

    reg.dispatch(a, Tick::FadeAt(ms(1500)));
    assert_eq!(reg.get(b).map(|o| o.opacity()), Some(128));

    assert_eq!(reg.dispatch(a, Tick::FadeAt(ms(3000))), Some(CloseReason::FadeComplete));
    assert_eq!(reg.len(), 1);
    assert_fully_released(&a_log);
    assert_eq!(b_log.borrow().surface_releases, 0);

    assert_eq!(reg.close(b), Some(CloseReason::Requested));
    assert!(reg.is_empty());
    assert_fully_released(&b_log);
}

#[test]
fn factory_failure_is_reported_and_host_continues() {
    let mut reg = registry(ReentryPolicy::Replace);
    let err = reg
        .trigger(|_| Err(SurfaceError::WindowCreation("no desktop".into())))
        .unwrap_err();
    assert!(matches!(err, OverlayError::Create(SurfaceError::WindowCreation(_))));
    assert!(reg.is_empty());

    let (outcome, _log) = show(&mut reg);
    assert!(matches!(outcome, TriggerOutcome::Created(_)));
    assert_eq!(reg.len(), 1);
}

#[test]
fn start_failure_registers_nothing_and_releases_window() {
    let mut reg = registry(ReentryPolicy::Concurrent);
    let log = SharedLog::default();
    log.borrow_mut().fail_fade_timer = true;
    let window_log = log.clone();

    let result = reg.trigger(move |_| Ok(RecordingWindow::with_log(window_log, 800, 600)));
    assert!(result.is_err());
    assert!(reg.is_empty());
    assert_eq!(log.borrow().surface_releases, 1);
    assert_eq!(log.borrow().close_requests, 1);
}

#[test]
fn close_all_releases_every_overlay_once() {
    let mut reg = registry(ReentryPolicy::Concurrent);
    let logs: Vec<SharedLog> = (0..3).map(|_| show(&mut reg).1).collect();

    assert_eq!(reg.close_all(), 3);
    assert_eq!(reg.close_all(), 0);
    assert!(reg.is_empty());
    for log in &logs {
        assert_fully_released(log);
    }
}

#[test]
fn ids_are_not_reused_after_close() {
    let mut reg = registry(ReentryPolicy::Concurrent);
    let mut seen = Vec::new();
    let mut logs = Vec::new();
    for _ in 0..4 {
        let (outcome, log) = show(&mut reg);
        let TriggerOutcome::Created(id) = outcome else {
            panic!("expected a new overlay");
        };
        assert!(!seen.contains(&id), "{id} handed out twice");
        seen.push(id);
        logs.push(log);
        assert_eq!(reg.close(id), Some(CloseReason::Requested));
    }

    assert!(reg.is_empty());
    for log in &logs {
        assert_fully_released(log);
    }
}

#[test]
fn redraw_ticks_are_routed_by_id() {
    let mut reg = registry(ReentryPolicy::Concurrent);
    let (a, a_log) = show(&mut reg);
    let (_b, b_log) = show(&mut reg);
    let TriggerOutcome::Created(a) = a else {
        panic!("expected a new overlay");
    };

    assert_eq!(reg.dispatch(a, Tick::Redraw), None);
    assert_eq!(a_log.borrow().presents.len(), 2);
    assert_eq!(b_log.borrow().presents.len(), 1);
}

#[test]
fn window_loss_removes_overlay() {
    let mut reg = registry(ReentryPolicy::Replace);
    let (outcome, log) = show(&mut reg);
    let TriggerOutcome::Created(id) = outcome else {
        panic!("expected a new overlay");
    };
    log.borrow_mut().invalid = true;

    assert_eq!(reg.dispatch(id, Tick::Fade), Some(CloseReason::WindowLost));
    assert!(reg.is_empty());
    assert!(log.borrow().running.is_empty());
}
