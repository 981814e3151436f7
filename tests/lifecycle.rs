#![allow(clippy::unwrap_used, clippy::expect_used)]

mod support;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use support::{FakeShell, toaster};
use traytoast::ToastRequest;
use traytoast::icon::IconSource;
use traytoast::types::{Outcome, Stage, TrayEvent};

fn quick(title: &str, message: &str) -> ToastRequest {
    ToastRequest::new(title, message).duration(Some(Duration::ZERO))
}

#[test]
fn synchronous_toast_tears_everything_down_before_returning() {
    let shell = Arc::new(FakeShell::scripted([TrayEvent::BalloonClicked]));
    let toaster = toaster(&shell);

    assert!(toaster.show_toast(quick("Build", "done"), false));

    insta::assert_snapshot!(shell.calls().join("\n"), @r#"
    register_class
    create_window Taskbar
    load_icon_file traytoast-default.ico
    add_tray_icon id=0 icon=100 tip=Tooltip
    post_balloon id=0 "Build" "done" 200ms
    pump_messages
    remove_tray_icon id=0
    post_quit
    destroy_window
    unregister_class
    "#);
    assert!(!toaster.is_active());
}

#[test]
fn click_callback_runs_exactly_once() {
    let shell = Arc::new(FakeShell::scripted([
        TrayEvent::BalloonClicked,
        TrayEvent::BalloonClicked,
    ]));
    let clicks = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&clicks);
    let request = quick("t", "m").on_click(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let report = toaster(&shell).run(request);

    assert_eq!(clicks.load(Ordering::SeqCst), 1);
    assert_eq!(report.outcome, Outcome::Clicked);
    assert_eq!(report.final_stage, Stage::TornDown);
    assert_eq!(shell.called("remove_tray_icon"), 1);
}

#[test]
fn panicking_callback_does_not_abort_the_lifecycle() {
    let shell = Arc::new(FakeShell::scripted([TrayEvent::BalloonClicked]));
    let request = quick("t", "m").on_click(|| panic!("handler failed"));

    let report = toaster(&shell).run(request);

    assert_eq!(report.outcome, Outcome::Clicked);
    assert_eq!(shell.called("unregister_class"), 1);
}

#[test]
fn balloon_timeout_is_reported_as_expired() {
    let shell = Arc::new(FakeShell::scripted([TrayEvent::BalloonTimeout]));
    let report = toaster(&shell).run(quick("t", "m"));

    assert_eq!(report.outcome, Outcome::Expired);
    assert_eq!(shell.called("remove_tray_icon"), 1);
    assert_eq!(shell.called("post_quit"), 1);
}

#[test]
fn loop_ending_without_an_event_still_removes_the_tray_entry() {
    let shell = Arc::new(FakeShell::scripted([]));
    let report = toaster(&shell).run(quick("t", "m"));

    assert_eq!(report.outcome, Outcome::Interrupted);
    assert_eq!(report.final_stage, Stage::TornDown);
    let calls = shell.calls();
    let tail: Vec<&str> = calls.iter().rev().take(3).rev().map(String::as_str).collect();
    assert_eq!(
        tail,
        ["destroy_window", "remove_tray_icon id=0", "unregister_class"]
    );
    assert_eq!(shell.called("post_quit"), 0);
}

#[test]
fn background_toast_returns_at_once_and_blocks_a_second_one() {
    let (shell, release) = FakeShell::gated([TrayEvent::BalloonClicked]);
    let shell = Arc::new(shell);
    let toaster = toaster(&shell);
    let clicks = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&clicks);

    let started = Instant::now();
    let request = ToastRequest::new("first", "m")
        .duration(Some(Duration::from_millis(300)))
        .on_click(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    assert!(toaster.show_toast(request, true));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(toaster.is_active());

    assert!(!toaster.show_toast(quick("second", "m"), true));

    release.send(()).unwrap();
    let report = toaster.join().expect("background run should report");

    assert_eq!(report.outcome, Outcome::Clicked);
    assert_eq!(clicks.load(Ordering::SeqCst), 1);
    assert!(!toaster.is_active());
    assert!(toaster.join().is_none());
    assert_eq!(shell.called("post_balloon"), 1);
    assert_eq!(shell.called("register_class"), 1);
}

#[test]
fn finished_background_toast_frees_the_slot() {
    let shell = Arc::new(FakeShell::scripted([TrayEvent::BalloonTimeout]));
    let toaster = toaster(&shell);

    assert!(toaster.show_toast(quick("one", "m"), true));
    assert!(toaster.join().is_some());
    assert!(toaster.show_toast(quick("two", "m"), true));
    assert!(toaster.join().is_some());
    assert_eq!(shell.called("unregister_class"), 2);
}

#[test]
fn toast_is_held_for_its_duration() {
    let shell = Arc::new(FakeShell::scripted([TrayEvent::BalloonClicked]));
    let request = ToastRequest::new("t", "m").duration(Some(Duration::from_millis(300)));

    let started = Instant::now();
    toaster(&shell).run(request);

    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[test]
fn zero_duration_returns_promptly() {
    let shell = Arc::new(FakeShell::scripted([TrayEvent::BalloonClicked]));
    let started = Instant::now();
    toaster(&shell).run(quick("t", "m"));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn missing_icon_falls_back_to_the_system_icon() {
    let shell = Arc::new(FakeShell::scripted([TrayEvent::BalloonTimeout]));
    let request = quick("t", "m").icon("/definitely/not/here/alert.ico");

    let report = toaster(&shell).run(request);

    assert_eq!(report.icon, IconSource::System);
    assert_eq!(shell.called("load_icon_file"), 0);
    assert_eq!(shell.called("load_system_icon"), 1);
    assert_eq!(shell.called("add_tray_icon id=0 icon=1 "), 1);
}

#[test]
fn no_icon_uses_the_bundled_one() {
    let shell = Arc::new(FakeShell::scripted([TrayEvent::BalloonTimeout]));
    let report = toaster(&shell).run(quick("t", "m"));

    assert!(matches!(
        report.icon,
        IconSource::Bundled(ref path) if path.ends_with("traytoast-default.ico")
    ));
}

#[test]
fn each_run_gets_its_own_window_class() {
    let shell = Arc::new(FakeShell::scripted([
        TrayEvent::BalloonTimeout,
        TrayEvent::BalloonTimeout,
    ]));
    let toaster = toaster(&shell);

    let first = toaster.run(quick("t", "m"));
    let second = toaster.run(quick("t", "m"));

    assert_ne!(first.class_name, second.class_name);
    assert!(first.class_name.starts_with("TrayToast-"));
}

#[test]
fn failed_window_creation_skips_the_loop_and_unregisters() {
    let shell = Arc::new(FakeShell::scripted([TrayEvent::BalloonClicked]).failing_create());
    let started = Instant::now();
    let report = toaster(&shell).run(
        ToastRequest::new("t", "m").duration(Some(Duration::from_secs(30))),
    );

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(report.outcome, Outcome::NotDisplayed);
    assert_eq!(report.final_stage, Stage::TornDown);
    assert_eq!(shell.called("pump_messages"), 0);
    assert_eq!(shell.called("add_tray_icon"), 0);
    assert_eq!(shell.called("unregister_class"), 1);
}

#[test]
fn failed_registration_still_tears_down() {
    let shell = Arc::new(FakeShell::scripted([TrayEvent::BalloonTimeout]).failing_register());
    let report = toaster(&shell).run(quick("t", "m"));

    assert_eq!(report.final_stage, Stage::TornDown);
    assert_eq!(report.outcome, Outcome::Expired);
    assert_eq!(shell.called("unregister_class"), 1);
    assert_eq!(shell.called("destroy_window"), 1);
}

#[test]
fn rejected_tray_entry_skips_the_loop() {
    let shell = Arc::new(FakeShell::scripted([TrayEvent::BalloonClicked]).failing_tray());
    let toaster = toaster(&shell);
    let started = Instant::now();

    assert!(toaster.show_toast(
        ToastRequest::new("t", "m").duration(Some(Duration::from_secs(30))),
        true,
    ));
    let report = toaster.join().expect("background run should report");

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(!toaster.is_active());
    assert_eq!(report.outcome, Outcome::NotDisplayed);
    assert_eq!(report.final_stage, Stage::TornDown);
    assert_eq!(shell.called("pump_messages"), 0);
    assert_eq!(shell.called("remove_tray_icon"), 0);
    assert_eq!(shell.called("destroy_window"), 1);
    assert_eq!(shell.called("unregister_class"), 1);
}
