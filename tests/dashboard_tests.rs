//! End-to-end tests for the dashboard against an in-memory backend.

mod helpers;

use std::sync::atomic::Ordering;

use pretty_assertions::assert_eq;
use serde_json::json;

use helpers::fake_backend::{
    FakeBackend, container, image, key, lines_at, pump_until, streaming_at,
};
use sen::app::{Dashboard, Dispatch};
use sen::view::View;

const IMAGE_ID: &str = "sha256:0123456789abcdef0123456789abcdef";
const CONTAINER_ID: &str = "fedcba9876543210fedcba9876543210";

fn dashboard(backend: FakeBackend) -> Dashboard {
    let mut dashboard = Dashboard::new(Box::new(backend));
    dashboard.take_redraw();
    dashboard
}

fn inventory() -> Vec<sen::DomainObject> {
    vec![
        image(IMAGE_ID, &["x"]),
        container(CONTAINER_ID, "web"),
    ]
}

#[test]
fn test_list_rows_show_short_id_and_name() {
    let dashboard = dashboard(FakeBackend::new(inventory()));
    let list = dashboard.stack().list();

    assert_eq!(list.len(), 2);
    let texts = list.rows()[0].row.texts();
    assert_eq!(texts[0], "0123456789ab");
    assert_eq!(texts[0].len(), 12);
    assert_eq!(texts[1], "x");
}

#[test]
fn test_inspect_container_opens_pretty_json() {
    let payload = json!({"State": "running"});
    let backend = FakeBackend::new(inventory()).with_inspection(CONTAINER_ID, payload.clone());
    let mut dashboard = dashboard(backend);

    assert_eq!(dashboard.dispatch_key(&key('j')), Dispatch::Consumed);
    assert_eq!(dashboard.dispatch_key(&key('i')), Dispatch::Consumed);

    assert_eq!(dashboard.stack().len(), 2);
    assert_eq!(dashboard.stack().current_index(), 1);
    let View::Static(view) = dashboard.stack().current() else {
        panic!("expected a static view");
    };
    let expected = serde_json::to_string_pretty(&payload).expect("serialize payload");
    assert_eq!(view.text(), expected);
    assert_eq!(view.text(), "{\n  \"State\": \"running\"\n}");
    assert_eq!(view.title(), "inspect fedcba987654");
}

#[test]
fn test_inspect_image_uses_full_id() {
    let backend = FakeBackend::new(inventory()).with_inspection(IMAGE_ID, json!({"Id": IMAGE_ID}));
    let mut dashboard = dashboard(backend);

    dashboard.dispatch_key(&key('i'));

    assert_eq!(dashboard.stack().len(), 2);
    assert!(dashboard.take_redraw());
}

#[test]
fn test_inspect_failure_reports_status() {
    let mut dashboard = dashboard(FakeBackend::new(inventory()));

    dashboard.dispatch_key(&key('i'));

    assert_eq!(dashboard.stack().len(), 1);
    assert_eq!(dashboard.stack().current_index(), 0);
    assert!(
        dashboard.status().contains("Cannot inspect image 0123456789ab"),
        "status: {}",
        dashboard.status()
    );
}

#[test]
fn test_logs_ignored_on_image_row() {
    let backend = FakeBackend::new(inventory()).with_logs(CONTAINER_ID, "a\n", &[]);
    let mut dashboard = dashboard(backend);

    assert_eq!(dashboard.dispatch_key(&key('l')), Dispatch::Consumed);
    assert_eq!(dashboard.stack().len(), 1);
}

#[test]
fn test_logs_preserve_order() {
    let backend = FakeBackend::new(inventory()).with_logs(CONTAINER_ID, "a\nb\n", &["c", "d"]);
    let mut dashboard = dashboard(backend);

    dashboard.dispatch_key(&key('j'));
    dashboard.dispatch_key(&key('l'));
    assert_eq!(dashboard.stack().len(), 2);
    assert_eq!(streaming_at(&dashboard, 1).title(), "logs web");

    let ended = pump_until(&mut dashboard, |d| streaming_at(d, 1).is_ended());
    assert!(ended, "worker did not finish");
    assert_eq!(lines_at(&dashboard, 1), vec!["a", "b", "c", "d"]);
    assert_eq!(streaming_at(&dashboard, 1).focus(), 3);
}

#[test]
fn test_logs_failure_reports_status() {
    let mut dashboard = dashboard(FakeBackend::new(inventory()));

    dashboard.dispatch_key(&key('j'));
    dashboard.dispatch_key(&key('l'));

    assert_eq!(dashboard.stack().len(), 1);
    assert!(dashboard.status().contains("Cannot open logs of web"));
}

#[test]
fn test_closed_stream_takes_no_more_lines() {
    let (backend, tx) = FakeBackend::new(inventory()).with_live_logs(CONTAINER_ID, "a\n");
    let mut dashboard = dashboard(backend);

    dashboard.dispatch_key(&key('j'));
    dashboard.dispatch_key(&key('l'));
    tx.send(Ok("b".to_string())).expect("worker alive");
    assert!(pump_until(&mut dashboard, |d| lines_at(d, 1).len() == 2));

    let removed = dashboard.stack_mut().remove_current().expect("stream view");
    let View::Streaming(stream) = &removed else {
        panic!("expected the streaming view");
    };
    assert!(stream.is_cancelled());
    assert_eq!(dashboard.stack().len(), 1);
    assert_eq!(dashboard.stack().current_index(), 0);

    // The worker wakes up on the next line, sees the flag, and drops its
    // source; after that sends fail.
    let mut stopped = false;
    for _ in 0..500 {
        if tx.send(Ok("late".to_string())).is_err() {
            stopped = true;
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(10));
    }
    assert!(stopped, "worker kept consuming after destroy");

    dashboard.drain_stream_events();
    assert_eq!(stream.lines(), ["a", "b"]);
    assert_eq!(dashboard.stack().len(), 1);
}

#[test]
fn test_hidden_stream_updates_without_redraw() {
    let (backend, tx) = FakeBackend::new(inventory()).with_live_logs(CONTAINER_ID, "");
    let mut dashboard = dashboard(backend);

    dashboard.dispatch_key(&key('j'));
    dashboard.dispatch_key(&key('l'));
    dashboard.dispatch_key(&key('n'));
    assert_eq!(dashboard.stack().current_index(), 0);
    dashboard.take_redraw();

    tx.send(Ok("hidden".to_string())).expect("worker alive");
    assert!(pump_until(&mut dashboard, |d| lines_at(d, 1).len() == 1));
    assert!(!dashboard.take_redraw());

    dashboard.dispatch_key(&key('n'));
    tx.send(Ok("shown".to_string())).expect("worker alive");
    assert!(pump_until(&mut dashboard, |d| lines_at(d, 1).len() == 2));
    assert!(dashboard.take_redraw());
}

#[test]
fn test_close_refused_on_list() {
    let mut dashboard = dashboard(FakeBackend::new(inventory()));

    assert_eq!(dashboard.dispatch_key(&key('x')), Dispatch::Consumed);

    assert_eq!(dashboard.stack().len(), 1);
    assert!(dashboard.stack().current().is_list());
    assert!(dashboard.status().contains("cannot be closed"));
}

#[test]
fn test_prev_next_wrap() {
    let backend = FakeBackend::new(inventory())
        .with_inspection(IMAGE_ID, json!({}))
        .with_inspection(CONTAINER_ID, json!({}));
    let mut dashboard = dashboard(backend);

    dashboard.dispatch_key(&key('i'));
    dashboard.dispatch_key(&key('p'));
    assert_eq!(dashboard.stack().current_index(), 0);
    dashboard.dispatch_key(&key('p'));
    assert_eq!(dashboard.stack().current_index(), 1);
    dashboard.dispatch_key(&key('n'));
    assert_eq!(dashboard.stack().current_index(), 0);
    dashboard.dispatch_key(&key('n'));
    assert_eq!(dashboard.stack().current_index(), 1);

    dashboard.dispatch_key(&key('x'));
    assert_eq!(dashboard.stack().len(), 1);
    assert!(dashboard.stack().current().is_list());
}

#[test]
fn test_quit_keys() {
    let mut dashboard = dashboard(FakeBackend::new(inventory()));
    assert_eq!(dashboard.dispatch_key(&key('q')), Dispatch::Quit);
    assert_eq!(dashboard.dispatch_key(&key('Q')), Dispatch::Quit);
}

#[test]
fn test_unbound_key_is_unhandled() {
    let mut dashboard = dashboard(FakeBackend::new(inventory()));
    assert_eq!(dashboard.dispatch_key(&key('z')), Dispatch::Unhandled);
}

#[test]
fn test_empty_inventory_actions_do_nothing() {
    let mut dashboard = dashboard(FakeBackend::new(Vec::new()));

    dashboard.dispatch_key(&key('i'));
    dashboard.dispatch_key(&key('l'));

    assert_eq!(dashboard.stack().len(), 1);
}

#[test]
fn test_unavailable_backend_starts_empty() {
    let dashboard = dashboard(FakeBackend::unavailable("daemon not running"));

    assert!(dashboard.stack().list().is_empty());
    assert!(
        dashboard.status().contains("daemon not running"),
        "status: {}",
        dashboard.status()
    );
}

#[test]
fn test_shutdown_closes_streams() {
    let (backend, _tx) = FakeBackend::new(inventory()).with_live_logs(CONTAINER_ID, "a");
    let mut dashboard = dashboard(backend);

    dashboard.dispatch_key(&key('j'));
    dashboard.dispatch_key(&key('l'));
    dashboard.shutdown();

    assert_eq!(dashboard.stack().len(), 1);
    assert!(dashboard.stack().current().is_list());
}

#[test]
fn test_close_stops_log_producer() {
    let (backend, _tx, stops) = FakeBackend::new(inventory()).with_counted_logs(CONTAINER_ID, "a");
    let mut dashboard = dashboard(backend);

    dashboard.dispatch_key(&key('j'));
    dashboard.dispatch_key(&key('l'));
    assert_eq!(stops.load(Ordering::SeqCst), 0);

    dashboard.dispatch_key(&key('x'));
    assert_eq!(stops.load(Ordering::SeqCst), 1);

    dashboard.shutdown();
    drop(dashboard);
    assert_eq!(stops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_shutdown_stops_log_producer() {
    let (backend, _tx, stops) = FakeBackend::new(inventory()).with_counted_logs(CONTAINER_ID, "a");
    let mut dashboard = dashboard(backend);

    dashboard.dispatch_key(&key('j'));
    dashboard.dispatch_key(&key('l'));
    dashboard.dispatch_key(&key('p'));
    assert_eq!(dashboard.stack().current_index(), 0);

    dashboard.shutdown();
    assert_eq!(stops.load(Ordering::SeqCst), 1);
}
