//! Cross-thread tests.
//!
//! Engine completions and events arrive on threads the client does not
//! own. These tests fire them from plain OS threads while the render loop
//! keeps ticking, then check nothing was lost, duplicated or torn.

use std::{collections::HashSet, sync::Arc, thread};

use chatline_app::{ClientConfig, Completion, Operation, encode_hex};
use chatline_harness::{InvariantRegistry, SimClient};
use tokio::runtime::Handle;

fn client() -> SimClient {
    SimClient::new(80, 25, Handle::current()).unwrap()
}

/// Oracle Pattern: concurrent producers into one buffer
///
/// Each producer's surviving lines keep their relative order and no line
/// appears twice.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_appends_keep_valid_suffix() {
    let client = client();
    let producers: Vec<_> = (0..4)
        .map(|p| {
            let ctx = Arc::clone(&client.ctx);
            thread::spawn(move || {
                for i in 0..50 {
                    ctx.message(&format!("{p}:{i}"));
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    let lines = client.messages();
    assert_eq!(lines.len(), 100);

    let unique: HashSet<_> = lines.iter().collect();
    assert_eq!(unique.len(), lines.len());

    for p in 0..4 {
        let seq: Vec<u32> = lines
            .iter()
            .filter_map(|line| line.split_once(':'))
            .filter(|(producer, _)| *producer == p.to_string())
            .map(|(_, i)| i.parse().unwrap())
            .collect();
        assert!(seq.windows(2).all(|w| w[0] < w[1]), "producer {p} reordered: {seq:?}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn completions_from_many_threads() {
    let mut client = client();
    for _ in 0..20 {
        client.driver.submit("/bundle");
    }
    client.runtime.tick().unwrap();
    assert_eq!(client.backend.pending_count(), 20);

    let workers: Vec<_> = (0..4)
        .map(|w| {
            let backend = Arc::clone(&client.backend);
            thread::spawn(move || {
                for i in 0..5 {
                    let bundle = format!("B{w}-{i}");
                    assert!(backend.complete(Operation::IntroBundle, Completion::ok(bundle)));
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert!(client.settle(|c| c.messages().len() == 80).await);
    let messages = client.messages();
    for w in 0..4 {
        for i in 0..5 {
            let bundle = format!("B{w}-{i}");
            assert_eq!(messages.iter().filter(|line| **line == bundle).count(), 1);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn events_while_ticking_hold_invariants() {
    let config = ClientConfig { message_capacity: 30, log_capacity: 20, ..ClientConfig::default() };
    let mut client = SimClient::with_config(60, 20, Handle::current(), config, "sim").unwrap();
    client.runtime.start();

    let backend = Arc::clone(&client.backend);
    let emitter = thread::spawn(move || {
        for i in 0..200 {
            let payload = format!(
                r#"{{"eventType":"new_message","conversationId":"c1","content":"{}"}}"#,
                encode_hex(&format!("event {i}"))
            );
            backend.emit_event(payload);
        }
    });

    let registry = InvariantRegistry::standard();
    let mut done = false;
    for _ in 0..2000 {
        client.runtime.tick().unwrap();
        registry.assert_all(&client.snapshot(), "while events arrive");
        if client.messages().last().map(String::as_str) == Some("<- event 199") {
            done = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
    }
    emitter.join().unwrap();

    assert!(done, "last event never rendered");
    assert_eq!(client.messages().len(), 30);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn snapshot_during_appends_fits_pane() {
    let client = client();
    let ctx = Arc::clone(&client.ctx);
    let writer = thread::spawn(move || {
        for i in 0..500 {
            ctx.message(&"x".repeat(i % 200));
        }
    });

    for _ in 0..200 {
        let rows = client.ctx.messages().snapshot_for_render(20, 5);
        assert!(rows.len() <= 5);
        assert!(rows.iter().all(|row| row.chars().count() <= 20));
    }
    writer.join().unwrap();
}
