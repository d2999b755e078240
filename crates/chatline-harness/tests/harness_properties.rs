//! Property tests over random interleavings.
//!
//! Random keys, engine events, completions and resizes are applied to a
//! simulated client, and the standard invariants are checked after every
//! tick.

use chatline_app::{Completion, KeyInput, Operation, encode_hex};
use chatline_harness::{CoordinatorSnapshot, InvariantRegistry, SimClient};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Key(KeyInput),
    Submit(String),
    Event(String),
    Complete(Operation, bool),
    Resize(u16, u16),
    Tick,
}

fn key() -> impl Strategy<Value = KeyInput> {
    prop_oneof![
        4 => prop::char::range('a', 'z').prop_map(KeyInput::Char),
        1 => Just(KeyInput::Char('é')),
        1 => Just(KeyInput::Backspace),
        1 => Just(KeyInput::Delete),
        1 => Just(KeyInput::Left),
        1 => Just(KeyInput::Right),
    ]
}

fn event() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{0,120}".prop_map(|text| format!(
            r#"{{"eventType":"new_message","conversationId":"c1","content":"{}"}}"#,
            encode_hex(&text)
        )),
        "[a-z0-9]{1,200}".prop_map(|id| format!(
            r#"{{"eventType":"new_conversation","conversationId":"{id}"}}"#
        )),
        Just(r#"{"eventType":"delivery_ack","conversationId":"c1"}"#.to_owned()),
        ".{0,80}",
    ]
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        Just(Operation::Start),
        Just(Operation::Identity),
        Just(Operation::DefaultInbox),
        Just(Operation::IntroBundle),
        Just(Operation::SendMessage),
    ]
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => key().prop_map(Step::Key),
        2 => prop_oneof![
            Just("/bundle".to_owned()),
            Just("/help".to_owned()),
            Just("/nope".to_owned()),
            "[a-z]{1,30}",
        ]
        .prop_map(Step::Submit),
        2 => event().prop_map(Step::Event),
        2 => (operation(), any::<bool>()).prop_map(|(op, ok)| Step::Complete(op, ok)),
        1 => (1u16..120, 1u16..50).prop_map(|(cols, rows)| Step::Resize(cols, rows)),
        3 => Just(Step::Tick),
    ]
}

fn check(client: &SimClient, registry: &InvariantRegistry, context: &str) {
    let snapshot = CoordinatorSnapshot::capture(&client.runtime);
    registry.assert_all(&snapshot, context);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn invariants_hold_for_any_interleaving(steps in prop::collection::vec(step(), 1..120)) {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        rt.block_on(async {
            let registry = InvariantRegistry::standard();
            let mut client = SimClient::new(80, 25, tokio::runtime::Handle::current()).unwrap();
            client.runtime.start();
            check(&client, &registry, "after start");

            for (i, step) in steps.into_iter().enumerate() {
                match step {
                    Step::Key(key) => client.driver.press(key),
                    Step::Submit(line) => client.driver.submit(&line),
                    Step::Event(payload) => client.backend.emit_event(payload),
                    Step::Complete(op, ok) => {
                        let completion =
                            if ok { Completion::ok("{\"name\":\"n\"}") } else { Completion::error("e") };
                        client.backend.complete(op, completion);
                    },
                    Step::Resize(cols, rows) => {
                        client.driver.set_size(cols, rows);
                        client.ctx.flags().request_resize();
                    },
                    Step::Tick => {
                        tokio::task::yield_now().await;
                        client.runtime.tick().unwrap();
                    },
                }
                check(&client, &registry, &format!("after step {i}"));
            }

            for _ in 0..8 {
                tokio::task::yield_now().await;
            }
            client.runtime.tick().unwrap();
            check(&client, &registry, "after final tick");

            client.runtime.shutdown();
            check(&client, &registry, "after shutdown");
        });
    }

    #[test]
    fn editor_never_exceeds_cap(len in 2040usize..2100) {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        rt.block_on(async {
            let mut client = SimClient::new(80, 25, tokio::runtime::Handle::current()).unwrap();
            client.driver.type_text(&"y".repeat(len));
            client.runtime.tick().unwrap();

            prop_assert_eq!(client.runtime.editor().len(), chatline_app::MAX_LINE_CHARS);
            Ok::<(), TestCaseError>(())
        })?;
    }
}
