//! Chat session loop integration tests.

use gollama_rs_core::{ChatSession, ModelSelection, Prompter, ResponseMode};
use gollama_rs_test_utils::{FailingBackend, ScriptedBackend};
use pretty_assertions::assert_eq;
use std::io::Cursor;

fn three_models() -> ScriptedBackend {
    ScriptedBackend::new()
        .stream("alpha", &["Hi ", "from alpha"])
        .reply("beta", "Hi from beta")
        .reply("gamma", "Hi from gamma")
}

fn all() -> ModelSelection {
    ModelSelection::All(vec![
        "alpha".to_string(),
        "beta".to_string(),
        "gamma".to_string(),
    ])
}

async fn run(
    session: &mut ChatSession<ScriptedBackend>,
    input: &str,
    initial: Option<&str>,
) -> String {
    let mut prompter = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
    session
        .run(&mut prompter, initial.map(str::to_string))
        .await
        .expect("session");
    String::from_utf8(prompter.into_parts().1).expect("utf8")
}

#[tokio::test]
async fn first_turn_fans_out_in_listed_order() {
    let backend = three_models();
    let mut session = ChatSession::new(backend.clone(), all());
    let out = run(&mut session, "hello\nA\nbye\n", None).await;

    assert_eq!(backend.models_called(), vec!["alpha", "beta", "gamma"]);
    let expected = "Gollama Responses from All Models:\n\
                    \n[alpha]:\nHi from alpha\n\
                    \n[beta]:\nHi from beta\n\
                    \n[gamma]:\nHi from gamma\n\n";
    assert!(out.contains(expected), "{out}");
    assert!(out.contains("[1] Continue with alpha\n"));
    assert!(out.contains("[3] Continue with gamma\n"));
    assert!(out.contains("[A] Continue with All Models\n"));
    assert!(out.contains("Choose an option (1, 2, 3, A): "));
    assert!(out.ends_with("Goodbye!\n"));
    assert_eq!(session.selection(), &all());
}

#[tokio::test]
async fn choosing_a_model_locks_later_turns() {
    let backend = three_models();
    let mut session = ChatSession::new(backend.clone(), all());
    let out = run(&mut session, "hello\n2\nagain\nmore\nbye\n", None).await;

    assert_eq!(
        backend.models_called(),
        vec!["alpha", "beta", "gamma", "beta", "beta"]
    );
    assert_eq!(out.matches("Gollama [beta]: Hi from beta\n").count(), 2);
    assert_eq!(session.selection(), &ModelSelection::Single("beta".to_string()));
}

#[tokio::test]
async fn invalid_choice_keeps_all_models() {
    let backend = three_models();
    let mut session = ChatSession::new(backend.clone(), all());
    let out = run(&mut session, "hello\n7\nnext\nexit\n", None).await;

    assert!(out.contains("Invalid choice. Continuing with responses from all models.\n"));
    assert_eq!(backend.models_called().len(), 6);
    assert_eq!(out.matches("Gollama Responses from All Models:").count(), 2);
    assert!(!out.contains("Gollama [alpha]"));
}

#[tokio::test]
async fn exit_phrases_issue_no_request() {
    for phrase in ["bye", "EXIT", "  Bye  "] {
        let backend = three_models();
        let mut session = ChatSession::new(backend.clone(), all());
        let out = run(&mut session, &format!("{phrase}\n"), None).await;
        assert!(backend.models_called().is_empty(), "{phrase}");
        assert_eq!(out, "You: Goodbye!\n");
    }
}

#[tokio::test]
async fn failing_model_does_not_stop_the_fan_out() {
    let backend = ScriptedBackend::new()
        .reply("alpha", "one")
        .fail("beta", "connection refused")
        .reply("gamma", "three");
    let mut session = ChatSession::new(backend.clone(), all());
    let out = run(&mut session, "hello\nA\nbye\n", None).await;

    let alpha = out.find("one").expect("alpha answer");
    let error = out
        .find("Error generating response from model beta: request failed: connection refused")
        .expect("beta error");
    let gamma = out.find("three").expect("gamma answer");
    assert!(alpha < error && error < gamma, "{out}");
    assert_eq!(backend.models_called(), vec!["alpha", "beta", "gamma"]);
}

#[tokio::test]
async fn single_model_skips_the_menu_and_forwards_settings() {
    let backend = ScriptedBackend::new().reply("alpha", "whole answer");
    let mut session = ChatSession::new(backend.clone(), ModelSelection::Single("alpha".into()))
        .with_mode(ResponseMode::Whole)
        .with_temperature(Some(0.3));
    let out = run(&mut session, "bye\n", Some("what is rust?")).await;

    assert!(out.starts_with("Gollama [alpha]: whole answer\n"), "{out}");
    assert!(!out.contains("Continue with"));
    let calls = backend.calls();
    let calls = calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].prompt, "what is rust?");
    assert!(!calls[0].stream);
    assert_eq!(calls[0].temperature, Some(0.3));
}

#[tokio::test]
async fn blank_lines_reprompt_and_eof_ends_quietly() {
    let backend = three_models();
    let mut session = ChatSession::new(backend.clone(), all());
    let out = run(&mut session, "\n   \n", None).await;

    assert_eq!(out.matches("You: ").count(), 3);
    assert!(backend.models_called().is_empty());
}

#[tokio::test]
async fn unknown_model_error_is_reported_per_turn() {
    let mut session = ChatSession::new(
        FailingBackend::new("daemon returned 500 Internal Server Error"),
        ModelSelection::Single("alpha".to_string()),
    );
    let mut prompter = Prompter::new(Cursor::new(b"one\ntwo\nbye\n".to_vec()), Vec::new());
    session.run(&mut prompter, None).await.expect("session");
    let out = String::from_utf8(prompter.into_parts().1).expect("utf8");
    assert_eq!(
        out.matches("Error generating response from model alpha: request failed: daemon returned 500")
            .count(),
        2
    );
    assert!(out.ends_with("Goodbye!\n"));
}

#[tokio::test]
async fn mis_encoded_line_does_not_end_the_session() {
    let backend = ScriptedBackend::new().reply("alpha", "hi");
    let mut session = ChatSession::new(backend.clone(), ModelSelection::Single("alpha".into()));
    let input = b"caf\xe9\nhello\nbye\n".to_vec();
    let mut prompter = Prompter::new(Cursor::new(input), Vec::new());
    session.run(&mut prompter, None).await.expect("session");

    let calls = backend.calls();
    let calls = calls.lock();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].prompt, "caf\u{FFFD}");
    assert_eq!(calls[1].prompt, "hello");
    let out = String::from_utf8(prompter.into_parts().1).expect("utf8");
    assert!(out.ends_with("Goodbye!\n"), "{out}");
}
