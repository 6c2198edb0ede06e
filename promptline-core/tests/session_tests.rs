//! Session-scoped conversation behaviour

use promptline_core::model::{ModelReply, ScriptedChatModel};
use promptline_core::prompt::ChatPromptTemplate;
use promptline_core::protocol::{Message, MessageRole};
use promptline_core::session::{
    ConversationalResponder, HistoryPolicy, InMemorySessionStore, SessionStore,
};
use std::sync::Arc;

const RUDE: &str = "You are a rude assistant.";

/// Replies with how many messages it was sent, so the reply encodes what it saw
fn counting_model() -> Arc<ScriptedChatModel> {
    Arc::new(ScriptedChatModel::from_fn(|messages, _| {
        Ok(ModelReply::text_reply(format!("saw {}", messages.len())))
    }))
}

#[tokio::test]
async fn test_second_turn_sees_first_exchange() {
    let model = Arc::new(ScriptedChatModel::with_texts(["Hi X.", "Your name is X."]));
    let store = Arc::new(InMemorySessionStore::new());
    let responder = ConversationalResponder::with_system_instruction(model.clone(), store, RUDE);

    responder.respond("user1", "My name is X").await.unwrap();
    let answer = responder.respond("user1", "What is my name?").await.unwrap();
    assert_eq!(answer, "Your name is X.");

    let second = &model.calls()[1].messages;
    assert_eq!(
        second,
        &vec![
            Message::system(RUDE),
            Message::user("My name is X"),
            Message::assistant("Hi X."),
            Message::user("What is my name?"),
        ]
    );
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let model = counting_model();
    let store = Arc::new(InMemorySessionStore::new());
    let responder =
        ConversationalResponder::with_system_instruction(model.clone(), store.clone(), RUDE);

    assert_eq!(responder.respond("alice", "one").await.unwrap(), "saw 2");
    assert_eq!(responder.respond("alice", "two").await.unwrap(), "saw 4");
    assert_eq!(responder.respond("bob", "hello").await.unwrap(), "saw 2");

    let bob_call = &model.calls()[2].messages;
    assert!(bob_call.iter().all(|m| m.content != "one" && m.content != "two"));

    assert_eq!(store.history("alice").await.len(), 4);
    assert_eq!(store.history("bob").await.len(), 2);
    assert_eq!(store.session_ids().await, vec!["alice".to_string(), "bob".to_string()]);
}

#[tokio::test]
async fn test_history_is_spliced_after_system_messages() {
    let model = counting_model();
    let store = Arc::new(InMemorySessionStore::new());
    let prompt = ChatPromptTemplate::from_messages([
        ("system", "You are terse."),
        ("system", "Never apologise."),
        ("human", "Question: {input}"),
    ])
    .unwrap();
    let responder = ConversationalResponder::new(model.clone(), store.clone(), prompt);

    responder.respond("s", "first").await.unwrap();
    responder.respond("s", "second").await.unwrap();

    let sent = &model.calls()[1].messages;
    let roles: Vec<MessageRole> = sent.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            MessageRole::System,
            MessageRole::System,
            MessageRole::User,
            MessageRole::Assistant,
            MessageRole::User,
        ]
    );
    assert_eq!(sent[2].content, "Question: first");
    assert_eq!(sent[4].content, "Question: second");

    // system messages are not stored
    assert!(store
        .history("s")
        .await
        .iter()
        .all(|m| m.role != MessageRole::System));
}

#[tokio::test]
async fn test_few_shot_examples_are_not_stored() {
    let model = counting_model();
    let store = Arc::new(InMemorySessionStore::new());
    let prompt = ChatPromptTemplate::from_messages([
        ("system", "Answer briefly."),
        ("human", "Example question"),
        ("ai", "Example answer"),
        ("human", "{input}"),
    ])
    .unwrap();
    let responder = ConversationalResponder::new(model.clone(), store.clone(), prompt);

    assert_eq!(responder.respond("s", "My name is X").await.unwrap(), "saw 4");
    assert_eq!(responder.respond("s", "What is my name?").await.unwrap(), "saw 6");

    let history = store.history("s").await;
    assert_eq!(
        history,
        vec![
            Message::user("My name is X"),
            Message::assistant("saw 4"),
            Message::user("What is my name?"),
            Message::assistant("saw 6"),
        ]
    );

    // examples once, then history, then the new input
    let calls = model.calls();
    let contents: Vec<&str> = calls[1].messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        contents,
        vec![
            "Answer briefly.",
            "Example question",
            "Example answer",
            "My name is X",
            "saw 4",
            "What is my name?",
        ]
    );
}

#[tokio::test]
async fn test_policy_bounds_sent_not_stored() {
    let model = counting_model();
    let store = Arc::new(InMemorySessionStore::new());
    let responder =
        ConversationalResponder::with_system_instruction(model.clone(), store.clone(), RUDE)
            .with_history_policy(HistoryPolicy::KeepLastMessages(2));

    for turn in 0..5 {
        responder.respond("s", &format!("turn {turn}")).await.unwrap();
    }

    for call in model.calls() {
        assert!(call.messages.len() <= 4);
    }
    assert_eq!(store.history("s").await.len(), 10);
}

#[tokio::test]
async fn test_concurrent_turns_on_one_session_are_serialized() {
    let model = counting_model();
    let store = Arc::new(InMemorySessionStore::new());
    let responder = Arc::new(ConversationalResponder::with_system_instruction(
        model.clone(),
        store.clone(),
        RUDE,
    ));

    let mut handles = Vec::new();
    for i in 0..8 {
        let responder = Arc::clone(&responder);
        handles.push(tokio::spawn(async move {
            responder.respond("shared", &format!("msg {i}")).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let history = store.history("shared").await;
    assert_eq!(history.len(), 16);

    // every turn saw a complete, strictly growing history
    let mut seen: Vec<usize> = model.calls().iter().map(|c| c.messages.len()).collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..8).map(|turn| 2 + 2 * turn).collect::<Vec<_>>());
}
