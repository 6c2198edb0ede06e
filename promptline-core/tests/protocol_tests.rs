//! Canonical messages and their OpenAI-compatible wire form

use promptline_core::protocol::*;
use promptline_core::providers::{GoogleProvider, OpenAIProvider, Provider};
use serde_json::json;

fn tool_call_turn() -> Vec<Message> {
    vec![
        Message::system("You are AnjingPintar."),
        Message::user("Who is Albert Einstein?"),
        MessageBuilder::new(MessageRole::Assistant, "")
            .with_tool_calls(vec![ToolCall::function(
                "call_123",
                "search_wikipedia",
                json!({"query": "Albert Einstein"}),
            )])
            .build(),
        Message::tool("call_123", "Albert Einstein was a theoretical physicist."),
    ]
}

#[test]
fn test_message_construction() {
    let tool_msg = Message::tool("call_123", "Tool result");
    assert_eq!(tool_msg.role, MessageRole::Tool);
    assert_eq!(tool_msg.tool_call_id.as_deref(), Some("call_123"));
    assert!(!tool_msg.has_tool_calls());

    let call_msg = &tool_call_turn()[2];
    assert!(call_msg.has_tool_calls());
    assert_eq!(call_msg.tool_calls.as_ref().unwrap()[0].name(), "search_wikipedia");
}

#[test]
fn test_role_aliases_deserialize() {
    let human: Message = serde_json::from_value(json!({"role": "human", "content": "hi"})).unwrap();
    let ai: Message = serde_json::from_value(json!({"role": "ai", "content": "hello"})).unwrap();
    assert_eq!(human.role, MessageRole::User);
    assert_eq!(ai.role, MessageRole::Assistant);
}

#[test]
fn test_tool_call_conversation_wire_format() {
    let tools = vec![ToolDefinition::function(
        "search_wikipedia",
        "Search Wikipedia for information about a topic.",
        json!({"type": "object", "properties": {"query": {"type": "string"}}, "required": ["query"]}),
    )];
    let request = ChatRequest::new("gpt-4o-mini", tool_call_turn())
        .with_temperature(0.9)
        .with_tools(&tools);

    let wire = serde_json::to_value(OpenAIProvider::new().transform_request(&request)).unwrap();

    assert_eq!(wire["tool_choice"], json!("auto"));
    assert_eq!(wire["tools"][0]["type"], json!("function"));
    assert_eq!(wire["tools"][0]["function"]["name"], json!("search_wikipedia"));

    let messages = wire["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[2]["role"], json!("assistant"));
    assert!(messages[2]["content"].is_null());
    assert_eq!(messages[2]["tool_calls"][0]["id"], json!("call_123"));
    assert_eq!(
        messages[2]["tool_calls"][0]["function"]["arguments"],
        json!("{\"query\":\"Albert Einstein\"}")
    );
    assert_eq!(messages[3]["role"], json!("tool"));
    assert_eq!(messages[3]["tool_call_id"], json!("call_123"));
}

#[test]
fn test_empty_tool_list_clears_tool_choice() {
    let request = ChatRequest::new("m", vec![Message::user("hi")]).with_tools(&[]);
    assert!(request.tools.is_none());
    assert!(request.tool_choice.is_none());
}

#[test]
fn test_google_drops_seed() {
    let mut request = ChatRequest::new("gemini-2.0-flash", vec![Message::user("hi")]);
    request.seed = Some(7);

    let openai = OpenAIProvider::new().transform_request(&request);
    let google = GoogleProvider::new().transform_request(&request);
    assert_eq!(openai.seed, Some(7));
    assert_eq!(google.seed, None);
}
