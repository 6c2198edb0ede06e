//! Conversion between the canonical protocol and the OpenAI wire format

use super::types::*;
use crate::protocol::{
    ChatRequest, ChatResponse, CompletionUsage, FunctionCall, Message, MessageRole,
    ResponseChoice, ResponseFormat, ToolCall, ToolChoice, ToolDefinition,
};

/// Convert a ChatRequest to the wire format
pub fn to_openai_request(request: &ChatRequest) -> OpenAIRequest {
    OpenAIRequest {
        model: request.model.clone(),
        messages: request.messages.iter().map(to_openai_message).collect(),
        temperature: request.temperature,
        max_tokens: request.max_tokens.map(|t| t as u32),
        stop: request.stop.clone(),
        response_format: request.response_format.as_ref().map(to_openai_response_format),
        seed: request.seed,
        tools: request
            .tools
            .as_ref()
            .map(|tools| tools.iter().map(to_openai_tool).collect()),
        tool_choice: request.tool_choice.as_ref().map(to_openai_tool_choice),
    }
}

/// Convert a Message to the wire format
fn to_openai_message(message: &Message) -> OpenAIMessage {
    // Assistant tool-call turns carry null content rather than ""
    let content = if message.content.is_empty() && message.has_tool_calls() {
        None
    } else {
        Some(message.content.clone())
    };

    OpenAIMessage {
        role: message.role.as_str().to_string(),
        content,
        name: message.name.clone(),
        tool_calls: message.tool_calls.as_ref().map(|tcs| {
            tcs.iter()
                .map(|tc| OpenAIToolCall {
                    id: tc.id.clone(),
                    tool_type: tc.tool_type.clone(),
                    function: OpenAIFunctionCall {
                        name: tc.function.name.clone(),
                        arguments: tc.function.arguments.clone(),
                    },
                })
                .collect()
        }),
        tool_call_id: message.tool_call_id.clone(),
    }
}

fn to_openai_response_format(format: &ResponseFormat) -> OpenAIResponseFormat {
    let format_type = match format {
        ResponseFormat::Text => "text",
        ResponseFormat::JsonObject => "json_object",
    };
    OpenAIResponseFormat {
        format_type: format_type.to_string(),
    }
}

fn to_openai_tool(tool: &ToolDefinition) -> OpenAITool {
    OpenAITool {
        tool_type: tool.tool_type.clone(),
        function: OpenAIFunction {
            name: tool.function.name.clone(),
            description: tool.function.description.clone(),
            parameters: tool.function.parameters.clone(),
        },
    }
}

fn to_openai_tool_choice(choice: &ToolChoice) -> serde_json::Value {
    match choice {
        ToolChoice::Mode(mode) => serde_json::json!(mode),
        ToolChoice::Function { function, .. } => {
            serde_json::json!({
                "type": "function",
                "function": {
                    "name": function.name
                }
            })
        }
    }
}

/// Convert a wire response to the canonical format
pub fn from_openai_response(response: OpenAIResponse) -> ChatResponse {
    ChatResponse {
        id: response.id,
        object: response.object,
        created: response.created,
        model: response.model,
        choices: response.choices.into_iter().map(from_openai_choice).collect(),
        usage: response.usage.map(|usage| CompletionUsage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }),
    }
}

fn from_openai_choice(choice: OpenAIChoice) -> ResponseChoice {
    ResponseChoice {
        index: choice.index,
        message: from_openai_message(choice.message),
        finish_reason: choice.finish_reason,
    }
}

fn from_openai_message(message: OpenAIMessage) -> Message {
    let role = MessageRole::parse(&message.role).unwrap_or(MessageRole::Assistant);

    // An empty tool_calls array means "no tool calls"
    let tool_calls = message.tool_calls.filter(|tcs| !tcs.is_empty()).map(|tcs| {
        tcs.into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                tool_type: tc.tool_type,
                function: FunctionCall {
                    name: tc.function.name,
                    arguments: tc.function.arguments,
                },
            })
            .collect()
    });

    Message {
        role,
        content: message.content.unwrap_or_default(),
        name: message.name,
        tool_calls,
        tool_call_id: message.tool_call_id,
        metadata: Default::default(),
    }
}
