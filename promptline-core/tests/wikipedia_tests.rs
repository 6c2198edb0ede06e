//! Wikipedia tool against a mock MediaWiki server

use promptline_core::tools::{Tool, ToolOutcome, WikipediaSearch};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_search(server: &MockServer, query: &str, titles: &[&str]) {
    let hits: Vec<_> = titles.iter().map(|t| json!({"title": t})).collect();
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("list", "search"))
        .and(query_param("srsearch", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"query": {"search": hits}})))
        .mount(server)
        .await;
}

fn tool(server: &MockServer) -> WikipediaSearch {
    WikipediaSearch::with_base_url(reqwest::Client::new(), server.uri())
}

#[tokio::test]
async fn test_summary_is_cut_to_three_sentences() {
    let server = MockServer::start().await;
    mount_search(&server, "Albert Einstein", &["Albert Einstein"]).await;
    Mock::given(method("GET"))
        .and(path("/api/rest_v1/page/summary/Albert_Einstein"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "standard",
            "title": "Albert Einstein",
            "extract": "Albert Einstein was a German-born theoretical physicist. He developed the theory of relativity. He received the 1921 Nobel Prize in Physics. He died in 1955."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = tool(&server)
        .invoke(json!({"query": "Albert Einstein"}))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ToolOutcome::success(
            "Albert Einstein was a German-born theoretical physicist. He developed the theory of relativity. He received the 1921 Nobel Prize in Physics."
        )
    );
}

#[tokio::test]
async fn test_disambiguation_lists_at_most_five_options() {
    let server = MockServer::start().await;
    mount_search(&server, "Mercury", &["Mercury"]).await;
    Mock::given(method("GET"))
        .and(path("/api/rest_v1/page/summary/Mercury"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "disambiguation",
            "title": "Mercury",
            "extract": "Mercury may refer to:"
        })))
        .mount(&server)
        .await;

    // page order differs from alphabetical order
    let wikitext = "'''Mercury''' may refer to:
* [[Mercury (planet)]], the closest planet to the Sun
* [[Mercury (element)]], a chemical element
* [[Mercury (mythology)]], a Roman god
* [[Freddie Mercury]], a singer
* [[Mercury Records]], a record label
* [[Project Mercury]], a spaceflight programme
* [[Mercury (automobile)]], a car brand
== See also ==
* [[Abbey Road]]
";
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("action", "parse"))
        .and(query_param("page", "Mercury"))
        .and(query_param("prop", "wikitext"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "parse": {"title": "Mercury", "pageid": 19007, "wikitext": wikitext}
        })))
        .mount(&server)
        .await;

    let outcome = tool(&server).invoke(json!({"query": "Mercury"})).await.unwrap();

    match &outcome {
        ToolOutcome::Disambiguation { query, options } => {
            assert_eq!(query, "Mercury");
            assert_eq!(
                options,
                &vec![
                    "Mercury (planet)".to_string(),
                    "Mercury (element)".to_string(),
                    "Mercury (mythology)".to_string(),
                    "Freddie Mercury".to_string(),
                    "Mercury Records".to_string(),
                ]
            );
        }
        other => panic!("expected disambiguation, got {other:?}"),
    }
    assert!(outcome
        .render()
        .starts_with("Multiple results found. Please be more specific. Options: ["));
}

#[tokio::test]
async fn test_no_search_hit_is_not_found() {
    let server = MockServer::start().await;
    mount_search(&server, "Qwxzv Plonk", &[]).await;

    let outcome = tool(&server).invoke(json!({"query": "Qwxzv Plonk"})).await.unwrap();

    assert!(matches!(outcome, ToolOutcome::NotFound { .. }));
    assert_eq!(outcome.render(), "Could not find information on that topic.");
}

#[tokio::test]
async fn test_missing_page_is_not_found() {
    let server = MockServer::start().await;
    mount_search(&server, "Ghost Page", &["Ghost Page"]).await;
    Mock::given(method("GET"))
        .and(path("/api/rest_v1/page/summary/Ghost_Page"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"type": "not_found"})))
        .mount(&server)
        .await;

    let outcome = tool(&server).invoke(json!({"query": "Ghost Page"})).await.unwrap();
    assert!(matches!(outcome, ToolOutcome::NotFound { .. }));
}

#[tokio::test]
async fn test_server_error_becomes_failure_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let outcome = tool(&server).invoke(json!({"query": "Anything"})).await.unwrap();

    match &outcome {
        ToolOutcome::Failed { message } => {
            assert!(message.starts_with("Error searching Wikipedia: "));
            assert!(message.contains("503"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(outcome.render().contains("503"));
}

#[tokio::test]
async fn test_non_json_body_becomes_failure_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let outcome = tool(&server).invoke(json!({"query": "Anything"})).await.unwrap();
    assert!(matches!(outcome, ToolOutcome::Failed { .. }));
}

#[test]
fn test_declaration_matches_search_contract() {
    let definition = WikipediaSearch::new(reqwest::Client::new()).definition();
    assert_eq!(definition.function.name, "search_wikipedia");
    assert_eq!(definition.function.parameters.unwrap()["required"], json!(["query"]));
}
