//! Agent dispatcher: a fixed triage tree routed by keyword heuristics.
//!
//! Triage delegates exactly once to one of three specialists; specialists
//! never delegate further. The substring checks are kept verbatim from the
//! original bot, so false positives on overlapping keywords ("find a file"
//! vs "fine dining") are a known limitation rather than a defect.

use crate::llm::{LlmBackend, LlmError};
use crate::tools::SearchTool;

const TRIAGE_NAME: &str = "LINE Assistant";
const RESPONDER_NAME: &str = "Assistant";
const WEB_SEARCH_NAME: &str = "Web Search";
const FILE_SEARCH_NAME: &str = "File Search";

const TRIAGE_MODEL: &str = "gpt-4o";
const SPECIALIST_MODEL: &str = "gpt-4o-mini";

/// One behavior branch: instructions, model, owned capability stubs, and
/// delegation children. Immutable after construction; built once at process
/// start and shared read-only for the lifetime of the server.
#[derive(Debug, Clone)]
pub struct Agent {
    pub name: String,
    pub instructions: String,
    pub model: String,
    pub tools: Vec<SearchTool>,
    pub handoffs: Vec<Agent>,
}

impl Agent {
    fn handoff(&self, name: &str) -> Option<&Agent> {
        self.handoffs.iter().find(|a| a.name == name)
    }
}

/// Specialist chosen for an input. Dispatch is single-hop: triage picks one
/// of these and the chosen role answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Responder,
    WebSearch,
    FileSearch,
}

/// Keyword routing: "search"/"find" selects a search specialist, narrowed to
/// file search when "file"/"document" also appears; everything else goes to
/// the responder.
pub fn route(text: &str) -> Route {
    let lower = text.to_lowercase();
    if lower.contains("search") || lower.contains("find") {
        if lower.contains("file") || lower.contains("document") {
            Route::FileSearch
        } else {
            Route::WebSearch
        }
    } else {
        Route::Responder
    }
}

/// Build the fixed agent tree: triage with responder, web-search, and
/// file-search children. The file-search stub carries the configured vector
/// store ids in order.
pub fn build_agent_tree(vector_store_ids: &[String]) -> Agent {
    let responder = Agent {
        name: RESPONDER_NAME.to_string(),
        instructions:
            "You are a helpful assistant who responds concisely with the same language as user's query"
                .to_string(),
        model: SPECIALIST_MODEL.to_string(),
        tools: Vec::new(),
        handoffs: Vec::new(),
    };
    let web_search = Agent {
        name: WEB_SEARCH_NAME.to_string(),
        instructions: "You provide concise summaries of web search results.".to_string(),
        model: SPECIALIST_MODEL.to_string(),
        tools: vec![SearchTool::Web],
        handoffs: Vec::new(),
    };
    let file_search = Agent {
        name: FILE_SEARCH_NAME.to_string(),
        instructions: "You provide concise summaries of file search results.".to_string(),
        model: SPECIALIST_MODEL.to_string(),
        tools: vec![SearchTool::File {
            store_ids: vector_store_ids.to_vec(),
        }],
        handoffs: Vec::new(),
    };
    Agent {
        name: TRIAGE_NAME.to_string(),
        instructions: "You determine which agent to use based on the user's query.".to_string(),
        model: TRIAGE_MODEL.to_string(),
        tools: Vec::new(),
        handoffs: vec![responder, web_search, file_search],
    }
}

/// Run one dispatch: route the message, delegate to the matching specialist,
/// and produce the reply text.
///
/// A specialist with a matching stub returns the stub output directly,
/// never through the LLM. The responder path (the explicit default and any
/// failed specialist lookup) calls the backend with the agent's instructions
/// and the original-case message; a tree without a responder answers as the
/// triage agent itself. Errors propagate to the caller unmodified.
pub async fn run<B: LlmBackend>(
    triage: &Agent,
    backend: &B,
    message: &str,
) -> Result<String, LlmError> {
    let route = route(message);
    let specialist = match route {
        Route::WebSearch => triage.handoff(WEB_SEARCH_NAME),
        Route::FileSearch => triage.handoff(FILE_SEARCH_NAME),
        Route::Responder => None,
    };

    if let Some(agent) = specialist {
        let tool = agent.tools.iter().find(|t| match route {
            Route::WebSearch => matches!(t, SearchTool::Web),
            Route::FileSearch => matches!(t, SearchTool::File { .. }),
            Route::Responder => false,
        });
        if let Some(tool) = tool {
            return Ok(tool.lookup(message));
        }
        // Specialist without its stub answers through the LLM.
        return backend
            .complete(&agent.model, &agent.instructions, message)
            .await;
    }

    let agent = triage.handoff(RESPONDER_NAME).unwrap_or(triage);
    backend
        .complete(&agent.model, &agent.instructions, message)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockBackend {
        reply: Result<String, String>,
        calls: Mutex<Vec<(String, String, String)>>,
    }

    impl MockBackend {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, String, String)> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl LlmBackend for MockBackend {
        async fn complete(
            &self,
            model: &str,
            instructions: &str,
            message: &str,
        ) -> Result<String, LlmError> {
            self.calls.lock().expect("calls lock").push((
                model.to_string(),
                instructions.to_string(),
                message.to_string(),
            ));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(LlmError::Api(e.clone())),
            }
        }
    }

    #[test]
    fn routes_by_keywords() {
        assert_eq!(route("please search the web"), Route::WebSearch);
        assert_eq!(route("FIND me something"), Route::WebSearch);
        assert_eq!(route("search my files"), Route::FileSearch);
        assert_eq!(route("find the contract document"), Route::FileSearch);
        assert_eq!(route("what's the weather?"), Route::Responder);
        // "file" alone does not trigger search.
        assert_eq!(route("my file is broken"), Route::Responder);
    }

    #[tokio::test]
    async fn web_route_returns_stub_output_without_llm() {
        let triage = build_agent_tree(&[]);
        let backend = MockBackend::replying("unused");
        let out = run(&triage, &backend, "search for rust news").await.expect("run");
        assert_eq!(out, "Web search results for: search for rust news");
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn file_route_includes_store_ids_in_order() {
        let stores = vec!["vs_1".to_string(), "vs_2".to_string()];
        let triage = build_agent_tree(&stores);
        let backend = MockBackend::replying("unused");
        let out = run(&triage, &backend, "search my files for the report")
            .await
            .expect("run");
        assert_eq!(
            out,
            "File search results for: search my files for the report in stores: vs_1, vs_2"
        );
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn responder_receives_original_case_message() {
        let triage = build_agent_tree(&[]);
        let backend = MockBackend::replying("hi there");
        let out = run(&triage, &backend, "Hello Bot").await.expect("run");
        assert_eq!(out, "hi there");
        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        let (model, instructions, message) = &calls[0];
        assert_eq!(model, "gpt-4o-mini");
        assert_eq!(
            instructions,
            "You are a helpful assistant who responds concisely with the same language as user's query"
        );
        assert_eq!(message, "Hello Bot");
    }

    #[tokio::test]
    async fn dispatch_is_idempotent() {
        let triage = build_agent_tree(&["vs_1".to_string()]);
        let backend = MockBackend::replying("same answer");
        let first = run(&triage, &backend, "search files for notes").await.expect("run");
        let second = run(&triage, &backend, "search files for notes").await.expect("run");
        assert_eq!(first, second);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_specialist_falls_back_to_responder() {
        let mut triage = build_agent_tree(&[]);
        triage.handoffs.retain(|a| a.name == RESPONDER_NAME);
        let backend = MockBackend::replying("fallback answer");
        let out = run(&triage, &backend, "search for anything").await.expect("run");
        assert_eq!(out, "fallback answer");
        assert_eq!(backend.calls()[0].0, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn missing_responder_answers_as_triage() {
        let mut triage = build_agent_tree(&[]);
        triage.handoffs.clear();
        let backend = MockBackend::replying("triage answer");
        let out = run(&triage, &backend, "hello").await.expect("run");
        assert_eq!(out, "triage answer");
        let (model, instructions, _) = backend.calls()[0].clone();
        assert_eq!(model, "gpt-4o");
        assert_eq!(
            instructions,
            "You determine which agent to use based on the user's query."
        );
    }

    #[tokio::test]
    async fn specialist_without_stub_answers_through_llm() {
        let mut triage = build_agent_tree(&[]);
        for agent in &mut triage.handoffs {
            if agent.name == WEB_SEARCH_NAME {
                agent.tools.clear();
            }
        }
        let backend = MockBackend::replying("llm web summary");
        let out = run(&triage, &backend, "search for rust").await.expect("run");
        assert_eq!(out, "llm web summary");
        let (model, instructions, _) = backend.calls()[0].clone();
        assert_eq!(model, "gpt-4o-mini");
        assert_eq!(instructions, "You provide concise summaries of web search results.");
    }

    #[tokio::test]
    async fn backend_error_propagates() {
        let triage = build_agent_tree(&[]);
        let backend = MockBackend::failing("upstream boom");
        let err = run(&triage, &backend, "hello").await.unwrap_err();
        assert!(matches!(err, LlmError::Api(ref m) if m == "upstream boom"));
    }
}
