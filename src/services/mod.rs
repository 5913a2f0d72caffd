pub mod http;
pub mod prompt;
pub mod providers;
pub mod response_parser;

pub use http::JsonHttpClient;
pub use prompt::generate_estimation_prompt;
pub use providers::{
    build_provider, AnthropicProvider, CohereProvider, CompletionProvider, MistralProvider,
    OpenAIProvider,
};
pub use response_parser::{extract_json, parse_estimate_response};
