// Adapters layer: concrete fetchers and parsers behind the domain ports.

pub mod file_fetcher;
pub mod json_parser;
pub mod jsonl_parser;

pub use file_fetcher::FileFetcher;
pub use json_parser::JsonParser;
pub use jsonl_parser::JsonLinesParser;
