pub mod snippet;

pub use snippet::{SnippetGenerator, SnippetLanguage};
