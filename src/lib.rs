pub mod document_matcher;
pub mod error;
pub mod extraction;
pub mod models;
pub mod similarity_search;
pub mod tokenizer;
pub mod vectorizer;

// Re-export key types
pub use document_matcher::{match_many, match_text, DocumentMatcher, TextMatcher};
pub use extraction::{
    extract_fields, extractor_for_extension, PdfTextExtractor, PlainTextExtractor, TextExtractor,
};
pub use models::{Config, DocumentMatch, InvoiceFields, MatchResult, VocabularyScope};
pub use similarity_search::{best_match, similarity};
pub use vectorizer::{DocumentVector, TfIdfVectorizer};
