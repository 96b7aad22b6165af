pub mod document;
pub mod extractor;
pub mod fetch;
