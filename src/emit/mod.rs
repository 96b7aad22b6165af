pub mod code;
pub mod framework;
pub mod gherkin;
