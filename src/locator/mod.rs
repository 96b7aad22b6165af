pub mod css;
pub mod escape;
pub mod locator_model;
pub mod synthesizer;
pub mod xpath;
