pub mod flow_detector;
pub mod flow_model;
