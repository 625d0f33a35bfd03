pub mod artifact_view;
pub mod footer;
pub mod text_input;
