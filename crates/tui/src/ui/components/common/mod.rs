mod json_syntax;
mod text_input;

pub use json_syntax::highlighted_json_lines;
pub use text_input::TextInputState;
