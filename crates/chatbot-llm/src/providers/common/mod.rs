pub mod lines;
pub mod openai_compat;
