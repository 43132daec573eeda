pub mod pagination;
pub mod search_index;
pub mod tokenizer;

// Link to test module (only compiled during tests)
#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;
