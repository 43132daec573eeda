pub mod file_interaction;
