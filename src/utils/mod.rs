pub mod flat_file;
