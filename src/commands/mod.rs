pub mod completions;
pub mod config;
pub mod kinds;
pub mod run;
pub mod translate;
