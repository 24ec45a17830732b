pub mod config;
pub mod sections;
pub mod theme;
pub mod typewriter;
