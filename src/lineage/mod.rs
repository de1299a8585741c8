pub mod client;
pub mod graph;
