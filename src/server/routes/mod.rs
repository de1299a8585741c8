pub mod auth;
pub mod lineage;
pub mod root;
