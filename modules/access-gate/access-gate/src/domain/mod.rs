pub mod client;
pub mod credentials;
pub mod filter;
pub mod identity;
pub mod policy;
pub mod rewriter;
pub mod service;
