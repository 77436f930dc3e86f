pub mod access_gate;
pub mod snippet_service;

pub use access_gate::AccessGate;
pub use snippet_service::{
    CreateSnippetRequest, CreateSnippetResult, SnippetService, UpdateSnippetRequest,
};
