pub mod model;
pub mod service;

// Re-export commonly used types
pub use model::IndexedModel;
pub use service::UserService;
