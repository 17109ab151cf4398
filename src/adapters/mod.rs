// Adapters layer: concrete implementations of the domain ports (http transport, storage, parameter resolution).

pub mod http;
pub mod parameters;
pub mod storage;

pub use http::ReqwestTransport;
pub use parameters::{NodeParameters, StaticParameters, TemplateParameterResolver};
pub use storage::LocalStorage;
