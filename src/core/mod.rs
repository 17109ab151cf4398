pub mod etl;
pub mod normalize;
pub mod processor;
pub mod query;

pub use crate::domain::model::{ItemParameters, OutputRecord, QueryRequest, UpstreamResponse};
pub use crate::domain::ports::{ConfigProvider, ParameterResolver, Storage, Transport};
pub use crate::utils::error::Result;
