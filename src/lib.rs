pub mod facade;
pub mod ops;
pub mod serializer;

pub use facade::Facade;
pub use ops::keys::DataType;
pub use serializer::{Envelope, SerializerError, TypeRegistry};

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;
