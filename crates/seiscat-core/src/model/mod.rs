#[macro_use]
mod vocabulary;

pub mod attribute;
pub mod command_type;
pub mod data_type;
pub mod records;
pub mod statement;

pub use attribute::{AttributeName, AttributeRecord};
pub use command_type::CommandType;
pub use data_type::DataType;
pub use records::{ProvenanceRecord, SystemCommand};
pub use statement::ExecutableStatement;
