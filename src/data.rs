pub mod store;
pub mod student;
pub mod wire;

pub use store::StudentStore;
pub use student::{StudentDetails, StudentField, StudentPatch, StudentRecord};
