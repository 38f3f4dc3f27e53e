pub mod decode;
pub mod records;
