pub mod documents;
pub mod ids;
