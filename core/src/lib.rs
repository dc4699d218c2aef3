pub mod dummyjson;
pub mod favorites;
pub mod models;
pub mod shopping;
pub mod storage;
