pub mod storage;
pub mod step;
