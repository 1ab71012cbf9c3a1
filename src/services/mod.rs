pub mod assembly;
pub mod extraction;
pub mod generation;
pub mod intent;
pub mod naming;
pub mod openai;
pub mod pdf;
pub mod resolver;
pub mod storage;
