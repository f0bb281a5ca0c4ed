//! 数据传输对象
//!
//! 请求体使用 camelCase，与前端约定保持一致。

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
