//! 测试数据生成 REST 服务
//!
//! 在数据流水线之上提供 HTTP 接口，同时承载账号、记录与支付等后端能力。
//!
//! ## 核心功能
//!
//! - **账号**：注册、登录，签发携带套餐等级的 JWT
//! - **记录**：字段记录的分页查询与增删改
//! - **支付**：创建 PayPal 订单与订阅
//! - **数据**：生成、导入、导出、预览（套餐限制以升级提示返回）
//!
//! ## 模块结构
//!
//! - `auth`: JWT 与密码哈希
//! - `dto`: 请求和响应的数据传输对象
//! - `error`: 错误类型定义
//! - `handlers`: HTTP 请求处理器
//! - `middleware`: 认证中间件
//! - `payment`: 支付网关抽象与 PayPal 实现
//! - `routes`: 路由配置
//! - `state`: 应用状态

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod payment;
pub mod routes;
pub mod state;

pub use error::{ApiError, Result};
pub use state::AppState;
