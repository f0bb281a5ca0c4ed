//! 密码处理
//!
//! bcrypt 哈希，cost 10

use bcrypt::{hash, verify};

use crate::error::ApiError;

const BCRYPT_COST: u32 = 10;

/// 对密码进行哈希处理
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    hash(password, BCRYPT_COST).map_err(|e| ApiError::Internal(format!("密码哈希失败: {}", e)))
}

/// 比较明文密码与存储的哈希值
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    verify(password, hash).map_err(|e| ApiError::Internal(format!("密码验证失败: {}", e)))
}
