//! 凭证哈希工具模块
//!
//! 使用 Argon2id 算法对授权码和查看密码进行哈希和验证。
//! 明文只在创建响应里出现一次，落库的永远是哈希。

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// 凭证哈希错误
#[derive(Debug)]
pub enum CredentialError {
    HashError(String),
    VerifyError(String),
}

impl std::fmt::Display for CredentialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HashError(msg) => write!(f, "Credential hash error: {}", msg),
            Self::VerifyError(msg) => write!(f, "Credential verify error: {}", msg),
        }
    }
}

impl std::error::Error for CredentialError {}

/// 对授权码或密码进行 Argon2id 哈希
pub fn hash_credential(secret: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::HashError(e.to_string()))
}

/// 验证候选凭证是否匹配哈希（常数时间比较交给 Argon2 原语）
pub fn verify_credential(candidate: &str, hash: &str) -> Result<bool, CredentialError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| CredentialError::VerifyError(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed_hash)
        .is_ok())
}

/// 处理用户输入的新密码 - 始终哈希，不接受预哈希值
///
/// - 如果输入为空或 None，返回 None
/// - 否则对密码进行哈希
pub fn process_new_password(password: Option<&str>) -> Result<Option<String>, CredentialError> {
    match password {
        Some(pwd) if !pwd.is_empty() => hash_credential(pwd).map(Some),
        _ => Ok(None),
    }
}

/// 处理更新请求里的密码字段
///
/// - `None` = 保留原密码
/// - 空字符串 = 移除密码保护
/// - 其他 = 哈希新密码
pub fn process_update_password(
    new_password: Option<&str>,
    existing_hash: Option<String>,
) -> Result<Option<String>, CredentialError> {
    match new_password {
        Some(pwd) if !pwd.is_empty() => hash_credential(pwd).map(Some),
        Some(_) => Ok(None),
        None => Ok(existing_hash),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let code = "OWN-A7F3K9Q2M";
        let hash = hash_credential(code).expect("hash should succeed");

        assert!(hash.starts_with("$argon2"));
        assert!(verify_credential(code, &hash).expect("verify should succeed"));
        assert!(!verify_credential("OWN-A7F3K9Q2N", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(verify_credential("whatever", "not-a-hash").is_err());
    }

    #[test]
    fn test_process_new_password() {
        assert!(process_new_password(None).unwrap().is_none());
        assert!(process_new_password(Some("")).unwrap().is_none());
        let hash = process_new_password(Some("hunter2")).unwrap().unwrap();
        assert!(verify_credential("hunter2", &hash).unwrap());
    }

    #[test]
    fn test_process_update_password() {
        let existing = Some("$argon2id$existing".to_string());
        assert_eq!(
            process_update_password(None, existing.clone()).unwrap(),
            existing
        );
        assert!(process_update_password(Some(""), existing.clone())
            .unwrap()
            .is_none());
        let replaced = process_update_password(Some("new"), existing).unwrap().unwrap();
        assert!(verify_credential("new", &replaced).unwrap());
    }
}
