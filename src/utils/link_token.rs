//! 家庭链接 token 加密与查找索引
//!
//! token 对外是 32 字节随机值的 base64url 文本。落库形式为：
//! - `cipher`：AES-256-GCM 密文（随机 96-bit nonce 前置，整体 base64），
//!   可解密，用于教务重新展示已签发的链接；
//! - `index`：以独立密钥计算的 HMAC-SHA256（hex）。确定性，使持有
//!   token 的请求可以通过唯一列等值查询一次定位记录，而数据库中
//!   始终不存在明文。
//!
//! 两把密钥必须相互独立，均为 base64 编码的 32 字节。

use aes_gcm::aead::Aead;
use aes_gcm::{AeadCore, Aes256Gcm, Key, KeyInit, Nonce};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use rand::TryRngCore;
use rand::rngs::OsRng;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::config::AppConfig;
use crate::errors::{Result, TalkLearnError};

/// token 原始字节长度
pub const TOKEN_BYTES: usize = 32;

const NONCE_BYTES: usize = 12;

type HmacSha256 = Hmac<Sha256>;

/// 落库形式的 token
#[derive(Debug, Clone, PartialEq)]
pub struct SealedToken {
    pub cipher: String,
    pub index: String,
}

/// token 加解密器，持有解码后的密钥材料
pub struct LinkTokenCodec {
    encryption_key: Zeroizing<[u8; 32]>,
    index_key: Zeroizing<[u8; 32]>,
}

impl LinkTokenCodec {
    /// 从全局配置构造，密钥缺失或格式错误时立即失败
    pub fn from_config() -> Result<Self> {
        let config = AppConfig::get();
        Self::from_parts(&config.link.encryption_key, &config.link.index_key)
    }

    pub fn from_parts(encryption_key_b64: &str, index_key_b64: &str) -> Result<Self> {
        let encryption_key = decode_key("link.encryption_key", encryption_key_b64)?;
        let index_key = decode_key("link.index_key", index_key_b64)?;
        if *encryption_key == *index_key {
            return Err(TalkLearnError::key_config(
                "link.encryption_key and link.index_key must be distinct",
            ));
        }
        Ok(Self {
            encryption_key,
            index_key,
        })
    }

    /// 生成新的随机 token 文本（直接取操作系统熵源）
    pub fn generate_token() -> String {
        let mut raw = [0u8; TOKEN_BYTES];
        OsRng
            .try_fill_bytes(&mut raw)
            .expect("OS random number generator unavailable");
        URL_SAFE_NO_PAD.encode(raw)
    }

    /// 将 token 文本封存为密文 + 查找索引
    pub fn seal(&self, token_text: &str) -> Result<SealedToken> {
        let raw = self.parse_token(token_text)?;

        let key = Key::<Aes256Gcm>::from_slice(&*self.encryption_key);
        let aead = Aes256Gcm::new(key);
        let nonce = Aes256Gcm::generate_nonce(&mut aes_gcm::aead::OsRng);
        let mut cipher = aead
            .encrypt(&nonce, raw.as_slice())
            .map_err(|e| TalkLearnError::token_crypto(format!("token 加密失败: {e}")))?;

        let mut out = nonce.to_vec();
        out.append(&mut cipher);

        Ok(SealedToken {
            cipher: STANDARD.encode(out),
            index: self.index_raw(&raw),
        })
    }

    /// 解密密文，还原 token 文本（教务查看用）
    pub fn open(&self, cipher_b64: &str) -> Result<String> {
        let data = STANDARD.decode(cipher_b64)?;
        if data.len() <= NONCE_BYTES {
            return Err(TalkLearnError::token_crypto("密文长度不足"));
        }
        let (nonce, cipher) = data.split_at(NONCE_BYTES);

        let key = Key::<Aes256Gcm>::from_slice(&*self.encryption_key);
        let aead = Aes256Gcm::new(key);
        let raw = aead
            .decrypt(Nonce::from_slice(nonce), cipher)
            .map_err(|e| TalkLearnError::token_crypto(format!("token 解密失败: {e}")))?;

        Ok(URL_SAFE_NO_PAD.encode(raw))
    }

    /// 计算 token 文本的查找索引；格式非法时在触达数据库前拒绝
    pub fn index_of(&self, token_text: &str) -> Result<String> {
        let raw = self.parse_token(token_text)?;
        Ok(self.index_raw(&raw))
    }

    fn parse_token(&self, token_text: &str) -> Result<Vec<u8>> {
        let raw = URL_SAFE_NO_PAD
            .decode(token_text)
            .map_err(|_| TalkLearnError::validation("token is not valid base64url"))?;
        if raw.len() != TOKEN_BYTES {
            return Err(TalkLearnError::validation("token has wrong length"));
        }
        Ok(raw)
    }

    fn index_raw(&self, raw: &[u8]) -> String {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&*self.index_key)
            .expect("HMAC accepts keys of any length");
        mac.update(raw);
        hex::encode(mac.finalize().into_bytes())
    }
}

fn decode_key(name: &str, value_b64: &str) -> Result<Zeroizing<[u8; 32]>> {
    if value_b64.trim().is_empty() {
        return Err(TalkLearnError::key_config(format!("{name} is not set")));
    }
    let bytes = STANDARD
        .decode(value_b64.trim())
        .map_err(|e| TalkLearnError::key_config(format!("{name} is not valid base64: {e}")))?;
    let arr: [u8; 32] = bytes
        .try_into()
        .map_err(|_| TalkLearnError::key_config(format!("{name} must decode to 32 bytes")))?;
    Ok(Zeroizing::new(arr))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_codec() -> LinkTokenCodec {
        // base64 of 32 * 0x01 / 32 * 0x02
        let enc = STANDARD.encode([0x01u8; 32]);
        let idx = STANDARD.encode([0x02u8; 32]);
        LinkTokenCodec::from_parts(&enc, &idx).unwrap()
    }

    #[test]
    fn test_generate_token_shape() {
        let token = LinkTokenCodec::generate_token();
        assert_eq!(token.len(), 43); // 32 字节 base64url 无填充
        assert_ne!(token, LinkTokenCodec::generate_token());
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let codec = test_codec();
        let token = LinkTokenCodec::generate_token();
        let sealed = codec.seal(&token).unwrap();
        assert_eq!(codec.open(&sealed.cipher).unwrap(), token);
    }

    #[test]
    fn test_index_is_deterministic() {
        let codec = test_codec();
        let token = LinkTokenCodec::generate_token();
        let sealed = codec.seal(&token).unwrap();
        assert_eq!(codec.index_of(&token).unwrap(), sealed.index);
        assert_eq!(codec.index_of(&token).unwrap(), codec.index_of(&token).unwrap());
    }

    #[test]
    fn test_different_tokens_have_different_indexes() {
        let codec = test_codec();
        let a = codec.index_of(&LinkTokenCodec::generate_token()).unwrap();
        let b = codec.index_of(&LinkTokenCodec::generate_token()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_cipher_is_randomized_but_index_is_not() {
        let codec = test_codec();
        let token = LinkTokenCodec::generate_token();
        let s1 = codec.seal(&token).unwrap();
        let s2 = codec.seal(&token).unwrap();
        assert_ne!(s1.cipher, s2.cipher); // 随机 nonce
        assert_eq!(s1.index, s2.index);
    }

    #[test]
    fn test_tampered_cipher_fails_to_open() {
        let codec = test_codec();
        let sealed = codec.seal(&LinkTokenCodec::generate_token()).unwrap();
        let mut data = STANDARD.decode(&sealed.cipher).unwrap();
        let last = data.len() - 1;
        data[last] ^= 0x01;
        let tampered = STANDARD.encode(data);
        assert!(codec.open(&tampered).is_err());
    }

    #[test]
    fn test_malformed_token_rejected_before_lookup() {
        let codec = test_codec();
        assert!(codec.index_of("not-base64url!!").is_err());
        assert!(codec.index_of("c2hvcnQ").is_err()); // 合法 base64url 但长度不对
    }

    #[test]
    fn test_identical_keys_rejected() {
        let key = STANDARD.encode([0x03u8; 32]);
        assert!(LinkTokenCodec::from_parts(&key, &key).is_err());
    }

    #[test]
    fn test_bad_key_material_rejected() {
        let good = STANDARD.encode([0x01u8; 32]);
        assert!(LinkTokenCodec::from_parts("", &good).is_err());
        assert!(LinkTokenCodec::from_parts("%%%", &good).is_err());
        let short = STANDARD.encode([0x01u8; 16]);
        assert!(LinkTokenCodec::from_parts(&short, &good).is_err());
    }
}
