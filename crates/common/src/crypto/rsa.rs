//! RSA helpers: PKCS#8/PKIX PEM key pairs, chunked PKCS#1 v1.5 encryption and
//! PKCS#1 v1.5 signatures over SHA1 or SHA256.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Encrypt, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use sha2::{Digest, Sha256};

use super::CryptoError;

pub const MIN_KEY_BITS: usize = 1024;
pub const DEFAULT_PUBLIC_KEY_FILE: &str = "id_rsa.pub";
pub const DEFAULT_PRIVATE_KEY_FILE: &str = "id_rsa";
/// PKCS#1 v1.5 加密填充占用的字节数
const PKCS1_OVERHEAD: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignAlgorithm {
    Sha1,
    #[default]
    Sha256,
}

#[derive(Debug, Clone)]
pub struct KeyPair {
    /// PKIX (`PUBLIC KEY`) PEM
    pub public_pem: String,
    /// PKCS#8 (`PRIVATE KEY`) PEM
    pub private_pem: String,
}

impl KeyPair {
    pub fn read_from_files(public_path: impl AsRef<Path>, private_path: impl AsRef<Path>) -> Result<Self, CryptoError> {
        Ok(Self { public_pem: fs::read_to_string(public_path)?, private_pem: fs::read_to_string(private_path)? })
    }

    pub fn write_to_files(&self, public_path: impl AsRef<Path>, private_path: impl AsRef<Path>) -> Result<(), CryptoError> {
        fs::write(public_path, &self.public_pem)?;
        fs::write(private_path, &self.private_pem)?;
        Ok(())
    }
}

fn rsa_err<E: std::fmt::Display>(e: E) -> CryptoError {
    CryptoError::Rsa(e.to_string())
}

/// 生成密钥对，长度小于 1024 时按 1024 处理
pub fn generate_keys(bits: usize) -> Result<KeyPair, CryptoError> {
    let bits = bits.max(MIN_KEY_BITS);
    let mut rng = rand::rngs::OsRng;
    let private = RsaPrivateKey::new(&mut rng, bits).map_err(rsa_err)?;
    let public = RsaPublicKey::from(&private);
    let private_pem = private.to_pkcs8_pem(LineEnding::LF).map_err(rsa_err)?.to_string();
    let public_pem = public.to_public_key_pem(LineEnding::LF).map_err(rsa_err)?;
    Ok(KeyPair { public_pem, private_pem })
}

fn or_default<'a>(path: &'a Path, default: &'a str) -> &'a Path {
    if path.as_os_str().is_empty() { Path::new(default) } else { path }
}

/// 生成密钥对并写入文件；路径为空时分别写到 `id_rsa.pub` / `id_rsa`
pub fn generate_key_files(
    public_path: impl AsRef<Path>,
    private_path: impl AsRef<Path>,
    bits: usize,
) -> Result<KeyPair, CryptoError> {
    let pair = generate_keys(bits)?;
    pair.write_to_files(
        or_default(public_path.as_ref(), DEFAULT_PUBLIC_KEY_FILE),
        or_default(private_path.as_ref(), DEFAULT_PRIVATE_KEY_FILE),
    )?;
    Ok(pair)
}

#[derive(Debug, Clone)]
pub struct RsaCipher {
    public: RsaPublicKey,
    private: RsaPrivateKey,
    algorithm: SignAlgorithm,
}

impl RsaCipher {
    pub fn new(public_pem: &str, private_pem: &str, algorithm: SignAlgorithm) -> Result<Self, CryptoError> {
        let public = RsaPublicKey::from_public_key_pem(public_pem.trim()).map_err(rsa_err)?;
        let private = RsaPrivateKey::from_pkcs8_pem(private_pem.trim()).map_err(rsa_err)?;
        Ok(Self { public, private, algorithm })
    }

    pub fn from_key_pair(pair: &KeyPair, algorithm: SignAlgorithm) -> Result<Self, CryptoError> {
        Self::new(&pair.public_pem, &pair.private_pem, algorithm)
    }

    pub fn from_files(
        public_path: impl AsRef<Path>,
        private_path: impl AsRef<Path>,
        algorithm: SignAlgorithm,
    ) -> Result<Self, CryptoError> {
        Self::from_key_pair(&KeyPair::read_from_files(public_path, private_path)?, algorithm)
    }

    /// 公钥加密，明文按 `k - 11` 字节分块
    pub fn public_encrypt(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let part_len = self.public.size() - PKCS1_OVERHEAD;
        let mut rng = rand::rngs::OsRng;
        let mut out = Vec::with_capacity((data.len() / part_len + 1) * self.public.size());
        for chunk in data.chunks(part_len) {
            out.extend(self.public.encrypt(&mut rng, Pkcs1v15Encrypt, chunk).map_err(rsa_err)?);
        }
        Ok(out)
    }

    /// 输出 URL-safe、无 padding 的 base64
    pub fn public_encrypt_base64(&self, data: &[u8]) -> Result<String, CryptoError> {
        Ok(URL_SAFE_NO_PAD.encode(self.public_encrypt(data)?))
    }

    /// 私钥解密，密文按 `k` 字节分块
    pub fn private_decrypt(&self, encrypted: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let part_len = self.public.size();
        if encrypted.len() % part_len != 0 {
            return Err(CryptoError::InvalidCiphertext(format!(
                "length {} is not a multiple of {part_len}",
                encrypted.len()
            )));
        }
        let mut out = Vec::with_capacity(encrypted.len());
        for chunk in encrypted.chunks(part_len) {
            out.extend(self.private.decrypt(Pkcs1v15Encrypt, chunk).map_err(rsa_err)?);
        }
        Ok(out)
    }

    pub fn private_decrypt_base64(&self, encrypted: &str) -> Result<Vec<u8>, CryptoError> {
        let raw = URL_SAFE_NO_PAD.decode(encrypted).map_err(|e| CryptoError::Decode(e.to_string()))?;
        self.private_decrypt(&raw)
    }

    /// 签名，返回标准 base64
    pub fn sign(&self, data: &str) -> Result<String, CryptoError> {
        let sig = match self.algorithm {
            SignAlgorithm::Sha1 => self
                .private
                .sign(Pkcs1v15Sign::new::<Sha1>(), &Sha1::digest(data.as_bytes())),
            SignAlgorithm::Sha256 => self
                .private
                .sign(Pkcs1v15Sign::new::<Sha256>(), &Sha256::digest(data.as_bytes())),
        }
        .map_err(rsa_err)?;
        Ok(STANDARD.encode(sig))
    }

    pub fn verify(&self, data: &str, sign: &str) -> Result<(), CryptoError> {
        let sig = STANDARD.decode(sign).map_err(|e| CryptoError::Decode(e.to_string()))?;
        match self.algorithm {
            SignAlgorithm::Sha1 => self.public.verify(
                Pkcs1v15Sign::new::<Sha1>(),
                &Sha1::digest(data.as_bytes()),
                &sig,
            ),
            SignAlgorithm::Sha256 => self.public.verify(
                Pkcs1v15Sign::new::<Sha256>(),
                &Sha256::digest(data.as_bytes()),
                &sig,
            ),
        }
        .map_err(rsa_err)
    }
}
