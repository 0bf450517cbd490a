use std::path::PathBuf;

use touchgrass_core::config::{env_lookup, parse_or, required, var_or, ConfigError};

pub const DEFAULT_BUCKET: &str = "media";

/// Connection settings for an S3-compatible backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub force_path_style: bool,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub public_base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Local {
        root: PathBuf,
        public_base_url: String,
    },
    S3(S3Settings),
    Memory {
        public_base_url: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Replace existing objects on upload instead of failing.
    pub upsert: bool,
}

impl StorageConfig {
    /// Load storage configuration from the environment.
    ///
    /// | Env Var                 | Default                          |
    /// |-------------------------|----------------------------------|
    /// | `STORAGE_BACKEND`       | `local` (`local`, `s3`, `memory`) |
    /// | `STORAGE_LOCAL_ROOT`    | `./storage`                      |
    /// | `STORAGE_PUBLIC_URL`    | `http://localhost:3000/media` (required for `s3`) |
    /// | `STORAGE_BUCKET`        | `media`                          |
    /// | `S3_REGION`             | `us-east-1`                      |
    /// | `S3_ENDPOINT`           | unset (AWS)                      |
    /// | `S3_FORCE_PATH_STYLE`   | `true` when `S3_ENDPOINT` is set |
    /// | `S3_ACCESS_KEY_ID`      | unset (default provider chain)   |
    /// | `S3_SECRET_ACCESS_KEY`  | unset                            |
    /// | `MEDIA_UPSERT`          | `false`                          |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let upsert = parse_or(&lookup, "MEDIA_UPSERT", false)?;
        let backend_name = var_or(&lookup, "STORAGE_BACKEND", "local").to_ascii_lowercase();

        let backend = match backend_name.as_str() {
            "local" => StorageBackend::Local {
                root: PathBuf::from(var_or(&lookup, "STORAGE_LOCAL_ROOT", "./storage")),
                public_base_url: var_or(
                    &lookup,
                    "STORAGE_PUBLIC_URL",
                    "http://localhost:3000/media",
                ),
            },
            "memory" => StorageBackend::Memory {
                public_base_url: var_or(&lookup, "STORAGE_PUBLIC_URL", "memory://media"),
            },
            "s3" => {
                let endpoint = lookup("S3_ENDPOINT")
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty());
                StorageBackend::S3(S3Settings {
                    bucket: var_or(&lookup, "STORAGE_BUCKET", DEFAULT_BUCKET),
                    region: var_or(&lookup, "S3_REGION", "us-east-1"),
                    force_path_style: parse_or(
                        &lookup,
                        "S3_FORCE_PATH_STYLE",
                        endpoint.is_some(),
                    )?,
                    endpoint,
                    access_key_id: required(&lookup, "S3_ACCESS_KEY_ID").ok(),
                    secret_access_key: required(&lookup, "S3_SECRET_ACCESS_KEY").ok(),
                    public_base_url: required(&lookup, "STORAGE_PUBLIC_URL")?,
                })
            }
            other => {
                return Err(ConfigError::Invalid {
                    var: "STORAGE_BACKEND",
                    reason: format!("unknown backend '{other}'. Must be one of: local, s3, memory"),
                })
            }
        };

        Ok(Self { backend, upsert })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_to_local_without_upsert() {
        let config = StorageConfig::from_lookup(vars(&[])).unwrap();
        assert!(!config.upsert);
        assert_matches!(
            config.backend,
            StorageBackend::Local { root, public_base_url }
                if root == PathBuf::from("./storage")
                    && public_base_url == "http://localhost:3000/media"
        );
    }

    #[test]
    fn s3_with_custom_endpoint_uses_path_style() {
        let config = StorageConfig::from_lookup(vars(&[
            ("STORAGE_BACKEND", "S3"),
            ("S3_ENDPOINT", "https://proj.supabase.co/storage/v1/s3"),
            ("S3_ACCESS_KEY_ID", "key"),
            ("S3_SECRET_ACCESS_KEY", "secret"),
            (
                "STORAGE_PUBLIC_URL",
                "https://proj.supabase.co/storage/v1/object/public/media",
            ),
            ("MEDIA_UPSERT", "true"),
        ]))
        .unwrap();

        assert!(config.upsert);
        let StorageBackend::S3(s3) = config.backend else {
            panic!("expected s3 backend");
        };
        assert_eq!(s3.bucket, DEFAULT_BUCKET);
        assert!(s3.force_path_style);
        assert_eq!(s3.access_key_id.as_deref(), Some("key"));
    }

    #[test]
    fn s3_requires_public_url() {
        let err = StorageConfig::from_lookup(vars(&[("STORAGE_BACKEND", "s3")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("STORAGE_PUBLIC_URL"));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = StorageConfig::from_lookup(vars(&[("STORAGE_BACKEND", "ftp")])).unwrap_err();
        assert_matches!(err, ConfigError::Invalid { var: "STORAGE_BACKEND", .. });
    }
}
