use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use touchgrass_core::media_path;

use super::ObjectStore;
use crate::config::S3Settings;
use crate::error::{check_path, StorageError};

/// S3-compatible object store (AWS, MinIO, Supabase Storage's S3 endpoint).
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, bucket: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Build a client from settings.
    ///
    /// Static keys are used when both are configured; otherwise credentials
    /// come from the default AWS provider chain.
    pub async fn connect(settings: &S3Settings) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(settings.force_path_style);
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        if let (Some(key), Some(secret)) = (&settings.access_key_id, &settings.secret_access_key) {
            builder = builder.credentials_provider(Credentials::new(
                key,
                secret,
                None,
                None,
                "touchgrass-static",
            ));
        }

        tracing::info!(
            bucket = %settings.bucket,
            region = %settings.region,
            endpoint = settings.endpoint.as_deref().unwrap_or("aws"),
            "S3 object store configured"
        );

        Self::new(
            Client::from_conf(builder.build()),
            settings.bucket.clone(),
            settings.public_base_url.clone(),
        )
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> Result<(), StorageError> {
        check_path(path)?;
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .content_type(content_type)
            .body(ByteStream::from(bytes));
        if !upsert {
            // Conditional write: fails with 412 if the key is already taken.
            request = request.if_none_match("*");
        }

        request.send().await.map_err(|err| {
            if err.code() == Some("PreconditionFailed") {
                StorageError::AlreadyExists(path.to_string())
            } else {
                StorageError::Backend(DisplayErrorContext(&err).to_string())
            }
        })?;
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut paths = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|err| StorageError::Backend(DisplayErrorContext(&err).to_string()))?;

            paths.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key())
                    .map(str::to_string),
            );

            match page.next_continuation_token() {
                Some(token) if page.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        paths.sort();
        Ok(paths)
    }

    fn public_url(&self, path: &str) -> String {
        media_path::public_url(&self.public_base_url, path)
    }

    fn kind(&self) -> &'static str {
        "s3"
    }
}
