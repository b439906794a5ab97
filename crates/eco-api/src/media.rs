//! 上传文件存储
//!
//! 文件保存在本地媒体根目录下，数据库只记录相对路径（如 `submissions/0190....jpg`），
//! 对外通过 `/media` 前缀静态访问。

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use axum::extract::Multipart;
use eco_shared::config::MediaConfig;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{ApiError, Result};

/// 允许的图片扩展名
const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// 文件分类目录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Submission,
    ProfilePhoto,
    TaskExample,
    MerchImage,
}

impl MediaKind {
    fn dir(&self) -> &'static str {
        match self {
            Self::Submission => "submissions",
            Self::ProfilePhoto => "profile_photos",
            Self::TaskExample => "task_examples",
            Self::MerchImage => "merch",
        }
    }
}

/// 已读取的上传文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// multipart 表单：文本字段 + 最多一个文件字段
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl UploadForm {
    /// 读取整个表单；只接受名为 `file_field` 的文件字段
    pub async fn read(mut multipart: Multipart, file_field: &str) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name == file_field {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                form.file = Some(UploadedFile {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// 取出必填的文件字段
    pub fn require_file(&mut self, field: &str) -> Result<UploadedFile> {
        self.file
            .take()
            .filter(|f| !f.bytes.is_empty())
            .ok_or_else(|| ApiError::Validation(format!("缺少上传文件: {}", field)))
    }
}

/// 本地媒体存储
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    url_prefix: String,
    max_upload_bytes: usize,
}

impl MediaStore {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            root: PathBuf::from(&config.root),
            url_prefix: config.url_prefix.trim_end_matches('/').to_string(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// 保存文件，返回相对路径
    pub async fn save(&self, kind: MediaKind, file: &UploadedFile) -> Result<String> {
        if file.bytes.len() > self.max_upload_bytes {
            return Err(ApiError::PayloadTooLarge(format!(
                "最大 {} 字节",
                self.max_upload_bytes
            )));
        }
        let extension = image_extension(file.file_name.as_deref())?;

        let relative = format!("{}/{}.{}", kind.dir(), Uuid::now_v7().simple(), extension);
        let path = self.root.join(&relative);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ApiError::Internal(format!("创建媒体目录失败: {}", e)))?;
        }
        tokio::fs::write(&path, &file.bytes)
            .await
            .map_err(|e| ApiError::Internal(format!("写入文件失败: {}", e)))?;

        debug!(path = %relative, size = file.bytes.len(), "Media file saved");
        Ok(relative)
    }

    /// 删除文件，失败只记录日志
    pub async fn delete(&self, relative: &str) {
        let Some(path) = self.resolve(relative) else {
            warn!(path = relative, "Refusing to delete media outside root");
            return;
        };
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(path = relative, error = %e, "Failed to delete media file");
        }
    }

    /// 相对路径对应的访问 URL
    pub fn url_for(&self, relative: &str) -> String {
        format!("{}/{}", self.url_prefix, relative.trim_start_matches('/'))
    }

    /// 只接受普通的相对路径分量
    fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let path = Path::new(relative);
        if path.components().all(|c| matches!(c, Component::Normal(_))) {
            Some(self.root.join(path))
        } else {
            None
        }
    }
}

/// 从原始文件名推断扩展名，只接受常见图片格式
fn image_extension(file_name: Option<&str>) -> Result<String> {
    let extension = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| ApiError::FileProcessing("无法识别文件类型".to_string()))?;

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(ApiError::FileProcessing(format!(
            "不支持的文件类型: {}",
            extension
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(root: &Path) -> MediaStore {
        MediaStore::new(&MediaConfig {
            root: root.to_string_lossy().to_string(),
            url_prefix: "/media/".to_string(),
            max_upload_bytes: 16,
        })
    }

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("eco-media-{}", Uuid::new_v4().simple()))
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension(Some("proof.JPG")).unwrap(), "jpg");
        assert_eq!(image_extension(Some("a.b.webp")).unwrap(), "webp");
        assert!(matches!(
            image_extension(Some("script.sh")),
            Err(ApiError::FileProcessing(_))
        ));
        assert!(image_extension(None).is_err());
        assert!(image_extension(Some("noext")).is_err());
    }

    #[test]
    fn test_url_for() {
        let store = store(Path::new("media"));
        assert_eq!(store.url_for("submissions/a.png"), "/media/submissions/a.png");
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let store = store(Path::new("media"));
        assert!(store.resolve("../etc/passwd").is_none());
        assert!(store.resolve("/etc/passwd").is_none());
        assert!(store.resolve("merch/x.png").is_some());
    }

    #[tokio::test]
    async fn test_save_and_delete() {
        let root = temp_root();
        let store = store(&root);
        let file = UploadedFile {
            file_name: Some("leaf.png".to_string()),
            bytes: vec![1, 2, 3],
        };

        let relative = store.save(MediaKind::Submission, &file).await.unwrap();
        assert!(relative.starts_with("submissions/"));
        assert!(relative.ends_with(".png"));
        assert!(root.join(&relative).exists());

        store.delete(&relative).await;
        assert!(!root.join(&relative).exists());

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_save_rejects_oversized() {
        let root = temp_root();
        let file = UploadedFile {
            file_name: Some("big.png".to_string()),
            bytes: vec![0; 17],
        };

        let err = store(&root)
            .save(MediaKind::MerchImage, &file)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::PayloadTooLarge(_)));
    }
}
