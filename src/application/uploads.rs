//! Inline image uploads used by the blog editor.

use std::path::Path;

use blog_admin_types::UploadedImage;
use reqwest::{
    Method,
    multipart::{Form, Part},
};
use tracing::info;

use crate::{
    domain::error::ValidationError,
    infra::{error::InfraError, transport::RequestBody},
};

use super::{
    client::{AuthorizedClient, decode},
    error::AppError,
};

pub const UPLOAD_IMAGE_PATH: &str = "/api/uploads/image";

/// Read a local image into a multipart part, checking it is an image first.
pub async fn image_part(field: &'static str, path: &Path) -> Result<Part, AppError> {
    let mime = mime_guess::from_path(path)
        .first()
        .filter(|mime| mime.type_().as_str() == "image")
        .ok_or_else(|| {
            ValidationError::new(field, format!("`{}` is not an image file", path.display()))
        })?;
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(
                ValidationError::new(field, format!("`{}` does not exist", path.display())).into(),
            );
        }
        Err(err) => return Err(InfraError::Io(err).into()),
    };
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime.essence_str())
        .map_err(|err| ValidationError::new(field, format!("invalid content type: {err}")).into())
}

/// Upload one image and return its public URL.
pub async fn upload_image(client: &AuthorizedClient, path: &Path) -> Result<UploadedImage, AppError> {
    let part = image_part("image", path).await?;
    let form = Form::new().part("image", part);
    let value = client
        .request(Method::POST, UPLOAD_IMAGE_PATH, RequestBody::Multipart(form))
        .await?;
    let uploaded: UploadedImage = decode(value)?;
    info!(url = %uploaded.url, "image uploaded");
    Ok(uploaded)
}
