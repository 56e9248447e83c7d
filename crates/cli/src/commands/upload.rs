//! Image upload command.

use std::path::Path;

use tracing::info;
use tripnest_client::upload::{CloudinaryHost, UploadPipeline};
use tripnest_core::{EntityKind, ImageFile};

use super::{CommandError, Context, print_line};

/// MIME type implied by a file extension. Unknown extensions map to
/// `application/octet-stream`, which the pipeline rejects.
fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Upload the image at `path` for the signed-in provider and print its URL.
///
/// # Errors
///
/// Returns error if the file cannot be read, fails validation, or the image
/// host rejects it.
pub async fn upload(ctx: &Context, kind: EntityKind, path: &Path) -> Result<(), CommandError> {
    let session = ctx.session()?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| CommandError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
    let name = path
        .file_name()
        .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
    let file = ImageFile::new(name, content_type_for(path), bytes);

    let pipeline = UploadPipeline::new(CloudinaryHost::new(&ctx.config.image_host));
    let url = pipeline
        .run(kind, &file, session.service_provider_id())
        .await?;

    info!(%kind, size = file.size(), "Image uploaded");
    print_line(&url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for_extension() {
        assert_eq!(content_type_for(Path::new("van.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("logo.png")), "image/png");
        assert_eq!(content_type_for(Path::new("a.webp")), "image/webp");
        assert_eq!(
            content_type_for(Path::new("notes.txt")),
            "application/octet-stream"
        );
        assert_eq!(content_type_for(Path::new("README")), "application/octet-stream");
    }
}
