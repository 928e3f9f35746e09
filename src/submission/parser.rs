use axum::http::HeaderMap;
use bytes::Bytes;

/// Fields of a slambook form post. Other multipart fields are ignored.
#[derive(Debug, Default)]
pub struct SubmitForm {
    /// Raw text of the `payload` field. `None` when absent or sent as a file.
    pub payload: Option<String>,
    pub photo: Option<UploadedFile>,
}

/// A file part as received, with its untrusted client metadata.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Parse multipart form data using multer.
pub async fn parse_multipart(headers: &HeaderMap, body: Bytes) -> Result<SubmitForm, String> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| "Expected multipart/form-data body".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut form = SubmitForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("payload") => {
                let is_file = field.file_name().is_some();
                let value = field
                    .text()
                    .await
                    .map_err(|e| format!("Field read error: {e}"))?;
                if !is_file {
                    form.payload = Some(value);
                }
            }
            Some("photo") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(|m| m.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Field read error: {e}"))?;
                form.photo = Some(UploadedFile {
                    file_name,
                    content_type,
                    data,
                });
            }
            _ => {}
        }
    }

    Ok(form)
}
