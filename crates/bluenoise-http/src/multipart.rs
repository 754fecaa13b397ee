//! `multipart/form-data` parsing for browser-style uploads.
//!
//! Works on the already-collected body. Only the `file` part (or the first
//! part carrying a `filename`) is kept; other parts are skipped.

use bluenoise_model::ApiError;
use bytes::Bytes;

/// A parsed multipart submission.
#[derive(Debug)]
pub struct MultipartForm {
    /// `filename` from the file part's `Content-Disposition`, if any.
    pub file_name: Option<String>,
    /// `Content-Type` of the file part, if any.
    pub file_content_type: Option<String>,
    /// Content of the file part.
    pub file_data: Bytes,
}

/// The boundary of a `multipart/form-data` content type, or `None` when the
/// content type is anything else.
///
/// A `multipart/form-data` type that does not parse is an error rather than
/// a raw upload, so the framing never ends up stored as content.
pub fn form_data_boundary(content_type: &str) -> Result<Option<String>, ApiError> {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    let Ok(parsed) = content_type.parse::<mime::Mime>() else {
        if essence.eq_ignore_ascii_case("multipart/form-data") {
            return Err(ApiError::invalid_request(
                "Malformed multipart Content-Type; quote boundaries containing special characters",
            ));
        }
        return Ok(None);
    };
    if parsed.type_() != mime::MULTIPART || parsed.subtype() != mime::FORM_DATA {
        return Ok(None);
    }
    let boundary = parsed
        .get_param(mime::BOUNDARY)
        .map(|b| b.as_str().trim_matches('"').to_owned())
        .filter(|b| !b.is_empty());
    match boundary {
        Some(boundary) => Ok(Some(boundary)),
        None => Err(ApiError::invalid_request(
            "Missing boundary in multipart Content-Type",
        )),
    }
}

/// Parse a multipart body delimited by `boundary`.
pub fn parse_multipart(body: &Bytes, boundary: &str) -> Result<MultipartForm, ApiError> {
    let delimiter = format!("--{boundary}");

    let mut file: Option<(Option<String>, Option<String>, Bytes)> = None;

    for (start, end) in part_ranges(body, delimiter.as_bytes()) {
        let part = &body[start..end];
        let Some(header_len) = find_bytes(part, b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&part[..header_len]);
        let disposition = PartHeaders::parse(&headers);
        let Some(name) = disposition.name else {
            continue;
        };

        if name == "file" || disposition.filename.is_some() {
            // Slice the shared buffer instead of copying the content.
            file = Some((
                disposition.filename,
                disposition.content_type,
                body.slice(start + header_len + 4..end),
            ));
            break;
        }
    }

    let (file_name, file_content_type, file_data) =
        file.ok_or_else(|| ApiError::invalid_request("Missing file field in multipart form data"))?;

    Ok(MultipartForm {
        file_name: file_name.filter(|n| !n.is_empty()),
        file_content_type,
        file_data,
    })
}

/// Byte ranges of each part between delimiters, without the CRLF framing.
fn part_ranges(body: &[u8], delimiter: &[u8]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let Some(first) = find_bytes(body, delimiter) else {
        return ranges;
    };
    let mut cursor = first + delimiter.len();

    loop {
        if body[cursor..].starts_with(b"--") {
            break;
        }
        let start = cursor + crlf_len(&body[cursor..]);
        let Some(next) = find_bytes(&body[start..], delimiter) else {
            break;
        };
        let mut end = start + next;
        if body[..end].ends_with(b"\r\n") {
            end -= 2;
        }
        ranges.push((start, end.max(start)));
        cursor = start + next + delimiter.len();
    }

    ranges
}

/// Headers of one part that matter for upload.
#[derive(Debug, Default)]
struct PartHeaders {
    name: Option<String>,
    filename: Option<String>,
    content_type: Option<String>,
}

impl PartHeaders {
    fn parse(headers: &str) -> Self {
        let mut parsed = Self::default();
        for line in headers.split("\r\n") {
            let Some((header, value)) = line.split_once(':') else {
                continue;
            };
            let header = header.trim();
            if header.eq_ignore_ascii_case("content-disposition") {
                for param in value.split(';').skip(1) {
                    let Some((k, v)) = param.split_once('=') else {
                        continue;
                    };
                    let v = v.trim().trim_matches('"').to_owned();
                    match k.trim().to_ascii_lowercase().as_str() {
                        "name" => parsed.name = Some(v),
                        "filename" => parsed.filename = Some(v),
                        _ => {}
                    }
                }
            } else if header.eq_ignore_ascii_case("content-type") {
                let v = value.trim();
                if !v.is_empty() {
                    parsed.content_type = Some(v.to_owned());
                }
            }
        }
        parsed
    }
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn crlf_len(data: &[u8]) -> usize {
    if data.starts_with(b"\r\n") { 2 } else { 0 }
}
