//! The multipart wire format, one part per JPEG frame.

/// Part separator token; also named in the Content-Type header.
pub const BOUNDARY: &str = "frame";

/// Value for the response Content-Type header.
pub fn content_type() -> String {
    format!("multipart/x-mixed-replace; boundary={BOUNDARY}")
}

/// Wrap one JPEG image as a multipart body part:
///
/// ```text
/// --frame\r\n
/// Content-Type: image/jpeg\r\n
/// Content-Length: <n>\r\n
/// \r\n
/// <jpeg bytes>\r\n
/// ```
pub fn encode_part(jpeg: &[u8]) -> Vec<u8> {
    let mut part = format!(
        "--{BOUNDARY}\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n",
        jpeg.len()
    )
    .into_bytes();
    part.extend_from_slice(jpeg);
    part.extend_from_slice(b"\r\n");
    part
}
