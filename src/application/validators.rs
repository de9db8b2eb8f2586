use validator::ValidateEmail;

/// Validates that the input looks like a valid email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.validate_email()
}

/// Validates the shape of a submitted verification code: exactly 6 ASCII digits.
pub fn is_valid_otp_shape(code: &str) -> bool {
    code.len() == 6 && code.chars().all(|c| c.is_ascii_digit())
}

/// Validates that a string parses as an absolute http(s) URL.
/// Listing photos and videos are stored as URLs; the files themselves
/// live in external storage.
pub fn is_valid_media_url(url: &str) -> bool {
    let Ok(parsed) = url.parse::<reqwest::Url>() else {
        return false;
    };
    matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some()
}
