//! One-shot status messages carried across a redirect in a cookie.
//!
//! The jar percent-encodes values on the way out and decodes them on the way in.

use axum_extra::extract::cookie::{Cookie, CookieJar};

const FLASH_COOKIE: &str = "flash";

pub fn set_flash(jar: CookieJar, message: &str) -> CookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, message.to_string()))
        .path("/")
        .http_only(true);
    jar.add(cookie)
}

/// Reads the pending message and clears the cookie.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<String>) {
    let message = jar
        .get(FLASH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|m| !m.is_empty());
    match message {
        Some(message) => {
            let jar = jar.remove(Cookie::build((FLASH_COOKIE, "")).path("/"));
            (jar, Some(message))
        }
        None => (jar, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::SET_COOKIE;
    use axum::response::IntoResponse;

    #[test]
    fn message_survives_the_cookie_and_is_taken_once() {
        let jar = set_flash(CookieJar::new(), "List created.");
        assert_eq!(jar.get(FLASH_COOKIE).unwrap().value(), "List created.");

        let (jar, message) = take_flash(jar);
        assert_eq!(message.as_deref(), Some("List created."));

        let (_, again) = take_flash(jar);
        assert!(again.is_none());
    }

    #[test]
    fn set_cookie_header_is_encoded_once() {
        let response = (set_flash(CookieJar::new(), "List created."), ()).into_response();
        let header = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(header.starts_with("flash=List%20created."), "{header}");
        assert!(!header.contains("%25"));
    }
}
