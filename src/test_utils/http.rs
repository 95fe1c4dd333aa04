use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, header::COOKIE, header::LOCATION, header::SET_COOKIE},
    response::Response,
};
use axum_extra::extract::PrivateCookieJar;

use crate::{app_state::create_cookie_key, flash::COOKIE_FLASH};

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    let content_type_header = response
        .headers()
        .get("content-type")
        .expect("content-type header missing");
    assert_eq!(content_type_header, content_type);
}

#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, header_name: &str) -> String {
    let header_error_message = format!("Headers missing {header_name}");

    response
        .headers()
        .get(header_name)
        .expect(&header_error_message)
        .to_str()
        .expect("Could not convert to str")
        .to_string()
}

#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    assert_eq!(get_header(response, "hx-redirect"), endpoint);
}

#[track_caller]
pub(crate) fn assert_redirect(response: &Response<Body>, endpoint: &str) {
    assert_eq!(get_header(response, LOCATION.as_str()), endpoint);
}

/// The raw `Set-Cookie` header for the flash cookie, if the response sets one.
pub(crate) fn get_flash_cookie(response: &Response<Body>) -> Option<String> {
    let prefix = format!("{COOKIE_FLASH}=");

    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&prefix))
        .map(str::to_owned)
}

/// Build a cookie jar as if the browser had sent back `set_cookie`.
///
/// Cookies only count as "original" when they arrive in the request headers,
/// which is what lets a handler remove them.
pub(crate) fn jar_with_cookie(set_cookie: &str, secret: &str) -> PrivateCookieJar {
    let cookie = set_cookie.split(';').next().unwrap_or_default();
    let mut headers = HeaderMap::new();
    headers.insert(
        COOKIE,
        HeaderValue::from_str(cookie).expect("Could not create cookie header"),
    );

    PrivateCookieJar::from_headers(&headers, create_cookie_key(secret))
}
