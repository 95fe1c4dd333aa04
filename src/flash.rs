//! One-shot status messages that survive a redirect.
//!
//! A handler that redirects back to the expenses page stores its status
//! message in an encrypted cookie. The expenses page takes the message out of
//! the cookie jar, shows it once and removes the cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};

use crate::alert::Alert;

pub(crate) const COOKIE_FLASH: &str = "flash";

/// Whether a flash message reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    fn as_str(self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        }
    }

    fn parse(text: &str) -> Option<Self> {
        match text {
            "success" => Some(FlashKind::Success),
            "error" => Some(FlashKind::Error),
            _ => None,
        }
    }
}

/// A status message for the next page the client loads.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FlashMessage {
    pub kind: FlashKind,
    pub message: String,
}

impl FlashMessage {
    pub(crate) fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    pub(crate) fn into_alert(self) -> Alert {
        match self.kind {
            FlashKind::Success => Alert::SuccessSimple {
                message: self.message,
            },
            FlashKind::Error => Alert::Error {
                message: "Could not save expense".to_owned(),
                details: self.message,
            },
        }
    }

    fn to_cookie_value(&self) -> String {
        format!("{}:{}", self.kind.as_str(), self.message)
    }

    fn from_cookie_value(value: &str) -> Option<Self> {
        let (kind, message) = value.split_once(':')?;

        Some(Self {
            kind: FlashKind::parse(kind)?,
            message: message.to_owned(),
        })
    }
}

/// Add `flash` to the cookie jar, replacing any message that has not been shown yet.
pub(crate) fn set_flash(jar: PrivateCookieJar, flash: FlashMessage) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_FLASH, flash.to_cookie_value()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict),
    )
}

/// Remove the flash message from the cookie jar and return it.
///
/// Returns `None` if there is no message, or if the cookie could not be decoded.
/// Either way the returned jar no longer holds a flash cookie.
pub(crate) fn take_flash(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<FlashMessage>) {
    let Some(cookie) = jar.get(COOKIE_FLASH) else {
        return (jar, None);
    };

    let flash = FlashMessage::from_cookie_value(cookie.value());

    if flash.is_none() {
        tracing::warn!("Discarding malformed flash cookie");
    }

    (jar.remove(Cookie::build(COOKIE_FLASH).path("/")), flash)
}
