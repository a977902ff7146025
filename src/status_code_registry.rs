use std::{collections::HashMap, fmt::Display};

use lazy_static::lazy_static;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

// https://www.iana.org/assignments/http-status-codes/http-status-codes.xhtml
// Only the codes handlers and the router commonly produce.

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, EnumIter)]
#[repr(u16)]
pub enum ReasonPhrase {
    OK = 200,
    Created = 201,
    Accepted = 202,
    NoContent = 204,
    MovedPermanently = 301,
    Found = 302,
    SeeOther = 303,
    NotModified = 304,
    TemporaryRedirect = 307,
    PermanentRedirect = 308,
    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    NotFound = 404,
    MethodNotAllowed = 405,
    NotAcceptable = 406,
    Conflict = 409,
    UnsupportedMediaType = 415,
    UnprocessableContent = 422,
    TooManyRequests = 429,
    InternalServerError = 500,
    NotImplemented = 501,
    ServiceUnavailable = 503,
}

impl ReasonPhrase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OK => "OK",
            Self::Created => "Created",
            Self::Accepted => "Accepted",
            Self::NoContent => "No Content",
            Self::MovedPermanently => "Moved Permanently",
            Self::Found => "Found",
            Self::SeeOther => "See Other",
            Self::NotModified => "Not Modified",
            Self::TemporaryRedirect => "Temporary Redirect",
            Self::PermanentRedirect => "Permanent Redirect",
            Self::BadRequest => "Bad Request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::NotAcceptable => "Not Acceptable",
            Self::Conflict => "Conflict",
            Self::UnsupportedMediaType => "Unsupported Media Type",
            Self::UnprocessableContent => "Unprocessable Content",
            Self::TooManyRequests => "Too Many Requests",
            Self::InternalServerError => "Internal Server Error",
            Self::NotImplemented => "Not Implemented",
            Self::ServiceUnavailable => "Service Unavailable",
        }
    }
}

impl Display for ReasonPhrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

lazy_static! {
    static ref STATUS_CODE_REGISTRY: StatusCodeRegistry = StatusCodeRegistry::new();
}

pub fn get_reason_phrase(status_code: u16) -> Option<ReasonPhrase> {
    STATUS_CODE_REGISTRY.get_reason_phrase(status_code)
}

pub fn get_status_code(reason_phrase: ReasonPhrase) -> u16 {
    reason_phrase as u16
}

struct StatusCodeRegistry {
    reason_phrase_lookup: HashMap<u16, ReasonPhrase>,
}

impl StatusCodeRegistry {
    fn new() -> Self {
        let reason_phrase_lookup = ReasonPhrase::iter()
            .map(|reason_phrase| (reason_phrase as u16, reason_phrase))
            .collect();
        Self {
            reason_phrase_lookup,
        }
    }

    fn get_reason_phrase(&self, status_code: u16) -> Option<ReasonPhrase> {
        self.reason_phrase_lookup.get(&status_code).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{get_reason_phrase, get_status_code, ReasonPhrase};

    #[test]
    fn test_get_reason_phrase() {
        assert_eq!(get_reason_phrase(404), Some(ReasonPhrase::NotFound));
        assert_eq!(get_reason_phrase(405), Some(ReasonPhrase::MethodNotAllowed));
        assert!(get_reason_phrase(600).is_none());
    }

    #[test]
    fn test_get_status_code() {
        assert_eq!(get_status_code(ReasonPhrase::OK), 200);
    }

    #[test]
    fn test_as_str() {
        assert_eq!(ReasonPhrase::MethodNotAllowed.to_string(), "Method Not Allowed");
    }
}
