use std::str::FromStr;

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::error::RouterError;

/// Methods a route can be registered for. Declaration order is the order
/// `all` registers them in.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display, AsRefStr, EnumIter, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Options,
    Head,
    Patch,
}

impl HttpMethod {
    /// Parses a method given at registration time, ignoring case.
    pub fn parse_registered(method: &str) -> Result<Self, RouterError> {
        HttpMethod::from_str(&method.to_uppercase())
            .map_err(|_| RouterError::InvalidMethod(method.to_owned()))
    }

    /// Request methods are case-sensitive: `get` is not `GET`.
    pub fn matches(&self, request_method: &str) -> bool {
        self.as_ref() == request_method
    }
}
