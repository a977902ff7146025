use lazy_static::lazy_static;
use regex::{NoExpand, Regex};

use crate::{error::RouterError, params::Params};

/// Characters a wildcard or a parameter may consume: letters (any script),
/// digits, space and URL punctuation. Never `/`.
const URL_CHAR_CLASS: &str = r"[\pL 0-9_\-.,;%?=!\#\&+*$@\~\[\]()]";

lazy_static! {
    static ref PARAM_REGEX: Regex =
        Regex::new(r":[A-Za-z][A-Za-z0-9_\-]*").expect("parameter regex is valid");
}

/// A route template compiled into a matcher.
///
/// Templates use `:name` for parameters and `*` as a wildcard. Anything else
/// is passed to the regex engine as is, so `/a{2}` matches `/aa`. A trailing
/// slash is always optional.
#[derive(Debug)]
pub struct RoutePattern {
    regex: Regex,
    param_names: Vec<String>,
    anchored_at_end: bool,
}

impl RoutePattern {
    /// Compiles `template`. Group templates (`is_prefix`) only need to match
    /// the start of a path; route templates must match all of it.
    pub fn compile(template: &str, is_prefix: bool) -> Result<Self, RouterError> {
        // A lone `*` may match nothing at all.
        let quantifier = if template == "*" { "*" } else { "+" };
        let mut r = template.replace('*', &format!("{URL_CHAR_CLASS}{quantifier}"));

        let mut param_names: Vec<String> = vec![];
        for m in PARAM_REGEX.find_iter(&r) {
            let name = &m.as_str()[1..];
            if param_names.iter().any(|n| n == name) {
                return Err(RouterError::DuplicateParameter {
                    template: template.to_owned(),
                    name: name.to_owned(),
                });
            }
            param_names.push(name.to_owned());
        }
        let param_group = format!("({URL_CHAR_CLASS}+)");
        r = PARAM_REGEX
            .replace_all(&r, NoExpand(&param_group))
            .into_owned();

        r = r.replace('/', r"\/");
        if r.ends_with('/') {
            r.push('?');
        } else {
            r.push_str(r"\/?");
        }

        let anchored_at_end = !is_prefix;
        let source = if anchored_at_end {
            format!("^{r}$")
        } else {
            format!("^{r}")
        };
        let regex = Regex::new(&source).map_err(|source| RouterError::MalformedTemplate {
            template: template.to_owned(),
            source,
        })?;

        let groups = regex.captures_len() - 1;
        if groups != param_names.len() {
            return Err(RouterError::CaptureMismatch {
                template: template.to_owned(),
                params: param_names.len(),
                groups,
            });
        }

        Ok(Self {
            regex,
            param_names,
            anchored_at_end,
        })
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Matches `path` and pairs every parameter name with what it captured.
    pub fn captures(&self, path: &str) -> Option<Params> {
        let caps = self.regex.captures(path)?;
        Some(
            self.param_names
                .iter()
                .zip(caps.iter().skip(1))
                .map(|(name, m)| (name.as_str(), m.map_or("", |m| m.as_str())))
                .collect(),
        )
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn anchored_at_end(&self) -> bool {
        self.anchored_at_end
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
