use crate::status_code_registry::{self, ReasonPhrase};

/// What the router and handlers need from an outgoing response.
pub trait Response {
    fn get_status_code(&self) -> Option<u16>;

    fn set_status_code(&mut self, status_code: u16);

    /// Appends a header. The same name may be added more than once.
    fn add_header(&mut self, k: &str, v: &str);

    /// Values for `k`, compared case-insensitively, in insertion order.
    fn get_headers(&self, k: &str) -> Vec<&str>;

    /// Removes the first header named `k`, or all of them. Returns how many
    /// were removed.
    fn remove_header(&mut self, k: &str, all: bool) -> usize;

    fn get_body(&self) -> &[u8];

    fn set_body(&mut self, body: Vec<u8>, content_type: &str);

    /// Marks the response as complete.
    fn end(&mut self);

    fn is_ended(&self) -> bool;

    fn is_status(&self, status_code: u16) -> bool {
        self.get_status_code() == Some(status_code)
    }

    fn set_reason_phrase(&mut self, reason_phrase: ReasonPhrase) {
        self.set_status_code(status_code_registry::get_status_code(reason_phrase));
    }

    fn get_header(&self, k: &str) -> Option<&str> {
        self.get_headers(k).into_iter().next()
    }

    fn header_count(&self, k: &str) -> usize {
        self.get_headers(k).len()
    }

    fn has_header(&self, k: &str) -> bool {
        self.header_count(k) > 0
    }

    fn redirect(&mut self, status_code: u16, location: &str) {
        self.set_status_code(status_code);
        self.add_header("Location", location);
    }

    fn set_body_str(&mut self, body: &str) {
        self.set_body(body.bytes().collect(), "text/plain");
    }
}

#[derive(Debug, Default)]
pub struct ResponseWriter {
    status_code: Option<u16>,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    ended: bool,
}

impl ResponseWriter {
    pub fn new_empty() -> Self {
        Self::default()
    }

    fn replace_header(&mut self, k: &str, v: String) {
        if let Some(entry) = self
            .headers
            .iter_mut()
            .find(|entry| entry.0.eq_ignore_ascii_case(k))
        {
            entry.1 = v;
        } else {
            self.headers.push((k.to_owned(), v));
        }
    }

    /// Serializes the response as HTTP/1.1. A response whose status was never
    /// set is written as 200.
    pub fn write(self) -> Vec<u8> {
        let status_code = self.status_code.unwrap_or(200);
        let mut status_line = format!("HTTP/1.1 {}", status_code);
        if let Some(reason_phrase) = status_code_registry::get_reason_phrase(status_code) {
            status_line = format!("{} {}", status_line, reason_phrase);
        }
        status_line.push_str("\r\n");

        let mut headers = self
            .headers
            .iter()
            .map(|(k, v)| format!("{}: {}\r\n", k, v))
            .collect::<Vec<_>>()
            .join("");
        headers.push_str("\r\n");

        let mut resp = vec![];
        resp.extend(status_line.bytes());
        resp.extend(headers.bytes());
        resp.extend(self.body);
        resp
    }
}

impl Response for ResponseWriter {
    fn get_status_code(&self) -> Option<u16> {
        self.status_code
    }

    fn set_status_code(&mut self, status_code: u16) {
        self.status_code = Some(status_code);
    }

    fn add_header(&mut self, k: &str, v: &str) {
        self.headers.push((k.to_owned(), v.to_owned()));
    }

    fn get_headers(&self, k: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|entry| entry.0.eq_ignore_ascii_case(k))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    fn remove_header(&mut self, k: &str, all: bool) -> usize {
        let before = self.headers.len();
        if all {
            self.headers.retain(|entry| !entry.0.eq_ignore_ascii_case(k));
        } else if let Some(pos) = self
            .headers
            .iter()
            .position(|entry| entry.0.eq_ignore_ascii_case(k))
        {
            self.headers.remove(pos);
        }
        before - self.headers.len()
    }

    fn get_body(&self) -> &[u8] {
        &self.body
    }

    fn set_body(&mut self, body: Vec<u8>, content_type: &str) {
        self.body = body;
        self.replace_header("Content-Type", content_type.to_owned());
        self.replace_header("Content-Length", self.body.len().to_string());
    }

    fn end(&mut self) {
        self.ended = true;
    }

    fn is_ended(&self) -> bool {
        self.ended
    }
}

#[cfg(test)]
mod tests {
    use crate::status_code_registry::ReasonPhrase;

    use super::{Response, ResponseWriter};

    #[test]
    fn test_status() {
        let mut w = ResponseWriter::new_empty();
        assert_eq!(w.get_status_code(), None);
        w.set_reason_phrase(ReasonPhrase::NotFound);
        assert!(w.is_status(404));
        assert!(!w.is_status(200));
    }

    #[test]
    fn test_headers() {
        let mut w = ResponseWriter::new_empty();
        w.add_header("Set-Cookie", "a=1");
        w.add_header("Set-Cookie", "b=2");
        w.add_header("X-Foo", "bar");

        assert_eq!(w.header_count("set-cookie"), 2);
        assert_eq!(w.get_header("Set-Cookie"), Some("a=1"));
        assert_eq!(w.get_headers("Set-Cookie"), vec!["a=1", "b=2"]);
        assert!(w.has_header("x-foo"));
        assert!(!w.has_header("Location"));

        assert_eq!(w.remove_header("Set-Cookie", false), 1);
        assert_eq!(w.get_headers("Set-Cookie"), vec!["b=2"]);

        w.add_header("Set-Cookie", "c=3");
        assert_eq!(w.remove_header("Set-Cookie", true), 2);
        assert!(!w.has_header("Set-Cookie"));
        assert_eq!(w.remove_header("Set-Cookie", true), 0);
    }

    #[test]
    fn test_redirect() {
        let mut w = ResponseWriter::new_empty();
        w.redirect(303, "/login");
        assert!(w.is_status(303));
        assert_eq!(w.get_header("location"), Some("/login"));
    }

    #[test]
    fn test_set_body_replaces_length() {
        let mut w = ResponseWriter::new_empty();
        w.set_body_str("hello");
        w.set_body_str("hi");
        assert_eq!(w.get_body(), b"hi");
        assert_eq!(w.get_headers("Content-Length"), vec!["2"]);
        assert_eq!(w.get_header("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn test_write() {
        let mut w = ResponseWriter::new_empty();
        w.set_reason_phrase(ReasonPhrase::OK);
        w.set_body_str("abc");
        assert_eq!(
            w.write(),
            b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 3\r\n\r\nabc"
        );
    }

    #[test]
    fn test_write_defaults_to_200() {
        let w = ResponseWriter::new_empty();
        assert_eq!(w.write(), b"HTTP/1.1 200 OK\r\n\r\n");
    }

    #[test]
    fn test_write_unknown_reason_phrase() {
        let mut w = ResponseWriter::new_empty();
        w.set_status_code(299);
        assert_eq!(w.write(), b"HTTP/1.1 299\r\n\r\n");
    }

    #[test]
    fn test_end() {
        let mut w = ResponseWriter::new_empty();
        assert!(!w.is_ended());
        w.end();
        assert!(w.is_ended());
    }
}
