use http::{request::Parts, HeaderMap, Request};

/// Read access to request headers.
///
/// This is all the responder needs from an inbound request, so any HTTP layer can feed it.
/// Values that are not valid UTF-8 read as absent.
pub trait HeaderSource {
    /// Look up the first value of the named header.
    fn header(&self, name: &str) -> Option<&str>;
}

impl HeaderSource for HeaderMap {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.to_str().ok())
    }
}

impl<B> HeaderSource for Request<B> {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers().header(name)
    }
}

impl HeaderSource for Parts {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.header(name)
    }
}
