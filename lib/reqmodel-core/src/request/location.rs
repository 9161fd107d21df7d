/// The part of the HTTP request a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Location {
    /// A `{placeholder}` of the URL template.
    #[display("path")]
    Path,
    /// A query string parameter.
    #[display("query")]
    Query,
    /// An HTTP header.
    #[display("header")]
    Header,
    /// A cookie, sent in the `Cookie` header.
    #[display("cookie")]
    Cookie,
    /// A form field of the request body.
    #[display("body")]
    Body,
}

impl Location {
    /// All locations, in the order buckets are filled.
    pub const ALL: [Self; 5] = [
        Self::Path,
        Self::Query,
        Self::Header,
        Self::Cookie,
        Self::Body,
    ];
}
