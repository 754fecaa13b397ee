//! Routable store operations.

/// All operations exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// `POST /create-bucket?bucket=`
    CreateBucket,
    /// `POST /upload?bucket=`
    PutObject,
    /// `GET /download?bucket=&filename=`
    GetObject,
    /// `GET /list?bucket=`
    ListObjects,
    /// `DELETE /delete?bucket=&filename=`
    DeleteObject,
    /// `GET /health`
    Health,
    /// `GET /search?query=`
    SearchObjects,
    /// `POST /update-metadata`
    UpdateMetadata,
}

impl StoreOperation {
    /// Every operation, in routing-table order.
    pub const ALL: [Self; 8] = [
        Self::CreateBucket,
        Self::PutObject,
        Self::GetObject,
        Self::ListObjects,
        Self::DeleteObject,
        Self::Health,
        Self::SearchObjects,
        Self::UpdateMetadata,
    ];

    /// Returns the operation name as a static string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateBucket => "CreateBucket",
            Self::PutObject => "PutObject",
            Self::GetObject => "GetObject",
            Self::ListObjects => "ListObjects",
            Self::DeleteObject => "DeleteObject",
            Self::Health => "Health",
            Self::SearchObjects => "SearchObjects",
            Self::UpdateMetadata => "UpdateMetadata",
        }
    }

    /// The URL path this operation is served on.
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::CreateBucket => "/create-bucket",
            Self::PutObject => "/upload",
            Self::GetObject => "/download",
            Self::ListObjects => "/list",
            Self::DeleteObject => "/delete",
            Self::Health => "/health",
            Self::SearchObjects => "/search",
            Self::UpdateMetadata => "/update-metadata",
        }
    }

    /// The HTTP method this operation accepts.
    #[must_use]
    pub fn method(&self) -> http::Method {
        match self {
            Self::CreateBucket | Self::PutObject | Self::UpdateMetadata => http::Method::POST,
            Self::GetObject | Self::ListObjects | Self::Health | Self::SearchObjects => {
                http::Method::GET
            }
            Self::DeleteObject => http::Method::DELETE,
        }
    }

    /// Look up the operation served on `path`, ignoring the method.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.path() == path)
    }

    /// Whether this operation mutates the store.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::CreateBucket | Self::PutObject | Self::DeleteObject | Self::UpdateMetadata
        )
    }
}

impl std::fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
