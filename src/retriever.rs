//! Logic for retrieving external documents.
use std::{error::Error as StdError, fmt};
use url::Url;

/// Raw document returned by a [`Retrieve`] implementation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resource {
    /// Undecoded document bytes.
    pub body: Vec<u8>,
    /// Declared media type, if the transport has one.
    pub content_type: Option<String>,
}

impl Resource {
    /// A document without a declared media type.
    #[must_use]
    pub fn new(body: impl Into<Vec<u8>>) -> Resource {
        Resource {
            body: body.into(),
            content_type: None,
        }
    }

    /// A document with a declared media type.
    #[must_use]
    pub fn with_content_type(body: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Resource {
        Resource {
            body: body.into(),
            content_type: Some(content_type.into()),
        }
    }
}

/// Trait for fetching documents referenced by `$ref` or `extends`.
///
/// Implementations must be shareable between threads: the schema store calls them outside
/// of its lock, possibly concurrently for the same URI.
///
/// ```rust
/// use jsonschema_check::{Resource, Retrieve};
///
/// struct InMemory;
///
/// impl Retrieve for InMemory {
///     fn retrieve(
///         &self,
///         uri: &str,
///     ) -> Result<Resource, Box<dyn std::error::Error + Send + Sync>> {
///         match uri {
///             "http://example.com/parent" => Ok(Resource::new(r#"{"type": "object"}"#)),
///             _ => Err(format!("{} is not available", uri).into()),
///         }
///     }
/// }
/// ```
pub trait Retrieve: Send + Sync {
    /// Fetch the document at an absolute, fragment-free `uri`.
    ///
    /// # Errors
    ///
    /// If the document can not be fetched.
    fn retrieve(&self, uri: &str) -> Result<Resource, Box<dyn StdError + Send + Sync>>;
}

#[derive(Debug)]
struct UnsupportedScheme(String);

impl fmt::Display for UnsupportedScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "No retriever is available for the '{}' scheme, enable the matching feature or provide a custom retriever",
            self.0
        )
    }
}

impl StdError for UnsupportedScheme {}

/// Dispatches by URI scheme to the transports enabled at compile time.
///
/// `file` URIs are read from disk with the `resolve-file` feature (enabled by default),
/// `http` and `https` URIs are fetched with the `resolve-http` feature.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DefaultRetriever;

impl Retrieve for DefaultRetriever {
    fn retrieve(&self, uri: &str) -> Result<Resource, Box<dyn StdError + Send + Sync>> {
        let url = Url::parse(uri)?;
        match url.scheme() {
            "file" => {
                #[cfg(feature = "resolve-file")]
                {
                    FileRetriever.retrieve(uri)
                }
                #[cfg(not(feature = "resolve-file"))]
                {
                    Err(Box::new(UnsupportedScheme("file".to_string())))
                }
            }
            "http" | "https" => {
                #[cfg(feature = "resolve-http")]
                {
                    HttpRetriever.retrieve(uri)
                }
                #[cfg(not(feature = "resolve-http"))]
                {
                    Err(Box::new(UnsupportedScheme(url.scheme().to_string())))
                }
            }
            scheme => Err(Box::new(UnsupportedScheme(scheme.to_string()))),
        }
    }
}

/// Reads `file://` URIs from the local file system.
#[cfg(feature = "resolve-file")]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FileRetriever;

#[cfg(feature = "resolve-file")]
impl Retrieve for FileRetriever {
    fn retrieve(&self, uri: &str) -> Result<Resource, Box<dyn StdError + Send + Sync>> {
        let url = Url::parse(uri)?;
        let path = url
            .to_file_path()
            .map_err(|()| format!("'{}' is not a valid file path", uri))?;
        let body = std::fs::read(path)?;
        Ok(Resource::new(body))
    }
}

/// Fetches `http` / `https` URIs with a blocking client.
#[cfg(feature = "resolve-http")]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HttpRetriever;

#[cfg(feature = "resolve-http")]
impl Retrieve for HttpRetriever {
    fn retrieve(&self, uri: &str) -> Result<Resource, Box<dyn StdError + Send + Sync>> {
        let response = reqwest::blocking::get(uri)?.error_for_status()?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes()?.to_vec();
        Ok(Resource { body, content_type })
    }
}
