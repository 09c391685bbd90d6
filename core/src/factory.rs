//! Maps decoded response bodies onto domain results.

use serde::de::DeserializeOwned;
use serde_json::Value;
use xmltree::Element;

use crate::error::{Error, Result};
use crate::http::Body;

/// One object returned by the API, kept as its decoded JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource(Value);

impl Resource {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Read the resource as a typed DTO such as [`crate::Tag`].
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.0.clone()).map_err(|err| Error::TypeConversion {
            value: format!("{} ({err})", self.0),
            target: std::any::type_name::<T>(),
        })
    }
}

/// What a successful call returns.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainResult {
    Object(Resource),
    Collection(Vec<Resource>),
    /// The call succeeded and the server returned no content.
    Success,
    Document(Element),
    Text(String),
}

impl DomainResult {
    pub fn is_success(&self) -> bool {
        matches!(self, DomainResult::Success)
    }

    pub fn as_object(&self) -> Option<&Resource> {
        match self {
            DomainResult::Object(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&[Resource]> {
        match self {
            DomainResult::Collection(items) => Some(items),
            _ => None,
        }
    }

    /// Deserialize every element of a collection into `T`.
    pub fn collect<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        match self {
            DomainResult::Collection(items) => items.iter().map(Resource::deserialize::<T>).collect(),
            other => Err(Error::TypeConversion {
                value: format!("{other:?}"),
                target: "collection",
            }),
        }
    }
}

pub fn create(body: Body) -> DomainResult {
    match body {
        Body::Empty | Body::Json(Value::Null) => DomainResult::Success,
        Body::Json(Value::Array(items)) => {
            DomainResult::Collection(items.into_iter().map(Resource::new).collect())
        }
        Body::Json(value) => DomainResult::Object(Resource::new(value)),
        Body::Xml(element) => DomainResult::Document(element),
        Body::Text(text) => DomainResult::Text(text),
    }
}
