//! Inter-service operation declarations.
//!
//! Each operation is declared once as an [`Operation`] constant plus a trait
//! method. The owning service routes the constant to its local
//! implementation; callers hand the same constant to
//! [`ServiceClient`](crate::client::ServiceClient). Neither side restates the
//! method or the path.

pub mod address;

use axum::{http::Method, routing::MethodFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Patch => Method::PATCH,
            Self::Delete => Method::DELETE,
        }
    }

    pub fn filter(self) -> MethodFilter {
        match self {
            Self::Get => MethodFilter::GET,
            Self::Post => MethodFilter::POST,
            Self::Put => MethodFilter::PUT,
            Self::Patch => MethodFilter::PATCH,
            Self::Delete => MethodFilter::DELETE,
        }
    }
}

/// One remotely callable operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    /// Stable operation name, used in logs and metrics
    pub name: &'static str,
    /// Service that owns the operation
    pub service: &'static str,
    pub method: HttpMethod,
    /// Path template with `{param}` placeholders
    pub path: &'static str,
}

impl Operation {
    /// Path in the router's `:param` syntax
    pub fn route_path(&self) -> String {
        self.path
            .split('/')
            .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => format!(":{}", name),
                None => segment.to_string(),
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Concrete path with every placeholder substituted
    pub fn expand(&self, params: &[(&str, &str)]) -> String {
        params
            .iter()
            .fold(self.path.to_string(), |path, (name, value)| {
                path.replace(&format!("{{{}}}", name), value)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OP: Operation = Operation {
        name: "getThing",
        service: "thing-service",
        method: HttpMethod::Get,
        path: "/api/v1/things/{id}/parts/{part}",
    };

    #[test]
    fn test_route_path() {
        assert_eq!(OP.route_path(), "/api/v1/things/:id/parts/:part");
    }

    #[test]
    fn test_expand() {
        assert_eq!(
            OP.expand(&[("id", "42"), ("part", "wheel")]),
            "/api/v1/things/42/parts/wheel"
        );
    }

    #[test]
    fn test_method_mapping() {
        assert_eq!(HttpMethod::Get.as_method(), Method::GET);
        assert_eq!(HttpMethod::Delete.as_method(), Method::DELETE);
    }
}
