use std::fmt;

use crate::error::CallError;

/// Where a call goes: host, port and a path template.
///
/// The template uses `{}` placeholders, filled in order by [`param`](Self::param).
/// Parameters are percent-encoded, so a parameter can never add a path
/// segment of its own.
///
/// ```rust
/// use service_client::ServiceTarget;
///
/// let target = ServiceTarget::new("course-service", 8082, "/courses/{}/exams/{}")
///     .param(42)
///     .param("midterm");
/// assert_eq!(
///     target.url().unwrap(),
///     "http://course-service:8082/courses/42/exams/midterm"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTarget {
    host: String,
    port: u16,
    template: String,
    params: Vec<String>,
}

const PLACEHOLDER: &str = "{}";

impl ServiceTarget {
    pub fn new(host: impl Into<String>, port: u16, template: impl Into<String>) -> Self {
        let template = template.into();
        let template = if template.starts_with('/') {
            template
        } else {
            format!("/{template}")
        };

        Self {
            host: host.into(),
            port,
            template,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, value: impl fmt::Display) -> Self {
        self.params.push(value.to_string());
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Render the full URL. Fails when the parameter count does not match
    /// the placeholder count.
    pub fn url(&self) -> Result<String, CallError> {
        let expected = self.template.matches(PLACEHOLDER).count();
        if expected != self.params.len() {
            return Err(CallError::InvalidTarget {
                template: self.template.clone(),
                expected,
                given: self.params.len(),
            });
        }

        let mut path = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();
        for value in &self.params {
            // count matched above, so every param has a placeholder
            if let Some(idx) = rest.find(PLACEHOLDER) {
                path.push_str(&rest[..idx]);
                path.push_str(&urlencoding::encode(value));
                rest = &rest[idx + PLACEHOLDER.len()..];
            }
        }
        path.push_str(rest);

        Ok(format!("http://{}:{}{}", self.authority_host(), self.port, path))
    }

    /// IPv6 literals are bracketed in a URL authority.
    fn authority_host(&self) -> std::borrow::Cow<'_, str> {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host).into()
        } else {
            self.host.as_str().into()
        }
    }
}

/// `host:port/template`, without parameter values.
impl fmt::Display for ServiceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}{}", self.host, self.port, self.template)
    }
}
