//! # GCP Secret Manager Paths
//!
//! Resource names and REST API v1 paths for Secret Manager.
//!
//! API Reference: https://cloud.google.com/secret-manager/docs/reference/rest

use std::fmt;

use crate::errors::PathError;

/// Version alias that resolves to the most recently created enabled version
pub const LATEST_VERSION: &str = "latest";

/// REST API version (first path segment)
pub const API_VERSION: &str = "v1";

/// Axum route: list (GET) and create (POST) secrets in a project
pub const ROUTE_SECRETS: &str = "/v1/projects/{project}/secrets";

/// Axum route: a single secret (GET metadata, DELETE, POST `{secret}:addVersion`)
pub const ROUTE_SECRET: &str = "/v1/projects/{project}/secrets/{secret}";

/// Axum route: a single version (GET `{version}:access`)
pub const ROUTE_SECRET_VERSION: &str = "/v1/projects/{project}/secrets/{secret}/versions/{version}";

/// Custom method suffix for adding a version
pub const ADD_VERSION_METHOD: &str = "addVersion";

/// Custom method suffix for accessing a version payload
pub const ACCESS_METHOD: &str = "access";

/// Custom method suffix for disabling a version
pub const DISABLE_METHOD: &str = "disable";

/// REST path of one API call, relative to the service endpoint
///
/// Holds raw, unencoded segments. Resource ids are caller input and may
/// contain `/`, `?`, `#` or `%`, so each segment must be percent-encoded on its
/// own when the URL is built; never splice [`RestPath`]'s `Display` output
/// into a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestPath {
    segments: Vec<String>,
    method: Option<&'static str>,
}

impl RestPath {
    fn new(segments: Vec<String>, method: Option<&'static str>) -> Self {
        Self { segments, method }
    }

    fn with_method(mut self, method: &'static str) -> Self {
        self.method = Some(method);
        self
    }

    /// Custom method (`addVersion`, `access`, ...) appended to the last segment
    pub fn method(&self) -> Option<&'static str> {
        self.method
    }

    /// Segments to append to the endpoint, the last one carrying `:{method}`
    ///
    /// Fails for empty, `.` and `..` segments: those cannot be expressed as a
    /// single URL path segment and would be dropped or resolved away.
    pub fn segments(&self) -> Result<Vec<String>, PathError> {
        for (index, segment) in self.segments.iter().enumerate() {
            if segment.is_empty() {
                return Err(PathError::EmptySegment {
                    name: self.to_string(),
                    index,
                });
            }
            if segment == "." || segment == ".." {
                return Err(PathError::DotSegment {
                    name: self.to_string(),
                    index,
                });
            }
        }

        let mut segments = self.segments.clone();
        if let (Some(method), Some(last)) = (self.method, segments.last_mut()) {
            last.push(':');
            last.push_str(method);
        }
        Ok(segments)
    }
}

/// Unencoded form for logs and messages
impl fmt::Display for RestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))?;
        if let Some(method) = self.method {
            write!(f, ":{method}")?;
        }
        Ok(())
    }
}

/// `projects/{project}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName {
    pub project: String,
}

/// `projects/{project}/secrets/{secret}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretName {
    pub project: String,
    pub secret: String,
}

/// `projects/{project}/secrets/{secret}/versions/{version}`
///
/// The version is either a decimal version number or the `latest` alias.
/// It is not validated here; the service is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretVersionName {
    pub project: String,
    pub secret: String,
    pub version: String,
}

impl ProjectName {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
        }
    }

    /// Parse `projects/{project}`
    pub fn parse(name: &str) -> Result<Self, PathError> {
        let segments = split_segments("project", name, &["projects"])?;
        Ok(Self::new(segments[0]))
    }

    /// REST path for listing and creating secrets
    pub fn secrets_path(&self) -> RestPath {
        RestPath::new(
            vec![
                API_VERSION.to_string(),
                "projects".to_string(),
                self.project.clone(),
                "secrets".to_string(),
            ],
            None,
        )
    }

    pub fn secret(&self, secret: impl Into<String>) -> SecretName {
        SecretName::new(self.project.clone(), secret)
    }
}

impl SecretName {
    pub fn new(project: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            secret: secret.into(),
        }
    }

    /// Parse `projects/{project}/secrets/{secret}`
    pub fn parse(name: &str) -> Result<Self, PathError> {
        let segments = split_segments("secret", name, &["projects", "secrets"])?;
        Ok(Self::new(segments[0], segments[1]))
    }

    pub fn project_name(&self) -> ProjectName {
        ProjectName::new(self.project.clone())
    }

    /// REST path for metadata and delete
    pub fn path(&self) -> RestPath {
        let mut path = self.project_name().secrets_path();
        path.segments.push(self.secret.clone());
        path
    }

    /// REST path for `:addVersion`
    pub fn add_version_path(&self) -> RestPath {
        self.path().with_method(ADD_VERSION_METHOD)
    }

    pub fn version(&self, version: impl Into<String>) -> SecretVersionName {
        SecretVersionName::new(self.project.clone(), self.secret.clone(), version)
    }
}

impl SecretVersionName {
    pub fn new(
        project: impl Into<String>,
        secret: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            secret: secret.into(),
            version: version.into(),
        }
    }

    /// Parse `projects/{project}/secrets/{secret}/versions/{version}`
    pub fn parse(name: &str) -> Result<Self, PathError> {
        let segments = split_segments("secret version", name, &["projects", "secrets", "versions"])?;
        Ok(Self::new(segments[0], segments[1], segments[2]))
    }

    pub fn secret_name(&self) -> SecretName {
        SecretName::new(self.project.clone(), self.secret.clone())
    }

    fn path(&self) -> RestPath {
        let mut path = self.secret_name().path();
        path.segments.push("versions".to_string());
        path.segments.push(self.version.clone());
        path
    }

    /// REST path for `:access`
    pub fn access_path(&self) -> RestPath {
        self.path().with_method(ACCESS_METHOD)
    }

    /// REST path for `:disable`
    pub fn disable_path(&self) -> RestPath {
        self.path().with_method(DISABLE_METHOD)
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projects/{}", self.project)
    }
}

impl fmt::Display for SecretName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projects/{}/secrets/{}", self.project, self.secret)
    }
}

impl fmt::Display for SecretVersionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "projects/{}/secrets/{}/versions/{}",
            self.project, self.secret, self.version
        )
    }
}

/// Last path segment of a fully-qualified secret name (the secret id)
///
/// `projects/p/secrets/db-pass` yields `db-pass`. A bare id is returned unchanged.
pub fn secret_id_of(full_name: &str) -> &str {
    full_name.rsplit('/').next().unwrap_or(full_name)
}

/// Split a name of alternating `collection/value` pairs and return the values
fn split_segments<'a>(
    kind: &'static str,
    name: &'a str,
    collections: &[&'static str],
) -> Result<Vec<&'a str>, PathError> {
    let parts: Vec<&str> = name.split('/').collect();
    let expected = collections.len() * 2;
    if parts.len() != expected {
        return Err(PathError::SegmentCount {
            kind,
            name: name.to_string(),
            expected,
            found: parts.len(),
        });
    }

    let mut values = Vec::with_capacity(collections.len());
    for (i, collection) in collections.iter().enumerate() {
        let literal_index = i * 2;
        if parts[literal_index] != *collection {
            return Err(PathError::UnexpectedSegment {
                name: name.to_string(),
                index: literal_index,
                expected: collection,
            });
        }
        let value = parts[literal_index + 1];
        if value.is_empty() {
            return Err(PathError::EmptySegment {
                name: name.to_string(),
                index: literal_index + 1,
            });
        }
        values.push(value);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        let version = SecretVersionName::new("my-project", "db-pass", "3");
        assert_eq!(
            version.to_string(),
            "projects/my-project/secrets/db-pass/versions/3"
        );
        assert_eq!(
            version.secret_name().to_string(),
            "projects/my-project/secrets/db-pass"
        );
        assert_eq!(
            version.secret_name().project_name().to_string(),
            "projects/my-project"
        );
    }

    #[test]
    fn test_rest_paths() {
        let project = ProjectName::new("p1");
        assert_eq!(project.secrets_path().to_string(), "/v1/projects/p1/secrets");

        let secret = project.secret("api-key");
        assert_eq!(secret.path().to_string(), "/v1/projects/p1/secrets/api-key");
        assert_eq!(
            secret.add_version_path().segments().unwrap(),
            vec!["v1", "projects", "p1", "secrets", "api-key:addVersion"]
        );
        assert_eq!(
            secret.version(LATEST_VERSION).access_path().to_string(),
            "/v1/projects/p1/secrets/api-key/versions/latest:access"
        );
        assert_eq!(
            secret.version("2").disable_path().method(),
            Some(DISABLE_METHOD)
        );
    }

    #[test]
    fn test_segments_keep_reserved_characters_inside_one_segment() {
        let path = SecretVersionName::new("p1", "a#b", "../../other/versions/1").access_path();
        let segments = path.segments().unwrap();
        assert_eq!(segments.len(), 7);
        assert_eq!(segments[4], "a#b");
        assert_eq!(segments[6], "../../other/versions/1:access");
    }

    #[test]
    fn test_segments_reject_dot_and_empty_ids() {
        assert!(matches!(
            SecretName::new("p1", "..").add_version_path().segments(),
            Err(PathError::DotSegment { index: 4, .. })
        ));
        assert!(matches!(
            SecretVersionName::new("p1", "s1", ".").access_path().segments(),
            Err(PathError::DotSegment { index: 6, .. })
        ));
        assert!(matches!(
            SecretName::new("p1", "").path().segments(),
            Err(PathError::EmptySegment { index: 4, .. })
        ));
    }

    #[test]
    fn test_parse_round_trip() {
        let name = "projects/p1/secrets/s1/versions/latest";
        let parsed = SecretVersionName::parse(name).unwrap();
        assert_eq!(parsed, SecretVersionName::new("p1", "s1", "latest"));
        assert_eq!(parsed.to_string(), name);

        let secret = SecretName::parse("projects/p1/secrets/s1").unwrap();
        assert_eq!(secret.secret, "s1");

        let project = ProjectName::parse("projects/p1").unwrap();
        assert_eq!(project.project, "p1");
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        assert!(matches!(
            SecretName::parse("projects/p1/secrets"),
            Err(PathError::SegmentCount { expected: 4, found: 3, .. })
        ));
        assert!(matches!(
            SecretName::parse("projects/p1/keys/s1"),
            Err(PathError::UnexpectedSegment { index: 2, .. })
        ));
        assert!(matches!(
            SecretName::parse("projects//secrets/s1"),
            Err(PathError::EmptySegment { index: 1, .. })
        ));
    }

    #[test]
    fn test_secret_id_of() {
        assert_eq!(secret_id_of("projects/p/secrets/db-pass"), "db-pass");
        assert_eq!(secret_id_of("db-pass"), "db-pass");
        assert_ne!(secret_id_of("projects/p/secrets/db-pass-2"), "db-pass");
    }

    #[test]
    fn test_route_constants_match_builders() {
        // Substituting the route placeholders must yield the builder output
        let fill = |route: &str| {
            route
                .replace("{project}", "p1")
                .replace("{secret}", "s1")
                .replace("{version}", "7")
        };
        let secret = SecretName::new("p1", "s1");
        assert_eq!(
            fill(ROUTE_SECRETS),
            secret.project_name().secrets_path().to_string()
        );
        assert_eq!(fill(ROUTE_SECRET), secret.path().to_string());
        assert_eq!(
            format!("{}:{ACCESS_METHOD}", fill(ROUTE_SECRET_VERSION)),
            secret.version("7").access_path().to_string()
        );
    }
}
