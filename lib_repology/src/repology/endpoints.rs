//! Endpoint paths, relative to the API root.
//!
//! Every caller-supplied segment is percent-encoded on its own, so names
//! containing `/`, `@`, `+` or spaces stay a single path segment. Names that
//! would become dot segments (`.`, `..`) are rejected: URL parsing resolves
//! them even when percent-encoded, which would address a different endpoint.

use std::borrow::Cow;
use urlencoding::encode;

use crate::error::RepologyError;

/// Treats `Some("")` like `None`.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Percent-encodes one path segment.
fn segment(value: &str) -> Result<Cow<'_, str>, RepologyError> {
    match value {
        "." | ".." => Err(RepologyError::InvalidSegment(value.to_string())),
        _ => Ok(encode(value)),
    }
}

/// `project/{name}`
pub fn project(name: &str) -> Result<String, RepologyError> {
    Ok(format!("project/{}", segment(name)?))
}

/// One of `projects/`, `projects/{start}/`, `projects/..{end}/`,
/// `projects/{start}/..{end}/`.
pub fn projects(start: Option<&str>, end: Option<&str>) -> Result<String, RepologyError> {
    // `..{end}` is never a dot segment once `end` is non-empty
    let path = match (present(start), present(end)) {
        (Some(start), Some(end)) => format!("projects/{}/..{}/", segment(start)?, encode(end)),
        (Some(start), None) => format!("projects/{}/", segment(start)?),
        (None, Some(end)) => format!("projects/..{}/", encode(end)),
        (None, None) => "projects/".to_string(),
    };
    Ok(path)
}

/// `repository/{name}/problems`
pub fn repository_problems(repository: &str) -> Result<String, RepologyError> {
    Ok(format!("repository/{}/problems", segment(repository)?))
}

/// `maintainer/{email}/problems` or `maintainer/{email}/problems-for-repo/{repo}`
pub fn maintainer_problems(
    maintainer: &str,
    repository: Option<&str>,
) -> Result<String, RepologyError> {
    let path = match present(repository) {
        Some(repo) => format!(
            "maintainer/{}/problems-for-repo/{}",
            segment(maintainer)?,
            segment(repo)?
        ),
        None => format!("maintainer/{}/problems", segment(maintainer)?),
    };
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_names_are_percent_encoded() {
        assert_eq!(project("firefox").unwrap(), "project/firefox");
        assert_eq!(
            project("project with spaces").unwrap(),
            "project/project%20with%20spaces"
        );
        assert_eq!(project("c++").unwrap(), "project/c%2B%2B");
        assert_eq!(project("www/firefox").unwrap(), "project/www%2Ffirefox");
    }

    #[test]
    fn dots_inside_names_are_kept() {
        assert_eq!(project(".net").unwrap(), "project/.net");
        assert_eq!(project("a..b").unwrap(), "project/a..b");
        assert_eq!(project("...").unwrap(), "project/...");
    }

    #[test]
    fn dot_segments_are_rejected() {
        for name in [".", ".."] {
            assert!(matches!(project(name), Err(RepologyError::InvalidSegment(_))));
            assert!(matches!(repository_problems(name), Err(RepologyError::InvalidSegment(_))));
            assert!(maintainer_problems(name, None).is_err());
            assert!(maintainer_problems("a@b.org", Some(name)).is_err());
            assert!(projects(Some(name), None).is_err());
        }
    }

    #[test]
    fn dotted_end_bound_stays_inside_the_window_segment() {
        assert_eq!(projects(None, Some(".")).unwrap(), "projects/.../");
        assert_eq!(projects(Some("a"), Some("..")).unwrap(), "projects/a/..../");
    }

    #[test]
    fn project_window_has_four_shapes() {
        assert_eq!(projects(Some("a"), Some("z")).unwrap(), "projects/a/..z/");
        assert_eq!(projects(Some("a"), None).unwrap(), "projects/a/");
        assert_eq!(projects(None, Some("z")).unwrap(), "projects/..z/");
        assert_eq!(projects(None, None).unwrap(), "projects/");
    }

    #[test]
    fn empty_bounds_count_as_absent() {
        assert_eq!(projects(Some(""), Some("")).unwrap(), "projects/");
        assert_eq!(projects(Some(""), Some("z")).unwrap(), "projects/..z/");
    }

    #[test]
    fn problem_endpoints() {
        assert_eq!(
            repository_problems("freebsd").unwrap(),
            "repository/freebsd/problems"
        );
        assert_eq!(
            maintainer_problems("test@example.com", None).unwrap(),
            "maintainer/test%40example.com/problems"
        );
        assert_eq!(
            maintainer_problems("test@example.com", Some("freebsd")).unwrap(),
            "maintainer/test%40example.com/problems-for-repo/freebsd"
        );
        assert_eq!(
            maintainer_problems("test@example.com", Some("")).unwrap(),
            "maintainer/test%40example.com/problems"
        );
    }
}
