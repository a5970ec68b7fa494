use std::collections::HashMap;

use crate::{error::SourceError, source::DependencySource};

/// An unversioned repository described by `name: dep dep ...` lines.
///
/// Blank lines, lines starting with `#`, and lines without `:` are ignored. A later line for
/// the same package replaces an earlier one.
#[derive(Debug, Default, Clone)]
pub struct FlatRepository {
    packages: HashMap<String, Vec<String>>,
}

impl FlatRepository {
    pub fn parse(text: &str) -> Self {
        let packages = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once(':'))
            .map(|(name, deps)| {
                let deps = deps.split_whitespace().map(String::from).collect();
                (name.trim().to_string(), deps)
            })
            .collect();
        Self { packages }
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl DependencySource for FlatRepository {
    fn dependencies(&self, name: &str, _version: Option<&str>) -> Result<Vec<String>, SourceError> {
        self.packages
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::PackageNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const REPO: &str = "\
# sample repository
A:B C
B: C D

C:
D:A
not a package line
  E :  F   G
";

    #[rstest]
    #[case::no_space("A", &["B", "C"])]
    #[case::leading_space("B", &["C", "D"])]
    #[case::empty("C", &[])]
    #[case::padded("E", &["F", "G"])]
    fn parses_lines(#[case] name: &str, #[case] deps: &[&str]) {
        let repo = FlatRepository::parse(REPO);
        assert_eq!(repo.dependencies(name, None).unwrap(), deps);
    }

    #[test]
    fn skips_comments_and_garbage() {
        let repo = FlatRepository::parse(REPO);
        assert_eq!(repo.len(), 5);
        assert!(repo.dependencies("# sample repository", None).is_err());
    }

    #[test]
    fn version_is_ignored() {
        let repo = FlatRepository::parse(REPO);
        assert_eq!(
            repo.dependencies("D", Some("9.9")).unwrap(),
            repo.dependencies("D", None).unwrap()
        );
    }

    #[test]
    fn unknown_package() {
        let repo = FlatRepository::parse(REPO);
        assert_eq!(
            repo.dependencies("Z", None),
            Err(SourceError::PackageNotFound("Z".to_string()))
        );
    }

    #[test]
    fn later_line_replaces_earlier() {
        let repo = FlatRepository::parse("A: B\nA: C");
        assert_eq!(repo.dependencies("A", None).unwrap(), vec!["C"]);
    }
}
