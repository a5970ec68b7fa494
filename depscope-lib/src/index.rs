use std::collections::HashMap;

use crate::{
    error::{ParseError, SourceError},
    source::DependencySource,
};

/// A versioned package index in the `APKINDEX` record format.
///
/// Records are groups of `<field>:<value>` lines separated by blank lines. Only `P` (name),
/// `V` (version) and `D` (space separated dependencies) are read; a record lacking a name or a
/// version is dropped.
#[derive(Debug, Default, Clone)]
pub struct PackageIndex {
    // Versions keep index order; the last one is the default.
    packages: HashMap<String, Vec<(String, Vec<String>)>>,
}

#[derive(Default)]
struct Record {
    name: Option<String>,
    version: Option<String>,
    dependencies: Vec<String>,
}

impl PackageIndex {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut index = PackageIndex::default();
        let mut record = Record::default();

        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                index.insert(std::mem::take(&mut record));
                continue;
            }

            let Some((field, value)) = line.split_once(':') else {
                return Err(ParseError {
                    line: i + 1,
                    message: format!("expected `<field>:<value>`, found {line:?}"),
                });
            };

            match field {
                "P" => record.name = Some(value.to_string()),
                "V" => record.version = Some(value.to_string()),
                "D" => record.dependencies = value.split_whitespace().map(String::from).collect(),
                _ => {}
            }
        }
        index.insert(record);

        Ok(index)
    }

    fn insert(&mut self, record: Record) {
        let (Some(name), Some(version)) = (record.name, record.version) else {
            return;
        };

        let versions = self.packages.entry(name).or_default();
        match versions.iter_mut().find(|(v, _)| *v == version) {
            Some((_, dependencies)) => *dependencies = record.dependencies,
            None => versions.push((version, record.dependencies)),
        }
    }

    /// Number of distinct package names.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn versions(&self, name: &str) -> Option<impl Iterator<Item = &str>> {
        self.packages
            .get(name)
            .map(|versions| versions.iter().map(|(v, _)| v.as_str()))
    }
}

impl DependencySource for PackageIndex {
    fn dependencies(&self, name: &str, version: Option<&str>) -> Result<Vec<String>, SourceError> {
        let versions = self
            .packages
            .get(name)
            .ok_or_else(|| SourceError::PackageNotFound(name.to_string()))?;

        let found = match version {
            Some(version) => versions.iter().find(|(v, _)| v == version).ok_or_else(|| {
                SourceError::VersionNotFound {
                    package: name.to_string(),
                    version: version.to_string(),
                }
            })?,
            None => versions
                .last()
                .ok_or_else(|| SourceError::PackageNotFound(name.to_string()))?,
        };

        Ok(found.1.clone())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const INDEX: &str = "\
C:Q1abc=
P:musl
V:1.2.4-r2
A:x86_64
D:

P:busybox
V:1.36.1-r5
D:so:libc.musl-x86_64.so.1 musl

P:curl
V:8.4.0-r0
D:ca-certificates libcurl

P:curl
V:8.5.0-r0
D:ca-certificates libcurl zlib

V:0.0.1
D:orphan

P:zlib
V:1.3-r2";

    #[test]
    fn parses_records() {
        let index = PackageIndex::parse(INDEX).unwrap();
        assert_eq!(index.len(), 4);
        assert_eq!(
            index.dependencies("busybox", Some("1.36.1-r5")).unwrap(),
            vec!["so:libc.musl-x86_64.so.1", "musl"]
        );
        assert!(index.dependencies("musl", None).unwrap().is_empty());
    }

    #[rstest]
    #[case::exact_old(Some("8.4.0-r0"), &["ca-certificates", "libcurl"])]
    #[case::exact_new(Some("8.5.0-r0"), &["ca-certificates", "libcurl", "zlib"])]
    #[case::default_is_last(None, &["ca-certificates", "libcurl", "zlib"])]
    fn version_lookup(#[case] version: Option<&str>, #[case] deps: &[&str]) {
        let index = PackageIndex::parse(INDEX).unwrap();
        assert_eq!(index.dependencies("curl", version).unwrap(), deps);
    }

    #[test]
    fn final_record_without_blank_line() {
        let index = PackageIndex::parse(INDEX).unwrap();
        assert_eq!(index.versions("zlib").unwrap().collect::<Vec<_>>(), vec!["1.3-r2"]);
        assert!(index.dependencies("zlib", None).unwrap().is_empty());
    }

    #[test]
    fn nameless_record_is_dropped() {
        let index = PackageIndex::parse(INDEX).unwrap();
        assert!(index.versions("orphan").is_none());
        assert!(
            index
                .versions("curl")
                .unwrap()
                .eq(["8.4.0-r0", "8.5.0-r0"])
        );
    }

    #[test]
    fn repeated_version_replaces_dependencies() {
        let index = PackageIndex::parse("P:a\nV:1\nD:b\n\nP:a\nV:1\nD:c\n").unwrap();
        assert_eq!(index.versions("a").unwrap().count(), 1);
        assert_eq!(index.dependencies("a", Some("1")).unwrap(), vec!["c"]);
    }

    #[test]
    fn lookup_errors() {
        let index = PackageIndex::parse(INDEX).unwrap();
        assert_eq!(
            index.dependencies("nope", None),
            Err(SourceError::PackageNotFound("nope".to_string()))
        );
        assert_eq!(
            index.dependencies("curl", Some("1.0")),
            Err(SourceError::VersionNotFound {
                package: "curl".to_string(),
                version: "1.0".to_string(),
            })
        );
    }

    #[test]
    fn malformed_line() {
        let err = PackageIndex::parse("P:a\nV:1\ngarbage\n").unwrap_err();
        assert_eq!(err.line, 3);
    }

    #[test]
    fn crlf_line_endings() {
        let index = PackageIndex::parse("P:a\r\nV:1\r\nD:b c\r\n\r\n").unwrap();
        assert_eq!(index.dependencies("a", None).unwrap(), vec!["b", "c"]);
    }
}
