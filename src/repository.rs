use std::path::Path;

use anyhow::Context;
use cfg_if::cfg_if;
use tracing::info;

use depscope_lib::{index::PackageIndex, repo::FlatRepository};

pub fn read_flat_repository(path: &Path) -> anyhow::Result<FlatRepository> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read repository file {}", path.display()))?;
    let repository = FlatRepository::parse(&text);
    info!(
        "loaded {} packages from {}",
        repository.len(),
        path.display()
    );
    Ok(repository)
}

cfg_if! {
    if #[cfg(feature = "remote")] {
        use std::io::Read;

        pub const INDEX_ARCHIVE: &str = "APKINDEX.tar.gz";
        pub const INDEX_MEMBER: &str = "APKINDEX";

        pub fn fetch_package_index(repo_url: &str) -> anyhow::Result<PackageIndex> {
            let url = format!("{}/{INDEX_ARCHIVE}", repo_url.trim_end_matches('/'));
            info!("downloading {url}");

            let archive = reqwest::blocking::get(&url)
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.bytes())
                .with_context(|| format!("failed to download {url}"))?;
            info!(
                "downloaded {}",
                humansize::format_size(archive.len(), humansize::BINARY)
            );

            let text = extract_index(&archive)?;
            let index = PackageIndex::parse(&text).context("failed to parse APKINDEX")?;
            info!("indexed {} packages", index.len());
            Ok(index)
        }

        /// Returns the `APKINDEX` member of a gzipped tar archive.
        pub fn extract_index(archive: &[u8]) -> anyhow::Result<String> {
            let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(archive));
            for entry in tar.entries().context("failed to read index archive")? {
                let mut entry = entry.context("failed to read index archive entry")?;
                if entry.path().is_ok_and(|p| &*p == Path::new(INDEX_MEMBER)) {
                    let mut text = String::new();
                    entry
                        .read_to_string(&mut text)
                        .context("failed to read APKINDEX as UTF-8")?;
                    return Ok(text);
                }
            }
            anyhow::bail!("{INDEX_MEMBER} not found in index archive")
        }
    } else {
        pub fn fetch_package_index(_repo_url: &str) -> anyhow::Result<PackageIndex> {
            anyhow::bail!("remote repositories require the `remote` feature")
        }
    }
}
