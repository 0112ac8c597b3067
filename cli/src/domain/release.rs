//! Upstream release naming and checksum-file parsing.

/// One upstream Prometheus release for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSpec {
    pub version: String,
    pub platform: String,
    pub base_url: String,
    pub verify_checksum: bool,
}

impl ReleaseSpec {
    /// Top-level folder inside the archive, e.g. `prometheus-2.43.0.linux-amd64`.
    #[must_use]
    pub fn folder_name(&self) -> String {
        format!("prometheus-{}.{}", self.version, self.platform)
    }

    #[must_use]
    pub fn archive_name(&self) -> String {
        format!("{}.tar.gz", self.folder_name())
    }

    #[must_use]
    pub fn archive_url(&self) -> String {
        format!(
            "{}/v{}/{}",
            self.base_url.trim_end_matches('/'),
            self.version,
            self.archive_name()
        )
    }

    #[must_use]
    pub fn checksum_url(&self) -> String {
        format!(
            "{}/v{}/sha256sums.txt",
            self.base_url.trim_end_matches('/'),
            self.version
        )
    }
}

/// Find the hex digest for `file_name` in a `sha256sum`-style listing
/// (`<hex>  <name>` per line, binary-mode `*name` allowed).
#[must_use]
pub fn expected_digest(sums: &str, file_name: &str) -> Option<String> {
    sums.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        let digest = parts.next()?;
        let name = parts.next()?.trim_start_matches('*');
        (name == file_name).then(|| digest.to_ascii_lowercase())
    })
}
