use crate::cataloging::domain::LinuxRelease;

/// ReleaseIdentifier reads the distribution identity out of os-release
/// content.
///
/// This service has no I/O; the caller reads the file through the content
/// resolver.
pub struct ReleaseIdentifier;

impl ReleaseIdentifier {
    /// Candidate os-release paths, in lookup order.
    pub const OS_RELEASE_PATHS: [&'static str; 2] = ["/etc/os-release", "/usr/lib/os-release"];

    /// Parses `KEY=VALUE` lines of an os-release file
    ///
    /// # Arguments
    /// * `content` - Full file content
    ///
    /// # Returns
    /// The release, or `None` when no recognised key is present
    pub fn parse(content: &str) -> Option<LinuxRelease> {
        let mut release = LinuxRelease::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = unquote(value.trim());

            match key.trim() {
                "ID" => release.id = value,
                "VERSION_ID" => release.version_id = value,
                "PRETTY_NAME" => release.pretty_name = value,
                "NAME" => release.name = value,
                "VERSION" => release.version = value,
                "ID_LIKE" => {
                    release.id_like = value.split_whitespace().map(str::to_string).collect()
                }
                _ => {}
            }
        }

        (!release.is_empty()).then_some(release)
    }
}

fn unquote(value: &str) -> String {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner.to_string();
        }
    }
    value.to_string()
}
