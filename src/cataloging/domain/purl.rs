use std::collections::BTreeMap;
use std::fmt;

/// Package URL (`pkg:type/namespace/name@version?qualifiers`).
///
/// Segments are percent-encoded on display; qualifiers with empty values are
/// omitted and the rest are written in key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageUrl {
    purl_type: &'static str,
    namespace: Option<String>,
    name: String,
    version: String,
    qualifiers: BTreeMap<String, String>,
}

impl PackageUrl {
    pub fn new(
        purl_type: &'static str,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            purl_type,
            namespace: None,
            name: name.into(),
            version: version.into(),
            qualifiers: BTreeMap::new(),
        }
    }

    pub fn hex(name: &str, version: &str) -> Self {
        Self::new("hex", name, version)
    }

    pub fn gem(name: &str, version: &str) -> Self {
        Self::new("gem", name, version)
    }

    pub fn cargo(name: &str, version: &str) -> Self {
        Self::new("cargo", name, version)
    }

    pub fn apk(distro: &str, name: &str, version: &str) -> Self {
        Self::new("apk", name, version).with_namespace(distro.to_ascii_lowercase())
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        self.namespace = (!namespace.is_empty()).then_some(namespace);
        self
    }

    pub fn with_qualifier(mut self, key: &str, value: impl Into<String>) -> Self {
        self.qualifiers.insert(key.to_string(), value.into());
        self
    }
}

impl fmt::Display for PackageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pkg:{}/", self.purl_type)?;
        if let Some(namespace) = &self.namespace {
            write!(f, "{}/", urlencoding::encode(namespace))?;
        }
        write!(f, "{}", urlencoding::encode(&self.name))?;
        if !self.version.is_empty() {
            write!(f, "@{}", urlencoding::encode(&self.version))?;
        }

        let qualifiers: Vec<String> = self
            .qualifiers
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();
        if !qualifiers.is_empty() {
            write!(f, "?{}", qualifiers.join("&"))?;
        }
        Ok(())
    }
}
