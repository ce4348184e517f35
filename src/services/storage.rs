// SPDX-License-Identifier: MIT

//! Public URL construction for stored objects.

/// Builds public URLs for object-storage keys.
///
/// Keys that already carry a scheme (seeded data, external avatars)
/// pass through unchanged.
#[derive(Debug, Clone)]
pub struct StorageUrlResolver {
    base: String,
}

impl StorageUrlResolver {
    pub fn new(bucket: &str, domain: &str) -> Self {
        Self {
            base: format!("https://{}.{}", bucket, domain),
        }
    }

    /// Resolve a stored key to a fetchable URL. `None` in, `None` out.
    pub fn public_url(&self, key: Option<&str>) -> Option<String> {
        let key = key?;
        if key.is_empty() {
            return None;
        }
        if key.starts_with("https://") || key.starts_with("http://") {
            return Some(key.to_string());
        }
        Some(format!("{}/{}", self.base, key.trim_start_matches('/')))
    }
}
