//! Reference links embedded in iControl objects carry a scheme, a host that is
//! usually `localhost` and a `ver=` query. Only the path is meaningful to us.

use url::Url;

/// Reduces a full link or a bare path to its path component.
///
/// `https://localhost/mgmt/tm/ltm/pool/~Common~web?ver=16.1.0` becomes
/// `/mgmt/tm/ltm/pool/~Common~web`. Bare paths lose any query string.
pub fn path_of(link: &str) -> String {
    match Url::parse(link) {
        Ok(url) if url.has_host() => url.path().to_string(),
        _ => {
            let path = link.split(['?', '#']).next().unwrap_or_default();
            if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{path}")
            }
        }
    }
}
