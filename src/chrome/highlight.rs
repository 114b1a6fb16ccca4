/// Class added to the menu link of the page being viewed.
pub const CURRENT_CLASS: &str = "actual";

fn strip_query(location: &str) -> &str {
    location.split('?').next().unwrap_or_default()
}

/// Resolves `href` the way a browser would before comparing it: relative
/// links are joined onto the current location.
fn resolve(href: &str, location: &str) -> String {
    match reqwest::Url::parse(location).and_then(|base| base.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => href.to_string(),
    }
}

/// Index of the first menu link pointing at `location` (query string
/// ignored), if any. Never selects more than one link.
pub fn current_link(hrefs: &[&str], location: &str) -> Option<usize> {
    let target = strip_query(location);
    hrefs
        .iter()
        .position(|href| resolve(href, location) == target)
}
