use std::io;

/// Open a URL in the user's default web browser
///
/// Used to show the authorize URL to the user. Callers should still print
/// the URL, since there may be no browser to open.
///
/// # Errors
///
/// Returns an error if the browser cannot be launched
pub fn open_browser(url: &str) -> io::Result<()> {
    webbrowser::open(url)
}
