use logpane_ansi::strip_markup;

/// Where rendered fragments land.
///
/// The console's DOM log container implements this surface on the frontend;
/// [`HtmlBuffer`] is the in-process implementation used by tests and the CLI
/// driver.
pub trait DisplaySink {
    /// Append an already-rendered HTML fragment.
    fn append_html(&mut self, fragment: &str);
    /// Drop all rendered content.
    fn clear(&mut self);
    fn scroll_to_end(&mut self);
    /// Replace the transient status line; empty clears it.
    fn set_status(&mut self, status: &str);
    /// Rendered content as plain text, markup dropped.
    fn text(&self) -> String;
}

/// Append-only HTML buffer with a coarse scroll model: appends leave the
/// view where it was, `scroll_to_end` snaps it back to the tail.
#[derive(Debug, Clone, Default)]
pub struct HtmlBuffer {
    html: String,
    status: String,
    at_tail: bool,
}

impl HtmlBuffer {
    pub fn new() -> Self {
        Self {
            at_tail: true,
            ..Self::default()
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn at_tail(&self) -> bool {
        self.at_tail
    }

    /// Simulate the user scrolling away from the tail.
    pub fn scroll_away(&mut self) {
        self.at_tail = false;
    }
}

impl DisplaySink for HtmlBuffer {
    fn append_html(&mut self, fragment: &str) {
        self.html.push_str(fragment);
        self.at_tail = false;
    }

    fn clear(&mut self) {
        self.html.clear();
        self.at_tail = true;
    }

    fn scroll_to_end(&mut self) {
        self.at_tail = true;
    }

    fn set_status(&mut self, status: &str) {
        self.status.clear();
        self.status.push_str(status);
    }

    fn text(&self) -> String {
        strip_markup(&self.html)
    }
}
