use modal_buffer::traits::Clipboard;

/// Register that also counts writes, so tests can tell "not yanked" from
/// "yanked the same text again".
#[derive(Default, Debug, Clone)]
pub struct MockClipboard {
    content: Option<String>,
    pub writes: usize,
}

impl MockClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(text: &str) -> Self {
        Self {
            content: Some(text.to_string()),
            writes: 0,
        }
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

impl Clipboard for MockClipboard {
    fn get(&mut self) -> Option<String> {
        self.content.clone()
    }

    fn set(&mut self, text: String) {
        self.writes += 1;
        self.content = Some(text);
    }
}
