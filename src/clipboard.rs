use crate::traits::Clipboard;

/// In-memory register.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    content: Option<String>,
}

impl Register {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn peek(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

impl Clipboard for Register {
    fn get(&mut self) -> Option<String> {
        self.content.clone()
    }

    fn set(&mut self, text: String) {
        self.content = Some(text);
    }
}

#[cfg(feature = "clipboard")]
pub use system::SystemClipboard;

#[cfg(feature = "clipboard")]
mod system {
    use log::warn;

    use super::Register;
    use crate::traits::Clipboard;

    /// Register mirrored to the system clipboard.
    ///
    /// Reads prefer the system clipboard and fall back to the last value set
    /// through this register when the platform clipboard is unavailable.
    pub struct SystemClipboard {
        inner: arboard::Clipboard,
        fallback: Register,
    }

    impl SystemClipboard {
        pub fn new() -> Result<Self, arboard::Error> {
            Ok(Self {
                inner: arboard::Clipboard::new()?,
                fallback: Register::new(),
            })
        }
    }

    impl Clipboard for SystemClipboard {
        fn get(&mut self) -> Option<String> {
            match self.inner.get_text() {
                Ok(text) => Some(text),
                Err(err) => {
                    warn!("system clipboard read failed: {err}");
                    self.fallback.get()
                }
            }
        }

        fn set(&mut self, text: String) {
            if let Err(err) = self.inner.set_text(text.clone()) {
                warn!("system clipboard write failed: {err}");
            }
            self.fallback.set(text);
        }
    }
}
