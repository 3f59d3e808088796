use crate::error::Result;
use crate::export::page::ListPage;

/// Name used when the page shows no usable heading
pub const DEFAULT_CONTEXT_NAME: &str = "Unknown Source";

/// Finds the playlist or album title shown on the page
#[derive(Debug, Clone)]
pub struct ContextResolver {
    primary: String,
    fallback: String,
}

impl ContextResolver {
    pub fn new(primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self { primary: primary.into(), fallback: fallback.into() }
    }

    /// Masthead heading, then the page `h1`
    pub fn deezer() -> Self {
        Self::new(r#"[data-testid="masthead"] h2"#, "h1")
    }

    /// Resolve the display name. Never fails; page errors fall back to the default.
    pub fn resolve<P: ListPage + ?Sized>(&self, page: &P) -> String {
        match self.lookup(page) {
            Ok(Some(name)) => name,
            Ok(None) => {
                log::warn!(
                    "Could not automatically detect source context name using selector \"{}\" or h1 fallback. Using default.",
                    self.primary
                );
                DEFAULT_CONTEXT_NAME.to_string()
            }
            Err(e) => {
                log::error!("Error trying to detect source context name: {}", e);
                DEFAULT_CONTEXT_NAME.to_string()
            }
        }
    }

    fn lookup<P: ListPage + ?Sized>(&self, page: &P) -> Result<Option<String>> {
        if let Some(name) = non_empty(page.text_of(&self.primary)?) {
            log::info!("Detected source context: \"{}\"", name);
            return Ok(Some(name));
        }

        if let Some(name) = non_empty(page.text_of(&self.fallback)?) {
            log::info!("Detected source context (fallback h1): \"{}\"", name);
            return Ok(Some(name));
        }

        Ok(None)
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}
