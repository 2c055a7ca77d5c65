use crate::scanner::SOURCE_EXTENSION;

/// A translated document ready to be dropped into the page shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    /// Trusted HTML from the markup engine. Inserted into the shell as-is.
    pub body: String,
}

impl Page {
    /// Build a page for the source file `name` using the default source
    /// extension.
    pub fn assemble(name: &str, fragment: String) -> Self {
        Self::assemble_with_extension(name, SOURCE_EXTENSION, fragment)
    }

    pub fn assemble_with_extension(name: &str, extension: &str, fragment: String) -> Self {
        Self {
            title: base_name(name, extension).to_string(),
            body: fragment,
        }
    }
}

/// `name` with a single trailing `.<extension>` removed.
pub fn base_name<'a>(name: &'a str, extension: &str) -> &'a str {
    name.strip_suffix(extension)
        .and_then(|stem| stem.strip_suffix('.'))
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_drops_extension() {
        assert_eq!(Page::assemble("hello.md", String::new()).title, "hello");
    }

    #[test]
    fn test_only_last_extension_is_dropped() {
        assert_eq!(Page::assemble("a.b.md", String::new()).title, "a.b");
        assert_eq!(Page::assemble("twice.md.md", String::new()).title, "twice.md");
    }

    #[test]
    fn test_bare_extension_gives_empty_title() {
        assert_eq!(Page::assemble(".md", String::new()).title, "");
    }

    #[test]
    fn test_name_without_extension_is_kept() {
        assert_eq!(base_name("notes", "md"), "notes");
        assert_eq!(base_name("cmd", "md"), "cmd");
    }

    #[test]
    fn test_body_is_kept_verbatim() {
        let page = Page::assemble("post.md", "<h1>Hi</h1>\n".into());
        assert_eq!(page.body, "<h1>Hi</h1>\n");

        let empty = Page::assemble("empty.md", String::new());
        assert_eq!(empty.body, "");
    }
}
