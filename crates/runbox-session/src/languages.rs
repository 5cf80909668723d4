//! The closed set of supported languages and their provider bindings.
//!
//! Each language maps to an editor display mode, the provider's language
//! identifier and version index, a download extension, and the starter
//! template a new file is seeded with. The table is immutable; callers
//! run [`validate_catalog`] once at startup to assert its invariants.

use anyhow::{Result, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python3,
    Cpp17,
    Java,
    NodeJs,
}

pub struct LanguageSpec {
    /// Tag used on the wire and in saved snippets.
    pub tag: &'static str,
    /// Editor syntax-highlighting mode.
    pub mode: &'static str,
    /// Language identifier expected by the execution provider.
    pub provider_id: &'static str,
    /// Provider version index (a string on the wire: "3", not 3).
    pub version_index: &'static str,
    /// Download file extension, including the dot.
    pub extension: &'static str,
    /// Source a newly created file starts with.
    pub template: &'static str,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Python3,
        Language::Cpp17,
        Language::Java,
        Language::NodeJs,
    ];

    pub fn spec(self) -> &'static LanguageSpec {
        match self {
            Language::Python3 => &PYTHON3,
            Language::Cpp17 => &CPP17,
            Language::Java => &JAVA,
            Language::NodeJs => &NODEJS,
        }
    }

    pub fn from_tag(tag: &str) -> Option<Language> {
        Language::ALL.into_iter().find(|l| l.spec().tag == tag)
    }

    pub fn tag(self) -> &'static str {
        self.spec().tag
    }
}

static PYTHON3: LanguageSpec = LanguageSpec {
    tag: "python3",
    mode: "python",
    provider_id: "python3",
    version_index: "3",
    extension: ".py",
    template: "print(\"Hello, World!\")",
};

static CPP17: LanguageSpec = LanguageSpec {
    tag: "cpp17",
    mode: "text/x-c++src",
    provider_id: "cpp17",
    version_index: "0",
    extension: ".cpp",
    template: "#include <iostream>\nusing namespace std;\n\nint main() {\n    cout << \"Hello, World!\" << endl;\n    return 0;\n}",
};

static JAVA: LanguageSpec = LanguageSpec {
    tag: "java",
    mode: "text/x-java",
    provider_id: "java",
    version_index: "4",
    extension: ".java",
    template: "public class Main {\n    public static void main(String[] args) {\n        System.out.println(\"Hello, World!\");\n    }\n}",
};

static NODEJS: LanguageSpec = LanguageSpec {
    tag: "nodejs",
    mode: "javascript",
    provider_id: "nodejs",
    version_index: "3",
    extension: ".js",
    template: "console.log(\"Hello, World!\");",
};

/// Assert the catalog invariants: unique tags, dot-prefixed extensions,
/// and no empty fields. Called once at server startup.
pub fn validate_catalog() -> Result<()> {
    let mut seen = Vec::new();
    for lang in Language::ALL {
        let spec = lang.spec();
        if seen.contains(&spec.tag) {
            bail!("duplicate language tag: {}", spec.tag);
        }
        seen.push(spec.tag);

        if !spec.extension.starts_with('.') {
            bail!("extension for {} must start with '.'", spec.tag);
        }
        if spec.tag.is_empty()
            || spec.mode.is_empty()
            || spec.provider_id.is_empty()
            || spec.version_index.is_empty()
            || spec.template.is_empty()
        {
            bail!("incomplete catalog entry for {}", spec.tag);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_valid() {
        validate_catalog().unwrap();
    }

    #[test]
    fn tags_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_tag(lang.tag()), Some(lang));
        }
        assert_eq!(Language::from_tag("cobol"), None);
    }

    #[test]
    fn provider_bindings_match_the_execute_api() {
        assert_eq!(Language::Python3.spec().version_index, "3");
        assert_eq!(Language::Cpp17.spec().version_index, "0");
        assert_eq!(Language::Java.spec().version_index, "4");
        assert_eq!(Language::NodeJs.spec().provider_id, "nodejs");
    }
}
