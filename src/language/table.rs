//! Known-language table
//!
//! Each entry lists the evidence the detector accepts for a language and the
//! identifier the UAST service knows it by. Table order is the order exposed
//! by `/get-languages`.

use super::Category;

/// A known language and its detection evidence
#[derive(Debug)]
pub struct LanguageDef {
    /// Display name
    pub name: &'static str,
    pub category: Category,
    /// Identifier understood by the UAST service
    pub service_id: &'static str,
    /// Lowercase extensions without the leading dot
    pub extensions: &'static [&'static str],
    /// Exact file names
    pub filenames: &'static [&'static str],
    /// Shebang interpreters
    pub interpreters: &'static [&'static str],
    /// Keyword signatures, compiled in multi-line mode
    pub signatures: &'static [&'static str],
}

const SHELL_SIGNATURES: &[&str] = &[
    r"^\s*(echo|export|source|local|readonly)\s",
    r"\$\{?[A-Za-z_]\w*\}?",
    r"^\s*(fi|done|esac)\s*$",
    r"^\s*if\s+\[",
];

pub static LANGUAGES: &[LanguageDef] = &[
    LanguageDef {
        name: "Bash",
        category: Category::Programming,
        service_id: "bash",
        extensions: &["bash"],
        filenames: &[".bashrc", ".bash_profile", ".bash_logout"],
        interpreters: &["bash"],
        signatures: SHELL_SIGNATURES,
    },
    LanguageDef {
        name: "C#",
        category: Category::Programming,
        service_id: "csharp",
        extensions: &["cs", "csx"],
        filenames: &[],
        interpreters: &[],
        signatures: &[
            r"^\s*using\s+System(\.[\w.]+)?\s*;",
            r"^\s*namespace\s+[\w.]+",
            r"\bstatic\s+void\s+Main\s*\(",
            r"\bConsole\.Write(Line)?\s*\(",
        ],
    },
    LanguageDef {
        name: "C++",
        category: Category::Programming,
        service_id: "cpp",
        extensions: &["cpp", "cc", "cxx", "c++", "hpp", "hh", "hxx", "h", "inc"],
        filenames: &[],
        interpreters: &[],
        signatures: &[
            r"^\s*#\s*include\s*[<\x22]",
            r"\bstd::\w+",
            r"\btemplate\s*<",
            r"\bint\s+main\s*\(",
        ],
    },
    LanguageDef {
        name: "Go",
        category: Category::Programming,
        service_id: "go",
        extensions: &["go"],
        filenames: &[],
        interpreters: &[],
        signatures: &[
            r"^\s*package\s+\w+\s*$",
            r"^\s*func\s+(\(\w+\s+\*?\w+\)\s*)?\w+\s*\(",
            r"\bfmt\.\w+\s*\(",
            r"\w+\s*:=",
        ],
    },
    LanguageDef {
        name: "Java",
        category: Category::Programming,
        service_id: "java",
        extensions: &["java"],
        filenames: &[],
        interpreters: &[],
        signatures: &[
            r"\bpublic\s+(final\s+)?class\s+\w+",
            r"\bSystem\.(out|err)\.print(ln)?\s*\(",
            r"\bstatic\s+void\s+main\s*\(\s*String",
            r"^\s*import\s+java\.",
        ],
    },
    LanguageDef {
        name: "JavaScript",
        category: Category::Programming,
        service_id: "javascript",
        extensions: &["js", "mjs", "cjs", "jsx"],
        filenames: &["Jakefile"],
        interpreters: &["node", "nodejs"],
        signatures: &[
            r"\bconsole\.\w+\s*\(",
            r"\bfunction\s*\w*\s*\(",
            r"\b(const|let|var)\s+\w+\s*=",
            r"\brequire\s*\(\s*['\x22]",
            r"\bmodule\.exports\b",
        ],
    },
    LanguageDef {
        name: "PHP",
        category: Category::Programming,
        service_id: "php",
        extensions: &["php", "phtml", "php3", "php4", "php5", "inc"],
        filenames: &[],
        interpreters: &["php"],
        signatures: &[r"<\?php", r"\$\w+\s*(=|->)", r"^\s*echo\s"],
    },
    LanguageDef {
        name: "Python",
        category: Category::Programming,
        service_id: "python",
        extensions: &["py", "pyw", "pyi"],
        filenames: &["SConstruct", "SConscript"],
        interpreters: &["python", "python2", "python3"],
        signatures: &[
            r"^\s*def\s+\w+\s*\(.*\)\s*(->\s*[\w\[\], .]+)?:\s*$",
            r"^\s*import\s+[\w.]+\s*$",
            r"^\s*from\s+[\w.]+\s+import\s",
            r"\bprint\s*\(",
            r"\bself\.\w+",
        ],
    },
    LanguageDef {
        name: "Ruby",
        category: Category::Programming,
        service_id: "ruby",
        extensions: &["rb", "rake", "gemspec"],
        filenames: &["Rakefile", "Gemfile", "Guardfile"],
        interpreters: &["ruby"],
        signatures: &[
            r"^\s*def\s+\w+[?!]?\s*$",
            r"^\s*require\s+['\x22]",
            r"^\s*puts\s",
            r"^\s*end\s*$",
            r"\.each\s+do\b",
        ],
    },
    LanguageDef {
        name: "Shell",
        category: Category::Programming,
        service_id: "bash",
        extensions: &["sh", "zsh", "ksh"],
        filenames: &[".profile", ".zshrc"],
        interpreters: &["sh", "zsh", "ksh", "dash"],
        signatures: SHELL_SIGNATURES,
    },
];

/// Look up a language by display name or service identifier, ignoring case
pub fn find(name: &str) -> Option<&'static LanguageDef> {
    LANGUAGES
        .iter()
        .find(|l| l.name.eq_ignore_ascii_case(name) || l.service_id.eq_ignore_ascii_case(name))
}
