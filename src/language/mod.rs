//! Language detection
//!
//! Classifies a snippet from its filename and content. Evidence is consulted
//! in order of strength:
//! 1. exact file name (`Rakefile`, `.bashrc`)
//! 2. shebang interpreter (`#!/usr/bin/env python3`)
//! 3. file extension
//!
//! A strategy that yields exactly one language is trusted. When the evidence
//! is ambiguous, or there is none, keyword signatures score the candidates
//! and a unique best score wins.

pub mod table;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use table::{LanguageDef, LANGUAGES};

/// Language category, as reported by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Programming,
    Markup,
    Data,
    Prose,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Programming => "programming",
            Category::Markup => "markup",
            Category::Data => "data",
            Category::Prose => "prose",
            Category::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A language name with its category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    #[serde(rename = "type")]
    pub category: Category,
}

impl Language {
    /// The outcome when no language can be determined
    pub fn unknown() -> Self {
        Self {
            name: String::new(),
            category: Category::Other,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.name.is_empty()
    }
}

impl From<&LanguageDef> for Language {
    fn from(def: &LanguageDef) -> Self {
        Self {
            name: def.name.to_string(),
            category: def.category,
        }
    }
}

/// Classifier over the known-language table.
///
/// Built once at startup and shared; detection takes `&self` only.
pub struct LanguageDetector {
    /// Compiled signatures, parallel to `LANGUAGES`
    signatures: Vec<Vec<Regex>>,
}

impl LanguageDetector {
    pub fn new() -> Self {
        let signatures = LANGUAGES
            .iter()
            .map(|lang| {
                // Static patterns, covered by a test; a bad one only stops contributing
                lang.signatures
                    .iter()
                    .filter_map(|p| RegexBuilder::new(p).multi_line(true).build().ok())
                    .collect()
            })
            .collect();

        Self { signatures }
    }

    /// Full known-language table, in table order
    pub fn list_languages(&self) -> Vec<Language> {
        LANGUAGES.iter().map(Language::from).collect()
    }

    /// Best-guess language for the content, or `Language::unknown()`
    pub fn detect(&self, content: &str, filename: Option<&str>) -> Language {
        self.detect_def(content, filename)
            .map(Language::from)
            .unwrap_or_else(Language::unknown)
    }

    /// Best-guess table entry for the content
    pub fn detect_def(&self, content: &str, filename: Option<&str>) -> Option<&'static LanguageDef> {
        let filename = filename.map(str::trim).filter(|f| !f.is_empty());

        let mut candidates = filename.map(by_filename).unwrap_or_default();
        if candidates.is_empty() {
            candidates = by_shebang(content);
        }
        if candidates.is_empty() {
            candidates = filename.map(by_extension).unwrap_or_default();
        }

        if let [only] = candidates.as_slice() {
            tracing::debug!("Detected {} from filename evidence", LANGUAGES[*only].name);
            return Some(&LANGUAGES[*only]);
        }

        let pool = if candidates.is_empty() {
            (0..LANGUAGES.len()).collect()
        } else {
            candidates
        };

        let detected = self.by_content(content, &pool);
        tracing::debug!(
            "Content heuristics over {} candidates: {:?}",
            pool.len(),
            detected.map(|l| l.name)
        );
        detected
    }

    /// Score candidates by matching signatures; a unique best non-zero score wins
    fn by_content(&self, content: &str, pool: &[usize]) -> Option<&'static LanguageDef> {
        let scores: Vec<(usize, usize)> = pool
            .iter()
            .map(|&i| {
                let score = self.signatures[i].iter().filter(|re| re.is_match(content)).count();
                (i, score)
            })
            .collect();

        let best = scores.iter().map(|&(_, s)| s).max().unwrap_or(0);
        if best == 0 {
            return None;
        }

        let mut winners = scores.iter().filter(|&&(_, s)| s == best);
        match (winners.next(), winners.next()) {
            (Some(&(i, _)), None) => Some(&LANGUAGES[i]),
            _ => None,
        }
    }
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn base_name(filename: &str) -> &str {
    Path::new(filename)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
}

fn by_filename(filename: &str) -> Vec<usize> {
    let name = base_name(filename);
    indices(|lang| lang.filenames.iter().any(|f| *f == name))
}

fn by_extension(filename: &str) -> Vec<usize> {
    let ext = match Path::new(base_name(filename)).extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_lowercase(),
        None => return Vec::new(),
    };
    indices(|lang| lang.extensions.iter().any(|e| *e == ext))
}

fn by_shebang(content: &str) -> Vec<usize> {
    let Some(interpreter) = shebang_interpreter(content) else {
        return Vec::new();
    };

    let exact = indices(|lang| lang.interpreters.iter().any(|i| *i == interpreter));
    if !exact.is_empty() {
        return exact;
    }

    // python3.11 -> python
    let trimmed = interpreter.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.');
    indices(|lang| lang.interpreters.iter().any(|i| *i == trimmed))
}

/// Interpreter named by a `#!` first line, looking through `env`
fn shebang_interpreter(content: &str) -> Option<&str> {
    let first = content.trim_start_matches('\u{feff}').lines().next()?;
    let mut parts = first.strip_prefix("#!")?.split_whitespace();
    let program = parts.next()?.rsplit('/').next()?;

    if program == "env" {
        parts.find(|p| !p.starts_with('-') && !p.contains('='))
    } else {
        Some(program)
    }
}

fn indices(pred: impl Fn(&LanguageDef) -> bool) -> Vec<usize> {
    LANGUAGES
        .iter()
        .enumerate()
        .filter(|(_, lang)| pred(lang))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_signatures_compile() {
        let detector = LanguageDetector::new();
        for (lang, compiled) in LANGUAGES.iter().zip(&detector.signatures) {
            assert_eq!(lang.signatures.len(), compiled.len(), "{}", lang.name);
        }
    }

    #[test]
    fn test_extension_is_trusted() {
        let detector = LanguageDetector::new();
        // Content looks like Python, the extension wins
        let lang = detector.detect("print('hi')", Some("script.rb"));
        assert_eq!(lang.name, "Ruby");
        assert_eq!(lang.category, Category::Programming);
    }

    #[test]
    fn test_extension_case_insensitive() {
        let detector = LanguageDetector::new();
        assert_eq!(detector.detect("", Some("Main.JAVA")).name, "Java");
    }

    #[test]
    fn test_exact_filename() {
        let detector = LanguageDetector::new();
        assert_eq!(detector.detect("task :default", Some("project/Rakefile")).name, "Ruby");
    }

    #[test]
    fn test_shebang() {
        let detector = LanguageDetector::new();
        assert_eq!(detector.detect("#!/usr/bin/env python3\nx = 1\n", None).name, "Python");
        assert_eq!(detector.detect("#!/usr/bin/python3.11\n", Some("run")).name, "Python");
        assert_eq!(detector.detect("#!/bin/bash\nls\n", None).name, "Bash");
        assert_eq!(detector.detect("#!/usr/bin/env -S node --harmony\n", None).name, "JavaScript");
    }

    #[test]
    fn test_ambiguous_extension_uses_content() {
        let detector = LanguageDetector::new();
        assert_eq!(detector.detect("<?php echo $x; ?>", Some("config.inc")).name, "PHP");
        assert_eq!(
            detector.detect("#include <vector>\nstd::vector<int> v;", Some("types.inc")).name,
            "C++"
        );
    }

    #[test]
    fn test_content_only() {
        let detector = LanguageDetector::new();
        assert_eq!(detector.detect("console.log('test')", None).name, "JavaScript");
        assert_eq!(
            detector.detect("package main\n\nfunc main() {\n\tx := 1\n}\n", Some("")).name,
            "Go"
        );
    }

    #[test]
    fn test_undetermined() {
        let detector = LanguageDetector::new();
        let lang = detector.detect("lorem ipsum dolor sit amet", Some("notes"));
        assert!(lang.is_unknown());
        assert_eq!(lang.category, Category::Other);
    }

    #[test]
    fn test_shell_signatures_tie() {
        // Bash and Shell share signatures; without filename evidence nobody wins
        let detector = LanguageDetector::new();
        assert!(detector.detect("echo 'Hello World!'", None).is_unknown());
    }

    #[test]
    fn test_list_languages_in_table_order() {
        let detector = LanguageDetector::new();
        let names: Vec<_> = detector.list_languages().into_iter().map(|l| l.name).collect();
        let expected: Vec<_> = LANGUAGES.iter().map(|l| l.name.to_string()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_language_serializes_category_as_type() {
        let json = serde_json::to_value(Language::from(&LANGUAGES[0])).unwrap();
        assert_eq!(json["name"], "Bash");
        assert_eq!(json["type"], "programming");
    }
}
