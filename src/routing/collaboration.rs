//! Collaboration detection: does a request need more than one worker?
//!
//! A deterministic lexical procedure over a fixed English/Chinese
//! vocabulary. It gates the multi-agent execution path, so every verdict
//! can be explained from [`CollaborationAnalysis`].
//!
//! Decision order:
//!
//! 1. any exclusion term ("only", "just", "單獨", ...) → not collaborative;
//! 2. at least one connective and at least two distinct action verbs → collaborative;
//! 3. any strong connective ("and then", "然後", ...) → collaborative;
//! 4. three or more distinct action verbs → collaborative;
//! 5. otherwise not collaborative.

use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Sequencing and parallelism connectives. Longer phrases first so that
/// "and then" is matched as one term.
const CONNECTIVES: &[&str] = &[
    r"\band then\b", r"\band also\b", r"\bfollowed by\b", r"\bsimultaneously\b",
    r"\bthen\b", r"\bafter\b", r"\bnext\b", r"\balso\b", r"\band\b", r"\bboth\b",
    "然後", "接著", "之後", "並且", "同時", "還要", "也要", "一起", "再", "先",
];

const STRONG_CONNECTIVES: &[&str] = &[
    r"\band then\b", r"\band also\b", "然後", "接著", "並且", "同時",
];

/// Action verbs as `(canonical, pattern)`. English verbs also match their
/// inflected forms and count once per canonical verb.
const ACTION_VERBS: &[(&str, &str)] = &[
    ("search", r"\bsearch(?:es|ed|ing)?\b"),
    ("find", r"\b(?:find(?:s|ing)?|found)\b"),
    ("write", r"\b(?:writ(?:e|es|ing|ten)|wrote)\b"),
    ("create", r"\bcreat(?:e|es|ed|ing)\b"),
    ("build", r"\b(?:build(?:s|ing)?|built)\b"),
    ("make", r"\b(?:mak(?:e|es|ing)|made)\b"),
    ("analyze", r"\banaly[sz](?:e|es|ed|ing)\b"),
    ("download", r"\bdownload(?:s|ed|ing)?\b"),
    ("save", r"\bsav(?:e|es|ed|ing)\b"),
    ("send", r"\b(?:send(?:s|ing)?|sent)\b"),
    ("read", r"\bread(?:s|ing)?\b"),
    ("process", r"\bprocess(?:es|ed|ing)?\b"),
    ("搜尋", "搜尋"),
    ("查找", "查找"),
    ("寫", "寫"),
    ("創建", "創建"),
    ("建立", "建立"),
    ("製作", "製作"),
    ("分析", "分析"),
    ("下載", "下載"),
    ("保存", "保存"),
    ("發送", "發送"),
    ("讀取", "讀取"),
    ("處理", "處理"),
];

const EXCLUSIONS: &[&str] = &[
    r"\bonly\b", r"\bjust\b", r"\bsimply\b", r"\bsingle\b", r"\balone\b",
    "只", "僅", "單純", "單獨", "獨自",
];

fn alternation(terms: &[&str]) -> Regex {
    let pattern = format!("(?i){}", terms.join("|"));
    Regex::new(&pattern).unwrap_or_else(|e| panic!("invalid built-in vocabulary pattern: {}", e))
}

static CONNECTIVE_RE: Lazy<Regex> = Lazy::new(|| alternation(CONNECTIVES));
static STRONG_RE: Lazy<Regex> = Lazy::new(|| alternation(STRONG_CONNECTIVES));
static ACTION_RES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    ACTION_VERBS
        .iter()
        .map(|(verb, pattern)| (*verb, alternation(&[*pattern])))
        .collect()
});
static EXCLUSION_RE: Lazy<Regex> = Lazy::new(|| alternation(EXCLUSIONS));

/// Rough confidence bucket for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionConfidence {
    Low,
    Medium,
    High,
}

/// Which rule produced the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionRule {
    EmptyText,
    Exclusion,
    ConnectiveWithActions,
    StrongConnective,
    ManyActions,
    NoMatch,
}

/// Everything the detector found in one text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaborationAnalysis {
    pub is_collaborative: bool,
    pub rule: DetectionRule,
    /// Distinct connectives found, lowercased.
    pub connectives: Vec<String>,
    /// Distinct action verbs found, lowercased.
    pub action_verbs: Vec<String>,
    pub has_exclusion: bool,
    pub has_strong_connective: bool,
    pub confidence: DetectionConfidence,
}

impl fmt::Display for CollaborationAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "collaborative={} rule={:?} connectives={:?} actions={:?} exclusion={} confidence={:?}",
            self.is_collaborative,
            self.rule,
            self.connectives,
            self.action_verbs,
            self.has_exclusion,
            self.confidence
        )
    }
}

/// Stateless lexical collaboration detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollaborationDetector;

impl CollaborationDetector {
    pub fn new() -> Self {
        Self
    }

    /// Whether `text` should be decomposed into several sub-tasks.
    pub fn is_collaborative(&self, text: &str) -> bool {
        self.analyze(text).is_collaborative
    }

    /// Evaluate every rule and report what was found.
    pub fn analyze(&self, text: &str) -> CollaborationAnalysis {
        if text.trim().is_empty() {
            return CollaborationAnalysis {
                is_collaborative: false,
                rule: DetectionRule::EmptyText,
                connectives: Vec::new(),
                action_verbs: Vec::new(),
                has_exclusion: false,
                has_strong_connective: false,
                confidence: DetectionConfidence::Low,
            };
        }

        let connectives = distinct_matches(&CONNECTIVE_RE, text);
        let action_verbs = matched_verbs(text);
        let has_exclusion = EXCLUSION_RE.is_match(text);
        let has_strong_connective = STRONG_RE.is_match(text);

        let rule = if has_exclusion {
            DetectionRule::Exclusion
        } else if !connectives.is_empty() && action_verbs.len() >= 2 {
            DetectionRule::ConnectiveWithActions
        } else if has_strong_connective {
            DetectionRule::StrongConnective
        } else if action_verbs.len() >= 3 {
            DetectionRule::ManyActions
        } else {
            DetectionRule::NoMatch
        };
        let is_collaborative = matches!(
            rule,
            DetectionRule::ConnectiveWithActions
                | DetectionRule::StrongConnective
                | DetectionRule::ManyActions
        );

        let confidence = if connectives.len() >= 2 || action_verbs.len() >= 3 {
            DetectionConfidence::High
        } else if !connectives.is_empty() || action_verbs.len() >= 2 {
            DetectionConfidence::Medium
        } else {
            DetectionConfidence::Low
        };

        CollaborationAnalysis {
            is_collaborative,
            rule,
            connectives,
            action_verbs,
            has_exclusion,
            has_strong_connective,
            confidence,
        }
    }
}

fn distinct_matches(re: &Regex, text: &str) -> Vec<String> {
    re.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn matched_verbs(text: &str) -> Vec<String> {
    ACTION_RES
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(verb, _)| verb.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_reference_cases() {
        let detector = CollaborationDetector::new();
        let cases = [
            ("Search for Python tutorials and then write a script", true),
            ("Find the latest news and save it to a file", true),
            ("搜尋資料然後分析結果", true),
            ("先下載文件，接著處理數據", true),
            ("Search for tutorials and also download examples", true),
            ("Find and analyze data", true),
            ("Search, download, and process", true),
            ("Searches for tutorials and saves them", true),
            ("Searching, downloading and processing the logs", true),
            ("Downloaded the report and analyzed it", true),
            ("Wrote the notes and then sent them", true),
            ("Hello, how are you?", false),
            ("Just say hello", false),
            ("Only search for information", false),
            ("僅僅問候一下", false),
            ("Search for information", false),
            ("Write a simple script", false),
            ("", false),
        ];
        for (text, expected) in cases {
            assert_eq!(detector.is_collaborative(text), expected, "{:?}", text);
        }
    }

    #[test]
    fn test_exclusion_overrides_everything() {
        let detector = CollaborationDetector::new();
        for text in [
            "Just search the web and then write a script and save it",
            "Only find, download, analyze and process the files, then send them",
            "單獨搜尋然後分析",
            "Do it alone: search, build, save",
        ] {
            let analysis = detector.analyze(text);
            assert!(!analysis.is_collaborative, "{}", text);
            assert_eq!(analysis.rule, DetectionRule::Exclusion);
        }
    }

    #[test]
    fn test_strong_connective_alone() {
        let analysis = CollaborationDetector::new().analyze("Say hi and then say bye");
        assert!(analysis.is_collaborative);
        assert_eq!(analysis.rule, DetectionRule::StrongConnective);
        assert!(analysis.action_verbs.is_empty());
    }

    #[test]
    fn test_many_actions_without_connective() {
        let analysis = CollaborationDetector::new().analyze("search, download, process");
        assert!(analysis.connectives.is_empty());
        assert_eq!(analysis.rule, DetectionRule::ManyActions);
        assert_eq!(analysis.confidence, DetectionConfidence::High);
    }

    #[test]
    fn test_distinct_counting() {
        // "write" twice is one verb; "and" alone is not strong.
        let analysis = CollaborationDetector::new().analyze("write and write");
        assert_eq!(analysis.action_verbs, vec!["write".to_string()]);
        assert!(!analysis.is_collaborative);
        assert_eq!(analysis.confidence, DetectionConfidence::Medium);
    }

    #[test]
    fn test_word_boundaries() {
        // "research" contains "search", "android" contains "and".
        let analysis = CollaborationDetector::new().analyze("research android thenceforth");
        assert!(analysis.action_verbs.is_empty());
        assert!(analysis.connectives.is_empty());

        // "ready" and "already" are not forms of "read".
        let analysis = CollaborationDetector::new().analyze("already ready");
        assert!(analysis.action_verbs.is_empty());
    }

    #[test]
    fn test_inflections_count_once() {
        let analysis = CollaborationDetector::new().analyze("writes, writing and wrote");
        assert_eq!(analysis.action_verbs, vec!["write".to_string()]);
        assert!(!analysis.is_collaborative);

        let analysis = CollaborationDetector::new().analyze("Searches for tutorials and saves them");
        assert_eq!(
            analysis.action_verbs,
            vec!["save".to_string(), "search".to_string()]
        );
        assert_eq!(analysis.rule, DetectionRule::ConnectiveWithActions);
    }

    #[test]
    fn test_deterministic_and_fast() {
        let detector = CollaborationDetector::new();
        let texts = [
            "Search for Python tutorials and then write a script",
            "Find the latest news and save it to a file",
            "Hello, how are you?",
            "Just search for information",
            "搜尋資料然後分析結果",
        ];
        // Warm up the lazily compiled patterns.
        let expected: Vec<bool> = texts.iter().map(|t| detector.is_collaborative(t)).collect();

        let rounds = 200;
        let start = Instant::now();
        for _ in 0..rounds {
            for (text, want) in texts.iter().zip(&expected) {
                assert_eq!(detector.is_collaborative(text), *want);
            }
        }
        let per_call = start.elapsed() / (rounds * texts.len() as u32);
        assert!(per_call.as_micros() < 1000, "{:?} per call", per_call);
    }
}
