//! Ordered substitution rules applied to agent definition sources
//!
//! Rules run in a fixed order and every rule sees the output of the ones
//! before it. A rule that matches nothing leaves the text as it was.

use crate::error::{RefactorError, Result};
use regex::{Captures, NoExpand, Regex};
use tracing::{debug, warn};

/// Replacement literal written into every `model` field
pub const DEFAULT_MODEL_REPLACEMENT: &str = "'deepseek-coder'";

/// Single or double quoted string literal on one line
const QUOTED: &str = r#"(?:'[^'\n]*'|"[^"\n]*")"#;

/// A single named substitution over the whole text
#[derive(Debug)]
pub struct SubstitutionRule {
    /// Short rule name used in logs and errors
    pub name: &'static str,
    kind: RuleKind,
}

#[derive(Debug)]
enum RuleKind {
    /// Replace every regex match with fixed text
    Replace { regex: Regex, replacement: String },
    /// Delete every regex match, keeping the `lead` group when it took part
    Remove { regex: Regex },
    /// Remove `<head> ... },` where the object body is matched by brace depth
    RemoveBlock { head: Regex },
}

/// Pattern removing `body` and the blanks after it.
///
/// When `body` is the only thing on its line the whole line goes, indentation
/// and line break included. Otherwise only `body` and its trailing blanks are
/// removed.
fn removal(body: &str) -> String {
    format!(r"(?m)^[ \t]*{body}[ \t]*(?:\r?\n|\z)|{body}[ \t]*")
}

fn compile(name: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| RefactorError::pattern(name, e))
}

impl SubstitutionRule {
    fn replace(name: &'static str, pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        Ok(Self {
            name,
            kind: RuleKind::Replace {
                regex: compile(name, pattern)?,
                replacement: replacement.into(),
            },
        })
    }

    fn remove(name: &'static str, pattern: &str) -> Result<Self> {
        Ok(Self {
            name,
            kind: RuleKind::Remove {
                regex: compile(name, pattern)?,
            },
        })
    }

    fn remove_block(name: &'static str, head: &str) -> Result<Self> {
        Ok(Self {
            name,
            kind: RuleKind::RemoveBlock {
                head: compile(name, head)?,
            },
        })
    }

    /// Apply the rule to `text`, returning the new text and the match count
    pub fn apply(&self, text: &str) -> (String, usize) {
        match &self.kind {
            RuleKind::Replace { regex, replacement } => {
                let count = regex.find_iter(text).count();
                if count == 0 {
                    return (text.to_string(), 0);
                }
                let replaced = regex.replace_all(text, NoExpand(replacement.as_str()));
                (replaced.into_owned(), count)
            }
            RuleKind::Remove { regex } => {
                let count = regex.find_iter(text).count();
                if count == 0 {
                    return (text.to_string(), 0);
                }
                let replaced = regex.replace_all(text, |caps: &Captures| {
                    caps.name("lead").map_or_else(String::new, |lead| lead.as_str().to_string())
                });
                (replaced.into_owned(), count)
            }
            RuleKind::RemoveBlock { head } => self.remove_blocks(head, text),
        }
    }

    fn remove_blocks(&self, head: &Regex, text: &str) -> (String, usize) {
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        let mut search_from = 0;
        let mut removed = 0;

        while let Some(caps) = head.captures_at(text, search_from) {
            let Some(m) = caps.get(0) else { break };
            match block_end(text, m.end()) {
                Some(BlockEnd { end, line_end }) => {
                    // Indentation only goes with the block when nothing follows it on the line.
                    let start = match caps.name("indent") {
                        Some(indent) if !line_end => indent.end(),
                        _ => m.start(),
                    };
                    out.push_str(&text[cursor..start]);
                    cursor = end;
                    search_from = end;
                    removed += 1;
                }
                None => {
                    warn!(
                        rule = self.name,
                        offset = m.start(),
                        "Object is unterminated or not followed by a comma, leaving it in place"
                    );
                    search_from = m.end();
                }
            }
        }

        out.push_str(&text[cursor..]);
        (out, removed)
    }
}

/// Where a removed object field ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlockEnd {
    /// Offset just past the comma, trailing blanks and line break
    end: usize,
    /// Whether the field ran to the end of its line
    line_end: bool,
}

/// Find the end of an object body that starts right after its opening brace.
///
/// The closing brace must be followed by a comma. String literals, line
/// comments and block comments are skipped while counting braces.
fn block_end(text: &str, body_start: usize) -> Option<BlockEnd> {
    let bytes = text.as_bytes();
    let mut depth = 1usize;
    let mut quote: Option<u8> = None;
    let mut i = body_start;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' {
                    i += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'\'' | b'"' | b'`' => quote = Some(b),
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    while i < bytes.len() && bytes[i] != b'\n' {
                        i += 1;
                    }
                    continue;
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    let close = text[i + 2..].find("*/")?;
                    i += 2 + close + 2;
                    continue;
                }
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return trailing_comma(bytes, i + 1);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }

    None
}

fn trailing_comma(bytes: &[u8], mut i: usize) -> Option<BlockEnd> {
    let skip_blanks = |mut i: usize| {
        while matches!(bytes.get(i), Some(b' ' | b'\t')) {
            i += 1;
        }
        i
    };

    i = skip_blanks(i);
    if bytes.get(i) != Some(&b',') {
        return None;
    }
    i = skip_blanks(i + 1);

    let (end, line_end) = match (bytes.get(i), bytes.get(i + 1)) {
        (Some(b'\r'), Some(b'\n')) => (i + 2, true),
        (Some(b'\n'), _) => (i + 1, true),
        (None, _) => (i, true),
        _ => (i, false),
    };
    Some(BlockEnd { end, line_end })
}

/// Outcome of running the rule set over one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    /// Text after every rule has run
    pub text: String,
    /// Match count per rule, in rule order
    pub matches: Vec<(&'static str, usize)>,
    /// Whether the text differs from the input
    pub changed: bool,
}

impl Transformed {
    /// Total number of matches across all rules
    pub fn total_matches(&self) -> usize {
        self.matches.iter().map(|(_, count)| count).sum()
    }
}

/// The fixed, ordered list of rules
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<SubstitutionRule>,
}

impl RuleSet {
    /// Compile the rules, writing `model_replacement` into every `model` field
    pub fn new(model_replacement: &str) -> Result<Self> {
        let rules = vec![
            SubstitutionRule::remove(
                "publisher-import",
                &removal(&format!(r"import\s+\{{\s*publisher\s*\}}\s+from\s+{QUOTED};?")),
            )?,
            // A bare token opens a line or follows `{` or `,`; the opener is kept.
            SubstitutionRule::remove(
                "publisher-shorthand",
                r"(?m)^[ \t]*publisher,[ \t]*(?:\r?\n|\z)|(?P<lead>(?:^|[{,])[ \t]*)publisher,[ \t]*",
            )?,
            SubstitutionRule::remove("publisher-self-assign", &removal(r"\bpublisher:\s*publisher,"))?,
            SubstitutionRule::remove(
                "publisher-literal",
                &removal(&format!(r"\bpublisher:\s*{QUOTED},")),
            )?,
            SubstitutionRule::replace(
                "model-literal",
                &format!(r"\bmodel:\s*{QUOTED}"),
                format!("model: {model_replacement}"),
            )?,
            SubstitutionRule::remove_block(
                "reasoning-options",
                r"(?m)(?P<indent>^[ \t]*)?\breasoningOptions:\s*\{",
            )?,
        ];

        Ok(Self { rules })
    }

    /// Rule names in application order
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name).collect()
    }

    /// Run every rule over `content` in order
    pub fn apply(&self, content: &str) -> Transformed {
        let mut text = content.to_string();
        let mut matches = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let (next, count) = rule.apply(&text);
            if count > 0 {
                debug!("Rule {} matched {} time(s)", rule.name, count);
            }
            matches.push((rule.name, count));
            text = next;
        }

        let changed = text != content;
        Transformed {
            text,
            matches,
            changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RuleSet {
        RuleSet::new(DEFAULT_MODEL_REPLACEMENT).unwrap()
    }

    const EDITOR_AGENT: &str = r#"import { publisher } from '../constants'
import { buildArray } from '@codebuff/common/util/array'

import type { SecretAgentDefinition } from '../types/secret-agent-definition'

const definition: SecretAgentDefinition = {
  id: 'editor',
  publisher,
  model: 'anthropic/claude-sonnet-4.5',
  displayName: 'Code Editor',
  reasoningOptions: {
    enabled: true,
    effort: 'high',
    exclude: false,
  },
  toolNames: ['write_file', 'str_replace'],
}

export default definition
"#;

    const EDITOR_AGENT_REFACTORED: &str = r#"import { buildArray } from '@codebuff/common/util/array'

import type { SecretAgentDefinition } from '../types/secret-agent-definition'

const definition: SecretAgentDefinition = {
  id: 'editor',
  model: 'deepseek-coder',
  displayName: 'Code Editor',
  toolNames: ['write_file', 'str_replace'],
}

export default definition
"#;

    #[test]
    fn test_rule_order() {
        assert_eq!(
            rules().names(),
            vec![
                "publisher-import",
                "publisher-shorthand",
                "publisher-self-assign",
                "publisher-literal",
                "model-literal",
                "reasoning-options",
            ]
        );
    }

    #[test]
    fn test_full_agent_definition() {
        let out = rules().apply(EDITOR_AGENT);
        assert_eq!(out.text, EDITOR_AGENT_REFACTORED);
        assert!(out.changed);
        assert_eq!(out.total_matches(), 4);
    }

    #[test]
    fn test_second_pass_changes_nothing() {
        let rules = rules();
        let first = rules.apply(EDITOR_AGENT);
        let second = rules.apply(&first.text);
        assert_eq!(second.text, first.text);
        assert!(!second.changed);
    }

    #[test]
    fn test_import_removed_for_any_module_path() {
        let rules = rules();
        for line in [
            "import { publisher } from '../constants'\n",
            "import {publisher} from \"@codebuff/common/constants\";\n",
            "import {  publisher  }  from '../../agents/constants'",
        ] {
            let input = format!("{line}const a = 1\n");
            assert_eq!(rules.apply(&input).text, "const a = 1\n", "input: {line:?}");
        }
    }

    #[test]
    fn test_publisher_dropped_from_shared_import() {
        let input = "import { publisher, PLACEHOLDER } from '../constants'\n";
        assert_eq!(
            rules().apply(input).text,
            "import { PLACEHOLDER } from '../constants'\n"
        );
    }

    #[test]
    fn test_shorthand_publisher_removed() {
        let input = "const def = {\n  id: 'thinker',\n  publisher,\n  spawnerPrompt: 'Thinks',\n}\n";
        assert_eq!(
            rules().apply(input).text,
            "const def = {\n  id: 'thinker',\n  spawnerPrompt: 'Thinks',\n}\n"
        );
    }

    #[test]
    fn test_inline_shorthand_publisher_removed() {
        let input = "export default { id: 'x', publisher, model: 'y' }\n";
        assert_eq!(
            rules().apply(input).text,
            "export default { id: 'x', model: 'deepseek-coder' }\n"
        );
    }

    #[test]
    fn test_shorthand_with_trailing_code_keeps_indentation() {
        let rules = rules();
        assert_eq!(rules.apply("  publisher, // owner\n").text, "  // owner\n");
        assert_eq!(
            rules.apply("  publisher, model: 'x',\n").text,
            "  model: 'deepseek-coder',\n"
        );
    }

    #[test]
    fn test_publisher_literal_with_trailing_field_keeps_indentation() {
        let input = "  publisher: 'codebuff', id: 'y',\n";
        assert_eq!(rules().apply(input).text, "  id: 'y',\n");
    }

    #[test]
    fn test_self_assignment_removed_whole() {
        let input = "{\n  publisher: publisher,\n  id: 'x',\n}\n";
        assert_eq!(rules().apply(input).text, "{\n  id: 'x',\n}\n");
    }

    #[test]
    fn test_publisher_literal_removed() {
        let input = "{\n  publisher: \"codebuff\",\n  id: 'x',\n}\n";
        assert_eq!(rules().apply(input).text, "{\n  id: 'x',\n}\n");
    }

    #[test]
    fn test_model_value_replaced_regardless_of_value() {
        let rules = rules();
        for value in ["\"gpt-4\"", "'openai/gpt-5'", "''", "'x-ai/grok-4-fast'"] {
            let input = format!("  model: {value},\n");
            assert_eq!(
                rules.apply(&input).text,
                "  model: 'deepseek-coder',\n",
                "value: {value}"
            );
        }
    }

    #[test]
    fn test_model_end_to_end_is_stable() {
        let rules = rules();
        let once = rules.apply("model: \"gpt-4\",");
        assert_eq!(once.text, "model: 'deepseek-coder',");
        let twice = rules.apply(&once.text);
        assert_eq!(twice.text, "model: 'deepseek-coder',");
        assert!(!twice.changed);
    }

    #[test]
    fn test_model_replacement_is_literal() {
        let rules = RuleSet::new("'$1-model'").unwrap();
        assert_eq!(rules.apply("model: 'a',").text, "model: '$1-model',");
    }

    #[test]
    fn test_other_fields_named_like_model_untouched() {
        let input = "  submodel: 'gpt-4',\n  modelName: 'x',\n";
        assert_eq!(rules().apply(input).text, input);
    }

    #[test]
    fn test_single_line_reasoning_options_removed() {
        let input = "{\n  reasoningOptions: { effort: 'low' },\n  id: 'x',\n}\n";
        assert_eq!(rules().apply(input).text, "{\n  id: 'x',\n}\n");
    }

    #[test]
    fn test_nested_reasoning_options_removed_whole() {
        let input = "{\n  reasoningOptions: {\n    effort: 'high',\n    budget: { tokens: 2048 },\n  },\n  toolNames: [],\n}\n";
        assert_eq!(rules().apply(input).text, "{\n  toolNames: [],\n}\n");
    }

    #[test]
    fn test_braces_in_strings_and_comments_ignored() {
        let input = "{\n  reasoningOptions: {\n    // don't count } here\n    label: '}{',\n  },\n  id: 'x',\n}\n";
        assert_eq!(rules().apply(input).text, "{\n  id: 'x',\n}\n");
    }

    #[test]
    fn test_block_comments_in_reasoning_options_skipped() {
        let input = "{\n  reasoningOptions: {\n    /* don't } count */\n    effort: 'high',\n  },\n  id: 'x',\n}\n";
        assert_eq!(rules().apply(input).text, "{\n  id: 'x',\n}\n");
    }

    #[test]
    fn test_inline_reasoning_options_keeps_indentation() {
        let input = "  reasoningOptions: { effort: 'low' }, id: 'x',\n";
        assert_eq!(rules().apply(input).text, "  id: 'x',\n");
    }

    #[test]
    fn test_reasoning_options_without_comma_left_in_place() {
        let input = "const a = {\n  reasoningOptions: { effort: 'high' }\n}\nconst b = {\n  inner: {},\n}\n";
        let out = rules().apply(input);
        assert_eq!(out.text, input);
        assert!(!out.changed);
    }

    #[test]
    fn test_crlf_line_endings() {
        let input = "{\r\n  publisher,\r\n  reasoningOptions: {\r\n    effort: 'high',\r\n  },\r\n  id: 'x',\r\n}\r\n";
        assert_eq!(rules().apply(input).text, "{\r\n  id: 'x',\r\n}\r\n");
    }

    #[test]
    fn test_no_matches_is_noop() {
        let input = "export const noop = () => {}\n";
        let out = rules().apply(input);
        assert_eq!(out.text, input);
        assert_eq!(out.total_matches(), 0);
        assert!(!out.changed);
    }
}
