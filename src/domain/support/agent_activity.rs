//! Agent review actions and draft corrections.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ActivityId, ConversationId, MessageId, Timestamp};

/// Lines of unified diff kept in a correction summary.
pub const DIFF_SUMMARY_LINES: usize = 10;

/// Summary stored when a correction changes nothing.
pub const NO_CHANGES: &str = "No changes";

/// What an agent did while reviewing a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentActionType {
    Approve,
    Edit,
    Reject,
    Escalate,
    Resolve,
}

impl fmt::Display for AgentActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgentActionType::Approve => "approve",
            AgentActionType::Edit => "edit",
            AgentActionType::Reject => "reject",
            AgentActionType::Escalate => "escalate",
            AgentActionType::Resolve => "resolve",
        };
        write!(f, "{}", s)
    }
}

/// A logged agent action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAction {
    pub id: ActivityId,
    pub conversation_id: ConversationId,
    pub message_id: Option<MessageId>,
    pub action: AgentActionType,
    pub payload: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

impl AgentAction {
    pub fn new(conversation_id: ConversationId, action: AgentActionType) -> Self {
        Self {
            id: ActivityId::new(),
            conversation_id,
            message_id: None,
            action,
            payload: None,
            created_at: Timestamp::now(),
        }
    }

    pub fn on_message(mut self, message_id: MessageId) -> Self {
        self.message_id = Some(message_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// An agent's rewrite of an automated draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub id: ActivityId,
    pub message_id: MessageId,
    pub conversation_id: ConversationId,
    pub original_content: String,
    pub corrected_content: String,
    pub diff_summary: String,
    pub reason: Option<String>,
    pub created_at: Timestamp,
}

impl Correction {
    pub fn new(
        message_id: MessageId,
        conversation_id: ConversationId,
        original_content: impl Into<String>,
        corrected_content: impl Into<String>,
        reason: Option<String>,
    ) -> Self {
        let original_content = original_content.into();
        let corrected_content = corrected_content.into();
        let diff_summary = diff_summary(&original_content, &corrected_content);
        Self {
            id: ActivityId::new(),
            message_id,
            conversation_id,
            original_content,
            corrected_content,
            diff_summary,
            reason,
            created_at: Timestamp::now(),
        }
    }
}

/// First lines of a line-based unified diff, or [`NO_CHANGES`].
pub fn diff_summary(original: &str, corrected: &str) -> String {
    let a: Vec<&str> = original.lines().collect();
    let b: Vec<&str> = corrected.lines().collect();
    let lines = unified_diff(&a, &b, 3);
    if lines.is_empty() {
        return NO_CHANGES.to_string();
    }
    lines
        .into_iter()
        .take(DIFF_SUMMARY_LINES)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Equal,
    Replace,
    Delete,
    Insert,
}

#[derive(Debug, Clone, Copy)]
struct Opcode {
    tag: Tag,
    i1: usize,
    i2: usize,
    j1: usize,
    j2: usize,
}

/// Edit script over lines from a longest-common-subsequence table.
fn opcodes(a: &[&str], b: &[&str]) -> Vec<Opcode> {
    let (n, m) = (a.len(), b.len());
    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if a[i] == b[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut codes = Vec::new();
    let (mut i, mut j) = (0, 0);
    let (mut del_start, mut ins_start) = (0, 0);

    let flush = |codes: &mut Vec<Opcode>, ds: usize, de: usize, is: usize, ie: usize| {
        let tag = match (de > ds, ie > is) {
            (true, true) => Tag::Replace,
            (true, false) => Tag::Delete,
            (false, true) => Tag::Insert,
            (false, false) => return,
        };
        codes.push(Opcode { tag, i1: ds, i2: de, j1: is, j2: ie });
    };

    while i < n || j < m {
        if i < n && j < m && a[i] == b[j] {
            flush(&mut codes, del_start, i, ins_start, j);
            let (si, sj) = (i, j);
            while i < n && j < m && a[i] == b[j] {
                i += 1;
                j += 1;
            }
            codes.push(Opcode { tag: Tag::Equal, i1: si, i2: i, j1: sj, j2: j });
            del_start = i;
            ins_start = j;
        } else if j >= m || (i < n && lcs[i + 1][j] >= lcs[i][j + 1]) {
            i += 1;
        } else {
            j += 1;
        }
    }
    flush(&mut codes, del_start, i, ins_start, j);
    codes
}

/// Splits opcodes into hunks with `context` lines around each change.
fn grouped(mut codes: Vec<Opcode>, context: usize) -> Vec<Vec<Opcode>> {
    if codes.is_empty() {
        codes.push(Opcode { tag: Tag::Equal, i1: 0, i2: 1, j1: 0, j2: 1 });
    }
    if let Some(first) = codes.first_mut().filter(|c| c.tag == Tag::Equal) {
        first.i1 = first.i1.max(first.i2.saturating_sub(context));
        first.j1 = first.j1.max(first.j2.saturating_sub(context));
    }
    if let Some(last) = codes.last_mut().filter(|c| c.tag == Tag::Equal) {
        last.i2 = last.i2.min(last.i1 + context);
        last.j2 = last.j2.min(last.j1 + context);
    }

    let mut groups = Vec::new();
    let mut group = Vec::new();
    for mut code in codes {
        if code.tag == Tag::Equal && code.i2 - code.i1 > context * 2 {
            group.push(Opcode {
                i2: code.i2.min(code.i1 + context),
                j2: code.j2.min(code.j1 + context),
                ..code
            });
            groups.push(std::mem::take(&mut group));
            code.i1 = code.i1.max(code.i2 - context);
            code.j1 = code.j1.max(code.j2 - context);
        }
        group.push(code);
    }
    if !(group.is_empty() || (group.len() == 1 && group[0].tag == Tag::Equal)) {
        groups.push(group);
    }
    groups.retain(|g| g.iter().any(|c| c.tag != Tag::Equal));
    groups
}

fn format_range(start: usize, stop: usize) -> String {
    let length = stop - start;
    match length {
        1 => format!("{}", start + 1),
        0 => format!("{},0", start),
        _ => format!("{},{}", start + 1, length),
    }
}

fn unified_diff(a: &[&str], b: &[&str], context: usize) -> Vec<String> {
    let mut out = Vec::new();
    for group in grouped(opcodes(a, b), context) {
        if out.is_empty() {
            out.push("--- original".to_string());
            out.push("+++ corrected".to_string());
        }
        let (first, last) = (group[0], group[group.len() - 1]);
        out.push(format!(
            "@@ -{} +{} @@",
            format_range(first.i1, last.i2),
            format_range(first.j1, last.j2)
        ));
        for code in group {
            if code.tag == Tag::Equal {
                out.extend(a[code.i1..code.i2].iter().map(|l| format!(" {}", l)));
                continue;
            }
            if matches!(code.tag, Tag::Replace | Tag::Delete) {
                out.extend(a[code.i1..code.i2].iter().map(|l| format!("-{}", l)));
            }
            if matches!(code.tag, Tag::Replace | Tag::Insert) {
                out.extend(b[code.j1..code.j2].iter().map(|l| format!("+{}", l)));
            }
        }
    }
    out
}
