//! Session Prompt
//!
//! Builds the interviewer system prompt and the dynamic variables injected
//! into the voice agent at session start.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::InterviewContext;
use crate::domain::value_objects::InterviewType;

/// Default character budget for the CV excerpt
pub const DEFAULT_CV_EXCERPT_CHARS: usize = 1500;

/// Interview-specific values substituted into the voice agent's prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DynamicVariables(BTreeMap<String, String>);

impl DynamicVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn template(interview_type: InterviewType) -> &'static str {
    match interview_type {
        InterviewType::Behavioral => {
            "You are a friendly but rigorous hiring manager at {company} interviewing \
             {candidate_name} for the {role} position. Ask behavioral questions one at a \
             time, probe for concrete situations, actions and results, and follow up when \
             answers stay vague."
        }
        InterviewType::Technical => {
            "You are a senior engineer at {company} running a technical interview with \
             {candidate_name} for the {role} position. Ask one technical question at a time, \
             start broad, then dig into trade-offs and depth based on the answers."
        }
        InterviewType::CaseStudy => {
            "You are a consultant at {company} giving {candidate_name} a case interview for \
             the {role} position. Present a business problem, let the candidate structure \
             it, and push back on assumptions and numbers."
        }
        InterviewType::Screening => {
            "You are a recruiter at {company} holding a short screening call with \
             {candidate_name} for the {role} position. Cover motivation, background and \
             logistics, and keep the conversation brisk."
        }
    }
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value.trim()
    }
}

fn placeholder_value<'a>(context: &'a InterviewContext, name: &str) -> Option<&'a str> {
    match name {
        "company" => Some(or_placeholder(&context.company, "the company")),
        "candidate_name" => Some(or_placeholder(&context.candidate_name, "the candidate")),
        "role" => Some(or_placeholder(&context.role, "open")),
        _ => None,
    }
}

/// Interview-type-specific system prompt with candidate details filled in
///
/// Placeholders are expanded in a single pass over the template; braces in
/// the substituted values are copied as-is.
pub fn system_prompt(context: &InterviewContext) -> String {
    let template = template(context.interview_type);
    let mut prompt = String::with_capacity(template.len() + 64);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        prompt.push_str(&rest[..open]);
        let tail = &rest[open..];
        let expanded = tail.find('}').and_then(|close| {
            placeholder_value(context, &tail[1..close]).map(|value| (close, value))
        });
        match expanded {
            Some((close, value)) => {
                prompt.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                prompt.push('{');
                rest = &tail[1..];
            }
        }
    }

    prompt.push_str(rest);
    prompt
}

/// Trim and cut CV text to at most `max_chars` characters
pub fn cv_excerpt(cv_text: &str, max_chars: usize) -> String {
    let trimmed = cv_text.trim();
    match trimmed.char_indices().nth(max_chars) {
        None => trimmed.to_string(),
        Some((cut, _)) => format!("{}…", trimmed[..cut].trim_end()),
    }
}

/// Variables for the voice agent; every key is always present
pub fn dynamic_variables(context: &InterviewContext, cv_excerpt_chars: usize) -> DynamicVariables {
    let mut vars = DynamicVariables::new();
    vars.insert("candidate_name", context.candidate_name.trim());
    vars.insert("role", context.role.trim());
    vars.insert("company", context.company.trim());
    vars.insert(
        "cv_excerpt",
        context
            .cv_text
            .as_deref()
            .map(|cv| cv_excerpt(cv, cv_excerpt_chars))
            .unwrap_or_default(),
    );
    vars.insert(
        "topics",
        context
            .topics
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
    );
    vars.insert("interview_type", context.interview_type.as_str());
    vars.insert("system_prompt", system_prompt(context));
    vars
}
