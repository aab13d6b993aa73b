//! Argument binding shared by the text and slash surfaces.

use crate::context::RawArgs;
use crate::failure::FailureRecord;
use crate::types::UserId;
use anyhow::anyhow;
use std::collections::BTreeMap;

/// Declared type of a command parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    User,
}

/// A declared command parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub description: String,
    pub kind: ParamKind,
    pub required: bool,
    /// Consume the remainder of a text invocation (last string parameter only).
    pub rest: bool,
}

impl ParamSpec {
    fn new(name: impl Into<String>, description: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: true,
            rest: false,
        }
    }

    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, ParamKind::String)
    }

    pub fn integer(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, ParamKind::Integer)
    }

    pub fn user(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, ParamKind::User)
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn rest(mut self) -> Self {
        self.rest = true;
        self
    }
}

/// A bound argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    String(String),
    Integer(i64),
    User(UserId),
}

/// Arguments after binding against a command's parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    values: BTreeMap<String, ArgValue>,
}

impl Arguments {
    pub fn str(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ArgValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(ArgValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn user(&self, name: &str) -> Option<UserId> {
        match self.values.get(name) {
            Some(ArgValue::User(u)) => Some(*u),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Bind raw arguments to `params`.
///
/// A required parameter with no value yields `MissingArgument(name)`; a value
/// that does not parse as the declared kind is `Unclassified`.
pub fn bind(params: &[ParamSpec], raw: &RawArgs) -> Result<Arguments, FailureRecord> {
    let raw_values = match raw {
        RawArgs::Text(text) => split_text(params, text),
        RawArgs::Named(named) => params
            .iter()
            .map(|p| named.get(&p.name).map(|v| v.trim().to_string()))
            .collect(),
    };

    let mut values = BTreeMap::new();
    for (param, raw_value) in params.iter().zip(raw_values) {
        match raw_value.filter(|v| !v.is_empty()) {
            Some(raw_value) => {
                let value = parse_value(param, &raw_value)?;
                values.insert(param.name.clone(), value);
            }
            None if param.required => {
                return Err(FailureRecord::MissingArgument(param.name.clone()));
            }
            None => {}
        }
    }

    Ok(Arguments { values })
}

fn split_text(params: &[ParamSpec], text: &str) -> Vec<Option<String>> {
    let mut remaining = text.trim();
    let mut out = Vec::with_capacity(params.len());

    for (idx, param) in params.iter().enumerate() {
        if remaining.is_empty() {
            out.push(None);
            continue;
        }
        let is_last = idx + 1 == params.len();
        if param.rest && is_last {
            out.push(Some(remaining.to_string()));
            remaining = "";
            continue;
        }
        let (token, tail) = match remaining.find(char::is_whitespace) {
            Some(end) => (&remaining[..end], remaining[end..].trim_start()),
            None => (remaining, ""),
        };
        out.push(Some(token.to_string()));
        remaining = tail;
    }

    out
}

fn parse_value(param: &ParamSpec, raw: &str) -> Result<ArgValue, FailureRecord> {
    match param.kind {
        ParamKind::String => Ok(ArgValue::String(raw.to_string())),
        ParamKind::Integer => raw.parse::<i64>().map(ArgValue::Integer).map_err(|_| {
            FailureRecord::Unclassified(anyhow!(
                "Converting to \"int\" failed for parameter \"{}\".",
                param.name
            ))
        }),
        ParamKind::User => parse_user(raw).map(ArgValue::User).ok_or_else(|| {
            FailureRecord::Unclassified(anyhow!("Member \"{}\" not found.", raw))
        }),
    }
}

/// Accepts `<@id>`, `<@!id>` or a bare id.
pub fn parse_user(raw: &str) -> Option<UserId> {
    let trimmed = raw
        .strip_prefix("<@")
        .and_then(|s| s.strip_suffix('>'))
        .map(|s| s.strip_prefix('!').unwrap_or(s))
        .unwrap_or(raw);
    trimmed.parse::<u64>().ok().map(UserId)
}
