//! Changelog template engine
//!
//! A small mustache-subset engine with one unusual requirement: the same
//! template that renders new entries must also *recognize* old ones. A
//! parsed template therefore compiles two ways: [`Template::render`]
//! substitutes release data into the placeholders, and
//! [`Template::recognizer`] turns the template into a regular expression
//! whose literal spans are escaped text and whose placeholders become lazy
//! wildcard captures.
//!
//! Supported placeholders: `{{field}}` scalar substitution,
//! `{{#field}}...{{/field}}` truthy/loop section, and
//! `{{^field}}...{{/field}}` falsy section. For recognition, a whole
//! section collapses to a single opaque capture; per-item structure inside
//! a repeated block is not individually recovered.

use std::collections::HashSet;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crank_core::error::ChangelogError;

/// A parsed template
#[derive(Debug, Clone)]
pub struct Template {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone)]
enum Node {
    Text(String),
    Value(String),
    Section { name: String, children: Vec<Node> },
    Inverted { name: String, children: Vec<Node> },
}

/// An open section frame during parsing
struct Frame {
    name: String,
    inverted: bool,
    children: Vec<Node>,
}

impl Template {
    /// Parse template source into a node tree
    pub fn parse(source: &str) -> Result<Self, ChangelogError> {
        let mut root: Vec<Node> = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut rest = source;

        fn push(root: &mut Vec<Node>, stack: &mut [Frame], node: Node) {
            match stack.last_mut() {
                Some(frame) => frame.children.push(node),
                None => root.push(node),
            }
        }

        while let Some(start) = rest.find("{{") {
            let (text, after) = rest.split_at(start);
            if !text.is_empty() {
                push(&mut root, &mut stack, Node::Text(text.to_string()));
            }

            let after = &after[2..];
            let end = after.find("}}").ok_or(ChangelogError::UnclosedTag)?;
            let tag = after[..end].trim();
            rest = &after[end + 2..];

            match (tag.chars().next(), tag.get(1..).unwrap_or("")) {
                (Some('#'), name) => stack.push(Frame {
                    name: name.trim().to_string(),
                    inverted: false,
                    children: Vec::new(),
                }),
                (Some('^'), name) => stack.push(Frame {
                    name: name.trim().to_string(),
                    inverted: true,
                    children: Vec::new(),
                }),
                (Some('/'), name) => {
                    let name = name.trim();
                    let frame = stack
                        .pop()
                        .ok_or_else(|| ChangelogError::UnexpectedSectionEnd(name.to_string()))?;
                    if frame.name != name {
                        return Err(ChangelogError::UnexpectedSectionEnd(name.to_string()));
                    }
                    let node = if frame.inverted {
                        Node::Inverted {
                            name: frame.name,
                            children: frame.children,
                        }
                    } else {
                        Node::Section {
                            name: frame.name,
                            children: frame.children,
                        }
                    };
                    push(&mut root, &mut stack, node);
                }
                (Some(_), _) => push(&mut root, &mut stack, Node::Value(tag.to_string())),
                // an empty {{}} renders nothing
                (None, _) => {}
            }
        }
        if !rest.is_empty() {
            push(&mut root, &mut stack, Node::Text(rest.to_string()));
        }

        if let Some(frame) = stack.pop() {
            return Err(ChangelogError::UnclosedSection(frame.name));
        }

        Ok(Self { nodes: root })
    }

    /// Render the template against `data`
    pub fn render(&self, data: &Value) -> Result<String, ChangelogError> {
        let mut out = String::new();
        let mut context = vec![data];
        render_nodes(&self.nodes, &mut context, &mut out);
        debug!(output_len = out.len(), "template rendered");
        Ok(out)
    }

    /// Compile the template into a recognizer for previously rendered
    /// entries. Literal spans become escaped matches; each scalar
    /// placeholder becomes a lazy single-line capture, each section a lazy
    /// multi-line capture. Only the first occurrence of a name captures;
    /// repeats compile to anonymous wildcards.
    pub fn recognizer(&self) -> Result<Regex, ChangelogError> {
        let mut pattern = String::new();
        let mut seen = HashSet::new();

        for node in &self.nodes {
            match node {
                Node::Text(text) => pattern.push_str(&regex::escape(text)),
                Node::Value(name) => {
                    if seen.insert(name.clone()) {
                        pattern.push_str(&format!("(?P<{name}>.+?)"));
                    } else {
                        pattern.push_str("(?:.+?)");
                    }
                }
                Node::Section { name, .. } | Node::Inverted { name, .. } => {
                    if seen.insert(name.clone()) {
                        pattern.push_str(&format!("(?P<{name}>(?s:.*?))"));
                    } else {
                        pattern.push_str("(?s:.*?)");
                    }
                }
            }
        }

        debug!(pattern = %pattern, "recognizer compiled from template");
        Ok(Regex::new(&pattern)?)
    }
}

fn render_nodes<'a>(nodes: &[Node], context: &mut Vec<&'a Value>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Value(name) => {
                if let Some(value) = lookup(context, name) {
                    render_scalar(value, out);
                }
            }
            Node::Section { name, children } => match lookup(context, name) {
                Some(Value::Array(items)) => {
                    for item in items {
                        context.push(item);
                        render_nodes(children, context, out);
                        context.pop();
                    }
                }
                Some(value) if is_truthy(value) => {
                    context.push(value);
                    render_nodes(children, context, out);
                    context.pop();
                }
                _ => {}
            },
            Node::Inverted { name, children } => {
                let falsy = lookup(context, name).map_or(true, |value| !is_truthy(value));
                if falsy {
                    render_nodes(children, context, out);
                }
            }
        }
    }
}

/// Look a field up through the context stack, innermost binding first
fn lookup<'a>(context: &[&'a Value], name: &str) -> Option<&'a Value> {
    context.iter().rev().find_map(|value| value.get(name))
}

fn render_scalar(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => out.push_str(s),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        // null, arrays, and objects render as nothing
        _ => {}
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Number(_) | Value::Object(_) => true,
    }
}
