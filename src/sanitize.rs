// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Sanitization of untrusted text fields.
//!
//! Two sanitizers cover the write paths:
//!
//! - [`sanitize_plain_text`] for single-line fields (names, titles,
//!   descriptions without formatting): dangerous elements go with their
//!   bodies, executable URI schemes and inline handlers are neutralized,
//!   then all remaining markup is stripped.
//! - [`sanitize_rich_text`] for formatted fields (resource descriptions,
//!   announcement bodies): a fixed allow-list of structural tags survives
//!   with a fixed allow-list of attributes; everything else is unwrapped,
//!   dangerous elements are removed with their bodies.
//!
//! Both run their pipeline to a fixpoint, which makes them idempotent and
//! closes splicing tricks (`javajavascript:script:` and friends).
//!
//! [`sanitize_json_strings`] walks an arbitrary JSON value and applies a
//! leaf transformer to string leaves only, for free-form payloads such as
//! profile fields.

use serde_json::Value;

/// Elements removed together with their bodies.
const DANGEROUS_TAGS: &[&str] = &["script", "iframe", "object", "embed"];

/// URI schemes that must never survive sanitization (lowercase).
const FORBIDDEN_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Elements the rich-text sanitizer keeps.
const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "strong", "em", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "a", "img",
    "table", "thead", "tbody", "tr", "th", "td", "code", "pre",
];

/// Elements emitted self-closing.
const VOID_TAGS: &[&str] = &["br", "img"];

/// Sanitize a plain-text field.
///
/// The output never contains executable markup: no `<script`, no
/// `javascript:`-style schemes, no inline `on*=` handlers, and no tags.
/// Idempotent: sanitizing twice equals sanitizing once.
pub fn sanitize_plain_text(input: &str) -> String {
    run_to_fixpoint(input, plain_text_pass)
}

/// Sanitize a rich-text (HTML) field against the tag allow-list.
///
/// Idempotent: sanitizing twice equals sanitizing once.
pub fn sanitize_rich_text(input: &str) -> String {
    run_to_fixpoint(input, rich_text_pass)
}

/// Walk a JSON value and apply `transform` to every string leaf.
///
/// Objects and arrays are recursed; numbers, booleans, and nulls pass
/// through unchanged.
pub fn sanitize_json_strings<F>(value: Value, transform: &F) -> Value
where
    F: Fn(&str) -> String,
{
    match value {
        Value::String(s) => Value::String(transform(&s)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| sanitize_json_strings(item, transform))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, item)| (key, sanitize_json_strings(item, transform)))
                .collect(),
        ),
        other => other,
    }
}

fn run_to_fixpoint(input: &str, pass: fn(&str) -> String) -> String {
    let mut current = input.to_string();
    loop {
        let next = pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn plain_text_pass(input: &str) -> String {
    let without_dangerous = strip_dangerous_elements(input);
    let without_schemes = neutralize_schemes(&without_dangerous);
    let without_handlers = strip_event_handlers(&without_schemes);
    strip_tags(&without_handlers)
}

fn rich_text_pass(input: &str) -> String {
    rebuild_allowed_markup(&strip_dangerous_elements(input))
}

/// Remove dangerous elements together with their bodies.
///
/// An unterminated dangerous element swallows the rest of the input; better
/// to lose a tail than to leak half a script.
fn strip_dangerous_elements(input: &str) -> String {
    let lower = input.to_ascii_lowercase();
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;

    while pos < input.len() {
        let Some(rel) = lower[pos..].find('<') else {
            out.push_str(&input[pos..]);
            break;
        };
        let lt = pos + rel;
        out.push_str(&input[pos..lt]);

        let closing = lower[lt + 1..].starts_with('/');
        let name_start = if closing { lt + 2 } else { lt + 1 };
        let name: String = lower
            .get(name_start..)
            .unwrap_or("")
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();

        if !DANGEROUS_TAGS.contains(&name.as_str()) {
            out.push('<');
            pos = lt + 1;
            continue;
        }

        let Some(gt_rel) = lower[lt..].find('>') else {
            return out;
        };
        let tag_end = lt + gt_rel;

        if closing || lower[lt..tag_end].ends_with('/') {
            pos = tag_end + 1;
            continue;
        }

        let close_pattern = format!("</{name}");
        match lower[tag_end + 1..].find(&close_pattern) {
            Some(close_rel) => {
                let close_start = tag_end + 1 + close_rel;
                pos = match lower[close_start..].find('>') {
                    Some(r) => close_start + r + 1,
                    None => return out,
                };
            }
            None => return out,
        }
    }

    out
}

fn neutralize_schemes(input: &str) -> String {
    let mut out = input.to_string();
    for scheme in FORBIDDEN_SCHEMES {
        out = remove_ascii_case_insensitive(&out, scheme);
    }
    out
}

/// Remove every occurrence of `needle` (lowercase ASCII), ignoring case.
fn remove_ascii_case_insensitive(input: &str, needle: &str) -> String {
    let lower = input.to_ascii_lowercase();
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;

    while let Some(rel) = lower[pos..].find(needle) {
        let at = pos + rel;
        out.push_str(&input[pos..at]);
        pos = at + needle.len();
    }
    out.push_str(&input[pos..]);
    out
}

/// Remove inline event-handler attributes (`onclick="..."`, `onerror=x`).
fn strip_event_handlers(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut kept_from = 0;
    let mut i = 0;

    while i + 2 < bytes.len() {
        let at_boundary = i == 0 || !bytes[i - 1].is_ascii_alphanumeric();
        let starts_on =
            bytes[i].eq_ignore_ascii_case(&b'o') && bytes[i + 1].eq_ignore_ascii_case(&b'n');
        if !(at_boundary && starts_on) {
            i += 1;
            continue;
        }

        // Attribute name: "on" plus at least one letter.
        let mut j = i + 2;
        while j < bytes.len() && bytes[j].is_ascii_alphabetic() {
            j += 1;
        }
        if j == i + 2 {
            i += 1;
            continue;
        }

        // Optional whitespace, then '='.
        let mut k = j;
        while k < bytes.len() && bytes[k].is_ascii_whitespace() {
            k += 1;
        }
        if k >= bytes.len() || bytes[k] != b'=' {
            i = j;
            continue;
        }
        k += 1;
        while k < bytes.len() && bytes[k].is_ascii_whitespace() {
            k += 1;
        }

        // Quoted or bare attribute value.
        if k < bytes.len() && (bytes[k] == b'"' || bytes[k] == b'\'') {
            let quote = bytes[k];
            k += 1;
            while k < bytes.len() && bytes[k] != quote {
                k += 1;
            }
            if k < bytes.len() {
                k += 1;
            }
        } else {
            while k < bytes.len() && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                k += 1;
            }
        }

        out.push_str(&input[kept_from..i]);
        kept_from = k;
        i = k;
    }

    out.push_str(&input[kept_from..]);
    out
}

/// Remove all remaining markup. A dangling `<` drops the tail.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        match rest[lt..].find('>') {
            Some(gt) => rest = &rest[lt + gt + 1..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Re-emit only allow-listed tags with allow-listed attributes.
///
/// Non-listed tags are unwrapped: the tag goes, its body stays.
fn rebuild_allowed_markup(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        let tag_rest = &rest[lt..];
        let Some(gt) = tag_rest.find('>') else {
            return out;
        };
        let raw_tag = &tag_rest[1..gt];
        rest = &tag_rest[gt + 1..];

        let trimmed = raw_tag.trim();
        let (closing, body) = match trimmed.strip_prefix('/') {
            Some(after_slash) => (true, after_slash),
            None => (false, trimmed),
        };
        let name: String = body
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        if !ALLOWED_TAGS.contains(&name.as_str()) {
            continue;
        }

        if closing {
            out.push_str("</");
            out.push_str(&name);
            out.push('>');
            continue;
        }

        let self_closing = body.ends_with('/') || VOID_TAGS.contains(&name.as_str());

        out.push('<');
        out.push_str(&name);
        for (attr_name, value) in parse_attributes(&body[name.len()..]) {
            if let Some(kept) = keep_attribute(&name, &attr_name, &value) {
                out.push(' ');
                out.push_str(&attr_name);
                out.push_str("=\"");
                out.push_str(&kept);
                out.push('"');
            }
        }
        if self_closing {
            out.push_str(" />");
        } else {
            out.push('>');
        }
    }

    out.push_str(rest);
    out
}

/// Parse `name="value"` pairs from the text between a tag name and `>`.
fn parse_attributes(input: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        while i < bytes.len() && !bytes[i].is_ascii_alphabetic() {
            i += 1;
        }
        let name_start = i;
        while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
            i += 1;
        }
        if i == name_start {
            break;
        }
        let name = input[name_start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'=' {
            attrs.push((name, String::new()));
            continue;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let value = if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
            let quote = bytes[i];
            i += 1;
            let value_start = i;
            while i < bytes.len() && bytes[i] != quote {
                i += 1;
            }
            let value = &input[value_start..i];
            if i < bytes.len() {
                i += 1;
            }
            value
        } else {
            let value_start = i;
            while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            &input[value_start..i]
        };
        attrs.push((name, value.to_string()));
    }

    attrs
}

/// Decide whether an attribute survives on an allow-listed tag.
fn keep_attribute(tag: &str, attr: &str, value: &str) -> Option<String> {
    let keep = matches!(
        (tag, attr),
        ("a", "href") | ("a", "target") | ("img", "src") | ("img", "alt")
    );
    if !keep {
        return None;
    }
    if (attr == "href" || attr == "src") && !scheme_allowed(value) {
        return None;
    }
    Some(value.replace('"', "&quot;"))
}

/// Reject URLs whose scheme is executable, tolerating embedded whitespace
/// and control characters in the scheme part.
fn scheme_allowed(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_lowercase();
    !FORBIDDEN_SCHEMES
        .iter()
        .any(|scheme| compact.starts_with(scheme))
}
