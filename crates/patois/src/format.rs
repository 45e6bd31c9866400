//! Argument values and the two pattern-substitution conventions.
//!
//! Both formatters are pure: they never mutate their inputs and carry no
//! state between calls. Anything they cannot substitute is left as literal
//! text rather than reported as an error.

use std::fmt;

/// A formatting argument value.
///
/// `Null` is the explicit absent-value sentinel; it renders as the literal
/// text `null`.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    Null,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Null => f.write_str("null"),
            Arg::Str(s) => f.write_str(s),
            Arg::Int(i) => write!(f, "{i}"),
            Arg::Float(v) => write!(f, "{v}"),
            Arg::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<i64> for Arg {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Arg {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<usize> for Arg {
    fn from(v: usize) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for Arg {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Arg::Null,
        }
    }
}

/// Substitute `{i}` tokens with the i-th argument's display form (0-indexed).
///
/// Indices beyond the supplied argument count, non-numeric placeholder
/// bodies, and unclosed placeholders all stay as literal text. `{{` and `}}`
/// escape to literal braces.
pub fn format_braces(pattern: &str, args: &[Arg]) -> String {
    if !pattern.contains('{') && !pattern.contains('}') {
        return pattern.to_string();
    }

    let mut out = String::with_capacity(pattern.len() + 8);
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        // Escaped braces: `{{` -> `{`, `}}` -> `}`.
        if c == '}' {
            if chars.peek() == Some(&'}') {
                chars.next();
            }
            out.push('}');
            continue;
        }
        if c != '{' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'{') {
            chars.next();
            out.push('{');
            continue;
        }

        // Read the placeholder body up to `}`.
        let mut body = String::new();
        let mut closed = false;
        for n in chars.by_ref() {
            if n == '}' {
                closed = true;
                break;
            }
            body.push(n);
        }

        // No closing brace: the rest is literal text.
        if !closed {
            out.push('{');
            out.push_str(&body);
            break;
        }

        match body.trim().parse::<usize>() {
            Ok(index) if index < args.len() => out.push_str(&args[index].to_string()),
            _ => {
                out.push('{');
                out.push_str(&body);
                out.push('}');
            }
        }
    }

    out
}

struct Directive {
    left_align: bool,
    zero_pad: bool,
    width: usize,
    precision: Option<usize>,
}

fn parse_directive(spec: &str) -> Option<Directive> {
    let mut rest = spec;
    let mut left_align = false;
    while let Some(r) = rest.strip_prefix('-') {
        left_align = true;
        rest = r;
    }
    let zero_pad = rest.starts_with('0');
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let width = if digits_end == 0 {
        0
    } else {
        rest[..digits_end].parse().ok()?
    };
    rest = &rest[digits_end..];

    let precision = match rest.strip_prefix('.') {
        Some(p) if !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()) => {
            rest = "";
            Some(p.parse().ok()?)
        }
        Some(_) => return None,
        None => None,
    };
    if !rest.is_empty() {
        return None;
    }
    Some(Directive {
        left_align,
        zero_pad,
        width,
        precision,
    })
}

fn pad(directive: &Directive, body: &str) -> String {
    let len = body.chars().count();
    if len >= directive.width {
        return body.to_string();
    }
    let fill = directive.width - len;
    if directive.left_align {
        format!("{}{}", body, " ".repeat(fill))
    } else if directive.zero_pad {
        // Zeros go between the sign and the digits.
        match body.strip_prefix('-') {
            Some(digits) => format!("-{}{}", "0".repeat(fill), digits),
            None => format!("{}{}", "0".repeat(fill), body),
        }
    } else {
        format!("{}{}", " ".repeat(fill), body)
    }
}

fn render(directive: &Directive, conversion: char, arg: &Arg) -> Option<String> {
    let body = match conversion {
        's' => {
            let mut s = arg.to_string();
            if let Some(p) = directive.precision {
                s = s.chars().take(p).collect();
            }
            s
        }
        'd' => match arg {
            Arg::Int(i) => i.to_string(),
            Arg::Float(v) => (*v as i64).to_string(),
            other => other.to_string(),
        },
        'x' => match arg {
            Arg::Int(i) => format!("{i:x}"),
            other => other.to_string(),
        },
        'X' => match arg {
            Arg::Int(i) => format!("{i:X}"),
            other => other.to_string(),
        },
        'f' => match arg {
            Arg::Float(v) => format!("{:.*}", directive.precision.unwrap_or(6), v),
            Arg::Int(i) => format!("{:.*}", directive.precision.unwrap_or(6), *i as f64),
            other => other.to_string(),
        },
        _ => return None,
    };
    Some(pad(directive, &body))
}

/// Substitute `%` directives against the arguments positionally.
///
/// Supported conversions: `%s`, `%d`, `%x`, `%X`, `%f` and `%%`, with
/// optional width (`-` left align, `0` zero pad) and precision. A directive
/// with no remaining argument, or an unknown conversion, stays as literal
/// text; a directive left literal does not consume an argument.
pub fn format_printf(pattern: &str, args: &[Arg]) -> String {
    if !pattern.contains('%') {
        return pattern.to_string();
    }

    let mut out = String::with_capacity(pattern.len() + 8);
    let mut chars = pattern.chars().peekable();
    let mut next = 0usize;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }

        let mut spec = String::new();
        while let Some(&n) = chars.peek() {
            if n.is_ascii_digit() || n == '-' || n == '.' {
                spec.push(n);
                chars.next();
            } else {
                break;
            }
        }

        let conversion = match chars.peek() {
            Some(&n) if n.is_ascii_alphabetic() => Some(n),
            _ => None,
        };

        let rendered = conversion.and_then(|conv| {
            let directive = parse_directive(&spec)?;
            let arg = args.get(next)?;
            render(&directive, conv, arg)
        });

        match rendered {
            Some(s) => {
                chars.next();
                next += 1;
                out.push_str(&s);
            }
            None => {
                out.push('%');
                out.push_str(&spec);
            }
        }
    }

    out
}
