use std::fmt;

use regex::Regex;

use crate::diagnostics::RewriteError;
use crate::typeck::types::{JavaType, MethodType, Primitive, OBJECT};

/// A method signature pattern such as
/// `com.fasterxml.jackson.databind.ObjectMapper *(..)`.
///
/// The pattern is `<declaring type> <method name>(<arguments>)`; `#` may be
/// used instead of the space. In type and name positions `*` matches within
/// one dotted segment and `..` matches any number of segments. In the
/// argument list `..` matches any run of arguments. Constructors are named
/// `<constructor>`, which `*` also matches.
#[derive(Debug, Clone)]
pub struct MethodMatcher {
    pattern: String,
    declaring_type: Regex,
    method_name: Regex,
    arguments: Vec<ArgPattern>,
    match_overrides: bool,
}

#[derive(Debug, Clone)]
enum ArgPattern {
    AnyRun,
    Type(Regex),
}

impl MethodMatcher {
    /// With `match_overrides`, a method declared on a subtype of the pattern's
    /// declaring type also matches.
    pub fn parse(pattern: &str, match_overrides: bool) -> Result<Self, RewriteError> {
        let trimmed = pattern.trim();
        let err = |msg: &str| RewriteError::pattern(pattern, msg);

        let open = trimmed.find('(').ok_or_else(|| err("missing argument list"))?;
        let args = trimmed[open + 1..].strip_suffix(')').ok_or_else(|| err("argument list is not closed"))?;
        let head = trimmed[..open].trim_end();
        let (type_part, name_part) = match head.rsplit_once('#') {
            Some(split) => split,
            None => head
                .rsplit_once(char::is_whitespace)
                .ok_or_else(|| err("expected '<type> <method>(<arguments>)'"))?,
        };
        let (type_part, name_part) = (type_part.trim(), name_part.trim());
        if type_part.is_empty() || name_part.is_empty() {
            return Err(err("expected '<type> <method>(<arguments>)'"));
        }

        let compile = |glob: &str| Regex::new(&glob_to_regex(glob)).map_err(|e| err(&e.to_string()));
        let arguments = split_arguments(args)
            .into_iter()
            .map(|arg| match arg {
                ".." => Ok(ArgPattern::AnyRun),
                arg => Regex::new(&argument_regex(arg)).map(ArgPattern::Type).map_err(|e| err(&e.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MethodMatcher {
            pattern: trimmed.to_string(),
            declaring_type: compile(type_part)?,
            method_name: compile(name_part)?,
            arguments,
            match_overrides,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, method: &MethodType) -> bool {
        if !self.method_name.is_match(&method.name) {
            return false;
        }
        let params: Vec<String> = method.parameter_types.iter().map(erased_name).collect();
        if !args_match(&self.arguments, &params) {
            return false;
        }
        if self.match_overrides {
            method.declaring_type.ancestors().iter().any(|t| self.declaring_type.is_match(&t.fqn))
        } else {
            self.declaring_type.is_match(&method.declaring_type.fqn)
        }
    }
}

impl fmt::Display for MethodMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 16);
    out.push('^');
    let mut chars = glob.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '.' if chars.peek() == Some(&'.') => {
                chars.next();
                out.push_str(r"\.(?:[^.]+\.)*");
            }
            '*' => out.push_str("[^.]*"),
            other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    out.push('$');
    out
}

/// Argument types are compared by erasure. A bare non-primitive name also
/// matches the `java.lang` type of that name.
fn argument_regex(arg: &str) -> String {
    let erased = match arg.find('<') {
        Some(idx) => {
            let close = arg.rfind('>').map_or(arg.len(), |i| i + 1);
            format!("{}{}", &arg[..idx], &arg[close..])
        }
        None => arg.to_string(),
    };
    let element = erased.trim_end_matches("[]");
    if !element.contains('.') && !element.contains('*') && Primitive::from_keyword(element).is_none() {
        let regex = glob_to_regex(&erased);
        return format!(r"^(?:java\.lang\.)?{}", &regex[1..]);
    }
    glob_to_regex(&erased)
}

/// Split an argument list at top-level commas.
fn split_arguments(args: &str) -> Vec<&str> {
    if args.trim().is_empty() {
        return Vec::new();
    }
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in args.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(args[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(args[start..].trim());
    parts
}

fn args_match(patterns: &[ArgPattern], params: &[String]) -> bool {
    match patterns.split_first() {
        None => params.is_empty(),
        Some((ArgPattern::AnyRun, rest)) => (0..=params.len()).any(|skip| args_match(rest, &params[skip..])),
        Some((ArgPattern::Type(re), rest)) => params
            .split_first()
            .is_some_and(|(param, tail)| re.is_match(param) && args_match(rest, tail)),
    }
}

fn erased_name(ty: &JavaType) -> String {
    match ty {
        JavaType::Class(c) | JavaType::Parameterized { base: c, .. } => c.fqn.clone(),
        JavaType::Array(inner) => format!("{}[]", erased_name(inner)),
        JavaType::Primitive(p) => p.keyword().to_string(),
        JavaType::TypeVariable(_) => OBJECT.to_string(),
        other => other.to_string(),
    }
}
