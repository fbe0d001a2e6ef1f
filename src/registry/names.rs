//! Structural type names: `list<T>`, `array<T>` and `dict<K,V>`.

use crate::util::{Error, Result};

/// One level of a parsed type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeName<'a> {
    Simple(&'a str),
    List(&'a str),
    Array(&'a str),
    Dict(&'a str, &'a str),
}

/// Split `name` into its outermost structure.
pub(crate) fn parse(name: &str) -> Result<TypeName<'_>> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::UnresolvedType(String::new()));
    }
    let Some(open) = name.find('<') else {
        if name.contains(['>', ',']) {
            return Err(Error::UnresolvedType(name.to_string()));
        }
        return Ok(TypeName::Simple(name));
    };
    let inner = name[open + 1..]
        .strip_suffix('>')
        .filter(|inner| balanced(inner))
        .ok_or_else(|| Error::UnresolvedType(name.to_string()))?;

    match &name[..open] {
        "list" => Ok(TypeName::List(inner)),
        "array" => Ok(TypeName::Array(inner)),
        "dict" => {
            let comma = top_level_comma(inner).ok_or_else(|| Error::UnresolvedType(name.to_string()))?;
            Ok(TypeName::Dict(&inner[..comma], &inner[comma + 1..]))
        }
        _ => Err(Error::UnresolvedType(name.to_string())),
    }
}

/// Deepest `<` nesting in `name`, counted in one pass.
pub(crate) fn nesting_depth(name: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0;
    for b in name.bytes() {
        match b {
            b'<' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'>' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

fn balanced(s: &str) -> bool {
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '<' => depth += 1,
            '>' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

fn top_level_comma(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}
