//! Path Expression Compiler
//!
//! Splits an expression into `/` or `//` steps (a `/` inside `[...]` does not
//! split) and turns each step into one [`Action`].
//!
//! | step            | action                   |
//! |-----------------|--------------------------|
//! | `/..`           | `SelectParent`           |
//! | `/.`            | `SelectSelf`             |
//! | `//text()`      | `SelectChildTexts`       |
//! | `//name`        | `SelectAllChildren`      |
//! | `/name[n]`      | `SelectNthChild`         |
//! | `/name[@a]`     | `SelectByAttribute`      |
//! | `/name[@a=v]`   | `SelectByAttributeValue` |
//! | `/@a`           | `SelectAttribute`        |
//! | `/text()`       | `SelectText`             |
//! | `/name`         | `SelectFirstChild`       |

use crate::error::PathError;

/// One compiled step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectParent,
    SelectSelf,
    /// Every direct child named `name` (the `//` form does not descend further)
    SelectAllChildren { name: String },
    SelectFirstChild { name: String },
    /// `n` is 1-based among the children named `name`
    SelectNthChild { name: String, n: usize },
    SelectByAttribute { name: String, attr: String },
    SelectByAttributeValue {
        name: String,
        attr: String,
        value: String,
    },
    SelectText,
    SelectChildTexts,
    SelectAttribute { attr: String },
}

/// Compiled path expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPath {
    expr: String,
    actions: Vec<Action>,
}

impl CompiledPath {
    pub fn compile(expr: &str) -> Result<Self, PathError> {
        compile(expr)
    }

    /// Source expression
    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}

/// Compile a path expression string
pub fn compile(expr: &str) -> Result<CompiledPath, PathError> {
    let trimmed = expr.trim();
    if trimmed.is_empty() {
        return Err(PathError::Empty);
    }

    let actions = split_steps(trimmed)?
        .into_iter()
        .map(|(descendant, body)| compile_step(descendant, body, trimmed))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompiledPath {
        expr: expr.to_string(),
        actions,
    })
}

/// Split into `(is_double_slash, body)` pairs
fn split_steps(expr: &str) -> Result<Vec<(bool, &str)>, PathError> {
    let bytes = expr.as_bytes();
    let mut steps = Vec::new();
    // A relative expression behaves as if it began with '/'
    let mut i = usize::from(bytes.first() == Some(&b'/'));
    let mut descendant = false;
    if i == 1 && bytes.get(1) == Some(&b'/') {
        descendant = true;
        i = 2;
    }

    loop {
        let start = i;
        let mut depth = 0usize;
        while i < bytes.len() {
            match bytes[i] {
                b'[' => depth += 1,
                b']' => {
                    depth = depth.checked_sub(1).ok_or_else(|| unbalanced(expr, start))?;
                }
                b'/' if depth == 0 => break,
                _ => {}
            }
            i += 1;
        }
        if depth != 0 {
            return Err(unbalanced(expr, start));
        }

        let body = &expr[start..i];
        if body.is_empty() {
            return Err(PathError::EmptyStep {
                expr: expr.to_string(),
            });
        }
        steps.push((descendant, body));

        if i >= bytes.len() {
            return Ok(steps);
        }
        // bytes[i] == '/'
        descendant = bytes.get(i + 1) == Some(&b'/');
        i += if descendant { 2 } else { 1 };
    }
}

fn unbalanced(expr: &str, start: usize) -> PathError {
    let rest = &expr[start..];
    let step = rest.split('/').next().unwrap_or(rest);
    PathError::UnbalancedBrackets {
        step: step.to_string(),
    }
}

fn compile_step(descendant: bool, body: &str, expr: &str) -> Result<Action, PathError> {
    let step = || {
        let slashes = if descendant { "//" } else { "/" };
        format!("{slashes}{body}")
    };

    if descendant {
        if body == "text()" {
            return Ok(Action::SelectChildTexts);
        }
        if body.contains('[') {
            return Err(PathError::PredicateOnDescendant { step: step() });
        }
        return Ok(Action::SelectAllChildren {
            name: body.to_string(),
        });
    }

    match body {
        ".." => return Ok(Action::SelectParent),
        "." => return Ok(Action::SelectSelf),
        "text()" => return Ok(Action::SelectText),
        _ => {}
    }

    if let Some(attr) = body.strip_prefix('@') {
        let attr = attr.trim();
        if attr.is_empty() {
            return Err(PathError::MissingAttribute { step: step() });
        }
        return Ok(Action::SelectAttribute {
            attr: attr.to_string(),
        });
    }

    let Some(open) = body.find('[') else {
        return Ok(Action::SelectFirstChild {
            name: body.to_string(),
        });
    };

    // Exactly one trailing predicate
    let predicate = body[open..]
        .strip_prefix('[')
        .and_then(|p| p.strip_suffix(']'))
        .filter(|p| !p.contains('[') && !p.contains(']'))
        .ok_or_else(|| PathError::UnbalancedBrackets { step: step() })?;
    let name = &body[..open];
    if name.is_empty() {
        return Err(PathError::EmptyStep {
            expr: expr.to_string(),
        });
    }
    let name = name.to_string();

    let predicate = predicate.trim();
    if let Some(attr_test) = predicate.strip_prefix('@') {
        return match attr_test.split_once('=') {
            Some((attr, value)) => {
                let attr = attr.trim();
                if attr.is_empty() {
                    return Err(PathError::MissingAttribute { step: step() });
                }
                Ok(Action::SelectByAttributeValue {
                    name,
                    attr: attr.to_string(),
                    value: unquote(value.trim()).to_string(),
                })
            }
            None => {
                let attr = attr_test.trim();
                if attr.is_empty() {
                    return Err(PathError::MissingAttribute { step: step() });
                }
                Ok(Action::SelectByAttribute {
                    name,
                    attr: attr.to_string(),
                })
            }
        };
    }

    match predicate.parse::<usize>() {
        Ok(n) if n > 0 => Ok(Action::SelectNthChild { name, n }),
        _ => Err(PathError::InvalidIndex { step: step() }),
    }
}

/// Strip one pair of matching quotes
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions(expr: &str) -> Vec<Action> {
        compile(expr).unwrap().actions().to_vec()
    }

    fn name(s: &str) -> String {
        s.to_string()
    }

    #[test]
    fn test_compile_step_table() {
        assert_eq!(
            actions("/r/.././/item/p[2]/q[@id]/s[@k=v]/@a"),
            vec![
                Action::SelectFirstChild { name: name("r") },
                Action::SelectParent,
                Action::SelectSelf,
                Action::SelectAllChildren { name: name("item") },
                Action::SelectNthChild {
                    name: name("p"),
                    n: 2,
                },
                Action::SelectByAttribute {
                    name: name("q"),
                    attr: name("id"),
                },
                Action::SelectByAttributeValue {
                    name: name("s"),
                    attr: name("k"),
                    value: name("v"),
                },
                Action::SelectAttribute { attr: name("a") },
            ]
        );
        assert_eq!(actions("/p/text()").last(), Some(&Action::SelectText));
        assert_eq!(actions("//text()"), vec![Action::SelectChildTexts]);
    }

    #[test]
    fn test_relative_expression() {
        assert_eq!(actions("p/text()"), actions("/p/text()"));
    }

    #[test]
    fn test_quoted_value_and_slash_in_predicate() {
        assert_eq!(
            actions("/link[@href='a/b']"),
            vec![Action::SelectByAttributeValue {
                name: name("link"),
                attr: name("href"),
                value: name("a/b"),
            }]
        );
        assert_eq!(actions("/item[@id=\"42\"]"), actions("/item[@id=42]"));
    }

    #[test]
    fn test_compile_errors() {
        assert_eq!(compile(""), Err(PathError::Empty));
        assert_eq!(compile("   "), Err(PathError::Empty));
        assert!(matches!(compile("/a//"), Err(PathError::EmptyStep { .. })));
        assert!(matches!(compile("/a/"), Err(PathError::EmptyStep { .. })));
        assert!(matches!(compile("/a[1"), Err(PathError::UnbalancedBrackets { .. })));
        assert!(matches!(compile("/a]"), Err(PathError::UnbalancedBrackets { .. })));
        assert!(matches!(compile("/a[1]x"), Err(PathError::UnbalancedBrackets { .. })));
        assert!(matches!(compile("/a[0]"), Err(PathError::InvalidIndex { .. })));
        assert!(matches!(compile("/a[x]"), Err(PathError::InvalidIndex { .. })));
        assert!(matches!(compile("/a[-1]"), Err(PathError::InvalidIndex { .. })));
        assert!(matches!(compile("/@"), Err(PathError::MissingAttribute { .. })));
        assert!(matches!(compile("/a[@]"), Err(PathError::MissingAttribute { .. })));
        assert!(matches!(compile("/a[@=1]"), Err(PathError::MissingAttribute { .. })));
        assert!(matches!(compile("//a[1]"), Err(PathError::PredicateOnDescendant { .. })));
        assert!(matches!(compile("/[1]"), Err(PathError::EmptyStep { .. })));
    }

    #[test]
    fn test_expr_kept() {
        let compiled = CompiledPath::compile("/a/b").unwrap();
        assert_eq!(compiled.expr(), "/a/b");
        assert_eq!(compiled.actions().len(), 2);
    }
}
