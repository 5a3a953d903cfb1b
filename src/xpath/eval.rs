//! Path Expression Evaluation
//!
//! Runs compiled actions left to right against an [`EvalContext`]. Node
//! steps move the context node; `//name`, `text()`, `//text()` and `@attr`
//! produce their result and stop.

use tracing::debug;

use super::compiler::{compile, Action, CompiledPath};
use super::value::PathResult;
use crate::dom::Node;
use crate::error::PathError;
use crate::options::NameMatch;

/// Evaluation state: the current node and how names are compared
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub node: Node<'a>,
    pub name_match: NameMatch,
}

impl<'a> EvalContext<'a> {
    /// Context with exact name matching
    pub fn new(node: Node<'a>) -> Self {
        Self::with_match(node, NameMatch::Exact)
    }

    pub fn with_match(node: Node<'a>, name_match: NameMatch) -> Self {
        EvalContext { node, name_match }
    }

    #[inline]
    fn named(&self, node: &Node<'_>, name: &str) -> bool {
        node.name().is_some_and(|n| self.name_match.matches(n, name))
    }

    /// Apply one navigational step; `None` means nothing matched
    fn step(&mut self, action: &Action) -> Option<()> {
        let next = match action {
            Action::SelectParent => self.node.parent()?,
            Action::SelectSelf => self.node,
            Action::SelectFirstChild { name } => {
                if self.named(&self.node, name) {
                    self.node
                } else {
                    self.node.find_first_with(name, self.name_match)?
                }
            }
            Action::SelectNthChild { name, n } => self
                .node
                .children()
                .filter(|c| self.named(c, name))
                .nth(n.checked_sub(1)?)?,
            Action::SelectByAttribute { name, attr } => self
                .node
                .children()
                .find(|c| self.named(c, name) && c.has_attribute(attr))?,
            Action::SelectByAttributeValue { name, attr, value } => {
                self.node.children().find(|c| {
                    self.named(c, name)
                        && c
                            .attributes()
                            .any(|a| a.key == attr.as_str() && a.value == value.as_str())
                })?
            }
            // Terminal actions are handled by `execute`
            _ => return Some(()),
        };
        self.node = next;
        Some(())
    }
}

impl CompiledPath {
    /// Run with exact name matching
    pub fn execute<'a>(&self, node: Node<'a>) -> PathResult<'a> {
        execute(self, EvalContext::new(node))
    }

    pub fn execute_with<'a>(&self, node: Node<'a>, name_match: NameMatch) -> PathResult<'a> {
        execute(self, EvalContext::with_match(node, name_match))
    }
}

/// Run every action against `ctx`
pub fn execute<'a>(path: &CompiledPath, mut ctx: EvalContext<'a>) -> PathResult<'a> {
    for action in path.actions() {
        match action {
            Action::SelectAllChildren { name } => {
                let mode = ctx.name_match;
                return PathResult::Nodes(ctx.node.find_all_with(name, mode));
            }
            Action::SelectText => {
                return ctx
                    .node
                    .text()
                    .map_or(PathResult::Empty, |t| PathResult::Text(t.to_string()));
            }
            Action::SelectAttribute { attr } => {
                return ctx
                    .node
                    .attribute(attr)
                    .map_or(PathResult::Empty, |v| PathResult::Text(v.to_string()));
            }
            Action::SelectChildTexts => return child_texts(ctx.node),
            _ => {
                if ctx.step(action).is_none() {
                    return PathResult::Empty;
                }
            }
        }
    }
    PathResult::Node(ctx.node)
}

/// Texts of the element children, joined with single spaces
///
/// Always a text result, empty when no child carries text.
fn child_texts(node: Node<'_>) -> PathResult<'_> {
    let mut joined = String::new();
    for text in node
        .children()
        .filter(|c| c.is_element())
        .filter_map(|c| c.text())
    {
        if !joined.is_empty() {
            joined.push(' ');
        }
        joined.push_str(text);
    }
    PathResult::Text(joined)
}

/// Compile and run; malformed expressions give `Empty`
pub fn evaluate<'a>(node: Node<'a>, expr: &str) -> PathResult<'a> {
    or_empty(expr, try_evaluate(node, expr))
}

/// Unwrap a compile result, logging and falling back to `Empty` on error
pub(crate) fn or_empty<'a>(
    expr: &str,
    result: Result<PathResult<'a>, PathError>,
) -> PathResult<'a> {
    result.unwrap_or_else(|err| {
        debug!(expr, error = %err, "path expression rejected");
        PathResult::Empty
    })
}

/// Compile and run, reporting compile errors
pub fn try_evaluate<'a>(node: Node<'a>, expr: &str) -> Result<PathResult<'a>, PathError> {
    Ok(compile(expr)?.execute(node))
}

impl<'a> Node<'a> {
    /// Evaluate a path expression from this node
    pub fn xpath(&self, expr: &str) -> PathResult<'a> {
        evaluate(*self, expr)
    }
}
