//! Parallel Query Evaluation
//!
//! Uses Rayon to run many queries against one document. The tree is
//! immutable after parsing, so every worker reads it without locking.
//! Results come back in input order.

use rayon::prelude::*;

use crate::dom::Node;
use crate::xpath::eval::or_empty;
use crate::xpath::{compile, evaluate, PathResult};

/// Evaluate multiple path expressions in parallel
pub fn evaluate_parallel<'a, S>(node: Node<'a>, exprs: &[S]) -> Vec<PathResult<'a>>
where
    S: AsRef<str> + Sync,
{
    exprs
        .par_iter()
        .map(|expr| evaluate(node, expr.as_ref()))
        .collect()
}

/// Run [`Node::select`] for multiple child paths in parallel
pub fn select_parallel<'a, S>(node: Node<'a>, paths: &[S]) -> Vec<Option<Node<'a>>>
where
    S: AsRef<str> + Sync,
{
    paths
        .par_iter()
        .map(|path| node.select(path.as_ref()))
        .collect()
}

/// Evaluate keyed expressions in parallel, keeping each key with its result
pub fn evaluate_map<'a>(
    node: Node<'a>,
    queries: &[(&str, &str)],
) -> Vec<(String, PathResult<'a>)> {
    queries
        .par_iter()
        .map(|(key, expr)| (key.to_string(), evaluate(node, expr)))
        .collect()
}

/// Evaluate one expression against many nodes in parallel
///
/// The expression is compiled once; a malformed expression yields `Empty`
/// for every node.
pub fn evaluate_each<'a>(nodes: &[Node<'a>], expr: &str) -> Vec<PathResult<'a>> {
    match compile(expr) {
        Ok(compiled) => nodes.par_iter().map(|&n| compiled.execute(n)).collect(),
        Err(err) => {
            let rejected = or_empty(expr, Err(err));
            vec![rejected; nodes.len()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    const FEED: &str = concat!(
        "<feed><title>News</title>",
        "<entry id=\"1\">a</entry><entry id=\"2\">b</entry></feed>"
    );

    #[test]
    fn test_parallel_matches_sequential() {
        let doc = Document::parse(FEED).unwrap();
        let root = doc.root();
        let exprs = ["/title/text()", "//entry", "/entry[@id=2]/text()", "/missing", "/bad["];

        let parallel = evaluate_parallel(root, &exprs);
        let sequential: Vec<_> = exprs.iter().map(|e| evaluate(root, e)).collect();
        assert_eq!(parallel, sequential);
        assert_eq!(parallel[0].as_text(), Some("News"));
        assert!(parallel[4].is_empty());
    }

    #[test]
    fn test_select_parallel_order() {
        let doc = Document::parse(FEED).unwrap();
        let paths = vec!["entry[-1]".to_string(), "title".to_string(), "nope".to_string()];
        let found = select_parallel(doc.root(), &paths);
        assert_eq!(found[0].and_then(|n| n.text()), Some("b"));
        assert_eq!(found[1].and_then(|n| n.name()), Some("title"));
        assert_eq!(found[2], None);
    }

    #[test]
    fn test_evaluate_map() {
        let doc = Document::parse(FEED).unwrap();
        let queries = [("title", "/title/text()"), ("first", "/entry[@id=1]/text()")];
        let results = evaluate_map(doc.root(), &queries);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "title");
        assert_eq!(results[0].1.as_text(), Some("News"));
        assert_eq!(results[1].1.as_text(), Some("a"));
    }

    #[test]
    fn test_evaluate_each() {
        let doc = Document::parse(FEED).unwrap();
        let entries = doc.root().find_all("entry");
        let ids = evaluate_each(entries.as_slice(), "/@id");
        let ids: Vec<_> = ids.iter().map(|r| r.as_text()).collect();
        assert_eq!(ids, [Some("1"), Some("2")]);
        assert!(evaluate_each(entries.as_slice(), "/[").iter().all(PathResult::is_empty));
    }
}
