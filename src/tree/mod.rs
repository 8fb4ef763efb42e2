//! Byte-oriented radix tree mapping route patterns to method tables.
//!
//! Patterns are decomposed into static runs, `:name` segments and a trailing
//! `*` wildcard. Static runs share prefixes; a `:` node matches one segment
//! and a `*` node matches the rest of the path.
//!
//! Lookup prefers a static child, then the param child, then the wildcard
//! child. It remembers a single fallback point so that a static branch that
//! dead-ends can be retried through the dynamic children of the node where
//! it was taken. Only one fallback is kept: a failure after a second dynamic
//! branching point cannot reach back past it.

mod node;

pub(crate) use node::{Node, NodeKind};

use {
    crate::{
        CorsPolicy, Error, Handler, Result,
        method::{Endpoint, Method, MethodTable},
        params::WILDCARD_PARAM,
        utils::longest_common_prefix,
    },
    std::{fmt, mem, ops::Range, sync::Arc},
};

/// What to hang on the node a pattern ends at.
struct Attachment<'a> {
    pattern: &'a str,
    route: Option<(Method, Handler)>,
    cors: Option<&'a CorsPolicy>,
}

#[derive(Debug)]
pub(crate) struct Trie {
    root: Node,
}

impl Default for Trie {
    fn default() -> Self {
        Self { root: Node::root() }
    }
}

impl Trie {
    /// Inserts `pattern`, attaching the handler for `method` and/or merging
    /// `cors` into the resource policy at the node where it ends.
    ///
    /// Nothing is inserted when the pattern is rejected.
    pub(crate) fn add(
        &mut self,
        pattern: &str,
        route: Option<(Method, Handler)>,
        cors: Option<&CorsPolicy>,
    ) -> Result<()> {
        validate_pattern(pattern)?;

        let mut attachment = Some(Attachment {
            pattern,
            route,
            cors,
        });
        let mut path = pattern.to_string();
        let mut names: Vec<String> = Vec::new();
        let mut i = 0;

        while i < path.len() {
            match path.as_bytes()[i] {
                b':' => {
                    self.insert(&path[..i], NodeKind::Static, &[], None);

                    let start = i + 1;
                    let end = path[start..].find('/').map_or(path.len(), |n| start + n);
                    names.push(path[start..end].to_string());
                    path.replace_range(start..end, "");

                    i = start;
                    if i == path.len() {
                        self.insert(&path, NodeKind::Param, &names, attachment.take());
                        return Ok(());
                    }
                    self.insert(&path[..i], NodeKind::Param, &names, None);
                }
                b'*' => {
                    self.insert(&path[..i], NodeKind::Static, &[], None);
                    names.push(WILDCARD_PARAM.to_string());
                    self.insert(&path[..=i], NodeKind::Wildcard, &names, attachment.take());
                    return Ok(());
                }
                _ => i += 1,
            }
        }

        self.insert(&path, NodeKind::Static, &names, attachment.take());
        Ok(())
    }

    fn insert(
        &mut self,
        path: &str,
        kind: NodeKind,
        param_names: &[String],
        attachment: Option<Attachment<'_>>,
    ) {
        let mut node = &mut self.root;
        let mut search = path.as_bytes();

        loop {
            if node.prefix.is_empty() {
                // Only the root of an empty tree has no prefix.
                node.kind = kind;
                node.prefix = search.to_vec();
                node.param_names = param_names.to_vec();
                attach(node, param_names, attachment);
                return;
            }

            let l = longest_common_prefix(search, &node.prefix);

            if l < node.prefix.len() {
                let child = Node {
                    kind: node.kind,
                    prefix: node.prefix.split_off(l),
                    children: mem::take(&mut node.children),
                    table: node.table.take(),
                    param_names: mem::take(&mut node.param_names),
                };
                node.kind = NodeKind::Static;
                node.children.push(child);

                if l == search.len() {
                    node.param_names = param_names.to_vec();
                    attach(node, param_names, attachment);
                } else {
                    node.children
                        .push(leaf(kind, &search[l..], param_names, attachment));
                }
                return;
            }

            if l < search.len() {
                search = &search[l..];
                match node.child_index(search[0]) {
                    Some(index) => node = &mut node.children[index],
                    None => {
                        node.children
                            .push(leaf(kind, search, param_names, attachment));
                        return;
                    }
                }
                continue;
            }

            attach(node, param_names, attachment);
            return;
        }
    }

    /// Finds the node that serves `path`.
    ///
    /// On success `captures` holds the byte ranges of `path` bound by each
    /// Param and Wildcard node along the match, in order. The node always
    /// carries a method table.
    pub(crate) fn find<'t>(
        &'t self,
        path: &str,
        captures: &mut Vec<Range<usize>>,
    ) -> Option<&'t Node> {
        let bytes = path.as_bytes();
        let mut node = &self.root;
        let mut offset = 0;
        let mut fallback: Option<Fallback<'t>> = None;
        let mut step = Step::Static;

        loop {
            match step {
                Step::Static => {
                    if offset == bytes.len() {
                        if node.table.is_some() {
                            return Some(node);
                        }
                        step = Step::Wildcard;
                        continue;
                    }

                    if node.kind != NodeKind::Param {
                        let l = longest_common_prefix(&bytes[offset..], &node.prefix);
                        if l < node.prefix.len() {
                            step = Step::Backtrack;
                            continue;
                        }
                        offset += l;
                        if offset == bytes.len() {
                            continue;
                        }
                    }

                    match node.static_child(bytes[offset]) {
                        Some(child) => {
                            if node.has_dynamic_child() {
                                fallback = Some(Fallback {
                                    step: Step::Param,
                                    node,
                                    offset,
                                    captured: captures.len(),
                                });
                            }
                            node = child;
                        }
                        None => step = Step::Param,
                    }
                }
                Step::Param => match node.param_child() {
                    Some(child) => {
                        if node.wildcard_child().is_some() {
                            fallback = Some(Fallback {
                                step: Step::Wildcard,
                                node,
                                offset,
                                captured: captures.len(),
                            });
                        }
                        let end = bytes[offset..]
                            .iter()
                            .position(|&b| b == b'/')
                            .map_or(bytes.len(), |n| offset + n);
                        captures.push(offset..end);
                        offset = end;
                        node = child;
                        step = Step::Static;
                    }
                    None => step = Step::Wildcard,
                },
                Step::Wildcard => match node.wildcard_child() {
                    Some(child) => {
                        captures.push(offset..bytes.len());
                        offset = bytes.len();
                        node = child;
                        step = Step::Static;
                    }
                    None => step = Step::Backtrack,
                },
                Step::Backtrack => {
                    let resume = fallback.take()?;
                    node = resume.node;
                    offset = resume.offset;
                    captures.truncate(resume.captured);
                    step = resume.step;
                }
            }
        }
    }
}

impl fmt::Display for Trie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.write_tree(f, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Static,
    Param,
    Wildcard,
    Backtrack,
}

/// Where a lookup resumes after a dead end.
struct Fallback<'t> {
    step: Step,
    node: &'t Node,
    offset: usize,
    captured: usize,
}

fn leaf(
    kind: NodeKind,
    prefix: &[u8],
    param_names: &[String],
    attachment: Option<Attachment<'_>>,
) -> Node {
    let mut node = Node::new(kind, prefix.to_vec(), param_names.to_vec());
    attach(&mut node, param_names, attachment);
    node
}

fn attach(node: &mut Node, param_names: &[String], attachment: Option<Attachment<'_>>) {
    let Some(attachment) = attachment else {
        return;
    };

    let table = node.table.get_or_insert_with(MethodTable::default);
    if let Some(cors) = attachment.cors {
        table.merge_cors(cors);
    }
    if let Some((method, handler)) = attachment.route {
        table.insert(
            method,
            Endpoint {
                handler,
                param_names: Arc::from(param_names),
                pattern: Arc::from(attachment.pattern),
            },
        );
        node.param_names = param_names.to_vec();
    }
}

fn validate_pattern(pattern: &str) -> Result<()> {
    if !pattern.starts_with('/') {
        return Err(Error::invalid_pattern(pattern, "pattern must start with '/'"));
    }

    let bytes = pattern.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'*' => break,
            b':' if matches!(bytes.get(i + 1), None | Some(b'/')) => {
                return Err(Error::invalid_pattern(
                    pattern,
                    format!("empty parameter name at byte {i}"),
                ));
            }
            _ => {}
        }
    }
    Ok(())
}
