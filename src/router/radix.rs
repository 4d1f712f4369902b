//! Radix tree implementation for HTTP route matching
//!
//! This module provides the compact prefix tree behind [`Store`](super::Store).
//! Lookup cost is proportional to the length of the request path, not to the
//! number of registered routes.
//!
//! ## Node shapes
//!
//! - **Static** nodes hold a byte string that must appear literally in the path.
//!   A node keeps at most one static child per leading byte, in a 256 slot table
//!   allocated the first time it gets a static child.
//! - **Parametric** nodes capture part of the path: one segment, the anchored
//!   match of a constraint, or the whole remainder (wildcard). Several of them
//!   may hang off the same node; they are kept in registration order.
//!
//! ## Ordering
//!
//! Every registered pattern receives a sequence number (`order`). Each node also
//! tracks `min_order`, the smallest order found anywhere in its subtree, which
//! lets lookup skip subtrees that cannot produce a better candidate than the one
//! it already has.
//!
//! ## Splitting
//!
//! Inserting `/users/new` into a tree holding `/users/name` turns the `/users/n`
//! prefix into its own node with two static children, `ame` and `ew`. The split
//! off child takes over the payload, order and children of the original node.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use super::constraint::ParamMatcher;
use super::core::ParamValues;
use super::pattern::ParamToken;
use crate::runtime_config::MatchPriority;

/// Registration sequence number. Orders start at 1.
pub(crate) type Order = usize;

/// Order of a node that holds no payload (and `min_order` of an empty subtree).
pub(crate) const NO_ORDER: Order = Order::MAX;

type StaticTable<T, M> = [Option<Box<Node<T, M>>>; 256];

fn empty_table<T, M>() -> Box<StaticTable<T, M>> {
    Box::new(std::array::from_fn(|_| None))
}

/// How a parametric node consumes request bytes.
#[derive(Debug, Clone)]
pub(crate) enum Capture<M> {
    /// One or more bytes up to the next `/`
    Segment,
    /// The anchored match of a compiled constraint
    Constrained(M),
    /// The whole remainder, possibly empty
    Wildcard,
}

#[derive(Debug, Clone)]
enum NodeKind<M> {
    Static,
    Param {
        token: ParamToken,
        capture: Capture<M>,
    },
}

/// A pattern ready for insertion: literal bytes and compiled parameters.
pub(crate) enum Piece<'a, M> {
    Literal(&'a [u8]),
    Param {
        token: ParamToken,
        capture: Capture<M>,
    },
}

/// Outcome of inserting one pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Inserted {
    /// Number of parameters captured along the pattern
    pub(crate) params: usize,
    /// `false` when the terminal node already carried a payload
    pub(crate) registered: bool,
}

/// A terminal node reached by a lookup.
pub(crate) struct Candidate<'s, T> {
    pub(crate) payload: &'s T,
    pub(crate) names: &'s [Arc<str>],
    pub(crate) order: Order,
}

/// Trie vertex
///
/// Each node is exclusively owned by its parent; traversal only ever goes from
/// the root towards the leaves, so there are no back references.
#[derive(Clone)]
pub(crate) struct Node<T, M> {
    /// Literal bytes consumed by a static node (empty for the root and for
    /// parametric nodes)
    key: Vec<u8>,
    kind: NodeKind<M>,
    payload: Option<T>,
    order: Order,
    min_order: Order,
    static_children: Option<Box<StaticTable<T, M>>>,
    param_children: Vec<Node<T, M>>,
    /// Slot of this node's capture in the parameter buffer (parametric nodes)
    param_index: usize,
    /// Parameter names collected from the root down to this node
    param_names: Arc<[Arc<str>]>,
}

impl<T, M> Node<T, M> {
    pub(crate) fn root() -> Self {
        Self::new_static(Vec::new(), Arc::from(Vec::new()))
    }

    fn new_static(key: Vec<u8>, param_names: Arc<[Arc<str>]>) -> Self {
        Self {
            key,
            kind: NodeKind::Static,
            payload: None,
            order: NO_ORDER,
            min_order: NO_ORDER,
            static_children: None,
            param_children: Vec::new(),
            param_index: 0,
            param_names,
        }
    }

    fn new_param(token: ParamToken, capture: Capture<M>, parent_names: &[Arc<str>]) -> Self {
        let mut names = Vec::with_capacity(parent_names.len() + 1);
        names.extend(parent_names.iter().cloned());
        names.push(Arc::clone(&token.name));
        Self {
            key: Vec::new(),
            kind: NodeKind::Param { token, capture },
            payload: None,
            order: NO_ORDER,
            min_order: NO_ORDER,
            static_children: None,
            param_children: Vec::new(),
            param_index: parent_names.len(),
            param_names: Arc::from(names),
        }
    }

    fn token(&self) -> Option<&ParamToken> {
        match &self.kind {
            NodeKind::Param { token, .. } => Some(token),
            NodeKind::Static => None,
        }
    }

    #[inline]
    fn static_child(&self, byte: u8) -> Option<&Node<T, M>> {
        self.static_children
            .as_ref()
            .and_then(|table| table[usize::from(byte)].as_deref())
    }

    fn static_iter(&self) -> impl Iterator<Item = &Node<T, M>> {
        self.static_children
            .iter()
            .flat_map(|table| table.iter().filter_map(|slot| slot.as_deref()))
    }

    /// Total number of nodes in this subtree, this one included
    pub(crate) fn node_count(&self) -> usize {
        1 + self.static_iter().map(Node::node_count).sum::<usize>()
            + self
                .param_children
                .iter()
                .map(Node::node_count)
                .sum::<usize>()
    }

    /// Insert a tokenized pattern below the root.
    pub(crate) fn insert(&mut self, pieces: Vec<Piece<'_, M>>, payload: T, order: Order) -> Inserted {
        let mut pieces = pieces.into_iter();
        self.descend(&[], &mut pieces, payload, order)
    }

    /// Insert into a static node whose key shares at least its first byte with `lit`.
    fn insert_static<'a>(
        &mut self,
        lit: &'a [u8],
        pieces: &mut std::vec::IntoIter<Piece<'a, M>>,
        payload: T,
        order: Order,
    ) -> Inserted {
        let common = self
            .key
            .iter()
            .zip(lit)
            .take_while(|(a, b)| a == b)
            .count();
        if common < self.key.len() {
            self.split(common);
        }
        self.descend(&lit[common..], pieces, payload, order)
    }

    /// Continue an insertion once this node's own key has been consumed.
    ///
    /// `lit` is the part of the current literal token still to be placed.
    fn descend<'a>(
        &mut self,
        lit: &'a [u8],
        pieces: &mut std::vec::IntoIter<Piece<'a, M>>,
        payload: T,
        order: Order,
    ) -> Inserted {
        let inserted = if let Some(&first) = lit.first() {
            let names = &self.param_names;
            let table = self.static_children.get_or_insert_with(empty_table);
            let slot = &mut table[usize::from(first)];
            match slot {
                Some(child) => child.insert_static(lit, pieces, payload, order),
                None => {
                    let child = slot.insert(Box::new(Node::new_static(
                        lit.to_vec(),
                        Arc::clone(names),
                    )));
                    child.descend(&[], pieces, payload, order)
                }
            }
        } else {
            match pieces.next() {
                None => self.terminate(payload, order),
                Some(Piece::Literal(next)) => self.descend(next, pieces, payload, order),
                Some(Piece::Param { token, capture }) => {
                    let idx = match self
                        .param_children
                        .iter()
                        .position(|child| child.token() == Some(&token))
                    {
                        Some(idx) => idx,
                        None => {
                            let child = Node::new_param(token, capture, &self.param_names);
                            self.param_children.push(child);
                            self.param_children.len() - 1
                        }
                    };
                    self.param_children[idx].descend(&[], pieces, payload, order)
                }
            }
        };
        if inserted.registered {
            self.min_order = self.min_order.min(order);
        }
        inserted
    }

    /// Mark this node as the end of a pattern. The first registration wins.
    fn terminate(&mut self, payload: T, order: Order) -> Inserted {
        let registered = self.payload.is_none();
        if registered {
            self.payload = Some(payload);
            self.order = order;
            self.min_order = self.min_order.min(order);
        }
        Inserted {
            params: self.param_names.len(),
            registered,
        }
    }

    /// Truncate this static node's key to `at` bytes, moving the remainder and
    /// everything hanging off this node into a new static child.
    fn split(&mut self, at: usize) {
        let suffix = self.key.split_off(at);
        let first = suffix[0];
        let child = Node {
            key: suffix,
            kind: NodeKind::Static,
            payload: self.payload.take(),
            order: std::mem::replace(&mut self.order, NO_ORDER),
            min_order: self.min_order,
            static_children: self.static_children.take(),
            param_children: std::mem::take(&mut self.param_children),
            param_index: self.param_index,
            param_names: Arc::clone(&self.param_names),
        };
        let mut table = empty_table();
        table[usize::from(first)] = Some(Box::new(child));
        self.static_children = Some(table);
    }

    fn candidate(&self, bound: Order) -> Option<Candidate<'_, T>> {
        match &self.payload {
            Some(payload) if self.order < bound => Some(Candidate {
                payload,
                names: &self.param_names,
                order: self.order,
            }),
            _ => None,
        }
    }

    /// Render the subtree, one node per line, for diagnostics.
    pub(crate) fn fmt_tree(&self, out: &mut String, depth: usize) -> fmt::Result {
        let indent = depth * 2;
        match &self.kind {
            NodeKind::Static => write!(
                out,
                "{:indent$}\"{}\"",
                "",
                String::from_utf8_lossy(&self.key)
            )?,
            NodeKind::Param { token, .. } => {
                write!(out, "{:indent$}<{}> #{}", "", token.name, self.param_index)?
            }
        }
        if self.payload.is_some() {
            write!(out, " order={}", self.order)?;
        }
        if self.min_order != NO_ORDER {
            write!(out, " min_order={}", self.min_order)?;
        }
        if !self.param_names.is_empty() {
            let names: Vec<&str> = self.param_names.iter().map(|n| n.as_ref()).collect();
            write!(out, " params={names:?}")?;
        }
        out.push('\n');
        for child in self.static_iter() {
            child.fmt_tree(out, depth + 1)?;
        }
        for child in &self.param_children {
            child.fmt_tree(out, depth + 1)?;
        }
        Ok(())
    }
}

impl<T, M: ParamMatcher> Node<T, M> {
    /// Resolve `path[pos..]` against this subtree.
    ///
    /// With [`MatchPriority::Registration`] the lowest order candidate below
    /// `bound` is returned. With [`MatchPriority::StaticFirst`] an exact terminal
    /// beats a static child, which beats parametric children; `bound` is only
    /// used by the caller to prune parametric siblings.
    ///
    /// Captured values are written into `values` at each parametric node's
    /// index. Parametric branches work on a copy of the buffer that is merged
    /// back only when the branch yields the new best candidate.
    pub(crate) fn lookup<'s, 'p>(
        &'s self,
        path: &'p str,
        mut pos: usize,
        values: &mut ParamValues<'p>,
        bound: Order,
        priority: MatchPriority,
    ) -> Option<Candidate<'s, T>> {
        let mut node = self;

        // Walk the deterministic static chain without recursing.
        let rest = loop {
            pos = node.consume(path, pos, values)?;
            let rest = &path.as_bytes()[pos..];
            if !node.param_children.is_empty() {
                break rest;
            }
            match rest.first() {
                None => return node.candidate(bound),
                Some(&byte) => node = node.static_child(byte)?,
            }
        };

        let static_first = priority == MatchPriority::StaticFirst;
        let mut bound = bound;
        let mut best = None;

        if rest.is_empty() {
            if let Some(found) = node.candidate(bound) {
                if static_first {
                    return Some(found);
                }
                bound = found.order;
                best = Some(found);
            }
        } else if let Some(child) = node.static_child(rest[0]) {
            if child.min_order < bound {
                if let Some(found) = child.lookup(path, pos, values, bound, priority) {
                    if static_first {
                        return Some(found);
                    }
                    bound = found.order;
                    best = Some(found);
                }
            }
        }

        for child in &node.param_children {
            if child.min_order >= bound {
                continue;
            }
            let child_bound = if static_first { NO_ORDER } else { bound };
            let mut scratch = values.clone();
            if let Some(found) = child.lookup(path, pos, &mut scratch, child_bound, priority) {
                if found.order < bound {
                    bound = found.order;
                    merge_values(values, &scratch, child.param_index);
                    best = Some(found);
                }
            }
        }

        best
    }

    /// Consume this node's share of `path[pos..]`, returning the new position.
    #[inline]
    fn consume<'p>(&self, path: &'p str, pos: usize, values: &mut ParamValues<'p>) -> Option<usize> {
        match &self.kind {
            NodeKind::Static => {
                if path.as_bytes()[pos..].starts_with(&self.key) {
                    Some(pos + self.key.len())
                } else {
                    None
                }
            }
            NodeKind::Param { capture, .. } => {
                let rest = path.get(pos..)?;
                let len = match capture {
                    Capture::Segment => match rest.find('/') {
                        Some(0) => return None,
                        Some(end) => end,
                        None if rest.is_empty() => return None,
                        None => rest.len(),
                    },
                    Capture::Constrained(matcher) => matcher.match_anchored(rest)?,
                    Capture::Wildcard => rest.len(),
                };
                set_value(values, self.param_index, &rest[..len]);
                Some(pos + len)
            }
        }
    }
}

#[inline]
fn set_value<'p>(values: &mut ParamValues<'p>, index: usize, value: &'p str) {
    if index >= values.len() {
        values.resize(index + 1, "");
    }
    values[index] = value;
}

fn merge_values<'p>(values: &mut ParamValues<'p>, scratch: &ParamValues<'p>, from: usize) {
    if values.len() < scratch.len() {
        values.resize(scratch.len(), "");
    }
    if from < scratch.len() {
        values[from..scratch.len()].copy_from_slice(&scratch[from..]);
    }
}
