//! Structural matching of CST children against slot descriptions.
//!
//! A node's significant children (trivia dropped) are consumed left to right
//! by [`SlotAutomaton`]: one cursor over the slots, one over the children, one
//! child of lookahead. A slot is required, optional, or required only when
//! the previously taken child belongs to a given set (a type after `:`).
//! An optional slot that does not match is skipped without consuming the
//! child, so a later slot may take it. Children left over once every slot
//! has been visited are an error.

use crate::Result;
use crate::diagnostics::{AnalysisCode, ErrorCode};
use crate::parser::{KindSet, SyntaxElement, SyntaxKind, SyntaxNode};

use super::AstBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Optional,
    /// Required when the previously taken child is in the set.
    RequiredAfter(KindSet),
}

/// What the automaton needs to know about a slot.
pub trait SlotSpec {
    fn accepts(&self) -> KindSet;
    fn requirement(&self) -> Requirement;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `child` fills `slot`.
    Take { slot: usize, child: usize },
    /// Optional `slot` left empty.
    Skip { slot: usize },
    /// Required `slot` but no children remain.
    Missing { slot: usize },
    /// Required `slot` but `child` has the wrong kind.
    Mismatch { slot: usize, child: usize },
    /// Every slot visited, `child` remains.
    Leftover { child: usize },
    Done,
}

impl Step {
    fn is_final(self) -> bool {
        matches!(
            self,
            Step::Missing { .. } | Step::Mismatch { .. } | Step::Leftover { .. } | Step::Done
        )
    }
}

/// Linear automaton over slots and child kinds.
pub struct SlotAutomaton<'a, S> {
    slots: &'a [S],
    kinds: &'a [SyntaxKind],
    slot: usize,
    child: usize,
    previous: Option<SyntaxKind>,
    finished: Option<Step>,
}

impl<'a, S: SlotSpec> SlotAutomaton<'a, S> {
    pub fn new(slots: &'a [S], kinds: &'a [SyntaxKind]) -> Self {
        Self {
            slots,
            kinds,
            slot: 0,
            child: 0,
            previous: None,
            finished: None,
        }
    }

    /// Index of the last child taken, if any.
    pub fn last_taken(&self) -> Option<usize> {
        self.child.checked_sub(1)
    }

    /// Advances by one slot. Once a final step is returned it repeats.
    pub fn step(&mut self) -> Step {
        if let Some(step) = self.finished {
            return step;
        }
        let step = self.advance();
        if step.is_final() {
            self.finished = Some(step);
        }
        step
    }

    fn advance(&mut self) -> Step {
        let Some(spec) = self.slots.get(self.slot) else {
            return match self.child < self.kinds.len() {
                true => Step::Leftover { child: self.child },
                false => Step::Done,
            };
        };
        let slot = self.slot;
        let required = match spec.requirement() {
            Requirement::Required => true,
            Requirement::Optional => false,
            Requirement::RequiredAfter(set) => self.previous.is_some_and(|kind| set.contains(kind)),
        };
        match self.kinds.get(self.child) {
            Some(&kind) if spec.accepts().contains(kind) => {
                let child = self.child;
                self.previous = Some(kind);
                self.slot += 1;
                self.child += 1;
                Step::Take { slot, child }
            }
            Some(_) if required => Step::Mismatch {
                slot,
                child: self.child,
            },
            None if required => Step::Missing { slot },
            _ => {
                self.slot += 1;
                Step::Skip { slot }
            }
        }
    }
}

/// Signature of a record slot action.
pub type SlotAction<T> =
    for<'b, 'src> fn(&'b mut AstBuilder<'src>, &mut T, &SyntaxElement) -> Result<()>;

/// Slot whose action writes into a record of type `T`.
pub struct Slot<T> {
    pub accepts: KindSet,
    pub requirement: Requirement,
    pub code: AnalysisCode,
    pub action: SlotAction<T>,
}

impl<T> Slot<T> {
    pub fn required(accepts: KindSet, code: AnalysisCode, action: SlotAction<T>) -> Self {
        Self {
            accepts,
            requirement: Requirement::Required,
            code,
            action,
        }
    }

    pub fn optional(accepts: KindSet, action: SlotAction<T>) -> Self {
        Self {
            accepts,
            requirement: Requirement::Optional,
            code: AnalysisCode::UnexpectedNode,
            action,
        }
    }

    /// Required when the previous child is `after`, otherwise optional.
    pub fn after(
        after: SyntaxKind,
        accepts: KindSet,
        code: AnalysisCode,
        action: SlotAction<T>,
    ) -> Self {
        Self {
            accepts,
            requirement: Requirement::RequiredAfter(KindSet::single(after)),
            code,
            action,
        }
    }

    /// A punctuation or keyword token that carries no data.
    pub fn token(kind: SyntaxKind, code: AnalysisCode) -> Self {
        Self::required(KindSet::single(kind), code, skip)
    }

    pub fn optional_token(kind: SyntaxKind) -> Self {
        Self::optional(KindSet::single(kind), skip)
    }
}

impl<T> SlotSpec for Slot<T> {
    fn accepts(&self) -> KindSet {
        self.accepts
    }

    fn requirement(&self) -> Requirement {
        self.requirement
    }
}

/// Action for slots that only check presence.
pub fn skip<T>(_: &mut AstBuilder<'_>, _: &mut T, _: &SyntaxElement) -> Result<()> {
    Ok(())
}

/// Signature of a positional slot handler.
pub type SlotHandler<R> = for<'b, 'src> fn(&'b mut AstBuilder<'src>, &SyntaxElement) -> Result<R>;

/// Slot whose handler produces one positional result.
pub struct PositionalSlot<R> {
    pub accepts: KindSet,
    pub requirement: Requirement,
    pub code: AnalysisCode,
    pub handler: SlotHandler<R>,
}

impl<R> PositionalSlot<R> {
    pub fn required(accepts: KindSet, code: AnalysisCode, handler: SlotHandler<R>) -> Self {
        Self {
            accepts,
            requirement: Requirement::Required,
            code,
            handler,
        }
    }

    pub fn optional(accepts: KindSet, handler: SlotHandler<R>) -> Self {
        Self {
            accepts,
            requirement: Requirement::Optional,
            code: AnalysisCode::UnexpectedNode,
            handler,
        }
    }
}

impl<R> SlotSpec for PositionalSlot<R> {
    fn accepts(&self) -> KindSet {
        self.accepts
    }

    fn requirement(&self) -> Requirement {
        self.requirement
    }
}

/// Shape of a homogeneous child list: `open item (sep item)* sep? close`.
#[derive(Debug, Clone, Copy)]
pub struct SeparatedList {
    pub open: Option<SyntaxKind>,
    pub close: Option<SyntaxKind>,
    pub separator: Option<SyntaxKind>,
    pub items: KindSet,
    /// Reported for a child that is neither an item nor punctuation.
    pub code: AnalysisCode,
}

impl SeparatedList {
    /// `open item, item, ... close`
    pub const fn delimited(
        open: SyntaxKind,
        close: SyntaxKind,
        items: KindSet,
        code: AnalysisCode,
    ) -> Self {
        Self {
            open: Some(open),
            close: Some(close),
            separator: Some(SyntaxKind::Comma),
            items,
            code,
        }
    }

    /// `{ item item ... }`
    pub const fn body(items: KindSet, code: AnalysisCode) -> Self {
        Self {
            open: Some(SyntaxKind::BraceOpen),
            close: Some(SyntaxKind::BraceClose),
            separator: None,
            items,
            code,
        }
    }

    /// `item, item, ...` with no delimiters.
    pub const fn bare(items: KindSet, code: AnalysisCode) -> Self {
        Self {
            open: None,
            close: None,
            separator: Some(SyntaxKind::Comma),
            items,
            code,
        }
    }

    /// Replaces the opening token.
    pub const fn opened_by(mut self, open: SyntaxKind) -> Self {
        self.open = Some(open);
        self
    }
}

/// Non-trivia children of a node.
pub fn significant_children(node: &SyntaxNode) -> Vec<SyntaxElement> {
    node.children_with_tokens()
        .filter(|child| !child.kind().is_trivia())
        .collect()
}

/// Detail text for a shape error. Templates that already say what was
/// expected only need what was found.
fn shape_detail(code: AnalysisCode, expected: KindSet, found: &str) -> String {
    let found_only =
        code == AnalysisCode::UnexpectedNode || code.custom_message().contains("found {}");
    match found_only {
        true => found.to_owned(),
        false => format!("{}, found {found}", expected.describe()),
    }
}

impl<'src> AstBuilder<'src> {
    /// Matches `node`'s children against `slots`, letting each slot's action
    /// fill `record`.
    pub fn match_record<T>(
        &mut self,
        node: &SyntaxNode,
        slots: &[Slot<T>],
        record: &mut T,
    ) -> Result<()> {
        let children = significant_children(node);
        let kinds: Vec<SyntaxKind> = children.iter().map(SyntaxElement::kind).collect();
        let mut automaton = SlotAutomaton::new(slots, &kinds);
        loop {
            match automaton.step() {
                Step::Take { slot, child } => {
                    (slots[slot].action)(self, record, &children[child])?;
                }
                Step::Skip { .. } => {}
                Step::Done => return Ok(()),
                step => {
                    let last = automaton.last_taken().map(|i| &children[i]);
                    return Err(self.shape_error(node, &children, last, step, |slot| {
                        (slots[slot].code, slots[slot].accepts)
                    }));
                }
            }
        }
    }

    /// Matches `node`'s children against `slots`, collecting one result per
    /// slot (`None` for skipped optional slots).
    pub fn match_positional<R>(
        &mut self,
        node: &SyntaxNode,
        slots: &[PositionalSlot<R>],
    ) -> Result<Vec<Option<R>>> {
        let children = significant_children(node);
        let kinds: Vec<SyntaxKind> = children.iter().map(SyntaxElement::kind).collect();
        let mut automaton = SlotAutomaton::new(slots, &kinds);
        let mut results = Vec::with_capacity(slots.len());
        loop {
            match automaton.step() {
                Step::Take { slot, child } => {
                    results.push(Some((slots[slot].handler)(self, &children[child])?));
                }
                Step::Skip { .. } => results.push(None),
                Step::Done => return Ok(results),
                step => {
                    let last = automaton.last_taken().map(|i| &children[i]);
                    return Err(self.shape_error(node, &children, last, step, |slot| {
                        (slots[slot].code, slots[slot].accepts)
                    }));
                }
            }
        }
    }

    /// Walks a homogeneous list, calling `item` for each item child.
    pub fn match_list<R>(
        &mut self,
        node: &SyntaxNode,
        list: &SeparatedList,
        mut item: impl FnMut(&mut Self, &SyntaxElement) -> Result<R>,
    ) -> Result<Vec<R>> {
        let children = significant_children(node);
        let mut rest = children.iter().peekable();
        let mut items = Vec::new();

        if let Some(open) = list.open {
            match rest.next() {
                Some(child) if child.kind() == open => {}
                Some(child) => {
                    return Err(self.delimiter_error(child, open, child.kind().describe()));
                }
                None => {
                    return Err(self.delimiter_error(
                        &node.clone().into(),
                        open,
                        format!("end of {}", node.kind().describe()),
                    ));
                }
            }
        }

        let mut expect_item = true;
        loop {
            let Some(child) = rest.next() else {
                return match list.close {
                    Some(close) => {
                        let at = children.last().cloned().unwrap_or_else(|| node.clone().into());
                        let found = format!("end of {}", node.kind().describe());
                        Err(self.delimiter_error(&at, close, found))
                    }
                    None => Ok(items),
                };
            };
            let kind = child.kind();
            if Some(kind) == list.close {
                if let Some(extra) = rest.next() {
                    return Err(self.unexpected(extra));
                }
                return Ok(items);
            }
            match list.separator {
                Some(separator) if !expect_item => {
                    if kind != separator {
                        return Err(self.delimiter_error(child, separator, kind.describe()));
                    }
                    expect_item = true;
                }
                _ => {
                    if !list.items.contains(kind) {
                        let detail = shape_detail(list.code, list.items, kind.describe());
                        return Err(self.analysis_error(list.code, child, detail));
                    }
                    items.push(item(self, child)?);
                    expect_item = false;
                }
            }
        }
    }

    fn delimiter_error(
        &self,
        at: &SyntaxElement,
        expected: SyntaxKind,
        found: impl AsRef<str>,
    ) -> crate::Error {
        let detail = format!("{}, found {}", expected.describe(), found.as_ref());
        self.analysis_error(AnalysisCode::ExpectedDelimiter, at, detail)
    }

    fn shape_error(
        &self,
        node: &SyntaxNode,
        children: &[SyntaxElement],
        last: Option<&SyntaxElement>,
        step: Step,
        spec: impl Fn(usize) -> (AnalysisCode, KindSet),
    ) -> crate::Error {
        match step {
            Step::Missing { slot } => {
                let (code, accepts) = spec(slot);
                let found = format!("end of {}", node.kind().describe());
                let at = last.cloned().unwrap_or_else(|| node.clone().into());
                self.analysis_error(code, &at, shape_detail(code, accepts, &found))
            }
            Step::Mismatch { slot, child } => {
                let (code, accepts) = spec(slot);
                let found = children[child].kind().describe();
                self.analysis_error(code, &children[child], shape_detail(code, accepts, found))
            }
            Step::Leftover { child } => self.unexpected(&children[child]),
            Step::Take { .. } | Step::Skip { .. } | Step::Done => {
                unreachable!("shape_error called with a non-failing step")
            }
        }
    }
}
