use log::trace;

use super::{Operator, Token, TokenType, HIGHEST_PRIORITY};
use crate::error::{Error, Result};

/// One partial binary calculation: `left operator right`, linked to its
/// neighbors by index.
///
/// `left` is always set. Only the chain's tail may be missing `operator` or
/// `right` while the chain is under construction. As pushed, adjacent
/// calculations alias operand storage (node `i`'s `right` and node `i + 1`'s
/// `left` are the same slot); reduction splices break that aliasing, so
/// solved values are written into the surviving neighbors' slots directly.
#[derive(Debug, Clone, Copy)]
struct Calculation {
    left: usize,
    operator: Option<Operator>,
    right: Option<usize>,
    prev: Option<usize>,
    next: Option<usize>,
}

/// A solvable expression under construction: a doubly linked list of
/// calculations over an arena of operand slots.
///
/// Built incrementally by [`TokenChain::push`], consumed exactly once by
/// [`TokenChain::solve`]. The links are indices into `nodes` and operand
/// values live in `slots`, so unlinking and write-through propagation need
/// no shared mutable references.
#[derive(Debug)]
pub struct TokenChain {
    slots: Vec<f64>,
    nodes: Vec<Calculation>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
    last_type: TokenType,
}

impl Default for TokenChain {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenChain {
    pub fn new() -> Self {
        TokenChain {
            slots: Vec::new(),
            nodes: Vec::new(),
            head: None,
            tail: None,
            len: 0,
            // the first accepted token must be an operand
            last_type: TokenType::Operator,
        }
    }

    /// The type of the last pushed token; seeded as `Operator` so an empty
    /// chain accepts only an operand.
    pub fn last_type(&self) -> TokenType {
        self.last_type
    }

    /// Appends a token, enforcing operand/operator alternation.
    ///
    /// A complete tail whose operator has [`HIGHEST_PRIORITY`] is folded in
    /// place when the next operator arrives, so runs like `2^3^2^4` reuse a
    /// single calculation node.
    pub fn push(&mut self, token: Token) -> Result<()> {
        self.check_type(token.token_type())?;
        self.last_type = token.token_type();

        match token {
            Token::Operand(value) => self.push_operand(value),
            Token::Operator(op) => self.push_operator(op)?,
        }
        Ok(())
    }

    fn check_type(&self, incoming: TokenType) -> Result<()> {
        if self.last_type != incoming {
            return Ok(());
        }
        Err(match incoming {
            TokenType::Operand => Error::MisplacedOperand,
            TokenType::Operator => Error::MisplacedOperator,
        })
    }

    fn push_operand(&mut self, value: f64) {
        match self.tail {
            None => {
                let slot = self.alloc_slot(value);
                let node = self.alloc_node(Calculation {
                    left: slot,
                    operator: None,
                    right: None,
                    prev: None,
                    next: None,
                });
                self.head = Some(node);
                self.tail = Some(node);
                self.len = 1;
            }
            Some(tail) => {
                // alternation guarantees the tail is waiting for its right
                // operand here
                let slot = self.alloc_slot(value);
                self.nodes[tail].right = Some(slot);
            }
        }
    }

    fn push_operator(&mut self, op: Operator) -> Result<()> {
        let Some(tail) = self.tail else {
            return Err(Error::MisplacedOperator);
        };

        let node = self.nodes[tail];
        match (node.operator, node.right) {
            (Some(tail_op), Some(right)) => {
                if tail_op.priority() == HIGHEST_PRIORITY {
                    // eager fold: solve the tail in place and reuse the node
                    let folded = tail_op.apply(self.slots[node.left], self.slots[right])?;
                    self.slots[node.left] = folded;
                    self.nodes[tail].operator = Some(op);
                    self.nodes[tail].right = None;
                } else {
                    // the new node's left aliases the tail's right slot
                    let new = self.alloc_node(Calculation {
                        left: right,
                        operator: Some(op),
                        right: None,
                        prev: Some(tail),
                        next: None,
                    });
                    self.nodes[tail].next = Some(new);
                    self.tail = Some(new);
                    self.len += 1;
                }
            }
            _ => self.nodes[tail].operator = Some(op),
        }
        Ok(())
    }

    /// Reduces the chain to a single scalar.
    ///
    /// Chains of one or two calculations are solved directly. Longer chains
    /// are shortened with repeated left-to-right passes: a calculation whose
    /// operator binds at least as tightly as its successor's is solved, its
    /// value written into the surviving neighbors' operand slots, and the
    /// node unlinked. Equal priorities therefore execute left-to-right. Each
    /// pass is O(n); a strictly increasing priority profile needs O(n)
    /// passes, giving O(n²) worst case.
    pub fn solve(mut self) -> Result<f64> {
        match (self.len, self.head) {
            (0, _) | (_, None) => Err(Error::EmptyExpression),
            (1, Some(head)) => self.solve_single(head),
            (2, Some(head)) => self.solve_pair(head),
            (_, Some(_)) => {
                self.shorten()?;
                match self.head {
                    Some(head) => self.solve_node(head),
                    None => Err(Error::EmptyExpression),
                }
            }
        }
    }

    fn solve_single(&self, idx: usize) -> Result<f64> {
        let node = self.nodes[idx];
        match (node.operator, node.right) {
            (None, _) => Ok(self.slots[node.left]),
            (Some(_), None) => Err(Error::TrailingOperator),
            (Some(op), Some(right)) => op.apply(self.slots[node.left], self.slots[right]),
        }
    }

    fn solve_pair(&self, first: usize) -> Result<f64> {
        let Some(second) = self.nodes[first].next else {
            return Err(Error::EmptyExpression);
        };
        let second_node = self.nodes[second];
        let second_op = second_node.operator.ok_or(Error::TrailingOperator)?;
        let second_right = second_node.right.ok_or(Error::TrailingOperator)?;

        if self.priority(first) >= self.priority(second) {
            // e.g. 2*3+2: solve the first calculation, combine rightwards
            let left = self.solve_node(first)?;
            second_op.apply(left, self.slots[second_right])
        } else {
            // e.g. 2+3*2: solve the second calculation, combine leftwards
            let first_node = self.nodes[first];
            let first_op = first_node.operator.ok_or(Error::TrailingOperator)?;
            let right = self.solve_node(second)?;
            first_op.apply(self.slots[first_node.left], right)
        }
    }

    fn shorten(&mut self) -> Result<()> {
        while self.len > 1 {
            trace!("reduction pass over {} calculations", self.len);
            let mut cursor = self.head;
            while let Some(cur) = cursor {
                match self.nodes[cur].next {
                    Some(next) => {
                        if self.priority(cur) < self.priority(next) {
                            cursor = Some(next);
                            continue;
                        }
                        let solved = self.solve_node(cur)?;
                        let prev = self.nodes[cur].prev;
                        // the value must land in the survivors' own operand
                        // slots; an earlier splice may have re-pointed them
                        // away from cur's slots
                        self.slots[self.nodes[next].left] = solved;
                        match prev {
                            None => self.head = Some(next),
                            Some(prev) => {
                                if let Some(right) = self.nodes[prev].right {
                                    self.slots[right] = solved;
                                }
                                self.nodes[prev].next = Some(next);
                            }
                        }
                        self.nodes[next].prev = prev;
                        self.len -= 1;
                        cursor = Some(next);
                    }
                    None => {
                        // cur is the tail; fold its value into the predecessor
                        if let Some(prev) = self.nodes[cur].prev {
                            let solved = self.solve_node(cur)?;
                            if let Some(right) = self.nodes[prev].right {
                                self.slots[right] = solved;
                            }
                            self.nodes[prev].next = None;
                            self.nodes[cur].prev = None;
                            self.tail = Some(prev);
                            self.len -= 1;
                        }
                        cursor = None;
                    }
                }
            }
        }
        Ok(())
    }

    fn solve_node(&self, idx: usize) -> Result<f64> {
        let node = self.nodes[idx];
        let op = node.operator.ok_or(Error::TrailingOperator)?;
        let right = node.right.ok_or(Error::TrailingOperator)?;
        op.apply(self.slots[node.left], self.slots[right])
    }

    fn priority(&self, idx: usize) -> u8 {
        self.nodes[idx].operator.map_or(0, Operator::priority)
    }

    fn alloc_slot(&mut self, value: f64) -> usize {
        self.slots.push(value);
        self.slots.len() - 1
    }

    fn alloc_node(&mut self, node: Calculation) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}
