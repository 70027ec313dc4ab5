//! The operator-precedence tree builder, `spec.md` §4.7. The parser hands
//! the checker a head atom plus a flat `(operator, atom)*` tail
//! ([`ExpressionAst`]); this module rebuilds it into a proper tree using a
//! small precedence/associativity/group table, raising
//! `OperationRequiresParenthesization` wherever the input is ambiguous.

use crate::ast::{ExpressionAst, ExpressionAtomAst, OperatorAst};
use crate::elab::context::ProgramContext;
use crate::elab::error::{OperationRequiresParenthesization, SemanticError, SemanticResult};
use crate::nom_tools::SourceLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assoc {
    Left,
    Right,
    NonAssoc,
}

#[derive(Debug, Clone, Copy)]
struct OpInfo {
    precedence: u8,
    assoc: Assoc,
    group: &'static str,
}

fn op_info(op: OperatorAst) -> OpInfo {
    match op {
        OperatorAst::Implies => OpInfo { precedence: 0, assoc: Assoc::Right, group: "implies" },
        OperatorAst::And => OpInfo { precedence: 0, assoc: Assoc::Left, group: "and" },
        OperatorAst::Or => OpInfo { precedence: 0, assoc: Assoc::Left, group: "or" },
        OperatorAst::Lt => OpInfo { precedence: 1, assoc: Assoc::Left, group: "<" },
        OperatorAst::Gt => OpInfo { precedence: 1, assoc: Assoc::Left, group: ">" },
        OperatorAst::Le => OpInfo { precedence: 1, assoc: Assoc::Left, group: "<" },
        OperatorAst::Ge => OpInfo { precedence: 1, assoc: Assoc::Left, group: ">" },
        OperatorAst::Eq => OpInfo { precedence: 1, assoc: Assoc::NonAssoc, group: "==" },
        OperatorAst::Neq => OpInfo { precedence: 1, assoc: Assoc::NonAssoc, group: "!=" },
        OperatorAst::Add => OpInfo { precedence: 2, assoc: Assoc::NonAssoc, group: "+" },
        OperatorAst::Sub => OpInfo { precedence: 2, assoc: Assoc::NonAssoc, group: "-" },
    }
}

/// A rebuilt expression tree. No precedence information survives past this
/// point — every remaining ambiguity has already been rejected.
#[derive(Debug, Clone)]
pub enum ExprTree {
    Atom(ExpressionAtomAst),
    Binary {
        op: OperatorAst,
        left: Box<ExprTree>,
        right: Box<ExprTree>,
    },
}

impl ExprTree {
    /// The span this subtree covers, used to anchor diagnostics raised
    /// while lowering it (`spec.md` §4.8) — computed on demand rather than
    /// stored, since every atom already carries its own location.
    pub fn location(&self) -> SourceLocation {
        match self {
            ExprTree::Atom(atom) => atom.location(),
            ExprTree::Binary { left, right, .. } => {
                let l = left.location();
                let r = right.location();
                SourceLocation {
                    file_id: l.file_id,
                    offset: l.offset,
                    length: (r.offset + r.length).saturating_sub(l.offset),
                }
            }
        }
    }
}

enum JoinFault {
    Ice,
    Unordered,
    NonAssociative,
}

fn verify_join(op: OperatorAst, other: &ExprTree) -> Result<(), JoinFault> {
    if let ExprTree::Binary { op: other_op, .. } = other {
        let a = op_info(op);
        let b = op_info(*other_op);
        if b.precedence < a.precedence {
            return Err(JoinFault::Ice);
        }
        if b.precedence == a.precedence {
            if a.group != b.group {
                return Err(JoinFault::Unordered);
            }
            if a.assoc == Assoc::NonAssoc || b.assoc == Assoc::NonAssoc {
                return Err(JoinFault::NonAssociative);
            }
        }
    }
    Ok(())
}

fn fault_to_error(fault: JoinFault, location: SourceLocation, program: &ProgramContext) -> SemanticError {
    match fault {
        JoinFault::Ice => SemanticError::Ice("operator-precedence fold produced a lower-precedence child".to_string()),
        JoinFault::Unordered => SemanticError::from(OperationRequiresParenthesization {
            reason: "unordered".to_string(),
            position: location.range(),
            code: program.source_code(location.file_id),
        }),
        JoinFault::NonAssociative => SemanticError::from(OperationRequiresParenthesization {
            reason: "non-associative".to_string(),
            position: location.range(),
            code: program.source_code(location.file_id),
        }),
    }
}

/// Precedence-climbing fold over the flat `(atom, operator)*` sequence.
/// `pos` indexes into `atoms`; `ops[i]` is the operator between
/// `atoms[i]` and `atoms[i+1]`.
fn parse(atoms: &[ExpressionAtomAst], ops: &[OperatorAst], pos: &mut usize, min_prec: u8, location: SourceLocation, program: &ProgramContext) -> SemanticResult<ExprTree> {
    let mut left = ExprTree::Atom(atoms[*pos].clone());
    *pos += 1;

    while *pos - 1 < ops.len() {
        let op = ops[*pos - 1];
        let info = op_info(op);
        if info.precedence < min_prec {
            break;
        }
        let next_min = if info.assoc == Assoc::Left { info.precedence + 1 } else { info.precedence };
        let right = parse(atoms, ops, pos, next_min, location, program)?;

        verify_join(op, &left).map_err(|f| fault_to_error(f, location, program))?;
        verify_join(op, &right).map_err(|f| fault_to_error(f, location, program))?;

        left = ExprTree::Binary { op, left: Box::new(left), right: Box::new(right) };
    }

    Ok(left)
}

/// Rebuilds `expr`'s flat operator list into a tree, rejecting ambiguous
/// combinations per `spec.md` §4.7.
pub fn build_tree(expr: &ExpressionAst, program: &ProgramContext) -> SemanticResult<ExprTree> {
    if expr.tail.is_empty() {
        return Ok(ExprTree::Atom((*expr.head).clone()));
    }

    let mut atoms = Vec::with_capacity(expr.tail.len() + 1);
    atoms.push((*expr.head).clone());
    let mut ops = Vec::with_capacity(expr.tail.len());
    for (op, atom) in &expr.tail {
        ops.push(*op);
        atoms.push(atom.clone());
    }

    let mut pos = 0;
    let tree = parse(&atoms, &ops, &mut pos, 0, expr.location, program)?;
    if pos != atoms.len() {
        return Err(SemanticError::Ice("operator-precedence fold left atoms unconsumed".to_string()));
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Spanned;

    fn loc() -> SourceLocation {
        SourceLocation::synthetic()
    }

    fn ident(name: &str) -> ExpressionAtomAst {
        ExpressionAtomAst::Identifier(Spanned::new(name.to_string(), loc()))
    }

    fn expr(head: ExpressionAtomAst, tail: Vec<(OperatorAst, ExpressionAtomAst)>) -> ExpressionAst {
        ExpressionAst { head: Box::new(head), tail, location: loc() }
    }

    #[test]
    fn left_associative_chain_nests_to_the_left() {
        let program = ProgramContext::new();
        let e = expr(ident("a"), vec![(OperatorAst::And, ident("b")), (OperatorAst::And, ident("c"))]);
        let tree = build_tree(&e, &program).unwrap();
        match tree {
            ExprTree::Binary { op: OperatorAst::And, left, right } => {
                assert!(matches!(*right, ExprTree::Atom(_)));
                assert!(matches!(*left, ExprTree::Binary { op: OperatorAst::And, .. }));
            }
            _ => panic!("expected a left-nested And tree"),
        }
    }

    #[test]
    fn right_associative_chain_nests_to_the_right() {
        let program = ProgramContext::new();
        let e = expr(ident("a"), vec![(OperatorAst::Implies, ident("b")), (OperatorAst::Implies, ident("c"))]);
        let tree = build_tree(&e, &program).unwrap();
        match tree {
            ExprTree::Binary { op: OperatorAst::Implies, left, right } => {
                assert!(matches!(*left, ExprTree::Atom(_)));
                assert!(matches!(*right, ExprTree::Binary { op: OperatorAst::Implies, .. }));
            }
            _ => panic!("expected a right-nested Implies tree"),
        }
    }

    #[test]
    fn mixed_groups_at_equal_precedence_require_parens() {
        let program = ProgramContext::new();
        let e = expr(ident("a"), vec![(OperatorAst::And, ident("b")), (OperatorAst::Implies, ident("c"))]);
        let err = build_tree(&e, &program).unwrap_err();
        assert!(matches!(err, SemanticError::OperationRequiresParenthesization(ref e) if e.reason == "unordered"));
    }

    #[test]
    fn repeated_non_associative_operator_requires_parens() {
        let program = ProgramContext::new();
        let e = expr(ident("a"), vec![(OperatorAst::Eq, ident("b")), (OperatorAst::Eq, ident("c"))]);
        let err = build_tree(&e, &program).unwrap_err();
        assert!(matches!(err, SemanticError::OperationRequiresParenthesization(ref e) if e.reason == "non-associative"));
    }

    #[test]
    fn le_joins_the_lt_group() {
        let program = ProgramContext::new();
        let e = expr(ident("a"), vec![(OperatorAst::Lt, ident("b")), (OperatorAst::Le, ident("c"))]);
        let tree = build_tree(&e, &program).unwrap();
        assert!(matches!(tree, ExprTree::Binary { op: OperatorAst::Le, .. }));
    }
}
