use std::rc::Rc;

pub type Identifier = Rc<str>;
pub type TermRef = Rc<Term>;

#[derive(PartialEq, Eq, Debug)]
pub enum Term {
    /// `x`
    Var(Identifier),
    /// `\x. t`
    Abs(Identifier, TermRef),
    /// `t t`
    Apply(TermRef, TermRef),
}

impl Term {
    pub fn var(name: impl Into<Identifier>) -> TermRef {
        Term::Var(name.into()).into()
    }

    pub fn lambda(param: impl Into<Identifier>, body: TermRef) -> TermRef {
        Term::Abs(param.into(), body).into()
    }

    pub fn apply(function: TermRef, argument: TermRef) -> TermRef {
        Term::Apply(function, argument).into()
    }

    /// Left-nested application `((head a) b) ...`.
    pub fn apply_all(head: TermRef, args: impl IntoIterator<Item = TermRef>) -> TermRef {
        args.into_iter().fold(head, Term::apply)
    }

    pub fn is_abstraction(&self) -> bool {
        matches!(self, Term::Abs(_, _))
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Position {
            Top,
            Function,
            Argument,
        }
        fn fmt_rec(
            term: &Term,
            position: Position,
            f: &mut std::fmt::Formatter<'_>,
        ) -> std::fmt::Result {
            use Term::*;
            match term {
                Var(name) => f.write_str(name),
                Abs(param, body) => {
                    let wrap = position != Position::Top;
                    if wrap {
                        f.write_str("(")?;
                    }
                    f.write_fmt(format_args!("\\{param}. "))?;
                    fmt_rec(body, Position::Top, f)?;
                    if wrap {
                        f.write_str(")")?;
                    }
                    Ok(())
                }
                Apply(lhs, rhs) => {
                    let wrap = position == Position::Argument;
                    if wrap {
                        f.write_str("(")?;
                    }
                    fmt_rec(lhs, Position::Function, f)?;
                    f.write_str(" ")?;
                    fmt_rec(rhs, Position::Argument, f)?;
                    if wrap {
                        f.write_str(")")?;
                    }
                    Ok(())
                }
            }
        }
        fmt_rec(self, Position::Top, f)
    }
}
