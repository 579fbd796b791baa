use thiserror::Error;

use crate::{
    ast::{Term, TermRef},
    subst::substitute,
};

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("No normal form reached within {steps} steps; last term: {last}")]
    DivergenceDetected { steps: usize, last: String },
}
pub type Result<T> = std::result::Result<T, EvalError>;

#[derive(Debug, Error)]
#[error("Unknown strategy `{0}`, expected `normal` or `weak`")]
pub struct UnknownStrategy(String);

/// Which redexes are eligible. Both strategies pick the leftmost-outermost one.
#[derive(PartialEq, Eq, Clone, Copy, Default, derive_more::Display, Debug)]
pub enum Strategy {
    /// Reduces to full normal form, descending under binders once no outer
    /// redex is left.
    #[default]
    #[display(fmt = "normal")]
    Normal,
    /// Never reduces inside an abstraction body.
    #[display(fmt = "weak")]
    Weak,
}

impl std::str::FromStr for Strategy {
    type Err = UnknownStrategy;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "normal" | "n" => Ok(Strategy::Normal),
            "weak" | "w" => Ok(Strategy::Weak),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

/// Contracts exactly one redex, or returns `None` if there is none.
pub fn reduce(term: &Term, strategy: Strategy) -> Option<TermRef> {
    use Term::*;
    match term {
        Var(_) => None,
        Abs(param, body) => match strategy {
            Strategy::Weak => None,
            Strategy::Normal => Some(Term::lambda(param.clone(), reduce(body, strategy)?)),
        },
        Apply(lhs, rhs) => {
            // E-APPABS
            if let Abs(param, body) = lhs.as_ref() {
                return Some(substitute(param, body, rhs));
            }
            // E-APP1
            if let Some(lhs) = reduce(lhs, strategy) {
                return Some(Term::apply(lhs, rhs.clone()));
            }
            // E-APP2
            reduce(rhs, strategy).map(|rhs| Term::apply(lhs.clone(), rhs))
        }
    }
}

/// Like [`reduce`], but hands back (a clone of) `term` itself when it is
/// already in normal form.
pub fn reduce_once(term: &TermRef, strategy: Strategy) -> TermRef {
    reduce(term, strategy).unwrap_or_else(|| term.clone())
}

pub fn is_normal_form(term: &Term, strategy: Strategy) -> bool {
    use Term::*;
    match term {
        Var(_) => true,
        Abs(_, body) => strategy == Strategy::Weak || is_normal_form(body, strategy),
        Apply(lhs, rhs) => {
            !lhs.is_abstraction() && is_normal_form(lhs, strategy) && is_normal_form(rhs, strategy)
        }
    }
}

#[derive(Clone, Debug)]
enum TraceState {
    Start(TermRef),
    Running(TermRef),
    Finished,
}

/// The sequence of terms visited while reducing: the initial term followed by
/// one term per step. Ends at a normal form and never ends otherwise.
#[derive(Clone, Debug)]
pub struct Trace {
    state: TraceState,
    strategy: Strategy,
}

pub fn trace(term: TermRef, strategy: Strategy) -> Trace {
    Trace {
        state: TraceState::Start(term),
        strategy,
    }
}

impl Iterator for Trace {
    type Item = TermRef;
    fn next(&mut self) -> Option<TermRef> {
        let (state, item) = match std::mem::replace(&mut self.state, TraceState::Finished) {
            TraceState::Start(term) => (TraceState::Running(term.clone()), Some(term)),
            TraceState::Running(term) => match reduce(&term, self.strategy) {
                Some(next) => {
                    tracing::debug!(term = %next, "reduced");
                    (TraceState::Running(next.clone()), Some(next))
                }
                None => {
                    tracing::debug!(term = %term, "reached normal form");
                    (TraceState::Finished, None)
                }
            },
            TraceState::Finished => (TraceState::Finished, None),
        };
        self.state = state;
        item
    }
}

#[derive(Debug)]
pub struct Normalized {
    pub term: TermRef,
    pub steps: usize,
}

/// Reduces `term` until no redex is left, giving up after `max_steps`
/// reductions.
pub fn normalize(term: TermRef, strategy: Strategy, max_steps: usize) -> Result<Normalized> {
    let mut steps = 0;
    let mut term = term;
    while let Some(next) = reduce(&term, strategy) {
        if steps == max_steps {
            tracing::warn!(steps, "step limit exceeded");
            return Err(EvalError::DivergenceDetected {
                steps,
                last: term.to_string(),
            });
        }
        steps += 1;
        term = next;
    }
    tracing::info!(steps, term = %term, "normalized");
    Ok(Normalized { term, steps })
}

#[cfg(test)]
mod test {
    use std::rc::Rc;

    use super::*;

    macro_rules! var {
        ($x:expr) => {
            Term::var($x)
        };
    }
    macro_rules! lambda {
        ($x:expr, $body:expr) => {
            Term::lambda($x, $body)
        };
    }
    macro_rules! apply {
        ($lhs:expr, $rhs:expr) => {
            Term::apply($lhs, $rhs)
        };
        ($lhs:expr, $rhs:expr, $($rest:expr),+) => {
            apply!(Term::apply($lhs, $rhs), $($rest),+)
        };
    }

    fn id() -> TermRef {
        lambda!("x", var!("x"))
    }
    fn tru() -> TermRef {
        lambda!("t", lambda!("f", var!("t")))
    }
    fn omega() -> TermRef {
        let half = lambda!("x", apply!(var!("x"), var!("x")));
        apply!(half.clone(), half)
    }

    fn normal_forms() -> Vec<TermRef> {
        vec![
            var!("a"),
            id(),
            tru(),
            apply!(var!("a"), var!("b")),
            apply!(var!("a"), id()),
            lambda!("z", apply!(var!("z"), lambda!("w", var!("w")))),
        ]
    }

    #[test]
    fn test_known_reductions() {
        let term = apply!(tru(), apply!(id(), var!("a")), var!("b"));
        for strategy in [Strategy::Normal, Strategy::Weak] {
            let steps: Vec<_> = trace(term.clone(), strategy)
                .map(|t| t.to_string())
                .collect();
            assert_eq!(
                steps,
                [
                    "(\\t. \\f. t) ((\\x. x) a) b",
                    "(\\f. (\\x. x) a) b",
                    "(\\x. x) a",
                    "a"
                ]
            );
        }
    }

    #[test]
    fn test_idempotence_at_normal_form() {
        for term in normal_forms() {
            assert!(is_normal_form(&term, Strategy::Normal));
            assert_eq!(reduce(&term, Strategy::Normal), None);
            let same = reduce_once(&term, Strategy::Normal);
            assert!(Rc::ptr_eq(&same, &term));
            assert_eq!(same, term);
        }
    }

    #[test]
    fn test_progress() {
        let reducible = vec![
            apply!(id(), var!("a")),
            lambda!("z", apply!(id(), var!("z"))),
            apply!(var!("f"), apply!(id(), var!("a"))),
        ];
        for term in reducible {
            assert!(!is_normal_form(&term, Strategy::Normal));
            assert_ne!(reduce_once(&term, Strategy::Normal), term);
        }
    }

    #[test]
    fn test_strategy_under_binder() {
        let term = lambda!("z", apply!(id(), var!("z")));
        assert_eq!(
            reduce(&term, Strategy::Normal),
            Some(lambda!("z", var!("z")))
        );
        assert_eq!(reduce(&term, Strategy::Weak), None);
        assert!(is_normal_form(&term, Strategy::Weak));
    }

    #[test]
    fn test_outermost_redex_first() {
        // The outer redex wins over the one inside the abstraction.
        let term = apply!(lambda!("y", apply!(id(), var!("y"))), var!("a"));
        assert_eq!(
            reduce(&term, Strategy::Normal),
            Some(apply!(id(), var!("a")))
        );
    }

    #[test]
    fn test_stuck_application_reduces_argument() {
        let term = apply!(var!("f"), apply!(id(), var!("a")));
        assert_eq!(
            reduce(&term, Strategy::Weak),
            Some(apply!(var!("f"), var!("a")))
        );
    }

    #[test]
    fn test_beta_avoids_capture() {
        // (\x. \y. x y) y
        let term = apply!(lambda!("x", lambda!("y", apply!(var!("x"), var!("y")))), var!("y"));
        assert_eq!(
            reduce(&term, Strategy::Normal),
            Some(lambda!("y1", apply!(var!("y"), var!("y1"))))
        );
    }

    #[test]
    fn test_normal_order_discards_divergent_argument() {
        let k = lambda!("x", lambda!("y", var!("x")));
        let result = normalize(apply!(k, var!("a"), omega()), Strategy::Normal, 10).unwrap();
        assert_eq!(result.term, var!("a"));
        assert_eq!(result.steps, 2);
    }

    #[test]
    fn test_input_not_mutated() {
        let term = apply!(tru(), apply!(id(), var!("a")), var!("b"));
        let snapshot = apply!(tru(), apply!(id(), var!("a")), var!("b"));
        let _ = normalize(term.clone(), Strategy::Normal, 10).unwrap();
        assert_eq!(term, snapshot);
    }

    #[test]
    fn test_divergence_containment() {
        // Omega steps to itself, so no structural fixpoint test may be used to stop.
        let term = omega();
        assert_eq!(trace(term.clone(), Strategy::Normal).take(1000).count(), 1000);
        assert!(trace(term.clone(), Strategy::Normal)
            .take(1000)
            .all(|t| t == term));
        match normalize(term, Strategy::Normal, 1000) {
            Err(EvalError::DivergenceDetected { steps, last }) => {
                assert_eq!(steps, 1000);
                assert_eq!(last, "(\\x. x x) (\\x. x x)");
            }
            Ok(n) => panic!("unexpected normal form {}", n.term),
        }
    }

    #[test]
    fn test_trace_is_restartable() {
        let trace = trace(apply!(id(), var!("a")), Strategy::Normal);
        let first: Vec<_> = trace.clone().collect();
        let second: Vec<_> = trace.collect();
        assert_eq!(first, second);
        assert_eq!(first, [apply!(id(), var!("a")), var!("a")]);
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("normal".parse::<Strategy>().unwrap(), Strategy::Normal);
        assert_eq!(" weak ".parse::<Strategy>().unwrap(), Strategy::Weak);
        assert!("eager".parse::<Strategy>().is_err());
        assert_eq!(Strategy::Weak.to_string(), "weak");
    }
}
