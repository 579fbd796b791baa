use std::cell::OnceCell;

use rpds::HashTrieSet;

use crate::ast::{Identifier, Term, TermRef};

pub type VarSet = HashTrieSet<Identifier>;

pub fn free_variables(term: &Term) -> VarSet {
    use Term::*;
    match term {
        Var(x) => VarSet::new().insert(x.clone()),
        Abs(x, body) => free_variables(body).remove(&**x),
        Apply(lhs, rhs) => union(free_variables(lhs), &free_variables(rhs)),
    }
}

fn union(mut lhs: VarSet, rhs: &VarSet) -> VarSet {
    for x in rhs.iter() {
        lhs.insert_mut(x.clone());
    }
    lhs
}

pub fn occurs_free(name: &str, term: &Term) -> bool {
    use Term::*;
    match term {
        Var(x) => &**x == name,
        Abs(x, body) => &**x != name && occurs_free(name, body),
        Apply(lhs, rhs) => occurs_free(name, lhs) || occurs_free(name, rhs),
    }
}

/// Picks `base` with its numeric suffix replaced by the smallest counter
/// (starting from 1) that is not in `avoid`, e.g. `y` -> `y1`, `y1` -> `y2`.
pub fn fresh_name(base: &str, avoid: &VarSet) -> Identifier {
    let stem = base.trim_end_matches(|c: char| c.is_ascii_digit());
    let mut counter = 1usize;
    loop {
        let candidate = format!("{stem}{counter}");
        if !avoid.contains(candidate.as_str()) {
            return candidate.into();
        }
        counter += 1;
    }
}

struct Substitution<'a> {
    param: &'a str,
    value: &'a TermRef,
    value_free: OnceCell<VarSet>,
}

impl Substitution<'_> {
    /// Only needed once a binder sits above a free occurrence of the parameter.
    fn value_free(&self) -> &VarSet {
        self.value_free.get_or_init(|| free_variables(self.value))
    }

    /// `None` when `term` has no free occurrence of the parameter, so callers
    /// can keep the original subtree.
    fn rec(&self, term: &Term) -> Option<TermRef> {
        use Term::*;
        match term {
            Var(x) => (&**x == self.param).then(|| self.value.clone()),
            Abs(x, _) if &**x == self.param => None,
            Abs(x, body) => {
                if !occurs_free(self.param, body) {
                    return None;
                }
                if !self.value_free().contains(&**x) {
                    return Some(Term::lambda(x.clone(), self.rec(body)?));
                }
                let avoid = union(free_variables(body), self.value_free());
                let fresh = fresh_name(x, &avoid);
                tracing::trace!(from = %x, to = %fresh, "alpha-renaming binder");
                let renamed = substitute(x, body, &Term::var(fresh.clone()));
                let body = self.rec(&renamed).unwrap_or(renamed);
                Some(Term::lambda(fresh, body))
            }
            Apply(lhs, rhs) => match (self.rec(lhs), self.rec(rhs)) {
                (None, None) => None,
                (new_lhs, new_rhs) => Some(Term::apply(
                    new_lhs.unwrap_or_else(|| lhs.clone()),
                    new_rhs.unwrap_or_else(|| rhs.clone()),
                )),
            },
        }
    }
}

/// Capture-avoiding `body[param := value]`.
///
/// Neither input is modified. Subtrees without a free `param` are shared with
/// `body`, and every insertion point shares the same immutable `value`.
pub fn substitute(param: &str, body: &TermRef, value: &TermRef) -> TermRef {
    let subst = Substitution {
        param,
        value,
        value_free: OnceCell::new(),
    };
    subst.rec(body).unwrap_or_else(|| body.clone())
}
