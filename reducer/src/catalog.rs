use crate::ast::{Term, TermRef};

pub struct Entry {
    pub name: &'static str,
    pub description: &'static str,
    build: fn() -> TermRef,
}

impl Entry {
    pub fn term(&self) -> TermRef {
        (self.build)()
    }
}

fn x() -> TermRef {
    Term::var("x")
}

/// `\x. x`
pub fn identity() -> TermRef {
    Term::lambda("x", x())
}

/// `\x. \y. x`
pub fn konst() -> TermRef {
    Term::lambda("x", Term::lambda("y", x()))
}

/// `\x. \y. \z. x z (y z)`
pub fn substitution() -> TermRef {
    let z = || Term::var("z");
    Term::lambda(
        "x",
        Term::lambda(
            "y",
            Term::lambda(
                "z",
                Term::apply_all(x(), [z(), Term::apply(Term::var("y"), z())]),
            ),
        ),
    )
}

/// `\t. \f. t`
pub fn church_true() -> TermRef {
    Term::lambda("t", Term::lambda("f", Term::var("t")))
}

/// `\t. \f. f`
pub fn church_false() -> TermRef {
    Term::lambda("t", Term::lambda("f", Term::var("f")))
}

/// `(\x. x x) (\x. x x)`
pub fn omega() -> TermRef {
    let half = || Term::lambda("x", Term::apply(x(), x()));
    Term::apply(half(), half())
}

static ENTRIES: &[Entry] = &[
    Entry {
        name: "I",
        description: "identity combinator",
        build: identity,
    },
    Entry {
        name: "K",
        description: "constant combinator",
        build: konst,
    },
    Entry {
        name: "S",
        description: "substitution combinator",
        build: substitution,
    },
    Entry {
        name: "TRUE",
        description: "Church boolean true",
        build: church_true,
    },
    Entry {
        name: "FALSE",
        description: "Church boolean false",
        build: church_false,
    },
    Entry {
        name: "true-id",
        description: "TRUE (I a) b, reduces to a",
        build: || {
            Term::apply_all(
                church_true(),
                [Term::apply(identity(), Term::var("a")), Term::var("b")],
            )
        },
    },
    Entry {
        name: "false-id",
        description: "FALSE (I a) b, reduces to b",
        build: || {
            Term::apply_all(
                church_false(),
                [Term::apply(identity(), Term::var("a")), Term::var("b")],
            )
        },
    },
    Entry {
        name: "skk",
        description: "S K K a, reduces to a",
        build: || Term::apply_all(substitution(), [konst(), konst(), Term::var("a")]),
    },
    Entry {
        name: "capture",
        description: "(\\x. \\y. x y) y, needs alpha-renaming",
        build: || {
            Term::apply(
                Term::lambda("x", Term::lambda("y", Term::apply(x(), Term::var("y")))),
                Term::var("y"),
            )
        },
    },
    Entry {
        name: "shadow",
        description: "(\\x. \\x. x) a, the inner binder shadows",
        build: || Term::apply(Term::lambda("x", identity()), Term::var("a")),
    },
    Entry {
        name: "under-binder",
        description: "\\z. I z, only reducible under the normal strategy",
        build: || Term::lambda("z", Term::apply(identity(), Term::var("z"))),
    },
    Entry {
        name: "lazy",
        description: "K a omega, the divergent argument is discarded",
        build: || Term::apply_all(konst(), [Term::var("a"), omega()]),
    },
    Entry {
        name: "omega",
        description: "self application, has no normal form",
        build: omega,
    },
];

pub fn entries() -> &'static [Entry] {
    ENTRIES
}

pub fn lookup(name: &str) -> Option<&'static Entry> {
    ENTRIES.iter().find(|entry| entry.name == name)
}
