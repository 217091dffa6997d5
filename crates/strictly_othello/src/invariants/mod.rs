//! First-class invariants for Othello.
//!
//! Invariants are logical properties that must hold after every engine
//! transition. They are testable independently and checked as
//! postconditions in debug builds.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants checked together, in declaration order.
///
/// Implemented for tuples of one to four invariants.
pub trait InvariantSet<S> {
    /// Every failing member, in tuple order. `Ok(())` when all hold.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn record_violation<S, I: Invariant<S>>(state: &S, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation::new(I::description()));
    }
}

macro_rules! impl_invariant_set {
    ($($member:ident),+) => {
        impl<S, $($member),+> InvariantSet<S> for ($($member,)+)
        where
            $($member: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(record_violation::<S, $member>(state, &mut violations);)+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(A);
impl_invariant_set!(A, B);
impl_invariant_set!(A, B, C);
impl_invariant_set!(A, B, C, D);

pub mod history_score;
pub mod stone_count;
pub mod turn_has_move;

pub use history_score::HistoryScoreInvariant;
pub use stone_count::StoneCountInvariant;
pub use turn_has_move::TurnHasMoveInvariant;

/// All Othello invariants as a composable set.
pub type OthelloInvariants = (
    StoneCountInvariant,
    HistoryScoreInvariant,
    TurnHasMoveInvariant,
);
