//! Resource limits shared by the parser, the tree and the symbolic engine.

/// Hard limits that bound the work done on a single expression.
///
/// Every limit turns what would otherwise be unbounded recursion, allocation or iteration into a
/// reported error (or, for the simplifier, an early stop).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// The maximum nesting depth of the parsed expression. Every parenthesized group and every
    /// function argument counts as one level.
    pub max_depth: usize,

    /// The maximum number of live nodes a single [`Tree`](crate::Tree) may hold. Allocating past
    /// this budget fails with an `AllocationFailure` error.
    pub max_nodes: usize,

    /// The maximum number of fold / eliminate passes the simplifier runs before giving up on
    /// reaching a fixpoint.
    pub max_simplify_passes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 256,
            max_nodes: 1_000_000,
            max_simplify_passes: 10_000,
        }
    }
}

impl Limits {
    /// Wraps the given [`Limits`] into a builder for further customization.
    pub fn into_builder(self) -> LimitsBuilder {
        LimitsBuilder(self)
    }
}

/// A builder for [`Limits`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LimitsBuilder(Limits);

impl LimitsBuilder {
    /// Creates a new builder with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth. See [`Limits::max_depth`].
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    /// Sets the node budget of a tree. See [`Limits::max_nodes`].
    pub fn max_nodes(mut self, max_nodes: usize) -> Self {
        self.0.max_nodes = max_nodes;
        self
    }

    /// Sets the simplifier's pass budget. See [`Limits::max_simplify_passes`].
    pub fn max_simplify_passes(mut self, max_simplify_passes: usize) -> Self {
        self.0.max_simplify_passes = max_simplify_passes;
        self
    }

    /// Builds the [`Limits`].
    pub fn build(self) -> Limits {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn builder_overrides_only_given_fields() {
        let limits = LimitsBuilder::new()
            .max_depth(8)
            .max_simplify_passes(3)
            .build();

        assert_eq!(limits, Limits {
            max_depth: 8,
            max_nodes: Limits::default().max_nodes,
            max_simplify_passes: 3,
        });
    }

    #[test]
    fn into_builder_round_trip() {
        let limits = Limits::default().into_builder().max_nodes(10).build();
        assert_eq!(limits.max_nodes, 10);
        assert_eq!(limits.max_depth, 256);
    }
}
