/// Possible simplification steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Step {
    /// `2+3 = 5`, and likewise for every binary operator applied to two constants
    FoldConstant,

    /// `0+a = a`
    /// `a+0 = a`
    AddZero,

    /// `a-0 = a`
    SubtractZero,

    /// `0*a = 0`
    /// `a*0 = 0`
    MultiplyZero,

    /// `1*a = a`
    /// `a*1 = a`
    MultiplyOne,

    /// `0/a = 0`
    DivideZero,

    /// `a/1 = a`
    DivideOne,

    /// `a^0 = 1`
    PowerZero,

    /// `1^a = 1`
    PowerOneLeft,

    /// `a^1 = a`
    PowerOne,
}
