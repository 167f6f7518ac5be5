#![forbid(unsafe_code)]

//! Integer Bresenham counter for spreading a rounding remainder.

/// Spreads `numerator` units evenly over `denominator` steps.
///
/// After `k` calls to [`advance`](Self::advance) the running total is
/// `floor(k * numerator / denominator)`, so the per-step increment is
/// always 0 or 1 when `numerator < denominator`.
#[derive(Debug, Clone, Copy)]
pub struct BresenhamCounter {
    numerator: u64,
    denominator: u64,
    step: u64,
}

impl BresenhamCounter {
    pub const fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
            step: 0,
        }
    }

    /// Advance one step and return the running total.
    pub fn advance(&mut self) -> u64 {
        if self.denominator == 0 {
            return 0;
        }
        self.step += 1;
        self.step * self.numerator / self.denominator
    }
}
