use super::error::Error;

/// The electron bank for one build session.
///
/// `remaining` never drops below zero and never rises above `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElectronLedger {
    total: u32,
    remaining: u32,
}

impl ElectronLedger {
    pub fn new(total: u32) -> Self {
        Self {
            total,
            remaining: total,
        }
    }

    #[inline]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[inline]
    pub fn spent(&self) -> u32 {
        self.total - self.remaining
    }

    /// Takes `cost` electrons from the bank, or refuses without change.
    pub fn try_spend(&mut self, cost: u32) -> Result<(), Error> {
        match self.remaining.checked_sub(cost) {
            Some(left) => {
                self.remaining = left;
                Ok(())
            }
            None => Err(Error::InsufficientElectrons {
                needed: cost,
                remaining: self.remaining,
            }),
        }
    }

    /// Returns `cost` electrons to the bank, clamped at the total.
    pub fn refund(&mut self, cost: u32) {
        self.remaining = self.remaining.saturating_add(cost).min(self.total);
    }

    /// Applies a signed adjustment: positive spends, negative refunds.
    pub fn apply_delta(&mut self, delta: i64) -> Result<(), Error> {
        let magnitude = u32::try_from(delta.unsigned_abs()).unwrap_or(u32::MAX);
        if delta > 0 {
            self.try_spend(magnitude)
        } else {
            self.refund(magnitude);
            Ok(())
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.total;
    }
}
