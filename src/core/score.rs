/// Experience points earned in this session. Only ever grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    xp: u64,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn xp(&self) -> u64 {
        self.xp
    }

    pub fn add_xp(&mut self, amount: u32) {
        self.xp = self.xp.saturating_add(u64::from(amount));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(Score::new().xp(), 0);
    }

    #[test]
    fn test_accumulates() {
        let mut score = Score::new();
        score.add_xp(100);
        score.add_xp(0);
        score.add_xp(300);
        assert_eq!(score.xp(), 400);
    }

    #[test]
    fn test_saturates_instead_of_wrapping() {
        let mut score = Score { xp: u64::MAX - 10 };
        score.add_xp(100);
        assert_eq!(score.xp(), u64::MAX);
    }
}
