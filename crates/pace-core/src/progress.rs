/// Share of work items consumed so far.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    consumed: usize,
    total: usize,
}

impl Progress {
    /// `total` is the pre-scanned item count.
    pub fn new(total: usize) -> Self {
        Self { consumed: 0, total }
    }

    /// Mark one more item consumed and return the new percentage.
    pub fn advance(&mut self) -> f64 {
        self.consumed += 1;
        self.percent()
    }

    /// Clamped to 100 when the pre-scan undercounted; an empty total reads as done.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.consumed as f64 / self.total as f64 * 100.0).min(100.0)
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaches_hundred_only_at_last_item() {
        let mut p = Progress::new(4);
        let steps: Vec<f64> = (0..4).map(|_| p.advance()).collect();

        assert_eq!(steps, [25.0, 50.0, 75.0, 100.0]);
        assert!(steps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn undercounted_total_is_clamped() {
        let mut p = Progress::new(1);
        assert_eq!(p.advance(), 100.0);
        assert_eq!(p.advance(), 100.0);
        assert_eq!(p.consumed(), 2);
    }

    #[test]
    fn empty_total_reads_as_done() {
        assert_eq!(Progress::new(0).percent(), 100.0);
    }
}
