/// Best bid/ask and midpoint for one instrument. Snapshots are replaced
/// wholesale on every successful price fetch; a failed fetch leaves the
/// previous snapshot untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    pub bid: f64,
    pub ask: f64,
    pub mid: f64,
}

impl PriceQuote {
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }
}
