use rust_decimal::Decimal;

/// How a raw BCCR quote maps onto the ledger's rate convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateMode {
    /// The ledger's base currency is CRC: the published "1 USD = X CRC"
    /// quote is stored as its reciprocal, "1 CRC = X USD".
    Inverted,
    /// The ledger's base currency is already USD: quotes are stored as
    /// published.
    Direct,
}

/// Raw quotes as published by the source, in CRC per USD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotePair {
    pub sell: Decimal,
    pub buy: Decimal,
}

/// Normalized ledger rates next to the untouched raw quotes, so either
/// direction can be audited or re-derived later.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedRates {
    pub sell: Decimal,
    pub buy: Decimal,
    pub sell_raw: Decimal,
    pub buy_raw: Decimal,
}

pub fn normalize(quotes: QuotePair, mode: RateMode) -> NormalizedRates {
    let (sell, buy) = match mode {
        RateMode::Inverted => (reciprocal(quotes.sell), reciprocal(quotes.buy)),
        RateMode::Direct => (quotes.sell, quotes.buy),
    };
    NormalizedRates {
        sell,
        buy,
        sell_raw: quotes.sell,
        buy_raw: quotes.buy,
    }
}

/// A zero quote stays zero instead of faulting on division.
fn reciprocal(quote: Decimal) -> Decimal {
    if quote.is_zero() {
        Decimal::ZERO
    } else {
        Decimal::ONE / quote
    }
}
