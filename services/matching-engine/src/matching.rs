//! Crossing detection and aggressor pricing
//!
//! A book is crossed while the best bid prices at or above the best ask.
//! When a cross exists, the trade prints at the resting side's price: the
//! side of the most recent request is the aggressor and takes the price
//! already on the book.

use types::numeric::Price;
use types::order::Side;

/// True while the best bid can trade with the best ask
pub fn crossed(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// The price a match executes at, given which side moved last
pub fn execution_price(aggressor: Side, bid_price: Price, ask_price: Price) -> Price {
    if aggressor.is_buy() {
        ask_price
    } else {
        bid_price
    }
}
