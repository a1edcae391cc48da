use tokio::sync::mpsc::UnboundedSender;

use tickerwatch_market_data::Quote;

/// Receives each quote of a batch as soon as it resolves.
///
/// Calls arrive in completion order, which is not the input order.
pub trait QuoteObserver: Send + Sync {
    fn on_update(&self, quote: &Quote);
}

impl<F> QuoteObserver for F
where
    F: Fn(&Quote) + Send + Sync,
{
    fn on_update(&self, quote: &Quote) {
        self(quote)
    }
}

impl QuoteObserver for UnboundedSender<Quote> {
    fn on_update(&self, quote: &Quote) {
        // A closed receiver only means nobody is listening any more.
        let _ = self.send(quote.clone());
    }
}
