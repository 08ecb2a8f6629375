//! Checkout and portal return parameters.
//!
//! When the payment processor redirects back into the app it appends
//! flags to the query string. They must be acted on exactly once and
//! then removed, so a reload does not replay the outcome.

/// Flags extracted from a return redirect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckoutReturn {
    /// Checkout completed and payment succeeded.
    pub checkout_success: bool,
    /// User backed out of checkout.
    pub checkout_canceled: bool,
    /// User came back from the billing portal.
    pub portal_return: bool,
}

impl CheckoutReturn {
    /// Extract return flags from a query string (without the leading
    /// `?`), returning the flags and the query with those parameters
    /// stripped. All other parameters pass through untouched, in order.
    pub fn consume(query: &str) -> (Self, String) {
        let mut flags = Self::default();
        let mut remaining: Vec<&str> = Vec::new();

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = match pair.split_once('=') {
                Some((k, v)) => (k, v),
                None => (pair, ""),
            };

            let flag = match key {
                "checkout_success" => Some(&mut flags.checkout_success),
                "checkout_canceled" => Some(&mut flags.checkout_canceled),
                "portal_return" => Some(&mut flags.portal_return),
                _ => None,
            };

            match flag {
                Some(slot) => *slot = is_truthy(value),
                None => remaining.push(pair),
            }
        }

        (flags, remaining.join("&"))
    }

    /// Whether any flag is set.
    pub fn is_empty(&self) -> bool {
        !(self.checkout_success || self.checkout_canceled || self.portal_return)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "" | "1" | "true")
}
