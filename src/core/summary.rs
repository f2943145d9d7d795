use rust_decimal::Decimal;

use super::codes::is_service_unit;
use super::types::{Item, Summary};

impl Summary {
    /// Derive document totals from line items.
    ///
    /// Lines in a service unit (`Sp`, `Os`, ...) count as services, everything
    /// else as goods. A line with at least one tax is taxable, otherwise exempt.
    pub fn from_items(items: &[Item]) -> Self {
        let mut summary = Summary::default();

        for item in items {
            let total = item.total.unwrap_or(Decimal::ZERO);
            let taxed = !item.taxes.is_empty();
            let service = item.unit.as_deref().is_some_and(is_service_unit);

            let bucket = match (service, taxed) {
                (true, true) => &mut summary.services_taxable_total,
                (true, false) => &mut summary.services_exempt_total,
                (false, true) => &mut summary.goods_taxable_total,
                (false, false) => &mut summary.goods_exempt_total,
            };
            *bucket += total;

            summary.discount_total += item.discount.unwrap_or(Decimal::ZERO);
            summary.tax_total += item
                .taxes
                .iter()
                .filter_map(|t| t.total)
                .sum::<Decimal>();
        }

        summary.taxable_total = summary.services_taxable_total + summary.goods_taxable_total;
        summary.exempt_total = summary.services_exempt_total + summary.goods_exempt_total;
        summary.sale_total = summary.taxable_total + summary.exempt_total;
        summary.net_sale_total = summary.sale_total - summary.discount_total;
        summary.voucher_total = summary.net_sale_total + summary.tax_total;
        summary
    }

    /// Express the totals in a foreign currency at `exchange_rate` colones per unit.
    pub fn with_currency(mut self, currency: impl Into<String>, exchange_rate: Decimal) -> Self {
        self.currency = Some(currency.into());
        self.exchange_rate = Some(exchange_rate);
        self
    }
}
