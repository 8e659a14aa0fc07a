//! Customer receipt and kitchen docket layouts.

use chrono::NaiveDateTime;
use kebab_pos_core::{OrderType, PaymentMethod, Price, ReceiptOrder};

use super::escpos::{Align, EscPos, TextSize};
use crate::config::ReceiptBranding;

/// Blank lines fed before the cut so the receipt clears the tear bar.
const TEAR_OFF_FEED: usize = 8;

/// Display label for an order type; unknown types are shouted as-is.
#[must_use]
pub fn order_type_label(order_type: Option<&str>) -> String {
    let Some(raw) = order_type.filter(|t| !t.is_empty()) else {
        return OrderType::default().label().to_string();
    };
    raw.parse::<OrderType>().map_or_else(
        |_| raw.to_uppercase().replace(['-', '_'], " "),
        |kind| kind.label().to_string(),
    )
}

/// `Paid by` value; unknown methods are shouted as-is, missing means cash.
#[must_use]
pub fn payment_label(payment_method: Option<&str>) -> String {
    let Some(raw) = payment_method.filter(|m| !m.is_empty()) else {
        return PaymentMethod::default().as_str().to_uppercase();
    };
    raw.parse::<PaymentMethod>()
        .map_or_else(|_| raw.to_uppercase(), |method| method.as_str().to_uppercase())
}

/// Lay out `order`: a kitchen docket for the `kitchen` payment method,
/// otherwise a customer receipt.
#[must_use]
pub fn render(
    order: &ReceiptOrder,
    branding: &ReceiptBranding,
    currency: &str,
    printed_at: NaiveDateTime,
) -> EscPos {
    let mut doc = EscPos::new();
    if order.is_kitchen_docket() {
        kitchen_docket(&mut doc, order, printed_at);
    } else {
        customer_receipt(&mut doc, order, branding, currency, printed_at);
    }
    doc.feed(TEAR_OFF_FEED).cut();
    doc
}

fn kitchen_docket(doc: &mut EscPos, order: &ReceiptOrder, printed_at: NaiveDateTime) {
    doc.align(Align::Center)
        .size(TextSize::Large)
        .text("KITCHEN ORDER")
        .feed(2)
        .size(TextSize::Normal)
        .align(Align::Left)
        .rule('=')
        .size(TextSize::Large)
        .line(&format!("#{}", order.order_number))
        .size(TextSize::Normal)
        .rule('=')
        .line(&format!("Time: {}", printed_at.format("%-I:%M:%S %p")))
        .line(&format!(
            "Type: {}",
            order_type_label(order.order_type.as_deref())
        ));

    if let Some(customer) = order.customer_name.as_deref().filter(|c| !c.is_empty()) {
        doc.line(&format!("Customer: {customer}"));
    }
    doc.rule('-').feed(1);

    for item in &order.items {
        doc.size(TextSize::DoubleHeight)
            .line(&format!("{}x {}", item.printed_quantity(), item.display_name()))
            .size(TextSize::Normal);
        for modifier in &item.modifiers {
            doc.line(&format!("  >> {}", modifier.name));
        }
        if let Some(notes) = item.printable_notes() {
            doc.line(&format!("  ** {notes} **"));
        }
        doc.feed(1);
    }

    doc.rule('=').align(Align::Center).line("-- KITCHEN COPY --");
}

fn customer_receipt(
    doc: &mut EscPos,
    order: &ReceiptOrder,
    branding: &ReceiptBranding,
    currency: &str,
    printed_at: NaiveDateTime,
) {
    let money = |price: Price| price.display(currency);

    doc.align(Align::Center)
        .size(TextSize::Large)
        .line(&branding.shop_name)
        .size(TextSize::Normal);
    if !branding.header_lines.is_empty() {
        doc.feed(1);
        for line in &branding.header_lines {
            doc.line(line);
        }
    }
    doc.feed(1).align(Align::Left).rule('=');

    doc.align(Align::Center)
        .size(TextSize::DoubleHeight)
        .line(&order_type_label(order.order_type.as_deref()))
        .size(TextSize::Large)
        .line(&format!("#{}", order.order_number))
        .size(TextSize::Normal)
        .feed(1)
        .align(Align::Left)
        .line(&format!("Date: {}", printed_at.format("%d/%m/%Y, %I:%M %p")));

    if let Some(customer) = order.printable_customer() {
        doc.line(&format!("Customer: {customer}"));
    }
    doc.rule('-');

    for item in &order.items {
        doc.line(&format!("{}x {}", item.printed_quantity(), item.display_name()))
            .line(&format!("   {}", money(item.line_amount())));
        for modifier in &item.modifiers {
            if modifier.price.is_positive() {
                doc.line(&format!("   + {} ({})", modifier.name, money(modifier.price)));
            } else {
                doc.line(&format!("   + {}", modifier.name));
            }
        }
        if let Some(notes) = item.printable_notes() {
            doc.line(&format!("   Note: {notes}"));
        }
    }

    let paid_by = payment_label(order.payment_method.as_deref());

    doc.rule('-')
        .line(&format!("Subtotal: {}", money(order.subtotal)))
        .line(&format!("GST: {}", money(order.tax)))
        .size(TextSize::BoldDoubleHeight)
        .line(&format!("TOTAL: {}", money(order.total)))
        .size(TextSize::Normal)
        .rule('-')
        .line(&format!("Paid by: {paid_by}"))
        .feed(1)
        .align(Align::Center)
        .line(&branding.footer)
        .line("See you again soon")
        .feed(1);
}
