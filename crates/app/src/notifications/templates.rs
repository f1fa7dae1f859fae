//! Plain-text mail templates.

use karat::{money::format_inr, orders::OrderStatus};

use crate::{
    auth::otp::OTP_TTL,
    domain::{
        orders::models::{FALLBACK_ITEM_NAME, Order},
        users::models::User,
    },
    notifications::{events::OtpMessage, mailer::Mail},
};

fn mail(to: &str, subject: String, text: String) -> Mail {
    Mail {
        to: to.to_string(),
        subject,
        text,
        html: None,
    }
}

/// `pending` → `Pending`, `out_for_delivery` → `Out For Delivery`.
#[must_use]
pub fn status_label(status: &str) -> String {
    let status = status.trim().to_lowercase();

    if status.is_empty() {
        return "Updated".to_string();
    }

    status
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();

            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[must_use]
pub fn otp_mail(message: &OtpMessage, brand: &str) -> Mail {
    let heading = message.purpose.heading();

    let text = format!(
        "{brand}\n\n{heading}\n\nOTP: {code}\nExpires in {minutes} minutes.\n\nIf you did not request this, ignore this email.",
        code = message.code.as_str(),
        minutes = OTP_TTL.as_mins(),
    );

    mail(&message.to, heading.to_string(), text)
}

fn items_text(order: &Order) -> String {
    order
        .items
        .iter()
        .map(|item| {
            let name = if item.name.trim().is_empty() {
                FALLBACK_ITEM_NAME
            } else {
                item.name.trim()
            };

            format!("- {name} × {} @ {}", item.quantity, format_inr(item.price))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn summary_text(order: &Order) -> String {
    format!(
        "Items:\n{items}\n\nSubtotal: {subtotal}\nDiscount: {discount}\nGST: {tax}\nTotal: {total}\n\nShipping address:\n{address}",
        items = items_text(order),
        subtotal = format_inr(order.subtotal),
        discount = format_inr(order.discount),
        tax = format_inr(order.tax),
        total = format_inr(order.total),
        address = order
            .shipping_address
            .as_ref()
            .map(|address| address.lines().join("\n"))
            .unwrap_or_default(),
    )
}

/// Where customer mail for an order goes: the order's contact address, else the account's.
#[must_use]
pub fn customer_address<'a>(order: &'a Order, customer: &'a User) -> &'a str {
    order
        .customer_email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .unwrap_or(customer.email.as_str())
}

fn customer_name<'a>(order: &'a Order, customer: &'a User) -> &'a str {
    order.recipient_name().unwrap_or_else(|| {
        let full_name = customer.full_name.trim();

        if full_name.is_empty() {
            "Customer"
        } else {
            full_name
        }
    })
}

#[must_use]
pub fn customer_order_confirmed(order: &Order, customer: &User, brand: &str) -> Mail {
    let subject = format!("Order confirmed • {brand} • #{}", order.short_id());

    let text = format!(
        "{brand}\n\nHi {name},\n\nYour order has been confirmed.\n\nOrder ID: {id}\n\n{summary}\n\nThank you for shopping with us.",
        name = customer_name(order, customer),
        id = order.uuid,
        summary = summary_text(order),
    );

    mail(customer_address(order, customer), subject, text)
}

#[must_use]
pub fn admin_new_order(order: &Order, customer: &User, brand: &str, admin_email: &str) -> Mail {
    let subject = format!("New order received • {brand} • #{}", order.short_id());

    let phone = order
        .customer_phone
        .as_deref()
        .or_else(|| {
            order
                .shipping_address
                .as_ref()
                .map(|address| address.phone.as_str())
        })
        .unwrap_or_default();

    let text = format!(
        "{brand}\n\nNew order received.\n\nOrder ID: {id}\nCustomer: {name}\nEmail: {email}\nPhone: {phone}\n\n{summary}",
        id = order.uuid,
        name = customer_name(order, customer),
        email = customer_address(order, customer),
        summary = summary_text(order),
    );

    mail(admin_email, subject, text)
}

#[must_use]
pub fn customer_status_changed(
    order: &Order,
    customer: &User,
    from: OrderStatus,
    to: OrderStatus,
    brand: &str,
) -> Mail {
    let subject = format!("Order update • {brand} • #{}", order.short_id());

    let text = format!(
        "{brand}\n\nHi {name},\n\nYour order status has been updated.\n\nOrder ID: {id}\nPrevious status: {from}\nCurrent status: {to}\n\nThank you for shopping with us.",
        name = customer_name(order, customer),
        id = order.uuid,
        from = status_label(from.as_str()),
        to = status_label(to.as_str()),
    );

    mail(customer_address(order, customer), subject, text)
}
