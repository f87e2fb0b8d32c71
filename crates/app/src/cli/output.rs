use storefront_app::domain::{carts::records::Cart, orders::records::Order};

pub(crate) fn print_cart(cart: &Cart) {
    println!("cart_uuid: {}", cart.uuid);
    println!("customer_email: {}", cart.customer_email);

    for item in cart.items() {
        println!(
            "item: {} x{} @ {} = {} (product_uuid: {})",
            item.product.name,
            item.quantity,
            item.product.price,
            item.total_price(),
            item.product.uuid
        );
    }

    for code in cart.discount_codes() {
        println!(
            "discount_code: {} ({} {})",
            code.code,
            code.kind(),
            code.value.as_decimal()
        );
    }

    println!("subtotal: {}", cart.subtotal());
    println!("total_amount: {}", cart.total_amount());
}

pub(crate) fn print_order(order: &Order) {
    println!("order_uuid: {}", order.uuid);
    println!("customer_email: {}", order.customer.email);
    println!("date: {}", order.date);

    for item in &order.items {
        println!(
            "item: {} x{} @ {} = {}",
            item.product.name,
            item.quantity,
            item.product.price,
            item.total_price()
        );
    }

    println!("subtotal: {}", order.subtotal());
    println!("payment_amount: {}", order.payment.amount);
    println!("payment_status: {}", order.payment.status);
}
